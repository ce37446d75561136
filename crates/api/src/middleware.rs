//! API middleware.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use salonkit_common::SettingsStore;
use salonkit_core::{
    ContactService, DomainService, OrderService, PaymentService, PhotoService, StatsService,
    TemplateService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub order_service: OrderService,
    pub photo_service: PhotoService,
    pub payment_service: PaymentService,
    pub stats_service: StatsService,
    pub contact_service: ContactService,
    pub domain_service: DomainService,
    pub template_service: TemplateService,
    pub settings_store: SettingsStore,
}

/// Authentication middleware.
///
/// Resolves a bearer token to its account and stashes the model in request
/// extensions; routes decide through extractors whether auth is required.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
