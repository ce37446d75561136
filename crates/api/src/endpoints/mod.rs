//! API endpoints.

mod admin;
mod auth;
mod contact;
mod domains;
mod orders;
mod payments;
mod photos;
mod templates;

use axum::Router;

use crate::middleware::AppState;
use crate::rate_limit::RateLimiterState;

/// Create the API router. Write and heavy endpoint groups carry their own
/// stricter rate limits on top of the server-wide standard limit.
pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .nest("/orders", orders::router(limiter.clone()))
        .nest("/photos", photos::router(limiter.clone()))
        .nest("/domains", domains::router())
        .nest("/templates", templates::router())
        .nest("/contact", contact::router(limiter.clone()))
        .nest("/payments", payments::router(limiter))
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
