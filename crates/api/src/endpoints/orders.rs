//! Order and setup-workflow endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use salonkit_common::AppResult;
use salonkit_core::{
    AdvanceBusinessInfoInput, AdvanceContentInput, AdvanceDesignInput, AdvanceDomainInput,
    CreateOrderInput, progress,
};
use salonkit_db::entities::order;
use salonkit_db::types::{OrderStatus, SetupStep};
use serde::Serialize;

use crate::extractors::{AuthUser, MaybeAuthUser};
use crate::middleware::AppState;
use crate::rate_limit::{RateLimiterState, rate_limit_write_middleware};
use crate::response::ApiResponse;

pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    let reads = Router::new()
        .route("/current", get(current_order))
        .route("/{id}", get(get_order));

    // Workflow mutations share the stricter write budget.
    let writes = Router::new()
        .route("/", post(create_order))
        .route("/{id}/update-domain", post(update_domain))
        .route("/{id}/update-business-info", post(update_business_info))
        .route("/{id}/update-design", post(update_design))
        .route("/{id}/update-content", post(update_content))
        .route("/{id}/update-photos", post(update_photos))
        .route("/{id}/complete-setup", post(complete_setup))
        .route_layer(from_fn_with_state(limiter, rate_limit_write_middleware));

    reads.merge(writes)
}

/// An order as the API reports it, with the derived setup progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: order::Model,
    /// Setup progress, 0 to 100.
    pub progress: u8,
}

impl From<order::Model> for OrderResponse {
    fn from(order: order::Model) -> Self {
        let status = order.status.parse().unwrap_or(OrderStatus::Pending);
        let step = order.setup_step.parse().unwrap_or(SetupStep::DomainSelection);
        Self {
            order,
            progress: progress(status, step),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CurrentOrderResponse {
    order: Option<OrderResponse>,
    has_completed_order: bool,
}

/// Create an order at checkout submission.
///
/// Unauthenticated checkouts get an account provisioned from the order's
/// contact details.
async fn create_order(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let user = match user {
        Some(user) => user,
        None => {
            state
                .user_service
                .get_or_create(&input.email, &input.owner_name)
                .await?
        }
    };

    let order = state.order_service.create(Some(&user.id), input).await?;
    Ok(ApiResponse::ok(order.into()))
}

/// The caller's in-progress order, if any.
async fn current_order(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<CurrentOrderResponse>> {
    let view = state.order_service.current_order(&user.id).await?;

    Ok(ApiResponse::ok(CurrentOrderResponse {
        order: view.order.map(OrderResponse::from),
        has_completed_order: view.has_completed_order,
    }))
}

/// Fetch one order. Owners see their own; admins see any.
async fn get_order(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = if user.is_admin() {
        state.order_service.get(&id).await?
    } else {
        state.order_service.get_owned(&id, &user.id).await?
    };

    Ok(ApiResponse::ok(order.into()))
}

async fn update_domain(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdvanceDomainInput>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state
        .order_service
        .advance_domain(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(order.into()))
}

async fn update_business_info(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdvanceBusinessInfoInput>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state
        .order_service
        .advance_business_info(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(order.into()))
}

async fn update_design(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdvanceDesignInput>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state
        .order_service
        .advance_design(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(order.into()))
}

async fn update_content(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdvanceContentInput>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state
        .order_service
        .advance_content(&user.id, &id, input)
        .await?;
    Ok(ApiResponse::ok(order.into()))
}

async fn update_photos(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.order_service.advance_photos(&user.id, &id).await?;
    Ok(ApiResponse::ok(order.into()))
}

async fn complete_setup(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = state.order_service.complete_setup(&user.id, &id).await?;
    Ok(ApiResponse::ok(order.into()))
}
