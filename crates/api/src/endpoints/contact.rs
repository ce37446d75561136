//! Public contact form endpoint.

use axum::{Json, Router, extract::State, middleware::from_fn_with_state, routing::post};
use salonkit_common::AppResult;
use salonkit_core::CreateContactMessageInput;
use salonkit_db::entities::contact_message;

use crate::middleware::AppState;
use crate::rate_limit::{RateLimiterState, rate_limit_write_middleware};
use crate::response::ApiResponse;

pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_message))
        .route_layer(from_fn_with_state(limiter, rate_limit_write_middleware))
}

/// Record an inbound contact message.
async fn create_message(
    State(state): State<AppState>,
    Json(input): Json<CreateContactMessageInput>,
) -> AppResult<ApiResponse<contact_message::Model>> {
    let message = state.contact_service.create(input).await?;
    Ok(ApiResponse::ok(message))
}
