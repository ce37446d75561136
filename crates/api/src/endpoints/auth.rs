//! Session verification endpoint.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use salonkit_common::AppResult;
use salonkit_core::VerifiedSession;
use serde::Deserialize;

use crate::middleware::AppState;
use crate::response::ApiResponse;

pub fn router() -> Router<AppState> {
    Router::new().route("/verify-session", get(verify_session))
}

#[derive(Debug, Deserialize)]
struct VerifyQuery {
    session_id: String,
}

/// Verify a Stripe checkout session after the customer returns.
async fn verify_session(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> AppResult<ApiResponse<VerifiedSession>> {
    let verified = state
        .payment_service
        .verify_session(&query.session_id)
        .await?;
    Ok(ApiResponse::ok(verified))
}
