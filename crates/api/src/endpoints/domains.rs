//! Domain availability and pricing endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use salonkit_common::AppResult;
use salonkit_core::DomainCheck;
use salonkit_db::entities::domain_pricing;
use serde::Deserialize;

use crate::middleware::AppState;
use crate::response::ApiResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check", get(check_domain))
        .route("/pricing", get(pricing))
}

#[derive(Debug, Deserialize)]
struct CheckQuery {
    domain: String,
    extension: String,
}

/// Check simulated availability of a domain name.
async fn check_domain(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> AppResult<ApiResponse<DomainCheck>> {
    let check = state
        .domain_service
        .check(&query.domain, &query.extension)
        .await?;
    Ok(ApiResponse::ok(check))
}

/// List extensions offered for registration.
async fn pricing(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<domain_pricing::Model>>> {
    let pricing = state.domain_service.pricing().await?;
    Ok(ApiResponse::ok(pricing))
}
