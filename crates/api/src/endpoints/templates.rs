//! Public template catalog endpoints.

use axum::{
    Router,
    extract::{Path, Query, State},
    routing::get,
};
use salonkit_common::AppResult;
use salonkit_db::entities::template;
use serde::Deserialize;

use crate::middleware::AppState;
use crate::response::ApiResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates))
        .route("/{id}", get(get_template))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    category: Option<String>,
}

/// List active templates, optionally filtered by category.
async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<template::Model>>> {
    let templates = state
        .template_service
        .list_active(query.category.as_deref())
        .await?;
    Ok(ApiResponse::ok(templates))
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<template::Model>> {
    let template = state.template_service.get(&id).await?;
    Ok(ApiResponse::ok(template))
}
