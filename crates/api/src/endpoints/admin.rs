//! Admin back-office endpoints.
//!
//! Every route requires an authenticated account with the admin role.

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use salonkit_common::{AppError, AppResult, SiteSettings};
use salonkit_core::{
    CreateTemplateInput, DashboardStats, MessageStats, ReplyInput, TemplateRevenue,
    UpdateTemplateInput, UserStats,
};
use salonkit_db::entities::{contact_message, template, user};
use salonkit_db::types::{MessageStatus, OrderStatus};
use serde::Deserialize;

use super::orders::OrderResponse;
use crate::extractors::AdminUser;
use crate::middleware::AppState;
use crate::response::ApiResponse;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard_stats))
        .route("/orders", get(list_orders))
        .route("/orders/recent", get(recent_orders))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/orders/{id}", delete(delete_order))
        .route("/users", get(list_users))
        .route("/users/stats", get(user_stats))
        .route("/messages", get(list_messages))
        .route("/messages/stats", get(message_stats))
        .route("/messages/{id}/reply", post(reply_to_message))
        .route("/messages/{id}/status", put(update_message_status))
        .route("/messages/{id}", delete(delete_message))
        .route("/templates", get(list_templates).post(create_template))
        .route("/templates/{id}", put(update_template).delete(delete_template))
        .route("/settings", get(get_settings).put(put_settings))
}

const fn default_limit() -> u64 {
    50
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    status: Option<String>,
    #[serde(default = "default_limit")]
    limit: u64,
    #[serde(default)]
    offset: u64,
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    #[serde(default = "default_recent_limit")]
    limit: u64,
}

const fn default_recent_limit() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
}

async fn dashboard_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<DashboardStats>> {
    let stats = state.stats_service.dashboard_stats().await?;
    Ok(ApiResponse::ok(stats))
}

async fn list_orders(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let status = query
        .status
        .as_deref()
        .map(OrderStatus::from_str)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let orders = state
        .order_service
        .list(status, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(
        orders.into_iter().map(OrderResponse::from).collect(),
    ))
}

async fn recent_orders(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> AppResult<ApiResponse<Vec<OrderResponse>>> {
    let orders = state.order_service.recent(query.limit).await?;
    Ok(ApiResponse::ok(
        orders.into_iter().map(OrderResponse::from).collect(),
    ))
}

/// Override an order's status.
async fn update_order_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> AppResult<ApiResponse<OrderResponse>> {
    let status = OrderStatus::from_str(&body.status).map_err(AppError::BadRequest)?;
    let order = state.order_service.update_status(&id, status).await?;
    Ok(ApiResponse::ok(order.into()))
}

async fn delete_order(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.order_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<user::Model>>> {
    let users = state.user_service.list(query.limit, query.offset).await?;
    Ok(ApiResponse::ok(users))
}

async fn user_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<UserStats>> {
    let stats = state.stats_service.user_stats().await?;
    Ok(ApiResponse::ok(stats))
}

async fn list_messages(
    _admin: AdminUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Vec<contact_message::Model>>> {
    let status = query
        .status
        .as_deref()
        .map(MessageStatus::from_str)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let messages = state
        .contact_service
        .list(status, query.limit, query.offset)
        .await?;

    Ok(ApiResponse::ok(messages))
}

async fn message_stats(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<MessageStats>> {
    let stats = state.stats_service.message_stats().await?;
    Ok(ApiResponse::ok(stats))
}

/// Reply to a contact message by email.
async fn reply_to_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ReplyInput>,
) -> AppResult<ApiResponse<contact_message::Model>> {
    let message = state.contact_service.reply(&id, input).await?;
    Ok(ApiResponse::ok(message))
}

async fn update_message_status(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> AppResult<ApiResponse<contact_message::Model>> {
    let status = MessageStatus::from_str(&body.status).map_err(AppError::BadRequest)?;
    let message = state.contact_service.update_status(&id, status).await?;
    Ok(ApiResponse::ok(message))
}

async fn delete_message(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.contact_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

/// List templates with completed-order revenue per template.
async fn list_templates(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<TemplateRevenue>>> {
    let templates = state.template_service.list_with_revenue().await?;
    Ok(ApiResponse::ok(templates))
}

async fn create_template(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplateInput>,
) -> AppResult<ApiResponse<template::Model>> {
    let template = state.template_service.create(input).await?;
    Ok(ApiResponse::ok(template))
}

async fn update_template(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateTemplateInput>,
) -> AppResult<ApiResponse<template::Model>> {
    let template = state.template_service.update(&id, input).await?;
    Ok(ApiResponse::ok(template))
}

async fn delete_template(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.template_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

async fn get_settings(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SiteSettings>> {
    let settings = state.settings_store.load().await?;
    Ok(ApiResponse::ok(settings))
}

async fn put_settings(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(settings): Json<SiteSettings>,
) -> AppResult<ApiResponse<SiteSettings>> {
    state.settings_store.save(&settings).await?;
    Ok(ApiResponse::ok(settings))
}
