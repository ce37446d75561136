//! Stripe payment endpoints.

use std::collections::HashMap;

use axum::{Json, Router, extract::State, middleware::from_fn_with_state, routing::post};
use salonkit_common::AppResult;
use salonkit_core::{CheckoutSession, PaymentIntent};
use serde::Deserialize;
use validator::Validate;

use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::rate_limit::{RateLimiterState, rate_limit_heavy_middleware};
use crate::response::ApiResponse;

pub fn router(limiter: RateLimiterState) -> Router<AppState> {
    Router::new()
        .route("/create-intent", post(create_intent))
        .route("/create-checkout-session", post(create_checkout_session))
        .route_layer(from_fn_with_state(limiter, rate_limit_heavy_middleware))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateIntentBody {
    /// Amount in euros.
    #[validate(range(min = 0.5))]
    amount: f64,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateCheckoutSessionBody {
    #[validate(length(min = 1))]
    order_id: String,
    #[validate(url)]
    success_url: String,
    #[validate(url)]
    cancel_url: String,
}

/// Create a payment intent for an arbitrary euro amount.
async fn create_intent(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateIntentBody>,
) -> AppResult<ApiResponse<PaymentIntent>> {
    body.validate()?;

    let mut metadata: Vec<(String, String)> = body.metadata.into_iter().collect();
    metadata.push(("user_id".to_string(), user.id));

    let intent = state
        .payment_service
        .stripe()
        .create_payment_intent(body.amount, &metadata)
        .await?;

    Ok(ApiResponse::ok(intent))
}

/// Create a Stripe checkout session for an order the caller owns.
///
/// The session id is written back to the order so the return trip can find
/// it without relying on Stripe metadata.
async fn create_checkout_session(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateCheckoutSessionBody>,
) -> AppResult<ApiResponse<CheckoutSession>> {
    body.validate()?;

    let order = state
        .order_service
        .get_owned(&body.order_id, &user.id)
        .await?;

    let session = state
        .payment_service
        .stripe()
        .create_checkout_session(&order, &body.success_url, &body.cancel_url)
        .await?;

    state
        .order_service
        .attach_stripe_session(&order.id, &session.id)
        .await?;

    Ok(ApiResponse::ok(session))
}
