//! Stripe payment bridge.
//!
//! A thin form-encoded client over Stripe's REST API. The client is injected
//! wherever payments are needed; nothing here is a process-wide singleton.

use chrono::Utc;
use salonkit_common::{AppError, AppResult};
use salonkit_db::entities::{order, user};
use salonkit_db::repositories::{OrderRepository, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Tag stamped into every payment's metadata.
const METADATA_SOURCE: &str = "salonkit";

/// A created payment intent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}

/// A created checkout session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    payment_status: String,
    amount_total: Option<i64>,
    #[serde(default)]
    metadata: std::collections::HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

/// The combined Stripe and local view returned by session verification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedSession {
    pub session_id: String,
    pub payment_status: String,
    pub amount_total: Option<i64>,
    pub customer_email: String,
    pub user: user::Model,
    pub order: Option<order::Model>,
}

/// Form-encoded Stripe REST client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
    currency: String,
}

impl StripeClient {
    /// Create a new Stripe client.
    #[must_use]
    pub fn new(secret_key: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: STRIPE_API_BASE.to_string(),
            secret_key: secret_key.into(),
            currency: currency.into(),
        }
    }

    /// Override the API base URL (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Create a payment intent for an amount given in euros.
    pub async fn create_payment_intent(
        &self,
        amount_eur: f64,
        metadata: &[(String, String)],
    ) -> AppResult<PaymentIntent> {
        let params = intent_params(amount_eur, &self.currency, metadata);
        let intent: PaymentIntent = self.post("payment_intents", &params).await?;

        info!(intent_id = %intent.id, amount = intent.amount, "created payment intent");
        Ok(intent)
    }

    /// Create a checkout session for an order.
    pub async fn create_checkout_session(
        &self,
        order: &order::Model,
        success_url: &str,
        cancel_url: &str,
    ) -> AppResult<CheckoutSession> {
        let params = checkout_params(order, &self.currency, success_url, cancel_url);
        let session: CheckoutSession = self.post("checkout/sessions", &params).await?;

        info!(session_id = %session.id, order_id = %order.id, "created checkout session");
        Ok(session)
    }

    async fn retrieve_session(&self, session_id: &str) -> AppResult<SessionResponse> {
        let url = format!("{}/checkout/sessions/{session_id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::Payment(e.to_string()))?;

        Self::parse(response).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> AppResult<T> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "stripe request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .form(params)
            .send()
            .await
            .map_err(|e| AppError::Payment(e.to_string()))?;

        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Payment(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("Stripe returned HTTP {status}"));
            return Err(AppError::Payment(message));
        }

        serde_json::from_str(&body).map_err(|e| AppError::Payment(e.to_string()))
    }
}

/// Payment operations that combine Stripe with local records.
#[derive(Clone)]
pub struct PaymentService {
    stripe: StripeClient,
    user_repo: UserRepository,
    order_repo: OrderRepository,
}

impl PaymentService {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(
        stripe: StripeClient,
        user_repo: UserRepository,
        order_repo: OrderRepository,
    ) -> Self {
        Self {
            stripe,
            user_repo,
            order_repo,
        }
    }

    /// The underlying Stripe client.
    #[must_use]
    pub const fn stripe(&self) -> &StripeClient {
        &self.stripe
    }

    /// Verify a checkout session after the customer returns from Stripe.
    ///
    /// The session must be paid before any local lookup runs; a session that
    /// names an email with no matching account is reported as an error, not
    /// repaired. Read-only and safe to repeat.
    pub async fn verify_session(&self, session_id: &str) -> AppResult<VerifiedSession> {
        let session = self.stripe.retrieve_session(session_id).await?;
        self.resolve_session(session).await
    }

    async fn resolve_session(&self, session: SessionResponse) -> AppResult<VerifiedSession> {
        if session.payment_status != "paid" {
            return Err(AppError::Payment(format!(
                "Session {} is not paid (status: {})",
                session.id, session.payment_status
            )));
        }

        let customer_email = session
            .metadata
            .get("customer_email")
            .cloned()
            .ok_or_else(|| {
                AppError::Payment("Session metadata is missing customer_email".to_string())
            })?;

        let user = self
            .user_repo
            .find_by_email(&customer_email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No account for {customer_email}")))?;

        let order = match self.order_repo.find_by_stripe_session(&session.id).await? {
            Some(order) => Some(order),
            None => match session.metadata.get("order_id") {
                Some(order_id) => self.order_repo.find_by_id(order_id).await?,
                None => None,
            },
        };

        Ok(VerifiedSession {
            session_id: session.id,
            payment_status: session.payment_status,
            amount_total: session.amount_total,
            customer_email,
            user,
            order,
        })
    }
}

/// Round a euro amount to cents.
#[must_use]
pub fn eur_to_cents(amount_eur: f64) -> i64 {
    (amount_eur * 100.0).round() as i64
}

fn intent_params(
    amount_eur: f64,
    currency: &str,
    metadata: &[(String, String)],
) -> Vec<(String, String)> {
    let mut params = vec![
        ("amount".to_string(), eur_to_cents(amount_eur).to_string()),
        ("currency".to_string(), currency.to_string()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
        (
            "metadata[source]".to_string(),
            METADATA_SOURCE.to_string(),
        ),
        ("metadata[created_at]".to_string(), Utc::now().to_rfc3339()),
    ];

    for (key, value) in metadata {
        params.push((format!("metadata[{key}]"), value.clone()));
    }

    params
}

fn checkout_params(
    order: &order::Model,
    currency: &str,
    success_url: &str,
    cancel_url: &str,
) -> Vec<(String, String)> {
    vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), success_url.to_string()),
        ("cancel_url".to_string(), cancel_url.to_string()),
        (
            "line_items[0][price_data][currency]".to_string(),
            currency.to_string(),
        ),
        (
            "line_items[0][price_data][unit_amount]".to_string(),
            order.total_amount.to_string(),
        ),
        (
            "line_items[0][price_data][product_data][name]".to_string(),
            format!("Website for {}", order.salon_name),
        ),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("metadata[order_id]".to_string(), order.id.clone()),
        (
            "metadata[customer_email]".to_string(),
            order.email.clone(),
        ),
        ("customer_email".to_string(), order.email.clone()),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn test_order() -> order::Model {
        order::Model {
            id: "ord1".to_string(),
            user_id: Some("user1".to_string()),
            salon_name: "Salon Lumière".to_string(),
            owner_name: "Marie Dupont".to_string(),
            email: "marie@salon-lumiere.fr".to_string(),
            phone: None,
            address: None,
            city: None,
            postal_code: None,
            domain: None,
            domain_extension: None,
            domain_price: None,
            domain_user_price: None,
            template_id: None,
            total_amount: 49900,
            currency: "eur".to_string(),
            stripe_session_id: Some("cs_1".to_string()),
            status: "pending".to_string(),
            setup_step: "domain_selection".to_string(),
            setup_completed: false,
            design_preferences: None,
            about_text: None,
            services: None,
            completed_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn test_user() -> user::Model {
        user::Model {
            id: "user1".to_string(),
            email: "marie@salon-lumiere.fr".to_string(),
            name: "Marie Dupont".to_string(),
            role: "client".to_string(),
            phone: None,
            token: Some("tok".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service(db: MockDatabase) -> PaymentService {
        let db = Arc::new(db.into_connection());
        PaymentService::new(
            StripeClient::new("sk_test", "eur"),
            UserRepository::new(Arc::clone(&db)),
            OrderRepository::new(db),
        )
    }

    fn session(payment_status: &str, metadata: &[(&str, &str)]) -> SessionResponse {
        SessionResponse {
            id: "cs_1".to_string(),
            payment_status: payment_status.to_string(),
            amount_total: Some(49900),
            metadata: metadata
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn test_unpaid_session_fails_before_any_lookup() {
        // No query results queued; a repository call would surface as a
        // database error instead of the payment error asserted here.
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let session = session(
            "unpaid",
            &[("customer_email", "marie@salon-lumiere.fr")],
        );
        let result = service.resolve_session(session).await;

        match result {
            Err(AppError::Payment(message)) => assert!(message.contains("not paid")),
            other => panic!("expected payment error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_session_without_customer_email_is_rejected() {
        let service = service(MockDatabase::new(DatabaseBackend::Postgres));

        let session = session("paid", &[("order_id", "ord1")]);
        let result = service.resolve_session(session).await;

        match result {
            Err(AppError::Payment(message)) => {
                assert!(message.contains("customer_email"));
            }
            other => panic!("expected payment error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_paid_session_resolves_account_and_order() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![test_user()]])
                .append_query_results([vec![test_order()]]),
        );

        let session = session(
            "paid",
            &[("customer_email", "marie@salon-lumiere.fr")],
        );
        let verified = service.resolve_session(session).await.unwrap();

        assert_eq!(verified.session_id, "cs_1");
        assert_eq!(verified.customer_email, "marie@salon-lumiere.fr");
        assert_eq!(verified.user.id, "user1");
        assert_eq!(verified.order.unwrap().id, "ord1");
    }

    #[tokio::test]
    async fn test_paid_session_with_unknown_email_is_not_found() {
        let service = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let session = session("paid", &[("customer_email", "nobody@example.fr")]);
        let result = service.resolve_session(session).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_eur_to_cents_rounds() {
        assert_eq!(eur_to_cents(499.0), 49900);
        assert_eq!(eur_to_cents(12.345), 1235);
        assert_eq!(eur_to_cents(0.004), 0);
    }

    #[test]
    fn test_intent_params_stamp_source_and_timestamp() {
        let params = intent_params(
            499.0,
            "eur",
            &[("order_id".to_string(), "ord1".to_string())],
        );

        assert!(
            params
                .iter()
                .any(|(k, v)| k == "amount" && v == "49900")
        );
        assert!(
            params
                .iter()
                .any(|(k, v)| k == "metadata[source]" && v == METADATA_SOURCE)
        );
        let created_at = params
            .iter()
            .find(|(k, _)| k == "metadata[created_at]")
            .map(|(_, v)| v)
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());
        assert!(
            params
                .iter()
                .any(|(k, v)| k == "metadata[order_id]" && v == "ord1")
        );
    }

    #[test]
    fn test_checkout_params_carry_order_identity() {
        let order = test_order();

        let params = checkout_params(&order, "eur", "https://x/success", "https://x/cancel");

        assert!(
            params
                .iter()
                .any(|(k, v)| k == "metadata[order_id]" && v == "ord1")
        );
        assert!(
            params
                .iter()
                .any(|(k, v)| k == "metadata[customer_email]" && v == "marie@salon-lumiere.fr")
        );
        assert!(
            params
                .iter()
                .any(|(k, v)| k == "line_items[0][price_data][unit_amount]" && v == "49900")
        );
    }
}
