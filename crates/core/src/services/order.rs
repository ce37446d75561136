//! Order workflow service.
//!
//! Orders move through a guided setup wizard after checkout. The step
//! sequence is fixed but the server does not police skipping or regressing;
//! each advance operation simply records the fields it received and the
//! stage marker.

use chrono::Utc;
use salonkit_common::{AppError, AppResult, IdGenerator};
use salonkit_db::entities::order;
use salonkit_db::repositories::OrderRepository;
use salonkit_db::types::{OrderStatus, SetupStep};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating an order at checkout submission.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[validate(length(min = 1, max = 256))]
    pub salon_name: String,
    #[validate(length(min = 1, max = 256))]
    pub owner_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(max = 128))]
    pub city: Option<String>,
    #[validate(length(max = 16))]
    pub postal_code: Option<String>,
    pub template_id: Option<String>,
    /// Total in cents.
    #[validate(range(min = 0))]
    pub total_amount: i64,
    pub domain: Option<String>,
    pub domain_extension: Option<String>,
}

/// Input for the domain selection step.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceDomainInput {
    #[validate(length(min = 1, max = 256))]
    pub domain: String,
    #[validate(length(min = 1, max = 16))]
    pub extension: String,
    /// Registrar price in cents.
    pub price: Option<i64>,
    /// Price charged to the customer in cents.
    pub user_price: Option<i64>,
}

/// Input for the business info step.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceBusinessInfoInput {
    #[validate(length(min = 1, max = 256))]
    pub salon_name: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub owner_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 512))]
    pub address: Option<String>,
    #[validate(length(max = 128))]
    pub city: Option<String>,
    #[validate(length(max = 16))]
    pub postal_code: Option<String>,
}

/// Input for the design preferences step.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceDesignInput {
    pub template_id: Option<String>,
    /// Free-form style preferences (colors, fonts, layout choices).
    pub design_preferences: Option<serde_json::Value>,
}

/// Input for the content step.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceContentInput {
    #[validate(length(max = 10_000))]
    pub about_text: Option<String>,
    pub services: Option<Vec<String>>,
    /// Number of photos the client intends to upload.
    pub photo_count: Option<u32>,
}

/// The caller's in-progress order, if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentOrderView {
    pub order: Option<order::Model>,
    pub has_completed_order: bool,
}

/// Setup progress percentage for a given order state.
///
/// A cancelled order always reports 0 and a completed order always reports
/// 100, regardless of the recorded step.
#[must_use]
pub fn progress(status: OrderStatus, step: SetupStep) -> u8 {
    match status {
        OrderStatus::Cancelled => return 0,
        OrderStatus::Completed => return 100,
        _ => {}
    }

    match step {
        SetupStep::DomainSelection => 15,
        SetupStep::BusinessInfo => 30,
        SetupStep::DesignPreferences => 45,
        SetupStep::ContentUpload => 60,
        SetupStep::PhotosUpload => 75,
        SetupStep::ReviewLaunch => 90,
        SetupStep::Completed => 100,
    }
}

/// Service for order lifecycle and the setup workflow.
#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    id_gen: IdGenerator,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub const fn new(order_repo: OrderRepository) -> Self {
        Self {
            order_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an order at checkout submission.
    pub async fn create(
        &self,
        user_id: Option<&str>,
        input: CreateOrderInput,
    ) -> AppResult<order::Model> {
        input.validate()?;

        let now = Utc::now();
        let model = order::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.map(ToString::to_string)),
            salon_name: Set(input.salon_name),
            owner_name: Set(input.owner_name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            city: Set(input.city),
            postal_code: Set(input.postal_code),
            domain: Set(input.domain),
            domain_extension: Set(input.domain_extension),
            domain_price: Set(None),
            domain_user_price: Set(None),
            template_id: Set(input.template_id),
            total_amount: Set(input.total_amount),
            currency: Set("eur".to_string()),
            stripe_session_id: Set(None),
            status: Set(OrderStatus::Pending.as_str().to_string()),
            setup_step: Set(SetupStep::DomainSelection.as_str().to_string()),
            setup_completed: Set(false),
            design_preferences: Set(None),
            about_text: Set(None),
            services: Set(None),
            completed_at: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(None),
        };

        self.order_repo.create(model).await
    }

    /// Get an order the caller owns.
    pub async fn get_owned(&self, order_id: &str, user_id: &str) -> AppResult<order::Model> {
        self.order_repo.get_by_id_for_user(order_id, user_id).await
    }

    /// Get an order without an ownership check (admin access).
    pub async fn get(&self, order_id: &str) -> AppResult<order::Model> {
        self.order_repo.get_by_id(order_id).await
    }

    /// The caller's current in-progress order, plus whether they already
    /// have a completed one.
    pub async fn current_order(&self, user_id: &str) -> AppResult<CurrentOrderView> {
        let order = self.order_repo.find_current_for_user(user_id).await?;
        let has_completed_order = if order.is_none() {
            self.order_repo
                .count_by_user_and_status(user_id, OrderStatus::Completed.as_str())
                .await?
                > 0
        } else {
            false
        };

        Ok(CurrentOrderView {
            order,
            has_completed_order,
        })
    }

    /// Record the domain selection and move to the business info step.
    pub async fn advance_domain(
        &self,
        user_id: &str,
        order_id: &str,
        input: AdvanceDomainInput,
    ) -> AppResult<order::Model> {
        input.validate()?;

        let order = self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        let mut active: order::ActiveModel = order.into();
        active.domain = Set(Some(input.domain));
        active.domain_extension = Set(Some(input.extension));
        active.domain_price = Set(input.price);
        active.domain_user_price = Set(input.user_price);
        active.setup_step = Set(SetupStep::BusinessInfo.as_str().to_string());
        active.updated_at = Set(Some(Utc::now().into()));

        self.order_repo.update(active).await
    }

    /// Record business info and move to the design step.
    pub async fn advance_business_info(
        &self,
        user_id: &str,
        order_id: &str,
        input: AdvanceBusinessInfoInput,
    ) -> AppResult<order::Model> {
        input.validate()?;

        let order = self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        let mut active: order::ActiveModel = order.into();
        if let Some(salon_name) = input.salon_name {
            active.salon_name = Set(salon_name);
        }
        if let Some(owner_name) = input.owner_name {
            active.owner_name = Set(owner_name);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(city) = input.city {
            active.city = Set(Some(city));
        }
        if let Some(postal_code) = input.postal_code {
            active.postal_code = Set(Some(postal_code));
        }
        active.setup_step = Set(SetupStep::DesignPreferences.as_str().to_string());
        active.updated_at = Set(Some(Utc::now().into()));

        self.order_repo.update(active).await
    }

    /// Record design preferences and move to the content step.
    pub async fn advance_design(
        &self,
        user_id: &str,
        order_id: &str,
        input: AdvanceDesignInput,
    ) -> AppResult<order::Model> {
        let order = self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        let mut active: order::ActiveModel = order.into();
        if let Some(template_id) = input.template_id {
            active.template_id = Set(Some(template_id));
        }
        if let Some(preferences) = input.design_preferences {
            active.design_preferences = Set(Some(preferences));
        }
        active.setup_step = Set(SetupStep::ContentUpload.as_str().to_string());
        active.updated_at = Set(Some(Utc::now().into()));

        self.order_repo.update(active).await
    }

    /// Record site content. The step marker is set to `content_upload`
    /// (the stage reached), not the next stage.
    pub async fn advance_content(
        &self,
        user_id: &str,
        order_id: &str,
        input: AdvanceContentInput,
    ) -> AppResult<order::Model> {
        input.validate()?;

        let order = self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        let mut active: order::ActiveModel = order.into();
        if let Some(about_text) = input.about_text {
            active.about_text = Set(Some(about_text));
        }
        if let Some(services) = input.services {
            active.services = Set(Some(serde_json::json!(services)));
        }
        active.setup_step = Set(SetupStep::ContentUpload.as_str().to_string());
        active.updated_at = Set(Some(Utc::now().into()));

        self.order_repo.update(active).await
    }

    /// Mark the photo stage done and move to review.
    pub async fn advance_photos(&self, user_id: &str, order_id: &str) -> AppResult<order::Model> {
        let order = self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        let mut active: order::ActiveModel = order.into();
        active.setup_step = Set(SetupStep::ReviewLaunch.as_str().to_string());
        active.updated_at = Set(Some(Utc::now().into()));

        self.order_repo.update(active).await
    }

    /// Finish the setup wizard.
    pub async fn complete_setup(&self, user_id: &str, order_id: &str) -> AppResult<order::Model> {
        let order = self.order_repo.get_by_id_for_user(order_id, user_id).await?;
        let completed_at = order.completed_at;

        let mut active: order::ActiveModel = order.into();
        active.setup_step = Set(SetupStep::Completed.as_str().to_string());
        active.setup_completed = Set(true);
        active.status = Set(OrderStatus::Completed.as_str().to_string());
        if completed_at.is_none() {
            active.completed_at = Set(Some(Utc::now().into()));
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.order_repo.update(active).await
    }

    /// Record the Stripe checkout session created for an order.
    pub async fn attach_stripe_session(
        &self,
        order_id: &str,
        session_id: &str,
    ) -> AppResult<order::Model> {
        let order = self.order_repo.get_by_id(order_id).await?;
        let mut active: order::ActiveModel = order.into();
        active.stripe_session_id = Set(Some(session_id.to_string()));
        active.updated_at = Set(Some(Utc::now().into()));

        self.order_repo.update(active).await
    }

    /// Admin: list orders, optionally filtered by status.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<order::Model>> {
        self.order_repo
            .find_page(status.map(OrderStatus::as_str), limit, offset)
            .await
    }

    /// Admin: most recent orders.
    pub async fn recent(&self, limit: u64) -> AppResult<Vec<order::Model>> {
        self.order_repo.find_recent(limit).await
    }

    /// Admin: override an order's status.
    ///
    /// There is no lock against a concurrent client advance; the last write
    /// wins.
    pub async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> AppResult<order::Model> {
        let order = self.order_repo.get_by_id(order_id).await?;
        let active = apply_status_change(order, status);
        self.order_repo.update(active).await
    }

    /// Admin: delete an order.
    pub async fn delete(&self, order_id: &str) -> AppResult<()> {
        self.order_repo.get_by_id(order_id).await?;
        self.order_repo.delete(order_id).await
    }
}

/// Build the active model for an admin status override.
///
/// Setting `completed` stamps `completed_at` and `setup_completed` if they
/// are not already set; moving away from `completed` clears `completed_at`.
fn apply_status_change(order: order::Model, status: OrderStatus) -> order::ActiveModel {
    let was_completed_at = order.completed_at;
    let was_setup_completed = order.setup_completed;

    let mut active: order::ActiveModel = order.into();
    active.status = Set(status.as_str().to_string());

    match status {
        OrderStatus::Completed => {
            if was_completed_at.is_none() {
                active.completed_at = Set(Some(Utc::now().into()));
            }
            if !was_setup_completed {
                active.setup_completed = Set(true);
            }
        }
        _ => {
            if was_completed_at.is_some() {
                active.completed_at = Set(None);
            }
        }
    }

    active.updated_at = Set(Some(Utc::now().into()));
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_order(id: &str, user_id: &str, status: &str, step: &str) -> order::Model {
        order::Model {
            id: id.to_string(),
            user_id: Some(user_id.to_string()),
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
            stripe_session_id: None,
            status: status.to_string(),
            setup_step: step.to_string(),
            setup_completed: false,
            design_preferences: None,
            about_text: None,
            services: None,
            completed_at: None,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_progress_table() {
        let cases = [
            (SetupStep::DomainSelection, 15),
            (SetupStep::BusinessInfo, 30),
            (SetupStep::DesignPreferences, 45),
            (SetupStep::ContentUpload, 60),
            (SetupStep::PhotosUpload, 75),
            (SetupStep::ReviewLaunch, 90),
            (SetupStep::Completed, 100),
        ];
        for (step, expected) in cases {
            assert_eq!(progress(OrderStatus::Pending, step), expected);
        }
    }

    #[test]
    fn test_progress_cancelled_is_zero() {
        assert_eq!(progress(OrderStatus::Cancelled, SetupStep::ReviewLaunch), 0);
        assert_eq!(
            progress(OrderStatus::Cancelled, SetupStep::DomainSelection),
            0
        );
    }

    #[test]
    fn test_progress_completed_status_is_full() {
        assert_eq!(
            progress(OrderStatus::Completed, SetupStep::BusinessInfo),
            100
        );
    }

    #[tokio::test]
    async fn test_advance_domain_foreign_order_is_not_found() {
        // The ownership-scoped lookup matches nothing, so no update runs.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<order::Model>::new()])
                .into_connection(),
        );

        let service = OrderService::new(salonkit_db::repositories::OrderRepository::new(db));
        let result = service
            .advance_domain(
                "intruder",
                "ord1",
                AdvanceDomainInput {
                    domain: "salon-lumiere".to_string(),
                    extension: ".fr".to_string(),
                    price: Some(899),
                    user_price: Some(1200),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::OrderNotFound(_))));
    }

    #[test]
    fn test_admin_complete_keeps_setup_step() {
        // Admin completion while the client sits on business_info: status and
        // completed_at change, the step marker stays where the client left it.
        let order = test_order("ord1", "user1", "processing", "business_info");
        let active = apply_status_change(order, OrderStatus::Completed);

        assert_eq!(
            active.status,
            ActiveValue::Set(OrderStatus::Completed.as_str().to_string())
        );
        assert!(matches!(active.completed_at, ActiveValue::Set(Some(_))));
        assert_eq!(active.setup_completed, ActiveValue::Set(true));
        // Untouched fields stay as unchanged values.
        assert!(matches!(active.setup_step, ActiveValue::Unchanged(ref s) if s == "business_info"));
    }

    #[test]
    fn test_admin_uncomplete_clears_completed_at() {
        let mut order = test_order("ord1", "user1", "completed", "completed");
        order.completed_at = Some(Utc::now().into());
        let active = apply_status_change(order, OrderStatus::Processing);

        assert_eq!(active.completed_at, ActiveValue::Set(None));
    }

    #[test]
    fn test_create_order_input_rejects_bad_email() {
        let input = CreateOrderInput {
            salon_name: "Salon Lumière".to_string(),
            owner_name: "Marie Dupont".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            address: None,
            city: None,
            postal_code: None,
            template_id: None,
            total_amount: 49900,
            domain: None,
            domain_extension: None,
        };

        assert!(input.validate().is_err());
    }
}
