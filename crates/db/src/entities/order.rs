//! Order entity (a customer's purchase plus its setup workflow state).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning user; NULL until the account is created
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    pub salon_name: String,

    pub owner_name: String,

    pub email: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub city: Option<String>,

    #[sea_orm(nullable)]
    pub postal_code: Option<String>,

    /// Chosen domain name (without extension)
    #[sea_orm(nullable)]
    pub domain: Option<String>,

    /// Chosen extension, e.g. ".fr"
    #[sea_orm(nullable)]
    pub domain_extension: Option<String>,

    /// Registrar price in cents
    #[sea_orm(nullable)]
    pub domain_price: Option<i64>,

    /// Price charged to the customer in cents
    #[sea_orm(nullable)]
    pub domain_user_price: Option<i64>,

    /// Purchased template
    #[sea_orm(nullable)]
    pub template_id: Option<String>,

    /// Total in cents
    pub total_amount: i64,

    pub currency: String,

    #[sea_orm(nullable)]
    pub stripe_session_id: Option<String>,

    /// Lifecycle status: pending, processing, completed, cancelled, refunded
    pub status: String,

    /// Setup wizard stage marker
    pub setup_step: String,

    #[sea_orm(default_value = false)]
    pub setup_completed: bool,

    /// Design preferences captured at the design step (free-form JSON)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub design_preferences: Option<Json>,

    /// About text captured at the content step
    #[sea_orm(column_type = "Text", nullable)]
    pub about_text: Option<String>,

    /// Offered services captured at the content step (JSON string array)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub services: Option<Json>,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::template::Entity",
        from = "Column::TemplateId",
        to = "super::template::Column::Id",
        on_delete = "SetNull"
    )]
    Template,

    #[sea_orm(has_many = "super::photo::Entity")]
    Photos,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl Related<super::photo::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
