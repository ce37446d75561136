//! Photo entity (uploaded salon images).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Uploading user
    #[sea_orm(nullable)]
    pub user_id: Option<String>,

    /// Order this photo belongs to
    #[sea_orm(nullable)]
    pub order_id: Option<String>,

    /// Original client-side file name
    pub filename: String,

    /// Generated on-disk file name
    pub stored_filename: String,

    /// URL of the stored original
    pub original_url: String,

    #[sea_orm(nullable)]
    pub thumbnail_url: Option<String>,

    /// Size in bytes of the stored (transformed) file
    pub size: i64,

    /// MIME type
    pub mime_type: String,

    #[sea_orm(nullable)]
    pub width: Option<i32>,

    #[sea_orm(nullable)]
    pub height: Option<i32>,

    /// Alt text
    #[sea_orm(column_type = "Text", nullable)]
    pub alt: Option<String>,

    #[sea_orm(default_value = 0)]
    pub sort_order: i32,

    /// Processing status: uploading, processing, completed, failed
    pub upload_status: String,

    /// MD5 of the original upload (duplicate detection)
    #[sea_orm(nullable)]
    pub md5: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
