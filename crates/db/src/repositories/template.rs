//! Template repository.

use std::sync::Arc;

use crate::entities::{Template, template};
use salonkit_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

/// Template repository for database operations.
#[derive(Clone)]
pub struct TemplateRepository {
    db: Arc<DatabaseConnection>,
}

impl TemplateRepository {
    /// Create a new template repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a template by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<template::Model>> {
        Template::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a template by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<template::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Template not found: {id}")))
    }

    /// Find a template by slug.
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<template::Model>> {
        Template::find()
            .filter(template::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List active templates, optionally filtered by category.
    pub async fn find_active(&self, category: Option<&str>) -> AppResult<Vec<template::Model>> {
        let mut query = Template::find()
            .filter(template::Column::IsActive.eq(true))
            .order_by_asc(template::Column::Name);

        if let Some(category) = category {
            query = query.filter(template::Column::Category.eq(category));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all templates including inactive ones.
    pub async fn find_all(&self) -> AppResult<Vec<template::Model>> {
        Template::find()
            .order_by_asc(template::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new template.
    pub async fn create(&self, model: template::ActiveModel) -> AppResult<template::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a template.
    pub async fn update(&self, model: template::ActiveModel) -> AppResult<template::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a template.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Template::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all templates.
    pub async fn count(&self) -> AppResult<u64> {
        Template::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_template(id: &str, slug: &str, is_active: bool) -> template::Model {
        template::Model {
            id: id.to_string(),
            name: "Élégance".to_string(),
            slug: slug.to_string(),
            description: None,
            category: "modern".to_string(),
            price: 49900,
            features: None,
            preview_url: None,
            is_active,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_slug_returns_template() {
        let template = create_test_template("tpl1", "elegance", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[template]])
                .into_connection(),
        );

        let repo = TemplateRepository::new(db);
        let found = repo.find_by_slug("elegance").await.unwrap().unwrap();

        assert_eq!(found.id, "tpl1");
        assert_eq!(found.price, 49900);
    }

    #[tokio::test]
    async fn test_find_active_returns_only_active() {
        let active = create_test_template("tpl1", "elegance", true);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[active]])
                .into_connection(),
        );

        let repo = TemplateRepository::new(db);
        let templates = repo.find_active(None).await.unwrap();

        assert_eq!(templates.len(), 1);
        assert!(templates.iter().all(|t| t.is_active));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_is_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<template::Model>::new()])
                .into_connection(),
        );

        let repo = TemplateRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
