//! Template catalog service.

use chrono::Utc;
use salonkit_common::{AppResult, IdGenerator};
use salonkit_db::entities::template;
use salonkit_db::repositories::{OrderRepository, TemplateRepository};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating a template.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(length(max = 256))]
    pub slug: Option<String>,
    #[validate(length(max = 10_000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    /// Price in cents.
    #[validate(range(min = 0))]
    pub price: i64,
    pub features: Option<Vec<String>>,
    #[validate(url)]
    pub preview_url: Option<String>,
}

/// Input for updating a template.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateInput {
    #[validate(length(min = 1, max = 256))]
    pub name: Option<String>,
    #[validate(length(max = 10_000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub price: Option<i64>,
    pub features: Option<Vec<String>>,
    #[validate(url)]
    pub preview_url: Option<String>,
    pub is_active: Option<bool>,
}

/// A template with its accumulated revenue.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRevenue {
    #[serde(flatten)]
    pub template: template::Model,
    /// Sum of completed order totals, in cents.
    pub revenue: i64,
}

/// Service for the template catalog.
#[derive(Clone)]
pub struct TemplateService {
    template_repo: TemplateRepository,
    order_repo: OrderRepository,
    id_gen: IdGenerator,
}

impl TemplateService {
    /// Create a new template service.
    #[must_use]
    pub const fn new(template_repo: TemplateRepository, order_repo: OrderRepository) -> Self {
        Self {
            template_repo,
            order_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Public catalog: active templates, optionally one category.
    pub async fn list_active(&self, category: Option<&str>) -> AppResult<Vec<template::Model>> {
        self.template_repo.find_active(category).await
    }

    /// Fetch one template.
    pub async fn get(&self, id: &str) -> AppResult<template::Model> {
        self.template_repo.get_by_id(id).await
    }

    /// Admin: full catalog including inactive templates, with revenue.
    pub async fn list_with_revenue(&self) -> AppResult<Vec<TemplateRevenue>> {
        let templates = self.template_repo.find_all().await?;

        let mut out = Vec::with_capacity(templates.len());
        for template in templates {
            let revenue = self
                .order_repo
                .sum_completed_revenue_for_template(&template.id)
                .await?;
            out.push(TemplateRevenue { template, revenue });
        }

        Ok(out)
    }

    /// Admin: create a template.
    pub async fn create(&self, input: CreateTemplateInput) -> AppResult<template::Model> {
        input.validate()?;

        let slug = input.slug.unwrap_or_else(|| slugify(&input.name));
        let model = template::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            slug: Set(slug),
            description: Set(input.description),
            category: Set(input.category),
            price: Set(input.price),
            features: Set(input.features.map(|f| serde_json::json!(f))),
            preview_url: Set(input.preview_url),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.template_repo.create(model).await
    }

    /// Admin: update a template.
    pub async fn update(&self, id: &str, input: UpdateTemplateInput) -> AppResult<template::Model> {
        input.validate()?;

        let template = self.template_repo.get_by_id(id).await?;
        let mut active: template::ActiveModel = template.into();

        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = input.category {
            active.category = Set(category);
        }
        if let Some(price) = input.price {
            active.price = Set(price);
        }
        if let Some(features) = input.features {
            active.features = Set(Some(serde_json::json!(features)));
        }
        if let Some(preview_url) = input.preview_url {
            active.preview_url = Set(Some(preview_url));
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(Utc::now().into()));

        self.template_repo.update(active).await
    }

    /// Admin: delete a template.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.template_repo.get_by_id(id).await?;
        self.template_repo.delete(id).await
    }
}

/// Lowercase, hyphen-separated slug from a display name.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Élégance Moderne"), "l-gance-moderne");
        assert_eq!(slugify("Studio 54"), "studio-54");
        assert_eq!(slugify("  Classic  "), "classic");
    }

    #[test]
    fn test_create_input_rejects_negative_price() {
        let input = CreateTemplateInput {
            name: "Classic".to_string(),
            slug: None,
            description: None,
            category: "classic".to_string(),
            price: -1,
            features: None,
            preview_url: None,
        };

        assert!(input.validate().is_err());
    }
}
