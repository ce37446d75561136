//! User account service.

use chrono::Utc;
use salonkit_common::{AppError, AppResult, IdGenerator};
use salonkit_db::entities::user;
use salonkit_db::repositories::UserRepository;
use salonkit_db::types::UserRole;
use sea_orm::Set;
use tracing::info;

/// Service for accounts and bearer-token authentication.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Resolve a bearer token to its account.
    pub async fn authenticate(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Fetch an account.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Find the account behind an email, or create a client account with a
    /// fresh access token. Used when checkout provisions the customer.
    pub async fn get_or_create(&self, email: &str, name: &str) -> AppResult<user::Model> {
        if let Some(existing) = self.user_repo.find_by_email(email).await? {
            return Ok(existing);
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(email.to_string()),
            name: Set(name.to_string()),
            role: Set(UserRole::Client.as_str().to_string()),
            phone: Set(None),
            token: Set(Some(self.id_gen.generate_token())),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.user_repo.create(model).await?;
        info!(user_id = %created.id, "provisioned client account");
        Ok(created)
    }

    /// Admin: list accounts.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<Vec<user::Model>> {
        self.user_repo.find_page(limit, offset).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            name: "Marie Dupont".to_string(),
            role: "client".to_string(),
            phone: None,
            token: Some("tok".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token_is_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate("bogus").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_get_or_create_returns_existing_account() {
        let existing = test_user("user1", "marie@salon-lumiere.fr");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let user = service
            .get_or_create("marie@salon-lumiere.fr", "Marie Dupont")
            .await
            .unwrap();

        assert_eq!(user.id, "user1");
    }
}
