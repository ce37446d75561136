//! Contact inbox service.

use chrono::Utc;
use salonkit_common::{AppError, AppResult, IdGenerator};
use salonkit_db::entities::contact_message;
use salonkit_db::repositories::ContactMessageRepository;
use salonkit_db::types::MessageStatus;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::services::email::EmailService;

/// An inbound message from the public contact form.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactMessageInput {
    #[validate(length(min = 1, max = 256))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 256))]
    pub subject: Option<String>,
    #[validate(length(min = 1, max = 10_000))]
    pub message: String,
}

/// An admin reply to a contact message.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplyInput {
    #[validate(length(min = 1, max = 10_000))]
    pub body: String,
}

/// Service for the contact inbox.
#[derive(Clone)]
pub struct ContactService {
    contact_repo: ContactMessageRepository,
    email: Option<EmailService>,
    id_gen: IdGenerator,
}

impl ContactService {
    /// Create a new contact service. Replies require an email service.
    #[must_use]
    pub const fn new(contact_repo: ContactMessageRepository, email: Option<EmailService>) -> Self {
        Self {
            contact_repo,
            email,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record an inbound message.
    pub async fn create(
        &self,
        input: CreateContactMessageInput,
    ) -> AppResult<contact_message::Model> {
        input.validate()?;

        let model = contact_message::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            subject: Set(input.subject),
            message: Set(input.message),
            status: Set(MessageStatus::Unread.as_str().to_string()),
            replied_at: Set(None),
            created_at: Set(Utc::now().into()),
        };

        self.contact_repo.create(model).await
    }

    /// Admin: list messages.
    pub async fn list(
        &self,
        status: Option<MessageStatus>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<contact_message::Model>> {
        self.contact_repo
            .find_page(status.map(MessageStatus::as_str), limit, offset)
            .await
    }

    /// Admin: fetch a message.
    pub async fn get(&self, id: &str) -> AppResult<contact_message::Model> {
        self.contact_repo.get_by_id(id).await
    }

    /// Admin: reply by email. The message is stamped replied only after the
    /// email goes out.
    pub async fn reply(&self, id: &str, input: ReplyInput) -> AppResult<contact_message::Model> {
        input.validate()?;

        let message = self.contact_repo.get_by_id(id).await?;
        let email = self
            .email
            .as_ref()
            .ok_or_else(|| AppError::Email("Email delivery is not configured".to_string()))?;

        email
            .send_contact_reply(&message.email, message.subject.as_deref(), &input.body)
            .await?;

        let mut active: contact_message::ActiveModel = message.into();
        active.status = Set(MessageStatus::Replied.as_str().to_string());
        active.replied_at = Set(Some(Utc::now().into()));

        self.contact_repo.update(active).await
    }

    /// Admin: set a message's status (read / archived / unread).
    pub async fn update_status(
        &self,
        id: &str,
        status: MessageStatus,
    ) -> AppResult<contact_message::Model> {
        let message = self.contact_repo.get_by_id(id).await?;

        let mut active: contact_message::ActiveModel = message.into();
        active.status = Set(status.as_str().to_string());

        self.contact_repo.update(active).await
    }

    /// Admin: delete a message.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.contact_repo.get_by_id(id).await?;
        self.contact_repo.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_input_rejects_empty_message() {
        let input = CreateContactMessageInput {
            name: "Claire Martin".to_string(),
            email: "claire@example.fr".to_string(),
            phone: None,
            subject: None,
            message: String::new(),
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_input_rejects_bad_email() {
        let input = CreateContactMessageInput {
            name: "Claire Martin".to_string(),
            email: "nope".to_string(),
            phone: None,
            subject: None,
            message: "Bonjour".to_string(),
        };

        assert!(input.validate().is_err());
    }
}
