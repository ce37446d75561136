//! Database entities.

pub mod contact_message;
pub mod domain_pricing;
pub mod order;
pub mod photo;
pub mod template;
pub mod user;

pub use contact_message::Entity as ContactMessage;
pub use domain_pricing::Entity as DomainPricing;
pub use order::Entity as Order;
pub use photo::Entity as Photo;
pub use template::Entity as Template;
pub use user::Entity as User;
