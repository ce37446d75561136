//! Repository layer wrapping database access.

pub mod contact_message;
pub mod domain_pricing;
pub mod order;
pub mod photo;
pub mod template;
pub mod user;

pub use contact_message::ContactMessageRepository;
pub use domain_pricing::DomainPricingRepository;
pub use order::OrderRepository;
pub use photo::PhotoRepository;
pub use template::TemplateRepository;
pub use user::UserRepository;
