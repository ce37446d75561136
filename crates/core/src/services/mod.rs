//! Business logic services.

pub mod contact;
pub mod domain;
pub mod email;
pub mod media;
pub mod order;
pub mod payment;
pub mod photo;
pub mod stats;
pub mod template;
pub mod user;

pub use contact::{ContactService, CreateContactMessageInput, ReplyInput};
pub use domain::{DomainCheck, DomainService};
pub use email::{EmailMessage, EmailService, MailTransport};
pub use media::{MediaProcessor, ProcessedPhoto};
pub use order::{
    AdvanceBusinessInfoInput, AdvanceContentInput, AdvanceDesignInput, AdvanceDomainInput,
    CreateOrderInput, CurrentOrderView, OrderService, progress,
};
pub use payment::{CheckoutSession, PaymentIntent, PaymentService, StripeClient, VerifiedSession};
pub use photo::{BulkPhotoAction, PhotoService, ReorderItem, UpdateAltItem, UploadPhotoInput};
pub use stats::{DashboardStats, MessageStats, StatsService, UserStats, growth};
pub use template::{CreateTemplateInput, TemplateRevenue, TemplateService, UpdateTemplateInput};
pub use user::UserService;
