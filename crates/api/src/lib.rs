//! HTTP API layer for salonkit.
//!
//! - **Endpoints**: checkout, setup workflow, photos, domains, templates,
//!   contact, payments, admin back-office
//! - **Extractors**: bearer-token authentication and role checks
//! - **Middleware**: logging, CORS, rate limiting
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod rate_limit;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
pub use rate_limit::{ApiRateLimiter, RateLimitConfig, RateLimiterState};
