//! Core business logic for salonkit.

pub mod services;

pub use services::*;
