//! Common utilities and shared types for salonkit.
//!
//! This crate provides foundational components used across all salonkit crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Storage**: On-disk photo storage (originals + thumbnails)
//! - **Settings**: Flat-file JSON site settings document
//!
//! # Example
//!
//! ```no_run
//! use salonkit_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod settings;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use settings::{SiteSettings, SettingsStore};
pub use storage::{PhotoStorage, StoredPhoto};
