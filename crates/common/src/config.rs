//! Application configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Upload storage configuration.
    pub uploads: UploadsConfig,
    /// Stripe configuration.
    pub stripe: StripeConfig,
    /// SMTP configuration (optional; email features disabled when absent).
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public URL of this instance.
    pub url: String,
    /// Site name used in emails and settings defaults.
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Root directory for uploaded photos and thumbnails.
    #[serde(default = "default_uploads_root")]
    pub root: PathBuf,
    /// Base URL under which uploads are served.
    #[serde(default = "default_uploads_url")]
    pub base_url: String,
    /// Path of the flat-file site settings document.
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
}

/// Stripe configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeConfig {
    /// Secret API key (`sk_...`).
    pub secret_key: String,
    /// ISO currency code for charges.
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// SMTP configuration for outbound email.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host.
    pub host: String,
    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Username.
    #[serde(default)]
    pub username: Option<String>,
    /// Password.
    #[serde(default)]
    pub password: Option<String>,
    /// From address for outbound mail.
    pub from_address: String,
    /// From display name.
    #[serde(default = "default_site_name")]
    pub from_name: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_site_name() -> String {
    "Salonkit".to_string()
}

const fn default_max_connections() -> u32 {
    100
}

const fn default_min_connections() -> u32 {
    5
}

fn default_uploads_root() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_uploads_url() -> String {
    "/uploads".to_string()
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("./data/settings.json")
}

fn default_currency() -> String {
    "eur".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `SALONKIT_ENV`)
    /// 3. Environment variables with `SALONKIT` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("SALONKIT_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("SALONKIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("SALONKIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
