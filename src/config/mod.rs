//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file in
//! development) through the `config` and `dotenvy` crates. Variables use the
//! `SHIFT_PLANNER` prefix and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use shift_planner::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod email;
mod error;
mod notification;
mod server;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use notification::{NotificationConfig, NotificationMode};
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    pub database: DatabaseConfig,

    #[serde(default)]
    pub notification: NotificationConfig,

    /// Resend settings; without them notifications are only logged
    #[serde(default)]
    pub email: Option<EmailConfig>,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// - `SHIFT_PLANNER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SHIFT_PLANNER__DATABASE__URL=...` -> `database.url = ...`
    /// - `SHIFT_PLANNER__NOTIFICATION__MODE=deferred`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SHIFT_PLANNER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Semantic validation of every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        if let Some(email) = &self.email {
            email.validate()?;
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
