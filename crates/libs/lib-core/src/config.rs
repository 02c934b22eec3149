//! # Service Configuration
//!
//! Read once from the environment at startup (after `.env` is loaded) and
//! validated before the server binds:
//!
//! | Variable               | Default              | Rule             |
//! |------------------------|----------------------|------------------|
//! | `DATABASE_URL`         | `sqlite:data/crm.db` |                  |
//! | `JWT_SECRET`           | required             | at least 32 chars |
//! | `JWT_EXPIRATION_HOURS` | `24`                 | 1..=720          |
//!
//! Handlers receive a clone through router state; [`core_config()`] is only
//! for code that runs outside a request.

use lib_utils::envs::Error as EnvError;
use lib_utils::{get_env, get_env_or, get_env_parse};
use std::sync::OnceLock;

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Shared secret for bearer token signing and verification.
    ///
    /// **Must be at least 32 characters long.**
    pub jwt_secret: String,

    /// Bearer token validity period in hours (1-720).
    pub jwt_expiration_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/crm.db");

        let jwt_secret = get_env("JWT_SECRET").map_err(|e| e.to_string())?;

        let jwt_expiration_hours = match get_env_parse::<i64>("JWT_EXPIRATION_HOURS") {
            Ok(hours) => hours,
            Err(EnvError::MissingEnv(_)) => 24,
            Err(e) => return Err(e.to_string()),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 characters long".to_string());
        }

        if !(1..=720).contains(&self.jwt_expiration_hours) {
            return Err("JWT_EXPIRATION_HOURS must be between 1 and 720 (30 days)".to_string());
        }

        Ok(())
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load, validate and install the process-wide configuration.
///
/// # Errors
///
/// Missing or malformed variables, failed validation, or a second call.
pub fn init_config() -> Result<&'static Config, String> {
    let config = Config::from_env()?;
    config.validate()?;

    CONFIG
        .set(config)
        .map_err(|_| "Config has already been initialized".to_string())?;

    core_config().ok_or_else(|| "Config was not stored".to_string())
}

/// The installed configuration, `None` before [`init_config()`].
pub fn core_config() -> Option<&'static Config> {
    CONFIG.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, hours: i64) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: secret.to_string(),
            jwt_expiration_hours: hours,
        }
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        assert!(config("short", 24).validate().is_err());
    }

    #[test]
    fn test_validate_expiration_bounds() {
        let secret = "0123456789abcdef0123456789abcdef";
        assert!(config(secret, 1).validate().is_ok());
        assert!(config(secret, 720).validate().is_ok());
        assert!(config(secret, 0).validate().is_err());
        assert!(config(secret, 721).validate().is_err());
    }

    #[test]
    fn test_core_config_absent_before_init() {
        assert!(core_config().is_none());
    }
}
