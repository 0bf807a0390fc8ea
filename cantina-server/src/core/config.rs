//! Server configuration
//!
//! All settings come from environment variables with sensible defaults:
//!
//! | variable | default | meaning |
//! |----------|---------|---------|
//! | WORK_DIR | /var/lib/cantina | work directory (database, logs) |
//! | HTTP_PORT | 3000 | HTTP API port |
//! | ENVIRONMENT | development | development \| staging \| production |
//! | PIX_KEY | — | merchant PIX key (required for charges) |
//! | PIX_MERCHANT_NAME | Cantina | name shown by the payer's bank app |
//! | PIX_MERCHANT_CITY | SAO PAULO | city shown by the payer's bank app |

use crate::pix;
use crate::utils::{AppError, AppResult};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory, holds the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// Running environment: development | staging | production
    pub environment: String,
    /// Merchant PIX key; charges fail with a configuration error
    /// until this is set to something that validates
    pub pix_key: Option<String>,
    /// Merchant display name (payload tag 59)
    pub pix_merchant_name: String,
    /// Merchant city (payload tag 60)
    pub pix_merchant_city: String,
}

/// Validated PIX settings, ready for payload generation
#[derive(Debug, Clone)]
pub struct PixSettings {
    pub key: String,
    pub merchant_name: String,
    pub merchant_city: String,
}

/// EMVCo caps for tag 59 (merchant name) and tag 60 (merchant city)
const MAX_MERCHANT_NAME_LEN: usize = 25;
const MAX_MERCHANT_CITY_LEN: usize = 15;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/cantina".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            pix_key: std::env::var("PIX_KEY").ok().filter(|k| !k.is_empty()),
            pix_merchant_name: std::env::var("PIX_MERCHANT_NAME")
                .unwrap_or_else(|_| "Cantina".into()),
            pix_merchant_city: std::env::var("PIX_MERCHANT_CITY")
                .unwrap_or_else(|_| "SAO PAULO".into()),
        }
    }

    /// Override work dir and port, used by tests and local runs
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// Create the work directory layout if missing
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }

    /// Validated PIX settings.
    ///
    /// The error message deliberately never includes the configured key.
    /// Merchant name and city are bounded here so an overlong env value
    /// cannot produce a payload with a 3-digit TLV length prefix.
    pub fn pix_settings(&self) -> AppResult<PixSettings> {
        let key = self
            .pix_key
            .as_deref()
            .ok_or_else(|| AppError::configuration("PIX key is not configured (set PIX_KEY)"))?;
        if !pix::validate_pix_key(key) {
            return Err(AppError::configuration(
                "configured PIX key failed format validation",
            ));
        }
        let name = self.pix_merchant_name.trim();
        if name.is_empty() || name.len() > MAX_MERCHANT_NAME_LEN {
            return Err(AppError::configuration(format!(
                "PIX_MERCHANT_NAME must be 1 to {MAX_MERCHANT_NAME_LEN} characters"
            )));
        }
        let city = self.pix_merchant_city.trim();
        if city.is_empty() || city.len() > MAX_MERCHANT_CITY_LEN {
            return Err(AppError::configuration(format!(
                "PIX_MERCHANT_CITY must be 1 to {MAX_MERCHANT_CITY_LEN} characters"
            )));
        }
        Ok(PixSettings {
            key: key.to_string(),
            merchant_name: name.to_string(),
            merchant_city: city.to_string(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
