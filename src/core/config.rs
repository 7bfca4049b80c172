use std::env;
use std::path::PathBuf;

use crate::errors::BotError;

pub const DEFAULT_MODEL_NAME: &str = "openai/gpt-oss-120b";
pub const DEFAULT_SUMMARY_LANGUAGE: &str = "Russian";
pub const DEFAULT_SESSION_FILE: &str = "postinsight.session";

/// Process-wide settings, read once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_api_id: i32,
    pub telegram_api_hash: String,
    pub telegram_phone: String,
    pub telegram_session_file: PathBuf,
    pub bot_token: String,
    pub cloud_api_key: String,
    pub cloud_api_base_url: String,
    pub cloud_model_name: String,
    pub summary_language: String,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ConfigError`] naming the first missing or malformed variable.
    pub fn from_env() -> Result<Self, BotError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ConfigError`] naming the first missing or malformed variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| BotError::ConfigError(format!("{key} is not set")))
        };

        // The completion endpoint is checked first so the operator sees one combined message.
        let (cloud_api_key, cloud_api_base_url) =
            match (get("CLOUD_API_KEY"), get("CLOUD_API_BASE_URL")) {
                (Some(key), Some(url)) => (key, url),
                _ => {
                    return Err(BotError::ConfigError(
                        "CLOUD_API_KEY or CLOUD_API_BASE_URL for the cloud model is not set"
                            .to_string(),
                    ));
                }
            };

        let api_id_raw = require("API_ID")?;
        let telegram_api_id = api_id_raw.trim().parse::<i32>().map_err(|e| {
            BotError::ConfigError(format!("API_ID must be an integer ({api_id_raw}): {e}"))
        })?;

        Ok(Self {
            telegram_api_id,
            telegram_api_hash: require("API_HASH")?,
            telegram_phone: require("PHONE")?,
            telegram_session_file: get("TELEGRAM_SESSION_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from),
            bot_token: require("BOT_TOKEN")?,
            cloud_api_key,
            cloud_api_base_url,
            cloud_model_name: get("CLOUD_MODEL_NAME")
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
            summary_language: get("SUMMARY_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_SUMMARY_LANGUAGE.to_string()),
        })
    }
}
