//! Configuration, built from environment variables.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default interval between inbox poll cycles.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Address the ingress endpoint binds to.
    pub bind_addr: String,
    /// Seconds between inbox poll cycles.
    pub poll_interval_secs: u64,
    /// Time zone meeting bounds are localized to for display.
    pub meeting_timezone: chrono_tz::Tz,
    /// Path to the token artifact produced by the one-time auth bootstrap.
    pub token_path: PathBuf,
    /// API key for the language-model collaborator.
    pub gemini_api_key: SecretString,
    /// Model name for classification calls.
    pub gemini_model: String,
    /// Line-delimited allow-list file, consulted when `EMAIL_WHITELIST` is unset.
    pub whitelist_path: PathBuf,
}

impl AgentConfig {
    /// Build config from environment variables.
    ///
    /// Only `GEMINI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());

        let poll_interval_secs: u64 = std::env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let tz_name =
            std::env::var("MEETING_TIMEZONE").unwrap_or_else(|_| "Asia/Kolkata".to_string());
        let meeting_timezone: chrono_tz::Tz =
            tz_name.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MEETING_TIMEZONE".into(),
                message: format!("unknown time zone '{tz_name}'"),
            })?;

        let token_path = std::env::var("GOOGLE_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("token.json"));

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("GEMINI_API_KEY".into()))?;

        let gemini_model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".to_string());

        let whitelist_path = std::env::var("WHITELIST_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("allowed_senders.txt"));

        Ok(Self {
            bind_addr,
            poll_interval_secs,
            meeting_timezone,
            token_path,
            gemini_api_key,
            gemini_model,
            whitelist_path,
        })
    }
}
