//! services/bot/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    pub aws_region: String,
    pub dynamo_table_name: String,
    pub s3_bucket: String,
    pub log_level: Level,
    pub chat_model: String,
    pub vision_model: String,
    /// Overrides the built-in stylist system prompt when set.
    pub base_prompt: Option<String>,
    /// Overrides the built-in wardrobe-photo analysis prompt when set.
    pub image_analysis_prompt: Option<String>,
    /// Lifetime of presigned photo URLs sent in outfit media groups.
    pub presign_ttl_secs: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Required Secrets and Resource Names ---
        let telegram_bot_token = require_var("TELEGRAM_BOT_TOKEN")?;
        let openai_api_key = require_var("OPENAI_API_KEY")?;
        let dynamo_table_name = require_var("DYNAMO_TABLE_NAME")?;
        let s3_bucket = require_var("S3_BUCKET")?;

        let aws_region = std::env::var("AWS_REGION").unwrap_or_else(|_| "eu-central-1".to_string());

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Model Settings ---
        let chat_model = std::env::var("CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let vision_model = std::env::var("VISION_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());

        // --- Prompt Overrides ---
        let base_prompt = std::env::var("BASE_PROMPT").ok();
        let image_analysis_prompt = std::env::var("PROMPT_IMAGE_ANALYSIS").ok();

        let presign_ttl_secs = match std::env::var("PRESIGN_TTL_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue(
                    "PRESIGN_TTL_SECS".to_string(),
                    format!("'{}' is not a number of seconds", raw),
                )
            })?,
            Err(_) => 3600,
        };

        Ok(Self {
            telegram_bot_token,
            openai_api_key,
            aws_region,
            dynamo_table_name,
            s3_bucket,
            log_level,
            chat_model,
            vision_model,
            base_prompt,
            image_analysis_prompt,
            presign_ttl_secs,
        })
    }
}

fn require_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
}
