//! services/bot/src/error.rs
//!
//! Defines the primary error type for the entire bot service.

use crate::config::ConfigError;

/// The primary error type for the `bot` service: configuration loading in
/// `main` plus the Telegram API calls made while routing inbound updates.
/// Port failures never reach this type; the mediator converts them into
/// chat messages at its public-handler boundary.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error from the Telegram API client.
    #[error("Telegram Error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// Represents a failure while downloading a file from Telegram.
    #[error("Telegram download error: {0}")]
    Download(#[from] teloxide::DownloadError),
}
