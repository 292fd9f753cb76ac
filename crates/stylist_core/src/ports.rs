//! crates/stylist_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;

use crate::domain::{ChatMessage, Keyboard, Registration, StyleProfile, User, WardrobeItem};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database,
/// object storage, language-model API).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Upstream authentication failed: {0}")]
    Auth(String),
    #[error("Upstream rate limit exceeded: {0}")]
    RateLimit(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The structured user database (one record per chat identity).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: i64) -> PortResult<Option<User>>;

    /// Idempotent registration: if a record already exists for the id, the
    /// existing record is returned unmodified.
    async fn put_user_if_absent(&self, registration: &Registration) -> PortResult<User>;

    /// Persists the survey answers and flips `survey_completed` to true.
    async fn update_survey(&self, user_id: i64, profile: &StyleProfile) -> PortResult<()>;

    /// Atomic append to the user's wardrobe list, creating the list if absent.
    async fn append_wardrobe_item(&self, user_id: i64, item: &WardrobeItem) -> PortResult<()>;
}

/// Object storage for wardrobe photos. Keys are opaque strings namespaced
/// `user_{id}/photo_{uuid}.{ext}`.
#[async_trait]
pub trait ImageStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> PortResult<()>;

    /// Returns a temporary download URL for a stored object.
    async fn presigned_url(&self, key: &str, ttl_secs: u64) -> PortResult<String>;
}

/// A generative language model. Messages are an ordered sequence of
/// role-tagged content (text or image reference).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> PortResult<String>;
}

/// The outbound side of the chat transport. Inbound events are routed into
/// the mediator by the transport binary; the core only ever sends.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_text(
        &self,
        user_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> PortResult<()>;

    /// Sends a group of photos, one per URL.
    async fn send_media_group(&self, user_id: i64, photo_urls: &[String]) -> PortResult<()>;

    async fn send_typing(&self, user_id: i64) -> PortResult<()>;
}
