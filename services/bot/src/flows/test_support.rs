//! services/bot/src/flows/test_support.rs
//!
//! Hand-rolled in-memory implementations of the core ports, shared by the
//! flow tests.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use stylist_core::domain::{ChatMessage, Keyboard, Registration, StyleProfile, User, WardrobeItem};
use stylist_core::ports::{
    ChatTransport, ImageStorage, LanguageModel, PortError, PortResult, UserStore,
};
use tokio::sync::Mutex;

//=========================================================================================
// Language Model
//=========================================================================================

/// A scripted model: records every request and replays queued replies.
pub struct ScriptedModel {
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
    replies: Mutex<VecDeque<String>>,
    default_reply: Option<String>,
    fail: bool,
}

impl ScriptedModel {
    /// Replies with the same text to every request.
    pub fn always(reply: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            default_reply: Some(reply.to_string()),
            fail: false,
        }
    }

    /// Replays the given replies in order, then falls back to "ok".
    pub fn sequence(replies: Vec<String>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(replies.into()),
            default_reply: Some("ok".to_string()),
            fail: false,
        }
    }

    /// Fails every request with a connection error.
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            default_reply: None,
            fail: true,
        }
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, messages: &[ChatMessage], _temperature: f32) -> PortResult<String> {
        self.requests.lock().await.push(messages.to_vec());
        if self.fail {
            return Err(PortError::Connection("scripted failure".to_string()));
        }
        if let Some(reply) = self.replies.lock().await.pop_front() {
            return Ok(reply);
        }
        self.default_reply
            .clone()
            .ok_or_else(|| PortError::Unexpected("no scripted reply left".to_string()))
    }
}

//=========================================================================================
// User Store
//=========================================================================================

#[derive(Default)]
pub struct MemoryUserStore {
    pub users: Mutex<HashMap<i64, User>>,
}

impl MemoryUserStore {
    pub async fn user_of(&self, user_id: i64) -> User {
        self.users.lock().await.get(&user_id).cloned().unwrap()
    }

    pub async fn wardrobe_of(&self, user_id: i64) -> Vec<WardrobeItem> {
        self.users
            .lock()
            .await
            .get(&user_id)
            .map(|u| u.wardrobe.clone())
            .unwrap_or_default()
    }

    pub async fn add_wardrobe_item(&self, user_id: i64, key: &str, summary: &str) {
        let mut users = self.users.lock().await;
        if let Some(user) = users.get_mut(&user_id) {
            user.wardrobe.push(WardrobeItem {
                storage_key: key.to_string(),
                summary: summary.to_string(),
            });
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user(&self, user_id: i64) -> PortResult<Option<User>> {
        Ok(self.users.lock().await.get(&user_id).cloned())
    }

    async fn put_user_if_absent(&self, registration: &Registration) -> PortResult<User> {
        let mut users = self.users.lock().await;
        if let Some(existing) = users.get(&registration.user_id) {
            return Ok(existing.clone());
        }
        let user = User {
            user_id: registration.user_id,
            phone: registration.phone.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            survey_completed: false,
            profile: StyleProfile::default(),
            wardrobe: Vec::new(),
        };
        users.insert(registration.user_id, user.clone());
        Ok(user)
    }

    async fn update_survey(&self, user_id: i64, profile: &StyleProfile) -> PortResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("user {user_id}")))?;
        user.profile = profile.clone();
        user.survey_completed = true;
        Ok(())
    }

    async fn append_wardrobe_item(&self, user_id: i64, item: &WardrobeItem) -> PortResult<()> {
        let mut users = self.users.lock().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("user {user_id}")))?;
        user.wardrobe.push(item.clone());
        Ok(())
    }
}

//=========================================================================================
// Image Storage
//=========================================================================================

#[derive(Default)]
pub struct MemoryStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl ImageStorage for MemoryStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, _content_type: &str) -> PortResult<()> {
        self.objects.lock().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn presigned_url(&self, key: &str, _ttl_secs: u64) -> PortResult<String> {
        Ok(format!("https://storage.example/{key}?signed"))
    }
}

//=========================================================================================
// Chat Transport
//=========================================================================================

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(i64, String, Option<Keyboard>)>>,
    pub sent_media: Mutex<Vec<(i64, Vec<String>)>>,
    pub typing: Mutex<Vec<i64>>,
}

impl RecordingTransport {
    /// Just the outbound texts, in send order.
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(_, text, _)| text.clone())
            .collect()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_text(
        &self,
        user_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> PortResult<()> {
        self.sent
            .lock()
            .await
            .push((user_id, text.to_string(), keyboard.cloned()));
        Ok(())
    }

    async fn send_media_group(&self, user_id: i64, photo_urls: &[String]) -> PortResult<()> {
        self.sent_media
            .lock()
            .await
            .push((user_id, photo_urls.to_vec()));
        Ok(())
    }

    async fn send_typing(&self, user_id: i64) -> PortResult<()> {
        self.typing.lock().await.push(user_id);
        Ok(())
    }
}
