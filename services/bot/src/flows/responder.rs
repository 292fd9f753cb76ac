//! services/bot/src/flows/responder.rs
//!
//! The chat responder: keeps a rolling per-user conversation history,
//! builds the stylist prompt (system instruction + profile block + history
//! window) and issues one completion per inbound message. The model can
//! flag an outfit request through a marker token; the responder strips the
//! token and extracts the requested style.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use regex::Regex;
use stylist_core::domain::{ChatMessage, ChatRole, User};
use stylist_core::history::RollingHistory;
use stylist_core::ports::{LanguageModel, PortResult};
use tokio::sync::Mutex;
use tracing::info;

use crate::prompts::{DEFAULT_OUTFIT_STYLE, OUTFIT_MARKER};

/// One processed assistant reply: the user-visible text and, when the
/// model flagged an outfit request, the requested style description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub outfit_style: Option<String>,
}

pub struct ChatResponder {
    model: Arc<dyn LanguageModel>,
    base_prompt: String,
    /// Keyed per-user history store; created on first message, dropped with
    /// the process. Two rapid messages from the same user can interleave
    /// here — an accepted race, the lock is not held across the model call.
    histories: Mutex<HashMap<i64, RollingHistory>>,
}

impl ChatResponder {
    pub fn new(model: Arc<dyn LanguageModel>, base_prompt: String) -> Self {
        Self {
            model,
            base_prompt,
            histories: Mutex::new(HashMap::new()),
        }
    }

    /// Produces the next assistant message for one inbound user message.
    pub async fn respond(&self, user: &User, message: &str) -> PortResult<ChatReply> {
        let window: Vec<ChatMessage> = {
            let mut histories = self.histories.lock().await;
            let history = histories.entry(user.user_id).or_default();
            history.push_user(message);
            history.iter().cloned().collect()
        };

        let mut messages = Vec::with_capacity(window.len() + 2);
        messages.push(ChatMessage::text(ChatRole::System, self.base_prompt.clone()));
        messages.push(ChatMessage::text(ChatRole::System, profile_block(user)));
        messages.extend(window);

        let raw_reply = self.model.complete(&messages, 1.0).await?;

        {
            let mut histories = self.histories.lock().await;
            histories
                .entry(user.user_id)
                .or_default()
                .push_assistant(raw_reply.clone());
        }

        let reply = extract_outfit_request(&raw_reply);
        if reply.outfit_style.is_some() {
            info!("Outfit request flagged for user {}.", user.user_id);
        }
        Ok(reply)
    }
}

/// Formats the stored profile attributes as the auxiliary context message.
fn profile_block(user: &User) -> String {
    format!(
        "Профіль користувача:\n\
         Ім'я: {} {}\n\
         Бренди: {}\n\
         Вага: {}\n\
         Стиль: {}\n\
         Стать: {}\n\
         Небажані кольори: {}\n\
         Зріст: {}",
        user.first_name,
        user.last_name,
        user.profile.brands,
        user.profile.weight,
        user.profile.style,
        user.profile.gender,
        user.profile.colors,
        user.profile.height,
    )
}

/// Compiled once; the pattern is a literal and cannot fail to parse.
fn style_regex() -> &'static Regex {
    static STYLE_RE: OnceLock<Regex> = OnceLock::new();
    STYLE_RE.get_or_init(|| Regex::new(r"\[style:\s*([^\]]*)\]").expect("literal pattern"))
}

/// Strips the outfit marker and its optional `[style: ...]` metadata block
/// from a raw model reply. When the marker is present, the extracted (or
/// fallback) style is returned alongside the cleaned text.
pub fn extract_outfit_request(raw: &str) -> ChatReply {
    if !raw.contains(OUTFIT_MARKER) {
        return ChatReply {
            text: raw.trim().to_string(),
            outfit_style: None,
        };
    }

    let style_re = style_regex();
    let style = style_re
        .captures(raw)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_OUTFIT_STYLE.to_string());

    let without_style = style_re.replace_all(raw, "");
    let cleaned = without_style
        .replace(OUTFIT_MARKER, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    ChatReply {
        text: cleaned,
        outfit_style: Some(style),
    }
}
