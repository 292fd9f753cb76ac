//! crates/stylist_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or transport format.

use serde::{Deserialize, Serialize};

/// Represents a registered user, as stored in the user store.
#[derive(Debug, Clone, Default)]
pub struct User {
    pub user_id: i64,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    /// False until the survey reaches its confirmation-accepted terminal state.
    pub survey_completed: bool,
    pub profile: StyleProfile,
    /// Append-only; insertion order is the only ordering guarantee.
    pub wardrobe: Vec<WardrobeItem>,
}

/// The style-preference survey answers, one field per survey question.
///
/// Height and weight are deliberately free text: the survey stores whatever
/// the user typed, with no numeric validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleProfile {
    pub size: String,
    pub style: String,
    pub colors: String,
    pub brands: String,
    pub height: String,
    pub weight: String,
    pub gender: String,
}

/// One ingested wardrobe photo: its object-storage key plus the
/// model-generated visual summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardrobeItem {
    pub storage_key: String,
    pub summary: String,
}

/// The data collected from a first contact, used to create a user record.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: i64,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
}

/// The role attached to a single chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One piece of message content: plain text or an image reference
/// (an https URL or a base64 data URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    ImageUrl(String),
}

/// A role-tagged message sent to the language model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub parts: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![ContentPart::Text(content.into())],
        }
    }

    /// The concatenated text parts of the message, ignoring image parts.
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.as_str()),
                ContentPart::ImageUrl(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A reply keyboard shown next to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Rows of one-tap answer buttons.
    Reply { rows: Vec<Vec<String>> },
    /// A single button asking the client to share the user's phone number.
    RequestContact { label: String },
    /// Removes any previously shown keyboard.
    Remove,
}

impl Keyboard {
    pub fn reply(rows: &[&[&str]]) -> Self {
        Keyboard::Reply {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|b| b.to_string()).collect())
                .collect(),
        }
    }
}
