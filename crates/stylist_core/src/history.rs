//! crates/stylist_core/src/history.rs
//!
//! A bounded, rolling window of recent chat turns, used as language-model
//! context. Capped at ten entries (five user/assistant exchanges); the
//! oldest entry is evicted first.

use std::collections::VecDeque;

use crate::domain::{ChatMessage, ChatRole};

/// Default window size: 5 user turns + 5 assistant turns.
pub const DEFAULT_HISTORY_CAP: usize = 10;

#[derive(Debug, Clone)]
pub struct RollingHistory {
    turns: VecDeque<ChatMessage>,
    cap: usize,
}

impl Default for RollingHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

impl RollingHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::text(ChatRole::User, content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::text(ChatRole::Assistant, content));
    }

    pub fn push(&mut self, turn: ChatMessage) {
        if self.turns.len() == self.cap {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Oldest-first iteration over the window.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.turns.iter()
    }
}
