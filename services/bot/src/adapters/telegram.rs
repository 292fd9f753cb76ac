//! services/bot/src/adapters/telegram.rs
//!
//! This module contains the outbound Telegram adapter, implementing the
//! `ChatTransport` port from the `core` crate. Inbound updates are routed
//! by the dispatcher in the binary; the core only ever sends through here.

use async_trait::async_trait;
use stylist_core::domain::Keyboard;
use stylist_core::ports::{ChatTransport, PortError, PortResult};
use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, ChatAction, InputFile, InputMedia, InputMediaPhoto, KeyboardButton,
    KeyboardMarkup, ReplyMarkup,
};
use url::Url;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A Telegram adapter that implements the `ChatTransport` port.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Creates a new `TelegramTransport`.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn to_reply_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Reply { rows } => {
            let buttons = rows.iter().map(|row| {
                row.iter()
                    .map(|label| KeyboardButton::new(label.clone()))
                    .collect::<Vec<_>>()
            });
            ReplyMarkup::Keyboard(
                KeyboardMarkup::new(buttons)
                    .resize_keyboard(true)
                    .one_time_keyboard(true),
            )
        }
        Keyboard::RequestContact { label } => {
            let button = KeyboardButton::new(label.clone()).request(ButtonRequest::Contact);
            ReplyMarkup::Keyboard(
                KeyboardMarkup::new(vec![vec![button]])
                    .resize_keyboard(true)
                    .one_time_keyboard(true),
            )
        }
        Keyboard::Remove => ReplyMarkup::kb_remove(),
    }
}

//=========================================================================================
// `ChatTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_text(
        &self,
        user_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> PortResult<()> {
        let mut request = self.bot.send_message(ChatId(user_id), text);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(to_reply_markup(keyboard));
        }
        request
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn send_media_group(&self, user_id: i64, photo_urls: &[String]) -> PortResult<()> {
        let mut media = Vec::with_capacity(photo_urls.len());
        for photo_url in photo_urls {
            let parsed = Url::parse(photo_url)
                .map_err(|e| PortError::Unexpected(format!("bad media URL: {e}")))?;
            media.push(InputMedia::Photo(InputMediaPhoto::new(InputFile::url(
                parsed,
            ))));
        }
        self.bot
            .send_media_group(ChatId(user_id), media)
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;
        Ok(())
    }

    async fn send_typing(&self, user_id: i64) -> PortResult<()> {
        self.bot
            .send_chat_action(ChatId(user_id), ChatAction::Typing)
            .await
            .map_err(|e| PortError::Connection(e.to_string()))?;
        Ok(())
    }
}
