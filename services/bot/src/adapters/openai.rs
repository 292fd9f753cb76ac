//! services/bot/src/adapters/openai.rs
//!
//! This module contains the adapter for the OpenAI chat-completion API.
//! It implements the `LanguageModel` port from the `core` crate, covering
//! both plain chat and vision requests (image parts become image URLs).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, ImageUrlArgs,
    },
    Client,
};
use async_trait::async_trait;
use stylist_core::domain::{ChatMessage, ChatRole, ContentPart};
use stylist_core::ports::{LanguageModel, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `LanguageModel` using an OpenAI-compatible API.
#[derive(Clone)]
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiModel {
    /// Creates a new `OpenAiModel`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `LanguageModel` Trait Implementation
//=========================================================================================

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, messages: &[ChatMessage], temperature: f32) -> PortResult<String> {
        let mut request_messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(messages.len());
        for message in messages {
            request_messages.push(to_request_message(message)?);
        }

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(request_messages)
            .temperature(temperature)
            .build()
            .map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        // Extract the text content from the first choice in the response.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Chat completion returned no text content.".to_string())
            })
    }
}

//=========================================================================================
// Mapping Helpers
//=========================================================================================

fn to_request_message(message: &ChatMessage) -> PortResult<ChatCompletionRequestMessage> {
    match message.role {
        ChatRole::System => Ok(ChatCompletionRequestSystemMessageArgs::default()
            .content(message.text_content())
            .build()
            .map_err(map_openai_error)?
            .into()),
        ChatRole::Assistant => Ok(ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.text_content())
            .build()
            .map_err(map_openai_error)?
            .into()),
        ChatRole::User => {
            let has_image = message
                .parts
                .iter()
                .any(|p| matches!(p, ContentPart::ImageUrl(_)));
            if !has_image {
                return Ok(ChatCompletionRequestUserMessageArgs::default()
                    .content(message.text_content())
                    .build()
                    .map_err(map_openai_error)?
                    .into());
            }

            let mut parts: Vec<ChatCompletionRequestUserMessageContentPart> =
                Vec::with_capacity(message.parts.len());
            for part in &message.parts {
                match part {
                    ContentPart::Text(text) => parts.push(
                        ChatCompletionRequestMessageContentPartTextArgs::default()
                            .text(text.clone())
                            .build()
                            .map_err(map_openai_error)?
                            .into(),
                    ),
                    ContentPart::ImageUrl(url) => parts.push(
                        ChatCompletionRequestMessageContentPartImageArgs::default()
                            .image_url(
                                ImageUrlArgs::default()
                                    .url(url.clone())
                                    .build()
                                    .map_err(map_openai_error)?,
                            )
                            .build()
                            .map_err(map_openai_error)?
                            .into(),
                    ),
                }
            }
            Ok(ChatCompletionRequestUserMessageArgs::default()
                .content(parts)
                .build()
                .map_err(map_openai_error)?
                .into())
        }
    }
}

/// Maps API failures onto the port taxonomy: transport problems become
/// `Connection`, credential problems `Auth`, quota problems `RateLimit`.
fn map_openai_error(error: OpenAIError) -> PortError {
    match error {
        OpenAIError::Reqwest(e) => PortError::Connection(e.to_string()),
        OpenAIError::ApiError(api) => {
            let kind = api.r#type.clone().unwrap_or_default();
            if kind.contains("auth") || api.message.contains("API key") {
                PortError::Auth(api.message)
            } else if kind.contains("rate_limit") || kind.contains("insufficient_quota") {
                PortError::RateLimit(api.message)
            } else {
                PortError::Unexpected(api.message)
            }
        }
        other => PortError::Unexpected(other.to_string()),
    }
}
