//! services/bot/src/flows/outfit.rs
//!
//! The outfit selector: asks the language model to pick one wardrobe item
//! per category matching a requested style, constrained to a JSON-only
//! response listing storage keys.

use std::sync::Arc;

use serde::Deserialize;
use stylist_core::domain::{ChatMessage, ChatRole, WardrobeItem};
use stylist_core::ports::{LanguageModel, PortResult};
use tracing::{info, warn};

use crate::prompts::outfit_instruction;

/// The constrained response shape the model is instructed to emit.
#[derive(Debug, Deserialize)]
struct OutfitResponse {
    outfit: Vec<String>,
}

pub struct OutfitSelector {
    model: Arc<dyn LanguageModel>,
}

impl OutfitSelector {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Returns the storage keys of the selected items. An empty wardrobe
    /// short-circuits without a model call; an unparsable model response
    /// degrades to an empty selection.
    pub async fn select(
        &self,
        wardrobe: &[WardrobeItem],
        style_description: &str,
    ) -> PortResult<Vec<String>> {
        if wardrobe.is_empty() {
            info!("Outfit selection skipped: wardrobe is empty.");
            return Ok(Vec::new());
        }

        let candidates = wardrobe
            .iter()
            .map(|item| format!("- {}: {}", item.storage_key, item.summary))
            .collect::<Vec<_>>()
            .join("\n");

        let instruction = outfit_instruction(&candidates, style_description);
        let raw = self
            .model
            .complete(&[ChatMessage::text(ChatRole::User, instruction)], 0.2)
            .await?;

        Ok(parse_outfit_response(&raw))
    }
}

/// Parses the raw model response. Parse failures are "no outfit found",
/// not errors: the malformed payload is logged for diagnosis and an empty
/// selection returned. The call is not retried.
pub fn parse_outfit_response(raw: &str) -> Vec<String> {
    match serde_json::from_str::<OutfitResponse>(raw.trim()) {
        Ok(response) => response.outfit,
        Err(e) => {
            warn!("Malformed outfit response ({e}): {raw}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::test_support::ScriptedModel;

    fn wardrobe() -> Vec<WardrobeItem> {
        vec![
            WardrobeItem {
                storage_key: "user_1/photo_a.jpg".into(),
                summary: "white cotton shirt".into(),
            },
            WardrobeItem {
                storage_key: "user_1/photo_b.jpg".into(),
                summary: "dark blue jeans".into(),
            },
        ]
    }

    #[test]
    fn parses_the_constrained_shape() {
        let keys = parse_outfit_response(r#"{"outfit": ["a.jpg", "b.jpg"]}"#);
        assert_eq!(keys, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn garbage_degrades_to_empty() {
        assert!(parse_outfit_response("Sure! Here's an outfit: shirt + jeans").is_empty());
        assert!(parse_outfit_response("{\"outfit\": \"not a list\"}").is_empty());
        assert!(parse_outfit_response("").is_empty());
    }

    #[tokio::test]
    async fn empty_wardrobe_short_circuits_without_model_call() {
        let model = Arc::new(ScriptedModel::always("should never be called"));
        let selector = OutfitSelector::new(model.clone());

        let keys = selector.select(&[], "sporty").await.unwrap();

        assert!(keys.is_empty());
        assert_eq!(model.call_count().await, 0);
    }

    #[tokio::test]
    async fn non_json_reply_yields_empty_selection() {
        let model = Arc::new(ScriptedModel::always("I'd suggest the shirt!"));
        let selector = OutfitSelector::new(model);

        let keys = selector.select(&wardrobe(), "casual").await.unwrap();

        assert!(keys.is_empty());
    }

    #[tokio::test]
    async fn instruction_lists_every_candidate_and_the_style() {
        let model = Arc::new(ScriptedModel::always(
            r#"{"outfit": ["user_1/photo_a.jpg"]}"#,
        ));
        let selector = OutfitSelector::new(model.clone());

        let keys = selector.select(&wardrobe(), "smart casual").await.unwrap();
        assert_eq!(keys, vec!["user_1/photo_a.jpg"]);

        let requests = model.requests.lock().await;
        let instruction = requests[0][0].text_content();
        assert!(instruction.contains("user_1/photo_a.jpg"));
        assert!(instruction.contains("dark blue jeans"));
        assert!(instruction.contains("smart casual"));
    }
}
