//! services/bot/src/flows/wardrobe.rs
//!
//! The wardrobe ingestion pipeline: upload the photo to object storage,
//! obtain a visual summary from the vision model, append the structured
//! entry to the user's wardrobe. Three side effects, no rollback — a
//! failed description step leaves an orphaned stored file, which is
//! accepted (object storage is not garbage-collected here).

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use stylist_core::domain::{ChatMessage, ChatRole, ContentPart, WardrobeItem};
use stylist_core::ports::{ImageStorage, LanguageModel, PortResult, UserStore};
use tracing::info;
use uuid::Uuid;

pub struct WardrobeIngestor {
    storage: Arc<dyn ImageStorage>,
    model: Arc<dyn LanguageModel>,
    users: Arc<dyn UserStore>,
    analysis_prompt: String,
}

impl WardrobeIngestor {
    pub fn new(
        storage: Arc<dyn ImageStorage>,
        model: Arc<dyn LanguageModel>,
        users: Arc<dyn UserStore>,
        analysis_prompt: String,
    ) -> Self {
        Self {
            storage,
            model,
            users,
            analysis_prompt,
        }
    }

    /// Ingests one uploaded photo for a user, returning the stored item.
    pub async fn ingest(
        &self,
        user_id: i64,
        image: Vec<u8>,
        extension: &str,
    ) -> PortResult<WardrobeItem> {
        let storage_key = format!("user_{user_id}/photo_{}.{extension}", Uuid::new_v4());
        let content_type = format!("image/{extension}");

        self.storage
            .put(&storage_key, image.clone(), &content_type)
            .await?;

        let data_url = format!("data:{content_type};base64,{}", BASE64.encode(&image));
        let message = ChatMessage {
            role: ChatRole::User,
            parts: vec![
                ContentPart::Text(self.analysis_prompt.clone()),
                ContentPart::ImageUrl(data_url),
            ],
        };
        let summary = self.model.complete(&[message], 0.3).await?;

        let item = WardrobeItem {
            storage_key,
            summary,
        };
        self.users.append_wardrobe_item(user_id, &item).await?;

        info!(
            "Ingested wardrobe photo for user {}: {}",
            user_id, item.storage_key
        );
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::test_support::{MemoryStorage, MemoryUserStore, ScriptedModel};
    use stylist_core::domain::Registration;

    async fn registered_store() -> Arc<MemoryUserStore> {
        let users = Arc::new(MemoryUserStore::default());
        users
            .put_user_if_absent(&Registration {
                user_id: 42,
                phone: "0971234567".into(),
                first_name: "Іван".into(),
                last_name: "".into(),
            })
            .await
            .unwrap();
        users
    }

    #[tokio::test]
    async fn success_stores_object_and_appends_one_entry() {
        let storage = Arc::new(MemoryStorage::default());
        let model = Arc::new(ScriptedModel::always("a white cotton shirt"));
        let users = registered_store().await;
        let ingestor =
            WardrobeIngestor::new(storage.clone(), model, users.clone(), "describe".into());

        let item = ingestor.ingest(42, vec![1, 2, 3], "jpg").await.unwrap();

        assert!(item.storage_key.starts_with("user_42/photo_"));
        assert!(item.storage_key.ends_with(".jpg"));
        assert_eq!(item.summary, "a white cotton shirt");

        let objects = storage.objects.lock().await;
        assert_eq!(objects.len(), 1);
        assert!(objects.contains_key(&item.storage_key));

        let wardrobe = users.wardrobe_of(42).await;
        assert_eq!(wardrobe.len(), 1);
        assert_eq!(wardrobe[0], item);
    }

    #[tokio::test]
    async fn description_failure_leaves_wardrobe_unchanged() {
        let storage = Arc::new(MemoryStorage::default());
        let model = Arc::new(ScriptedModel::failing());
        let users = registered_store().await;
        let ingestor =
            WardrobeIngestor::new(storage.clone(), model, users.clone(), "describe".into());

        let result = ingestor.ingest(42, vec![1, 2, 3], "jpg").await;

        assert!(result.is_err());
        assert!(users.wardrobe_of(42).await.is_empty());
        // The orphaned upload is accepted, not rolled back.
        assert_eq!(storage.objects.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn vision_request_carries_the_image_as_data_url() {
        let storage = Arc::new(MemoryStorage::default());
        let model = Arc::new(ScriptedModel::always("summary"));
        let users = registered_store().await;
        let ingestor =
            WardrobeIngestor::new(storage, model.clone(), users, "describe this".into());

        ingestor.ingest(42, vec![0xFF, 0xD8], "jpg").await.unwrap();

        let requests = model.requests.lock().await;
        let parts = &requests[0][0].parts;
        assert!(matches!(&parts[0], ContentPart::Text(t) if t == "describe this"));
        assert!(
            matches!(&parts[1], ContentPart::ImageUrl(u) if u.starts_with("data:image/jpg;base64,"))
        );
    }
}
