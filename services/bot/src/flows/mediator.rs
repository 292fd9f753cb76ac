//! services/bot/src/flows/mediator.rs
//!
//! The conversation orchestrator. Routes inbound transport events into the
//! survey machine, the chat responder and the wardrobe pipeline, and
//! sequences the cross-component side effects. Owns no durable state; the
//! per-user survey sessions and awaiting-phone flags live in process-local
//! maps and are lost on restart.
//!
//! Every port failure is caught here and converted into a short apologetic
//! message — nothing propagates out of the public handlers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use stylist_core::domain::{Keyboard, Registration, User};
use stylist_core::ports::{ChatTransport, ImageStorage, PortResult, UserStore};
use stylist_core::survey::{SurveyEffect, SurveyEvent, SurveySession};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::flows::outfit::OutfitSelector;
use crate::flows::responder::ChatResponder;
use crate::flows::wardrobe::WardrobeIngestor;
use crate::messages;

pub struct Mediator {
    users: Arc<dyn UserStore>,
    storage: Arc<dyn ImageStorage>,
    transport: Arc<dyn ChatTransport>,
    responder: ChatResponder,
    selector: OutfitSelector,
    ingestor: WardrobeIngestor,
    /// Active surveys, keyed by user id. Created on `/start_survey`,
    /// removed on completion or cancel.
    sessions: Mutex<HashMap<i64, SurveySession>>,
    /// Users who pressed /start in a web client and still owe us a typed
    /// phone number.
    awaiting_phone: Mutex<HashSet<i64>>,
    presign_ttl_secs: u64,
}

impl Mediator {
    pub fn new(
        users: Arc<dyn UserStore>,
        storage: Arc<dyn ImageStorage>,
        transport: Arc<dyn ChatTransport>,
        responder: ChatResponder,
        selector: OutfitSelector,
        ingestor: WardrobeIngestor,
        presign_ttl_secs: u64,
    ) -> Self {
        Self {
            users,
            storage,
            transport,
            responder,
            selector,
            ingestor,
            sessions: Mutex::new(HashMap::new()),
            awaiting_phone: Mutex::new(HashSet::new()),
            presign_ttl_secs,
        }
    }

    //=====================================================================================
    // Public Event Handlers (infallible — failures become chat messages)
    //=====================================================================================

    /// `/start`: greet and ask for the phone number.
    pub async fn handle_start(&self, user_id: i64) {
        info!("/start from user {user_id}");
        self.awaiting_phone.lock().await.insert(user_id);
        let keyboard = Keyboard::RequestContact {
            label: messages::SHARE_PHONE_BUTTON.to_string(),
        };
        if let Err(e) = self
            .transport
            .send_text(user_id, messages::GREETING, Some(&keyboard))
            .await
        {
            error!("Failed to greet user {user_id}: {e}");
        }
    }

    /// `/start_survey`: open a fresh survey session.
    pub async fn handle_start_survey(&self, user_id: i64) {
        if let Err(e) = self.start_survey_flow(user_id).await {
            error!("Survey start failed for user {user_id}: {e}");
            let _ = self
                .transport
                .send_text(user_id, messages::GENERIC_ERROR, None)
                .await;
        }
    }

    /// A shared-contact message: registration via the contact button.
    pub async fn handle_contact(&self, registration: Registration) {
        let user_id = registration.user_id;
        if let Err(e) = self.contact_flow(&registration).await {
            error!("Contact flow failed for user {user_id}: {e}");
            let _ = self
                .transport
                .send_text(user_id, messages::REGISTRATION_ERROR, None)
                .await;
        }
    }

    /// A plain text message: survey answer, typed phone number, or chat.
    pub async fn handle_text(&self, user_id: i64, text: &str, first_name: &str, last_name: &str) {
        if let Err(e) = self.text_flow(user_id, text, first_name, last_name).await {
            error!("Text flow failed for user {user_id}: {e}");
            let _ = self
                .transport
                .send_text(user_id, messages::GENERIC_ERROR, None)
                .await;
        }
    }

    /// A photo message: routed into the survey's upload loop.
    pub async fn handle_photo(&self, user_id: i64, image: Vec<u8>) {
        let has_session = self.sessions.lock().await.contains_key(&user_id);
        if !has_session {
            debug!("Photo from user {user_id} outside an upload session, ignoring.");
            return;
        }
        if let Err(e) = self
            .survey_step(user_id, SurveyEvent::Photo, Some(image))
            .await
        {
            error!("Photo flow failed for user {user_id}: {e}");
            let _ = self
                .transport
                .send_text(user_id, messages::GENERIC_ERROR, None)
                .await;
        }
    }

    //=====================================================================================
    // Registration
    //=====================================================================================

    async fn contact_flow(&self, registration: &Registration) -> PortResult<()> {
        self.awaiting_phone.lock().await.remove(&registration.user_id);
        self.transport
            .send_text(
                registration.user_id,
                &format!("✅ Ваш номер збережено: {}", registration.phone),
                Some(&Keyboard::Remove),
            )
            .await?;
        self.register(registration).await
    }

    /// Registration is idempotent: an existing record is returned by the
    /// store unmodified, and the user is routed by their survey status.
    async fn register(&self, registration: &Registration) -> PortResult<()> {
        let user_id = registration.user_id;
        match self.users.get_user(user_id).await? {
            Some(user) if user.survey_completed => {
                self.transport
                    .send_text(user_id, messages::ALREADY_REGISTERED, None)
                    .await
            }
            Some(_) => {
                self.transport
                    .send_text(user_id, messages::REGISTERED_NOT_SURVEYED, None)
                    .await?;
                self.transport
                    .send_text(user_id, messages::START_SURVEY_HINT, None)
                    .await
            }
            None => {
                self.users.put_user_if_absent(registration).await?;
                info!("Registered new user {user_id}");
                self.transport
                    .send_text(user_id, messages::REGISTRATION_THANKS, None)
                    .await?;
                self.transport
                    .send_text(user_id, messages::START_SURVEY_HINT, None)
                    .await
            }
        }
    }

    //=====================================================================================
    // Survey
    //=====================================================================================

    async fn start_survey_flow(&self, user_id: i64) -> PortResult<()> {
        // The record must exist before any survey mutation is attempted.
        if self.users.get_user(user_id).await?.is_none() {
            return self
                .transport
                .send_text(user_id, messages::NOT_REGISTERED, None)
                .await;
        }
        let (session, effects) = SurveySession::start();
        self.sessions.lock().await.insert(user_id, session);
        self.apply_effects(user_id, &effects, None).await
    }

    /// Advances the survey machine by one event and executes its effects.
    /// On an effect failure the session is abandoned (no rollback).
    async fn survey_step(
        &self,
        user_id: i64,
        event: SurveyEvent,
        photo: Option<Vec<u8>>,
    ) -> PortResult<()> {
        let Some(mut session) = self.sessions.lock().await.remove(&user_id) else {
            return Ok(());
        };
        let step = session.advance(&event);

        match self.apply_effects(user_id, &step.effects, photo).await {
            Ok(()) => {
                if !step.done {
                    self.sessions.lock().await.insert(user_id, session);
                }
                Ok(())
            }
            Err(e) => {
                error!("Survey effect failed for user {user_id}, abandoning session: {e}");
                self.transport
                    .send_text(user_id, messages::GENERIC_ERROR, None)
                    .await
            }
        }
    }

    async fn apply_effects(
        &self,
        user_id: i64,
        effects: &[SurveyEffect],
        photo: Option<Vec<u8>>,
    ) -> PortResult<()> {
        for effect in effects {
            match effect {
                SurveyEffect::Prompt(kind) => {
                    let (text, keyboard) = messages::render(kind);
                    self.transport
                        .send_text(user_id, &text, keyboard.as_ref())
                        .await?;
                }
                SurveyEffect::SaveProfile(profile) => {
                    self.users.update_survey(user_id, profile).await?;
                    info!("Survey saved for user {user_id}.");
                }
                SurveyEffect::IngestPhoto => {
                    let Some(image) = photo.clone() else { continue };
                    self.transport
                        .send_text(user_id, messages::PHOTO_PROCESSING, None)
                        .await?;
                    // Ingestion failures keep the upload loop alive: the
                    // user stays in PhotoUpload and can retry.
                    match self.ingestor.ingest(user_id, image, "jpg").await {
                        Ok(_) => {
                            self.transport
                                .send_text(user_id, messages::PHOTO_SAVED, None)
                                .await?;
                        }
                        Err(e) => {
                            error!("Photo ingestion failed for user {user_id}: {e}");
                            self.transport
                                .send_text(user_id, messages::ERROR_PHOTO_UPLOAD, None)
                                .await?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    //=====================================================================================
    // Chat
    //=====================================================================================

    async fn text_flow(
        &self,
        user_id: i64,
        text: &str,
        first_name: &str,
        last_name: &str,
    ) -> PortResult<()> {
        let has_session = self.sessions.lock().await.contains_key(&user_id);
        if has_session {
            return self
                .survey_step(user_id, SurveyEvent::Text(text.to_string()), None)
                .await;
        }

        if self.awaiting_phone.lock().await.contains(&user_id) {
            // Web clients can't share a contact; they type the number.
            if !text.chars().any(|c| c.is_ascii_digit()) {
                return self
                    .transport
                    .send_text(user_id, messages::ENTER_PHONE, None)
                    .await;
            }
            self.awaiting_phone.lock().await.remove(&user_id);
            self.transport
                .send_text(
                    user_id,
                    &format!("✅ Ваш номер збережено: {}", text.trim()),
                    Some(&Keyboard::Remove),
                )
                .await?;
            return self
                .register(&Registration {
                    user_id,
                    phone: text.trim().to_string(),
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                })
                .await;
        }

        self.chat(user_id, text).await
    }

    async fn chat(&self, user_id: i64, text: &str) -> PortResult<()> {
        let Some(user) = self.users.get_user(user_id).await? else {
            return self
                .transport
                .send_text(user_id, messages::NOT_REGISTERED, None)
                .await;
        };

        self.transport.send_typing(user_id).await?;

        match self.responder.respond(&user, text).await {
            Ok(reply) => {
                if !reply.text.is_empty() {
                    self.transport.send_text(user_id, &reply.text, None).await?;
                }
                if let Some(style) = reply.outfit_style {
                    self.send_outfit(&user, &style).await?;
                }
                Ok(())
            }
            Err(e) => {
                // Auth, rate-limit and connection failures all collapse into
                // the same fixed apology; none are retried.
                warn!("Model failure for user {user_id}: {e}");
                self.transport
                    .send_text(user_id, messages::AI_ERROR, None)
                    .await
            }
        }
    }

    async fn send_outfit(&self, user: &User, style: &str) -> PortResult<()> {
        let keys = match self.selector.select(&user.wardrobe, style).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Outfit selection failed for user {}: {e}", user.user_id);
                return self
                    .transport
                    .send_text(user.user_id, messages::AI_ERROR, None)
                    .await;
            }
        };

        if keys.is_empty() {
            return self
                .transport
                .send_text(user.user_id, messages::OUTFIT_NOT_FOUND, None)
                .await;
        }

        let mut urls = Vec::with_capacity(keys.len());
        for key in &keys {
            urls.push(self.storage.presigned_url(key, self.presign_ttl_secs).await?);
        }
        self.transport.send_media_group(user.user_id, &urls).await
    }
}
