//! services/bot/src/bin/bot.rs

use std::sync::Arc;

use async_openai::{config::OpenAIConfig, Client as OpenAiClient};
use aws_config::{BehaviorVersion, Region};
use bot_lib::{
    adapters::{DynamoUserStore, OpenAiModel, S3ImageStorage, TelegramTransport},
    config::Config,
    error::BotError,
    flows::{ChatResponder, Mediator, OutfitSelector, WardrobeIngestor},
    prompts,
};
use stylist_core::domain::Registration;
use teloxide::net::Download;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), BotError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting bot...");

    // --- 2. Connect AWS Clients ---
    info!("Connecting to DynamoDB and S3...");
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .load()
        .await;
    let user_store = Arc::new(DynamoUserStore::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.dynamo_table_name.clone(),
    ));
    let storage = Arc::new(S3ImageStorage::new(
        aws_sdk_s3::Client::new(&aws_config),
        config.s3_bucket.clone(),
    ));

    // --- 3. Initialize Model Adapters ---
    let openai_config = OpenAIConfig::new().with_api_key(&config.openai_api_key);
    let openai_client = OpenAiClient::with_config(openai_config);
    let chat_model = Arc::new(OpenAiModel::new(
        openai_client.clone(),
        config.chat_model.clone(),
    ));
    let vision_model = Arc::new(OpenAiModel::new(openai_client, config.vision_model.clone()));

    // --- 4. Build the Mediator ---
    let bot = Bot::new(config.telegram_bot_token.clone());
    let transport = Arc::new(TelegramTransport::new(bot.clone()));

    let base_prompt = config
        .base_prompt
        .clone()
        .unwrap_or_else(|| prompts::DEFAULT_BASE_PROMPT.to_string());
    let analysis_prompt = config
        .image_analysis_prompt
        .clone()
        .unwrap_or_else(|| prompts::DEFAULT_IMAGE_ANALYSIS_PROMPT.to_string());

    let responder = ChatResponder::new(chat_model.clone(), base_prompt);
    let selector = OutfitSelector::new(chat_model);
    let ingestor = WardrobeIngestor::new(
        storage.clone(),
        vision_model,
        user_store.clone(),
        analysis_prompt,
    );
    let mediator = Arc::new(Mediator::new(
        user_store,
        storage,
        transport,
        responder,
        selector,
        ingestor,
        config.presign_ttl_secs,
    ));

    // --- 5. Run the Dispatcher ---
    info!("Starting Telegram long polling...");
    let handler = Update::filter_message().endpoint(on_message);
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![mediator])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Maps one inbound Telegram message onto a mediator event. Photos are
/// downloaded here (largest size variant; Telegram photos are JPEG) so the
/// core only ever sees raw bytes.
async fn on_message(bot: Bot, msg: Message, mediator: Arc<Mediator>) -> Result<(), BotError> {
    let user_id = msg.chat.id.0;
    let (first_name, last_name) = msg
        .from()
        .map(|u| (u.first_name.clone(), u.last_name.clone().unwrap_or_default()))
        .unwrap_or_default();

    if let Some(contact) = msg.contact() {
        mediator
            .handle_contact(Registration {
                user_id,
                phone: contact.phone_number.clone(),
                first_name: contact.first_name.clone(),
                last_name: contact.last_name.clone().unwrap_or_default(),
            })
            .await;
    } else if let Some(photos) = msg.photo() {
        if let Some(photo) = photos.last() {
            let file = bot.get_file(photo.file.id.clone()).await?;
            let mut buffer: Vec<u8> = Vec::new();
            bot.download_file(&file.path, &mut buffer).await?;
            mediator.handle_photo(user_id, buffer).await;
        }
    } else if let Some(text) = msg.text() {
        match parse_command(text) {
            Some("/start") => mediator.handle_start(user_id).await,
            Some("/start_survey") => mediator.handle_start_survey(user_id).await,
            _ => {
                mediator
                    .handle_text(user_id, text.trim(), &first_name, &last_name)
                    .await
            }
        }
    }

    Ok(())
}

/// Extracts the leading bot command from a message, dropping the
/// `@BotName` suffix clients append in group chats.
fn parse_command(text: &str) -> Option<&str> {
    let first = text.trim().split_whitespace().next()?;
    if !first.starts_with('/') {
        return None;
    }
    Some(first.split('@').next().unwrap_or(first))
}
