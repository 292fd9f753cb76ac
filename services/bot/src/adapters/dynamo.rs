//! services/bot/src/adapters/dynamo.rs
//!
//! This module contains the user-store adapter, which is the concrete
//! implementation of the `UserStore` port from the `core` crate. It handles
//! all interactions with the DynamoDB table holding user records.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use stylist_core::domain::{Registration, StyleProfile, User, WardrobeItem};
use stylist_core::ports::{PortError, PortResult, UserStore};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A DynamoDB adapter that implements the `UserStore` port.
///
/// The partition key is the chat identity, stored as a string attribute
/// `user_id`. Wardrobe items live in a list attribute `wardrobe` of maps
/// `{s3_key, summary}`.
#[derive(Clone)]
pub struct DynamoUserStore {
    client: Client,
    table_name: String,
}

impl DynamoUserStore {
    /// Creates a new `DynamoUserStore`.
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

//=========================================================================================
// "Impure" Record Mapping
//=========================================================================================

fn string_attr(item: &HashMap<String, AttributeValue>, name: &str) -> String {
    item.get(name)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .unwrap_or_default()
}

fn item_to_user(item: &HashMap<String, AttributeValue>) -> PortResult<User> {
    let user_id = string_attr(item, "user_id")
        .parse::<i64>()
        .map_err(|_| PortError::Persistence("user_id attribute is not numeric".to_string()))?;

    let survey_completed = item
        .get("survey_completed")
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false);

    let wardrobe = item
        .get("wardrobe")
        .and_then(|v| v.as_l().ok())
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_m().ok())
                .map(|entry| WardrobeItem {
                    storage_key: string_attr(entry, "s3_key"),
                    summary: string_attr(entry, "summary"),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(User {
        user_id,
        phone: string_attr(item, "phone"),
        first_name: string_attr(item, "first_name"),
        last_name: string_attr(item, "last_name"),
        survey_completed,
        profile: StyleProfile {
            size: string_attr(item, "size"),
            style: string_attr(item, "style"),
            colors: string_attr(item, "colors"),
            brands: string_attr(item, "brands"),
            height: string_attr(item, "height"),
            weight: string_attr(item, "weight"),
            gender: string_attr(item, "gender"),
        },
        wardrobe,
    })
}

//=========================================================================================
// `UserStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserStore for DynamoUserStore {
    async fn get_user(&self, user_id: i64) -> PortResult<Option<User>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        match output.item() {
            Some(item) => Ok(Some(item_to_user(item)?)),
            None => Ok(None),
        }
    }

    async fn put_user_if_absent(&self, registration: &Registration) -> PortResult<User> {
        // Idempotent registration: an existing record wins, unmodified.
        if let Some(existing) = self.get_user(registration.user_id).await? {
            info!("User {} already exists.", registration.user_id);
            return Ok(existing);
        }

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(
                "user_id",
                AttributeValue::S(registration.user_id.to_string()),
            )
            .item("phone", AttributeValue::S(registration.phone.clone()))
            .item(
                "first_name",
                AttributeValue::S(registration.first_name.clone()),
            )
            .item(
                "last_name",
                AttributeValue::S(registration.last_name.clone()),
            )
            .item("survey_completed", AttributeValue::Bool(false))
            .send()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        info!("New user {} saved to {}.", registration.user_id, self.table_name);

        Ok(User {
            user_id: registration.user_id,
            phone: registration.phone.clone(),
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            survey_completed: false,
            profile: StyleProfile::default(),
            wardrobe: Vec::new(),
        })
    }

    async fn update_survey(&self, user_id: i64, profile: &StyleProfile) -> PortResult<()> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .update_expression(
                "SET #sz = :sz, #sty = :sty, #colors = :cls, #brands = :br, \
                 #gender = :g, #ht = :h, #wt = :w, survey_completed = :sc",
            )
            .expression_attribute_names("#sz", "size")
            .expression_attribute_names("#sty", "style")
            .expression_attribute_names("#colors", "colors")
            .expression_attribute_names("#brands", "brands")
            .expression_attribute_names("#gender", "gender")
            .expression_attribute_names("#ht", "height")
            .expression_attribute_names("#wt", "weight")
            .expression_attribute_values(":sz", AttributeValue::S(profile.size.clone()))
            .expression_attribute_values(":sty", AttributeValue::S(profile.style.clone()))
            .expression_attribute_values(":cls", AttributeValue::S(profile.colors.clone()))
            .expression_attribute_values(":br", AttributeValue::S(profile.brands.clone()))
            .expression_attribute_values(":g", AttributeValue::S(profile.gender.clone()))
            .expression_attribute_values(":h", AttributeValue::S(profile.height.clone()))
            .expression_attribute_values(":w", AttributeValue::S(profile.weight.clone()))
            .expression_attribute_values(":sc", AttributeValue::Bool(true))
            .send()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        info!("Survey updated for user {} in {}.", user_id, self.table_name);
        Ok(())
    }

    async fn append_wardrobe_item(&self, user_id: i64, item: &WardrobeItem) -> PortResult<()> {
        let entry = HashMap::from([
            (
                "s3_key".to_string(),
                AttributeValue::S(item.storage_key.clone()),
            ),
            (
                "summary".to_string(),
                AttributeValue::S(item.summary.clone()),
            ),
        ]);

        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(user_id.to_string()))
            .update_expression(
                "SET wardrobe = list_append(if_not_exists(wardrobe, :empty_list), :new_item)",
            )
            .expression_attribute_values(":new_item", AttributeValue::L(vec![AttributeValue::M(entry)]))
            .expression_attribute_values(":empty_list", AttributeValue::L(Vec::new()))
            .send()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        info!(
            "Wardrobe updated for user {}. Added item: {}",
            user_id, item.storage_key
        );
        Ok(())
    }
}
