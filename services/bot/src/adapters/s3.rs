//! services/bot/src/adapters/s3.rs
//!
//! This module contains the object-storage adapter, which implements the
//! `ImageStorage` port from the `core` crate on top of S3.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use stylist_core::ports::{ImageStorage, PortError, PortResult};
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An S3 adapter that implements the `ImageStorage` port.
#[derive(Clone)]
pub struct S3ImageStorage {
    client: Client,
    bucket: String,
}

impl S3ImageStorage {
    /// Creates a new `S3ImageStorage`.
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

//=========================================================================================
// `ImageStorage` Trait Implementation
//=========================================================================================

#[async_trait]
impl ImageStorage for S3ImageStorage {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> PortResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        info!("Uploaded photo to s3://{}/{}", self.bucket, key);
        Ok(())
    }

    async fn presigned_url(&self, key: &str, ttl_secs: u64) -> PortResult<String> {
        let config = PresigningConfig::expires_in(Duration::from_secs(ttl_secs))
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| PortError::Persistence(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}
