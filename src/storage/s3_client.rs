// S3 client backed by rust-s3

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use s3::creds::Credentials;
use s3::region::Region;
use s3::Bucket;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::ObjectStore;
use crate::config::StorageConfig;
use crate::types::StorageError;

pub struct S3Store {
    bucket: Box<Bucket>,
}

impl S3Store {
    /// Open a handle on the configured bucket.
    ///
    /// Credentials come from the standard AWS environment chain (env vars,
    /// profile, then instance/container metadata). No request is sent here.
    pub fn connect(config: &StorageConfig) -> Result<Self> {
        let credentials = Credentials::default()?;
        Self::with_credentials(config, credentials)
    }

    pub fn with_credentials(config: &StorageConfig, credentials: Credentials) -> Result<Self> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config.region.parse()?,
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "Opened S3 bucket handle"
        );
        Ok(Self { bucket })
    }
}

fn check_status(key: &str, status: u16) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        status => Err(StorageError::Status {
            key: key.to_string(),
            status,
        }),
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, key: &str, content: Bytes) -> Result<(), StorageError> {
        let response = self.bucket.put_object(key, &content).await?;
        check_status(key, response.status_code())?;
        debug!(key, size = content.len(), "Stored object");
        Ok(())
    }

    async fn download_to_file(&self, key: &str, file: &mut File) -> Result<u64, StorageError> {
        let status = self.bucket.get_object_to_writer(key, file).await?;
        check_status(key, status)?;
        file.flush().await?;

        let written = file.metadata().await?.len();
        debug!(key, size = written, "Fetched object");
        Ok(written)
    }
}
