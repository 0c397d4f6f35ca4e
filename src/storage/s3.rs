use async_trait::async_trait;

use super::{ObjectStore, StorageError};

/// S3-backed object store.
#[derive(Clone, Debug)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a store from ambient AWS configuration and the configured bucket.
    pub async fn from_env() -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = aws_sdk_s3::Client::new(&aws_config);
        Self::new(client, crate::config::config().storage.bucket.clone())
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    #[tracing::instrument(skip(self, content))]
    async fn put(
        &self,
        key: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let body = aws_sdk_s3::primitives::ByteStream::from(content.to_vec());
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let resp = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        if let Err(e) = resp {
            if e.as_service_error().map(|e| e.is_not_found()) == Some(true) {
                return Ok(false);
            }
            return Err(StorageError::Backend(e.to_string()));
        }

        Ok(true)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(())
    }
}
