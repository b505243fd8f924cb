use std::{path::Path as LocalPath, sync::Arc, time::Duration};

use bytes::Bytes;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload, path::Path};
use snafu::ResultExt;
use tracing::debug;

use crate::{
    ObjectStoreFactory,
    content_type::sniff_content_type,
    error::{
        CopyNotVisibleSnafu, CopySnafu, DownloadSnafu, HeadSnafu, InvalidKeySnafu, ReadLocalSnafu,
        Result, StoreError, StoreSnafu, UploadSnafu,
    },
};

const DEFAULT_COPY_WAIT_ATTEMPTS: u32 = 20;
const DEFAULT_COPY_WAIT_INTERVAL: Duration = Duration::from_secs(5);

/// Metadata attached to every uploaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Set `Content-Type` from the uploaded bytes.
    pub detect_content_type: bool,
    /// Value of the `Content-Disposition` header, if any.
    pub content_disposition: Option<String>,
}

impl UploadPolicy {
    /// Sniffed content type, served as an attachment.
    pub fn attachment() -> Self {
        Self {
            detect_content_type: true,
            content_disposition: Some("attachment".to_string()),
        }
    }

    /// No object attributes, for stores that cannot persist them.
    pub fn plain() -> Self {
        Self {
            detect_content_type: false,
            content_disposition: None,
        }
    }

    fn attributes(&self, data: &[u8]) -> Attributes {
        let mut attributes = Attributes::new();
        if self.detect_content_type {
            attributes.insert(Attribute::ContentType, sniff_content_type(data).into());
        }
        if let Some(disposition) = &self.content_disposition {
            attributes.insert(Attribute::ContentDisposition, disposition.clone().into());
        }
        attributes
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::attachment()
    }
}

/// How long [`ObjectStoreClient::copy`] waits for the destination to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyWait {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl CopyWait {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }
}

impl Default for CopyWait {
    fn default() -> Self {
        Self::new(DEFAULT_COPY_WAIT_ATTEMPTS, DEFAULT_COPY_WAIT_INTERVAL)
    }
}

/// Download, upload and copy objects addressed by bucket and key.
///
/// Every operation is attempted exactly once.
#[derive(Clone)]
pub struct ObjectStoreClient {
    factory: Arc<dyn ObjectStoreFactory>,
    upload_policy: UploadPolicy,
    copy_wait: CopyWait,
}

impl ObjectStoreClient {
    pub fn new(factory: Arc<dyn ObjectStoreFactory>) -> Self {
        Self {
            factory,
            upload_policy: UploadPolicy::default(),
            copy_wait: CopyWait::default(),
        }
    }

    pub fn with_upload_policy(mut self, upload_policy: UploadPolicy) -> Self {
        self.upload_policy = upload_policy;
        self
    }

    pub fn with_copy_wait(mut self, copy_wait: CopyWait) -> Self {
        self.copy_wait = copy_wait;
        self
    }

    /// Fetch the full content of `s3://bucket/key`.
    pub async fn download(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let store = self.store(bucket).await?;
        let path = parse_key(key)?;

        let data = async { store.get(&path).await?.bytes().await }
            .await
            .context(DownloadSnafu { bucket, key })?;

        debug!(bucket, key, num_bytes = data.len(), "Downloaded object");

        Ok(data)
    }

    /// Write `data` to `s3://bucket/key`, replacing any existing object.
    pub async fn upload(&self, bucket: &str, key: &str, data: Bytes) -> Result<()> {
        let store = self.store(bucket).await?;
        let path = parse_key(key)?;

        let options = PutOptions {
            attributes: self.upload_policy.attributes(&data),
            ..Default::default()
        };
        let num_bytes = data.len();

        store
            .put_opts(&path, PutPayload::from_bytes(data), options)
            .await
            .context(UploadSnafu { bucket, key })?;

        debug!(bucket, key, num_bytes, "Uploaded object");

        Ok(())
    }

    /// Upload the content of a local file to `s3://bucket/key`.
    pub async fn upload_file(&self, bucket: &str, key: &str, file: &LocalPath) -> Result<()> {
        let data = tokio::fs::read(file)
            .await
            .context(ReadLocalSnafu { path: file })?;
        self.upload(bucket, key, data.into()).await
    }

    /// Copy `s3://src_bucket/src_key` to `s3://dst_bucket/dst_key` and wait
    /// until the destination is visible.
    pub async fn copy(
        &self,
        src_bucket: &str,
        src_key: &str,
        dst_bucket: &str,
        dst_key: &str,
    ) -> Result<()> {
        let src_store = self.store(src_bucket).await?;
        let src_path = parse_key(src_key)?;
        let dst_path = parse_key(dst_key)?;

        let copy_context = CopySnafu {
            src_bucket,
            src_key,
            dst_bucket,
            dst_key,
        };

        let dst_store = if src_bucket == dst_bucket {
            src_store
                .copy(&src_path, &dst_path)
                .await
                .context(copy_context)?;
            src_store
        } else {
            // Stores are bound to one bucket, so cross-bucket copies go through memory.
            let dst_store = self.store(dst_bucket).await?;
            let data = async { src_store.get(&src_path).await?.bytes().await }
                .await
                .context(copy_context)?;
            dst_store
                .put(&dst_path, PutPayload::from_bytes(data))
                .await
                .context(copy_context)?;
            dst_store
        };

        self.wait_until_exists(dst_store.as_ref(), dst_bucket, dst_key, &dst_path)
            .await?;

        debug!(src_bucket, src_key, dst_bucket, dst_key, "Copied object");

        Ok(())
    }

    async fn wait_until_exists(
        &self,
        store: &dyn ObjectStore,
        bucket: &str,
        key: &str,
        path: &Path,
    ) -> Result<()> {
        for attempt in 1..=self.copy_wait.max_attempts {
            match store.head(path).await {
                Ok(_) => return Ok(()),
                Err(object_store::Error::NotFound { .. }) => {
                    debug!(bucket, key, attempt, "Copied object not visible yet");
                }
                Err(err) => return Err(err).context(HeadSnafu { bucket, key }),
            }

            if attempt < self.copy_wait.max_attempts {
                tokio::time::sleep(self.copy_wait.interval).await;
            }
        }

        CopyNotVisibleSnafu {
            bucket,
            key,
            attempts: self.copy_wait.max_attempts,
        }
        .fail()
    }

    async fn store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        self.factory
            .create_object_store(bucket)
            .await
            .context(StoreSnafu { bucket })
    }
}

fn parse_key(key: &str) -> Result<Path, StoreError> {
    Path::parse(key).context(InvalidKeySnafu { key })
}
