//! Object store access for the notification pipeline.
//!
//! Every store operation is addressed by a `(bucket, key)` pair. The
//! [`ObjectStoreFactory`] trait resolves a bucket name to an `ObjectStore`
//! client, and [`ObjectStoreClient`] implements download, upload and
//! copy-until-visible on top of it.
//!
//! Implementations of the factory exist for S3 ([`AwsObjectStoreFactory`]),
//! the local file system ([`LocalFileSystemFactory`],
//! [`TemporaryFileSystemFactory`]) and memory ([`InMemoryObjectStoreFactory`]).

pub mod client;
pub mod cloud;
pub mod content_type;
pub mod error;
pub mod local;
pub mod paths;

use std::sync::Arc;

use object_store::ObjectStore;

pub use client::{CopyWait, ObjectStoreClient, UploadPolicy};
pub use cloud::{AwsConfiguration, AwsObjectStoreFactory};
pub use content_type::sniff_content_type;
pub use error::{Result, StoreError};
pub use local::{InMemoryObjectStoreFactory, LocalFileSystemFactory, TemporaryFileSystemFactory};

/// Factory trait for creating ObjectStore instances bound to a bucket.
#[async_trait::async_trait]
pub trait ObjectStoreFactory: Send + Sync {
    /// Create an ObjectStore instance for the bucket with the given name.
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, object_store::Error>;
}
