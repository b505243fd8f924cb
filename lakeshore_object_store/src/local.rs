//! Local file system and in-memory object store factories.
//!
//! `LocalFileSystemFactory` maps every bucket to a subdirectory of its root
//! path, so `s3://my-bucket/data/test.json` lives at
//! `<root>/my-bucket/data/test.json`.
//!
//! `TemporaryFileSystemFactory` does the same inside a temporary directory that
//! is removed when the factory is dropped, and `InMemoryObjectStoreFactory`
//! keeps one `InMemory` store per bucket. Both are meant for development and
//! tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use object_store::{Error as ObjectStoreError, ObjectStore, local::LocalFileSystem, memory::InMemory};
use tempfile::TempDir;

use crate::ObjectStoreFactory;

/// Factory for object stores backed by directories of the local file system.
pub struct LocalFileSystemFactory {
    root_path: PathBuf,
}

impl LocalFileSystemFactory {
    pub fn new(root_path: impl AsRef<Path>) -> Result<Self, ObjectStoreError> {
        let canonical_path =
            std::fs::canonicalize(root_path.as_ref()).map_err(|e| ObjectStoreError::Generic {
                store: "LocalFileSystem",
                source: Box::new(e),
            })?;

        Ok(Self {
            root_path: canonical_path,
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for LocalFileSystemFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(ObjectStoreError::Generic {
                store: "LocalFileSystem",
                source: format!("invalid bucket name: {bucket:?}").into(),
            });
        }

        let store_path = self.root_path.join(bucket);

        std::fs::create_dir_all(&store_path).map_err(|e| ObjectStoreError::Generic {
            store: "LocalFileSystem",
            source: Box::new(e),
        })?;

        let local_fs = LocalFileSystem::new_with_prefix(store_path)?;

        Ok(Arc::new(local_fs))
    }
}

/// Factory for local file system object stores in a temporary directory.
pub struct TemporaryFileSystemFactory {
    _temp_dir: TempDir,
    local_factory: LocalFileSystemFactory,
}

impl TemporaryFileSystemFactory {
    pub fn new() -> Result<Self, ObjectStoreError> {
        let temp_dir = TempDir::new().map_err(|e| ObjectStoreError::Generic {
            store: "TemporaryFileSystem",
            source: Box::new(e),
        })?;

        let local_factory = LocalFileSystemFactory::new(temp_dir.path())?;

        Ok(Self {
            _temp_dir: temp_dir,
            local_factory,
        })
    }

    pub fn root_path(&self) -> &Path {
        self.local_factory.root_path()
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for TemporaryFileSystemFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        self.local_factory.create_object_store(bucket).await
    }
}

/// Factory handing out one in-memory store per bucket.
///
/// Stores live as long as the factory, so objects written through one client
/// are visible to every other client sharing the factory.
#[derive(Default)]
pub struct InMemoryObjectStoreFactory {
    buckets: DashMap<String, Arc<InMemory>>,
}

impl InMemoryObjectStoreFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The store backing `bucket`, created empty on first use.
    pub fn bucket(&self, bucket: &str) -> Arc<InMemory> {
        self.buckets
            .entry(bucket.to_string())
            .or_insert_with(|| Arc::new(InMemory::new()))
            .clone()
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for InMemoryObjectStoreFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        Ok(self.bucket(bucket))
    }
}
