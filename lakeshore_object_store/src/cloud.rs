//! S3 object store factory.

use std::sync::Arc;

use dashmap::DashMap;
use object_store::{
    Error as ObjectStoreError, ObjectStore,
    aws::{AmazonS3Builder, AmazonS3ConfigKey},
};
use tracing::debug;

use crate::ObjectStoreFactory;

const DEFAULT_REGION: &str = "us-west-1";
const SERVER_SIDE_ENCRYPTION_KEY: &str = "aws_server_side_encryption";
const SERVER_SIDE_ENCRYPTION: &str = "AES256";

/// Connection settings shared by every bucket.
///
/// Credentials are read from the standard `AWS_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsConfiguration {
    pub region: String,
    /// Endpoint of an S3-compatible service, such as MinIO.
    pub endpoint: Option<String>,
    pub allow_http: bool,
}

impl Default for AwsConfiguration {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
            allow_http: false,
        }
    }
}

/// Factory creating one S3 client per bucket.
///
/// Objects are written with AES256 server-side encryption and inherit the
/// bucket's default (private) access control.
pub struct AwsObjectStoreFactory {
    config: AwsConfiguration,
    stores: DashMap<String, Arc<dyn ObjectStore>>,
}

impl AwsObjectStoreFactory {
    pub fn new(config: AwsConfiguration) -> Self {
        Self {
            config,
            stores: DashMap::new(),
        }
    }

    fn build_store(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        let encryption_key = SERVER_SIDE_ENCRYPTION_KEY.parse::<AmazonS3ConfigKey>()?;

        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(&self.config.region)
            .with_config(encryption_key, SERVER_SIDE_ENCRYPTION)
            .with_allow_http(self.config.allow_http);

        if let Some(endpoint) = &self.config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder.build()?;

        debug!(bucket, region = %self.config.region, "Created S3 object store");

        Ok(Arc::new(store))
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for AwsObjectStoreFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, ObjectStoreError> {
        if let Some(store) = self.stores.get(bucket) {
            return Ok(store.clone());
        }

        let store = self.build_store(bucket)?;
        self.stores.insert(bucket.to_string(), store.clone());

        Ok(store)
    }
}
