use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use bytes::Bytes;
use futures::TryStreamExt;
use lakeshore_data_lake::{FixedClock, ParquetEncoder};
use lakeshore_object_store::{
    CopyWait, InMemoryObjectStoreFactory, ObjectStoreClient, ObjectStoreFactory,
};
use lakeshore_pipeline::Pipeline;
use object_store::{ObjectStore, path::Path};
use serde_json::json;
use tempfile::TempDir;

pub const BUCKET: &str = "deglon";
pub const NOW: i64 = 1_586_207_144_149;

/// In-memory buckets that count how often a store is requested.
#[derive(Default)]
pub struct CountingFactory {
    pub inner: InMemoryObjectStoreFactory,
    pub requests: AtomicUsize,
}

impl CountingFactory {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub async fn put(&self, key: &str, data: &'static [u8]) {
        self.inner
            .bucket(BUCKET)
            .put(&Path::from(key), Bytes::from_static(data).into())
            .await
            .expect("put");
    }

    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let store = self.inner.bucket(BUCKET);
        match store.get(&Path::from(key)).await {
            Ok(result) => Some(result.bytes().await.expect("bytes")),
            Err(object_store::Error::NotFound { .. }) => None,
            Err(err) => panic!("get {key}: {err}"),
        }
    }

    pub async fn keys(&self) -> Vec<String> {
        let store = self.inner.bucket(BUCKET);
        let objects: Vec<_> = store.list(None).try_collect().await.expect("list");
        let mut keys: Vec<String> = objects.iter().map(|m| m.location.to_string()).collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl ObjectStoreFactory for CountingFactory {
    async fn create_object_store(
        &self,
        bucket: &str,
    ) -> Result<Arc<dyn ObjectStore>, object_store::Error> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.inner.create_object_store(bucket).await
    }
}

pub struct TestPipeline {
    pub pipeline: Pipeline,
    pub factory: Arc<CountingFactory>,
    pub staging: TempDir,
}

pub fn create_pipeline() -> TestPipeline {
    let staging = TempDir::new().expect("staging dir");
    create_pipeline_with_encoder(ParquetEncoder::new(staging.path()), staging)
}

pub fn create_pipeline_with_encoder(encoder: ParquetEncoder, staging: TempDir) -> TestPipeline {
    let factory = Arc::new(CountingFactory::default());
    let store = ObjectStoreClient::new(factory.clone())
        .with_copy_wait(CopyWait::new(2, Duration::from_millis(1)));
    let pipeline = Pipeline::new(store, encoder).with_clock(Arc::new(FixedClock(NOW)));

    TestPipeline {
        pipeline,
        factory,
        staging,
    }
}

pub fn record(event_name: &str, key: &str) -> serde_json::Value {
    json!({
        "eventVersion": "2.1",
        "eventSource": "aws:s3",
        "awsRegion": "us-west-1",
        "eventTime": "2020-04-06T21:05:44.149Z",
        "eventName": event_name,
        "s3": {
            "s3SchemaVersion": "1.0",
            "bucket": { "name": BUCKET, "arn": format!("arn:aws:s3:::{BUCKET}") },
            "object": { "key": key, "size": 15, "sequencer": "005E8B99AA4CE3A3D2" }
        }
    })
}

pub fn notification(records: Vec<serde_json::Value>) -> Vec<u8> {
    let message = json!({ "Records": records }).to_string();
    json!({
        "Type": "Notification",
        "MessageId": "22b80b92-fdea-4c2c-8f9d-bdfb0c7bf324",
        "TopicArn": "arn:aws:sns:us-west-1:123456789012:bucket-events",
        "Subject": "Amazon S3 Notification",
        "Message": message,
    })
    .to_string()
    .into_bytes()
}
