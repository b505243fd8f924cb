use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use clap::{Args, ValueEnum};
use lakeshore_data_lake::ParquetEncoder;
use lakeshore_object_store::{
    AwsConfiguration, AwsObjectStoreFactory, CopyWait, InMemoryObjectStoreFactory,
    LocalFileSystemFactory, ObjectStoreClient, ObjectStoreFactory, UploadPolicy,
};
use lakeshore_pipeline::Pipeline;
use lakeshore_server_http::HttpServer;
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::{InvalidAddressSnafu, InvalidArgumentSnafu, IoSnafu, ObjectStoreSnafu, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    /// Amazon S3 or an S3-compatible service
    Aws,
    /// One directory per bucket under --local-root
    Local,
    /// Process memory, lost on exit
    Memory,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// The address the HTTP server binds to.
    #[arg(long, env = "LAKESHORE_ADDRESS", default_value = "0.0.0.0")]
    address: String,
    /// The port the HTTP server listens on.
    #[arg(long, env = "PORT", default_value_t = 5000)]
    port: u16,
    /// The object store backend.
    #[arg(long, env = "LAKESHORE_STORE", value_enum, default_value_t = StoreBackend::Aws)]
    store: StoreBackend,
    /// The AWS region of the buckets.
    #[arg(long, env = "AWS_REGION", default_value = "us-west-1")]
    region: String,
    /// Endpoint of an S3-compatible service.
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    endpoint: Option<String>,
    /// Allow plain HTTP connections to the endpoint.
    #[arg(long)]
    allow_http: bool,
    /// Root directory of the local backend.
    #[arg(long, env = "LAKESHORE_LOCAL_ROOT")]
    local_root: Option<PathBuf>,
    /// Directory holding the scratch directories of Parquet files being written.
    #[arg(long, env = "LAKESHORE_STAGING_DIR")]
    staging_dir: Option<PathBuf>,
    /// How many times to check that a quarantined copy is visible.
    #[arg(long, default_value_t = 20)]
    copy_wait_attempts: u32,
    /// Delay between two visibility checks, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    copy_wait_interval_ms: u64,
}

impl ServeArgs {
    pub async fn run(self, ct: CancellationToken) -> Result<()> {
        let address = format!("{}:{}", self.address, self.port)
            .parse::<SocketAddr>()
            .context(InvalidAddressSnafu {})?;

        let staging_dir = self.staging_dir.clone().unwrap_or_else(std::env::temp_dir);
        if !staging_dir.is_dir() {
            return InvalidArgumentSnafu {
                name: "staging-dir",
                message: format!("{} is not a directory", staging_dir.display()),
            }
            .fail();
        }

        let (factory, upload_policy) = self.object_store_factory()?;
        let copy_wait = CopyWait::new(
            self.copy_wait_attempts,
            Duration::from_millis(self.copy_wait_interval_ms),
        );

        let store = ObjectStoreClient::new(factory)
            .with_upload_policy(upload_policy)
            .with_copy_wait(copy_wait);
        let pipeline = Pipeline::new(store, ParquetEncoder::new(&staging_dir));

        info!(
            %address,
            store = ?self.store,
            staging_dir = %staging_dir.display(),
            "Starting lakeshore"
        );

        let app = HttpServer::new(pipeline).into_router();

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .context(IoSnafu {})?;

        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            ct.cancelled().await;
        });

        server.await.context(IoSnafu {})?;

        info!("Server stopped");

        Ok(())
    }

    fn object_store_factory(&self) -> Result<(Arc<dyn ObjectStoreFactory>, UploadPolicy)> {
        match self.store {
            StoreBackend::Aws => {
                let config = AwsConfiguration {
                    region: self.region.clone(),
                    endpoint: self.endpoint.clone(),
                    allow_http: self.allow_http,
                };
                Ok((
                    Arc::new(AwsObjectStoreFactory::new(config)),
                    UploadPolicy::attachment(),
                ))
            }
            StoreBackend::Local => {
                let Some(root) = &self.local_root else {
                    return InvalidArgumentSnafu {
                        name: "local-root",
                        message: "required with --store local",
                    }
                    .fail();
                };
                let factory = LocalFileSystemFactory::new(root).context(ObjectStoreSnafu {})?;
                // The local file system cannot keep object attributes.
                Ok((Arc::new(factory), UploadPolicy::plain()))
            }
            StoreBackend::Memory => Ok((
                Arc::new(InMemoryObjectStoreFactory::new()),
                UploadPolicy::attachment(),
            )),
        }
    }
}
