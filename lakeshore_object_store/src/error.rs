use std::path::PathBuf;

use lakeshore_observability::ErrorKind;
use snafu::Snafu;

/// Errors returned by [`crate::ObjectStoreClient`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    #[snafu(display("Failed to create object store for bucket {bucket}"))]
    Store {
        bucket: String,
        source: object_store::Error,
    },
    #[snafu(display("Invalid object key {key}"))]
    InvalidKey {
        key: String,
        source: object_store::path::Error,
    },
    #[snafu(display("Failed to download s3://{bucket}/{key}"))]
    Download {
        bucket: String,
        key: String,
        source: object_store::Error,
    },
    #[snafu(display("Failed to upload s3://{bucket}/{key}"))]
    Upload {
        bucket: String,
        key: String,
        source: object_store::Error,
    },
    #[snafu(display("Failed to read local file {}", path.display()))]
    ReadLocal {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to copy s3://{src_bucket}/{src_key} to s3://{dst_bucket}/{dst_key}"))]
    Copy {
        src_bucket: String,
        src_key: String,
        dst_bucket: String,
        dst_key: String,
        source: object_store::Error,
    },
    #[snafu(display("Failed to check existence of s3://{bucket}/{key}"))]
    Head {
        bucket: String,
        key: String,
        source: object_store::Error,
    },
    #[snafu(display("s3://{bucket}/{key} not visible after {attempts} attempts"))]
    CopyNotVisible {
        bucket: String,
        key: String,
        attempts: u32,
    },
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store { .. } => ErrorKind::Configuration,
            Self::InvalidKey { .. } => ErrorKind::Validation,
            Self::Download { source, .. }
            | Self::Upload { source, .. }
            | Self::Copy { source, .. }
            | Self::Head { source, .. } => object_store_error_kind(source),
            Self::ReadLocal { .. } => ErrorKind::Internal,
            Self::CopyNotVisible { .. } => ErrorKind::Temporary,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// The key is valid in the bucket but cannot be expressed as an object
    /// store path, for example because it contains an empty segment.
    pub fn is_invalid_key(&self) -> bool {
        matches!(self, Self::InvalidKey { .. })
    }
}

fn object_store_error_kind(error: &object_store::Error) -> ErrorKind {
    use object_store::Error;

    match error {
        Error::NotFound { .. } => ErrorKind::NotFound,
        Error::AlreadyExists { .. } | Error::Precondition { .. } => ErrorKind::Conflict,
        Error::InvalidPath { .. } => ErrorKind::Validation,
        Error::NotSupported { .. } | Error::NotImplemented => ErrorKind::Configuration,
        Error::PermissionDenied { .. } | Error::Unauthenticated { .. } => {
            ErrorKind::Configuration
        }
        _ => ErrorKind::Temporary,
    }
}
