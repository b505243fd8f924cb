use std::fmt;

use lakeshore_data_lake::{EncodeError, FormatError};
use lakeshore_object_store::StoreError;
use lakeshore_observability::ErrorKind;
use snafu::Snafu;

/// Processing step of a change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Decode,
    Encode,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Download => "download",
            Self::Decode => "decode",
            Self::Encode => "encode",
            Self::Upload => "upload",
        };
        f.write_str(name)
    }
}

/// Failure to process one change record.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RecordError {
    #[snafu(display("Failed to download s3://{bucket}/{key}"))]
    Download {
        bucket: String,
        key: String,
        source: StoreError,
    },
    #[snafu(display("Failed to decode rows of s3://{bucket}/{key}"))]
    Format {
        bucket: String,
        key: String,
        source: FormatError,
    },
    #[snafu(display("Failed to encode rows of s3://{bucket}/{key}"))]
    Encode {
        bucket: String,
        key: String,
        source: EncodeError,
    },
    #[snafu(display("Failed to upload s3://{bucket}/{processed_key} from {key}"))]
    Upload {
        bucket: String,
        key: String,
        processed_key: String,
        source: StoreError,
    },
}

impl RecordError {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Download { .. } => Stage::Download,
            Self::Format { .. } => Stage::Decode,
            Self::Encode { .. } => Stage::Encode,
            Self::Upload { .. } => Stage::Upload,
        }
    }

    /// Whether the object store cannot address the source or destination key.
    pub fn is_invalid_key(&self) -> bool {
        match self {
            Self::Download { source, .. } | Self::Upload { source, .. } => source.is_invalid_key(),
            Self::Format { .. } | Self::Encode { .. } => false,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Download { source, .. } | Self::Upload { source, .. } => source.kind(),
            Self::Format { source, .. } => source.kind(),
            Self::Encode { source, .. } => source.kind(),
        }
    }
}
