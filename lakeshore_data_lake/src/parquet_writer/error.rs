use std::path::PathBuf;

use arrow::error::ArrowError;
use lakeshore_observability::ErrorKind;
use parquet::errors::ParquetError;
use snafu::Snafu;

/// Errors produced while encoding rows to Parquet.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EncodeError {
    #[snafu(display("Failed to create scratch directory in {}", staging_root.display()))]
    ScratchDir {
        staging_root: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create {}", path.display()))]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to create parquet writer"))]
    Writer { source: ParquetError },
    #[snafu(display("Failed to build record batch"))]
    Batch { source: ArrowError },
    #[snafu(display("Failed to write rows {offset}.."))]
    Write { offset: usize, source: ParquetError },
    #[snafu(display("Failed to finish parquet file"))]
    Close { source: ParquetError },
}

pub type Result<T, E = EncodeError> = std::result::Result<T, E>;

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ScratchDir { .. } | Self::CreateFile { .. } => ErrorKind::Temporary,
            Self::Writer { .. } | Self::Batch { .. } | Self::Write { .. } | Self::Close { .. } => {
                ErrorKind::Internal
            }
        }
    }
}
