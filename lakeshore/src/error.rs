use std::net::AddrParseError;

use lakeshore_observability::ErrorKind;
use snafu::Snafu;

/// CLI error types.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CliError {
    #[snafu(display("Invalid {name} argument: {message}"))]
    InvalidArgument { name: &'static str, message: String },
    #[snafu(display("Invalid listen address"))]
    InvalidAddress { source: AddrParseError },
    #[snafu(display("Object store error"))]
    ObjectStore { source: object_store::Error },
    #[snafu(display("IO error"))]
    Io { source: std::io::Error },
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

impl CliError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } | Self::InvalidAddress { .. } => {
                ErrorKind::Configuration
            }
            Self::ObjectStore { .. } => ErrorKind::Configuration,
            Self::Io { .. } => ErrorKind::Temporary,
        }
    }
}
