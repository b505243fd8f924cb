use lakeshore_observability::ErrorKind;
use snafu::Snafu;

/// Object content is not a JSON array of rows.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[snafu(display("Invalid row data"))]
pub struct FormatError {
    source: serde_json::Error,
}

impl FormatError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
