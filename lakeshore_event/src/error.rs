use lakeshore_observability::ErrorKind;
use snafu::Snafu;

/// Errors produced while decoding a notification.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum DecodeError {
    #[snafu(display("Failed to decode notification envelope"))]
    Envelope { source: serde_json::Error },
    #[snafu(display("Failed to decode message of {message_id} notification"))]
    Message {
        message_id: String,
        source: serde_json::Error,
    },
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
