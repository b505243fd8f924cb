//! Bucket notification decoding.
//!
//! Notifications arrive as a pub/sub envelope whose `Type` field tells what the
//! envelope carries. Only `Notification` envelopes wrap a change message, which
//! is itself a JSON document encoded as a string in the envelope's `Message`
//! field. Decoding is done in two explicit stages: the envelope first, then the
//! inner message when the envelope kind calls for it.

pub mod decode;
pub mod error;
pub mod types;

pub use decode::decode_envelope;
pub use error::{DecodeError, Result};
pub use types::{
    BucketEntity, ChangeMessage, ChangeRecord, EnvelopeKind, NotificationEnvelope, ObjectEntity,
    S3Entity,
};
