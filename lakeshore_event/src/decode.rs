use snafu::ResultExt;
use tracing::debug;

use crate::error::{EnvelopeSnafu, MessageSnafu, Result};
use crate::types::{ChangeMessage, EnvelopeKind, NotificationEnvelope, RawEnvelope};

/// Decode a notification envelope and, for `Notification` envelopes, the
/// change message it wraps.
///
/// Envelopes of any other kind decode successfully with an empty message.
pub fn decode_envelope(raw: &[u8]) -> Result<NotificationEnvelope> {
    let envelope: RawEnvelope = serde_json::from_slice(raw).context(EnvelopeSnafu {})?;
    let kind = EnvelopeKind::parse(&envelope.kind);

    let message = match kind {
        EnvelopeKind::Notification => {
            let inner = envelope.message.as_deref().unwrap_or_default();
            serde_json::from_str::<ChangeMessage>(inner).context(MessageSnafu {
                message_id: envelope.message_id.clone(),
            })?
        }
        _ => ChangeMessage::default(),
    };

    let envelope = NotificationEnvelope {
        kind,
        message_id: envelope.message_id,
        topic_arn: envelope.topic_arn,
        subject: envelope.subject,
        timestamp: envelope.timestamp,
        subscribe_url: envelope.subscribe_url,
        unsubscribe_url: envelope.unsubscribe_url,
        message,
    };

    log_envelope(&envelope);

    Ok(envelope)
}

fn log_envelope(envelope: &NotificationEnvelope) {
    debug!(
        kind = envelope.kind.as_str(),
        subject = %envelope.subject,
        subscribe_url = %envelope.subscribe_url,
        unsubscribe_url = %envelope.unsubscribe_url,
        "Decoded notification envelope"
    );

    for record in envelope.records() {
        debug!(
            "{} on s3://{}/{} ({} bytes)",
            record.event_name,
            record.bucket_name(),
            record.object_key(),
            record.object_size()
        );
    }
}
