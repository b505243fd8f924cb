use serde::{Deserialize, Deserializer};

/// Event name prefix of every object deletion event.
const OBJECT_REMOVED_PREFIX: &str = "ObjectRemoved";

/// What a notification envelope carries, keyed by its `Type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeKind {
    /// A change message is wrapped in the envelope.
    Notification,
    /// The topic asks the endpoint to confirm its subscription.
    SubscriptionConfirmation,
    UnsubscribeConfirmation,
    Other(String),
}

impl EnvelopeKind {
    pub fn parse(kind: &str) -> Self {
        match kind {
            "Notification" => Self::Notification,
            "SubscriptionConfirmation" => Self::SubscriptionConfirmation,
            "UnsubscribeConfirmation" => Self::UnsubscribeConfirmation,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Notification => "Notification",
            Self::SubscriptionConfirmation => "SubscriptionConfirmation",
            Self::UnsubscribeConfirmation => "UnsubscribeConfirmation",
            Self::Other(other) => other,
        }
    }
}

/// A decoded notification envelope.
///
/// `message` is empty unless `kind` is [`EnvelopeKind::Notification`].
#[derive(Debug, Clone)]
pub struct NotificationEnvelope {
    pub kind: EnvelopeKind,
    pub message_id: String,
    pub topic_arn: String,
    pub subject: String,
    pub timestamp: String,
    pub subscribe_url: String,
    pub unsubscribe_url: String,
    pub message: ChangeMessage,
}

impl NotificationEnvelope {
    pub fn records(&self) -> &[ChangeRecord] {
        &self.message.records
    }
}

/// The envelope as it appears on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub(crate) struct RawEnvelope {
    #[serde(rename = "Type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub topic_arn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub subject: String,
    pub message: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: String,
    #[serde(rename = "SubscribeURL", deserialize_with = "null_as_default")]
    pub subscribe_url: String,
    #[serde(rename = "UnsubscribeURL", deserialize_with = "null_as_default")]
    pub unsubscribe_url: String,
}

/// The list of object changes wrapped in a notification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChangeMessage {
    #[serde(rename = "Records", deserialize_with = "null_as_default")]
    pub records: Vec<ChangeRecord>,
}

/// One object mutation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(deserialize_with = "null_as_default")]
    pub event_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub event_source: String,
    #[serde(deserialize_with = "null_as_default")]
    pub aws_region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub event_time: String,
    /// For example `ObjectCreated:Put` or `ObjectRemoved:Delete`.
    #[serde(deserialize_with = "null_as_default")]
    pub event_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct S3Entity {
    #[serde(deserialize_with = "null_as_default")]
    pub s3_schema_version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub configuration_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub bucket: BucketEntity,
    #[serde(deserialize_with = "null_as_default")]
    pub object: ObjectEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BucketEntity {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectEntity {
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub e_tag: String,
    /// Orders events for the same key within a bucket.
    #[serde(deserialize_with = "null_as_default")]
    pub sequencer: String,
}

/// Read a JSON `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ChangeRecord {
    pub fn bucket_name(&self) -> &str {
        &self.s3.bucket.name
    }

    pub fn object_key(&self) -> &str {
        &self.s3.object.key
    }

    pub fn object_size(&self) -> i64 {
        self.s3.object.size
    }

    /// Whether this record describes an object deletion.
    pub fn is_removal(&self) -> bool {
        self.event_name.starts_with(OBJECT_REMOVED_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_kind_parse() {
        assert_eq!(EnvelopeKind::parse("Notification"), EnvelopeKind::Notification);
        assert_eq!(
            EnvelopeKind::parse("SubscriptionConfirmation"),
            EnvelopeKind::SubscriptionConfirmation
        );
        assert_eq!(
            EnvelopeKind::parse("notification"),
            EnvelopeKind::Other("notification".to_string())
        );
        assert_eq!(EnvelopeKind::parse("").as_str(), "");
    }

    #[test]
    fn test_is_removal() {
        let mut record = ChangeRecord {
            event_name: "ObjectRemoved:Delete".to_string(),
            ..Default::default()
        };
        assert!(record.is_removal());

        record.event_name = "ObjectRemoved:DeleteMarkerCreated".to_string();
        assert!(record.is_removal());

        record.event_name = "ObjectCreated:Put".to_string();
        assert!(!record.is_removal());
    }
}
