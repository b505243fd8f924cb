use std::sync::Arc;

use lakeshore_data_lake::{Clock, DataSet, ParquetEncoder, SystemClock, transform};
use lakeshore_event::{
    ChangeMessage, ChangeRecord, DecodeError, EnvelopeKind, NotificationEnvelope, decode_envelope,
};
use lakeshore_object_store::{
    ObjectStoreClient, StoreError,
    paths::{error_key, file_name, processed_key},
};
use snafu::ResultExt;
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::error::{DownloadSnafu, EncodeSnafu, FormatSnafu, RecordError, UploadSnafu};

/// Terminal state of one change record.
#[derive(Debug)]
pub enum RecordOutcome {
    /// The Parquet artifact was uploaded.
    Done {
        bucket: String,
        key: String,
        processed_key: String,
        num_rows: usize,
    },
    /// The record describes a deletion and was ignored.
    Skipped { bucket: String, key: String },
    /// Processing failed and the original object was copied to `error_key`.
    ///
    /// `quarantine_error` is set when the copy failed as well.
    Quarantined {
        bucket: String,
        key: String,
        error_key: String,
        error: RecordError,
        quarantine_error: Option<StoreError>,
    },
}

impl RecordOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn is_quarantined(&self) -> bool {
        matches!(self, Self::Quarantined { .. })
    }
}

/// Outcome of every record of one notification, in notification order.
#[derive(Debug)]
pub struct NotificationReport {
    pub kind: EnvelopeKind,
    pub outcomes: Vec<RecordOutcome>,
}

impl NotificationReport {
    pub fn done(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_done()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn quarantined(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_quarantined()).count()
    }
}

struct Published {
    processed_key: String,
    num_rows: usize,
}

/// Turns bucket notifications into Parquet artifacts.
#[derive(Clone)]
pub struct Pipeline {
    store: ObjectStoreClient,
    encoder: ParquetEncoder,
    clock: Arc<dyn Clock>,
}

impl Pipeline {
    pub fn new(store: ObjectStoreClient, encoder: ParquetEncoder) -> Self {
        Self {
            store,
            encoder,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Decode a raw notification and process its records.
    ///
    /// Only a notification that cannot be decoded is an error. Record failures
    /// are reported in the returned [`NotificationReport`].
    pub async fn handle_notification(&self, raw: &[u8]) -> Result<NotificationReport, DecodeError> {
        let envelope = decode_envelope(raw)?;
        log_envelope_kind(&envelope);

        let outcomes = self.process_message(&envelope.message).await;
        let report = NotificationReport {
            kind: envelope.kind,
            outcomes,
        };

        if !report.outcomes.is_empty() {
            info!(
                message_id = %envelope.message_id,
                done = report.done(),
                skipped = report.skipped(),
                quarantined = report.quarantined(),
                "Notification processed"
            );
        }

        Ok(report)
    }

    /// Process every record of `message` sequentially.
    pub async fn process_message(&self, message: &ChangeMessage) -> Vec<RecordOutcome> {
        let mut outcomes = Vec::with_capacity(message.records.len());
        for record in &message.records {
            outcomes.push(self.process_record(record).await);
        }
        outcomes
    }

    /// Process one record, quarantining the source object on failure.
    pub async fn process_record(&self, record: &ChangeRecord) -> RecordOutcome {
        let bucket = record.bucket_name();
        let key = record.object_key();

        if record.is_removal() {
            debug!(bucket, key, event_name = %record.event_name, "Skipping removed object");
            return RecordOutcome::Skipped {
                bucket: bucket.to_string(),
                key: key.to_string(),
            };
        }

        let span = info_span!("record", bucket, key);
        async move {
            match self.publish(bucket, key).await {
                Ok(published) => {
                    info!(processed_key = %published.processed_key, "Parquet file ready");
                    RecordOutcome::Done {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                        processed_key: published.processed_key,
                        num_rows: published.num_rows,
                    }
                }
                Err(err) => self.quarantine(bucket, key, err).await,
            }
        }
        .instrument(span)
        .await
    }

    async fn publish(&self, bucket: &str, key: &str) -> Result<Published, RecordError> {
        let content = self
            .store
            .download(bucket, key)
            .await
            .context(DownloadSnafu { bucket, key })?;

        let data = DataSet::from_json(&content).context(FormatSnafu { bucket, key })?;
        let data = transform(data, self.clock.as_ref());

        let processed_key = processed_key(key);
        let source = format!("s3://{bucket}/{key}");

        // The scratch directory is removed when `encoded` goes out of scope.
        let encoded = self
            .encoder
            .encode(&data, file_name(&processed_key), &source)
            .context(EncodeSnafu { bucket, key })?;

        self.store
            .upload_file(bucket, &processed_key, encoded.path())
            .await
            .context(UploadSnafu {
                bucket,
                key,
                processed_key: &processed_key,
            })?;

        Ok(Published {
            processed_key,
            num_rows: encoded.num_rows(),
        })
    }

    async fn quarantine(&self, bucket: &str, key: &str, err: RecordError) -> RecordOutcome {
        let error_key = error_key(key);
        let retryable = err.kind().is_retryable();

        if err.is_invalid_key() {
            error!(
                stage = %err.stage(),
                retryable,
                error = %snafu::Report::from_error(&err),
                "Object key cannot be addressed by the object store"
            );
        } else {
            error!(
                stage = %err.stage(),
                retryable,
                error = %snafu::Report::from_error(&err),
                "Failed to process object"
            );
        }

        let quarantine_error = match self.store.copy(bucket, key, bucket, &error_key).await {
            Ok(()) => {
                warn!(%error_key, "Object quarantined");
                None
            }
            Err(copy_err) if copy_err.is_invalid_key() => {
                error!(
                    %error_key,
                    error = %snafu::Report::from_error(&copy_err),
                    "Object key cannot be addressed, the object was not quarantined"
                );
                Some(copy_err)
            }
            Err(copy_err) => {
                error!(
                    %error_key,
                    error = %snafu::Report::from_error(&copy_err),
                    "Failed to quarantine object"
                );
                Some(copy_err)
            }
        };

        RecordOutcome::Quarantined {
            bucket: bucket.to_string(),
            key: key.to_string(),
            error_key,
            error: err,
            quarantine_error,
        }
    }
}

fn log_envelope_kind(envelope: &NotificationEnvelope) {
    match &envelope.kind {
        EnvelopeKind::Notification => {}
        EnvelopeKind::SubscriptionConfirmation => {
            info!(
                topic_arn = %envelope.topic_arn,
                subscribe_url = %envelope.subscribe_url,
                "Subscription confirmation received, visit the subscribe URL to confirm"
            );
        }
        other => {
            info!(
                kind = other.as_str(),
                topic_arn = %envelope.topic_arn,
                "Ignoring notification without change records"
            );
        }
    }
}
