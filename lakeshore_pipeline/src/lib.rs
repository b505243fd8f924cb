//! Notification to Parquet pipeline.
//!
//! [`Pipeline::handle_notification`] decodes a bucket notification and runs
//! every change record through download, transform, encode and upload, one
//! record at a time. A record that fails at any stage is quarantined by
//! copying the original object under the `error/` prefix; the remaining
//! records are still processed.

pub mod error;
pub mod pipeline;

pub use error::{RecordError, Stage};
pub use pipeline::{NotificationReport, Pipeline, RecordOutcome};
