use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use arrow::{
    array::{ArrayRef, Float32Array, RecordBatch, TimestampMillisecondArray},
    datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit},
};
use bytesize::ByteSize;
use parquet::{
    arrow::ArrowWriter,
    basic::Compression,
    file::{metadata::KeyValue, properties::WriterProperties},
};
use snafu::ResultExt;
use tempfile::TempDir;
use tracing::debug;

use super::error::{
    BatchSnafu, CloseSnafu, CreateFileSnafu, Result, ScratchDirSnafu, WriteSnafu, WriterSnafu,
};
use crate::row::{DataRow, DataSet};

/// Row groups are flushed once their in-memory size reaches this ceiling.
pub const DEFAULT_ROW_GROUP_SIZE: ByteSize = ByteSize::mib(128);

const WRITE_BATCH_ROWS: usize = 8192;
const MAX_ROW_GROUP_ROWS: usize = 64 * 1024 * 1024;
const SCRATCH_DIR_PREFIX: &str = "data_";

/// Arrow schema of the Parquet artifact.
pub fn data_row_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("a", DataType::Float32, false),
        Field::new("b", DataType::Float32, false),
        Field::new("total", DataType::Float32, true),
        Field::new(
            "created_ts",
            DataType::Timestamp(TimeUnit::Millisecond, None),
            true,
        ),
    ]))
}

/// A Parquet file in its own scratch directory.
///
/// Dropping the value removes the directory and the file.
#[derive(Debug)]
pub struct EncodedFile {
    path: PathBuf,
    num_rows: usize,
    _scratch_dir: TempDir,
}

impl EncodedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn scratch_dir(&self) -> &Path {
        self._scratch_dir.path()
    }
}

/// Encodes data sets into Snappy-compressed Parquet files.
#[derive(Debug, Clone)]
pub struct ParquetEncoder {
    staging_root: PathBuf,
    row_group_size: ByteSize,
}

impl ParquetEncoder {
    /// Create an encoder writing scratch directories under `staging_root`.
    pub fn new(staging_root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.into(),
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_row_group_size(mut self, row_group_size: ByteSize) -> Self {
        self.row_group_size = row_group_size;
        self
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Write `data` to a new file named `file_name`.
    ///
    /// `source` is recorded in the file's key-value metadata.
    pub fn encode(&self, data: &DataSet, file_name: &str, source: &str) -> Result<EncodedFile> {
        let scratch_dir = self.scratch_dir()?;
        let path = scratch_dir.path().join(file_name);

        debug!(path = %path.display(), num_rows = data.len(), "Writing parquet file");

        let file = File::create(&path).context(CreateFileSnafu { path: &path })?;

        let schema = data_row_schema();
        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(self.properties(source)))
            .context(WriterSnafu {})?;

        for (index, rows) in data.rows().chunks(WRITE_BATCH_ROWS).enumerate() {
            let batch = rows_to_batch(schema.clone(), rows)?;
            let offset = index * WRITE_BATCH_ROWS;

            writer.write(&batch).context(WriteSnafu { offset })?;

            if writer.in_progress_size() as u64 >= self.row_group_size.as_u64() {
                writer.flush().context(WriteSnafu { offset })?;
            }
        }

        writer.close().context(CloseSnafu {})?;

        debug!(path = %path.display(), "Parquet file written");

        Ok(EncodedFile {
            path,
            num_rows: data.len(),
            _scratch_dir: scratch_dir,
        })
    }

    fn scratch_dir(&self) -> Result<TempDir> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        tempfile::Builder::new()
            .prefix(&format!("{SCRATCH_DIR_PREFIX}{nanos}_"))
            .tempdir_in(&self.staging_root)
            .context(ScratchDirSnafu {
                staging_root: &self.staging_root,
            })
    }

    fn properties(&self, source: &str) -> WriterProperties {
        let kv_metadata = vec![KeyValue::new(
            "LAKESHORE:source".to_string(),
            source.to_string(),
        )];

        WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            // Large enough that the byte ceiling is reached first.
            .set_max_row_group_size(MAX_ROW_GROUP_ROWS)
            .set_key_value_metadata(Some(kv_metadata))
            .set_created_by(format!("lakeshore version {}", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

fn rows_to_batch(schema: SchemaRef, rows: &[DataRow]) -> Result<RecordBatch> {
    let a = Float32Array::from_iter_values(rows.iter().map(|r| r.a));
    let b = Float32Array::from_iter_values(rows.iter().map(|r| r.b));
    let total: Float32Array = rows.iter().map(|r| r.total).collect();
    let timestamp: TimestampMillisecondArray = rows.iter().map(|r| r.timestamp).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(a),
        Arc::new(b),
        Arc::new(total),
        Arc::new(timestamp),
    ];

    RecordBatch::try_new(schema, columns).context(BatchSnafu {})
}
