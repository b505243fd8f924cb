//! Row decoding, transformation and Parquet encoding.
//!
//! Source objects hold a JSON array of rows with two numeric inputs, `a` and
//! `b`. [`transform`] derives `total` and a processing timestamp for every row,
//! and [`ParquetEncoder`] writes the rows to a Parquet file in a scratch
//! directory that is removed when the returned [`EncodedFile`] is dropped.

pub mod error;
pub mod parquet_writer;
pub mod row;
pub mod transform;

pub use error::FormatError;
pub use parquet_writer::{
    DEFAULT_ROW_GROUP_SIZE, EncodedFile, ParquetEncoder, data_row_schema, error::EncodeError,
};
pub use row::{DataRow, DataSet};
pub use transform::{Clock, FixedClock, SystemClock, transform};
