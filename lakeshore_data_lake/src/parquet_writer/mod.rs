pub mod error;
mod writer;

pub use self::writer::{
    DEFAULT_ROW_GROUP_SIZE, EncodedFile, ParquetEncoder, data_row_schema,
};
