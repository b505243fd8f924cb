use serde::Deserialize;
use snafu::ResultExt;

use crate::error::{FormatError, FormatSnafu};

/// One input row.
///
/// `total` and `timestamp` stay `None` until the row is transformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataRow {
    pub a: f32,
    pub b: f32,
    pub total: Option<f32>,
    /// Processing time in milliseconds since the Unix epoch.
    #[serde(rename = "created_ts")]
    pub timestamp: Option<i64>,
}

impl DataRow {
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            a,
            b,
            ..Default::default()
        }
    }
}

/// The rows of one source object, in object order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    rows: Vec<DataRow>,
}

impl DataSet {
    pub fn new(rows: Vec<DataRow>) -> Self {
        Self { rows }
    }

    /// Decode a JSON array of rows. A JSON `null` decodes as an empty set.
    pub fn from_json(data: &[u8]) -> Result<Self, FormatError> {
        let rows: Option<Vec<DataRow>> = serde_json::from_slice(data).context(FormatSnafu {})?;
        Ok(Self::new(rows.unwrap_or_default()))
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DataRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<DataRow> for DataSet {
    fn from_iter<I: IntoIterator<Item = DataRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let data = DataSet::from_json(br#"[{"a":1,"b":2},{"a":0.5,"b":-4.25}]"#).unwrap();
        assert_eq!(data.rows(), &[DataRow::new(1.0, 2.0), DataRow::new(0.5, -4.25)]);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let data = DataSet::from_json(br#"[{"a":3},{}]"#).unwrap();
        assert_eq!(data.rows(), &[DataRow::new(3.0, 0.0), DataRow::new(0.0, 0.0)]);
    }

    #[test]
    fn test_derived_fields_are_read() {
        let data = DataSet::from_json(br#"[{"a":1,"b":2,"total":9,"created_ts":42}]"#).unwrap();
        assert_eq!(data.rows()[0].total, Some(9.0));
        assert_eq!(data.rows()[0].timestamp, Some(42));
    }

    #[test]
    fn test_empty_and_null() {
        assert!(DataSet::from_json(b"[]").unwrap().is_empty());
        assert!(DataSet::from_json(b"null").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_content() {
        assert!(DataSet::from_json(b"not json").is_err());
        assert!(DataSet::from_json(br#"{"a":1,"b":2}"#).is_err());
        assert!(DataSet::from_json(br#"[{"a":"one","b":2}]"#).is_err());
        assert!(DataSet::from_json(b"").is_err());
    }
}
