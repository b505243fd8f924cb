//! Destination keys derived from a source object key.
//!
//! `data/test.json` is published as `processed/test.parquet` and quarantined
//! as `error/test.json`. Only the first occurrence of `data` is rewritten;
//! keys without it keep that part unchanged.

const SOURCE_SEGMENT: &str = "data";
const PROCESSED_SEGMENT: &str = "processed";
const ERROR_SEGMENT: &str = "error";
const PARQUET_EXTENSION: &str = ".parquet";

/// Key of the Parquet artifact produced from `key`.
pub fn processed_key(key: &str) -> String {
    let ext = extension(key);
    let mut processed = key.replacen(SOURCE_SEGMENT, PROCESSED_SEGMENT, 1);
    if !ext.is_empty() {
        processed = processed.replacen(ext, "", 1);
    }
    processed.push_str(PARQUET_EXTENSION);
    processed
}

/// Key under which `key` is quarantined when processing fails.
pub fn error_key(key: &str) -> String {
    key.replacen(SOURCE_SEGMENT, ERROR_SEGMENT, 1)
}

/// Extension of the last path segment of `key`, including the dot.
///
/// Returns an empty string when the last segment has no dot.
pub fn extension(key: &str) -> &str {
    let name_start = key.rfind('/').map(|i| i + 1).unwrap_or(0);
    match key[name_start..].rfind('.') {
        Some(dot) => &key[name_start + dot..],
        None => "",
    }
}

/// Last path segment of `key`.
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processed_key() {
        assert_eq!(processed_key("data/test.json"), "processed/test.parquet");
        assert_eq!(processed_key("data/2024/06/batch.csv"), "processed/2024/06/batch.parquet");
        assert_eq!(processed_key("data/noext"), "processed/noext.parquet");
    }

    #[test]
    fn test_processed_key_rewrites_first_occurrence_only() {
        assert_eq!(
            processed_key("data/data.json"),
            "processed/data.parquet"
        );
        assert_eq!(
            processed_key("metadata/data/test.json"),
            "metaprocessed/data/test.parquet"
        );
    }

    #[test]
    fn test_processed_key_removes_first_extension_occurrence() {
        assert_eq!(
            processed_key("data/a.json.tmp.json"),
            "processed/a.tmp.json.parquet"
        );
    }

    #[test]
    fn test_error_key() {
        assert_eq!(error_key("data/test.json"), "error/test.json");
        assert_eq!(error_key("data/data.json"), "error/data.json");
    }

    #[test]
    fn test_keys_without_source_segment() {
        assert_eq!(error_key("incoming/test.json"), "incoming/test.json");
        assert_eq!(processed_key("incoming/test.json"), "incoming/test.parquet");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("data/test.json"), ".json");
        assert_eq!(extension("data/archive.tar.gz"), ".gz");
        assert_eq!(extension("data.d/file"), "");
        assert_eq!(extension("data/.hidden"), ".hidden");
        assert_eq!(extension(""), "");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("processed/test.parquet"), "test.parquet");
        assert_eq!(file_name("test.parquet"), "test.parquet");
    }
}
