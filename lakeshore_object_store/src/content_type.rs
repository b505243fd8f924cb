//! Content type detection from the leading bytes of an object.

const SNIFF_LEN: usize = 512;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const OCTET_STREAM: &str = "application/octet-stream";

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"%PDF-", "application/pdf"),
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"\x1f\x8b\x08", "application/x-gzip"),
    (b"PK\x03\x04", "application/zip"),
    (b"\xef\xbb\xbf", TEXT_PLAIN),
];

/// Detect the content type of `data`.
///
/// Only the first 512 bytes are considered. Known binary signatures are
/// matched first, and anything else without control bytes is plain text.
/// Parquet files fall through to `application/octet-stream`.
pub fn sniff_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if let Some((_, content_type)) = SIGNATURES
        .iter()
        .find(|(signature, _)| head.starts_with(signature))
    {
        return content_type;
    }

    let trimmed = trim_leading_whitespace(head);
    if trimmed.starts_with(b"<?xml") {
        return "text/xml; charset=utf-8";
    }

    if head.iter().any(|b| is_binary_byte(*b)) {
        OCTET_STREAM
    } else {
        TEXT_PLAIN
    }
}

fn trim_leading_whitespace(data: &[u8]) -> &[u8] {
    let start = data
        .iter()
        .position(|b| !matches!(b, b'\t' | b'\n' | b'\x0c' | b'\r' | b' '))
        .unwrap_or(data.len());
    &data[start..]
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0b | 0x0e..=0x1a | 0x1c..=0x1f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_parquet() {
        let data = b"PAR1\x15\x04\x15\x10\x15\x14L\x15\x02\x15\x00\x12\x00\x00PAR1";
        assert_eq!(sniff_content_type(data), OCTET_STREAM);
    }

    #[test]
    fn test_sniff_json_is_text() {
        assert_eq!(sniff_content_type(br#"[{"a":1,"b":2}]"#), TEXT_PLAIN);
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(sniff_content_type(b"%PDF-1.7\n"), "application/pdf");
        assert_eq!(sniff_content_type(b"\x1f\x8b\x08\x00\x00"), "application/x-gzip");
        assert_eq!(sniff_content_type(b"PK\x03\x04\x14\x00"), "application/zip");
        assert_eq!(
            sniff_content_type(b"  <?xml version=\"1.0\"?>"),
            "text/xml; charset=utf-8"
        );
    }

    #[test]
    fn test_sniff_empty_is_text() {
        assert_eq!(sniff_content_type(b""), TEXT_PLAIN);
    }
}
