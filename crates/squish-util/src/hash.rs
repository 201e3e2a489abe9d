/// Length of the content tag used in digest-named output files.
const CONTENT_TAG_LEN: usize = 6;

/// Compute the BLAKE3 hash of a byte slice, returning the hex-encoded digest.
#[must_use]
pub fn blake3_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Compute a short content tag for cache-busting output names.
///
/// The tag is the first 6 hex characters of the BLAKE3 digest, enough to
/// distinguish builds while keeping file names readable.
#[must_use]
pub fn content_tag(data: &[u8]) -> String {
    let mut hex = blake3_bytes(data);
    hex.truncate(CONTENT_TAG_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake3_bytes() {
        // Known BLAKE3 hash of "hello world"
        assert_eq!(
            blake3_bytes(b"hello world"),
            "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
        );
    }

    #[test]
    fn test_content_tag_is_digest_prefix() {
        assert_eq!(content_tag(b"hello world"), "d74981");
    }

    #[test]
    fn test_content_tag_differs_by_content() {
        assert_ne!(content_tag(b"x=1;"), content_tag(b"y=2;"));
    }
}
