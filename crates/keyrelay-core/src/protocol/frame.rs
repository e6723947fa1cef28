//! Length-prefixed framing for requests and replies.
//!
//! Wire format:
//! ```text
//! [body_len:4][body:N]
//! ```
//! `body_len` is a big-endian `u32`; the body is UTF-8 text (a JSON object).
//! One request frame is always answered by exactly one reply frame.

use thiserror::Error;

/// Size of the length prefix in bytes.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Largest body accepted when no explicit limit is configured (64 KiB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024;

/// Errors produced while encoding or decoding frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The declared or actual body length exceeds the configured limit.
    #[error("frame body of {len} bytes exceeds the {max}-byte limit")]
    TooLarge { len: usize, max: usize },

    /// The body is not valid UTF-8.
    #[error("frame body is not valid UTF-8: {0}")]
    InvalidUtf8(String),
}

/// Encodes `body` into a complete frame.
///
/// # Errors
///
/// Returns [`FrameError::TooLarge`] if `body` is longer than `max_len` or does
/// not fit the 32-bit prefix.
pub fn encode_frame(body: &str, max_len: usize) -> Result<Vec<u8>, FrameError> {
    let len = body.len();
    let declared = u32::try_from(len).map_err(|_| FrameError::TooLarge { len, max: max_len })?;
    if len > max_len {
        return Err(FrameError::TooLarge { len, max: max_len });
    }

    let mut buf = Vec::with_capacity(LENGTH_PREFIX_SIZE + len);
    buf.extend_from_slice(&declared.to_be_bytes());
    buf.extend_from_slice(body.as_bytes());
    Ok(buf)
}

/// Validates a received length prefix and returns the body length.
///
/// # Errors
///
/// Returns [`FrameError::TooLarge`] when the declared length exceeds `max_len`.
pub fn body_len(prefix: [u8; LENGTH_PREFIX_SIZE], max_len: usize) -> Result<usize, FrameError> {
    let len = u32::from_be_bytes(prefix) as usize;
    if len > max_len {
        return Err(FrameError::TooLarge { len, max: max_len });
    }
    Ok(len)
}

/// Converts a received body into text.
///
/// # Errors
///
/// Returns [`FrameError::InvalidUtf8`] if the bytes are not UTF-8.
pub fn body_to_text(body: Vec<u8>) -> Result<String, FrameError> {
    String::from_utf8(body).map_err(|e| FrameError::InvalidUtf8(e.to_string()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_frame_prefixes_big_endian_length() {
        // Arrange / Act
        let frame = encode_frame("abc", DEFAULT_MAX_FRAME_BYTES).unwrap();

        // Assert
        assert_eq!(frame, vec![0, 0, 0, 3, b'a', b'b', b'c']);
    }

    #[test]
    fn test_encode_frame_allows_empty_body() {
        let frame = encode_frame("", DEFAULT_MAX_FRAME_BYTES).unwrap();
        assert_eq!(frame, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_encode_frame_rejects_body_over_limit() {
        let err = encode_frame("12345", 4).unwrap_err();
        assert_eq!(err, FrameError::TooLarge { len: 5, max: 4 });
    }

    #[test]
    fn test_body_len_rejects_declared_length_over_limit() {
        let err = body_len([0, 1, 0, 1], 1024).unwrap_err();
        assert_eq!(err, FrameError::TooLarge { len: 65537, max: 1024 });
    }

    #[test]
    fn test_body_len_accepts_length_at_limit() {
        assert_eq!(body_len([0, 0, 4, 0], 1024), Ok(1024));
    }

    #[test]
    fn test_body_to_text_accepts_utf8() {
        let text = body_to_text("{\"Type\":\"KeyDown\"}".as_bytes().to_vec()).unwrap();
        assert_eq!(text, r#"{"Type":"KeyDown"}"#);
    }

    #[test]
    fn test_body_to_text_rejects_invalid_utf8() {
        let result = body_to_text(vec![0xC3, 0x28]);
        assert!(matches!(result, Err(FrameError::InvalidUtf8(_))));
    }
}
