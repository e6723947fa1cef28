//! The reply frame sent back after every request.
//!
//! Callers that treat the channel as fire-and-forget may ignore the content;
//! it only reports what happened to the request:
//!
//! ```json
//! {"status":"ok"}
//! {"status":"unsupported","detail":"MouseMove"}
//! ```

use serde::{Deserialize, Serialize};

/// Longest `detail` text carried in a reply.  Longer text is cut at a
/// character boundary and ends with `...`, so a reply always fits a frame
/// whatever the request echoed back.
pub const MAX_DETAIL_BYTES: usize = 256;

/// Outcome category carried in a [`Reply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    /// The event was delivered to the OS input queue.
    Ok,
    /// The event was built but the platform refused it.
    Failed,
    /// The command kind is recognised but not mapped.
    Unsupported,
    /// The command decoded but its values cannot be mapped (e.g. key code out of range).
    Rejected,
    /// The payload did not decode.
    Malformed,
}

/// Informational reply to one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub status: ReplyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Reply {
    pub fn ok() -> Self {
        Self {
            status: ReplyStatus::Ok,
            detail: None,
        }
    }

    /// A reply with explanatory text, truncated to [`MAX_DETAIL_BYTES`].
    pub fn with_detail(status: ReplyStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: Some(truncate_detail(detail.into())),
        }
    }

    /// Serialises this reply to JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a reply received from an agent.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] for invalid JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn truncate_detail(mut detail: String) -> String {
    const ELLIPSIS: &str = "...";
    if detail.len() <= MAX_DETAIL_BYTES {
        return detail;
    }
    let mut cut = MAX_DETAIL_BYTES - ELLIPSIS.len();
    while !detail.is_char_boundary(cut) {
        cut -= 1;
    }
    detail.truncate(cut);
    detail.push_str(ELLIPSIS);
    detail
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_reply_omits_detail() {
        assert_eq!(Reply::ok().to_json().unwrap(), r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_reply_with_detail_serialises_lowercase_status() {
        // Arrange
        let reply = Reply::with_detail(ReplyStatus::Unsupported, "MouseMove");

        // Act
        let json = reply.to_json().unwrap();

        // Assert
        assert_eq!(json, r#"{"status":"unsupported","detail":"MouseMove"}"#);
    }

    #[test]
    fn test_from_json_accepts_missing_detail() {
        let reply = Reply::from_json(r#"{"status":"failed"}"#).unwrap();
        assert_eq!(reply.status, ReplyStatus::Failed);
        assert!(reply.detail.is_none());
    }

    #[test]
    fn test_long_detail_is_truncated_to_limit() {
        // Arrange: an echoed value far longer than any useful diagnostic
        let long = "A".repeat(65_500);

        // Act
        let reply = Reply::with_detail(ReplyStatus::Malformed, long);

        // Assert
        let detail = reply.detail.unwrap();
        assert_eq!(detail.len(), MAX_DETAIL_BYTES);
        assert!(detail.ends_with("..."));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 'é' is two bytes, so the byte limit falls inside a character
        let reply = Reply::with_detail(ReplyStatus::Malformed, "é".repeat(200));

        let detail = reply.detail.unwrap();
        assert!(detail.len() <= MAX_DETAIL_BYTES);
        assert!(detail.trim_end_matches("...").chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_short_detail_is_unchanged() {
        let reply = Reply::with_detail(ReplyStatus::Rejected, "virtual key 70000 is outside 0..=65535");
        assert_eq!(reply.detail.as_deref(), Some("virtual key 70000 is outside 0..=65535"));
    }

    #[test]
    fn test_from_json_rejects_unknown_status() {
        assert!(Reply::from_json(r#"{"status":"maybe"}"#).is_err());
    }
}
