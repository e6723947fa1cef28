//! Strict decoder from a textual request payload to a [`Command`].
//!
//! Rules:
//!
//! - The payload must be a single JSON object.  Arrays, scalars, and invalid
//!   JSON are [`DecodeError::Malformed`].
//! - `Type` must be exactly one of the five kind names; absent, `null`, any
//!   other string, or a value that is not a string at all (number, boolean,
//!   array, object) is [`DecodeError::UnknownOrMissingKind`].
//! - `Data` must be an integer in `i32` range; absent or `null` means `0`.
//! - `X`/`Y` must be numbers; absent or `null` means `0.0`.
//! - A field holding the wrong JSON type is [`DecodeError::Malformed`].
//! - Field names are also accepted in lowercase (`type`, `data`, `x`, `y`).
//!   Unknown fields are ignored.
//!
//! There is no partial decode and no coercion beyond the defaults above.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::command::{Command, CommandKind};

/// Reasons a payload could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not a well-formed JSON object, or a field has the wrong type.
    #[error("malformed payload: {0}")]
    Malformed(String),

    /// `Type` is absent or not one of the recognised kind names.
    #[error("unknown or missing command kind: {}", .found.as_deref().unwrap_or("<absent>"))]
    UnknownOrMissingKind { found: Option<String> },
}

/// Field-level view of the payload before validation.
#[derive(Debug, Deserialize)]
struct RawCommand {
    #[serde(rename = "Type", alias = "type", default)]
    kind: Option<Value>,
    #[serde(rename = "Data", alias = "data", default)]
    code: Option<i32>,
    #[serde(rename = "X", alias = "x", default)]
    x: Option<f64>,
    #[serde(rename = "Y", alias = "y", default)]
    y: Option<f64>,
}

/// Decodes one request payload.
///
/// # Errors
///
/// See the module documentation for the exact rules; every failure is either
/// [`DecodeError::Malformed`] or [`DecodeError::UnknownOrMissingKind`].
///
/// # Examples
///
/// ```rust
/// use keyrelay_core::{decode, CommandKind};
///
/// let cmd = decode(r#"{"Type":"KeyDown","Data":13,"X":0,"Y":0}"#).unwrap();
/// assert_eq!(cmd.kind, CommandKind::KeyDown);
/// assert_eq!(cmd.code, 13);
/// ```
pub fn decode(payload: &str) -> Result<Command, DecodeError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    // Derived struct deserialisation would also accept a JSON array in field
    // order, so the object shape is checked explicitly.
    if !value.is_object() {
        return Err(DecodeError::Malformed(format!(
            "expected a JSON object, found {}",
            json_type_name(&value)
        )));
    }

    let raw: RawCommand =
        serde_json::from_value(value).map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let kind = parse_kind(raw.kind)?;

    Ok(Command {
        kind,
        code: raw.code.unwrap_or(0),
        x: raw.x.unwrap_or(0.0),
        y: raw.y.unwrap_or(0.0),
    })
}

/// Resolves the `Type` field.  Strings are kept verbatim in the error so
/// the diagnostic reads `Jump` rather than `"Jump"`; other values use their
/// JSON text.
fn parse_kind(value: Option<Value>) -> Result<CommandKind, DecodeError> {
    match value {
        None | Some(Value::Null) => Err(DecodeError::UnknownOrMissingKind { found: None }),
        Some(Value::String(name)) => name
            .parse::<CommandKind>()
            .map_err(|_| DecodeError::UnknownOrMissingKind { found: Some(name) }),
        Some(other) => Err(DecodeError::UnknownOrMissingKind {
            found: Some(other.to_string()),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Valid payloads ────────────────────────────────────────────────────────

    #[test]
    fn test_decode_every_kind_preserves_kind() {
        for kind in CommandKind::ALL {
            // Arrange
            let payload = format!(r#"{{"Type":"{kind}","Data":1,"X":2.5,"Y":-3}}"#);

            // Act
            let cmd = decode(&payload).unwrap();

            // Assert
            assert_eq!(cmd.kind, kind);
            assert_eq!(cmd.code, 1);
            assert_eq!(cmd.x, 2.5);
            assert_eq!(cmd.y, -3.0);
        }
    }

    #[test]
    fn test_decode_missing_data_defaults_to_zero() {
        let cmd = decode(r#"{"Type":"KeyUp"}"#).unwrap();
        assert_eq!(cmd, Command::key_up(0));
    }

    #[test]
    fn test_decode_null_fields_use_defaults() {
        let cmd = decode(r#"{"Type":"MouseMove","Data":null,"X":null,"Y":null}"#).unwrap();
        assert_eq!(cmd, Command::mouse_move(0.0, 0.0));
    }

    #[test]
    fn test_decode_accepts_lowercase_field_names() {
        let cmd = decode(r#"{"type":"KeyDown","data":65,"x":1,"y":2}"#).unwrap();
        assert_eq!(cmd, Command::new(CommandKind::KeyDown, 65, 1.0, 2.0));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let cmd = decode(r#"{"Type":"KeyDown","Data":65,"Extra":[1,2,3]}"#).unwrap();
        assert_eq!(cmd, Command::key_down(65));
    }

    #[test]
    fn test_decode_is_deterministic() {
        let payload = r#"{"Type":"MouseDown","Data":2,"X":0.25,"Y":0.75}"#;
        assert_eq!(decode(payload), decode(payload));
    }

    #[test]
    fn test_decode_accepts_integer_coordinates() {
        let cmd = decode(r#"{"Type":"MouseMove","X":10,"Y":20}"#).unwrap();
        assert_eq!((cmd.x, cmd.y), (10.0, 20.0));
    }

    // ── Kind errors ───────────────────────────────────────────────────────────

    #[test]
    fn test_decode_unknown_kind_is_rejected() {
        // Arrange / Act
        let err = decode(r#"{"Type":"Nonsense"}"#).unwrap_err();

        // Assert
        assert_eq!(
            err,
            DecodeError::UnknownOrMissingKind {
                found: Some("Nonsense".to_string())
            }
        );
    }

    #[test]
    fn test_decode_missing_kind_is_rejected() {
        let err = decode(r#"{"Data":13}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnknownOrMissingKind { found: None });
    }

    #[test]
    fn test_decode_null_kind_is_missing() {
        let err = decode(r#"{"Type":null}"#).unwrap_err();
        assert_eq!(err, DecodeError::UnknownOrMissingKind { found: None });
    }

    #[test]
    fn test_decode_kind_is_case_sensitive() {
        let err = decode(r#"{"Type":"keydown"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownOrMissingKind { .. }));
    }

    #[test]
    fn test_decode_unknown_kind_error_message_names_the_value() {
        let err = decode(r#"{"Type":"Jump"}"#).unwrap_err();
        assert_eq!(err.to_string(), "unknown or missing command kind: Jump");
    }

    // ── Malformed payloads ────────────────────────────────────────────────────

    #[test]
    fn test_decode_invalid_json_is_malformed() {
        assert!(matches!(decode("{not json"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode(""), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_array_is_malformed() {
        let err = decode(r#"["KeyDown",13,0,0]"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Malformed("expected a JSON object, found an array".to_string())
        );
    }

    #[test]
    fn test_decode_scalar_is_malformed() {
        assert!(matches!(decode("42"), Err(DecodeError::Malformed(_))));
        assert!(matches!(decode(r#""KeyDown""#), Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_fractional_data_is_malformed() {
        let result = decode(r#"{"Type":"KeyDown","Data":1.5}"#);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_data_out_of_i32_range_is_malformed() {
        let result = decode(r#"{"Type":"KeyDown","Data":4294967296}"#);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_string_coordinate_is_malformed() {
        let result = decode(r#"{"Type":"MouseMove","X":"10"}"#);
        assert!(matches!(result, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_numeric_kind_is_unknown_kind() {
        // Arrange / Act
        let err = decode(r#"{"Type":1}"#).unwrap_err();

        // Assert
        assert_eq!(
            err,
            DecodeError::UnknownOrMissingKind {
                found: Some("1".to_string())
            }
        );
    }

    #[test]
    fn test_decode_boolean_kind_is_unknown_kind() {
        let err = decode(r#"{"Type":true}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownOrMissingKind {
                found: Some("true".to_string())
            }
        );
    }

    #[test]
    fn test_decode_array_or_object_kind_is_unknown_kind() {
        let array = decode(r#"{"Type":["KeyDown"]}"#).unwrap_err();
        let object = decode(r#"{"Type":{"name":"KeyDown"}}"#).unwrap_err();

        assert_eq!(
            array,
            DecodeError::UnknownOrMissingKind {
                found: Some(r#"["KeyDown"]"#.to_string())
            }
        );
        assert!(matches!(object, DecodeError::UnknownOrMissingKind { found: Some(_) }));
    }
}
