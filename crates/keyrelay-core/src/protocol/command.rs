//! The typed command decoded from one request.
//!
//! Wire shape (field names are the external contract):
//!
//! ```json
//! {"Type":"KeyDown","Data":13,"X":0.0,"Y":0.0}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The five command kinds a request may carry.
///
/// The textual names are matched case-sensitively; see [`CommandKind::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommandKind {
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    MouseMove,
}

impl CommandKind {
    /// Every kind, in wire-table order.
    pub const ALL: [CommandKind; 5] = [
        CommandKind::KeyDown,
        CommandKind::KeyUp,
        CommandKind::MouseDown,
        CommandKind::MouseUp,
        CommandKind::MouseMove,
    ];

    /// Returns the wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::KeyDown => "KeyDown",
            CommandKind::KeyUp => "KeyUp",
            CommandKind::MouseDown => "MouseDown",
            CommandKind::MouseUp => "MouseUp",
            CommandKind::MouseMove => "MouseMove",
        }
    }

    /// Returns `true` for the two keyboard kinds.
    pub fn is_keyboard(self) -> bool {
        matches!(self, CommandKind::KeyDown | CommandKind::KeyUp)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a textual kind is not one of the five wire names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl fmt::Display for UnknownKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command kind: {:?}", self.0)
    }
}

impl std::error::Error for UnknownKind {}

impl FromStr for CommandKind {
    type Err = UnknownKind;

    /// Parses a wire name.  Matching is exact: `"keydown"` is not `KeyDown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// One decoded remote input request.
///
/// `code` is a Windows virtual key for the keyboard kinds and a button or
/// wheel selector for the mouse button kinds.  `x`/`y` are only read for
/// mouse kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Command {
    #[serde(rename = "Type")]
    pub kind: CommandKind,
    #[serde(rename = "Data")]
    pub code: i32,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

impl Command {
    pub fn new(kind: CommandKind, code: i32, x: f64, y: f64) -> Self {
        Self { kind, code, x, y }
    }

    pub fn key_down(virtual_key: i32) -> Self {
        Self::new(CommandKind::KeyDown, virtual_key, 0.0, 0.0)
    }

    pub fn key_up(virtual_key: i32) -> Self {
        Self::new(CommandKind::KeyUp, virtual_key, 0.0, 0.0)
    }

    pub fn mouse_down(button: i32, x: f64, y: f64) -> Self {
        Self::new(CommandKind::MouseDown, button, x, y)
    }

    pub fn mouse_up(button: i32, x: f64, y: f64) -> Self {
        Self::new(CommandKind::MouseUp, button, x, y)
    }

    pub fn mouse_move(x: f64, y: f64) -> Self {
        Self::new(CommandKind::MouseMove, 0, x, y)
    }

    /// Serialises this command into its JSON wire shape.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
