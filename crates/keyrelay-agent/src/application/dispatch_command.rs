//! EventDispatcher: translates decoded commands into OS input events.
//!
//! This use case sits at the application layer and delegates to an
//! [`InputInjector`] trait object for OS-level event injection.
//! The platform-specific implementations are in the infrastructure layer.
//!
//! # Mapping table
//!
//! | Command   | Event                               |
//! |-----------|-------------------------------------|
//! | KeyDown   | Keyboard, no flags, vk = `code`     |
//! | KeyUp     | Keyboard, `KEY_UP`, vk = `code`     |
//! | MouseDown | Unsupported unless mouse is enabled |
//! | MouseUp   | Unsupported unless mouse is enabled |
//! | MouseMove | Unsupported unless mouse is enabled |
//!
//! With [`DispatchPolicy::mouse_enabled`] set, mouse commands use the button
//! codes below and [`PointerMode`] decides how `X`/`Y` are read.
//!
//! | `Data` | MouseDown / MouseUp            |
//! |--------|--------------------------------|
//! | 1      | left button                    |
//! | 2      | right button                   |
//! | 3      | middle button                  |
//! | 4      | X button 1 (back)              |
//! | 5      | X button 2 (forward)           |
//! | 6      | vertical wheel, `Y` notches (MouseDown only)   |
//! | 7      | horizontal wheel, `X` notches (MouseDown only) |

use std::sync::Arc;

use keyrelay_core::{
    Command, CommandKind, InputEvent, KeyboardFlags, KeyboardInput, MouseFlags, MouseInput,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// One wheel notch in platform wheel units.
pub const WHEEL_DELTA: f64 = 120.0;

/// Upper bound of the absolute pointer coordinate space.
pub const ABSOLUTE_RANGE: f64 = 65535.0;

/// X-button selectors carried in the mouse data word.
const XBUTTON1: i32 = 0x0001;
const XBUTTON2: i32 = 0x0002;

/// Virtual keys that sit on the extended part of the keyboard: the
/// navigation cluster, Insert/Delete, both Windows keys, right Ctrl and
/// right Alt.
const EXTENDED_VKS: &[u16] = &[
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, 0x2D, 0x2E, 0x5B, 0x5C, 0xA3, 0xA5,
];

/// Error type for the injection capability.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The OS refused or failed the injection call.
    #[error("platform error: {0}")]
    Platform(String),
    /// No injection backend exists on this host.
    #[error("input injection unavailable: {0}")]
    Unavailable(String),
}

/// The OS facility that delivers one synthetic event into the input queue.
///
/// Each supported OS provides an implementation in the infrastructure layer.
pub trait InputInjector: Send + Sync {
    /// Delivers `event`.  Called at most once per dispatched command.
    fn inject(&self, event: &InputEvent) -> Result<(), InjectionError>;
}

/// How `X`/`Y` of a `MouseMove` are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerMode {
    /// Fractions of the virtual desktop, `0.0..=1.0`.
    #[default]
    Absolute,
    /// Pixel deltas from the current position.
    Relative,
}

/// Dispatch options.  The default reproduces keyboard-only behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchPolicy {
    pub mouse_enabled: bool,
    pub pointer_mode: PointerMode,
    /// Adds `EXTENDED_KEY` for keys on the extended part of the keyboard.
    pub mark_extended_keys: bool,
}

/// Result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// One event was handed to the injector; `delivered` is its verdict.
    Injected { delivered: bool },
    /// The kind is recognised but has no mapping under the current policy.
    Unsupported { kind: CommandKind },
    /// The command's values cannot be expressed as an event.
    Rejected { reason: String },
}

/// Why a command produced no event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("not implemented: {0}")]
    Unsupported(CommandKind),
    #[error("{0}")]
    Rejected(String),
}

/// The dispatch use case.
///
/// Stateless between calls: every command is mapped and injected on its own.
pub struct EventDispatcher {
    injector: Arc<dyn InputInjector>,
    policy: DispatchPolicy,
}

impl EventDispatcher {
    /// Creates a dispatcher with the default (keyboard-only) policy.
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self::with_policy(injector, DispatchPolicy::default())
    }

    pub fn with_policy(injector: Arc<dyn InputInjector>, policy: DispatchPolicy) -> Self {
        Self { injector, policy }
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Maps `cmd` and, when it maps, injects exactly one event.
    ///
    /// Injection failures are reported as `Injected { delivered: false }`;
    /// nothing here is fatal.
    pub fn dispatch(&self, cmd: &Command) -> DispatchOutcome {
        let event = match self.build_event(cmd) {
            Ok(event) => event,
            Err(MappingError::Unsupported(kind)) => {
                info!("not implemented: {kind}");
                return DispatchOutcome::Unsupported { kind };
            }
            Err(MappingError::Rejected(reason)) => {
                warn!("rejected {}: {reason}", cmd.kind);
                return DispatchOutcome::Rejected { reason };
            }
        };

        match self.injector.inject(&event) {
            Ok(()) => {
                debug!(kind = %cmd.kind, code = cmd.code, "injected {:?}", event);
                DispatchOutcome::Injected { delivered: true }
            }
            Err(e) => {
                warn!("injection of {} failed: {e}", cmd.kind);
                DispatchOutcome::Injected { delivered: false }
            }
        }
    }

    /// Builds the event for `cmd` without injecting it.
    ///
    /// # Errors
    ///
    /// [`MappingError::Unsupported`] for mouse kinds while mouse mapping is
    /// disabled; [`MappingError::Rejected`] for values that cannot be encoded.
    pub fn build_event(&self, cmd: &Command) -> Result<InputEvent, MappingError> {
        match cmd.kind {
            CommandKind::KeyDown => self.key_event(cmd.code, false),
            CommandKind::KeyUp => self.key_event(cmd.code, true),
            kind if !self.policy.mouse_enabled => Err(MappingError::Unsupported(kind)),
            CommandKind::MouseDown => button_event(cmd, true),
            CommandKind::MouseUp => button_event(cmd, false),
            CommandKind::MouseMove => self.move_event(cmd),
        }
    }

    fn key_event(&self, code: i32, key_up: bool) -> Result<InputEvent, MappingError> {
        let virtual_key = u16::try_from(code).map_err(|_| {
            MappingError::Rejected(format!("virtual key {code} is outside 0..=65535"))
        })?;

        let mut flags = KeyboardFlags::empty();
        if key_up {
            flags |= KeyboardFlags::KEY_UP;
        }
        if self.policy.mark_extended_keys && EXTENDED_VKS.contains(&virtual_key) {
            flags |= KeyboardFlags::EXTENDED_KEY;
        }

        Ok(InputEvent::Keyboard(KeyboardInput {
            virtual_key,
            scan_code: 0,
            flags,
        }))
    }

    fn move_event(&self, cmd: &Command) -> Result<InputEvent, MappingError> {
        let mut flags = MouseFlags::MOVE | MouseFlags::MOVE_NO_COALESCE;
        let (dx, dy) = match self.policy.pointer_mode {
            PointerMode::Absolute => {
                flags |= MouseFlags::ABSOLUTE | MouseFlags::VIRTUAL_DESK;
                (normalize_absolute(cmd.x)?, normalize_absolute(cmd.y)?)
            }
            PointerMode::Relative => (round_to_i32(cmd.x)?, round_to_i32(cmd.y)?),
        };

        Ok(InputEvent::Mouse(MouseInput {
            dx,
            dy,
            data: 0,
            flags,
        }))
    }
}

fn button_event(cmd: &Command, pressed: bool) -> Result<InputEvent, MappingError> {
    let (flags, data) = match (cmd.code, pressed) {
        (1, true) => (MouseFlags::LEFT_DOWN, 0),
        (1, false) => (MouseFlags::LEFT_UP, 0),
        (2, true) => (MouseFlags::RIGHT_DOWN, 0),
        (2, false) => (MouseFlags::RIGHT_UP, 0),
        (3, true) => (MouseFlags::MIDDLE_DOWN, 0),
        (3, false) => (MouseFlags::MIDDLE_UP, 0),
        (4, true) => (MouseFlags::X_DOWN, XBUTTON1),
        (4, false) => (MouseFlags::X_UP, XBUTTON1),
        (5, true) => (MouseFlags::X_DOWN, XBUTTON2),
        (5, false) => (MouseFlags::X_UP, XBUTTON2),
        (6, true) => (MouseFlags::WHEEL, round_to_i32(cmd.y * WHEEL_DELTA)?),
        (7, true) => (MouseFlags::HWHEEL, round_to_i32(cmd.x * WHEEL_DELTA)?),
        (6 | 7, false) => {
            return Err(MappingError::Rejected(
                "wheel codes have no release event".to_string(),
            ))
        }
        (code, _) => {
            return Err(MappingError::Rejected(format!(
                "unknown mouse button code {code}"
            )))
        }
    };

    Ok(InputEvent::Mouse(MouseInput {
        dx: 0,
        dy: 0,
        data,
        flags,
    }))
}

/// Scales a `0.0..=1.0` fraction to the absolute coordinate space, clamping
/// values outside the range.
fn normalize_absolute(value: f64) -> Result<i32, MappingError> {
    if !value.is_finite() {
        return Err(MappingError::Rejected(format!(
            "pointer coordinate {value} is not finite"
        )));
    }
    round_to_i32(value.clamp(0.0, 1.0) * ABSOLUTE_RANGE)
}

fn round_to_i32(value: f64) -> Result<i32, MappingError> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < f64::from(i32::MIN) || rounded > f64::from(i32::MAX) {
        return Err(MappingError::Rejected(format!(
            "value {value} does not fit a 32-bit coordinate"
        )));
    }
    Ok(rounded as i32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
