//! The input event descriptor handed to the injection capability.
//!
//! An [`InputEvent`] is built fresh for every command, passed to the injector
//! once, and dropped.  The variant tag is the device class; each variant
//! carries only the fields that device needs.
//!
//! # Flag values
//!
//! [`KeyboardFlags`] and [`MouseFlags`] use the Win32 `KEYEVENTF_*` and
//! `MOUSEEVENTF_*` bit values so the Windows injector can pass
//! [`KeyboardFlags::bits`] straight through.  Other platforms only read the
//! named members.

use bitflags::bitflags;

bitflags! {
    /// Flags for a keyboard event.  The empty set means "key down".
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeyboardFlags: u32 {
        const EXTENDED_KEY = 0x0001;
        const KEY_UP       = 0x0002;
        const UNICODE      = 0x0004;
        const SCAN_CODE    = 0x0008;
    }
}

bitflags! {
    /// Flags for a mouse event.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MouseFlags: u32 {
        const MOVE             = 0x0001;
        const LEFT_DOWN        = 0x0002;
        const LEFT_UP          = 0x0004;
        const RIGHT_DOWN       = 0x0008;
        const RIGHT_UP         = 0x0010;
        const MIDDLE_DOWN      = 0x0020;
        const MIDDLE_UP        = 0x0040;
        const X_DOWN           = 0x0080;
        const X_UP             = 0x0100;
        const WHEEL            = 0x0800;
        const HWHEEL           = 0x1000;
        const MOVE_NO_COALESCE = 0x2000;
        const VIRTUAL_DESK     = 0x4000;
        const ABSOLUTE         = 0x8000;
    }
}

/// Which physical device an event imitates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Keyboard,
    Mouse,
}

/// Keyboard payload of an [`InputEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardInput {
    /// Windows virtual key code.
    pub virtual_key: u16,
    /// Hardware scan code; only meaningful with [`KeyboardFlags::SCAN_CODE`].
    pub scan_code: u16,
    pub flags: KeyboardFlags,
}

/// Mouse payload of an [`InputEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    /// Horizontal movement: pixels when relative, `0..=65535` when [`MouseFlags::ABSOLUTE`].
    pub dx: i32,
    /// Vertical movement, same units as `dx`.
    pub dy: i32,
    /// Wheel delta for [`MouseFlags::WHEEL`]/[`MouseFlags::HWHEEL`], X-button
    /// selector for [`MouseFlags::X_DOWN`]/[`MouseFlags::X_UP`], otherwise `0`.
    pub data: i32,
    pub flags: MouseFlags,
}

/// A single synthetic input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Keyboard(KeyboardInput),
    Mouse(MouseInput),
}

impl InputEvent {
    /// A key press or release for `virtual_key` with no other flags.
    pub fn key(virtual_key: u16, key_up: bool) -> Self {
        let flags = if key_up {
            KeyboardFlags::KEY_UP
        } else {
            KeyboardFlags::empty()
        };
        InputEvent::Keyboard(KeyboardInput {
            virtual_key,
            scan_code: 0,
            flags,
        })
    }

    pub fn device_class(&self) -> DeviceClass {
        match self {
            InputEvent::Keyboard(_) => DeviceClass::Keyboard,
            InputEvent::Mouse(_) => DeviceClass::Mouse,
        }
    }

    /// The virtual key for keyboard events, the mouse data word for mouse events.
    pub fn primary_value(&self) -> i32 {
        match self {
            InputEvent::Keyboard(k) => i32::from(k.virtual_key),
            InputEvent::Mouse(m) => m.data,
        }
    }

    /// Movement carried by the event; only mouse move events have one.
    pub fn position(&self) -> Option<(i32, i32)> {
        match self {
            InputEvent::Mouse(m) if m.flags.contains(MouseFlags::MOVE) => Some((m.dx, m.dy)),
            _ => None,
        }
    }

    /// Raw flag bits, whichever device class this is.
    pub fn flag_bits(&self) -> u32 {
        match self {
            InputEvent::Keyboard(k) => k.flags.bits(),
            InputEvent::Mouse(m) => m.flags.bits(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
