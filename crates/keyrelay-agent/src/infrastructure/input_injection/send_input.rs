//! Windows input injection via the SendInput API.
//!
//! The platform-neutral [`InputEvent`] is turned into a single `INPUT`
//! structure here and nowhere else.  Flag bits are passed through unchanged
//! because `KeyboardFlags`/`MouseFlags` use the `KEYEVENTF_*` and
//! `MOUSEEVENTF_*` values.

#![cfg(target_os = "windows")]

use keyrelay_core::InputEvent;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};

use crate::application::dispatch_command::{InjectionError, InputInjector};

/// Windows implementation of [`InputInjector`] using SendInput.
pub struct SendInputInjector;

impl SendInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SendInputInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for SendInputInjector {
    fn inject(&self, event: &InputEvent) -> Result<(), InjectionError> {
        let input = to_win32_input(event);

        // SAFETY: input is a fully initialised INPUT structure on the stack and
        // cbsize matches its type.
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };

        if sent == 1 {
            Ok(())
        } else {
            // SendInput returns 0 when the event was blocked by another thread
            // or by UIPI; the reason is in the thread's last-error value.
            Err(InjectionError::Platform(
                windows::core::Error::from_win32().to_string(),
            ))
        }
    }
}

/// Builds the `INPUT` union for one event.
fn to_win32_input(event: &InputEvent) -> INPUT {
    match event {
        InputEvent::Keyboard(k) => INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(k.virtual_key),
                    wScan: k.scan_code,
                    dwFlags: KEYBD_EVENT_FLAGS(k.flags.bits()),
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        },
        InputEvent::Mouse(m) => INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: m.dx,
                    dy: m.dy,
                    // Wheel deltas are signed; the field type differs between
                    // binding versions, so let the cast follow it.
                    mouseData: m.data as _,
                    dwFlags: MOUSE_EVENT_FLAGS(m.flags.bits()),
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        },
    }
}
