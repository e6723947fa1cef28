//! Dry-run injector: logs events instead of delivering them.
//!
//! Selected with `--dry-run`.  Useful for checking what a controller sends
//! without touching the local keyboard and mouse.

use keyrelay_core::InputEvent;
use tracing::info;

use crate::application::dispatch_command::{InjectionError, InputInjector};

#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunInjector;

impl InputInjector for DryRunInjector {
    fn inject(&self, event: &InputEvent) -> Result<(), InjectionError> {
        match event {
            InputEvent::Keyboard(k) => info!(
                "dry-run: keyboard vk=0x{:02X} flags={:?}",
                k.virtual_key, k.flags
            ),
            InputEvent::Mouse(m) => info!(
                "dry-run: mouse dx={} dy={} data={} flags={:?}",
                m.dx, m.dy, m.data, m.flags
            ),
        }
        Ok(())
    }
}
