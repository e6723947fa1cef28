//! Input injection implementations.
//!
//! The native implementation is selected at compile time via
//! `#[cfg(target_os = ...)]`; see [`platform_injector`].

use std::sync::Arc;

use crate::application::dispatch_command::InputInjector;

pub mod dry_run;
pub mod recording;
pub mod unavailable;

#[cfg(target_os = "windows")]
pub mod send_input;

/// Returns the injector for the host OS.
///
/// Virtual key codes on the wire are Windows codes, so only Windows has a
/// native backend.  Elsewhere every injection reports
/// [`crate::application::dispatch_command::InjectionError::Unavailable`];
/// run with `--dry-run` to exercise the protocol on those hosts.
pub fn platform_injector() -> Arc<dyn InputInjector> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(send_input::SendInputInjector::new())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Arc::new(unavailable::UnavailableInjector::new(std::env::consts::OS))
    }
}
