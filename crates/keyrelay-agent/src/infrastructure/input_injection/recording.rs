//! Recording injector for tests and embedding.
//!
//! # Why a recording injector?
//!
//! The native injector makes OS calls that:
//!
//! - Require a desktop session to run.
//! - Actually press keys on the machine running the tests.
//! - Cannot be observed directly from Rust test code.
//!
//! `RecordingInjector` replaces the OS call with an in-memory push so
//! assertions can inspect exactly what was injected and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let injector = Arc::new(RecordingInjector::new());
//! let dispatcher = EventDispatcher::new(injector.clone());
//!
//! dispatcher.dispatch(&Command::key_down(65));
//!
//! assert_eq!(injector.events(), vec![InputEvent::key(65, false)]);
//! ```

use std::sync::{Mutex, PoisonError};

use keyrelay_core::InputEvent;

use crate::application::dispatch_command::{InjectionError, InputInjector};

/// An injector that records every event instead of calling the OS.
#[derive(Default)]
pub struct RecordingInjector {
    events: Mutex<Vec<InputEvent>>,
    /// When `true`, every call records the event and then returns
    /// `InjectionError::Platform`.
    should_fail: bool,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// An injector whose every call fails, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Snapshot of the events seen so far, oldest first.
    pub fn events(&self) -> Vec<InputEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl InputInjector for RecordingInjector {
    fn inject(&self, event: &InputEvent) -> Result<(), InjectionError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(*event);
        if self.should_fail {
            return Err(InjectionError::Platform("recording injector set to fail".into()));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
