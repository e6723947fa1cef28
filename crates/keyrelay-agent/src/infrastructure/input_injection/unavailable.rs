//! Injector for hosts without a native backend.

use keyrelay_core::InputEvent;

use crate::application::dispatch_command::{InjectionError, InputInjector};

/// Fails every call with [`InjectionError::Unavailable`].
///
/// The request loop keeps running; each keyboard command is answered with a
/// `failed` reply.
#[derive(Debug, Clone)]
pub struct UnavailableInjector {
    platform: String,
}

impl UnavailableInjector {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
        }
    }
}

impl InputInjector for UnavailableInjector {
    fn inject(&self, _event: &InputEvent) -> Result<(), InjectionError> {
        Err(InjectionError::Unavailable(format!(
            "no native injector for {}",
            self.platform
        )))
    }
}
