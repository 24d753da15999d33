//! The embedded player surface as seen from the host page.
//!
//! Hosts implement [`EmbeddedSurface`] for whatever actually renders the
//! third-party player. The governor only ever tries it out; it never relies on a
//! reply.

use thiserror::Error;

use crate::script::SurfaceMessage;

/// Result of trying to run script inside the surface's document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InjectionOutcome {
    Succeeded,
    /// Blocked by origin isolation (or anything else). This is the normal
    /// outcome for a third-party player and is not an error.
    Denied { reason: String },
}

impl InjectionOutcome {
    pub fn denied(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: reason.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface has no content window")]
    Detached,
    #[error("could not encode surface message: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait EmbeddedSurface {
    /// Same-origin script injection attempt.
    fn inject_script(&mut self, source: &str) -> InjectionOutcome;

    /// Fire-and-forget structured message. `Ok` only means it was handed off.
    fn post_message(&mut self, message: &SurfaceMessage) -> Result<(), SurfaceError>;
}

/// Surface that records what was sent to it. Used by tests and by hosts that
/// have no real frame to talk to.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    /// When set, injection succeeds instead of being denied.
    pub same_origin: bool,
    /// When set, `post_message` fails with [`SurfaceError::Detached`].
    pub detached: bool,
    pub injected: Vec<String>,
    pub messages: Vec<SurfaceMessage>,
    pub injection_attempts: usize,
}

impl RecordingSurface {
    pub fn cross_origin() -> Self {
        Self::default()
    }

    pub fn same_origin() -> Self {
        Self {
            same_origin: true,
            ..Self::default()
        }
    }
}

impl EmbeddedSurface for RecordingSurface {
    fn inject_script(&mut self, source: &str) -> InjectionOutcome {
        self.injection_attempts += 1;
        if self.same_origin {
            self.injected.push(source.to_string());
            InjectionOutcome::Succeeded
        } else {
            InjectionOutcome::denied("blocked a frame from accessing a cross-origin frame")
        }
    }

    fn post_message(&mut self, message: &SurfaceMessage) -> Result<(), SurfaceError> {
        if self.detached {
            return Err(SurfaceError::Detached);
        }
        self.messages.push(message.clone());
        Ok(())
    }
}
