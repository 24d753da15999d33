//! Native stand-in for the player's cross-origin frame.
//!
//! The desktop host cannot run the third-party document, so this surface
//! behaves the way a real cross-origin frame does toward the host page:
//! script injection is always denied, and messages are handed off without any
//! way of knowing whether the other side handles them.

use governor::{EmbeddedSurface, InjectionOutcome, SurfaceError, SurfaceMessage};
use url::Url;

#[derive(Debug)]
pub struct FrameSurface {
    src: String,
    posted: usize,
}

impl FrameSurface {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            posted: 0,
        }
    }

    pub fn origin(&self) -> String {
        Url::parse(&self.src)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|_| "null".to_string())
    }

    /// Messages handed off so far.
    pub fn posted(&self) -> usize {
        self.posted
    }
}

impl EmbeddedSurface for FrameSurface {
    fn inject_script(&mut self, _source: &str) -> InjectionOutcome {
        InjectionOutcome::denied(format!(
            "blocked a frame with origin \"{}\" from being scripted by the host",
            self.origin()
        ))
    }

    fn post_message(&mut self, message: &SurfaceMessage) -> Result<(), SurfaceError> {
        let payload = message.to_json()?;
        self.posted += 1;
        log::debug!(
            target: "player.surface",
            "posted {} ({} bytes) to {}",
            message.kind,
            payload.len(),
            self.origin()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::BlockedDomains;

    #[test]
    fn injection_is_denied() {
        let mut s = FrameSurface::new("https://www.1024terabox.com/sharing/embed?surl=x");
        let outcome = s.inject_script("void 0");
        assert!(!outcome.succeeded());
        assert_eq!(s.origin(), "https://www.1024terabox.com");
    }

    #[test]
    fn messages_are_handed_off() {
        let mut s = FrameSurface::new("https://www.1024terabox.com/sharing/embed?surl=x");
        s.post_message(&SurfaceMessage::install_script(&BlockedDomains::builtin()).unwrap())
            .unwrap();
        assert_eq!(s.posted(), 1);
    }
}
