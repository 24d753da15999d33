//! Transient notifications.
//!
//! Each toast is visible for [`TOAST_VISIBLE`], then fades for [`TOAST_FADE`]
//! and is removed. The two deferred steps are independent per toast and are
//! never cancelled; removal of a toast that is already gone is a no-op.

use std::time::Duration;

use core_types::{TimerKind, TimerRequest, ToastId};

pub const TOAST_VISIBLE: Duration = Duration::from_millis(5000);
pub const TOAST_FADE: Duration = Duration::from_millis(500);

pub const COMPLETION_MESSAGE: &str = "✅ Ad verification complete! Video will play now.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub text: String,
    pub phase: ToastPhase,
}

#[derive(Debug, Default)]
pub struct Toasts {
    next_id: ToastId,
    live: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a toast. The returned request schedules its fade.
    pub fn push(&mut self, text: impl Into<String>) -> (ToastId, TimerRequest) {
        self.next_id = self.next_id.wrapping_add(1).max(1);
        let id = self.next_id;
        self.live.push(Toast {
            id,
            text: text.into(),
            phase: ToastPhase::Visible,
        });
        (
            id,
            TimerRequest {
                kind: TimerKind::ToastFade { toast: id },
                delay: TOAST_VISIBLE,
            },
        )
    }

    /// Start fading. Returns the removal request, or `None` if the toast no
    /// longer exists.
    pub fn begin_fade(&mut self, id: ToastId) -> Option<TimerRequest> {
        let toast = self.live.iter_mut().find(|t| t.id == id)?;
        toast.phase = ToastPhase::Fading;
        Some(TimerRequest {
            kind: TimerKind::ToastRemove { toast: id },
            delay: TOAST_FADE,
        })
    }

    /// Returns `true` if something was removed.
    pub fn remove(&mut self, id: ToastId) -> bool {
        let before = self.live.len();
        self.live.retain(|t| t.id != id);
        before != self.live.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.live.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_lifecycle() {
        let mut toasts = Toasts::new();
        let (id, fade) = toasts.push("done");
        assert_eq!(fade.kind, TimerKind::ToastFade { toast: id });
        assert_eq!(fade.delay, TOAST_VISIBLE);

        let remove = toasts.begin_fade(id).unwrap();
        assert_eq!(remove.kind, TimerKind::ToastRemove { toast: id });
        assert_eq!(remove.delay, TOAST_FADE);
        assert_eq!(toasts.iter().next().unwrap().phase, ToastPhase::Fading);

        assert!(toasts.remove(id));
        assert!(toasts.is_empty());
    }

    #[test]
    fn removal_is_idempotent() {
        let mut toasts = Toasts::new();
        let (id, _) = toasts.push("done");
        assert!(toasts.remove(id));
        assert!(!toasts.remove(id));
        assert!(toasts.begin_fade(id).is_none());
    }

    #[test]
    fn toasts_are_independent() {
        let mut toasts = Toasts::new();
        let (a, _) = toasts.push("a");
        let (b, _) = toasts.push("b");
        assert_ne!(a, b);
        toasts.begin_fade(a);
        toasts.remove(a);
        let left: Vec<_> = toasts.iter().map(|t| t.id).collect();
        assert_eq!(left, vec![b]);
    }
}
