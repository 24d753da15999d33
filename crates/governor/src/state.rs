//! Per-load interaction state.

use crate::COMPLETION_THRESHOLD;

/// Coarse phase derived from [`InteractionState`] and the load status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// The surface has not reported a load yet.
    Loading,
    /// Loaded, no qualifying click so far.
    AwaitingInteraction,
    /// At least one qualifying click, threshold not reached.
    InteractionInProgress,
    /// Threshold reached or the user closed the helper. Terminal until the
    /// next surface load.
    Completed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionState {
    /// Qualifying clicks in this load. Not clamped at the threshold.
    pub click_count: u32,
    pub clicks_completed: bool,
    pub overlay_visible: bool,
}

impl InteractionState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn show_overlay(&mut self) -> bool {
        if self.clicks_completed || self.overlay_visible {
            return false;
        }
        self.overlay_visible = true;
        true
    }

    /// Count one qualifying click. Returns `true` when this click completed
    /// the interaction.
    pub fn register_click(&mut self) -> bool {
        self.click_count = self.click_count.saturating_add(1);
        if self.click_count >= COMPLETION_THRESHOLD && !self.clicks_completed {
            self.complete();
            return true;
        }
        false
    }

    /// Mark the interaction done and hide the overlay for the rest of the load.
    pub fn complete(&mut self) {
        self.clicks_completed = true;
        self.overlay_visible = false;
    }

    /// Clicks still needed, for progress display.
    pub fn remaining(&self) -> u32 {
        COMPLETION_THRESHOLD.saturating_sub(self.click_count)
    }
}
