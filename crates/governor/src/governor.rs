use core_types::{LoadGen, Point, Rect, SurfaceId, TimerKind, TimerRequest};

use crate::hooks::PageContext;
use crate::policy::{BlockPolicy, BlockedDomains};
use crate::region::in_ad_button_region;
use crate::script::{INSTALL_SCRIPT_TYPE, SurfaceMessage, intercept_script};
use crate::state::{InteractionState, Phase};
use crate::surface::{EmbeddedSurface, InjectionOutcome};
use crate::{COMPLETION_THRESHOLD, OVERLAY_REVEAL_DELAY};

/// What a captured document click did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Outside the surface, or the governor is not listening.
    Ignored,
    /// Inside the surface but not a qualifying click.
    Observed,
    /// Qualifying click; the interaction is still in progress.
    Counted { count: u32 },
    /// Qualifying click that reached the threshold. The host shows the
    /// completion notification.
    Completed { count: u32 },
}

/// Interaction governor for one mounted player surface.
///
/// Invariants:
/// - `generation` increases on every surface load; deferred reveal checks
///   carry the generation they were scheduled for and are dropped when it is
///   no longer current.
/// - once `state.clicks_completed` is set, `state.overlay_visible` stays false
///   until the next load.
/// - the governor never swallows clicks on the surface; it only observes.
#[derive(Debug)]
pub struct Governor {
    domains: BlockedDomains,
    policy: BlockPolicy,
    state: InteractionState,
    generation: LoadGen,
    mounted: bool,
}

impl Governor {
    /// Build a governor for one mount. The domain list is fixed from here on.
    pub fn configure(domains: BlockedDomains) -> Self {
        let policy = BlockPolicy::new(&domains);
        log::debug!(
            target: "governor",
            "configured with {} blocked domain(s){}",
            domains.len(),
            if policy.blocks_everything() { ", blocking all" } else { "" }
        );
        Self {
            domains,
            policy,
            state: InteractionState::default(),
            generation: 0,
            mounted: false,
        }
    }

    // -- Mount lifecycle ---
    pub fn mount(&mut self, page: &mut PageContext, surface_id: SurfaceId) {
        page.install_intercept(&self.policy);
        page.add_click_listener(surface_id);
        self.mounted = true;
    }

    /// Detach from the page. Timers that are still in flight become no-ops.
    pub fn unmount(&mut self, page: &mut PageContext, surface_id: SurfaceId) {
        page.remove_click_listener(surface_id);
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // -- Surface events ---
    /// The surface finished loading. Returns the reveal check the host must
    /// schedule.
    pub fn on_surface_loaded(&mut self, surface: &mut dyn EmbeddedSurface) -> TimerRequest {
        self.generation = self.generation.wrapping_add(1);
        self.state.reset();
        log::debug!(target: "governor", "surface loaded (generation {})", self.generation);

        match intercept_script(&self.domains) {
            Ok(script) => ship_intercept(surface, script),
            Err(err) => log::warn!(target: "governor", "could not render intercept script: {err}"),
        }

        TimerRequest {
            kind: TimerKind::RevealOverlay {
                generation: self.generation,
            },
            delay: OVERLAY_REVEAL_DELAY,
        }
    }

    /// Deferred reveal check. Consults the state as it is now, not as it was
    /// when the check was scheduled. Returns `true` if the overlay was shown.
    pub fn on_reveal_timer(&mut self, generation: LoadGen) -> bool {
        if !self.mounted || generation != self.generation {
            log::trace!(target: "governor", "dropping stale reveal check ({generation})");
            return false;
        }
        let shown = self.state.show_overlay();
        if shown {
            log::debug!(target: "governor", "showing ad helper overlay");
        }
        shown
    }

    /// A click captured at the document before it reaches its target.
    pub fn on_document_click(&mut self, point: Point, surface: Rect) -> ClickOutcome {
        if !self.mounted || !surface.contains(point) {
            return ClickOutcome::Ignored;
        }
        if !self.state.overlay_visible || !in_ad_button_region(surface, point) {
            return ClickOutcome::Observed;
        }

        let completed = self.state.register_click();
        let count = self.state.click_count;
        log::debug!(target: "governor", "ad click registered: {count}/{COMPLETION_THRESHOLD}");
        if completed {
            log::info!(target: "governor", "ad clicks completed, hiding overlay");
            ClickOutcome::Completed { count }
        } else {
            ClickOutcome::Counted { count }
        }
    }

    /// Manual override from the helper's close button.
    pub fn on_close_requested(&mut self) {
        self.state.complete();
        log::debug!(target: "governor", "ad helper closed by user");
    }

    pub fn should_block_navigation(&self, target: &str) -> bool {
        self.policy.should_block(target)
    }

    // -- Accessors ---
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn generation(&self) -> LoadGen {
        self.generation
    }

    pub fn phase(&self) -> Phase {
        if self.generation == 0 {
            Phase::Loading
        } else if self.state.clicks_completed {
            Phase::Completed
        } else if self.state.click_count > 0 {
            Phase::InteractionInProgress
        } else {
            Phase::AwaitingInteraction
        }
    }
}

/// Injection first; the message goes out whatever the injection outcome was.
fn ship_intercept(surface: &mut dyn EmbeddedSurface, script: String) {
    match surface.inject_script(&script) {
        InjectionOutcome::Succeeded => {
            log::debug!(target: "governor", "intercept script injected into surface");
        }
        InjectionOutcome::Denied { reason } => {
            log::debug!(target: "governor", "surface refused script injection: {reason}");
        }
    }

    let message = SurfaceMessage {
        kind: INSTALL_SCRIPT_TYPE,
        script,
    };
    match surface.post_message(&message) {
        Ok(()) => log::debug!(target: "governor", "sent INSTALL_SCRIPT message to surface"),
        Err(err) => log::warn!(target: "governor", "could not message surface: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    const SURFACE: Rect = Rect::new(0.0, 0.0, 800.0, 450.0);
    // Centre of the ad region: (400, 270).
    const AD: Point = Point::new(400.0, 270.0);

    fn mounted() -> (Governor, PageContext) {
        let mut page = PageContext::new();
        let mut g = Governor::configure(BlockedDomains::builtin());
        g.mount(&mut page, 1);
        (g, page)
    }

    fn loaded_and_revealed() -> (Governor, PageContext) {
        let (mut g, page) = mounted();
        let req = g.on_surface_loaded(&mut RecordingSurface::cross_origin());
        let TimerKind::RevealOverlay { generation } = req.kind else {
            panic!("unexpected timer {req:?}");
        };
        assert!(g.on_reveal_timer(generation));
        (g, page)
    }

    #[test]
    fn starts_in_loading_phase() {
        let (g, _) = mounted();
        assert_eq!(g.phase(), Phase::Loading);
        assert!(!g.state().overlay_visible);
    }

    #[test]
    fn load_tries_injection_then_posts_message() {
        let (mut g, _) = mounted();
        let mut surface = RecordingSurface::cross_origin();
        let req = g.on_surface_loaded(&mut surface);

        assert_eq!(surface.injection_attempts, 1);
        assert!(surface.injected.is_empty());
        assert_eq!(surface.messages.len(), 1);
        assert_eq!(surface.messages[0].kind, "INSTALL_SCRIPT");
        assert_eq!(req.delay, OVERLAY_REVEAL_DELAY);
        assert_eq!(g.phase(), Phase::AwaitingInteraction);
        assert!(!g.state().overlay_visible);
    }

    #[test]
    fn shipped_script_carries_the_configured_list() {
        let mut page = PageContext::new();
        let mut g = Governor::configure(BlockedDomains::new(vec!["https://ads.test/".into()]));
        g.mount(&mut page, 1);
        let mut surface = RecordingSurface::cross_origin();
        g.on_surface_loaded(&mut surface);

        let script = &surface.messages[0].script;
        assert!(script.contains(r#"const blockedDomains = ["https://ads.test/"];"#));
        assert!(!script.contains("const blockedDomains = [];"));
    }

    #[test]
    fn message_failure_does_not_stop_load() {
        let (mut g, _) = mounted();
        let mut surface = RecordingSurface {
            detached: true,
            ..RecordingSurface::default()
        };
        let req = g.on_surface_loaded(&mut surface);
        assert!(matches!(req.kind, TimerKind::RevealOverlay { generation: 1 }));
        assert!(g.on_reveal_timer(1));
    }

    #[test]
    fn clicks_outside_region_or_hidden_overlay_do_not_count() {
        let (mut g, _) = mounted();
        g.on_surface_loaded(&mut RecordingSurface::cross_origin());

        // Overlay still hidden.
        assert_eq!(g.on_document_click(AD, SURFACE), ClickOutcome::Observed);
        assert!(g.on_reveal_timer(1));

        assert_eq!(
            g.on_document_click(Point::new(10.0, 10.0), SURFACE),
            ClickOutcome::Observed
        );
        assert_eq!(
            g.on_document_click(Point::new(900.0, 270.0), SURFACE),
            ClickOutcome::Ignored
        );
        assert_eq!(g.state().click_count, 0);
    }

    #[test]
    fn eight_qualifying_clicks_complete() {
        let (mut g, _) = loaded_and_revealed();
        for i in 1..COMPLETION_THRESHOLD {
            assert_eq!(
                g.on_document_click(AD, SURFACE),
                ClickOutcome::Counted { count: i }
            );
            assert_eq!(g.phase(), Phase::InteractionInProgress);
        }
        assert_eq!(
            g.on_document_click(AD, SURFACE),
            ClickOutcome::Completed { count: 8 }
        );
        assert_eq!(g.phase(), Phase::Completed);
        assert!(!g.state().overlay_visible);

        // Further clicks have no effect.
        assert_eq!(g.on_document_click(AD, SURFACE), ClickOutcome::Observed);
        assert_eq!(g.state().click_count, 8);
        assert!(!g.state().overlay_visible);
    }

    #[test]
    fn close_completes_at_zero_clicks() {
        let (mut g, _) = loaded_and_revealed();
        g.on_close_requested();
        assert_eq!(g.phase(), Phase::Completed);
        assert_eq!(g.state().click_count, 0);
        assert!(!g.state().overlay_visible);
    }

    #[test]
    fn close_before_reveal_keeps_overlay_hidden() {
        let (mut g, _) = mounted();
        g.on_surface_loaded(&mut RecordingSurface::cross_origin());
        g.on_close_requested();
        assert!(!g.on_reveal_timer(1));
        assert!(!g.state().overlay_visible);
    }

    #[test]
    fn reload_resets_and_supersedes_old_reveal() {
        let (mut g, _) = loaded_and_revealed();
        g.on_document_click(AD, SURFACE);
        g.on_close_requested();

        g.on_surface_loaded(&mut RecordingSurface::cross_origin());
        assert_eq!(g.generation(), 2);
        assert_eq!(*g.state(), InteractionState::default());
        assert_eq!(g.phase(), Phase::AwaitingInteraction);

        assert!(!g.on_reveal_timer(1));
        assert!(!g.state().overlay_visible);
        assert!(g.on_reveal_timer(2));
    }

    #[test]
    fn unmounted_governor_ignores_timers_and_clicks() {
        let (mut g, mut page) = mounted();
        g.on_surface_loaded(&mut RecordingSurface::cross_origin());
        g.unmount(&mut page, 1);

        assert!(!g.on_reveal_timer(1));
        assert!(!g.state().overlay_visible);
        assert_eq!(g.on_document_click(AD, SURFACE), ClickOutcome::Ignored);
        assert!(page.click_listeners().is_empty());
        // The page-wide intercept outlives the mount.
        assert!(page.intercept_installed());
    }

    #[test]
    fn classification_delegates_to_policy() {
        let (g, _) = mounted();
        assert!(g.should_block_navigation("https://pay4link.com/xyz?ref=1"));
        assert!(!g.should_block_navigation("https://example.com/"));

        let g = Governor::configure(BlockedDomains::new(Vec::new()));
        assert!(g.should_block_navigation("https://example.com/"));
    }
}
