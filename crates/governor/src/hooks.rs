//! Page-wide navigation hooks.
//!
//! Two hooks live on the host page rather than on a single mount:
//! - the new-window override, installed once per page and never removed;
//!   when it classifies a target as blocked it hands back an inert window
//!   instead of opening anything
//! - the capturing link-click hook, installed together with the override,
//!   which cancels clicks on new-surface links whose target is blocked
//!
//! The page also keeps the list of per-mount document click listeners so the
//! host knows which governors to feed captured clicks to.

use core_types::SurfaceId;

use crate::policy::BlockPolicy;

/// The real new-window primitive the override wraps.
pub trait WindowOpener {
    /// Returns `false` if the host could not open anything.
    fn open(&mut self, url: &str, target: Option<&str>) -> bool;
}

/// Harmless stand-in returned for blocked `open` calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InertWindow {
    closed: bool,
}

impl InertWindow {
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenedWindow {
    Inert(InertWindow),
    Opened,
    /// Passed through to the real opener, which refused.
    Failed,
}

impl OpenedWindow {
    pub fn was_blocked(&self) -> bool {
        matches!(self, OpenedWindow::Inert(_))
    }
}

/// The anchor-like element a click resolved to, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LinkClick<'a> {
    pub href: Option<&'a str>,
    pub target: Option<&'a str>,
    pub rel: Option<&'a str>,
}

impl<'a> LinkClick<'a> {
    pub fn new_tab(href: &'a str) -> Self {
        Self {
            href: Some(href),
            target: Some("_blank"),
            rel: None,
        }
    }

    /// `target="_blank"` or `rel="noopener"`.
    pub fn opens_new_surface(&self) -> bool {
        self.target == Some("_blank") || self.rel == Some("noopener")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickDisposition {
    Proceed,
    /// Default action prevented and propagation stopped.
    Cancel,
}

/// Host page context. One per page; owns the init-once flags.
#[derive(Clone, Debug, Default)]
pub struct PageContext {
    intercept: Option<BlockPolicy>,
    click_listeners: Vec<SurfaceId>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the new-window override and the link-click hook.
    ///
    /// Only the first call has an effect; later calls return `false` and keep
    /// the policy that was installed first.
    pub fn install_intercept(&mut self, policy: &BlockPolicy) -> bool {
        if self.intercept.is_some() {
            log::debug!(target: "governor.hooks", "navigation intercept already installed");
            return false;
        }
        self.intercept = Some(policy.clone());
        log::debug!(target: "governor.hooks", "navigation intercept installed");
        true
    }

    pub fn intercept_installed(&self) -> bool {
        self.intercept.is_some()
    }

    /// The page's `window.open`.
    pub fn window_open(
        &self,
        url: &str,
        target: Option<&str>,
        opener: &mut dyn WindowOpener,
    ) -> OpenedWindow {
        if let Some(policy) = &self.intercept {
            if !url.is_empty() && policy.should_block(url) {
                log::info!(target: "governor.hooks", "blocked new window for {url}");
                return OpenedWindow::Inert(InertWindow::default());
            }
        }
        log::debug!(target: "governor.hooks", "allowing new window for {url}");
        if opener.open(url, target) {
            OpenedWindow::Opened
        } else {
            OpenedWindow::Failed
        }
    }

    /// Capturing-phase link check, run before the click reaches the link.
    pub fn capture_link_click(&self, link: &LinkClick<'_>) -> ClickDisposition {
        let (Some(policy), Some(href)) = (&self.intercept, link.href) else {
            return ClickDisposition::Proceed;
        };
        if href.is_empty() || !link.opens_new_surface() {
            return ClickDisposition::Proceed;
        }
        if policy.should_block(href) {
            log::info!(target: "governor.hooks", "prevented new-tab link to {href}");
            return ClickDisposition::Cancel;
        }
        ClickDisposition::Proceed
    }

    pub fn add_click_listener(&mut self, surface_id: SurfaceId) {
        if !self.click_listeners.contains(&surface_id) {
            self.click_listeners.push(surface_id);
        }
    }

    pub fn remove_click_listener(&mut self, surface_id: SurfaceId) {
        self.click_listeners.retain(|id| *id != surface_id);
    }

    pub fn click_listeners(&self) -> &[SurfaceId] {
        &self.click_listeners
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::BlockedDomains;

    #[derive(Default)]
    struct Opener {
        opened: Vec<String>,
        refuse: bool,
    }

    impl WindowOpener for Opener {
        fn open(&mut self, url: &str, _target: Option<&str>) -> bool {
            if self.refuse {
                return false;
            }
            self.opened.push(url.to_string());
            true
        }
    }

    fn pay4link() -> BlockPolicy {
        BlockPolicy::new(&BlockedDomains::builtin())
    }

    #[test]
    fn install_is_init_once() {
        let mut page = PageContext::new();
        assert!(page.install_intercept(&pay4link()));
        assert!(!page.install_intercept(&BlockPolicy::new(&BlockedDomains::new(Vec::new()))));

        // First policy stays in force.
        let mut opener = Opener::default();
        let w = page.window_open("https://example.com/", None, &mut opener);
        assert_eq!(w, OpenedWindow::Opened);
    }

    #[test]
    fn blocked_open_returns_inert_window() {
        let mut page = PageContext::new();
        page.install_intercept(&pay4link());
        let mut opener = Opener::default();

        let w = page.window_open("https://pay4link.com/ad", Some("_blank"), &mut opener);
        let OpenedWindow::Inert(mut inert) = w else {
            panic!("expected inert window, got {w:?}");
        };
        assert!(!inert.is_closed());
        inert.close();
        assert!(inert.is_closed());
        assert!(opener.opened.is_empty());
    }

    #[test]
    fn open_without_override_passes_through() {
        let page = PageContext::new();
        let mut opener = Opener::default();
        let w = page.window_open("https://pay4link.com/ad", None, &mut opener);
        assert_eq!(w, OpenedWindow::Opened);
        assert_eq!(opener.opened, vec!["https://pay4link.com/ad".to_string()]);

        opener.refuse = true;
        let w = page.window_open("https://example.com/", None, &mut opener);
        assert_eq!(w, OpenedWindow::Failed);
    }

    #[test]
    fn empty_url_is_never_blocked() {
        let mut page = PageContext::new();
        page.install_intercept(&BlockPolicy::new(&BlockedDomains::new(Vec::new())));
        let mut opener = Opener::default();
        assert_eq!(page.window_open("", None, &mut opener), OpenedWindow::Opened);
    }

    #[test]
    fn link_capture_only_cancels_new_surface_links() {
        let mut page = PageContext::new();
        page.install_intercept(&pay4link());

        let blocked = LinkClick::new_tab("https://pay4link.com/x");
        assert_eq!(page.capture_link_click(&blocked), ClickDisposition::Cancel);

        let same_tab = LinkClick {
            href: Some("https://pay4link.com/x"),
            target: None,
            rel: None,
        };
        assert_eq!(page.capture_link_click(&same_tab), ClickDisposition::Proceed);

        let noopener = LinkClick {
            href: Some("https://pay4link.com/x"),
            target: None,
            rel: Some("noopener"),
        };
        assert_eq!(page.capture_link_click(&noopener), ClickDisposition::Cancel);

        let allowed = LinkClick::new_tab("https://example.com/");
        assert_eq!(page.capture_link_click(&allowed), ClickDisposition::Proceed);

        assert_eq!(
            page.capture_link_click(&LinkClick::default()),
            ClickDisposition::Proceed
        );
    }

    #[test]
    fn click_listeners_are_tracked_per_surface() {
        let mut page = PageContext::new();
        page.add_click_listener(1);
        page.add_click_listener(1);
        page.add_click_listener(2);
        assert_eq!(page.click_listeners(), &[1, 2]);
        page.remove_click_listener(1);
        assert_eq!(page.click_listeners(), &[2]);
    }
}
