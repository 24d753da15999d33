//! Player page orchestration.
//!
//! Invariants:
//! - the page owns at most one [`Governor`]; it is `None` when the page was
//!   opened without a video id, in which case only the error view renders
//! - every deferred step goes out as a `ScheduleTimer` command and comes back
//!   as `TimerFired`; the page re-checks current state when it fires, and the
//!   governor drops reveal checks from older load generations
//! - clicks on the surface are observed, never consumed

use std::sync::mpsc;

use app_api::RepaintHandle;
use bus::{CoreCommand, CoreEvent};
use core_types::{Point, Rect, SurfaceId, TimerId, TimerKind, TimerRequest};
use governor::{
    ClickDisposition, ClickOutcome, EmbeddedSurface, Governor, InteractionState, LinkClick,
    OpenedWindow, PageContext, Phase, Toasts, WindowOpener, toast::COMPLETION_MESSAGE,
};

use crate::embed::embed_url;
use crate::meta::PageMeta;
use crate::params::PlayerParams;
use crate::surface::FrameSurface;

mod ui;

pub use ui::ViewAction;

pub struct PlayerPage {
    pub surface_id: SurfaceId,

    params: PlayerParams,
    meta: PageMeta,
    embed_url: Option<String>,

    governor: Option<Governor>,
    surface: Box<dyn EmbeddedSurface>,
    /// Where the surface was laid out last frame, in logical points.
    surface_rect: Option<Rect>,
    toasts: Toasts,

    next_timer_id: TimerId,
    cmd_tx: Option<mpsc::Sender<CoreCommand>>,
    repaint: Option<RepaintHandle>,

    /// URLs the page let through, waiting for the host to open them.
    pending_opens: Vec<String>,
    back_requested: bool,
}

impl PlayerPage {
    /// Page with the native frame stand-in as its surface.
    pub fn new(surface_id: SurfaceId, params: PlayerParams) -> Self {
        let embed = params
            .video_id
            .as_deref()
            .and_then(|id| match embed_url(id, params.autoplay, params.mute) {
                Ok(url) => Some(url),
                Err(err) => {
                    log::error!(target: "player", "error setting player URL: {err}");
                    None
                }
            });
        let surface = FrameSurface::new(embed.clone().unwrap_or_default());
        Self::with_surface(surface_id, params, embed, Box::new(surface))
    }

    pub fn with_surface(
        surface_id: SurfaceId,
        params: PlayerParams,
        embed_url: Option<String>,
        surface: Box<dyn EmbeddedSurface>,
    ) -> Self {
        let meta = PageMeta::new(&params, embed_url.as_deref());
        let governor = if params.has_video() {
            if let Some(url) = &embed_url {
                log::info!(target: "player", "using TeraBox embed URL: {url}");
            }
            Some(Governor::configure(params.blocked_domains.clone()))
        } else {
            log::error!(target: "player", "no video ID provided");
            None
        };
        Self {
            surface_id,
            params,
            meta,
            embed_url,
            governor,
            surface,
            surface_rect: None,
            toasts: Toasts::new(),
            next_timer_id: 0,
            cmd_tx: None,
            repaint: None,
            pending_opens: Vec::new(),
            back_requested: false,
        }
    }

    // -- Setup Methods ---
    pub fn set_bus_sender(&mut self, tx: mpsc::Sender<CoreCommand>) {
        self.cmd_tx = Some(tx);
    }

    pub fn set_repaint_handle(&mut self, h: RepaintHandle) {
        self.repaint = Some(h);
    }

    // -- Lifecycle ---
    pub fn mount(&mut self, page: &mut PageContext) {
        if let Some(g) = self.governor.as_mut() {
            g.mount(page, self.surface_id);
        }
    }

    pub fn unmount(&mut self, page: &mut PageContext) {
        if let Some(g) = self.governor.as_mut() {
            g.unmount(page, self.surface_id);
        }
    }

    /// The frame fired its load event (first load or reload).
    pub fn on_surface_loaded(&mut self) {
        let Some(g) = self.governor.as_mut() else {
            return;
        };
        log::info!(target: "player", "iframe loaded");
        let reveal = g.on_surface_loaded(self.surface.as_mut());
        self.schedule(reveal);
        self.poke_redraw();
    }

    // -- Event Handling ---
    pub fn on_core_event(&mut self, evt: CoreEvent) {
        match evt {
            CoreEvent::TimerFired {
                surface_id, kind, ..
            } if surface_id == self.surface_id => self.on_timer(kind),
            _ => {}
        }
    }

    fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::RevealOverlay { generation } => {
                let shown = self
                    .governor
                    .as_mut()
                    .is_some_and(|g| g.on_reveal_timer(generation));
                if shown {
                    log::info!(target: "player", "showing ad helper overlay after timeout");
                }
            }
            TimerKind::ToastFade { toast } => {
                if let Some(remove) = self.toasts.begin_fade(toast) {
                    self.schedule(remove);
                }
            }
            TimerKind::ToastRemove { toast } => {
                self.toasts.remove(toast);
            }
        }
        self.poke_redraw();
    }

    /// Click captured at the document, before any widget sees it.
    pub fn on_document_click(&mut self, point: Point) -> ClickOutcome {
        let (Some(g), Some(rect)) = (self.governor.as_mut(), self.surface_rect) else {
            return ClickOutcome::Ignored;
        };
        let outcome = g.on_document_click(point, rect);
        match outcome {
            ClickOutcome::Completed { .. } => self.show_success_notification(),
            ClickOutcome::Counted { .. } => self.poke_redraw(),
            ClickOutcome::Observed => {
                log::trace!(target: "player", "captured click inside iframe");
            }
            ClickOutcome::Ignored => {}
        }
        outcome
    }

    pub fn on_close_requested(&mut self) {
        if let Some(g) = self.governor.as_mut() {
            g.on_close_requested();
            self.poke_redraw();
        }
    }

    /// The page's `window.open`, routed through the page-wide override.
    pub fn open_window(
        &mut self,
        page: &PageContext,
        url: &str,
        target: Option<&str>,
    ) -> OpenedWindow {
        let mut opener = QueueOpener(&mut self.pending_opens);
        page.window_open(url, target, &mut opener)
    }

    /// Click on a link the page renders.
    pub fn on_link_click(&mut self, page: &PageContext, link: LinkClick<'_>) -> ClickDisposition {
        let disposition = page.capture_link_click(&link);
        if disposition == ClickDisposition::Proceed {
            if let Some(href) = link.href {
                self.pending_opens.push(href.to_string());
            }
        }
        disposition
    }

    pub fn go_back(&mut self) {
        self.back_requested = true;
    }

    pub fn take_pending_opens(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_opens)
    }

    // -- Accessors ---
    pub fn back_requested(&self) -> bool {
        self.back_requested
    }

    pub fn params(&self) -> &PlayerParams {
        &self.params
    }

    pub fn meta(&self) -> &PageMeta {
        &self.meta
    }

    pub fn embed_url(&self) -> Option<&str> {
        self.embed_url.as_deref()
    }

    pub fn governor(&self) -> Option<&Governor> {
        self.governor.as_ref()
    }

    pub fn state(&self) -> Option<&InteractionState> {
        self.governor.as_ref().map(|g| g.state())
    }

    pub fn phase(&self) -> Option<Phase> {
        self.governor.as_ref().map(|g| g.phase())
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn surface_rect(&self) -> Option<Rect> {
        self.surface_rect
    }

    pub fn set_surface_rect(&mut self, rect: Rect) {
        self.surface_rect = Some(rect);
    }

    // -- Internal Helpers ---
    fn show_success_notification(&mut self) {
        let (_, fade) = self.toasts.push(COMPLETION_MESSAGE);
        self.schedule(fade);
        self.poke_redraw();
    }

    fn schedule(&mut self, req: TimerRequest) {
        self.next_timer_id = self.next_timer_id.wrapping_add(1);
        self.send_cmd(CoreCommand::ScheduleTimer {
            surface_id: self.surface_id,
            timer_id: self.next_timer_id,
            kind: req.kind,
            delay: req.delay,
        });
    }

    fn send_cmd(&self, cmd: CoreCommand) {
        match &self.cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    log::warn!(target: "player", "timer runtime is gone; dropping command");
                }
            }
            None => log::warn!(target: "player", "no bus sender set; dropping {cmd:?}"),
        }
    }

    fn poke_redraw(&self) {
        if let Some(repaint) = &self.repaint {
            repaint.request_now();
        }
    }
}

struct QueueOpener<'a>(&'a mut Vec<String>);

impl WindowOpener for QueueOpener<'_> {
    fn open(&mut self, url: &str, _target: Option<&str>) -> bool {
        self.0.push(url.to_string());
        true
    }
}
