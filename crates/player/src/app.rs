use std::sync::mpsc;

use app_api::{RepaintHandle, UiApp};
use bus::{CoreCommand, CoreEvent};
use core_types::{Point, SurfaceId};
use egui::{Context, Event, OpenUrl, PointerButton};
use governor::{ClickDisposition, LinkClick, PageContext};

use crate::page::{PlayerPage, ViewAction};
use crate::params::PlayerParams;

/// Host page: owns the page context (page-wide hooks) and the player page
/// mounted in it.
pub struct PlayerApp {
    page_ctx: PageContext,
    page: PlayerPage,
    /// Where the primary button went down, until it comes back up.
    pressed_at: Option<Point>,
    exit: bool,
}

const SURFACE_ID: SurfaceId = 1;

impl PlayerApp {
    pub fn new(params: PlayerParams) -> Self {
        Self::with_page(PlayerPage::new(SURFACE_ID, params))
    }

    pub fn with_page(mut page: PlayerPage) -> Self {
        let mut page_ctx = PageContext::new();
        page.mount(&mut page_ctx);
        Self {
            page_ctx,
            page,
            pressed_at: None,
            exit: false,
        }
    }

    pub fn page(&self) -> &PlayerPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut PlayerPage {
        &mut self.page
    }

    pub fn page_context(&self) -> &PageContext {
        &self.page_ctx
    }

    /// Capturing-phase dispatch of primary clicks to every listening mount.
    pub fn dispatch_clicks(&mut self, clicks: &[Point]) {
        if !self.page_ctx.click_listeners().contains(&self.page.surface_id) {
            return;
        }
        for p in clicks {
            self.page.on_document_click(*p);
        }
    }

    /// Primary button edge. A release is a click only when the press started
    /// on the same target: inside the surface, or outside it.
    pub fn pointer_button(&mut self, pos: Point, pressed: bool) {
        if pressed {
            self.pressed_at = Some(pos);
            return;
        }
        let Some(origin) = self.pressed_at.take() else {
            return;
        };
        if self.same_target(origin, pos) {
            self.dispatch_clicks(&[pos]);
        }
    }

    fn same_target(&self, a: Point, b: Point) -> bool {
        match self.page.surface_rect() {
            Some(r) => r.contains(a) == r.contains(b),
            None => true,
        }
    }

    /// Navigate the frame (first load or reload): the host sees a load event.
    pub fn load_surface(&mut self) {
        self.page.on_surface_loaded();
    }

    pub fn apply(&mut self, action: ViewAction) {
        match action {
            ViewAction::Back => self.page.go_back(),
            ViewAction::CloseHelper => self.page.on_close_requested(),
            ViewAction::ReloadSurface => self.load_surface(),
            ViewAction::OpenLink(href) => {
                let d = self.page.on_link_click(&self.page_ctx, LinkClick::new_tab(&href));
                if d == ClickDisposition::Cancel {
                    log::info!(target: "player", "link blocked: {href}");
                }
            }
        }
    }
}

impl UiApp for PlayerApp {
    fn ui(&mut self, ctx: &Context) {
        // Clicks are looked at before any widget handles them; the surface
        // rect is the one laid out last frame.
        let buttons: Vec<(Point, bool)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|e| match e {
                    Event::PointerButton {
                        pos,
                        button: PointerButton::Primary,
                        pressed,
                        ..
                    } => Some((Point::new(pos.x, pos.y), *pressed)),
                    _ => None,
                })
                .collect()
        });
        for (pos, pressed) in buttons {
            self.pointer_button(pos, pressed);
        }

        if self.page.governor().is_some_and(|g| g.generation() == 0) {
            self.load_surface();
        }

        if let Some(action) = self.page.ui_content(ctx) {
            self.apply(action);
        }

        for url in self.page.take_pending_opens() {
            ctx.open_url(OpenUrl::new_tab(url));
        }

        if self.page.back_requested() {
            // No history behind the player page: back leaves the app.
            self.exit = true;
        }
    }

    fn set_bus_sender(&mut self, tx: mpsc::Sender<CoreCommand>) {
        self.page.set_bus_sender(tx);
    }

    fn on_core_event(&mut self, evt: CoreEvent) {
        if evt.surface_id() == self.page.surface_id {
            self.page.on_core_event(evt);
        }
    }

    fn set_repaint_handle(&mut self, h: RepaintHandle) {
        self.page.set_repaint_handle(h);
    }

    fn title(&self) -> String {
        self.page.meta().title.clone()
    }

    fn wants_exit(&self) -> bool {
        self.exit
    }

    fn on_exit(&mut self) {
        self.page.unmount(&mut self.page_ctx);
    }
}
