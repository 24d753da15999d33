use std::sync::Arc;
use std::sync::mpsc;

use bus::{CoreCommand, CoreEvent};
use egui::Context;

/// Asks the host to run another UI pass as soon as possible.
#[derive(Clone)]
pub struct RepaintHandle(Arc<dyn Fn() + Send + Sync>);

impl RepaintHandle {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn request_now(&self) {
        (self.0)();
    }
}

impl std::fmt::Debug for RepaintHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RepaintHandle")
    }
}

pub trait UiApp {
    fn ui(&mut self, ctx: &Context);
    fn set_bus_sender(&mut self, tx: mpsc::Sender<CoreCommand>);
    fn on_core_event(&mut self, evt: CoreEvent);
    fn set_repaint_handle(&mut self, h: RepaintHandle);

    /// Window title the host should show.
    fn title(&self) -> String;

    /// `true` once the app wants the host to exit (e.g. "back" from the only page).
    fn wants_exit(&self) -> bool {
        false
    }

    /// Called once before the host shuts down.
    fn on_exit(&mut self) {}
}
