use core_types::{SurfaceId, TimerId, TimerKind};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

#[derive(Debug)]
pub enum CoreCommand {
    // Timers
    ScheduleTimer {
        surface_id: SurfaceId,
        timer_id: TimerId,
        kind: TimerKind,
        delay: Duration,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    // Timer runtime -> UI
    TimerFired {
        surface_id: SurfaceId,
        timer_id: TimerId,
        kind: TimerKind,
    },
}

impl CoreEvent {
    pub fn surface_id(&self) -> SurfaceId {
        match self {
            CoreEvent::TimerFired { surface_id, .. } => *surface_id,
        }
    }
}

pub struct Bus {
    pub cmd_tx: Sender<CoreCommand>,
    pub evt_rx: Receiver<CoreEvent>,
    pub evt_tx: Sender<CoreEvent>, // shareable for runtimes
}

impl Bus {
    /// Creates the UI side of the bus plus the command receiver a runtime consumes.
    pub fn new() -> (Self, Receiver<CoreCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (evt_tx, evt_rx) = mpsc::channel();
        (
            Self {
                cmd_tx,
                evt_rx,
                evt_tx,
            },
            cmd_rx,
        )
    }
}
