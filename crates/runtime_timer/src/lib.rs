// crates/runtime_timer/src/lib.rs
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use bus::{CoreCommand, CoreEvent};
use core_types::{SurfaceId, TimerId, TimerKind};

/// Called after every fired batch so the UI loop wakes up and drains events.
pub type WakeFn = Box<dyn Fn() + Send + 'static>;

struct Pending {
    surface_id: SurfaceId,
    timer_id: TimerId,
    kind: TimerKind,
}

// Min-heap on (deadline, insertion seq) so equal deadlines fire FIFO.
type Queue = BinaryHeap<Reverse<(Instant, u64)>>;

/// One-shot timers. Every scheduled timer fires exactly once, at or after its
/// deadline; there is no cancellation, owners ignore timers they no longer
/// care about.
pub fn start_timer_runtime(
    cmd_rx: Receiver<CoreCommand>,
    evt_tx: Sender<CoreEvent>,
    wake: WakeFn,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut heap: Queue = BinaryHeap::new();
        let mut pending: HashMap<u64, Pending> = HashMap::new();
        let mut seq: u64 = 0;

        loop {
            let next = match heap.peek().map(|Reverse((due, _))| *due) {
                Some(due) => {
                    let now = Instant::now();
                    if due <= now {
                        fire_due(&mut heap, &mut pending, now, &evt_tx, &wake);
                        continue;
                    }
                    cmd_rx.recv_timeout(due - now)
                }
                None => cmd_rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };

            match next {
                Ok(CoreCommand::ScheduleTimer {
                    surface_id,
                    timer_id,
                    kind,
                    delay,
                }) => {
                    seq = seq.wrapping_add(1);
                    log::trace!(target: "runtime_timer", "schedule {kind:?} in {delay:?}");
                    heap.push(Reverse((Instant::now() + delay, seq)));
                    pending.insert(
                        seq,
                        Pending {
                            surface_id,
                            timer_id,
                            kind,
                        },
                    );
                }
                Ok(CoreCommand::Shutdown) => break,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::debug!(target: "runtime_timer", "timer runtime stopped");
    })
}

fn fire_due(
    heap: &mut Queue,
    pending: &mut HashMap<u64, Pending>,
    now: Instant,
    evt_tx: &Sender<CoreEvent>,
    wake: &WakeFn,
) {
    let mut fired = false;
    while heap.peek().is_some_and(|Reverse((due, _))| *due <= now) {
        let Some(Reverse((_, seq))) = heap.pop() else { break };
        let Some(p) = pending.remove(&seq) else { continue };
        let _ = evt_tx.send(CoreEvent::TimerFired {
            surface_id: p.surface_id,
            timer_id: p.timer_id,
            kind: p.kind,
        });
        fired = true;
    }
    if fired {
        wake();
    }
}
