//! Tokio-backed `Scheduler`: every timer is a spawned task that sends its id
//! down a channel when it fires. Cancelling aborts the task; an id already
//! queued in the channel is dropped by the controller as stale.

use crate::features::test::timers::{Schedule, Scheduler, TimerId, TimerKind};
use std::collections::HashMap;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{interval_at, sleep, Instant},
};
use tracing::trace;

#[derive(Debug)]
pub struct TokioScheduler {
    tx: UnboundedSender<TimerId>,
    next_id: u64,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Returns the scheduler and the receiving end for fired timer ids.
    #[must_use]
    pub fn new() -> (Self, UnboundedReceiver<TimerId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                next_id: 0,
                tasks: HashMap::new(),
            },
            rx,
        )
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, kind: TimerKind, schedule: Schedule) -> TimerId {
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        let id = TimerId::new(self.next_id);
        let tx = self.tx.clone();

        let task = match schedule {
            Schedule::Every(period) => tokio::spawn(async move {
                // first tick one period from now, not immediately
                let mut ticks = interval_at(Instant::now() + period, period);
                loop {
                    ticks.tick().await;
                    if tx.send(id).is_err() {
                        break;
                    }
                }
            }),
            Schedule::Once(delay) => tokio::spawn(async move {
                sleep(delay).await;
                let _ = tx.send(id);
            }),
        };

        trace!("scheduled {kind:?} timer {}", id.get());
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            trace!("cancelled timer {}", id.get());
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
