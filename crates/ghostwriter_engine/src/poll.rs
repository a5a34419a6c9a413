use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ghostwriter_core::PollTarget;
use ghostwriter_logging::gw_debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::{EngineEvent, EventSink};

/// A running poll timer. Dropping the handle stops the timer.
#[derive(Debug)]
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Owns at most one timer per poll target.
pub struct PollScheduler {
    runtime: Handle,
    sink: Arc<dyn EventSink>,
    timers: HashMap<PollTarget, PollHandle>,
}

impl PollScheduler {
    pub fn new(runtime: Handle, sink: Arc<dyn EventSink>) -> Self {
        Self {
            runtime,
            sink,
            timers: HashMap::new(),
        }
    }

    /// Start (or restart) the timer for `target`.
    ///
    /// The existing timer is cancelled before the new one is created. The
    /// first tick fires one `interval` from now; the caller fetches
    /// immediately on its own.
    pub fn start(&mut self, target: PollTarget, interval: Duration) {
        self.stop(target);
        let interval = interval.max(Duration::from_millis(1));

        let sink = self.sink.clone();
        let task = self.runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                sink.emit(EngineEvent::PollTick(target));
            }
        });
        gw_debug!("Polling {} every {:?}", target, interval);
        self.timers.insert(target, PollHandle { task });
    }

    /// Cancel the timer for `target`. Returns `false` when none was running.
    pub fn stop(&mut self, target: PollTarget) -> bool {
        match self.timers.remove(&target) {
            Some(handle) => {
                gw_debug!("Stopped polling {}", target);
                handle.cancel();
                true
            }
            None => false,
        }
    }

    pub fn stop_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_polling(&self, target: PollTarget) -> bool {
        self.timers.contains_key(&target)
    }

    pub fn active(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}
