use std::sync::{Arc, Mutex};
use std::time::Duration;

use ghostwriter_core::{ListKind, PollTarget};
use ghostwriter_engine::{EngineEvent, EventSink, PollScheduler};
use pretty_assertions::assert_eq;
use tokio::runtime::Handle;
use tokio::time::{sleep, Instant};

const CRAWLERS: PollTarget = PollTarget::List(ListKind::Crawlers);

struct RecordingSink {
    started: Instant,
    ticks: Mutex<Vec<(u64, PollTarget)>>,
}

impl RecordingSink {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Instant::now(),
            ticks: Mutex::new(Vec::new()),
        })
    }

    /// Tick times in milliseconds since the sink was created.
    fn ticks_for(&self, target: PollTarget) -> Vec<u64> {
        self.ticks
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, t)| *t == target)
            .map(|(at, _)| *at)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::PollTick(target) = event {
            let at = self.started.elapsed().as_millis() as u64;
            self.ticks.lock().unwrap().push((at, target));
        }
    }
}

fn scheduler(sink: &Arc<RecordingSink>) -> PollScheduler {
    PollScheduler::new(Handle::current(), sink.clone())
}

#[tokio::test(start_paused = true)]
async fn first_tick_comes_one_interval_after_start() {
    let sink = RecordingSink::new();
    let mut scheduler = scheduler(&sink);

    scheduler.start(CRAWLERS, Duration::from_secs(5));
    sleep(Duration::from_millis(15_500)).await;

    assert_eq!(sink.ticks_for(CRAWLERS), vec![5_000, 10_000, 15_000]);
}

#[tokio::test(start_paused = true)]
async fn restart_resets_the_clock() {
    let sink = RecordingSink::new();
    let mut scheduler = scheduler(&sink);

    scheduler.start(CRAWLERS, Duration::from_secs(5));
    sleep(Duration::from_secs(2)).await;
    scheduler.start(CRAWLERS, Duration::from_secs(5));
    sleep(Duration::from_millis(10_500)).await;

    assert_eq!(sink.ticks_for(CRAWLERS), vec![7_000, 12_000]);
    assert_eq!(scheduler.active(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_ends_the_timer() {
    let sink = RecordingSink::new();
    let mut scheduler = scheduler(&sink);

    scheduler.start(CRAWLERS, Duration::from_secs(5));
    sleep(Duration::from_millis(5_500)).await;
    assert!(scheduler.stop(CRAWLERS));
    assert!(!scheduler.stop(CRAWLERS));
    sleep(Duration::from_secs(30)).await;

    assert_eq!(sink.ticks_for(CRAWLERS), vec![5_000]);
    assert!(!scheduler.is_polling(CRAWLERS));
}

#[tokio::test(start_paused = true)]
async fn targets_poll_independently() {
    let sink = RecordingSink::new();
    let mut scheduler = scheduler(&sink);

    scheduler.start(PollTarget::List(ListKind::Pipeline), Duration::from_secs(5));
    scheduler.start(PollTarget::Metrics, Duration::from_secs(30));
    sleep(Duration::from_millis(30_500)).await;

    assert_eq!(
        sink.ticks_for(PollTarget::List(ListKind::Pipeline)).len(),
        6
    );
    assert_eq!(sink.ticks_for(PollTarget::Metrics), vec![30_000]);
    assert_eq!(scheduler.active(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scheduler_stops_every_timer() {
    let sink = RecordingSink::new();
    let mut scheduler = scheduler(&sink);

    scheduler.start(CRAWLERS, Duration::from_secs(5));
    scheduler.start(PollTarget::Metrics, Duration::from_secs(30));
    drop(scheduler);
    sleep(Duration::from_secs(60)).await;

    assert!(sink.ticks.lock().unwrap().is_empty());
}
