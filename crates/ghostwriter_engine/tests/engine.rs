use std::sync::Arc;
use std::time::Duration;

use ghostwriter_core::{Action, ListKind, ListQuery, PollTarget};
use ghostwriter_engine::{
    ApiSettings, EngineEvent, EngineEvents, EngineHandle, FailureKind, ReqwestBackend,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    server: MockServer,
    // Drives the mock server; dropped after it.
    runtime: tokio::runtime::Runtime,
}

impl Harness {
    fn new() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn engine(&self) -> (EngineHandle, EngineEvents) {
        let backend = ReqwestBackend::new(ApiSettings {
            base_url: self.server.uri(),
            ..ApiSettings::default()
        })
        .unwrap();
        EngineHandle::spawn(Arc::new(backend)).unwrap()
    }
}

fn next_non_tick(events: &EngineEvents) -> EngineEvent {
    loop {
        match events.recv_timeout(WAIT) {
            Some(EngineEvent::PollTick(_)) => continue,
            Some(event) => return event,
            None => panic!("no engine event within {WAIT:?}"),
        }
    }
}

#[test]
fn list_fetch_comes_back_with_its_seq() {
    let harness = Harness::new();
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/crawlers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "crawlers": [{ "id": "c1", "name": "news", "enabled": true }],
                "total": 1
            }))),
    );
    let (engine, events) = harness.engine();

    let query = ListQuery::first_page(10);
    engine.fetch_list(ListKind::Crawlers, 3, query.clone());

    match next_non_tick(&events) {
        EngineEvent::ListFetched { list, seq, result } => {
            assert_eq!(list, ListKind::Crawlers);
            assert_eq!(seq, 3);
            let result = result.unwrap();
            assert_eq!(result.total, 1);
            assert_eq!(result.query, query);
        }
        other => panic!("unexpected event {other:?}"),
    }
    engine.shutdown();
}

#[test]
fn failed_action_reports_its_id() {
    let harness = Harness::new();
    harness.mount(
        Mock::given(method("POST"))
            .and(path("/api/v1/data/content/abc/reprocess"))
            .respond_with(ResponseTemplate::new(500)),
    );
    let (engine, events) = harness.engine();

    engine.dispatch(9, Action::Reprocess, "abc");

    match next_non_tick(&events) {
        EngineEvent::ActionCompleted { action_id, result } => {
            assert_eq!(action_id, 9);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(500));
        }
        other => panic!("unexpected event {other:?}"),
    }
    engine.shutdown();
}

#[test]
fn polling_ticks_until_stopped() {
    let harness = Harness::new();
    let (engine, events) = harness.engine();
    let target = PollTarget::List(ListKind::Pipeline);

    engine.start_polling(target, Duration::from_millis(20));
    assert_eq!(events.recv_timeout(WAIT), Some(EngineEvent::PollTick(target)));

    engine.stop_polling(target);
    std::thread::sleep(Duration::from_millis(100));
    while events.try_recv().is_some() {}
    std::thread::sleep(Duration::from_millis(150));
    assert_eq!(events.try_recv(), None);

    engine.shutdown();
}

#[test]
fn shutdown_with_requests_in_flight_returns() {
    let harness = Harness::new();
    harness.mount(
        Mock::given(method("GET"))
            .and(path("/api/v1/metrics"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(30))
                    .set_body_json(json!({})),
            ),
    );
    let (engine, _events) = harness.engine();

    engine.fetch_metrics(1);
    engine.start_polling(PollTarget::Metrics, Duration::from_secs(30));
    std::thread::sleep(Duration::from_millis(50));
    engine.shutdown();
}
