use std::sync::mpsc;
use std::thread;

use ghostwriter_core::{Effect, Msg};
use ghostwriter_engine::{EngineEvent, EngineEvents, EngineHandle};
use ghostwriter_logging::{gw_debug, gw_info};

/// Turns core effects into engine commands and engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, events: EngineEvents, msg_tx: mpsc::Sender<Msg>) -> Self {
        spawn_event_loop(events, msg_tx);
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchList { list, seq, query } => {
                    gw_debug!("FetchList list={} seq={} page={}", list, seq, query.page());
                    self.engine.fetch_list(list, seq, query);
                }
                Effect::StartPolling { target, interval } => {
                    self.engine.start_polling(target, interval);
                }
                Effect::StopPolling { target } => {
                    self.engine.stop_polling(target);
                }
                Effect::DispatchAction {
                    action_id,
                    action,
                    target_id,
                } => {
                    gw_info!("DispatchAction id={} {} {}", action_id, action, target_id);
                    self.engine.dispatch(action_id, action, target_id);
                }
                Effect::FetchDetail { seq, id } => {
                    self.engine.fetch_detail(seq, id);
                }
                Effect::FetchMetrics { seq } => {
                    self.engine.fetch_metrics(seq);
                }
                Effect::GenerateArticle { seq, request } => {
                    self.engine.generate_article(seq, request);
                }
            }
        }
    }

    pub fn shutdown(self) {
        self.engine.shutdown();
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if msg_tx.send(to_msg(event)).is_err() {
                break;
            }
        }
    });
}

pub(crate) fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PollTick(target) => Msg::PollTick(target),
        EngineEvent::ListFetched { list, seq, result } => Msg::ListFetched {
            list,
            seq,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::MetricsFetched { seq, result } => Msg::MetricsFetched {
            seq,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::DetailFetched { seq, result } => Msg::DetailFetched {
            seq,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ActionCompleted { action_id, result } => Msg::ActionCompleted {
            action_id,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::ArticleGenerated { seq, result } => Msg::ArticleGenerated {
            seq,
            result: result.map_err(|err| err.to_string()),
        },
    }
}
