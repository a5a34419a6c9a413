use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use ghostwriter_core::{
    Action, ActionId, ArticleRequest, ListKind, ListQuery, PollTarget, RequestSeq,
};
use ghostwriter_logging::{gw_debug, gw_info, gw_warn};
use tokio_util::sync::CancellationToken;

use crate::poll::PollScheduler;
use crate::{Backend, EngineEvent};

/// Receives engine events. Implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug)]
enum EngineCommand {
    FetchList {
        list: ListKind,
        seq: RequestSeq,
        query: ListQuery,
    },
    FetchMetrics {
        seq: RequestSeq,
    },
    FetchDetail {
        seq: RequestSeq,
        id: String,
    },
    Dispatch {
        action_id: ActionId,
        action: Action,
        target_id: String,
    },
    GenerateArticle {
        seq: RequestSeq,
        request: ArticleRequest,
    },
    StartPolling {
        target: PollTarget,
        interval: Duration,
    },
    StopPolling {
        target: PollTarget,
    },
    Shutdown,
}

/// Handle to the engine thread. Requests run concurrently on a tokio
/// runtime; results come back through [`EngineEvents`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    shutdown: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

/// Receiving end of the engine's event stream.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    /// Blocks until the next event. `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl EngineHandle {
    pub fn spawn(backend: Arc<dyn Backend>) -> io::Result<(Self, EngineEvents)> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("ghostwriter-engine")
            .enable_all()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();

        let worker = thread::Builder::new()
            .name("ghostwriter-engine-commands".into())
            .spawn(move || {
                let mut scheduler = PollScheduler::new(runtime.handle().clone(), sink.clone());
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        EngineCommand::StartPolling { target, interval } => {
                            scheduler.start(target, interval);
                        }
                        EngineCommand::StopPolling { target } => {
                            scheduler.stop(target);
                        }
                        EngineCommand::Shutdown => break,
                        request => {
                            let backend = backend.clone();
                            let sink = sink.clone();
                            let token = token.clone();
                            runtime.spawn(async move {
                                tokio::select! {
                                    _ = token.cancelled() => {}
                                    _ = handle_request(backend.as_ref(), request, sink.as_ref()) => {}
                                }
                            });
                        }
                    }
                }
                scheduler.stop_all();
                drop(scheduler);
                runtime.shutdown_timeout(Duration::from_millis(250));
                gw_info!("Engine stopped");
            })?;

        Ok((
            Self {
                cmd_tx,
                shutdown,
                worker: Some(worker),
            },
            EngineEvents { event_rx },
        ))
    }

    pub fn fetch_list(&self, list: ListKind, seq: RequestSeq, query: ListQuery) {
        self.send(EngineCommand::FetchList { list, seq, query });
    }

    pub fn fetch_metrics(&self, seq: RequestSeq) {
        self.send(EngineCommand::FetchMetrics { seq });
    }

    pub fn fetch_detail(&self, seq: RequestSeq, id: impl Into<String>) {
        self.send(EngineCommand::FetchDetail { seq, id: id.into() });
    }

    pub fn dispatch(&self, action_id: ActionId, action: Action, target_id: impl Into<String>) {
        self.send(EngineCommand::Dispatch {
            action_id,
            action,
            target_id: target_id.into(),
        });
    }

    pub fn generate_article(&self, seq: RequestSeq, request: ArticleRequest) {
        self.send(EngineCommand::GenerateArticle { seq, request });
    }

    pub fn start_polling(&self, target: PollTarget, interval: Duration) {
        self.send(EngineCommand::StartPolling { target, interval });
    }

    pub fn stop_polling(&self, target: PollTarget) {
        self.send(EngineCommand::StopPolling { target });
    }

    /// Stop timers, cancel in-flight requests and join the engine thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.cancel();
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            gw_warn!("Engine thread is gone; dropping command");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_request(backend: &dyn Backend, command: EngineCommand, sink: &dyn EventSink) {
    match command {
        EngineCommand::FetchList { list, seq, query } => {
            gw_debug!("Fetching {} page {} (seq {})", list, query.page(), seq);
            let result = backend.fetch_list(list, &query).await;
            if let Err(err) = &result {
                gw_warn!("Fetching {} failed: {}", list, err);
            }
            sink.emit(EngineEvent::ListFetched { list, seq, result });
        }
        EngineCommand::FetchMetrics { seq } => {
            let result = backend.fetch_metrics().await;
            if let Err(err) = &result {
                gw_warn!("Fetching metrics failed: {}", err);
            }
            sink.emit(EngineEvent::MetricsFetched { seq, result });
        }
        EngineCommand::FetchDetail { seq, id } => {
            let result = backend.fetch_detail(&id).await;
            if let Err(err) = &result {
                gw_warn!("Fetching content {} failed: {}", id, err);
            }
            sink.emit(EngineEvent::DetailFetched { seq, result });
        }
        EngineCommand::Dispatch {
            action_id,
            action,
            target_id,
        } => {
            gw_info!("Dispatching {} on {} (action {})", action, target_id, action_id);
            let result = backend.dispatch(action, &target_id).await;
            sink.emit(EngineEvent::ActionCompleted { action_id, result });
        }
        EngineCommand::GenerateArticle { seq, request } => {
            let result = backend.generate_article(&request).await;
            if let Err(err) = &result {
                gw_warn!("Article generation failed: {}", err);
            }
            sink.emit(EngineEvent::ArticleGenerated { seq, result });
        }
        EngineCommand::StartPolling { .. }
        | EngineCommand::StopPolling { .. }
        | EngineCommand::Shutdown => {}
    }
}
