use std::io::{self, Write};
use std::sync::{mpsc, Arc};

use ghostwriter_core::{update, AppState, AppViewModel, Msg};
use ghostwriter_engine::{EngineHandle, FetchError, ReqwestBackend};
use ghostwriter_logging::gw_debug;

use crate::config::{AppConfig, ConfigError};
use crate::effects::EffectRunner;
use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid backend settings: {0}")]
    Backend(#[from] FetchError),
    #[error("failed to start engine: {0}")]
    Engine(#[source] io::Error),
    #[error("engine stopped unexpectedly")]
    EngineStopped,
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
    #[error("{0}")]
    Request(String),
}

/// Owns the state and feeds it messages until the session is done.
pub struct App {
    state: AppState,
    runner: EffectRunner,
    msg_rx: mpsc::Receiver<Msg>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let backend = ReqwestBackend::new(config.api.settings())?;
        let (engine, events) = EngineHandle::spawn(Arc::new(backend)).map_err(AppError::Engine)?;
        let (msg_tx, msg_rx) = mpsc::channel();
        let state = match config.page_size {
            Some(page_size) => AppState::with_page_size(page_size),
            None => AppState::new(),
        };
        Ok(Self {
            state,
            runner: EffectRunner::new(engine, events, msg_tx),
            msg_rx,
        })
    }

    pub fn run(mut self, session: &mut dyn Session, out: &mut dyn Write) -> Result<(), AppError> {
        let result = self.drive(session, out);
        self.runner.shutdown();
        result
    }

    fn drive(&mut self, session: &mut dyn Session, out: &mut dyn Write) -> Result<(), AppError> {
        for msg in session.initial_messages() {
            self.step(msg, session, out)?;
        }
        while !session.is_done(&self.state) {
            let msg = self.msg_rx.recv().map_err(|_| AppError::EngineStopped)?;
            self.step(msg, session, out)?;
        }
        session.finish(&self.state)
    }

    fn step(
        &mut self,
        msg: Msg,
        session: &mut dyn Session,
        out: &mut dyn Write,
    ) -> Result<(), AppError> {
        if let Some(view) = self.dispatch(msg) {
            if let Some(text) = session.render(&view) {
                out.write_all(text.as_bytes()).map_err(AppError::Output)?;
                out.flush().map_err(AppError::Output)?;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if !effects.is_empty() {
            gw_debug!("{} effect(s)", effects.len());
            self.runner.enqueue(effects);
        }
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        view
    }
}
