//! What each subcommand sends to the core and when it is finished.

use ghostwriter_core::{Action, ActionOutcome, AppState, AppViewModel, ArticleForm, ListKind, Msg};
use ghostwriter_logging::gw_warn;

use crate::app::AppError;
use crate::render;

pub trait Session {
    fn initial_messages(&self) -> Vec<Msg>;

    /// Text to print for a changed view, if any.
    fn render(&mut self, view: &AppViewModel) -> Option<String>;

    fn is_done(&self, state: &AppState) -> bool;

    /// Outcome once `is_done` returned true.
    fn finish(&self, _state: &AppState) -> Result<(), AppError> {
        Ok(())
    }
}

/// Prints a list each time a fetch settles.
pub struct WatchSession {
    kind: ListKind,
    page_index: u32,
    page_size: Option<u32>,
    filters: Vec<(String, String)>,
    refreshes: u64,
    was_loading: bool,
}

impl WatchSession {
    /// `page` is 1-based. `refreshes == 0` runs until interrupted.
    pub fn new(
        kind: ListKind,
        page: u32,
        page_size: Option<u32>,
        filters: Vec<(String, String)>,
        refreshes: u64,
    ) -> Self {
        for (key, _) in &filters {
            if !kind.filter_keys().contains(&key.as_str()) {
                gw_warn!("{} does not document a `{}` filter; sending it anyway", kind, key);
            }
        }
        Self {
            kind,
            page_index: page.saturating_sub(1),
            page_size,
            filters,
            refreshes,
            was_loading: false,
        }
    }

    fn wanted_fetches(&self) -> Option<u64> {
        match (self.kind.poll_interval(), self.refreshes) {
            (None, _) => Some(1),
            (Some(_), 0) => None,
            (Some(_), refreshes) => Some(refreshes),
        }
    }
}

impl Session for WatchSession {
    fn initial_messages(&self) -> Vec<Msg> {
        let list = self.kind;
        let mut msgs = Vec::new();
        if let Some(page_size) = self.page_size {
            msgs.push(Msg::PageSizeChanged { list, page_size });
        }
        for (key, value) in &self.filters {
            msgs.push(Msg::FilterChanged {
                list,
                key: key.clone(),
                value: Some(value.clone()),
            });
        }
        // Filter and size changes reset the page, so the page goes last.
        msgs.push(Msg::PageChanged {
            list,
            page_index: self.page_index,
        });
        msgs.push(Msg::ListMounted(list));
        msgs
    }

    fn render(&mut self, view: &AppViewModel) -> Option<String> {
        let list = view.list(self.kind)?;
        if list.loading {
            self.was_loading = true;
            return None;
        }
        if !std::mem::take(&mut self.was_loading) {
            return None;
        }
        Some(render::render_list(list))
    }

    fn is_done(&self, state: &AppState) -> bool {
        self.wanted_fetches()
            .is_some_and(|wanted| state.list(self.kind).completed_fetches() >= wanted)
    }

    fn finish(&self, state: &AppState) -> Result<(), AppError> {
        match state.list(self.kind).state().error() {
            Some(error) => Err(AppError::Request(error.to_string())),
            None => Ok(()),
        }
    }
}

pub struct MetricsSession {
    refreshes: u64,
    was_loading: bool,
}

impl MetricsSession {
    pub fn new(refreshes: u64) -> Self {
        Self {
            refreshes,
            was_loading: false,
        }
    }
}

impl Session for MetricsSession {
    fn initial_messages(&self) -> Vec<Msg> {
        vec![Msg::MetricsMounted]
    }

    fn render(&mut self, view: &AppViewModel) -> Option<String> {
        if view.metrics.loading {
            self.was_loading = true;
            return None;
        }
        std::mem::take(&mut self.was_loading).then(|| render::render_metrics(&view.metrics))
    }

    fn is_done(&self, state: &AppState) -> bool {
        self.refreshes != 0 && state.metrics().completed() >= self.refreshes
    }

    fn finish(&self, state: &AppState) -> Result<(), AppError> {
        match state.metrics().state().error() {
            Some(error) => Err(AppError::Request(error.to_string())),
            None => Ok(()),
        }
    }
}

pub struct ShowSession {
    id: String,
}

impl ShowSession {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Session for ShowSession {
    fn initial_messages(&self) -> Vec<Msg> {
        vec![Msg::DetailRequested {
            id: self.id.clone(),
        }]
    }

    fn render(&mut self, view: &AppViewModel) -> Option<String> {
        view.detail
            .as_ref()
            .filter(|detail| !detail.loading)
            .map(render::render_detail)
    }

    fn is_done(&self, state: &AppState) -> bool {
        // A blank id is rejected without a request.
        state.detail().completed() >= 1 || state.view().detail.is_none()
    }

    fn finish(&self, state: &AppState) -> Result<(), AppError> {
        if state.view().detail.is_none() {
            return Err(AppError::Request("document id is required".into()));
        }
        match state.detail().state().error() {
            Some(error) => Err(AppError::Request(error.to_string())),
            None => Ok(()),
        }
    }
}

/// Fires one action and waits for its acknowledgement.
pub struct ActionSession {
    action: Action,
    target_id: String,
}

impl ActionSession {
    pub fn new(action: Action, target_id: impl Into<String>) -> Self {
        Self {
            action,
            target_id: target_id.into(),
        }
    }
}

impl Session for ActionSession {
    fn initial_messages(&self) -> Vec<Msg> {
        vec![Msg::ActionRequested {
            action: self.action,
            target_id: self.target_id.clone(),
        }]
    }

    fn render(&mut self, view: &AppViewModel) -> Option<String> {
        let row = view.actions.first()?;
        (row.outcome != ActionOutcome::Pending).then(|| format!("{}\n", render::render_action(row)))
    }

    fn is_done(&self, state: &AppState) -> bool {
        // A blank target is ignored, leaving no row at all.
        state
            .view()
            .actions
            .first()
            .map_or(true, |row| row.outcome != ActionOutcome::Pending)
    }

    fn finish(&self, state: &AppState) -> Result<(), AppError> {
        match state.view().actions.first().map(|row| row.outcome.clone()) {
            Some(ActionOutcome::Failed(reason)) => Err(AppError::Request(reason)),
            Some(_) => Ok(()),
            None => Err(AppError::Request("target id is required".into())),
        }
    }
}

pub struct GenerateSession {
    form: ArticleForm,
}

impl GenerateSession {
    pub fn new(form: ArticleForm) -> Self {
        Self { form }
    }
}

impl Session for GenerateSession {
    fn initial_messages(&self) -> Vec<Msg> {
        vec![Msg::ArticleSubmitted(self.form.clone())]
    }

    fn render(&mut self, view: &AppViewModel) -> Option<String> {
        (!view.article.submitting && view.article.response.is_some())
            .then(|| render::render_article(&view.article))
    }

    fn is_done(&self, state: &AppState) -> bool {
        state.article_error().is_some() || state.article().completed() >= 1
    }

    fn finish(&self, state: &AppState) -> Result<(), AppError> {
        if let Some(error) = state.article_error() {
            return Err(AppError::Request(format!("invalid article request: {error}")));
        }
        match state.article().state().error() {
            Some(error) => Err(AppError::Request(error.to_string())),
            None => Ok(()),
        }
    }
}
