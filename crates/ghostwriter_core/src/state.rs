use std::collections::BTreeMap;

use crate::view_model::{
    ActionRowView, AppViewModel, ArticleView, DetailView, ListView, MetricsView, Pagination,
};
use crate::{
    Action, ActionId, ActionOutcome, ActionRecord, ArticleResponse, ContentDetail, FetchState,
    ListKind, ListSync, Metrics, Synced, ValidationError,
};

/// Most recent actions kept for display.
pub const ACTION_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    lists: BTreeMap<ListKind, ListSync>,
    metrics: Synced<Metrics>,
    metrics_mounted: bool,
    detail_id: Option<String>,
    detail: Synced<ContentDetail>,
    actions: BTreeMap<ActionId, ActionRecord>,
    next_action_id: ActionId,
    article: Synced<ArticleResponse>,
    article_error: Option<ValidationError>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State with each list on its default page size.
    pub fn new() -> Self {
        Self::build(|kind| kind.default_page_size())
    }

    /// State with every list using `page_size`.
    pub fn with_page_size(page_size: u32) -> Self {
        Self::build(|_| page_size)
    }

    fn build(page_size: impl Fn(ListKind) -> u32) -> Self {
        let lists = ListKind::ALL
            .into_iter()
            .map(|kind| (kind, ListSync::new(kind, page_size(kind))))
            .collect();
        Self {
            lists,
            metrics: Synced::new(),
            metrics_mounted: false,
            detail_id: None,
            detail: Synced::new(),
            actions: BTreeMap::new(),
            next_action_id: 1,
            article: Synced::new(),
            article_error: None,
            dirty: false,
        }
    }

    pub fn list(&self, kind: ListKind) -> &ListSync {
        // Every kind is inserted by `build`.
        &self.lists[&kind]
    }

    pub(crate) fn list_mut(&mut self, kind: ListKind) -> &mut ListSync {
        self.lists
            .entry(kind)
            .or_insert_with(|| ListSync::new(kind, kind.default_page_size()))
    }

    pub fn metrics(&self) -> &Synced<Metrics> {
        &self.metrics
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut Synced<Metrics> {
        &mut self.metrics
    }

    pub fn metrics_mounted(&self) -> bool {
        self.metrics_mounted
    }

    pub(crate) fn set_metrics_mounted(&mut self, mounted: bool) -> bool {
        std::mem::replace(&mut self.metrics_mounted, mounted) != mounted
    }

    pub fn detail(&self) -> &Synced<ContentDetail> {
        &self.detail
    }

    /// Start fetching `id`. A different document drops the previous one so
    /// its payload is never shown under the new id.
    pub(crate) fn open_detail(&mut self, id: String) -> crate::RequestSeq {
        if self.detail_id.as_deref() != Some(id.as_str()) {
            self.detail.reset();
        }
        self.detail_id = Some(id);
        self.detail.begin()
    }

    pub(crate) fn close_detail(&mut self) {
        self.detail_id = None;
        self.detail.reset();
    }

    pub(crate) fn detail_mut(&mut self) -> &mut Synced<ContentDetail> {
        &mut self.detail
    }

    pub fn action(&self, action_id: ActionId) -> Option<&ActionRecord> {
        self.actions.get(&action_id)
    }

    pub(crate) fn start_action(&mut self, action: Action, target_id: String) -> ActionId {
        let action_id = self.next_action_id;
        self.next_action_id += 1;
        self.actions.insert(
            action_id,
            ActionRecord {
                action,
                target_id,
                outcome: ActionOutcome::Pending,
            },
        );
        self.trim_actions();
        action_id
    }

    /// Record the outcome of an action. Returns the action if it was known.
    pub(crate) fn finish_action(
        &mut self,
        action_id: ActionId,
        outcome: ActionOutcome,
    ) -> Option<Action> {
        let record = self.actions.get_mut(&action_id)?;
        record.outcome = outcome;
        Some(record.action)
    }

    /// Drop the oldest settled actions beyond the limit. Pending actions are
    /// kept until they complete; they are trimmed on a later request.
    fn trim_actions(&mut self) {
        while self.actions.len() > ACTION_HISTORY_LIMIT {
            let oldest_settled = self
                .actions
                .iter()
                .find(|(_, record)| record.outcome != ActionOutcome::Pending)
                .map(|(action_id, _)| *action_id);
            match oldest_settled {
                Some(action_id) => {
                    self.actions.remove(&action_id);
                }
                None => break,
            }
        }
    }

    pub fn article(&self) -> &Synced<ArticleResponse> {
        &self.article
    }

    pub(crate) fn article_mut(&mut self) -> &mut Synced<ArticleResponse> {
        &mut self.article
    }

    pub fn article_error(&self) -> Option<&ValidationError> {
        self.article_error.as_ref()
    }

    pub(crate) fn set_article_error(&mut self, error: Option<ValidationError>) {
        self.article_error = error;
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            lists: self.lists.values().map(list_view).collect(),
            metrics: MetricsView {
                mounted: self.metrics_mounted,
                loading: self.metrics.state().is_loading(),
                metrics: self.metrics.state().last_success().cloned(),
                error: self.metrics.state().error().map(str::to_string),
            },
            detail: self.detail_id.as_ref().map(|id| DetailView {
                id: id.clone(),
                loading: self.detail.state().is_loading(),
                detail: self.detail.state().last_success().cloned(),
                error: self.detail.state().error().map(str::to_string),
            }),
            actions: self
                .actions
                .iter()
                .rev()
                .map(|(action_id, record)| ActionRowView {
                    action_id: *action_id,
                    action: record.action,
                    target_id: record.target_id.clone(),
                    outcome: record.outcome.clone(),
                })
                .collect(),
            article: ArticleView {
                submitting: self.article.state().is_loading(),
                response: self.article.state().last_success().cloned(),
                error: self
                    .article_error
                    .as_ref()
                    .map(ToString::to_string)
                    .or_else(|| self.article.state().error().map(str::to_string)),
            },
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the state changed since the last call and resets the
    /// flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

fn list_view(sync: &ListSync) -> ListView {
    let state = sync.state();
    let shown = state.last_success();
    let pagination = match shown {
        Some(result) => Pagination::new(result.query.page(), result.page_count()),
        None => Pagination::new(sync.query().page(), 1),
    };

    ListView {
        kind: sync.kind(),
        mounted: sync.is_mounted(),
        query: sync.query().clone(),
        loading: state.is_loading(),
        rows: shown.map(|result| result.items.clone()).unwrap_or_default(),
        total: shown.map(|result| result.total),
        pagination,
        error: state.error().map(str::to_string),
        stale: matches!(state, FetchState::Failure { .. } | FetchState::Loading { .. })
            && shown.is_some(),
    }
}
