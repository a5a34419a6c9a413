use crate::{
    Action, ActionId, ActionOutcome, ArticleResponse, ContentDetail, ListKind, ListQuery, Metrics,
    Record,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub lists: Vec<ListView>,
    pub metrics: MetricsView,
    pub detail: Option<DetailView>,
    /// Newest first.
    pub actions: Vec<ActionRowView>,
    pub article: ArticleView,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn list(&self, kind: ListKind) -> Option<&ListView> {
        self.lists.iter().find(|list| list.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    pub kind: ListKind,
    pub mounted: bool,
    /// Query currently in effect (may be newer than the rows shown).
    pub query: ListQuery,
    pub loading: bool,
    /// Rows of the last successful fetch.
    pub rows: Vec<Record>,
    /// Total that belongs to `rows`, `None` before the first success.
    pub total: Option<u64>,
    pub pagination: Pagination,
    pub error: Option<String>,
    /// Rows are from an earlier fetch while a refresh is pending or failed.
    pub stale: bool,
}

/// Pager state derived from the displayed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based.
    pub current: u32,
    pub page_count: u32,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl Pagination {
    pub fn new(current: u32, page_count: u32) -> Self {
        let page_count = page_count.max(1);
        Self {
            current,
            page_count,
            prev_enabled: current > 1,
            next_enabled: current < page_count,
        }
    }

    /// A single page with both directions disabled.
    pub fn is_single_page(&self) -> bool {
        self.page_count == 1 && !self.prev_enabled && !self.next_enabled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MetricsView {
    pub mounted: bool,
    pub loading: bool,
    pub metrics: Option<Metrics>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub id: String,
    pub loading: bool,
    pub detail: Option<ContentDetail>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRowView {
    pub action_id: ActionId,
    pub action: Action,
    pub target_id: String,
    pub outcome: ActionOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArticleView {
    pub submitting: bool,
    pub response: Option<ArticleResponse>,
    pub error: Option<String>,
}
