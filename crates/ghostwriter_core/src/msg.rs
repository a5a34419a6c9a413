use crate::{
    Action, ActionId, ArticleForm, ArticleResponse, ContentDetail, ListKind, ListResult, Metrics,
    PollTarget, RequestSeq,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// A list view became visible.
    ListMounted(ListKind),
    /// A list view was hidden or torn down.
    ListUnmounted(ListKind),
    /// User moved to another page (0-based index).
    PageChanged { list: ListKind, page_index: u32 },
    /// User picked another page size.
    PageSizeChanged { list: ListKind, page_size: u32 },
    /// User set (`Some`) or cleared (`None`) one filter.
    FilterChanged {
        list: ListKind,
        key: String,
        value: Option<String>,
    },
    /// User cleared every filter of a list.
    FiltersCleared(ListKind),
    /// User asked for a refresh outside the poll cadence.
    RefreshRequested(ListKind),
    /// Poll timer fired.
    PollTick(PollTarget),
    /// Engine finished fetching a list page.
    ListFetched {
        list: ListKind,
        seq: RequestSeq,
        result: Result<ListResult, String>,
    },
    /// Metrics panel became visible.
    MetricsMounted,
    /// Metrics panel was hidden.
    MetricsUnmounted,
    /// Engine finished fetching metrics.
    MetricsFetched {
        seq: RequestSeq,
        result: Result<Metrics, String>,
    },
    /// User opened a document.
    DetailRequested { id: String },
    /// User closed the document panel.
    DetailClosed,
    /// Engine finished fetching a document.
    DetailFetched {
        seq: RequestSeq,
        result: Result<ContentDetail, String>,
    },
    /// User triggered an action on a record.
    ActionRequested { action: Action, target_id: String },
    /// Engine finished an action request.
    ActionCompleted {
        action_id: ActionId,
        result: Result<(), String>,
    },
    /// User submitted the article form.
    ArticleSubmitted(ArticleForm),
    /// Engine finished generating article parameters.
    ArticleGenerated {
        seq: RequestSeq,
        result: Result<ArticleResponse, String>,
    },
    /// Render tick to coalesce output.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
