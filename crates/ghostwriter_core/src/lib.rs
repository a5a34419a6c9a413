//! Ghostwriter core: pure list-synchronization state machine and view-model helpers.
mod action;
mod article;
mod effect;
mod fetch_state;
mod list;
mod msg;
mod query;
mod record;
mod state;
mod sync;
mod update;
mod view_model;

pub use action::{Action, ActionId, ActionOutcome, ActionRecord};
pub use article::{
    ArticleForm, ArticleRequest, ArticleResponse, DateRange, ValidationError, MAX_LEVEL, MIN_LEVEL,
};
pub use effect::Effect;
pub use fetch_state::{FetchEvent, FetchState};
pub use list::{
    ListKind, PollTarget, UnknownList, METRICS_POLL_INTERVAL, TASK_STATUS_POLL_INTERVAL,
};
pub use msg::Msg;
pub use query::{ListQuery, MAX_PAGE_SIZE};
pub use record::{
    ContentDetail, ContentRecord, CrawlerRecord, DailyStats, ListResult, LogLevel, LogRecord,
    Metrics, PipelineTask, Record,
};
pub use state::{AppState, ACTION_HISTORY_LIMIT};
pub use sync::{ListSync, RequestSeq, Synced};
pub use update::update;
pub use view_model::{
    ActionRowView, AppViewModel, ArticleView, DetailView, ListView, MetricsView, Pagination,
};
