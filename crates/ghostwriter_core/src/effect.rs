use std::time::Duration;

use crate::{Action, ActionId, ArticleRequest, ListKind, ListQuery, PollTarget, RequestSeq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchList {
        list: ListKind,
        seq: RequestSeq,
        query: ListQuery,
    },
    /// (Re)start the poll timer for `target`. The first tick comes one
    /// `interval` from now; any existing timer for `target` is cancelled first.
    StartPolling {
        target: PollTarget,
        interval: Duration,
    },
    StopPolling {
        target: PollTarget,
    },
    DispatchAction {
        action_id: ActionId,
        action: Action,
        target_id: String,
    },
    FetchDetail {
        seq: RequestSeq,
        id: String,
    },
    FetchMetrics {
        seq: RequestSeq,
    },
    GenerateArticle {
        seq: RequestSeq,
        request: ArticleRequest,
    },
}
