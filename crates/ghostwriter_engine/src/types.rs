use std::fmt;

use ghostwriter_core::{
    ActionId, ArticleResponse, ContentDetail, ListKind, ListResult, Metrics, PollTarget,
    RequestSeq,
};

use crate::DecodeError;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PollTick(PollTarget),
    ListFetched {
        list: ListKind,
        seq: RequestSeq,
        result: Result<ListResult, FetchError>,
    },
    MetricsFetched {
        seq: RequestSeq,
        result: Result<Metrics, FetchError>,
    },
    DetailFetched {
        seq: RequestSeq,
        result: Result<ContentDetail, FetchError>,
    },
    ActionCompleted {
        action_id: ActionId,
        result: Result<(), FetchError>,
    },
    ArticleGenerated {
        seq: RequestSeq,
        result: Result<ArticleResponse, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<DecodeError> for FetchError {
    fn from(err: DecodeError) -> Self {
        FetchError::new(FailureKind::Decode, err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidRequest,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
}

impl FailureKind {
    /// Transport failures as opposed to a response that arrived but could
    /// not be understood.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FailureKind::Decode)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidRequest => write!(f, "invalid request"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
