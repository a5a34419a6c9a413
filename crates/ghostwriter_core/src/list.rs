use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Poll cadence for pipeline and crawler status.
pub const TASK_STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Poll cadence for the metrics panel.
pub const METRICS_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// The list views backed by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ListKind {
    Content,
    Logs,
    Crawlers,
    Pipeline,
}

impl ListKind {
    pub const ALL: [ListKind; 4] = [
        ListKind::Content,
        ListKind::Logs,
        ListKind::Crawlers,
        ListKind::Pipeline,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ListKind::Content => "content",
            ListKind::Logs => "logs",
            ListKind::Crawlers => "crawlers",
            ListKind::Pipeline => "pipeline",
        }
    }

    /// `None` for on-demand lists that only fetch on mount, query change,
    /// explicit refresh or after an action.
    pub fn poll_interval(self) -> Option<Duration> {
        match self {
            ListKind::Pipeline | ListKind::Crawlers => Some(TASK_STATUS_POLL_INTERVAL),
            ListKind::Content | ListKind::Logs => None,
        }
    }

    pub fn default_page_size(self) -> u32 {
        match self {
            ListKind::Logs => 20,
            ListKind::Content | ListKind::Crawlers | ListKind::Pipeline => 10,
        }
    }

    /// Pipeline status is a flat, unpaginated snapshot.
    pub fn is_paginated(self) -> bool {
        !matches!(self, ListKind::Pipeline)
    }

    /// Filter keys the backend understands for this list.
    pub fn filter_keys(self) -> &'static [&'static str] {
        match self {
            ListKind::Content => &["status", "source", "data_type"],
            ListKind::Logs => &["level", "source"],
            ListKind::Crawlers | ListKind::Pipeline => &[],
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown list `{0}` (expected content, logs, crawlers or pipeline)")]
pub struct UnknownList(pub String);

impl FromStr for ListKind {
    type Err = UnknownList;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownList(s.to_string()))
    }
}

/// Anything that owns a poll timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PollTarget {
    List(ListKind),
    Metrics,
}

impl PollTarget {
    pub fn interval(self) -> Option<Duration> {
        match self {
            PollTarget::List(kind) => kind.poll_interval(),
            PollTarget::Metrics => Some(METRICS_POLL_INTERVAL),
        }
    }
}

impl fmt::Display for PollTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollTarget::List(kind) => write!(f, "list:{kind}"),
            PollTarget::Metrics => f.write_str("metrics"),
        }
    }
}
