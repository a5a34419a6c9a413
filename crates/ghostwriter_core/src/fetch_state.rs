/// Lifecycle of one fetched value.
///
/// `Loading` and `Failure` carry the last successful value so a view keeps
/// showing data while a refresh is in flight or after it failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Idle,
    Loading {
        previous: Option<T>,
    },
    Success(T),
    Failure {
        reason: String,
        previous: Option<T>,
    },
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent<T> {
    QueryChanged,
    FetchStarted,
    FetchSucceeded(T),
    FetchFailed(String),
}

impl<T> FetchState<T> {
    /// Apply one event and return the next state.
    pub fn apply(self, event: FetchEvent<T>) -> Self {
        match event {
            FetchEvent::QueryChanged => {
                let previous = match self {
                    FetchState::Success(value) => Some(value),
                    _ => None,
                };
                FetchState::Loading { previous }
            }
            FetchEvent::FetchStarted => FetchState::Loading {
                previous: self.into_last_success(),
            },
            FetchEvent::FetchSucceeded(value) => FetchState::Success(value),
            FetchEvent::FetchFailed(reason) => FetchState::Failure {
                reason,
                previous: self.into_last_success(),
            },
        }
    }

    /// The value a view should display: the current success, or the one
    /// preserved across a refresh or failure.
    pub fn last_success(&self) -> Option<&T> {
        match self {
            FetchState::Idle => None,
            FetchState::Loading { previous } | FetchState::Failure { previous, .. } => {
                previous.as_ref()
            }
            FetchState::Success(value) => Some(value),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failure { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// True once a fetch has finished, successfully or not.
    pub fn is_settled(&self) -> bool {
        matches!(self, FetchState::Success(_) | FetchState::Failure { .. })
    }

    fn into_last_success(self) -> Option<T> {
        match self {
            FetchState::Idle => None,
            FetchState::Loading { previous } | FetchState::Failure { previous, .. } => previous,
            FetchState::Success(value) => Some(value),
        }
    }
}
