use ghostwriter_logging::gw_debug;

use crate::{FetchEvent, FetchState, ListKind, ListQuery, ListResult};

/// Sequence number of one request. Issued per owner, strictly increasing.
pub type RequestSeq = u64;

/// A [`FetchState`] guarded by request sequence numbers.
///
/// Only the most recently issued request may complete the state. Responses
/// for superseded or cancelled requests are discarded, so ordering follows
/// request initiation rather than response arrival.
#[derive(Debug, Clone, PartialEq)]
pub struct Synced<T> {
    state: FetchState<T>,
    last_seq: RequestSeq,
    in_flight: Option<RequestSeq>,
    completed: u64,
}

impl<T> Default for Synced<T> {
    fn default() -> Self {
        Self {
            state: FetchState::Idle,
            last_seq: 0,
            in_flight: None,
            completed: 0,
        }
    }
}

impl<T> Synced<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Number of responses applied so far (successes and failures).
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Issue a new request. Any earlier in-flight request becomes stale.
    pub fn begin(&mut self) -> RequestSeq {
        self.last_seq += 1;
        self.in_flight = Some(self.last_seq);
        self.transition(FetchEvent::FetchStarted);
        self.last_seq
    }

    /// Apply a response. Returns `false` when the response is stale and was
    /// dropped.
    pub fn complete(&mut self, seq: RequestSeq, result: Result<T, String>) -> bool {
        if self.in_flight != Some(seq) {
            gw_debug!(
                "Discarding stale response seq={} (in flight: {:?})",
                seq,
                self.in_flight
            );
            return false;
        }
        self.in_flight = None;
        self.completed += 1;
        let event = match result {
            Ok(value) => FetchEvent::FetchSucceeded(value),
            Err(reason) => FetchEvent::FetchFailed(reason),
        };
        self.transition(event);
        true
    }

    /// The inputs changed: drop the in-flight request and move to `Loading`.
    pub fn invalidate(&mut self) {
        self.in_flight = None;
        self.transition(FetchEvent::QueryChanged);
    }

    /// Stop caring about the in-flight request without touching the state.
    pub fn cancel(&mut self) {
        self.in_flight = None;
    }

    /// Forget everything, including the last value.
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.state = FetchState::Idle;
    }

    fn transition(&mut self, event: FetchEvent<T>) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(event);
    }
}

/// Synchronization state for one list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSync {
    kind: ListKind,
    query: ListQuery,
    synced: Synced<ListResult>,
    mounted: bool,
}

impl ListSync {
    pub fn new(kind: ListKind, page_size: u32) -> Self {
        Self {
            kind,
            query: ListQuery::first_page(page_size),
            synced: Synced::new(),
            mounted: false,
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn state(&self) -> &FetchState<ListResult> {
        self.synced.state()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn completed_fetches(&self) -> u64 {
        self.synced.completed()
    }

    /// Returns `true` when the list was not already mounted.
    pub(crate) fn mount(&mut self) -> bool {
        !std::mem::replace(&mut self.mounted, true)
    }

    /// Returns `true` when the list was mounted. Outstanding fetches are
    /// cancelled.
    pub(crate) fn unmount(&mut self) -> bool {
        let was_mounted = std::mem::replace(&mut self.mounted, false);
        self.synced.cancel();
        was_mounted
    }

    /// Replace the query. Returns `false` when it is unchanged.
    pub(crate) fn set_query(&mut self, query: ListQuery) -> bool {
        if query == self.query {
            return false;
        }
        self.query = query;
        self.synced.invalidate();
        true
    }

    pub(crate) fn begin_fetch(&mut self) -> (RequestSeq, ListQuery) {
        (self.synced.begin(), self.query.clone())
    }

    pub(crate) fn complete(&mut self, seq: RequestSeq, result: Result<ListResult, String>) -> bool {
        self.synced.complete(seq, result)
    }
}
