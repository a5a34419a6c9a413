//! Mapping from list kinds, queries and actions to backend URLs.
use ghostwriter_core::{Action, ListKind, ListQuery};
use serde::Serialize;
use url::Url;

use crate::{FailureKind, FetchError};

const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Path segments (unencoded) and query pairs relative to the API base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
}

impl Route {
    fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: API_PREFIX
                .iter()
                .map(|segment| segment.to_string())
                .chain(segments.into_iter().map(Into::into))
                .collect(),
            query: Vec::new(),
        }
    }

    /// Resolve against `base`. Segments are percent-encoded, so ids cannot
    /// escape their path position.
    pub fn to_url(&self, base: &Url) -> Result<Url, FetchError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                FetchError::new(FailureKind::InvalidRequest, format!("cannot use {base} as API base"))
            })?;
            path.pop_if_empty().extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

/// Where a list's records live in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListShape {
    /// `{ <field>: [...], total: n }`
    Envelope(&'static str),
    /// `[...]`, with the total being the array length.
    BareArray,
}

pub fn list_shape(kind: ListKind) -> ListShape {
    match kind {
        ListKind::Content => ListShape::Envelope("documents"),
        ListKind::Logs => ListShape::Envelope("logs"),
        ListKind::Crawlers => ListShape::Envelope("crawlers"),
        ListKind::Pipeline => ListShape::BareArray,
    }
}

fn page_size_param(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Logs => "page_size",
        ListKind::Content | ListKind::Crawlers | ListKind::Pipeline => "limit",
    }
}

pub fn list_route(kind: ListKind, query: &ListQuery) -> Route {
    let mut route = match kind {
        ListKind::Content => Route::new(["data", "content"]),
        ListKind::Logs => Route::new(["logs"]),
        ListKind::Crawlers => Route::new(["crawlers"]),
        ListKind::Pipeline => Route::new(["data", "pipeline", "status"]),
    };
    if kind.is_paginated() {
        route.query.push(("page".into(), query.page().to_string()));
        route
            .query
            .push((page_size_param(kind).into(), query.page_size().to_string()));
    }
    route.query.extend(
        query
            .filters()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    route
}

pub fn detail_route(id: &str) -> Route {
    Route::new(["data", "content", id])
}

pub fn metrics_route() -> Route {
    Route::new(["metrics"])
}

pub fn article_route() -> Route {
    Route::new(["articles", "generate"])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleBody {
    pub enabled: bool,
}

/// Route and optional JSON body for an action.
pub fn action_route(action: Action, target_id: &str) -> (Route, Option<ToggleBody>) {
    match action {
        Action::Start => (Route::new(["crawlers", target_id, "start"]), None),
        Action::Stop => (Route::new(["crawlers", target_id, "stop"]), None),
        Action::ToggleEnabled(enabled) => (
            Route::new(["crawlers", target_id, "toggle"]),
            Some(ToggleBody { enabled }),
        ),
        Action::Reprocess => (Route::new(["data", "content", target_id, "reprocess"]), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8000").unwrap()
    }

    #[test]
    fn content_route_uses_limit_and_skips_blank_filters() {
        let query = ListQuery::build(0, 10, [("status", Some("processed")), ("source", Some(""))]);
        let url = list_route(ListKind::Content, &query).to_url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/data/content?page=1&limit=10&status=processed"
        );
    }

    #[test]
    fn logs_route_uses_page_size_param() {
        let query = ListQuery::build(2, 20, [("level", Some("ERROR"))]);
        let url = list_route(ListKind::Logs, &query).to_url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/logs?page=3&page_size=20&level=ERROR"
        );
    }

    #[test]
    fn pipeline_route_has_no_pagination() {
        let url = list_route(ListKind::Pipeline, &ListQuery::first_page(10))
            .to_url(&base())
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/data/pipeline/status");
    }

    #[test]
    fn base_path_is_preserved_and_ids_are_encoded() {
        let base = Url::parse("https://dash.example.com/ghost/").unwrap();
        let (route, body) = action_route(Action::Reprocess, "a/b c");
        let url = route.to_url(&base).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dash.example.com/ghost/api/v1/data/content/a%2Fb%20c/reprocess"
        );
        assert!(body.is_none());
    }

    #[test]
    fn toggle_carries_enabled_body() {
        let (route, body) = action_route(Action::ToggleEnabled(true), "c1");
        assert_eq!(route.segments.last().map(String::as_str), Some("toggle"));
        assert_eq!(body, Some(ToggleBody { enabled: true }));
    }
}
