use std::sync::Once;

use ghostwriter_core::{
    update, Action, ActionOutcome, AppState, ContentRecord, CrawlerRecord, Effect, FetchState,
    ListKind, ListQuery, ListResult, Msg, Record,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ghostwriter_logging::initialize_for_tests);
}

fn crawler_page(query: &ListQuery, enabled: bool) -> ListResult {
    ListResult {
        items: vec![Record::Crawler(CrawlerRecord {
            id: "c1".into(),
            name: Some("news".into()),
            enabled,
            status: Some("idle".into()),
            last_run: None,
            urls_crawled: Some(12),
        })],
        total: 1,
        query: query.clone(),
    }
}

fn fetches(effects: &[Effect]) -> Vec<(u64, ListQuery)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchList { seq, query, .. } => Some((*seq, query.clone())),
            _ => None,
        })
        .collect()
}

fn dispatch_id(effects: &[Effect]) -> u64 {
    match effects {
        [Effect::DispatchAction { action_id, .. }] => *action_id,
        other => panic!("expected a single dispatch, got {other:?}"),
    }
}

/// Mount a list and land its first page.
fn mounted_with(state: AppState, kind: ListKind, page: impl Fn(&ListQuery) -> ListResult) -> AppState {
    let (state, effects) = update(state, Msg::ListMounted(kind));
    let (seq, query) = fetches(&effects).remove(0);
    let (state, _effects) = update(
        state,
        Msg::ListFetched {
            list: kind,
            seq,
            result: Ok(page(&query)),
        },
    );
    state
}

#[test]
fn action_emits_single_dispatch_and_marks_pending() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::ActionRequested {
            action: Action::Start,
            target_id: " c1 ".into(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::DispatchAction {
            action_id: 1,
            action: Action::Start,
            target_id: "c1".into(),
        }]
    );
    assert_eq!(state.action(1).unwrap().outcome, ActionOutcome::Pending);
    assert_eq!(state.view().actions.len(), 1);
}

#[test]
fn blank_target_is_ignored() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::ActionRequested {
            action: Action::Reprocess,
            target_id: "  ".into(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().actions.is_empty());
}

#[test]
fn toggling_enabled_twice_refetches_once_per_call() {
    init_logging();
    let mut state = mounted_with(AppState::new(), ListKind::Crawlers, |q| crawler_page(q, false));

    for _ in 0..2 {
        let (next, effects) = update(
            state,
            Msg::ActionRequested {
                action: Action::ToggleEnabled(true),
                target_id: "c1".into(),
            },
        );
        let action_id = dispatch_id(&effects);

        let (next, effects) = update(
            next,
            Msg::ActionCompleted {
                action_id,
                result: Ok(()),
            },
        );
        let refetches = fetches(&effects);
        assert_eq!(refetches.len(), 1);
        let (seq, query) = refetches[0].clone();

        let (next, _effects) = update(
            next,
            Msg::ListFetched {
                list: ListKind::Crawlers,
                seq,
                result: Ok(crawler_page(&query, true)),
            },
        );
        assert_eq!(
            next.action(action_id).unwrap().outcome,
            ActionOutcome::Acknowledged
        );
        state = next;
    }

    match state.list(ListKind::Crawlers).state() {
        FetchState::Success(result) => match &result.items[0] {
            Record::Crawler(crawler) => assert!(crawler.enabled),
            other => panic!("unexpected record {other:?}"),
        },
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(state.view().actions.len(), 2);
}

#[test]
fn failed_reprocess_leaves_documents_untouched() {
    init_logging();
    let state = mounted_with(AppState::new(), ListKind::Content, |query| ListResult {
        items: vec![Record::Content(ContentRecord {
            id: Some("abc".into()),
            url: "https://example.com/abc".into(),
            title: Some("ABC".into()),
            status: Some("failed".into()),
            source: Some("web".into()),
            data_type: None,
            date_crawled: None,
            word_count: None,
            tags: vec!["ai".into()],
        })],
        total: 1,
        query: query.clone(),
    });
    let before = state.list(ListKind::Content).clone();

    let (state, effects) = update(
        state,
        Msg::ActionRequested {
            action: Action::Reprocess,
            target_id: "abc".into(),
        },
    );
    let action_id = dispatch_id(&effects);

    let (state, effects) = update(
        state,
        Msg::ActionCompleted {
            action_id,
            result: Err("http status 500".into()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.list(ListKind::Content), &before);
    assert_eq!(
        state.action(action_id).unwrap().outcome,
        ActionOutcome::Failed("http status 500".into())
    );
    let view = state.view();
    assert!(view.list(ListKind::Content).unwrap().error.is_none());
    assert_eq!(
        view.actions[0].outcome,
        ActionOutcome::Failed("http status 500".into())
    );
}

#[test]
fn acknowledged_action_on_unmounted_list_does_not_fetch() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::ActionRequested {
            action: Action::Stop,
            target_id: "c9".into(),
        },
    );
    let action_id = dispatch_id(&effects);

    let (state, effects) = update(
        state,
        Msg::ActionCompleted {
            action_id,
            result: Ok(()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.action(action_id).unwrap().outcome,
        ActionOutcome::Acknowledged
    );
}

#[test]
fn unknown_action_completion_is_ignored() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::ActionCompleted {
            action_id: 42,
            result: Ok(()),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn action_history_is_bounded() {
    init_logging();
    let limit = ghostwriter_core::ACTION_HISTORY_LIMIT;
    let mut state = AppState::new();
    for i in 0..(limit + 5) {
        let (next, effects) = update(
            state,
            Msg::ActionRequested {
                action: Action::Reprocess,
                target_id: format!("doc-{i}"),
            },
        );
        let action_id = dispatch_id(&effects);
        let (next, _effects) = update(
            next,
            Msg::ActionCompleted {
                action_id,
                result: Ok(()),
            },
        );
        state = next;
    }
    let view = state.view();
    assert_eq!(view.actions.len(), limit);
    assert_eq!(view.actions[0].target_id, format!("doc-{}", limit + 4));
    assert!(state.action(1).is_none());
}

#[test]
fn pending_actions_outlive_the_history_limit() {
    init_logging();
    let limit = ghostwriter_core::ACTION_HISTORY_LIMIT;
    let mut state = mounted_with(AppState::new(), ListKind::Content, |query| ListResult {
        items: Vec::new(),
        total: 0,
        query: query.clone(),
    });
    let mut ids = Vec::new();
    for i in 0..=limit {
        let (next, effects) = update(
            state,
            Msg::ActionRequested {
                action: Action::Reprocess,
                target_id: format!("doc-{i}"),
            },
        );
        ids.push(dispatch_id(&effects));
        state = next;
    }
    assert_eq!(state.view().actions.len(), limit + 1);

    // The oldest action still refetches its list when acknowledged.
    let (state, effects) = update(
        state,
        Msg::ActionCompleted {
            action_id: ids[0],
            result: Ok(()),
        },
    );
    assert_eq!(fetches(&effects).len(), 1);
    assert_eq!(
        state.action(ids[0]).map(|record| record.outcome.clone()),
        Some(ActionOutcome::Acknowledged)
    );

    // A failure is recorded for the action, not swallowed.
    let (state, effects) = update(
        state,
        Msg::ActionCompleted {
            action_id: ids[1],
            result: Err("http status 500: Internal Server Error".into()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.action(ids[1]).map(|record| record.outcome.clone()),
        Some(ActionOutcome::Failed(
            "http status 500: Internal Server Error".into()
        ))
    );

    // The next request trims settled actions, oldest first.
    let (state, _effects) = update(
        state,
        Msg::ActionRequested {
            action: Action::Reprocess,
            target_id: "doc-next".into(),
        },
    );
    assert_eq!(state.view().actions.len(), limit);
    assert!(state.action(ids[0]).is_none());
    assert!(state.action(ids[1]).is_none());
    assert!(state.action(ids[2]).is_some());
}
