use ghostwriter_logging::{gw_debug, gw_warn};

use crate::{ActionOutcome, AppState, Effect, ListKind, ListQuery, Msg, PollTarget};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ListMounted(list) => {
            if state.list_mut(list).mount() {
                state.mark_dirty();
                refresh_effects(&mut state, list)
            } else {
                Vec::new()
            }
        }
        Msg::ListUnmounted(list) => {
            if state.list_mut(list).unmount() {
                state.mark_dirty();
                stop_polling(PollTarget::List(list))
            } else {
                Vec::new()
            }
        }
        Msg::PageChanged { list, page_index } => {
            let query = state.list(list).query().with_page_index(page_index);
            change_query(&mut state, list, query)
        }
        Msg::PageSizeChanged { list, page_size } => {
            let query = state.list(list).query().with_page_size(page_size);
            change_query(&mut state, list, query)
        }
        Msg::FilterChanged { list, key, value } => {
            let query = state.list(list).query().with_filter(&key, value.as_deref());
            change_query(&mut state, list, query)
        }
        Msg::FiltersCleared(list) => {
            let query = state.list(list).query().without_filters();
            change_query(&mut state, list, query)
        }
        Msg::RefreshRequested(list) => {
            if state.list(list).is_mounted() {
                state.mark_dirty();
                vec![fetch_list(&mut state, list)]
            } else {
                Vec::new()
            }
        }
        Msg::PollTick(PollTarget::List(list)) => {
            if state.list(list).is_mounted() {
                state.mark_dirty();
                vec![fetch_list(&mut state, list)]
            } else {
                gw_debug!("Ignoring poll tick for unmounted list {}", list);
                Vec::new()
            }
        }
        Msg::PollTick(PollTarget::Metrics) => {
            if state.metrics_mounted() {
                state.mark_dirty();
                vec![Effect::FetchMetrics {
                    seq: state.metrics_mut().begin(),
                }]
            } else {
                Vec::new()
            }
        }
        Msg::ListFetched { list, seq, result } => {
            if state.list_mut(list).complete(seq, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MetricsMounted => {
            if state.set_metrics_mounted(true) {
                state.mark_dirty();
                let mut effects = vec![Effect::FetchMetrics {
                    seq: state.metrics_mut().begin(),
                }];
                effects.extend(start_polling(PollTarget::Metrics));
                effects
            } else {
                Vec::new()
            }
        }
        Msg::MetricsUnmounted => {
            if state.set_metrics_mounted(false) {
                state.metrics_mut().cancel();
                state.mark_dirty();
                stop_polling(PollTarget::Metrics)
            } else {
                Vec::new()
            }
        }
        Msg::MetricsFetched { seq, result } => {
            if state.metrics_mut().complete(seq, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::DetailRequested { id } => {
            let id = id.trim().to_string();
            if id.is_empty() {
                return (state, Vec::new());
            }
            let seq = state.open_detail(id.clone());
            state.mark_dirty();
            vec![Effect::FetchDetail { seq, id }]
        }
        Msg::DetailClosed => {
            state.close_detail();
            state.mark_dirty();
            Vec::new()
        }
        Msg::DetailFetched { seq, result } => {
            if state.detail_mut().complete(seq, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ActionRequested { action, target_id } => {
            let target_id = target_id.trim().to_string();
            if target_id.is_empty() {
                return (state, Vec::new());
            }
            let action_id = state.start_action(action, target_id.clone());
            state.mark_dirty();
            vec![Effect::DispatchAction {
                action_id,
                action,
                target_id,
            }]
        }
        Msg::ActionCompleted { action_id, result } => {
            let outcome = match result {
                Ok(()) => ActionOutcome::Acknowledged,
                Err(reason) => {
                    gw_warn!("Action {} failed: {}", action_id, reason);
                    ActionOutcome::Failed(reason)
                }
            };
            let acknowledged = outcome == ActionOutcome::Acknowledged;
            match state.finish_action(action_id, outcome) {
                Some(action) => {
                    state.mark_dirty();
                    let list = action.owning_list();
                    if acknowledged && state.list(list).is_mounted() {
                        vec![fetch_list(&mut state, list)]
                    } else {
                        Vec::new()
                    }
                }
                None => Vec::new(),
            }
        }
        Msg::ArticleSubmitted(form) => {
            state.mark_dirty();
            match form.validate() {
                Ok(request) => {
                    state.set_article_error(None);
                    vec![Effect::GenerateArticle {
                        seq: state.article_mut().begin(),
                        request,
                    }]
                }
                Err(err) => {
                    state.set_article_error(Some(err));
                    Vec::new()
                }
            }
        }
        Msg::ArticleGenerated { seq, result } => {
            if state.article_mut().complete(seq, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Apply a new query. A mounted list fetches at once and, when polled,
/// restarts its timer so the next tick is a full interval away.
fn change_query(state: &mut AppState, list: ListKind, query: ListQuery) -> Vec<Effect> {
    if !state.list_mut(list).set_query(query) {
        return Vec::new();
    }
    state.mark_dirty();
    if state.list(list).is_mounted() {
        refresh_effects(state, list)
    } else {
        Vec::new()
    }
}

fn refresh_effects(state: &mut AppState, list: ListKind) -> Vec<Effect> {
    let mut effects = vec![fetch_list(state, list)];
    effects.extend(start_polling(PollTarget::List(list)));
    effects
}

fn fetch_list(state: &mut AppState, list: ListKind) -> Effect {
    let (seq, query) = state.list_mut(list).begin_fetch();
    Effect::FetchList { list, seq, query }
}

fn start_polling(target: PollTarget) -> Option<Effect> {
    target
        .interval()
        .map(|interval| Effect::StartPolling { target, interval })
}

fn stop_polling(target: PollTarget) -> Vec<Effect> {
    if target.interval().is_some() {
        vec![Effect::StopPolling { target }]
    } else {
        Vec::new()
    }
}
