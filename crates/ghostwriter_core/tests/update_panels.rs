use std::sync::Once;

use ghostwriter_core::{
    update, AppState, ArticleForm, ArticleResponse, ContentDetail, ContentRecord, DailyStats,
    DateRange, Effect, Metrics, Msg, PollTarget, ValidationError, METRICS_POLL_INTERVAL,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ghostwriter_logging::initialize_for_tests);
}

fn metrics(active: u64) -> Metrics {
    Metrics {
        active_crawlers: active,
        urls_processed: 1500,
        average_processing_time: "2.1s".into(),
        daily_stats: DailyStats {
            processed: vec![50, 60],
            dates: vec!["Mon".into(), "Tue".into()],
        },
    }
}

fn valid_form() -> ArticleForm {
    ArticleForm {
        outline: "Impact of AI on newsrooms".into(),
        audience: "editors".into(),
        writing_style: "analytical".into(),
        imagination_level: 3,
        research_level: 4,
        start_date: "2024-01-01".into(),
        end_date: "2024-03-31".into(),
    }
}

#[test]
fn metrics_mount_fetches_and_polls_every_thirty_seconds() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::MetricsMounted);
    assert_eq!(
        effects,
        vec![
            Effect::FetchMetrics { seq: 1 },
            Effect::StartPolling {
                target: PollTarget::Metrics,
                interval: METRICS_POLL_INTERVAL,
            },
        ]
    );

    let (state, effects) = update(state, Msg::PollTick(PollTarget::Metrics));
    assert_eq!(effects, vec![Effect::FetchMetrics { seq: 2 }]);

    // The tick superseded the first fetch.
    let (state, _effects) = update(
        state,
        Msg::MetricsFetched {
            seq: 1,
            result: Ok(metrics(3)),
        },
    );
    assert!(state.view().metrics.metrics.is_none());

    let (state, _effects) = update(
        state,
        Msg::MetricsFetched {
            seq: 2,
            result: Ok(metrics(5)),
        },
    );
    assert_eq!(state.view().metrics.metrics, Some(metrics(5)));

    let (state, effects) = update(state, Msg::MetricsUnmounted);
    assert_eq!(
        effects,
        vec![Effect::StopPolling {
            target: PollTarget::Metrics
        }]
    );
    let (_state, effects) = update(state, Msg::PollTick(PollTarget::Metrics));
    assert!(effects.is_empty());
}

#[test]
fn detail_keeps_only_latest_request() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DetailRequested { id: "a".into() });
    assert_eq!(
        effects,
        vec![Effect::FetchDetail {
            seq: 1,
            id: "a".into()
        }]
    );
    let (state, effects) = update(state, Msg::DetailRequested { id: "b".into() });
    assert_eq!(
        effects,
        vec![Effect::FetchDetail {
            seq: 2,
            id: "b".into()
        }]
    );

    let detail = |url: &str| ContentDetail {
        record: ContentRecord {
            id: None,
            url: url.into(),
            title: None,
            status: None,
            source: None,
            data_type: None,
            date_crawled: None,
            word_count: None,
            tags: Vec::new(),
        },
        summary: Some("summary".into()),
        raw_content: None,
        processed_content: None,
        classifications: None,
    };

    let (state, _effects) = update(
        state,
        Msg::DetailFetched {
            seq: 1,
            result: Ok(detail("https://a.example.com")),
        },
    );
    let (state, _effects) = update(
        state,
        Msg::DetailFetched {
            seq: 2,
            result: Ok(detail("https://b.example.com")),
        },
    );
    let view = state.view().detail.unwrap();
    assert_eq!(view.id, "b");
    assert_eq!(view.detail.unwrap().record.url, "https://b.example.com");

    let (state, _effects) = update(state, Msg::DetailClosed);
    assert!(state.view().detail.is_none());
}

fn detail_at(url: &str) -> ContentDetail {
    ContentDetail {
        record: ContentRecord {
            id: None,
            url: url.into(),
            title: None,
            status: None,
            source: None,
            data_type: None,
            date_crawled: None,
            word_count: None,
            tags: Vec::new(),
        },
        summary: None,
        raw_content: None,
        processed_content: None,
        classifications: None,
    }
}

#[test]
fn switching_documents_never_shows_the_previous_payload() {
    init_logging();
    let (state, _effects) = update(AppState::new(), Msg::DetailRequested { id: "a".into() });
    let (state, _effects) = update(
        state,
        Msg::DetailFetched {
            seq: 1,
            result: Ok(detail_at("https://a.example.com")),
        },
    );

    let (state, effects) = update(state, Msg::DetailRequested { id: "b".into() });
    assert_eq!(
        effects,
        vec![Effect::FetchDetail {
            seq: 2,
            id: "b".into()
        }]
    );
    let loading = state.view().detail.unwrap();
    assert!(loading.loading);
    assert!(loading.detail.is_none());

    let (state, _effects) = update(
        state,
        Msg::DetailFetched {
            seq: 2,
            result: Err("http status 404: Not Found".into()),
        },
    );
    let view = state.view().detail.unwrap();
    assert_eq!(view.id, "b");
    assert_eq!(view.error.as_deref(), Some("http status 404: Not Found"));
    assert!(view.detail.is_none());
}

#[test]
fn reopening_the_same_document_keeps_it_while_refreshing() {
    init_logging();
    let (state, _effects) = update(AppState::new(), Msg::DetailRequested { id: "a".into() });
    let (state, _effects) = update(
        state,
        Msg::DetailFetched {
            seq: 1,
            result: Ok(detail_at("https://a.example.com")),
        },
    );
    let (state, _effects) = update(state, Msg::DetailRequested { id: " a ".into() });

    let view = state.view().detail.unwrap();
    assert!(view.loading);
    assert_eq!(view.detail.unwrap().record.url, "https://a.example.com");
}

#[test]
fn invalid_article_form_blocks_submission() {
    init_logging();
    let form = ArticleForm {
        outline: "   ".into(),
        ..valid_form()
    };
    let (state, effects) = update(AppState::new(), Msg::ArticleSubmitted(form));

    assert!(effects.is_empty());
    assert_eq!(
        state.article_error(),
        Some(&ValidationError::Missing("outline"))
    );
    assert_eq!(
        state.view().article.error.as_deref(),
        Some("outline is required")
    );
}

#[test]
fn article_validation_rules() {
    let out_of_range = ArticleForm {
        imagination_level: 6,
        ..valid_form()
    };
    assert_eq!(
        out_of_range.validate(),
        Err(ValidationError::LevelOutOfRange {
            field: "imagination level",
            value: 6
        })
    );

    let zero_research = ArticleForm {
        research_level: 0,
        ..valid_form()
    };
    assert!(matches!(
        zero_research.validate(),
        Err(ValidationError::LevelOutOfRange { .. })
    ));

    let bad_date = ArticleForm {
        start_date: "01/02/2024".into(),
        ..valid_form()
    };
    assert!(matches!(
        bad_date.validate(),
        Err(ValidationError::InvalidDate {
            field: "start date",
            ..
        })
    ));

    let inverted = ArticleForm {
        start_date: "2024-05-01".into(),
        end_date: "2024-04-01".into(),
        ..valid_form()
    };
    assert!(matches!(
        inverted.validate(),
        Err(ValidationError::InvertedRange { .. })
    ));

    let missing_end = ArticleForm {
        end_date: String::new(),
        ..valid_form()
    };
    assert_eq!(
        missing_end.validate(),
        Err(ValidationError::Missing("end date"))
    );
}

#[test]
fn valid_article_form_posts_and_stores_response() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ArticleSubmitted(valid_form()));
    let (seq, request) = match effects.as_slice() {
        [Effect::GenerateArticle { seq, request }] => (*seq, request.clone()),
        other => panic!("expected article effect, got {other:?}"),
    };
    assert_eq!(request.outline, "Impact of AI on newsrooms");
    assert_eq!(
        request.date_range,
        DateRange {
            start: "2024-01-01".into(),
            end: "2024-03-31".into(),
        }
    );
    assert!(state.view().article.submitting);

    let response = ArticleResponse {
        agent_prompt: "Write about AI in newsrooms".into(),
        search_terms: vec!["newsroom automation".into()],
        date_range: request.date_range.clone(),
    };
    let (state, _effects) = update(
        state,
        Msg::ArticleGenerated {
            seq,
            result: Ok(response.clone()),
        },
    );
    let view = state.view().article;
    assert!(!view.submitting);
    assert_eq!(view.response, Some(response));
    assert!(view.error.is_none());
}
