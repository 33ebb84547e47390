use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use lexi_config::limits::LimitsConfig;
use lexi_types::{Displayed, NoticeKind, RequestParams};
use tokio::sync::Notify;
use tokio::time::timeout;

use super::support::{FlakyStore, ScriptedService};
use crate::orchestrator::{Orchestrator, RequestState, ValidationError, validate};
use crate::repository::Repository;

async fn orchestrator(store: Arc<FlakyStore>, service: Arc<ScriptedService>) -> Orchestrator {
    let limits = LimitsConfig::default();
    let repository = Arc::new(Repository::open(store, &limits).await);
    Orchestrator::new(repository, service, limits)
}

fn ephemeral() -> RequestParams {
    RequestParams::new("Ephemeral", 25).with_tone("formal")
}

#[test]
fn test_validation_rules() {
    assert_eq!(validate(&RequestParams::new("  ", 5), 500), Err(ValidationError::EmptyWord));
    assert_eq!(
        validate(&RequestParams { word: "a".into(), ..Default::default() }, 500),
        Err(ValidationError::MissingLength)
    );
    assert_eq!(
        validate(&RequestParams::new("a", 0), 500),
        Err(ValidationError::LengthOutOfRange { length: 0, max: 500 })
    );
    assert_eq!(
        validate(&RequestParams::new("a", 501), 500),
        Err(ValidationError::LengthOutOfRange { length: 501, max: 500 })
    );
    assert_eq!(validate(&RequestParams::new("a", 1), 500), Ok(1));
    assert_eq!(validate(&RequestParams::new("a", 500), 500), Ok(500));
}

#[tokio::test]
async fn test_invalid_request_has_no_side_effects() {
    let service = ScriptedService::ok();
    let orch = orchestrator(FlakyStore::new(), service.clone()).await;

    let outcome = orch.define(RequestParams::new("", 25)).await;

    assert!(matches!(outcome.state, RequestState::Invalid(ValidationError::EmptyWord)));
    assert_eq!(outcome.notices[0].kind, NoticeKind::Error);
    assert_eq!(service.call_count(), 0);
    assert!(orch.repository().history.is_empty().await);
    assert_eq!(orch.display().current(), Displayed::Empty);
}

#[tokio::test]
async fn test_repeated_request_is_served_from_cache() {
    let service = ScriptedService::ok();
    let orch = orchestrator(FlakyStore::new(), service.clone()).await;

    let first = orch.define(ephemeral()).await;
    match &first.state {
        RequestState::Completed { entry, from_cache } => {
            assert!(!from_cache);
            assert!(!entry.cache_hit);
            assert_eq!(entry.requested_length, 25);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(service.call_count(), 1);
    assert_eq!(orch.repository().history.len().await, 1);
    assert_eq!(orch.repository().cache.stats().await.entries, 1);
    let first_stamp = orch.repository().history.items().await[0].timestamp;

    let second = orch.define(ephemeral()).await;
    match &second.state {
        RequestState::Completed { entry, from_cache } => {
            assert!(from_cache);
            assert!(entry.cache_hit);
        }
        other => panic!("unexpected state: {other:?}"),
    }
    assert_eq!(second.notices[0].message, "Loaded from cache");
    assert_eq!(service.call_count(), 1, "cache hit must not call the service");

    let history = orch.repository().history.items().await;
    assert_eq!(history.len(), 1);
    assert!(history[0].timestamp > first_stamp);
}

#[tokio::test]
async fn test_service_receives_normalized_request() {
    let service = ScriptedService::ok();
    let orch = orchestrator(FlakyStore::new(), service.clone()).await;

    orch.define(RequestParams::new("  Lucid ", 12).with_lang("EN")).await;

    let requests = service.requests.lock().unwrap();
    assert_eq!(requests[0].word, "lucid");
    assert_eq!(requests[0].length, 12);
    assert_eq!(requests[0].tone, None);
    assert_eq!(requests[0].lang.as_deref(), Some("en"));
}

#[tokio::test]
async fn test_service_failure_is_reported_and_clears_display() {
    let service = ScriptedService::failing(422, Some("Unknown word"));
    let orch = orchestrator(FlakyStore::new(), service).await;

    let outcome = orch.define(ephemeral()).await;

    assert_eq!(outcome.state, RequestState::Failed("Unknown word".to_string()));
    assert_eq!(outcome.notices[0].kind, NoticeKind::Error);
    assert_eq!(orch.display().current(), Displayed::Error("Unknown word".to_string()));
    assert!(orch.repository().history.is_empty().await);
    assert_eq!(orch.repository().cache.stats().await.entries, 0);
}

#[tokio::test]
async fn test_failure_without_message_uses_generic_text() {
    let orch = orchestrator(FlakyStore::new(), ScriptedService::failing(500, None)).await;

    let outcome = orch.define(ephemeral()).await;
    assert_eq!(outcome.state, RequestState::Failed(lexi_define::GENERIC_FAILURE.to_string()));
}

#[tokio::test]
async fn test_cache_write_failure_still_shows_result() {
    let store = FlakyStore::new();
    let service = ScriptedService::ok();
    let orch = orchestrator(store.clone(), service.clone()).await;

    store.fail_set.store(true, Ordering::SeqCst);
    let outcome = orch.define(ephemeral()).await;

    assert!(matches!(outcome.state, RequestState::Completed { from_cache: false, .. }));
    assert!(outcome.displayed);
    assert!(
        outcome
            .notices
            .iter()
            .any(|n| n.kind == NoticeKind::Warning && n.message.contains("locally"))
    );
    assert!(matches!(orch.display().current(), Displayed::Result(_)));

    // Nothing was indexed, so the next request fetches again
    store.fail_set.store(false, Ordering::SeqCst);
    assert!(orch.repository().cache.lookup(&ephemeral()).await.is_none());
    orch.define(ephemeral()).await;
    assert_eq!(service.call_count(), 2);
}

#[tokio::test]
async fn test_stale_index_entry_falls_back_to_fetch() {
    let store = FlakyStore::new();
    let service = ScriptedService::ok();
    let orch = orchestrator(store.clone(), service.clone()).await;
    orch.define(ephemeral()).await;

    store.fail_get.store(true, Ordering::SeqCst);
    let outcome = orch.define(ephemeral()).await;

    assert!(matches!(outcome.state, RequestState::Completed { from_cache: false, .. }));
    assert_eq!(service.call_count(), 2);
}

#[tokio::test]
async fn test_latest_request_owns_the_display() {
    let gate = Arc::new(Notify::new());
    let service = ScriptedService::holding_first(gate.clone());
    let orch = Arc::new(orchestrator(FlakyStore::new(), service.clone()).await);
    let mut display = orch.display().subscribe();

    let slow = tokio::spawn({
        let orch = orch.clone();
        async move { orch.define(RequestParams::new("slow", 5)).await }
    });

    // Wait until the slow run is in flight
    timeout(Duration::from_secs(2), async {
        while service.call_count() == 0 {
            display.changed().await.unwrap();
        }
    })
    .await
    .expect("slow request never started");
    assert_eq!(
        orch.display().current(),
        Displayed::Loading {
            word: "slow".to_string()
        }
    );

    let fast = orch.define(RequestParams::new("fast", 5)).await;
    assert!(fast.displayed);

    gate.notify_one();
    let slow = timeout(Duration::from_secs(2), slow)
        .await
        .expect("slow request hung")
        .unwrap();

    assert!(!slow.displayed);
    assert!(matches!(slow.state, RequestState::Completed { .. }));
    match orch.display().current() {
        Displayed::Result(entry) => assert_eq!(entry.definition.word, "fast"),
        other => panic!("unexpected display: {other:?}"),
    }

    // Both runs still land in history and cache
    assert_eq!(orch.repository().history.len().await, 2);
    assert_eq!(orch.repository().cache.stats().await.entries, 2);
}

#[tokio::test]
async fn test_non_positive_limits_fall_back_to_defaults() {
    let limits = LimitsConfig {
        history_max_items: 0,
        max_requested_length: 0,
    };
    let store = FlakyStore::new();
    let repository = Arc::new(Repository::open(store, &limits).await);
    let orchestrator = Orchestrator::new(repository.clone(), ScriptedService::ok(), limits);

    let outcome = orchestrator.define(RequestParams::new("lucid", 5)).await;
    assert!(matches!(outcome.state, RequestState::Completed { from_cache: false, .. }));
    assert_eq!(repository.history.len().await, 1);
}
