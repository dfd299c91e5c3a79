//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrine::sources::github::SkillSummary;
use vitrine::{InMemoryProfileStore, Profile, SourceCache, Vitrine, telemetry};

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

#[test]
fn cache_lookups_emit_hit_and_miss_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        let cache = SourceCache::default();
        assert!(cache.get_skills("jdoe").is_none()); // miss
        cache.insert_skills("jdoe", SkillSummary::default());
        assert!(cache.get_skills("jdoe").is_some()); // hit
    });

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_HITS_TOTAL), 1);
}

/// Runs async code within a local recorder scope on the multi-thread
/// runtime. `block_in_place` keeps the sync `with_local_recorder`
/// closure on the current thread while `block_on` drives the inner
/// async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn degraded_source_records_metrics() {
    let github = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&github)
        .await;

    let mut profile = Profile::new("jdoe", "jdoe@example.com");
    profile.social_links.github = Some("https://github.com/jdoe".to_string());

    let aggregator = Vitrine::builder()
        .profile_store(InMemoryProfileStore::with_profiles([profile]))
        .github_base_url(github.uri())
        .build()
        .unwrap();

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let result = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current()
                .block_on(async { aggregator.aggregated_profile("jdoe").await })
        })
    });
    assert!(result.is_ok(), "degradation must not fail the request");

    let snapshot = snapshotter.snapshot().into_vec();
    assert_eq!(counter_total(&snapshot, telemetry::SOURCE_DEGRADED_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::SOURCE_REQUESTS_TOTAL), 1);
    assert_eq!(counter_total(&snapshot, telemetry::AGGREGATIONS_TOTAL), 1);
}
