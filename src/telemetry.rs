//! Telemetry metric name constants.
//!
//! Centralised metric names for vitrine operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `vitrine_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `source` — external source name ("github", "linkedin", "translation")
//! - `namespace` — cache namespace ("github", "skills", "linkedin")
//! - `status` — outcome: "ok" or "error"

/// Total external source requests issued (cache misses that went to the
/// network).
///
/// Labels: `source`, `status` ("ok" | "error").
pub const SOURCE_REQUESTS_TOTAL: &str = "vitrine_source_requests_total";

/// External request duration in seconds.
///
/// Labels: `source`.
pub const SOURCE_REQUEST_DURATION_SECONDS: &str = "vitrine_source_request_duration_seconds";

/// Sources that failed and were degraded to an empty/absent section.
///
/// Labels: `source`.
pub const SOURCE_DEGRADED_TOTAL: &str = "vitrine_source_degraded_total";

/// Total cache hits.
///
/// Labels: `namespace`.
pub const CACHE_HITS_TOTAL: &str = "vitrine_cache_hits_total";

/// Total cache misses (absent or expired).
///
/// Labels: `namespace`.
pub const CACHE_MISSES_TOTAL: &str = "vitrine_cache_misses_total";

/// Translation outcomes.
///
/// Labels: `status` ("memoized" | "translated" | "noop" | "error").
pub const TRANSLATIONS_TOTAL: &str = "vitrine_translations_total";

/// Aggregation requests served.
///
/// Labels: `status` ("ok" | "not_found").
pub const AGGREGATIONS_TOTAL: &str = "vitrine_aggregations_total";
