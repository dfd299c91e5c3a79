//! Caching subsystem.
//!
//! One process-wide [`SourceCache`] shared by all source adapters, split
//! into three independent namespaces so each external source carries its
//! own TTL and can be invalidated on its own:
//!
//! - [`Namespace::Github`] — transformed project lists per GitHub user.
//! - [`Namespace::Skills`] — extracted skill summaries per GitHub user.
//! - [`Namespace::Linkedin`] — normalized LinkedIn profiles per identifier.
//!
//! Entries are keyed on the source identifier (the GitHub/LinkedIn
//! username). A read past the namespace TTL is a miss; expiry may be lazy.
//! Failures are never cached — adapters only insert after a successful
//! fetch, so a failing source is retried on the next request instead of
//! being stuck behind a negative entry.
//!
//! # Future extensibility: shared/distributed caching
//!
//! moka's in-memory cache is owned per-gateway instance, which is fine for
//! a single-process deployment. A horizontally scaled deployment needs a
//! shared backend; the typed get/insert surface here is backend-agnostic,
//! so the swap is a trait extraction plus a builder injection point, with
//! no adapter changes.

use std::time::Duration;

use moka::sync::Cache;

use crate::sources::github::{Project, SkillSummary};
use crate::sources::linkedin::LinkedInProfile;
use crate::telemetry;

/// Cache namespace, one per external source payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// GitHub project lists.
    Github,
    /// GitHub-derived skill summaries.
    Skills,
    /// Normalized LinkedIn profiles.
    Linkedin,
}

impl Namespace {
    /// Label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Github => "github",
            Namespace::Skills => "skills",
            Namespace::Linkedin => "linkedin",
        }
    }
}

/// Configuration for the source cache.
///
/// ```rust
/// # use vitrine::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new()
///     .github_ttl(Duration::from_secs(1800))
///     .linkedin_ttl(Duration::from_secs(12 * 3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum entries per namespace. Default: 10,000.
    pub max_entries: u64,
    /// TTL for cached project lists. Default: 1 hour.
    pub github_ttl: Duration,
    /// TTL for cached skill summaries. Default: 1 hour.
    pub skills_ttl: Duration,
    /// TTL for cached LinkedIn profiles. Default: 6 hours.
    pub linkedin_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            github_ttl: Duration::from_secs(3600),
            skills_ttl: Duration::from_secs(3600),
            linkedin_ttl: Duration::from_secs(6 * 3600),
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of entries per namespace.
    pub fn max_entries(mut self, n: u64) -> Self {
        self.max_entries = n;
        self
    }

    /// Set the TTL for cached project lists.
    pub fn github_ttl(mut self, ttl: Duration) -> Self {
        self.github_ttl = ttl;
        self
    }

    /// Set the TTL for cached skill summaries.
    pub fn skills_ttl(mut self, ttl: Duration) -> Self {
        self.skills_ttl = ttl;
        self
    }

    /// Set the TTL for cached LinkedIn profiles.
    pub fn linkedin_ttl(mut self, ttl: Duration) -> Self {
        self.linkedin_ttl = ttl;
        self
    }
}

/// Thread-safe in-memory TTL cache for external source payloads.
///
/// moka handles concurrent access internally; an insert is an atomic
/// overwrite of the whole entry, so concurrent readers see either the old
/// or the new value, never a torn one. Worst case under racing fetches is
/// a redundant network call.
pub struct SourceCache {
    projects: Cache<String, Vec<Project>>,
    skills: Cache<String, SkillSummary>,
    linkedin: Cache<String, LinkedInProfile>,
}

impl SourceCache {
    /// Create a cache from the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        fn build<V: Clone + Send + Sync + 'static>(max: u64, ttl: Duration) -> Cache<String, V> {
            Cache::builder().max_capacity(max).time_to_live(ttl).build()
        }
        Self {
            projects: build(config.max_entries, config.github_ttl),
            skills: build(config.max_entries, config.skills_ttl),
            linkedin: build(config.max_entries, config.linkedin_ttl),
        }
    }

    /// Look up a cached project list. Returns `None` on miss or expiry.
    pub fn get_projects(&self, identifier: &str) -> Option<Vec<Project>> {
        Self::observed(Namespace::Github, self.projects.get(identifier))
    }

    /// Insert (or overwrite) a project list for a GitHub user.
    pub fn insert_projects(&self, identifier: &str, projects: Vec<Project>) {
        self.projects.insert(identifier.to_string(), projects);
    }

    /// Look up a cached skill summary. Returns `None` on miss or expiry.
    pub fn get_skills(&self, identifier: &str) -> Option<SkillSummary> {
        Self::observed(Namespace::Skills, self.skills.get(identifier))
    }

    /// Insert (or overwrite) a skill summary for a GitHub user.
    pub fn insert_skills(&self, identifier: &str, skills: SkillSummary) {
        self.skills.insert(identifier.to_string(), skills);
    }

    /// Look up a cached LinkedIn profile. Returns `None` on miss or expiry.
    pub fn get_linkedin(&self, identifier: &str) -> Option<LinkedInProfile> {
        Self::observed(Namespace::Linkedin, self.linkedin.get(identifier))
    }

    /// Insert (or overwrite) a LinkedIn profile.
    pub fn insert_linkedin(&self, identifier: &str, profile: LinkedInProfile) {
        self.linkedin.insert(identifier.to_string(), profile);
    }

    /// Explicitly invalidate one entry. Idempotent.
    pub fn remove(&self, namespace: Namespace, identifier: &str) {
        match namespace {
            Namespace::Github => self.projects.invalidate(identifier),
            Namespace::Skills => self.skills.invalidate(identifier),
            Namespace::Linkedin => self.linkedin.invalidate(identifier),
        }
    }

    /// Wipe an entire namespace. Idempotent — clearing an empty or
    /// never-populated namespace succeeds.
    pub fn clear(&self, namespace: Namespace) {
        match namespace {
            Namespace::Github => self.projects.invalidate_all(),
            Namespace::Skills => self.skills.invalidate_all(),
            Namespace::Linkedin => self.linkedin.invalidate_all(),
        }
    }

    /// Number of live entries in a namespace.
    ///
    /// moka maintains this lazily; call `run_pending_tasks()` semantics do
    /// not apply to reads, so treat it as approximate.
    pub fn len(&self, namespace: Namespace) -> u64 {
        match namespace {
            Namespace::Github => self.projects.entry_count(),
            Namespace::Skills => self.skills.entry_count(),
            Namespace::Linkedin => self.linkedin.entry_count(),
        }
    }

    /// Whether a namespace holds no live entries.
    pub fn is_empty(&self, namespace: Namespace) -> bool {
        self.len(namespace) == 0
    }

    /// Emit hit/miss metrics for a lookup result.
    fn observed<V>(namespace: Namespace, value: Option<V>) -> Option<V> {
        match value {
            Some(v) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "namespace" => namespace.as_str())
                    .increment(1);
                Some(v)
            }
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "namespace" => namespace.as_str())
                    .increment(1);
                None
            }
        }
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}
