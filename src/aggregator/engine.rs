//! The aggregation engine: resolve a profile, consult each configured
//! source through the cache, merge, and degrade per source on failure.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};
use url::Url;

use super::view::{AggregatedProfileView, CombinedSkills};
use crate::cache::{Namespace, SourceCache};
use crate::profile::ProfileStore;
use crate::sources::github::{self, GitHubClient, Project, SkillSummary};
use crate::sources::linkedin::{LinkedInClient, LinkedInProfile};
use crate::sources::translate::TranslationClient;
use crate::telemetry;
use crate::{Result, VitrineError};

/// Per-source outcome, kept typed internally so failure reasons survive
/// to the log line even though the public payload collapses them into
/// empty sections.
enum SourceOutcome<T> {
    Ok(T),
    Unavailable(String),
}

/// Produces merged public-portfolio views. Built via
/// [`Vitrine::builder()`](crate::Vitrine::builder).
pub struct Aggregator {
    pub(super) store: Arc<dyn ProfileStore>,
    pub(super) github: GitHubClient,
    pub(super) linkedin: Option<LinkedInClient>,
    pub(super) translator: Option<TranslationClient>,
    pub(super) cache: SourceCache,
    pub(super) public_base_url: Option<Url>,
}

impl Aggregator {
    /// Produce the merged public view for a username.
    ///
    /// Fails only when the profile itself is missing. Each configured
    /// source degrades independently: a GitHub failure yields empty
    /// skill lists, a LinkedIn failure yields `linkedin_data: None`.
    pub async fn aggregated_profile(&self, username: &str) -> Result<AggregatedProfileView> {
        let Some(mut profile) = self.store.find_by_username(username).await? else {
            metrics::counter!(telemetry::AGGREGATIONS_TOTAL, "status" => "not_found").increment(1);
            return Err(VitrineError::ProfileNotFound(username.to_string()));
        };

        let github_ident = profile
            .social_links
            .github
            .as_deref()
            .and_then(source_identifier);
        let linkedin_ident = profile
            .social_links
            .linkedin
            .as_deref()
            .and_then(source_identifier);

        // The sources are independent and failure-isolated, so fetch
        // them concurrently.
        let (skills_outcome, linkedin_outcome) = tokio::join!(
            self.github_skills(github_ident.as_deref()),
            self.linkedin_profile(linkedin_ident.as_deref()),
        );

        let github_skills = match skills_outcome {
            Some(SourceOutcome::Ok(skills)) => skills,
            Some(SourceOutcome::Unavailable(reason)) => {
                warn!(username, %reason, "GitHub source degraded to empty skills");
                metrics::counter!(telemetry::SOURCE_DEGRADED_TOTAL, "source" => "github")
                    .increment(1);
                SkillSummary::default()
            }
            None => SkillSummary::default(),
        };

        let linkedin_data = match linkedin_outcome {
            Some(SourceOutcome::Ok(data)) => Some(data),
            Some(SourceOutcome::Unavailable(reason)) => {
                warn!(username, %reason, "LinkedIn source omitted from aggregation");
                metrics::counter!(telemetry::SOURCE_DEGRADED_TOTAL, "source" => "linkedin")
                    .increment(1);
                None
            }
            None => None,
        };

        let combined_skills = merge_skills(profile.visible_skill_names(), github_skills);

        profile.image_url = profile
            .image_url
            .take()
            .map(|u| self.resolve_media_url(&u));
        profile.cv_url = profile.cv_url.take().map(|u| self.resolve_media_url(&u));

        metrics::counter!(telemetry::AGGREGATIONS_TOTAL, "status" => "ok").increment(1);

        Ok(AggregatedProfileView {
            profile,
            combined_skills,
            linkedin_data,
        })
    }

    /// Cache-checked project list for a username's GitHub account.
    ///
    /// Empty when the profile has no GitHub link. Unlike aggregation
    /// this propagates source failures — the caller asked for projects
    /// specifically, so there is nothing to degrade into.
    pub async fn projects(&self, username: &str) -> Result<Vec<Project>> {
        let Some(profile) = self.store.find_by_username(username).await? else {
            return Err(VitrineError::ProfileNotFound(username.to_string()));
        };

        let Some(ident) = profile
            .social_links
            .github
            .as_deref()
            .and_then(source_identifier)
        else {
            return Ok(Vec::new());
        };

        if let Some(projects) = self.cache.get_projects(&ident) {
            return Ok(projects);
        }

        let repos = self.fetch_repos_timed(&ident).await?;
        let projects = github::projects(&repos);
        self.cache.insert_projects(&ident, projects.clone());
        self.cache.insert_skills(&ident, github::extract_skills(&repos));
        Ok(projects)
    }

    /// Wipe one cache namespace. Idempotent; always succeeds.
    pub fn clear_cache(&self, namespace: Namespace) {
        debug!(namespace = namespace.as_str(), "clearing source cache");
        self.cache.clear(namespace);
    }

    /// Invalidate the cached entries for a single source identifier.
    pub fn invalidate(&self, namespace: Namespace, identifier: &str) {
        self.cache.remove(namespace, identifier);
    }

    async fn github_skills(&self, ident: Option<&str>) -> Option<SourceOutcome<SkillSummary>> {
        let ident = ident?;

        if let Some(skills) = self.cache.get_skills(ident) {
            return Some(SourceOutcome::Ok(skills));
        }

        let outcome = match self.fetch_repos_timed(ident).await {
            Ok(repos) => {
                let skills = github::extract_skills(&repos);
                self.cache.insert_skills(ident, skills.clone());
                // One fetch feeds both namespaces.
                self.cache.insert_projects(ident, github::projects(&repos));
                SourceOutcome::Ok(skills)
            }
            Err(e) => SourceOutcome::Unavailable(e.to_string()),
        };
        Some(outcome)
    }

    async fn linkedin_profile(&self, ident: Option<&str>) -> Option<SourceOutcome<LinkedInProfile>> {
        // No configured client or no stored link: no network call at all.
        let client = self.linkedin.as_ref()?;
        let ident = ident?;

        if let Some(profile) = self.cache.get_linkedin(ident) {
            return Some(SourceOutcome::Ok(profile));
        }

        let started = Instant::now();
        let result = client.fetch_profile(ident).await;
        observe_source("linkedin", started, result.is_ok());

        let mut profile = match result {
            Ok(p) => p,
            Err(e) => return Some(SourceOutcome::Unavailable(e.to_string())),
        };

        // Localize the bio before caching so the cached entry already
        // carries the German half (memoized translations make repeats
        // cheap, but there is no reason to repeat them per hit).
        if let Some(translator) = &self.translator {
            profile.bio.de = translator
                .translate_or_original(&profile.bio.en, "en", "de")
                .await;
        }

        self.cache.insert_linkedin(ident, profile.clone());
        Some(SourceOutcome::Ok(profile))
    }

    async fn fetch_repos_timed(&self, ident: &str) -> Result<Vec<github::Repo>> {
        let started = Instant::now();
        let result = self.github.fetch_repos(ident).await;
        observe_source("github", started, result.is_ok());
        result
    }

    /// Resolve a possibly relative media URL against the configured
    /// public base. Already-absolute URLs and unconfigured bases pass
    /// through unchanged.
    fn resolve_media_url(&self, stored: &str) -> String {
        if stored.starts_with("http://") || stored.starts_with("https://") {
            return stored.to_string();
        }
        match &self.public_base_url {
            Some(base) => base
                .join(stored)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| stored.to_string()),
            None => stored.to_string(),
        }
    }
}

fn observe_source(source: &'static str, started: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::SOURCE_REQUESTS_TOTAL, "source" => source, "status" => status)
        .increment(1);
    metrics::histogram!(telemetry::SOURCE_REQUEST_DURATION_SECONDS, "source" => source)
        .record(started.elapsed().as_secs_f64());
}

/// Last path segment of a social link URL, or the value itself when it
/// is already a bare username.
fn source_identifier(link: &str) -> Option<String> {
    let trimmed = link.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        // Query/fragment noise some stored links carry is dropped here.
        return url
            .path_segments()?
            .filter(|s| !s.is_empty())
            .next_back()
            .map(str::to_string);
    }
    let bare = trimmed.trim_matches('/');
    if bare.is_empty() {
        None
    } else {
        Some(bare.to_string())
    }
}

/// Merge stored profile skills with GitHub-derived skills.
///
/// `programming_languages` is the case-insensitive dedupe of profile
/// skills (first) and GitHub languages (second); first spelling seen
/// wins. `other_skills` comes from GitHub only.
fn merge_skills(profile_skills: Vec<String>, github: SkillSummary) -> CombinedSkills {
    let mut languages: Vec<String> = Vec::new();
    for skill in profile_skills
        .into_iter()
        .chain(github.programming_languages)
    {
        if !languages.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
            languages.push(skill);
        }
    }

    CombinedSkills {
        programming_languages: languages,
        other_skills: github.other_skills,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_from_profile_url() {
        assert_eq!(
            source_identifier("https://github.com/jdoe").as_deref(),
            Some("jdoe")
        );
        assert_eq!(
            source_identifier("https://www.linkedin.com/in/jane-doe/").as_deref(),
            Some("jane-doe")
        );
        assert_eq!(
            source_identifier("https://github.com/jdoe?tab=repos").as_deref(),
            Some("jdoe")
        );
    }

    #[test]
    fn identifier_from_bare_username() {
        assert_eq!(source_identifier("jdoe").as_deref(), Some("jdoe"));
    }

    #[test]
    fn identifier_rejects_empty() {
        assert!(source_identifier("").is_none());
        assert!(source_identifier("   ").is_none());
        assert!(source_identifier("https://github.com/").is_none());
    }

    #[test]
    fn merge_dedupes_case_insensitively_keeping_first_spelling() {
        let merged = merge_skills(
            vec!["typescript".to_string(), "Docker".to_string()],
            SkillSummary {
                programming_languages: vec!["TypeScript".to_string(), "Rust".to_string()],
                other_skills: vec!["Web App".to_string()],
            },
        );
        assert_eq!(
            merged.programming_languages,
            vec!["typescript", "Docker", "Rust"]
        );
        assert_eq!(merged.other_skills, vec!["Web App"]);
    }

    #[test]
    fn merge_keeps_other_skills_from_github_only() {
        // The asymmetry: profile custom skills never join other_skills.
        let merged = merge_skills(
            vec!["Public Speaking".to_string()],
            SkillSummary::default(),
        );
        assert_eq!(merged.programming_languages, vec!["Public Speaking"]);
        assert!(merged.other_skills.is_empty());
    }
}
