//! GitHub repository adapter: fetch, skill extraction, project transforms.
//!
//! Uses the unauthenticated REST API, so calls are rate-limited and
//! best-effort. The client only fetches; the pure transforms
//! [`extract_skills`] and [`projects`] turn a repo list into the shapes
//! the aggregator serves, and the aggregator decides what to cache.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{Result, VitrineError};

/// Default base URL for the GitHub REST API.
pub(crate) const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default request timeout for GitHub calls. No automatic retry —
/// failures are never cached, so the next incoming request retries
/// naturally.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Keep at most this many ranked programming languages.
const MAX_PROGRAMMING_LANGUAGES: usize = 15;

/// Keep at most this many ranked other skills.
const MAX_OTHER_SKILLS: usize = 20;

/// Tags per project beyond the primary language.
const MAX_PROJECT_TOPICS: usize = 3;

/// Language names that count as programming languages when ranking
/// skills. Matching is case-insensitive; the canonical spelling here is
/// what ends up in the output.
const KNOWN_LANGUAGES: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C",
    "C++",
    "C#",
    "Go",
    "Rust",
    "Ruby",
    "PHP",
    "Swift",
    "Kotlin",
    "Scala",
    "Dart",
    "R",
    "Perl",
    "Haskell",
    "Elixir",
    "Clojure",
    "Lua",
    "Shell",
    "Objective-C",
    "HTML",
    "CSS",
    "SQL",
];

/// YouTube watch URL embedded in a repo description, if any.
static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=[A-Za-z0-9_-]+")
        .expect("invalid YouTube URL regex")
});

/// A repository record as returned by `GET /users/{user}/repos`.
///
/// Only the fields the transforms consume; everything optional-ish is
/// tolerated as absent so schema drift on GitHub's side degrades to
/// defaults instead of a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
    #[serde(default)]
    pub fork: bool,
    #[serde(default, rename = "private")]
    pub is_private: bool,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
}

/// Ranked skills extracted from a user's repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    /// Most-frequent first, at most 15 entries.
    pub programming_languages: Vec<String>,
    /// Most-frequent first, at most 20 entries.
    pub other_skills: Vec<String>,
}

/// An `{en, de}` text pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    pub en: String,
    pub de: String,
}

impl Localized {
    /// Both halves carry the same text.
    pub fn mirrored(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            de: text.clone(),
            en: text,
        }
    }
}

/// A public repository reshaped for the portfolio page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub title: Localized,
    pub description: Localized,
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub stars: u32,
    pub forks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<String>,
}

/// Client for the GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_url: String,
}

impl GitHubClient {
    /// Create a client against the public GitHub API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom base URL and request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = Client::builder()
            // GitHub rejects requests without a User-Agent.
            .user_agent(concat!("vitrine/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetch a user's repositories, most recently pushed first.
    ///
    /// One page of up to 100 repos — enough for a portfolio; pagination
    /// past that would only add long-dead projects.
    pub async fn fetch_repos(&self, username: &str) -> Result<Vec<Repo>> {
        let url = format!("{}/users/{}/repos", self.base_url, username);

        let response = self
            .http
            .get(&url)
            .query(&[("sort", "pushed"), ("per_page", "100")])
            .send()
            .await
            .map_err(|e| VitrineError::Http(e.to_string()))?;

        handle_response_errors(&response, username)?;

        response
            .json()
            .await
            .map_err(|e| VitrineError::Http(e.to_string()))
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Check response status and map to the appropriate error.
fn handle_response_errors(response: &reqwest::Response, username: &str) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        404 => Err(VitrineError::SourceUnavailable(format!(
            "GitHub user not found: {username}"
        ))),
        403 | 429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(VitrineError::RateLimited { retry_after })
        }
        code => Err(VitrineError::Api {
            status: code,
            message: format!("GitHub API error: {status}"),
        }),
    }
}

// ============================================================================
// Pure transforms
// ============================================================================

/// Extract ranked skills from a repo list.
///
/// Fork and private repos are skipped. Each surviving repo contributes
/// its primary language plus its topics (de-hyphenated and title-cased).
/// Tokens on the [`KNOWN_LANGUAGES`] allow-list rank as programming
/// languages, everything else as other skills. Each table is sorted by
/// descending frequency (stable, so ties keep first-occurrence order)
/// and truncated.
pub fn extract_skills(repos: &[Repo]) -> SkillSummary {
    let mut languages = FrequencyTable::new();
    let mut others = FrequencyTable::new();

    for repo in repos.iter().filter(|r| !r.fork && !r.is_private) {
        let tokens = repo
            .language
            .iter()
            .cloned()
            .chain(repo.topics.iter().map(|t| format_topic(t)));

        for token in tokens {
            match canonical_language(&token) {
                Some(canonical) => languages.bump(canonical),
                None => others.bump(&token),
            }
        }
    }

    SkillSummary {
        programming_languages: languages.ranked(MAX_PROGRAMMING_LANGUAGES),
        other_skills: others.ranked(MAX_OTHER_SKILLS),
    }
}

/// Reshape public repos into portfolio project records.
///
/// Same fork/private filter as [`extract_skills`]. Titles de-hyphenate
/// the repo name; descriptions fall back to a templated string when the
/// repo has none. Projects never call the translation API — the German
/// half mirrors the English text.
pub fn projects(repos: &[Repo]) -> Vec<Project> {
    repos
        .iter()
        .filter(|r| !r.fork && !r.is_private)
        .map(project_from_repo)
        .collect()
}

fn project_from_repo(repo: &Repo) -> Project {
    let title = title_case(&repo.name.replace('-', " "));

    let description = match repo.description.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => match repo.language.as_deref() {
            Some(lang) => format!("A {lang} project"),
            None => "A software project".to_string(),
        },
    };

    let mut tags: Vec<String> = repo.language.iter().cloned().collect();
    tags.extend(
        repo.topics
            .iter()
            .take(MAX_PROJECT_TOPICS)
            .map(|t| format_topic(t)),
    );
    if tags.is_empty() {
        tags.push("Project".to_string());
    }

    let video_url = repo
        .description
        .as_deref()
        .and_then(|d| YOUTUBE_URL.find(d))
        .map(|m| m.as_str().to_string());

    Project {
        title: Localized::mirrored(title),
        description: Localized::mirrored(description),
        tags,
        url: repo.html_url.clone(),
        video_url,
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        pushed_at: repo.pushed_at.clone(),
    }
}

/// `machine-learning` → `Machine Learning`.
fn format_topic(topic: &str) -> String {
    title_case(&topic.replace('-', " "))
}

/// Upper-case the first letter of each whitespace-separated word.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical allow-list spelling for a token, if it names a programming
/// language.
fn canonical_language(token: &str) -> Option<&'static str> {
    KNOWN_LANGUAGES
        .iter()
        .find(|lang| lang.eq_ignore_ascii_case(token))
        .copied()
}

/// Frequency table preserving first-occurrence insertion order, so the
/// stable descending sort keeps ties in the order they were first seen.
struct FrequencyTable {
    entries: Vec<(String, usize)>,
}

impl FrequencyTable {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn bump(&mut self, token: &str) {
        match self
            .entries
            .iter_mut()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
        {
            Some((_, count)) => *count += 1,
            None => self.entries.push((token.to_string(), 1)),
        }
    }

    fn ranked(mut self, limit: usize) -> Vec<String> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries
            .into_iter()
            .take(limit)
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, language: Option<&str>, topics: &[&str]) -> Repo {
        Repo {
            name: name.to_string(),
            description: None,
            html_url: format!("https://github.com/jdoe/{name}"),
            language: language.map(str::to_string),
            topics: topics.iter().map(|t| t.to_string()).collect(),
            pushed_at: None,
            fork: false,
            is_private: false,
            stargazers_count: 0,
            forks_count: 0,
        }
    }

    #[test]
    fn forks_and_private_repos_are_excluded() {
        let mut forked = repo("forked", Some("Python"), &[]);
        forked.fork = true;
        let mut private = repo("private", Some("Go"), &[]);
        private.is_private = true;
        let public = repo("public", Some("Rust"), &[]);

        let skills = extract_skills(&[forked, private, public.clone()]);
        assert_eq!(skills.programming_languages, vec!["Rust"]);

        let projects = projects(&[public]);
        assert_eq!(projects.len(), 1);
    }

    #[test]
    fn ranking_is_descending_by_frequency() {
        let repos = vec![
            repo("a", Some("Python"), &[]),
            repo("b", Some("Python"), &[]),
            repo("c", Some("Go"), &[]),
        ];
        let skills = extract_skills(&repos);
        assert_eq!(skills.programming_languages, vec!["Python", "Go"]);
    }

    #[test]
    fn ties_keep_first_occurrence_order() {
        let repos = vec![repo("a", Some("Go"), &[]), repo("b", Some("Rust"), &[])];
        let skills = extract_skills(&repos);
        assert_eq!(skills.programming_languages, vec!["Go", "Rust"]);
    }

    #[test]
    fn topics_are_dehyphenated_and_title_cased() {
        let repos = vec![repo("a", None, &["machine-learning"])];
        let skills = extract_skills(&repos);
        assert_eq!(skills.other_skills, vec!["Machine Learning"]);
    }

    #[test]
    fn language_topics_count_as_programming_languages() {
        // A "python" topic matches the allow-list case-insensitively and
        // comes out in canonical spelling.
        let repos = vec![repo("a", None, &["python"])];
        let skills = extract_skills(&repos);
        assert_eq!(skills.programming_languages, vec!["Python"]);
        assert!(skills.other_skills.is_empty());
    }

    #[test]
    fn truncation_bounds_hold() {
        let mut repos = Vec::new();
        for i in 0..40 {
            let topic = format!("topic-{i}");
            repos.push(repo(&format!("r{i}"), None, &[topic.as_str()]));
        }
        // 40 distinct language names, none on the allow-list beyond these:
        for lang in [
            "JavaScript",
            "TypeScript",
            "Python",
            "Java",
            "C",
            "C++",
            "C#",
            "Go",
            "Rust",
            "Ruby",
            "PHP",
            "Swift",
            "Kotlin",
            "Scala",
            "Dart",
            "R",
            "Perl",
            "Haskell",
        ] {
            repos.push(repo(&format!("lang-{lang}"), Some(lang), &[]));
        }

        let skills = extract_skills(&repos);
        assert!(skills.programming_languages.len() <= 15);
        assert!(skills.other_skills.len() <= 20);
    }

    #[test]
    fn project_title_is_title_cased() {
        let list = projects(&[repo("cool-app", Some("TypeScript"), &[])]);
        assert_eq!(list[0].title.en, "Cool App");
        assert_eq!(list[0].title.de, "Cool App");
    }

    #[test]
    fn missing_description_falls_back_to_language_template() {
        let list = projects(&[repo("cool-app", Some("Rust"), &[])]);
        assert_eq!(list[0].description.en, "A Rust project");

        let list = projects(&[repo("cool-app", None, &[])]);
        assert_eq!(list[0].description.en, "A software project");
    }

    #[test]
    fn tags_combine_language_and_topics() {
        let list = projects(&[repo(
            "cool-app",
            Some("Rust"),
            &["web-app", "cli", "tooling", "extra-topic"],
        )]);
        // Primary language + at most 3 formatted topics.
        assert_eq!(list[0].tags, vec!["Rust", "Web App", "Cli", "Tooling"]);
    }

    #[test]
    fn tags_default_to_project() {
        let list = projects(&[repo("cool-app", None, &[])]);
        assert_eq!(list[0].tags, vec!["Project"]);
    }

    #[test]
    fn video_url_extracted_from_description() {
        let mut r = repo("demo", None, &[]);
        r.description =
            Some("Demo video: https://www.youtube.com/watch?v=dQw4w9WgXcQ and more".to_string());
        let list = projects(&[r]);
        assert_eq!(
            list[0].video_url.as_deref(),
            Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
        );
    }

    #[test]
    fn no_video_url_when_description_has_none() {
        let mut r = repo("demo", None, &[]);
        r.description = Some("Just a plain description".to_string());
        let list = projects(&[r]);
        assert!(list[0].video_url.is_none());
    }

    #[test]
    fn repo_parses_with_minimal_fields() {
        // GitHub omits fields freely; everything but `name` has a default.
        let parsed: Repo = serde_json::from_str(r#"{"name": "bare"}"#).unwrap();
        assert_eq!(parsed.name, "bare");
        assert!(!parsed.fork);
        assert!(!parsed.is_private);
        assert!(parsed.topics.is_empty());
    }

    #[test]
    fn private_field_maps_from_keyword() {
        let parsed: Repo =
            serde_json::from_str(r#"{"name": "p", "private": true, "fork": false}"#).unwrap();
        assert!(parsed.is_private);
    }
}
