//! LinkedIn adapter: scraping-proxy client and profile normalization.
//!
//! LinkedIn has no public API; data comes from a third-party actor-run
//! proxy that takes a username and returns the raw scraped profile as the
//! first element of a JSON array. The raw schema is loosely specified and
//! drifts, so every field is optional on the way in and the pure
//! [`normalize`] mapping documents the default for each field on the way
//! out.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::sources::github::{DEFAULT_TIMEOUT, Localized};
use crate::{Result, VitrineError};

/// End-date marker for positions the source flags as current.
const PRESENT: &str = "Present";

// ============================================================================
// Raw provider schema (externally controlled, all fields best-effort)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    basic_info: RawBasicInfo,
    #[serde(default)]
    experience: Vec<RawExperience>,
    #[serde(default)]
    education: Vec<RawEducation>,
    #[serde(default)]
    languages: Vec<RawLanguage>,
    #[serde(default)]
    skills: Vec<RawSkill>,
}

#[derive(Debug, Default, Deserialize)]
struct RawBasicInfo {
    #[serde(default, alias = "name")]
    fullname: Option<String>,
    #[serde(default)]
    headline: Option<String>,
    // The provider has shipped the same prose under all three names.
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    about: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, alias = "profile_pic_url")]
    profile_picture_url: Option<String>,
    #[serde(default)]
    public_identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawExperience {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    is_current: bool,
}

#[derive(Debug, Deserialize)]
struct RawEducation {
    #[serde(default)]
    school: Option<String>,
    #[serde(default)]
    degree: Option<String>,
    #[serde(default)]
    field_of_study: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

/// Languages arrive either as bare strings or `{ "name": ... }` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLanguage {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

/// Skills arrive either as bare strings or `{ "name": ... }` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSkill {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
}

// ============================================================================
// Normalized shape
// ============================================================================

/// A work position, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub start_date: String,
    /// The literal `"Present"` when the source marks the position current.
    pub end_date: String,
}

/// An education entry, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: String,
}

/// A language with a derived 2-letter code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub code: String,
}

/// Normalized LinkedIn profile served to the aggregated view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedInProfile {
    pub name: String,
    pub headline: String,
    /// Summary/about/description collapsed into one field.
    pub summary: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
    pub public_identifier: String,
    pub experiences: Vec<Position>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
    pub languages: Vec<Language>,
    /// Best-effort bilingual bio. The German half starts as a mirror of
    /// the English text; the aggregator localizes it through the
    /// translation adapter before caching.
    pub bio: Localized,
}

/// Client for the LinkedIn scraping proxy.
///
/// Requires a bearer token; the builder fails fast when the token is
/// absent or a placeholder, so a misconfigured deployment surfaces at
/// startup instead of silently degrading every request.
#[derive(Clone)]
pub struct LinkedInClient {
    http: Client,
    base_url: String,
    token: String,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    username: &'a str,
    #[serde(rename = "includeEmail")]
    include_email: bool,
}

impl LinkedInClient {
    /// Create a client against a proxy endpoint.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_timeout(token, base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Fetch and normalize a profile by public identifier.
    pub async fn fetch_profile(&self, username: &str) -> Result<LinkedInProfile> {
        let response = self
            .http
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.token))
            .json(&ProxyRequest {
                username,
                include_email: false,
            })
            .send()
            .await
            .map_err(|e| VitrineError::Http(e.to_string()))?;

        handle_response_errors(&response)?;

        let mut payload: Vec<RawProfile> = response
            .json()
            .await
            .map_err(|e| VitrineError::Http(e.to_string()))?;

        if payload.is_empty() {
            return Err(VitrineError::SourceUnavailable(format!(
                "LinkedIn proxy returned no profile for {username}"
            )));
        }

        Ok(normalize(payload.remove(0)))
    }
}

/// Check response status and map to the appropriate error.
fn handle_response_errors(response: &reqwest::Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        401 | 403 => Err(VitrineError::AuthenticationFailed),
        429 => {
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
            message: format!("LinkedIn proxy error: {status}"),
        }),
    }
}

// ============================================================================
// Pure normalization
// ============================================================================

/// Map the raw provider schema into the canonical [`LinkedInProfile`].
///
/// Missing strings default to empty; missing collections to empty lists.
pub fn normalize(raw: RawProfile) -> LinkedInProfile {
    let basic = raw.basic_info;
    let name = basic.fullname.unwrap_or_default();
    let headline = basic.headline.unwrap_or_default();

    // First non-empty of summary/about/description wins.
    let summary = [basic.summary, basic.about, basic.description]
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
        .unwrap_or_default();

    let bio_en = if summary.is_empty() {
        format!("{name} - {headline}")
    } else {
        summary.clone()
    };

    LinkedInProfile {
        experiences: raw.experience.into_iter().map(normalize_position).collect(),
        education: raw.education.into_iter().map(normalize_education).collect(),
        languages: raw
            .languages
            .into_iter()
            .filter_map(|l| match l {
                RawLanguage::Name(name) => Some(name),
                RawLanguage::Object { name } => name,
            })
            .map(|name| Language {
                code: language_code(&name),
                name,
            })
            .collect(),
        skills: raw
            .skills
            .into_iter()
            .filter_map(|s| match s {
                RawSkill::Name(name) => Some(name),
                RawSkill::Object { name } => name,
            })
            .collect(),
        name,
        headline,
        summary,
        location: basic.location.unwrap_or_default(),
        profile_pic_url: basic.profile_picture_url,
        public_identifier: basic.public_identifier.unwrap_or_default(),
        bio: Localized::mirrored(bio_en),
    }
}

fn normalize_position(raw: RawExperience) -> Position {
    let end_date = if raw.is_current {
        PRESENT.to_string()
    } else {
        raw.end_date.unwrap_or_default()
    };

    Position {
        title: raw.title.unwrap_or_default(),
        company: raw.company.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        location: raw.location.unwrap_or_default(),
        start_date: raw.start_date.unwrap_or_default(),
        end_date,
    }
}

fn normalize_education(raw: RawEducation) -> Education {
    Education {
        school: raw.school.unwrap_or_default(),
        degree: raw.degree.unwrap_or_default(),
        field_of_study: raw.field_of_study.unwrap_or_default(),
        start_date: raw.start_date.unwrap_or_default(),
        end_date: raw.end_date.unwrap_or_default(),
    }
}

/// Derive a 2-letter language code from a language name.
fn language_code(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "german" | "deutsch" => "DE".to_string(),
        "english" => "EN".to_string(),
        other => other.chars().take(2).collect::<String>().to_uppercase(),
    }
}
