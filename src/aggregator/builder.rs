//! Builder for configuring aggregator instances.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::engine::Aggregator;
use crate::cache::{CacheConfig, SourceCache};
use crate::memo::{TranslationStore, default_store_path};
use crate::profile::ProfileStore;
use crate::sources::github::{self, GitHubClient};
use crate::sources::linkedin::LinkedInClient;
use crate::sources::translate::TranslationClient;
use crate::{Result, VitrineError};

/// Token values that mean "nobody ever configured this".
const PLACEHOLDER_TOKENS: &[&str] = &["", "changeme", "your-token-here", "xxx"];

/// Main entry point for creating aggregator instances.
pub struct Vitrine;

impl Vitrine {
    /// Create a new builder for configuring the aggregator.
    pub fn builder() -> VitrineBuilder {
        VitrineBuilder::new()
    }
}

/// Builder for configuring aggregator instances.
///
/// GitHub is always enabled (the API is public); LinkedIn and
/// translation are opt-in. Configuration errors surface at [`build()`]
/// time, not on first use.
///
/// [`build()`]: VitrineBuilder::build
pub struct VitrineBuilder {
    profile_store: Option<Arc<dyn ProfileStore>>,
    github_base_url: Option<String>,
    linkedin_token: Option<String>,
    linkedin_base_url: Option<String>,
    translation_base_url: Option<String>,
    translation_store: Option<Arc<TranslationStore>>,
    cache: CacheConfig,
    timeout: Duration,
    public_base_url: Option<String>,
}

impl VitrineBuilder {
    pub fn new() -> Self {
        Self {
            profile_store: None,
            github_base_url: None,
            linkedin_token: None,
            linkedin_base_url: None,
            translation_base_url: None,
            translation_store: None,
            cache: CacheConfig::default(),
            timeout: github::DEFAULT_TIMEOUT,
            public_base_url: None,
        }
    }

    /// Set the profile datastore (required).
    pub fn profile_store(mut self, store: Arc<dyn ProfileStore>) -> Self {
        self.profile_store = Some(store);
        self
    }

    /// Override the GitHub API base URL (for testing with wiremock).
    pub fn github_base_url(mut self, url: impl Into<String>) -> Self {
        self.github_base_url = Some(url.into());
        self
    }

    /// Configure the LinkedIn proxy credential. Requires
    /// [`linkedin_base_url`](Self::linkedin_base_url) too.
    pub fn linkedin_token(mut self, token: impl Into<String>) -> Self {
        self.linkedin_token = Some(token.into());
        self
    }

    /// Set the LinkedIn proxy endpoint.
    pub fn linkedin_base_url(mut self, url: impl Into<String>) -> Self {
        self.linkedin_base_url = Some(url.into());
        self
    }

    /// Enable the translation adapter against the given API base URL.
    pub fn translation_base_url(mut self, url: impl Into<String>) -> Self {
        self.translation_base_url = Some(url.into());
        self
    }

    /// Use a specific translation memo store. Defaults to a file-backed
    /// store under the user cache directory.
    pub fn translation_store(mut self, store: Arc<TranslationStore>) -> Self {
        self.translation_store = Some(store);
        self
    }

    /// Set the cache configuration (per-namespace TTLs and capacity).
    pub fn cache(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Request timeout applied to every external source client.
    /// Defaults to 10 seconds. No automatic retries either way —
    /// failures are never cached, so the next request retries naturally.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Public base URL used to resolve relative media URLs
    /// (profile image, CV) to absolute ones.
    pub fn public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Build the aggregator, validating the configuration.
    pub fn build(self) -> Result<Aggregator> {
        let store = self.profile_store.ok_or(VitrineError::NoProfileStore)?;

        let github = match self.github_base_url {
            Some(url) => GitHubClient::with_timeout(url, self.timeout),
            None => GitHubClient::with_timeout(github::DEFAULT_BASE_URL, self.timeout),
        };

        let linkedin = match (self.linkedin_token, self.linkedin_base_url) {
            (Some(token), Some(base_url)) => {
                if PLACEHOLDER_TOKENS.contains(&token.trim()) {
                    return Err(VitrineError::Configuration(
                        "LinkedIn proxy token is missing or a placeholder; \
                         set a real credential or remove the LinkedIn configuration"
                            .to_string(),
                    ));
                }
                Some(LinkedInClient::with_timeout(token, base_url, self.timeout))
            }
            (Some(_), None) => {
                return Err(VitrineError::Configuration(
                    "LinkedIn proxy token set without a proxy URL".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(VitrineError::Configuration(
                    "LinkedIn proxy URL set without a token".to_string(),
                ));
            }
            (None, None) => None,
        };

        if self.translation_store.is_some() && self.translation_base_url.is_none() {
            return Err(VitrineError::Configuration(
                "translation store set without a translation base URL".to_string(),
            ));
        }

        let timeout = self.timeout;
        let translator = self.translation_base_url.map(|base_url| {
            let store = self
                .translation_store
                .unwrap_or_else(|| Arc::new(TranslationStore::open(default_store_path())));
            TranslationClient::with_timeout(base_url, store, timeout)
        });

        let public_base_url = self
            .public_base_url
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    VitrineError::Configuration(format!("invalid public base URL {raw:?}: {e}"))
                })
            })
            .transpose()?;

        Ok(Aggregator {
            store,
            github,
            linkedin,
            translator,
            cache: SourceCache::new(&self.cache),
            public_base_url,
        })
    }
}

impl Default for VitrineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::InMemoryProfileStore;

    fn store() -> Arc<dyn ProfileStore> {
        Arc::new(InMemoryProfileStore::new())
    }

    #[test]
    fn build_requires_profile_store() {
        let result = Vitrine::builder().build();
        assert!(matches!(result, Err(VitrineError::NoProfileStore)));
    }

    #[test]
    fn build_with_store_only_succeeds() {
        assert!(Vitrine::builder().profile_store(store()).build().is_ok());
    }

    #[test]
    fn placeholder_linkedin_token_is_rejected() {
        for token in ["", "  ", "changeme", "your-token-here"] {
            let result = Vitrine::builder()
                .profile_store(store())
                .linkedin_token(token)
                .linkedin_base_url("https://proxy.example.com")
                .build();
            assert!(
                matches!(result, Err(VitrineError::Configuration(_))),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn linkedin_token_without_url_is_rejected() {
        let result = Vitrine::builder()
            .profile_store(store())
            .linkedin_token("real-token")
            .build();
        assert!(matches!(result, Err(VitrineError::Configuration(_))));
    }

    #[test]
    fn translation_store_without_url_is_rejected() {
        let result = Vitrine::builder()
            .profile_store(store())
            .translation_store(Arc::new(TranslationStore::in_memory()))
            .build();
        assert!(matches!(result, Err(VitrineError::Configuration(_))));
    }

    #[test]
    fn custom_timeout_builds() {
        let result = Vitrine::builder()
            .profile_store(store())
            .timeout(std::time::Duration::from_secs(2))
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn invalid_public_base_url_is_rejected() {
        let result = Vitrine::builder()
            .profile_store(store())
            .public_base_url("not a url")
            .build();
        assert!(matches!(result, Err(VitrineError::Configuration(_))));
    }
}
