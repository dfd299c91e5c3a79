//! Translation adapter, memoized through the durable store.
//!
//! Same-language calls are a no-op. Everything else is looked up in the
//! [`TranslationStore`] by content hash first; only genuine misses reach
//! the external API. Failures are never memoized — the caller either
//! sees [`VitrineError::TranslationFailed`] or, through
//! [`translate_or_original`](TranslationClient::translate_or_original),
//! silently degrades to the untranslated text.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::memo::{TranslationRecord, TranslationStore, content_hash};
use crate::sources::github::DEFAULT_TIMEOUT;
use crate::telemetry;
use crate::{Result, VitrineError};

#[derive(Deserialize)]
struct TranslationResponse {
    translation: String,
}

/// Client for the external translation API.
#[derive(Clone)]
pub struct TranslationClient {
    http: Client,
    base_url: String,
    store: Arc<TranslationStore>,
}

impl TranslationClient {
    /// Create a client against a translation endpoint, memoizing into
    /// the given store.
    pub fn new(base_url: impl Into<String>, store: Arc<TranslationStore>) -> Self {
        Self::with_timeout(base_url, store, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        store: Arc<TranslationStore>,
        timeout: Duration,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            store,
        }
    }

    /// Translate `text` from `source` to `target`.
    ///
    /// `source == target` returns the text unchanged with no network
    /// call and no store write. A memoized hit never reaches the
    /// network. On success the result is memoized durably; on failure
    /// nothing is stored and `TranslationFailed` is returned.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if source == target {
            metrics::counter!(telemetry::TRANSLATIONS_TOTAL, "status" => "noop").increment(1);
            return Ok(text.to_string());
        }

        let hash = content_hash(text);
        if let Some(translated) = self.store.get(&hash, source, target) {
            metrics::counter!(telemetry::TRANSLATIONS_TOTAL, "status" => "memoized").increment(1);
            return Ok(translated);
        }

        let translated = match self.fetch(text, source, target).await {
            Ok(t) => t,
            Err(e) => {
                metrics::counter!(telemetry::TRANSLATIONS_TOTAL, "status" => "error").increment(1);
                return Err(e);
            }
        };

        // A failed disk write loses the memo, not the translation.
        if let Err(e) = self.store.upsert(TranslationRecord {
            hash,
            source_lang: source.to_string(),
            target_lang: target.to_string(),
            original_text: text.to_string(),
            translated_text: translated.clone(),
        }) {
            warn!(error = %e, "failed to persist translation record");
        }

        metrics::counter!(telemetry::TRANSLATIONS_TOTAL, "status" => "translated").increment(1);
        Ok(translated)
    }

    /// Translate, degrading to the original text on failure.
    ///
    /// The degraded path logs a warning so operators can still see
    /// translation outages that callers chose not to surface.
    pub async fn translate_or_original(&self, text: &str, source: &str, target: &str) -> String {
        match self.translate(text, source, target).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(%source, %target, error = %e, "translation degraded to original text");
                text.to_string()
            }
        }
    }

    async fn fetch(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let url = format!(
            "{}/{}/{}/{}",
            self.base_url,
            source,
            target,
            urlencoding::encode(text)
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| VitrineError::TranslationFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VitrineError::TranslationFailed(format!(
                "translation API returned {status}"
            )));
        }

        let payload: TranslationResponse = response
            .json()
            .await
            .map_err(|e| VitrineError::TranslationFailed(e.to_string()))?;

        Ok(payload.translation)
    }
}
