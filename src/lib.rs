//! Vitrine - aggregation gateway for public portfolio profiles
//!
//! This crate produces a unified public-profile view for a portfolio
//! site: it merges a locally stored profile with on-demand fetched
//! GitHub skills/projects and LinkedIn profile data, applies a TTL
//! cache per source to stay clear of third-party rate limits, and
//! degrades gracefully when a source is unavailable. A durable
//! memoization store keeps English/German translations from being
//! re-requested for text that has been seen before.
//!
//! # Example
//!
//! ```rust,no_run
//! use vitrine::{InMemoryProfileStore, Profile, Vitrine};
//!
//! #[tokio::main]
//! async fn main() -> vitrine::Result<()> {
//!     let mut profile = Profile::new("jdoe", "jdoe@example.com");
//!     profile.social_links.github = Some("https://github.com/jdoe".into());
//!
//!     let aggregator = Vitrine::builder()
//!         .profile_store(InMemoryProfileStore::with_profiles([profile]))
//!         .public_base_url("https://portfolio.example.com")
//!         .build()?;
//!
//!     let view = aggregator.aggregated_profile("jdoe").await?;
//!     println!("{:?}", view.combined_skills.programming_languages);
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod cache;
pub mod error;
pub mod memo;
pub mod profile;
pub mod sources;
pub mod telemetry;

// Re-export main types at crate root
pub use aggregator::{AggregatedProfileView, Aggregator, CombinedSkills, Vitrine, VitrineBuilder};
pub use cache::{CacheConfig, Namespace, SourceCache};
pub use error::{Result, VitrineError};
pub use memo::{TranslationRecord, TranslationStore};
pub use profile::{InMemoryProfileStore, Profile, ProfileStore, Skill, SkillOrigin, SocialLinks};
pub use sources::{
    GitHubClient, LinkedInClient, LinkedInProfile, Localized, Project, SkillSummary,
    TranslationClient,
};
