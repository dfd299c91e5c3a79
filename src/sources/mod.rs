//! External source adapters.
//!
//! One module per third-party API: each wraps exactly one external
//! source, fetches over HTTP, and normalizes the provider payload into
//! the crate's canonical shapes. Adapters do not cache — the aggregator
//! owns the cache and decides when to consult it, so the clients stay
//! trivially testable against wiremock.

pub mod github;
pub mod linkedin;
pub mod translate;

pub use github::{GitHubClient, Localized, Project, Repo, SkillSummary};
pub use linkedin::{LinkedInClient, LinkedInProfile};
pub use translate::TranslationClient;
