//! Aggregated view types.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;
use crate::sources::linkedin::LinkedInProfile;

/// Skills merged from the stored profile and the GitHub source.
///
/// Profile-level custom skills merge into `programming_languages` only;
/// `other_skills` comes from GitHub alone. The asymmetry matches the
/// long-standing public behavior of the portfolio page and is covered by
/// a test so any deliberate change shows up explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedSkills {
    pub programming_languages: Vec<String>,
    pub other_skills: Vec<String>,
}

/// The merged public-profile projection.
///
/// Recomputed per request (subject to the per-source caches); never
/// persisted. Sections whose source failed or is unconfigured are empty
/// or `None` — the payload deliberately does not distinguish the two;
/// failures are logged and counted out-of-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub combined_skills: CombinedSkills,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_data: Option<LinkedInProfile>,
}
