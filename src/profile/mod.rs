//! Profile data model and datastore seam.
//!
//! The primary datastore is a collaborator, not part of this crate: the
//! aggregator only needs to resolve a username to a [`Profile`]. The
//! [`ProfileStore`] trait is that seam; [`InMemoryProfileStore`] is a
//! map-backed implementation for tests and embedded use.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::Result;

/// Where a skill entry originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillOrigin {
    Github,
    Linkedin,
    Custom,
}

/// A single skill attached to a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub origin: SkillOrigin,
    /// Hidden skills are excluded from the public aggregated view.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Skill {
    /// A visible custom skill — the common case for hand-entered skills.
    pub fn custom(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: SkillOrigin::Custom,
            visible: true,
        }
    }
}

/// Configured social links, one URL per provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A locally stored portfolio profile, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub social_links: SocialLinks,
    /// May be relative to the deployment host; the aggregator resolves it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_url: Option<String>,
}

impl Profile {
    /// A minimal profile as seeded at registration time.
    pub fn new(username: impl Into<String>, contact_email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            name: String::new(),
            title: String::new(),
            bio: String::new(),
            location: String::new(),
            contact_email: contact_email.into(),
            skills: Vec::new(),
            languages: Vec::new(),
            experience: Vec::new(),
            social_links: SocialLinks::default(),
            image_url: None,
            cv_url: None,
        }
    }

    /// Names of skills shown on the public page.
    pub fn visible_skill_names(&self) -> Vec<String> {
        self.skills
            .iter()
            .filter(|s| s.visible)
            .map(|s| s.name.clone())
            .collect()
    }
}

/// Datastore seam for profile lookup.
///
/// Implementations wrap whatever the deployment uses as its primary
/// store (document database, SQL, a config file). The aggregator only
/// reads; `upsert` exists so the owning web layer can seed and update
/// records through the same handle.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Resolve a username to its profile, `None` if absent.
    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>>;

    /// Insert or replace a profile, keyed on its username.
    async fn upsert(&self, profile: Profile) -> Result<()>;
}

/// Map-backed [`ProfileStore`] for tests and embedded deployments.
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor seeding a set of profiles.
    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Arc<Self> {
        let map = profiles
            .into_iter()
            .map(|p| (p.username.clone(), p))
            .collect();
        Arc::new(Self {
            profiles: RwLock::new(map),
        })
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(username).cloned())
    }

    async fn upsert(&self, profile: Profile) -> Result<()> {
        self.profiles
            .write()
            .await
            .insert(profile.username.clone(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upsert_and_find_round_trip() {
        let store = InMemoryProfileStore::new();
        store
            .upsert(Profile::new("jdoe", "jdoe@example.com"))
            .await
            .unwrap();

        let found = store.find_by_username("jdoe").await.unwrap().unwrap();
        assert_eq!(found.contact_email, "jdoe@example.com");
    }

    #[tokio::test]
    async fn missing_username_returns_none() {
        let store = InMemoryProfileStore::new();
        assert!(store.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_overwrites_existing() {
        let store = InMemoryProfileStore::new();
        store
            .upsert(Profile::new("jdoe", "old@example.com"))
            .await
            .unwrap();
        store
            .upsert(Profile::new("jdoe", "new@example.com"))
            .await
            .unwrap();

        let found = store.find_by_username("jdoe").await.unwrap().unwrap();
        assert_eq!(found.contact_email, "new@example.com");
    }

    #[test]
    fn hidden_skills_are_filtered() {
        let mut profile = Profile::new("jdoe", "jdoe@example.com");
        profile.skills = vec![
            Skill::custom("Rust"),
            Skill {
                name: "Secret".to_string(),
                origin: SkillOrigin::Custom,
                visible: false,
            },
        ];

        assert_eq!(profile.visible_skill_names(), vec!["Rust"]);
    }
}
