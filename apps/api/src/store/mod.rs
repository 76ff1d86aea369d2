//! Directory data operations behind a trait, so handlers are written
//! against the interface and tests run against the in-memory double.
//!
//! Carried in `AppState` as `Arc<dyn DirectoryStore>`. The production
//! implementation is `supabase::SupabaseClient`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::profile::{NewProfile, Profile};
use crate::models::skill::{NewSkill, Skill, SkillMembership, TrendingSkill, UserSkill};
use crate::supabase::BackendError;

#[cfg(test)]
pub mod memory;

/// Every query pattern the directory issues against the managed store.
/// Reads take no token (anon access); writes carry the caller's bearer
/// token so the backend can enforce ownership.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Up to `limit` skills with embedded member counts, service default
    /// order.
    async fn trending_skills(&self, limit: u32) -> Result<Vec<TrendingSkill>, BackendError>;

    /// All skills ordered by name.
    async fn list_skills(&self) -> Result<Vec<Skill>, BackendError>;

    /// Skills whose name case-insensitively contains `needle`.
    async fn match_skills(&self, needle: &str) -> Result<Vec<Skill>, BackendError>;

    /// Join rows for the given skill ids, with nested profile and
    /// skill-name projections.
    async fn memberships_for_skills(
        &self,
        skill_ids: &[Uuid],
    ) -> Result<Vec<SkillMembership>, BackendError>;

    /// One profile by id; absence is `None`, not an error.
    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, BackendError>;

    /// The skills associated with one profile.
    async fn skills_for_profile(&self, user_id: Uuid) -> Result<Vec<Skill>, BackendError>;

    async fn insert_profile(&self, token: &str, profile: &NewProfile)
        -> Result<(), BackendError>;

    async fn insert_memberships(
        &self,
        token: &str,
        rows: &[UserSkill],
    ) -> Result<(), BackendError>;

    /// Insert-and-return, used for free-text skill entries.
    async fn insert_skill(&self, token: &str, skill: &NewSkill) -> Result<Skill, BackendError>;
}
