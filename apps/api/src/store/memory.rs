//! In-memory `DirectoryStore` double for tests, with per-operation failure
//! injection so the partial-failure contracts can be exercised without a
//! live backend.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::profile::{NewProfile, Profile};
use crate::models::skill::{NewSkill, Skill, SkillMembership, TrendingSkill, UserSkill};
use crate::store::DirectoryStore;
use crate::supabase::BackendError;

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    skills: Vec<Skill>,
    profiles: Vec<Profile>,
    memberships: Vec<UserSkill>,
    fail_reads: Option<String>,
    fail_profile_insert: Option<String>,
    fail_membership_insert: Option<String>,
    fail_skill_insert: Option<String>,
}

/// A minimal valid profile for seeding tests.
pub fn sample_profile(full_name: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        full_name: full_name.to_string(),
        department: "Computer Science".to_string(),
        year_of_study: crate::models::profile::YearOfStudy::Third,
        bio: None,
        email: format!(
            "{}@example.edu",
            full_name.to_lowercase().replace(' ', ".")
        ),
        phone: None,
        linkedin_url: None,
        created_at: None,
    }
}

fn injected(message: &str) -> BackendError {
    BackendError::Api {
        status: 400,
        message: message.to_string(),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_skill(&self, name: &str, category: &str) -> Skill {
        let skill = Skill {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            created_at: None,
        };
        self.inner.lock().unwrap().skills.push(skill.clone());
        skill
    }

    pub fn add_profile(&self, profile: Profile) {
        self.inner.lock().unwrap().profiles.push(profile);
    }

    pub fn link(&self, user_id: Uuid, skill_id: Uuid) {
        self.inner
            .lock()
            .unwrap()
            .memberships
            .push(UserSkill { user_id, skill_id });
    }

    pub fn fail_reads(&self, message: &str) {
        self.inner.lock().unwrap().fail_reads = Some(message.to_string());
    }

    pub fn fail_profile_insert(&self, message: &str) {
        self.inner.lock().unwrap().fail_profile_insert = Some(message.to_string());
    }

    pub fn fail_membership_insert(&self, message: &str) {
        self.inner.lock().unwrap().fail_membership_insert = Some(message.to_string());
    }

    pub fn fail_skill_insert(&self, message: &str) {
        self.inner.lock().unwrap().fail_skill_insert = Some(message.to_string());
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.inner.lock().unwrap().profiles.clone()
    }

    pub fn memberships(&self) -> Vec<UserSkill> {
        self.inner.lock().unwrap().memberships.clone()
    }

    pub fn skills(&self) -> Vec<Skill> {
        self.inner.lock().unwrap().skills.clone()
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn trending_skills(&self, limit: u32) -> Result<Vec<TrendingSkill>, BackendError> {
        let inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_reads {
            return Err(injected(msg));
        }
        Ok(inner
            .skills
            .iter()
            .take(limit as usize)
            .map(|skill| TrendingSkill {
                skill: skill.clone(),
                members: inner
                    .memberships
                    .iter()
                    .filter(|m| m.skill_id == skill.id)
                    .count() as u64,
            })
            .collect())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, BackendError> {
        let inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_reads {
            return Err(injected(msg));
        }
        let mut skills = inner.skills.clone();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn match_skills(&self, needle: &str) -> Result<Vec<Skill>, BackendError> {
        let inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_reads {
            return Err(injected(msg));
        }
        let needle = needle.to_lowercase();
        Ok(inner
            .skills
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn memberships_for_skills(
        &self,
        skill_ids: &[Uuid],
    ) -> Result<Vec<SkillMembership>, BackendError> {
        let inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_reads {
            return Err(injected(msg));
        }
        Ok(inner
            .memberships
            .iter()
            .filter(|m| skill_ids.contains(&m.skill_id))
            .map(|m| SkillMembership {
                user_id: m.user_id,
                skill_id: m.skill_id,
                profile: inner.profiles.iter().find(|p| p.id == m.user_id).cloned(),
                skill_name: inner
                    .skills
                    .iter()
                    .find(|s| s.id == m.skill_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, BackendError> {
        let inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_reads {
            return Err(injected(msg));
        }
        Ok(inner.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn skills_for_profile(&self, user_id: Uuid) -> Result<Vec<Skill>, BackendError> {
        let inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_reads {
            return Err(injected(msg));
        }
        Ok(inner
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| inner.skills.iter().find(|s| s.id == m.skill_id).cloned())
            .collect())
    }

    async fn insert_profile(
        &self,
        _token: &str,
        profile: &NewProfile,
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_profile_insert {
            return Err(injected(msg));
        }
        if inner.profiles.iter().any(|p| p.id == profile.id) {
            return Err(BackendError::Api {
                status: 409,
                message: "duplicate key value violates unique constraint \"profiles_pkey\""
                    .to_string(),
            });
        }
        inner.profiles.push(profile.clone().into_profile());
        Ok(())
    }

    async fn insert_memberships(
        &self,
        _token: &str,
        rows: &[UserSkill],
    ) -> Result<(), BackendError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_membership_insert {
            return Err(injected(msg));
        }
        inner.memberships.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_skill(&self, _token: &str, skill: &NewSkill) -> Result<Skill, BackendError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(msg) = &inner.fail_skill_insert {
            return Err(injected(msg));
        }
        let skill = Skill {
            id: Uuid::new_v4(),
            name: skill.name.clone(),
            category: skill.category.clone(),
            created_at: None,
        };
        inner.skills.push(skill.clone());
        Ok(skill)
    }
}
