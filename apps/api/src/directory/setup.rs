//! Profile setup: validate the form, insert one profile row keyed by the
//! authenticated identity, then bulk-insert the skill join rows. The two
//! inserts are sequential, not transactional: a join failure leaves the
//! profile row in place and surfaces the backend message unchanged.

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{NewProfile, Profile, YearOfStudy};
use crate::models::skill::{NewSkill, Skill, UserSkill};
use crate::store::DirectoryStore;
use crate::supabase::auth::AuthUser;

/// Free-text skill entries always land in this category.
pub const CUSTOM_SKILL_CATEGORY: &str = "Other";

#[derive(Debug, Deserialize)]
pub struct SetupRequest {
    pub full_name: String,
    pub department: String,
    pub year_of_study: YearOfStudy,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    pub skill_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub profile: Profile,
    pub skills_linked: usize,
}

/// Creates the caller's profile. The profile id and email come from the
/// authenticated identity, never from the form.
pub async fn create_profile(
    store: &dyn DirectoryStore,
    token: &str,
    owner: &AuthUser,
    req: SetupRequest,
) -> Result<SetupResponse, AppError> {
    if req.skill_ids.is_empty() {
        return Err(AppError::Validation(
            "Select at least one skill".to_string(),
        ));
    }
    let full_name = req.full_name.trim();
    if full_name.is_empty() {
        return Err(AppError::Validation("Full name is required".to_string()));
    }
    let department = req.department.trim();
    if department.is_empty() {
        return Err(AppError::Validation("Department is required".to_string()));
    }

    let profile = NewProfile {
        id: owner.id,
        full_name: full_name.to_string(),
        department: department.to_string(),
        year_of_study: req.year_of_study,
        bio: blank_to_none(req.bio),
        email: owner.email.clone().unwrap_or_default(),
        phone: blank_to_none(req.phone),
        linkedin_url: blank_to_none(req.linkedin_url),
    };

    store.insert_profile(token, &profile).await?;

    let rows: Vec<UserSkill> = req
        .skill_ids
        .iter()
        .map(|&skill_id| UserSkill {
            user_id: owner.id,
            skill_id,
        })
        .collect();
    // If this fails the profile row above stays in place; there is no
    // compensating delete.
    store.insert_memberships(token, &rows).await?;

    info!("profile created for {}", owner.id);
    Ok(SetupResponse {
        profile: profile.into_profile(),
        skills_linked: rows.len(),
    })
}

/// Inserts a free-text skill and returns the stored row so the form can
/// select it immediately.
pub async fn add_skill(
    store: &dyn DirectoryStore,
    token: &str,
    name: &str,
) -> Result<Skill, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "Skill name must not be empty".to_string(),
        ));
    }
    let skill = store
        .insert_skill(
            token,
            &NewSkill {
                name: name.to_string(),
                category: CUSTOM_SKILL_CATEGORY.to_string(),
            },
        )
        .await?;
    Ok(skill)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
