//! Profile view resolution: one profile by id (defaulting to the caller),
//! its skills, and the two distinct absence behaviors.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::models::skill::Skill;
use crate::store::DirectoryStore;

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub profile: Profile,
    pub skills: Vec<Skill>,
    /// Whether the viewed profile belongs to the caller.
    pub own: bool,
}

/// Resolves a profile view for `viewer`. `requested = None` means the
/// caller's own profile. Absence splits by ownership: the owner is sent to
/// setup, everyone else gets not-found. Read errors count as absence.
pub async fn view_profile(
    store: &dyn DirectoryStore,
    viewer: Uuid,
    requested: Option<Uuid>,
) -> Result<ProfileView, AppError> {
    let profile_id = requested.unwrap_or(viewer);
    let own = profile_id == viewer;

    let profile = match store.profile_by_id(profile_id).await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("profile fetch for {profile_id} failed: {e}");
            None
        }
    };
    let Some(profile) = profile else {
        return Err(if own {
            AppError::ProfileNotSetUp
        } else {
            AppError::NotFound("Profile not found".to_string())
        });
    };

    let skills = match store.skills_for_profile(profile_id).await {
        Ok(skills) => skills,
        Err(e) => {
            warn!("skill fetch for {profile_id} failed: {e}");
            Vec::new()
        }
    };

    Ok(ProfileView {
        profile,
        skills,
        own,
    })
}
