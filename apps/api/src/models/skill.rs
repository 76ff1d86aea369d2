use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profile::Profile;

/// A named capability tag, shared across all profiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for the skills table. Free-text entries from the setup
/// form land here with category "Other".
#[derive(Debug, Clone, Serialize)]
pub struct NewSkill {
    pub name: String,
    pub category: String,
}

/// One row of the profile/skill join table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserSkill {
    pub user_id: Uuid,
    pub skill_id: Uuid,
}

/// A join row widened with its nested projections, as returned by the
/// search query. Rows whose profile projection is absent are kept here and
/// filtered by the grouping step.
#[derive(Debug, Clone)]
pub struct SkillMembership {
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub profile: Option<Profile>,
    pub skill_name: String,
}

/// A skill with its embedded member count, as shown on the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct TrendingSkill {
    #[serde(flatten)]
    pub skill: Skill,
    pub members: u64,
}
