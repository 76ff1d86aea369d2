//! Keyword search: case-insensitive substring match over skill names, then
//! the join rows for every matched skill, grouped into one entry per
//! profile. No ranking, no pagination, no result cap beyond what the
//! substring filter produces.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::models::skill::SkillMembership;
use crate::store::DirectoryStore;

/// One search hit: a profile plus every skill badge its join rows carried.
#[derive(Debug, Clone, Serialize)]
pub struct StudentMatch {
    #[serde(flatten)]
    pub profile: Profile,
    pub skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub count: usize,
    pub students: Vec<StudentMatch>,
}

impl SearchResults {
    fn empty(query: &str) -> Self {
        Self {
            query: query.to_string(),
            count: 0,
            students: Vec::new(),
        }
    }
}

/// Runs the two-step search. Read failures degrade to the empty result;
/// only a blank query is an error.
pub async fn search_by_skill(
    store: &dyn DirectoryStore,
    query: &str,
) -> Result<SearchResults, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation(
            "Search query must not be empty".to_string(),
        ));
    }

    let skills = match store.match_skills(query).await {
        Ok(skills) => skills,
        Err(e) => {
            warn!("skill match for {query:?} failed: {e}");
            return Ok(SearchResults::empty(query));
        }
    };
    if skills.is_empty() {
        return Ok(SearchResults::empty(query));
    }

    let skill_ids: Vec<Uuid> = skills.iter().map(|s| s.id).collect();
    let memberships = match store.memberships_for_skills(&skill_ids).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!("membership fetch for {query:?} failed: {e}");
            return Ok(SearchResults::empty(query));
        }
    };

    let students = group_by_profile(memberships);
    Ok(SearchResults {
        query: query.to_string(),
        count: students.len(),
        students,
    })
}

/// One entry per profile, first-seen order. Join rows whose profile
/// projection is absent are skipped.
fn group_by_profile(rows: Vec<SkillMembership>) -> Vec<StudentMatch> {
    let mut students: Vec<StudentMatch> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in rows {
        let Some(profile) = row.profile else {
            continue;
        };
        match index.get(&profile.id) {
            Some(&i) => students[i].skills.push(row.skill_name),
            None => {
                index.insert(profile.id, students.len());
                students.push(StudentMatch {
                    profile,
                    skills: vec![row.skill_name],
                });
            }
        }
    }

    students
}
