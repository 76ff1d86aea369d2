//! Managed-backend client — the single point of entry for all calls to the
//! hosted auth + relational-query service.
//!
//! ARCHITECTURAL RULE: No other module may issue HTTP to the backend.
//! All table and auth operations MUST go through this module.
//!
//! The service speaks a Supabase-style interface: GoTrue under `/auth/v1`
//! (see `auth`), PostgREST under `/rest/v1` (this file, with query
//! composition in `query`).

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::profile::{NewProfile, Profile};
use crate::models::skill::{NewSkill, Skill, SkillMembership, TrendingSkill, UserSkill};
use crate::store::DirectoryStore;
use crate::supabase::query::TableQuery;

pub mod auth;
pub mod query;

const REST_PATH: &str = "/rest/v1";
pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors are exactly what the backend raises: transport failures, non-2xx
/// API responses, malformed bodies. `Api` keeps the backend's own message
/// verbatim so handlers can surface it unchanged.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend returned an empty row set")]
    Empty,
}

/// The known error-body shapes of the backend (PostgREST and GoTrue use
/// different field names).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Builds an `Api` error from a non-2xx response body, preserving the
/// backend's message verbatim. Falls back to the raw body.
pub(crate) fn api_error(status: u16, body: String) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.msg).or(b.error_description).or(b.error))
        .unwrap_or(body);
    BackendError::Api { status, message }
}

/// Client for the backend's table interface. Cheap to clone; reads use the
/// anon key, writes send the caller's bearer token so the backend enforces
/// ownership.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.base_url, REST_PATH, table)
    }

    /// Runs one read query and deserializes the row set.
    async fn fetch<T: DeserializeOwned>(&self, query: TableQuery) -> Result<Vec<T>, BackendError> {
        let response = self
            .http
            .get(self.table_url(query.table()))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .query(query.params())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), body));
        }

        debug!("fetched {} ({} bytes)", query.table(), body.len());
        serde_json::from_str(&body).map_err(BackendError::Parse)
    }

    /// Inserts rows without asking for the representation back.
    async fn insert<B: Serialize + ?Sized>(
        &self,
        token: &str,
        table: &str,
        body: &B,
    ) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .header("Prefer", "return=minimal")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(api_error(status.as_u16(), body));
        }
        Ok(())
    }

    /// Inserts one row and returns the stored representation.
    async fn insert_returning<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        token: &str,
        table: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self
            .http
            .post(self.table_url(table))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), body));
        }

        let mut rows: Vec<T> = serde_json::from_str(&body).map_err(BackendError::Parse)?;
        if rows.is_empty() {
            return Err(BackendError::Empty);
        }
        Ok(rows.remove(0))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types for nested projections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TrendingRow {
    #[serde(flatten)]
    skill: Skill,
    #[serde(default)]
    user_skills: Vec<CountRow>,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct MembershipRow {
    user_id: Uuid,
    skill_id: Uuid,
    profiles: Option<Profile>,
    skills: SkillNameRow,
}

#[derive(Debug, Deserialize)]
struct SkillNameRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProfileSkillRow {
    skills: Skill,
}

#[async_trait::async_trait]
impl DirectoryStore for SupabaseClient {
    async fn trending_skills(&self, limit: u32) -> Result<Vec<TrendingSkill>, BackendError> {
        let rows: Vec<TrendingRow> = self
            .fetch(
                TableQuery::new("skills")
                    .select("*, user_skills(count)")
                    .limit(limit),
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| TrendingSkill {
                skill: r.skill,
                members: r.user_skills.first().map(|c| c.count).unwrap_or(0),
            })
            .collect())
    }

    async fn list_skills(&self) -> Result<Vec<Skill>, BackendError> {
        self.fetch(TableQuery::new("skills").select("*").order("name"))
            .await
    }

    async fn match_skills(&self, needle: &str) -> Result<Vec<Skill>, BackendError> {
        self.fetch(
            TableQuery::new("skills")
                .select("*")
                .ilike_contains("name", needle),
        )
        .await
    }

    async fn memberships_for_skills(
        &self,
        skill_ids: &[Uuid],
    ) -> Result<Vec<SkillMembership>, BackendError> {
        let rows: Vec<MembershipRow> = self
            .fetch(
                TableQuery::new("user_skills")
                    .select(
                        "user_id, skill_id, \
                         profiles(id, full_name, department, year_of_study, bio, email, linkedin_url), \
                         skills(name)",
                    )
                    .id_in("skill_id", skill_ids),
            )
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| SkillMembership {
                user_id: r.user_id,
                skill_id: r.skill_id,
                profile: r.profiles,
                skill_name: r.skills.name,
            })
            .collect())
    }

    async fn profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, BackendError> {
        let rows: Vec<Profile> = self
            .fetch(
                TableQuery::new("profiles")
                    .select("*")
                    .eq("id", &id.to_string())
                    .limit(1),
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn skills_for_profile(&self, user_id: Uuid) -> Result<Vec<Skill>, BackendError> {
        let rows: Vec<ProfileSkillRow> = self
            .fetch(
                TableQuery::new("user_skills")
                    .select("skills(id, name, category)")
                    .eq("user_id", &user_id.to_string()),
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.skills).collect())
    }

    async fn insert_profile(
        &self,
        token: &str,
        profile: &NewProfile,
    ) -> Result<(), BackendError> {
        self.insert(token, "profiles", &[profile]).await
    }

    async fn insert_memberships(
        &self,
        token: &str,
        rows: &[UserSkill],
    ) -> Result<(), BackendError> {
        self.insert(token, "user_skills", rows).await
    }

    async fn insert_skill(&self, token: &str, skill: &NewSkill) -> Result<Skill, BackendError> {
        self.insert_returning(token, "skills", &[skill]).await
    }
}
