use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::directory::discovery;
use crate::directory::profile::{view_profile, ProfileView};
use crate::directory::search::{search_by_skill, SearchResults};
use crate::directory::setup::{add_skill, create_profile, SetupRequest, SetupResponse};
use crate::errors::AppError;
use crate::models::skill::{Skill, TrendingSkill};
use crate::session::Session;
use crate::state::AppState;
use crate::supabase::auth::SessionEvent;

/// GET /api/v1/skills/trending
pub async fn handle_trending(State(state): State<AppState>) -> Json<Vec<TrendingSkill>> {
    Json(discovery::trending_skills(state.store.as_ref()).await)
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// GET /api/v1/search?q=<skill text>
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    Ok(Json(search_by_skill(state.store.as_ref(), &params.q).await?))
}

/// GET /api/v1/skills
/// The setup form's selectable badges. Read failures degrade to an empty
/// list, same as every other read path.
pub async fn handle_list_skills(State(state): State<AppState>) -> Json<Vec<Skill>> {
    match state.store.list_skills().await {
        Ok(skills) => Json(skills),
        Err(e) => {
            warn!("skill list fetch failed: {e}");
            Json(Vec::new())
        }
    }
}

#[derive(Deserialize)]
pub struct AddSkillRequest {
    pub name: String,
}

/// POST /api/v1/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<AddSkillRequest>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    let skill = add_skill(state.store.as_ref(), &session.access_token, &req.name).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET /api/v1/profiles/me
pub async fn handle_my_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ProfileView>, AppError> {
    Ok(Json(
        view_profile(state.store.as_ref(), session.user.id, None).await?,
    ))
}

/// GET /api/v1/profiles/:id
pub async fn handle_profile(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileView>, AppError> {
    Ok(Json(
        view_profile(state.store.as_ref(), session.user.id, Some(id)).await?,
    ))
}

/// POST /api/v1/profiles
pub async fn handle_create_profile(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SetupRequest>,
) -> Result<(StatusCode, Json<SetupResponse>), AppError> {
    let response =
        create_profile(state.store.as_ref(), &session.access_token, &session.user, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// GET /api/v1/auth/session
/// The client's session mirror point; resolving it counts as a sign-in
/// observation for subscribers.
pub async fn handle_session(
    State(state): State<AppState>,
    session: Session,
) -> Json<SessionResponse> {
    state.auth.announce(SessionEvent::SignedIn {
        user_id: session.user.id,
    });
    Json(SessionResponse {
        user_id: session.user.id,
        email: session.user.email,
    })
}

/// POST /api/v1/auth/signout
pub async fn handle_sign_out(
    State(state): State<AppState>,
    session: Session,
) -> Result<StatusCode, AppError> {
    state
        .auth
        .sign_out(&session.access_token, session.user.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
