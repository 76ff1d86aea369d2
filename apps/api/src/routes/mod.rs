pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::directory::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/skills/trending", get(handlers::handle_trending))
        .route(
            "/api/v1/skills",
            get(handlers::handle_list_skills).post(handlers::handle_add_skill),
        )
        .route("/api/v1/search", get(handlers::handle_search))
        .route("/api/v1/profiles", post(handlers::handle_create_profile))
        .route("/api/v1/profiles/me", get(handlers::handle_my_profile))
        .route("/api/v1/profiles/:id", get(handlers::handle_profile))
        .route("/api/v1/auth/session", get(handlers::handle_session))
        .route("/api/v1/auth/signout", post(handlers::handle_sign_out))
        .with_state(state)
}
