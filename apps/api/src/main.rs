mod config;
mod directory;
mod errors;
mod models;
mod routes;
mod session;
mod state;
mod store;
mod supabase;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::supabase::auth::AuthClient;
use crate::supabase::SupabaseClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillHub API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the managed-backend clients
    let store = SupabaseClient::new(&config.supabase_url, &config.supabase_anon_key);
    let auth = AuthClient::new(&config.supabase_url, &config.supabase_anon_key);
    info!("Backend client initialized ({})", config.supabase_url);

    // Mirror session-change notifications into the log
    let mut session_events = auth.subscribe();
    tokio::spawn(async move {
        loop {
            match session_events.recv().await {
                Ok(event) => info!("session change: {event:?}"),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("session event stream lagged by {n}")
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Build app state
    let state = AppState {
        store: Arc::new(store),
        auth,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
