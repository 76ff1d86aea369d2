//! Session operations against the backend's auth endpoints: resolve the
//! identity behind a bearer token, revoke a session, and broadcast
//! session-change notifications to in-process subscribers.

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::supabase::{api_error, BackendError, REQUEST_TIMEOUT_SECS};

const AUTH_PATH: &str = "/auth/v1";
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// The authenticated identity behind a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Push-style session-change notification, delivered to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: Uuid },
    SignedOut { user_id: Uuid },
}

/// Client for the backend's auth interface. Sign-in itself happens at the
/// provider; this layer only resolves tokens, revokes sessions, and fans
/// out session events.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    anon_key: String,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            events,
        }
    }

    /// Subscribes to session-change notifications. Lagging receivers drop
    /// the oldest events, which is acceptable for a notification stream.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Publishes a session event. Send failures only mean nobody is
    /// listening right now.
    pub(crate) fn announce(&self, event: SessionEvent) {
        debug!("session event: {event:?}");
        let _ = self.events.send(event);
    }

    /// Resolves the identity behind an access token.
    pub async fn current_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let response = self
            .http
            .get(format!("{}{}/user", self.base_url, AUTH_PATH))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), body));
        }
        serde_json::from_str(&body).map_err(BackendError::Parse)
    }

    /// Revokes the session at the provider and notifies subscribers.
    pub async fn sign_out(&self, access_token: &str, user_id: Uuid) -> Result<(), BackendError> {
        let response = self
            .http
            .post(format!("{}{}/logout", self.base_url, AUTH_PATH))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(api_error(status.as_u16(), body));
        }

        self.announce(SessionEvent::SignedOut { user_id });
        Ok(())
    }
}
