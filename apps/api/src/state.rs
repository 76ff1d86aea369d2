use std::sync::Arc;

use crate::store::DirectoryStore;
use crate::supabase::auth::AuthClient;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    /// Directory data operations. Production: the managed-backend client.
    pub store: Arc<dyn DirectoryStore>,
    pub auth: AuthClient,
}
