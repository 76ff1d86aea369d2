//! Landing-page data: a small set of skills rendered as shortcuts into
//! search. No ordering criterion beyond the service default.

use tracing::warn;

use crate::models::skill::TrendingSkill;
use crate::store::DirectoryStore;

pub const TRENDING_LIMIT: u32 = 8;

/// Fetches the landing-page skill shortcuts. A read failure degrades to an
/// empty list; the landing page never errors.
pub async fn trending_skills(store: &dyn DirectoryStore) -> Vec<TrendingSkill> {
    match store.trending_skills(TRENDING_LIMIT).await {
        Ok(skills) => skills,
        Err(e) => {
            warn!("trending skills fetch failed: {e}");
            Vec::new()
        }
    }
}
