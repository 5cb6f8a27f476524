use crate::models::Observation;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// A stored filter result, kept until its token expires
#[derive(Clone, Debug)]
struct CacheEntry {
    observations: Vec<Observation>,
    stored_at: DateTime<Utc>,
}

/// Holds recent filter results under opaque tokens so a result survives
/// the redirect after a page POST. The token travels in the redirect
/// query string as explicit client-held state; there is no cookie-based
/// session affinity. Expired entries are purged on the next store.
pub struct ResultCache {
    entries: RwLock<HashMap<Uuid, CacheEntry>>,
    ttl_seconds: i64,
}

pub type SharedResultCache = Arc<ResultCache>;

impl ResultCache {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_seconds,
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        now - entry.stored_at >= Duration::seconds(self.ttl_seconds)
    }

    /// Store a result list and return the token that retrieves it
    pub async fn store(&self, observations: Vec<Observation>) -> Uuid {
        let now = Utc::now();
        let token = Uuid::new_v4();

        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| !self.is_expired(entry, now));
        entries.insert(
            token,
            CacheEntry {
                observations,
                stored_at: now,
            },
        );
        debug!(%token, held = entries.len(), "Stored filter result");
        token
    }

    /// Fetch a stored result; `None` for an unknown or expired token. The
    /// entry stays live until expiry so page reloads keep working.
    pub async fn fetch(&self, token: &Uuid) -> Option<Vec<Observation>> {
        let now = Utc::now();
        let entries = self.entries.read().await;
        entries
            .get(token)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.observations.clone())
    }
}
