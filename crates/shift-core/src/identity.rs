use crate::platform::UserDirectory;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Lazily populated user-id → display-name cache.
///
/// Entries never expire. A failed lookup caches the user ID itself so a
/// broken directory is asked at most once per user.
pub struct IdentityCache {
    directory: Arc<dyn UserDirectory>,
    names: RwLock<HashMap<String, String>>,
}

impl IdentityCache {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            directory,
            names: RwLock::new(HashMap::new()),
        }
    }

    pub async fn resolve(&self, user_id: &str) -> String {
        if let Some(name) = self.cached(user_id) {
            return name;
        }

        let name = match self.directory.display_name(user_id).await {
            Ok(name) => {
                tracing::debug!(user_id, username = %name, "resolved user id to username");
                name
            }
            Err(e) => {
                tracing::warn!(error = %e, user_id, "failed to get user info, using user id as fallback");
                user_id.to_string()
            }
        };

        self.names
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(user_id.to_string())
            .or_insert(name)
            .clone()
    }

    pub fn cached(&self, user_id: &str) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(user_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.names.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
