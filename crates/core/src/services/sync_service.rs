use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::session::UserId;
use crate::models::state::AppState;
use crate::storage::document::UserDocument;
use crate::storage::traits::DocumentStore;

/// The persistence boundary: fetch, merge, write.
///
/// The three steps are separate store calls, so a writer elsewhere can
/// interleave between the fetch and the write; the last write wins.
pub struct SyncService;

impl SyncService {
    pub fn new() -> Self {
        Self
    }

    /// Merge `fields` into the user's stored document and write it back,
    /// stamping `updatedAt`. Returns the document as written.
    pub async fn merge_write(
        &self,
        store: &dyn DocumentStore,
        user: &UserId,
        fields: Map<String, Value>,
    ) -> Result<UserDocument, CoreError> {
        let field_names: Vec<String> = fields.keys().cloned().collect();

        let mut document = store.get(user).await?.unwrap_or_default();
        document.merge(fields);
        document.touch(Utc::now());
        store.set(user, &document).await?;

        info!(store = store.name(), %user, fields = ?field_names, "document saved");
        Ok(document)
    }

    /// Load the user's state; a user without a document starts empty.
    pub async fn load(&self, store: &dyn DocumentStore, user: &UserId) -> Result<AppState, CoreError> {
        match store.get(user).await? {
            Some(document) => {
                debug!(store = store.name(), %user, "document loaded");
                Ok(document.to_state())
            }
            None => {
                debug!(store = store.name(), %user, "no stored document, starting empty");
                Ok(AppState::default())
            }
        }
    }
}

impl Default for SyncService {
    fn default() -> Self {
        Self::new()
    }
}
