use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::session::UserId;

use super::document::UserDocument;

/// A remote (or local) home for per-user documents.
///
/// Implementations only move whole documents; merging is done by
/// `SyncService::merge_write` on top of `get` + `set`. Nothing here is
/// transactional, so a concurrent writer can land between the two calls.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait DocumentStore: Send + Sync {
    /// Backend name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the user's document; `Ok(None)` when it doesn't exist yet.
    async fn get(&self, user: &UserId) -> Result<Option<UserDocument>, CoreError>;

    /// Replace the user's document.
    async fn set(&self, user: &UserId, document: &UserDocument) -> Result<(), CoreError>;
}
