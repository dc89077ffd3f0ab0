use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::errors::CoreError;
use crate::models::session::UserId;

use super::document::UserDocument;
use super::traits::DocumentStore;

const BACKEND: &str = "Memory";

/// In-process document store.
///
/// Reads and writes can be switched to fail, which is how offline or
/// rejected writes are simulated.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<UserId, UserDocument>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed or overwrite a document directly, bypassing failure switches.
    pub fn insert(&self, user: UserId, document: UserDocument) -> Result<(), CoreError> {
        self.documents
            .write()
            .map_err(|_| poisoned())?
            .insert(user, document);
        Ok(())
    }

    /// Current stored copy, bypassing failure switches.
    pub fn snapshot(&self, user: &UserId) -> Option<UserDocument> {
        self.documents.read().ok()?.get(user).cloned()
    }
}

fn poisoned() -> CoreError {
    CoreError::Store {
        backend: BACKEND.into(),
        message: "lock poisoned".into(),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DocumentStore for MemoryDocumentStore {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn get(&self, user: &UserId) -> Result<Option<UserDocument>, CoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Store {
                backend: BACKEND.into(),
                message: format!("read rejected for {user}"),
            });
        }
        Ok(self
            .documents
            .read()
            .map_err(|_| poisoned())?
            .get(user)
            .cloned())
    }

    async fn set(&self, user: &UserId, document: &UserDocument) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Store {
                backend: BACKEND.into(),
                message: format!("write rejected for {user}"),
            });
        }
        self.documents
            .write()
            .map_err(|_| poisoned())?
            .insert(user.clone(), document.clone());
        Ok(())
    }
}
