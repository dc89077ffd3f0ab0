use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::session::UserId;

use super::document::UserDocument;
use super::encryption::{self, KdfParams, SealingKey};
use super::format::{self, VaultHeader, CURRENT_VERSION};
use super::traits::DocumentStore;

/// Vault payload: user id → document JSON text.
pub type VaultContents = BTreeMap<String, String>;

/// A password-protected local file holding every user's document.
///
/// Flow on write: documents → bincode → AES-256-GCM(Argon2id(password)) →
/// AHUB container. Each write re-encrypts the whole file under a fresh salt
/// and nonce.
pub struct EncryptedFileStore {
    path: PathBuf,
    password: String,
    kdf_params: KdfParams,
}

impl std::fmt::Debug for EncryptedFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedFileStore")
            .field("path", &self.path)
            .field("kdf_params", &self.kdf_params)
            .finish()
    }
}

impl EncryptedFileStore {
    pub fn new(path: impl Into<PathBuf>, password: impl Into<String>) -> Self {
        Self::with_kdf_params(path, password, KdfParams::default())
    }

    /// Use custom Argon2 costs for new writes (reads use the header's).
    pub fn with_kdf_params(
        path: impl Into<PathBuf>,
        password: impl Into<String>,
        kdf_params: KdfParams,
    ) -> Self {
        Self {
            path: path.into(),
            password: password.into(),
            kdf_params,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_contents(&self) -> Result<VaultContents, CoreError> {
        if !self.path.exists() {
            return Ok(VaultContents::new());
        }
        let bytes = std::fs::read(&self.path)?;
        open_vault(&bytes, &self.password)
    }
}

/// Encrypt vault contents into container bytes.
pub fn seal_vault(
    contents: &VaultContents,
    password: &str,
    kdf_params: KdfParams,
) -> Result<Vec<u8>, CoreError> {
    let plaintext = bincode::serialize(contents)
        .map_err(|e| CoreError::Serialization(format!("Failed to encode vault: {e}")))?;
    let header = VaultHeader {
        version: CURRENT_VERSION,
        kdf_params,
        salt: encryption::random_bytes()?,
        nonce: encryption::random_bytes()?,
    };
    let key = SealingKey::derive(password, &header.salt, &header.kdf_params)?;
    let ciphertext = key.seal(&header.nonce, &plaintext)?;
    Ok(format::encode(&header, &ciphertext))
}

/// Decrypt container bytes back into vault contents.
pub fn open_vault(bytes: &[u8], password: &str) -> Result<VaultContents, CoreError> {
    let (header, ciphertext) = format::decode(bytes)?;
    let key = SealingKey::derive(password, &header.salt, &header.kdf_params)?;
    let plaintext = key.open(&header.nonce, ciphertext)?;
    bincode::deserialize(&plaintext)
        .map_err(|e| CoreError::Deserialization(format!("Failed to decode vault: {e}")))
}

#[async_trait]
impl DocumentStore for EncryptedFileStore {
    fn name(&self) -> &str {
        "EncryptedFile"
    }

    async fn get(&self, user: &UserId) -> Result<Option<UserDocument>, CoreError> {
        let contents = self.read_contents()?;
        contents
            .get(user.as_str())
            .map(|json| serde_json::from_str(json).map_err(CoreError::from))
            .transpose()
    }

    async fn set(&self, user: &UserId, document: &UserDocument) -> Result<(), CoreError> {
        let mut contents = self.read_contents()?;
        let json = serde_json::to_string(document)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize document: {e}")))?;
        contents.insert(user.as_str().to_string(), json);

        let bytes = seal_vault(&contents, &self.password, self.kdf_params)?;
        std::fs::write(&self.path, bytes)?;
        debug!(path = %self.path.display(), users = contents.len(), "vault written");
        Ok(())
    }
}
