use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::session::UserId;

use super::document::UserDocument;
use super::traits::DocumentStore;

const BACKEND: &str = "Http";

/// Where and how to reach a JSON document service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStoreConfig {
    /// e.g. `https://store.example.com/v1`, without a trailing slash.
    pub base_url: String,

    /// Path segment grouping user documents.
    pub collection: String,

    /// Sent as `Authorization: Bearer <token>` when present.
    pub auth_token: Option<String>,

    /// Per-request timeout (native targets only).
    pub timeout_secs: u64,
}

impl HttpStoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: "users".to_string(),
            auth_token: None,
            timeout_secs: 30,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// `{base_url}/{collection}/{user}`
    pub fn document_url(&self, user: &UserId) -> String {
        format!("{}/{}/{}", self.base_url, self.collection, user.as_str())
    }
}

/// Document store speaking plain JSON over HTTP.
///
/// - `GET  {base}/{collection}/{user}` → document, `404` when absent
/// - `PUT  {base}/{collection}/{user}` with the full document as body
pub struct HttpDocumentStore {
    client: Client,
    config: HttpStoreConfig,
}

impl HttpDocumentStore {
    pub fn new(config: HttpStoreConfig) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn status_error(status: StatusCode, action: &str, user: &UserId) -> CoreError {
    CoreError::Store {
        backend: BACKEND.into(),
        message: format!("{action} for {user} failed with HTTP {status}"),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl DocumentStore for HttpDocumentStore {
    fn name(&self) -> &str {
        BACKEND
    }

    async fn get(&self, user: &UserId) -> Result<Option<UserDocument>, CoreError> {
        let url = self.config.document_url(user);
        debug!(%url, "fetching document");

        let resp = self.authorize(self.client.get(&url)).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let document = resp.json::<UserDocument>().await.map_err(|e| CoreError::Store {
                    backend: BACKEND.into(),
                    message: format!("Failed to parse document for {user}: {e}"),
                })?;
                Ok(Some(document))
            }
            status => Err(status_error(status, "read", user)),
        }
    }

    async fn set(&self, user: &UserId, document: &UserDocument) -> Result<(), CoreError> {
        let url = self.config.document_url(user);
        debug!(%url, fields = document.fields().len(), "writing document");

        let resp = self
            .authorize(self.client.put(&url))
            .json(document)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, "write", user))
        }
    }
}
