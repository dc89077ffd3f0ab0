use serde::{Deserialize, Serialize};

/// Stable opaque identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the identity provider currently reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Still waiting for the provider's first answer.
    #[default]
    Resolving,
    SignedOut,
    SignedIn(UserId),
}

impl AuthState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, AuthState::Resolving)
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            AuthState::SignedIn(id) => Some(id),
            _ => None,
        }
    }
}
