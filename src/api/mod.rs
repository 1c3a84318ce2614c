/// Backend access
///
/// - `client.rs` - HTTP client for the gallery API (bearer token attached)
/// - `mock.rs` - demo accounts for running without a backend
///
/// [`AuthBackend`] is what the login form talks to; it hides which of the
/// two is in use.

pub mod client;
pub mod mock;

pub use client::ApiClient;
pub use mock::MockDirectory;

use crate::error::{GalleryError, Result};
use crate::state::session::{Credentials, Session};

#[derive(Debug, Clone)]
pub enum AuthBackend {
    Remote(ApiClient),
    Mock(MockDirectory),
}

impl AuthBackend {
    pub async fn login(self, credentials: Credentials) -> Result<Session> {
        match self {
            AuthBackend::Remote(client) => client.login(&credentials).await,
            AuthBackend::Mock(directory) => directory
                .authorize(&credentials)
                .ok_or_else(|| GalleryError::Authentication("Invalid email or password".to_string())),
        }
    }

    /// Tell the backend the session is over. Failures are logged, not surfaced.
    pub async fn logout(self, access_token: String) {
        if let AuthBackend::Remote(client) = self {
            if let Err(e) = client.with_token(access_token).logout().await {
                tracing::warn!(error = %e, "backend logout failed");
            }
        }
    }

    /// Demo credentials to show on the login screen, if any
    pub fn hints(&self) -> Vec<String> {
        match self {
            AuthBackend::Mock(directory) => directory.hints(),
            AuthBackend::Remote(_) => Vec::new(),
        }
    }
}
