use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};
use crate::state::session::{Credentials, Session, User};

const AUTH_FAILED: &str = "Authentication failed";
const INVALID_RESPONSE: &str = "Invalid response from server";
const UNEXPECTED: &str = "An unexpected error occurred";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Debug)]
struct LoginResponse {
    id: serde_json::Value,
    name: String,
    email: String,
    #[serde(default)]
    access_token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: Option<String>,
}

/// `GET /images` returns either bare URLs or objects with a `url`
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RemoteImage {
    Url(String),
    Record { url: String },
}

/// Thin client for the gallery backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        // Without a trailing slash `join` would replace the last path segment
        let base = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        Self { http, base, token: None }
    }

    /// Copy of this client that sends `Authorization: Bearer <token>`
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self.clone()
        }
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse(&self.base)
            .and_then(|base| base.join(path.trim_start_matches('/')))
            .map_err(|e| GalleryError::Config(format!("invalid endpoint {}{}: {}", self.base, path, e)))
    }

    fn post(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.http.post(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let url = self.endpoint("auth/login")?;
        let response = self
            .post(url)
            .json(&LoginRequest {
                email: &credentials.email,
                password: &credentials.password,
            })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "login request failed");
                GalleryError::Authentication(UNEXPECTED.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = %e, "failed to read login response");
            GalleryError::Authentication(UNEXPECTED.to_string())
        })?;
        session_from_login_response(status, &body)
    }

    /// `POST /auth/logout`
    pub async fn logout(&self) -> Result<()> {
        let url = self.endpoint("auth/logout")?;
        self.post(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GalleryError::Network(e.to_string()))?;
        Ok(())
    }

    /// `GET /images`, flattened to URLs
    pub async fn fetch_images(&self) -> Result<Vec<String>> {
        let url = self.endpoint("images")?;
        let images: Vec<RemoteImage> = self
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GalleryError::Network(format!("requesting {url}: {e}")))?
            .json()
            .await
            .map_err(|e| GalleryError::Network(format!("decoding {url}: {e}")))?;

        Ok(images
            .into_iter()
            .map(|image| match image {
                RemoteImage::Url(url) | RemoteImage::Record { url } => url,
            })
            .collect())
    }
}

/// Turn a login response into a session or a user-facing error
fn session_from_login_response(status: StatusCode, body: &str) -> Result<Session> {
    if !status.is_success() {
        tracing::error!(%status, body, "login rejected");
        let message = serde_json::from_str::<ApiError>(body)
            .ok()
            .and_then(|err| err.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| AUTH_FAILED.to_string());
        return Err(GalleryError::Authentication(message));
    }

    let parsed: LoginResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(error = %e, body, "unexpected login response");
        GalleryError::Authentication(INVALID_RESPONSE.to_string())
    })?;

    let Some(access_token) = parsed.access_token.filter(|t| !t.is_empty()) else {
        tracing::error!(body, "login response has no access token");
        return Err(GalleryError::Authentication(INVALID_RESPONSE.to_string()));
    };

    let id = match parsed.id {
        serde_json::Value::String(id) => id,
        other => other.to_string(),
    };

    Ok(Session {
        user: User {
            id,
            name: parsed.name,
            email: parsed.email,
        },
        access_token,
    })
}
