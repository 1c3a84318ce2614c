/// Error kinds surfaced by the gallery
///
/// Every variant carries a user-facing message. The type is `Clone` so that
/// results can travel inside application messages.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// Bad credentials or a failed login round-trip
    #[error("{0}")]
    Authentication(String),
    /// An uploaded or referenced image could not be read or decoded
    #[error("{0}")]
    Decode(String),
    /// Any other backend call failed
    #[error("{0}")]
    Network(String),
    /// A setting or input value is outside what the app accepts
    #[error("{0}")]
    Validation(String),
    /// The persisted session could not be read or written
    #[error("session store: {0}")]
    Session(String),
    /// The config file could not be parsed
    #[error("config: {0}")]
    Config(String),
}

impl GalleryError {
    /// Message shown to the user when a backend call fails without detail
    pub const NETWORK_FALLBACK: &'static str = "Something went wrong. Please try again.";

    /// Text suitable for a toast
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::Network(_) => Self::NETWORK_FALLBACK.to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_use_generic_message() {
        let err = GalleryError::Network("connection refused".into());
        assert_eq!(err.user_message(), GalleryError::NETWORK_FALLBACK);
    }

    #[test]
    fn authentication_errors_keep_server_message() {
        let err = GalleryError::Authentication("Invalid credentials".into());
        assert_eq!(err.user_message(), "Invalid credentials");
    }
}
