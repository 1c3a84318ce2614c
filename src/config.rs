/// Application configuration
///
/// Read from `config.json` in the user's config directory:
/// - Linux: ~/.config/photo-carousel/config.json
/// - macOS: ~/Library/Application Support/photo-carousel/config.json
/// - Windows: %APPDATA%\photo-carousel\config.json
///
/// Every field has a default, so the file is optional. `GALLERY_API_URL`
/// overrides the backend base URL.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GalleryError, Result};

pub const APP_DIR: &str = "photo-carousel";
pub const ENV_API_URL: &str = "GALLERY_API_URL";

/// Allowed range for the opacity floor while scrolling
pub const OPACITY_FLOOR_RANGE: (f32, f32) = (0.2, 0.8);

/// How the login form checks credentials
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Built-in demo users, no network
    #[default]
    Mock,
    /// `POST /auth/login` against the backend
    Remote,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub auth_mode: AuthMode,
    /// Directory that relative image URLs (e.g. "/image1.jpeg") resolve against
    pub asset_dir: PathBuf,
    /// Images shown when the gallery first opens
    pub seed_images: Vec<String>,
    pub opacity_floor: f32,
    pub infinite_scroll: bool,
    /// Append the backend's `GET /images` list after login
    pub load_remote_images: bool,
    pub toast_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            auth_mode: AuthMode::Mock,
            asset_dir: PathBuf::from("assets"),
            seed_images: (1..=15).map(|i| format!("/image{i}.jpeg")).collect(),
            opacity_floor: 0.8,
            infinite_scroll: true,
            load_remote_images: false,
            toast_seconds: 3,
        }
    }
}

impl Config {
    /// Load the config file if present, then apply environment overrides.
    ///
    /// A missing file yields the defaults. A file that does not parse is an error
    /// so the caller can log it before falling back.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config.api_base_url = url;
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GalleryError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| GalleryError::Config(e.to_string()))
    }

    /// Reject values the renderer cannot honour
    pub fn validate(&self) -> Result<()> {
        let (low, high) = OPACITY_FLOOR_RANGE;
        if !(low..=high).contains(&self.opacity_floor) {
            return Err(GalleryError::Validation(format!(
                "opacity_floor must be between {low} and {high}, got {}",
                self.opacity_floor
            )));
        }
        reqwest::Url::parse(&self.api_base_url)
            .map_err(|e| GalleryError::Validation(format!("invalid api_base_url: {e}")))?;
        Ok(())
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.toast_seconds)
    }

    /// Location of the config file, if a config directory exists on this platform
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    /// Location of the persisted session token
    pub fn session_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(std::env::temp_dir);
        path.push(APP_DIR);
        path.push("session.json");
        path
    }
}
