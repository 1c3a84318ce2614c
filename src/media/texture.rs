/// Texture cache for gallery images
///
/// Image URLs come in three shapes: `data:` URIs from uploads, remote
/// `http(s)://` URLs, and asset paths such as `/image1.jpeg` that resolve
/// against the configured asset directory.
use iced::widget::image::Handle;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::decode::parse_data_uri;
use crate::error::{GalleryError, Result};

/// Where the pixels for a URL come from
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    Inline(Vec<u8>),
    Remote(String),
    File(PathBuf),
}

impl TextureSource {
    pub fn classify(url: &str, asset_dir: &Path) -> Result<Self> {
        if url.starts_with("data:") {
            let (_, bytes) = parse_data_uri(url)?;
            return Ok(TextureSource::Inline(bytes));
        }
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(TextureSource::Remote(url.to_string()));
        }
        Ok(TextureSource::File(asset_dir.join(url.trim_start_matches('/'))))
    }
}

/// Resolve `url` into a drawable handle
pub async fn load(url: String, asset_dir: PathBuf, http: reqwest::Client) -> Result<Handle> {
    match TextureSource::classify(&url, &asset_dir)? {
        TextureSource::Inline(bytes) => Ok(Handle::from_bytes(bytes)),
        TextureSource::File(path) => {
            if tokio::fs::metadata(&path).await.is_err() {
                return Err(GalleryError::Decode(format!("Image not found: {}", path.display())));
            }
            Ok(Handle::from_path(path))
        }
        TextureSource::Remote(url) => {
            let response = http
                .get(&url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| GalleryError::Network(format!("requesting {url}: {e}")))?;
            let bytes = response
                .bytes()
                .await
                .map_err(|e| GalleryError::Network(format!("reading {url}: {e}")))?;
            Ok(Handle::from_bytes(bytes))
        }
    }
}

#[derive(Debug, Clone)]
pub enum TextureState {
    Loading,
    Ready(Handle),
    Failed,
}

#[derive(Debug, Default)]
pub struct TextureCache {
    entries: HashMap<String, TextureState>,
}

impl TextureCache {
    /// Mark `url` as loading. Returns false if it is already known.
    pub fn request(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), TextureState::Loading);
        true
    }

    pub fn insert(&mut self, url: String, handle: Handle) {
        self.entries.insert(url, TextureState::Ready(handle));
    }

    pub fn finish(&mut self, url: String, result: Result<Handle>) {
        match result {
            Ok(handle) => self.insert(url, handle),
            Err(e) => {
                tracing::warn!(url = %preview(&url), error = %e, "texture failed to load");
                self.entries.insert(url, TextureState::Failed);
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&Handle> {
        match self.entries.get(url) {
            Some(TextureState::Ready(handle)) => Some(handle),
            _ => None,
        }
    }

    /// Percentage of known textures that have settled (ready or failed)
    pub fn progress(&self) -> f32 {
        if self.entries.is_empty() {
            return 100.0;
        }
        let settled = self
            .entries
            .values()
            .filter(|state| !matches!(state, TextureState::Loading))
            .count();
        settled as f32 / self.entries.len() as f32 * 100.0
    }
}

/// Short form of a URL for logs; data URIs are huge
pub fn preview(url: &str) -> &str {
    if url.starts_with("data:") {
        url.split_once(',').map(|(header, _)| header).unwrap_or("data:")
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_by_scheme() {
        let assets = Path::new("/srv/assets");
        assert_eq!(
            TextureSource::classify("/image1.jpeg", assets).unwrap(),
            TextureSource::File(PathBuf::from("/srv/assets/image1.jpeg"))
        );
        assert_eq!(
            TextureSource::classify("https://cdn.example.com/a.jpg", assets).unwrap(),
            TextureSource::Remote("https://cdn.example.com/a.jpg".into())
        );
        assert_eq!(
            TextureSource::classify("data:image/png;base64,AAEC", assets).unwrap(),
            TextureSource::Inline(vec![0, 1, 2])
        );
        assert!(TextureSource::classify("data:broken", assets).is_err());
    }

    #[test]
    fn cache_tracks_progress() {
        let mut cache = TextureCache::default();
        assert_eq!(cache.progress(), 100.0);

        assert!(cache.request("a"));
        assert!(cache.request("b"));
        assert!(!cache.request("a"));
        assert_eq!(cache.progress(), 0.0);

        cache.finish("a".into(), Ok(Handle::from_bytes(vec![1, 2, 3])));
        assert!(cache.get("a").is_some());
        assert_eq!(cache.progress(), 50.0);

        cache.finish("b".into(), Err(GalleryError::Decode("nope".into())));
        assert!(cache.get("b").is_none());
        assert_eq!(cache.progress(), 100.0);
    }

    #[test]
    fn data_uris_are_shortened_in_logs() {
        assert_eq!(preview("data:image/png;base64,AAAA"), "data:image/png;base64");
        assert_eq!(preview("/image1.jpeg"), "/image1.jpeg");
    }

    #[tokio::test]
    async fn missing_asset_is_a_decode_error() {
        let result = load("/nope.jpeg".into(), PathBuf::from("/definitely/missing"), reqwest::Client::new()).await;
        assert!(matches!(result, Err(GalleryError::Decode(_))));
    }
}
