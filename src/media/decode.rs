/// Upload decoding
///
/// A picked file is read, checked to be a real image and re-encoded as a
/// self-contained `data:` URI. The work runs on a blocking thread so the
/// render loop keeps going.
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use iced::widget::image::Handle;
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{GalleryError, Result};

/// Extensions offered by the file picker
pub const ACCEPTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// A decoded upload, ready to append to the gallery
#[derive(Debug, Clone)]
pub struct DecodedUpload {
    pub file_name: String,
    /// `data:<mime>;base64,...`
    pub url: String,
    /// Texture built from the same bytes, so the cache does not decode twice
    pub handle: Handle,
}

/// Decode `path` off the UI thread
pub async fn decode_upload(path: PathBuf) -> Result<DecodedUpload> {
    task::spawn_blocking(move || decode_upload_blocking(&path))
        .await
        .map_err(|e| GalleryError::Decode(format!("Task join error: {}", e)))?
}

fn decode_upload_blocking(path: &Path) -> Result<DecodedUpload> {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let bytes = std::fs::read(path)
        .map_err(|e| GalleryError::Decode(format!("Failed to read {}: {}", file_name, e)))?;

    let url = encode_data_uri(&bytes).map_err(|e| match e {
        GalleryError::Decode(reason) => GalleryError::Decode(format!("{} is not a readable image: {}", file_name, reason)),
        other => other,
    })?;

    tracing::info!(file = %file_name, bytes = bytes.len(), "📸 decoded upload");

    Ok(DecodedUpload {
        file_name,
        url,
        handle: Handle::from_bytes(bytes),
    })
}

/// Validate `bytes` as an image and wrap them in a `data:` URI
pub fn encode_data_uri(bytes: &[u8]) -> Result<String> {
    let format = image::guess_format(bytes).map_err(|e| GalleryError::Decode(e.to_string()))?;
    image::load_from_memory_with_format(bytes, format).map_err(|e| GalleryError::Decode(e.to_string()))?;

    Ok(format!("data:{};base64,{}", format.to_mime_type(), STANDARD.encode(bytes)))
}

/// Split a base64 `data:` URI into its mime type and payload
pub fn parse_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| GalleryError::Decode("not a data URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| GalleryError::Decode("data URI has no payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| GalleryError::Decode("only base64 data URIs are supported".to_string()))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| GalleryError::Decode(format!("invalid base64 payload: {}", e)))?;
    Ok((mime.to_string(), bytes))
}
