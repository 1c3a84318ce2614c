/// Image media handling
///
/// This module handles:
/// - Decoding uploaded files into `data:` URIs (decode.rs)
/// - Resolving image URLs into textures and caching them (texture.rs)

pub mod decode;
pub mod texture;
