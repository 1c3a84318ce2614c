/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The image list, selection and comments with their reducer (gallery.rs)
/// - Login state and the persisted session (session.rs)

pub mod data;
pub mod gallery;
pub mod session;
