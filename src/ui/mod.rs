/// User interface pieces
///
/// - `carousel.rs` - the 3D image strip (canvas program)
/// - `comments.rs` - the comment modal for the selected image
/// - `login.rs` - the login form
/// - `toast.rs` - success/error notifications

pub mod carousel;
pub mod comments;
pub mod login;
pub mod toast;
