/// Gallery state and its reducer
///
/// All mutations of the image list, the selection and comments go through
/// [`GalleryState::apply`]. Comment actions only ever touch the currently
/// selected image.
use chrono::{DateTime, Utc};

use super::data::{Author, Comment, ImageRecord};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Append an image with an empty comment list
    AddImage(String),
    /// Open the detail modal for the image with this URL
    SelectImage(String),
    /// Close the detail modal
    CloseImage,
    AddComment {
        text: String,
        author: Author,
        id: String,
        created_at: DateTime<Utc>,
    },
    EditComment {
        id: String,
        text: String,
        actor_email: String,
    },
    DeleteComment {
        id: String,
        actor_email: String,
    },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GalleryState {
    images: Vec<ImageRecord>,
    selected: Option<String>,
}

impl GalleryState {
    pub fn with_images<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            images: urls.into_iter().map(ImageRecord::new).collect(),
            selected: None,
        }
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    /// The record shown in the modal. With aliased URLs the first match wins.
    pub fn selected(&self) -> Option<&ImageRecord> {
        let url = self.selected.as_deref()?;
        self.images.iter().find(|image| image.url == url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.images.iter().any(|image| image.url == url)
    }

    fn selected_mut(&mut self) -> Option<&mut ImageRecord> {
        let url = self.selected.as_deref()?;
        self.images.iter_mut().find(|image| image.url == url)
    }

    /// Apply an action. Returns true if anything changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::AddImage(url) => {
                self.images.push(ImageRecord::new(url));
                true
            }
            Action::SelectImage(url) => {
                if !self.contains(&url) || self.selected.as_deref() == Some(url.as_str()) {
                    return false;
                }
                self.selected = Some(url);
                true
            }
            Action::CloseImage => self.selected.take().is_some(),
            Action::AddComment {
                text,
                author,
                id,
                created_at,
            } => {
                let text = text.trim();
                if text.is_empty() {
                    return false;
                }
                let Some(image) = self.selected_mut() else {
                    return false;
                };
                let id = unique_id(&image.comments, id);
                image.comments.push(Comment {
                    id,
                    text: text.to_string(),
                    author,
                    created_at,
                });
                true
            }
            Action::EditComment {
                id,
                text,
                actor_email,
            } => {
                let text = text.trim();
                if text.is_empty() {
                    return false;
                }
                let Some(image) = self.selected_mut() else {
                    return false;
                };
                match image.comments.iter_mut().find(|c| c.id == id) {
                    Some(comment) if comment.is_authored_by(&actor_email) => {
                        comment.text = text.to_string();
                        true
                    }
                    Some(_) => {
                        tracing::warn!(comment = %id, "edit rejected: not the author");
                        false
                    }
                    None => false,
                }
            }
            Action::DeleteComment { id, actor_email } => {
                let Some(image) = self.selected_mut() else {
                    return false;
                };
                let Some(position) = image.comments.iter().position(|c| c.id == id) else {
                    return false;
                };
                if !image.comments[position].is_authored_by(&actor_email) {
                    tracing::warn!(comment = %id, "delete rejected: not the author");
                    return false;
                }
                image.comments.remove(position);
                true
            }
        }
    }
}

/// Time-based comment id for `now`
pub fn comment_id(now: DateTime<Utc>) -> String {
    now.timestamp_millis().to_string()
}

/// Suffix `id` until it does not collide with an existing comment
fn unique_id(existing: &[Comment], id: String) -> String {
    if !existing.iter().any(|c| c.id == id) {
        return id;
    }
    let mut n = 1;
    loop {
        let candidate = format!("{id}-{n}");
        if !existing.iter().any(|c| c.id == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alice() -> Author {
        Author {
            name: "Alice".into(),
            email: "alice@example.com".into(),
        }
    }

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn add(text: &str, id: &str) -> Action {
        Action::AddComment {
            text: text.into(),
            author: alice(),
            id: id.into(),
            created_at: at(1_000),
        }
    }

    fn gallery_with_selection() -> GalleryState {
        let mut state = GalleryState::with_images(["a.jpg", "b.jpg", "c.jpg"]);
        assert!(state.apply(Action::SelectImage("b.jpg".into())));
        state
    }

    #[test]
    fn add_image_appends_and_preserves_order() {
        let mut state = GalleryState::with_images(["a.jpg", "b.jpg"]);
        assert!(state.apply(Action::AddImage("c.jpg".into())));

        let urls: Vec<_> = state.images().iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["a.jpg", "b.jpg", "c.jpg"]);
        assert!(state.images()[2].comments.is_empty());
    }

    #[test]
    fn selecting_unknown_url_is_ignored() {
        let mut state = GalleryState::with_images(["a.jpg"]);
        assert!(!state.apply(Action::SelectImage("missing.jpg".into())));
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn close_clears_selection() {
        let mut state = gallery_with_selection();
        assert!(state.apply(Action::CloseImage));
        assert!(state.selected().is_none());
        assert!(!state.apply(Action::CloseImage));
    }

    #[test]
    fn whitespace_comment_is_a_no_op() {
        let mut state = gallery_with_selection();
        let before = state.clone();
        assert!(!state.apply(add("   \t ", "1")));
        assert!(!state.apply(add("", "2")));
        assert_eq!(state, before);
    }

    #[test]
    fn comment_lands_on_selected_image_only() {
        let mut state = gallery_with_selection();
        assert!(state.apply(add("hello", "1")));

        let counts: Vec<_> = state.images().iter().map(|i| i.comments.len()).collect();
        assert_eq!(counts, [0, 1, 0]);
        let comment = &state.selected().unwrap().comments[0];
        assert_eq!(comment.text, "hello");
        assert_eq!(comment.author, alice());
    }

    #[test]
    fn comment_without_selection_is_ignored() {
        let mut state = GalleryState::with_images(["a.jpg"]);
        assert!(!state.apply(add("hello", "1")));
        assert!(state.images()[0].comments.is_empty());
    }

    #[test]
    fn colliding_ids_get_suffixed() {
        let mut state = gallery_with_selection();
        state.apply(add("one", "42"));
        state.apply(add("two", "42"));
        state.apply(add("three", "42"));

        let ids: Vec<_> = state.selected().unwrap().comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["42", "42-1", "42-2"]);
    }

    #[test]
    fn author_can_edit_text_only() {
        let mut state = gallery_with_selection();
        state.apply(add("hello", "1"));
        let original = state.selected().unwrap().comments[0].clone();

        assert!(state.apply(Action::EditComment {
            id: "1".into(),
            text: "  hello again ".into(),
            actor_email: "alice@example.com".into(),
        }));

        let edited = &state.selected().unwrap().comments[0];
        assert_eq!(edited.text, "hello again");
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.author, original.author);
        assert_eq!(edited.created_at, original.created_at);
    }

    #[test]
    fn edit_by_someone_else_is_rejected() {
        let mut state = gallery_with_selection();
        state.apply(add("hello", "1"));

        assert!(!state.apply(Action::EditComment {
            id: "1".into(),
            text: "hijacked".into(),
            actor_email: "mallory@example.com".into(),
        }));
        assert_eq!(state.selected().unwrap().comments[0].text, "hello");
    }

    #[test]
    fn edit_with_empty_text_or_unknown_id_is_a_no_op() {
        let mut state = gallery_with_selection();
        state.apply(add("hello", "1"));

        assert!(!state.apply(Action::EditComment {
            id: "1".into(),
            text: "  ".into(),
            actor_email: "alice@example.com".into(),
        }));
        assert!(!state.apply(Action::EditComment {
            id: "999".into(),
            text: "text".into(),
            actor_email: "alice@example.com".into(),
        }));
        assert_eq!(state.selected().unwrap().comments[0].text, "hello");
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut state = gallery_with_selection();
        state.apply(add("first", "1"));
        state.apply(add("second", "2"));

        assert!(state.apply(Action::DeleteComment {
            id: "1".into(),
            actor_email: "alice@example.com".into(),
        }));
        let remaining: Vec<_> = state.selected().unwrap().comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(remaining, ["2"]);
    }

    #[test]
    fn delete_of_missing_id_is_a_no_op() {
        let mut state = gallery_with_selection();
        state.apply(add("first", "1"));
        let before = state.clone();

        assert!(!state.apply(Action::DeleteComment {
            id: "nope".into(),
            actor_email: "alice@example.com".into(),
        }));
        assert_eq!(state, before);
    }

    #[test]
    fn delete_by_someone_else_is_rejected() {
        let mut state = gallery_with_selection();
        state.apply(add("first", "1"));

        assert!(!state.apply(Action::DeleteComment {
            id: "1".into(),
            actor_email: "mallory@example.com".into(),
        }));
        assert_eq!(state.selected().unwrap().comments.len(), 1);
    }

    #[test]
    fn comment_ids_are_millisecond_timestamps() {
        assert_eq!(comment_id(at(1_700_000_000_123)), "1700000000123");
    }
}
