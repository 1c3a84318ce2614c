/// Comment panel for the selected image
///
/// Edit and Delete controls are only rendered for comments written by the
/// signed-in user (matched by email).
use iced::widget::{button, column, container, horizontal_space, image, row, scrollable, text, text_input, Column};
use iced::{Element, Length};

use crate::state::data::{Author, Comment, ImageRecord};
use crate::Message;

/// Comment being rewritten in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommentPanel {
    pub draft: String,
    pub editing: Option<EditDraft>,
}

impl CommentPanel {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Start editing `comment` if `actor` wrote it
    pub fn begin_edit(&mut self, comment: &Comment, actor: &Author) -> bool {
        if !comment.is_authored_by(&actor.email) {
            return false;
        }
        self.editing = Some(EditDraft {
            id: comment.id.clone(),
            text: comment.text.clone(),
        });
        true
    }

    pub fn view<'a>(
        &'a self,
        record: &'a ImageRecord,
        texture: Option<&'a image::Handle>,
        actor: &Author,
    ) -> Element<'a, Message> {
        let picture: Element<'a, Message> = match texture {
            Some(handle) => image(handle.clone()).width(Length::Fill).height(280).into(),
            None => container(text("Image unavailable").size(14))
                .height(280)
                .center_x(Length::Fill)
                .center_y(280)
                .into(),
        };

        let list: Column<Message> = if record.comments.is_empty() {
            column![text("No comments yet.").size(14)]
        } else {
            record
                .comments
                .iter()
                .fold(column![].spacing(10), |col, comment| col.push(self.comment_row(comment, actor)))
        };

        let composer = row![
            text_input("Add a comment...", &self.draft)
                .on_input(Message::CommentDraftChanged)
                .on_submit(Message::SubmitComment)
                .padding(8),
            button("Post").on_press(Message::SubmitComment).padding(8),
        ]
        .spacing(8);

        let header = row![
            text(format!("{} comments", record.comments.len())).size(18),
            horizontal_space(),
            button("Close").on_press(Message::CloseImage),
        ];

        container(
            column![header, picture, scrollable(list).height(Length::Fill), composer]
                .spacing(12)
                .padding(16),
        )
        .width(640)
        .height(640)
        .style(container::rounded_box)
        .into()
    }

    fn comment_row<'a>(&'a self, comment: &'a Comment, actor: &Author) -> Element<'a, Message> {
        let byline = text(format!(
            "{} · {}",
            comment.author.name,
            comment.created_at.format("%Y-%m-%d %H:%M")
        ))
        .size(12);

        if let Some(edit) = self.editing.as_ref().filter(|e| e.id == comment.id) {
            return column![
                byline,
                row![
                    text_input("Comment", &edit.text)
                        .on_input(Message::EditDraftChanged)
                        .on_submit(Message::SaveEdit)
                        .padding(6),
                    button("Save").on_press(Message::SaveEdit),
                    button("Cancel").on_press(Message::CancelEdit),
                ]
                .spacing(6),
            ]
            .spacing(4)
            .into();
        }

        let mut line = row![text(&comment.text).size(15).width(Length::Fill)].spacing(6);
        if comment.is_authored_by(&actor.email) {
            line = line
                .push(button(text("Edit").size(12)).on_press(Message::StartEdit(comment.id.clone())))
                .push(button(text("Delete").size(12)).on_press(Message::DeleteComment(comment.id.clone())));
        }
        column![byline, line].spacing(4).into()
    }
}
