/// Login screen
use iced::widget::{button, column, container, text, text_input, Column};
use iced::{Alignment, Color, Element, Length};

use crate::state::session::Credentials;
use crate::Message;

const ERROR_COLOR: Color = Color::from_rgb(0.95, 0.4, 0.4);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub email_error: Option<&'static str>,
    pub password_error: Option<&'static str>,
}

impl LoginForm {
    /// Check the fields, recording inline errors. Returns credentials if valid.
    pub fn validate(&mut self) -> Option<Credentials> {
        let email = self.email.trim();
        self.email_error = if email.is_empty() {
            Some("Please input your email!")
        } else if !is_valid_email(email) {
            Some("Please enter a valid email!")
        } else {
            None
        };
        self.password_error = self.password.is_empty().then_some("Please input your password!");

        if self.email_error.is_some() || self.password_error.is_some() {
            return None;
        }
        Some(Credentials {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn view<'a>(&'a self, submitting: bool, hints: &[String]) -> Element<'a, Message> {
        let mut email = text_input("Email", &self.email).padding(10);
        let mut password = text_input("Password", &self.password).secure(true).padding(10);
        if !submitting {
            email = email.on_input(Message::EmailChanged).on_submit(Message::SubmitLogin);
            password = password.on_input(Message::PasswordChanged).on_submit(Message::SubmitLogin);
        }

        let mut form: Column<Message> = column![text("Login").size(36), email].spacing(12).width(360);
        if let Some(err) = self.email_error {
            form = form.push(text(err).size(13).color(ERROR_COLOR));
        }
        form = form.push(password);
        if let Some(err) = self.password_error {
            form = form.push(text(err).size(13).color(ERROR_COLOR));
        }
        form = form.push(
            button(text(if submitting { "Logging in..." } else { "Log in" }))
                .on_press_maybe((!submitting).then_some(Message::SubmitLogin))
                .padding(10)
                .width(Length::Fill),
        );

        if !hints.is_empty() {
            let demo = hints.iter().fold(
                column![text("Mock User Credentials").size(14)].spacing(4),
                |col, hint| col.push(text(hint.clone()).size(13)),
            );
            form = form.push(container(demo).padding(10).width(Length::Fill).style(container::rounded_box));
        }

        container(form.align_x(Alignment::Start))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }
}

/// Loose shape check: one `@`, something before it, a dotted domain after it
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
            ..LoginForm::default()
        }
    }

    #[test]
    fn empty_fields_are_required() {
        let mut f = form("", "");
        assert!(f.validate().is_none());
        assert_eq!(f.email_error, Some("Please input your email!"));
        assert_eq!(f.password_error, Some("Please input your password!"));
    }

    #[test]
    fn bad_email_shape_is_flagged() {
        for email in ["admin", "admin@", "@example.com", "admin@example", "a b@example.com", "a@b@c.com"] {
            let mut f = form(email, "secret");
            assert!(f.validate().is_none(), "{email} should be rejected");
            assert_eq!(f.email_error, Some("Please enter a valid email!"));
        }
    }

    #[test]
    fn valid_form_yields_trimmed_credentials() {
        let mut f = form("  admin@example.com ", "admin123");
        let creds = f.validate().unwrap();
        assert_eq!(creds.email, "admin@example.com");
        assert_eq!(creds.password, "admin123");
        assert_eq!(f.email_error, None);
        assert_eq!(f.password_error, None);
    }

    #[test]
    fn errors_clear_once_fixed() {
        let mut f = form("", "");
        f.validate();
        f.email = "user@example.com".into();
        f.password = "user123".into();
        assert!(f.validate().is_some());
        assert_eq!(f.email_error, None);
    }
}
