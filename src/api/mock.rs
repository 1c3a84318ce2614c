/// Built-in demo accounts
///
/// Used when `auth_mode` is `mock` so the gallery works without a backend.
use chrono::Utc;

use crate::state::session::{Credentials, Session, User};

struct DemoUser {
    id: &'static str,
    name: &'static str,
    email: &'static str,
    password: &'static str,
}

const USERS: &[DemoUser] = &[
    DemoUser {
        id: "1",
        name: "Admin",
        email: "admin@example.com",
        password: "admin123",
    },
    DemoUser {
        id: "2",
        name: "User",
        email: "user@example.com",
        password: "user123",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct MockDirectory;

impl MockDirectory {
    /// Lines shown under the login form
    pub fn hints(&self) -> Vec<String> {
        USERS
            .iter()
            .map(|u| format!("{}: {} / {}", u.name, u.email, u.password))
            .collect()
    }

    pub fn authorize(&self, credentials: &Credentials) -> Option<Session> {
        if credentials.email.is_empty() || credentials.password.is_empty() {
            return None;
        }
        let user = USERS
            .iter()
            .find(|u| u.email == credentials.email && u.password == credentials.password)?;

        Some(Session {
            user: User {
                id: user.id.to_string(),
                name: user.name.to_string(),
                email: user.email.to_string(),
            },
            access_token: format!("mock-{}-{}", user.id, Utc::now().timestamp_millis()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn demo_users_can_log_in() {
        let session = MockDirectory.authorize(&creds("user@example.com", "user123")).unwrap();
        assert_eq!(session.user.name, "User");
        assert!(session.access_token.starts_with("mock-2-"));
    }

    #[test]
    fn wrong_password_is_refused() {
        assert!(MockDirectory.authorize(&creds("admin@example.com", "user123")).is_none());
        assert!(MockDirectory.authorize(&creds("", "")).is_none());
    }

    #[test]
    fn hints_list_every_user() {
        let hints = MockDirectory.hints();
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0], "Admin: admin@example.com / admin123");
    }
}
