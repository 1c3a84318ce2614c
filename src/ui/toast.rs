/// Fire-and-forget notifications
use iced::alignment::Horizontal;
use iced::widget::{column, container, mouse_area, text, Column};
use iced::{Color, Element, Length};
use std::time::{Duration, Instant};

use crate::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
    pub created: Instant,
}

#[derive(Debug)]
pub struct Notifications {
    items: Vec<Toast>,
    next_id: u64,
    lifetime: Duration,
}

impl Notifications {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            items: Vec::new(),
            next_id: 0,
            lifetime,
        }
    }

    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>, now: Instant) {
        let text = text.into();
        match kind {
            ToastKind::Success => tracing::info!(%text, "toast"),
            ToastKind::Error => tracing::warn!(%text, "toast"),
        }
        self.items.push(Toast {
            id: self.next_id,
            kind,
            text,
            created: now,
        });
        self.next_id += 1;
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text, Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Error, text, Instant::now());
    }

    /// Drop toasts older than the lifetime
    pub fn prune(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.items.retain(|toast| now.saturating_duration_since(toast.created) < lifetime);
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|toast| toast.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }

    pub fn view(&self) -> Element<'_, Message> {
        let toasts: Column<Message> = self
            .items
            .iter()
            .fold(column![].spacing(8), |col, toast| {
                let color = match toast.kind {
                    ToastKind::Success => Color::from_rgb(0.45, 0.85, 0.5),
                    ToastKind::Error => Color::from_rgb(0.95, 0.4, 0.4),
                };
                col.push(
                    mouse_area(
                        container(text(&toast.text).size(14).color(color))
                            .padding(10)
                            .style(container::rounded_box),
                    )
                    .on_press(Message::DismissToast(toast.id)),
                )
            });

        container(toasts)
            .width(Length::Fill)
            .align_x(Horizontal::Right)
            .padding(16)
            .into()
    }
}
