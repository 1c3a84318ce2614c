use chrono::Utc;
use iced::widget::image::Handle;
use iced::widget::{button, canvas, center, column, container, horizontal_space, mouse_area, opaque, row, stack, text};
use iced::{Color, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod media;
mod scene;
mod state;
mod ui;

use api::{ApiClient, AuthBackend, MockDirectory};
use config::{AuthMode, Config};
use error::GalleryError;
use media::decode::{self, DecodedUpload};
use media::texture::{self, TextureCache};
use scene::animator::{self, ImageMotion};
use scene::camera::Camera;
use scene::paging;
use scene::scroll::ScrollState;
use state::gallery::{comment_id, Action, GalleryState};
use state::session::{AuthGate, Session, SessionStore};
use ui::carousel::Carousel;
use ui::comments::CommentPanel;
use ui::login::LoginForm;
use ui::toast::Notifications;

/// Longest frame step fed to the animator, in seconds
const MAX_FRAME_STEP: f32 = 0.1;

/// Main application state
struct Gallery {
    config: Config,
    auth: AuthGate,
    backend: AuthBackend,
    api: ApiClient,
    http: reqwest::Client,
    store: SessionStore,
    login: LoginForm,
    /// Images, selection and comments
    gallery: GalleryState,
    panel: CommentPanel,
    /// One entry per image, same order as the gallery
    motions: Vec<ImageMotion>,
    scroll: ScrollState,
    camera: Camera,
    textures: TextureCache,
    toasts: Notifications,
    last_frame: Option<Instant>,
    /// `GET /images` is merged once per run
    remote_images_loaded: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// Startup check of the persisted session finished
    SessionRestored(Option<Session>),
    EmailChanged(String),
    PasswordChanged(String),
    SubmitLogin,
    LoginFinished(Result<Session, GalleryError>),
    SessionSaved(Result<(), GalleryError>),
    Logout,
    /// The backend logout call returned (its outcome is only logged)
    BackendLoggedOut,
    /// A display frame is about to be drawn
    Frame(Instant),
    Scrolled {
        pixels: f32,
        viewport_px: f32,
    },
    ImageClicked(String),
    CloseImage,
    /// User clicked the "Upload Image" button
    UploadImage,
    UploadDecoded(Result<DecodedUpload, GalleryError>),
    TextureLoaded(String, Result<Handle, GalleryError>),
    RemoteImagesLoaded(Result<Vec<String>, GalleryError>),
    CommentDraftChanged(String),
    SubmitComment,
    StartEdit(String),
    EditDraftChanged(String),
    SaveEdit,
    CancelEdit,
    DeleteComment(String),
    DismissToast(u64),
}

impl Gallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Config::default()
        });
        let store = SessionStore::new(Config::session_path());
        Self::with_config(config, store)
    }

    /// Build the app from an already loaded config and session store
    fn with_config(config: Config, store: SessionStore) -> (Self, Task<Message>) {
        let http = reqwest::Client::new();
        let api = ApiClient::new(http.clone(), &config.api_base_url);
        let backend = match config.auth_mode {
            AuthMode::Remote => AuthBackend::Remote(api.clone()),
            AuthMode::Mock => AuthBackend::Mock(MockDirectory),
        };
        let gallery = GalleryState::with_images(config.seed_images.iter().cloned());
        let image_count = gallery.images().len();

        tracing::info!(
            images = image_count,
            auth = ?config.auth_mode,
            api = %config.api_base_url,
            "🎨 photo carousel initialized"
        );

        let restore = Task::perform(store.clone().load(), Message::SessionRestored);
        let app = Gallery {
            toasts: Notifications::new(config.toast_duration()),
            scroll: ScrollState::new(paging::page_count(image_count), config.infinite_scroll),
            motions: vec![ImageMotion::default(); image_count],
            config,
            auth: AuthGate::default(),
            backend,
            api,
            http,
            store,
            login: LoginForm::default(),
            gallery,
            panel: CommentPanel::default(),
            camera: Camera::default(),
            textures: TextureCache::default(),
            last_frame: None,
            remote_images_loaded: false,
        };

        (app, restore)
    }

    /// Apply a reducer action and keep the scene in step with the image list
    fn dispatch(&mut self, action: Action) -> bool {
        tracing::debug!(?action, "dispatch");
        let changed = self.gallery.apply(action);
        if changed {
            let count = self.gallery.images().len();
            animator::reconcile(&mut self.motions, count);
            let pages = paging::page_count(count);
            if self.scroll.pages() != pages {
                self.scroll.set_pages(pages);
            }
        }
        changed
    }

    /// Start loading textures for images that have none yet
    fn request_textures(&mut self) -> Task<Message> {
        let pending: Vec<String> = self
            .gallery
            .images()
            .iter()
            .map(|image| image.url.clone())
            .filter(|url| self.textures.request(url))
            .collect();

        Task::batch(pending.into_iter().map(|url| {
            let load = texture::load(url.clone(), self.config.asset_dir.clone(), self.http.clone());
            Task::perform(load, move |result| Message::TextureLoaded(url.clone(), result))
        }))
    }

    /// Work to start once a user is signed in
    fn enter_gallery(&mut self) -> Task<Message> {
        let textures = self.request_textures();
        let remote = match self.auth.session() {
            Some(session) if self.config.load_remote_images && !self.remote_images_loaded => {
                let api = self.api.with_token(session.access_token.clone());
                Task::perform(async move { api.fetch_images().await }, Message::RemoteImagesLoaded)
            }
            _ => Task::none(),
        };
        Task::batch([textures, remote])
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SessionRestored(session) => {
                let restored = session.is_some();
                self.auth.restored(session);
                tracing::info!(authenticated = restored, "session check complete");
                if restored {
                    return self.enter_gallery();
                }
                Task::none()
            }
            Message::EmailChanged(email) => {
                self.login.email = email;
                Task::none()
            }
            Message::PasswordChanged(password) => {
                self.login.password = password;
                Task::none()
            }
            Message::SubmitLogin => {
                let Some(credentials) = self.login.validate() else {
                    return Task::none();
                };
                if !self.auth.begin_login() {
                    return Task::none();
                }
                tracing::info!(email = %credentials.email, "logging in");
                Task::perform(self.backend.clone().login(credentials), Message::LoginFinished)
            }
            Message::LoginFinished(result) => {
                self.auth.finish_login(&result);
                match result {
                    Ok(session) => {
                        tracing::info!(user = %session.user.email, "✅ login successful");
                        self.login.clear();
                        self.toasts.success("Login successful");
                        let save = Task::perform(self.store.clone().save(session), |result| {
                            Message::SessionSaved(result.map(|_| ()))
                        });
                        Task::batch([save, self.enter_gallery()])
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "login failed");
                        self.toasts.error(e.user_message());
                        Task::none()
                    }
                }
            }
            Message::SessionSaved(result) => {
                match result {
                    // Logged out while the write was in flight
                    Ok(()) if !self.auth.is_authenticated() => {
                        if let Err(e) = self.store.clear() {
                            tracing::error!(error = %e, "could not clear persisted session");
                        }
                    }
                    Ok(()) => {}
                    Err(e) => tracing::error!(error = %e, "could not persist session"),
                }
                Task::none()
            }
            Message::Logout => {
                let Some(session) = self.auth.logout() else {
                    return Task::none();
                };
                tracing::info!(user = %session.user.email, "logging out");
                if let Err(e) = self.store.clear() {
                    tracing::error!(error = %e, "could not clear persisted session");
                }
                self.dispatch(Action::CloseImage);
                self.panel.reset();
                self.toasts.success("Logged out");

                Task::perform(self.backend.clone().logout(session.access_token), |()| {
                    Message::BackendLoggedOut
                })
            }
            Message::BackendLoggedOut => {
                tracing::debug!("backend logout finished");
                Task::none()
            }
            Message::Frame(now) => {
                let dt = self
                    .last_frame
                    .map(|last| now.saturating_duration_since(last).as_secs_f32())
                    .unwrap_or(0.0)
                    .min(MAX_FRAME_STEP);
                self.last_frame = Some(now);

                let velocity = self.scroll.advance(dt);
                let floor = self.config.opacity_floor;
                for motion in &mut self.motions {
                    motion.step(velocity, dt, floor);
                }
                self.toasts.prune(now);
                Task::none()
            }
            Message::Scrolled { pixels, viewport_px } => {
                self.scroll.scroll_by(pixels, viewport_px);
                Task::none()
            }
            Message::ImageClicked(url) => {
                if self.dispatch(Action::SelectImage(url)) {
                    self.panel.reset();
                }
                Task::none()
            }
            Message::CloseImage => {
                self.dispatch(Action::CloseImage);
                self.panel.reset();
                Task::none()
            }
            Message::UploadImage => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select an Image to Upload")
                    .add_filter("Images", decode::ACCEPTED_EXTENSIONS)
                    .pick_file();

                match file {
                    Some(path) => {
                        tracing::info!(path = %path.display(), "decoding upload");
                        Task::perform(decode::decode_upload(path), Message::UploadDecoded)
                    }
                    None => Task::none(),
                }
            }
            Message::UploadDecoded(Ok(upload)) => {
                if self.gallery.contains(&upload.url) {
                    tracing::warn!(
                        file = %upload.file_name,
                        "uploaded image is identical to one already in the gallery; selection will alias"
                    );
                }
                self.textures.insert(upload.url.clone(), upload.handle);
                self.dispatch(Action::AddImage(upload.url));
                self.toasts
                    .success(format!("{} file uploaded successfully", upload.file_name));
                Task::none()
            }
            Message::UploadDecoded(Err(e)) => {
                tracing::error!(error = %e, "upload failed");
                self.toasts.error(e.user_message());
                Task::none()
            }
            Message::TextureLoaded(url, result) => {
                self.textures.finish(url, result);
                Task::none()
            }
            Message::RemoteImagesLoaded(Ok(urls)) => {
                self.remote_images_loaded = true;
                let mut added = 0;
                for url in urls {
                    if self.gallery.contains(&url) {
                        continue;
                    }
                    if self.dispatch(Action::AddImage(url)) {
                        added += 1;
                    }
                }
                tracing::info!(added, "merged remote images");
                self.request_textures()
            }
            Message::RemoteImagesLoaded(Err(e)) => {
                tracing::error!(error = %e, "failed to load remote images");
                self.toasts.error(e.user_message());
                Task::none()
            }
            Message::CommentDraftChanged(draft) => {
                self.panel.draft = draft;
                Task::none()
            }
            Message::SubmitComment => {
                let Some(author) = self.auth.session().map(Session::author) else {
                    return Task::none();
                };
                let now = Utc::now();
                let added = self.dispatch(Action::AddComment {
                    text: self.panel.draft.clone(),
                    author,
                    id: comment_id(now),
                    created_at: now,
                });
                if added {
                    self.panel.draft.clear();
                }
                Task::none()
            }
            Message::StartEdit(id) => {
                let Some(author) = self.auth.session().map(Session::author) else {
                    return Task::none();
                };
                if let Some(comment) = self
                    .gallery
                    .selected()
                    .and_then(|image| image.comments.iter().find(|c| c.id == id))
                {
                    self.panel.begin_edit(comment, &author);
                }
                Task::none()
            }
            Message::EditDraftChanged(text) => {
                if let Some(edit) = self.panel.editing.as_mut() {
                    edit.text = text;
                }
                Task::none()
            }
            Message::SaveEdit => {
                let (Some(edit), Some(session)) = (self.panel.editing.clone(), self.auth.session()) else {
                    return Task::none();
                };
                let actor_email = session.user.email.clone();
                if self.dispatch(Action::EditComment {
                    id: edit.id,
                    text: edit.text,
                    actor_email,
                }) {
                    self.panel.editing = None;
                }
                Task::none()
            }
            Message::CancelEdit => {
                self.panel.editing = None;
                Task::none()
            }
            Message::DeleteComment(id) => {
                let Some(actor_email) = self.auth.session().map(|s| s.user.email.clone()) else {
                    return Task::none();
                };
                if self.panel.editing.as_ref().is_some_and(|edit| edit.id == id) {
                    self.panel.editing = None;
                }
                self.dispatch(Action::DeleteComment { id, actor_email });
                Task::none()
            }
            Message::DismissToast(id) => {
                self.toasts.dismiss(id);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        if self.auth.loading() {
            return center(text("Loading...").size(20)).into();
        }

        let Some(session) = self.auth.session() else {
            let hints = self.backend.hints();
            return stack![self.login.view(self.auth.submitting(), &hints), self.toasts.view()].into();
        };

        let carousel = canvas(Carousel {
            images: self.gallery.images(),
            motions: &self.motions,
            textures: &self.textures,
            scroll: &self.scroll,
            camera: self.camera,
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let toolbar = row![
            button("Upload Image").on_press(Message::UploadImage).padding(10),
            horizontal_space(),
            text(&session.user.name).size(16),
            button("Logout").on_press(Message::Logout).padding(10),
        ]
        .spacing(12)
        .padding(10)
        .align_y(iced::Alignment::Center);

        let title = container(text("Please Scroll to View Gallery ➡️").size(20)).center_x(Length::Fill);

        let mut layers = stack![carousel, column![toolbar, title]];

        let progress = self.textures.progress();
        if progress < 100.0 {
            layers = layers.push(center(text(format!("{:.0}% loaded", progress)).size(18)));
        }
        layers = layers.push(self.toasts.view());

        match self.gallery.selected() {
            Some(record) => {
                let author = session.author();
                let panel = self.panel.view(record, self.textures.get(&record.url), &author);
                modal(layers, panel)
            }
            None => layers.into(),
        }
    }

    /// Frame ticks drive the animator and toast expiry
    fn subscription(&self) -> Subscription<Message> {
        if self.auth.is_authenticated() || !self.toasts.items().is_empty() {
            iced::window::frames().map(Message::Frame)
        } else {
            Subscription::none()
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Darken `base` and show `content` on top; clicking outside closes it
fn modal<'a>(base: impl Into<Element<'a, Message>>, content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(
            mouse_area(center(opaque(content)).style(|_theme| container::Style {
                background: Some(
                    Color {
                        a: 0.8,
                        ..Color::BLACK
                    }
                    .into(),
                ),
                ..container::Style::default()
            }))
            .on_press(Message::CloseImage)
        )
    ]
    .into()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> iced::Result {
    initialise_tracing();

    iced::application("Photo Carousel", Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .subscription(Gallery::subscription)
        .centered()
        .run_with(Gallery::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use state::session::User;
    use ui::toast::ToastKind;

    fn temp_store(name: &str) -> SessionStore {
        let dir = std::env::temp_dir().join(format!("photo-carousel-app-{}-{}", name, std::process::id()));
        SessionStore::new(dir.join("session.json"))
    }

    fn config(seed: &[&str]) -> Config {
        Config {
            seed_images: seed.iter().map(|s| s.to_string()).collect(),
            ..Config::default()
        }
    }

    fn session() -> Session {
        Session {
            user: User {
                id: "1".into(),
                name: "Admin".into(),
                email: "admin@example.com".into(),
            },
            access_token: "token".into(),
        }
    }

    fn signed_in(config: Config, store: SessionStore) -> Gallery {
        let (mut app, _) = Gallery::with_config(config, store);
        let _ = app.update(Message::SessionRestored(None));
        let _ = app.update(Message::LoginFinished(Ok(session())));
        app
    }

    fn upload(url: &str) -> DecodedUpload {
        DecodedUpload {
            file_name: "cat.png".into(),
            url: url.into(),
            handle: Handle::from_bytes(vec![0u8; 4]),
        }
    }

    #[test]
    fn upload_appends_one_record_and_grows_the_scene() {
        let mut app = signed_in(config(&["/a.jpeg", "/b.jpeg", "/c.jpeg"]), temp_store("upload-ok"));
        assert_eq!(app.scroll.pages(), 1);

        let url = "data:image/png;base64,AAAA";
        let _ = app.update(Message::UploadDecoded(Ok(upload(url))));

        assert_eq!(app.gallery.images().len(), 4);
        assert_eq!(app.gallery.images()[3].url, url);
        assert!(app.gallery.images()[3].comments.is_empty());
        assert_eq!(app.motions.len(), 4);
        assert_eq!(app.scroll.pages(), 2);
        assert!(app.textures.get(url).is_some());
        assert!(app
            .toasts
            .items()
            .iter()
            .any(|t| t.kind == ToastKind::Success && t.text == "cat.png file uploaded successfully"));
    }

    #[test]
    fn failed_decode_leaves_the_gallery_untouched() {
        let mut app = signed_in(config(&["/a.jpeg", "/b.jpeg"]), temp_store("upload-err"));
        let before = app.gallery.clone();

        let _ = app.update(Message::UploadDecoded(Err(GalleryError::Decode(
            "cat.png is not a readable image".into(),
        ))));

        assert_eq!(app.gallery, before);
        assert_eq!(app.motions.len(), 2);
        assert_eq!(app.scroll.pages(), 1);
        assert!(app
            .toasts
            .items()
            .iter()
            .any(|t| t.kind == ToastKind::Error && t.text == "cat.png is not a readable image"));
    }

    #[tokio::test]
    async fn logout_clears_the_saved_session_while_the_backend_is_silent() {
        // Accepts connections but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let silent = Config {
            auth_mode: AuthMode::Remote,
            api_base_url: format!("http://{}", listener.local_addr().unwrap()),
            ..config(&["/a.jpeg"])
        };
        let store = temp_store("logout-silent");
        store.clone().save(session()).await.unwrap();
        assert!(store.clone().load().await.is_some());

        let (mut app, _) = Gallery::with_config(silent, store.clone());
        let _ = app.update(Message::SessionRestored(Some(session())));
        assert!(app.auth.is_authenticated());

        // The backend call is only scheduled; the file must already be gone
        let _ = app.update(Message::Logout);
        assert!(!app.auth.is_authenticated());
        assert_eq!(store.clone().load().await, None);
        drop(listener);
    }

    #[tokio::test]
    async fn save_finishing_after_logout_is_undone() {
        let store = temp_store("late-save");
        let mut app = signed_in(config(&["/a.jpeg"]), store.clone());
        let _ = app.update(Message::Logout);

        // The login's write lands after the logout
        store.clone().save(session()).await.unwrap();
        let _ = app.update(Message::SessionSaved(Ok(())));
        assert_eq!(store.clone().load().await, None);
    }

    #[test]
    fn logging_in_twice_merges_remote_images_once() {
        let remote = Config {
            load_remote_images: true,
            ..config(&["/a.jpeg", "/b.jpeg"])
        };
        let mut app = signed_in(remote, temp_store("relogin"));
        assert!(!app.remote_images_loaded);

        let listing = vec!["/a.jpeg".to_string(), "https://cdn.example.com/1.jpg".to_string()];
        let _ = app.update(Message::RemoteImagesLoaded(Ok(listing.clone())));
        assert!(app.remote_images_loaded);
        assert_eq!(app.gallery.images().len(), 3);

        let _ = app.update(Message::Logout);
        let _ = app.update(Message::LoginFinished(Ok(session())));
        // A late reply from an earlier fetch must not add copies either
        let _ = app.update(Message::RemoteImagesLoaded(Ok(listing)));

        let urls: Vec<&str> = app.gallery.images().iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["/a.jpeg", "/b.jpeg", "https://cdn.example.com/1.jpg"]);
        assert_eq!(app.motions.len(), 3);
    }
}
