use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::media::texture::TextureCache;
use crate::scene::animator::ImageMotion;
use crate::scene::camera::Camera;
use crate::scene::paging::PageLayout;
use crate::scene::scroll::{ScrollState, WHEEL_LINE_PIXELS};
use crate::scene::{self, Placement};
use crate::state::data::ImageRecord;
use crate::Message;

/// Pointer travel below which a press-release counts as a click
const CLICK_SLOP: f32 = 6.0;

/// The 3D carousel drawn on a canvas
///
/// Wheel and drag input become scroll messages; a click on an image opens
/// its comment view.
pub struct Carousel<'a> {
    pub images: &'a [ImageRecord],
    pub motions: &'a [ImageMotion],
    pub textures: &'a TextureCache,
    pub scroll: &'a ScrollState,
    pub camera: Camera,
}

impl Carousel<'_> {
    /// Projected images, back to front, culled to the canvas
    fn visible(&self, size: Size) -> Vec<(Placement, Rectangle)> {
        let viewport_width = self.camera.viewport_width(size);
        let layout = PageLayout::compute(self.images.len(), viewport_width);
        let shift = self.scroll.shift(layout.strip_length(), viewport_width);
        let screen = Rectangle::new(Point::ORIGIN, size);

        scene::placements(&layout, shift, self.scroll.is_infinite(), self.motions)
            .into_iter()
            .filter_map(|placement| {
                let rect = self.camera.project_plane(placement.center, placement.scale, size)?;
                rect.intersects(&screen).then_some((placement, rect))
            })
            .collect()
    }

    /// Front-most image under `position`
    fn hit(&self, size: Size, position: Point) -> Option<&ImageRecord> {
        self.visible(size)
            .into_iter()
            .rev()
            .find(|(_, rect)| rect.contains(position))
            .and_then(|(placement, _)| self.images.get(placement.index))
    }
}

impl Program<Message> for Carousel<'_> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        for (placement, rect) in self.visible(bounds.size()) {
            let Some(record) = self.images.get(placement.index) else {
                continue;
            };
            match self.textures.get(&record.url) {
                Some(handle) => {
                    frame.draw_image(rect, canvas::Image::new(handle.clone()).opacity(placement.opacity));
                }
                None => {
                    frame.fill_rectangle(
                        rect.position(),
                        rect.size(),
                        Color::from_rgba(0.5, 0.5, 0.5, 0.25 * placement.opacity),
                    );
                }
            }
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Vertical wheels scroll the strip sideways too
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let pixels = match delta {
                    mouse::ScrollDelta::Lines { x, y } => (x - y) * WHEEL_LINE_PIXELS,
                    mouse::ScrollDelta::Pixels { x, y } => x - y,
                };
                return (
                    canvas::event::Status::Captured,
                    Some(Message::Scrolled {
                        pixels,
                        viewport_px: bounds.width,
                    }),
                );
            }

            // Mouse button press - start dragging
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.last_position = Some(position);
                    state.travelled = 0.0;
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - a short press is a click
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let was_pressed = state.last_position.take().is_some();
                if was_pressed && state.travelled < CLICK_SLOP {
                    let clicked = cursor
                        .position_in(bounds)
                        .and_then(|position| self.hit(bounds.size(), position))
                        .map(|record| Message::ImageClicked(record.url.clone()));
                    return (canvas::event::Status::Captured, clicked);
                }
                if was_pressed {
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse move - scroll if dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let (Some(last), Some(current)) = (state.last_position, cursor.position_in(bounds)) {
                    let dx = current.x - last.x;
                    state.travelled += dx.abs() + (current.y - last.y).abs();
                    state.last_position = Some(current);
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::Scrolled {
                            pixels: -dx,
                            viewport_px: bounds.width,
                        }),
                    );
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(&self, state: &Self::State, bounds: Rectangle, cursor: Cursor) -> mouse::Interaction {
        if state.last_position.is_some() {
            return mouse::Interaction::Grabbing;
        }
        match cursor.position_in(bounds) {
            Some(position) if self.hit(bounds.size(), position).is_some() => mouse::Interaction::Pointer,
            _ => mouse::Interaction::default(),
        }
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub last_position: Option<Point>,
    /// Pointer distance since the press, to tell clicks from drags
    pub travelled: f32,
}
