/// Perspective camera for the carousel
///
/// The camera looks down -z from `distance` units in front of the origin.
/// The visible width at z = 0 is the "viewport width" the paging layout is
/// measured in.
use cgmath::{perspective, Deg, Matrix4, Point3, Vector2, Vector3};
use iced::{Rectangle, Size};

const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view
    pub fov: Deg<f32>,
    pub distance: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: Deg(75.0),
            distance: 5.0,
        }
    }
}

impl Camera {
    /// Visible height at z = 0 in world units
    pub fn viewport_height(&self) -> f32 {
        let half = self.fov.0.to_radians() / 2.0;
        2.0 * half.tan() * self.distance
    }

    /// Visible width at z = 0 for a screen of the given size
    pub fn viewport_width(&self, screen: Size) -> f32 {
        if screen.height <= 0.0 {
            return 0.0;
        }
        self.viewport_height() * (screen.width / screen.height)
    }

    fn view_projection(&self, aspect: f32) -> Matrix4<f32> {
        let projection = perspective(self.fov, aspect, NEAR, FAR);
        let view = Matrix4::from_translation(Vector3::new(0.0, 0.0, -self.distance));
        projection * view
    }

    fn to_screen(&self, matrix: &Matrix4<f32>, point: Point3<f32>, screen: Size) -> Option<iced::Point> {
        let clip = *matrix * point.to_homogeneous();
        if clip.w <= NEAR {
            return None;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        Some(iced::Point::new(
            (ndc_x + 1.0) / 2.0 * screen.width,
            (1.0 - ndc_y) / 2.0 * screen.height,
        ))
    }

    /// Screen rectangle covered by a camera-facing plane, or `None` if it is
    /// behind the camera
    pub fn project_plane(&self, center: Point3<f32>, scale: Vector2<f32>, screen: Size) -> Option<Rectangle> {
        if screen.width <= 0.0 || screen.height <= 0.0 {
            return None;
        }
        let matrix = self.view_projection(screen.width / screen.height);
        let top_left = self.to_screen(
            &matrix,
            Point3::new(center.x - scale.x / 2.0, center.y + scale.y / 2.0, center.z),
            screen,
        )?;
        let bottom_right = self.to_screen(
            &matrix,
            Point3::new(center.x + scale.x / 2.0, center.y - scale.y / 2.0, center.z),
            screen,
        )?;
        Some(Rectangle::new(
            top_left,
            Size::new(bottom_right.x - top_left.x, bottom_right.y - top_left.y),
        ))
    }
}
