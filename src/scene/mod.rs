/// The 3D carousel scene
///
/// - `paging.rs` - groups images into pages and positions them in 3D
/// - `animator.rs` - per-frame depth/opacity easing driven by scroll velocity
/// - `scroll.rs` - the damped horizontal scroll controller
/// - `camera.rs` - perspective projection onto the canvas
///
/// Nothing here touches the UI toolkit beyond its geometry types, so it is
/// all plain functions over plain data.

pub mod animator;
pub mod camera;
pub mod paging;
pub mod scroll;

use cgmath::{Point3, Vector2};

use animator::ImageMotion;
use paging::PageLayout;

/// One image ready to be projected: final position after scroll and animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub center: Point3<f32>,
    pub scale: Vector2<f32>,
    pub opacity: f32,
}

/// Combine layout, scroll shift and motion into drawable placements,
/// sorted back to front.
///
/// With infinite scrolling the strip is repeated once so the wrap is seamless.
pub fn placements(layout: &PageLayout, shift: f32, repeat: bool, motions: &[ImageMotion]) -> Vec<Placement> {
    let copies: &[f32] = if repeat && layout.strip_length() > 0.0 {
        &[0.0, 1.0]
    } else {
        &[0.0]
    };

    let mut placed: Vec<Placement> = copies
        .iter()
        .flat_map(|copy| {
            let dx = shift + copy * layout.strip_length();
            layout.slots().map(move |slot| {
                let motion = motions.get(slot.index).copied().unwrap_or_default();
                Placement {
                    index: slot.index,
                    center: Point3::new(slot.position.x + dx, slot.position.y, slot.position.z + motion.depth),
                    scale: slot.scale,
                    opacity: motion.opacity,
                }
            })
        })
        .collect();

    placed.sort_by(|a, b| a.center.z.total_cmp(&b.center.z));
    placed
}
