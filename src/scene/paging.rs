/// Paging layout for the carousel
///
/// The flat image list is split into pages of three. Page `p` sits at
/// `p × width` along x; inside a page the slots are spread around the page
/// centre and stepped in depth so the middle image is at z = 0.
use cgmath::{Vector2, Vector3};

/// Images per page
pub const PAGE_SIZE: usize = 3;

/// Gap kept on each side of an image plane (world units)
pub const IMAGE_MARGIN: f32 = 0.4;

/// Height of every image plane (world units)
pub const IMAGE_HEIGHT: f32 = 5.0;

/// Below this viewport width the images are spaced further apart
pub const NARROW_VIEWPORT: f32 = 10.0;

/// Number of pages needed for `count` images
pub fn page_count(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Split items into pages, preserving order
pub fn paginate<T>(items: &[T]) -> Vec<&[T]> {
    items.chunks(PAGE_SIZE).collect()
}

/// Fraction of the viewport width between neighbouring slots
pub fn spacing_fraction(viewport_width: f32) -> f32 {
    if viewport_width < NARROW_VIEWPORT {
        1.5 / 3.0
    } else {
        1.0 / 3.0
    }
}

/// Where one image sits in the scene, before scrolling and animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Index into the flat image list
    pub index: usize,
    pub page: usize,
    /// Position inside the page (0..3)
    pub slot: usize,
    /// Centre of the plane in world space
    pub position: Vector3<f32>,
    /// Width and height of the plane
    pub scale: Vector2<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    /// x of the page centre
    pub offset: f32,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub viewport_width: f32,
    pub pages: Vec<Page>,
}

impl PageLayout {
    /// Lay out `count` images for a viewport `viewport_width` units wide
    pub fn compute(count: usize, viewport_width: f32) -> Self {
        let w = spacing_fraction(viewport_width);
        let plane_width = (viewport_width * w - IMAGE_MARGIN * 2.0).max(0.0);

        let indices: Vec<usize> = (0..count).collect();
        let pages = paginate(&indices)
            .into_iter()
            .enumerate()
            .map(|(page, chunk)| {
                let offset = viewport_width * page as f32;
                let slots = chunk
                    .iter()
                    .enumerate()
                    .map(|(slot, &index)| {
                        let shift = slot as f32 - 1.0;
                        Slot {
                            index,
                            page,
                            slot,
                            position: Vector3::new(offset + shift * viewport_width * w, 0.0, shift),
                            scale: Vector2::new(plane_width, IMAGE_HEIGHT),
                        }
                    })
                    .collect();
                Page {
                    index: page,
                    offset,
                    slots,
                }
            })
            .collect();

        Self {
            viewport_width,
            pages,
        }
    }

    /// Length of the whole strip along x
    pub fn strip_length(&self) -> f32 {
        self.viewport_width * self.pages.len() as f32
    }

    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.pages.iter().flat_map(|page| page.slots.iter())
    }
}
