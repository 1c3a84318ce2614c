/// Horizontal scroll controller for the carousel
///
/// Wheel input moves a target offset; each frame the visible offset eases
/// toward it and the distance travelled that frame is returned as the
/// scroll velocity the animator reacts to.
use super::animator::{damp, DAMPING};

/// Pixels per wheel line
pub const WHEEL_LINE_PIXELS: f32 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    pages: usize,
    infinite: bool,
    /// Where the wheel wants to be
    target: f32,
    /// Where the strip is drawn; unwrapped so the velocity stays continuous
    offset: f32,
}

impl ScrollState {
    pub fn new(pages: usize, infinite: bool) -> Self {
        Self {
            pages,
            infinite,
            target: 0.0,
            offset: 0.0,
        }
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Called whenever the image list changes
    pub fn set_pages(&mut self, pages: usize) {
        self.pages = pages;
        if !self.infinite {
            self.target = self.target.clamp(0.0, 1.0);
            self.offset = self.offset.clamp(0.0, 1.0);
        }
    }

    /// Apply wheel movement of `pixels` over a viewport `viewport_px` wide
    pub fn scroll_by(&mut self, pixels: f32, viewport_px: f32) {
        if self.pages == 0 || viewport_px <= 0.0 || !pixels.is_finite() {
            return;
        }
        self.target += pixels / (viewport_px * self.pages as f32);
        if !self.infinite {
            self.target = self.target.clamp(0.0, 1.0);
        }
    }

    /// Advance one frame and return the distance travelled
    pub fn advance(&mut self, dt: f32) -> f32 {
        let previous = self.offset;
        self.offset = damp(self.offset, self.target, DAMPING, dt.max(0.0));
        let delta = (self.offset - previous).abs();

        if self.infinite {
            let whole = self.offset.floor();
            self.offset -= whole;
            self.target -= whole;
        }
        delta
    }

    /// Visible offset in `[0, 1]`
    pub fn offset(&self) -> f32 {
        if self.infinite {
            self.offset.rem_euclid(1.0)
        } else {
            self.offset.clamp(0.0, 1.0)
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.infinite
    }

    /// World-space x displacement of the strip
    pub fn shift(&self, strip_length: f32, viewport_width: f32) -> f32 {
        if self.infinite {
            -self.offset() * strip_length
        } else {
            -self.offset() * (strip_length - viewport_width).max(0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_input_means_no_velocity() {
        let mut scroll = ScrollState::new(5, true);
        for _ in 0..10 {
            assert_eq!(scroll.advance(1.0 / 60.0), 0.0);
        }
    }

    #[test]
    fn velocity_spikes_then_decays() {
        let mut scroll = ScrollState::new(5, false);
        scroll.scroll_by(400.0, 800.0);

        let first = scroll.advance(1.0 / 60.0);
        assert!(first > 0.0);
        let mut last = first;
        for _ in 0..300 {
            let delta = scroll.advance(1.0 / 60.0);
            assert!(delta >= 0.0);
            assert!(delta <= last + 1e-7);
            last = delta;
        }
        assert!(last < 1e-5);
        assert!((scroll.offset() - 0.1).abs() < 1e-3);
    }

    #[test]
    fn bounded_scroll_clamps_to_the_ends() {
        let mut scroll = ScrollState::new(2, false);
        scroll.scroll_by(-500.0, 100.0);
        for _ in 0..200 {
            scroll.advance(1.0 / 60.0);
        }
        assert_eq!(scroll.offset(), 0.0);

        scroll.scroll_by(10_000.0, 100.0);
        for _ in 0..400 {
            scroll.advance(1.0 / 60.0);
        }
        assert!((scroll.offset() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn infinite_scroll_wraps_without_a_velocity_jump() {
        let mut scroll = ScrollState::new(1, true);
        scroll.scroll_by(-50.0, 100.0);
        let mut max_delta: f32 = 0.0;
        for _ in 0..400 {
            max_delta = max_delta.max(scroll.advance(1.0 / 60.0));
            assert!((0.0..1.0).contains(&scroll.offset()));
        }
        assert!(max_delta < 0.5);
        assert!((scroll.offset() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn empty_gallery_ignores_the_wheel() {
        let mut scroll = ScrollState::new(0, true);
        scroll.scroll_by(300.0, 800.0);
        assert_eq!(scroll.advance(0.016), 0.0);
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn shift_spans_the_strip() {
        let mut scroll = ScrollState::new(3, false);
        scroll.scroll_by(10_000.0, 100.0);
        for _ in 0..600 {
            scroll.advance(1.0 / 60.0);
        }
        // Three pages of width 12, the last page ends aligned with the viewport
        assert!((scroll.shift(36.0, 12.0) + 24.0).abs() < 1e-2);
    }
}
