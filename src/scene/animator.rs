/// Per-frame depth and opacity animation
///
/// Every frame each image eases toward targets derived from the scroll
/// velocity: fast scrolling pushes images toward the camera and fades them.
/// Easing is exponential in elapsed time so it looks the same at any frame rate.

/// Smoothing rate shared by all animated properties
pub const DAMPING: f32 = 4.0;

/// Depth gained per unit of scroll velocity
const DEPTH_GAIN: f32 = 50.0;

/// Opacity lost per unit of scroll velocity
const FADE_GAIN: f32 = 1000.0;

/// Move `current` toward `target`; `dt` in seconds
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-lambda * dt).exp())
}

pub fn target_depth(velocity: f32) -> f32 {
    (velocity * DEPTH_GAIN).max(0.0)
}

/// Never above 1 for non-negative velocity, never below `floor`
pub fn target_opacity(velocity: f32, floor: f32) -> f32 {
    (1.0 - velocity * FADE_GAIN).max(floor)
}

/// Animated properties of one image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageMotion {
    /// Extra z added to the image's group
    pub depth: f32,
    pub opacity: f32,
}

impl Default for ImageMotion {
    fn default() -> Self {
        Self {
            depth: 0.0,
            opacity: 1.0,
        }
    }
}

impl ImageMotion {
    /// Advance one frame. Negative velocity is treated as zero.
    pub fn step(&mut self, velocity: f32, dt: f32, floor: f32) {
        let velocity = velocity.max(0.0);
        let dt = dt.max(0.0);
        self.depth = damp(self.depth, target_depth(velocity), DAMPING, dt);
        self.opacity = damp(self.opacity, target_opacity(velocity, floor), DAMPING, dt).clamp(floor, 1.0);
    }
}

/// Keep one motion entry per image; new images start at rest
pub fn reconcile(motions: &mut Vec<ImageMotion>, image_count: usize) {
    motions.resize(image_count, ImageMotion::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damp_is_frame_rate_independent() {
        let one_step = damp(0.0, 1.0, DAMPING, 0.1);
        let mut two_steps = damp(0.0, 1.0, DAMPING, 0.05);
        two_steps = damp(two_steps, 1.0, DAMPING, 0.05);
        assert!((one_step - two_steps).abs() < 1e-6);
    }

    #[test]
    fn zero_elapsed_time_changes_nothing() {
        assert_eq!(damp(0.3, 1.0, DAMPING, 0.0), 0.3);
    }

    #[test]
    fn targets_follow_velocity() {
        assert_eq!(target_depth(0.0), 0.0);
        assert!((target_depth(0.01) - 0.5).abs() < 1e-5);
        assert_eq!(target_opacity(0.0, 0.8), 1.0);
        assert!((target_opacity(0.0001, 0.2) - 0.9).abs() < 1e-5);
        assert_eq!(target_opacity(0.5, 0.2), 0.2);
    }

    #[test]
    fn opacity_stays_within_floor_and_one() {
        for floor in [0.2, 0.5, 0.8] {
            let mut motion = ImageMotion::default();
            for (i, velocity) in [0.0, 0.0001, 0.01, 3.0, 0.0, 0.002].iter().cycle().take(120).enumerate() {
                let dt = if i % 7 == 0 { 0.1 } else { 1.0 / 60.0 };
                motion.step(*velocity, dt, floor);
                assert!(motion.opacity >= floor && motion.opacity <= 1.0, "opacity {} floor {}", motion.opacity, floor);
                assert!(motion.depth >= 0.0);
            }
        }
    }

    #[test]
    fn converges_monotonically_under_constant_velocity() {
        let mut motion = ImageMotion::default();
        let velocity = 0.0005;
        let target = target_opacity(velocity, 0.2);
        let mut previous_gap = (motion.opacity - target).abs();
        let mut previous_depth = motion.depth;
        for _ in 0..200 {
            motion.step(velocity, 1.0 / 60.0, 0.2);
            let gap = (motion.opacity - target).abs();
            assert!(gap <= previous_gap);
            assert!(motion.depth >= previous_depth);
            previous_gap = gap;
            previous_depth = motion.depth;
        }
        assert!(previous_gap < 1e-3);
        assert!((motion.depth - target_depth(velocity)).abs() < 1e-3);
    }

    #[test]
    fn reconcile_matches_image_count() {
        let mut motions = vec![ImageMotion {
            depth: 0.4,
            opacity: 0.9,
        }];
        reconcile(&mut motions, 3);
        assert_eq!(motions.len(), 3);
        assert_eq!(motions[0].depth, 0.4);
        assert_eq!(motions[2], ImageMotion::default());
    }
}
