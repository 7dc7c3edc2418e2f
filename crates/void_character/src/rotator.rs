//! Smooth yaw turning for character bodies

use std::f32::consts::{PI, TAU};

/// Differences smaller than this snap straight to the target
pub const YAW_EPSILON: f32 = 1e-4;

/// Wrap an angle into `[-PI, PI)`
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Interpolate between two angles along the shortest arc
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    wrap_angle(from + wrap_angle(to - from) * t)
}

/// Turns a body's yaw toward a target, instantly or gradually.
///
/// When neither instant nor gradual turning is enabled, [`update`](Self::update)
/// leaves the yaw where it is.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyRotator {
    yaw: f32,
    target_yaw: f32,
    /// Interpolation weight per second for gradual turns
    pub speed: f32,
    pub turns_instantly: bool,
    pub gradual_turn_enabled: bool,
}

impl BodyRotator {
    pub fn new(speed: f32) -> Self {
        Self {
            yaw: 0.0,
            target_yaw: 0.0,
            speed,
            turns_instantly: false,
            gradual_turn_enabled: true,
        }
    }

    /// Re-home on a body facing `yaw`, dropping any turn in progress
    pub fn reset(&mut self, yaw: f32) {
        self.yaw = wrap_angle(yaw);
        self.target_yaw = self.yaw;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn target_yaw(&self) -> f32 {
        self.target_yaw
    }

    pub fn set_target(&mut self, yaw: f32) {
        self.target_yaw = wrap_angle(yaw);
    }

    /// Whether the yaw still differs from the target
    pub fn is_turning(&self) -> bool {
        wrap_angle(self.target_yaw - self.yaw).abs() >= YAW_EPSILON
    }

    /// Advance the turn by `dt` seconds and return the new yaw
    pub fn update(&mut self, dt: f32) -> f32 {
        if self.turns_instantly || !self.is_turning() {
            self.yaw = self.target_yaw;
        } else if self.gradual_turn_enabled {
            let weight = (self.speed * dt).clamp(0.0, 1.0);
            self.yaw = lerp_angle(self.yaw, self.target_yaw, weight);
        }
        self.yaw
    }
}

impl Default for BodyRotator {
    fn default() -> Self {
        Self::new(12.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_angle() {
        assert_abs_diff_eq!(wrap_angle(0.0), 0.0);
        assert_abs_diff_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-5);
        assert_abs_diff_eq!(wrap_angle(-PI - 0.5), PI - 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_lerp_takes_short_arc() {
        // From just below +PI to just above -PI crosses the seam, not zero
        let from = PI - 0.1;
        let to = -PI + 0.1;
        let mid = lerp_angle(from, to, 0.5);
        assert!(mid.abs() > PI - 0.01, "expected to cross the seam, got {mid}");
    }

    #[test]
    fn test_instant_turn() {
        let mut rotator = BodyRotator::new(1.0);
        rotator.turns_instantly = true;
        rotator.set_target(1.2);
        assert_abs_diff_eq!(rotator.update(0.016), 1.2, epsilon = 1e-5);
        assert!(!rotator.is_turning());
    }

    #[test]
    fn test_gradual_turn_converges() {
        let mut rotator = BodyRotator::new(10.0);
        rotator.set_target(1.0);

        let first = rotator.update(1.0 / 60.0);
        assert!(first > 0.0 && first < 1.0);

        for _ in 0..300 {
            rotator.update(1.0 / 60.0);
        }
        assert_abs_diff_eq!(rotator.yaw(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_large_step_does_not_overshoot() {
        let mut rotator = BodyRotator::new(10.0);
        rotator.set_target(-0.8);
        assert_abs_diff_eq!(rotator.update(1.0), -0.8, epsilon = 1e-5);
    }

    #[test]
    fn test_disabled_gradual_turn_holds() {
        let mut rotator = BodyRotator::new(10.0);
        rotator.gradual_turn_enabled = false;
        rotator.set_target(1.0);
        assert_eq!(rotator.update(1.0 / 60.0), 0.0);
        assert!(rotator.is_turning());
    }

    #[test]
    fn test_negligible_difference_snaps_even_when_disabled() {
        let mut rotator = BodyRotator::new(10.0);
        rotator.gradual_turn_enabled = false;
        rotator.set_target(YAW_EPSILON * 0.5);
        assert_abs_diff_eq!(rotator.update(1.0 / 60.0), YAW_EPSILON * 0.5, epsilon = 1e-6);
    }
}
