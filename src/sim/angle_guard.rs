//! Degenerate-angle correction for the ball
//!
//! The solver occasionally hands back a velocity that is nearly horizontal or
//! exactly vertical. Either one can trap the ball in an endless loop, so after
//! every ball contact the resolved velocity is pulled back inside the bounds.

use glam::Vec2;

use super::ball::BallBounds;

/// Correct a resolved ball velocity.
///
/// `resolved` is the velocity after the contact was solved, `pre` the velocity
/// just before. The sign of the corrected vertical component comes from `pre`,
/// because the resolved velocity alone can't tell which way the ball was going.
/// Returns `resolved` unchanged when it is already acceptable.
pub fn guard_angle(resolved: Vec2, pre: Vec2, bounds: &BallBounds) -> Vec2 {
    let (vx, vy) = (resolved.x, resolved.y);
    let (pvx, pvy) = (pre.x, pre.y);

    if vx >= bounds.max_vx {
        let down = if pvx > 0.0 {
            // Kept moving right: leave on the opposite vertical side
            pvy >= 0.0
        } else {
            pvy <= 0.0
        };
        return Vec2::new(bounds.max_vx, signed(bounds.vy_at_max_vx, down));
    }

    if vx <= -bounds.max_vx {
        let down = if pvx < 0.0 { pvy >= 0.0 } else { pvy <= 0.0 };
        return Vec2::new(-bounds.max_vx, signed(bounds.vy_at_max_vx, down));
    }

    if vx == 0.0 {
        let nudged_vx = if pvx > 0.0 {
            -bounds.min_vx
        } else {
            bounds.min_vx
        };
        let down = if pvx == 0.0 { vy < 0.0 } else { pvy <= 0.0 };
        return Vec2::new(nudged_vx, signed(bounds.vy_at_min_vx, down));
    }

    resolved
}

#[inline]
fn signed(magnitude: f32, down: bool) -> f32 {
    if down { -magnitude } else { magnitude }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds() -> BallBounds {
        BallBounds::from_speed(4.0, 0.97, 0.15)
    }

    #[test]
    fn test_too_horizontal_right_after_moving_right_up() {
        let b = bounds();
        let out = guard_angle(Vec2::new(3.99, 0.1), Vec2::new(3.95, 0.56), &b);
        assert_eq!(out.x, b.max_vx);
        assert!((out.y + (16.0f32 - 3.88 * 3.88).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn test_too_horizontal_right_after_moving_left() {
        let b = bounds();
        let down = guard_angle(Vec2::new(3.99, 0.0), Vec2::new(-3.9, -0.8), &b);
        assert_eq!(down.x, b.max_vx);
        assert!(down.y < 0.0);

        // pvy == 0 keeps the downward bias
        let level = guard_angle(Vec2::new(3.99, 0.0), Vec2::new(-3.9, 0.0), &b);
        assert!(level.y < 0.0);

        let up = guard_angle(Vec2::new(3.99, 0.0), Vec2::new(-3.9, 0.8), &b);
        assert!(up.y > 0.0);
    }

    #[test]
    fn test_too_horizontal_left_mirrors() {
        let b = bounds();
        let kept = guard_angle(Vec2::new(-3.99, 0.0), Vec2::new(-3.95, 0.56), &b);
        assert_eq!(kept.x, -b.max_vx);
        assert!(kept.y < 0.0);

        let reversed = guard_angle(Vec2::new(-3.99, 0.0), Vec2::new(3.95, 0.56), &b);
        assert_eq!(reversed.x, -b.max_vx);
        assert!(reversed.y > 0.0);
    }

    #[test]
    fn test_vertical_gets_nudged_against_incoming_direction() {
        let b = bounds();
        let out = guard_angle(Vec2::new(0.0, 4.0), Vec2::new(0.5, 3.9), &b);
        assert_eq!(out.x, -b.min_vx);
        assert!(out.y > 0.0);

        let out = guard_angle(Vec2::new(0.0, -4.0), Vec2::new(-0.5, -3.9), &b);
        assert_eq!(out.x, b.min_vx);
        assert!(out.y < 0.0);
    }

    #[test]
    fn test_vertical_without_incoming_x_keeps_travel_direction() {
        let b = bounds();
        let out = guard_angle(Vec2::new(0.0, -4.0), Vec2::new(0.0, 4.0), &b);
        assert_eq!(out.x, b.min_vx);
        assert!(out.y < 0.0);
    }

    #[test]
    fn test_acceptable_velocity_untouched() {
        let b = bounds();
        let v = Vec2::new(2.0, 12.0f32.sqrt());
        assert_eq!(guard_angle(v, Vec2::new(2.0, -12.0f32.sqrt()), &b), v);
    }

    proptest! {
        #[test]
        fn test_guard_preserves_speed(angle in 0.0f32..std::f32::consts::TAU, pre_angle in 0.0f32..std::f32::consts::TAU) {
            let b = bounds();
            let v = Vec2::from_angle(angle) * b.speed;
            let pre = Vec2::from_angle(pre_angle) * b.speed;
            let out = guard_angle(v, pre, &b);
            prop_assert!((out.length() - b.speed).abs() < 1e-3);
        }

        #[test]
        fn test_guard_clamps_horizontal_exactly(vx in 3.88f32..4.5, vy in -1.0f32..1.0, pvx in -4.0f32..4.0, pvy in -4.0f32..4.0) {
            let b = bounds();
            let out = guard_angle(Vec2::new(vx.max(b.max_vx), vy), Vec2::new(pvx, pvy), &b);
            prop_assert_eq!(out.x, b.max_vx);
            let expect_down = if pvx > 0.0 { pvy >= 0.0 } else { pvy <= 0.0 };
            prop_assert_eq!(out.y < 0.0, expect_down);
        }
    }
}
