//! Paddle bounce steering
//!
//! Where the ball lands on the paddle top decides how it leaves. Centre hits
//! bounce normally; the further off-centre, the more one velocity component is
//! stretched, with the other recomputed so the speed never changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::BallBounds;
use crate::clamp_lenient;
use crate::tuning::Tuning;

/// Steering shape parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteeringParams {
    /// Neutral zone as a fraction of the paddle's half width
    pub dead_zone: f32,
    /// Extra absolute margin before steering starts
    pub margin: f32,
    /// Scale applied at the paddle edge is `1 + multiplier`
    pub multiplier: f32,
}

impl SteeringParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            dead_zone: tuning.steering_dead_zone,
            margin: tuning.steering_margin,
            multiplier: tuning.steering_multiplier,
        }
    }
}

/// Geometry of a ball landing on the paddle top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleHit {
    pub ball_x: f32,
    pub paddle_x: f32,
    /// Half of the paddle's total width, flippers included
    pub half_width: f32,
}

/// Steer the outgoing velocity of a paddle-top bounce.
///
/// `pre` is the incoming velocity; its horizontal sign gives the direction of
/// travel and its component magnitudes are what gets scaled. The result always
/// leaves upward. Centre hits return `resolved` unchanged.
pub fn steer_bounce(
    resolved: Vec2,
    pre: Vec2,
    hit: PaddleHit,
    bounds: &BallBounds,
    params: &SteeringParams,
) -> Vec2 {
    let d = hit.ball_x - hit.paddle_x;
    let threshold = hit.half_width * params.dead_zone;
    if d.abs() <= threshold + params.margin || hit.half_width <= threshold {
        return resolved;
    }

    let ratio = ((d.abs() - threshold) / (hit.half_width - threshold)).clamp(0.0, 1.0);
    let scale = 1.0 + params.multiplier * ratio;

    let moving_right = pre.x > 0.0;
    let hit_right = d > 0.0;

    match (moving_right, hit_right) {
        // Hit on the side the ball is heading to: flatten it
        (true, true) => {
            let vx = clamp_lenient(pre.x.abs() * scale, bounds.min_vx, bounds.max_vx);
            Vec2::new(vx, bounds.orthogonal(vx))
        }
        (false, false) => {
            let vx = -clamp_lenient(pre.x.abs() * scale, bounds.min_vx, bounds.max_vx);
            Vec2::new(vx, bounds.orthogonal(vx))
        }
        // Hit on the trailing side: steepen it
        (true, false) => {
            let vy = clamp_lenient(pre.y.abs() * scale, bounds.min_vy, bounds.max_vy);
            Vec2::new(bounds.orthogonal(vy), vy)
        }
        (false, true) => {
            let vy = clamp_lenient(pre.y.abs() * scale, bounds.min_vy, bounds.max_vy);
            Vec2::new(-bounds.orthogonal(vy), vy)
        }
    }
}
