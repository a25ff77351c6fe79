//! The ball and its velocity envelope

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Component limits derived from the ball speed.
///
/// Each `*_at_*` value is the orthogonal component that keeps the speed
/// exact when the named component sits at its limit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallBounds {
    pub speed: f32,
    pub max_vx: f32,
    pub max_vy: f32,
    pub min_vx: f32,
    pub min_vy: f32,
    pub vy_at_max_vx: f32,
    pub vx_at_max_vy: f32,
    pub vy_at_min_vx: f32,
    pub vx_at_min_vy: f32,
}

impl BallBounds {
    pub fn from_speed(speed: f32, max_ratio: f32, min_ratio: f32) -> Self {
        let max = speed * max_ratio;
        let min = speed * min_ratio;
        let other = |c: f32| (speed * speed - c * c).max(0.0).sqrt();
        Self {
            speed,
            max_vx: max,
            max_vy: max,
            min_vx: min,
            min_vy: min,
            vy_at_max_vx: other(max),
            vx_at_max_vy: other(max),
            vy_at_min_vx: other(min),
            vx_at_min_vy: other(min),
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::from_speed(
            tuning.ball_speed,
            tuning.max_component_ratio,
            tuning.min_component_ratio,
        )
    }

    /// Component orthogonal to `c` that keeps |v| at the ball speed
    pub fn orthogonal(&self, c: f32) -> f32 {
        (self.speed * self.speed - c * c).max(0.0).sqrt()
    }
}

/// The ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub bounds: BallBounds,
    /// Velocity captured just before the step that produced the current contact
    pub pre_contact_vel: Vec2,
}

impl Ball {
    pub fn new(tuning: &Tuning, pos: Vec2) -> Self {
        let vel = tuning.serve_velocity();
        Self {
            pos,
            vel,
            radius: tuning.ball_radius,
            bounds: BallBounds::from_tuning(tuning),
            pre_contact_vel: vel,
        }
    }

    pub fn speed(&self) -> f32 {
        self.bounds.speed
    }

    /// Rescale the velocity back onto the speed circle.
    ///
    /// Solver round-off drifts the magnitude a little every bounce; the
    /// direction is kept. A zero velocity is left alone.
    pub fn renormalize(&mut self) -> bool {
        let len = self.vel.length();
        if len <= f32::EPSILON || (len - self.bounds.speed).abs() < 1e-4 {
            return false;
        }
        self.vel *= self.bounds.speed / len;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_for_classic_speed() {
        let b = BallBounds::from_speed(4.0, 0.97, 0.15);
        assert!((b.max_vx - 3.88).abs() < 1e-5);
        assert!((b.min_vy - 0.6).abs() < 1e-5);
        assert!((b.max_vx.powi(2) + b.vy_at_max_vx.powi(2) - 16.0).abs() < 1e-4);
        assert!((b.min_vx.powi(2) + b.vy_at_min_vx.powi(2) - 16.0).abs() < 1e-4);
    }

    #[test]
    fn test_renormalize_restores_speed() {
        let mut ball = Ball::new(&Tuning::default(), Vec2::ZERO);
        ball.vel = Vec2::new(3.0, 3.0);
        assert!(ball.renormalize());
        assert!((ball.vel.length() - 4.0).abs() < 1e-5);
        assert!((ball.vel.x - ball.vel.y).abs() < 1e-6);
    }

    #[test]
    fn test_renormalize_ignores_zero() {
        let mut ball = Ball::new(&Tuning::default(), Vec2::ZERO);
        ball.vel = Vec2::ZERO;
        assert!(!ball.renormalize());
        assert_eq!(ball.vel, Vec2::ZERO);
    }
}
