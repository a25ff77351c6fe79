//! Data-driven game balance
//!
//! Every gameplay number that shapes feel lives here so it can be tweaked
//! from a JSON file without recompiling. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SCENE_HEIGHT, SCENE_WIDTH};
use crate::settings::ConfigError;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ball ===
    /// Constant ball speed (world units per second)
    pub ball_speed: f32,
    /// Largest allowed |vx| or |vy| as a fraction of ball speed
    pub max_component_ratio: f32,
    /// Smallest allowed |vx| or |vy| as a fraction of ball speed
    pub min_component_ratio: f32,
    pub ball_radius: f32,
    /// Horizontal part of the serve velocity; vertical part is derived (downward)
    pub serve_vx: f32,

    // === Paddle ===
    /// Horizontal paddle speed when chasing its target
    pub paddle_speed: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Height of the paddle centre above the scene floor
    pub paddle_elevation: f32,
    /// Flipper size relative to the paddle body
    pub flipper_scale: f32,
    /// Flipper swing range in degrees (upward from rest)
    pub flipper_swing_degrees: f32,
    /// Gravity scale while flippers hang at rest
    pub flipper_rest_gravity: f32,
    /// Gravity scale while flippers snap back after a flip
    pub flipper_settle_gravity: f32,
    /// Frames the settle gravity stays applied after a flip
    pub flipper_settle_frames: u32,
    /// Upward impulse applied to each flipper on a flip
    pub flip_impulse: f32,
    /// Minimum |vy| (or |angular velocity|) for a flipper to count as flipping
    pub flipper_motion_threshold: f32,

    // === Bounce steering ===
    /// Dead zone half-width as a fraction of the paddle's half total width
    pub steering_dead_zone: f32,
    /// Absolute margin added to the dead zone before steering kicks in
    pub steering_margin: f32,
    /// How strongly an off-centre hit scales the steered component
    pub steering_multiplier: f32,

    // === Field ===
    pub scene_width: f32,
    pub scene_height: f32,
    pub wall_thickness: f32,
    pub brick_width: f32,
    pub brick_height: f32,

    // === Items ===
    pub bonus_item_size: f32,
    /// Gravity scale of a falling bonus item
    pub bonus_item_gravity: f32,

    // === Session ===
    pub starting_lives: u8,
    /// Seed for the idle-mode autopilot
    pub seed: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ball_speed: 4.0,
            max_component_ratio: 0.97,
            min_component_ratio: 0.15,
            ball_radius: 0.1,
            serve_vx: 1.85,

            paddle_speed: 8.0,
            paddle_width: 1.2,
            paddle_height: 0.24,
            paddle_elevation: 0.60,
            flipper_scale: 0.4,
            flipper_swing_degrees: 45.0,
            flipper_rest_gravity: 0.5,
            flipper_settle_gravity: 10.0,
            flipper_settle_frames: 20,
            flip_impulse: 0.3,
            flipper_motion_threshold: 0.05,

            steering_dead_zone: 0.3,
            steering_margin: 0.1,
            steering_multiplier: 2.0,

            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,
            wall_thickness: 0.4,
            brick_width: 0.64,
            brick_height: 0.32,

            bonus_item_size: 0.3,
            bonus_item_gravity: 0.1,

            starting_lives: 3,
            seed: 0x5eed,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let tuning = Self::from_json(&text).map_err(|e| ConfigError::parse(path, e))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Width of one flipper
    pub fn flipper_width(&self) -> f32 {
        self.paddle_width * self.flipper_scale
    }

    /// Height of one flipper
    pub fn flipper_height(&self) -> f32 {
        self.paddle_height * self.flipper_scale
    }

    /// Half of the paddle's total width (body plus both flippers)
    pub fn paddle_half_total_width(&self) -> f32 {
        self.paddle_width / 2.0 + self.flipper_width()
    }

    /// Starting serve velocity: fixed horizontal part, downward vertical part at ball speed
    pub fn serve_velocity(&self) -> glam::Vec2 {
        let vx = self.serve_vx.clamp(-self.ball_speed, self.ball_speed);
        let vy = -(self.ball_speed * self.ball_speed - vx * vx).max(0.0).sqrt();
        glam::Vec2::new(vx, vy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_feel() {
        let t = Tuning::default();
        assert_eq!(t.ball_speed, 4.0);
        assert_eq!(t.paddle_speed, 8.0);
        assert!((t.flipper_width() - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "ball_speed": 5.0, "starting_lives": 9 }"#).unwrap();
        assert_eq!(t.ball_speed, 5.0);
        assert_eq!(t.starting_lives, 9);
        assert_eq!(t.paddle_speed, 8.0);
    }

    #[test]
    fn test_serve_velocity_has_ball_speed() {
        let t = Tuning::default();
        let v = t.serve_velocity();
        assert!((v.length() - t.ball_speed).abs() < 1e-5);
        assert!(v.y < 0.0);
        assert_eq!(v.x, 1.85);
    }

    #[test]
    fn test_load_tells_missing_from_malformed() {
        let dir = std::env::temp_dir();
        let missing = dir.join("vaus_breaker_tuning_missing_test.json");
        let _ = std::fs::remove_file(&missing);
        assert!(matches!(Tuning::load(&missing), Err(ConfigError::Io { .. })));

        let malformed = dir.join("vaus_breaker_tuning_malformed_test.json");
        std::fs::write(&malformed, "{ \"ball_speed\": \"fast\" }").unwrap();
        assert!(matches!(Tuning::load(&malformed), Err(ConfigError::Parse { .. })));
        let _ = std::fs::remove_file(&malformed);
    }
}
