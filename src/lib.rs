//! Vaus Breaker - brick-breaker with a flipper-armed paddle
//!
//! Core modules:
//! - `sim`: Gameplay simulation (collision filtering, contact routing, bounce shaping, game loop)
//! - `level`: Level descriptors loaded from JSON
//! - `renderer`: Draw-command sink and per-frame scene/HUD emission
//! - `audio`: Sound effect catalogue and volume mixing
//! - `settings` / `tuning`: Player preferences and data-driven game balance

pub mod audio;
pub mod level;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use level::{LevelDescriptor, LevelError};
pub use settings::{ConfigError, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one physics step per frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Scene dimensions in world units (origin bottom-left, Y up)
    pub const SCENE_WIDTH: f32 = 12.80;
    pub const SCENE_HEIGHT: f32 = 7.20;

    /// World gravity (only flippers and bonus items feel it, through gravity scale)
    pub const GRAVITY_Y: f32 = -9.8;
}

/// Clamp `value` into `[lo, hi]` without panicking when the bounds are inverted.
#[inline]
pub fn clamp_lenient(value: f32, lo: f32, hi: f32) -> f32 {
    if lo > hi {
        return value.clamp(hi, lo);
    }
    value.clamp(lo, hi)
}
