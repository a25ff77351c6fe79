//! Game session state
//!
//! Everything the contact handlers read or mutate lives in one explicit
//! [`GameSession`] passed by reference; there are no globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::blast::BombBlastHitSet;
use super::brick::{BonusItem, BonusKind, Brick, BrickField};
use super::entity::{BrickId, EntityRef};
use super::paddle::Paddle;
use super::steering::SteeringParams;
use crate::level::LevelDescriptor;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Simulation frozen; ball velocity parked in the session
    Paused,
    /// Every destructible brick is gone
    LevelCleared,
    /// No lives left
    GameOver,
}

/// A body activation change requested during contact handling.
///
/// Bodies can't be switched on or off while the world is resolving contacts,
/// so handlers queue these and the frame loop applies them after the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Enable(EntityRef),
    Disable(EntityRef),
}

/// Texture ids a level supplies for its fixed scenery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelTextures {
    pub background: String,
    pub ball: String,
    pub paddle: String,
    pub left_wall: String,
    pub right_wall: String,
    pub ceiling: String,
}

/// Complete game session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub phase: GamePhase,
    pub level_number: u32,
    pub score: u64,
    pub lives: u8,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickField,
    pub blast: BombBlastHitSet,
    pub steering: SteeringParams,
    /// Flipper speed above which a ball hit counts as a flip
    pub flipper_motion_threshold: f32,
    pub textures: LevelTextures,
    /// Background track for the level; empty when it has none
    #[serde(default)]
    pub music: String,
    /// Deferred activation changes, drained once per frame
    #[serde(skip)]
    pub activations: Vec<Activation>,
    /// Ball velocity saved while paused
    #[serde(skip)]
    pub parked_velocity: Option<Vec2>,
    pub time_ticks: u64,
    /// Autopilot aim offset from the ball, re-rolled now and then
    #[serde(default)]
    pub aim_offset: f32,
    /// Autopilot randomness
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameSession {
    /// Build a session from a validated level
    pub fn new(level: &LevelDescriptor, tuning: &Tuning) -> Self {
        let paddle = Paddle::new(tuning);
        let ball_start = Vec2::new(paddle.x, tuning.scene_height * 0.45);

        let bricks = level.bricks.iter().enumerate().map(|(i, desc)| {
            let id = BrickId(i as u32 + 1);
            let pos = Vec2::new(desc.position_x, desc.position_y);
            let kind = desc.bonus_kind();
            Brick {
                id,
                pos,
                width: desc.width.unwrap_or(tuning.brick_width),
                height: desc.height.unwrap_or(tuning.brick_height),
                toughness: desc.toughness,
                point_value: desc.point_value,
                indestructible: desc.is_indestructible,
                alive: true,
                texture: desc.texture_file.clone(),
                bonus: (kind != BonusKind::None)
                    .then(|| BonusItem::new(kind, pos, tuning.bonus_item_size)),
            }
        });

        Self {
            phase: GamePhase::Playing,
            level_number: level.level_number,
            score: 0,
            lives: tuning.starting_lives,
            ball: Ball::new(tuning, ball_start),
            paddle,
            bricks: BrickField::new(bricks),
            blast: BombBlastHitSet::new(),
            steering: SteeringParams::from_tuning(tuning),
            flipper_motion_threshold: tuning.flipper_motion_threshold,
            textures: LevelTextures {
                background: level.background_texture.clone(),
                ball: level.ball_texture.clone(),
                paddle: level.vaus_texture.clone(),
                left_wall: level.left_wall_texture.clone(),
                right_wall: level.right_wall_texture.clone(),
                ceiling: level.ceiling_texture.clone(),
            },
            music: level.level_background_music.clone(),
            activations: Vec::new(),
            parked_velocity: None,
            time_ticks: 0,
            aim_offset: 0.0,
            rng: Pcg32::seed_from_u64(tuning.seed),
        }
    }

    /// Queue a body to be switched on after the step
    pub fn activate(&mut self, entity: EntityRef) {
        self.activations.push(Activation::Enable(entity));
    }

    /// Queue a body to be switched off after the step
    pub fn deactivate(&mut self, entity: EntityRef) {
        self.activations.push(Activation::Disable(entity));
    }

    pub fn take_activations(&mut self) -> Vec<Activation> {
        std::mem::take(&mut self.activations)
    }

    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        log::info!("Ball reached the floor, {} lives left", self.lives);
    }

    pub fn gain_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
        log::info!("Extra life, {} lives", self.lives);
    }

    /// Move to a terminal phase once the level is cleared or lives run out.
    /// Returns the new phase when it changed.
    pub fn update_phase(&mut self) -> Option<GamePhase> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let next = if self.lives == 0 {
            GamePhase::GameOver
        } else if self.bricks.remaining() == 0 {
            GamePhase::LevelCleared
        } else {
            return None;
        };
        log::info!("Level {} -> {next:?} (score {})", self.level_number, self.score);
        self.phase = next;
        Some(next)
    }
}
