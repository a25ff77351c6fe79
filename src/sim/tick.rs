//! Fixed timestep simulation tick
//!
//! One call to [`tick`] advances the game by exactly one physics step and
//! runs every contact rule the step produced.

use std::fmt;

use glam::Vec2;
use rand::Rng;

use super::collision::{ContactEvent, ContactResponder};
use super::entity::{EntityRef, FlipperSide, PaddlePart, ProjectileKind};
use super::paddle::PaddleDrive;
use super::physics::{ContactChange, PhysicsWorld, RawContact, WorldError};
use super::scene::build_world;
use super::state::{Activation, GamePhase, GameSession};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::SIM_DT;
use crate::level::{LevelDescriptor, LevelError};
use crate::tuning::Tuning;

/// How far above the paddle top the autopilot starts flipping
const AUTOPILOT_FLIP_RANGE: f32 = 0.4;
/// Ticks between autopilot aim changes
const AUTOPILOT_AIM_PERIOD: u64 = 90;

/// Errors starting a level
#[derive(Debug)]
pub enum GameError {
    Level(LevelError),
    World(WorldError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Level(e) => write!(f, "level rejected: {e}"),
            GameError::World(e) => write!(f, "cannot build world: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Level(e) => Some(e),
            GameError::World(e) => Some(e),
        }
    }
}

impl From<LevelError> for GameError {
    fn from(e: LevelError) -> Self {
        GameError::Level(e)
    }
}

impl From<WorldError> for GameError {
    fn from(e: WorldError) -> Self {
        GameError::World(e)
    }
}

/// A player command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Move the paddle toward this x (clamped to the walls)
    MoveToX(f32),
    ActuateFlippers,
    FireWeapon,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_to_x: Option<f32>,
    pub actuate_flippers: bool,
    pub fire_weapon: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Fold a batch of intents; the last move wins
    pub fn from_intents(intents: impl IntoIterator<Item = Intent>) -> Self {
        let mut input = Self::default();
        for intent in intents {
            match intent {
                Intent::MoveToX(x) => input.move_to_x = Some(x),
                Intent::ActuateFlippers => input.actuate_flippers = true,
                Intent::FireWeapon => input.fire_weapon = true,
            }
        }
        input
    }
}

/// A running level: session state, its physics world and the contact rules
pub struct Game {
    pub session: GameSession,
    pub world: PhysicsWorld,
    pub responder: ContactResponder,
    tuning: Tuning,
    contacts: Vec<RawContact>,
}

impl Game {
    pub fn new(level: &LevelDescriptor, tuning: &Tuning) -> Result<Self, GameError> {
        level.validate()?;
        let session = GameSession::new(level, tuning);
        let world = build_world(&session, tuning)?;
        log::info!(
            "Level {} ready: {} bricks ({} to clear)",
            level.level_number,
            session.bricks.len(),
            session.bricks.remaining()
        );
        Ok(Self {
            session,
            world,
            responder: ContactResponder::new(),
            tuning: tuning.clone(),
            contacts: Vec::new(),
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

/// Advance the game by one fixed timestep
pub fn tick(game: &mut Game, input: &TickInput, audio: &mut dyn AudioSink) {
    if input.pause {
        toggle_pause(game);
    }
    if game.session.phase != GamePhase::Playing {
        return;
    }
    if game.session.time_ticks == 0 {
        audio.cue(SoundEffect::LevelStart);
        if !game.session.music.is_empty() {
            audio.play_music(&game.session.music, 1.0);
        }
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(&mut game.session, &mut input);
    }

    // Intents
    if let Some(x) = input.move_to_x {
        game.session.paddle.command_move(x);
    }
    if input.actuate_flippers {
        actuate_flippers(game, audio);
    }
    if input.fire_weapon {
        fire_weapon(game, audio);
    }

    pre_step(game);

    let pre_step_vel = game.session.ball.vel;
    game.contacts.clear();
    game.world.step(&mut game.contacts);
    sync_from_world(game);

    let events: Vec<ContactEvent> = game
        .contacts
        .iter()
        .map(|c| match c.change {
            ContactChange::Started => ContactEvent::begin(c.a, c.b),
            ContactChange::Solved => ContactEvent::solved(c.a, c.b),
            ContactChange::Stopped => ContactEvent::end(c.a, c.b),
        })
        .collect();
    game.responder
        .dispatch(&mut game.session, &events, pre_step_vel, audio);

    game.world.set_velocity(EntityRef::Ball, game.session.ball.vel);
    apply_activations(game);

    let retired = game.session.bricks.retire_resolved();
    if !retired.is_empty() {
        log::debug!("Retired {} resolved bricks", retired.len());
    }

    match game.session.update_phase() {
        Some(GamePhase::LevelCleared) => audio.cue(SoundEffect::LevelEnd),
        Some(GamePhase::GameOver) => audio.cue(SoundEffect::GameOver),
        _ => {}
    }
    game.session.time_ticks += 1;
}

fn toggle_pause(game: &mut Game) {
    let session = &mut game.session;
    match session.phase {
        GamePhase::Playing => {
            session.phase = GamePhase::Paused;
            session.parked_velocity = Some(session.ball.vel);
            session.ball.vel = Vec2::ZERO;
            game.world.set_velocity(EntityRef::Ball, Vec2::ZERO);
            log::info!("Paused");
        }
        GamePhase::Paused => {
            session.phase = GamePhase::Playing;
            if let Some(vel) = session.parked_velocity.take() {
                session.ball.vel = vel;
                game.world.set_velocity(EntityRef::Ball, vel);
            }
            log::info!("Resumed");
        }
        _ => {}
    }
}

/// Track the ball with a drifting offset, flip when it's close, fire when armed
fn autopilot(session: &mut GameSession, input: &mut TickInput) {
    if session.time_ticks % AUTOPILOT_AIM_PERIOD == 0 {
        let reach = session.paddle.half_total_width() * 0.6;
        session.aim_offset = session.rng.random_range(-reach..=reach);
    }
    let ball = &session.ball;
    let paddle = &session.paddle;
    input.move_to_x = Some(ball.pos.x + session.aim_offset);

    let above = ball.pos.y - paddle.top();
    let over_paddle = (ball.pos.x - paddle.x).abs() <= paddle.half_total_width();
    let ready = paddle.settle_frames == 0;
    if ready && ball.vel.y < 0.0 && (0.0..AUTOPILOT_FLIP_RANGE).contains(&above) && over_paddle {
        input.actuate_flippers = true;
    }
    if paddle.armed().is_some() {
        input.fire_weapon = true;
    }
}

fn actuate_flippers(game: &mut Game, audio: &mut dyn AudioSink) {
    audio.cue(SoundEffect::FlipperMove);
    let impulse = Vec2::new(0.0, game.tuning.flip_impulse);
    for side in [FlipperSide::Left, FlipperSide::Right] {
        let entity = EntityRef::Paddle(PaddlePart::Flipper(side));
        game.world
            .set_gravity_scale(entity, game.tuning.flipper_settle_gravity);
        game.world.apply_impulse(entity, impulse);
    }
    game.session.paddle.settle_frames = game.tuning.flipper_settle_frames;
}

fn fire_weapon(game: &mut Game, audio: &mut dyn AudioSink) {
    let Some((kind, origin, vel)) = game.session.paddle.fire() else {
        return;
    };
    let entity = EntityRef::Projectile(kind);
    game.world.set_position(entity, origin);
    game.world.set_velocity(entity, vel);
    game.world.set_enabled(entity, true);
    audio.cue(match kind {
        ProjectileKind::Laser => SoundEffect::FireLaser,
        ProjectileKind::Bomb => SoundEffect::FireBomb,
    });
    log::info!(
        "Fired {} ({} left)",
        kind.name(),
        game.session.paddle.projectile(kind).shots
    );
}

/// Paddle drive, flipper settle countdown and ball speed upkeep
fn pre_step(game: &mut Game) {
    let body = EntityRef::Paddle(PaddlePart::Body);
    match game.session.paddle.drive(SIM_DT) {
        PaddleDrive::Velocity(vx) => game.world.set_velocity(body, Vec2::new(vx, 0.0)),
        PaddleDrive::SnapTo(x) => {
            let paddle = &mut game.session.paddle;
            paddle.x = x;
            game.world.set_velocity(body, Vec2::ZERO);
            game.world.set_position(body, Vec2::new(x, paddle.y));
        }
    }

    let paddle = &mut game.session.paddle;
    if paddle.settle_frames > 0 {
        paddle.settle_frames -= 1;
        if paddle.settle_frames == 0 {
            for side in [FlipperSide::Left, FlipperSide::Right] {
                game.world.set_gravity_scale(
                    EntityRef::Paddle(PaddlePart::Flipper(side)),
                    game.tuning.flipper_rest_gravity,
                );
            }
        }
    }

    if game.session.ball.renormalize() {
        game.world.set_velocity(EntityRef::Ball, game.session.ball.vel);
    }
}

/// Copy post-step positions and velocities back into the session
fn sync_from_world(game: &mut Game) {
    let world = &game.world;
    let session = &mut game.session;

    if let (Some(pos), Some(vel)) = (world.position(EntityRef::Ball), world.velocity(EntityRef::Ball)) {
        session.ball.pos = pos;
        session.ball.vel = vel;
    }
    if let Some(pos) = world.position(EntityRef::Paddle(PaddlePart::Body)) {
        session.paddle.x = pos.x;
    }
    for side in [FlipperSide::Left, FlipperSide::Right] {
        let entity = EntityRef::Paddle(PaddlePart::Flipper(side));
        let flipper = session.paddle.flipper_mut(side);
        flipper.pos = world.position(entity).unwrap_or(flipper.pos);
        flipper.angle = world.angle(entity).unwrap_or(flipper.angle);
        flipper.angvel = world.angular_velocity(entity).unwrap_or(0.0);
        flipper.vel = world.velocity(entity).unwrap_or(Vec2::ZERO);
    }

    let falling: Vec<_> = session.bricks.falling_items().map(|(id, _)| id).collect();
    for id in falling {
        if let (Some(pos), Some(item)) = (
            world.position(EntityRef::BonusItem(id)),
            session.bricks.item_mut(id),
        ) {
            item.pos = pos;
        }
    }
    for kind in ProjectileKind::ALL {
        let projectile = session.paddle.projectile_mut(kind);
        if projectile.alive {
            if let Some(pos) = world.position(EntityRef::Projectile(kind)) {
                projectile.pos = pos;
            }
        }
    }
}

/// Switch bodies on or off now that the step is over
fn apply_activations(game: &mut Game) {
    for activation in game.session.take_activations() {
        match activation {
            Activation::Enable(entity) => {
                if let EntityRef::BonusItem(id) = entity {
                    if let Some(item) = game.session.bricks.item(id) {
                        game.world.set_position(entity, item.pos);
                        game.world.set_velocity(entity, Vec2::ZERO);
                    }
                }
                game.world.set_enabled(entity, true);
            }
            Activation::Disable(entity) => game.world.set_enabled(entity, false),
        }
    }
}
