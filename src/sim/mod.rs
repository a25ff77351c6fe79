//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Contact rules run after the physics step, never inside it
//! - No rendering or platform dependencies

pub mod angle_guard;
pub mod ball;
pub mod blast;
pub mod brick;
pub mod classify;
pub mod collision;
pub mod entity;
pub mod filter;
pub mod paddle;
pub mod physics;
pub mod projectile;
pub mod scene;
pub mod state;
pub mod steering;
pub mod tick;

pub use angle_guard::guard_angle;
pub use ball::{Ball, BallBounds};
pub use blast::BombBlastHitSet;
pub use brick::{BonusItem, BonusKind, Brick, BrickField, HitOutcome, ItemState};
pub use classify::{CanonicalContact, ContactPair, classify};
pub use collision::{ContactEvent, ContactPhase, ContactResponder, ContactStats};
pub use entity::{
    BrickId, EntityKind, EntityRef, EntityRegistry, Fixture, FixtureRole, FlipperSide, PaddlePart,
    ProjectileKind, WallSide,
};
pub use filter::{CollisionCategory, CollisionFilter, filter_for, mask_for};
pub use paddle::{Flipper, Paddle, PaddleDrive};
pub use physics::{ContactChange, PhysicsWorld, RawContact, WorldError};
pub use projectile::{Projectile, WeaponSpec};
pub use state::{Activation, GamePhase, GameSession};
pub use steering::{PaddleHit, SteeringParams, steer_bounce};
pub use tick::{Game, GameError, Intent, TickInput, tick};
