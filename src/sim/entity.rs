//! Entity references and the fixture registry
//!
//! A fixture in the rigid-body world is just a handle. The registry maps each
//! handle back to the game entity that owns it, plus the role the fixture plays
//! for that entity (its primary shape or an auxiliary sensor).

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::filter::CollisionCategory;

/// Stable brick identifier (assigned from the level descriptor, starting at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BrickId(pub u32);

/// Weapon kinds the paddle can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Laser,
    Bomb,
}

/// Which flipper
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlipperSide {
    Left,
    Right,
}

/// The physical pieces of the paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaddlePart {
    /// Central body
    Body,
    Flipper(FlipperSide),
    /// Thin surface spanning the full width, flush with the top edge
    FlatTop,
}

/// Boundaries of the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
    Ceiling,
    Floor,
}

/// Tagged reference from a body back to the entity that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Ball,
    Paddle(PaddlePart),
    Brick(BrickId),
    /// Bonus items are owned by the brick that hides them
    BonusItem(BrickId),
    Projectile(ProjectileKind),
    Wall(WallSide),
}

/// Coarse entity kind, used to order contact pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Ball,
    Projectile,
    BonusItem,
    Paddle,
    Brick,
    Wall,
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Ball => EntityKind::Ball,
            EntityRef::Projectile(_) => EntityKind::Projectile,
            EntityRef::BonusItem(_) => EntityKind::BonusItem,
            EntityRef::Paddle(_) => EntityKind::Paddle,
            EntityRef::Brick(_) => EntityKind::Brick,
            EntityRef::Wall(_) => EntityKind::Wall,
        }
    }

    /// Category carried by this entity's primary fixture
    pub fn category(&self) -> CollisionCategory {
        match self {
            EntityRef::Ball => CollisionCategory::Ball,
            EntityRef::Paddle(PaddlePart::Body) => CollisionCategory::Paddle,
            EntityRef::Paddle(PaddlePart::Flipper(_)) => CollisionCategory::Flipper,
            EntityRef::Paddle(PaddlePart::FlatTop) => CollisionCategory::PaddleTop,
            EntityRef::Brick(_) => CollisionCategory::Brick,
            EntityRef::BonusItem(_) => CollisionCategory::BonusItem,
            EntityRef::Projectile(_) => CollisionCategory::Projectile,
            EntityRef::Wall(_) => CollisionCategory::Wall,
        }
    }
}

/// Role a fixture plays for its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixtureRole {
    Primary,
    /// The bomb's blast radius
    BlastSensor,
}

/// A resolved fixture: owning entity plus role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub entity: EntityRef,
    pub role: FixtureRole,
}

impl Fixture {
    pub const fn primary(entity: EntityRef) -> Self {
        Self {
            entity,
            role: FixtureRole::Primary,
        }
    }

    pub const fn blast_sensor(entity: EntityRef) -> Self {
        Self {
            entity,
            role: FixtureRole::BlastSensor,
        }
    }

    pub fn is_sensor(&self) -> bool {
        self.role != FixtureRole::Primary
    }
}

/// Maps world fixture handles to the fixtures they stand for.
///
/// Generic over the handle type so it can be driven without a physics world.
#[derive(Debug, Clone)]
pub struct EntityRegistry<H> {
    fixtures: HashMap<H, Fixture>,
}

impl<H> Default for EntityRegistry<H> {
    fn default() -> Self {
        Self {
            fixtures: HashMap::new(),
        }
    }
}

impl<H: Copy + Eq + Hash> EntityRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a handle; rebinding replaces the previous fixture
    pub fn bind(&mut self, handle: H, fixture: Fixture) {
        if let Some(previous) = self.fixtures.insert(handle, fixture) {
            if previous != fixture {
                log::warn!("Fixture rebound from {previous:?} to {fixture:?}");
            }
        }
    }

    pub fn resolve(&self, handle: H) -> Option<Fixture> {
        self.fixtures.get(&handle).copied()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_resolve() {
        let mut reg = EntityRegistry::new();
        reg.bind(7u32, Fixture::primary(EntityRef::Brick(BrickId(3))));
        reg.bind(8u32, Fixture::blast_sensor(EntityRef::Projectile(ProjectileKind::Bomb)));

        assert_eq!(
            reg.resolve(7).map(|f| f.entity),
            Some(EntityRef::Brick(BrickId(3)))
        );
        assert!(reg.resolve(8).is_some_and(|f| f.is_sensor()));
        assert_eq!(reg.resolve(9), None);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_categories_follow_paddle_parts() {
        assert_eq!(
            EntityRef::Paddle(PaddlePart::FlatTop).category(),
            CollisionCategory::PaddleTop
        );
        assert_eq!(
            EntityRef::Paddle(PaddlePart::Flipper(FlipperSide::Left)).category(),
            CollisionCategory::Flipper
        );
    }
}
