//! Collision categories and masks
//!
//! Every fixture carries a category bit and a mask. Two fixtures collide only
//! when each one's category is accepted by the other's mask.

use serde::{Deserialize, Serialize};

/// Collision category of a fixture (one bit each)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionCategory {
    Paddle,
    Flipper,
    PaddleTop,
    Ball,
    Brick,
    Wall,
    Projectile,
    BonusItem,
    GenericSensor,
}

impl CollisionCategory {
    pub const ALL: [CollisionCategory; 9] = [
        CollisionCategory::Paddle,
        CollisionCategory::Flipper,
        CollisionCategory::PaddleTop,
        CollisionCategory::Ball,
        CollisionCategory::Brick,
        CollisionCategory::Wall,
        CollisionCategory::Projectile,
        CollisionCategory::BonusItem,
        CollisionCategory::GenericSensor,
    ];

    /// The single bit for this category
    pub const fn bits(self) -> u16 {
        match self {
            CollisionCategory::Paddle => 1 << 0,
            CollisionCategory::Flipper => 1 << 1,
            CollisionCategory::PaddleTop => 1 << 2,
            CollisionCategory::Ball => 1 << 3,
            CollisionCategory::Brick => 1 << 4,
            CollisionCategory::Wall => 1 << 5,
            CollisionCategory::Projectile => 1 << 6,
            CollisionCategory::BonusItem => 1 << 7,
            CollisionCategory::GenericSensor => 1 << 8,
        }
    }

    /// Everything except this category
    pub const fn default_mask(self) -> u16 {
        !self.bits()
    }
}

/// Category bits plus the mask of categories this fixture accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    pub category: u16,
    pub mask: u16,
}

impl CollisionFilter {
    pub const fn new(category: CollisionCategory, mask: u16) -> Self {
        Self {
            category: category.bits(),
            mask,
        }
    }

    /// Symmetric acceptance test
    pub const fn collides_with(&self, other: &CollisionFilter) -> bool {
        (self.category & other.mask) != 0 && (other.category & self.mask) != 0
    }
}

const PADDLE_PARTS: u16 = CollisionCategory::Paddle.bits()
    | CollisionCategory::Flipper.bits()
    | CollisionCategory::PaddleTop.bits();

/// Mask for a category, with the per-entity overrides applied
pub const fn mask_for(category: CollisionCategory) -> u16 {
    match category {
        // The paddle's own parts never touch each other
        CollisionCategory::Paddle | CollisionCategory::Flipper | CollisionCategory::PaddleTop => {
            !PADDLE_PARTS
        }
        CollisionCategory::Projectile => {
            !(CollisionCategory::Projectile.bits()
                | CollisionCategory::Ball.bits()
                | CollisionCategory::BonusItem.bits())
        }
        CollisionCategory::BonusItem => {
            !(CollisionCategory::Brick.bits()
                | CollisionCategory::Ball.bits()
                | CollisionCategory::Projectile.bits())
        }
        // Blast sensors only care about bricks
        CollisionCategory::GenericSensor => CollisionCategory::Brick.bits(),
        _ => category.default_mask(),
    }
}

/// Filter for a category with its standard mask
pub const fn filter_for(category: CollisionCategory) -> CollisionFilter {
    CollisionFilter::new(category, mask_for(category))
}
