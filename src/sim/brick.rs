//! Bricks, the bonus items they hide, and the brick field

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{BrickId, ProjectileKind};

/// What a bonus item grants when caught
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    None,
    Laser,
    Bomb,
    ExtraLife,
    /// Passive paddle modifiers, stored in the paddle's modifier slot
    PaddleWide,
    PaddleSmall,
}

impl BonusKind {
    /// Parse a level descriptor string. Unknown strings yield `None` (the Option).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(BonusKind::None),
            "laser" => Some(BonusKind::Laser),
            "bomb" => Some(BonusKind::Bomb),
            "extralife" | "extra-life" | "extra_life" => Some(BonusKind::ExtraLife),
            "vaus-wide" | "vaus_wide" | "wide" => Some(BonusKind::PaddleWide),
            "vaus-small" | "vaus_small" | "small" => Some(BonusKind::PaddleSmall),
            _ => None,
        }
    }

    /// Weapon granted by this item, if any
    pub fn weapon(&self) -> Option<ProjectileKind> {
        match self {
            BonusKind::Laser => Some(ProjectileKind::Laser),
            BonusKind::Bomb => Some(ProjectileKind::Bomb),
            _ => None,
        }
    }

    pub fn texture(&self) -> &'static str {
        match self {
            BonusKind::None => "",
            BonusKind::Laser => "bonus_laser.png",
            BonusKind::Bomb => "bonus_bomb.png",
            BonusKind::ExtraLife => "bonus_extralife.png",
            BonusKind::PaddleWide => "bonus_vaus_wide.png",
            BonusKind::PaddleSmall => "bonus_vaus_small.png",
        }
    }
}

/// Lifecycle of a bonus item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemState {
    /// Hidden inside a live brick, body inactive
    Dormant,
    /// Revealed and falling
    Falling,
    Caught,
    Missed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusItem {
    pub kind: BonusKind,
    pub state: ItemState,
    pub pos: Vec2,
    pub size: f32,
}

impl BonusItem {
    pub fn new(kind: BonusKind, pos: Vec2, size: f32) -> Self {
        Self {
            kind,
            state: ItemState::Dormant,
            pos,
            size,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == ItemState::Falling
    }

    /// Caught or missed; nothing more can happen to it
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, ItemState::Caught | ItemState::Missed)
    }
}

/// A brick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: BrickId,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub toughness: i32,
    pub point_value: u32,
    pub indestructible: bool,
    pub alive: bool,
    pub texture: String,
    /// Hidden item; `None` when the brick carries nothing
    pub bonus: Option<BonusItem>,
}

/// Result of damaging a brick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Brick already dead, indestructible, or unknown
    Ignored,
    Damaged { toughness: i32 },
    Destroyed {
        points: u32,
        revealed: Option<BonusKind>,
    },
}

impl Brick {
    /// Fully resolved: dead, and its item (if any) caught or missed
    pub fn is_resolved(&self) -> bool {
        !self.alive && self.bonus.as_ref().is_none_or(BonusItem::is_resolved)
    }

    fn hit(&mut self, damage: i32) -> HitOutcome {
        if !self.alive || self.indestructible {
            return HitOutcome::Ignored;
        }
        self.toughness -= damage;
        if self.toughness > 0 {
            return HitOutcome::Damaged {
                toughness: self.toughness,
            };
        }

        self.alive = false;
        let revealed = self.bonus.as_mut().map(|item| {
            item.state = ItemState::Falling;
            item.pos = self.pos;
            item.kind
        });
        HitOutcome::Destroyed {
            points: self.point_value,
            revealed,
        }
    }
}

/// The bricks of the current level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrickField {
    bricks: BTreeMap<BrickId, Brick>,
    /// Destructible bricks still standing
    remaining: usize,
}

impl BrickField {
    pub fn new(bricks: impl IntoIterator<Item = Brick>) -> Self {
        let bricks: BTreeMap<BrickId, Brick> = bricks.into_iter().map(|b| (b.id, b)).collect();
        let remaining = bricks
            .values()
            .filter(|b| b.alive && !b.indestructible)
            .count();
        Self { bricks, remaining }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn get(&self, id: BrickId) -> Option<&Brick> {
        self.bricks.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.values()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Apply damage; a brick only ever dies once
    pub fn damage(&mut self, id: BrickId, amount: i32) -> HitOutcome {
        let Some(brick) = self.bricks.get_mut(&id) else {
            log::debug!("Damage to unknown brick {id:?}");
            return HitOutcome::Ignored;
        };
        let outcome = brick.hit(amount);
        if matches!(outcome, HitOutcome::Destroyed { .. }) {
            self.remaining = self.remaining.saturating_sub(1);
        }
        outcome
    }

    pub fn item(&self, id: BrickId) -> Option<&BonusItem> {
        self.bricks.get(&id).and_then(|b| b.bonus.as_ref())
    }

    pub fn item_mut(&mut self, id: BrickId) -> Option<&mut BonusItem> {
        self.bricks.get_mut(&id).and_then(|b| b.bonus.as_mut())
    }

    /// Items currently falling
    pub fn falling_items(&self) -> impl Iterator<Item = (BrickId, &BonusItem)> {
        self.bricks
            .values()
            .filter_map(|b| b.bonus.as_ref().map(|item| (b.id, item)))
            .filter(|(_, item)| item.is_alive())
    }

    /// Drop bricks that are dead and whose item is resolved
    pub fn retire_resolved(&mut self) -> Vec<BrickId> {
        let retired: Vec<BrickId> = self
            .bricks
            .values()
            .filter(|b| b.is_resolved())
            .map(|b| b.id)
            .collect();
        for id in &retired {
            self.bricks.remove(id);
        }
        retired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brick(id: u32, toughness: i32, bonus: BonusKind) -> Brick {
        let pos = Vec2::new(id as f32, 5.0);
        Brick {
            id: BrickId(id),
            pos,
            width: 0.64,
            height: 0.32,
            toughness,
            point_value: 100,
            indestructible: false,
            alive: true,
            texture: "brick.png".into(),
            bonus: (bonus != BonusKind::None).then(|| BonusItem::new(bonus, pos, 0.3)),
        }
    }

    #[test]
    fn test_parse_bonus_vocabulary() {
        assert_eq!(BonusKind::parse("none"), Some(BonusKind::None));
        assert_eq!(BonusKind::parse("Laser"), Some(BonusKind::Laser));
        assert_eq!(BonusKind::parse("extra-life"), Some(BonusKind::ExtraLife));
        assert_eq!(BonusKind::parse("extralife"), Some(BonusKind::ExtraLife));
        assert_eq!(BonusKind::parse("vaus-wide"), Some(BonusKind::PaddleWide));
        assert_eq!(BonusKind::parse("rocket"), None);
    }

    #[test]
    fn test_single_hit_destroys_weak_brick() {
        let mut field = BrickField::new([brick(1, 1, BonusKind::None), brick(2, 2, BonusKind::None)]);
        assert_eq!(field.remaining(), 2);
        assert_eq!(
            field.damage(BrickId(1), 1),
            HitOutcome::Destroyed {
                points: 100,
                revealed: None
            }
        );
        assert_eq!(field.remaining(), 1);
        assert_eq!(
            field.damage(BrickId(2), 1),
            HitOutcome::Damaged { toughness: 1 }
        );
    }

    #[test]
    fn test_dead_brick_takes_no_more_damage() {
        let mut field = BrickField::new([brick(1, 1, BonusKind::Laser)]);
        field.damage(BrickId(1), 1);
        assert_eq!(field.damage(BrickId(1), 1), HitOutcome::Ignored);
        assert_eq!(field.get(BrickId(1)).map(|b| b.toughness), Some(0));
        assert_eq!(field.remaining(), 0);
    }

    #[test]
    fn test_indestructible_excluded_from_remaining() {
        let mut wall = brick(1, 1, BonusKind::None);
        wall.indestructible = true;
        let mut field = BrickField::new([wall, brick(2, 1, BonusKind::None)]);
        assert_eq!(field.remaining(), 1);
        assert_eq!(field.damage(BrickId(1), 10), HitOutcome::Ignored);
        assert!(field.get(BrickId(1)).is_some_and(|b| b.alive));
    }

    #[test]
    fn test_destroy_reveals_item_and_retires_after_catch() {
        let mut field = BrickField::new([brick(1, 1, BonusKind::Bomb)]);
        assert_eq!(
            field.damage(BrickId(1), 1),
            HitOutcome::Destroyed {
                points: 100,
                revealed: Some(BonusKind::Bomb)
            }
        );
        assert_eq!(field.falling_items().count(), 1);

        // Item still falling: brick stays around
        assert!(field.retire_resolved().is_empty());

        if let Some(item) = field.item_mut(BrickId(1)) {
            item.state = ItemState::Caught;
        }
        assert_eq!(field.retire_resolved(), vec![BrickId(1)]);
        assert!(field.is_empty());
    }

    #[test]
    fn test_item_dormant_while_brick_alive() {
        let mut field = BrickField::new([brick(1, 2, BonusKind::Laser)]);
        field.damage(BrickId(1), 1);
        assert_eq!(field.item(BrickId(1)).map(|i| i.state), Some(ItemState::Dormant));
    }
}
