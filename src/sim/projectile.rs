//! Paddle weapons and their projectiles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::ProjectileKind;

/// Fixed characteristics of a weapon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub shots: u32,
    pub power: i32,
    /// Launch speed, straight up
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub texture: &'static str,
}

impl ProjectileKind {
    pub const ALL: [ProjectileKind; 2] = [ProjectileKind::Laser, ProjectileKind::Bomb];

    pub fn spec(self) -> WeaponSpec {
        match self {
            ProjectileKind::Laser => WeaponSpec {
                shots: 5,
                power: 1,
                speed: 8.0,
                width: 0.06,
                height: 0.24,
                texture: "projectile_laser.png",
            },
            ProjectileKind::Bomb => WeaponSpec {
                shots: 2,
                power: 4,
                speed: 3.0,
                width: 0.16,
                height: 0.16,
                texture: "projectile_bomb.png",
            },
        }
    }

    /// Blast sensor radius (bombs only)
    pub fn blast_radius(self) -> Option<f32> {
        match self {
            ProjectileKind::Bomb => Some(self.spec().width * 2.0),
            ProjectileKind::Laser => None,
        }
    }

    /// HUD name
    pub fn name(self) -> &'static str {
        match self {
            ProjectileKind::Laser => "LASER",
            ProjectileKind::Bomb => "BOMB",
        }
    }
}

/// One projectile slot. Only one of each kind is ever in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub power: i32,
    pub shots: u32,
    pub alive: bool,
    pub pos: Vec2,
}

impl Projectile {
    /// Unarmed slot
    pub fn new(kind: ProjectileKind) -> Self {
        Self {
            kind,
            power: kind.spec().power,
            shots: 0,
            alive: false,
            pos: Vec2::ZERO,
        }
    }

    /// Refill the shot counter
    pub fn rearm(&mut self) {
        self.shots = self.kind.spec().shots;
    }

    pub fn can_fire(&self) -> bool {
        self.shots > 0 && !self.alive
    }

    /// Fire from `origin`; returns the launch velocity on success
    pub fn fire(&mut self, origin: Vec2) -> Option<Vec2> {
        if !self.can_fire() {
            return None;
        }
        self.shots -= 1;
        self.alive = true;
        self.pos = origin;
        Some(Vec2::new(0.0, self.kind.spec().speed))
    }

    pub fn retire(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_table() {
        assert_eq!(ProjectileKind::Laser.spec().shots, 5);
        assert_eq!(ProjectileKind::Bomb.spec().power, 4);
        assert_eq!(ProjectileKind::Laser.blast_radius(), None);
        assert_eq!(ProjectileKind::Bomb.blast_radius(), Some(0.32));
    }

    #[test]
    fn test_fire_needs_shots_and_free_slot() {
        let mut laser = Projectile::new(ProjectileKind::Laser);
        assert_eq!(laser.fire(Vec2::ZERO), None);

        laser.rearm();
        let vel = laser.fire(Vec2::new(1.0, 1.0));
        assert_eq!(vel, Some(Vec2::new(0.0, 8.0)));
        assert_eq!(laser.shots, 4);

        // Still in flight
        assert_eq!(laser.fire(Vec2::ZERO), None);
        laser.retire();
        assert!(laser.fire(Vec2::ZERO).is_some());
        assert_eq!(laser.shots, 3);
    }
}
