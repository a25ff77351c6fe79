//! The paddle ("Vaus"): body, flippers, weapon slots and motion

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::brick::BonusKind;
use super::entity::{FlipperSide, ProjectileKind};
use super::projectile::Projectile;
use crate::clamp_lenient;
use crate::tuning::Tuning;

/// Mirror of a flipper body's motion, refreshed after every step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flipper {
    pub side: FlipperSide,
    pub pos: Vec2,
    pub angle: f32,
    pub angvel: f32,
    pub vel: Vec2,
}

impl Flipper {
    fn new(side: FlipperSide) -> Self {
        Self {
            side,
            pos: Vec2::ZERO,
            angle: 0.0,
            angvel: 0.0,
            vel: Vec2::ZERO,
        }
    }

    /// Swinging up (or spinning) fast enough to count as a flip
    pub fn is_flipping(&self, threshold: f32) -> bool {
        self.vel.y > threshold || self.angvel.abs() > threshold
    }
}

/// Horizontal drive for the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleDrive {
    /// Move at this horizontal velocity
    Velocity(f32),
    /// Close enough: place exactly here and stop
    SnapTo(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub min_x: f32,
    pub max_x: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub flipper_width: f32,
    pub flipper_height: f32,
    pub left: Flipper,
    pub right: Flipper,
    /// Frames left with settle gravity on the flippers
    pub settle_frames: u32,
    pub equipped: Option<ProjectileKind>,
    /// Passive modifier slot
    pub modifier: Option<BonusKind>,
    pub laser: Projectile,
    pub bomb: Projectile,
}

impl Paddle {
    pub fn new(tuning: &Tuning) -> Self {
        let half_total = tuning.paddle_half_total_width();
        let inset = half_total + tuning.wall_thickness + tuning.flipper_height() * 2.0;
        let min_x = inset;
        let max_x = tuning.scene_width - inset;
        let x = tuning.scene_width / 2.0;
        Self {
            x,
            y: tuning.paddle_elevation,
            target_x: x,
            min_x,
            max_x,
            speed: tuning.paddle_speed,
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            flipper_width: tuning.flipper_width(),
            flipper_height: tuning.flipper_height(),
            left: Flipper::new(FlipperSide::Left),
            right: Flipper::new(FlipperSide::Right),
            settle_frames: 0,
            equipped: None,
            modifier: None,
            laser: Projectile::new(ProjectileKind::Laser),
            bomb: Projectile::new(ProjectileKind::Bomb),
        }
    }

    /// Half of body plus both flippers
    pub fn half_total_width(&self) -> f32 {
        self.width / 2.0 + self.flipper_width
    }

    /// Top surface height
    pub fn top(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn flipper(&self, side: FlipperSide) -> &Flipper {
        match side {
            FlipperSide::Left => &self.left,
            FlipperSide::Right => &self.right,
        }
    }

    pub fn flipper_mut(&mut self, side: FlipperSide) -> &mut Flipper {
        match side {
            FlipperSide::Left => &mut self.left,
            FlipperSide::Right => &mut self.right,
        }
    }

    /// Set a new target, clamped inside the walls
    pub fn command_move(&mut self, x: f32) {
        self.target_x = clamp_lenient(x, self.min_x, self.max_x);
    }

    /// Drive toward the target for one step of length `dt`
    pub fn drive(&self, dt: f32) -> PaddleDrive {
        let dist = self.target_x - self.x;
        if dist.abs() <= self.speed * dt {
            PaddleDrive::SnapTo(self.target_x)
        } else {
            PaddleDrive::Velocity(self.speed.copysign(dist))
        }
    }

    /// Hinge point of a flipper (top outer corner of the body), relative to the paddle centre
    pub fn hinge_offset(&self, side: FlipperSide) -> Vec2 {
        let half_w = self.width / 2.0;
        let top = self.height / 2.0;
        match side {
            FlipperSide::Left => Vec2::new(-half_w, top),
            FlipperSide::Right => Vec2::new(half_w, top),
        }
    }

    pub fn projectile(&self, kind: ProjectileKind) -> &Projectile {
        match kind {
            ProjectileKind::Laser => &self.laser,
            ProjectileKind::Bomb => &self.bomb,
        }
    }

    pub fn projectile_mut(&mut self, kind: ProjectileKind) -> &mut Projectile {
        match kind {
            ProjectileKind::Laser => &mut self.laser,
            ProjectileKind::Bomb => &mut self.bomb,
        }
    }

    /// Equip a weapon and refill its shots. The other slot is left alone.
    pub fn equip(&mut self, kind: ProjectileKind) {
        self.equipped = Some(kind);
        self.projectile_mut(kind).rearm();
    }

    /// Fire the equipped weapon from the top of the paddle
    pub fn fire(&mut self) -> Option<(ProjectileKind, Vec2, Vec2)> {
        let kind = self.equipped?;
        let origin = Vec2::new(self.x, self.top() + kind.spec().height / 2.0);
        let vel = self.projectile_mut(kind).fire(origin)?;
        Some((kind, origin, vel))
    }

    /// Equipped weapon and its shots, while any remain
    pub fn armed(&self) -> Option<(ProjectileKind, u32)> {
        let kind = self.equipped?;
        let shots = self.projectile(kind).shots;
        (shots > 0).then_some((kind, shots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_target_clamped_to_walls() {
        let mut paddle = Paddle::new(&Tuning::default());
        paddle.command_move(-5.0);
        assert_eq!(paddle.target_x, paddle.min_x);
        paddle.command_move(100.0);
        assert_eq!(paddle.target_x, paddle.max_x);
        assert!(paddle.min_x < paddle.max_x);
    }

    #[test]
    fn test_drive_moves_then_snaps() {
        let mut paddle = Paddle::new(&Tuning::default());
        paddle.command_move(paddle.x + 1.0);
        assert_eq!(paddle.drive(SIM_DT), PaddleDrive::Velocity(8.0));

        paddle.command_move(paddle.x - 0.05);
        assert_eq!(paddle.drive(SIM_DT), PaddleDrive::SnapTo(paddle.target_x));

        paddle.command_move(paddle.x - 2.0);
        assert_eq!(paddle.drive(SIM_DT), PaddleDrive::Velocity(-8.0));
    }

    #[test]
    fn test_equip_switches_without_touching_other_slot() {
        let mut paddle = Paddle::new(&Tuning::default());
        paddle.equip(ProjectileKind::Bomb);
        assert!(paddle.fire().is_some());
        paddle.bomb.retire();

        paddle.equip(ProjectileKind::Laser);
        assert_eq!(paddle.equipped, Some(ProjectileKind::Laser));
        assert_eq!(paddle.laser.shots, 5);
        assert_eq!(paddle.bomb.shots, 1);
        assert!(!paddle.bomb.alive);
    }

    #[test]
    fn test_fire_launches_from_top() {
        let mut paddle = Paddle::new(&Tuning::default());
        assert!(paddle.fire().is_none());
        paddle.equip(ProjectileKind::Laser);
        let (kind, origin, vel) = paddle.fire().unwrap();
        assert_eq!(kind, ProjectileKind::Laser);
        assert!(origin.y > paddle.top());
        assert_eq!(vel, Vec2::new(0.0, 8.0));
        assert_eq!(paddle.armed(), Some((ProjectileKind::Laser, 4)));
    }

    #[test]
    fn test_flipping_threshold() {
        let mut f = Flipper::new(FlipperSide::Right);
        assert!(!f.is_flipping(0.05));
        f.vel.y = 0.3;
        assert!(f.is_flipping(0.05));
    }
}
