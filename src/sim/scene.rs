//! Builds the physics world for a session: walls, ball, paddle with
//! flippers, bricks, dormant bonus items and the projectile bodies.

use glam::Vec2;

use super::entity::{EntityRef, Fixture, FlipperSide, PaddlePart, ProjectileKind, WallSide};
use super::filter::{CollisionCategory, filter_for};
use super::physics::{BodyDesc, BodyKind, FixtureDesc, PhysicsWorld, Shape, WorldError};
use super::state::GameSession;
use crate::consts::{GRAVITY_Y, SIM_DT};
use crate::tuning::Tuning;

/// Half height of the flat-top strip over the paddle
const FLAT_TOP_HALF_HEIGHT: f32 = 0.01;

fn boxed(half_width: f32, half_height: f32) -> Shape {
    Shape::Box {
        half_width,
        half_height,
    }
}

fn solid(entity: EntityRef, shape: Shape) -> FixtureDesc {
    FixtureDesc::new(Fixture::primary(entity), shape, filter_for(entity.category()))
}

pub fn build_world(session: &GameSession, tuning: &Tuning) -> Result<PhysicsWorld, WorldError> {
    let mut world = PhysicsWorld::new(Vec2::new(0.0, GRAVITY_Y), SIM_DT);
    add_walls(&mut world, tuning)?;
    add_ball(&mut world, session)?;
    add_paddle(&mut world, session, tuning)?;
    add_bricks(&mut world, session, tuning)?;
    add_projectiles(&mut world, session)?;
    log::debug!("Built world with {} bodies", world.body_count());
    Ok(world)
}

fn add_walls(world: &mut PhysicsWorld, tuning: &Tuning) -> Result<(), WorldError> {
    let (w, h, t) = (tuning.scene_width, tuning.scene_height, tuning.wall_thickness);
    let walls = [
        (WallSide::Left, Vec2::new(t / 2.0, h / 2.0), boxed(t / 2.0, h / 2.0 + t)),
        (WallSide::Right, Vec2::new(w - t / 2.0, h / 2.0), boxed(t / 2.0, h / 2.0 + t)),
        (WallSide::Ceiling, Vec2::new(w / 2.0, h - t / 2.0), boxed(w / 2.0, t / 2.0)),
        // Just below the visible scene
        (WallSide::Floor, Vec2::new(w / 2.0, -t / 2.0), boxed(w / 2.0 + t, t / 2.0)),
    ];
    for (side, pos, shape) in walls {
        let entity = EntityRef::Wall(side);
        world.create_body(
            entity,
            &BodyDesc::new(BodyKind::Fixed, pos).with_fixture(solid(entity, shape)),
        )?;
    }
    Ok(())
}

fn add_ball(world: &mut PhysicsWorld, session: &GameSession) -> Result<(), WorldError> {
    let ball = &session.ball;
    let desc = BodyDesc::new(BodyKind::Dynamic, ball.pos)
        .with_velocity(ball.vel)
        .with_gravity_scale(0.0)
        .with_fixed_rotation(true)
        .with_ccd(true)
        .with_fixture(solid(EntityRef::Ball, Shape::Circle { radius: ball.radius }).elastic());
    world.create_body(EntityRef::Ball, &desc)
}

fn add_paddle(
    world: &mut PhysicsWorld,
    session: &GameSession,
    tuning: &Tuning,
) -> Result<(), WorldError> {
    let paddle = &session.paddle;
    let body = EntityRef::Paddle(PaddlePart::Body);
    let flat_top = EntityRef::Paddle(PaddlePart::FlatTop);
    let origin = Vec2::new(paddle.x, paddle.y);

    // The flat top spans body and resting flippers, flush with the top edge
    let desc = BodyDesc::new(BodyKind::Kinematic, origin)
        .with_fixed_rotation(true)
        .with_fixture(solid(body, boxed(paddle.width / 2.0, paddle.height / 2.0)))
        .with_fixture(
            solid(
                flat_top,
                boxed(paddle.half_total_width(), FLAT_TOP_HALF_HEIGHT),
            )
            .with_offset(Vec2::new(0.0, paddle.height / 2.0 + FLAT_TOP_HALF_HEIGHT)),
        );
    world.create_body(body, &desc)?;

    let swing = tuning.flipper_swing_degrees.to_radians();
    let (fw, fh) = (paddle.flipper_width, paddle.flipper_height);
    for side in [FlipperSide::Left, FlipperSide::Right] {
        let entity = EntityRef::Paddle(PaddlePart::Flipper(side));
        let hinge = paddle.hinge_offset(side);
        // Flipper-local hinge: the inner top corner
        let (anchor, limits) = match side {
            FlipperSide::Left => (Vec2::new(fw / 2.0, fh / 2.0), [-swing, 0.0]),
            FlipperSide::Right => (Vec2::new(-fw / 2.0, fh / 2.0), [0.0, swing]),
        };
        let desc = BodyDesc::new(BodyKind::Dynamic, origin + hinge - anchor)
            .with_gravity_scale(tuning.flipper_rest_gravity)
            .with_fixture(solid(entity, boxed(fw / 2.0, fh / 2.0)).with_restitution(0.5));
        world.create_body(entity, &desc)?;
        world.create_revolute(body, entity, hinge, anchor, limits)?;
    }
    Ok(())
}

fn add_bricks(
    world: &mut PhysicsWorld,
    session: &GameSession,
    tuning: &Tuning,
) -> Result<(), WorldError> {
    for brick in session.bricks.iter().filter(|b| b.alive) {
        let entity = EntityRef::Brick(brick.id);
        world.create_body(
            entity,
            &BodyDesc::new(BodyKind::Fixed, brick.pos)
                .with_fixture(solid(entity, boxed(brick.width / 2.0, brick.height / 2.0))),
        )?;

        let Some(item) = &brick.bonus else { continue };
        let entity = EntityRef::BonusItem(brick.id);
        let half = item.size / 2.0;
        let mut desc = BodyDesc::new(BodyKind::Dynamic, item.pos)
            .with_gravity_scale(tuning.bonus_item_gravity)
            .with_fixed_rotation(true)
            .with_fixture(solid(entity, boxed(half, half)));
        if !item.is_alive() {
            desc = desc.disabled();
        }
        world.create_body(entity, &desc)?;
    }
    Ok(())
}

fn add_projectiles(world: &mut PhysicsWorld, session: &GameSession) -> Result<(), WorldError> {
    for kind in ProjectileKind::ALL {
        let entity = EntityRef::Projectile(kind);
        let spec = kind.spec();
        let mut desc = BodyDesc::new(BodyKind::Dynamic, Vec2::new(session.paddle.x, session.paddle.top()))
            .with_gravity_scale(0.0)
            .with_fixed_rotation(true)
            .with_ccd(true)
            .with_fixture(solid(entity, boxed(spec.width / 2.0, spec.height / 2.0)));
        if let Some(radius) = kind.blast_radius() {
            desc = desc.with_fixture(
                FixtureDesc::new(
                    Fixture::blast_sensor(entity),
                    Shape::Circle { radius },
                    filter_for(CollisionCategory::GenericSensor),
                )
                .as_sensor(),
            );
        }
        if !session.paddle.projectile(kind).alive {
            desc = desc.disabled();
        }
        world.create_body(entity, &desc)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelDescriptor;
    use crate::sim::entity::BrickId;

    fn session() -> (GameSession, Tuning) {
        let level = LevelDescriptor::from_json(
            r#"{ "levelNumber": 1, "ballTexture": "b", "vausTexture": "v",
                 "leftWallTexture": "l", "rightWallTexture": "r", "ceilingTexture": "c",
                 "bricks": [
                    { "positionX": 3.0, "positionY": 6.0, "bonusItem": "laser", "toughness": 1,
                      "textureFile": "t", "pointValue": 100 },
                    { "positionX": 4.0, "positionY": 6.0, "toughness": 1,
                      "textureFile": "t", "pointValue": 100 }
                 ] }"#,
        )
        .unwrap();
        let tuning = Tuning::default();
        (GameSession::new(&level, &tuning), tuning)
    }

    #[test]
    fn test_every_entity_gets_a_body() {
        let (session, tuning) = session();
        let world = build_world(&session, &tuning).unwrap();
        // 4 walls, ball, paddle, 2 flippers, 2 bricks, 1 item, 2 projectiles
        assert_eq!(world.body_count(), 13);
        assert!(world.has_body(EntityRef::Paddle(PaddlePart::FlatTop)));
        assert!(world.has_body(EntityRef::BonusItem(BrickId(1))));
        assert!(!world.has_body(EntityRef::BonusItem(BrickId(2))));
    }

    #[test]
    fn test_dormant_bodies_start_disabled() {
        let (session, tuning) = session();
        let world = build_world(&session, &tuning).unwrap();
        assert!(!world.is_enabled(EntityRef::BonusItem(BrickId(1))));
        assert!(!world.is_enabled(EntityRef::Projectile(ProjectileKind::Laser)));
        assert!(!world.is_enabled(EntityRef::Projectile(ProjectileKind::Bomb)));
        assert!(world.is_enabled(EntityRef::Brick(BrickId(1))));
        assert!(world.is_enabled(EntityRef::Ball));
    }

    #[test]
    fn test_degenerate_brick_is_rejected() {
        let (mut session, tuning) = session();
        let mut bricks: Vec<_> = session.bricks.iter().cloned().collect();
        bricks[1].width = 0.0;
        session.bricks = crate::sim::brick::BrickField::new(bricks);
        assert!(matches!(
            build_world(&session, &tuning),
            Err(WorldError::InvalidShape {
                entity: EntityRef::Brick(BrickId(2)),
                ..
            })
        ));
    }
}
