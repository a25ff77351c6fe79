//! Contact rules applied to the world's actual rebounds, not to the
//! incoming velocity

use glam::Vec2;

use vaus_breaker::audio::NullAudio;
use vaus_breaker::sim::{BrickId, EntityRef, Game, TickInput, tick};
use vaus_breaker::{LevelDescriptor, Tuning};

fn game_with_brick(x: f32, y: f32) -> Game {
    let json = format!(
        r#"{{ "levelNumber": 1, "ballTexture": "ball.png", "vausTexture": "vaus.png",
             "leftWallTexture": "l.png", "rightWallTexture": "r.png", "ceilingTexture": "c.png",
             "bricks": [ {{ "positionX": {x}, "positionY": {y}, "toughness": 3,
                           "textureFile": "brick.png", "pointValue": 100 }} ] }}"#
    );
    Game::new(&LevelDescriptor::from_json(&json).unwrap(), &Tuning::default()).unwrap()
}

fn launch(game: &mut Game, pos: Vec2, vel: Vec2) {
    game.session.ball.pos = pos;
    game.session.ball.vel = vel;
    game.world.set_position(EntityRef::Ball, pos);
    game.world.set_velocity(EntityRef::Ball, vel);
}

fn toughness(game: &Game) -> i32 {
    game.session.bricks.get(BrickId(1)).unwrap().toughness
}

/// Tick until the brick takes its hit, returning the ball velocity seen by
/// the frame that applied it together with the velocity just before
fn tick_until_brick_hit(game: &mut Game) -> (Vec2, Vec2) {
    let start = toughness(game);
    for _ in 0..120 {
        let before = game.session.ball.vel;
        tick(game, &TickInput::default(), &mut NullAudio);
        if toughness(game) < start {
            return (before, game.session.ball.vel);
        }
    }
    panic!("ball never reached the brick");
}

#[test]
fn near_horizontal_hit_is_guarded_after_the_rebound() {
    let mut game = game_with_brick(8.0, 4.0);
    let bounds = game.session.ball.bounds;
    let incoming = Vec2::new(3.95, 0.56).normalize() * bounds.speed;
    launch(&mut game, Vec2::new(7.0, 3.96), incoming);

    let (before, after) = tick_until_brick_hit(&mut game);
    assert!(before.x > 0.0, "hit applied before the ball arrived: {before:?}");

    // Bounced back off the brick's face, clamped, and climbing like it came in
    assert_eq!(after.x, -bounds.max_vx);
    assert!((after.y - bounds.vy_at_max_vx).abs() < 1e-4, "vy = {}", after.y);
    assert_eq!(game.world.velocity(EntityRef::Ball), Some(after));

    // The world keeps the guarded velocity on the next step
    tick(&mut game, &TickInput::default(), &mut NullAudio);
    let next = game.session.ball.vel;
    assert!(next.x < 0.0 && next.y > 0.0, "{next:?}");
    assert_eq!(toughness(&game), 2);
}

#[test]
fn straight_hit_from_below_sends_ball_down() {
    let mut game = game_with_brick(8.0, 4.0);
    let vy = (16.0f32 - 1.0).sqrt();
    launch(&mut game, Vec2::new(7.9, 3.0), Vec2::new(1.0, vy));

    let (before, after) = tick_until_brick_hit(&mut game);
    assert!(before.y > 0.0);
    assert!(after.y < -3.8, "brick hit should leave downward, got {after:?}");
    assert!((after.length() - 4.0).abs() < 1e-3);
}

#[test]
fn paddle_bounce_is_steered_on_the_way_up() {
    let mut game = game_with_brick(2.0, 6.0);
    let paddle_x = game.session.paddle.x;
    let top = game.session.paddle.top();
    let radius = game.session.ball.radius;
    launch(
        &mut game,
        Vec2::new(paddle_x, top + radius + 0.5),
        Vec2::new(0.3, -(16.0f32 - 0.09).sqrt()),
    );

    let mut resolved = None;
    for _ in 0..60 {
        let before = game.responder.stats.resolved;
        tick(&mut game, &TickInput::default(), &mut NullAudio);
        if game.responder.stats.resolved > before {
            resolved = Some(game.session.ball.vel);
            break;
        }
    }
    let vel = resolved.expect("paddle contact never resolved");
    assert!(vel.y > 0.0, "resolved while still falling: {vel:?}");
    assert!((vel.length() - 4.0).abs() < 1e-3);
}
