//! Physics-backed runs of the whole frame loop

use glam::Vec2;

use vaus_breaker::audio::{NullAudio, RecordingAudio, SoundEffect};
use vaus_breaker::level::LevelError;
use vaus_breaker::renderer::{RecordingRenderer, draw_frame};
use vaus_breaker::sim::{
    EntityRef, Game, GameError, GamePhase, Intent, PaddlePart, ProjectileKind, TickInput, tick,
};
use vaus_breaker::{LevelDescriptor, Tuning};

const LEVEL_1: &str = include_str!("../levels/level-1.json");

fn game() -> Game {
    Game::new(&LevelDescriptor::from_json(LEVEL_1).unwrap(), &Tuning::default()).unwrap()
}

#[test]
fn bundled_level_loads() {
    let level = LevelDescriptor::from_json(LEVEL_1).unwrap();
    assert_eq!(LevelDescriptor::file_name(level.level_number), "level-1.json");
    let game = Game::new(&level, &Tuning::default()).unwrap();
    assert_eq!(game.session.bricks.remaining(), level.destructible_count());
    assert_eq!(game.phase(), GamePhase::Playing);
}

#[test]
fn empty_level_is_rejected_at_start() {
    let mut level = LevelDescriptor::from_json(LEVEL_1).unwrap();
    level.bricks.clear();
    assert!(matches!(
        Game::new(&level, &Tuning::default()),
        Err(GameError::Level(LevelError::NoBricks))
    ));
}

#[test]
fn autopilot_keeps_ball_in_the_field() {
    let mut game = game();
    let tuning = Tuning::default();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let start = game.session.bricks.remaining();
    let mut audio = RecordingAudio::default();

    for _ in 0..1800 {
        tick(&mut game, &input, &mut audio);
        if game.phase() != GamePhase::Playing {
            break;
        }
        let pos = game.session.ball.pos;
        assert!(pos.x > 0.0 && pos.x < tuning.scene_width, "ball escaped: {pos:?}");
        assert!(pos.y > -1.0 && pos.y < tuning.scene_height, "ball escaped: {pos:?}");
    }

    assert!(game.session.bricks.remaining() <= start);
    assert_eq!(audio.count(SoundEffect::LevelStart), 1);
    assert!(game.responder.stats.begins > 0);
}

#[test]
fn paddle_settles_exactly_on_target() {
    let mut game = game();
    let target = 3.25;
    let input = TickInput::from_intents([Intent::MoveToX(target)]);
    for _ in 0..90 {
        tick(&mut game, &input, &mut NullAudio);
    }
    assert!((game.session.paddle.x - target).abs() < 1e-4);
    assert_eq!(
        game.world.velocity(EntityRef::Paddle(PaddlePart::Body)),
        Some(Vec2::ZERO)
    );
}

#[test]
fn fired_laser_climbs_and_is_drawn() {
    let mut game = game();
    game.session.paddle.equip(ProjectileKind::Laser);
    tick(
        &mut game,
        &TickInput::from_intents([Intent::FireWeapon]),
        &mut NullAudio,
    );
    let y0 = game.session.paddle.laser.pos.y;
    for _ in 0..10 {
        tick(&mut game, &TickInput::default(), &mut NullAudio);
    }
    let laser = &game.session.paddle.laser;
    assert!(laser.alive);
    assert!(laser.pos.y > y0 + 0.5);

    let mut sink = RecordingRenderer::default();
    draw_frame(&game, &mut sink, true);
    assert_eq!(sink.count(ProjectileKind::Laser.spec().texture), 1);
}
