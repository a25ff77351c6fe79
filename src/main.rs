//! Vaus Breaker - headless native runner
//!
//! Loads a level (or the bundled demo level) and plays it, sending draw calls
//! and sound cues to logging sinks. With no input device attached, the
//! paddle only moves when the autopilot is on (`--autopilot` or the
//! `idle_mode` setting).
//!
//! Example:
//!   RUST_LOG=debug cargo run -- --level levels/level-1.json --frames 3600 --autopilot

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use vaus_breaker::audio::{LogAudio, Mixer};
use vaus_breaker::consts::{MAX_SUBSTEPS, SIM_DT};
use vaus_breaker::renderer::{LogRenderer, draw_frame};
use vaus_breaker::sim::{Game, GamePhase, TickInput, tick};
use vaus_breaker::{LevelDescriptor, Settings, Tuning};

const BUNDLED_LEVEL: &str = include_str!("../levels/level-1.json");

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a brick-breaker level on autopilot", long_about = None)]
struct Args {
    /// Level file; the bundled level 1 when omitted
    #[arg(long)]
    level: Option<PathBuf>,
    /// Tuning overrides (JSON)
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Player settings (JSON); missing file means defaults
    #[arg(long, default_value = "settings.json")]
    settings: PathBuf,
    /// Rendered frames to run
    #[arg(long, default_value_t = 3600)]
    frames: u32,
    /// Wall-clock length of one rendered frame, in seconds
    #[arg(long, default_value_t = SIM_DT)]
    frame_time: f32,
    /// Let the autopilot play even when the settings say otherwise
    #[arg(long)]
    autopilot: bool,
}

/// Fixed-step driver: rendered frames feed an accumulator that runs whole ticks
struct Runner {
    game: Game,
    accumulator: f32,
    input: TickInput,
}

impl Runner {
    fn update(&mut self, dt: f32, audio: &mut Mixer<LogAudio>) {
        self.accumulator += dt.min(0.1);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.game, &self.input, audio);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let level = match &args.level {
        Some(path) => LevelDescriptor::load(path)
            .with_context(|| format!("load level {}", path.display()))?,
        None => LevelDescriptor::from_json(BUNDLED_LEVEL).context("parse bundled level")?,
    };
    let tuning = match &args.tuning {
        Some(path) => {
            Tuning::load(path).with_context(|| format!("load tuning {}", path.display()))?
        }
        None => Tuning::default(),
    };
    let settings = Settings::load(&args.settings)
        .with_context(|| format!("load settings {}", args.settings.display()))?;

    log::info!("Vaus Breaker (native) starting level {}", level.level_number);
    let mut audio = Mixer::new(LogAudio, &settings);
    let mut renderer = LogRenderer::default();
    let mut runner = Runner {
        game: Game::new(&level, &tuning).context("start level")?,
        accumulator: 0.0,
        input: TickInput {
            idle_mode: args.autopilot || settings.idle_mode,
            ..Default::default()
        },
    };
    if !runner.input.idle_mode {
        log::warn!("Autopilot off and no input attached; the paddle will stay put");
    }

    for frame in 0..args.frames {
        runner.update(args.frame_time, &mut audio);
        draw_frame(&runner.game, &mut renderer, settings.show_hud);
        if matches!(
            runner.game.phase(),
            GamePhase::LevelCleared | GamePhase::GameOver
        ) {
            log::info!("Stopped after {} frames", frame + 1);
            break;
        }
    }

    let session = &runner.game.session;
    let stats = runner.game.responder.stats;
    println!(
        "{:?}: score {}, lives {}, bricks remaining {}",
        session.phase,
        session.score,
        session.lives,
        session.bricks.remaining()
    );
    println!(
        "contacts: {} begins, {} ends, {} resolved ({} unrouted)",
        stats.begins, stats.ends, stats.resolved, stats.ignored
    );
    Ok(())
}
