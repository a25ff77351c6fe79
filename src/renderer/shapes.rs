//! Draw-call generation for the game scene

use super::command::{DrawCommand, HudSlot, HudText, RenderSink};
use crate::sim::state::LevelTextures;
use crate::sim::{Ball, BonusItem, Brick, Flipper, Game, GamePhase, Paddle, Projectile};
use crate::tuning::Tuning;

/// Draw capability shared by every visible entity
pub trait Draw {
    /// Emit this entity's draw calls; hidden entities emit nothing.
    /// `textures` supplies the level's texture ids for scenery-skinned entities.
    fn draw(&self, textures: &LevelTextures, sink: &mut dyn RenderSink);
}

impl Draw for Ball {
    fn draw(&self, textures: &LevelTextures, sink: &mut dyn RenderSink) {
        let d = self.radius * 2.0;
        sink.draw(DrawCommand::new(&textures.ball, self.pos.x, self.pos.y, d, d));
    }
}

impl Draw for Brick {
    fn draw(&self, _textures: &LevelTextures, sink: &mut dyn RenderSink) {
        if self.alive {
            sink.draw(DrawCommand::new(
                &self.texture,
                self.pos.x,
                self.pos.y,
                self.width,
                self.height,
            ));
        }
    }
}

impl Draw for BonusItem {
    fn draw(&self, _textures: &LevelTextures, sink: &mut dyn RenderSink) {
        if self.is_alive() {
            sink.draw(DrawCommand::new(
                self.kind.texture(),
                self.pos.x,
                self.pos.y,
                self.size,
                self.size,
            ));
        }
    }
}

impl Draw for Projectile {
    fn draw(&self, _textures: &LevelTextures, sink: &mut dyn RenderSink) {
        if self.alive {
            let spec = self.kind.spec();
            sink.draw(DrawCommand::new(
                spec.texture,
                self.pos.x,
                self.pos.y,
                spec.width,
                spec.height,
            ));
        }
    }
}

impl Draw for Paddle {
    fn draw(&self, textures: &LevelTextures, sink: &mut dyn RenderSink) {
        let texture = &textures.paddle;
        sink.draw(DrawCommand::new(texture, self.x, self.y, self.width, self.height));
        for flipper in [&self.left, &self.right] {
            draw_flipper(flipper, self, texture, sink);
        }
        self.laser.draw(textures, sink);
        self.bomb.draw(textures, sink);
    }
}

fn draw_flipper(flipper: &Flipper, paddle: &Paddle, texture: &str, sink: &mut dyn RenderSink) {
    sink.draw(
        DrawCommand::new(
            texture,
            flipper.pos.x,
            flipper.pos.y,
            paddle.flipper_width,
            paddle.flipper_height,
        )
        .rotated(flipper.angle),
    );
}

fn draw_scenery(textures: &LevelTextures, tuning: &Tuning, sink: &mut dyn RenderSink) {
    let (w, h, t) = (tuning.scene_width, tuning.scene_height, tuning.wall_thickness);
    if !textures.background.is_empty() {
        sink.draw(DrawCommand::new(&textures.background, w / 2.0, h / 2.0, w, h));
    }
    sink.draw(DrawCommand::new(&textures.left_wall, t / 2.0, h / 2.0, t, h));
    sink.draw(DrawCommand::new(&textures.right_wall, w - t / 2.0, h / 2.0, t, h));
    sink.draw(DrawCommand::new(&textures.ceiling, w / 2.0, h - t / 2.0, w, t));
}

/// HUD lines for the current session
pub fn hud_lines(game: &Game) -> Vec<HudText> {
    let session = &game.session;
    let mut lines = vec![
        HudText {
            slot: HudSlot::TopLeft,
            text: format!("SCORE {}", session.score),
        },
        HudText {
            slot: HudSlot::TopRight,
            text: format!("LIVES {}", session.lives),
        },
    ];
    if let Some((kind, shots)) = session.paddle.armed() {
        lines.push(HudText {
            slot: HudSlot::BottomLeft,
            text: format!("{} x{shots}", kind.name()),
        });
    }
    let banner = match session.phase {
        GamePhase::LevelCleared => Some("LEVEL CLEARED"),
        GamePhase::GameOver => Some("GAME OVER"),
        GamePhase::Paused => Some("PAUSED"),
        GamePhase::Playing => None,
    };
    if let Some(banner) = banner {
        lines.push(HudText {
            slot: HudSlot::Center,
            text: banner.to_string(),
        });
    }
    lines
}

/// Emit one whole frame, back to front, then the HUD
pub fn draw_frame(game: &Game, sink: &mut dyn RenderSink, show_hud: bool) {
    let session = &game.session;
    sink.begin_frame();

    let textures = &session.textures;
    draw_scenery(textures, game.tuning(), sink);
    for brick in session.bricks.iter() {
        brick.draw(textures, sink);
    }
    for (_, item) in session.bricks.falling_items() {
        item.draw(textures, sink);
    }
    session.ball.draw(textures, sink);
    session.paddle.draw(textures, sink);

    if show_hud {
        for line in hud_lines(game) {
            sink.text(line);
        }
    }
    sink.end_frame();
}
