//! Rendering front end
//!
//! The game never talks to a graphics API. Each frame it emits textured-quad
//! draw commands and HUD text into a [`RenderSink`].

pub mod command;
pub mod shapes;

pub use command::{DrawCommand, HudSlot, HudText, LogRenderer, RecordingRenderer, RenderSink};
pub use shapes::{Draw, draw_frame, hud_lines};
