//! Draw commands and the sinks that consume them

/// One textured quad, centred on (x, y) in world units
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub texture: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Radians, counter-clockwise
    pub rotation: f32,
}

impl DrawCommand {
    pub fn new(texture: &str, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            texture: texture.to_string(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Where a HUD line is anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudSlot {
    TopLeft,
    TopRight,
    BottomLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HudText {
    pub slot: HudSlot,
    pub text: String,
}

/// Consumer of one frame's draw calls
pub trait RenderSink {
    fn draw(&mut self, command: DrawCommand);

    fn text(&mut self, text: HudText);

    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {}
}

/// Keeps the last frame (tests, headless inspection)
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
    pub texts: Vec<HudText>,
    pub frames: u64,
}

impl RecordingRenderer {
    pub fn textures(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(|c| c.texture.as_str())
    }

    pub fn count(&self, texture: &str) -> usize {
        self.textures().filter(|t| *t == texture).count()
    }

    pub fn text_in(&self, slot: HudSlot) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.slot == slot)
            .map(|t| t.text.as_str())
    }
}

impl RenderSink for RecordingRenderer {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn text(&mut self, text: HudText) {
        self.texts.push(text);
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
        self.texts.clear();
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

/// Logs a frame summary at trace level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer {
    draws: usize,
}

impl RenderSink for LogRenderer {
    fn draw(&mut self, _command: DrawCommand) {
        self.draws += 1;
    }

    fn text(&mut self, text: HudText) {
        log::trace!("hud {:?}: {}", text.slot, text.text);
    }

    fn begin_frame(&mut self) {
        self.draws = 0;
    }

    fn end_frame(&mut self) {
        log::trace!("frame: {} draw calls", self.draws);
    }
}
