//! Level descriptors
//!
//! Levels are JSON files named `level-N.json`. A level that fails to parse or
//! validate is rejected as a whole; the only tolerated oddity is an unknown
//! bonus item string, which degrades to no item.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::brick::BonusKind;

/// One brick as written in a level file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickDescriptor {
    pub position_x: f32,
    pub position_y: f32,
    #[serde(default = "default_bonus")]
    pub bonus_item: String,
    pub toughness: i32,
    #[serde(default)]
    pub is_indestructible: bool,
    pub texture_file: String,
    pub point_value: u32,
    /// Size overrides; the tuning's brick size applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

fn default_bonus() -> String {
    "none".to_string()
}

impl BrickDescriptor {
    /// Bonus kind, with unknown strings treated as no item
    pub fn bonus_kind(&self) -> BonusKind {
        BonusKind::parse(&self.bonus_item).unwrap_or_else(|| {
            log::warn!(
                "Unknown bonus item {:?} at ({}, {}), using none",
                self.bonus_item,
                self.position_x,
                self.position_y
            );
            BonusKind::None
        })
    }
}

/// A whole level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescriptor {
    pub level_number: u32,
    #[serde(default)]
    pub level_background_music: String,
    #[serde(default)]
    pub background_texture: String,
    pub ball_texture: String,
    pub vaus_texture: String,
    pub left_wall_texture: String,
    pub right_wall_texture: String,
    pub ceiling_texture: String,
    pub bricks: Vec<BrickDescriptor>,
}

/// Level loading errors
#[derive(Debug)]
pub enum LevelError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    NoBricks,
    InvalidBrick { index: usize, reason: String },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Io { path, source } => {
                write!(f, "cannot read level {}: {source}", path.display())
            }
            LevelError::Parse(e) => write!(f, "malformed level descriptor: {e}"),
            LevelError::NoBricks => write!(f, "level has no bricks"),
            LevelError::InvalidBrick { index, reason } => {
                write!(f, "brick #{index} is invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Io { source, .. } => Some(source),
            LevelError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::Parse(e)
    }
}

impl LevelDescriptor {
    /// Parse and validate a level
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelDescriptor = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({} bricks) from {}",
            level.level_number,
            level.bricks.len(),
            path.display()
        );
        Ok(level)
    }

    /// File name of level `n`
    pub fn file_name(n: u32) -> String {
        format!("level-{n}.json")
    }

    /// Load level `n` from a directory of level files
    pub fn load_numbered(dir: &Path, n: u32) -> Result<Self, LevelError> {
        Self::load(&dir.join(Self::file_name(n)))
    }

    /// Reject layouts the game can't be played with
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.bricks.is_empty() {
            return Err(LevelError::NoBricks);
        }
        for (index, b) in self.bricks.iter().enumerate() {
            let invalid = |reason: &str| LevelError::InvalidBrick {
                index,
                reason: reason.to_string(),
            };
            if !b.position_x.is_finite() || !b.position_y.is_finite() {
                return Err(invalid("position is not finite"));
            }
            if !b.is_indestructible && b.toughness <= 0 {
                return Err(invalid("toughness must be positive"));
            }
            if b.width.is_some_and(|w| !(w > 0.0)) || b.height.is_some_and(|h| !(h > 0.0)) {
                return Err(invalid("size must be positive"));
            }
        }
        Ok(())
    }

    /// Destructible bricks in the layout
    pub fn destructible_count(&self) -> usize {
        self.bricks.iter().filter(|b| !b.is_indestructible).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "levelNumber": 1,
        "levelBackgroundMusic": "level1.ogg",
        "ballTexture": "ball.png",
        "vausTexture": "vaus.png",
        "leftWallTexture": "wall_left.png",
        "rightWallTexture": "wall_right.png",
        "ceilingTexture": "ceiling.png",
        "bricks": [
            { "positionX": 2.0, "positionY": 6.0, "bonusItem": "laser", "toughness": 1,
              "isIndestructible": false, "textureFile": "brick_red.png", "pointValue": 100 },
            { "positionX": 3.0, "positionY": 6.0, "bonusItem": "rocket", "toughness": 2,
              "isIndestructible": false, "textureFile": "brick_blue.png", "pointValue": 200 },
            { "positionX": 4.0, "positionY": 6.0, "toughness": 0,
              "isIndestructible": true, "textureFile": "brick_gold.png", "pointValue": 0 }
        ]
    }"#;

    #[test]
    fn test_parse_level() {
        let level = LevelDescriptor::from_json(LEVEL).unwrap();
        assert_eq!(level.level_number, 1);
        assert_eq!(level.bricks.len(), 3);
        assert_eq!(level.bricks[0].bonus_kind(), BonusKind::Laser);
        assert_eq!(level.bricks[2].bonus_item, "none");
        assert_eq!(level.destructible_count(), 2);
    }

    #[test]
    fn test_unknown_bonus_falls_back_to_none() {
        let level = LevelDescriptor::from_json(LEVEL).unwrap();
        assert_eq!(level.bricks[1].bonus_kind(), BonusKind::None);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = LevelDescriptor::from_json("{ \"levelNumber\": 1 ").unwrap_err();
        assert!(matches!(err, LevelError::Parse(_)));
    }

    #[test]
    fn test_empty_level_rejected() {
        let json = LEVEL.replace(
            &LEVEL[LEVEL.find("\"bricks\"").unwrap()..LEVEL.rfind('}').unwrap()],
            "\"bricks\": []\n",
        );
        assert!(matches!(
            LevelDescriptor::from_json(&json),
            Err(LevelError::NoBricks)
        ));
    }

    #[test]
    fn test_zero_toughness_rejected_unless_indestructible() {
        let json = LEVEL.replace("\"toughness\": 2", "\"toughness\": 0");
        match LevelDescriptor::from_json(&json) {
            Err(LevelError::InvalidBrick { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected invalid brick, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LevelDescriptor::load_numbered(Path::new("/nonexistent"), 7).unwrap_err();
        assert!(matches!(err, LevelError::Io { .. }));
        assert!(err.to_string().contains("level-7.json"));
    }
}
