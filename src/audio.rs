//! Sound effects and volume mixing
//!
//! The game only emits `(effect, volume)` requests, plus one looping music
//! track per level. Whatever actually makes noise sits behind [`AudioSink`];
//! [`Mixer`] applies the player's volume settings and drops effects whose
//! assets failed to load.

use std::collections::HashSet;

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball bounces off the paddle top
    BallPaddle,
    /// Ball hits a brick (doesn't break)
    BallBrick,
    /// Ball hits a flipper
    BallFlipper,
    /// Brick breaks
    BrickDestroyed,
    LaserBrick,
    LaserCeiling,
    BombBrick,
    BombCeiling,
    /// Ball reached the floor
    DeadBall,
    ExtraLife,
    /// Bonus item revealed from a broken brick
    BonusItemAppears,
    BonusItemObtained,
    FireLaser,
    FireBomb,
    FlipperMove,
    LevelStart,
    /// All destructible bricks cleared
    LevelEnd,
    GameOver,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 18] = [
        SoundEffect::BallPaddle,
        SoundEffect::BallBrick,
        SoundEffect::BallFlipper,
        SoundEffect::BrickDestroyed,
        SoundEffect::LaserBrick,
        SoundEffect::LaserCeiling,
        SoundEffect::BombBrick,
        SoundEffect::BombCeiling,
        SoundEffect::DeadBall,
        SoundEffect::ExtraLife,
        SoundEffect::BonusItemAppears,
        SoundEffect::BonusItemObtained,
        SoundEffect::FireLaser,
        SoundEffect::FireBomb,
        SoundEffect::FlipperMove,
        SoundEffect::LevelStart,
        SoundEffect::LevelEnd,
        SoundEffect::GameOver,
    ];

    /// Asset file backing this effect
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::BallPaddle => "ball_vaus_contact.wav",
            SoundEffect::BallBrick => "ball_brick_contact.wav",
            SoundEffect::BallFlipper => "ball_flipper_contact.wav",
            SoundEffect::BrickDestroyed => "brick_destroyed.wav",
            SoundEffect::LaserBrick => "laser_brick_contact.wav",
            SoundEffect::LaserCeiling => "laser_ceiling_contact.wav",
            SoundEffect::BombBrick => "bomb_brick_contact.wav",
            SoundEffect::BombCeiling => "bomb_ceiling_contact.wav",
            SoundEffect::DeadBall => "dead_ball.wav",
            SoundEffect::ExtraLife => "extra_life.wav",
            SoundEffect::BonusItemAppears => "bonus_item_appears.wav",
            SoundEffect::BonusItemObtained => "bonus_item_obtained.wav",
            SoundEffect::FireLaser => "fire_laser.wav",
            SoundEffect::FireBomb => "fire_bomb.wav",
            SoundEffect::FlipperMove => "flipper_move.wav",
            SoundEffect::LevelStart => "level_start.wav",
            SoundEffect::LevelEnd => "level_end.wav",
            SoundEffect::GameOver => "game_over.wav",
        }
    }

    /// Volume the game asks for before player settings apply
    pub fn base_volume(self) -> f32 {
        match self {
            SoundEffect::BallPaddle | SoundEffect::BrickDestroyed => 0.1,
            SoundEffect::FlipperMove => 0.3,
            SoundEffect::BallFlipper | SoundEffect::BonusItemAppears => 0.5,
            _ => 1.0,
        }
    }
}

/// Fire-and-forget sound output
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Start looping a background track, replacing whatever was playing
    fn play_music(&mut self, _track: &str, _volume: f32) {}

    /// Play at the effect's base volume
    fn cue(&mut self, effect: SoundEffect) {
        self.play(effect, effect.base_volume());
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Keeps every request, in order
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<(SoundEffect, f32)>,
    pub music: Vec<(String, f32)>,
}

impl RecordingAudio {
    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.iter().filter(|(e, _)| *e == effect).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played.push((effect, volume));
    }

    fn play_music(&mut self, track: &str, volume: f32) {
        self.music.push((track.to_string(), volume));
    }
}

/// Logs each request at trace level (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::trace!("sfx {} @ {volume:.2}", effect.file_name());
    }

    fn play_music(&mut self, track: &str, volume: f32) {
        log::info!("music {track} @ {volume:.2}");
    }
}

/// Applies player volume settings in front of another sink
#[derive(Debug)]
pub struct Mixer<S> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    unavailable: HashSet<SoundEffect>,
}

impl<S: AudioSink> Mixer<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        let mut mixer = Self {
            sink,
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,
            unavailable: HashSet::new(),
        };
        mixer.apply_settings(settings);
        mixer
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_music_volume(settings.music_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music volume (respects mute)
    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Stop forwarding an effect whose asset couldn't be loaded
    pub fn mark_unavailable(&mut self, effect: SoundEffect, reason: &str) {
        log::warn!(
            "Sound effect {} unavailable: {reason}",
            effect.file_name()
        );
        self.unavailable.insert(effect);
    }

    pub fn is_available(&self, effect: SoundEffect) -> bool {
        !self.unavailable.contains(&effect)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S: AudioSink> AudioSink for Mixer<S> {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        if !self.is_available(effect) {
            return;
        }
        let vol = volume * self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    fn play_music(&mut self, track: &str, volume: f32) {
        let vol = volume * self.effective_music_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play_music(track, vol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_unique() {
        let names: HashSet<_> = SoundEffect::ALL.iter().map(|e| e.file_name()).collect();
        assert_eq!(names.len(), SoundEffect::ALL.len());
    }

    #[test]
    fn test_mixer_scales_volume() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        let mut mixer = Mixer::new(RecordingAudio::default(), &settings);
        mixer.cue(SoundEffect::BallBrick);
        let played = &mixer.sink().played;
        assert_eq!(played.len(), 1);
        assert!((played[0].1 - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_muted_mixer_is_silent() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let mut mixer = Mixer::new(RecordingAudio::default(), &settings);
        mixer.cue(SoundEffect::DeadBall);
        assert!(mixer.into_inner().played.is_empty());
    }

    #[test]
    fn test_unavailable_effect_skipped() {
        let mut mixer = Mixer::new(RecordingAudio::default(), &Settings::default());
        mixer.mark_unavailable(SoundEffect::FireBomb, "file not found");
        mixer.cue(SoundEffect::FireBomb);
        mixer.cue(SoundEffect::FireLaser);
        let sink = mixer.into_inner();
        assert_eq!(sink.count(SoundEffect::FireBomb), 0);
        assert_eq!(sink.count(SoundEffect::FireLaser), 1);
    }

    #[test]
    fn test_music_uses_music_volume() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.4,
            sfx_volume: 0.0,
            ..Settings::default()
        };
        let mut mixer = Mixer::new(RecordingAudio::default(), &settings);
        mixer.play_music("level1.ogg", 1.0);
        let sink = mixer.sink();
        assert_eq!(sink.music.len(), 1);
        assert_eq!(sink.music[0].0, "level1.ogg");
        assert!((sink.music[0].1 - 0.2).abs() < 1e-6);

        mixer.set_muted(true);
        mixer.play_music("level1.ogg", 1.0);
        assert_eq!(mixer.into_inner().music.len(), 1);
    }
}
