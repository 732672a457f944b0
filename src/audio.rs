use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source, source::Buffered};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::config::AudioConfig;
use crate::session::GameEvent;

type SoundBuffer = Buffered<Decoder<BufReader<File>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Shoot,
    Explosion,
    GameOver,
}

impl Sound {
    /// Cues for a game event, in play order
    pub fn for_event(event: &GameEvent) -> &'static [Sound] {
        match event {
            GameEvent::Shot => &[Sound::Shoot],
            GameEvent::EnemyDestroyed { .. } => &[Sound::Explosion],
            GameEvent::GameOver { .. } => &[Sound::Explosion, Sound::GameOver],
            GameEvent::EnemyEscaped | GameEvent::LevelUp { .. } => &[],
        }
    }
}

/// Audio manager for playing sound effects.
///
/// Every cue is optional: a missing file, an undecodable file or no output
/// device just means that cue stays silent.
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
    shoot: Option<SoundBuffer>,
    explosion: Option<SoundBuffer>,
    game_over: Option<SoundBuffer>,
    volume: f32,
}

impl AudioManager {
    /// Opens the default output device and pre-loads all cues
    pub fn new(config: &AudioConfig) -> Self {
        if !config.enabled {
            log::info!("Audio disabled by configuration");
            return Self::silent();
        }

        let output = match OutputStream::try_default() {
            Ok(output) => output,
            Err(err) => {
                log::warn!("No audio output available, continuing without sound: {}", err);
                return Self::silent();
            }
        };

        Self {
            output: Some(output),
            shoot: load_sound(&config.shoot),
            explosion: load_sound(&config.explosion),
            game_over: load_sound(&config.game_over),
            volume: config.volume.clamp(0.0, 1.0),
        }
    }

    /// An audio manager that plays nothing
    pub fn silent() -> Self {
        Self {
            output: None,
            shoot: None,
            explosion: None,
            game_over: None,
            volume: 0.0,
        }
    }

    pub fn is_silent(&self) -> bool {
        self.output.is_none()
    }

    fn buffer(&self, sound: Sound) -> Option<&SoundBuffer> {
        match sound {
            Sound::Shoot => self.shoot.as_ref(),
            Sound::Explosion => self.explosion.as_ref(),
            Sound::GameOver => self.game_over.as_ref(),
        }
    }

    /// Fire-and-forget playback; never fails
    pub fn play(&self, sound: Sound) {
        let (Some((_, handle)), Some(buffer)) = (&self.output, self.buffer(sound)) else {
            return;
        };
        // Ignore errors for sound playback - don't want to crash the game
        if let Ok(sink) = Sink::try_new(handle) {
            sink.set_volume(self.volume);
            // Clone the buffered source (fast - just clones references)
            sink.append(buffer.clone());
            sink.detach();
        }
    }

    pub fn handle_event(&self, event: &GameEvent) {
        for sound in Sound::for_event(event) {
            self.play(*sound);
        }
    }
}

fn load_sound(path: &Path) -> Option<SoundBuffer> {
    match try_load_sound(path) {
        Ok(sound) => Some(sound),
        Err(err) => {
            log::warn!("Sound unavailable, playing silence instead: {:#}", err);
            None
        }
    }
}

fn try_load_sound(path: &Path) -> Result<SoundBuffer> {
    let file =
        File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .wrap_err_with(|| format!("failed to decode {}", path.display()))?;
    Ok(source.buffered())
}
