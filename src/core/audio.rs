use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("playback failed to start: {0}")]
    PlaybackFailed(String),
    #[error("no audio output available")]
    Unavailable,
}

/// The slice of the track a round plays: start offset and optional hard end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cut {
    pub start_sec: f64,
    pub end_sec: Option<f64>,
}

impl Default for Cut {
    fn default() -> Self {
        Self {
            start_sec: 0.0,
            end_sec: None,
        }
    }
}

/// Playback control seam. The core never decodes or buffers audio; it only
/// starts, pauses, and polls the position of an externally owned track.
pub trait MusicSource {
    fn play(&mut self, start_sec: f64) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn position_sec(&self) -> f64;
}

/// Stand-in for songs without an audio track (or when playback is
/// unavailable). Rounds driven by this source complete on the note-bound
/// condition alone.
#[derive(Debug, Default)]
pub struct SilentMusic;

impl MusicSource for SilentMusic {
    fn play(&mut self, start_sec: f64) -> Result<(), AudioError> {
        info!("Silent round: no audio track, skipping play at {start_sec:.2}s");
        Ok(())
    }

    fn pause(&mut self) {}

    fn position_sec(&self) -> f64 {
        0.0
    }
}
