use crate::config::LANES;
use crate::core::audio::Cut;
use crate::core::input::Lane;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SongError {
    #[error("song '{id}': lane pattern is empty")]
    EmptyPattern { id: String },
    #[error("song '{id}': bpm must be positive (got {bpm})")]
    NonPositiveBpm { id: String, bpm: f64 },
    #[error("song '{id}': lead-in must be positive (got {lead_in})")]
    NonPositiveLeadIn { id: String, lead_in: f64 },
    #[error("song '{id}': lane {lane} out of range")]
    LaneOutOfRange { id: String, lane: u8 },
    #[error("failed to read song library '{path}': {source}")]
    LibraryRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse song library '{path}': {source}")]
    LibraryParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Authored song descriptor. Notes fall on every beat starting `lead_in_sec`
/// into the round, cycling through `lane_pattern`.
#[derive(Clone, Debug, Deserialize)]
pub struct SongData {
    pub id: String,
    pub title: String,
    pub bpm: f64,
    pub note_count: usize,
    pub lead_in_sec: f64,
    pub lane_pattern: Vec<u8>,
    #[serde(default)]
    pub audio_path: Option<PathBuf>,
    #[serde(default)]
    pub audio_start_sec: f64,
    #[serde(default)]
    pub audio_end_sec: Option<f64>,
}

impl SongData {
    pub fn validate(&self) -> Result<(), SongError> {
        if self.bpm <= 0.0 {
            return Err(SongError::NonPositiveBpm {
                id: self.id.clone(),
                bpm: self.bpm,
            });
        }
        if self.lead_in_sec <= 0.0 {
            return Err(SongError::NonPositiveLeadIn {
                id: self.id.clone(),
                lead_in: self.lead_in_sec,
            });
        }
        if self.lane_pattern.is_empty() {
            return Err(SongError::EmptyPattern {
                id: self.id.clone(),
            });
        }
        if let Some(&lane) = self.lane_pattern.iter().find(|&&l| l as usize >= LANES) {
            return Err(SongError::LaneOutOfRange {
                id: self.id.clone(),
                lane,
            });
        }
        Ok(())
    }

    /// Validated lane pattern. The chart builder cycles this by modulo index.
    pub fn lanes(&self) -> Result<Vec<Lane>, SongError> {
        self.validate()?;
        Ok(self
            .lane_pattern
            .iter()
            .filter_map(|&l| Lane::from_index(l as usize))
            .collect())
    }

    pub fn beat_interval_sec(&self) -> f64 {
        60.0 / self.bpm
    }

    pub fn audio_cut(&self) -> Cut {
        Cut {
            start_sec: self.audio_start_sec,
            end_sec: self.audio_end_sec,
        }
    }
}

/// Demo songs shipped with the engine, used when no library file is given.
pub fn builtin_songs() -> Vec<SongData> {
    vec![
        SongData {
            id: "demo-120".into(),
            title: "Demo - 120 BPM".into(),
            bpm: 120.0,
            note_count: 32,
            lead_in_sec: 2.0,
            lane_pattern: vec![0, 1, 2, 3, 2, 1, 0, 3],
            audio_path: None,
            audio_start_sec: 0.0,
            audio_end_sec: None,
        },
        SongData {
            id: "demo-140".into(),
            title: "Demo - 140 BPM".into(),
            bpm: 140.0,
            note_count: 40,
            lead_in_sec: 2.0,
            lane_pattern: vec![0, 2, 1, 3, 3, 1, 2, 0],
            audio_path: None,
            audio_start_sec: 0.0,
            audio_end_sec: None,
        },
    ]
}

/// Loads and validates a JSON song library (an array of descriptors).
/// Rejects the whole file on the first invalid descriptor.
pub fn load_library(path: &Path) -> Result<Vec<SongData>, SongError> {
    let raw = fs::read_to_string(path).map_err(|source| SongError::LibraryRead {
        path: path.to_path_buf(),
        source,
    })?;
    let songs: Vec<SongData> =
        serde_json::from_str(&raw).map_err(|source| SongError::LibraryParse {
            path: path.to_path_buf(),
            source,
        })?;
    for song in &songs {
        song.validate()?;
    }
    info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}
