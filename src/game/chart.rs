use crate::core::input::Lane;
use crate::game::song::{SongData, SongError};

/// One scheduled note: the instant it should cross the hit-line, and its lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartNote {
    pub time_sec: f64,
    pub lane: Lane,
}

/// Builds the full note schedule for a song: `note_count` notes, one beat
/// apart, starting after the lead-in, cycling the lane pattern. Deterministic;
/// rejects malformed descriptors without producing a partial chart.
pub fn build_chart(song: &SongData) -> Result<Vec<ChartNote>, SongError> {
    let lanes = song.lanes()?;
    let beat = song.beat_interval_sec();
    Ok((0..song.note_count)
        .map(|i| ChartNote {
            time_sec: song.lead_in_sec + i as f64 * beat,
            lane: lanes[i % lanes.len()],
        })
        .collect())
}

/// Scheduled time of the last note, or 0 for an empty chart. Charts are
/// ascending by construction, so this is the maximum.
pub fn last_note_time(chart: &[ChartNote]) -> f64 {
    chart.last().map_or(0.0, |n| n.time_sec)
}
