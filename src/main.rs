use log::{info, LevelFilter};
use notefall::game::session::Round;
use notefall::game::song;
use notefall::{LaneTracker, Phase, Rotation};
use std::error::Error;
use std::path::Path;

// Scripted press errors, cycled over the chart: two perfects, a good, an
// early perfect.
const REPLAY_OFFSETS: [f64; 4] = [0.0, 0.03, 0.10, -0.02];
const TICK_STEP: f64 = 1.0 / 120.0;
const REPLAY_DEADLINE_SEC: f64 = 600.0;

/// Headless replay driver: runs a scripted two-player session against the
/// first song of the library, logging every judgement and the final standings.
/// Useful for exercising the timing core without a display surface.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .init();

    let songs = match std::env::args().nth(1) {
        Some(path) => song::load_library(Path::new(&path))?,
        None => song::builtin_songs(),
    };
    let Some(song) = songs.first().cloned() else {
        return Err("song library is empty".into());
    };
    info!("Replaying '{}' ({} notes)", song.title, song.note_count);

    let mut rotation = Rotation::new(["Player 1", "Player 2"]);
    let mut round = Round::silent(song)?;
    let mut tracker = LaneTracker::default();
    let mut now = 0.0;

    while let Some(player) = rotation.active_player().map(str::to_owned) {
        round.begin(Some(player.as_str()));
        tracker.clear();
        let schedule: Vec<_> = round
            .snapshot()
            .notes
            .iter()
            .map(|n| (n.time_sec, n.lane))
            .collect();
        let mut next = 0;

        let score = loop {
            now += TICK_STEP;
            if now > REPLAY_DEADLINE_SEC {
                return Err("replay deadline exceeded".into());
            }
            let report = round.tick(now);
            if let Some(score) = report.finished {
                break score;
            }
            if round.snapshot().phase != Phase::Running {
                continue;
            }
            let game_time = round.snapshot().game_time_sec;
            while next < schedule.len() {
                let (time_sec, lane) = schedule[next];
                if game_time < time_sec + REPLAY_OFFSETS[next % REPLAY_OFFSETS.len()] {
                    break;
                }
                // Go through the key tracker so the replay exercises the same
                // edge filtering a live keyboard would.
                let key = tracker.bindings().key(lane);
                if let Some(edge) = tracker.handle_key(key, true) {
                    round.press(edge.lane);
                }
                tracker.handle_key(key, false);
                next += 1;
            }
        };
        rotation.record_score(score);
    }

    round.set_session_finished(true);
    for player in rotation.players() {
        info!(
            "{}: {}",
            player.name,
            player.score.map_or_else(|| "-".into(), |s| s.to_string())
        );
    }
    if let Some(winner) = rotation.winner() {
        info!("Winner: {}", winner.name);
    }
    Ok(())
}
