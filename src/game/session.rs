use crate::config::{END_MARGIN, LATE_WINDOW};
use crate::core::audio::{Cut, MusicSource, SilentMusic};
use crate::core::input::Lane;
use crate::game::chart::{self, ChartNote};
use crate::game::clock::{ClockTransition, Phase, SessionClock};
use crate::game::judgment::{
    judge_lane_press, mark_late_misses, Feedback, JudgmentResult, Scorekeeper,
};
use crate::game::note::{NoteField, RuntimeNote};
use crate::game::song::{SongData, SongError};
use log::{info, warn};

/// What one tick produced, for the host and the presentation layer.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Notes the passive sweep resolved as misses this tick.
    pub misses: Vec<JudgmentResult>,
    /// Set exactly once per round, on the tick the round completed, carrying
    /// the final score.
    pub finished: Option<u32>,
}

/// Read-only view of the round, taken once per tick by the presentation
/// layer. Everything a renderer needs; nothing it can mutate.
pub struct RoundSnapshot<'a> {
    pub phase: Phase,
    pub prepare_remaining_sec: Option<f64>,
    pub countdown_display: Option<u32>,
    pub game_time_sec: f64,
    pub score: u32,
    pub combo: u32,
    pub notes: &'a [RuntimeNote],
    pub feedback: Option<&'a Feedback>,
    pub active_player: Option<&'a str>,
}

/// One player's round against one song: the note field, scorekeeper, clock,
/// and audio collaborator, glued together by a per-frame tick.
pub struct Round {
    song: SongData,
    chart: Vec<ChartNote>,
    last_note_time: f64,
    notes: NoteField,
    keeper: Scorekeeper,
    clock: SessionClock,
    music: Box<dyn MusicSource>,
    cut: Cut,
    audio_playing: bool,
    finish_emitted: bool,
    session_finished: bool,
    active_player: Option<String>,
    feedback: Option<Feedback>,
    last_tick_stamp: Option<f64>,
}

impl Round {
    /// Builds the chart up front; a malformed song never produces a round.
    pub fn new(song: SongData, music: Box<dyn MusicSource>) -> Result<Self, SongError> {
        let chart = chart::build_chart(&song)?;
        let last_note_time = chart::last_note_time(&chart);
        let cut = song.audio_cut();
        info!("Round ready: '{}', {} notes", song.title, chart.len());
        Ok(Self {
            song,
            chart,
            last_note_time,
            notes: NoteField::default(),
            keeper: Scorekeeper::default(),
            clock: SessionClock::default(),
            music,
            cut,
            audio_playing: false,
            finish_emitted: false,
            session_finished: false,
            active_player: None,
            feedback: None,
            last_tick_stamp: None,
        })
    }

    /// Round without an audio track; completion is note-bound only.
    pub fn silent(song: SongData) -> Result<Self, SongError> {
        Round::new(song, Box::new(SilentMusic))
    }

    pub fn song(&self) -> &SongData {
        &self.song
    }

    /// Begin-round command: wholesale reset of notes, score, and clock, then
    /// into the preparation phase. Ignored once the session is finished.
    pub fn begin(&mut self, active_player: Option<&str>) {
        if self.session_finished {
            warn!("begin ignored: session already finished");
            return;
        }
        self.notes.reset(&self.chart);
        self.keeper.reset();
        self.feedback = None;
        self.finish_emitted = false;
        self.audio_playing = false;
        self.active_player = active_player.map(str::to_owned);
        self.clock.begin_preparation();
        info!(
            "Round begun for {}",
            self.active_player.as_deref().unwrap_or("(unnamed)")
        );
    }

    /// Marks the enclosing multi-player session as over. A round already in
    /// preparation will not count down after this.
    pub fn set_session_finished(&mut self, finished: bool) {
        self.session_finished = finished;
    }

    /// A lane press edge. Discarded outside the running phase; otherwise
    /// judged against game time at the moment the edge is applied.
    pub fn press(&mut self, lane: Lane) -> Option<JudgmentResult> {
        if self.clock.phase() != Phase::Running {
            return None;
        }
        let result = judge_lane_press(
            &mut self.notes,
            &mut self.keeper,
            lane,
            self.clock.game_time_sec(),
        );
        if let Some(result) = &result {
            self.feedback = Some(Feedback::for_result(result));
        }
        result
    }

    /// Advances the round to the host timestamp `now_sec`. Runs the phase
    /// machine, the passive miss sweep, both completion checks, and the
    /// visual timer decay, in that order.
    pub fn tick(&mut self, now_sec: f64) -> TickReport {
        let mut report = TickReport::default();
        let dt = self.consume_delta(now_sec);

        match self.clock.tick(now_sec, self.session_finished) {
            ClockTransition::Started => self.start_audio(),
            ClockTransition::CountdownStarted
            | ClockTransition::Abandoned
            | ClockTransition::None => {}
        }

        if self.clock.phase() == Phase::Running {
            let game_time = self.clock.game_time_sec();
            report.misses = mark_late_misses(&mut self.notes, &mut self.keeper, game_time);
            if let Some(last) = report.misses.last() {
                self.feedback = Some(Feedback::for_result(last));
            }
            if let Some(score) = self.check_completion(game_time) {
                report.finished = Some(score);
            }
        }

        self.notes.decay_flashes(dt);
        if let Some(feedback) = &mut self.feedback {
            feedback.remaining_sec = (feedback.remaining_sec - dt).max(0.0);
            if feedback.remaining_sec == 0.0 {
                self.feedback = None;
            }
        }

        report
    }

    /// Manual stop: freezes game time and pauses audio without requiring
    /// completion. No finish event is emitted.
    pub fn stop(&mut self) {
        if self.clock.phase() != Phase::Running {
            return;
        }
        self.clock.stop();
        self.pause_audio();
        info!("Round stopped manually at {:.2}s", self.clock.game_time_sec());
    }

    pub fn snapshot(&self) -> RoundSnapshot<'_> {
        RoundSnapshot {
            phase: self.clock.phase(),
            prepare_remaining_sec: self.clock.prepare_remaining_sec(),
            countdown_display: self.clock.countdown_display(),
            game_time_sec: self.clock.game_time_sec(),
            score: self.keeper.score(),
            combo: self.keeper.combo(),
            notes: self.notes.notes(),
            feedback: self.feedback.as_ref(),
            active_player: self.active_player.as_deref(),
        }
    }

    /// Two independent completion conditions; whichever fires first wins and
    /// the finish event is latched so it cannot fire twice.
    fn check_completion(&mut self, game_time: f64) -> Option<u32> {
        if self.finish_emitted {
            return None;
        }
        let audio_done = self.audio_playing
            && self
                .cut
                .end_sec
                .is_some_and(|end| self.music.position_sec() >= end);
        let notes_done = !self.notes.is_empty()
            && self.notes.all_judged()
            && game_time >= self.last_note_time + LATE_WINDOW + END_MARGIN;
        if !audio_done && !notes_done {
            return None;
        }
        self.finish_emitted = true;
        self.clock.stop();
        self.pause_audio();
        let score = self.keeper.score();
        info!(
            "Round finished ({}) with score {}",
            if audio_done { "audio end" } else { "all notes judged" },
            score
        );
        Some(score)
    }

    fn start_audio(&mut self) {
        if self.song.audio_path.is_none() {
            return;
        }
        match self.music.play(self.cut.start_sec) {
            Ok(()) => self.audio_playing = true,
            // A silent round is still a valid round; note-bound completion
            // takes over.
            Err(e) => warn!("Audio unavailable, continuing silently: {e}"),
        }
    }

    fn pause_audio(&mut self) {
        if self.audio_playing {
            self.music.pause();
            self.audio_playing = false;
        }
    }

    fn consume_delta(&mut self, now_sec: f64) -> f64 {
        let dt = match self.last_tick_stamp {
            Some(prev) => (now_sec - prev).max(0.0),
            None => 0.0,
        };
        self.last_tick_stamp = Some(now_sec);
        dt
    }
}

impl Drop for Round {
    // Tearing a round down on any path releases the audio collaborator.
    fn drop(&mut self) {
        self.pause_audio();
    }
}
