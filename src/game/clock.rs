use crate::config::{COUNTDOWN_DURATION, MAX_DELTA_TIME, PREPARE_DURATION};
use log::info;

/// Discrete stage of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No round started.
    Idle,
    /// Fixed lead time showing whose turn it is.
    Preparing,
    /// Three integer beats before the music starts.
    CountingDown,
    /// Notes judgeable, game time advancing.
    Running,
    /// Terminal for the round: completed or manually stopped.
    Stopped,
}

/// What a tick did, beyond advancing timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockTransition {
    None,
    /// Preparation elapsed; the countdown began.
    CountdownStarted,
    /// Countdown hit zero; game time started at this tick's timestamp.
    Started,
    /// Preparation elapsed after the session was marked finished; the round
    /// was abandoned instead of counting down.
    Abandoned,
}

/// Drives the phase machine and the authoritative game time.
///
/// Game time is a single start timestamp subtracted from the current tick's
/// timestamp, never a sum of per-frame deltas, so it cannot drift over long
/// rounds. Stopping stores the elapsed time as an offset; if the clock is ever
/// set running again the next tick recomputes `start = now - offset`.
#[derive(Debug)]
pub struct SessionClock {
    phase: Phase,
    phase_remaining_sec: f64,
    start_stamp: Option<f64>,
    paused_offset_sec: f64,
    last_tick_stamp: Option<f64>,
    game_time_sec: f64,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            phase_remaining_sec: 0.0,
            start_stamp: None,
            paused_offset_sec: 0.0,
            last_tick_stamp: None,
            game_time_sec: 0.0,
        }
    }
}

impl SessionClock {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Elapsed game time in seconds; frozen outside `Running`.
    pub fn game_time_sec(&self) -> f64 {
        self.game_time_sec
    }

    pub fn prepare_remaining_sec(&self) -> Option<f64> {
        (self.phase == Phase::Preparing).then_some(self.phase_remaining_sec)
    }

    /// Countdown digit to display: 3, 2, 1.
    pub fn countdown_display(&self) -> Option<u32> {
        (self.phase == Phase::CountingDown)
            .then(|| (self.phase_remaining_sec.ceil() as u32).max(1))
    }

    /// Begin-round: full reset into the preparation phase.
    pub fn begin_preparation(&mut self) {
        self.phase = Phase::Preparing;
        self.phase_remaining_sec = PREPARE_DURATION;
        self.start_stamp = None;
        self.paused_offset_sec = 0.0;
        self.last_tick_stamp = None;
        self.game_time_sec = 0.0;
        info!("Phase -> Preparing ({PREPARE_DURATION:.1}s)");
    }

    /// Advances the clock to the host timestamp `now_sec` (monotonic seconds).
    /// `session_finished` suppresses the transition into the countdown, so a
    /// late session-finished signal cannot race a round into starting.
    pub fn tick(&mut self, now_sec: f64, session_finished: bool) -> ClockTransition {
        let dt = self.consume_delta(now_sec);
        match self.phase {
            Phase::Idle | Phase::Stopped => ClockTransition::None,
            Phase::Preparing => {
                self.phase_remaining_sec = (self.phase_remaining_sec - dt).max(0.0);
                if self.phase_remaining_sec > 0.0 {
                    return ClockTransition::None;
                }
                if session_finished {
                    self.phase = Phase::Idle;
                    info!("Phase -> Idle (session finished during preparation)");
                    return ClockTransition::Abandoned;
                }
                self.phase = Phase::CountingDown;
                self.phase_remaining_sec = COUNTDOWN_DURATION;
                info!("Phase -> CountingDown");
                ClockTransition::CountdownStarted
            }
            Phase::CountingDown => {
                self.phase_remaining_sec = (self.phase_remaining_sec - dt).max(0.0);
                if self.phase_remaining_sec > 0.0 {
                    return ClockTransition::None;
                }
                self.phase = Phase::Running;
                self.start_stamp = Some(now_sec);
                self.game_time_sec = 0.0;
                info!("Phase -> Running");
                ClockTransition::Started
            }
            Phase::Running => {
                // A fresh start stamp after a pause resumes where we left off.
                let start = *self
                    .start_stamp
                    .get_or_insert(now_sec - self.paused_offset_sec);
                self.game_time_sec = now_sec - start;
                ClockTransition::None
            }
        }
    }

    /// Freezes game time and stops the round. Used for both manual stop and
    /// round completion.
    pub fn stop(&mut self) {
        self.paused_offset_sec = self.game_time_sec;
        self.start_stamp = None;
        self.phase = Phase::Stopped;
        info!("Phase -> Stopped at {:.2}s", self.game_time_sec);
    }

    /// Delta since the previous tick, clamped so a long hitch cannot skip a
    /// whole phase.
    fn consume_delta(&mut self, now_sec: f64) -> f64 {
        let dt = match self.last_tick_stamp {
            Some(prev) => (now_sec - prev).clamp(0.0, MAX_DELTA_TIME),
            None => 0.0,
        };
        self.last_tick_stamp = Some(now_sec);
        dt
    }
}
