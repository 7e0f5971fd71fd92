// Lanes
pub const LANES: usize = 4;

// Timing windows (seconds, absolute error against the scheduled note time)
pub const PERFECT_WINDOW: f64 = 0.07;
pub const GOOD_WINDOW: f64 = 0.14;
pub const LATE_WINDOW: f64 = 0.18;

// Phase durations
pub const PREPARE_DURATION: f64 = 5.0;
pub const COUNTDOWN_DURATION: f64 = 3.0;

// Visual timers, decayed by the core and read back via the round snapshot
pub const HIT_FLASH_DURATION: f64 = 0.25;
pub const FEEDBACK_DURATION: f64 = 0.5;

// Extra settle time past the last judgeable instant before a round may
// complete on the note-bound condition.
pub const END_MARGIN: f64 = 0.05;

// Scoring
pub const PERFECT_BASE_SCORE: u32 = 100;
pub const GOOD_BASE_SCORE: u32 = 70;

// Misc
pub const MAX_DELTA_TIME: f64 = 0.1;
