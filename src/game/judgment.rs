use crate::config::{
    FEEDBACK_DURATION, GOOD_BASE_SCORE, GOOD_WINDOW, HIT_FLASH_DURATION, LATE_WINDOW,
    PERFECT_BASE_SCORE, PERFECT_WINDOW,
};
use crate::core::input::Lane;
use crate::game::note::{NoteField, Verdict};
use log::info;

/// Outcome of a single judgement event. Ephemeral; the presentation layer
/// shows it and drops it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JudgmentResult {
    pub verdict: Verdict,
    pub score_delta: u32,
    pub combo_after: u32,
    /// Signed error in seconds, positive when the press was late.
    pub time_error_sec: f64,
}

impl JudgmentResult {
    pub fn label(&self) -> &'static str {
        match self.verdict {
            Verdict::Perfect => "PERFECT",
            Verdict::Good => "GOOD",
            Verdict::Miss => "MISS",
        }
    }
}

/// Judgement feedback banner state, decayed per tick by the session.
#[derive(Clone, Copy, Debug)]
pub struct Feedback {
    pub label: &'static str,
    pub remaining_sec: f64,
}

impl Feedback {
    pub fn for_result(result: &JudgmentResult) -> Self {
        Self {
            label: result.label(),
            remaining_sec: FEEDBACK_DURATION,
        }
    }
}

/// Score and combo for one round. Owned by the judgement layer; nothing else
/// mutates it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scorekeeper {
    score: u32,
    combo: u32,
}

impl Scorekeeper {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Applies a verdict: combo is bumped before the bonus is computed, so the
    /// first perfect in a round is worth 102.
    fn apply(&mut self, verdict: Verdict) -> (u32, u32) {
        let delta = match verdict {
            Verdict::Perfect => {
                self.combo += 1;
                PERFECT_BASE_SCORE + self.combo * 2
            }
            Verdict::Good => {
                self.combo += 1;
                GOOD_BASE_SCORE + self.combo
            }
            Verdict::Miss => {
                self.combo = 0;
                0
            }
        };
        self.score += delta;
        (delta, self.combo)
    }
}

/// Judges a press edge on a lane at game time `now_sec`.
///
/// Candidate selection: the unjudged note in that lane with the smallest
/// absolute error, among those within the late window. No candidate means the
/// press is free (not a miss). Well-formed charts never schedule two notes at
/// the same time in the same lane, so no tie-break is needed.
pub fn judge_lane_press(
    field: &mut NoteField,
    keeper: &mut Scorekeeper,
    lane: Lane,
    now_sec: f64,
) -> Option<JudgmentResult> {
    let mut best: Option<(usize, f64)> = None;
    for (index, note) in field.notes().iter().enumerate() {
        if note.lane != lane || note.is_judged() {
            continue;
        }
        let abs_error = (note.time_sec - now_sec).abs();
        if abs_error <= LATE_WINDOW && best.map_or(true, |(_, b)| abs_error < b) {
            best = Some((index, abs_error));
        }
    }
    let (index, abs_error) = best?;

    let verdict = if abs_error <= PERFECT_WINDOW {
        Verdict::Perfect
    } else if abs_error <= GOOD_WINDOW {
        Verdict::Good
    } else {
        // Inside the late window but outside both hit windows: the press
        // consumes the note as a miss, exactly like letting it scroll past.
        Verdict::Miss
    };

    let note = &mut field.notes_mut()[index];
    let time_error_sec = now_sec - note.time_sec;
    if !note.resolve(verdict) {
        return None;
    }
    if verdict != Verdict::Miss {
        note.hit_flash_sec = HIT_FLASH_DURATION;
    }
    let (score_delta, combo_after) = keeper.apply(verdict);
    info!(
        "JUDGED: lane {}, error {:+.1}ms, {:?}, combo {}",
        lane.index(),
        time_error_sec * 1000.0,
        verdict,
        combo_after
    );
    Some(JudgmentResult {
        verdict,
        score_delta,
        combo_after,
        time_error_sec,
    })
}

/// Passive sweep: every unjudged note strictly more than the late window in
/// the past is a miss. Runs every tick while the round is running so that
/// un-pressed notes still resolve.
pub fn mark_late_misses(
    field: &mut NoteField,
    keeper: &mut Scorekeeper,
    now_sec: f64,
) -> Vec<JudgmentResult> {
    let mut results = Vec::new();
    for note in field.notes_mut() {
        if note.is_judged() || now_sec - note.time_sec <= LATE_WINDOW {
            continue;
        }
        if !note.resolve(Verdict::Miss) {
            continue;
        }
        let (score_delta, combo_after) = keeper.apply(Verdict::Miss);
        info!(
            "MISSED: lane {}, scheduled {:.2}s, now {:.2}s",
            note.lane.index(),
            note.time_sec,
            now_sec
        );
        results.push(JudgmentResult {
            verdict: Verdict::Miss,
            score_delta,
            combo_after,
            time_error_sec: now_sec - note.time_sec,
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::chart::ChartNote;
    use proptest::prelude::*;

    fn field_with(times_lanes: &[(f64, Lane)]) -> NoteField {
        let chart: Vec<ChartNote> = times_lanes
            .iter()
            .map(|&(time_sec, lane)| ChartNote { time_sec, lane })
            .collect();
        let mut field = NoteField::default();
        field.reset(&chart);
        field
    }

    #[test]
    fn window_boundaries() {
        let mut keeper = Scorekeeper::default();

        let mut field = field_with(&[(2.0, Lane::One)]);
        let r = judge_lane_press(&mut field, &mut keeper, Lane::One, 2.07).unwrap();
        assert_eq!(r.verdict, Verdict::Perfect);

        let mut field = field_with(&[(2.0, Lane::One)]);
        let r = judge_lane_press(&mut field, &mut keeper, Lane::One, 2.13).unwrap();
        assert_eq!(r.verdict, Verdict::Good);

        // Within the late window but past both hit windows: the note is
        // consumed as a miss and the combo resets.
        let mut field = field_with(&[(2.0, Lane::One)]);
        let r = judge_lane_press(&mut field, &mut keeper, Lane::One, 2.16).unwrap();
        assert_eq!(r.verdict, Verdict::Miss);
        assert_eq!(r.combo_after, 0);
        assert_eq!(r.score_delta, 0);

        // Outside the late window: stale press, nothing happens.
        let mut field = field_with(&[(2.0, Lane::One)]);
        assert!(judge_lane_press(&mut field, &mut keeper, Lane::One, 2.19).is_none());
        assert!(!field.notes()[0].is_judged());
    }

    #[test]
    fn picks_nearest_candidate_in_lane() {
        let mut keeper = Scorekeeper::default();
        let mut field = field_with(&[(2.0, Lane::One), (2.15, Lane::One), (2.1, Lane::Two)]);
        let r = judge_lane_press(&mut field, &mut keeper, Lane::One, 2.12).unwrap();
        // 2.15 is nearer than 2.0, and the lane-two note is never considered.
        assert!(r.time_error_sec < 0.0);
        assert!(field.notes()[1].is_judged());
        assert!(!field.notes()[0].is_judged());
        assert!(!field.notes()[2].is_judged());
    }

    #[test]
    fn judged_notes_are_not_candidates() {
        let mut keeper = Scorekeeper::default();
        let mut field = field_with(&[(2.0, Lane::One)]);
        assert!(judge_lane_press(&mut field, &mut keeper, Lane::One, 2.0).is_some());
        // Second press on the same (now judged) note is free.
        assert!(judge_lane_press(&mut field, &mut keeper, Lane::One, 2.01).is_none());
        assert_eq!(keeper.combo(), 1);
    }

    #[test]
    fn scoring_formula_and_combo() {
        let mut keeper = Scorekeeper::default();
        let mut field = field_with(&[
            (2.0, Lane::One),
            (2.5, Lane::Two),
            (3.0, Lane::One),
            (3.5, Lane::Two),
        ]);

        let r = judge_lane_press(&mut field, &mut keeper, Lane::One, 2.0).unwrap();
        assert_eq!((r.score_delta, r.combo_after), (102, 1));

        let r = judge_lane_press(&mut field, &mut keeper, Lane::Two, 2.58).unwrap();
        assert_eq!(r.verdict, Verdict::Good);
        assert_eq!((r.score_delta, r.combo_after), (72, 2));
        assert_eq!(keeper.score(), 174);

        let misses = mark_late_misses(&mut field, &mut keeper, 3.19);
        assert_eq!(misses.len(), 1);
        assert_eq!(misses[0].combo_after, 0);
        assert_eq!(keeper.combo(), 0);
        assert_eq!(keeper.score(), 174);

        let r = judge_lane_press(&mut field, &mut keeper, Lane::Two, 3.5).unwrap();
        assert_eq!((r.score_delta, r.combo_after), (102, 1));
        assert!(field.all_judged());
    }

    #[test]
    fn passive_sweep_boundary_is_strict() {
        let mut keeper = Scorekeeper::default();
        let mut field = field_with(&[(2.0, Lane::One)]);
        assert!(mark_late_misses(&mut field, &mut keeper, 2.17).is_empty());
        assert_eq!(mark_late_misses(&mut field, &mut keeper, 2.19).len(), 1);
        // The sweep never re-judges.
        assert!(mark_late_misses(&mut field, &mut keeper, 2.5).is_empty());
    }

    #[test]
    fn hit_flash_set_on_hits_only() {
        let mut keeper = Scorekeeper::default();
        let mut field = field_with(&[(2.0, Lane::One), (3.0, Lane::One)]);
        judge_lane_press(&mut field, &mut keeper, Lane::One, 2.0);
        assert!(field.notes()[0].hit_flash_sec > 0.0);
        mark_late_misses(&mut field, &mut keeper, 4.0);
        assert_eq!(field.notes()[1].hit_flash_sec, 0.0);
    }

    proptest! {
        // Replaying the same press trace yields the same score and combo.
        #[test]
        fn replay_is_deterministic(
            presses in prop::collection::vec((0usize..4, 0.0f64..6.0), 0..64)
        ) {
            let chart: Vec<(f64, Lane)> = (0..8)
                .map(|i| (2.0 + i as f64 * 0.5, Lane::ALL[i % 4]))
                .collect();
            let run = || {
                let mut field = field_with(&chart);
                let mut keeper = Scorekeeper::default();
                for &(lane, now) in &presses {
                    if let Some(lane) = Lane::from_index(lane) {
                        judge_lane_press(&mut field, &mut keeper, lane, now);
                    }
                    mark_late_misses(&mut field, &mut keeper, now);
                }
                (keeper.score(), keeper.combo())
            };
            prop_assert_eq!(run(), run());
        }

        // No press sequence can judge a note twice: total judged events
        // never exceed the note count.
        #[test]
        fn judgements_are_exactly_once(
            presses in prop::collection::vec((0usize..4, 0.0f64..8.0), 0..128)
        ) {
            let chart: Vec<(f64, Lane)> = (0..8)
                .map(|i| (2.0 + i as f64 * 0.5, Lane::ALL[i % 4]))
                .collect();
            let mut field = field_with(&chart);
            let mut keeper = Scorekeeper::default();
            let mut events = 0usize;
            for &(lane, now) in &presses {
                if let Some(lane) = Lane::from_index(lane) {
                    if judge_lane_press(&mut field, &mut keeper, lane, now).is_some() {
                        events += 1;
                    }
                }
                events += mark_late_misses(&mut field, &mut keeper, now).len();
            }
            prop_assert!(events <= chart.len());
        }
    }
}
