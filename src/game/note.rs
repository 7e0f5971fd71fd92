use crate::core::input::Lane;
use crate::game::chart::ChartNote;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Perfect,
    Good,
    Miss,
}

/// A chart note plus its per-round mutable state. The verdict is write-once:
/// it is private and the only mutation path is `resolve`, which refuses a
/// second write. Double judgement is unrepresentable outside this module's
/// crate-internal API.
#[derive(Clone, Debug)]
pub struct RuntimeNote {
    pub time_sec: f64,
    pub lane: Lane,
    pub hit_flash_sec: f64,
    result: Option<Verdict>,
}

impl RuntimeNote {
    fn from_chart(note: &ChartNote) -> Self {
        Self {
            time_sec: note.time_sec,
            lane: note.lane,
            hit_flash_sec: 0.0,
            result: None,
        }
    }

    pub fn result(&self) -> Option<Verdict> {
        self.result
    }

    pub fn is_judged(&self) -> bool {
        self.result.is_some()
    }

    /// First verdict sticks; returns whether this call resolved the note.
    pub(in crate::game) fn resolve(&mut self, verdict: Verdict) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(verdict);
        true
    }
}

/// The round's note set. Notes are never removed; only their verdicts and
/// flash timers change, so count and iteration order are stable all round.
#[derive(Debug, Default)]
pub struct NoteField {
    notes: Vec<RuntimeNote>,
}

impl NoteField {
    /// Replaces the whole field with fresh unjudged copies of the chart.
    pub fn reset(&mut self, chart: &[ChartNote]) {
        self.notes = chart.iter().map(RuntimeNote::from_chart).collect();
    }

    pub fn notes(&self) -> &[RuntimeNote] {
        &self.notes
    }

    pub(in crate::game) fn notes_mut(&mut self) -> &mut [RuntimeNote] {
        &mut self.notes
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn all_judged(&self) -> bool {
        self.notes.iter().all(RuntimeNote::is_judged)
    }

    /// Counts down every note's hit flash, floored at zero. Verdicts are
    /// untouched.
    pub fn decay_flashes(&mut self, dt: f64) {
        for note in &mut self.notes {
            if note.hit_flash_sec > 0.0 {
                note.hit_flash_sec = (note.hit_flash_sec - dt).max(0.0);
            }
        }
    }
}
