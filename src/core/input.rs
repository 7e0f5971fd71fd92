use crate::config::LANES;
use winit::keyboard::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Lane {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
}

impl Lane {
    pub const ALL: [Lane; LANES] = [Lane::One, Lane::Two, Lane::Three, Lane::Four];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Lane> {
        match index {
            0 => Some(Lane::One),
            1 => Some(Lane::Two),
            2 => Some(Lane::Three),
            3 => Some(Lane::Four),
            _ => None,
        }
    }
}

/// A press or release edge on a lane. Edges are produced only on actual
/// transitions; OS key repeat while a key is held yields nothing.
#[derive(Clone, Copy, Debug)]
pub struct InputEdge {
    pub lane: Lane,
    pub pressed: bool,
}

/// One physical key per lane.
#[derive(Clone, Copy, Debug)]
pub struct KeyBindings {
    keys: [KeyCode; LANES],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            keys: [KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD, KeyCode::KeyF],
        }
    }
}

impl KeyBindings {
    pub fn new(keys: [KeyCode; LANES]) -> Self {
        Self { keys }
    }

    pub fn lane_for(&self, code: KeyCode) -> Option<Lane> {
        self.keys
            .iter()
            .position(|&k| k == code)
            .and_then(Lane::from_index)
    }

    pub fn key(&self, lane: Lane) -> KeyCode {
        self.keys[lane.index()]
    }
}

/// Tracks per-lane held state and turns raw key events into press/release
/// edges. Held state is for presentation highlighting; judgement is driven by
/// press edges alone.
pub struct LaneTracker {
    bindings: KeyBindings,
    held: [bool; LANES],
}

impl LaneTracker {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: [false; LANES],
        }
    }

    /// Feeds a raw key event. Returns an edge only when the lane's held state
    /// actually changes.
    pub fn handle_key(&mut self, code: KeyCode, pressed: bool) -> Option<InputEdge> {
        let lane = self.bindings.lane_for(code)?;
        let was_down = self.held[lane.index()];
        if was_down == pressed {
            return None;
        }
        self.held[lane.index()] = pressed;
        Some(InputEdge { lane, pressed })
    }

    pub fn is_held(&self, lane: Lane) -> bool {
        self.held[lane.index()]
    }

    pub fn held_lanes(&self) -> [bool; LANES] {
        self.held
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn clear(&mut self) {
        self.held = [false; LANES];
    }
}

impl Default for LaneTracker {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_edge_fires_once_per_hold() {
        let mut tracker = LaneTracker::default();
        let edge = tracker.handle_key(KeyCode::KeyA, true).unwrap();
        assert_eq!(edge.lane, Lane::One);
        assert!(edge.pressed);
        // Key repeat while held produces no further edges.
        assert!(tracker.handle_key(KeyCode::KeyA, true).is_none());
        assert!(tracker.is_held(Lane::One));

        let edge = tracker.handle_key(KeyCode::KeyA, false).unwrap();
        assert!(!edge.pressed);
        assert!(!tracker.is_held(Lane::One));
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut tracker = LaneTracker::default();
        assert!(tracker.handle_key(KeyCode::KeyQ, true).is_none());
        assert_eq!(tracker.held_lanes(), [false; LANES]);
    }

    #[test]
    fn custom_bindings_map_to_lanes() {
        let bindings = KeyBindings::new([
            KeyCode::KeyH,
            KeyCode::KeyJ,
            KeyCode::KeyK,
            KeyCode::KeyL,
        ]);
        let mut tracker = LaneTracker::new(bindings);
        assert_eq!(
            tracker.handle_key(KeyCode::KeyL, true).unwrap().lane,
            Lane::Four
        );
        assert!(tracker.handle_key(KeyCode::KeyA, true).is_none());
    }
}
