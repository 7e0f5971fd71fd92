//! Headless core of a lane-based rhythm game.
//!
//! Falling notes are judged against timing windows as they cross a fixed
//! hit-line; a per-frame clock drives the preparation / countdown / running /
//! stopped phase machine; a round-robin rotation tracks scores across
//! players. Rendering is someone else's job: the presentation layer reads
//! [`game::session::RoundSnapshot`] once per tick and sends discrete commands
//! (begin, press, release, stop) back in.

pub mod config;
pub mod core;
pub mod game;

pub use crate::core::audio::{AudioError, Cut, MusicSource, SilentMusic};
pub use crate::core::input::{InputEdge, KeyBindings, Lane, LaneTracker};
pub use crate::game::chart::{build_chart, ChartNote};
pub use crate::game::clock::Phase;
pub use crate::game::judgment::JudgmentResult;
pub use crate::game::note::Verdict;
pub use crate::game::rotation::Rotation;
pub use crate::game::session::{Round, RoundSnapshot, TickReport};
pub use crate::game::song::{builtin_songs, load_library, SongData, SongError};
