pub mod chart;
pub mod clock;
pub mod judgment;
pub mod note;
pub mod rotation;
pub mod session;
pub mod song;
