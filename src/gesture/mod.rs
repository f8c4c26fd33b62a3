mod classify;
mod detector;
mod types;

pub use classify::{classify, DEFAULT_THRESHOLD};
pub use detector::GestureDetector;
pub use types::{Event, Gesture, GestureState};
