mod detect;
mod error;
mod evdev_source;

use std::io;

use crate::gesture::Event;

pub use detect::{detect_device, list_candidates, DEVICE_HINT_ENV};
pub use error::DeviceError;
pub use evdev_source::{translate, EvdevSource};

/// Ordered supply of detector input.
pub trait EventSource {
    /// Blocks for the next batch, appending translated events to `out` in arrival order.
    /// Returns `false` once the source is exhausted.
    fn next_events(&mut self, out: &mut Vec<Event>) -> io::Result<bool>;
}

/// In-memory source handing out one pre-built batch per call.
pub struct ScriptedSource {
    batches: std::vec::IntoIter<Vec<Event>>,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Vec<Event>>) -> Self {
        Self {
            batches: batches.into_iter(),
        }
    }

    pub fn single(events: Vec<Event>) -> Self {
        Self::new(vec![events])
    }
}

impl EventSource for ScriptedSource {
    fn next_events(&mut self, out: &mut Vec<Event>) -> io::Result<bool> {
        match self.batches.next() {
            Some(batch) => {
                out.extend(batch);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
