use super::{Event, Gesture, GestureState, DEFAULT_THRESHOLD};

/// Hold-to-swipe detector for a single trigger button.
///
/// Feed every event in arrival order; a gesture comes back on the release that ends an
/// armed hold. A hold that never releases never emits.
#[derive(Clone, Debug)]
pub struct GestureDetector {
    state: GestureState,
    threshold: u32,
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl GestureDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            state: GestureState::IDLE,
            threshold,
        }
    }

    pub fn handle(&mut self, event: Event) -> Option<Gesture> {
        let (next, gesture) = self.state.step(event, self.threshold);
        self.state = next;
        gesture
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}
