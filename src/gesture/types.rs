use core::fmt;

/// Input to the detector, already reduced to the trigger button and relative motion.
///
/// Axes follow device raster coordinates: positive `dx` moves right (east), positive `dy`
/// moves down (south). A source feeding a rotated or mirrored device must invert axes
/// before building `Motion`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    ButtonEdge { pressed: bool },
    Motion { dx: i32, dy: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    Up,
    Down,
    Left,
    Right,
    Tap,
}

impl Gesture {
    pub const ALL: [Gesture; 5] = [
        Gesture::Up,
        Gesture::Down,
        Gesture::Left,
        Gesture::Right,
        Gesture::Tap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::Tap => "tap",
        }
    }

    pub fn from_name(raw: &str) -> Result<Self, String> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "tap" => Ok(Self::Tap),
            other => Err(format!(
                "invalid gesture '{other}', expected up|down|left|right|tap"
            )),
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the detector remembers between events.
///
/// Accumulators are zero whenever `armed` is false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureState {
    pub armed: bool,
    pub accum_x: i64,
    pub accum_y: i64,
}

impl GestureState {
    pub const IDLE: GestureState = GestureState {
        armed: false,
        accum_x: 0,
        accum_y: 0,
    };

    const ARMED: GestureState = GestureState {
        armed: true,
        accum_x: 0,
        accum_y: 0,
    };

    /// Pure transition: the next state plus the gesture completed by `event`, if any.
    pub fn step(self, event: Event, threshold: u32) -> (GestureState, Option<Gesture>) {
        match (self.armed, event) {
            (false, Event::ButtonEdge { pressed: true }) => (Self::ARMED, None),
            (false, _) => (Self::IDLE, None),
            (true, Event::ButtonEdge { pressed: true }) => (self, None),
            (true, Event::Motion { dx, dy }) => (
                GestureState {
                    armed: true,
                    // Saturate instead of wrapping so a pathological hold still classifies
                    // by sign and dominant axis.
                    accum_x: self.accum_x.saturating_add(dx as i64),
                    accum_y: self.accum_y.saturating_add(dy as i64),
                },
                None,
            ),
            (true, Event::ButtonEdge { pressed: false }) => (
                Self::IDLE,
                Some(super::classify(self.accum_x, self.accum_y, threshold)),
            ),
        }
    }
}
