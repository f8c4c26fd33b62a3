use std::{
    io,
    path::{Path, PathBuf},
};

use super::{DeviceError, EventSource};
use crate::gesture::Event;

// linux/input-event-codes.h
const EV_KEY: u16 = 0x01;
const EV_REL: u16 = 0x02;
const REL_X: u16 = 0x00;
const REL_Y: u16 = 0x01;
const KEY_RELEASED: i32 = 0;
const KEY_PRESSED: i32 = 1;

/// Reads a single evdev node and reduces it to trigger edges and pointer motion.
pub struct EvdevSource {
    device: evdev::Device,
    path: PathBuf,
    trigger_code: u16,
}

impl EvdevSource {
    pub fn open(path: &Path, trigger_code: u16) -> Result<Self, DeviceError> {
        let device = evdev::Device::open(path)
            .map_err(|err| DeviceError::from_io(path.to_path_buf(), err))?;
        Ok(Self {
            device,
            path: path.to_path_buf(),
            trigger_code,
        })
    }

    pub fn name(&self) -> &str {
        self.device.name().unwrap_or("unnamed device")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSource for EvdevSource {
    fn next_events(&mut self, out: &mut Vec<Event>) -> io::Result<bool> {
        let trigger_code = self.trigger_code;
        let batch_start = out.len();
        for raw in self.device.fetch_events()? {
            if let Some(event) = translate(raw.event_type().0, raw.code(), raw.value(), trigger_code)
            {
                push_coalesced(out, batch_start, event);
            }
        }
        Ok(true)
    }
}

/// Maps one raw evdev record to detector input, dropping everything the detector ignores.
///
/// Key autorepeat (value 2) is not an edge and is dropped.
pub fn translate(event_type: u16, code: u16, value: i32, trigger_code: u16) -> Option<Event> {
    match (event_type, code) {
        (EV_KEY, code) if code == trigger_code => match value {
            KEY_PRESSED => Some(Event::ButtonEdge { pressed: true }),
            KEY_RELEASED => Some(Event::ButtonEdge { pressed: false }),
            _ => None,
        },
        (EV_REL, REL_X) => Some(Event::Motion { dx: value, dy: 0 }),
        (EV_REL, REL_Y) => Some(Event::Motion { dx: 0, dy: value }),
        _ => None,
    }
}

/// Merges adjacent motion within one read batch. Button edges are never merged, so motion on
/// either side of an edge stays on its own side.
fn push_coalesced(out: &mut Vec<Event>, batch_start: usize, event: Event) {
    if let Event::Motion { dx, dy } = event {
        if out.len() > batch_start {
            if let Some(Event::Motion {
                dx: last_dx,
                dy: last_dy,
            }) = out.last_mut()
            {
                *last_dx = last_dx.saturating_add(dx);
                *last_dy = last_dy.saturating_add(dy);
                return;
            }
        }
    }
    out.push(event);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BTN_FORWARD: u16 = 277;
    const BTN_LEFT: u16 = 272;
    const EV_SYN: u16 = 0x00;
    const REL_WHEEL: u16 = 0x08;

    #[test]
    fn trigger_edges_translate() {
        assert_eq!(
            translate(EV_KEY, BTN_FORWARD, 1, BTN_FORWARD),
            Some(Event::ButtonEdge { pressed: true })
        );
        assert_eq!(
            translate(EV_KEY, BTN_FORWARD, 0, BTN_FORWARD),
            Some(Event::ButtonEdge { pressed: false })
        );
        assert_eq!(translate(EV_KEY, BTN_FORWARD, 2, BTN_FORWARD), None);
    }

    #[test]
    fn other_buttons_are_dropped() {
        assert_eq!(translate(EV_KEY, BTN_LEFT, 1, BTN_FORWARD), None);
        assert_eq!(
            translate(EV_KEY, BTN_LEFT, 1, BTN_LEFT),
            Some(Event::ButtonEdge { pressed: true })
        );
    }

    #[test]
    fn relative_axes_translate_with_raster_signs() {
        assert_eq!(
            translate(EV_REL, REL_X, -7, BTN_FORWARD),
            Some(Event::Motion { dx: -7, dy: 0 })
        );
        assert_eq!(
            translate(EV_REL, REL_Y, 12, BTN_FORWARD),
            Some(Event::Motion { dx: 0, dy: 12 })
        );
        assert_eq!(translate(EV_REL, REL_WHEEL, 1, BTN_FORWARD), None);
        assert_eq!(translate(EV_SYN, 0, 0, BTN_FORWARD), None);
    }

    #[test]
    fn coalescing_stops_at_button_edges() {
        let mut out = Vec::new();
        for event in [
            Event::Motion { dx: 3, dy: 0 },
            Event::Motion { dx: 0, dy: 4 },
            Event::ButtonEdge { pressed: false },
            Event::Motion { dx: 1, dy: 1 },
        ] {
            push_coalesced(&mut out, 0, event);
        }
        assert_eq!(
            out,
            vec![
                Event::Motion { dx: 3, dy: 4 },
                Event::ButtonEdge { pressed: false },
                Event::Motion { dx: 1, dy: 1 },
            ]
        );
    }

    #[test]
    fn coalescing_does_not_reach_into_previous_batch() {
        let mut out = vec![Event::Motion { dx: 5, dy: 5 }];
        push_coalesced(&mut out, 1, Event::Motion { dx: 1, dy: 0 });
        assert_eq!(out.len(), 2);
    }
}
