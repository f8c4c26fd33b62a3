use std::{fs, io};

use anyhow::Result;
use mxgest::{
    config::CommandMap,
    device::{EventSource, ScriptedSource},
    dispatch::{CommandDispatcher, DispatchError, GestureSink, RecordingSink},
    gesture::{Event, Gesture, GestureDetector},
    logging::Logger,
    runtime::{self, RunStats},
    trace::{parse_trace, TraceWriter},
};

fn press() -> Event {
    Event::ButtonEdge { pressed: true }
}

fn release() -> Event {
    Event::ButtonEdge { pressed: false }
}

fn motion(dx: i32, dy: i32) -> Event {
    Event::Motion { dx, dy }
}

struct FailingSource {
    served: bool,
}

impl EventSource for FailingSource {
    fn next_events(&mut self, out: &mut Vec<Event>) -> io::Result<bool> {
        if self.served {
            return Err(io::Error::from_raw_os_error(19));
        }
        self.served = true;
        out.extend([press(), motion(0, -400), release()]);
        Ok(true)
    }
}

struct FlakySink {
    seen: Vec<Gesture>,
}

impl GestureSink for FlakySink {
    fn dispatch(&mut self, gesture: Gesture) -> Result<(), DispatchError> {
        self.seen.push(gesture);
        if gesture == Gesture::Tap {
            return Err(DispatchError::CommandNotFound {
                gesture,
                program: "playerctl".into(),
            });
        }
        Ok(())
    }
}

#[test]
fn gestures_reach_sink_in_order_across_batches() -> Result<()> {
    let mut source = ScriptedSource::new(vec![
        vec![press(), motion(80, 0)],
        vec![motion(80, 0), release()],
        vec![],
        vec![press(), release()],
    ]);
    let mut detector = GestureDetector::new(100);
    let mut sink = RecordingSink::default();
    let mut logger = Logger::silent();

    let stats = runtime::run(&mut source, &mut detector, &mut sink, &mut logger, None)?;

    assert_eq!(sink.gestures, vec![Gesture::Right, Gesture::Tap]);
    assert_eq!(
        stats,
        RunStats {
            events: 6,
            gestures: 2,
            dispatch_failures: 0,
        }
    );
    Ok(())
}

#[test]
fn sink_failure_is_logged_and_loop_continues() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("log.jsonl");
    let mut logger = Logger::json_only(log_path.clone())?;

    let mut source = ScriptedSource::single(vec![
        press(),
        release(),
        press(),
        motion(0, 500),
        release(),
    ]);
    let mut detector = GestureDetector::new(100);
    let mut sink = FlakySink { seen: Vec::new() };

    let stats = runtime::run(&mut source, &mut detector, &mut sink, &mut logger, None)?;

    assert_eq!(sink.seen, vec![Gesture::Tap, Gesture::Down]);
    assert_eq!(stats.dispatch_failures, 1);

    let log = fs::read_to_string(&log_path)?;
    assert!(log.contains("gesture detected: tap"));
    assert!(log.contains("gesture detected: down"));
    assert!(log.contains("command not found for 'tap' gesture: playerctl"));
    Ok(())
}

#[test]
fn unmapped_dispatcher_never_fails() -> Result<()> {
    let mut source = ScriptedSource::single(vec![press(), motion(-300, 0), release()]);
    let mut detector = GestureDetector::default();
    let mut dispatcher = CommandDispatcher::new(CommandMap::unmapped());
    let mut logger = Logger::silent();

    let stats = runtime::run(&mut source, &mut detector, &mut dispatcher, &mut logger, None)?;
    assert_eq!(stats.gestures, 1);
    assert_eq!(stats.dispatch_failures, 0);
    Ok(())
}

#[test]
fn source_error_propagates_after_earlier_gestures() {
    let mut source = FailingSource { served: false };
    let mut detector = GestureDetector::new(100);
    let mut sink = RecordingSink::default();
    let mut logger = Logger::silent();

    let err = runtime::run(&mut source, &mut detector, &mut sink, &mut logger, None)
        .expect_err("second read fails");
    assert!(format!("{err:#}").contains("failed reading input events"));
    assert_eq!(sink.gestures, vec![Gesture::Up]);
}

#[test]
fn trace_records_every_event() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let trace_path = dir.path().join("session.trace");
    let events = vec![motion(3, 3), press(), motion(-120, 4), release()];

    let mut trace = TraceWriter::create(&trace_path)?;
    let mut source = ScriptedSource::single(events.clone());
    let mut detector = GestureDetector::new(100);
    let mut sink = RecordingSink::default();
    let mut logger = Logger::silent();

    runtime::run(
        &mut source,
        &mut detector,
        &mut sink,
        &mut logger,
        Some(&mut trace),
    )?;

    assert_eq!(parse_trace(&trace_path)?, events);
    assert_eq!(sink.gestures, vec![Gesture::Left]);
    Ok(())
}

#[test]
fn failing_trace_does_not_stop_dispatch() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let log_path = dir.path().join("log.jsonl");
    let mut logger = Logger::json_only(log_path.clone())?;

    // Writes to /dev/full fail with ENOSPC on the first flush.
    let mut trace = TraceWriter::create(std::path::Path::new("/dev/full"))?;
    let batches: Vec<Vec<Event>> = (0..2_000)
        .map(|_| vec![press(), motion(0, 300), release()])
        .collect();
    let mut source = ScriptedSource::new(batches);
    let mut detector = GestureDetector::new(100);
    let mut sink = RecordingSink::default();

    let stats = runtime::run(
        &mut source,
        &mut detector,
        &mut sink,
        &mut logger,
        Some(&mut trace),
    )?;

    assert_eq!(stats.gestures, 2_000);
    assert_eq!(sink.gestures.len(), 2_000);
    assert!(sink.gestures.iter().all(|g| *g == Gesture::Down));

    let log = fs::read_to_string(&log_path)?;
    assert_eq!(log.matches("trace recording stopped").count(), 1);
    Ok(())
}
