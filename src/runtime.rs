use anyhow::{Context, Result};

use crate::{
    device::EventSource,
    dispatch::GestureSink,
    gesture::{Event, GestureDetector},
    logging::Logger,
    trace::TraceWriter,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    pub events: u64,
    pub gestures: u64,
    pub dispatch_failures: u64,
}

/// Pumps `source` through `detector` until the source ends or fails.
///
/// Every emitted gesture reaches `sink` before the next event is handled. Sink failures are
/// logged and skipped so one broken mapping cannot stop the loop. A failing trace is
/// reported once and then no longer written.
pub fn run<S, K>(
    source: &mut S,
    detector: &mut GestureDetector,
    sink: &mut K,
    logger: &mut Logger,
    mut trace: Option<&mut TraceWriter>,
) -> Result<RunStats>
where
    S: EventSource + ?Sized,
    K: GestureSink + ?Sized,
{
    let mut stats = RunStats::default();
    let mut batch: Vec<Event> = Vec::with_capacity(64);

    loop {
        batch.clear();
        let more = source
            .next_events(&mut batch)
            .context("failed reading input events")?;

        for event in batch.drain(..) {
            stats.events += 1;
            let recorded = trace.as_deref_mut().map(|writer| writer.record(event));
            if let Some(Err(err)) = recorded {
                drop_trace(&mut trace, logger, err);
            }

            let Some(gesture) = detector.handle(event) else {
                continue;
            };
            stats.gestures += 1;
            logger.info(format!("gesture detected: {gesture}"));
            if let Err(err) = sink.dispatch(gesture) {
                stats.dispatch_failures += 1;
                logger.warn(format!("warning: {err}"));
            }
        }

        // Flush per batch; the daemon normally exits by signal.
        let flushed = trace.as_deref_mut().map(TraceWriter::flush);
        if let Some(Err(err)) = flushed {
            drop_trace(&mut trace, logger, err);
        }
        if !more {
            break;
        }
    }

    logger.info(format!(
        "event stream ended after {} events, {} gestures",
        stats.events, stats.gestures
    ));
    Ok(stats)
}

fn drop_trace(trace: &mut Option<&mut TraceWriter>, logger: &mut Logger, err: anyhow::Error) {
    logger.warn(format!("warning: trace recording stopped: {err:#}"));
    *trace = None;
}
