//! Line-oriented event recordings.
//!
//! ```text
//! # comment
//! button,1
//! motion,150,10
//! button,0
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Result};

use crate::gesture::Event;

pub const TRACE_HEADER: &str = "# mxgest trace v1";

pub fn parse_trace(path: &Path) -> Result<Vec<Event>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        if let Some(event) = parse_line(&line)
            .with_context(|| format!("{}:{} invalid trace line", path.display(), line_no))?
        {
            out.push(event);
        }
    }
    Ok(out)
}

/// `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Event>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    match parts.as_slice() {
        ["button", state] => {
            let pressed = match *state {
                "1" => true,
                "0" => false,
                other => return Err(anyhow!("button state must be 0 or 1, got '{other}'")),
            };
            Ok(Some(Event::ButtonEdge { pressed }))
        }
        ["motion", dx, dy] => Ok(Some(Event::Motion {
            dx: parse_delta(dx, "dx")?,
            dy: parse_delta(dy, "dy")?,
        })),
        [kind, ..] => Err(anyhow!(
            "expected 'button,<0|1>' or 'motion,<dx>,<dy>', got '{kind}' with {} fields",
            parts.len()
        )),
        [] => Ok(None),
    }
}

fn parse_delta(raw: &str, field: &str) -> Result<i32> {
    raw.parse::<i32>()
        .with_context(|| format!("invalid {field} '{raw}'"))
}

pub fn format_event(event: Event) -> String {
    match event {
        Event::ButtonEdge { pressed } => format!("button,{}", u8::from(pressed)),
        Event::Motion { dx, dy } => format!("motion,{dx},{dy}"),
    }
}

/// Appends translated events to a trace file as they are handled.
pub struct TraceWriter {
    out: BufWriter<File>,
}

impl TraceWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create trace {}", path.display()))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{TRACE_HEADER}")?;
        Ok(Self { out })
    }

    pub fn record(&mut self, event: Event) -> Result<()> {
        writeln!(self.out, "{}", format_event(event))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush().context("failed to flush trace")
    }
}
