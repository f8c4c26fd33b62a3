use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use mxgest::{
    device::ScriptedSource,
    dispatch::RecordingSink,
    gesture::{Gesture, GestureDetector, DEFAULT_THRESHOLD},
    logging::Logger,
    runtime,
    trace::parse_trace,
};

#[derive(Debug, Parser)]
#[command(name = "gesture_replay")]
#[command(about = "Replay a recorded mxgest trace through the gesture detector")]
struct Cli {
    trace: PathBuf,
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u32,
    /// File with one expected gesture name per line.
    #[arg(long)]
    expect: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let events = parse_trace(&cli.trace)?;

    let mut source = ScriptedSource::single(events);
    let mut detector = GestureDetector::new(cli.threshold);
    let mut sink = RecordingSink::default();
    let mut logger = Logger::silent();
    runtime::run(&mut source, &mut detector, &mut sink, &mut logger, None)?;

    println!("gesture,index,name");
    for (index, gesture) in sink.gestures.iter().enumerate() {
        println!("gesture,{index},{gesture}");
    }

    if let Some(expect_path) = cli.expect {
        let expected = parse_expected(&expect_path)?;
        if sink.gestures != expected {
            eprintln!("expected gestures: {}", join(&expected));
            eprintln!("actual gestures:   {}", join(&sink.gestures));
            return Err(anyhow!("gesture sequence mismatch"));
        }
    }

    Ok(())
}

fn join(gestures: &[Gesture]) -> String {
    gestures
        .iter()
        .map(|g| g.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_expected(path: &Path) -> Result<Vec<Gesture>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut gestures = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .with_context(|| format!("failed to read {}:{}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let gesture = Gesture::from_name(token)
            .map_err(|e| anyhow!("{}:{} {e}", path.display(), line_no))?;
        gestures.push(gesture);
    }
    Ok(gestures)
}
