use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use mxgest::{
    config::{CommandMap, Config},
    device::{detect_device, list_candidates, DeviceError, EvdevSource},
    dispatch::CommandDispatcher,
    gesture::{Gesture, GestureDetector},
    logging::Logger,
    runtime,
    trace::TraceWriter,
};

#[derive(Debug, Parser)]
#[command(name = "mxgest")]
#[command(about = "Hold a mouse side button and swipe to run commands")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Listen on the device and dispatch gestures.
    Run(RunArgs),
    /// List mouse event devices found under /dev/input.
    Devices,
    /// Print the effective configuration.
    Config(OverrideArgs),
}

#[derive(Debug, Args)]
struct OverrideArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    device: Option<PathBuf>,
    #[arg(long)]
    threshold: Option<u32>,
    #[arg(long = "trigger-button")]
    trigger_button: Option<u16>,
}

#[derive(Debug, Args)]
struct RunArgs {
    #[command(flatten)]
    overrides: OverrideArgs,
    /// Record every translated event to this file for later replay.
    #[arg(long)]
    trace: Option<PathBuf>,
}

fn load_config(args: &OverrideArgs) -> Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(device) = &args.device {
        config.device = Some(device.clone());
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(code) = args.trigger_button {
        config.trigger_button = code;
    }
    Ok(config)
}

fn log_banner(logger: &mut Logger, source: &EvdevSource, config: &Config) {
    logger.info(format!("Listening to: {}", source.name()));
    logger.info(format!("Device path: {}", source.path().display()));
    logger.info(format!(
        "Trigger button code: {}, threshold: {}",
        config.trigger_button, config.threshold
    ));
    logger.info("Gesture mappings:");
    log_mappings(logger, &config.commands);
    logger.info("Ready! Hold the trigger button and move the mouse. Ctrl+C to exit.");
}

fn log_mappings(logger: &mut Logger, commands: &CommandMap) {
    for gesture in Gesture::ALL {
        let target = commands
            .get(gesture)
            .map(|argv| argv.join(" "))
            .unwrap_or_else(|| "(unmapped)".to_string());
        logger.info(format!("  {:<6} -> {target}", gesture.as_str()));
    }
}

fn run_daemon(logger: &mut Logger, args: RunArgs) -> Result<()> {
    let config = load_config(&args.overrides)?;
    let path = match &config.device {
        Some(path) => path.clone(),
        None => detect_device()?,
    };

    let mut source = EvdevSource::open(&path, config.trigger_button)?;
    log_banner(logger, &source, &config);

    let mut trace = args
        .trace
        .as_deref()
        .map(TraceWriter::create)
        .transpose()?;
    let mut detector = GestureDetector::new(config.threshold);
    let mut dispatcher = CommandDispatcher::new(config.commands);

    runtime::run(
        &mut source,
        &mut detector,
        &mut dispatcher,
        logger,
        trace.as_mut(),
    )?;
    Ok(())
}

fn describe(path: &Path) -> String {
    match EvdevSource::open(path, 0) {
        Ok(source) => source.name().to_string(),
        Err(err @ DeviceError::PermissionDenied { .. }) => format!("unreadable: {err}"),
        Err(err) => format!("{err}"),
    }
}

fn run_devices(logger: &mut Logger) -> Result<()> {
    let candidates = list_candidates();
    if candidates.is_empty() {
        logger.warn("no mouse event devices under /dev/input/by-id or /dev/input/by-path");
        return Ok(());
    }
    for candidate in &candidates {
        logger.info(format!("{candidate}  [{}]", describe(Path::new(candidate))));
    }
    match detect_device() {
        Ok(path) => logger.info(format!("autodetect would use: {}", path.display())),
        Err(_) => logger.info(
            "autodetect is ambiguous; set --device, MXGEST_DEVICE or MXGEST_DEVICE_HINT",
        ),
    }
    Ok(())
}

fn run_show_config(logger: &mut Logger, args: OverrideArgs) -> Result<()> {
    let source = Config::locate(args.config.as_deref())?;
    let config = load_config(&args)?;
    match source {
        Some(path) => logger.info(format!("# loaded from {}", path.display())),
        None => logger.info("# built-in defaults"),
    }
    logger.info(config.to_toml()?.trim_end());
    Ok(())
}

fn run(cli: Cli, logger: &mut Logger) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_daemon(logger, args),
        Commands::Devices => run_devices(logger),
        Commands::Config(args) => run_show_config(logger, args),
    }
}

fn main() {
    let cli = Cli::parse();
    let mut logger = match Logger::from_env() {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("error: {err:?}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli, &mut logger) {
        if let Some(device_err) = err.downcast_ref::<DeviceError>() {
            logger.error(device_err.diagnostic().trim_end());
            std::process::exit(device_err.exit_code());
        }
        logger.error(format!("error: {err:?}"));
        std::process::exit(1);
    }
}
