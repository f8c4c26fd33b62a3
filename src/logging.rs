use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use serde_json::json;

pub const LOG_JSON_PATH_ENV: &str = "MXGEST_LOG_JSON_PATH";

/// Console logger with an optional JSON-lines mirror.
pub struct Logger {
    json_file: Option<File>,
    console: bool,
}

impl Logger {
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(LOG_JSON_PATH_ENV)
            .ok()
            .filter(|raw| !raw.trim().is_empty());
        Self::new(path.map(PathBuf::from))
    }

    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let json_file = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed creating {}", parent.display()))?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("failed opening log file {}", path.display()))?;
                Some(file)
            }
            None => None,
        };
        Ok(Self {
            json_file,
            console: true,
        })
    }

    /// JSON mirror only; used by tests and replays that keep stdout for their own output.
    pub fn json_only(path: PathBuf) -> Result<Self> {
        let mut logger = Self::new(Some(path))?;
        logger.console = false;
        Ok(logger)
    }

    pub fn silent() -> Self {
        Self {
            json_file: None,
            console: false,
        }
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        if self.console {
            println!("{}", message.as_ref());
        }
        self.event("info", message.as_ref());
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        if self.console {
            eprintln!("{}", message.as_ref());
        }
        self.event("warn", message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        if self.console {
            eprintln!("{}", message.as_ref());
        }
        self.event("error", message.as_ref());
    }

    fn event(&mut self, level: &str, message: &str) {
        let Some(file) = &mut self.json_file else {
            return;
        };

        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let entry = json!({
            "ts_ms": ts_ms,
            "level": level,
            "msg": message,
        });

        // Logging must never take the event loop down.
        let _ = writeln!(file, "{}", entry);
        let _ = file.flush();
    }
}
