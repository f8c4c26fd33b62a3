use std::{
    env::VarError,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::gesture::{Gesture, DEFAULT_THRESHOLD};

pub const CONFIG_PATH_ENV: &str = "MXGEST_CONFIG";
pub const DEVICE_ENV: &str = "MXGEST_DEVICE";
pub const THRESHOLD_ENV: &str = "MXGEST_THRESHOLD";
pub const TRIGGER_BUTTON_ENV: &str = "MXGEST_TRIGGER_BUTTON";

/// `BTN_FORWARD`, the thumb "forward" button on MX Master mice.
pub const DEFAULT_TRIGGER_BUTTON: u16 = 277;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<PathBuf>,
    pub threshold: u32,
    pub trigger_button: u16,
    pub commands: CommandMap,
}

/// Argv to spawn per gesture. An absent entry leaves the gesture unmapped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    device: Option<PathBuf>,
    threshold: Option<u32>,
    trigger_button: Option<u16>,
    commands: Option<CommandMap>,
}

fn argv(parts: &[&str]) -> Option<Vec<String>> {
    Some(parts.iter().map(|part| part.to_string()).collect())
}

impl Default for CommandMap {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommandMap {
    pub fn builtin() -> Self {
        Self {
            up: argv(&["xdotool", "key", "super+w"]),
            down: argv(&["xdotool", "key", "Escape"]),
            left: argv(&["playerctl", "previous"]),
            right: argv(&["playerctl", "next"]),
            tap: argv(&["playerctl", "play-pause"]),
        }
    }

    pub fn unmapped() -> Self {
        Self {
            up: None,
            down: None,
            left: None,
            right: None,
            tap: None,
        }
    }

    pub fn get(&self, gesture: Gesture) -> Option<&[String]> {
        let entry = match gesture {
            Gesture::Up => &self.up,
            Gesture::Down => &self.down,
            Gesture::Left => &self.left,
            Gesture::Right => &self.right,
            Gesture::Tap => &self.tap,
        };
        entry.as_deref()
    }

    pub fn set(&mut self, gesture: Gesture, command: Option<Vec<String>>) {
        let entry = match gesture {
            Gesture::Up => &mut self.up,
            Gesture::Down => &mut self.down,
            Gesture::Left => &mut self.left,
            Gesture::Right => &mut self.right,
            Gesture::Tap => &mut self.tap,
        };
        *entry = command;
    }

    pub fn validate(&self) -> Result<()> {
        for gesture in Gesture::ALL {
            if let Some(command) = self.get(gesture) {
                if command.first().map_or(true, |program| program.trim().is_empty()) {
                    bail!("commands.{gesture} must name a program");
                }
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: None,
            threshold: DEFAULT_THRESHOLD,
            trigger_button: DEFAULT_TRIGGER_BUTTON,
            commands: CommandMap::builtin(),
        }
    }
}

impl Config {
    /// Defaults, then the config file (if any), then environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit, |name| std::env::var(name), default_config_path())
    }

    /// The file `load` would read, if any.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        resolve_path(explicit, |name| std::env::var(name), default_config_path())
    }

    fn load_with<F>(explicit: Option<&Path>, lookup: F, default: Option<PathBuf>) -> Result<Self>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let mut config = match resolve_path(explicit, &lookup, default)? {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_from(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let parsed: RawConfig = toml::from_str(raw)?;
        let defaults = Self::default();
        let config = Self {
            device: parsed.device,
            threshold: parsed.threshold.unwrap_or(defaults.threshold),
            trigger_button: parsed.trigger_button.unwrap_or(defaults.trigger_button),
            commands: parsed.commands.unwrap_or(defaults.commands),
        };
        config.commands.validate()?;
        Ok(config)
    }

    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        if let Some(device) = env_string(&lookup, DEVICE_ENV)? {
            self.device = Some(PathBuf::from(device));
        }
        if let Some(threshold) = env_parse::<u32, _>(&lookup, THRESHOLD_ENV)? {
            self.threshold = threshold;
        }
        if let Some(code) = env_parse::<u16, _>(&lookup, TRIGGER_BUTTON_ENV)? {
            self.trigger_button = code;
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed rendering config")
    }
}

fn resolve_path<F>(
    explicit: Option<&Path>,
    lookup: F,
    default: Option<PathBuf>,
) -> Result<Option<PathBuf>>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    if let Some(path) = explicit {
        return Ok(Some(path.to_path_buf()));
    }
    if let Some(path) = env_string(&lookup, CONFIG_PATH_ENV)? {
        return Ok(Some(PathBuf::from(path)));
    }
    // The per-user file is optional; only an explicitly named file must exist.
    Ok(default.filter(|path| path.is_file()))
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mxgest").join("config.toml"))
}

fn env_string<F>(lookup: &F, name: &str) -> Result<Option<String>>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    match lookup(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => Ok(Some(raw.trim().to_string())),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(anyhow!("{name} invalid: {err}")),
    }
}

fn env_parse<T, F>(lookup: &F, name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Result<String, VarError>,
{
    env_string(lookup, name)?
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("{name} must be an unsigned integer"))
        })
        .transpose()
}
