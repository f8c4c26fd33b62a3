use std::{
    fmt, io,
    process::{Child, Command, Stdio},
};

use crate::{config::CommandMap, gesture::Gesture};

/// Receives each completed gesture, synchronously, before the next event is processed.
pub trait GestureSink {
    fn dispatch(&mut self, gesture: Gesture) -> Result<(), DispatchError>;
}

#[derive(Debug)]
pub enum DispatchError {
    CommandNotFound { gesture: Gesture, program: String },
    Spawn { gesture: Gesture, source: io::Error },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CommandNotFound { gesture, program } => write!(
                f,
                "command not found for '{gesture}' gesture: {program} (is it installed?)"
            ),
            Self::Spawn { gesture, source } => {
                write!(f, "failed to run command for '{gesture}' gesture: {source}")
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::CommandNotFound { .. } => None,
        }
    }
}

/// Fire-and-forget process launcher driven by the configured command table.
pub struct CommandDispatcher {
    commands: CommandMap,
    running: Vec<Child>,
}

impl CommandDispatcher {
    pub fn new(commands: CommandMap) -> Self {
        Self {
            commands,
            running: Vec::new(),
        }
    }

    /// Children spawned earlier that have not been observed to exit yet.
    pub fn running(&self) -> usize {
        self.running.len()
    }

    fn reap_finished(&mut self) {
        self.running
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl GestureSink for CommandDispatcher {
    fn dispatch(&mut self, gesture: Gesture) -> Result<(), DispatchError> {
        self.reap_finished();

        let Some((program, args)) = self
            .commands
            .get(gesture)
            .and_then(|command| command.split_first())
        else {
            return Ok(());
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => DispatchError::CommandNotFound {
                    gesture,
                    program: program.clone(),
                },
                _ => DispatchError::Spawn { gesture, source },
            })?;
        self.running.push(child);
        Ok(())
    }
}

/// Keeps every dispatched gesture; handy for dry runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub gestures: Vec<Gesture>,
}

impl GestureSink for RecordingSink {
    fn dispatch(&mut self, gesture: Gesture) -> Result<(), DispatchError> {
        self.gestures.push(gesture);
        Ok(())
    }
}
