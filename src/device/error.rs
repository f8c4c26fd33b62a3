use std::{fmt, io, path::PathBuf};

/// Why the input device could not be acquired at startup.
#[derive(Debug)]
pub enum DeviceError {
    NotFound {
        path: Option<PathBuf>,
        candidates: Vec<String>,
    },
    PermissionDenied {
        path: PathBuf,
    },
    Open {
        path: PathBuf,
        source: io::Error,
    },
}

impl DeviceError {
    pub fn from_io(path: PathBuf, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound {
                path: Some(path),
                candidates: Vec::new(),
            },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            _ => Self::Open { path, source: err },
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 2,
            Self::PermissionDenied { .. } => 3,
            Self::Open { .. } => 1,
        }
    }

    /// Multi-line message telling the user how to get past the failure.
    pub fn diagnostic(&self) -> String {
        let mut message = format!("error: {self}\n");
        match self {
            Self::NotFound { candidates, .. } => {
                if !candidates.is_empty() {
                    message.push_str("\nCandidates:\n");
                    for candidate in candidates {
                        message.push_str("  - ");
                        message.push_str(candidate);
                        message.push('\n');
                    }
                }
                message.push_str("\nTo find your device, run:\n");
                message.push_str("  ls -la /dev/input/by-id/ | grep -i logitech\n");
                message.push_str("  sudo libinput debug-events --device /dev/input/eventXX\n");
                message.push_str("then pass it with --device or MXGEST_DEVICE.\n");
            }
            Self::PermissionDenied { .. } => {
                message.push_str("\nRun these commands to fix:\n");
                message.push_str("  sudo groupadd -f input\n");
                message.push_str("  sudo usermod -a -G input $USER\n");
                message.push_str("then log out and back in (or reboot).\n");
            }
            Self::Open { .. } => {}
        }
        message
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound {
                path: Some(path), ..
            } => write!(f, "device {} not found", path.display()),
            Self::NotFound { path: None, .. } => {
                write!(f, "no input device configured and autodetection was not conclusive")
            }
            Self::PermissionDenied { path } => {
                write!(f, "permission denied for {}", path.display())
            }
            Self::Open { path, source } => {
                write!(f, "failed opening {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DeviceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            _ => None,
        }
    }
}
