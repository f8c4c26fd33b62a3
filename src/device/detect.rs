use std::{fs, path::PathBuf};

use glob::glob;

use super::DeviceError;

pub const DEVICE_HINT_ENV: &str = "MXGEST_DEVICE_HINT";

const BY_ID_PATTERN: &str = "/dev/input/by-id/*-event-mouse";
const BY_PATH_PATTERN: &str = "/dev/input/by-path/*-event-mouse";
const PATTERNS: &[&str] = &[BY_ID_PATTERN, BY_PATH_PATTERN];

/// One underlying `/dev/input/eventN` and every symlink that reached it.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Candidate {
    /// First link found, from the earliest pattern.
    path: String,
    /// Index into the pattern list `path` came from; lower is preferred.
    rank: usize,
    aliases: Vec<String>,
}

impl Candidate {
    fn matches(&self, hint: &str) -> bool {
        self.aliases
            .iter()
            .any(|alias| alias.to_ascii_lowercase().contains(hint))
    }
}

fn collect_candidates_from(patterns: &[&str]) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::new();
    let mut targets: Vec<PathBuf> = Vec::new();
    for (rank, pattern) in patterns.iter().enumerate() {
        let Ok(entries) = glob(pattern) else {
            continue;
        };
        for entry in entries.flatten() {
            let link = entry.display().to_string();
            let target = fs::canonicalize(&entry).unwrap_or(entry);
            match targets.iter().position(|seen| seen == &target) {
                Some(index) => out[index].aliases.push(link),
                None => {
                    targets.push(target);
                    out.push(Candidate {
                        path: link.clone(),
                        rank,
                        aliases: vec![link],
                    });
                }
            }
        }
    }
    out
}

fn select(mut candidates: Vec<Candidate>, hint: Option<&str>) -> Option<String> {
    if let Some(hint) = hint {
        let hint = hint.to_ascii_lowercase();
        candidates.retain(|c| c.matches(&hint));
    }

    let best_rank = candidates.iter().map(|c| c.rank).min()?;
    let mut preferred = candidates.into_iter().filter(|c| c.rank == best_rank);
    match (preferred.next(), preferred.next()) {
        (Some(only), None) => Some(only.path),
        _ => None,
    }
}

fn detect_device_from(patterns: &[&str], hint: Option<&str>) -> Result<PathBuf, DeviceError> {
    let candidates = collect_candidates_from(patterns);
    let listed = candidates.iter().map(|c| c.path.clone()).collect();
    match select(candidates, hint) {
        Some(path) => Ok(PathBuf::from(path)),
        None => Err(DeviceError::NotFound {
            path: None,
            candidates: listed,
        }),
    }
}

pub fn detect_device() -> Result<PathBuf, DeviceError> {
    let hint = std::env::var(DEVICE_HINT_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty());
    detect_device_from(PATTERNS, hint.as_deref())
}

/// One path per device; aliases of an already listed device are folded into it.
pub fn list_candidates() -> Vec<String> {
    collect_candidates_from(PATTERNS)
        .into_iter()
        .map(|c| c.path)
        .collect()
}
