//! Golden frame-hash helpers for render regression tests.
//!
//! Rendering is deterministic, so a sha256 of the RGBA buffer pins a scene
//! exactly. Tests compare observed hashes against a JSON golden file and
//! can regenerate it with `STILLPATH_UPDATE_GOLDENS=1`.

use std::{collections::BTreeMap, fs, io, path::Path};

use sha2::{Digest, Sha256};

pub fn frame_hash(frame: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(frame);
    hex::encode(hasher.finalize())
}

pub fn update_goldens_enabled() -> bool {
    matches!(
        std::env::var("STILLPATH_UPDATE_GOLDENS").as_deref(),
        Ok("1") | Ok("true") | Ok("yes") | Ok("on")
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldenOutcome {
    Match,
    Updated,
    Mismatch { diffs: Vec<String> },
}

pub fn load_goldens(path: &Path) -> io::Result<BTreeMap<String, String>> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn save_goldens(path: &Path, goldens: &BTreeMap<String, String>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let text = serde_json::to_string_pretty(goldens)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, text)
}

/// Compares `observed` scene hashes against the golden file at `path`.
///
/// A missing golden file is written out and reported as `Updated` (first
/// run bootstraps itself); an existing file is only rewritten when
/// [`update_goldens_enabled`] says so.
pub fn verify_or_update(
    path: &Path,
    observed: &BTreeMap<String, String>,
) -> io::Result<GoldenOutcome> {
    if !path.exists() || update_goldens_enabled() {
        save_goldens(path, observed)?;
        return Ok(GoldenOutcome::Updated);
    }

    let goldens = load_goldens(path)?;
    let mut diffs = Vec::new();
    for (name, hash) in observed {
        match goldens.get(name) {
            None => diffs.push(format!("{name}: missing from golden file")),
            Some(expected) if expected != hash => {
                diffs.push(format!("{name}: expected {expected}, got {hash}"))
            }
            Some(_) => {}
        }
    }
    for name in goldens.keys() {
        if !observed.contains_key(name) {
            diffs.push(format!("{name}: golden entry no longer produced"));
        }
    }

    if diffs.is_empty() {
        Ok(GoldenOutcome::Match)
    } else {
        Ok(GoldenOutcome::Mismatch { diffs })
    }
}
