//! Pre-flight privilege checks
//!
//! mpm needs administrator rights on Windows to write under
//! `C:\Program Files`. There is no privilege API call here: the check tries
//! to create a file in the root of the system drive.
//!
//! # Limitations
//!
//! This is a heuristic. Antivirus or disk policies that block root-directory
//! writes produce a false negative for a real administrator.

use anyhow::{anyhow, Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Name of the probe file created and removed again.
const PROBE_FILE: &str = "admin_test";

/// Try to create and delete a probe file in `dir`.
///
/// Returns `Ok(false)` when the file cannot be created. Failing to delete a
/// probe that was created is an error, since it leaves a stray file behind.
pub fn probe_write_access(dir: &Path) -> Result<bool> {
    let probe = dir.join(PROBE_FILE);

    match OpenOptions::new().write(true).create(true).truncate(true).open(&probe) {
        Ok(file) => drop(file),
        Err(e) => {
            tracing::debug!("Write probe in {:?} failed: {}", dir, e);
            return Ok(false);
        }
    }

    std::fs::remove_file(&probe).with_context(|| {
        format!(
            "failed to delete file made when testing admin rights: {}",
            probe.display()
        )
    })?;

    Ok(true)
}

/// Root of the drive holding `windir`, e.g. `C:\` for `C:\Windows`.
fn system_drive_root(windir: &str) -> Option<PathBuf> {
    let bytes = windir.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        Some(PathBuf::from(format!("{}\\", &windir[..2])))
    } else {
        None
    }
}

/// Administrator heuristic for Windows hosts.
pub fn has_admin_rights() -> Result<bool> {
    let windir = std::env::var("WINDIR")
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| anyhow!("windir environment variable not found"))?;

    let root = system_drive_root(&windir)
        .ok_or_else(|| anyhow!("cannot find the system drive in {:?}", windir))?;

    probe_write_access(&root)
}
