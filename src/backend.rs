//! Side effects the wizard depends on.
//!
//! The controller never touches the network, spawns processes or changes
//! permissions directly; it goes through [`Backend`]. [`SystemBackend`] is
//! the real implementation. Tests drive the wizard with a recording fake.

use std::io;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, bail};

use crate::download::HttpDownloader;
use crate::error::Result;
use crate::installer::{self, MpmInstallArgs};
use crate::process_guard::{CancellationToken, CommandProcessGroup};
use crate::sanity;
use crate::types::BinaryArch;

/// Operations with effects outside the wizard's own state.
pub trait Backend {
    /// Windows administrator heuristic. Only called for the Windows platform.
    fn has_admin_rights(&self) -> anyhow::Result<bool>;

    /// Fetch `url` into `dest`. Errors are fatal to the wizard.
    fn download(&self, url: &str, dest: &Path, cancel: &CancellationToken) -> Result<u64>;

    /// Architecture of an existing macOS mpm binary, from `lipo -info`.
    ///
    /// `Ok(None)` means lipo ran but reported neither known architecture.
    fn binary_arch(&self, binary: &Path) -> anyhow::Result<Option<BinaryArch>>;

    /// Mark the downloaded binary executable. Never called on Windows.
    fn make_executable(&self, binary: &Path) -> io::Result<()>;

    /// Run `mpm install` to completion.
    fn run_installer(&self, args: &MpmInstallArgs, cancel: &CancellationToken) -> Result<()>;
}

/// Backend acting on the real machine.
pub struct SystemBackend {
    downloader: HttpDownloader,
}

impl SystemBackend {
    pub fn new() -> Result<Self> {
        Ok(Self {
            downloader: HttpDownloader::new()?,
        })
    }
}

impl Backend for SystemBackend {
    fn has_admin_rights(&self) -> anyhow::Result<bool> {
        sanity::has_admin_rights()
    }

    fn download(&self, url: &str, dest: &Path, cancel: &CancellationToken) -> Result<u64> {
        self.downloader.download(url, dest, cancel)
    }

    fn binary_arch(&self, binary: &Path) -> anyhow::Result<Option<BinaryArch>> {
        let output = Command::new("lipo")
            .arg("-info")
            .arg(binary)
            .in_new_process_group()
            .output()
            .context("failed to run lipo")?;

        if !output.status.success() {
            bail!(
                "lipo {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let info = String::from_utf8_lossy(&output.stdout);
        tracing::debug!("lipo -info {}: {}", binary.display(), info.trim());
        Ok(BinaryArch::from_lipo_output(&info))
    }

    fn make_executable(&self, binary: &Path) -> io::Result<()> {
        set_executable(binary)
    }

    fn run_installer(&self, args: &MpmInstallArgs, cancel: &CancellationToken) -> Result<()> {
        installer::run_mpm(args, cancel)
    }
}

/// Add execute permission for everyone who can read the file.
#[cfg(unix)]
pub fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
pub fn set_executable(path: &Path) -> io::Result<()> {
    std::fs::metadata(path).map(|_| ())
}
