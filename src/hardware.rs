//! Host environment detection
//!
//! Works out which mpm build fits the machine the wizard runs on. Detection
//! uses the compile-time target constants from `std::env::consts`; there is
//! no shelling out.
//!
//! Apple Silicon is the one ambiguous case: both Intel and ARM builds run
//! there, so the user has to choose.

use std::fmt;
use std::path::PathBuf;

use crate::types::Platform;

/// Operating system and CPU architecture of the running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
}

impl HostInfo {
    /// Detect the host this binary was built for.
    pub fn detect() -> Self {
        let host = Self::new(std::env::consts::OS, std::env::consts::ARCH);
        tracing::debug!("Host detection: {}", host);
        host
    }

    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }
}

impl fmt::Display for HostInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// Outcome of mapping a host onto an mpm platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformDetection {
    Resolved(Platform),
    /// macOS on ARM; ask whether Intel or ARM products are wanted
    NeedsArchitectureChoice,
    Unsupported,
}

/// Map a host onto the platform whose mpm it should download.
pub fn detect_platform(host: &HostInfo) -> PlatformDetection {
    match (host.os.as_str(), host.arch.as_str()) {
        ("macos", "x86_64") => PlatformDetection::Resolved(Platform::MacOsIntel),
        ("macos", "aarch64") => PlatformDetection::NeedsArchitectureChoice,
        ("windows", _) => PlatformDetection::Resolved(Platform::Windows),
        ("linux", _) => PlatformDetection::Resolved(Platform::Linux),
        _ => PlatformDetection::Unsupported,
    }
}

/// Directory offered when the user does not pick a download location.
///
/// Unix hosts use `/tmp`. Windows uses `%TMP%`, falling back to the
/// process temp directory when the variable is unset.
pub fn default_download_dir(host: &HostInfo) -> PathBuf {
    if host.is_windows() {
        std::env::var_os("TMP")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir)
    } else {
        PathBuf::from("/tmp")
    }
}
