//! Type-safe identifiers for the wizard
//!
//! Releases and platforms are closed sets, so they are modelled as enums
//! rather than strings. Parsing is the only place raw user text is accepted.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Host URL every mpm download lives under.
pub const DEFAULT_MPM_BASE_URL: &str = "https://www.mathworks.com/mpm";

/// Target platform for the mpm binary and the products it installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum Platform {
    #[strum(serialize = "windows")]
    Windows,
    #[strum(serialize = "linux")]
    Linux,
    /// Intel macOS, also used on Apple Silicon when the user asks for Intel builds
    #[strum(serialize = "macOSx64")]
    MacOsIntel,
    #[strum(serialize = "macOSARM")]
    MacOsArm,
}

impl Platform {
    /// Directory name mpm is published under for this platform.
    pub const fn mpm_arch_dir(self) -> &'static str {
        match self {
            Self::Windows => "win64",
            Self::Linux => "glnxa64",
            Self::MacOsIntel => "maci64",
            Self::MacOsArm => "maca64",
        }
    }

    /// Full download URL of the mpm binary under `base_url`.
    pub fn mpm_url(self, base_url: &str) -> String {
        format!(
            "{}/{}/mpm",
            base_url.trim_end_matches('/'),
            self.mpm_arch_dir()
        )
    }

    pub const fn binary_name(self) -> &'static str {
        match self {
            Self::Windows => "mpm.exe",
            _ => "mpm",
        }
    }

    #[inline]
    pub const fn is_macos(self) -> bool {
        matches!(self, Self::MacOsIntel | Self::MacOsArm)
    }

    /// Architecture an mpm binary must be built for to run as this platform.
    ///
    /// Only macOS binaries are inspected, so only those return `Some`.
    pub const fn expected_binary_arch(self) -> Option<BinaryArch> {
        match self {
            Self::MacOsIntel => Some(BinaryArch::X86_64),
            Self::MacOsArm => Some(BinaryArch::Arm64),
            Self::Windows | Self::Linux => None,
        }
    }

    /// Oldest release published for this platform.
    pub const fn first_supported_release(self) -> Release {
        match self {
            Self::MacOsArm => Release::R2023b,
            _ => Release::R2017b,
        }
    }

    /// Releases the user may pick on this platform, oldest first.
    pub fn supported_releases(self) -> impl Iterator<Item = Release> {
        let first = self.first_supported_release();
        Release::iter().filter(move |r| *r >= first)
    }

    /// Human-readable range used in validation messages, e.g. `R2017b-R2025b`.
    pub fn release_range(self) -> String {
        format!("{}-{}", self.first_supported_release(), Release::LATEST)
    }

    /// Where products go when the user accepts the default install path.
    pub fn default_install_path(self, release: Release) -> PathBuf {
        match self {
            Self::MacOsIntel | Self::MacOsArm => {
                PathBuf::from(format!("/Applications/MATLAB_{}.app", release))
            }
            Self::Windows => PathBuf::from(format!("C:\\Program Files\\MATLAB\\{}", release)),
            Self::Linux => PathBuf::from(format!("/usr/local/MATLAB/{}", release)),
        }
    }
}

/// A catalog release. Declaration order is chronological order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter,
)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[strum(ascii_case_insensitive)]
pub enum Release {
    R2017b,
    R2018a,
    R2018b,
    R2019a,
    R2019b,
    R2020a,
    R2020b,
    R2021a,
    R2021b,
    R2022a,
    R2022b,
    R2023a,
    R2023b,
    R2024a,
    R2024b,
    R2025a,
    R2025b,
}

impl Release {
    pub const LATEST: Release = Release::R2025b;

    /// Chronological position, starting at 0 for R2017b.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Default for Release {
    fn default() -> Self {
        Self::LATEST
    }
}

impl TryFrom<String> for Release {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.trim().parse()
    }
}

impl From<Release> for String {
    fn from(release: Release) -> Self {
        release.to_string()
    }
}

/// CPU architecture reported for an existing macOS mpm binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinaryArch {
    #[strum(serialize = "arm64")]
    Arm64,
    #[strum(serialize = "x86_64")]
    X86_64,
}

impl BinaryArch {
    /// Read the architecture out of `lipo -info` output.
    ///
    /// `arm64` wins if both names appear (universal binaries).
    pub fn from_lipo_output(output: &str) -> Option<Self> {
        if output.contains("arm64") {
            Some(Self::Arm64)
        } else if output.contains("x86_64") {
            Some(Self::X86_64)
        } else {
            None
        }
    }
}
