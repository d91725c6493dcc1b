//! Validation of wizard answers.
//!
//! Every function here is pure apart from `validate_license_path`, which
//! stats the file. Errors carry the exact text shown to the user before the
//! question is asked again.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::logic::resolver::{parallel_bundle, resolve_products, PARALLEL_PRODUCTS_KEYWORD};
use crate::types::{Platform, Release};

/// License file extensions mpm understands.
pub const LICENSE_EXTENSIONS: &[&str] = &[".dat", ".lic", ".xml"];

/// Pick Intel or ARM builds on Apple Silicon.
///
/// `idk` maps to Intel, which runs everywhere under Rosetta.
pub fn parse_architecture_choice(input: &str) -> Option<Platform> {
    match input.trim().to_lowercase().as_str() {
        "intel" | "\"intel\"" | "idk" | "\"idk\"" => Some(Platform::MacOsIntel),
        "arm" | "\"arm\"" => Some(Platform::MacOsArm),
        _ => None,
    }
}

/// Interpret a yes/no answer. `None` means neither.
pub fn parse_confirmation(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" => Some(true),
        "n" | "no" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Release answer outside the platform's supported window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRelease {
    pub input: String,
    pub range: String,
}

impl fmt::Display for InvalidRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid release. Enter a release between {}.", self.range)
    }
}

impl std::error::Error for InvalidRelease {}

/// Resolve a release answer. Empty input picks `default`.
pub fn select_release(
    input: &str,
    platform: Platform,
    default: Release,
) -> Result<Release, InvalidRelease> {
    let input = input.trim();
    let invalid = || InvalidRelease {
        input: input.to_string(),
        range: platform.release_range(),
    };

    let release = if input.is_empty() {
        default
    } else {
        input.parse::<Release>().map_err(|_| invalid())?
    };

    if platform.supported_releases().any(|r| r == release) {
        Ok(release)
    } else {
        Err(invalid())
    }
}

/// Product tokens that are not in the resolved catalog, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProducts(pub Vec<String>);

impl fmt::Display for UnknownProducts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The following products do not exist:")?;
        for product in &self.0 {
            writeln!(f, "- {}", product)?;
        }
        write!(
            f,
            "Please try again and check for any typos. Different products should be separated \
             by spaces. Spaces in a product name should be replaced with underscores."
        )
    }
}

impl std::error::Error for UnknownProducts {}

/// Resolve a product answer into the list handed to mpm.
///
/// - empty: everything the catalog resolves for this platform and release
/// - `parallel_products`: the fixed parallel bundle
/// - otherwise: whitespace-separated names, all of which must exist
pub fn select_products(
    input: &str,
    platform: Platform,
    release: Release,
) -> Result<Vec<String>, UnknownProducts> {
    let input = input.trim();
    let catalog = resolve_products(platform, release);

    if input.is_empty() {
        return Ok(catalog.iter().map(|p| p.to_string()).collect());
    }
    if input == PARALLEL_PRODUCTS_KEYWORD {
        return Ok(parallel_bundle(release));
    }

    let requested: Vec<String> = input.split_whitespace().map(str::to_string).collect();
    let missing: Vec<String> = requested
        .iter()
        .filter(|p| !catalog.contains(p.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(requested)
    } else {
        Err(UnknownProducts(missing))
    }
}

/// Why a license path was rejected.
#[derive(Debug)]
pub enum InvalidLicense {
    Unreadable(std::io::Error),
    Extension,
}

impl fmt::Display for InvalidLicense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable(e) => write!(f, "Error: {}", e),
            Self::Extension => write!(
                f,
                "Invalid file extension. Please provide a file with a .dat, .lic, or .xml file extension."
            ),
        }
    }
}

impl std::error::Error for InvalidLicense {}

/// Check a license file answer: the file must exist and carry a known extension.
pub fn validate_license_path(input: &str) -> Result<PathBuf, InvalidLicense> {
    let path = Path::new(input.trim());
    std::fs::metadata(path).map_err(InvalidLicense::Unreadable)?;

    let name = path.to_string_lossy();
    if LICENSE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
        Ok(path.to_path_buf())
    } else {
        Err(InvalidLicense::Extension)
    }
}
