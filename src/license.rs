//! License file placement
//!
//! mpm does not handle license files, so the wizard copies the chosen file
//! into `<install>/licenses` once products are installed. Nothing here is
//! fatal: the caller turns an error into a warning asking the user to place
//! the file by hand.

use anyhow::{Context, Result, anyhow};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Directory under the installation root that MATLAB reads licenses from.
pub const LICENSE_DIR: &str = "licenses";

/// Copy `license` into `<install_path>/licenses`, keeping its file name.
///
/// Returns the path of the copied file.
pub fn install_license(install_path: &Path, license: &Path) -> Result<PathBuf> {
    let dir = install_path.join(LICENSE_DIR);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Error creating \"{}\" directory", LICENSE_DIR))?;

    let file_name = license
        .file_name()
        .ok_or_else(|| anyhow!("{} has no file name", license.display()))?;
    let dest = dir.join(file_name);

    let mut source = File::open(license).context("Error opening license file")?;
    let mut target = File::create(&dest).context("Error creating destination file")?;
    io::copy(&mut source, &mut target).context("Error copying license file")?;

    tracing::info!("License copied to {}", dest.display());
    Ok(dest)
}
