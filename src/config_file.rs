//! Optional JSON configuration for the wizard.
//!
//! Every field is optional in the file; anything missing takes the same
//! default the wizard would use without a config. The release uses the typed
//! `Release` enum, so a typo fails at load time rather than at the prompt.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::hardware::HostInfo;
use crate::types::{DEFAULT_MPM_BASE_URL, Release};
use crate::wizard::WizardOptions;

/// Wizard defaults that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WizardConfig {
    /// Release offered when the user presses Enter at the release prompt
    pub default_release: Release,
    /// Default download directory instead of the platform temp directory
    pub download_dir: Option<PathBuf>,
    /// Default installation path instead of the platform default
    pub install_dir: Option<PathBuf>,
    /// Where mpm binaries are published (mirrors, proxies)
    pub mpm_base_url: String,
    /// Wait for Enter before closing
    pub pause_on_exit: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            default_release: Release::LATEST,
            download_dir: None,
            install_dir: None,
            mpm_base_url: DEFAULT_MPM_BASE_URL.to_string(),
            pause_on_exit: true,
        }
    }
}

impl WizardConfig {
    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        tracing::debug!("Loaded configuration from {:?}", path.as_ref());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.mpm_base_url.trim();
        if url.is_empty() {
            anyhow::bail!("mpm_base_url must not be empty");
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            anyhow::bail!("mpm_base_url must start with http:// or https://");
        }

        for (name, dir) in [
            ("download_dir", &self.download_dir),
            ("install_dir", &self.install_dir),
        ] {
            if dir.as_ref().is_some_and(|d| d.as_os_str().is_empty()) {
                anyhow::bail!("{} must not be empty when set", name);
            }
        }

        Ok(())
    }

    /// Wizard options for `host` with this configuration applied.
    pub fn wizard_options(&self, host: HostInfo) -> WizardOptions {
        WizardOptions {
            host,
            mpm_base_url: self.mpm_base_url.trim().to_string(),
            default_release: self.default_release,
            download_dir: self.download_dir.clone(),
            install_dir: self.install_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_json(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = WizardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_release, Release::R2025b);
        assert!(config.pause_on_exit);
    }

    #[test]
    fn test_partial_file_takes_defaults() {
        let file = write_json(r#"{ "default_release": "r2022a", "pause_on_exit": false }"#);
        let config = WizardConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.default_release, Release::R2022a);
        assert!(!config.pause_on_exit);
        assert_eq!(config.mpm_base_url, DEFAULT_MPM_BASE_URL);
        assert_eq!(config.download_dir, None);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let config = WizardConfig {
            default_release: Release::R2019b,
            download_dir: Some(PathBuf::from("/opt/mpm")),
            install_dir: Some(PathBuf::from("/opt/MATLAB")),
            mpm_base_url: "https://mirror.example/mpm".to_string(),
            pause_on_exit: false,
        };
        let file = NamedTempFile::new().unwrap();
        config.save_to_file(file.path()).unwrap();

        assert_eq!(WizardConfig::load_from_file(file.path()).unwrap(), config);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = WizardConfig::load_from_file(Path::new("/nonexistent/path"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let file = write_json("{ invalid json }");
        let err = WizardConfig::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse configuration JSON"));
    }

    #[test]
    fn test_unknown_release_rejected_at_load() {
        let file = write_json(r#"{ "default_release": "R2016a" }"#);
        assert!(WizardConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = write_json(r#"{ "relase": "R2024a" }"#);
        assert!(WizardConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_validation_base_url() {
        let mut config = WizardConfig {
            mpm_base_url: "  ".to_string(),
            ..WizardConfig::default()
        };
        assert!(config.validate().is_err());

        config.mpm_base_url = "ftp://mirror.example/mpm".to_string();
        assert!(config.validate().is_err());

        config.mpm_base_url = "http://mirror.example/mpm".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_empty_dirs() {
        let config = WizardConfig {
            install_dir: Some(PathBuf::new()),
            ..WizardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wizard_options_carry_overrides() {
        let config = WizardConfig {
            download_dir: Some(PathBuf::from("/srv/mpm")),
            ..WizardConfig::default()
        };
        let options = config.wizard_options(HostInfo::new("linux", "x86_64"));
        assert_eq!(options.download_dir, Some(PathBuf::from("/srv/mpm")));
        assert_eq!(options.mpm_base_url, DEFAULT_MPM_BASE_URL);
        assert_eq!(options.default_release, Release::LATEST);
    }
}
