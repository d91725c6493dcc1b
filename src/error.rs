//! Error handling for the installation wizard
//!
//! Validation problems with user answers never surface here: the wizard
//! reports them and asks again. Everything in `WizardError` ends the run.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that stop the wizard.
#[derive(Error, Debug)]
pub enum WizardError {
    /// IO errors (terminal, filesystem)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host OS/architecture has no mpm build
    #[error("Your operating system is unrecognized ({os}/{arch}).")]
    UnsupportedPlatform { os: String, arch: String },

    /// The Windows administrator probe failed or was negative
    #[error("This program must be run as an administrator.{}", detail.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default())]
    AdminRequired { detail: Option<String> },

    /// Network or HTTP failure while fetching mpm
    #[error("Failed to download MPM. {0}")]
    Download(String),

    /// An existing mpm binary cannot be used for the selected platform
    #[error("{0}")]
    Architecture(String),

    /// The mpm binary could not be started
    #[error("MPM was either moved, renamed, deleted, or you've lost permissions to access it: {}", path.display())]
    MpmMissing { path: PathBuf },

    /// mpm ran and reported failure
    #[error("An error occurred during installation. See the error above for more information. {0}")]
    InstallFailed(String),

    /// Interrupt signal or end of input
    #[error("Exiting from user input.")]
    Interrupted,

    /// The user typed an exit keyword
    #[error("Exiting from user input.")]
    UserExit,

    /// Wizard stage machine misuse
    #[error("Wizard transition error: {0}")]
    Transition(String),
}

/// Result type alias for wizard operations
pub type Result<T> = std::result::Result<T, WizardError>;

impl WizardError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn download(msg: impl Into<String>) -> Self {
        Self::Download(msg.into())
    }

    pub fn architecture(msg: impl Into<String>) -> Self {
        Self::Architecture(msg.into())
    }

    pub fn install_failed(msg: impl Into<String>) -> Self {
        Self::InstallFailed(msg.into())
    }

    /// Process exit status for this error: 0 when the user chose to leave.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Interrupted | Self::UserExit => 0,
            _ => 1,
        }
    }

    /// True when the error is the user leaving rather than something failing.
    pub fn is_user_exit(&self) -> bool {
        matches!(self, Self::Interrupted | Self::UserExit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WizardError::config("mpm_base_url must not be empty");
        assert_eq!(
            err.to_string(),
            "Configuration error: mpm_base_url must not be empty"
        );

        let err = WizardError::download("download failed: HTTP 404");
        assert_eq!(err.to_string(), "Failed to download MPM. download failed: HTTP 404");
    }

    #[test]
    fn test_admin_required_detail() {
        let err = WizardError::AdminRequired { detail: None };
        assert_eq!(err.to_string(), "This program must be run as an administrator.");

        let err = WizardError::AdminRequired {
            detail: Some("windir environment variable not found".into()),
        };
        assert!(err.to_string().ends_with("(windir environment variable not found)"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WizardError = io_err.into();
        assert!(matches!(err, WizardError::Io(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(WizardError::Interrupted.exit_code(), 0);
        assert_eq!(WizardError::UserExit.exit_code(), 0);
        assert_eq!(WizardError::download("x").exit_code(), 1);
        assert_eq!(
            WizardError::MpmMissing { path: PathBuf::from("/tmp/mpm") }.exit_code(),
            1
        );
    }
}
