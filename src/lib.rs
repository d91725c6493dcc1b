//! MPM Install Wizard Library
//!
//! Core of the interactive MATLAB package manager (mpm) install wizard:
//! product catalog and resolution, answer validation, the wizard state
//! machine, and the download/install/license steps it drives.

pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config_file;
pub mod download;
pub mod error;
pub mod hardware;
pub mod input;
pub mod install_state;
pub mod installer;
pub mod license;
pub mod logic;
pub mod process_guard;
pub mod sanity;
pub mod theme;
pub mod types;
pub mod wizard;

// Re-export main types for convenience
pub use backend::{Backend, SystemBackend};
pub use config_file::WizardConfig;
pub use error::{Result, WizardError};
pub use hardware::{HostInfo, PlatformDetection, detect_platform};
pub use input::{LineSource, PathCompleter, ScriptedLines, TerminalLines};
pub use install_state::{StageTransitionError, WizardContext, WizardStage};
pub use installer::{InstallNoticeWriter, MpmInstallArgs, run_mpm};
pub use process_guard::{CancellationToken, CleanupRegistry, CommandProcessGroup};
pub use types::{BinaryArch, Platform, Release};
pub use wizard::{Reply, Session, Wizard, WizardOptions, run_wizard};

// Product resolution
pub use logic::resolver::{ProductSet, parallel_bundle, resolve_products};
pub use logic::selection::{select_products, select_release};
