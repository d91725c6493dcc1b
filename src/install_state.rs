//! Wizard Stage Machine
//!
//! Single source of truth for where the wizard is. Stages only move forward,
//! one step at a time; a stage that rejects an answer simply stays put.
//!
//! # Stage Flow
//!
//! ```text
//! PlatformDetect
//!     ↓
//! DownloadPathSelect   (downloads mpm once a directory is settled)
//!     ↓
//! ReleaseSelect
//!     ↓
//! ProductSelect
//!     ↓
//! InstallPathSelect
//!     ↓
//! LicenseSelect
//!     ↓
//! Install              (runs mpm)
//!     ↓
//! LicenseInstall
//!     ↓
//! Done
//! ```
//!
//! There is no backward transition and no failure stage: a fatal error
//! ends the process instead.

use std::fmt;
use thiserror::Error;

/// Wizard stages in sequential order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WizardStage {
    PlatformDetect = 0,
    DownloadPathSelect = 1,
    ReleaseSelect = 2,
    ProductSelect = 3,
    InstallPathSelect = 4,
    LicenseSelect = 5,
    Install = 6,
    LicenseInstall = 7,
    Done = 8,
}

impl WizardStage {
    #[inline]
    pub const fn order(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Stages that are answered by the user rather than executed.
    ///
    /// `PlatformDetect` is interactive only on Apple Silicon, so the wizard
    /// decides that case itself.
    #[inline]
    pub const fn is_interactive(self) -> bool {
        matches!(
            self,
            Self::DownloadPathSelect
                | Self::ReleaseSelect
                | Self::ProductSelect
                | Self::InstallPathSelect
                | Self::LicenseSelect
        )
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::PlatformDetect => Some(Self::DownloadPathSelect),
            Self::DownloadPathSelect => Some(Self::ReleaseSelect),
            Self::ReleaseSelect => Some(Self::ProductSelect),
            Self::ProductSelect => Some(Self::InstallPathSelect),
            Self::InstallPathSelect => Some(Self::LicenseSelect),
            Self::LicenseSelect => Some(Self::Install),
            Self::Install => Some(Self::LicenseInstall),
            Self::LicenseInstall => Some(Self::Done),
            Self::Done => None,
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::PlatformDetect => "Detecting platform",
            Self::DownloadPathSelect => "Selecting MPM download location",
            Self::ReleaseSelect => "Selecting release",
            Self::ProductSelect => "Selecting products",
            Self::InstallPathSelect => "Selecting installation path",
            Self::LicenseSelect => "Selecting license file",
            Self::Install => "Installing products",
            Self::LicenseInstall => "Installing license file",
            Self::Done => "Installation finished",
        }
    }

    pub const fn all_stages() -> &'static [Self] {
        &[
            Self::PlatformDetect,
            Self::DownloadPathSelect,
            Self::ReleaseSelect,
            Self::ProductSelect,
            Self::InstallPathSelect,
            Self::LicenseSelect,
            Self::Install,
            Self::LicenseInstall,
            Self::Done,
        ]
    }
}

impl fmt::Display for WizardStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during stage transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageTransitionError {
    #[error("Cannot skip from {from} to {to} (must transition through intermediate stages)")]
    SkippedStage { from: WizardStage, to: WizardStage },

    #[error("Cannot go backwards from {from} to {to} (the wizard is forward-only)")]
    BackwardTransition { from: WizardStage, to: WizardStage },

    #[error("Cannot transition from terminal stage {from}")]
    FromTerminalStage { from: WizardStage },

    #[error("Already at stage {stage}")]
    AlreadyAtStage { stage: WizardStage },
}

/// Owns the current stage and the order stages were entered in.
#[derive(Debug, Clone)]
pub struct WizardContext {
    current: WizardStage,
    history: Vec<WizardStage>,
}

impl Default for WizardContext {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardContext {
    pub fn new() -> Self {
        let mut history = Vec::with_capacity(WizardStage::all_stages().len());
        history.push(WizardStage::PlatformDetect);
        Self {
            current: WizardStage::PlatformDetect,
            history,
        }
    }

    #[inline]
    pub fn current_stage(&self) -> WizardStage {
        self.current
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.current.is_terminal()
    }

    /// Stages entered so far, starting with `PlatformDetect`.
    pub fn history(&self) -> &[WizardStage] {
        &self.history
    }

    /// Advance to the next stage in sequence.
    pub fn advance(&mut self) -> Result<WizardStage, StageTransitionError> {
        let next = self
            .current
            .next()
            .ok_or(StageTransitionError::FromTerminalStage { from: self.current })?;

        tracing::debug!("Wizard stage: {} -> {}", self.current, next);
        self.history.push(next);
        self.current = next;
        Ok(next)
    }

    /// Transition to `target`, which must be exactly the next stage.
    pub fn transition_to(
        &mut self,
        target: WizardStage,
    ) -> Result<WizardStage, StageTransitionError> {
        if self.current.is_terminal() {
            return Err(StageTransitionError::FromTerminalStage { from: self.current });
        }
        if target == self.current {
            return Err(StageTransitionError::AlreadyAtStage { stage: target });
        }
        if target.order() < self.current.order() {
            return Err(StageTransitionError::BackwardTransition {
                from: self.current,
                to: target,
            });
        }
        if self.current.next() != Some(target) {
            return Err(StageTransitionError::SkippedStage {
                from: self.current,
                to: target,
            });
        }

        self.advance()
    }
}

impl From<StageTransitionError> for crate::error::WizardError {
    fn from(err: StageTransitionError) -> Self {
        crate::error::WizardError::Transition(err.to_string())
    }
}
