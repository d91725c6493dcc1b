//! Installation wizard controller
//!
//! The wizard is an explicit state machine. Each turn is either:
//!
//! - a question: [`Wizard::prompt`] returns text, the caller reads a line and
//!   hands it to [`Wizard::answer`]
//! - a step: `prompt` returns `None`, the caller shows [`Wizard::announce`]
//!   (if any) and runs [`Wizard::perform`]
//!
//! Both return a [`Reply`] of lines to show. A rejected answer leaves the
//! wizard where it was, so the same question comes back. Errors returned
//! from `answer`/`perform` are fatal.
//!
//! Stage order and forward-only movement are enforced by [`WizardContext`].
//! Follow-up questions inside a stage (create a missing directory, overwrite
//! an existing mpm) are tracked separately so the stage itself never moves
//! backwards.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::backend::Backend;
use crate::error::{Result, WizardError};
use crate::hardware::{HostInfo, PlatformDetection, default_download_dir, detect_platform};
use crate::input::{ANSWER_MARKER, LineSource, read_answer};
use crate::install_state::{WizardContext, WizardStage};
use crate::installer::MpmInstallArgs;
use crate::license::install_license;
use crate::logic::selection::{
    parse_architecture_choice, parse_confirmation, select_products, select_release,
    validate_license_path,
};
use crate::process_guard::CancellationToken;
use crate::theme::{Theme, Tone};
use crate::types::{DEFAULT_MPM_BASE_URL, Platform, Release};

/// Last line of a successful run.
pub const FINISHED_MESSAGE: &str = "Installation finished!";

/// Consecutive unreadable answers tolerated before giving up.
const MAX_READ_ERRORS: u32 = 5;

const LICENSE_MANUAL_HINT: &str = "You will need to manually place your license file in your installation.";

/// Defaults and overrides the wizard starts from.
#[derive(Debug, Clone)]
pub struct WizardOptions {
    pub host: HostInfo,
    pub mpm_base_url: String,
    /// Offered at the release prompt. Raised to the platform's oldest release if needed.
    pub default_release: Release,
    /// Replaces the platform temp directory as the default download location.
    pub download_dir: Option<PathBuf>,
    /// Replaces the platform default installation path.
    pub install_dir: Option<PathBuf>,
}

impl WizardOptions {
    pub fn for_host(host: HostInfo) -> Self {
        Self {
            host,
            mpm_base_url: DEFAULT_MPM_BASE_URL.to_string(),
            default_release: Release::LATEST,
            download_dir: None,
            install_dir: None,
        }
    }
}

/// Answers collected so far. Each stage fills in its own field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub platform: Option<Platform>,
    pub mpm_url: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub release: Option<Release>,
    pub products: Vec<String>,
    pub install_path: Option<PathBuf>,
    pub license: Option<PathBuf>,
}

impl Session {
    /// Location of the mpm binary once the download directory is settled.
    pub fn mpm_binary(&self) -> Option<PathBuf> {
        let platform = self.platform?;
        let dir = self.download_dir.as_ref()?;
        Some(dir.join(platform.binary_name()))
    }
}

/// A question the wizard is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    Architecture,
    DownloadPath,
    CreateDownloadDir(PathBuf),
    OverwriteMpm { dir: PathBuf, mismatched: bool },
    Release,
    Products,
    InstallPath,
    License,
}

/// Blocking work queued by an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Work {
    /// Optionally download mpm into `dir`, then make it executable.
    PrepareMpm { dir: PathBuf, download: bool },
}

/// One line of wizard output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLine {
    pub tone: Tone,
    pub text: String,
}

/// Output of one wizard turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<ReplyLine>,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, tone: Tone, text: impl Into<String>) -> &mut Self {
        self.lines.push(ReplyLine {
            tone,
            text: text.into(),
        });
        self
    }

    pub fn info(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Info, text)
    }

    pub fn success(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Success, text)
    }

    pub fn warning(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Warning, text)
    }

    pub fn error(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(Tone::Error, text)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.lines.iter().any(|l| l.tone == Tone::Error)
    }

    /// Plain text of every line, newline separated.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_to(&self, out: &mut dyn Write, color: bool) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{}", Theme::paint(line.tone, &line.text, color))?;
        }
        Ok(())
    }
}

/// The wizard state machine.
pub struct Wizard<B: Backend> {
    backend: B,
    options: WizardOptions,
    context: WizardContext,
    session: Session,
    pending: Option<Question>,
    work: Option<Work>,
    cancel: CancellationToken,
}

impl<B: Backend> Wizard<B> {
    pub fn new(backend: B, options: WizardOptions, cancel: CancellationToken) -> Self {
        Self {
            backend,
            options,
            context: WizardContext::new(),
            session: Session::default(),
            pending: None,
            work: None,
            cancel,
        }
    }

    pub fn stage(&self) -> WizardStage {
        self.context.current_stage()
    }

    pub fn is_done(&self) -> bool {
        self.context.is_done()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The question being asked, if the wizard is waiting on input.
    pub fn question(&self) -> Option<Question> {
        if self.work.is_some() {
            return None;
        }
        if let Some(pending) = &self.pending {
            return Some(pending.clone());
        }
        match self.stage() {
            WizardStage::DownloadPathSelect => Some(Question::DownloadPath),
            WizardStage::ReleaseSelect => Some(Question::Release),
            WizardStage::ProductSelect => Some(Question::Products),
            WizardStage::InstallPathSelect => Some(Question::InstallPath),
            WizardStage::LicenseSelect => Some(Question::License),
            _ => None,
        }
    }

    /// Text of the current question.
    pub fn prompt(&self) -> Option<String> {
        let text = match self.question()? {
            Question::Architecture => "Would you like to install an Intel or ARM version of your \
                products? Type in \"intel\", \"arm\" or \"idk\" if you're unsure."
                .to_string(),
            Question::DownloadPath => format!(
                "Enter the path to where you would like MPM to download to. Press Enter to use \"{}\"",
                self.default_download_dir().display()
            ),
            Question::CreateDownloadDir(dir) => format!(
                "The directory \"{}\" does not exist. Do you want to create it? (y/n)",
                dir.display()
            ),
            Question::OverwriteMpm { mismatched: true, .. } => "MPM already exists in this \
                directory and is for a different CPU architecture than you selected. Would you \
                like to overwrite it?"
                .to_string(),
            Question::OverwriteMpm { mismatched: false, .. } => {
                "MPM already exists in this directory. Would you like to overwrite it?".to_string()
            }
            Question::Release => format!(
                "Enter which release you would like to install. Press Enter to select {}:",
                self.default_release()
            ),
            Question::Products => "Enter the products you would like to install. Use the same \
                syntax as MPM to specify products. Press Enter to install all products."
                .to_string(),
            Question::InstallPath => format!(
                "Enter the full path where you would like to install these products. Press Enter \
                 to install to default path: \"{}\"",
                self.default_install_path().display()
            ),
            Question::License => "If you have a license file you'd like to include in your \
                installation, please provide the full path to the existing license file."
                .to_string(),
        };
        Some(text)
    }

    /// Line to show before [`perform`](Self::perform) blocks.
    pub fn announce(&self) -> Option<&'static str> {
        match (&self.work, self.stage()) {
            (Some(Work::PrepareMpm { download: true, .. }), _) => {
                Some("Downloading MPM. Please wait.")
            }
            (None, WizardStage::Install) => Some("Loading, please wait."),
            _ => None,
        }
    }

    /// Handle an answer to the current question.
    pub fn answer(&mut self, input: &str) -> Result<Reply> {
        let question = self.question().ok_or_else(|| {
            WizardError::Transition(format!("no question is open at stage {}", self.stage()))
        })?;
        let input = input.trim();
        let mut reply = Reply::new();

        match question {
            Question::Architecture => self.answer_architecture(input, &mut reply)?,
            Question::DownloadPath => self.answer_download_path(input, &mut reply)?,
            Question::CreateDownloadDir(dir) => {
                self.answer_create_download_dir(&dir, input, &mut reply)?
            }
            Question::OverwriteMpm { dir, mismatched } => {
                self.answer_overwrite(dir, mismatched, input, &mut reply)?
            }
            Question::Release => self.answer_release(input, &mut reply)?,
            Question::Products => self.answer_products(input, &mut reply)?,
            Question::InstallPath => self.answer_install_path(input, &mut reply)?,
            Question::License => self.answer_license(input, &mut reply)?,
        }

        Ok(reply)
    }

    /// Run the non-interactive work at the current point.
    pub fn perform(&mut self) -> Result<Reply> {
        let mut reply = Reply::new();

        if let Some(work) = self.work.take() {
            match work {
                Work::PrepareMpm { dir, download } => {
                    self.prepare_mpm(dir, download, &mut reply)?
                }
            }
            return Ok(reply);
        }

        match self.stage() {
            WizardStage::PlatformDetect if self.pending.is_none() => {
                self.detect_platform()?
            }
            WizardStage::Install => self.install()?,
            WizardStage::LicenseInstall => self.place_license(&mut reply)?,
            stage => {
                return Err(WizardError::Transition(format!(
                    "nothing to perform at stage {}",
                    stage
                )));
            }
        }
        Ok(reply)
    }

    // -------------------------------------------------------------------------
    // Defaults
    // -------------------------------------------------------------------------

    fn default_download_dir(&self) -> PathBuf {
        self.options
            .download_dir
            .clone()
            .unwrap_or_else(|| default_download_dir(&self.options.host))
    }

    fn default_release(&self) -> Release {
        let floor = self
            .session
            .platform
            .map(Platform::first_supported_release)
            .unwrap_or(Release::R2017b);
        self.options.default_release.max(floor)
    }

    fn default_install_path(&self) -> PathBuf {
        if let Some(dir) = &self.options.install_dir {
            return dir.clone();
        }
        match (self.session.platform, self.session.release) {
            (Some(platform), Some(release)) => platform.default_install_path(release),
            _ => PathBuf::new(),
        }
    }

    fn platform(&self) -> Result<Platform> {
        self.session
            .platform
            .ok_or_else(|| WizardError::Transition("platform has not been selected".into()))
    }

    fn release(&self) -> Result<Release> {
        self.session
            .release
            .ok_or_else(|| WizardError::Transition("release has not been selected".into()))
    }

    // -------------------------------------------------------------------------
    // Platform
    // -------------------------------------------------------------------------

    fn detect_platform(&mut self) -> Result<()> {
        match detect_platform(&self.options.host) {
            PlatformDetection::Resolved(platform) => {
                if platform == Platform::Windows {
                    self.check_admin()?;
                }
                self.set_platform(platform);
                self.context.advance()?;
            }
            PlatformDetection::NeedsArchitectureChoice => {
                tracing::debug!("Apple Silicon host, asking for product architecture");
                self.pending = Some(Question::Architecture);
            }
            PlatformDetection::Unsupported => {
                return Err(WizardError::UnsupportedPlatform {
                    os: self.options.host.os.clone(),
                    arch: self.options.host.arch.clone(),
                });
            }
        }
        Ok(())
    }

    fn check_admin(&self) -> Result<()> {
        match self.backend.has_admin_rights() {
            Ok(true) => Ok(()),
            Ok(false) => Err(WizardError::AdminRequired { detail: None }),
            Err(e) => Err(WizardError::AdminRequired {
                detail: Some(format!("{:#}", e)),
            }),
        }
    }

    fn set_platform(&mut self, platform: Platform) {
        tracing::info!("Platform: {}", platform);
        self.session.platform = Some(platform);
        self.session.mpm_url = Some(platform.mpm_url(&self.options.mpm_base_url));
    }

    fn answer_architecture(&mut self, input: &str, reply: &mut Reply) -> Result<()> {
        match parse_architecture_choice(input) {
            Some(platform) => {
                self.pending = None;
                self.set_platform(platform);
                self.context.advance()?;
            }
            None => {
                reply.error("Invalid selection. Enter either intel, arm, or idk.");
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Download location
    // -------------------------------------------------------------------------

    fn answer_download_path(&mut self, input: &str, reply: &mut Reply) -> Result<()> {
        if input.is_empty() {
            return self.settle_download_dir(self.default_download_dir(), reply);
        }

        let dir = PathBuf::from(input);
        match std::fs::metadata(&dir) {
            Ok(_) => self.settle_download_dir(dir, reply),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.pending = Some(Question::CreateDownloadDir(dir));
                Ok(())
            }
            Err(e) => {
                reply.error(format!(
                    "Error checking the directory: {}. Please select a different directory.",
                    e
                ));
                Ok(())
            }
        }
    }

    fn answer_create_download_dir(
        &mut self,
        dir: &Path,
        input: &str,
        reply: &mut Reply,
    ) -> Result<()> {
        self.pending = None;

        if parse_confirmation(input) != Some(true) {
            reply.error("Directory creation skipped. Please select a different directory.");
            return Ok(());
        }

        if let Err(e) = std::fs::create_dir_all(dir) {
            reply.error(format!(
                "Failed to create the directory: {}. Please select a different directory.",
                e
            ));
            return Ok(());
        }

        reply.info("Directory created successfully.");
        self.settle_download_dir(dir.to_path_buf(), reply)
    }

    /// Decide whether mpm has to be fetched into `dir`.
    fn settle_download_dir(&mut self, dir: PathBuf, reply: &mut Reply) -> Result<()> {
        let platform = self.platform()?;
        let binary = dir.join(platform.binary_name());

        if !binary.exists() {
            self.work = Some(Work::PrepareMpm {
                dir,
                download: true,
            });
            return Ok(());
        }

        let mut mismatched = false;
        if let Some(expected) = platform.expected_binary_arch() {
            reply.info(
                "An existing copy of MPM has been detected. Checking which version you \
                 downloaded, please wait.",
            );
            let found = self.backend.binary_arch(&binary).map_err(|e| {
                WizardError::architecture(format!(
                    "Error checking MPM's file architecture: {:#}. Please move or delete your \
                     existing copy of MPM from the selected directory before proceeding. You \
                     likely either have a corrupted copy of MPM or it is for Windows or Linux.",
                    e
                ))
            })?;
            let found = found.ok_or_else(|| {
                WizardError::architecture(
                    "Error checking MPM's file architecture. Please move or delete your existing \
                     copy of MPM from the selected directory before proceeding.",
                )
            })?;
            tracing::debug!("Existing mpm is {}, expected {}", found, expected);
            mismatched = found != expected;
        }

        self.pending = Some(Question::OverwriteMpm { dir, mismatched });
        Ok(())
    }

    fn answer_overwrite(
        &mut self,
        dir: PathBuf,
        mismatched: bool,
        input: &str,
        reply: &mut Reply,
    ) -> Result<()> {
        match parse_confirmation(input) {
            Some(true) => {
                self.pending = None;
                self.work = Some(Work::PrepareMpm {
                    dir,
                    download: true,
                });
            }
            Some(false) if mismatched => {
                return Err(WizardError::architecture(
                    "You can't use a version of MPM that doesn't match the CPU architecture you \
                     selected. Please either select a different directory to download MPM or \
                     move your existing copy elsewhere.",
                ));
            }
            Some(false) => {
                self.pending = None;
                reply.info("Skipping download.");
                self.work = Some(Work::PrepareMpm {
                    dir,
                    download: false,
                });
            }
            None => {
                reply.error("Invalid choice. Please enter either 'y' or 'n'.");
            }
        }
        Ok(())
    }

    fn prepare_mpm(&mut self, dir: PathBuf, download: bool, reply: &mut Reply) -> Result<()> {
        let platform = self.platform()?;
        let binary = dir.join(platform.binary_name());

        if download {
            let url = self
                .session
                .mpm_url
                .clone()
                .unwrap_or_else(|| platform.mpm_url(&self.options.mpm_base_url));
            self.backend.download(&url, &binary, &self.cancel)?;
            reply.info("MPM downloaded successfully.");
        }

        if platform != Platform::Windows {
            if let Err(e) = self.backend.make_executable(&binary) {
                tracing::warn!("Cannot make {} executable: {}", binary.display(), e);
                reply.error(format!(
                    "Failed to make MPM executable: {}. Either select a different directory, run \
                     this program with needed privileges, or make modifications to MPM outside \
                     of this program.",
                    e
                ));
                return Ok(());
            }
        }

        self.session.download_dir = Some(dir);
        self.context.advance()?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Release and products
    // -------------------------------------------------------------------------

    fn answer_release(&mut self, input: &str, reply: &mut Reply) -> Result<()> {
        match select_release(input, self.platform()?, self.default_release()) {
            Ok(release) => {
                tracing::info!("Release: {}", release);
                self.session.release = Some(release);
                self.context.advance()?;
            }
            Err(e) => {
                reply.error(e.to_string());
            }
        }
        Ok(())
    }

    fn answer_products(&mut self, input: &str, reply: &mut Reply) -> Result<()> {
        match select_products(input, self.platform()?, self.release()?) {
            Ok(products) => {
                tracing::info!("{} product(s) selected", products.len());
                self.session.products = products;
                self.context.advance()?;
            }
            Err(unknown) => {
                for line in unknown.to_string().lines() {
                    reply.error(line);
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Installation path and license
    // -------------------------------------------------------------------------

    fn answer_install_path(&mut self, input: &str, reply: &mut Reply) -> Result<()> {
        let path = if input.is_empty() {
            self.default_install_path()
        } else {
            let path = PathBuf::from(input);
            match std::fs::metadata(&path) {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    if let Err(e) = std::fs::create_dir_all(&path) {
                        reply.error(format!(
                            "Error creating directory: {}. Please pick a different installation path.",
                            e
                        ));
                        return Ok(());
                    }
                    match std::path::absolute(&path) {
                        Ok(full) => {
                            reply.info(format!("Directory successfully created: {}", full.display()));
                        }
                        Err(e) => {
                            reply.error(format!(
                                "Error reading newly-created directory's full path: {}. Please \
                                 pick a different installation path.",
                                e
                            ));
                            return Ok(());
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!("stat {} failed: {}", path.display(), e);
                    let full = std::path::absolute(&path).unwrap_or_else(|_| path.clone());
                    reply.error(format!(
                        "Error selecting directory: {}. Please pick a different installation path.",
                        full.display()
                    ));
                    return Ok(());
                }
            }
            path
        };

        tracing::info!("Install path: {}", path.display());
        self.session.install_path = Some(path);
        self.context.advance()?;
        Ok(())
    }

    fn answer_license(&mut self, input: &str, reply: &mut Reply) -> Result<()> {
        if input.is_empty() {
            self.session.license = None;
            self.context.advance()?;
            return Ok(());
        }

        match validate_license_path(input) {
            Ok(path) => {
                self.session.license = Some(path);
                self.context.advance()?;
            }
            Err(e) => {
                reply.error(e.to_string());
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Installation
    // -------------------------------------------------------------------------

    fn install(&mut self) -> Result<()> {
        let binary = self
            .session
            .mpm_binary()
            .ok_or_else(|| WizardError::Transition("mpm location is unknown".into()))?;
        let destination = self
            .session
            .install_path
            .clone()
            .ok_or_else(|| WizardError::Transition("installation path is unknown".into()))?;

        let args = MpmInstallArgs {
            binary,
            release: self.release()?,
            destination,
            products: self.session.products.clone(),
        };
        self.backend.run_installer(&args, &self.cancel)?;
        self.context.advance()?;
        Ok(())
    }

    fn place_license(&mut self, reply: &mut Reply) -> Result<()> {
        if let (Some(license), Some(install_path)) =
            (&self.session.license, &self.session.install_path)
        {
            if let Err(e) = install_license(install_path, license) {
                tracing::warn!("License copy failed: {:#}", e);
                reply.warning(format!("{:#}. {}", e, LICENSE_MANUAL_HINT));
            }
        }

        self.context.advance()?;
        reply.success(FINISHED_MESSAGE);
        Ok(())
    }
}

/// Drive `wizard` to completion, reading answers from `lines` and writing
/// dialogue to `out`.
pub fn run_wizard<B: Backend>(
    wizard: &mut Wizard<B>,
    lines: &mut dyn LineSource,
    out: &mut dyn Write,
    color: bool,
) -> Result<()> {
    let mut read_errors = 0;
    while !wizard.is_done() {
        let reply = match wizard.prompt() {
            Some(prompt) => {
                writeln!(out, "{}", prompt)?;
                if !lines.draws_marker() {
                    write!(out, "{} ", ANSWER_MARKER)?;
                }
                out.flush()?;
                let cancel = wizard.cancel_token().clone();
                let input = match read_answer(lines, &cancel) {
                    Ok(input) => input,
                    Err(WizardError::Io(e)) if read_errors < MAX_READ_ERRORS => {
                        read_errors += 1;
                        tracing::warn!("Failed to read answer ({}/{}): {}", read_errors, MAX_READ_ERRORS, e);
                        Reply::new()
                            .error(format!("Error reading line: {}", e))
                            .write_to(out, color)?;
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                read_errors = 0;
                wizard.answer(&input)?
            }
            None => {
                if let Some(notice) = wizard.announce() {
                    writeln!(out, "{}", notice)?;
                    out.flush()?;
                }
                wizard.perform()?
            }
        };
        reply.write_to(out, color)?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BinaryArch;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeBackend {
        admin: bool,
        arch: Option<BinaryArch>,
        calls: RefCell<Vec<String>>,
        installed: RefCell<Option<MpmInstallArgs>>,
    }

    impl Backend for FakeBackend {
        fn has_admin_rights(&self) -> anyhow::Result<bool> {
            self.calls.borrow_mut().push("admin".into());
            Ok(self.admin)
        }

        fn download(&self, url: &str, dest: &Path, _cancel: &CancellationToken) -> Result<u64> {
            self.calls.borrow_mut().push(format!("download {}", url));
            std::fs::write(dest, b"mpm")?;
            Ok(3)
        }

        fn binary_arch(&self, _binary: &Path) -> anyhow::Result<Option<BinaryArch>> {
            self.calls.borrow_mut().push("lipo".into());
            Ok(self.arch)
        }

        fn make_executable(&self, _binary: &Path) -> io::Result<()> {
            self.calls.borrow_mut().push("chmod".into());
            Ok(())
        }

        fn run_installer(&self, args: &MpmInstallArgs, _cancel: &CancellationToken) -> Result<()> {
            self.calls.borrow_mut().push("install".into());
            *self.installed.borrow_mut() = Some(args.clone());
            Ok(())
        }
    }

    fn wizard(os: &str, arch: &str, backend: FakeBackend, dir: &Path) -> Wizard<FakeBackend> {
        let mut options = WizardOptions::for_host(HostInfo::new(os, arch));
        options.download_dir = Some(dir.to_path_buf());
        Wizard::new(backend, options, CancellationToken::new())
    }

    #[test]
    fn test_linux_skips_architecture_question() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = wizard("linux", "x86_64", FakeBackend::default(), dir.path());

        assert_eq!(w.prompt(), None);
        w.perform().unwrap();
        assert_eq!(w.stage(), WizardStage::DownloadPathSelect);
        assert_eq!(w.session().platform, Some(Platform::Linux));
        assert!(w.backend().calls.borrow().is_empty());
    }

    #[test]
    fn test_apple_silicon_asks_and_retries() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = wizard("macos", "aarch64", FakeBackend::default(), dir.path());

        w.perform().unwrap();
        assert_eq!(w.question(), Some(Question::Architecture));

        let reply = w.answer("powerpc").unwrap();
        assert!(reply.has_errors());
        assert_eq!(w.question(), Some(Question::Architecture));

        w.answer("ARM").unwrap();
        assert_eq!(w.session().platform, Some(Platform::MacOsArm));
        assert_eq!(w.stage(), WizardStage::DownloadPathSelect);
        assert_eq!(
            w.session().mpm_url.as_deref(),
            Some("https://www.mathworks.com/mpm/maca64/mpm")
        );
    }

    #[test]
    fn test_windows_without_admin_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = wizard("windows", "x86_64", FakeBackend::default(), dir.path());
        let err = w.perform().unwrap_err();
        assert!(matches!(err, WizardError::AdminRequired { detail: None }));
    }

    #[test]
    fn test_unsupported_host_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = wizard("freebsd", "x86_64", FakeBackend::default(), dir.path());
        assert!(matches!(
            w.perform(),
            Err(WizardError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn test_default_download_dir_downloads_and_advances() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = wizard("linux", "x86_64", FakeBackend::default(), dir.path());
        w.perform().unwrap();

        w.answer("").unwrap();
        assert_eq!(w.prompt(), None);
        assert_eq!(w.announce(), Some("Downloading MPM. Please wait."));

        let reply = w.perform().unwrap();
        assert_eq!(reply.text(), "MPM downloaded successfully.");
        assert_eq!(w.stage(), WizardStage::ReleaseSelect);
        assert_eq!(w.session().mpm_binary(), Some(dir.path().join("mpm")));
        assert_eq!(
            *w.backend().calls.borrow(),
            vec![
                "download https://www.mathworks.com/mpm/glnxa64/mpm".to_string(),
                "chmod".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_download_dir_needs_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("new").join("mpm-dir");
        let mut w = wizard("linux", "x86_64", FakeBackend::default(), dir.path());
        w.perform().unwrap();

        w.answer(target.to_str().unwrap()).unwrap();
        assert_eq!(w.question(), Some(Question::CreateDownloadDir(target.clone())));

        let reply = w.answer("nope").unwrap();
        assert!(reply.has_errors());
        assert_eq!(w.question(), Some(Question::DownloadPath));
        assert!(!target.exists());

        w.answer(target.to_str().unwrap()).unwrap();
        let reply = w.answer("yes").unwrap();
        assert_eq!(reply.text(), "Directory created successfully.");
        assert!(target.is_dir());
        assert_eq!(w.announce(), Some("Downloading MPM. Please wait."));
    }

    #[test]
    fn test_existing_mpm_can_be_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mpm"), b"old").unwrap();
        let mut w = wizard("linux", "x86_64", FakeBackend::default(), dir.path());
        w.perform().unwrap();

        w.answer("").unwrap();
        assert_eq!(
            w.question(),
            Some(Question::OverwriteMpm {
                dir: dir.path().to_path_buf(),
                mismatched: false
            })
        );
        assert!(w.answer("perhaps").unwrap().has_errors());

        let reply = w.answer("n").unwrap();
        assert_eq!(reply.text(), "Skipping download.");
        assert_eq!(w.announce(), None);
        w.perform().unwrap();

        assert_eq!(w.stage(), WizardStage::ReleaseSelect);
        assert_eq!(*w.backend().calls.borrow(), vec!["chmod".to_string()]);
        assert_eq!(std::fs::read(dir.path().join("mpm")).unwrap(), b"old");
    }

    #[test]
    fn test_mismatched_mpm_refused_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mpm"), b"old").unwrap();
        let backend = FakeBackend {
            arch: Some(BinaryArch::X86_64),
            ..FakeBackend::default()
        };
        let mut w = wizard("macos", "aarch64", backend, dir.path());
        w.perform().unwrap();
        w.answer("arm").unwrap();

        w.answer("").unwrap();
        assert_eq!(
            w.question(),
            Some(Question::OverwriteMpm {
                dir: dir.path().to_path_buf(),
                mismatched: true
            })
        );
        assert!(matches!(w.answer("no"), Err(WizardError::Architecture(_))));
    }

    #[test]
    fn test_unrecognised_lipo_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mpm"), b"old").unwrap();
        let mut w = wizard("macos", "x86_64", FakeBackend::default(), dir.path());
        w.perform().unwrap();
        assert!(matches!(w.answer(""), Err(WizardError::Architecture(_))));
    }

    #[test]
    fn test_arm_default_release_is_raised_to_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = WizardOptions::for_host(HostInfo::new("macos", "aarch64"));
        options.download_dir = Some(dir.path().to_path_buf());
        options.default_release = Release::R2019a;
        let mut w = Wizard::new(FakeBackend::default(), options, CancellationToken::new());

        w.perform().unwrap();
        w.answer("arm").unwrap();
        w.answer("").unwrap();
        w.perform().unwrap();

        assert!(w.prompt().unwrap().ends_with("Press Enter to select R2023b:"));
        w.answer("").unwrap();
        assert_eq!(w.session().release, Some(Release::R2023b));
    }

    #[test]
    fn test_answer_without_question_is_transition_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = wizard("linux", "x86_64", FakeBackend::default(), dir.path());
        assert!(matches!(w.answer("x"), Err(WizardError::Transition(_))));
    }

    #[test]
    fn test_reply_rendering() {
        let mut reply = Reply::new();
        reply.info("one").error("two");
        let mut out = Vec::new();
        reply.write_to(&mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "one\ntwo\n");
        assert!(reply.has_errors());
    }
}
