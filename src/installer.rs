//! mpm invocation
//!
//! Builds the `mpm install` command line from the session and runs it with
//! stdout/stderr relayed to the terminal. mpm prints nothing while it
//! installs, so its output passes through [`InstallNoticeWriter`], which adds
//! a note once the install phase starts.
//!
//! # Process handling
//!
//! - mpm runs in its own process group, registered with the cleanup registry
//! - the exit is polled so a cancelled token terminates mpm instead of
//!   blocking until it finishes

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Result, WizardError};
use crate::process_guard::{CancellationToken, CleanupRegistry, CommandProcessGroup};
use crate::types::Release;

/// mpm output line that marks the start of the silent install phase.
pub const INSTALL_STARTED_MARKER: &str = "Starting install";

/// Extra line written after [`INSTALL_STARTED_MARKER`] is seen.
pub const INSTALL_STARTED_NOTICE: &str =
    "Installation has begun. Please wait while it finishes. There is no progress indicator.";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Arguments for one `mpm install` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpmInstallArgs {
    pub binary: PathBuf,
    pub release: Release,
    pub destination: PathBuf,
    pub products: Vec<String>,
}

impl MpmInstallArgs {
    /// Arguments exactly as mpm expects them, without the program name.
    pub fn to_cli_args(&self) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            format!("--release={}", self.release),
            format!("--destination={}", self.destination.display()),
            "--products".to_string(),
        ];
        args.extend(self.products.iter().cloned());
        args
    }
}

/// Writer decorator that appends [`INSTALL_STARTED_NOTICE`] after any write
/// completing [`INSTALL_STARTED_MARKER`].
///
/// The marker may be split across writes, so the tail of the previous write
/// is kept for matching.
pub struct InstallNoticeWriter<W: Write> {
    inner: W,
    tail: Vec<u8>,
}

impl<W: Write> InstallNoticeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            tail: Vec::with_capacity(INSTALL_STARTED_MARKER.len()),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn completes_marker(&mut self, buf: &[u8]) -> bool {
        let marker = INSTALL_STARTED_MARKER.as_bytes();
        let mut window = std::mem::take(&mut self.tail);
        window.extend_from_slice(buf);

        let found = window.windows(marker.len()).any(|w| w == marker);

        let keep = marker.len() - 1;
        let start = window.len().saturating_sub(keep);
        self.tail = if found { Vec::new() } else { window[start..].to_vec() };
        found
    }
}

impl<W: Write> Write for InstallNoticeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write_all(buf)?;
        if self.completes_marker(buf) {
            writeln!(self.inner, "{}", INSTALL_STARTED_NOTICE)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Run mpm to completion, relaying its output.
///
/// # Errors
///
/// - `MpmMissing` when the binary cannot be started
/// - `InstallFailed` when mpm exits non-zero
/// - `Interrupted` when `cancel` fires; mpm is terminated first
pub fn run_mpm(args: &MpmInstallArgs, cancel: &CancellationToken) -> Result<()> {
    let cli_args = args.to_cli_args();
    tracing::info!("run_mpm: {} {:?}", args.binary.display(), cli_args);

    let mut child = Command::new(&args.binary)
        .args(&cli_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .in_new_process_group()
        .spawn()
        .map_err(|e| spawn_error(args, e))?;

    let pid = child.id();
    if let Ok(mut registry) = CleanupRegistry::global().lock() {
        registry.register_child(pid);
    }

    let pumps = [
        child
            .stdout
            .take()
            .map(|out| pump(out, InstallNoticeWriter::new(io::stdout()))),
        child
            .stderr
            .take()
            .map(|err| pump(err, InstallNoticeWriter::new(io::stderr()))),
    ];

    let status = wait_with_cancel(&mut child, cancel);

    if let Ok(mut registry) = CleanupRegistry::global().lock() {
        registry.unregister_child(pid);
    }
    for handle in pumps.into_iter().flatten() {
        if handle.join().is_err() {
            tracing::warn!("Output relay thread panicked");
        }
    }

    let status = status?;
    if status.success() {
        tracing::info!("mpm finished successfully");
        Ok(())
    } else {
        Err(WizardError::install_failed(format!("mpm {}", status)))
    }
}

fn spawn_error(args: &MpmInstallArgs, err: io::Error) -> WizardError {
    tracing::error!("Failed to start {}: {}", args.binary.display(), err);
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => WizardError::MpmMissing {
            path: args.binary.clone(),
        },
        _ => WizardError::install_failed(err.to_string()),
    }
}

fn pump<R, W>(mut reader: R, mut writer: W) -> JoinHandle<()>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    thread::spawn(move || {
        if let Err(e) = io::copy(&mut reader, &mut writer) {
            tracing::warn!("Lost mpm output: {}", e);
        }
        let _ = writer.flush();
    })
}

fn wait_with_cancel(child: &mut Child, cancel: &CancellationToken) -> Result<ExitStatus> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if cancel.is_cancelled() {
            tracing::info!("Cancelling mpm (PID {})", child.id());
            let _ = child.kill();
            let _ = child.wait();
            return Err(WizardError::Interrupted);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MpmInstallArgs {
        MpmInstallArgs {
            binary: PathBuf::from("/tmp/mpm"),
            release: Release::R2024b,
            destination: PathBuf::from("/usr/local/MATLAB/R2024b"),
            products: vec!["MATLAB".to_string(), "Simulink".to_string()],
        }
    }

    #[test]
    fn test_cli_args_layout() {
        assert_eq!(
            args().to_cli_args(),
            vec![
                "install",
                "--release=R2024b",
                "--destination=/usr/local/MATLAB/R2024b",
                "--products",
                "MATLAB",
                "Simulink",
            ]
        );
    }

    #[test]
    fn test_notice_follows_marker() {
        let mut writer = InstallNoticeWriter::new(Vec::new());
        writer.write_all(b"Preparing\n").unwrap();
        writer.write_all(b"Starting install\n").unwrap();
        writer.write_all(b"Done\n").unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            format!("Preparing\nStarting install\n{}\nDone\n", INSTALL_STARTED_NOTICE)
        );
    }

    #[test]
    fn test_notice_for_marker_split_across_writes() {
        let mut writer = InstallNoticeWriter::new(Vec::new());
        writer.write_all(b"...Starting ins").unwrap();
        writer.write_all(b"tall of 3 products\n").unwrap();

        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.matches(INSTALL_STARTED_NOTICE).count(), 1);
        assert!(text.ends_with(&format!("{}\n", INSTALL_STARTED_NOTICE)));
    }

    #[test]
    fn test_no_notice_without_marker() {
        let mut writer = InstallNoticeWriter::new(Vec::new());
        writer.write_all(b"Starting download\n").unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "Starting download\n");
    }

    #[test]
    fn test_missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let mut missing = args();
        missing.binary = dir.path().join("mpm");

        let err = run_mpm(&missing, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, WizardError::MpmMissing { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_binary_is_install_failed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("mpm");
        std::fs::write(&script, "#!/bin/sh\necho Starting install\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut failing = args();
        failing.binary = script;
        let err = run_mpm(&failing, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, WizardError::InstallFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_cancel_terminates_mpm() {
        use std::os::unix::fs::PermissionsExt;
        use std::time::Instant;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("mpm");
        std::fs::write(&script, "#!/bin/sh\nexec sleep 60\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut slow = args();
        slow.binary = script;
        let token = CancellationToken::new();
        let canceller = token.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(200));
            canceller.cancel();
        });

        let start = Instant::now();
        let err = run_mpm(&slow, &token).unwrap_err();
        assert!(matches!(err, WizardError::Interrupted));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn test_mpm_sees_end_of_input_on_stdin() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("mpm");
        // Exits non-zero only if something could be read from stdin
        std::fs::write(&script, "#!/bin/sh\nif read answer; then exit 4; fi\nexit 0\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut reading = args();
        reading.binary = script;
        run_mpm(&reading, &CancellationToken::new()).unwrap();
    }
}
