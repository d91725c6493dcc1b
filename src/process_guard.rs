//! Cancellation and cleanup on interrupt
//!
//! The wizard runs on one thread. An interrupt can arrive while it is
//! blocked on a prompt, a download, or the mpm subprocess. Two mechanisms
//! cover those cases:
//!
//! - A [`CancellationToken`] passed to every blocking operation, checked
//!   between chunks of work so the operation can stop and tidy up itself.
//! - A global [`CleanupRegistry`] of running child PIDs and half-written
//!   files. The signal handler drains it before exiting, so a prompt that
//!   never returns still leaves no orphaned mpm or partial binary behind.
//!
//! Children are spawned in their own process group so the whole mpm tree
//! receives the termination signal.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Message printed whenever the user leaves the wizard.
pub const EXIT_MESSAGE: &str = "Exiting from user input.";

/// Global cleanup registry
static CLEANUP_REGISTRY: OnceLock<Arc<Mutex<CleanupRegistry>>> = OnceLock::new();

/// Shared flag flipped once by the interrupt handler.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Resources that must not outlive an interrupted wizard.
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    /// Running child process (group) IDs
    pids: HashSet<u32>,
    /// Files being written that are useless if the write is cut short
    partial_files: HashSet<PathBuf>,
    /// Whether cleanup has already run (prevent double-cleanup)
    cleanup_initiated: bool,
}

impl CleanupRegistry {
    /// Get or create the global registry
    pub fn global() -> Arc<Mutex<CleanupRegistry>> {
        CLEANUP_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(CleanupRegistry::default())))
            .clone()
    }

    pub fn register_child(&mut self, pid: u32) {
        self.pids.insert(pid);
        tracing::debug!("Registered child process PID {}", pid);
    }

    pub fn unregister_child(&mut self, pid: u32) {
        self.pids.remove(&pid);
        tracing::debug!("Unregistered child process PID {}", pid);
    }

    pub fn register_partial_file(&mut self, path: &Path) {
        self.partial_files.insert(path.to_path_buf());
    }

    pub fn unregister_partial_file(&mut self, path: &Path) {
        self.partial_files.remove(path);
    }

    pub fn child_count(&self) -> usize {
        self.pids.len()
    }

    pub fn partial_file_count(&self) -> usize {
        self.partial_files.len()
    }

    /// Terminate tracked children and delete partial files.
    ///
    /// Children get SIGTERM, then `grace_period` to exit, then SIGKILL.
    /// Runs at most once per registry.
    pub fn cleanup_all(&mut self, grace_period: Duration) {
        if self.cleanup_initiated {
            tracing::debug!("Cleanup already initiated, skipping");
            return;
        }
        self.cleanup_initiated = true;

        let pids: Vec<u32> = self.pids.drain().collect();
        if !pids.is_empty() {
            tracing::info!("Terminating {} child process(es)", pids.len());
            terminate_children(&pids, grace_period);
        }

        for path in self.partial_files.drain() {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::info!("Removed partial file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove partial file {}: {}", path.display(), e),
            }
        }
    }
}

#[cfg(unix)]
fn terminate_children(pids: &[u32], grace_period: Duration) {
    use std::time::Instant;

    for &pid in pids {
        if let Err(e) = send_signal_to_group(pid, Signal::SIGTERM) {
            tracing::warn!("Failed to send SIGTERM to process group {}: {}", pid, e);
            if let Err(e2) = send_signal(pid, Signal::SIGTERM) {
                tracing::warn!("Failed to send SIGTERM to PID {}: {}", pid, e2);
            }
        }
    }

    let start = Instant::now();
    while start.elapsed() < grace_period {
        if pids.iter().all(|&pid| !is_process_alive(pid)) {
            tracing::info!("All child processes terminated gracefully");
            return;
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    for &pid in pids {
        if is_process_alive(pid) {
            tracing::warn!("Process group {} did not terminate, sending SIGKILL", pid);
            if send_signal_to_group(pid, Signal::SIGKILL).is_err() {
                let _ = send_signal(pid, Signal::SIGKILL);
            }
        }
    }
}

#[cfg(not(unix))]
fn terminate_children(pids: &[u32], _grace_period: Duration) {
    // Without process groups the child handle is the only way to stop it;
    // the installer loop kills its own child when it sees the token.
    tracing::warn!("Leaving {} child process(es) to the installer loop", pids.len());
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(pid as i32), signal)
}

/// Negative PID addresses the whole process group.
#[cfg(unix)]
fn send_signal_to_group(pgid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(-(pgid as i32)), signal)
}

/// Zombies count as dead.
#[cfg(unix)]
fn is_process_alive(pid: u32) -> bool {
    if signal::kill(Pid::from_raw(pid as i32), None).is_err() {
        return false;
    }

    if let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        let fields: Vec<&str> = stat.split_whitespace().collect();
        if fields.len() > 2 {
            return !matches!(fields[2], "Z" | "X");
        }
    }

    true
}

/// Run every registered cleanup on the global registry.
pub fn cleanup_global(grace_period: Duration) {
    if let Ok(mut registry) = CleanupRegistry::global().lock() {
        registry.cleanup_all(grace_period);
    }
}

/// Install the interrupt handler. Call once at program start.
///
/// The handler cancels `token`, drains the global registry, prints the exit
/// message and ends the process with status 0.
#[cfg(unix)]
pub fn init_signal_handlers(token: CancellationToken) -> Result<(), std::io::Error> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            tracing::info!("Received signal {}, cleaning up", sig);
            on_interrupt(&token);
        }
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn init_signal_handlers(token: CancellationToken) -> Result<(), std::io::Error> {
    ctrlc::set_handler(move || {
        tracing::info!("Received Ctrl+C, cleaning up");
        on_interrupt(&token);
    })
    .map_err(std::io::Error::other)
}

fn on_interrupt(token: &CancellationToken) -> ! {
    use crossterm::style::Stylize;

    token.cancel();
    cleanup_global(Duration::from_secs(3));
    // A signal can land while a prompt holds the terminal in raw mode
    let _ = crossterm::terminal::disable_raw_mode();
    println!("\n{}", EXIT_MESSAGE.with(crate::theme::Colors::ERROR));
    std::process::exit(0);
}

/// Extension trait for `std::process::Command` to isolate the child.
pub trait CommandProcessGroup {
    /// Run the child as leader of a new process group so the whole tree can
    /// be signalled at once. On Linux the child also dies with the parent.
    fn in_new_process_group(&mut self) -> &mut Self;
}

#[cfg(unix)]
impl CommandProcessGroup for std::process::Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;

        self.process_group(0);

        #[cfg(target_os = "linux")]
        unsafe {
            self.pre_exec(|| {
                if nix::libc::prctl(nix::libc::PR_SET_PDEATHSIG, nix::libc::SIGTERM) == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        self
    }
}

#[cfg(not(unix))]
impl CommandProcessGroup for std::process::Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        self
    }
}
