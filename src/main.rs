//! MPM Install Wizard - Main entry point
//!
//! Parses flags, sets up logging and interrupt handling, then hands the
//! terminal to the wizard.

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use mpm_wizard::cli::Cli;
use mpm_wizard::input;
use mpm_wizard::process_guard::{self, CancellationToken, EXIT_MESSAGE};
use mpm_wizard::theme::{Theme, Tone};
use mpm_wizard::{
    HostInfo, Result, SystemBackend, TerminalLines, Wizard, WizardConfig, WizardError, run_wizard,
};

const CLOSE_PROMPT: &str = "Press the Enter/Return key to close this program.";

/// Initialize the logger with appropriate settings
fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env() // Allows RUST_LOG env var to override
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Version query bypasses the wizard entirely
    if cli.version {
        println!("{}", Cli::version_line());
        return ExitCode::SUCCESS;
    }

    init_logger(cli.verbose);
    info!("mpm-wizard starting up");

    let cancel = CancellationToken::new();
    if let Err(e) = process_guard::init_signal_handlers(cancel.clone()) {
        tracing::warn!("Failed to initialize signal handlers: {}", e);
    }
    debug!("Signal handlers initialized");

    let color = io::stdout().is_terminal();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            println!("{}", Theme::paint(Tone::Error, &e.to_string(), color));
            return ExitCode::FAILURE;
        }
    };
    let pause = config.pause_on_exit && !cli.no_pause;

    match run(&config, cancel, color) {
        Ok(()) => {
            wait_for_enter(pause, color);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_user_exit() => {
            println!("{}", Theme::paint(Tone::Error, EXIT_MESSAGE, color));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Wizard failed: {}", e);
            println!("{}", Theme::paint(Tone::Error, &e.to_string(), color));
            wait_for_enter(pause, color);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<WizardConfig> {
    let Some(path) = path else {
        return Ok(WizardConfig::default());
    };

    info!("Loading configuration file: {:?}", path);
    let config =
        WizardConfig::load_from_file(path).map_err(|e| WizardError::config(format!("{:#}", e)))?;
    config
        .validate()
        .map_err(|e| WizardError::config(format!("{:#}", e)))?;
    Ok(config)
}

fn run(config: &WizardConfig, cancel: CancellationToken, color: bool) -> Result<()> {
    let backend = SystemBackend::new()?;
    let options = config.wizard_options(HostInfo::detect());
    let mut wizard = Wizard::new(backend, options, cancel);

    // mpm's output relay writes to stdout from other threads; never hold the lock here.
    let mut out = io::stdout();
    run_wizard(&mut wizard, &mut TerminalLines::new(), &mut out, color)
}

fn wait_for_enter(pause: bool, color: bool) {
    if !pause {
        return;
    }
    println!("{}", Theme::paint(Tone::Info, CLOSE_PROMPT, color));
    let _ = io::stdout().flush();
    if let Err(e) = input::read_plain_line() {
        debug!("Ignoring stdin error while waiting to close: {}", e);
    }
}
