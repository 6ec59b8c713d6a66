//! aware - a break reminder for the terminal and the macOS menu bar
//!
//! Measures how long you have been continuously active and reminds you to
//! take a break:
//! - 2 minutes without input (or a sleeping display) counts as idle
//! - 30 minutes of continuous activity raises a reminder
//! - further reminders at most every 5 minutes until you take a break

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use aware::cli::{Cli, Commands, Display, RunArgs, TerminalDisplay};
use aware::config::load_config;
use aware::daemon::{
    observe_sleep_wake, Daemon, DisplaySink, LifecycleSignal, SignalForwarder, SleepWakeObserver,
};
use aware::menubar::TraySink;
use aware::notification::ConsoleNotificationSender;
use aware::probe::{platform_probe, ActivityProbe};
use aware::session::SystemClock;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => run(args).await?,
        Some(Commands::Config { config }) => {
            let config = load_config(config.as_deref());
            Display::show_config(&config).context("failed to render the configuration")?;
        }
        Some(Commands::Probe) => {
            let probe = platform_probe();
            match probe.read() {
                Ok(reading) => Display::show_probe(probe.name(), &reading),
                Err(e) => {
                    Display::show_probe_error(&e);
                    anyhow::bail!("activity probe '{}' failed", probe.name());
                }
            }
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the session tracker in the foreground.
async fn run(args: RunArgs) -> Result<()> {
    let config = args.overrides().apply(load_config(args.config.as_deref()));
    tracing::debug!(config = ?config, "effective configuration");

    let probe = platform_probe();
    let display = build_display(args.menubar)?;
    let (signals, _sleep_wake) = spawn_signal_listener();

    #[cfg(target_os = "macos")]
    if let Some(manager) = aware::notification::NotificationManager::new_with_fallback().await {
        return Daemon::new(config, SystemClock, probe, manager, display)
            .run(signals)
            .await;
    }

    Daemon::new(
        config,
        SystemClock,
        probe,
        ConsoleNotificationSender::new(),
        display,
    )
    .run(signals)
    .await
}

/// Picks the display sink: the menu bar on request (macOS), else the terminal.
fn build_display(menubar: bool) -> Result<Box<dyn DisplaySink>> {
    if menubar && cfg!(target_os = "macos") {
        let sink = TraySink::new().context("failed to create the menu bar item")?;
        return Ok(Box::new(sink));
    }
    if menubar {
        tracing::warn!("--menubar is only supported on macOS, printing to the terminal");
    }
    Ok(Box::new(TerminalDisplay::new()))
}

/// Forwards system sleep/wake and SIGTERM into the daemon loop.
///
/// The observer guard must outlive the loop.
fn spawn_signal_listener() -> (
    mpsc::UnboundedReceiver<LifecycleSignal>,
    Option<SleepWakeObserver>,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    let observer = observe_sleep_wake(SignalForwarder::new(tx.clone()));

    #[cfg(unix)]
    tokio::spawn(async move {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                if sigterm.recv().await.is_some() {
                    tracing::info!("received SIGTERM");
                    let _ = tx.send(LifecycleSignal::Quit);
                }
            }
            Err(e) => tracing::warn!("failed to install SIGTERM handler: {}", e),
        }
    });
    #[cfg(not(unix))]
    drop(tx);

    (rx, observer)
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
