//! Impulse - Slave Clock Timing Daemon
//!
//! Keeps an impulse-driven slave clock movement in step with local time.
//! At startup the dial position is restored (or given with -H/-m), the
//! movement is driven forward until it matches the wall clock, and then one
//! tracking pulse is issued per minute with a long hour pulse once an hour.
//! SIGINT/SIGTERM persist the dial position and release every relay.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use impulse_core::CancelToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod clock;
mod config;
mod controller;
mod error;
mod gpio;
mod storage;
mod tasks;

use crate::clock::{LocalClock, TokioDelay};
use crate::error::DaemonError;
use crate::storage::FileDialStorage;
use crate::tasks::{signal_task, Signals};

/// Impulse clock timing daemon
#[derive(Parser, Debug)]
#[command(name = "impulse-daemon")]
#[command(version)]
#[command(about = "Keeps an impulse slave clock movement in step with local time")]
struct Cli {
    /// File holding the persisted clock position
    #[arg(short = 'p', long = "persist", value_name = "FILE")]
    persist: Option<PathBuf>,

    /// Hour currently shown on the clock (overrides the state file)
    #[arg(short = 'H', long = "hours", value_name = "H")]
    hours: Option<u16>,

    /// Minute currently shown on the clock (overrides the state file)
    #[arg(short = 'm', long = "minutes", value_name = "M")]
    minutes: Option<u16>,

    /// TOML configuration file (defaults to the built-in configuration)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log relay transitions instead of driving GPIO
    #[arg(long)]
    simulate: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    info!("Impulse Clock Timing Daemon v{}", env!("CARGO_PKG_VERSION"));

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), DaemonError> {
    let mut config = config::load(cli.config.as_deref())?;
    if let Some(path) = cli.persist {
        config.state_file = path;
    }

    let dial_override = controller::dial_override(cli.hours, cli.minutes)?;
    let mut storage = FileDialStorage::new(&config.state_file);

    let gpio_root = config.pins.gpio_root.clone();
    let (state, relays) = controller::prepare(&config, dial_override, &mut storage, |pins| {
        gpio::build_relay_bank(pins, &gpio_root, cli.simulate)
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(&config, state, relays, &mut storage))
}

/// Run the control future alongside the signal watcher
async fn serve(
    config: &config::DaemonConfig,
    state: impulse_core::ClockState,
    relays: gpio::DaemonRelayBank,
    storage: &mut FileDialStorage,
) -> Result<(), DaemonError> {
    let cancel = Arc::new(CancelToken::new());
    let signals = Signals::register()?;
    let watcher = tokio::spawn(signal_task(signals, cancel.clone()));

    let result = controller::run(
        config,
        state,
        relays,
        TokioDelay,
        LocalClock,
        storage,
        &cancel,
    )
    .await;

    watcher.abort();
    result.map(drop)
}
