//! Startup and lifetime orchestration
//!
//! Restore (or take) the dial position, bring the movement up to the wall
//! clock, track it until cancelled, then persist and release everything.

use std::path::Path;

use embedded_hal_async::delay::DelayNs;
use impulse_core::traits::{PulseActuator, WallClock};
use impulse_core::{shutdown, CancelToken, ClockAdvancer, ClockState, DaemonLoop};
use impulse_hal::DialStorage;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{resolve_pins, ConfigError, DaemonConfig, ResolvedPins};
use crate::error::DaemonError;

/// Dial position given on the command line
///
/// Either part enables the override; the missing part is zero.
pub fn dial_override(
    hours: Option<u16>,
    minutes: Option<u16>,
) -> Result<Option<ClockState>, ConfigError> {
    if hours.is_none() && minutes.is_none() {
        return Ok(None);
    }

    let hours = hours.unwrap_or(0);
    let minutes = minutes.unwrap_or(0);
    if hours >= 24 {
        return Err(ConfigError::Override(format!("hours {} is not 0-23", hours)));
    }
    if minutes >= 60 {
        return Err(ConfigError::Override(format!("minutes {} is not 0-59", minutes)));
    }

    Ok(Some(ClockState::from_hours_minutes(hours, minutes)))
}

/// Dial position to start from
pub fn initial_state<S: DialStorage>(
    dial_override: Option<ClockState>,
    storage: &mut S,
    path: &Path,
) -> Result<ClockState, DaemonError> {
    match dial_override {
        Some(state) => {
            info!(dial = %state, "using clock position from command line");
            Ok(state)
        }
        None => {
            let state = ClockState::restore(storage).map_err(|error| DaemonError::Persistence {
                path: path.to_path_buf(),
                error,
            })?;
            debug!(dial = %state, path = %path.display(), "restored clock position");
            Ok(state)
        }
    }
}

/// Settle the starting position, then open the relay lines
///
/// The dial position is decided first so a restore failure exits before
/// any GPIO line is touched.
pub fn prepare<S, B, F>(
    config: &DaemonConfig,
    dial_override: Option<ClockState>,
    storage: &mut S,
    open_relays: F,
) -> Result<(ClockState, B), DaemonError>
where
    S: DialStorage,
    F: FnOnce(&ResolvedPins) -> Result<B, DaemonError>,
{
    let state = initial_state(dial_override, storage, &config.state_file)?;
    let pins = resolve_pins(&config.pins, &config.movement)?;
    let relays = open_relays(&pins)?;
    Ok((state, relays))
}

/// Adjust, track until `cancel`, then persist and release
///
/// Returns the persisted dial position.
pub async fn run<A, D, W, S>(
    config: &DaemonConfig,
    state: ClockState,
    actuator: A,
    delay: D,
    clock: W,
    storage: &mut S,
    cancel: &CancelToken,
) -> Result<ClockState, DaemonError>
where
    A: PulseActuator,
    D: DelayNs,
    W: WallClock,
    S: DialStorage,
{
    let now = clock.now();
    info!(
        "Current time: {:02}:{:02}:{:02}",
        now.hour, now.minute, now.second
    );
    info!("Clock minutes: {} ({})", state.minutes(), state);

    let mut advancer = ClockAdvancer::new(
        actuator,
        delay,
        clock,
        config.movement,
        config.calibration,
        state,
    );

    let lag = advancer.adjustment();
    if lag > 0 {
        info!("Adjusting clock by {} minutes", lag);
        let started = Instant::now();
        match advancer.adjust_clock(lag, cancel).await {
            Ok(outcome) => info!(
                hours = outcome.hours,
                minutes = outcome.minutes,
                "Clock adjustment complete in {:.1?}",
                started.elapsed()
            ),
            Err(e) => warn!(dial = %advancer.state(), "Clock adjustment {}", e),
        }
    } else {
        info!("Clock already matches wall time");
    }

    let mut tracker = DaemonLoop::new(advancer);
    tracker.run(cancel).await;

    let (mut actuator, state) = tracker.into_advancer().into_parts();
    shutdown(state, &mut actuator, storage).map_err(|error| DaemonError::PersistenceWrite {
        path: config.state_file.clone(),
        error,
    })?;

    info!("Clock minutes {} saved to {}", state.minutes(), config.state_file.display());
    Ok(state)
}
