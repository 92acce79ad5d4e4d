//! Steady-state tracking loop
//!
//! Wakes on every wall-clock second. Once per minute the minute line is
//! pulsed just before the minute turns over, and once per hour a long hour
//! pulse re-indexes the hour hand.

use embedded_hal_async::delay::DelayNs;
use tracing::{debug, info};

use crate::advancer::ClockAdvancer;
use crate::cancel::CancelToken;
use crate::config::{Calibration, MovementConfig};
use crate::traits::{PulseActuator, WallClock, WallTime};

/// What a given second calls for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Nothing to do this second
    Idle,
    /// Long hour pulse; dial position unchanged
    HourlyCorrection,
    /// One minute step; dial position advances
    TrackingPulse,
}

impl TickAction {
    /// Decide what to do at `now`
    ///
    /// Movements with no hour channel never get the hourly correction; it
    /// would only swallow a tracking pulse.
    pub fn for_time(now: WallTime, movement: &MovementConfig, calibration: &Calibration) -> Self {
        if movement.has_hour_channel()
            && now.second == calibration.correction_second
            && now.minute == movement.correction_minute()
        {
            TickAction::HourlyCorrection
        } else if now.second == calibration.tracking_second {
            TickAction::TrackingPulse
        } else {
            TickAction::Idle
        }
    }
}

/// Per-second scheduler owning the advancer for the rest of the process
pub struct DaemonLoop<A, D, W> {
    advancer: ClockAdvancer<A, D, W>,
}

impl<A, D, W> DaemonLoop<A, D, W>
where
    A: PulseActuator,
    D: DelayNs,
    W: WallClock,
{
    /// Take over from the startup adjustment
    pub fn new(advancer: ClockAdvancer<A, D, W>) -> Self {
        Self { advancer }
    }

    /// The advancer being driven
    pub fn advancer(&self) -> &ClockAdvancer<A, D, W> {
        &self.advancer
    }

    /// Hand the advancer back (for shutdown)
    pub fn into_advancer(self) -> ClockAdvancer<A, D, W> {
        self.advancer
    }

    /// Run until `cancel` is set
    ///
    /// The flag is checked at the top of every iteration and again after
    /// each wait, never during a pulse.
    pub async fn run(&mut self, cancel: &CancelToken) {
        info!(dial = %self.advancer.state(), "tracking started");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let wait_ns = self.advancer.clock().now().nanos_to_next_second();
            self.advancer.delay_mut().delay_ns(wait_ns).await;

            if cancel.is_cancelled() {
                break;
            }

            let now = self.advancer.clock().now();
            self.tick(now).await;
        }

        debug!(dial = %self.advancer.state(), "tracking stopped");
    }

    /// Handle one second
    pub async fn tick(&mut self, now: WallTime) -> TickAction {
        let action = TickAction::for_time(
            now,
            self.advancer.movement(),
            self.advancer.calibration(),
        );

        match action {
            TickAction::HourlyCorrection => {
                info!(
                    "{:02}:{:02}:{:02} Clock minutes: {} Hourly adjust",
                    now.hour,
                    now.minute,
                    now.second,
                    self.advancer.state().minutes()
                );
                self.advancer.correction_pulse().await;
            }
            TickAction::TrackingPulse => {
                self.advancer.tracking_pulse().await;
                info!(
                    "{:02}:{:02}:{:02} Clock minutes: {}",
                    now.hour,
                    now.minute,
                    now.second,
                    self.advancer.state().minutes()
                );
            }
            TickAction::Idle => {}
        }

        action
    }
}
