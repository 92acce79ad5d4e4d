//! Pulse primitives and the convergence protocol
//!
//! The movement is advanced in two ways:
//!
//! - **Minute steps**: pre-delay, then the minute line is energized. One step
//!   per second at most; pulsing faster can skip or damage the movement.
//! - **Hour pulses**: every wired hour channel energized together. The
//!   mechanism only engages with the minute hand parked at a fixed position,
//!   and lands the dial on the next full hour.
//!
//! Catching up is done in stages because the target keeps moving while the
//! movement is being driven: advancing one hour takes tens of seconds.

use core::fmt;

use embedded_hal_async::delay::DelayNs;
use tracing::{debug, info};

use crate::adjust::compute_adjustment;
use crate::cancel::CancelToken;
use crate::config::{Calibration, MovementConfig};
use crate::state::ClockState;
use crate::traits::{PulseActuator, RelayLine, WallClock};

/// Operation stopped at a step boundary because shutdown was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cancelled between pulse steps")
    }
}

/// Work done by [`ClockAdvancer::adjust_clock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdjustOutcome {
    /// Hour advances performed
    pub hours: u16,
    /// Minute steps issued after the hour stage
    pub minutes: u16,
}

/// Drives the relay lines and keeps the dial position in step
pub struct ClockAdvancer<A, D, W> {
    actuator: A,
    delay: D,
    clock: W,
    movement: MovementConfig,
    calibration: Calibration,
    state: ClockState,
}

impl<A, D, W> ClockAdvancer<A, D, W>
where
    A: PulseActuator,
    D: DelayNs,
    W: WallClock,
{
    /// Create an advancer starting from a known dial position
    pub fn new(
        actuator: A,
        delay: D,
        clock: W,
        movement: MovementConfig,
        calibration: Calibration,
        state: ClockState,
    ) -> Self {
        Self {
            actuator,
            delay,
            clock,
            movement,
            calibration,
            state,
        }
    }

    /// Current dial position
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Movement capabilities
    pub fn movement(&self) -> &MovementConfig {
        &self.movement
    }

    /// Calibration in use
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Wall clock being tracked
    pub fn clock(&self) -> &W {
        &self.clock
    }

    /// Relay board
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// Relay board, mutably (for shutdown)
    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub(crate) fn delay_mut(&mut self) -> &mut D {
        &mut self.delay
    }

    /// Give back the relay board and the final dial position
    pub fn into_parts(self) -> (A, ClockState) {
        (self.actuator, self.state)
    }

    /// Minutes the dial is currently behind the wall clock
    pub fn adjustment(&self) -> u16 {
        compute_adjustment(self.clock.now(), self.state)
    }

    /// Energize `lines` together for `duration_ms`, then release them
    async fn pulse_lines(&mut self, lines: &[RelayLine], duration_ms: u32) {
        for &line in lines {
            self.actuator.assert_line(line);
        }
        self.delay.delay_ms(duration_ms).await;
        for &line in lines {
            self.actuator.deassert_line(line);
        }
    }

    /// One catch-up minute step; the dial advances once the pulse is done
    async fn minute_step(&mut self) {
        self.delay.delay_ms(self.calibration.minute_pre_delay_ms).await;
        self.pulse_lines(&[RelayLine::Minute], self.calibration.minute_pulse_ms)
            .await;
        self.state.increment(1);
    }

    /// Energize every wired hour channel for `duration_ms`
    ///
    /// Does not touch the dial position. With no hour channel wired this is
    /// only a wait.
    pub async fn hour_pulse(&mut self, duration_ms: u32) {
        let mut lines = [RelayLine::Minute; 3];
        let mut count = 0;

        if self.movement.has_hour_channel() && self.calibration.hold_minute_line_during_hour_pulse
        {
            lines[count] = RelayLine::Minute;
            count += 1;
        }
        if self.movement.hour_a {
            lines[count] = RelayLine::HourA;
            count += 1;
        }
        if self.movement.hour_b {
            lines[count] = RelayLine::HourB;
            count += 1;
        }

        self.pulse_lines(&lines[..count], duration_ms).await;
    }

    /// Steady-state tracking pulse: minute line, no pre-delay
    pub async fn tracking_pulse(&mut self) {
        self.pulse_lines(&[RelayLine::Minute], self.calibration.tracking_pulse_ms)
            .await;
        self.state.increment(1);
    }

    /// Long hour pulse re-indexing the hour hand
    ///
    /// Mechanical upkeep only; the dial position is unchanged.
    pub async fn correction_pulse(&mut self) {
        self.hour_pulse(self.calibration.correction_pulse_ms).await;
    }

    /// Advance the dial by `minutes` single steps
    ///
    /// Cancellation is checked before every step; a step that has started
    /// always completes. Returns the number of steps issued.
    pub async fn advance_minutes(
        &mut self,
        minutes: u16,
        cancel: &CancelToken,
    ) -> Result<u16, Cancelled> {
        for done in 0..minutes {
            if cancel.is_cancelled() {
                debug!(done, requested = minutes, "minute advance cancelled");
                return Err(Cancelled);
            }
            self.minute_step().await;
        }
        Ok(minutes)
    }

    /// Advance the dial by `hours` full hours
    pub async fn advance_hours(
        &mut self,
        hours: u16,
        cancel: &CancelToken,
    ) -> Result<(), Cancelled> {
        for _ in 0..hours {
            if self.movement.has_hour_channel() {
                self.advance_one_hour_pulsed(cancel).await?;
            } else {
                let minute = self.state.minute_of_hour();
                let to_boundary = if minute != 0 { 60 - minute } else { 60 };
                self.advance_minutes(to_boundary, cancel).await?;
            }
        }
        Ok(())
    }

    /// Park the minute hand, fire the hour coils, account for the jump
    async fn advance_one_hour_pulsed(&mut self, cancel: &CancelToken) -> Result<(), Cancelled> {
        let park = self.calibration.park_minute as u16;
        let minute = self.state.minute_of_hour();
        if minute < park {
            self.advance_minutes(park - minute, cancel).await?;
        }

        if cancel.is_cancelled() {
            return Err(Cancelled);
        }

        // From here the sequence runs to completion so the compensation
        // below always matches what the coils did.
        self.hour_pulse(self.calibration.hour_pulse_ms).await;

        if !self.movement.hour_coupled {
            self.delay.delay_ms(self.calibration.coupling_settle_ms).await;
            self.pulse_lines(&[RelayLine::Minute], self.calibration.coupling_pulse_ms)
                .await;
            self.delay
                .delay_ms(self.calibration.internal_advance_settle_ms)
                .await;
        }

        self.state
            .increment(self.calibration.hour_compensation_minutes as u16);
        debug!(dial = %self.state, "hour advanced");
        Ok(())
    }

    /// Bring the dial from `total_minutes` behind to the wall clock
    ///
    /// 1. Whole hours, via hour pulses.
    /// 2. Remaining minutes, recomputed from the wall clock after stage 1.
    /// 3. One more recomputation in case stage 2 crossed a minute boundary.
    ///
    /// Any residual after stage 3 is left for the tracking loop.
    pub async fn adjust_clock(
        &mut self,
        total_minutes: u16,
        cancel: &CancelToken,
    ) -> Result<AdjustOutcome, Cancelled> {
        let mut outcome = AdjustOutcome::default();
        if total_minutes == 0 {
            return Ok(outcome);
        }

        let hours = total_minutes / 60;
        if hours > 0 {
            info!("Advancing clock {} hours.", hours);
            self.advance_hours(hours, cancel).await?;
            outcome.hours = hours;
        }

        let minutes = self.adjustment();
        if minutes > 0 {
            info!("Advancing clock {} minutes.", minutes);
            outcome.minutes += self.advance_minutes(minutes, cancel).await?;

            let minutes = self.adjustment();
            if minutes > 0 {
                info!("Advancing clock {} minutes.", minutes);
                outcome.minutes += self.advance_minutes(minutes, cancel).await?;
            }
        }

        Ok(outcome)
    }
}
