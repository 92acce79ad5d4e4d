//! Host time sources
//!
//! The wall clock is the system's local time (including its DST rules).
//! Delays are tokio timers so the signal watcher can run while a pulse is
//! being timed.

use std::time::Duration;

use chrono::{Local, Timelike};
use embedded_hal_async::delay::DelayNs;
use impulse_core::traits::{WallClock, WallTime};

/// Local time of day from the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl WallClock for LocalClock {
    fn now(&self) -> WallTime {
        to_wall_time(&Local::now())
    }
}

/// Convert a chrono time of day
pub fn to_wall_time<T: Timelike>(t: &T) -> WallTime {
    WallTime::new(t.hour() as u8, t.minute() as u8, t.second() as u8)
        .with_nanosecond(t.nanosecond())
}

/// Delay backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

impl DelayNs for TokioDelay {
    async fn delay_ns(&mut self, ns: u32) {
        tokio::time::sleep(Duration::from_nanos(ns as u64)).await;
    }

    async fn delay_us(&mut self, us: u32) {
        tokio::time::sleep(Duration::from_micros(us as u64)).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        tokio::time::sleep(Duration::from_millis(ms as u64)).await;
    }
}
