//! Relay GPIO lines on Linux
//!
//! Real hardware goes through the sysfs GPIO interface. `--simulate` swaps
//! in pins that only log their transitions, for bench testing without a
//! relay board.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use impulse_drivers::relay::{RelayBank, RelayChannel};
use impulse_hal::OutputPin;
use tracing::{debug, error, info};

use crate::config::{PinSpec, ResolvedPins};
use crate::error::DaemonError;

/// Attempts at configuring a freshly exported line
const EXPORT_SETTLE_ATTEMPTS: u32 = 10;

/// Wait between those attempts
const EXPORT_SETTLE_INTERVAL: Duration = Duration::from_millis(50);

/// Output line driven through `/sys/class/gpio`
#[derive(Debug)]
pub struct SysfsPin {
    number: u32,
    value_path: PathBuf,
    high: bool,
}

impl SysfsPin {
    /// Export a GPIO line and make it an output at `initial_high`
    ///
    /// Writing "high"/"low" to `direction` switches the line to output and
    /// sets its level in one step, so the relay never sees a glitch.
    pub fn open(root: &Path, number: u32, initial_high: bool) -> io::Result<Self> {
        let line_dir = root.join(format!("gpio{}", number));
        let exported = !line_dir.exists();
        if exported {
            debug!(gpio = number, "exporting");
            fs::write(root.join("export"), number.to_string())?;
        }

        let direction = if initial_high { "high" } else { "low" };
        let attempts = if exported { EXPORT_SETTLE_ATTEMPTS } else { 1 };
        write_settled(&line_dir.join("direction"), direction, attempts)?;

        Ok(Self {
            number,
            value_path: line_dir.join("value"),
            high: initial_high,
        })
    }

    fn write_level(&mut self, high: bool) {
        let value = if high { "1" } else { "0" };
        if let Err(e) = fs::write(&self.value_path, value) {
            error!(gpio = self.number, error = %e, "GPIO write failed");
        }
        self.high = high;
    }
}

impl OutputPin for SysfsPin {
    fn set_high(&mut self) {
        self.write_level(true);
    }

    fn set_low(&mut self) {
        self.write_level(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Write a sysfs attribute, retrying while the kernel and udev finish
/// creating the line directory and fixing its permissions
fn write_settled(path: &Path, value: &str, attempts: u32) -> io::Result<()> {
    let mut attempt = 1;
    loop {
        match fs::write(path, value) {
            Ok(()) => return Ok(()),
            Err(e)
                if attempt < attempts
                    && matches!(
                        e.kind(),
                        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
                    ) =>
            {
                debug!(path = %path.display(), attempt, error = %e, "GPIO line not ready");
                thread::sleep(EXPORT_SETTLE_INTERVAL);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Output line that only logs
#[derive(Debug)]
pub struct SimulatedPin {
    number: u32,
    high: bool,
}

impl SimulatedPin {
    pub fn new(number: u32, initial_high: bool) -> Self {
        Self {
            number,
            high: initial_high,
        }
    }
}

impl OutputPin for SimulatedPin {
    fn set_high(&mut self) {
        debug!(gpio = self.number, "simulated pin high");
        self.high = true;
    }

    fn set_low(&mut self) {
        debug!(gpio = self.number, "simulated pin low");
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Pin type used by the daemon's relay bank
#[derive(Debug)]
pub enum DaemonPin {
    Sysfs(SysfsPin),
    Simulated(SimulatedPin),
}

impl OutputPin for DaemonPin {
    fn set_high(&mut self) {
        match self {
            DaemonPin::Sysfs(p) => p.set_high(),
            DaemonPin::Simulated(p) => p.set_high(),
        }
    }

    fn set_low(&mut self) {
        match self {
            DaemonPin::Sysfs(p) => p.set_low(),
            DaemonPin::Simulated(p) => p.set_low(),
        }
    }

    fn is_set_high(&self) -> bool {
        match self {
            DaemonPin::Sysfs(p) => p.is_set_high(),
            DaemonPin::Simulated(p) => p.is_set_high(),
        }
    }
}

/// Relay bank used by the daemon
pub type DaemonRelayBank = RelayBank<DaemonPin>;

/// Open every configured relay line, released
pub fn build_relay_bank(
    pins: &ResolvedPins,
    gpio_root: &Path,
    simulate: bool,
) -> Result<DaemonRelayBank, DaemonError> {
    let open = |spec: PinSpec| -> Result<RelayChannel<DaemonPin>, DaemonError> {
        // Released level: high for active-low inputs
        let idle_high = spec.active_low;
        let pin = if simulate {
            DaemonPin::Simulated(SimulatedPin::new(spec.number, idle_high))
        } else {
            let pin = SysfsPin::open(gpio_root, spec.number, idle_high).map_err(|source| {
                DaemonError::Gpio {
                    pin: spec.number,
                    source,
                }
            })?;
            DaemonPin::Sysfs(pin)
        };
        Ok(RelayChannel::new(pin, spec.active_low))
    };

    let minute = open(pins.minute)?;
    let hour_a = pins.hour_a.map(open).transpose()?;
    let hour_b = pins.hour_b.map(open).transpose()?;

    info!(
        minute = pins.minute.number,
        hour_a = ?pins.hour_a.map(|p| p.number),
        hour_b = ?pins.hour_b.map(|p| p.number),
        simulate,
        "relay lines ready"
    );

    Ok(RelayBank::new(minute, hour_a, hour_b))
}

#[cfg(test)]
mod tests {
    use impulse_core::traits::{PulseActuator, RelayLine};

    use super::*;

    fn fake_sysfs(lines: &[u32]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for n in lines {
            let line = dir.path().join(format!("gpio{}", n));
            fs::create_dir(&line).unwrap();
            fs::write(line.join("direction"), "in").unwrap();
            fs::write(line.join("value"), "0").unwrap();
        }
        dir
    }

    fn read(root: &Path, n: u32, attr: &str) -> String {
        fs::read_to_string(root.join(format!("gpio{}", n)).join(attr)).unwrap()
    }

    #[test]
    fn test_sysfs_pin_sets_direction_and_value() {
        let root = fake_sysfs(&[26]);
        let mut pin = SysfsPin::open(root.path(), 26, true).unwrap();
        assert_eq!(read(root.path(), 26, "direction"), "high");
        assert!(pin.is_set_high());

        pin.set_low();
        assert_eq!(read(root.path(), 26, "value"), "0");
        pin.set_high();
        assert_eq!(read(root.path(), 26, "value"), "1");
    }

    #[test]
    fn test_sysfs_pin_exports_missing_line() {
        let root = tempfile::tempdir().unwrap();
        // No gpio21 directory appears, so setting the direction fails
        let err = SysfsPin::open(root.path(), 21, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "21");
    }

    #[test]
    fn test_sysfs_pin_waits_for_exported_line() {
        let root = tempfile::tempdir().unwrap();
        let line = root.path().join("gpio20");

        // The line directory shows up a little after the export
        let creator = {
            let line = line.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(120));
                fs::create_dir(&line).unwrap();
            })
        };

        let pin = SysfsPin::open(root.path(), 20, true).unwrap();
        creator.join().unwrap();

        assert!(pin.is_set_high());
        assert_eq!(read(root.path(), 20, "direction"), "high");
        assert_eq!(fs::read_to_string(root.path().join("export")).unwrap(), "20");
    }

    #[test]
    fn test_bank_starts_released_and_drives_active_low() {
        let root = fake_sysfs(&[26, 20, 21]);
        let pins = ResolvedPins {
            minute: PinSpec { number: 26, active_low: true },
            hour_a: Some(PinSpec { number: 20, active_low: true }),
            hour_b: Some(PinSpec { number: 21, active_low: false }),
        };
        let mut bank = build_relay_bank(&pins, root.path(), false).unwrap();

        assert_eq!(read(root.path(), 26, "value"), "1");
        assert_eq!(read(root.path(), 21, "value"), "0");

        bank.assert_line(RelayLine::Minute);
        bank.assert_line(RelayLine::HourB);
        assert_eq!(read(root.path(), 26, "value"), "0");
        assert_eq!(read(root.path(), 21, "value"), "1");

        bank.release_all();
        assert_eq!(read(root.path(), 26, "value"), "1");
        assert_eq!(read(root.path(), 20, "value"), "1");
        assert_eq!(read(root.path(), 21, "value"), "0");
    }

    #[test]
    fn test_bank_gpio_failure_names_pin() {
        let root = fake_sysfs(&[26]);
        let pins = ResolvedPins {
            minute: PinSpec { number: 26, active_low: true },
            hour_a: Some(PinSpec { number: 20, active_low: true }),
            hour_b: None,
        };
        let err = build_relay_bank(&pins, root.path(), false).unwrap_err();
        assert!(matches!(err, DaemonError::Gpio { pin: 20, .. }));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_simulated_bank() {
        let pins = ResolvedPins {
            minute: PinSpec { number: 26, active_low: true },
            hour_a: None,
            hour_b: None,
        };
        let mut bank = build_relay_bank(&pins, Path::new("/nonexistent"), true).unwrap();
        bank.assert_line(RelayLine::Minute);
        assert!(bank.is_asserted(RelayLine::Minute));
        assert!(!bank.is_asserted(RelayLine::HourA));
        bank.release_all();
        assert!(!bank.is_asserted(RelayLine::Minute));
    }
}
