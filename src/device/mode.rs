// Operating modes selected by the M0/M1 pins

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin, PinState};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::SysfsPin;
use std::convert::Infallible;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("Failed to drive {line}: {kind:?}")]
    Pin { line: &'static str, kind: ErrorKind },

    #[error("GPIO setup failed for line {gpio}: {message}")]
    Setup { gpio: u64, message: String },
}

/// Module operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Serial data is sent over the air as-is
    Transparent,
    /// Transmissions carry a wake-up preamble
    WakeOnRadio,
    /// Register commands are accepted on the serial port
    Configuration,
    DeepSleep,
}

impl Mode {
    /// Pin levels as `(m0, m1)`, true meaning high
    pub fn levels(self) -> (bool, bool) {
        match self {
            Mode::Transparent => (false, false),
            Mode::WakeOnRadio => (true, false),
            Mode::Configuration => (false, true),
            Mode::DeepSleep => (true, true),
        }
    }

    pub fn from_levels(m0: bool, m1: bool) -> Self {
        match (m0, m1) {
            (false, false) => Mode::Transparent,
            (true, false) => Mode::WakeOnRadio,
            (false, true) => Mode::Configuration,
            (true, true) => Mode::DeepSleep,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Transparent => "transparent",
            Mode::WakeOnRadio => "wake-on-radio",
            Mode::Configuration => "configuration",
            Mode::DeepSleep => "deep sleep",
        };
        f.write_str(name)
    }
}

/// Output line tied in hardware; writes are accepted and ignored
#[derive(Debug, Clone, Copy, Default)]
pub struct StrappedPin;

impl ErrorType for StrappedPin {
    type Error = Infallible;
}

impl OutputPin for StrappedPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Export a sysfs GPIO line and configure it as an output driven low
pub fn sysfs_output(gpio: u64) -> Result<SysfsPin, ModeError> {
    let pin = SysfsPin::new(gpio);
    pin.0
        .export()
        .and_then(|_| pin.0.set_direction(Direction::Low))
        .map_err(|e| ModeError::Setup {
            gpio,
            message: e.to_string(),
        })?;
    Ok(pin)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    M0,
    M1,
}

fn drive<P: OutputPin>(pin: &mut P, line: &'static str, high: bool) -> Result<(), ModeError> {
    pin.set_state(PinState::from(high)).map_err(|e| ModeError::Pin {
        line,
        kind: embedded_hal::digital::Error::kind(&e),
    })
}

/// The M0 and M1 mode lines of one module
///
/// Lines being lowered are written before lines being raised, so a change
/// only passes through transparent mode on its way. If the second write
/// fails, the first line is put back to its previous level.
pub struct ModePins<M0, M1> {
    m0: M0,
    m1: M1,
    /// Last levels known to be on the lines
    levels: Option<(bool, bool)>,
}

impl ModePins<StrappedPin, StrappedPin> {
    /// Both lines tied in hardware
    pub fn strapped() -> Self {
        Self::new(StrappedPin, StrappedPin)
    }
}

impl ModePins<SysfsPin, SysfsPin> {
    /// Drive M0/M1 through the given sysfs GPIO numbers
    pub fn sysfs(m0_gpio: u64, m1_gpio: u64) -> Result<Self, ModeError> {
        let mut pins = Self::new(sysfs_output(m0_gpio)?, sysfs_output(m1_gpio)?);
        // Both lines were configured low on export
        pins.levels = Some((false, false));
        Ok(pins)
    }
}

impl<M0: OutputPin, M1: OutputPin> ModePins<M0, M1> {
    /// Line levels are unknown until the first successful change
    pub fn new(m0: M0, m1: M1) -> Self {
        Self {
            m0,
            m1,
            levels: None,
        }
    }

    /// Mode the lines are known to select
    pub fn mode(&self) -> Option<Mode> {
        self.levels.map(|(m0, m1)| Mode::from_levels(m0, m1))
    }

    pub fn set_mode(&mut self, mode: Mode) -> Result<(), ModeError> {
        let (m0, m1) = mode.levels();
        self.set_levels(m0, m1)
    }

    pub fn set_levels(&mut self, m0: bool, m1: bool) -> Result<(), ModeError> {
        let (first, first_level, second, second_level) = if !m0 || m1 {
            (Line::M0, m0, Line::M1, m1)
        } else {
            (Line::M1, m1, Line::M0, m0)
        };

        self.drive_line(first, first_level)?;

        if let Err(e) = self.drive_line(second, second_level) {
            if let Some((prev_m0, prev_m1)) = self.levels {
                let previous = match first {
                    Line::M0 => prev_m0,
                    Line::M1 => prev_m1,
                };
                if self.drive_line(first, previous).is_err() {
                    self.levels = None;
                }
            }
            return Err(e);
        }

        self.levels = Some((m0, m1));
        Ok(())
    }

    fn drive_line(&mut self, line: Line, high: bool) -> Result<(), ModeError> {
        match line {
            Line::M0 => drive(&mut self.m0, "M0", high),
            Line::M1 => drive(&mut self.m1, "M1", high),
        }
    }
}
