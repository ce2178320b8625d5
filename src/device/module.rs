// Session with one E22 module: mode selection plus register commands

use super::mode::{Mode, ModeError, ModePins};
use embedded_hal::digital::OutputPin;
use crate::protocol::constants::{Register, CONFIG_REGISTER_COUNT};
use crate::protocol::exchange;
use crate::protocol::{Command, Frame};
use crate::serial::{SerialConfig, Transport};
use std::time::Duration;

/// Time the module needs after a mode pin change before it accepts commands
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(100);

/// Where and how to reach a module
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// Serial device path
    pub port: String,

    pub serial: SerialConfig,

    /// Sysfs GPIO numbers for M0 and M1; `None` when the pins are strapped
    pub m0_gpio: Option<u64>,
    pub m1_gpio: Option<u64>,

    /// Delay after changing mode
    pub settle: Duration,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyS0".to_string(),
            serial: SerialConfig::default(),
            m0_gpio: None,
            m1_gpio: None,
            settle: DEFAULT_SETTLE,
        }
    }
}

impl ModuleConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Default::default()
        }
    }

    /// Drive M0/M1 through the given GPIO lines
    pub fn with_gpio(mut self, m0: u64, m1: u64) -> Self {
        self.m0_gpio = Some(m0);
        self.m1_gpio = Some(m1);
        self
    }

    pub fn gpio_pins(&self) -> Option<(u64, u64)> {
        self.m0_gpio.zip(self.m1_gpio)
    }
}

/// A module reachable over `transport`, with its mode pins
///
/// Commands run strictly one after another; each borrows the transport for
/// the whole exchange.
pub struct Module<T, M0, M1> {
    transport: T,
    pins: ModePins<M0, M1>,
    settle: Duration,
}

impl<T: Transport, M0: OutputPin, M1: OutputPin> Module<T, M0, M1> {
    pub fn new(transport: T, pins: ModePins<M0, M1>) -> Self {
        Self {
            transport,
            pins,
            settle: DEFAULT_SETTLE,
        }
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Mode the pins are known to select, if any
    pub fn mode(&self) -> Option<Mode> {
        self.pins.mode()
    }

    /// Set the mode pins and wait for the module to settle
    pub async fn enter_mode(&mut self, mode: Mode) -> Result<(), ModeError> {
        let (m0, m1) = mode.levels();
        tracing::debug!("Entering {} mode (M0={} M1={})", mode, m0 as u8, m1 as u8);

        self.pins.set_mode(mode)?;
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }
        Ok(())
    }

    /// Run a single command
    pub async fn execute(&mut self, command: &Command) -> exchange::Result<Frame> {
        if self.mode().is_some_and(|m| m != Mode::Configuration) {
            tracing::warn!(
                "Sending command 0x{:02X} outside configuration mode",
                command.op_code()
            );
        }
        exchange::execute(&mut self.transport, command).await
    }

    /// Read `count` registers starting at `start`
    pub async fn read_registers(&mut self, start: u8, count: u8) -> exchange::Result<Frame> {
        let command = Command::read(start, count)?;
        self.execute(&command).await
    }

    /// Read the full configuration block, ADDH through CRYPT_L
    pub async fn read_configuration(&mut self) -> exchange::Result<Frame> {
        self.read_registers(Register::Addh.address(), CONFIG_REGISTER_COUNT)
            .await
    }

    /// Read the product information bytes
    pub async fn read_pid(&mut self) -> exchange::Result<Vec<u8>> {
        let frame = self.execute(&Command::read_pid()).await?;
        Ok(frame.into_payload())
    }

    /// Write registers; `persistent` selects 0xC0 over the volatile 0xC2
    ///
    /// Returns the module's reply, which echoes the written registers.
    pub async fn write_registers(
        &mut self,
        start: u8,
        payload: impl Into<Vec<u8>>,
        persistent: bool,
    ) -> exchange::Result<Frame> {
        let command = if persistent {
            Command::write(start, payload)?
        } else {
            Command::write_volatile(start, payload)?
        };

        let reply = self.execute(&command).await?;
        if let Command::Frame(ref sent) = command {
            if reply.start_register() != sent.start_register() || reply.payload() != sent.payload() {
                tracing::warn!(
                    "Write reply differs from request: sent {:02X?}, got {:02X?}",
                    sent.encode(),
                    reply.encode()
                );
            }
        }
        Ok(reply)
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

}
