// Serial port abstraction with async support
// Wraps the serialport crate with tokio async functionality

use std::io::{self, Read, Write};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

#[derive(Error, Debug)]
pub enum SerialError {
    #[error("Serial port error: {0}")]
    Port(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Port not open")]
    NotOpen,

    #[error("Port closed")]
    Eof,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SerialError>;

/// Serial port configuration
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Baud rate; E22 modules accept configuration commands at 9600 only
    pub baud_rate: u32,

    /// Data bits (5, 6, 7, 8)
    pub data_bits: serialport::DataBits,

    /// Stop bits
    pub stop_bits: serialport::StopBits,

    /// Parity
    pub parity: serialport::Parity,

    /// Flow control
    pub flow_control: serialport::FlowControl,

    /// Read/write timeout
    pub timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: serialport::DataBits::Eight,
            stop_bits: serialport::StopBits::One,
            parity: serialport::Parity::None,
            flow_control: serialport::FlowControl::None,
            timeout: Duration::from_secs(2),
        }
    }
}

impl SerialConfig {
    /// Create a new configuration with specified baud rate
    pub fn new(baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..Default::default()
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject settings the port cannot be opened with
    pub fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(SerialError::InvalidConfig("baud rate must be non-zero".to_string()));
        }
        if self.timeout.is_zero() {
            return Err(SerialError::InvalidConfig("timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Async serial port wrapper
pub struct SerialPort {
    port: Option<Box<dyn serialport::SerialPort>>,
    config: SerialConfig,
}

impl SerialPort {
    /// Open a serial port with the given configuration
    pub fn open(port_name: &str, config: SerialConfig) -> Result<Self> {
        config.validate()?;

        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(config.data_bits)
            .stop_bits(config.stop_bits)
            .parity(config.parity)
            .flow_control(config.flow_control)
            .timeout(config.timeout)
            .open()
            .map_err(|e| SerialError::Port(e.to_string()))?;

        tracing::debug!("Opened {} at {} baud", port_name, config.baud_rate);

        Ok(Self {
            port: Some(port),
            config,
        })
    }

    /// Read exactly n bytes with timeout
    pub async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(SerialError::NotOpen)?;

        timeout(self.config.timeout, async {
            let mut total_read = 0;
            while total_read < buf.len() {
                match port.read(&mut buf[total_read..]) {
                    Ok(0) => return Err(SerialError::Eof),
                    Ok(n) => total_read += n,
                    Err(ref e) if e.kind() == io::ErrorKind::TimedOut => {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                        continue;
                    }
                    Err(e) => return Err(SerialError::Io(e)),
                }
            }
            Ok(())
        })
        .await
        .map_err(|_| SerialError::Timeout(self.config.timeout))?
    }

    /// Write all bytes with timeout
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(SerialError::NotOpen)?;

        timeout(self.config.timeout, async {
            port.write_all(buf).map_err(SerialError::Io)
        })
        .await
        .map_err(|_| SerialError::Timeout(self.config.timeout))?
    }

    /// Flush the output buffer
    pub async fn flush(&mut self) -> Result<()> {
        let port = self.port.as_mut().ok_or(SerialError::NotOpen)?;
        port.flush().map_err(SerialError::Io)
    }

    /// Clear input buffer
    pub fn clear_input(&mut self) -> Result<()> {
        let port = self.port.as_mut().ok_or(SerialError::NotOpen)?;
        port.clear(serialport::ClearBuffer::Input)
            .map_err(|e| SerialError::Port(e.to_string()))
    }
}

/// List available serial ports
pub fn list_ports() -> Result<Vec<String>> {
    serialport::available_ports()
        .map_err(|e| SerialError::Port(e.to_string()))?
        .into_iter()
        .map(|p| Ok(p.port_name))
        .collect()
}
