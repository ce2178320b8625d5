// One half-duplex request/response exchange with the module

use super::assembler::read_frame;
use super::command::Command;
use super::frame::{Frame, FrameError};
use crate::serial::{SerialError, Transport};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Transport error: {0}")]
    Transport(#[from] SerialError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] FrameError),
}

impl ExchangeError {
    /// The module answered with the 0xFF length sentinel
    pub fn is_device_error(&self) -> bool {
        matches!(self, ExchangeError::Protocol(FrameError::DeviceError))
    }

    /// Sentinel frame paired with a device error
    pub fn sentinel(&self) -> Option<Frame> {
        match self {
            ExchangeError::Protocol(e) => e.sentinel(),
            ExchangeError::Transport(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;

/// Write a command and read its response to completion
///
/// The caller must hold the transport exclusively for the whole exchange.
/// Nothing is retried.
pub async fn execute<T: Transport>(transport: &mut T, command: &Command) -> Result<Frame> {
    let request = command.encode();
    tracing::debug!("Sending command: {:02X?}", request);

    transport.write_all(&request).await?;
    transport.flush().await?;

    match read_frame(transport).await {
        Ok(frame) => {
            tracing::debug!("Received response: {:02X?}", frame.encode());
            Ok(frame)
        }
        Err(e) => {
            if e.is_device_error() {
                tracing::warn!(
                    "Module rejected command 0x{:02X} at register 0x{:02X}",
                    command.op_code(),
                    command.start_register()
                );
            }
            Err(e)
        }
    }
}
