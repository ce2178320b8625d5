// Commands as written to the module
//
// A register read goes out as a bare header: the length byte is the number of
// registers wanted and no payload follows. Everything else is a full frame.

use super::constants::{OpCode, Register, HEADER_LEN, MAX_PAYLOAD_LEN, PID_LEN};
use super::frame::{Frame, FrameError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `[0xC1, start_register, count]`
    Read { start_register: u8, count: u8 },
    /// Header plus payload, written verbatim
    Frame(Frame),
}

impl Command {
    /// Read `count` registers beginning at `start_register`
    pub fn read(start_register: u8, count: u8) -> Result<Self> {
        if count == 0 || count as usize > MAX_PAYLOAD_LEN {
            return Err(FrameError::MalformedLength(count));
        }
        Ok(Command::Read {
            start_register,
            count,
        })
    }

    /// Read the product information block
    pub fn read_pid() -> Self {
        Command::Read {
            start_register: Register::Pid.address(),
            count: PID_LEN,
        }
    }

    /// Write registers persistently
    pub fn write(start_register: u8, payload: impl Into<Vec<u8>>) -> Result<Self> {
        Frame::new(OpCode::WriteRegisters.as_byte(), start_register, payload).map(Command::Frame)
    }

    /// Write registers until the next power cycle
    pub fn write_volatile(start_register: u8, payload: impl Into<Vec<u8>>) -> Result<Self> {
        Frame::new(OpCode::WriteVolatile.as_byte(), start_register, payload).map(Command::Frame)
    }

    /// Over-the-air configuration frame
    pub fn wireless(start_register: u8, payload: impl Into<Vec<u8>>) -> Result<Self> {
        Frame::new(OpCode::WirelessConfig.as_byte(), start_register, payload).map(Command::Frame)
    }

    pub fn op_code(&self) -> u8 {
        match self {
            Command::Read { .. } => OpCode::ReadRegisters.as_byte(),
            Command::Frame(frame) => frame.op_code(),
        }
    }

    pub fn start_register(&self) -> u8 {
        match self {
            Command::Read { start_register, .. } => *start_register,
            Command::Frame(frame) => frame.start_register(),
        }
    }

    /// Bytes to write to the transport
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::Read {
                start_register,
                count,
            } => {
                let mut bytes = Vec::with_capacity(HEADER_LEN);
                bytes.extend_from_slice(&[self.op_code(), *start_register, *count]);
                bytes
            }
            Command::Frame(frame) => frame.encode(),
        }
    }
}

impl From<Frame> for Command {
    fn from(frame: Frame) -> Self {
        Command::Frame(frame)
    }
}
