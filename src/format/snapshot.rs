// Saved copies of the configuration register block

use crate::protocol::constants::{OpCode, CONFIG_REGISTER_COUNT};
use crate::protocol::{Command, Frame, FrameError, Register};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Frame does not hold the configuration block: {0}")]
    NotConfiguration(String),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

/// Values of ADDH through CRYPT_L
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterSnapshot {
    pub addh: u8,
    pub addl: u8,
    pub netid: u8,
    pub reg0: u8,
    pub reg1: u8,
    pub reg2: u8,
    pub reg3: u8,
    /// The key registers are write-only; reads return zero
    #[serde(default)]
    pub crypt_h: u8,
    #[serde(default)]
    pub crypt_l: u8,
}

impl RegisterSnapshot {
    /// Take the values from a response covering all nine registers from ADDH
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        if frame.start_register() != Register::Addh.address() {
            return Err(SnapshotError::NotConfiguration(format!(
                "starts at register 0x{:02X}",
                frame.start_register()
            )));
        }
        if frame.length() != CONFIG_REGISTER_COUNT {
            return Err(SnapshotError::NotConfiguration(format!(
                "carries {} registers",
                frame.length()
            )));
        }

        let p = frame.payload();
        Ok(Self {
            addh: p[0],
            addl: p[1],
            netid: p[2],
            reg0: p[3],
            reg1: p[4],
            reg2: p[5],
            reg3: p[6],
            crypt_h: p[7],
            crypt_l: p[8],
        })
    }

    /// Register values in address order
    pub fn to_payload(&self) -> Vec<u8> {
        vec![
            self.addh,
            self.addl,
            self.netid,
            self.reg0,
            self.reg1,
            self.reg2,
            self.reg3,
            self.crypt_h,
            self.crypt_l,
        ]
    }

    /// Command that writes this snapshot back to the module
    pub fn to_command(&self, persistent: bool) -> Result<Command> {
        let op = if persistent {
            OpCode::WriteRegisters
        } else {
            OpCode::WriteVolatile
        };
        let frame = Frame::new(op.as_byte(), Register::Addh.address(), self.to_payload())?;
        Ok(Command::Frame(frame))
    }

    /// 16-bit module address
    pub fn address(&self) -> u16 {
        u16::from_be_bytes([self.addh, self.addl])
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
