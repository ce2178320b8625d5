// Command catalog for the E22 configuration interface
// Op codes and register addresses are opaque bytes to the framing layer

use std::fmt;

/// Bytes in a frame header: op code, start register, length
pub const HEADER_LEN: usize = 3;

/// Largest payload a legal frame can carry
pub const MAX_PAYLOAD_LEN: usize = 9;

/// Header plus maximum payload
pub const MAX_FRAME_LEN: usize = HEADER_LEN + MAX_PAYLOAD_LEN;

/// Length byte the module sends instead of a real length when it rejects a command
pub const ERROR_LENGTH: u8 = 0xFF;

/// Number of configuration registers starting at ADDH
pub const CONFIG_REGISTER_COUNT: u8 = 9;

/// Bytes returned when querying the product ID register
pub const PID_LEN: u8 = 7;

/// Operation selector, the first byte of every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Write registers, saved across power cycles
    WriteRegisters = 0xC0,
    /// Read registers
    ReadRegisters = 0xC1,
    /// Write registers, lost on power down
    WriteVolatile = 0xC2,
    /// Configuration over the air
    WirelessConfig = 0xCF,
}

impl OpCode {
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            OpCode::WriteRegisters => "WRITE",
            OpCode::ReadRegisters => "READ",
            OpCode::WriteVolatile => "WRITE-VOLATILE",
            OpCode::WirelessConfig => "WIRELESS",
        }
    }
}

impl TryFrom<u8> for OpCode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0xC0 => Ok(OpCode::WriteRegisters),
            0xC1 => Ok(OpCode::ReadRegisters),
            0xC2 => Ok(OpCode::WriteVolatile),
            0xCF => Ok(OpCode::WirelessConfig),
            other => Err(other),
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op.as_byte()
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.as_byte())
    }
}

/// Register addresses; payload byte `i` maps to `start_register + i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Register {
    Addh = 0x00,
    Addl = 0x01,
    NetId = 0x02,
    Reg0 = 0x03,
    Reg1 = 0x04,
    Reg2 = 0x05,
    Reg3 = 0x06,
    CryptH = 0x07,
    CryptL = 0x08,
    /// Product information, addressed separately from the configuration block
    Pid = 0x80,
}

impl Register {
    /// The nine configuration registers in address order
    pub const CONFIG: [Register; 9] = [
        Register::Addh,
        Register::Addl,
        Register::NetId,
        Register::Reg0,
        Register::Reg1,
        Register::Reg2,
        Register::Reg3,
        Register::CryptH,
        Register::CryptL,
    ];

    pub fn address(self) -> u8 {
        self as u8
    }

    pub fn from_address(address: u8) -> Option<Self> {
        match address {
            0x80 => Some(Register::Pid),
            a if (a as usize) < Self::CONFIG.len() => Some(Self::CONFIG[a as usize]),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::Addh => "ADDH",
            Register::Addl => "ADDL",
            Register::NetId => "NETID",
            Register::Reg0 => "REG0",
            Register::Reg1 => "REG1",
            Register::Reg2 => "REG2",
            Register::Reg3 => "REG3",
            Register::CryptH => "CRYPT_H",
            Register::CryptL => "CRYPT_L",
            Register::Pid => "PID",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
