// Wire-level frame shared by commands and responses
// Layout: <op_code> <start_register> <length> [payload; length]

use super::constants::{Register, ERROR_LENGTH, HEADER_LEN, MAX_PAYLOAD_LEN};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Module reported an error (length 0xFF)")]
    DeviceError,

    #[error("Bad length 0x{0:02X}")]
    MalformedLength(u8),

    #[error("Insufficient data for frame: need {needed} bytes, have {available}")]
    ShortInput { needed: usize, available: usize },

    #[error("Payload too long: {0} bytes (max 9)")]
    PayloadTooLong(usize),

    #[error("Length field {declared} does not match payload size {actual}")]
    LengthMismatch { declared: u8, actual: usize },

    #[error("Assembler already finished")]
    Terminated,
}

impl FrameError {
    /// The sentinel frame paired with a device error, if this is one
    pub fn sentinel(&self) -> Option<Frame> {
        match self {
            FrameError::DeviceError => Some(Frame::ERROR_SENTINEL),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Check a length byte taken from the wire
///
/// The error sentinel is tested first: 0xFF also exceeds the ceiling but means
/// the module refused the command, not that the stream is garbled.
pub fn check_length(length: u8) -> Result<usize> {
    if length == ERROR_LENGTH {
        return Err(FrameError::DeviceError);
    }
    if length as usize > MAX_PAYLOAD_LEN {
        return Err(FrameError::MalformedLength(length));
    }
    Ok(length as usize)
}

/// A command or response frame
///
/// Outside of [`Frame::ERROR_SENTINEL`], `payload().len() == length()` and
/// `length() <= 9` always hold; the constructors refuse anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    op_code: u8,
    start_register: u8,
    length: u8,
    payload: Vec<u8>,
}

impl Frame {
    /// Stand-in value handed back when the module answers with length 0xFF
    pub const ERROR_SENTINEL: Frame = Frame {
        op_code: 0xFF,
        start_register: 0xFF,
        length: ERROR_LENGTH,
        payload: Vec::new(),
    };

    /// Create a frame; the length field is taken from the payload
    pub fn new(op_code: u8, start_register: u8, payload: impl Into<Vec<u8>>) -> Result<Self> {
        let payload = payload.into();
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(FrameError::PayloadTooLong(payload.len()));
        }

        Ok(Self {
            op_code,
            start_register,
            length: payload.len() as u8,
            payload,
        })
    }

    /// Create a frame with an explicit length field, checked against the payload
    pub fn with_length(
        op_code: u8,
        start_register: u8,
        length: u8,
        payload: impl Into<Vec<u8>>,
    ) -> Result<Self> {
        let payload = payload.into();
        if length as usize > MAX_PAYLOAD_LEN {
            return Err(FrameError::MalformedLength(length));
        }
        if payload.len() != length as usize {
            return Err(FrameError::LengthMismatch {
                declared: length,
                actual: payload.len(),
            });
        }

        Self::new(op_code, start_register, payload)
    }

    /// Parse a frame from a complete byte sequence
    ///
    /// Applies the same length rules as the stream assembler. Bytes after the
    /// declared payload are ignored.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(FrameError::ShortInput {
                needed: HEADER_LEN,
                available: data.len(),
            });
        }

        let length = check_length(data[2])?;
        let needed = HEADER_LEN + length;
        if data.len() < needed {
            return Err(FrameError::ShortInput {
                needed,
                available: data.len(),
            });
        }

        Ok(Self {
            op_code: data[0],
            start_register: data[1],
            length: data[2],
            payload: data[HEADER_LEN..needed].to_vec(),
        })
    }

    pub fn op_code(&self) -> u8 {
        self.op_code
    }

    pub fn start_register(&self) -> u8 {
        self.start_register
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    pub fn is_error_sentinel(&self) -> bool {
        *self == Self::ERROR_SENTINEL
    }

    /// Value of a register carried in this frame, if its address is covered
    pub fn register_value(&self, register: Register) -> Option<u8> {
        let offset = register.address().checked_sub(self.start_register)?;
        self.payload.get(offset as usize).copied()
    }

    /// Serialize to wire bytes
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.payload.len());
        bytes.extend_from_slice(&[self.op_code, self.start_register, self.length]);
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    /// Iterate over `(register address, value)` pairs of the payload
    pub fn registers(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        let start = self.start_register;
        self.payload
            .iter()
            .enumerate()
            .map(move |(i, &value)| (start.wrapping_add(i as u8), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::OpCode;

    #[test]
    fn test_check_length() {
        assert_eq!(check_length(0), Ok(0));
        assert_eq!(check_length(9), Ok(9));
        assert_eq!(check_length(10), Err(FrameError::MalformedLength(10)));
        assert_eq!(check_length(0xFE), Err(FrameError::MalformedLength(0xFE)));
        assert_eq!(check_length(0xFF), Err(FrameError::DeviceError));
    }

    #[test]
    fn test_frame_new() {
        let frame = Frame::new(OpCode::WriteRegisters.into(), 0x00, vec![0x12, 0x34]).unwrap();
        assert_eq!(frame.op_code(), 0xC0);
        assert_eq!(frame.start_register(), 0x00);
        assert_eq!(frame.length(), 2);
        assert_eq!(frame.payload(), &[0x12, 0x34]);
    }

    #[test]
    fn test_frame_rejects_long_payload() {
        let result = Frame::new(OpCode::WriteRegisters.into(), 0x00, vec![0u8; 10]);
        assert_eq!(result, Err(FrameError::PayloadTooLong(10)));
    }

    #[test]
    fn test_frame_with_length() {
        assert!(Frame::with_length(0xC0, 0x02, 1, vec![0x55]).is_ok());
        assert_eq!(
            Frame::with_length(0xC0, 0x02, 3, vec![0x55]),
            Err(FrameError::LengthMismatch {
                declared: 3,
                actual: 1
            })
        );
        assert_eq!(
            Frame::with_length(0xC0, 0x02, 12, vec![0u8; 12]),
            Err(FrameError::MalformedLength(12))
        );
    }

    #[test]
    fn test_encode() {
        let frame = Frame::new(0xC2, 0x03, vec![0x62, 0x00]).unwrap();
        assert_eq!(frame.encode(), vec![0xC2, 0x03, 0x02, 0x62, 0x00]);

        let empty = Frame::new(0xC1, 0x05, Vec::new()).unwrap();
        assert_eq!(empty.encode(), vec![0xC1, 0x05, 0x00]);
    }

    #[test]
    fn test_parse() {
        let frame = Frame::parse(&[0xC1, 0x04, 0x02, 0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(frame.op_code(), 0xC1);
        assert_eq!(frame.start_register(), 0x04);
        assert_eq!(frame.payload(), &[0xAA, 0xBB]);
    }

    #[test]
    fn test_parse_short_input() {
        assert_eq!(
            Frame::parse(&[0xC1, 0x00]),
            Err(FrameError::ShortInput {
                needed: 3,
                available: 2
            })
        );
        assert_eq!(
            Frame::parse(&[0xC1, 0x00, 0x09, 0x01, 0x02]),
            Err(FrameError::ShortInput {
                needed: 12,
                available: 5
            })
        );
    }

    #[test]
    fn test_parse_error_lengths() {
        let err = Frame::parse(&[0xFF, 0xFF, 0xFF]).unwrap_err();
        assert_eq!(err, FrameError::DeviceError);
        assert_eq!(err.sentinel(), Some(Frame::ERROR_SENTINEL));

        let err = Frame::parse(&[0xC1, 0x00, 0x0A, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(err, FrameError::MalformedLength(0x0A));
        assert_eq!(err.sentinel(), None);
    }

    #[test]
    fn test_error_sentinel() {
        let sentinel = Frame::ERROR_SENTINEL;
        assert!(sentinel.is_error_sentinel());
        assert_eq!(sentinel.length(), 0xFF);
        assert!(sentinel.payload().is_empty());
        assert_eq!(sentinel.encode(), vec![0xFF, 0xFF, 0xFF]);

        let frame = Frame::new(0xC1, 0x00, Vec::new()).unwrap();
        assert!(!frame.is_error_sentinel());
    }

    #[test]
    fn test_register_value() {
        let frame = Frame::new(0xC1, 0x02, vec![0x10, 0x20, 0x30]).unwrap();
        assert_eq!(frame.register_value(Register::Addl), None);
        assert_eq!(frame.register_value(Register::NetId), Some(0x10));
        assert_eq!(frame.register_value(Register::Reg1), Some(0x30));
        assert_eq!(frame.register_value(Register::Reg2), None);

        let pairs: Vec<_> = frame.registers().collect();
        assert_eq!(pairs, vec![(0x02, 0x10), (0x03, 0x20), (0x04, 0x30)]);
    }
}
