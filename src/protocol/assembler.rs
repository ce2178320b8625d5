// Response assembly from a byte stream with no delimiter
//
// The third byte of a response announces how many payload bytes follow, so the
// end of the frame is only known once that byte has arrived. Bytes are pushed
// one at a time; the assembler never reads past the end of its frame.

use super::constants::MAX_FRAME_LEN;
use super::exchange::ExchangeError;
use super::frame::{check_length, Frame, FrameError, Result};
use crate::serial::Transport;

/// Outcome of feeding bytes to the assembler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// Frame not finished yet
    NeedMore,
    /// Header and exactly `length` payload bytes have arrived
    Complete(Frame),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    OpCode,
    StartRegister,
    Length,
    Payload,
    Done,
    Failed,
}

/// Byte-at-a-time frame reassembly
///
/// One assembler handles one response. Once it has produced a frame or an
/// error, further pushes return [`FrameError::Terminated`].
#[derive(Debug, Clone)]
pub struct ResponseAssembler {
    buf: [u8; MAX_FRAME_LEN],
    /// Bytes stored so far
    count: usize,
    /// Index of the last byte of the frame, known once the length arrives
    stop: usize,
    state: State,
}

impl ResponseAssembler {
    pub fn new() -> Self {
        Self {
            buf: [0u8; MAX_FRAME_LEN],
            count: 0,
            stop: 0,
            state: State::OpCode,
        }
    }

    /// Number of bytes accepted so far
    pub fn consumed(&self) -> usize {
        self.count
    }

    /// True once a frame or an error has been produced
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, State::Done | State::Failed)
    }

    /// Feed a single byte
    pub fn push(&mut self, byte: u8) -> Result<Progress> {
        match self.state {
            State::Done | State::Failed => Err(FrameError::Terminated),
            State::OpCode => {
                self.store(byte);
                self.state = State::StartRegister;
                Ok(Progress::NeedMore)
            }
            State::StartRegister => {
                self.store(byte);
                self.state = State::Length;
                Ok(Progress::NeedMore)
            }
            State::Length => {
                let index = self.store(byte);
                let length = match check_length(byte) {
                    Ok(length) => length,
                    Err(e) => {
                        self.state = State::Failed;
                        return Err(e);
                    }
                };

                self.stop = index + length;
                if index == self.stop {
                    return self.finish();
                }
                self.state = State::Payload;
                Ok(Progress::NeedMore)
            }
            State::Payload => {
                let index = self.store(byte);
                if index == self.stop {
                    return self.finish();
                }
                Ok(Progress::NeedMore)
            }
        }
    }

    /// Feed a block of bytes, stopping at the end of the frame
    ///
    /// Returns the progress and how many bytes of `data` were used. Bytes past
    /// the terminal one are left untouched for the caller.
    pub fn push_slice(&mut self, data: &[u8]) -> Result<(Progress, usize)> {
        for (i, &byte) in data.iter().enumerate() {
            if let Progress::Complete(frame) = self.push(byte)? {
                return Ok((Progress::Complete(frame), i + 1));
            }
        }
        Ok((Progress::NeedMore, data.len()))
    }

    fn store(&mut self, byte: u8) -> usize {
        let index = self.count;
        self.buf[index] = byte;
        self.count += 1;
        index
    }

    fn finish(&mut self) -> Result<Progress> {
        self.state = State::Done;
        let frame = Frame::with_length(
            self.buf[0],
            self.buf[1],
            self.buf[2],
            &self.buf[3..=self.stop],
        )?;
        Ok(Progress::Complete(frame))
    }
}

impl Default for ResponseAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Read one response from the transport, a byte at a time
///
/// Exactly `3 + length` bytes are read on success and 3 on a length error.
/// A transport failure aborts the read with no partial frame.
pub async fn read_frame<T: Transport>(transport: &mut T) -> std::result::Result<Frame, ExchangeError> {
    let mut assembler = ResponseAssembler::new();
    loop {
        let byte = transport.read_byte().await?;
        if let Progress::Complete(frame) = assembler.push(byte)? {
            return Ok(frame);
        }
    }
}
