// Command/response framing for the E22 configuration interface
pub mod assembler;
pub mod command;
pub mod constants;
pub mod exchange;
pub mod frame;

pub use assembler::{read_frame, Progress, ResponseAssembler};
pub use command::Command;
pub use constants::{OpCode, Register};
pub use exchange::{execute, ExchangeError};
pub use frame::{Frame, FrameError};
