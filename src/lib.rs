// E22-CONFIG: register access for Ebyte E22 LoRa modules over UART
// Copyright 2026 - Licensed under GPLv3

pub mod device;
pub mod format;
pub mod protocol;
pub mod serial;

// Re-export commonly used types
pub use device::{Mode, ModeError, ModePins, Module, ModuleConfig, StrappedPin};
pub use format::{dump_frame, hex_dump, RegisterSnapshot, SnapshotError};
pub use protocol::{
    execute, read_frame, Command, ExchangeError, Frame, FrameError, OpCode, Progress, Register,
    ResponseAssembler,
};
pub use serial::{SerialConfig, SerialError, SerialPort, Transport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
