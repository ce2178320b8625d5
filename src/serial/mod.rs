// Serial communication module for module I/O
pub mod comm;
pub mod transport;

#[cfg(test)]
pub mod mock;

pub use comm::{list_ports, SerialConfig, SerialError, SerialPort};
pub use transport::Transport;
