// Mode pin sequencing and module sessions
pub mod mode;
pub mod module;

pub use mode::{sysfs_output, Mode, ModeError, ModePins, StrappedPin};
pub use module::{Module, ModuleConfig, DEFAULT_SETTLE};
