// Rendering and persistence of parsed frames
pub mod dump;
pub mod snapshot;

pub use dump::{dump_frame, hex_dump};
pub use snapshot::{RegisterSnapshot, SnapshotError};
