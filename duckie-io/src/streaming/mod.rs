//! Wire protocol between robot handles and the robot daemon

pub mod messages;
pub mod wire;

pub use messages::{ClientMessage, ServerMessage};
pub use wire::{read_frame, write_frame, Serializer, WireFormat, MAX_FRAME_SIZE};
