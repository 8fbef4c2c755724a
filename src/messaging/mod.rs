// Messaging module - Event decoding and frame routing
pub mod event;
pub mod router;

pub use event::{ChatEvent, EventDecoder, EventType, JsonEventDecoder};
pub use router::{FrameOutcome, FrameRouter};
