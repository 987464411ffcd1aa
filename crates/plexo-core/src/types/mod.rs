//! Shared kernel types.

pub mod envelope;
pub mod id;
pub mod message;

pub use envelope::{Envelope, ErrorBody};
pub use id::HandlerId;
pub use message::Message;
