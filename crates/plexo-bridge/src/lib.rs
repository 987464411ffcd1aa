//! # plexo-bridge
//!
//! Bridge implementations for Plexo. Ships the in-memory bridge used for
//! development and tests; embedders talking to a real host implement
//! [`plexo_core::traits::Bridge`] themselves.

pub mod keys;
pub mod memory;

pub use memory::{CallCounts, MemoryBridge};
