//! Core traits defined in `plexo-core` and implemented by other crates.

pub mod bridge;

pub use bridge::Bridge;
