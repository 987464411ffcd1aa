//! # plexo-core
//!
//! Core crate for Plexo. Contains the bridge trait and request protocol,
//! configuration schemas, the response envelope, typed identifiers, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Plexo crates.

pub mod config;
pub mod error;
pub mod protocol;
pub mod result;
pub mod traits;
pub mod types;

pub use error::KernelError;
pub use result::KernelResult;
