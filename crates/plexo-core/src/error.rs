//! Unified error types for the Plexo kernel.
//!
//! All crates map their internal errors into [`KernelError`] for consistent
//! propagation through the ? operator. Wire-level error codes exchanged with
//! the host bridge live in [`codes`].

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested plugin or capability was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate plugin id, concurrent registration).
    Conflict,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// The bridge returned a response the kernel could not parse.
    Protocol,
    /// The target plugin does not carry the required capability.
    Capability,
    /// Composing a plugin's extends chain failed.
    Composition,
    /// A configuration error occurred.
    Configuration,
    /// The host bridge reported a failure.
    Bridge,
    /// A plugin body returned an error.
    Plugin,
    /// An internal kernel error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Protocol => write!(f, "PROTOCOL"),
            Self::Capability => write!(f, "CAPABILITY"),
            Self::Composition => write!(f, "COMPOSITION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Bridge => write!(f, "BRIDGE"),
            Self::Plugin => write!(f, "PLUGIN"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified error used throughout Plexo.
///
/// Crate-specific errors are mapped into `KernelError` using `From` impls or
/// explicit `.map_err()` calls. Errors never cross the public messaging
/// surface directly; the router and value proxy translate them into response
/// envelopes or fail-soft return values first.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct KernelError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl KernelError {
    /// Create a new kernel error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new kernel error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    /// Create a capability error.
    pub fn capability(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Capability, message)
    }

    /// Create a composition error.
    pub fn composition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Composition, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a bridge error.
    pub fn bridge(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Bridge, message)
    }

    /// Create a plugin error.
    pub fn plugin(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Plugin, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for KernelError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for KernelError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for KernelError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

/// Well-known error codes of the bridge protocol.
///
/// These travel inside response envelopes as the `error` member. Some are
/// emitted by the kernel itself, the rest arrive from the host side and are
/// recognized when parsing responses.
pub mod codes {
    /// Message parameters could not be serialized into wire form.
    pub const MESSAGE_PARAMETERS_ERROR: &str = "message_parameters_error";
    /// The recipient list was unusable on the host side.
    pub const MESSAGE_TO_IDS_ERROR: &str = "message_to_ids_error";
    /// The target plugin carries no message handler.
    pub const UNDEFINED_ONMESSAGE_FUNCTION: &str = "undefined_onmessage_function";
    /// A plugin body failed while handling an invocation.
    pub const PLUGIN_ERROR: &str = "plugin_error";
    /// Generic host-side failure, also the downgrade for unparseable responses.
    pub const SERVER_ERROR: &str = "server_error";
    /// No plugin exists under the requested id.
    pub const UNDEFINED_PLUGIN: &str = "undefined_plugin";
    /// No plugins were available for a broadcast delivery.
    pub const UNDEFINED_PLUGINS: &str = "undefined_plugins";
    /// A request was missing one or more required parameters.
    pub const MISSING_PARAMETER: &str = "missing_parameter";
    /// A request carried parameters of the wrong shape or type.
    pub const MALFORMED_PARAMETERS: &str = "malformed_parameters";
}
