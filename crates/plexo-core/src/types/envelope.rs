//! The response envelope shared by every public messaging operation.
//!
//! Bridge responses arrive as opaque text. [`Envelope::parse`] is the single
//! place that text is decoded; every consuming component decides its own
//! fallback when parsing fails.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::KernelError;
use crate::result::KernelResult;

/// Error payload of a response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error code, see [`crate::error::codes`].
    pub error: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl ErrorBody {
    /// Create an error body with a code only.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_description: None,
        }
    }

    /// Create an error body with a code and description.
    pub fn with_description(error: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_description: Some(description.into()),
        }
    }
}

/// Discriminated success-or-error payload used across the bridge boundary.
///
/// A payload whose `error` member is a string is the error variant; any
/// other JSON value is a success payload. Variant order matters: the error
/// shape must win when both could match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Envelope {
    /// Host- or kernel-reported failure.
    Error(ErrorBody),
    /// Success payload.
    Data(Value),
}

impl Envelope {
    /// Wrap a success payload.
    pub fn data(value: Value) -> Self {
        Self::Data(value)
    }

    /// Build an error envelope from a code.
    pub fn error(code: impl Into<String>) -> Self {
        Self::Error(ErrorBody::new(code))
    }

    /// Build an error envelope from a code and description.
    pub fn error_with_description(
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::Error(ErrorBody::with_description(code, description))
    }

    /// Decode response text into an envelope.
    pub fn parse(text: &str) -> KernelResult<Self> {
        serde_json::from_str(text).map_err(|err| {
            KernelError::with_source(
                crate::error::ErrorKind::Protocol,
                format!("unparseable bridge response: {err}"),
                err,
            )
        })
    }

    /// Whether this envelope carries an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// The success payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Consume the envelope, returning the success payload if any.
    pub fn into_payload(self) -> Option<Value> {
        match self {
            Self::Data(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// The error body, if any.
    pub fn error_body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Error(body) => Some(body),
            Self::Data(_) => None,
        }
    }
}

impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        write!(f, "{text}")
    }
}
