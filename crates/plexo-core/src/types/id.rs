//! Typed identifier for a kernel instance.
//!
//! Plugin ids are plain strings chosen by plugin authors (dotted names such
//! as `math.square`); the handler id is kernel-assigned and travels in every
//! bridge request so the host can scope state per kernel instance.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one kernel instance, included in every bridge request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(pub Uuid);

impl HandlerId {
    /// Create a new random handler id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a handler id from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Return the inner UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }

    /// Return a reference to the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HandlerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for HandlerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for HandlerId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<HandlerId> for Uuid {
    fn from(id: HandlerId) -> Uuid {
        id.0
    }
}
