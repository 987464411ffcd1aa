//! Message type routed between plugins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message addressed to one or more plugins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Arbitrary payload; recipients receive its `message` member.
    pub parameters: Value,
    /// Recipient plugin ids. Empty means the host's default routing, not
    /// "deliver to nobody".
    #[serde(default)]
    pub to_ids: Vec<String>,
    /// Id of the sending plugin.
    pub from_id: String,
}

impl Message {
    /// Create a message.
    pub fn new(from_id: impl Into<String>, parameters: Value, to_ids: Vec<String>) -> Self {
        Self {
            parameters,
            to_ids,
            from_id: from_id.into(),
        }
    }

    /// Whether the message targets the host's default routing.
    pub fn is_broadcast(&self) -> bool {
        self.to_ids.is_empty()
    }
}
