//! Typed request bodies for the bridge protocol.
//!
//! Every bridge operation accepts one serialized request object. These
//! structs are the kernel-side source of that text; bridge implementations
//! deserialize them back. Field names are the wire names.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::HandlerId;

/// Request body for the set-value operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetValueRequest {
    /// Key to store under, scoped to the plugin and handler.
    pub key: String,
    /// Value to store.
    pub value: String,
    /// Id of the plugin owning the value.
    pub plugin_id: String,
    /// Kernel instance identity.
    pub handler_id: HandlerId,
}

/// Request body for the get-value and destroy-value operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueKeyRequest {
    /// Key to read or destroy.
    pub key: String,
    /// Id of the plugin owning the value.
    pub plugin_id: String,
    /// Kernel instance identity.
    pub handler_id: HandlerId,
}

/// Request body for the clear-values and remove-events operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeRequest {
    /// Id of the plugin whose scope is affected.
    pub plugin_id: String,
    /// Kernel instance identity.
    pub handler_id: HandlerId,
}

/// Request body for the send-message operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Message parameters; recipients receive the `message` member.
    pub parameters: Value,
    /// Recipient plugin ids still unresolved after local routing.
    pub to_ids: Vec<String>,
    /// Id of the sending plugin.
    pub plugin_id: String,
    /// Kernel instance identity.
    pub handler_id: HandlerId,
}

/// Request body for the fire-event operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireRequest {
    /// Event payload.
    pub parameters: Value,
    /// Name of the event to fire.
    pub event_name: String,
    /// Id of the firing plugin, empty when the kernel itself fires.
    pub plugin_id: String,
    /// Kernel instance identity.
    pub handler_id: HandlerId,
}

/// Request body for the run-remote-plugin operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunPluginRequest {
    /// Parameters handed to the remote plugin's entry point.
    pub parameters: Value,
    /// Id of the plugin to run.
    pub id: String,
    /// Id of the requesting plugin.
    pub plugin_id: String,
    /// Kernel instance identity.
    pub handler_id: HandlerId,
}

/// Request body for the remove-plugin operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    /// Id of the plugin to remove.
    pub id: String,
    /// Kernel instance identity.
    pub handler_id: HandlerId,
}
