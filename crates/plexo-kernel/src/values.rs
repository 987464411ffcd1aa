//! Fail-soft value proxy over the bridge value store.
//!
//! Callers only ever observe a bool or a string. Serialization problems,
//! bridge error envelopes, and unparseable responses all collapse to `false`
//! or the empty string; the detail goes to the log and nowhere else.

use serde_json::Value;
use tracing::warn;

use plexo_core::protocol::{ScopeRequest, SetValueRequest, ValueKeyRequest};
use plexo_core::types::Envelope;

use crate::hub::PluginHub;

pub(crate) fn set_value(hub: &PluginHub, plugin_id: &str, key: &str, value: &str) -> bool {
    if key.is_empty() || value.is_empty() {
        return false;
    }
    let request = SetValueRequest {
        key: key.to_string(),
        value: value.to_string(),
        plugin_id: plugin_id.to_string(),
        handler_id: hub.handler_id(),
    };
    let Ok(body) = serde_json::to_string(&request) else {
        return false;
    };
    let response = hub.bridge().set_value(&body);
    match Envelope::parse(&response) {
        Ok(envelope) => !envelope.is_error(),
        Err(_) => {
            warn!(plugin_id = %plugin_id, key = %key, "Unparseable bridge response for set_value");
            false
        }
    }
}

pub(crate) fn get_value(hub: &PluginHub, plugin_id: &str, key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let request = ValueKeyRequest {
        key: key.to_string(),
        plugin_id: plugin_id.to_string(),
        handler_id: hub.handler_id(),
    };
    let Ok(body) = serde_json::to_string(&request) else {
        return String::new();
    };
    let response = hub.bridge().get_value(&body);
    match Envelope::parse(&response) {
        Ok(envelope) => envelope
            .payload()
            .and_then(|payload| payload.get("value"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Err(_) => {
            warn!(plugin_id = %plugin_id, key = %key, "Unparseable bridge response for get_value");
            String::new()
        }
    }
}

pub(crate) fn destroy_value(hub: &PluginHub, plugin_id: &str, key: &str) {
    if key.is_empty() {
        return;
    }
    let request = ValueKeyRequest {
        key: key.to_string(),
        plugin_id: plugin_id.to_string(),
        handler_id: hub.handler_id(),
    };
    if let Ok(body) = serde_json::to_string(&request) {
        hub.bridge().destroy_value(&body);
    }
}

pub(crate) fn clear_values(hub: &PluginHub, plugin_id: &str) {
    let request = ScopeRequest {
        plugin_id: plugin_id.to_string(),
        handler_id: hub.handler_id(),
    };
    if let Ok(body) = serde_json::to_string(&request) {
        hub.bridge().clear_values(&body);
    }
}
