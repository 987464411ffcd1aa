//! Message routing: local-first delivery with one batched bridge fallback.
//!
//! Recipients registered in-process are delivered synchronously without
//! touching the bridge. Whatever remains goes out in a single batched
//! `send_message` call, and the two result sets merge keyed by recipient id.

use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use plexo_core::error::codes;
use plexo_core::protocol::{FireRequest, RunPluginRequest, SendMessageRequest};
use plexo_core::types::{Envelope, Message};

use std::sync::Arc;

use crate::context::PluginContext;
use crate::definition::PluginDefinition;
use crate::hub::PluginHub;

/// Route one message. Empty `to_ids` is a broadcast and always goes through
/// the bridge; otherwise local recipients are split off first and the bridge
/// is only called for the remainder.
pub(crate) fn send(hub: &PluginHub, message: &Message) -> Envelope {
    let mut local: Map<String, Value> = Map::new();
    let mut remote_ids: Vec<String> = Vec::new();

    if !message.to_ids.is_empty() {
        for to_id in &message.to_ids {
            match hub.registry().resolve(to_id, hub.baseline()) {
                Ok(definition) if definition.capabilities().has_on_message() => {
                    let entry = deliver_local(hub, &definition, message);
                    local.insert(to_id.clone(), entry);
                }
                _ => remote_ids.push(to_id.clone()),
            }
        }
        if remote_ids.is_empty() {
            debug!(
                from_id = %message.from_id,
                recipients = local.len(),
                "Message delivered without leaving the process"
            );
            return Envelope::data(json!({ "data": local }));
        }
    }

    let request = SendMessageRequest {
        parameters: message.parameters.clone(),
        to_ids: remote_ids,
        plugin_id: message.from_id.clone(),
        handler_id: hub.handler_id(),
    };
    let Ok(body) = serde_json::to_string(&request) else {
        return Envelope::error(codes::MESSAGE_PARAMETERS_ERROR);
    };
    let response = hub.bridge().send_message(&body);
    merge_bridge_response(&response, local, &message.from_id)
}

/// Deliver to one in-process recipient and shape its result entry.
///
/// A reply carrying an `error` member passes through unwrapped; anything
/// else is wrapped as `{"data": reply}`. A handler failure becomes an
/// error entry rather than failing the whole send.
fn deliver_local(hub: &PluginHub, definition: &Arc<PluginDefinition>, message: &Message) -> Value {
    let Some(handler) = definition.capabilities().on_message.clone() else {
        return json!({
            "error": codes::UNDEFINED_ONMESSAGE_FUNCTION,
            "error_description": "The recipient has no message handler.",
        });
    };
    hub.ensure_configuration(definition);
    let body = message
        .parameters
        .get("message")
        .cloned()
        .unwrap_or(Value::Null);
    let ctx = PluginContext::new(hub, definition.clone());
    match handler.on_message(&ctx, &body, &message.from_id) {
        Ok(reply) if reply.get("error").is_some() => reply,
        Ok(reply) => json!({ "data": reply }),
        Err(err) => {
            debug!(
                recipient = %definition.id(),
                from_id = %message.from_id,
                error = %err,
                "Local message handler failed"
            );
            json!({
                "error": codes::PLUGIN_ERROR,
                "error_description": err.to_string(),
            })
        }
    }
}

/// Merge locally collected entries into the bridge's batched response.
///
/// An error envelope from the bridge passes through verbatim. An unparseable
/// payload downgrades to an empty delivery map so the local entries survive.
fn merge_bridge_response(response: &str, local: Map<String, Value>, from_id: &str) -> Envelope {
    match Envelope::parse(response) {
        Err(_) => {
            warn!(from_id = %from_id, "Unparseable bridge response for send_message");
            Envelope::data(json!({ "data": local }))
        }
        Ok(Envelope::Error(body)) => Envelope::Error(body),
        Ok(Envelope::Data(mut payload)) => {
            if let Some(data) = payload.get_mut("data").and_then(Value::as_object_mut) {
                for (id, entry) in local {
                    data.insert(id, entry);
                }
            }
            Envelope::Data(payload)
        }
    }
}

/// Fire an event through the bridge. `plugin_id` is empty when the kernel
/// itself is the source.
pub(crate) fn fire(
    hub: &PluginHub,
    plugin_id: &str,
    event_name: &str,
    parameters: &Value,
) -> Envelope {
    let request = FireRequest {
        parameters: parameters.clone(),
        event_name: event_name.to_string(),
        plugin_id: plugin_id.to_string(),
        handler_id: hub.handler_id(),
    };
    let Ok(body) = serde_json::to_string(&request) else {
        return Envelope::error(codes::MESSAGE_PARAMETERS_ERROR);
    };
    let response = hub.bridge().fire(&body);
    match Envelope::parse(&response) {
        Ok(envelope) => envelope,
        Err(_) => {
            warn!(event_name = %event_name, "Unparseable bridge response for fire");
            Envelope::error(codes::SERVER_ERROR)
        }
    }
}

/// Ask the host to run a plugin by id, wherever it lives.
pub(crate) fn run_remote(
    hub: &PluginHub,
    plugin_id: &str,
    target_id: &str,
    parameters: &Value,
) -> Envelope {
    let request = RunPluginRequest {
        parameters: parameters.clone(),
        id: target_id.to_string(),
        plugin_id: plugin_id.to_string(),
        handler_id: hub.handler_id(),
    };
    let Ok(body) = serde_json::to_string(&request) else {
        return Envelope::error(codes::MESSAGE_PARAMETERS_ERROR);
    };
    let response = hub.bridge().run_plugin(&body);
    match Envelope::parse(&response) {
        Ok(envelope) => envelope,
        Err(_) => {
            warn!(target_id = %target_id, "Unparseable bridge response for run_plugin");
            Envelope::error(codes::SERVER_ERROR)
        }
    }
}
