//! In-memory bridge implementation.
//!
//! Backs the full bridge protocol with process-local maps so a kernel can
//! run without a real host. Doubles as the test bridge: every operation is
//! counted and parseable requests are recorded, so tests can assert exactly
//! what crossed the boundary.

use std::collections::HashMap;
use std::sync::Mutex;

use dashmap::DashMap;
use serde_json::{Map, Value, json};
use tracing::debug;

use plexo_core::error::codes;
use plexo_core::protocol::{
    FireRequest, RemoveRequest, RunPluginRequest, ScopeRequest, SendMessageRequest,
    SetValueRequest, ValueKeyRequest,
};
use plexo_core::traits::Bridge;
use plexo_core::types::{Envelope, HandlerId};

use crate::keys;

/// Number of calls made per bridge operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallCounts {
    /// set-value calls.
    pub set_value: usize,
    /// get-value calls.
    pub get_value: usize,
    /// destroy-value calls.
    pub destroy_value: usize,
    /// clear-values calls.
    pub clear_values: usize,
    /// send-message calls.
    pub send_message: usize,
    /// fire-event calls.
    pub fire: usize,
    /// run-remote-plugin calls.
    pub run_plugin: usize,
    /// remove-plugin calls.
    pub remove: usize,
    /// remove-events calls.
    pub remove_events: usize,
}

impl CallCounts {
    /// Total number of calls that crossed the bridge.
    pub fn total(&self) -> usize {
        self.set_value
            + self.get_value
            + self.destroy_value
            + self.clear_values
            + self.send_message
            + self.fire
            + self.run_plugin
            + self.remove
            + self.remove_events
    }
}

/// In-memory bridge simulating the host boundary.
///
/// Values are stored in a scoped key namespace; message, event, and remote
/// run responses are served from stubs configured by the embedder or test.
#[derive(Debug, Default)]
pub struct MemoryBridge {
    /// Scoped value store, keyed via [`keys::value`].
    values: DashMap<String, String>,
    /// Reply envelope per stubbed event name.
    event_stubs: Mutex<HashMap<String, Envelope>>,
    /// Reply value per stubbed remote message recipient.
    message_stubs: Mutex<HashMap<String, Value>>,
    /// Reply envelope per stubbed remote runnable plugin.
    run_stubs: Mutex<HashMap<String, Envelope>>,
    /// Ids handed to the remove operation, in call order.
    removed: Mutex<Vec<String>>,
    /// Plugin ids whose event listeners were removed, in call order.
    event_removals: Mutex<Vec<String>>,
    /// Per-operation call counters.
    counts: Mutex<CallCounts>,
    /// Parseable send-message requests, in call order.
    message_log: Mutex<Vec<SendMessageRequest>>,
    /// Parseable fire requests, in call order.
    fire_log: Mutex<Vec<FireRequest>>,
}

impl MemoryBridge {
    /// Create an empty in-memory bridge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub the reply envelope for an event name.
    pub fn stub_event(&self, event_name: &str, reply: Envelope) {
        let mut stubs = self.event_stubs.lock().unwrap_or_else(|e| e.into_inner());
        stubs.insert(event_name.to_string(), reply);
    }

    /// Stub the reply a remote recipient sends back for messages.
    pub fn stub_message_reply(&self, plugin_id: &str, reply: Value) {
        let mut stubs = self.message_stubs.lock().unwrap_or_else(|e| e.into_inner());
        stubs.insert(plugin_id.to_string(), reply);
    }

    /// Stub the reply envelope for a remotely runnable plugin. The envelope
    /// is returned verbatim.
    pub fn stub_remote_run(&self, plugin_id: &str, reply: Envelope) {
        let mut stubs = self.run_stubs.lock().unwrap_or_else(|e| e.into_inner());
        stubs.insert(plugin_id.to_string(), reply);
    }

    /// Snapshot of the per-operation call counters.
    pub fn counts(&self) -> CallCounts {
        *self.counts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Read a stored value directly, bypassing the protocol.
    pub fn stored_value(&self, handler_id: HandlerId, plugin_id: &str, key: &str) -> Option<String> {
        self.values
            .get(&keys::value(handler_id, plugin_id, key))
            .map(|entry| entry.value().clone())
    }

    /// Ids passed to the remove operation, in call order.
    pub fn removed_ids(&self) -> Vec<String> {
        self.removed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Plugin ids whose event listeners were removed, in call order.
    pub fn event_removals(&self) -> Vec<String> {
        self.event_removals
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Parseable send-message requests seen so far.
    pub fn sent_messages(&self) -> Vec<SendMessageRequest> {
        self.message_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Parseable fire requests seen so far.
    pub fn fired_events(&self) -> Vec<FireRequest> {
        self.fire_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn bump(&self, op: impl FnOnce(&mut CallCounts)) {
        let mut counts = self.counts.lock().unwrap_or_else(|e| e.into_inner());
        op(&mut counts);
    }
}

/// Decode a request in two steps so the error distinguishes unparseable
/// text from a request with absent or mistyped members.
fn parse_request<T: serde::de::DeserializeOwned>(request: &str) -> Result<T, Envelope> {
    let value: Value = serde_json::from_str(request).map_err(|_| {
        Envelope::error_with_description(
            codes::MALFORMED_PARAMETERS,
            "Request body is not valid JSON.",
        )
    })?;
    serde_json::from_value(value).map_err(|_| {
        Envelope::error_with_description(
            codes::MISSING_PARAMETER,
            "One or more of the given parameters is missing.",
        )
    })
}

impl Bridge for MemoryBridge {
    fn set_value(&self, request: &str) -> String {
        self.bump(|c| c.set_value += 1);
        let req: SetValueRequest = match parse_request(request) {
            Ok(req) => req,
            Err(reply) => return reply.to_string(),
        };
        self.values.insert(
            keys::value(req.handler_id, &req.plugin_id, &req.key),
            req.value,
        );
        debug!(plugin_id = %req.plugin_id, key = %req.key, "Stored value");
        Envelope::data(json!({})).to_string()
    }

    fn get_value(&self, request: &str) -> String {
        self.bump(|c| c.get_value += 1);
        let req: ValueKeyRequest = match parse_request(request) {
            Ok(req) => req,
            Err(reply) => return reply.to_string(),
        };
        let value = self
            .values
            .get(&keys::value(req.handler_id, &req.plugin_id, &req.key))
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        Envelope::data(json!({ "value": value })).to_string()
    }

    fn destroy_value(&self, request: &str) {
        self.bump(|c| c.destroy_value += 1);
        if let Ok(req) = parse_request::<ValueKeyRequest>(request) {
            self.values
                .remove(&keys::value(req.handler_id, &req.plugin_id, &req.key));
        }
    }

    fn clear_values(&self, request: &str) {
        self.bump(|c| c.clear_values += 1);
        if let Ok(req) = parse_request::<ScopeRequest>(request) {
            let prefix = keys::plugin_values_prefix(req.handler_id, &req.plugin_id);
            self.values.retain(|key, _| !key.starts_with(&prefix));
            debug!(plugin_id = %req.plugin_id, "Cleared plugin values");
        }
    }

    fn send_message(&self, request: &str) -> String {
        self.bump(|c| c.send_message += 1);
        let req: SendMessageRequest = match parse_request(request) {
            Ok(req) => req,
            Err(reply) => return reply.to_string(),
        };
        self.message_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req.clone());

        let stubs = self.message_stubs.lock().unwrap_or_else(|e| e.into_inner());

        // Empty recipient list means default routing: every plugin this
        // bridge knows about.
        if req.to_ids.is_empty() {
            if stubs.is_empty() {
                return Envelope::error_with_description(
                    codes::UNDEFINED_PLUGINS,
                    "No plugins are reachable through this bridge.",
                )
                .to_string();
            }
            let mut data = Map::new();
            for (id, reply) in stubs.iter() {
                data.insert(id.clone(), json!({ "data": reply }));
            }
            return Envelope::data(json!({ "data": data })).to_string();
        }

        let mut data = Map::new();
        for id in &req.to_ids {
            let entry = match stubs.get(id) {
                Some(reply) => json!({ "data": reply }),
                None => json!({
                    "error": codes::UNDEFINED_PLUGIN,
                    "error_description": "No plugin could be found with the given id.",
                }),
            };
            data.insert(id.clone(), entry);
        }
        debug!(from = %req.plugin_id, recipients = req.to_ids.len(), "Delivered remote message");
        Envelope::data(json!({ "data": data })).to_string()
    }

    fn fire(&self, request: &str) -> String {
        self.bump(|c| c.fire += 1);
        let req: FireRequest = match parse_request(request) {
            Ok(req) => req,
            Err(reply) => return reply.to_string(),
        };
        if req.event_name.is_empty() {
            return Envelope::error_with_description(
                codes::MALFORMED_PARAMETERS,
                "Event name must not be empty.",
            )
            .to_string();
        }
        let reply = {
            let stubs = self.event_stubs.lock().unwrap_or_else(|e| e.into_inner());
            stubs.get(&req.event_name).cloned()
        };
        self.fire_log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req);
        match reply {
            Some(envelope) => envelope.to_string(),
            // No listeners: an empty responder map.
            None => Envelope::data(json!({ "data": {} })).to_string(),
        }
    }

    fn run_plugin(&self, request: &str) -> String {
        self.bump(|c| c.run_plugin += 1);
        let req: RunPluginRequest = match parse_request(request) {
            Ok(req) => req,
            Err(reply) => return reply.to_string(),
        };
        let stubs = self.run_stubs.lock().unwrap_or_else(|e| e.into_inner());
        match stubs.get(&req.id) {
            Some(envelope) => envelope.to_string(),
            None => Envelope::error_with_description(
                codes::UNDEFINED_PLUGIN,
                "No plugin could be found with the given id.",
            )
            .to_string(),
        }
    }

    fn remove(&self, request: &str) {
        self.bump(|c| c.remove += 1);
        if let Ok(req) = parse_request::<RemoveRequest>(request) {
            debug!(plugin_id = %req.id, "Removed plugin");
            self.removed
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(req.id);
        }
    }

    fn remove_events(&self, request: &str) {
        self.bump(|c| c.remove_events += 1);
        if let Ok(req) = parse_request::<ScopeRequest>(request) {
            self.event_removals
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(req.plugin_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_bridge() -> MemoryBridge {
        MemoryBridge::new()
    }

    fn handler() -> HandlerId {
        HandlerId::from_uuid(Uuid::nil())
    }

    fn set_request(plugin_id: &str, key: &str, value: &str) -> String {
        serde_json::to_string(&SetValueRequest {
            key: key.to_string(),
            value: value.to_string(),
            plugin_id: plugin_id.to_string(),
            handler_id: handler(),
        })
        .unwrap()
    }

    fn get_request(plugin_id: &str, key: &str) -> String {
        serde_json::to_string(&ValueKeyRequest {
            key: key.to_string(),
            plugin_id: plugin_id.to_string(),
            handler_id: handler(),
        })
        .unwrap()
    }

    #[test]
    fn test_set_then_get() {
        let bridge = make_bridge();
        let reply = bridge.set_value(&set_request("math.sum", "color", "green"));
        assert!(!Envelope::parse(&reply).unwrap().is_error());

        let reply = bridge.get_value(&get_request("math.sum", "color"));
        let envelope = Envelope::parse(&reply).unwrap();
        assert_eq!(envelope.payload().unwrap()["value"], "green");
    }

    #[test]
    fn test_get_missing_returns_empty_value() {
        let bridge = make_bridge();
        let reply = bridge.get_value(&get_request("math.sum", "nope"));
        let envelope = Envelope::parse(&reply).unwrap();
        assert_eq!(envelope.payload().unwrap()["value"], "");
    }

    #[test]
    fn test_clear_values_scopes_by_plugin() {
        let bridge = make_bridge();
        bridge.set_value(&set_request("math.sum", "a", "1"));
        bridge.set_value(&set_request("math.square", "a", "2"));

        let scope = serde_json::to_string(&ScopeRequest {
            plugin_id: "math.sum".to_string(),
            handler_id: handler(),
        })
        .unwrap();
        bridge.clear_values(&scope);

        assert_eq!(bridge.stored_value(handler(), "math.sum", "a"), None);
        assert_eq!(
            bridge.stored_value(handler(), "math.square", "a"),
            Some("2".to_string())
        );
    }

    #[test]
    fn test_send_message_mixes_stubbed_and_unknown_recipients() {
        let bridge = make_bridge();
        bridge.stub_message_reply("remote.echo", json!({"heard": "hi"}));

        let request = serde_json::to_string(&SendMessageRequest {
            parameters: json!({"message": "hi"}),
            to_ids: vec!["remote.echo".to_string(), "remote.ghost".to_string()],
            plugin_id: "math.sum".to_string(),
            handler_id: handler(),
        })
        .unwrap();
        let reply = Envelope::parse(&bridge.send_message(&request)).unwrap();
        let data = &reply.payload().unwrap()["data"];
        assert_eq!(data["remote.echo"]["data"]["heard"], "hi");
        assert_eq!(data["remote.ghost"]["error"], codes::UNDEFINED_PLUGIN);
    }

    #[test]
    fn test_broadcast_without_stubs_reports_undefined_plugins() {
        let bridge = make_bridge();
        let request = serde_json::to_string(&SendMessageRequest {
            parameters: json!({"message": "hi"}),
            to_ids: vec![],
            plugin_id: "math.sum".to_string(),
            handler_id: handler(),
        })
        .unwrap();
        let reply = Envelope::parse(&bridge.send_message(&request)).unwrap();
        assert_eq!(reply.error_body().unwrap().error, codes::UNDEFINED_PLUGINS);
    }

    #[test]
    fn test_fire_without_listeners_returns_empty_responders() {
        let bridge = make_bridge();
        let request = serde_json::to_string(&FireRequest {
            parameters: json!({}),
            event_name: "math.sum-before".to_string(),
            plugin_id: "math.sum".to_string(),
            handler_id: handler(),
        })
        .unwrap();
        let reply = Envelope::parse(&bridge.fire(&request)).unwrap();
        assert_eq!(reply.payload().unwrap()["data"], json!({}));
    }

    #[test]
    fn test_unparseable_request_reports_malformed_parameters() {
        let bridge = make_bridge();
        let reply = Envelope::parse(&bridge.set_value("not json")).unwrap();
        assert_eq!(
            reply.error_body().unwrap().error,
            codes::MALFORMED_PARAMETERS
        );
    }

    #[test]
    fn test_incomplete_request_reports_missing_parameter() {
        let bridge = make_bridge();
        let reply = Envelope::parse(&bridge.set_value("{}")).unwrap();
        assert_eq!(reply.error_body().unwrap().error, codes::MISSING_PARAMETER);
    }

    #[test]
    fn test_counts_track_every_operation() {
        let bridge = make_bridge();
        bridge.set_value(&set_request("math.sum", "a", "1"));
        bridge.get_value(&get_request("math.sum", "a"));
        bridge.get_value(&get_request("math.sum", "a"));

        let counts = bridge.counts();
        assert_eq!(counts.set_value, 1);
        assert_eq!(counts.get_value, 2);
        assert_eq!(counts.send_message, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_remove_ledger_records_ids() {
        let bridge = make_bridge();
        let request = serde_json::to_string(&RemoveRequest {
            id: "math.sum".to_string(),
            handler_id: handler(),
        })
        .unwrap();
        bridge.remove(&request);
        assert_eq!(bridge.removed_ids(), vec!["math.sum".to_string()]);
    }
}
