//! Invocation pipeline: the before / in-process / after event wrap around
//! every plugin run, plus batch dispatch over the whole registry.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use plexo_core::error::codes;
use plexo_core::types::{Envelope, ErrorBody};
use plexo_core::{KernelError, KernelResult};

use crate::context::PluginContext;
use crate::hub::PluginHub;
use crate::router;

/// The three events wrapped around every plugin run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// Fired before the entry point runs. A responder can replace the
    /// parameters.
    Before,
    /// Fired as the entry point is about to run. Observational only.
    InProcess,
    /// Fired after the entry point returned. A responder can replace the
    /// result.
    After,
}

impl LifecycleEvent {
    /// The event name suffix.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::InProcess => "in-process",
            Self::After => "after",
        }
    }

    /// Full event name for a plugin, `<plugin id>-<suffix>`.
    pub fn event_name(&self, plugin_id: &str) -> String {
        format!("{plugin_id}-{}", self.suffix())
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Pick the value the first successful responder contributed.
///
/// Responder maps arrive as `{"data": {<listener id>: <entry>, ...}}`. The
/// first entry without an `error` member wins; its `data` member is the
/// contribution, or the whole entry when it carries none.
fn first_responder_payload(payload: &Value) -> Option<Value> {
    let responders = payload.get("data")?.as_object()?;
    for entry in responders.values() {
        if entry.get("error").is_none() {
            return Some(entry.get("data").cloned().unwrap_or_else(|| entry.clone()));
        }
    }
    None
}

/// Run one plugin through the full pipeline.
///
/// Fires `<id>-before` (responders may replace the parameters), then
/// `<id>-in-process`, then the entry point, then `<id>-after` (responders
/// may replace the result). Event delivery failures never fail the run.
pub(crate) fn run(
    hub: &PluginHub,
    plugin_id: &str,
    params: &Value,
    event_name: Option<&str>,
) -> KernelResult<Value> {
    let definition = hub.registry().resolve(plugin_id, hub.baseline())?;
    hub.ensure_configuration(&definition);

    let mut params = params.clone();
    let before = router::fire(
        hub,
        plugin_id,
        &LifecycleEvent::Before.event_name(plugin_id),
        &params,
    );
    if let Some(replacement) = before.payload().and_then(first_responder_payload) {
        debug!(plugin_id = %plugin_id, "Run parameters replaced by a before listener");
        params = replacement;
    }

    router::fire(
        hub,
        plugin_id,
        &LifecycleEvent::InProcess.event_name(plugin_id),
        &params,
    );

    let Some(runnable) = definition.capabilities().run.clone() else {
        return Err(KernelError::capability(format!(
            "Plugin '{plugin_id}' has no run entry point"
        )));
    };
    let ctx = PluginContext::new(hub, definition.clone());
    let mut data = runnable.run(&ctx, &params, event_name)?;

    let after = router::fire(
        hub,
        plugin_id,
        &LifecycleEvent::After.event_name(plugin_id),
        &params,
    );
    if let Some(replacement) = after.payload().and_then(first_responder_payload) {
        debug!(plugin_id = %plugin_id, "Run result replaced by an after listener");
        data = replacement;
    }

    Ok(data)
}

/// Run every registered plugin with the same parameters.
///
/// Plugins that fail or carry no run entry point are left out of the result
/// map instead of failing the batch.
pub(crate) fn run_all(
    hub: &PluginHub,
    params: &Value,
    event_name: Option<&str>,
) -> BTreeMap<String, Value> {
    let mut results = BTreeMap::new();
    for id in hub.registry().ids() {
        match run(hub, &id, params, event_name) {
            Ok(data) => {
                results.insert(id, data);
            }
            Err(err) => {
                debug!(plugin_id = %id, error = %err, "Skipping plugin in batch run");
            }
        }
    }
    results
}

/// Deliver a message to one registered plugin and shape the reply as an
/// envelope.
pub(crate) fn on_message(
    hub: &PluginHub,
    to_id: &str,
    message: &Value,
    from_id: &str,
) -> Envelope {
    let Ok(definition) = hub.registry().resolve(to_id, hub.baseline()) else {
        return Envelope::error_with_description(
            codes::UNDEFINED_PLUGIN,
            "No plugin could be found with the given id.",
        );
    };
    let Some(handler) = definition.capabilities().on_message.clone() else {
        return Envelope::error_with_description(
            codes::UNDEFINED_ONMESSAGE_FUNCTION,
            "The recipient has no message handler.",
        );
    };
    hub.ensure_configuration(&definition);
    let ctx = PluginContext::new(hub, definition.clone());
    match handler.on_message(&ctx, message, from_id) {
        Ok(reply) => envelope_from_reply(reply),
        Err(err) => Envelope::error_with_description(codes::PLUGIN_ERROR, err.to_string()),
    }
}

/// Deliver a message to every registered plugin with a handler.
///
/// Replies carrying an `error` member and failed handlers are left out, the
/// same omission rule batch runs follow.
pub(crate) fn deliver_all(
    hub: &PluginHub,
    message: &Value,
    from_id: &str,
) -> BTreeMap<String, Value> {
    let mut results = BTreeMap::new();
    for id in hub.registry().ids() {
        let Ok(definition) = hub.registry().resolve(&id, hub.baseline()) else {
            continue;
        };
        let Some(handler) = definition.capabilities().on_message.clone() else {
            continue;
        };
        hub.ensure_configuration(&definition);
        let ctx = PluginContext::new(hub, definition.clone());
        match handler.on_message(&ctx, message, from_id) {
            Ok(reply) if reply.get("error").is_none() => {
                results.insert(id, reply);
            }
            Ok(_) => {
                debug!(plugin_id = %id, "Skipping error reply in batch delivery");
            }
            Err(err) => {
                debug!(plugin_id = %id, error = %err, "Skipping failed handler in batch delivery");
            }
        }
    }
    results
}

/// A reply that parses as an error body is an error envelope; everything
/// else is data.
fn envelope_from_reply(reply: Value) -> Envelope {
    match serde_json::from_value::<ErrorBody>(reply.clone()) {
        Ok(body) => Envelope::Error(body),
        Err(_) => Envelope::data(reply),
    }
}
