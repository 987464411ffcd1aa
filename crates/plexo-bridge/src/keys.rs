//! Value-store key builders for the in-memory bridge.
//!
//! Centralising key construction prevents typos and keeps the scoping rule
//! (one namespace per kernel instance, one per plugin) in a single place.

use plexo_core::types::HandlerId;

/// Prefix applied to all bridge value-store keys.
const PREFIX: &str = "plexo";

/// Key for one stored value, scoped to a kernel instance and plugin.
pub fn value(handler_id: HandlerId, plugin_id: &str, key: &str) -> String {
    format!("{PREFIX}:value:{handler_id}:{plugin_id}:{key}")
}

/// Prefix matching every value a plugin owns, for bulk clearing.
pub fn plugin_values_prefix(handler_id: HandlerId, plugin_id: &str) -> String {
    format!("{PREFIX}:value:{handler_id}:{plugin_id}:")
}
