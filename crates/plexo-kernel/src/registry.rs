//! Plugin registry: registration, lookup, and compose-at-first-use.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use plexo_core::{KernelError, KernelResult};

use crate::compose::compose;
use crate::definition::PluginDefinition;

/// Registry view of a plugin, safe to serialize for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin id.
    pub id: String,
    /// Display label.
    pub name: String,
    /// Parent ids, flattened once composed.
    pub extends: Vec<String>,
    /// Names of the defined members.
    pub capabilities: Vec<String>,
    /// Whether composition has run.
    pub composed: bool,
    /// When the definition was built.
    pub registered_at: DateTime<Utc>,
}

impl From<&PluginDefinition> for PluginInfo {
    fn from(definition: &PluginDefinition) -> Self {
        Self {
            id: definition.id().to_string(),
            name: definition.name().to_string(),
            extends: definition.extends().to_vec(),
            capabilities: definition.capabilities().names(),
            composed: definition.is_composed(),
            registered_at: definition.registered_at(),
        }
    }
}

/// Process-wide plugin store.
///
/// Definitions go in raw and are composed lazily: the first resolve runs the
/// composition pass against a snapshot of the registered definitions and
/// swaps the composed copy in. There is no removal; `remove` on the hub is a
/// bridge notification, not a registry operation.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: RwLock<BTreeMap<String, Arc<PluginDefinition>>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Ids are unique; a duplicate is a conflict.
    pub fn register(&self, definition: PluginDefinition) -> KernelResult<()> {
        let id = definition.id().to_string();
        let mut plugins = self.plugins.write().unwrap_or_else(|e| e.into_inner());
        if plugins.contains_key(&id) {
            return Err(KernelError::conflict(format!(
                "Plugin '{id}' is already registered"
            )));
        }
        info!(plugin_id = %id, name = %definition.name(), "Registering plugin");
        plugins.insert(id, Arc::new(definition));
        Ok(())
    }

    /// Definition as currently stored, composed or not.
    pub fn get(&self, id: &str) -> Option<Arc<PluginDefinition>> {
        let plugins = self.plugins.read().unwrap_or_else(|e| e.into_inner());
        plugins.get(id).cloned()
    }

    /// Whether a plugin id is registered.
    pub fn contains(&self, id: &str) -> bool {
        let plugins = self.plugins.read().unwrap_or_else(|e| e.into_inner());
        plugins.contains_key(id)
    }

    /// Registered ids in listing order.
    pub fn ids(&self) -> Vec<String> {
        let plugins = self.plugins.read().unwrap_or_else(|e| e.into_inner());
        plugins.keys().cloned().collect()
    }

    /// Number of registered plugins.
    pub fn count(&self) -> usize {
        let plugins = self.plugins.read().unwrap_or_else(|e| e.into_inner());
        plugins.len()
    }

    /// Registry views of every plugin, in listing order.
    pub fn list(&self) -> Vec<PluginInfo> {
        let plugins = self.plugins.read().unwrap_or_else(|e| e.into_inner());
        plugins.values().map(|def| PluginInfo::from(def.as_ref())).collect()
    }

    /// Definition ready for invocation, composing it on first use.
    ///
    /// Composition runs against a snapshot taken outside the write lock, so
    /// plugin code reached through it can never deadlock the registry.
    pub fn resolve(
        &self,
        id: &str,
        baseline: &Map<String, Value>,
    ) -> KernelResult<Arc<PluginDefinition>> {
        let (definition, snapshot) = {
            let plugins = self.plugins.read().unwrap_or_else(|e| e.into_inner());
            let definition = plugins.get(id).cloned().ok_or_else(|| {
                KernelError::not_found(format!("Plugin '{id}' is not registered"))
            })?;
            if definition.is_composed() {
                return Ok(definition);
            }
            (definition, plugins.clone())
        };

        let composed = Arc::new(compose(&definition, &snapshot, baseline));
        debug!(plugin_id = %id, extends = ?composed.extends(), "Composed plugin");

        let mut plugins = self.plugins.write().unwrap_or_else(|e| e.into_inner());
        plugins.insert(id.to_string(), composed.clone());
        Ok(composed)
    }
}
