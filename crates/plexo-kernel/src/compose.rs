//! Extends composition.
//!
//! Flattens a definition's parents into it: capabilities the child lacks,
//! configuration entries the child lacks, and the parents' own extends lists.
//! One pass walks only the ids on the definition at entry; ids appended
//! during the pass are recorded for later passes rather than merged, which is
//! how multi-level chains flatten without recursion and why reapplying the
//! pass is harmless.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::definition::PluginDefinition;

/// Compose a definition against a snapshot of registered definitions.
///
/// Unknown parent ids are skipped with a warning. The result carries the
/// flattened extends list, the filled capability set, and the merged
/// configuration, and is marked composed.
pub fn compose(
    definition: &PluginDefinition,
    sources: &BTreeMap<String, Arc<PluginDefinition>>,
    baseline: &Map<String, Value>,
) -> PluginDefinition {
    let mut capabilities = definition.capabilities().clone();
    let mut extends: Vec<String> = definition.extends().to_vec();
    let mut configuration = definition.declared_configuration().cloned();

    // A child that extends anything gets a configuration object up front so
    // parent entries have somewhere to land without overwriting.
    if !extends.is_empty() && configuration.is_none() {
        configuration = Some(baseline.clone());
    }

    let declared: Vec<String> = definition.extends().to_vec();
    for parent_id in &declared {
        let Some(parent) = sources.get(parent_id.as_str()) else {
            warn!(
                plugin_id = %definition.id(),
                parent_id = %parent_id,
                "Skipping extension of unregistered plugin"
            );
            continue;
        };

        capabilities.fill_from(parent.capabilities());

        if let (Some(merged), Some(parent_configuration)) =
            (configuration.as_mut(), parent.declared_configuration())
        {
            for (key, value) in parent_configuration {
                if !merged.contains_key(key) {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }

        for transitive in parent.extends() {
            if !extends.iter().any(|id| id == transitive) {
                extends.push(transitive.clone());
            }
        }

        debug!(
            plugin_id = %definition.id(),
            parent_id = %parent_id,
            "Merged extended plugin"
        );
    }

    definition.with_composition(extends, capabilities, configuration)
}
