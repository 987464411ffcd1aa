//! Integration tests for extends composition through the public surface.

use serde_json::{Map, json};

use plexo_kernel::definition::PluginDefinition;

use crate::helpers;

#[test]
fn test_sum_inherits_capability_and_configuration_from_base() {
    let harness = helpers::demo_hub();

    // Nothing composed at registration time.
    let listed = harness.hub().list();
    assert!(listed.iter().all(|info| !info.composed));

    let ctx = harness.hub().context("math.sum").unwrap();
    assert_eq!(ctx.configuration_value("digits"), Some(json!(2)));
    assert_eq!(
        ctx.call("format", &json!({ "value": 3 })).unwrap(),
        json!("= 3.00")
    );

    let info = harness
        .hub()
        .list()
        .into_iter()
        .find(|info| info.id == "math.sum")
        .unwrap();
    assert!(info.composed);
    assert_eq!(info.extends, ["math.base"]);
    assert!(info.capabilities.contains(&"format".to_string()));
}

#[test]
fn test_transitive_extends_flatten_in_order() {
    let harness = helpers::demo_hub();
    harness.install(
        PluginDefinition::builder("math.stats")
            .extends(["math.sum"])
            .build(),
    );

    // Composing the parent first flattens its own extends list, which the
    // child then picks up in one pass.
    harness.hub().context("math.sum").unwrap();
    harness.hub().context("math.stats").unwrap();

    let info = harness
        .hub()
        .list()
        .into_iter()
        .find(|info| info.id == "math.stats")
        .unwrap();
    assert_eq!(info.extends, ["math.sum", "math.base"]);
    assert!(info.capabilities.contains(&"run".to_string()));
    assert!(info.capabilities.contains(&"on_message".to_string()));
}

#[test]
fn test_resolving_twice_reuses_the_composed_definition() {
    let harness = helpers::demo_hub();

    harness.hub().context("math.sum").unwrap();
    let first = harness
        .hub()
        .list()
        .into_iter()
        .find(|info| info.id == "math.sum")
        .unwrap();

    harness.hub().context("math.sum").unwrap();
    let second = harness
        .hub()
        .list()
        .into_iter()
        .find(|info| info.id == "math.sum")
        .unwrap();

    assert_eq!(first.extends, second.extends);
    assert_eq!(first.capabilities, second.capabilities);
    assert_eq!(first.registered_at, second.registered_at);
}

#[test]
fn test_missing_parent_is_skipped_not_fatal() {
    let harness = helpers::demo_hub();
    harness.install(
        PluginDefinition::builder("math.orphan")
            .extends(["math.ghost", "math.base"])
            .run_fn(|ctx, params, _| ctx.call("format", params))
            .build(),
    );

    // The unknown parent is skipped; the known one still contributes.
    let result = harness.run("math.orphan", &json!({ "value": 1 })).unwrap();
    assert_eq!(result, json!("= 1.00"));

    let info = harness
        .hub()
        .list()
        .into_iter()
        .find(|info| info.id == "math.orphan")
        .unwrap();
    assert_eq!(info.extends, ["math.ghost", "math.base"]);
}

#[test]
fn test_child_configuration_wins_over_parent_and_baseline() {
    let baseline = Map::from_iter([("digits".to_string(), json!(5))]);
    let harness = helpers::demo_hub_with_baseline(baseline);
    harness.install(
        PluginDefinition::builder("math.fixed")
            .extends(["math.base"])
            .configuration(Map::from_iter([("digits".to_string(), json!(0))]))
            .run_fn(|ctx, params, _| ctx.call("format", params))
            .build(),
    );

    let result = harness.run("math.fixed", &json!({ "value": 2.5 })).unwrap();
    assert_eq!(result, json!("= 2"));
}

#[test]
fn test_duplicate_registration_is_rejected() {
    let harness = helpers::demo_hub();
    let err = harness
        .hub()
        .register(PluginDefinition::builder("math.sum").build())
        .unwrap_err();
    assert!(err.to_string().contains("already registered"));
}
