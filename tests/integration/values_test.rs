//! Integration tests for the bridge-backed value store.

use serde_json::json;

use crate::helpers;

#[test]
fn test_value_round_trip_through_the_bridge() {
    let harness = helpers::demo_hub();
    let ctx = harness.hub().context("math.sum").unwrap();

    assert!(ctx.set_value("color", "green"));
    assert_eq!(ctx.get_value("color"), "green");
    assert_eq!(
        harness
            .bridge()
            .stored_value(harness.hub().handler_id(), "math.sum", "color"),
        Some("green".to_string())
    );

    ctx.destroy_value("color");
    assert_eq!(ctx.get_value("color"), "");
}

#[test]
fn test_values_are_scoped_per_plugin() {
    let harness = helpers::demo_hub();
    let sum = harness.hub().context("math.sum").unwrap();
    let square = harness.hub().context("math.square").unwrap();

    sum.set_value("color", "green");
    square.set_value("color", "red");

    assert_eq!(sum.get_value("color"), "green");
    assert_eq!(square.get_value("color"), "red");
}

#[test]
fn test_clear_values_is_scoped_to_the_calling_plugin() {
    let harness = helpers::demo_hub();
    let sum = harness.hub().context("math.sum").unwrap();
    let square = harness.hub().context("math.square").unwrap();

    sum.set_value("a", "1");
    sum.set_value("b", "2");
    square.set_value("a", "3");

    sum.clear_values();

    assert_eq!(sum.get_value("a"), "");
    assert_eq!(sum.get_value("b"), "");
    assert_eq!(square.get_value("a"), "3");
}

#[test]
fn test_empty_keys_and_values_are_rejected_locally() {
    let harness = helpers::demo_hub();
    let ctx = harness.hub().context("math.sum").unwrap();

    assert!(!ctx.set_value("", "green"));
    assert!(!ctx.set_value("color", ""));
    assert_eq!(ctx.get_value(""), "");
    ctx.destroy_value("");

    assert_eq!(harness.bridge().counts().total(), 0);
}

#[test]
fn test_missing_keys_read_as_empty_strings() {
    let harness = helpers::demo_hub();
    let ctx = harness.hub().context("math.square").unwrap();

    assert_eq!(ctx.get_value("never-set"), "");
    assert_eq!(harness.bridge().counts().get_value, 1);
}

#[test]
fn test_plugins_can_use_values_during_a_run() {
    let harness = helpers::demo_hub();
    {
        let ctx = harness.hub().context("math.sum").unwrap();
        ctx.set_value("last-sum", "9");
    }

    // A later context for the same plugin sees the stored value.
    let ctx = harness.hub().context("math.sum").unwrap();
    assert_eq!(ctx.get_value("last-sum"), "9");
    assert_eq!(ctx.configuration_value("digits"), Some(json!(2)));
}
