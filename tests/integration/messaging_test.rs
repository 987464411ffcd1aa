//! Integration tests for host-driven delivery: single-plugin messages,
//! batch delivery, events, and remote runs.

use serde_json::json;

use plexo_core::error::codes;
use plexo_core::types::Envelope;

use crate::helpers;

#[test]
fn test_on_message_delivers_to_one_plugin() {
    let harness = helpers::demo_hub();

    let envelope = harness
        .hub()
        .on_message("math.sum", &json!({ "values": [5, 6] }), "host");

    assert_eq!(envelope.payload().unwrap()["sum"], json!(11));
}

#[test]
fn test_on_message_to_unknown_plugin() {
    let harness = helpers::demo_hub();

    let envelope = harness.hub().on_message("math.ghost", &json!({}), "host");

    assert_eq!(
        envelope.error_body().map(|body| body.error.as_str()),
        Some(codes::UNDEFINED_PLUGIN)
    );
}

#[test]
fn test_on_message_to_plugin_without_handler() {
    let harness = helpers::demo_hub();

    let envelope = harness.hub().on_message("math.base", &json!({}), "host");

    assert_eq!(
        envelope.error_body().map(|body| body.error.as_str()),
        Some(codes::UNDEFINED_ONMESSAGE_FUNCTION)
    );
}

#[test]
fn test_error_shaped_replies_become_error_envelopes() {
    let harness = helpers::demo_hub();

    let envelope = harness
        .hub()
        .on_message("math.multiplication", &json!({ "values": [] }), "host");

    assert!(envelope.is_error());
    assert_eq!(
        envelope.error_body().map(|body| body.error.as_str()),
        Some(codes::MALFORMED_PARAMETERS)
    );
}

#[test]
fn test_deliver_all_reaches_every_handler() {
    let harness = helpers::demo_hub();

    let results = harness.hub().deliver_all(&json!({ "values": [2, 3] }), "host");

    let ids: Vec<&String> = results.keys().collect();
    assert_eq!(ids, ["math.multiplication", "math.square", "math.sum"]);
    assert_eq!(results["math.sum"]["sum"], json!(5));
    assert_eq!(results["math.square"]["squares"], json!([4, 9]));
    assert_eq!(results["math.multiplication"]["product"], json!(6));
}

#[test]
fn test_deliver_all_skips_error_replies() {
    let harness = helpers::demo_hub();

    let results = harness.hub().deliver_all(&json!({ "values": [] }), "host");

    assert!(results.is_empty());
}

#[test]
fn test_fire_without_listeners_returns_an_empty_responder_map() {
    let harness = helpers::demo_hub();

    let envelope = harness.hub().fire("recalculate", &json!({ "source": "cron" }));

    assert_eq!(envelope.payload().unwrap()["data"], json!({}));
    assert_eq!(harness.bridge().counts().fire, 1);
}

#[test]
fn test_fire_returns_listener_payloads() {
    let harness = helpers::demo_hub();
    harness.bridge().stub_event(
        "recalculate",
        Envelope::data(json!({
            "data": { "listener.cache": { "data": { "invalidated": 3 } } }
        })),
    );

    let envelope = harness.hub().fire("recalculate", &json!({}));

    assert_eq!(
        envelope.payload().unwrap()["data"]["listener.cache"]["data"]["invalidated"],
        json!(3)
    );
}

#[test]
fn test_plugins_can_fire_events_from_their_context() {
    let harness = helpers::demo_hub();
    let ctx = harness.hub().context("math.sum").unwrap();

    ctx.fire("math.sum-changed", &json!({ "sum": 9 }));

    let fired = harness.bridge().fired_events();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].event_name, "math.sum-changed");
    assert_eq!(fired[0].plugin_id, "math.sum");
}

#[test]
fn test_run_remote_returns_the_host_envelope() {
    let harness = helpers::demo_hub();
    harness.bridge().stub_remote_run(
        "remote.calc",
        Envelope::data(json!({ "data": { "value": 7 } })),
    );

    let envelope = harness.hub().run_remote("remote.calc", &json!({ "x": 1 }));
    assert_eq!(envelope.payload().unwrap()["data"]["value"], json!(7));

    let missing = harness.hub().run_remote("remote.ghost", &json!({}));
    assert_eq!(
        missing.error_body().map(|body| body.error.as_str()),
        Some(codes::UNDEFINED_PLUGIN)
    );
}

#[test]
fn test_plugins_can_run_remote_plugins_from_their_context() {
    let harness = helpers::demo_hub();
    harness.bridge().stub_remote_run(
        "remote.calc",
        Envelope::data(json!({ "data": { "value": 7 } })),
    );
    let ctx = harness.hub().context("math.sum").unwrap();

    let envelope = ctx.run_plugin("remote.calc", &json!({ "x": 1 }));

    assert_eq!(envelope.payload().unwrap()["data"]["value"], json!(7));
    assert_eq!(harness.bridge().counts().run_plugin, 1);
}

#[test]
fn test_remove_reaches_the_host_without_touching_the_registry() {
    let harness = helpers::demo_hub();

    harness.hub().remove("math.square");

    assert_eq!(harness.bridge().removed_ids(), vec!["math.square".to_string()]);
    assert!(harness.hub().registry().contains("math.square"));
}

#[test]
fn test_remove_events_scopes_to_the_calling_plugin() {
    let harness = helpers::demo_hub();
    let ctx = harness.hub().context("math.sum").unwrap();

    ctx.remove_events();

    assert_eq!(
        harness.bridge().event_removals(),
        vec!["math.sum".to_string()]
    );
}
