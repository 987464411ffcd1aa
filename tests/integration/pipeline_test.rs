//! Integration tests for the before / in-process / after invocation pipeline.

use serde_json::json;

use plexo_core::types::Envelope;

use crate::helpers;

#[test]
fn test_run_fires_the_three_lifecycle_events_in_order() {
    let harness = helpers::demo_hub();

    harness.run("math.square", &json!({ "value": 3 })).unwrap();

    let events: Vec<String> = harness
        .bridge()
        .fired_events()
        .into_iter()
        .map(|req| req.event_name)
        .collect();
    assert_eq!(
        events,
        [
            "math.square-before",
            "math.square-in-process",
            "math.square-after",
        ]
    );
}

#[test]
fn test_before_listener_rewrites_the_parameters() {
    let harness = helpers::demo_hub();
    harness.bridge().stub_event(
        "math.sum-before",
        Envelope::data(json!({
            "data": { "listener.adjust": { "data": { "values": [5, 5] } } }
        })),
    );

    let result = harness.run("math.sum", &json!({ "values": [1] })).unwrap();

    assert_eq!(result["sum"], json!(10));
    assert_eq!(result["related"]["math.square"]["data"]["squares"], json!([25, 25]));
}

#[test]
fn test_after_listener_rewrites_the_result() {
    let harness = helpers::demo_hub();
    harness.bridge().stub_event(
        "math.square-after",
        Envelope::data(json!({
            "data": { "listener.audit": { "data": { "square": 0, "audited": true } } }
        })),
    );

    let result = harness.run("math.square", &json!({ "value": 3 })).unwrap();

    assert_eq!(result, json!({ "square": 0, "audited": true }));
}

#[test]
fn test_erroring_listeners_leave_the_run_untouched() {
    let harness = helpers::demo_hub();
    harness.bridge().stub_event(
        "math.square-before",
        Envelope::data(json!({
            "data": { "listener.broken": { "error": "server_error" } }
        })),
    );

    let result = harness.run("math.square", &json!({ "value": 3 })).unwrap();

    assert_eq!(result["square"], json!(9));
}

#[test]
fn test_event_name_threads_through_to_the_plugin() {
    let harness = helpers::demo_hub();

    let result = harness
        .hub()
        .run("math.sum", &json!({ "values": [1, 2] }), Some("recalculate"))
        .unwrap();

    assert_eq!(result["event"], json!("recalculate"));
}

#[test]
fn test_run_all_omits_plugins_without_an_entry_point() {
    let harness = helpers::demo_hub();

    let results = harness
        .hub()
        .run_all(&json!({ "value": 4, "values": [2, 3] }), None);

    let ids: Vec<&String> = results.keys().collect();
    assert_eq!(ids, ["math.square", "math.sum"]);
    assert_eq!(results["math.square"]["square"], json!(16));
    assert_eq!(results["math.sum"]["sum"], json!(5));
}

#[test]
fn test_run_all_omits_failing_plugins() {
    let harness = helpers::demo_hub();

    // No values array: the sum plugin rejects, the square plugin still runs.
    let results = harness.hub().run_all(&json!({ "value": 4 }), None);

    let ids: Vec<&String> = results.keys().collect();
    assert_eq!(ids, ["math.square"]);
}

#[test]
fn test_missing_entry_point_fails_after_the_preamble_events() {
    let harness = helpers::demo_hub();

    let err = harness
        .run("math.multiplication", &json!({ "values": [1, 2] }))
        .unwrap_err();

    assert_eq!(err.kind, plexo_core::error::ErrorKind::Capability);
    // before and in-process fired; after never did.
    assert_eq!(harness.bridge().counts().fire, 2);
}
