//! Integration tests for message routing across the local/remote split.

use serde_json::json;

use plexo_core::error::codes;
use plexo_core::types::Envelope;

use crate::helpers;

#[test]
fn test_sum_fans_out_without_a_single_bridge_round_trip() {
    let harness = helpers::demo_hub();

    let result = harness.run("math.sum", &json!({ "values": [2, 3, 4] })).unwrap();

    assert_eq!(result["sum"], json!(9));
    assert_eq!(result["related"]["math.square"]["data"]["squares"], json!([4, 9, 16]));
    assert_eq!(
        result["related"]["math.multiplication"]["data"]["product"],
        json!(24)
    );
    assert_eq!(harness.bridge().counts().send_message, 0);
}

#[test]
fn test_unknown_recipients_fall_back_to_one_batched_bridge_call() {
    let harness = helpers::demo_hub();
    harness
        .bridge()
        .stub_message_reply("remote.stats", json!({ "mean": 3 }));

    let envelope = harness.send(
        "math.sum",
        &json!({ "message": { "values": [2, 4] } }),
        &[
            "math.square".to_string(),
            "remote.stats".to_string(),
            "remote.missing".to_string(),
        ],
    );

    let sent = harness.bridge().sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_ids, ["remote.stats", "remote.missing"]);

    let data = &envelope.payload().unwrap()["data"];
    assert_eq!(data["math.square"]["data"]["squares"], json!([4, 16]));
    assert_eq!(data["remote.stats"]["data"]["mean"], json!(3));
    assert_eq!(data["remote.missing"]["error"], json!(codes::UNDEFINED_PLUGIN));
}

#[test]
fn test_broadcast_bypasses_local_delivery() {
    let harness = helpers::demo_hub();
    harness
        .bridge()
        .stub_message_reply("remote.stats", json!({ "mean": 3 }));

    let envelope = harness.send("math.sum", &json!({ "message": { "values": [1] } }), &[]);

    assert_eq!(harness.bridge().counts().send_message, 1);
    let data = &envelope.payload().unwrap()["data"];
    assert_eq!(data["remote.stats"]["data"]["mean"], json!(3));
    assert!(data.get("math.square").is_none());
}

#[test]
fn test_bridge_error_envelope_is_returned_verbatim() {
    let harness = helpers::demo_hub();

    let envelope = harness.send("math.sum", &json!({ "message": {} }), &[]);

    assert!(envelope.is_error());
    assert_eq!(
        envelope.error_body().unwrap().error,
        codes::UNDEFINED_PLUGINS
    );
}

#[test]
fn test_error_replies_pass_through_unwrapped() {
    let harness = helpers::demo_hub();

    // Empty operand list makes the multiplication plugin answer in-band.
    let envelope = harness.send(
        "caller",
        &json!({ "message": { "values": [] } }),
        &["math.multiplication".to_string()],
    );

    let entry = &envelope.payload().unwrap()["data"]["math.multiplication"];
    assert_eq!(entry["error"], json!(codes::MALFORMED_PARAMETERS));
    assert!(entry.get("data").is_none());
}

#[test]
fn test_responses_survive_an_unparseable_bridge_payload() {
    // A bridge handing back junk text downgrades to an empty remote map and
    // keeps the local results.
    #[derive(Debug, Default)]
    struct JunkBridge;

    impl plexo_core::traits::Bridge for JunkBridge {
        fn set_value(&self, _request: &str) -> String {
            String::new()
        }
        fn get_value(&self, _request: &str) -> String {
            String::new()
        }
        fn destroy_value(&self, _request: &str) {}
        fn clear_values(&self, _request: &str) {}
        fn send_message(&self, _request: &str) -> String {
            "not json at all".to_string()
        }
        fn fire(&self, _request: &str) -> String {
            Envelope::data(json!({ "data": {} })).to_string()
        }
        fn run_plugin(&self, _request: &str) -> String {
            String::new()
        }
        fn remove(&self, _request: &str) {}
        fn remove_events(&self, _request: &str) {}
    }

    let hub = plexo_kernel::hub::PluginHub::new(std::sync::Arc::new(JunkBridge));
    plugin_math::install(&hub).unwrap();

    let envelope = hub.send_message(
        "caller",
        &json!({ "message": { "values": [2, 3] } }),
        &["math.square".to_string(), "remote.anything".to_string()],
    );

    let data = &envelope.payload().unwrap()["data"];
    assert_eq!(data["math.square"]["data"]["squares"], json!([4, 9]));
    assert!(data.get("remote.anything").is_none());
}
