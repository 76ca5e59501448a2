//! Integration tests for the JSON command protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use landmark_gui_lib::command::{execute_json, execute_json_batch};
use landmark_gui_lib::harness::{HeadlessScene, TestHarness};
use landmark_gui_lib::bounds::SceneBounds;
use landmark_gui_lib::state::AppSettings;

fn harness() -> TestHarness {
    TestHarness::with_extents([0.0, 10.0, 0.0, 10.0, 0.0, 10.0])
}

#[test]
fn test_command_click_creates_annotation() {
    let mut h = harness();

    let resp = execute_json(&mut h, r#"{"command": "click", "at": [1.0, 2.0, 3.0]}"#).unwrap();
    assert!(resp.success);
    assert!(resp.error.is_none());
    assert_eq!(h.annotation_count(), 1);
    assert_eq!(h.annotations()[0].position(), [1.0, 2.0, 3.0]);
}

#[test]
fn test_command_inspect() {
    let mut h = harness();
    h.click([1.0, 1.0, 1.0]).unwrap();
    h.click([2.0, 2.0, 2.0]).unwrap();
    h.click([2.0, 2.0, 2.0]).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
    assert!(resp.success);
    let data = resp.data.unwrap();
    assert_eq!(data["annotation_count"], 2);
    assert_eq!(data["selected_index"], 1);
    assert_eq!(data["dragging"], true);
    assert_eq!(data["radius"], 2.0);
    assert_eq!(data["annotations"][0]["id"], 1);
    assert_eq!(data["annotations"][1]["x"], 2.0);
}

#[test]
fn test_command_inspect_empty_session() {
    let mut h = harness();
    let data = execute_json(&mut h, r#"{"command": "inspect"}"#)
        .unwrap()
        .data
        .unwrap();
    assert_eq!(data["annotation_count"], 0);
    assert!(data["selected_index"].is_null());
    assert_eq!(data["dragging"], false);
}

#[test]
fn test_command_export() {
    let mut h = harness();
    h.click([5.0, 5.0, 5.0]).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "export"}"#).unwrap();
    assert!(resp.success);
    let text = resp.data.unwrap()["annotations_json"]
        .as_str()
        .unwrap()
        .to_string();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed[0]["id"], 1);
    assert_eq!(parsed[0]["z"], 5.0);
}

#[test]
fn test_command_press_keys() {
    let mut h = harness();

    execute_json(&mut h, r#"{"command": "press", "key": "Up"}"#).unwrap();
    execute_json(&mut h, r#"{"command": "press", "key": "Up"}"#).unwrap();
    assert_eq!(h.radius(), 4.0);

    for _ in 0..5 {
        execute_json(&mut h, r#"{"command": "press", "key": "Down"}"#).unwrap();
    }
    assert_eq!(h.radius(), 1.0);
}

#[test]
fn test_command_unknown_key_is_harmless() {
    let mut h = harness();
    h.click([1.0, 1.0, 1.0]).unwrap();

    let resp = execute_json(&mut h, r#"{"command": "press", "key": "F7"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.annotation_count(), 1);
    assert_eq!(h.radius(), 2.0);
}

#[test]
fn test_batch_create_select_drag_release() {
    let mut h = harness();

    let json = r#"[
        {"command": "click", "at": [1.0, 1.0, 1.0]},
        {"command": "click", "at": [1.0, 1.0, 1.0]},
        {"command": "drag_to", "at": [4.0, 4.0, 4.0]},
        {"command": "release"},
        {"command": "drag_to", "at": [9.0, 9.0, 9.0]},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 6);
    assert!(responses.iter().all(|r| r.success));

    let data = responses[5].data.as_ref().unwrap();
    assert_eq!(data["annotation_count"], 1);
    assert_eq!(data["annotations"][0]["x"], 4.0);
    assert_eq!(data["dragging"], false);
}

#[test]
fn test_batch_select_and_delete() {
    let mut h = harness();

    let json = r#"[
        {"command": "click", "at": [1.0, 1.0, 1.0]},
        {"command": "click", "at": [2.0, 2.0, 2.0]},
        {"command": "click", "at": [3.0, 3.0, 3.0]},
        {"command": "click", "at": [2.0, 2.0, 2.0]},
        {"command": "press", "key": "Delete"},
        {"command": "right_click", "at": [1.0, 1.0, 1.0]}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses.iter().all(|r| r.success));

    let ids: Vec<u32> = h.annotations().iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![3]);
    assert_eq!(h.marker_count(), 1);
    assert_eq!(h.label_count(), 1);
    assert_eq!(h.selected_index(), None);
}

#[test]
fn test_batch_out_of_bounds_is_ignored() {
    let mut h = harness();

    let json = r#"[
        {"command": "click", "at": [11.0, 5.0, 5.0]},
        {"command": "right_click", "at": [5.0, -1.0, 5.0]},
        {"command": "click_background"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses.iter().all(|r| r.success));
    assert_eq!(h.annotation_count(), 0);
    assert_eq!(h.marker_count(), 0);
}

#[test]
fn test_command_error_response_on_exhaustion() {
    let bounds = SceneBounds::from_extents([0.0, 10.0, 0.0, 10.0, 0.0, 10.0]);
    // Room for one marker (sphere + label) only
    let scene = HeadlessScene::new(Some(bounds)).with_capacity(2);
    let mut h = TestHarness::with_scene(scene, &AppSettings::default());

    let json = r#"[
        {"command": "click", "at": [1.0, 1.0, 1.0]},
        {"command": "click", "at": [2.0, 2.0, 2.0]}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert!(responses[0].success);
    assert!(!responses[1].success);
    assert!(responses[1].error.is_some());
    assert_eq!(h.annotation_count(), 1);
    assert_eq!(h.marker_count(), 1);
}

#[test]
fn test_invalid_json() {
    let mut h = harness();
    let err = execute_json(&mut h, "not json").unwrap_err();
    assert!(err.contains("Invalid command JSON"));
}

#[test]
fn test_unknown_command() {
    let mut h = harness();
    assert!(execute_json(&mut h, r#"{"command": "explode"}"#).is_err());
}

#[test]
fn test_missing_position() {
    let mut h = harness();
    assert!(execute_json(&mut h, r#"{"command": "click"}"#).is_err());
    assert_eq!(h.annotation_count(), 0);
}

#[test]
fn test_invalid_batch_json() {
    let mut h = harness();
    let err = execute_json_batch(&mut h, r#"{"command": "release"}"#).unwrap_err();
    assert!(err.contains("Invalid commands JSON"));
}

#[test]
fn test_response_serialization() {
    let mut h = harness();
    let resp = execute_json(&mut h, r#"{"command": "release"}"#).unwrap();
    let text = serde_json::to_string(&resp).unwrap();
    assert_eq!(text, r#"{"success":true}"#);
}
