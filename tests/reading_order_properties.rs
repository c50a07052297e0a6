//! Behavioural properties of reading-order reconstruction, checked through
//! the public API.

use oar_reading_order::pipeline::stages::normalize_detection;
use oar_reading_order::prelude::*;
use serde_json::{Value, json};

fn hello_world() -> Vec<RawDetection> {
    vec![
        RawDetection::new("Hello", Some(0.9), json!([[0, 0], [40, 0], [40, 15], [0, 15]])),
        RawDetection::new("World", Some(0.8), json!([[50, 2], [90, 2], [90, 17], [50, 17]])),
        RawDetection::new("Second", Some(0.95), json!([[0, 30], [50, 30], [50, 45], [0, 45]])),
    ]
}

/// Detection whose box is 10px tall and centred vertically on `y_center`.
fn at(text: &str, x: f32, y_center: f32) -> RawDetection {
    RawDetection::new(
        text,
        Some(1.0),
        json!([x, y_center - 5.0, x + 30.0, y_center + 5.0]),
    )
}

fn texts(response: &ReconstructionResponse) -> Vec<String> {
    response.data().iter().map(|f| f.text.to_string()).collect()
}

#[test]
fn end_to_end_example() {
    let response = ReadingOrderPipeline::default().reconstruct(hello_world());

    assert!(response.success);
    assert_eq!(response.text(), "Hello World\nSecond");

    let data = response.data();
    assert_eq!(data.len(), 3);
    assert_eq!(&*data[0].text, "Hello");
    assert_eq!(data[0].confidence, 0.9);
    assert_eq!(
        serde_json::to_value(data[1].quad).unwrap(),
        json!([[50.0, 2.0], [90.0, 2.0], [90.0, 17.0], [50.0, 17.0]])
    );
    assert_eq!(&*data[2].text, "Second");
    assert_eq!(data[2].confidence, 0.95);
}

#[test]
fn reconstruction_is_idempotent() {
    let pipeline = ReadingOrderPipeline::default();
    let detections = vec![
        at("c", 80.0, 52.0),
        at("a", 0.0, 10.0),
        at("d", 0.0, 48.0),
        at("b", 40.0, 14.0),
        at("e", 10.0, 90.0),
    ];
    let first = pipeline
        .run_detections(detections.into_iter().map(Ok).enumerate().collect())
        .unwrap();

    let replay: Vec<_> = first
        .document
        .fragments
        .iter()
        .map(|f| {
            let detection = Ok(RawDetection::new(
                f.text.clone(),
                Some(f.confidence),
                serde_json::to_value(f.quad).unwrap(),
            ));
            (f.index, detection)
        })
        .collect();
    let second = pipeline.run_detections(replay).unwrap();

    assert_eq!(first.document.line_texts(), vec!["a b", "d c", "e"]);
    assert_eq!(second.document.line_texts(), first.document.line_texts());
    assert_eq!(second.document.full_text, first.document.full_text);
}

#[test]
fn text_is_invariant_under_permutation_but_data_tracks_input() {
    let pipeline = ReadingOrderPipeline::default();
    let forward = pipeline.reconstruct(hello_world());

    let mut reversed_input = hello_world();
    reversed_input.reverse();
    let reversed = pipeline.reconstruct(reversed_input);

    let mut rotated_input = hello_world();
    rotated_input.rotate_left(1);
    let rotated = pipeline.reconstruct(rotated_input);

    assert_eq!(reversed.text(), forward.text());
    assert_eq!(rotated.text(), forward.text());

    assert_eq!(texts(&forward), vec!["Hello", "World", "Second"]);
    assert_eq!(texts(&reversed), vec!["Second", "World", "Hello"]);
    assert_eq!(texts(&rotated), vec!["World", "Second", "Hello"]);
}

#[test]
fn threshold_boundary_is_strict() {
    let pipeline = ReadingOrderPipeline::default();

    let joined = pipeline.reconstruct(vec![at("a", 0.0, 100.0), at("b", 40.0, 109.0)]);
    assert_eq!(joined.text(), "a b");

    let split = pipeline.reconstruct(vec![at("a", 0.0, 100.0), at("b", 40.0, 111.0)]);
    assert_eq!(split.text(), "a\nb");

    let exact = pipeline.reconstruct(vec![at("a", 0.0, 100.0), at("b", 40.0, 110.0)]);
    assert_eq!(exact.text(), "a\nb");
}

#[test]
fn threshold_is_configurable() {
    let wide = ReadingOrderPipeline::new(ReadingOrderConfig::new().with_y_threshold(15.0)).unwrap();
    let response = wide.reconstruct(vec![at("a", 0.0, 100.0), at("b", 40.0, 111.0)]);
    assert_eq!(response.text(), "a b");
}

#[test]
fn line_reference_does_not_drift() {
    // Intentional quirk: the reference stays at the first fragment's
    // y_center, so a gently sloping run of text splits every 10px.
    let response = ReadingOrderPipeline::default().reconstruct(vec![
        at("a", 0.0, 100.0),
        at("b", 40.0, 106.0),
        at("c", 80.0, 112.0),
        at("d", 120.0, 118.0),
    ]);
    assert_eq!(response.text(), "a b\nc d");
}

#[test]
fn box_shapes_are_equivalent() {
    let flat = RawDetection::new("x", Some(0.5), json!([0, 0, 50, 0, 50, 20, 0, 20]));
    let nested = RawDetection::new("x", Some(0.5), json!([[0, 0], [50, 0], [50, 20], [0, 20]]));
    let corners = RawDetection::new("x", Some(0.5), json!([0, 0, 50, 20]));

    let flat = normalize_detection(0, flat, true).unwrap();
    let nested = normalize_detection(0, nested, true).unwrap();
    let corners = normalize_detection(0, corners, true).unwrap();

    assert_eq!(flat, nested);
    assert_eq!(corners, nested);
}

#[test]
fn fragments_within_a_line_read_left_to_right() {
    let response = ReadingOrderPipeline::default()
        .reconstruct(vec![at("B", 50.0, 20.0), at("A", 10.0, 20.0)]);
    assert_eq!(response.text(), "A B");
}

#[test]
fn malformed_detection_is_skipped() {
    let detections = vec![
        RawDetection::new("Hello", Some(0.9), json!([0, 0, 40, 15])),
        RawDetection::new("broken", Some(0.9), json!([1, 2, 3])),
        RawDetection::new("World", Some(0.8), json!([50, 2, 90, 17])),
    ];
    let response = ReadingOrderPipeline::default().reconstruct(detections);

    assert!(response.success);
    assert_eq!(response.error, None);
    assert_eq!(texts(&response), vec!["Hello", "World"]);
    assert_eq!(response.text(), "Hello World");
    assert_eq!(response.skipped, None);
}

#[test]
fn both_wire_shapes_reconstruct_identically() {
    let pipeline = ReadingOrderPipeline::default();
    let aggregate = pipeline.reconstruct_value(json!({
        "rec_texts": ["World", "Hello", "Second"],
        "rec_scores": [0.8, 0.9, 0.95],
        "rec_boxes": [[50, 2, 90, 17], [0, 0, 40, 15], [0, 30, 50, 45]]
    }));
    let legacy = pipeline.reconstruct_value(json!([[
        [[[50, 2], [90, 2], [90, 17], [50, 17]], ["World", 0.8]],
        [[[0, 0], [40, 0], [40, 15], [0, 15]], ["Hello", 0.9]],
        [[[0, 30], [50, 30], [50, 45], [0, 45]], ["Second", 0.95]]
    ]]));

    assert_eq!(aggregate.text(), "Hello World\nSecond");
    assert_eq!(legacy.text(), aggregate.text());
    assert_eq!(legacy.data(), aggregate.data());
}

#[test]
fn wire_response_shape() {
    let response = ReadingOrderPipeline::default().reconstruct_json(
        r#"{"rec_texts": ["Hi"], "rec_scores": [0.5], "rec_boxes": [[0, 0, 2, 1]]}"#,
    );
    let value: Value = serde_json::from_str(&response.to_json(false)).unwrap();
    assert_eq!(
        value,
        json!({
            "success": true,
            "text": "Hi",
            "data": [{
                "text": "Hi",
                "confidence": 0.5,
                "box": [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0]]
            }]
        })
    );

    let failed = ReadingOrderPipeline::default().reconstruct_json("<html>");
    let value: Value = serde_json::from_str(&failed.to_json(false)).unwrap();
    assert_eq!(value["success"], json!(false));
    assert!(value["error"].as_str().unwrap().contains("Invalid JSON input"));
    assert!(value.get("text").is_none());
}

#[test]
fn config_file_drives_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reading_order.toml");
    std::fs::write(&path, "y_threshold = 20.0\nmalformed_policy = \"report\"\n").unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let pipeline = ReadingOrderPipeline::new(config).unwrap();
    let response = pipeline.reconstruct(vec![
        at("a", 0.0, 100.0),
        RawDetection::new("bad", None, Value::Null),
        at("b", 40.0, 115.0),
    ]);

    assert_eq!(response.text(), "a b");
    assert_eq!(response.skipped, Some(1));
    assert_eq!(response.skipped_indices, Some(vec![1]));
}
