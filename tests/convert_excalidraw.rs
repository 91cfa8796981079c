//! Integration tests for page-to-Excalidraw conversion, end to end from
//! synthetic buffers.

use rmdraw::convert::{
    to_excalidraw, BackgroundImage, ConvertOptions, SequentialIdSource,
};
use rmdraw::excalidraw::Element;
use rmdraw::ink::io_lines::from_lines_slice;

mod common;

use common::{fixed_page, TestStroke};

#[test]
fn v5_fineliner_scenario_end_to_end() {
    // One layer, one fineliner stroke, base width 2.0, three points.
    let data = fixed_page(
        5,
        &[vec![
            TestStroke::new(4, 0, 2.0).with_xy(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]),
        ]],
    );

    let page = from_lines_slice(&data).unwrap();
    assert_eq!(page.layers.len(), 1);
    assert_eq!(page.layers[0].strokes.len(), 1);
    assert_eq!(page.layers[0].strokes[0].points.len(), 3);

    let doc = to_excalidraw(
        &page,
        None,
        &ConvertOptions::default(),
        &mut SequentialIdSource::new(),
    );

    assert_eq!(doc.elements.len(), 1);
    let Element::Freedraw(el) = &doc.elements[0] else {
        panic!("expected freedraw element");
    };
    assert_eq!(el.stroke_color, "#000000");
    // clamp(2.0 * 0.6 * 0.5, 1, 16) = 1
    assert_eq!(el.stroke_width, 1.0);
    assert_eq!(el.points, vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]);
    assert_eq!((el.width, el.height), (10.0, 10.0));
}

#[test]
fn eraser_only_page_converts_to_background_only() {
    let data = fixed_page(
        5,
        &[vec![
            TestStroke::new(6, 0, 2.0).with_xy(&[(0.0, 0.0), (1.0, 1.0)]),
            TestStroke::new(8, 0, 2.0).with_xy(&[(2.0, 2.0), (3.0, 3.0)]),
        ]],
    );
    let page = from_lines_slice(&data).unwrap();

    let background = BackgroundImage {
        bytes: vec![1, 2, 3],
        mime_type: "image/png".to_string(),
        width: 100.0,
        height: 200.0,
        created_ms: 42,
    };

    let doc = to_excalidraw(
        &page,
        Some(&background),
        &ConvertOptions::default(),
        &mut SequentialIdSource::new(),
    );

    assert_eq!(doc.elements.len(), 1);
    assert!(matches!(&doc.elements[0], Element::Image(_)));
    assert_eq!(doc.files.len(), 1);
}

#[test]
fn document_shape_matches_the_compatibility_contract() {
    let data = fixed_page(
        5,
        &[vec![TestStroke::new(4, 6, 2.0).with_xy(&[(0.0, 0.0), (5.0, 5.0)])]],
    );
    let page = from_lines_slice(&data).unwrap();
    let doc = to_excalidraw(
        &page,
        None,
        &ConvertOptions::default(),
        &mut SequentialIdSource::new(),
    );

    let json = doc.to_json_string().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["type"], "excalidraw");
    assert_eq!(value["version"], 2);
    assert!(value["source"].as_str().unwrap().starts_with("rmdraw"));
    assert_eq!(value["appState"]["viewBackgroundColor"], "#ffffff");
    assert_eq!(value["appState"]["currentItemFontFamily"], 1);

    let el = &value["elements"][0];
    assert_eq!(el["type"], "freedraw");
    assert_eq!(el["fillStyle"], "solid");
    assert_eq!(el["strokeStyle"], "solid");
    assert_eq!(el["frameId"], serde_json::Value::Null);
    assert_eq!(el["boundElements"], serde_json::Value::Null);
    assert_eq!(el["roundness"], serde_json::Value::Null);
    assert_eq!(el["lastCommittedPoint"], serde_json::Value::Null);
    assert_eq!(el["locked"], false);
    assert_eq!(el["isDeleted"], false);
    assert_eq!(el["strokeColor"], "#0062cc");
    assert!(el["groupIds"].is_array());
    assert!(el["pressures"].is_array());
}

#[test]
fn image_element_sentinels() {
    let page = from_lines_slice(&fixed_page(5, &[vec![]])).unwrap();
    let background = BackgroundImage {
        bytes: b"not a real png".to_vec(),
        mime_type: "image/png".to_string(),
        width: 1404.0,
        height: 1872.0,
        created_ms: 1_700_000_000_000,
    };

    let doc = to_excalidraw(
        &page,
        Some(&background),
        &ConvertOptions::default(),
        &mut SequentialIdSource::new(),
    );
    let value: serde_json::Value =
        serde_json::from_str(&doc.to_json_string().unwrap()).unwrap();

    let el = &value["elements"][0];
    assert_eq!(el["type"], "image");
    assert_eq!(el["status"], "saved");
    assert_eq!(el["scale"], serde_json::json!([1.0, 1.0]));
    assert_eq!(el["locked"], true);

    let file_id = el["fileId"].as_str().unwrap();
    let entry = &value["files"][file_id];
    assert_eq!(entry["mimeType"], "image/png");
    assert_eq!(entry["id"], file_id);
    assert_eq!(entry["created"], 1_700_000_000_000u64);
    assert!(entry["dataURL"]
        .as_str()
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[test]
fn conversion_is_deterministic_with_a_fixed_id_source() {
    let data = fixed_page(
        5,
        &[
            vec![TestStroke::new(4, 0, 2.0).with_xy(&[(0.0, 0.0), (3.0, 4.0)])],
            vec![TestStroke::new(3, 7, 3.0).with_xy(&[(1.0, 1.0), (2.0, 2.0)])],
        ],
    );
    let page = from_lines_slice(&data).unwrap();

    let first = to_excalidraw(
        &page,
        None,
        &ConvertOptions::default(),
        &mut SequentialIdSource::new(),
    );
    let second = to_excalidraw(
        &page,
        None,
        &ConvertOptions::default(),
        &mut SequentialIdSource::new(),
    );

    assert_eq!(
        first.to_json_string().unwrap(),
        second.to_json_string().unwrap()
    );
}

#[test]
fn wide_strokes_hit_the_clamp_ceiling() {
    let data = fixed_page(
        5,
        &[vec![TestStroke::new(5, 3, 100.0).with_xy(&[(0.0, 0.0), (1.0, 0.0)])]],
    );
    let page = from_lines_slice(&data).unwrap();
    let doc = to_excalidraw(
        &page,
        None,
        &ConvertOptions {
            stroke_width_scale: 2.0,
            ..Default::default()
        },
        &mut SequentialIdSource::new(),
    );

    let Element::Freedraw(el) = &doc.elements[0] else {
        panic!("expected freedraw element");
    };
    assert_eq!(el.stroke_width, 16.0);
    // Highlighter style carries through.
    assert_eq!(el.opacity, 40);
    assert_eq!(el.stroke_color, "#ffd700");
}
