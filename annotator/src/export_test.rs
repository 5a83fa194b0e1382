#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::AnnotationUpdate;

// =============================================================
// Helpers
// =============================================================

const BOARD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 800 600"><rect width="800" height="600"/></svg>"#;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn add(store: &mut AnnotationStore, x: f64, y: f64) -> Uuid {
    store.create(pt(x, y)).id
}

fn with_area(store: &mut AnnotationStore, id: Uuid, rect: Rect) {
    assert!(store.update(&id, AnnotationUpdate::ClickArea(Some(rect))));
}

fn layer<'a>(svg: &'a str, id: &str) -> Option<&'a str> {
    let start = svg.find(&format!("<g id=\"{id}\""))?;
    let end = svg[start..].find("</g>").map_or(svg.len(), |e| start + e + 4);
    Some(&svg[start..end])
}

// =============================================================
// File names
// =============================================================

#[test]
fn file_names_use_base_or_fallback() {
    assert_eq!(ExportFormat::VisibleSvg.file_name(Some("rock5t")), "rock5t-v.svg");
    assert_eq!(ExportFormat::InvisibleSvg.file_name(Some("rock5t")), "rock5t-iv.svg");
    assert_eq!(ExportFormat::Interfaces.file_name(Some("a7a")), "a7a-sbc-interfaces.json");
    assert_eq!(ExportFormat::Annotations.file_name(Some("a7a")), "a7a-annotations.json");
    assert_eq!(ExportFormat::VisibleSvg.file_name(None), "annotated-v.svg");
    assert_eq!(ExportFormat::InvisibleSvg.file_name(Some("")), "invisible-iv.svg");
    assert_eq!(ExportFormat::Interfaces.file_name(None), "sbc-interfaces.json");
    assert_eq!(ExportFormat::Annotations.file_name(None), "annotations.json");
}

#[test]
fn base_name_strips_last_extension() {
    assert_eq!(base_name("rock5t.svg"), "rock5t");
    assert_eq!(base_name("rock5b-plus.back.svg"), "rock5b-plus.back");
    assert_eq!(base_name("board"), "board");
    assert_eq!(base_name(".hidden"), ".hidden");
}

#[test]
fn mime_types() {
    assert_eq!(ExportFormat::VisibleSvg.mime(), "image/svg+xml");
    assert_eq!(ExportFormat::Interfaces.mime(), "application/json");
}

// =============================================================
// Visible SVG
// =============================================================

#[test]
fn visible_svg_keeps_upload_and_adds_layers() {
    let mut store = AnnotationStore::new();
    let id = add(&mut store, 100.0, 50.0);
    with_area(&mut store, id, Rect::new(80.0, 30.0, 40.0, 40.0));
    let out = visible_svg(BOARD, &store, ExportOptions::default()).unwrap();

    assert!(out.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 800 600"><rect width="800" height="600"/>"#));
    assert!(out.ends_with("</svg>"));
    let numbers = layer(&out, NUMBER_LAYER_ID).unwrap();
    assert!(numbers.contains(r#"<circle cx="100" cy="50" r="15""#));
    assert!(numbers.contains(r#"<text x="100" y="55" text-anchor="middle" fill="white">1</text>"#));
    let clicks = layer(&out, CLICK_LAYER_ID).unwrap();
    assert!(clicks.contains(r#"<rect x="80" y="30" width="40" height="40" fill="white" data-id="1" title="Interface 1"/>"#));
}

#[test]
fn visible_svg_skips_annotations_without_area_in_click_layer() {
    let mut store = AnnotationStore::new();
    add(&mut store, 10.0, 10.0);
    let id = add(&mut store, 200.0, 200.0);
    with_area(&mut store, id, Rect::new(190.0, 190.0, 20.0, 20.0));
    let out = visible_svg(BOARD, &store, ExportOptions::default()).unwrap();
    let clicks = layer(&out, CLICK_LAYER_ID).unwrap();
    assert_eq!(clicks.matches("<rect").count(), 1);
    assert!(clicks.contains("data-id=\"2\""));
    assert_eq!(layer(&out, NUMBER_LAYER_ID).unwrap().matches("<circle").count(), 2);
}

#[test]
fn visible_svg_respects_options() {
    let mut store = AnnotationStore::new();
    add(&mut store, 10.0, 10.0);
    let numbers_only = ExportOptions { include_numbers: true, include_click_layer: false };
    let out = visible_svg(BOARD, &store, numbers_only).unwrap();
    assert!(layer(&out, NUMBER_LAYER_ID).is_some());
    assert!(!out.contains(CLICK_LAYER_ID));

    let none = ExportOptions { include_numbers: false, include_click_layer: false };
    assert_eq!(visible_svg(BOARD, &store, none).unwrap(), BOARD);
}

#[test]
fn visible_svg_orders_by_number() {
    let mut store = AnnotationStore::new();
    store.set_auto_increment(false);
    store.set_next_number(2).unwrap();
    add(&mut store, 20.0, 20.0);
    store.set_next_number(1).unwrap();
    add(&mut store, 10.0, 10.0);
    let out = visible_svg(BOARD, &store, ExportOptions::default()).unwrap();
    let one = out.find(">1</text>").unwrap();
    let two = out.find(">2</text>").unwrap();
    assert!(one < two);
}

#[test]
fn visible_svg_escapes_names() {
    let mut store = AnnotationStore::new();
    let id = add(&mut store, 10.0, 10.0);
    with_area(&mut store, id, Rect::new(0.0, 0.0, 20.0, 20.0));
    store.update(&id, AnnotationUpdate::Name("USB <3> & \"more\"".to_owned()));
    let out = visible_svg(BOARD, &store, ExportOptions::default()).unwrap();
    assert!(out.contains(r#"title="USB &lt;3&gt; &amp; &quot;more&quot;""#));
}

#[test]
fn visible_svg_rejects_non_svg() {
    let store = AnnotationStore::new();
    let err = visible_svg("<html/>", &store, ExportOptions::default()).unwrap_err();
    assert!(matches!(err, ExportError::Svg(SvgError::NotSvg)));
}

// =============================================================
// Invisible SVG
// =============================================================

#[test]
fn invisible_svg_synthesizes_default_square() {
    let mut store = AnnotationStore::new();
    add(&mut store, 100.0, 100.0);
    let out = invisible_svg(BOARD, &store).unwrap();
    let clicks = layer(&out, CLICK_LAYER_ID).unwrap();
    assert_eq!(clicks.matches("<rect").count(), 1);
    assert!(clicks.contains(r#"<rect x="85" y="85" width="30" height="30" fill="white" data-id="1""#));
    assert!(!out.contains(NUMBER_LAYER_ID));
    assert!(!out.contains("<text"));
}

#[test]
fn invisible_svg_one_rect_per_annotation() {
    let mut store = AnnotationStore::new();
    let a = add(&mut store, 10.0, 10.0);
    add(&mut store, 300.0, 300.0);
    with_area(&mut store, a, Rect::new(0.0, 0.0, 50.0, 25.0));
    let out = invisible_svg(BOARD, &store).unwrap();
    let clicks = layer(&out, CLICK_LAYER_ID).unwrap();
    assert_eq!(clicks.matches("<rect").count(), 2);
    assert!(clicks.contains(r#"x="0" y="0" width="50" height="25""#));
    assert!(clicks.contains(r#"x="285" y="285" width="30" height="30""#));
    assert!(clicks.contains(r#"opacity="0""#));
}

#[test]
fn invisible_svg_requires_annotations() {
    let store = AnnotationStore::new();
    assert!(matches!(invisible_svg(BOARD, &store), Err(ExportError::NoAnnotations)));
}

// =============================================================
// Interfaces JSON
// =============================================================

#[test]
fn interfaces_keyed_by_number_not_creation_order() {
    let mut store = AnnotationStore::new();
    store.set_auto_increment(false);
    store.set_next_number(2).unwrap();
    add(&mut store, 0.0, 0.0);
    store.set_next_number(1).unwrap();
    add(&mut store, 0.0, 0.0);
    let file = interfaces(&store).unwrap();
    let keys: Vec<u32> = file.interfaces.keys().copied().collect();
    assert_eq!(keys, vec![1, 2]);

    let json: serde_json::Value = serde_json::from_str(&file.to_json().unwrap()).unwrap();
    let object = json["interfaces"].as_object().unwrap();
    assert!(object.contains_key("1"));
    assert!(object.contains_key("2"));
}

#[test]
fn interfaces_defaults_for_blank_fields() {
    let mut store = AnnotationStore::new();
    let id = add(&mut store, 0.0, 0.0);
    store.update(&id, AnnotationUpdate::Name(String::new()));
    let file = interfaces(&store).unwrap();
    let entry = &file.interfaces[&1];
    assert_eq!(entry.name, "Interface 1");
    assert_eq!(entry.description, "Description of interface 1");
    assert_eq!(entry.details, "Details of interface 1\n\nClick area: not defined");
}

#[test]
fn whitespace_name_falls_back_in_both_outputs() {
    let mut store = AnnotationStore::new();
    let id = add(&mut store, 0.0, 0.0);
    with_area(&mut store, id, Rect::new(0.0, 0.0, 20.0, 20.0));
    store.update(&id, AnnotationUpdate::Name("  ".to_owned()));

    assert_eq!(interfaces(&store).unwrap().interfaces[&1].name, "Interface 1");
    let out = visible_svg(BOARD, &store, ExportOptions::default()).unwrap();
    assert!(layer(&out, "click-layer").unwrap().contains(r#"title="Interface 1""#));
}

#[test]
fn interfaces_details_include_rounded_area() {
    let mut store = AnnotationStore::new();
    let id = add(&mut store, 0.0, 0.0);
    store.update(&id, AnnotationUpdate::Description("Gigabit Ethernet".to_owned()));
    with_area(&mut store, id, Rect::new(10.4, 20.5, 30.49, 40.6));
    let file = interfaces(&store).unwrap();
    assert_eq!(
        file.interfaces[&1].details,
        "Gigabit Ethernet\n\nClick area:\n- Position: (10, 21)\n- Size: 30\u{d7}41"
    );
    assert_eq!(file.interfaces[&1].description, "Gigabit Ethernet");
}

#[test]
fn interfaces_pass_through_metadata() {
    let mut store = AnnotationStore::new();
    let id = add(&mut store, 0.0, 0.0);
    store.update(&id, AnnotationUpdate::Voltage(Some("3.3V".to_owned())));
    store.update(&id, AnnotationUpdate::Kind(Some(String::new())));
    let json = serde_json::to_value(&interfaces(&store).unwrap()).unwrap();
    let entry = &json["interfaces"]["1"];
    assert_eq!(entry["voltage"], "3.3V");
    assert!(entry.get("type").is_none());
    assert!(entry.get("compatibility").is_none());
}

#[test]
fn interfaces_duplicate_numbers_keep_later() {
    let mut store = AnnotationStore::new();
    store.set_auto_increment(false);
    let first = add(&mut store, 0.0, 0.0);
    let second = add(&mut store, 0.0, 0.0);
    store.update(&first, AnnotationUpdate::Name("first".to_owned()));
    store.update(&second, AnnotationUpdate::Name("second".to_owned()));
    let file = interfaces(&store).unwrap();
    assert_eq!(file.interfaces.len(), 1);
    assert_eq!(file.interfaces[&1].name, "second");
}

#[test]
fn interfaces_require_annotations() {
    assert!(matches!(interfaces(&AnnotationStore::new()), Err(ExportError::NoAnnotations)));
}

// =============================================================
// Annotations JSON / import
// =============================================================

#[test]
fn annotations_json_reimports() {
    let mut store = AnnotationStore::new();
    let a = add(&mut store, 12.0, 34.0);
    add(&mut store, 56.0, 78.0);
    with_area(&mut store, a, Rect::new(0.0, 0.0, 20.0, 20.0));
    store.update(&a, AnnotationUpdate::Compatibility(Some("PCIe 3.0".to_owned())));

    let json = annotations_json(&store).unwrap();
    let imported = import_annotations(&json).unwrap();
    let original: Vec<Annotation> = store.iter().cloned().collect();
    assert_eq!(imported, original);
}

#[test]
fn annotations_json_shape() {
    let mut store = AnnotationStore::new();
    add(&mut store, 1.0, 2.0);
    let json: serde_json::Value = serde_json::from_str(&annotations_json(&store).unwrap()).unwrap();
    let first = &json["annotations"][0];
    assert_eq!(first["number"], 1);
    assert_eq!(first["position"], serde_json::json!({ "x": 1.0, "y": 2.0 }));
    assert!(first["clickArea"].is_null());
    assert!(first["id"].is_string());
}

#[test]
fn annotations_json_allowed_when_empty() {
    let json = annotations_json(&AnnotationStore::new()).unwrap();
    assert!(import_annotations(&json).unwrap().is_empty());
}

#[test]
fn import_accepts_numeric_ids_with_fresh_uuid() {
    let text = r#"{"annotations": [
        {"id": 1712345678901, "number": 3, "name": "", "description": "d",
         "position": {"x": 5, "y": 6}, "clickArea": null}
    ]}"#;
    let imported = import_annotations(text).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].number, 3);
    assert_eq!(imported[0].name, "Interface 3");
    assert_eq!(imported[0].description, "d");
}

#[test]
fn import_rejects_small_click_area() {
    let text = r#"{"annotations": [
        {"number": 1, "position": {"x": 0, "y": 0}},
        {"number": 2, "position": {"x": 0, "y": 0}, "clickArea": {"x": 0, "y": 0, "width": 9, "height": 50}}
    ]}"#;
    let err = import_annotations(text).unwrap_err();
    assert!(matches!(err, ImportError::ClickAreaTooSmall { index: 1, number: 2 }));
}

#[test]
fn import_rejects_zero_number() {
    let text = r#"{"annotations": [{"number": 0, "position": {"x": 0, "y": 0}}]}"#;
    assert!(matches!(import_annotations(text), Err(ImportError::InvalidNumber { index: 0 })));
}

#[test]
fn import_rejects_number_above_limit() {
    let text = r#"{"annotations": [
        {"number": 9999, "position": {"x": 0, "y": 0}},
        {"number": 4294967295, "position": {"x": 0, "y": 0}}
    ]}"#;
    let err = import_annotations(text).unwrap_err();
    assert!(matches!(err, ImportError::NumberTooLarge { index: 1, number: u32::MAX }), "{err}");
}

#[test]
fn import_rejects_duplicate_ids() {
    let id = Uuid::now_v7();
    let text = format!(
        r#"{{"annotations": [
            {{"id": "{id}", "number": 1, "position": {{"x": 0, "y": 0}}}},
            {{"id": "{id}", "number": 2, "position": {{"x": 0, "y": 0}}}}
        ]}}"#
    );
    assert!(matches!(import_annotations(&text), Err(ImportError::DuplicateId(dup)) if dup == id));
}

#[test]
fn import_rejects_malformed_json() {
    assert!(matches!(import_annotations("{"), Err(ImportError::Json(_))));
    assert!(matches!(import_annotations(r#"{"annotations": [{"number": 1}]}"#), Err(ImportError::Json(_))));
}

// =============================================================
// export()
// =============================================================

#[test]
fn export_checks_prerequisites() {
    let mut store = AnnotationStore::new();
    let opts = ExportOptions::default();
    assert!(matches!(
        export(ExportFormat::VisibleSvg, None, None, &store, opts),
        Err(ExportError::NoSvgLoaded)
    ));
    assert!(matches!(
        export(ExportFormat::InvisibleSvg, Some(BOARD), None, &store, opts),
        Err(ExportError::NoAnnotations)
    ));
    assert!(matches!(export(ExportFormat::Interfaces, None, None, &store, opts), Err(ExportError::NoAnnotations)));
    assert!(export(ExportFormat::Annotations, None, None, &store, opts).is_ok());

    add(&mut store, 1.0, 1.0);
    let file = export(ExportFormat::InvisibleSvg, Some(BOARD), Some("rock5t"), &store, opts).unwrap();
    assert_eq!(file.file_name, "rock5t-iv.svg");
    assert_eq!(file.mime, "image/svg+xml");
    assert!(file.content.contains(CLICK_LAYER_ID));
}
