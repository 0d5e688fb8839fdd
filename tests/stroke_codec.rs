use egui::Color32;
use ink_notes::brush::{Brush, BrushFamily, ColorLong};
use ink_notes::codec::{self, SerializedStockBrush, SerializedStroke};
use ink_notes::stroke::{Stroke, StrokeInput, StrokeInputBatch, ToolType};

fn sample_inputs() -> StrokeInputBatch {
    StrokeInputBatch::new(
        ToolType::Stylus,
        vec![
            StrokeInput::new(12.5, 40.0, 0.0).with_pressure(0.2).with_tilt(0.1),
            StrokeInput::new(13.0, 41.5, 8.0).with_pressure(0.6).with_orientation(2.5),
            StrokeInput {
                stroke_unit_length_cm: 0.0264,
                ..StrokeInput::new(-3.75, 1e6, 16.0)
            },
        ],
    )
    .unwrap()
}

fn stroke_with(family: BrushFamily) -> Stroke {
    let brush = Brush::new(family, ColorLong::from_argb(0xff33_66cc), 7.5, 0.05).unwrap();
    Stroke::new(brush, sample_inputs())
}

#[test]
fn test_round_trip_for_every_stock_family() {
    for family in BrushFamily::STOCK {
        let stroke = stroke_with(family.clone());
        let decoded = codec::decode_stroke(&codec::encode_stroke(&stroke).unwrap()).unwrap();

        assert_eq!(decoded.inputs(), stroke.inputs(), "inputs for {}", family.name());
        assert_eq!(decoded.brush().family(), &family);
        assert_eq!(decoded.brush().size(), 7.5);
        assert_eq!(decoded.brush().color(), stroke.brush().color());
        assert_eq!(decoded.brush().epsilon(), 0.05);
        assert_eq!(decoded, stroke);
    }
}

#[test]
fn test_color_survives_as_signed_long() {
    let brush = Brush::with_color32(BrushFamily::Highlighter, Color32::from_rgb(250, 10, 10), 25.0, 0.1).unwrap();
    assert!(brush.color().0 > i64::MAX as u64, "opaque sRGB colors set the sign bit");

    let stroke = Stroke::new(brush.clone(), sample_inputs());
    let json = codec::encode_stroke(&stroke).unwrap();
    let serialized: SerializedStroke = serde_json::from_str(&json).unwrap();
    assert!(serialized.brush.color < 0);

    let decoded = codec::decode_stroke(&json).unwrap();
    assert_eq!(decoded.brush().color32(), Color32::from_rgb(250, 10, 10));
}

#[test]
fn test_fallback_is_asymmetric() {
    // Families without a stock tag are written as the current marker...
    for family in [BrushFamily::MarkerV1, BrushFamily::Custom("calligraphy".to_string())] {
        let json = codec::encode_stroke(&stroke_with(family)).unwrap();
        let serialized: SerializedStroke = serde_json::from_str(&json).unwrap();
        assert_eq!(serialized.brush.stock_brush, Some(SerializedStockBrush::MarkerLatest));
        assert_eq!(codec::decode_stroke(&json).unwrap().brush().family(), &BrushFamily::Marker);
    }

    // ...while a missing or unknown tag is read as the legacy marker.
    let json = codec::encode_stroke(&stroke_with(BrushFamily::Marker)).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();

    value["brush"]["stockBrush"] = serde_json::json!("FOUNTAIN_PEN_LATEST");
    let unknown = codec::decode_stroke(&value.to_string()).unwrap();
    assert_eq!(unknown.brush().family(), &BrushFamily::MarkerV1);

    value["brush"].as_object_mut().unwrap().remove("stockBrush");
    let missing = codec::decode_stroke(&value.to_string()).unwrap();
    assert_eq!(missing.brush().family(), &BrushFamily::MarkerV1);
}

#[test]
fn test_outer_format_shape() {
    let json = codec::encode_stroke(&stroke_with(BrushFamily::DashedLine)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let bytes = value["inputs"].as_array().unwrap();
    assert_eq!(bytes.len(), 12 + 3 * 28);
    assert!(bytes.iter().all(|b| (-128..=127).contains(&b.as_i64().unwrap())));
    assert_eq!(value["brush"]["stockBrush"], "DASHED_LINE_LATEST");
    assert_eq!(value["brush"]["size"], 7.5);
}

#[test]
fn test_drawing_round_trip_keeps_order() {
    let strokes: Vec<_> = BrushFamily::STOCK
        .into_iter()
        .map(|family| std::sync::Arc::new(stroke_with(family)))
        .collect();
    let data = codec::encode_strokes(&strokes).unwrap();

    let encoded: Vec<String> = serde_json::from_str(&data).unwrap();
    assert_eq!(encoded.len(), 4);

    let decoded = codec::decode_strokes(&data).unwrap();
    let expected: Vec<Stroke> = strokes.iter().map(|stroke| (**stroke).clone()).collect();
    assert_eq!(decoded, expected);
}

#[test]
fn test_corrupt_strokes_are_skipped() {
    let good = codec::encode_stroke(&stroke_with(BrushFamily::PressurePen)).unwrap();

    let mut truncated: serde_json::Value = serde_json::from_str(&good).unwrap();
    truncated["inputs"].as_array_mut().unwrap().truncate(20);

    let mut bad_brush: serde_json::Value = serde_json::from_str(&good).unwrap();
    bad_brush["brush"]["size"] = serde_json::json!(-1.0);

    let data = serde_json::to_string(&vec![
        "{ not json".to_string(),
        good.clone(),
        truncated.to_string(),
        bad_brush.to_string(),
        good,
    ])
    .unwrap();

    let decoded = codec::decode_strokes(&data).unwrap();
    assert_eq!(decoded.len(), 2);
    assert!(decoded.iter().all(|stroke| stroke.brush().family() == &BrushFamily::PressurePen));
}

#[test]
fn test_malformed_outer_array_is_an_error() {
    assert!(codec::decode_strokes("{}").is_err());
    assert!(codec::decode_strokes("[1, 2]").is_err());
    assert!(codec::decode_strokes("[]").unwrap().is_empty());
}
