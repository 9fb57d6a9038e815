//! Property tests for the KITTI label line codec.

use std::path::Path;

use kittibox::geom::{BoundingBox, BoxMode, Space};
use kittibox::kitti::codec::{parse_annotation, serialize_annotation};
use kittibox::kitti::Annotation;
use proptest::prelude::*;

mod proptest_helpers;
use proptest_helpers::proptest_config;

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Car".to_string()),
        Just("Pedestrian".to_string()),
        Just("Cyclist".to_string()),
        Just("DontCare".to_string()),
        "[A-Za-z][A-Za-z0-9_-]{0,15}",
    ]
}

fn arb_annotation() -> impl Strategy<Value = Annotation> {
    (
        arb_label(),
        0.0..1.0f64,
        0i64..4,
        -3.15..3.15f64,
        proptest::array::uniform4(-1000.0..1000.0f64),
        proptest::array::uniform3(-100.0..100.0f64),
        proptest::array::uniform3(-100.0..100.0f64),
        -3.15..3.15f64,
        proptest::option::of(0.0..1.0f64),
    )
        .prop_map(
            |(label, truncated, occluded, alpha, bbox, dimensions, location, rotation_y, score)| {
                let mut annotation = Annotation::new(label)
                    .with_truncated(truncated)
                    .with_occluded(occluded)
                    .with_alpha(alpha)
                    .with_bbox(BoundingBox::new(bbox, BoxMode::Xyxy, Space::Absolute))
                    .with_dimensions(dimensions)
                    .with_location(location)
                    .with_rotation_y(rotation_y);
                annotation.score = score;
                annotation
            },
        )
}

proptest! {
    #![proptest_config(proptest_config())]

    // Display of f64 is shortest-roundtrip, so the full-precision codec
    // reproduces every field bit-exactly.
    #[test]
    fn serialize_parse_roundtrips_exactly(annotation in arb_annotation()) {
        let line = serialize_annotation(&annotation, false).expect("serialize");
        let parsed = parse_annotation(&line, Path::new("prop.txt"), 1).expect("parse");
        prop_assert_eq!(parsed, annotation);
    }

    #[test]
    fn truncated_mode_floors_only_the_two_scalars(annotation in arb_annotation()) {
        let line = serialize_annotation(&annotation, true).expect("serialize");
        let parsed = parse_annotation(&line, Path::new("prop.txt"), 1).expect("parse");

        prop_assert_eq!(parsed.truncated, annotation.truncated.floor());
        prop_assert_eq!(parsed.occluded, annotation.occluded);
        prop_assert_eq!(parsed.bbox, annotation.bbox);
        prop_assert_eq!(parsed.dimensions, annotation.dimensions);
        prop_assert_eq!(parsed.location, annotation.location);
        prop_assert_eq!(parsed.alpha, annotation.alpha);
        prop_assert_eq!(parsed.score, annotation.score);
    }

    #[test]
    fn parse_never_panics_on_arbitrary_lines(line in ".{0,200}") {
        let _ = parse_annotation(&line, Path::new("prop.txt"), 1);
    }

    #[test]
    fn column_count_gate_holds(n in 0usize..15) {
        let line = vec!["0"; n].join(" ");
        prop_assert!(parse_annotation(&line, Path::new("prop.txt"), 1).is_err());
    }
}
