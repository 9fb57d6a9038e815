#![allow(dead_code)]

use kittibox::geom::{BoundingBox, BoxMode, Space};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence, TestCaseError};

pub const EPS_CONVERT: f64 = 1e-9;
pub const EPS_RESIZE: f64 = 1e-6;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_mode() -> impl Strategy<Value = BoxMode> {
    prop_oneof![
        Just(BoxMode::Cxcywh),
        Just(BoxMode::Xyxy),
        Just(BoxMode::Xxyy),
        Just(BoxMode::Xywh),
    ]
}

pub fn arb_space() -> impl Strategy<Value = Space> {
    prop_oneof![Just(Space::Absolute), Just(Space::Relative)]
}

/// A well-formed box: positive extent, coordinates in a sane pixel range.
pub fn arb_valid_box() -> impl Strategy<Value = BoundingBox> {
    (
        0.0..1000.0f64,
        0.0..1000.0f64,
        0.01..500.0f64,
        0.01..500.0f64,
        arb_mode(),
    )
        .prop_map(|(xmin, ymin, w, h, mode)| {
            BoundingBox::new(
                [xmin, ymin, xmin + w, ymin + h],
                BoxMode::Xyxy,
                Space::Absolute,
            )
            .to(mode)
        })
}

/// A non-degenerate image size.
pub fn arb_size() -> impl Strategy<Value = (u32, u32)> {
    (2u32..4000, 2u32..4000)
}

/// Coordinate-wise approximate equality; mode and space must match exactly.
pub fn assert_boxes_close(
    a: &BoundingBox,
    b: &BoundingBox,
    eps: f64,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(a.mode(), b.mode());
    prop_assert_eq!(a.space(), b.space());

    for (left, right) in a.coords().iter().zip(b.coords()) {
        prop_assert!(
            (left - right).abs() <= eps * left.abs().max(right.abs()).max(1.0),
            "coords differ: {:?} vs {:?}",
            a.coords(),
            b.coords()
        );
    }

    Ok(())
}
