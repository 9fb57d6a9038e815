//! End-to-end tests for the KITTI dataset writer and split export.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use kittibox::kitti::io_json::export_split_jsonl;
use kittibox::kitti::{codec, ImageIo, KittiWriter, RejectList, WriterConfig};
use kittibox::KittiboxError;

mod common;
use common::write_bmp;

/// Image I/O that moves encoded bytes around without decoding pixels.
///
/// Resampling is the collaborator's business in production; the stub passes
/// bytes through so the geometry and file layout can be checked end to end.
struct BlobIo;

impl ImageIo for BlobIo {
    type Image = Vec<u8>;

    fn open(&self, path: &Path) -> Result<Self::Image, KittiboxError> {
        Ok(fs::read(path)?)
    }

    fn resize(&self, image: Self::Image, _size: (u32, u32)) -> Self::Image {
        image
    }

    fn save(&self, image: &Self::Image, path: &Path, _format: &str) -> Result<(), KittiboxError> {
        fs::write(path, image)?;
        Ok(())
    }
}

fn split_writer(
    split: &Path,
    limits: &[(&str, usize)],
    strict: bool,
) -> KittiWriter<BlobIo, RejectList> {
    let config = WriterConfig {
        images_dir: split.join("images"),
        labels_dir: split.join("labels"),
        limits: limits
            .iter()
            .map(|(name, limit)| (name.to_string(), *limit))
            .collect::<BTreeMap<_, _>>(),
        target_size: None,
        strict,
    };
    KittiWriter::create(config, BlobIo, RejectList::default()).expect("create writer")
}

#[test]
fn lenient_writer_roundtrips_through_the_codec() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("raw/scene.bmp");
    write_bmp(&source, 100, 100);

    let split = temp.path().join("train");
    let mut writer = split_writer(&split, &[], false);

    let outcome = writer
        .write_example(
            &source,
            &["Car", "Pedestrian"],
            &[[10.0, 10.0, 50.0, 50.0], [90.0, 90.0, 150.0, 150.0]],
        )
        .expect("write example");

    assert!(outcome.written);
    assert_eq!(outcome.accepted, 1);
    assert_eq!(outcome.rejected, 1);
    assert_eq!(writer.count("Car"), 1);
    assert_eq!(writer.count("Pedestrian"), 0);

    // The out-of-bounds box reached the reject log with its image context.
    assert_eq!(writer.rejects().entries.len(), 1);
    assert_eq!(writer.rejects().entries[0].width, 100);

    let annotations =
        codec::read_label_file(&split.join("labels/scene.txt")).expect("read label file");
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].label, "Car");
    assert_eq!(annotations[0].bbox.coords(), [10.0, 10.0, 50.0, 50.0]);

    assert!(split.join("images/scene.jpg").is_file());
}

#[test]
fn strict_writer_discards_partially_invalid_examples() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("raw/scene.bmp");
    write_bmp(&source, 100, 100);

    let split = temp.path().join("train");
    let mut writer = split_writer(&split, &[], true);

    let outcome = writer
        .write_example(
            &source,
            &["Car", "Car"],
            &[[10.0, 10.0, 50.0, 50.0], [90.0, 90.0, 150.0, 150.0]],
        )
        .expect("write example");

    assert!(!outcome.written);
    assert_eq!(writer.count("Car"), 0);
    assert!(!split.join("images/scene.jpg").exists());
    assert!(!split.join("labels/scene.txt").exists());
}

#[test]
fn category_limits_span_examples() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let first = temp.path().join("raw/first.bmp");
    let second = temp.path().join("raw/second.bmp");
    write_bmp(&first, 50, 50);
    write_bmp(&second, 50, 50);

    let split = temp.path().join("train");
    let mut writer = split_writer(&split, &[("Car", 1)], false);

    writer
        .write_example(&first, &["Car"], &[[5.0, 5.0, 20.0, 20.0]])
        .expect("first example");
    let outcome = writer
        .write_example(&second, &["Car"], &[[5.0, 5.0, 20.0, 20.0]])
        .expect("second example");

    assert_eq!(outcome.accepted, 0);
    assert_eq!(writer.count("Car"), 1);
}

#[test]
fn written_split_exports_as_json_lines() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let source = temp.path().join("raw/scene.bmp");
    write_bmp(&source, 100, 80);

    let split = temp.path().join("train");
    let mut writer = split_writer(&split, &[], false);
    writer
        .write_example(&source, &["Car"], &[[10.0, 10.0, 50.0, 50.0]])
        .expect("write example");

    let output = temp.path().join("export/train.json");
    let written = export_split_jsonl(&split, &output).expect("export split");

    assert_eq!(written, 1);
    let content = fs::read_to_string(&output).expect("read export");
    let row: serde_json::Value = serde_json::from_str(content.trim()).expect("parse json line");

    assert_eq!(row["filename"], "scene.jpg");
    assert_eq!(row["width"], 100);
    assert_eq!(row["height"], 80);
    assert_eq!(row["annotations"][0]["class"], "Car");
    assert_eq!(row["annotations"][0]["bbox"][2], 50.0);
}
