//! JSON-lines export of a converted KITTI split.
//!
//! A split directory holds sibling `images/` and `labels/` trees as
//! produced by the dataset writer. Export walks the images, pairs each with
//! its label file and emits one compact JSON object per annotated image,
//! newline-delimited.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::codec;
use super::writer::read_image_dimensions;
use crate::error::KittiboxError;
use crate::geom::BoxMode;

/// One exported image with its annotations.
#[derive(Clone, Debug, Serialize)]
pub struct ImageRow {
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub annotations: Vec<AnnotationRow>,
}

/// One exported annotation: category plus absolute XYXY box.
#[derive(Clone, Debug, Serialize)]
pub struct AnnotationRow {
    #[serde(rename = "class")]
    pub label: String,
    pub bbox: [f64; 4],
}

/// Collects export rows for a split, sorted by image filename.
///
/// Images without any annotation are omitted. A missing label file is an
/// error: the writer always creates label files next to the images it
/// saves, so an unpaired image means a broken split.
pub fn collect_split_rows(split_dir: &Path) -> Result<Vec<ImageRow>, KittiboxError> {
    let images_dir = split_dir.join("images");
    let labels_dir = split_dir.join("labels");

    for dir in [&images_dir, &labels_dir] {
        if !dir.is_dir() {
            return Err(KittiboxError::LabelTreeInvalid {
                path: dir.clone(),
                message: "expected a split directory containing images/ and labels/".to_string(),
            });
        }
    }

    let mut image_paths: Vec<PathBuf> = fs::read_dir(&images_dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    image_paths.sort();

    let mut rows = Vec::new();

    for image_path in image_paths {
        let filename = image_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| KittiboxError::BadImagePath {
                path: image_path.clone(),
            })?
            .to_string();
        let stem = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| KittiboxError::BadImagePath {
                path: image_path.clone(),
            })?;

        let (width, height) = read_image_dimensions(&image_path)?;

        let label_path = labels_dir.join(format!("{stem}.txt"));
        let annotations: Vec<AnnotationRow> = codec::read_label_file(&label_path)?
            .into_iter()
            .map(|annotation| AnnotationRow {
                bbox: annotation.bbox.to(BoxMode::Xyxy).coords(),
                label: annotation.label,
            })
            .collect();

        if !annotations.is_empty() {
            rows.push(ImageRow {
                filename,
                width,
                height,
                annotations,
            });
        }
    }

    Ok(rows)
}

/// Exports a split as JSON lines, returning the number of rows written.
///
/// Nothing is created when the split has no annotated images.
pub fn export_split_jsonl(split_dir: &Path, output_path: &Path) -> Result<usize, KittiboxError> {
    let rows = collect_split_rows(split_dir)?;

    if rows.is_empty() {
        return Ok(0);
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::File::create(output_path)?;
    for row in &rows {
        let json = serde_json::to_string(row).map_err(|source| KittiboxError::JsonWrite {
            path: output_path.to_path_buf(),
            source,
        })?;
        writeln!(file, "{}", json)?;
    }

    Ok(rows.len())
}
