//! Label-tree inspection.
//!
//! Walks a directory of KITTI label files and summarizes what is in them:
//! per-category counts, degenerate boxes and unparseable lines. Bad lines
//! are reported, not fatal, so a partially broken tree still produces a
//! useful overview.

mod report;

pub use report::{InspectReport, ParseFailure};

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::KittiboxError;
use crate::kitti::codec;

const LABEL_EXTENSION: &str = "txt";

/// Inspects every label file under `labels_dir` (recursively).
pub fn inspect_labels(labels_dir: &Path) -> Result<InspectReport, KittiboxError> {
    if !labels_dir.is_dir() {
        return Err(KittiboxError::LabelTreeInvalid {
            path: labels_dir.to_path_buf(),
            message: "expected a directory of label files".to_string(),
        });
    }

    let mut label_files = collect_label_files(labels_dir)?;
    label_files.sort();

    let mut report = InspectReport {
        files: label_files.len(),
        ..Default::default()
    };

    for path in label_files {
        let content = fs::read_to_string(&path)?;

        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match codec::parse_annotation(line, &path, index + 1) {
                Ok(annotation) => {
                    report.annotations += 1;
                    *report
                        .categories
                        .entry(annotation.label.clone())
                        .or_insert(0) += 1;
                    if !annotation.bbox.is_valid() {
                        report.degenerate += 1;
                    }
                    if annotation.score.is_some() {
                        report.scored += 1;
                    }
                }
                Err(error) => {
                    let message = match error {
                        KittiboxError::LabelParse { message, .. } => message,
                        other => other.to_string(),
                    };
                    report.parse_failures.push(ParseFailure {
                        path: path.to_string_lossy().replace('\\', "/"),
                        line: index + 1,
                        message,
                    });
                }
            }
        }
    }

    Ok(report)
}

fn collect_label_files(root: &Path) -> Result<Vec<PathBuf>, KittiboxError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| KittiboxError::LabelTreeInvalid {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        let is_label = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case(LABEL_EXTENSION))
            .unwrap_or(false);

        if entry.file_type().is_file() && is_label {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}
