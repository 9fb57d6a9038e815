//! The fixed-column KITTI label line codec.
//!
//! One text line per object: `type truncated occluded alpha bbox[4]
//! dimensions[3] location[3] rotation_y [score]`. The writer emits single
//! spaces; the reader accepts any run of spaces and tabs. A line needs at
//! least 15 columns to parse; a 16th column, when present, is the score.

use std::fs;
use std::io::Write;
use std::path::Path;

use super::annotation::Annotation;
use crate::error::KittiboxError;
use crate::geom::{BoundingBox, BoxMode, Space};

/// Minimum number of columns in a well-formed label line.
pub const MIN_COLUMNS: usize = 15;

/// Serializes one annotation to a label line (no trailing newline).
///
/// With `truncate_scalars`, `truncated` and `occluded` are written as
/// floored integers (the convention of KITTI ground-truth files); every
/// other numeric field keeps full precision either way.
pub fn serialize_annotation(
    annotation: &Annotation,
    truncate_scalars: bool,
) -> Result<String, KittiboxError> {
    if annotation.label.is_empty() {
        return Err(KittiboxError::EmptyLabel);
    }

    let mut columns: Vec<String> = Vec::with_capacity(MIN_COLUMNS + 1);
    columns.push(annotation.label.clone());

    if truncate_scalars {
        columns.push(format!("{}", annotation.truncated.floor() as i64));
    } else {
        columns.push(format!("{}", annotation.truncated));
    }
    columns.push(format!("{}", annotation.occluded));
    columns.push(format!("{}", annotation.alpha));

    for value in annotation.bbox.to(BoxMode::Xyxy).coords() {
        columns.push(format!("{}", value));
    }
    for value in annotation.dimensions {
        columns.push(format!("{}", value));
    }
    for value in annotation.location {
        columns.push(format!("{}", value));
    }
    columns.push(format!("{}", annotation.rotation_y));

    if let Some(score) = annotation.score {
        columns.push(format!("{}", score));
    }

    Ok(columns.join(" "))
}

/// Parses one label line.
///
/// Columns are consumed strictly left-to-right in the fixed order; columns
/// past the 16th are ignored. `path` and `line_no` only feed the error
/// context.
pub fn parse_annotation(
    line: &str,
    path: &Path,
    line_no: usize,
) -> Result<Annotation, KittiboxError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.len() < MIN_COLUMNS {
        return Err(KittiboxError::LabelParse {
            path: path.to_path_buf(),
            line: line_no,
            message: format!(
                "expected at least {} columns, found {}",
                MIN_COLUMNS,
                tokens.len()
            ),
        });
    }

    let f64_at = |index: usize, field: &str| parse_f64(tokens[index], field, path, line_no);

    let label = tokens[0].to_string();
    let truncated = f64_at(1, "truncated")?;
    let occluded = parse_i64(tokens[2], "occluded", path, line_no)?;
    let alpha = f64_at(3, "alpha")?;

    let bbox = BoundingBox::new(
        [
            f64_at(4, "bbox xmin")?,
            f64_at(5, "bbox ymin")?,
            f64_at(6, "bbox xmax")?,
            f64_at(7, "bbox ymax")?,
        ],
        BoxMode::Xyxy,
        Space::Absolute,
    );

    let dimensions = [
        f64_at(8, "dimensions height")?,
        f64_at(9, "dimensions width")?,
        f64_at(10, "dimensions length")?,
    ];
    let location = [
        f64_at(11, "location x")?,
        f64_at(12, "location y")?,
        f64_at(13, "location z")?,
    ];
    let rotation_y = f64_at(14, "rotation_y")?;

    let score = if tokens.len() > MIN_COLUMNS {
        Some(f64_at(MIN_COLUMNS, "score")?)
    } else {
        None
    };

    let mut annotation = Annotation::new(label)
        .with_truncated(truncated)
        .with_occluded(occluded)
        .with_alpha(alpha)
        .with_bbox(bbox)
        .with_dimensions(dimensions)
        .with_location(location)
        .with_rotation_y(rotation_y);
    annotation.score = score;

    Ok(annotation)
}

/// Reads all annotations from a label file, skipping blank lines.
pub fn read_label_file(path: &Path) -> Result<Vec<Annotation>, KittiboxError> {
    let content = fs::read_to_string(path)?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| parse_annotation(line, path, index + 1))
        .collect()
}

/// Writes one line per annotation, newline-terminated.
pub fn write_label_file(
    path: &Path,
    annotations: &[Annotation],
    truncate_scalars: bool,
) -> Result<(), KittiboxError> {
    let mut file = fs::File::create(path)?;

    for annotation in annotations {
        let line = serialize_annotation(annotation, truncate_scalars)?;
        writeln!(file, "{}", line)?;
    }

    Ok(())
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_annotation(input: &str) -> Result<(), KittiboxError> {
    let _ = parse_annotation(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

fn parse_f64(
    raw: &str,
    field: &str,
    path: &Path,
    line_no: usize,
) -> Result<f64, KittiboxError> {
    raw.parse::<f64>().map_err(|_| KittiboxError::LabelParse {
        path: path.to_path_buf(),
        line: line_no,
        message: format!("invalid {field} '{raw}'; expected floating-point number"),
    })
}

fn parse_i64(
    raw: &str,
    field: &str,
    path: &Path,
    line_no: usize,
) -> Result<i64, KittiboxError> {
    raw.parse::<i64>().map_err(|_| KittiboxError::LabelParse {
        path: path.to_path_buf(),
        line: line_no,
        message: format!("invalid {field} '{raw}'; expected integer"),
    })
}
