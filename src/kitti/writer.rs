//! The category-limited KITTI dataset writer.
//!
//! A [`KittiWriter`] turns one image's raw boxes and labels into a saved
//! image plus a label file, enforcing per-category limits and geometric
//! validity. Pixel I/O goes through the [`ImageIo`] collaborator; rejected
//! boxes are reported to a [`RejectLog`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::annotation::Annotation;
use super::codec;
use crate::error::KittiboxError;
use crate::geom::{BoundingBox, BoxMode, Space};

/// Reads an image's dimensions without a full decode.
pub(crate) fn read_image_dimensions(path: &Path) -> Result<(u32, u32), KittiboxError> {
    let size = imagesize::size(path).map_err(|source| KittiboxError::ImageSizeProbe {
        path: path.to_path_buf(),
        source,
    })?;

    let width: u32 = size
        .width
        .try_into()
        .map_err(|_| KittiboxError::OversizedImage {
            path: path.to_path_buf(),
        })?;

    let height: u32 = size
        .height
        .try_into()
        .map_err(|_| KittiboxError::OversizedImage {
            path: path.to_path_buf(),
        })?;

    Ok((width, height))
}

/// The external image I/O collaborator.
///
/// Implementations own pixel decode, resampling and encode; the writer only
/// directs where results go. `probe_size` has a default implementation on
/// top of the `imagesize` crate, which reads dimensions from the header
/// without decoding pixels.
pub trait ImageIo {
    /// Decoded pixel image type.
    type Image;

    /// Returns `(width, height)` without fully decoding the image.
    fn probe_size(&self, path: &Path) -> Result<(u32, u32), KittiboxError> {
        read_image_dimensions(path)
    }

    /// Decodes the image at `path`.
    fn open(&self, path: &Path) -> Result<Self::Image, KittiboxError>;

    /// Resamples to `(width, height)`.
    fn resize(&self, image: Self::Image, size: (u32, u32)) -> Self::Image;

    /// Encodes the image to `path` in the named format (e.g. `"JPEG"`).
    fn save(&self, image: &Self::Image, path: &Path, format: &str) -> Result<(), KittiboxError>;
}

/// Receives every box rejected for invalid geometry.
pub trait RejectLog {
    /// Called with the image path, its pixel size and the offending raw box.
    fn rejected(&mut self, image_path: &Path, width: u32, height: u32, raw_box: [f64; 4]);
}

/// A rejected raw box together with its image context.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedBox {
    pub image_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub raw_box: [f64; 4],
}

/// A [`RejectLog`] that collects rejections in memory.
#[derive(Debug, Default)]
pub struct RejectList {
    pub entries: Vec<RejectedBox>,
}

impl RejectLog for RejectList {
    fn rejected(&mut self, image_path: &Path, width: u32, height: u32, raw_box: [f64; 4]) {
        self.entries.push(RejectedBox {
            image_path: image_path.to_path_buf(),
            width,
            height,
            raw_box,
        });
    }
}

/// Writer configuration.
#[derive(Clone, Debug)]
pub struct WriterConfig {
    /// Where converted images are saved.
    pub images_dir: PathBuf,
    /// Where label files are written.
    pub labels_dir: PathBuf,
    /// Per-category acceptance caps. A category absent from the map is
    /// unlimited.
    pub limits: BTreeMap<String, usize>,
    /// When set, images and boxes are resized to this `(width, height)`
    /// before writing.
    pub target_size: Option<(u32, u32)>,
    /// When true, an example is written only if none of its boxes were
    /// rejected or skipped.
    pub strict: bool,
}

/// Summary of one `write_example` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOutcome {
    /// Whether the image and label file were written.
    pub written: bool,
    /// Boxes that passed the limit and geometry checks.
    pub accepted: usize,
    /// Boxes skipped for limits or rejected for geometry.
    pub rejected: usize,
}

/// Converts per-image raw boxes into KITTI image/label file pairs.
///
/// Category counters live for the whole conversion run and only ever grow.
/// The writer is single-producer by design: parallel conversions must use
/// one writer each and merge counts afterwards.
pub struct KittiWriter<IO: ImageIo, L: RejectLog> {
    config: WriterConfig,
    counts: BTreeMap<String, usize>,
    io: IO,
    rejects: L,
}

impl<IO: ImageIo, L: RejectLog> KittiWriter<IO, L> {
    /// Creates the writer and both output directories.
    pub fn create(config: WriterConfig, io: IO, rejects: L) -> Result<Self, KittiboxError> {
        fs::create_dir_all(&config.images_dir)?;
        fs::create_dir_all(&config.labels_dir)?;

        Ok(Self {
            config,
            counts: BTreeMap::new(),
            io,
            rejects,
        })
    }

    /// Boxes accepted so far for `category`.
    pub fn count(&self, category: &str) -> usize {
        self.counts.get(category).copied().unwrap_or(0)
    }

    /// All per-category counters.
    pub fn counts(&self) -> &BTreeMap<String, usize> {
        &self.counts
    }

    /// The rejection log collaborator.
    pub fn rejects(&self) -> &L {
        &self.rejects
    }

    fn limit_for(&self, category: &str) -> usize {
        self.config
            .limits
            .get(category)
            .copied()
            .unwrap_or(usize::MAX)
    }

    /// Validates, converts and writes one image example.
    ///
    /// Boxes arrive as raw absolute-pixel XYXY tuples paired index-wise
    /// with `labels`; a length mismatch is fatal for the example. Each box
    /// is accepted only while its category is under its limit (boxes
    /// accepted earlier in the same call count) and only if it is
    /// non-degenerate and fully inside the image rectangle. Rejections go
    /// to the [`RejectLog`] and are otherwise non-fatal.
    ///
    /// In strict mode the example is written only when every input box was
    /// accepted; shared counters are updated only when the example is
    /// written, so a strict-mode discard leaves no trace.
    pub fn write_example<S: AsRef<str>>(
        &mut self,
        image_path: &Path,
        labels: &[S],
        raw_boxes: &[[f64; 4]],
    ) -> Result<WriteOutcome, KittiboxError> {
        if raw_boxes.len() != labels.len() {
            return Err(KittiboxError::LabelCountMismatch {
                boxes: raw_boxes.len(),
                labels: labels.len(),
            });
        }

        let mut outcome = WriteOutcome::default();
        if raw_boxes.is_empty() {
            return Ok(outcome);
        }

        let image_size = self.io.probe_size(image_path)?;
        let image_bounds = BoundingBox::new(
            [0.0, 0.0, image_size.0 as f64, image_size.1 as f64],
            BoxMode::Xyxy,
            Space::Absolute,
        );

        let stem = image_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| KittiboxError::BadImagePath {
                path: image_path.to_path_buf(),
            })?;

        let mut local_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut annotations = Vec::new();

        for (label, raw_box) in labels.iter().zip(raw_boxes) {
            let label = label.as_ref();
            let bbox = BoundingBox::new(*raw_box, BoxMode::Xyxy, Space::Absolute);

            let running = self.count(label) + local_counts.get(label).copied().unwrap_or(0);
            if running >= self.limit_for(label) {
                debug!("category limit reached for '{}'", label);
                continue;
            }

            if bbox.is_valid() && image_bounds.contains(&bbox) {
                *local_counts.entry(label).or_insert(0) += 1;

                let bbox = match self.config.target_size {
                    Some(target) => bbox.resize(image_size, target),
                    None => bbox,
                };
                annotations.push(Annotation::new(label).with_bbox(bbox));
            } else {
                warn!(
                    "{:?} is not a valid bounding box (image size {}x{})",
                    raw_box, image_size.0, image_size.1
                );
                self.rejects
                    .rejected(image_path, image_size.0, image_size.1, *raw_box);
            }
        }

        outcome.accepted = annotations.len();
        outcome.rejected = raw_boxes.len() - annotations.len();

        if !self.config.strict || annotations.len() == raw_boxes.len() {
            for (label, accepted) in &local_counts {
                *self.counts.entry((*label).to_string()).or_insert(0) += accepted;
            }

            let image = self.io.open(image_path)?;
            let image = match self.config.target_size {
                Some(target) => self.io.resize(image, target),
                None => image,
            };

            let image_out = self.config.images_dir.join(format!("{stem}.jpg"));
            self.io.save(&image, &image_out, "JPEG")?;

            let label_out = self.config.labels_dir.join(format!("{stem}.txt"));
            codec::write_label_file(&label_out, &annotations, true)?;

            outcome.written = true;
        }

        Ok(outcome)
    }
}
