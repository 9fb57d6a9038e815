use std::path::PathBuf;
use thiserror::Error;

/// The main error type for kittibox operations.
#[derive(Debug, Error)]
pub enum KittiboxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Bounding box must have exactly 4 elements, found {len}")]
    BoxLength { len: usize },

    #[error("Box is already in relative coordinates")]
    AlreadyRelative,

    #[error("Box is already in absolute coordinates")]
    AlreadyAbsolute,

    #[error("Failed to parse label line {line} in {path}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Annotation label must not be empty")]
    EmptyLabel,

    #[error("The number of bounding boxes ({boxes}) differs from the number of labels ({labels})")]
    LabelCountMismatch { boxes: usize, labels: usize },

    #[error("Failed to read image dimensions from {path}: {source}")]
    ImageSizeProbe {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Image path {path} has no usable file stem")]
    BadImagePath { path: PathBuf },

    #[error("Image dimensions of {path} do not fit in u32")]
    OversizedImage { path: PathBuf },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid label tree at {path}: {message}")]
    LabelTreeInvalid { path: PathBuf, message: String },
}
