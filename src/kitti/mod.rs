//! KITTI object-label interchange: record type, line codec, dataset writer
//! and JSON export.
//!
//! The fixed-column text format follows the KITTI object development kit:
//! `type truncated occluded alpha bbox[4] dimensions[3] location[3]
//! rotation_y [score]`, one line per object, one file per image.

mod annotation;
pub mod codec;
pub mod io_json;
pub mod writer;

pub use annotation::Annotation;
pub use writer::{
    ImageIo, KittiWriter, RejectList, RejectLog, RejectedBox, WriteOutcome, WriterConfig,
};
