//! Detection post-processing for tiny single-shot object detectors.
//!
//! `tinydet` turns the flat `G x G x B x (5 + C)` output tensor of a
//! TinyYOLOv2-class network into labeled boxes and prunes near-duplicate
//! detections with greedy non-maximum suppression. The crate is pure CPU
//! post-processing over immutable inputs: inference, frame capture and box
//! rendering belong to the caller. Optional parallel decoding is available
//! via the `rayon` feature.

pub mod boxes;
pub mod decode;
pub mod suppress;
pub mod util;

pub(crate) mod trace;

pub use boxes::{iou, BBox};
pub use decode::{Anchor, Decoder, GridSpec};
pub use suppress::{suppress, SuppressionPolicy};
pub use util::{DetectError, DetectResult};
