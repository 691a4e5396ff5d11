//! Greedy non-maximum suppression over decoded candidates.
//!
//! Candidates are sorted by descending confidence with a stable sort, so
//! equal-confidence boxes keep their grid scan order and the pass is fully
//! deterministic. The highest-confidence survivor is kept, every remaining
//! candidate overlapping it at or above the threshold is dropped, and the
//! loop repeats until `max_boxes` survivors are collected or the pool is
//! exhausted.

use crate::boxes::{iou, BBox};
use crate::trace::{trace_event, trace_span};

/// Which candidates may suppress each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SuppressionPolicy {
    /// Any overlapping pair competes regardless of label. This is the
    /// reference behavior and the default: two classes claiming the same
    /// region still suppress each other.
    #[default]
    ClassAgnostic,
    /// Only candidates of the same class suppress each other; overlapping
    /// detections of different classes can coexist.
    ClassAware,
}

/// Reduces candidates to at most `max_boxes` non-redundant final boxes,
/// ordered by descending confidence.
///
/// Survivors pairwise satisfy `iou < overlap_threshold` (under
/// [`SuppressionPolicy::ClassAware`], only within a class). Zero-area
/// candidates have IoU 0 with everything and are suppressed only by the
/// `max_boxes` cap. `max_boxes == 0` or an empty input returns an empty
/// vector without scanning.
pub fn suppress(
    candidates: Vec<BBox>,
    max_boxes: usize,
    overlap_threshold: f32,
    policy: SuppressionPolicy,
) -> Vec<BBox> {
    if max_boxes == 0 || candidates.is_empty() {
        return Vec::new();
    }

    let _span = trace_span!("suppress", candidates = candidates.len()).entered();

    let mut sorted = candidates;
    // Stable sort keeps scan order for equal confidences.
    sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut kept: Vec<BBox> = Vec::new();
    'candidates: for candidate in sorted {
        for survivor in &kept {
            if policy == SuppressionPolicy::ClassAware && survivor.class != candidate.class {
                continue;
            }
            if iou(survivor, &candidate) >= overlap_threshold {
                continue 'candidates;
            }
        }
        kept.push(candidate);
        if kept.len() == max_boxes {
            break;
        }
    }

    trace_event!("kept", count = kept.len());
    kept
}
