//! Flat tensor layout for the `G x G x B x (5 + C)` detector head.
//!
//! Cells are stored row-major, anchors within a cell consecutively, and each
//! anchor owns a `(5 + C)`-wide channel slice: `tx ty tw th to` followed by
//! the `C` class logits. This matches the export format of the reference
//! TinyYOLOv2 model; a different export must be verified against its own
//! layout before reusing this decoder.

/// Box-parameter channels preceding the class logits: `tx ty tw th to`.
pub(crate) const BOX_CHANNELS: usize = 5;

/// Objectness logit `to`, the last channel before the class logits.
pub(crate) const OBJECTNESS_CHANNEL: usize = BOX_CHANNELS - 1;

/// Flat offsets into the detector output tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TensorLayout {
    grid: usize,
    anchors: usize,
    classes: usize,
}

impl TensorLayout {
    pub(crate) fn new(grid: usize, anchors: usize, classes: usize) -> Self {
        Self {
            grid,
            anchors,
            classes,
        }
    }

    /// Channel count per anchor slice.
    pub(crate) fn stride(&self) -> usize {
        BOX_CHANNELS + self.classes
    }

    /// Required tensor length for this shape.
    pub(crate) fn len(&self) -> usize {
        self.grid * self.grid * self.anchors * self.stride()
    }

    /// Start of the channel slice for `(row, col, anchor)`.
    pub(crate) fn offset(&self, row: usize, col: usize, anchor: usize) -> usize {
        debug_assert!(row < self.grid && col < self.grid && anchor < self.anchors);
        ((row * self.grid + col) * self.anchors + anchor) * self.stride()
    }
}
