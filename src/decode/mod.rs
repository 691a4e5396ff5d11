//! Decoding of the detector output tensor into candidate boxes.
//!
//! `GridSpec` captures the fixed head configuration (grid side, anchor
//! priors, class labels, input edge) validated once at construction;
//! `Decoder` walks the flat tensor in grid scan order and applies the
//! output activations to produce labeled candidates.

use crate::boxes::BBox;
use crate::suppress::{suppress, SuppressionPolicy};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{argmax, sigmoid, softmax_in_place};
use crate::util::{DetectError, DetectResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub(crate) mod layout;
mod preset;

use layout::{TensorLayout, BOX_CHANNELS, OBJECTNESS_CHANNEL};

/// Anchor prior in grid-cell units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    /// Width prior.
    pub width: f32,
    /// Height prior.
    pub height: f32,
}

impl Anchor {
    /// Creates an anchor prior from `(width, height)` in grid-cell units.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Read-only detector head configuration, set once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    grid: usize,
    anchors: Vec<Anchor>,
    labels: Vec<String>,
    image_size: f32,
}

impl GridSpec {
    /// Creates a validated head configuration.
    ///
    /// `grid` is the side of the square cell grid, `anchors` the per-cell
    /// priors, `labels` the class names in model output order and
    /// `image_size` the network input edge in pixels.
    pub fn new(
        grid: usize,
        anchors: Vec<Anchor>,
        labels: Vec<String>,
        image_size: f32,
    ) -> DetectResult<Self> {
        if grid == 0 {
            return Err(DetectError::InvalidGrid);
        }
        if anchors.is_empty() {
            return Err(DetectError::EmptyAnchors);
        }
        if labels.is_empty() {
            return Err(DetectError::EmptyLabels);
        }
        if !image_size.is_finite() || image_size <= 0.0 {
            return Err(DetectError::InvalidImageSize { got: image_size });
        }
        Ok(Self {
            grid,
            anchors,
            labels,
            image_size,
        })
    }

    /// Configuration of the reference TinyYOLOv2 VOC export: 13x13 grid,
    /// 5 anchors, 20 classes, 416px input.
    pub fn tiny_yolo_v2_voc() -> Self {
        Self {
            grid: preset::TINY_YOLO_V2_GRID,
            anchors: preset::TINY_YOLO_V2_ANCHORS
                .iter()
                .map(|&(width, height)| Anchor::new(width, height))
                .collect(),
            labels: preset::VOC_LABELS.iter().map(|s| s.to_string()).collect(),
            image_size: preset::TINY_YOLO_V2_IMAGE_SIZE,
        }
    }

    /// Grid side `G`.
    pub fn grid(&self) -> usize {
        self.grid
    }

    /// Anchor priors, `B` entries.
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Class labels, `C` entries.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of classes `C`.
    pub fn num_classes(&self) -> usize {
        self.labels.len()
    }

    /// Network input edge in pixels.
    pub fn image_size(&self) -> f32 {
        self.image_size
    }

    /// Required tensor length `G*G*B*(5+C)` for this configuration.
    pub fn tensor_len(&self) -> usize {
        self.layout().len()
    }

    fn layout(&self) -> TensorLayout {
        TensorLayout::new(self.grid, self.anchors.len(), self.labels.len())
    }
}

/// Decoder over a fixed `GridSpec`.
///
/// Pure and synchronous: distinct tensors may be decoded concurrently from
/// multiple threads through a shared `Decoder` without coordination.
#[derive(Debug, Clone)]
pub struct Decoder {
    spec: GridSpec,
    layout: TensorLayout,
}

impl Decoder {
    /// Creates a decoder for the given head configuration.
    pub fn new(spec: GridSpec) -> Self {
        let layout = spec.layout();
        Self { spec, layout }
    }

    /// The head configuration this decoder was built with.
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Decodes a flat output tensor into candidate boxes.
    ///
    /// Candidates below `confidence_threshold` are dropped; survivors come
    /// out in grid scan order (row-major, then anchor index). Box sizes are
    /// not clipped to the frame. A tensor whose length is not
    /// `G*G*B*(5+C)` fails with [`DetectError::ShapeMismatch`] and produces
    /// no partial output.
    pub fn parse(&self, tensor: &[f32], confidence_threshold: f32) -> DetectResult<Vec<BBox>> {
        self.check_shape(tensor)?;
        let _span = trace_span!("parse", grid = self.spec.grid).entered();

        let mut out = Vec::new();
        let mut class_probs = Vec::with_capacity(self.spec.num_classes());
        for row in 0..self.spec.grid {
            self.decode_row(tensor, row, confidence_threshold, &mut class_probs, &mut out);
        }

        trace_event!("candidates", count = out.len());
        Ok(out)
    }

    /// Decodes grid rows in parallel; output is identical to [`parse`],
    /// including order.
    ///
    /// [`parse`]: Decoder::parse
    #[cfg(feature = "rayon")]
    pub fn parse_par(&self, tensor: &[f32], confidence_threshold: f32) -> DetectResult<Vec<BBox>> {
        self.check_shape(tensor)?;
        let _span = trace_span!("parse", grid = self.spec.grid, parallel = true).entered();

        let rows: Vec<Vec<BBox>> = (0..self.spec.grid)
            .into_par_iter()
            .map(|row| {
                let mut class_probs = Vec::with_capacity(self.spec.num_classes());
                let mut out = Vec::new();
                self.decode_row(tensor, row, confidence_threshold, &mut class_probs, &mut out);
                out
            })
            .collect();

        let mut out = Vec::with_capacity(rows.iter().map(Vec::len).sum());
        for row in rows {
            out.extend(row);
        }
        trace_event!("candidates", count = out.len());
        Ok(out)
    }

    /// Decode followed by suppression, mirroring the usual caller sequence
    /// `suppress(parse(tensor, conf), max_boxes, overlap, policy)`.
    pub fn detect(
        &self,
        tensor: &[f32],
        confidence_threshold: f32,
        max_boxes: usize,
        overlap_threshold: f32,
        policy: SuppressionPolicy,
    ) -> DetectResult<Vec<BBox>> {
        let candidates = self.parse(tensor, confidence_threshold)?;
        Ok(suppress(candidates, max_boxes, overlap_threshold, policy))
    }

    fn check_shape(&self, tensor: &[f32]) -> DetectResult<()> {
        let expected = self.layout.len();
        if tensor.len() != expected {
            return Err(DetectError::ShapeMismatch {
                expected,
                got: tensor.len(),
            });
        }
        Ok(())
    }

    /// Decodes one grid row. `class_probs` is caller-owned scratch to keep
    /// the per-anchor softmax allocation-free.
    fn decode_row(
        &self,
        tensor: &[f32],
        row: usize,
        confidence_threshold: f32,
        class_probs: &mut Vec<f32>,
        out: &mut Vec<BBox>,
    ) {
        let cell = self.spec.image_size / self.spec.grid as f32;
        for col in 0..self.spec.grid {
            for (a, anchor) in self.spec.anchors.iter().enumerate() {
                let base = self.layout.offset(row, col, a);
                let slice = &tensor[base..base + self.layout.stride()];

                let objectness = sigmoid(slice[OBJECTNESS_CHANNEL]);
                class_probs.clear();
                class_probs.extend_from_slice(&slice[BOX_CHANNELS..]);
                softmax_in_place(class_probs);
                let (class, class_prob) = argmax(class_probs);

                let confidence = objectness * class_prob;
                if confidence < confidence_threshold {
                    continue;
                }

                let cx = (col as f32 + sigmoid(slice[0])) * cell;
                let cy = (row as f32 + sigmoid(slice[1])) * cell;
                let width = anchor.width * slice[2].exp() * cell;
                let height = anchor.height * slice[3].exp() * cell;

                out.push(BBox {
                    class,
                    label: self.spec.labels[class].clone(),
                    confidence,
                    x: cx - width / 2.0,
                    y: cy - height / 2.0,
                    width,
                    height,
                });
            }
        }
    }
}
