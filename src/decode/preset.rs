//! Constants of the reference TinyYOLOv2 VOC export.

/// Anchor priors in grid-cell units, `(width, height)` pairs.
pub(crate) const TINY_YOLO_V2_ANCHORS: [(f32, f32); 5] = [
    (1.08, 1.19),
    (3.42, 4.41),
    (6.63, 11.38),
    (9.42, 5.11),
    (16.62, 10.52),
];

/// The 20 PASCAL VOC class names, in model output order.
pub(crate) const VOC_LABELS: [&str; 20] = [
    "aeroplane",
    "bicycle",
    "bird",
    "boat",
    "bottle",
    "bus",
    "car",
    "cat",
    "chair",
    "cow",
    "diningtable",
    "dog",
    "horse",
    "motorbike",
    "person",
    "pottedplant",
    "sheep",
    "sofa",
    "train",
    "tvmonitor",
];

/// Grid side of the reference export.
pub(crate) const TINY_YOLO_V2_GRID: usize = 13;

/// Network input edge in pixels.
pub(crate) const TINY_YOLO_V2_IMAGE_SIZE: f32 = 416.0;
