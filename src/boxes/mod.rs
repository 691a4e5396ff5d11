//! Detection box value type and rectangle geometry.
//!
//! `BBox` is a plain immutable value in pixel coordinates with the top-left
//! corner convention. Observation or change-notification concerns belong to
//! the presentation layer of the calling application, not to this type.

/// A labeled axis-aligned detection box.
///
/// `x`/`y` are the top-left corner in pixels; `width`/`height` are
/// non-negative but may be zero (degenerate boxes are legal decoder output
/// and are handled by suppression without division errors). `confidence`
/// is the product of objectness and the winning class probability, in
/// `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    /// Index of the winning class in the configured label list.
    pub class: usize,
    /// Name of the winning class.
    pub label: String,
    /// Objectness times winning class probability.
    pub confidence: f32,
    /// Left edge in pixels.
    pub x: f32,
    /// Top edge in pixels.
    pub y: f32,
    /// Box width in pixels.
    pub width: f32,
    /// Box height in pixels.
    pub height: f32,
}

impl BBox {
    /// Returns the box area, treating negative extents as zero.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Right edge in pixels.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge in pixels.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Returns a copy clipped to the `[0, image_width] x [0, image_height]`
    /// frame.
    ///
    /// The decoder itself never clips (sizes from `exp` may exceed the
    /// frame); renderers that need bounded rectangles apply this helper.
    pub fn clamped(&self, image_width: f32, image_height: f32) -> BBox {
        let x = self.x.max(0.0);
        let y = self.y.max(0.0);
        let width = (self.right().min(image_width) - x).max(0.0);
        let height = (self.bottom().min(image_height) - y).max(0.0);
        BBox {
            x,
            y,
            width,
            height,
            ..self.clone()
        }
    }
}

/// Intersection-over-union of two boxes.
///
/// If either box has zero area the result is 0: degenerate boxes never
/// overlap anything and never cause a division by zero.
pub fn iou(a: &BBox, b: &BBox) -> f32 {
    let area_a = a.area();
    let area_b = b.area();
    if area_a <= 0.0 || area_b <= 0.0 {
        return 0.0;
    }

    let overlap_w = (a.right().min(b.right()) - a.x.max(b.x)).max(0.0);
    let overlap_h = (a.bottom().min(b.bottom()) - a.y.max(b.y)).max(0.0);
    let intersection = overlap_w * overlap_h;
    if intersection <= 0.0 {
        return 0.0;
    }
    intersection / (area_a + area_b - intersection)
}

#[cfg(test)]
mod tests {
    use super::{iou, BBox};

    fn bx(x: f32, y: f32, w: f32, h: f32) -> BBox {
        BBox {
            class: 0,
            label: "test".to_string(),
            confidence: 1.0,
            x,
            y,
            width: w,
            height: h,
        }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = bx(10.0, 10.0, 20.0, 20.0);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        let a = bx(0.0, 0.0, 10.0, 10.0);
        let b = bx(20.0, 20.0, 10.0, 10.0);
        assert_eq!(iou(&a, &b), 0.0);
        assert_eq!(iou(&b, &a), 0.0);
    }

    #[test]
    fn iou_of_half_overlap() {
        // Two 10x10 boxes sharing a 5x10 strip: 50 / (100 + 100 - 50).
        let a = bx(0.0, 0.0, 10.0, 10.0);
        let b = bx(5.0, 0.0, 10.0, 10.0);
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn zero_area_boxes_never_overlap() {
        let degenerate = bx(5.0, 5.0, 0.0, 10.0);
        let normal = bx(0.0, 0.0, 10.0, 10.0);
        assert_eq!(iou(&degenerate, &normal), 0.0);
        assert_eq!(iou(&normal, &degenerate), 0.0);
        assert_eq!(iou(&degenerate, &degenerate), 0.0);
    }

    #[test]
    fn clamped_clips_to_frame() {
        let a = bx(-5.0, -5.0, 20.0, 430.0);
        let c = a.clamped(416.0, 416.0);
        assert_eq!(c.x, 0.0);
        assert_eq!(c.y, 0.0);
        assert_eq!(c.width, 15.0);
        assert_eq!(c.height, 416.0);

        let inside = bx(10.0, 10.0, 5.0, 5.0);
        assert_eq!(inside.clamped(416.0, 416.0), inside);
    }
}
