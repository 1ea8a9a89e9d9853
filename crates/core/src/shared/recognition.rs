use serde::Serialize;

/// Axis-aligned box in pixel space, `left <= right` and `top <= bottom`
/// for well-formed engine output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Smallest box containing all of `points`.
    pub fn enclosing(points: &[(f32, f32)]) -> Self {
        let mut b = Self::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for &(x, y) in points {
            b.left = b.left.min(x);
            b.top = b.top.min(y);
            b.right = b.right.max(x);
            b.bottom = b.bottom.max(y);
        }
        b
    }
}

/// One decoded detection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Recognition {
    pub class_id: i32,
    /// Label from an attached label map, empty when none.
    pub title: String,
    pub score: f32,
    pub location: BoundingBox,
}
