use crate::shared::recognition::BoundingBox;

/// 2-D affine transform mapping `(x, y)` to
/// `(sx·x + kx·y + tx, ky·x + sy·y + ty)`.
///
/// `post_*` operations apply after the existing transform, so a chain of
/// calls reads in the order the steps happen to a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CropTransform {
    sx: f32,
    kx: f32,
    tx: f32,
    ky: f32,
    sy: f32,
    ty: f32,
}

impl CropTransform {
    pub fn identity() -> Self {
        Self {
            sx: 1.0,
            kx: 0.0,
            tx: 0.0,
            ky: 0.0,
            sy: 1.0,
            ty: 0.0,
        }
    }

    /// Maps a `src_width × src_height` frame onto a `dst_width × dst_height`
    /// crop, rotating by `rotation_degrees` (clockwise, image coordinates)
    /// about the frame centre first.
    ///
    /// For quarter turns the frame's axes swap before scaling, so a portrait
    /// frame rotated 90° fills a landscape crop. With `maintain_aspect_ratio`
    /// a single scale factor is used (the larger one, so the crop is filled).
    pub fn frame_to_crop(
        src_width: u32,
        src_height: u32,
        dst_width: u32,
        dst_height: u32,
        rotation_degrees: i32,
        maintain_aspect_ratio: bool,
    ) -> Self {
        let mut m = Self::identity();

        if rotation_degrees != 0 {
            m = m
                .post_translate(-(src_width as f32) / 2.0, -(src_height as f32) / 2.0)
                .post_rotate(rotation_degrees);
        }

        let transpose = (rotation_degrees.abs() + 90) % 180 == 0;
        let (in_width, in_height) = if transpose {
            (src_height, src_width)
        } else {
            (src_width, src_height)
        };

        if in_width != dst_width || in_height != dst_height {
            let scale_x = dst_width as f32 / in_width as f32;
            let scale_y = dst_height as f32 / in_height as f32;
            m = if maintain_aspect_ratio {
                let s = scale_x.max(scale_y);
                m.post_scale(s, s)
            } else {
                m.post_scale(scale_x, scale_y)
            };
        }

        if rotation_degrees != 0 {
            m = m.post_translate(dst_width as f32 / 2.0, dst_height as f32 / 2.0);
        }
        m
    }

    pub fn post_translate(self, dx: f32, dy: f32) -> Self {
        self.then(&Self {
            tx: dx,
            ty: dy,
            ..Self::identity()
        })
    }

    pub fn post_scale(self, sx: f32, sy: f32) -> Self {
        self.then(&Self {
            sx,
            sy,
            ..Self::identity()
        })
    }

    pub fn post_rotate(self, degrees: i32) -> Self {
        let (sin, cos) = sin_cos_degrees(degrees);
        self.then(&Self {
            sx: cos,
            kx: -sin,
            ky: sin,
            sy: cos,
            ..Self::identity()
        })
    }

    /// `self` followed by `next`.
    pub fn then(&self, next: &Self) -> Self {
        Self {
            sx: next.sx * self.sx + next.kx * self.ky,
            kx: next.sx * self.kx + next.kx * self.sy,
            tx: next.sx * self.tx + next.kx * self.ty + next.tx,
            ky: next.ky * self.sx + next.sy * self.ky,
            sy: next.ky * self.kx + next.sy * self.sy,
            ty: next.ky * self.tx + next.sy * self.ty + next.ty,
        }
    }

    /// The inverse transform, or `None` when this one is singular.
    pub fn invert(&self) -> Option<Self> {
        let det = self.sx * self.sy - self.kx * self.ky;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        let sx = self.sy * inv;
        let kx = -self.kx * inv;
        let ky = -self.ky * inv;
        let sy = self.sx * inv;
        Some(Self {
            sx,
            kx,
            tx: -(sx * self.tx + kx * self.ty),
            ky,
            sy,
            ty: -(ky * self.tx + sy * self.ty),
        })
    }

    pub fn map_point(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.sx * x + self.kx * y + self.tx,
            self.ky * x + self.sy * y + self.ty,
        )
    }

    /// Bounding box of the four mapped corners of `b`.
    pub fn map_box(&self, b: &BoundingBox) -> BoundingBox {
        BoundingBox::enclosing(&[
            self.map_point(b.left, b.top),
            self.map_point(b.right, b.top),
            self.map_point(b.right, b.bottom),
            self.map_point(b.left, b.bottom),
        ])
    }
}

impl Default for CropTransform {
    fn default() -> Self {
        Self::identity()
    }
}

// Quarter turns are exact so axis-aligned boxes stay axis-aligned.
fn sin_cos_degrees(degrees: i32) -> (f32, f32) {
    match degrees.rem_euclid(360) {
        0 => (0.0, 1.0),
        90 => (1.0, 0.0),
        180 => (0.0, -1.0),
        270 => (-1.0, 0.0),
        d => (d as f32).to_radians().sin_cos(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn assert_point(actual: (f32, f32), expected: (f32, f32)) {
        assert_relative_eq!(actual.0, expected.0, epsilon = 1e-2);
        assert_relative_eq!(actual.1, expected.1, epsilon = 1e-2);
    }

    #[test]
    fn test_identity_maps_point_to_itself() {
        assert_point(CropTransform::identity().map_point(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn test_same_size_no_rotation_is_identity() {
        let m = CropTransform::frame_to_crop(300, 300, 300, 300, 0, false);
        assert_eq!(m, CropTransform::identity());
    }

    #[test]
    fn test_downscale_without_rotation() {
        let m = CropTransform::frame_to_crop(600, 400, 300, 300, 0, false);
        assert_point(m.map_point(600.0, 400.0), (300.0, 300.0));
        assert_point(m.map_point(300.0, 200.0), (150.0, 150.0));
    }

    #[test]
    fn test_rotate_90_turns_clockwise_and_swaps_axes() {
        // 640x480 landscape frame rotated into a 300x300 crop.
        let m = CropTransform::frame_to_crop(640, 480, 300, 300, 90, false);
        assert_point(m.map_point(0.0, 0.0), (300.0, 0.0));
        assert_point(m.map_point(640.0, 480.0), (0.0, 300.0));
        assert_point(m.map_point(320.0, 240.0), (150.0, 150.0));
    }

    #[test]
    fn test_rotate_180_flips_both_axes() {
        let m = CropTransform::frame_to_crop(100, 100, 100, 100, 180, false);
        assert_point(m.map_point(0.0, 0.0), (100.0, 100.0));
        assert_point(m.map_point(100.0, 0.0), (0.0, 100.0));
    }

    #[test]
    fn test_negative_quarter_turn_matches_270() {
        let a = CropTransform::frame_to_crop(640, 480, 300, 300, -90, false);
        let b = CropTransform::frame_to_crop(640, 480, 300, 300, 270, false);
        assert_point(a.map_point(10.0, 20.0), b.map_point(10.0, 20.0));
    }

    #[test]
    fn test_maintain_aspect_ratio_uses_larger_scale() {
        let m = CropTransform::frame_to_crop(600, 300, 300, 300, 0, true);
        // scale_x = 0.5, scale_y = 1.0 → 1.0
        assert_point(m.map_point(600.0, 300.0), (600.0, 300.0));
    }

    #[rstest]
    #[case::no_rotation(0)]
    #[case::quarter(90)]
    #[case::half(180)]
    #[case::odd_angle(33)]
    fn test_inverse_undoes_forward(#[case] rotation: i32) {
        let m = CropTransform::frame_to_crop(640, 480, 300, 300, rotation, false);
        let inv = m.invert().unwrap();
        let (x, y) = m.map_point(123.0, 45.0);
        assert_point(inv.map_point(x, y), (123.0, 45.0));
    }

    #[test]
    fn test_empty_source_is_not_invertible() {
        let m = CropTransform::frame_to_crop(0, 0, 300, 300, 0, false);
        assert!(m.invert().is_none());
    }

    #[test]
    fn test_zero_scale_is_not_invertible() {
        assert!(CropTransform::identity().post_scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn test_map_box_under_quarter_turn_stays_axis_aligned() {
        let m = CropTransform::identity().post_rotate(90);
        let b = m.map_box(&BoundingBox::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(b, BoundingBox::new(-20.0, 0.0, 0.0, 10.0));
    }

    #[test]
    fn test_then_applies_in_order() {
        let m = CropTransform::identity()
            .post_translate(1.0, 0.0)
            .post_scale(2.0, 2.0);
        assert_point(m.map_point(0.0, 0.0), (2.0, 0.0));
    }
}
