use super::{Rect, Vec2};

/// Classification of a [`Transform`], ordered by increasing generality.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TransformType {
    Identity,
    /// Positive scale and translate only.
    SimpleRectStaysRect,
    /// Axis-aligned rects map to axis-aligned rects (flips, 90 degree rotations).
    RectStaysRect,
    Affine,
    Perspective,
    /// Contains non-finite values.
    Invalid,
}

/// Local-to-device 4x4 matrix stored column-major.
///
/// Only the x, y and w rows/columns matter for 2D drawing; z is carried so
/// the matrix can be uploaded as-is.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    cols: [f32; 16],
    ty: TransformType,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const IDENTITY_COLS: [f32; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, //
    ];

    #[inline]
    pub const fn identity() -> Self {
        Self { cols: Self::IDENTITY_COLS, ty: TransformType::Identity }
    }

    /// Builds a transform from 16 column-major values.
    pub fn from_cols(cols: [f32; 16]) -> Self {
        Self { cols, ty: classify(&cols) }
    }

    /// Builds a transform from a 2D projective 3x3 matrix in row-major order:
    /// `[sx kx tx; ky sy ty; p0 p1 p2]`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_3x3(sx: f32, kx: f32, tx: f32, ky: f32, sy: f32, ty: f32, p0: f32, p1: f32, p2: f32) -> Self {
        Self::from_cols([
            sx, ky, 0.0, p0, //
            kx, sy, 0.0, p1, //
            0.0, 0.0, 1.0, 0.0, //
            tx, ty, 0.0, p2, //
        ])
    }

    #[inline]
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self::from_3x3(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self::from_3x3(sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0)
    }

    /// Rotation about the origin, in degrees.
    pub fn rotate(degrees: f32) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::from_3x3(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
    }

    /// Element at `row`, `col`.
    #[inline]
    pub fn rc(&self, row: usize, col: usize) -> f32 {
        self.cols[col * 4 + row]
    }

    #[inline]
    pub fn cols(&self) -> &[f32; 16] {
        &self.cols
    }

    #[inline]
    pub fn transform_type(&self) -> TransformType {
        self.ty
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.ty != TransformType::Invalid
    }

    /// Determinant of the 3x3 matrix acting on 2D points (rows and columns
    /// x, y and w).
    pub fn determinant_2d(&self) -> f32 {
        let m = |r: usize, c: usize| self.rc(r, c) as f64;
        let det = m(0, 0) * (m(1, 1) * m(3, 3) - m(1, 3) * m(3, 1))
            - m(0, 1) * (m(1, 0) * m(3, 3) - m(1, 3) * m(3, 0))
            + m(0, 3) * (m(1, 0) * m(3, 1) - m(1, 1) * m(3, 0));
        det as f32
    }

    /// Finite and invertible on the plane.
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant_2d();
        self.is_finite() && det.is_finite() && det != 0.0
    }

    #[inline]
    pub fn has_perspective(&self) -> bool {
        self.ty == TransformType::Perspective
    }

    /// `self * other`: applies `other` first.
    pub fn concat(&self, other: &Transform) -> Transform {
        let mut out = [0.0f32; 16];
        for col in 0..4 {
            for row in 0..4 {
                out[col * 4 + row] = (0..4).map(|k| self.rc(row, k) * other.rc(k, col)).sum();
            }
        }
        Transform::from_cols(out)
    }

    /// Maps a homogeneous point.
    #[inline]
    pub fn map(&self, x: f32, y: f32, z: f32, w: f32) -> [f32; 4] {
        let v = [x, y, z, w];
        core::array::from_fn(|row| (0..4).map(|k| self.rc(row, k) * v[k]).sum())
    }

    /// Maps a 2D point, dividing by w.
    #[inline]
    pub fn map_point(&self, p: Vec2) -> Vec2 {
        let [x, y, _, w] = self.map(p.x, p.y, 0.0, 1.0);
        if w == 1.0 { Vec2::new(x, y) } else { Vec2::new(x / w, y / w) }
    }

    /// Device-space bounds of a local rect.
    pub fn map_rect(&self, rect: Rect) -> Rect {
        if self.ty == TransformType::Identity {
            return rect;
        }
        Rect::from_points(&rect.corners().map(|p| self.map_point(p)))
    }
}

fn classify(m: &[f32; 16]) -> TransformType {
    if m.iter().any(|v| !v.is_finite()) {
        return TransformType::Invalid;
    }
    let rc = |row: usize, col: usize| m[col * 4 + row];

    if rc(3, 0) != 0.0 || rc(3, 1) != 0.0 || rc(3, 3) != 1.0 {
        return TransformType::Perspective;
    }

    let (m00, m01, m10, m11) = (rc(0, 0), rc(0, 1), rc(1, 0), rc(1, 1));
    if m01 == 0.0 && m10 == 0.0 {
        if m00 == 1.0 && m11 == 1.0 && rc(0, 3) == 0.0 && rc(1, 3) == 0.0 {
            TransformType::Identity
        } else if m00 > 0.0 && m11 > 0.0 {
            TransformType::SimpleRectStaysRect
        } else {
            TransformType::RectStaysRect
        }
    } else if m00 == 0.0 && m11 == 0.0 {
        TransformType::RectStaysRect
    } else {
        TransformType::Affine
    }
}
