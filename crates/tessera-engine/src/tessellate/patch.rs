//! Conversion of path segments into fixed-count patch instances.

use super::wangs::{self, PRECISION};
use crate::geom::{Contour, Segment, Transform, Vec2};

/// How the vertex shader evaluates a patch's four points.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum CurveType {
    /// `p0..p3` are cubic control points. Lines are degenerate cubics.
    Cubic = 0,
    /// `p0..p2` are quadratic control points, `p3` repeats `p2`.
    Quadratic = 1,
    /// `p0..p2` are conic control points, `p3.x` holds the weight.
    Conic = 2,
}

impl CurveType {
    #[inline]
    pub fn as_f32(self) -> f32 {
        self as u8 as f32
    }
}

/// One curve instance ready to be written.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Patch {
    pub points: [Vec2; 4],
    pub curve_type: CurveType,
    pub resolve_level: u32,
}

impl Patch {
    /// The patch for `segment`, with its resolve level measured in device
    /// space.
    pub fn from_segment(segment: &Segment, transform: &Transform) -> Self {
        match *segment {
            Segment::Line([a, b]) => Patch {
                points: [a, a, b, b],
                curve_type: CurveType::Cubic,
                resolve_level: 0,
            },
            Segment::Quad(p) => Patch {
                points: [p[0], p[1], p[2], p[2]],
                curve_type: CurveType::Quadratic,
                resolve_level: wangs::resolve_level(wangs::quadratic(PRECISION, p, transform)),
            },
            Segment::Conic(p, w) => Patch {
                points: [p[0], p[1], p[2], Vec2::new(w, w)],
                curve_type: CurveType::Conic,
                resolve_level: wangs::resolve_level(wangs::conic(PRECISION, p, w, transform)),
            },
            Segment::Cubic(p) => Patch {
                points: p,
                curve_type: CurveType::Cubic,
                resolve_level: wangs::resolve_level(wangs::cubic(PRECISION, p, transform)),
            },
        }
    }

    /// `[p0.x, p0.y, p1.x, p1.y]`
    #[inline]
    pub fn p01(&self) -> [f32; 4] {
        [self.points[0].x, self.points[0].y, self.points[1].x, self.points[1].y]
    }

    /// `[p2.x, p2.y, p3.x, p3.y]`
    #[inline]
    pub fn p23(&self) -> [f32; 4] {
        [self.points[2].x, self.points[2].y, self.points[3].x, self.points[3].y]
    }
}

/// Curve patches of a contour. Lines are left to the inner polygon, which the
/// middle-out fan covers.
pub fn curve_patches<'a>(
    contour: &'a Contour,
    transform: &'a Transform,
) -> impl Iterator<Item = Patch> + 'a {
    contour
        .segments
        .iter()
        .filter(|s| !s.is_line())
        .map(move |s| Patch::from_segment(s, transform))
}

/// Every segment of a contour as a wedge patch; each wedge also covers the
/// triangle to the contour's fan point.
pub fn wedge_patches<'a>(
    contour: &'a Contour,
    transform: &'a Transform,
) -> impl Iterator<Item = Patch> + 'a {
    contour.segments.iter().map(move |s| Patch::from_segment(s, transform))
}
