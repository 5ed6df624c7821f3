//! Local-space anti-aliasing math shared by the analytic render steps.

use crate::geom::{AAFlags, EdgeAAQuad, RRect, Rect, Transform, TransformType, Vec2};

/// Local-space distance that maps to at least one device pixel around `p`.
///
/// The Jacobian of the projected mapping at `p` is
///
/// ```text
/// [df/du df/dv]   [(m00 w - m30 x) (m01 w - m31 x)]
/// [dg/du dg/dv] = [(m10 w - m30 y) (m11 w - m31 y)] / w^2
/// ```
///
/// and its smaller singular value is the minimum scale at that point, so its
/// reciprocal is a safe local AA radius. Degenerate transforms yield `+inf`.
pub fn local_aa_radius_at(t: &Transform, p: Vec2) -> f32 {
    let [x, y, _, w] = t.map(p.x, p.y, 0.0, 1.0);

    let inv_w2 = 1.0 / (w * w);
    let dfdu = (w * t.rc(0, 0) - x * t.rc(3, 0)) * inv_w2;
    let dfdv = (w * t.rc(0, 1) - x * t.rc(3, 1)) * inv_w2;
    let dgdu = (w * t.rc(1, 0) - y * t.rc(3, 0)) * inv_w2;
    let dgdv = (w * t.rc(1, 1) - y * t.rc(3, 1)) * inv_w2;

    let s1 = dfdu * dfdu + dfdv * dfdv + dgdu * dgdu + dgdv * dgdv;
    let e = dfdu * dfdu + dfdv * dfdv - dgdu * dgdu - dgdv * dgdv;
    let f = dfdu * dgdu + dfdv * dgdv;
    let s2 = (e * e + 4.0 * f * f).sqrt();

    let singular1 = (0.5 * (s1 + s2)).sqrt();
    let singular2 = (0.5 * (s1 - s2)).sqrt();

    let aa_radius = 1.0 / singular1.min(singular2);
    if aa_radius.is_finite() { aa_radius } else { f32::INFINITY }
}

/// Local AA radius used for every vertex of a shape with `bounds`.
///
/// Without perspective the scale is constant and any point works. With
/// perspective the largest radius over the four corners is used.
pub fn local_aa_radius(t: &Transform, bounds: Rect) -> f32 {
    if t.transform_type() < TransformType::Perspective {
        return local_aa_radius_at(t, Vec2::zero());
    }
    bounds
        .corners()
        .iter()
        .map(|&c| local_aa_radius_at(t, c))
        .fold(f32::NEG_INFINITY, f32::max)
}

/// Whether insets from opposite edges of `rrect` would cross the far corner's
/// curve.
pub fn rrect_insets_intersect(rrect: &RRect, stroke_radius: f32, aa_radius: f32) -> bool {
    let max_inset = stroke_radius + 2.0 * aa_radius;
    let (w, h) = (rrect.width(), rrect.height());
    rrect.x_radii().iter().any(|&rx| max_inset >= w - rx)
        || rrect.y_radii().iter().any(|&ry| max_inset >= h - ry)
}

/// Whether a rect's insets meet in the middle.
pub fn rect_insets_intersect(rect: Rect, stroke_radius: f32, aa_radius: f32) -> bool {
    let limit = 2.0 * (stroke_radius + aa_radius);
    rect.width() <= limit || rect.height() <= limit
}

/// Whether the AA insets of a quad's edges intersect. Arbitrary quads with any
/// AA edge are assumed to.
pub fn quad_insets_intersect(quad: &EdgeAAQuad, aa_radius: f32) -> bool {
    let flags = quad.edge_flags();
    if flags.is_empty() {
        return false;
    }
    if !quad.is_rect() {
        return true;
    }
    let inset = |f: AAFlags| if flags.contains(f) { aa_radius } else { 0.0 };
    let size = quad.bounds().size();
    size.x <= inset(AAFlags::LEFT) + inset(AAFlags::RIGHT)
        || size.y <= inset(AAFlags::TOP) + inset(AAFlags::BOTTOM)
}

/// Winding test of a convex quad in y-down space.
///
/// Uses the corner at the first point, or the opposite corner when the first
/// is degenerate. Rects built from sorted bounds are always clockwise.
pub fn is_clockwise(quad: &EdgeAAQuad) -> bool {
    if quad.is_rect() {
        return true;
    }
    let (xs, ys) = (quad.xs(), quad.ys());
    let mut winding = (xs[0] - xs[3]) * (ys[1] - ys[0]) - (ys[0] - ys[3]) * (xs[1] - xs[0]);
    if winding == 0.0 {
        winding = (xs[2] - xs[1]) * (ys[3] - ys[2]) - (ys[2] - ys[1]) * (xs[3] - xs[2]);
    }
    winding >= 0.0
}

/// Edge flags and coordinates of `quad`, reordered to clockwise.
///
/// A counter-clockwise quad is mirrored by swapping corners 0/1 and 2/3. Its
/// left and right edges trade places; top and bottom stay.
pub struct ClockwiseQuad {
    /// Per-edge flags in L, T, R, B order.
    pub edges: [bool; 4],
    pub xs: [f32; 4],
    pub ys: [f32; 4],
}

pub fn clockwise_quad(quad: &EdgeAAQuad) -> ClockwiseQuad {
    let flags = quad.edge_flags();
    let edges = [
        flags.contains(AAFlags::LEFT),
        flags.contains(AAFlags::TOP),
        flags.contains(AAFlags::RIGHT),
        flags.contains(AAFlags::BOTTOM),
    ];
    let (xs, ys) = (quad.xs(), quad.ys());
    if is_clockwise(quad) {
        ClockwiseQuad { edges, xs, ys }
    } else {
        ClockwiseQuad {
            edges: [edges[2], edges[1], edges[0], edges[3]],
            xs: [xs[1], xs[0], xs[3], xs[2]],
            ys: [ys[1], ys[0], ys[3], ys[2]],
        }
    }
}

/// Average of a quad's corners.
pub fn quad_center(quad: &EdgeAAQuad) -> Vec2 {
    let (xs, ys) = (quad.xs(), quad.ys());
    Vec2::new(xs.iter().sum::<f32>() * 0.25, ys.iter().sum::<f32>() * 0.25)
}

/// Columns of the 3x3 projection the analytic steps upload per instance:
/// rows 0, 1 and 3 of columns 0, 1 and 3.
pub fn instance_matrix(t: &Transform) -> [[f32; 3]; 3] {
    [
        [t.rc(0, 0), t.rc(1, 0), t.rc(3, 0)],
        [t.rc(0, 1), t.rc(1, 1), t.rc(3, 1)],
        [t.rc(0, 3), t.rc(1, 3), t.rc(3, 3)],
    ]
}
