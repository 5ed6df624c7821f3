//! Wang's formula: a lower bound on the number of uniform parametric
//! segments needed to flatten a Bézier curve within a tolerance.
//!
//! For a degree `n` curve with control points `p[0..=n]`:
//!
//! ```text
//! m = max(|p[k+2] - 2 p[k+1] + p[k]|)   for 0 <= k <= n-2
//! segments >= sqrt(n (n - 1) m / (8 tol))
//! ```
//!
//! Precision is the reciprocal of the tolerance, in device pixels. The
//! control points are mapped by the linear part of the transform first, which
//! is exact for affine transforms and an estimate under perspective.

use crate::geom::{Transform, Vec2};

/// Segments per device pixel of error.
pub const PRECISION: f32 = 4.0;

/// Highest subdivision level a fixed-count template supports.
pub const MAX_RESOLVE_LEVEL: u32 = 5;

/// `sqrt(n (n - 1) / 8)` for quadratics.
const DEGREE_TERM_QUAD: f32 = 0.5;

/// `sqrt(n (n - 1) / 8)` for cubics.
const DEGREE_TERM_CUBIC: f32 = 0.866_025_4;

#[inline]
fn linear(t: &Transform, v: Vec2) -> Vec2 {
    Vec2::new(t.rc(0, 0) * v.x + t.rc(0, 1) * v.y, t.rc(1, 0) * v.x + t.rc(1, 1) * v.y)
}

pub fn quadratic(precision: f32, p: [Vec2; 3], t: &Transform) -> f32 {
    let v = linear(t, p[0] - p[1] * 2.0 + p[2]);
    DEGREE_TERM_QUAD * (v.length() * precision).sqrt()
}

pub fn cubic(precision: f32, p: [Vec2; 4], t: &Transform) -> f32 {
    let v1 = linear(t, p[0] - p[1] * 2.0 + p[2]);
    let v2 = linear(t, p[1] - p[2] * 2.0 + p[3]);
    let m = v1.length().max(v2.length());
    DEGREE_TERM_CUBIC * (m * precision).sqrt()
}

/// Segment estimate for a rational quadratic with weight `w`.
///
/// Points are centered on their bounds before measuring so the estimate does
/// not depend on where the conic sits in local space.
pub fn conic(precision: f32, p: [Vec2; 3], w: f32, t: &Transform) -> f32 {
    let p = p.map(|q| linear(t, q));
    let center = (p[0].min(p[1]).min(p[2]) + p[0].max(p[1]).max(p[2])) * 0.5;
    let p = p.map(|q| q - center);

    let max_len = p.iter().map(|q| q.dot(*q)).fold(0.0f32, f32::max).sqrt();
    let dp = p[0] + p[2] - p[1] * (2.0 * w);
    let dw = (2.0 - 2.0 * w).abs();

    let rp_minus_1 = (max_len * precision - 1.0).max(0.0);
    let numer = dp.length() * precision + rp_minus_1 * dw;
    let min_w = w.min(1.0);
    (numer / (4.0 * min_w)).max(0.0).sqrt()
}

/// Smallest level `l` with `2^l >= segments`, clamped to
/// [`MAX_RESOLVE_LEVEL`]. Non-finite estimates resolve to the maximum.
pub fn resolve_level(segments: f32) -> u32 {
    if !segments.is_finite() {
        return MAX_RESOLVE_LEVEL;
    }
    if segments <= 1.0 {
        return 0;
    }
    (segments.log2().ceil() as u32).min(MAX_RESOLVE_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn flat_curves_need_one_segment() {
        let id = Transform::identity();
        let q = quadratic(PRECISION, [v(0.0, 0.0), v(5.0, 0.0), v(10.0, 0.0)], &id);
        assert_eq!(q, 0.0);
        let c = cubic(PRECISION, [v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0), v(3.0, 3.0)], &id);
        assert!(c.abs() < 1e-5);
        assert_eq!(resolve_level(q), 0);
    }

    #[test]
    fn scaling_up_increases_segments() {
        let pts = [v(0.0, 0.0), v(10.0, 20.0), v(20.0, 0.0)];
        let small = quadratic(PRECISION, pts, &Transform::identity());
        let big = quadratic(PRECISION, pts, &Transform::scale(16.0, 16.0));
        assert!(big > small);
        // Segments grow with the square root of scale.
        assert!((big / small - 4.0).abs() < 1e-3);
    }

    #[test]
    fn unit_weight_conic_matches_quadratic_scale() {
        let pts = [v(0.0, 0.0), v(50.0, 80.0), v(100.0, 0.0)];
        let id = Transform::identity();
        let q = quadratic(PRECISION, pts, &id);
        let k = conic(PRECISION, pts, 1.0, &id);
        // With w = 1 the conic estimate reduces to sqrt(|dp| precision / 4).
        assert!((k - q).abs() < 1e-3, "{k} vs {q}");
    }

    #[test]
    fn resolve_level_clamps() {
        assert_eq!(resolve_level(0.5), 0);
        assert_eq!(resolve_level(2.0), 1);
        assert_eq!(resolve_level(2.1), 2);
        assert_eq!(resolve_level(1e9), MAX_RESOLVE_LEVEL);
        assert_eq!(resolve_level(f32::NAN), MAX_RESOLVE_LEVEL);
    }
}
