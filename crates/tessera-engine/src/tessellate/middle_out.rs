//! Middle-out triangulation of a closed polygon.
//!
//! Pass one connects every other vertex, pass two every fourth, and so on,
//! which yields `n - 2` triangles with far fewer long slivers than a plain
//! fan. The triangles may overlap for concave input; stencil fills count
//! winding, so overlap is harmless there.

use crate::geom::Vec2;

/// Calls `emit` with the vertex indices of each triangle, in order.
pub fn triangulate_indices(n: usize, mut emit: impl FnMut([usize; 3])) {
    let mut step = 1;
    while step < n {
        let mut i = 0;
        while i + step < n {
            let k = (i + 2 * step).min(n) % n;
            if k != i {
                emit([i, i + step, k]);
            }
            i += 2 * step;
        }
        step *= 2;
    }
}

/// Triangles of `points`, at most `points.len() - 2` of them.
pub fn triangulate(points: &[Vec2]) -> Vec<[Vec2; 3]> {
    let mut out = Vec::with_capacity(points.len().saturating_sub(2));
    triangulate_indices(points.len(), |[a, b, c]| out.push([points[a], points[b], points[c]]));
    out
}

/// Number of triangles [`triangulate`] produces for an `n`-gon.
#[inline]
pub const fn triangle_count(n: usize) -> usize {
    n.saturating_sub(2)
}
