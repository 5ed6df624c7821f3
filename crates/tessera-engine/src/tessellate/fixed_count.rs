//! Static templates for fixed-count tessellation.
//!
//! Every curve instance is drawn with the same vertex/index template; the
//! vertex shader places template vertex `(level, index)` at parametric
//! `T = index / 2^level` of the instance's curve. Triangles are ordered
//! middle-out so the first `index_count(l)` indices draw the curve at
//! resolve level `l`, which lets one template serve every level.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::wangs::MAX_RESOLVE_LEVEL;
use crate::draw_writer::InstanceCountProxy;
use crate::gpu::VertexWriter;

/// One template vertex: which subdivision level introduced it and its odd
/// index within that level. The fan point of a wedge is `(-1, -1)`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TemplateVertex {
    pub resolve_level: f32,
    pub index: f32,
}

const_assert_eq!(core::mem::size_of::<TemplateVertex>(), 8);

/// Parametric points of a curve at the maximum level, `2^max + 1`.
pub const CURVE_VERTEX_COUNT: u32 = (1 << MAX_RESOLVE_LEVEL) + 1;

/// Curve points plus the fan point.
pub const WEDGE_VERTEX_COUNT: u32 = CURVE_VERTEX_COUNT + 1;

/// Template vertex index of the wedge fan point.
const FAN_VERTEX: u16 = CURVE_VERTEX_COUNT as u16;

/// Triangles covering a curve's interior at `level`: `2^level - 1`.
#[inline]
pub const fn curve_triangle_count(level: u32) -> u32 {
    (1 << level) - 1
}

/// Curve triangles plus the triangle joining the curve ends to the fan point.
#[inline]
pub const fn wedge_triangle_count(level: u32) -> u32 {
    1 << level
}

pub const CURVE_INDEX_COUNT: u32 = curve_triangle_count(MAX_RESOLVE_LEVEL) * 3;
pub const WEDGE_INDEX_COUNT: u32 = wedge_triangle_count(MAX_RESOLVE_LEVEL) * 3;

/// Template vertex index of the parametric point `position / 2^max`.
///
/// Vertices are stored by the level that introduced them: both ends first,
/// then the single level-1 midpoint, then the two level-2 points, and so on.
fn vertex_at(position: u32) -> u16 {
    let full = 1u32 << MAX_RESOLVE_LEVEL;
    if position == 0 {
        return 0;
    }
    if position == full {
        return 1;
    }
    let shift = position.trailing_zeros();
    let level = MAX_RESOLVE_LEVEL - shift;
    let index = position >> shift;
    // Levels 1..level contributed 2^(level-1) - 1 vertices before this one.
    (2 + (1u32 << (level - 1)) - 1 + index / 2) as u16
}

fn write_curve_vertices(vw: &mut VertexWriter<'_>) {
    vw.write(TemplateVertex { resolve_level: 0.0, index: 0.0 });
    vw.write(TemplateVertex { resolve_level: 0.0, index: 1.0 });
    for level in 1..=MAX_RESOLVE_LEVEL {
        for index in (1..(1u32 << level)).step_by(2) {
            vw.write(TemplateVertex { resolve_level: level as f32, index: index as f32 });
        }
    }
}

fn write_curve_indices(vw: &mut VertexWriter<'_>) {
    for level in 1..=MAX_RESOLVE_LEVEL {
        let span = 1u32 << (MAX_RESOLVE_LEVEL - level);
        for index in (1..(1u32 << level)).step_by(2) {
            let mid = index * span;
            vw.write([vertex_at(mid - span), vertex_at(mid), vertex_at(mid + span)]);
        }
    }
}

/// Byte sizes of the curve template buffers.
pub const CURVE_VERTEX_BYTES: u32 = CURVE_VERTEX_COUNT * 8;
pub const CURVE_INDEX_BYTES: u32 = CURVE_INDEX_COUNT * 2;
pub const WEDGE_VERTEX_BYTES: u32 = WEDGE_VERTEX_COUNT * 8;
pub const WEDGE_INDEX_BYTES: u32 = WEDGE_INDEX_COUNT * 2;

pub fn write_curve_template(vertices: &mut VertexWriter<'_>, indices: &mut VertexWriter<'_>) {
    write_curve_vertices(vertices);
    write_curve_indices(indices);
}

pub fn write_wedge_template(vertices: &mut VertexWriter<'_>, indices: &mut VertexWriter<'_>) {
    write_curve_vertices(vertices);
    vertices.write(TemplateVertex { resolve_level: -1.0, index: -1.0 });

    indices.write([FAN_VERTEX, 0u16, 1u16]);
    write_curve_indices(indices);
}

// ── count proxies ─────────────────────────────────────────────────────────

/// Worst-case resolve level of the curves in a batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CurveCount(u32);

impl InstanceCountProxy for CurveCount {
    type Observation = u32;

    /// Level 1: a single triangle, the least any curve patch draws.
    fn identity() -> Self {
        CurveCount(1)
    }

    fn accumulate(&mut self, level: u32) {
        self.0 = self.0.max(level.min(MAX_RESOLVE_LEVEL));
    }

    fn count(&self) -> u32 {
        curve_triangle_count(self.0) * 3
    }
}

/// Worst-case resolve level of the wedges in a batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WedgeCount(u32);

impl InstanceCountProxy for WedgeCount {
    type Observation = u32;

    /// Level 0: only the fan triangle, which is what a line wedge needs.
    fn identity() -> Self {
        WedgeCount(0)
    }

    fn accumulate(&mut self, level: u32) {
        self.0 = self.0.max(level.min(MAX_RESOLVE_LEVEL));
    }

    fn count(&self) -> u32 {
        wedge_triangle_count(self.0) * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(wedge: bool) -> (Vec<TemplateVertex>, Vec<u16>) {
        let (vb, ib) = if wedge {
            (WEDGE_VERTEX_BYTES, WEDGE_INDEX_BYTES)
        } else {
            (CURVE_VERTEX_BYTES, CURVE_INDEX_BYTES)
        };
        let mut vbytes = vec![0u8; vb as usize];
        let mut ibytes = vec![0u8; ib as usize];
        {
            let mut v = VertexWriter::new(&mut vbytes);
            let mut i = VertexWriter::new(&mut ibytes);
            if wedge {
                write_wedge_template(&mut v, &mut i);
            } else {
                write_curve_template(&mut v, &mut i);
            }
            assert_eq!(v.remaining(), 0);
            assert_eq!(i.remaining(), 0);
        }
        let verts = vbytes.chunks_exact(8).map(bytemuck::pod_read_unaligned).collect();
        let idx = ibytes.chunks_exact(2).map(bytemuck::pod_read_unaligned).collect();
        (verts, idx)
    }

    fn t_of(v: TemplateVertex) -> f32 {
        v.index / (1u32 << v.resolve_level as u32) as f32
    }

    // ── template layout ───────────────────────────────────────────────────

    #[test]
    fn template_sizes() {
        assert_eq!(CURVE_VERTEX_COUNT, 33);
        assert_eq!(CURVE_INDEX_COUNT, 93);
        assert_eq!(WEDGE_INDEX_COUNT, 96);
    }

    #[test]
    fn vertex_lookup_matches_written_order() {
        let (verts, _) = template(false);
        let full = (1u32 << MAX_RESOLVE_LEVEL) as f32;
        for position in 0..=(1u32 << MAX_RESOLVE_LEVEL) {
            let v = verts[vertex_at(position) as usize];
            assert_eq!(t_of(v), position as f32 / full, "position {position}");
        }
    }

    #[test]
    fn level_prefix_spans_exact_subdivision() {
        let (verts, idx) = template(false);
        for level in 1..=MAX_RESOLVE_LEVEL {
            let used = &idx[..(curve_triangle_count(level) * 3) as usize];
            let mut ts: Vec<f32> = used.iter().map(|&i| t_of(verts[i as usize])).collect();
            ts.sort_by(f32::total_cmp);
            ts.dedup();
            assert_eq!(ts.len() as u32, (1 << level) + 1, "level {level}");
        }
    }

    #[test]
    fn wedge_starts_with_fan_triangle() {
        let (verts, idx) = template(true);
        assert_eq!(&idx[..3], &[FAN_VERTEX, 0, 1]);
        assert_eq!(verts[FAN_VERTEX as usize].resolve_level, -1.0);
    }

    // ── proxies ───────────────────────────────────────────────────────────

    #[test]
    fn proxies_keep_worst_case() {
        let mut c = CurveCount::identity();
        assert_eq!(c.count(), 3);
        c.accumulate(3);
        c.accumulate(2);
        assert_eq!(c.count(), 21);
        c.accumulate(40);
        assert_eq!(c.count(), CURVE_INDEX_COUNT);

        let mut w = WedgeCount::identity();
        assert_eq!(w.count(), 3);
        w.accumulate(2);
        assert_eq!(w.count(), 12);
    }
}
