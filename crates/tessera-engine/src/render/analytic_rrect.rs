//! Single-pass analytic anti-aliasing for rects, rrects and per-edge AA quads.
//!
//! One static template serves every shape. Each corner has fifteen vertices
//! in four rings: the AA outset, the anchors on the shape's edge, the AA inset
//! and the interior. A vertex is placed from its corner-local `position`;
//! outset vertices then move one device pixel along `normal` and inset
//! vertices one local AA radius against it, so the same template covers
//! every radius, stroke width and transform.
//!
//! The instance carries the shape in one of three encodings, told apart by
//! the sign of the first attribute:
//!
//! | shape          | `x_radii_or_flags`        | `radii_or_quad_xs` | `ltrb_or_quad_ys` |
//! |----------------|---------------------------|--------------------|-------------------|
//! | stroke         | `[-2, 0, hw, join]`       | x radii            | ltrb              |
//! | hairline       | `-2 - x radii`            | y radii            | ltrb              |
//! | fill (quad)    | `-1` per AA edge, else 0  | corner xs          | corner ys         |
//! | fill (rrect)   | x radii                   | y radii            | ltrb              |
//!
//! Filled rects and zero-radius rrects use the quad encoding with every edge
//! anti-aliased, so they match an all-AA [`EdgeAAQuad`](crate::geom::EdgeAAQuad)
//! byte for byte.

use core::f32::consts::{FRAC_1_SQRT_2, SQRT_2};

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::aa::{
    clockwise_quad, instance_matrix, local_aa_radius, quad_insets_intersect,
    rect_insets_intersect, rrect_insets_intersect,
};
use super::step::{RenderStep, StepDesc, StepKind};
use crate::draw::{DrawParams, Geometry};
use crate::draw_writer::{DrawWriter, Instances};
use crate::geom::{RRect, ShapeKind, Vec2};
use crate::gpu::depth_stencil::DIRECT_DEPTH_GREATER_PASS;
use crate::gpu::{
    attribute_stride, Attribute, BindBufferInfo, DrawBufferManager, PrimitiveType, RenderStateFlags,
    SlType, StaticBufferManager, StepFlags, Varying, VertexAttribType,
};

pub const VERTEX_WGSL: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/analytic_rrect.wgsl"));
pub const COVERAGE_WGSL: &str = include_str!("shaders/analytic_rrect_coverage.wgsl");

pub const CORNER_VERTEX_COUNT: usize = 15;
pub const VERTEX_COUNT: usize = 4 * CORNER_VERTEX_COUNT;
pub const INDEX_COUNT: usize = 114;

/// Interior vertices collapse to the center; the shape is solid.
pub const SOLID_INTERIOR: f32 = 1.0;
/// Interior vertices stay on the inner AA inset; the stroke has a hole.
pub const STROKE_INTERIOR: f32 = 0.0;
/// The stroke's hole is smaller than its AA insets and is filled per pixel.
pub const FILLED_STROKE_INTERIOR: f32 = -1.0;
/// AA radius sentinel: the insets of opposite edges overlap, so coverage is
/// computed per pixel instead of from the template.
pub const COMPLEX_AA_INSETS: f32 = -1.0;

const OUTSET: f32 = 1.0;
const INSET: f32 = -1.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RRectVertex {
    pub position: [f32; 2],
    pub normal: [f32; 2],
    pub normal_scale: f32,
    pub center_weight: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct RRectInstance {
    pub x_radii_or_flags: [f32; 4],
    pub radii_or_quad_xs: [f32; 4],
    pub ltrb_or_quad_ys: [f32; 4],
    /// `[cx, cy, center weight, aa radius]`
    pub center: [f32; 4],
    pub depth: f32,
    pub ssbo_index: u32,
    pub mat: [[f32; 3]; 3],
}

const VERTEX_ATTRS: [Attribute; 4] = [
    Attribute::new("position", VertexAttribType::Float2),
    Attribute::new("normal", VertexAttribType::Float2),
    Attribute::new("normalScale", VertexAttribType::Float),
    Attribute::new("centerWeight", VertexAttribType::Float),
];

const INSTANCE_ATTRS: [Attribute; 9] = [
    Attribute::new("xRadiiOrFlags", VertexAttribType::Float4),
    Attribute::new("radiiOrQuadXs", VertexAttribType::Float4),
    Attribute::new("ltrbOrQuadYs", VertexAttribType::Float4),
    Attribute::new("center", VertexAttribType::Float4),
    Attribute::new("depth", VertexAttribType::Float),
    Attribute::new("ssboIndex", VertexAttribType::UInt),
    Attribute::new("mat0", VertexAttribType::Float3),
    Attribute::new("mat1", VertexAttribType::Float3),
    Attribute::new("mat2", VertexAttribType::Float3),
];

const VARYINGS: [Varying; 6] = [
    Varying::new("jacobian", SlType::Float4),
    Varying::new("edgeDistances", SlType::Float4),
    Varying::new("xRadii", SlType::Float4),
    Varying::new("yRadii", SlType::Float4),
    Varying::new("strokeParams", SlType::Float2),
    Varying::new("perPixelControl", SlType::Float2),
];

const_assert_eq!(attribute_stride(&VERTEX_ATTRS) as usize, size_of::<RRectVertex>());
const_assert_eq!(attribute_stride(&INSTANCE_ATTRS) as usize, size_of::<RRectInstance>());

// ── template ──────────────────────────────────────────────────────────────

const fn vertex(position: [f32; 2], normal: [f32; 2], normal_scale: f32, center_weight: f32) -> RRectVertex {
    RRectVertex { position, normal, normal_scale, center_weight }
}

const H: f32 = FRAC_1_SQRT_2;

/// Top-left corner. Positions are relative to the corner's arc center in
/// units of its radii; the other corners are quarter turns of this one.
const TL_CORNER: [RRectVertex; CORNER_VERTEX_COUNT] = [
    // AA outset
    vertex([-1.0, 0.0], [-1.0, 0.0], OUTSET, 0.0),
    vertex([-1.0, 0.0], [-H, -H], OUTSET, 0.0),
    vertex([0.0, -1.0], [-H, -H], OUTSET, 0.0),
    vertex([0.0, -1.0], [0.0, -1.0], OUTSET, 0.0),
    // anchors on the edge
    vertex([-1.0, 0.0], [-1.0, 0.0], 0.0, 0.0),
    vertex([-1.0, 0.0], [-H, -H], 0.0, 0.0),
    vertex([0.0, -1.0], [-H, -H], 0.0, 0.0),
    vertex([0.0, -1.0], [0.0, -1.0], 0.0, 0.0),
    // AA inset
    vertex([-1.0, 0.0], [-1.0, 0.0], INSET, 0.0),
    vertex([-1.0, 0.0], [-H, -H], INSET, 0.0),
    vertex([0.0, -1.0], [-H, -H], INSET, 0.0),
    vertex([0.0, -1.0], [0.0, -1.0], INSET, 0.0),
    // interior
    vertex([-1.0, 0.0], [-1.0, 0.0], INSET, 1.0),
    vertex([-1.0, 0.0], [-H, -H], INSET, 1.0),
    vertex([0.0, -1.0], [0.0, -1.0], INSET, 1.0),
];

/// Clockwise quarter turn in y-down space.
#[inline]
fn quarter_turn([x, y]: [f32; 2]) -> [f32; 2] {
    [-y, x]
}

/// Template vertices for TL, TR, BR and BL.
pub fn template_vertices() -> Vec<RRectVertex> {
    let mut out = Vec::with_capacity(VERTEX_COUNT);
    let mut corner = TL_CORNER;
    for _ in 0..4 {
        out.extend_from_slice(&corner);
        for v in &mut corner {
            v.position = quarter_turn(v.position);
            v.normal = quarter_turn(v.normal);
        }
    }
    out
}

/// One triangle strip over the template: outset to anchors, anchors to inset,
/// then inset to interior, each ring closed back onto the first corner.
pub fn template_indices() -> Vec<u16> {
    const N: u16 = CORNER_VERTEX_COUNT as u16;
    // Interior vertex paired with each inset vertex.
    const INTERIOR_PAIR: [u16; 4] = [0, 1, 1, 2];

    let mut out = Vec::with_capacity(INDEX_COUNT);
    for (outer, inner) in [(0u16, 4u16), (4, 8)] {
        for corner in 0..4 {
            let base = corner * N;
            for k in 0..4 {
                out.extend([base + outer + k, base + inner + k]);
            }
        }
        out.extend([outer, inner]);
    }
    for corner in 0..4 {
        let base = corner * N;
        let next = (corner + 1) % 4 * N;
        for k in 0..4 {
            out.extend([base + 8 + k, base + 12 + INTERIOR_PAIR[k as usize]]);
        }
        out.extend([base + 14, base + 11, next + 12]);
    }
    out.extend([8, 12]);
    debug_assert_eq!(out.len(), INDEX_COUNT);
    out
}

// ── step ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AnalyticRRectStep {
    vertices: BindBufferInfo,
    indices: BindBufferInfo,
}

impl AnalyticRRectStep {
    /// Writes the template into `static_buffers` and wraps the step.
    pub fn new<S: StaticBufferManager + ?Sized>(static_buffers: &mut S) -> RenderStep {
        let vertices = template_vertices();
        let (vertex_binding, mut vw) = static_buffers.get_vertex_writer(size_of_val(vertices.as_slice()) as u32);
        vw.write_slice(&vertices);

        let indices = template_indices();
        let (index_binding, mut iw) = static_buffers.get_index_writer(size_of_val(indices.as_slice()) as u32);
        iw.write_slice(&indices);

        let desc = StepDesc {
            name: "AnalyticRRectRenderStep".to_owned(),
            flags: StepFlags::PERFORMS_SHADING | StepFlags::EMITS_COVERAGE | StepFlags::STATIC_TEMPLATE,
            uniforms: &[],
            primitive: PrimitiveType::TriangleStrip,
            depth_stencil: DIRECT_DEPTH_GREATER_PASS,
            render_state: RenderStateFlags::FIXED_BUFFERS | RenderStateFlags::APPEND_INSTANCES,
            vertex_attrs: &VERTEX_ATTRS,
            instance_attrs: &INSTANCE_ATTRS,
            varyings: &VARYINGS,
        };
        RenderStep::new(
            desc,
            StepKind::AnalyticRRect(Self { vertices: vertex_binding, indices: index_binding }),
        )
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let instance = encode(params, ssbo_index);
        let mut instances = Instances::new(writer, self.vertices, self.indices, INDEX_COUNT as u32);
        instances.append(1).write(instance);
    }
}

/// Builds the instance for one draw.
pub fn encode(params: &DrawParams<'_>, ssbo_index: u32) -> RRectInstance {
    let geometry = params.geometry();
    let bounds = geometry.bounds();
    let ltrb = bounds.ltrb();
    let [l, t, r, b] = ltrb;

    let mut aa_radius = local_aa_radius(params.transform(), bounds);
    let mut stroke_inset = 0.0;
    let mut center_weight = SOLID_INTERIOR;
    let center = bounds.center();

    let (first, second, third) = match (geometry, params.stroke_style()) {
        (Geometry::Shape(shape), Some(style)) => {
            let hw = style.half_width();
            let inner_gap = bounds.size() - Vec2::splat(2.0 * hw);
            if inner_gap.x <= 0.0 || inner_gap.y <= 0.0 {
                // The stroke swallows the hole; draw it as a fill outset by hw.
                stroke_inset = -hw;
            } else {
                center_weight = STROKE_INTERIOR;
                stroke_inset = hw;
            }

            let rrect = shape.as_rrect().unwrap_or_else(|| RRect::from_rect(bounds));
            let x_radii = rrect.x_radii();
            if hw > 0.0 {
                let join = if style.is_miter_join() {
                    if style.miter_limit() < SQRT_2 {
                        0.0
                    } else if x_radii.iter().all(|&rx| rx == 0.0) {
                        2.0
                    } else {
                        1.0
                    }
                } else {
                    style.join_limit()
                };
                ([-2.0, 0.0, hw, join], x_radii, ltrb)
            } else {
                (x_radii.map(|rx| -2.0 - rx), rrect.y_radii(), ltrb)
            }
        }
        (Geometry::EdgeAAQuad(quad), _) => {
            debug_assert!(params.stroke_style().is_none());
            let cw = clockwise_quad(quad);
            if quad.edge_flags().is_empty() {
                aa_radius = 0.0;
            }
            (cw.edges.map(|aa| if aa { -1.0 } else { 0.0 }), cw.xs, cw.ys)
        }
        (Geometry::Shape(shape), None) => match shape.as_rrect() {
            Some(rrect) if !rrect.is_rect() => (rrect.x_radii(), rrect.y_radii(), ltrb),
            _ => ([-1.0; 4], [l, r, r, l], [t, t, b, b]),
        },
        _ => {
            debug_assert!(false, "analytic rrect cannot draw {geometry:?}");
            ([0.0; 4], [0.0; 4], [0.0; 4])
        }
    };

    let insets_intersect = match geometry {
        Geometry::EdgeAAQuad(quad) => quad_insets_intersect(quad, aa_radius),
        Geometry::Shape(shape) => match shape.kind() {
            ShapeKind::RRect(rrect) => rrect_insets_intersect(rrect, stroke_inset, aa_radius),
            _ => rect_insets_intersect(bounds, stroke_inset, aa_radius),
        },
        _ => false,
    };
    if insets_intersect {
        aa_radius = COMPLEX_AA_INSETS;
        if center_weight == STROKE_INTERIOR {
            center_weight = FILLED_STROKE_INTERIOR;
        }
    }

    RRectInstance {
        x_radii_or_flags: first,
        radii_or_quad_xs: second,
        ltrb_or_quad_ys: third,
        center: [center.x, center.y, center_weight, aa_radius],
        depth: params.order().depth_as_float(),
        ssbo_index,
        mat: instance_matrix(params.transform()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Cap, Clip, CompressedPaintersOrder, DrawOrder, Join, PaintersDepth, StrokeStyle};
    use crate::geom::{AAFlags, EdgeAAQuad, Rect, Shape, Transform};
    use crate::gpu::{BarrierType, CpuBufferManager, DrawCommand, DrawPassCommands};

    fn r(l: f32, t: f32, rt: f32, b: f32) -> Rect {
        Rect::new(l, t, rt, b)
    }

    fn params<'a>(t: &'a Transform, geometry: Geometry, stroke: Option<StrokeStyle>) -> DrawParams<'a> {
        let device = t.map_rect(geometry.bounds());
        let clip = Clip::new(device, r(-1000.0, -1000.0, 1000.0, 1000.0), false);
        let order = DrawOrder::new(PaintersDepth(7), CompressedPaintersOrder(1));
        DrawParams::new(t, geometry, clip, order, stroke)
    }

    fn rect_params(t: &Transform, rect: Rect, stroke: Option<StrokeStyle>) -> DrawParams<'_> {
        params(t, Geometry::Shape(Shape::rect(rect)), stroke)
    }

    // ── template ──────────────────────────────────────────────────────────

    #[test]
    fn template_sizes() {
        let vertices = template_vertices();
        let indices = template_indices();
        assert_eq!(vertices.len(), 60);
        assert_eq!(indices.len(), 114);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn corners_are_quarter_turns() {
        let v = template_vertices();
        // TR starts on the top edge pointing up, BR on the right edge.
        assert_eq!(v[15].normal, [0.0, -1.0]);
        assert_eq!(v[30].normal, [1.0, 0.0]);
        assert_eq!(v[45].normal, [0.0, 1.0]);
        assert_eq!(v[45 + 1].normal, [-H, H]);
    }

    #[test]
    fn every_template_vertex_is_referenced() {
        let indices = template_indices();
        for v in 0..VERTEX_COUNT as u16 {
            assert!(indices.contains(&v), "vertex {v} unused");
        }
    }

    // ── encoding ──────────────────────────────────────────────────────────

    #[test]
    fn rect_rrect_and_quad_encode_identically() {
        let t = Transform::scale(2.0, 2.0);
        let rect = r(10.0, 20.0, 50.0, 60.0);
        let a = encode(&rect_params(&t, rect, None), 3);
        let b = encode(&params(&t, Geometry::Shape(Shape::rrect(RRect::from_rect(rect))), None), 3);
        let c = encode(&params(&t, Geometry::EdgeAAQuad(EdgeAAQuad::from_rect(rect, AAFlags::ALL)), None), 3);
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&c));
        assert_eq!(a.x_radii_or_flags, [-1.0; 4]);
        assert_eq!(a.radii_or_quad_xs, [10.0, 50.0, 50.0, 10.0]);
        assert_eq!(a.ltrb_or_quad_ys, [20.0, 20.0, 60.0, 60.0]);
        assert_eq!(a.center, [30.0, 40.0, SOLID_INTERIOR, 0.5]);
    }

    #[test]
    fn filled_rrect_carries_radii() {
        let t = Transform::identity();
        let rr = RRect::from_rect_xy(r(0.0, 0.0, 100.0, 50.0), 10.0, 5.0);
        let inst = encode(&params(&t, Geometry::Shape(Shape::rrect(rr)), None), 0);
        assert_eq!(inst.x_radii_or_flags, [10.0; 4]);
        assert_eq!(inst.radii_or_quad_xs, [5.0; 4]);
        assert_eq!(inst.ltrb_or_quad_ys, [0.0, 0.0, 100.0, 50.0]);
        assert_eq!(inst.depth, PaintersDepth(7).as_float());
    }

    #[test]
    fn thick_stroke_is_drawn_solid() {
        let t = Transform::identity();
        let stroke = StrokeStyle::new(12.0, Join::Miter(4.0), Cap::Butt);
        let inst = encode(&rect_params(&t, r(0.0, 0.0, 10.0, 40.0), Some(stroke)), 0);
        assert_eq!(inst.center[2], SOLID_INTERIOR);
        assert_eq!(inst.x_radii_or_flags, [-2.0, 0.0, 6.0, 2.0]);
        assert_eq!(inst.center[3], 1.0);
    }

    #[test]
    fn thin_stroke_keeps_its_hole() {
        let t = Transform::identity();
        let stroke = StrokeStyle::new(2.0, Join::Round, Cap::Butt);
        let inst = encode(&rect_params(&t, r(0.0, 0.0, 40.0, 40.0), Some(stroke)), 0);
        assert_eq!(inst.center[2], STROKE_INTERIOR);
        assert_eq!(inst.x_radii_or_flags, [-2.0, 0.0, 1.0, -1.0]);
        assert_eq!(inst.radii_or_quad_xs, [0.0; 4]);
    }

    #[test]
    fn miter_join_below_sqrt2_bevels() {
        let t = Transform::identity();
        let stroke = StrokeStyle::new(2.0, Join::Miter(1.2), Cap::Butt);
        let inst = encode(&rect_params(&t, r(0.0, 0.0, 40.0, 40.0), Some(stroke)), 0);
        assert_eq!(inst.x_radii_or_flags[3], 0.0);

        let rr = RRect::from_rect_xy(r(0.0, 0.0, 40.0, 40.0), 4.0, 4.0);
        let stroke = StrokeStyle::new(2.0, Join::Miter(4.0), Cap::Butt);
        let inst = encode(&params(&t, Geometry::Shape(Shape::rrect(rr)), Some(stroke)), 0);
        assert_eq!(inst.x_radii_or_flags[3], 1.0);
        assert_eq!(inst.radii_or_quad_xs, [4.0; 4]);
    }

    #[test]
    fn hairline_encodes_negated_radii() {
        let t = Transform::identity();
        let rr = RRect::from_rect_xy(r(0.0, 0.0, 40.0, 40.0), 3.0, 5.0);
        let inst = encode(&params(&t, Geometry::Shape(Shape::rrect(rr)), Some(StrokeStyle::hairline())), 0);
        assert_eq!(inst.x_radii_or_flags, [-5.0; 4]);
        assert_eq!(inst.radii_or_quad_xs, [5.0; 4]);
    }

    #[test]
    fn tiny_shapes_use_complex_insets() {
        let t = Transform::identity();
        let inst = encode(&rect_params(&t, r(0.0, 0.0, 1.5, 40.0), None), 0);
        assert_eq!(inst.center[3], COMPLEX_AA_INSETS);
        assert_eq!(inst.center[2], SOLID_INTERIOR);
    }

    #[test]
    fn thin_stroke_hole_is_filled_when_insets_meet() {
        let t = Transform::identity();
        // 2hw = 2 < 3 so the hole survives, but 2 * (1 + 1) >= 3.
        let stroke = StrokeStyle::new(2.0, Join::Bevel, Cap::Butt);
        let inst = encode(&rect_params(&t, r(0.0, 0.0, 3.0, 40.0), Some(stroke)), 0);
        assert_eq!(inst.center[3], COMPLEX_AA_INSETS);
        assert_eq!(inst.center[2], FILLED_STROKE_INTERIOR);
    }

    #[test]
    fn singular_transform_is_complex() {
        let t = Transform::scale(0.0, 1.0);
        let inst = encode(&rect_params(&t, r(0.0, 0.0, 10.0, 10.0), None), 0);
        assert_eq!(inst.center[3], COMPLEX_AA_INSETS);
    }

    #[test]
    fn counter_clockwise_quad_is_normalized() {
        let t = Transform::identity();
        let pts = |order: [usize; 4]| {
            let c = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(12.0, 10.0), Vec2::new(-2.0, 10.0)];
            order.map(|i| c[i])
        };
        let cw = EdgeAAQuad::from_points(pts([0, 1, 2, 3]), AAFlags::LEFT | AAFlags::TOP);
        let ccw = EdgeAAQuad::from_points(pts([1, 0, 3, 2]), AAFlags::RIGHT | AAFlags::TOP);
        let a = encode(&params(&t, Geometry::EdgeAAQuad(cw), None), 0);
        let b = encode(&params(&t, Geometry::EdgeAAQuad(ccw), None), 0);
        assert_eq!(a, b);
        assert_eq!(a.x_radii_or_flags, [-1.0, -1.0, 0.0, 0.0]);
    }

    #[test]
    fn quads_are_centered_on_their_bounds() {
        let t = Transform::identity();
        let pts = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0), Vec2::new(-6.0, 10.0)];
        let quad = EdgeAAQuad::from_points(pts, AAFlags::ALL);
        let inst = encode(&params(&t, Geometry::EdgeAAQuad(quad), None), 0);
        assert_eq!(inst.center[..2], [2.0, 5.0]);
    }

    #[test]
    fn non_aa_quad_has_zero_radius() {
        let t = Transform::identity();
        let quad = EdgeAAQuad::from_rect(r(0.0, 0.0, 10.0, 10.0), AAFlags::NONE);
        let inst = encode(&params(&t, Geometry::EdgeAAQuad(quad), None), 0);
        assert_eq!(inst.center[3], 0.0);
        assert_eq!(inst.x_radii_or_flags, [0.0; 4]);
    }

    #[test]
    fn matrix_columns_skip_z() {
        let t = Transform::translate(5.0, 6.0);
        let inst = encode(&rect_params(&t, r(0.0, 0.0, 10.0, 10.0), None), 0);
        assert_eq!(inst.mat, [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [5.0, 6.0, 1.0]]);
    }

    // ── writing ───────────────────────────────────────────────────────────

    #[test]
    fn draws_one_indexed_instance_per_shape() {
        let mut m = CpuBufferManager::default();
        let step = AnalyticRRectStep::new(&mut m);
        assert_eq!(step.vertex_stride(), 24);
        assert_eq!(step.instance_stride(), 108);

        let t = Transform::identity();
        let mut cmds = DrawPassCommands::new();
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            w.new_pipeline_state(
                step.primitive(),
                step.static_stride(),
                step.append_stride(),
                step.render_state(),
                BarrierType::None,
            );
            step.write_vertices(&mut w, &rect_params(&t, r(0.0, 0.0, 10.0, 10.0), None), 0);
            step.write_vertices(&mut w, &rect_params(&t, r(20.0, 0.0, 30.0, 10.0), None), 1);
        }
        let draws: Vec<_> = cmds.iter().filter(|c| c.is_draw()).collect();
        assert_eq!(draws.len(), 1);
        match *draws[0] {
            DrawCommand::DrawIndexedInstanced { index_count, instance_count, .. } => {
                assert_eq!(index_count, 114);
                assert_eq!(instance_count, 2);
            }
            ref other => panic!("unexpected {other:?}"),
        }
    }
}
