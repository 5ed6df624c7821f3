//! Single-pass analytic AA for convex quads with per-edge AA toggles.
//!
//! A lighter sibling of the analytic rrect step: no radii and no strokes, so
//! each corner needs only three outset vertices and one inset vertex. Edges
//! without AA collapse their outsets onto the quad's own coordinates, which
//! lets adjacent tiles seam exactly.

use core::f32::consts::FRAC_1_SQRT_2;

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::aa::{clockwise_quad, instance_matrix, quad_center};
use super::step::{RenderStep, StepDesc, StepKind};
use crate::draw::{DrawParams, Geometry};
use crate::draw_writer::{DrawWriter, Instances};
use crate::geom::{AAFlags, EdgeAAQuad, ShapeKind};
use crate::gpu::depth_stencil::DIRECT_DEPTH_GREATER_PASS;
use crate::gpu::{
    attribute_stride, Attribute, BindBufferInfo, DrawBufferManager, PrimitiveType, RenderStateFlags,
    SlType, StaticBufferManager, StepFlags, Varying, VertexAttribType,
};

pub const VERTEX_WGSL: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/per_edge_aa_quad.wgsl"));
pub const COVERAGE_WGSL: &str = include_str!("shaders/per_edge_aa_quad_coverage.wgsl");

pub const CORNER_VERTEX_COUNT: usize = 4;
pub const VERTEX_COUNT: usize = 4 * CORNER_VERTEX_COUNT;
pub const INDEX_COUNT: usize = 29;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub normal: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    /// 255 for an anti-aliased edge, in L, T, R, B order.
    pub edge_flags: [u8; 4],
    pub quad_xs: [f32; 4],
    pub quad_ys: [f32; 4],
    pub center: [f32; 2],
    pub depth: f32,
    pub ssbo_index: u32,
    pub mat: [[f32; 3]; 3],
}

const VERTEX_ATTRS: [Attribute; 1] = [Attribute::new("normal", VertexAttribType::Float2)];

const INSTANCE_ATTRS: [Attribute; 9] = [
    Attribute::new("edgeFlags", VertexAttribType::UByte4Norm),
    Attribute::new("quadXs", VertexAttribType::Float4),
    Attribute::new("quadYs", VertexAttribType::Float4),
    Attribute::new("center", VertexAttribType::Float2),
    Attribute::new("depth", VertexAttribType::Float),
    Attribute::new("ssboIndex", VertexAttribType::UInt),
    Attribute::new("mat0", VertexAttribType::Float3),
    Attribute::new("mat1", VertexAttribType::Float3),
    Attribute::new("mat2", VertexAttribType::Float3),
];

const VARYINGS: [Varying; 1] = [Varying::new("edgeDistances", SlType::Float4)];

const_assert_eq!(attribute_stride(&VERTEX_ATTRS) as usize, size_of::<QuadVertex>());
const_assert_eq!(attribute_stride(&INSTANCE_ATTRS) as usize, size_of::<QuadInstance>());

const H: f32 = FRAC_1_SQRT_2;

/// Top-left corner: outsets along the left edge, the diagonal and the top
/// edge, then the inset.
const TL_CORNER: [QuadVertex; CORNER_VERTEX_COUNT] = [
    QuadVertex { normal: [-1.0, 0.0] },
    QuadVertex { normal: [-H, -H] },
    QuadVertex { normal: [0.0, -1.0] },
    QuadVertex { normal: [0.0, 0.0] },
];

pub fn template_vertices() -> Vec<QuadVertex> {
    let mut out = Vec::with_capacity(VERTEX_COUNT);
    let mut corner = TL_CORNER;
    for _ in 0..4 {
        out.extend_from_slice(&corner);
        for v in &mut corner {
            let [x, y] = v.normal;
            v.normal = [-y, x];
        }
    }
    out
}

/// One strip: the outset ramp of every corner and edge, then two triangles
/// across the four insets.
pub fn template_indices() -> Vec<u16> {
    const N: u16 = CORNER_VERTEX_COUNT as u16;
    const TL: u16 = 0;
    const TR: u16 = N;
    const BR: u16 = 2 * N;
    const BL: u16 = 3 * N;

    let mut out = Vec::with_capacity(INDEX_COUNT);
    for corner in 0..4 {
        let c = corner * N;
        let n = (corner + 1) % 4 * N;
        out.extend([c + 1, c + 2, c + 3, n, n + 3, n + 1]);
    }
    out.push(TL + 3);
    out.extend([TL + 3, TR + 3, BL + 3, BR + 3]);
    debug_assert_eq!(out.len(), INDEX_COUNT);
    out
}

#[derive(Debug)]
pub struct PerEdgeAAQuadStep {
    vertices: BindBufferInfo,
    indices: BindBufferInfo,
}

impl PerEdgeAAQuadStep {
    pub fn new<S: StaticBufferManager + ?Sized>(static_buffers: &mut S) -> RenderStep {
        let vertices = template_vertices();
        let (vertex_binding, mut vw) = static_buffers.get_vertex_writer(size_of_val(vertices.as_slice()) as u32);
        vw.write_slice(&vertices);

        let indices = template_indices();
        let (index_binding, mut iw) = static_buffers.get_index_writer(size_of_val(indices.as_slice()) as u32);
        iw.write_slice(&indices);

        let desc = StepDesc {
            name: "PerEdgeAAQuadRenderStep".to_owned(),
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
            StepKind::PerEdgeAAQuad(Self { vertices: vertex_binding, indices: index_binding }),
        )
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let Some(instance) = encode(params, ssbo_index) else {
            debug_assert!(false, "per-edge AA quad cannot draw {:?}", params.geometry());
            return;
        };
        let mut instances = Instances::new(writer, self.vertices, self.indices, INDEX_COUNT as u32);
        instances.append(1).write(instance);
    }
}

/// The quad a draw covers: an edge-AA quad as given, or a filled rect with
/// every edge anti-aliased.
fn draw_quad(geometry: &Geometry) -> Option<EdgeAAQuad> {
    match geometry {
        Geometry::EdgeAAQuad(quad) => Some(*quad),
        Geometry::Shape(shape) => match shape.kind() {
            ShapeKind::Rect(rect) => Some(EdgeAAQuad::from_rect(*rect, AAFlags::ALL)),
            _ => None,
        },
        _ => None,
    }
}

/// Builds the instance for one draw, with the quad normalized to clockwise.
pub fn encode(params: &DrawParams<'_>, ssbo_index: u32) -> Option<QuadInstance> {
    debug_assert!(!params.is_stroke());
    let quad = draw_quad(params.geometry())?;
    let cw = clockwise_quad(&quad);
    let center = quad_center(&quad);
    Some(QuadInstance {
        edge_flags: cw.edges.map(|aa| if aa { 255 } else { 0 }),
        quad_xs: cw.xs,
        quad_ys: cw.ys,
        center: center.to_array(),
        depth: params.order().depth_as_float(),
        ssbo_index,
        mat: instance_matrix(params.transform()),
    })
}
