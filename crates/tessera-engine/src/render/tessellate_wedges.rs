//! Draws every segment of a path as a wedge reaching back to its contour's
//! midpoint.
//!
//! Wedges need no separate inner-polygon pass, which makes them cheaper than
//! curves plus fan for small paths. A convex path's wedges never overlap, so
//! they can shade directly instead of stenciling.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::middle_out_fan::LOCAL_TO_DEVICE;
use super::step::{RenderStep, StepDesc, StepKind};
use super::tessellate_curves::TEMPLATE_ATTRS;
use crate::draw::DrawParams;
use crate::draw_writer::{DrawWriter, DynamicInstances};
use crate::geom::{FillType, Vec2};
use crate::gpu::depth_stencil::{stencil_pass, DIRECT_DEPTH_GREATER_PASS};
use crate::gpu::{
    attribute_stride, Attribute, BindBufferInfo, DrawBufferManager, PrimitiveType, RenderStateFlags,
    StaticBufferManager, StepFlags, VertexAttribType, VertexWriter,
};
use crate::tessellate::fixed_count::{write_wedge_template, WEDGE_INDEX_BYTES, WEDGE_VERTEX_BYTES};
use crate::tessellate::{wedge_patches, Patch, WedgeCount};

pub const VERTEX_WGSL: &str = concat!(
    include_str!("shaders/common.wgsl"),
    include_str!("shaders/tessellate.wgsl"),
    include_str!("shaders/tessellate_wedges.wgsl"),
);

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct WedgeInstance {
    pub p01: [f32; 4],
    pub p23: [f32; 4],
    pub fan_point: [f32; 2],
    pub curve_type: f32,
    pub depth: f32,
    pub ssbo_index: u32,
}

const INSTANCE_ATTRS: [Attribute; 6] = [
    Attribute::new("p01", VertexAttribType::Float4),
    Attribute::new("p23", VertexAttribType::Float4),
    Attribute::new("fanPoint", VertexAttribType::Float2),
    Attribute::new("curveType", VertexAttribType::Float),
    Attribute::new("depth", VertexAttribType::Float),
    Attribute::new("ssboIndex", VertexAttribType::UInt),
];

const_assert_eq!(attribute_stride(&INSTANCE_ATTRS) as usize, size_of::<WedgeInstance>());

/// How the wedges reach the color target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WedgeMode {
    /// Accumulate winding counts for a later cover pass.
    Stencil(FillType),
    /// Shade directly; only valid for convex paths.
    Convex,
}

#[derive(Debug)]
pub struct TessellateWedgesStep {
    vertices: BindBufferInfo,
    indices: BindBufferInfo,
}

impl TessellateWedgesStep {
    pub fn new<S: StaticBufferManager + ?Sized>(static_buffers: &mut S, mode: WedgeMode) -> RenderStep {
        let mut vbytes = vec![0u8; WEDGE_VERTEX_BYTES as usize];
        let mut ibytes = vec![0u8; WEDGE_INDEX_BYTES as usize];
        write_wedge_template(&mut VertexWriter::new(&mut vbytes), &mut VertexWriter::new(&mut ibytes));
        let (vertices, mut vw) = static_buffers.get_vertex_writer(WEDGE_VERTEX_BYTES);
        vw.write_slice(&vbytes);
        let (indices, mut iw) = static_buffers.get_index_writer(WEDGE_INDEX_BYTES);
        iw.write_slice(&ibytes);

        let (name, flags, depth_stencil) = match mode {
            WedgeMode::Stencil(fill) => (fill.name(), StepFlags::REQUIRES_MSAA, stencil_pass(fill)),
            WedgeMode::Convex => (
                "convex",
                StepFlags::REQUIRES_MSAA | StepFlags::PERFORMS_SHADING,
                DIRECT_DEPTH_GREATER_PASS,
            ),
        };
        let desc = StepDesc {
            name: format!("TessellateWedgesRenderStep[{name}]"),
            flags: flags | StepFlags::STATIC_TEMPLATE,
            uniforms: &LOCAL_TO_DEVICE,
            primitive: PrimitiveType::Triangles,
            depth_stencil,
            render_state: RenderStateFlags::FIXED_BUFFERS | RenderStateFlags::APPEND_DYNAMIC_INSTANCES,
            vertex_attrs: &TEMPLATE_ATTRS,
            instance_attrs: &INSTANCE_ATTRS,
            varyings: &[],
        };
        RenderStep::new(desc, StepKind::TessellateWedges(Self { vertices, indices }))
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let Some(shape) = params.geometry().shape() else {
            debug_assert!(false, "wedge tessellation needs a shape");
            return;
        };
        let depth = params.order().depth_as_float();
        let path = shape.as_path();
        let mut instances = DynamicInstances::<_, WedgeCount>::new(writer, self.vertices, self.indices);
        for contour in path.contours() {
            let fan_point = contour.midpoint();
            for patch in wedge_patches(&contour, params.transform()) {
                instances
                    .append(patch.resolve_level, 1)
                    .write(encode(&patch, fan_point, depth, ssbo_index));
            }
        }
    }
}

pub fn encode(patch: &Patch, fan_point: Vec2, depth: f32, ssbo_index: u32) -> WedgeInstance {
    WedgeInstance {
        p01: patch.p01(),
        p23: patch.p23(),
        fan_point: fan_point.to_array(),
        curve_type: patch.curve_type.as_f32(),
        depth,
        ssbo_index,
    }
}
