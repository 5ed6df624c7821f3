//! Covers a draw's bounds with one quad.
//!
//! Used as the cover pass of the stencil-then-cover renderers and, with
//! direct depth testing, to fill axis-aligned bounds without anti-aliasing.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::aa::instance_matrix;
use super::step::{RenderStep, StepDesc, StepKind};
use crate::draw::DrawParams;
use crate::draw_writer::{DrawWriter, Instances};
use crate::gpu::{
    attribute_stride, Attribute, BindBufferInfo, DepthStencilSettings, DrawBufferManager, PrimitiveType,
    RenderStateFlags, StepFlags, VertexAttribType,
};

pub const VERTEX_WGSL: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/cover_bounds.wgsl"));

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct BoundsInstance {
    /// LTRB in local space, or RBLT in device space.
    pub bounds: [f32; 4],
    pub depth: f32,
    pub ssbo_index: u32,
    pub mat: [[f32; 3]; 3],
}

const INSTANCE_ATTRS: [Attribute; 6] = [
    Attribute::new("bounds", VertexAttribType::Float4),
    Attribute::new("depth", VertexAttribType::Float),
    Attribute::new("ssboIndex", VertexAttribType::UInt),
    Attribute::new("mat0", VertexAttribType::Float3),
    Attribute::new("mat1", VertexAttribType::Float3),
    Attribute::new("mat2", VertexAttribType::Float3),
];

const_assert_eq!(attribute_stride(&INSTANCE_ATTRS) as usize, size_of::<BoundsInstance>());

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[derive(Debug)]
pub struct CoverBoundsStep;

impl CoverBoundsStep {
    /// A cover step named `name` running with `depth_stencil`.
    pub fn new(name: &str, depth_stencil: DepthStencilSettings) -> RenderStep {
        let desc = StepDesc {
            name: format!("CoverBoundsRenderStep[{name}]"),
            flags: StepFlags::PERFORMS_SHADING,
            uniforms: &[],
            primitive: PrimitiveType::TriangleStrip,
            depth_stencil,
            render_state: RenderStateFlags::APPEND_INSTANCES,
            vertex_attrs: &[],
            instance_attrs: &INSTANCE_ATTRS,
            varyings: &[],
        };
        RenderStep::new(desc, StepKind::CoverBounds(Self))
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let instance = encode(params, ssbo_index);
        let mut instances = Instances::new(writer, BindBufferInfo::default(), BindBufferInfo::default(), 4);
        instances.append(1).write(instance);
    }
}

pub fn encode(params: &DrawParams<'_>, ssbo_index: u32) -> BoundsInstance {
    let depth = params.order().depth_as_float();
    if params.geometry().is_inverse_fill() {
        // Flipped edges mark device-space bounds.
        let b = params.clip().draw_bounds();
        BoundsInstance { bounds: [b.right, b.bottom, b.left, b.top], depth, ssbo_index, mat: IDENTITY }
    } else {
        BoundsInstance {
            bounds: params.local_bounds().ltrb(),
            depth,
            ssbo_index,
            mat: instance_matrix(params.transform()),
        }
    }
}
