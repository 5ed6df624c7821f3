//! Stencils the inner polygon of every contour with middle-out triangles.
//!
//! Paired with [`TessellateCurvesStep`](super::tessellate_curves::TessellateCurvesStep),
//! which stencils the area between each curve and its chord; together they
//! produce the path's winding counts.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::step::{RenderStep, StepDesc, StepKind};
use crate::draw::DrawParams;
use crate::draw_writer::{DrawWriter, Vertices};
use crate::geom::FillType;
use crate::gpu::depth_stencil::stencil_pass;
use crate::gpu::{
    attribute_stride, Attribute, DrawBufferManager, PrimitiveType, RenderStateFlags, SlType, StepFlags,
    Uniform, VertexAttribType,
};
use crate::tessellate::middle_out;

pub const VERTEX_WGSL: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/middle_out_fan.wgsl"));

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct FanVertex {
    pub position: [f32; 2],
    pub depth: f32,
    pub ssbo_index: u32,
}

const VERTEX_ATTRS: [Attribute; 3] = [
    Attribute::new("position", VertexAttribType::Float2),
    Attribute::new("depth", VertexAttribType::Float),
    Attribute::new("ssboIndex", VertexAttribType::UInt),
];

pub(crate) const LOCAL_TO_DEVICE: [Uniform; 1] = [Uniform::new("localToDevice", SlType::Float4x4)];

const_assert_eq!(attribute_stride(&VERTEX_ATTRS) as usize, size_of::<FanVertex>());

#[derive(Debug)]
pub struct MiddleOutFanStep;

impl MiddleOutFanStep {
    pub fn new(fill: FillType) -> RenderStep {
        let desc = StepDesc {
            name: format!("MiddleOutFanRenderStep[{}]", fill.name()),
            flags: StepFlags::REQUIRES_MSAA,
            uniforms: &LOCAL_TO_DEVICE,
            primitive: PrimitiveType::Triangles,
            depth_stencil: stencil_pass(fill),
            render_state: RenderStateFlags::APPEND_VERTICES,
            vertex_attrs: &VERTEX_ATTRS,
            instance_attrs: &[],
            varyings: &[],
        };
        RenderStep::new(desc, StepKind::MiddleOutFan(Self))
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let Some(shape) = params.geometry().shape() else {
            debug_assert!(false, "middle-out fan needs a shape");
            return;
        };
        let path = shape.as_path();
        let triangles: Vec<_> = path
            .contours()
            .iter()
            .flat_map(|contour| middle_out::triangulate(&contour.polygon()))
            .collect();
        if triangles.is_empty() {
            return;
        }

        let depth = params.order().depth_as_float();
        let count = triangles.len() as u32 * 3;
        let mut vertices = Vertices::new(writer);
        let mut vw = vertices.append(count);
        for p in triangles.iter().flatten() {
            vw.write(FanVertex { position: p.to_array(), depth, ssbo_index });
        }
    }
}
