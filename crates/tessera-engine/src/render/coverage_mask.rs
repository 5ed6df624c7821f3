//! Draws a mask stored in an atlas texture over its device-space bounds.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::step::{RenderStep, StepDesc, StepKind};
use crate::draw::{DrawParams, Geometry, MaskShape};
use crate::draw_writer::{DrawWriter, Instances};
use crate::geom::Vec2;
use crate::gpu::depth_stencil::DIRECT_DEPTH_GREATER_PASS;
use crate::gpu::{
    attribute_stride, Attribute, BindBufferInfo, DrawBufferManager, Filter, PipelineDataGatherer,
    PrimitiveType, RenderStateFlags, SlType, StepFlags, Uniform, Varying, VertexAttribType,
};

pub const VERTEX_WGSL: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/coverage_mask.wgsl"));
pub const COVERAGE_WGSL: &str = include_str!("shaders/coverage_mask_coverage.wgsl");

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MaskInstance {
    pub device_bounds: [f32; 4],
    pub atlas_origin: [f32; 2],
    pub invert: f32,
    pub depth: f32,
    pub ssbo_index: u32,
}

const INSTANCE_ATTRS: [Attribute; 5] = [
    Attribute::new("deviceBounds", VertexAttribType::Float4),
    Attribute::new("atlasOrigin", VertexAttribType::Float2),
    Attribute::new("invert", VertexAttribType::Float),
    Attribute::new("depth", VertexAttribType::Float),
    Attribute::new("ssboIndex", VertexAttribType::UInt),
];

const UNIFORMS: [Uniform; 1] = [Uniform::new("atlasSizeInv", SlType::Float2)];

const VARYINGS: [Varying; 2] = [Varying::new("atlasCoord", SlType::Float2), Varying::new("invert", SlType::Float)];

const_assert_eq!(attribute_stride(&INSTANCE_ATTRS) as usize, size_of::<MaskInstance>());

#[derive(Debug)]
pub struct CoverageMaskStep;

impl CoverageMaskStep {
    pub fn new() -> RenderStep {
        let desc = StepDesc {
            name: "CoverageMaskRenderStep".to_owned(),
            flags: StepFlags::PERFORMS_SHADING | StepFlags::EMITS_COVERAGE | StepFlags::HAS_TEXTURES,
            uniforms: &UNIFORMS,
            primitive: PrimitiveType::TriangleStrip,
            depth_stencil: DIRECT_DEPTH_GREATER_PASS,
            render_state: RenderStateFlags::APPEND_INSTANCES,
            vertex_attrs: &[],
            instance_attrs: &INSTANCE_ATTRS,
            varyings: &VARYINGS,
        };
        RenderStep::new(desc, StepKind::CoverageMask(Self))
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let Some(mask) = mask(params) else {
            debug_assert!(false, "coverage mask step needs a mask");
            return;
        };
        let instance = encode(mask, params.order().depth_as_float(), ssbo_index);
        let mut instances = Instances::new(writer, BindBufferInfo::default(), BindBufferInfo::default(), 4);
        instances.append(1).write(instance);
    }

    pub fn write_uniforms_and_textures(&self, params: &DrawParams<'_>, gatherer: &mut PipelineDataGatherer) {
        let Some(mask) = mask(params) else {
            return;
        };
        let size = mask.atlas_size;
        let inv = |v: f32| if v > 0.0 { 1.0 / v } else { 0.0 };
        gatherer.write_vec2(Vec2::new(inv(size.x), inv(size.y)));
        gatherer.add_texture(mask.texture, Filter::Nearest);
    }
}

fn mask<'p>(params: &'p DrawParams<'_>) -> Option<&'p MaskShape> {
    match params.geometry() {
        Geometry::CoverageMask(mask) | Geometry::AtlasShape(mask) => Some(mask),
        _ => None,
    }
}

pub fn encode(mask: &MaskShape, depth: f32, ssbo_index: u32) -> MaskInstance {
    MaskInstance {
        device_bounds: mask.device_bounds.ltrb(),
        atlas_origin: mask.atlas_origin.to_array(),
        invert: if mask.inverted { 1.0 } else { 0.0 },
        depth,
        ssbo_index,
    }
}
