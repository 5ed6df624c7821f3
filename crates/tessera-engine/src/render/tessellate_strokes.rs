//! Stroke tessellation. The pipeline layout is declared so renderers can
//! name the step; geometry encoding is not implemented and draws routed here
//! are skipped.

use super::middle_out_fan::LOCAL_TO_DEVICE;
use super::step::{RenderStep, StepDesc, StepKind};
use crate::gpu::depth_stencil::DIRECT_DEPTH_GREATER_PASS;
use crate::gpu::{PrimitiveType, RenderStateFlags, StepFlags};

#[derive(Debug)]
pub struct TessellateStrokesStep;

impl TessellateStrokesStep {
    pub fn new() -> RenderStep {
        let desc = StepDesc {
            name: "TessellateStrokesRenderStep".to_owned(),
            flags: StepFlags::REQUIRES_MSAA | StepFlags::PERFORMS_SHADING,
            uniforms: &LOCAL_TO_DEVICE,
            primitive: PrimitiveType::TriangleStrip,
            depth_stencil: DIRECT_DEPTH_GREATER_PASS,
            render_state: RenderStateFlags::APPEND_INSTANCES,
            vertex_attrs: &[],
            instance_attrs: &[],
            varyings: &[],
        };
        RenderStep::new(desc, StepKind::TessellateStrokes(Self))
    }
}
