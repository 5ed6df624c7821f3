//! Translation of backend-neutral pipeline descriptions into wgpu types.

use smallvec::SmallVec;

use crate::gpu::{
    Attribute, CompareOp, DepthStencilSettings, PrimitiveType, StencilFace, StencilOp, VertexAttribType,
};
use crate::render::RenderStep;

pub fn primitive_topology(primitive: PrimitiveType) -> wgpu::PrimitiveTopology {
    match primitive {
        PrimitiveType::Triangles => wgpu::PrimitiveTopology::TriangleList,
        PrimitiveType::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
        PrimitiveType::Points => wgpu::PrimitiveTopology::PointList,
    }
}

/// Primitive state of a step. Clockwise triangles are front facing, which
/// is what the winding stencil counts on.
pub fn primitive_state(primitive: PrimitiveType) -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: primitive_topology(primitive),
        strip_index_format: match primitive {
            PrimitiveType::TriangleStrip => Some(wgpu::IndexFormat::Uint16),
            _ => None,
        },
        front_face: wgpu::FrontFace::Cw,
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

pub fn vertex_format(ty: VertexAttribType) -> wgpu::VertexFormat {
    match ty {
        VertexAttribType::Float => wgpu::VertexFormat::Float32,
        VertexAttribType::Float2 => wgpu::VertexFormat::Float32x2,
        VertexAttribType::Float3 => wgpu::VertexFormat::Float32x3,
        VertexAttribType::Float4 => wgpu::VertexFormat::Float32x4,
        VertexAttribType::Int => wgpu::VertexFormat::Sint32,
        VertexAttribType::UInt => wgpu::VertexFormat::Uint32,
        VertexAttribType::UShort2 => wgpu::VertexFormat::Uint16x2,
        VertexAttribType::UByte4Norm => wgpu::VertexFormat::Unorm8x4,
    }
}

pub fn compare_function(op: CompareOp) -> wgpu::CompareFunction {
    match op {
        CompareOp::Always => wgpu::CompareFunction::Always,
        CompareOp::Never => wgpu::CompareFunction::Never,
        CompareOp::Less => wgpu::CompareFunction::Less,
        CompareOp::LEqual => wgpu::CompareFunction::LessEqual,
        CompareOp::Equal => wgpu::CompareFunction::Equal,
        CompareOp::NotEqual => wgpu::CompareFunction::NotEqual,
        CompareOp::Greater => wgpu::CompareFunction::Greater,
        CompareOp::GEqual => wgpu::CompareFunction::GreaterEqual,
    }
}

pub fn stencil_operation(op: StencilOp) -> wgpu::StencilOperation {
    match op {
        StencilOp::Keep => wgpu::StencilOperation::Keep,
        StencilOp::Zero => wgpu::StencilOperation::Zero,
        StencilOp::Replace => wgpu::StencilOperation::Replace,
        StencilOp::Invert => wgpu::StencilOperation::Invert,
        StencilOp::IncWrap => wgpu::StencilOperation::IncrementWrap,
        StencilOp::DecWrap => wgpu::StencilOperation::DecrementWrap,
        StencilOp::IncClamp => wgpu::StencilOperation::IncrementClamp,
        StencilOp::DecClamp => wgpu::StencilOperation::DecrementClamp,
    }
}

fn stencil_face(face: &StencilFace) -> wgpu::StencilFaceState {
    wgpu::StencilFaceState {
        compare: compare_function(face.compare),
        fail_op: stencil_operation(face.stencil_fail),
        depth_fail_op: stencil_operation(face.depth_fail),
        pass_op: stencil_operation(face.depth_stencil_pass),
    }
}

/// Depth/stencil state for an attachment of `format`.
///
/// wgpu has one read and write mask for both faces; the front face's masks
/// are used.
pub fn depth_stencil_state(settings: &DepthStencilSettings, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    let stencil = if settings.stencil_test {
        wgpu::StencilState {
            front: stencil_face(&settings.front),
            back: stencil_face(&settings.back),
            read_mask: settings.front.read_mask,
            write_mask: settings.front.write_mask,
        }
    } else {
        wgpu::StencilState::default()
    };
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: settings.depth_write,
        depth_compare: compare_function(settings.depth_compare),
        stencil,
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Tightly packed attributes starting at shader location `first_location`.
pub fn vertex_attributes(attrs: &[Attribute], first_location: u32) -> Vec<wgpu::VertexAttribute> {
    let mut offset = 0u64;
    attrs
        .iter()
        .zip(first_location..)
        .map(|(attr, shader_location)| {
            let out = wgpu::VertexAttribute { format: vertex_format(attr.ty), offset, shader_location };
            offset += attr.ty.size() as u64;
            out
        })
        .collect()
}

/// Vertex buffer layouts of a render step.
///
/// Per-vertex attributes come first when the step has any, so the instance
/// buffer sits in slot 1 for template steps and slot 0 for steps that derive
/// their vertices from the vertex index.
#[derive(Debug, Clone)]
pub struct StepVertexLayout {
    vertex: Vec<wgpu::VertexAttribute>,
    instance: Vec<wgpu::VertexAttribute>,
    vertex_stride: u64,
    instance_stride: u64,
}

impl StepVertexLayout {
    pub fn new(step: &RenderStep) -> Self {
        let vertex = vertex_attributes(step.vertex_attrs(), 0);
        let instance = vertex_attributes(step.instance_attrs(), vertex.len() as u32);
        Self {
            vertex,
            instance,
            vertex_stride: step.vertex_stride() as u64,
            instance_stride: step.instance_stride() as u64,
        }
    }

    /// Slot the instance buffer is bound to.
    #[inline]
    pub fn instance_slot(&self) -> u32 {
        if self.vertex.is_empty() { 0 } else { 1 }
    }

    pub fn buffers(&self) -> SmallVec<[wgpu::VertexBufferLayout<'_>; 2]> {
        let mut out = SmallVec::new();
        if !self.vertex.is_empty() {
            out.push(wgpu::VertexBufferLayout {
                array_stride: self.vertex_stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.vertex,
            });
        }
        if !self.instance.is_empty() {
            out.push(wgpu::VertexBufferLayout {
                array_stride: self.instance_stride,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &self.instance,
            });
        }
        out
    }
}
