//! Draws caller-supplied meshes.
//!
//! Indexed, strip and fan meshes are expanded to a plain triangle list so
//! consecutive meshes batch into one draw. There is one step per combination
//! of the optional color and texture coordinate attributes.

use super::middle_out_fan::LOCAL_TO_DEVICE;
use super::step::{RenderStep, StepDesc, StepKind};
use crate::draw::{DrawParams, Geometry, VerticesBlob};
use crate::draw_writer::{DrawWriter, Vertices};
use crate::gpu::depth_stencil::DIRECT_DEPTH_GEQUAL_PASS;
use crate::gpu::{
    Attribute, DrawBufferManager, PrimitiveType, RenderStateFlags, SlType, StepFlags, Varying,
    VertexAttribType,
};

const POSITION: Attribute = Attribute::new("position", VertexAttribType::Float2);
const DEPTH: Attribute = Attribute::new("depth", VertexAttribType::Float);
const SSBO_INDEX: Attribute = Attribute::new("ssboIndex", VertexAttribType::UInt);
const COLOR: Attribute = Attribute::new("vertColor", VertexAttribType::UByte4Norm);
const TEX_COORDS: Attribute = Attribute::new("texCoords", VertexAttribType::Float2);

const ATTRS: [Attribute; 3] = [POSITION, DEPTH, SSBO_INDEX];
const ATTRS_COLOR: [Attribute; 4] = [POSITION, DEPTH, SSBO_INDEX, COLOR];
const ATTRS_TEX: [Attribute; 4] = [POSITION, DEPTH, SSBO_INDEX, TEX_COORDS];
const ATTRS_COLOR_TEX: [Attribute; 5] = [POSITION, DEPTH, SSBO_INDEX, COLOR, TEX_COORDS];

const COLOR_VARYING: Varying = Varying::new("color", SlType::Half4);
const TEX_VARYING: Varying = Varying::new("texCoords", SlType::Float2);

const VARYINGS_COLOR: [Varying; 1] = [COLOR_VARYING];
const VARYINGS_TEX: [Varying; 1] = [TEX_VARYING];
const VARYINGS_COLOR_TEX: [Varying; 2] = [COLOR_VARYING, TEX_VARYING];

const WGSL: &str = concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/vertices.wgsl"));
const WGSL_COLOR: &str =
    concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/vertices_colors.wgsl"));
const WGSL_TEX: &str =
    concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/vertices_texcoords.wgsl"));
const WGSL_COLOR_TEX: &str =
    concat!(include_str!("shaders/common.wgsl"), include_str!("shaders/vertices_colors_texcoords.wgsl"));

#[derive(Debug)]
pub struct VerticesStep {
    colors: bool,
    tex_coords: bool,
}

impl VerticesStep {
    pub fn new(colors: bool, tex_coords: bool) -> RenderStep {
        let this = Self { colors, tex_coords };
        let (vertex_attrs, varyings): (&'static [Attribute], &'static [Varying]) = match (colors, tex_coords) {
            (false, false) => (&ATTRS, &[]),
            (true, false) => (&ATTRS_COLOR, &VARYINGS_COLOR),
            (false, true) => (&ATTRS_TEX, &VARYINGS_TEX),
            (true, true) => (&ATTRS_COLOR_TEX, &VARYINGS_COLOR_TEX),
        };
        let desc = StepDesc {
            name: format!("VerticesRenderStep[{}]", this.variant()),
            flags: StepFlags::PERFORMS_SHADING,
            uniforms: &LOCAL_TO_DEVICE,
            primitive: PrimitiveType::Triangles,
            depth_stencil: DIRECT_DEPTH_GEQUAL_PASS,
            render_state: RenderStateFlags::APPEND_VERTICES,
            vertex_attrs,
            instance_attrs: &[],
            varyings,
        };
        RenderStep::new(desc, StepKind::Vertices(this))
    }

    /// `tri`, `colors`, `texcoords` or `colors-texcoords`.
    pub fn variant(&self) -> &'static str {
        match (self.colors, self.tex_coords) {
            (false, false) => "tri",
            (true, false) => "colors",
            (false, true) => "texcoords",
            (true, true) => "colors-texcoords",
        }
    }

    pub fn vertex_shader(&self) -> &'static str {
        match (self.colors, self.tex_coords) {
            (false, false) => WGSL,
            (true, false) => WGSL_COLOR,
            (false, true) => WGSL_TEX,
            (true, true) => WGSL_COLOR_TEX,
        }
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let Geometry::Vertices(blob) = params.geometry() else {
            debug_assert!(false, "vertices step needs a vertex blob");
            return;
        };
        let order = blob.triangle_list();
        if order.is_empty() {
            return;
        }

        let depth = params.order().depth_as_float();
        let mut vertices = Vertices::new(writer);
        let mut vw = vertices.append(order.len() as u32);
        for &i in &order {
            let i = i as usize;
            vw.write(blob.positions[i].to_array()).write(depth).write(ssbo_index);
            if self.colors {
                vw.write(color_at(blob, i));
            }
            if self.tex_coords {
                vw.write(tex_coords_at(blob, i));
            }
        }
    }
}

/// Missing or short attribute arrays read as zero.
fn color_at(blob: &VerticesBlob, i: usize) -> [u8; 4] {
    blob.colors.as_ref().and_then(|c| c.get(i).copied()).unwrap_or_default()
}

fn tex_coords_at(blob: &VerticesBlob, i: usize) -> [f32; 2] {
    blob.tex_coords.as_ref().and_then(|t| t.get(i)).map_or([0.0; 2], |t| t.to_array())
}
