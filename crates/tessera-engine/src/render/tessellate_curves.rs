//! Stencils the area between each curve of a path and its chord.
//!
//! Every non-line segment becomes one instance of the shared curve template,
//! drawn at the largest resolve level any instance in the batch needs.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use super::middle_out_fan::LOCAL_TO_DEVICE;
use super::step::{RenderStep, StepDesc, StepKind};
use crate::draw::DrawParams;
use crate::draw_writer::{DrawWriter, DynamicInstances};
use crate::geom::FillType;
use crate::gpu::depth_stencil::stencil_pass;
use crate::gpu::{
    attribute_stride, Attribute, BindBufferInfo, DrawBufferManager, PrimitiveType, RenderStateFlags,
    StaticBufferManager, StepFlags, VertexAttribType, VertexWriter,
};
use crate::tessellate::fixed_count::{write_curve_template, CURVE_INDEX_BYTES, CURVE_VERTEX_BYTES};
use crate::tessellate::{curve_patches, CurveCount, Patch, TemplateVertex};

pub const VERTEX_WGSL: &str = concat!(
    include_str!("shaders/common.wgsl"),
    include_str!("shaders/tessellate.wgsl"),
    include_str!("shaders/tessellate_curves.wgsl"),
);

pub(crate) const TEMPLATE_ATTRS: [Attribute; 1] =
    [Attribute::new("resolveLevelAndIndex", VertexAttribType::Float2)];

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CurveInstance {
    pub p01: [f32; 4],
    pub p23: [f32; 4],
    pub curve_type: f32,
    pub depth: f32,
    pub ssbo_index: u32,
}

const INSTANCE_ATTRS: [Attribute; 5] = [
    Attribute::new("p01", VertexAttribType::Float4),
    Attribute::new("p23", VertexAttribType::Float4),
    Attribute::new("curveType", VertexAttribType::Float),
    Attribute::new("depth", VertexAttribType::Float),
    Attribute::new("ssboIndex", VertexAttribType::UInt),
];

const_assert_eq!(attribute_stride(&TEMPLATE_ATTRS) as usize, size_of::<TemplateVertex>());
const_assert_eq!(attribute_stride(&INSTANCE_ATTRS) as usize, size_of::<CurveInstance>());

#[derive(Debug)]
pub struct TessellateCurvesStep {
    vertices: BindBufferInfo,
    indices: BindBufferInfo,
}

impl TessellateCurvesStep {
    pub fn new<S: StaticBufferManager + ?Sized>(static_buffers: &mut S, fill: FillType) -> RenderStep {
        let mut vbytes = vec![0u8; CURVE_VERTEX_BYTES as usize];
        let mut ibytes = vec![0u8; CURVE_INDEX_BYTES as usize];
        write_curve_template(&mut VertexWriter::new(&mut vbytes), &mut VertexWriter::new(&mut ibytes));
        let (vertices, mut vw) = static_buffers.get_vertex_writer(CURVE_VERTEX_BYTES);
        vw.write_slice(&vbytes);
        let (indices, mut iw) = static_buffers.get_index_writer(CURVE_INDEX_BYTES);
        iw.write_slice(&ibytes);

        let desc = StepDesc {
            name: format!("TessellateCurvesRenderStep[{}]", fill.name()),
            flags: StepFlags::REQUIRES_MSAA | StepFlags::STATIC_TEMPLATE,
            uniforms: &LOCAL_TO_DEVICE,
            primitive: PrimitiveType::Triangles,
            depth_stencil: stencil_pass(fill),
            render_state: RenderStateFlags::FIXED_BUFFERS | RenderStateFlags::APPEND_DYNAMIC_INSTANCES,
            vertex_attrs: &TEMPLATE_ATTRS,
            instance_attrs: &INSTANCE_ATTRS,
            varyings: &[],
        };
        RenderStep::new(desc, StepKind::TessellateCurves(Self { vertices, indices }))
    }

    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        let Some(shape) = params.geometry().shape() else {
            debug_assert!(false, "curve tessellation needs a shape");
            return;
        };
        let depth = params.order().depth_as_float();
        let path = shape.as_path();
        let mut instances = DynamicInstances::<_, CurveCount>::new(writer, self.vertices, self.indices);
        for contour in path.contours() {
            for patch in curve_patches(&contour, params.transform()) {
                instances.append(patch.resolve_level, 1).write(encode(&patch, depth, ssbo_index));
            }
        }
    }
}

pub fn encode(patch: &Patch, depth: f32, ssbo_index: u32) -> CurveInstance {
    CurveInstance {
        p01: patch.p01(),
        p23: patch.p23(),
        curve_type: patch.curve_type.as_f32(),
        depth,
        ssbo_index,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Clip, CompressedPaintersOrder, DrawOrder, Geometry, PaintersDepth};
    use crate::geom::{Path, RRect, Rect, Shape, Transform, Vec2};
    use crate::gpu::{BarrierType, CpuBufferManager, DrawCommand, DrawPassCommands};
    use crate::tessellate::fixed_count::{curve_triangle_count, CURVE_INDEX_COUNT};

    fn params(t: &Transform, path: Path) -> DrawParams<'_> {
        let shape = Shape::path(path);
        let clip = Clip::new(t.map_rect(shape.bounds()), Rect::new(0.0, 0.0, 1024.0, 1024.0), false);
        DrawParams::new(t, Geometry::Shape(shape), clip, DrawOrder::new(PaintersDepth(2), CompressedPaintersOrder(0)), None)
    }

    fn draws(step: &RenderStep, m: &mut CpuBufferManager, draws: &[DrawParams<'_>]) -> Vec<DrawCommand> {
        let mut cmds = DrawPassCommands::new();
        {
            let mut w = DrawWriter::new(&mut cmds, m);
            w.new_pipeline_state(
                step.primitive(),
                step.static_stride(),
                step.append_stride(),
                step.render_state(),
                BarrierType::None,
            );
            for (i, p) in draws.iter().enumerate() {
                step.write_vertices(&mut w, p, i as u32);
            }
        }
        cmds.iter().filter(|c| c.is_draw()).copied().collect()
    }

    #[test]
    fn layout() {
        let mut m = CpuBufferManager::default();
        let step = TessellateCurvesStep::new(&mut m, FillType::EvenOdd);
        assert_eq!(step.name(), "TessellateCurvesRenderStep[evenodd]");
        assert_eq!(step.static_stride(), 8);
        assert_eq!(step.append_stride(), 44);
        assert!(step.requires_msaa());
        assert!(!step.performs_shading());
    }

    #[test]
    fn rrect_curves_draw_at_worst_level() {
        let mut m = CpuBufferManager::default();
        let step = TessellateCurvesStep::new(&mut m, FillType::Winding);
        let t = Transform::identity();
        let path = Path::from_rrect(&RRect::from_rect_xy(Rect::new(0.0, 0.0, 400.0, 300.0), 80.0, 40.0));

        let contours = path.contours();
        let worst = curve_patches(&contours[0], &t).map(|p| p.resolve_level).max().unwrap();
        let expected = curve_triangle_count(worst.max(1)) * 3;

        let cmds = draws(&step, &mut m, &[params(&t, path.clone())]);
        assert!(matches!(
            cmds.as_slice(),
            [DrawCommand::DrawIndexedInstanced { instance_count: 4, index_count, .. }] if *index_count == expected
        ));
    }

    #[test]
    fn batch_count_grows_with_later_draws() {
        let mut m = CpuBufferManager::default();
        let step = TessellateCurvesStep::new(&mut m, FillType::Winding);
        let t = Transform::identity();

        let mut gentle = Path::new();
        gentle
            .move_to(Vec2::new(0.0, 0.0))
            .quad_to(Vec2::new(1.0, 0.5), Vec2::new(2.0, 0.0))
            .close();
        let mut sharp = Path::new();
        sharp
            .move_to(Vec2::new(0.0, 0.0))
            .cubic_to(Vec2::new(900.0, 900.0), Vec2::new(-900.0, 900.0), Vec2::new(10.0, 0.0))
            .close();

        let cmds = draws(&step, &mut m, &[params(&t, gentle), params(&t, sharp)]);
        assert!(matches!(
            cmds.as_slice(),
            [DrawCommand::DrawIndexedInstanced { instance_count: 2, index_count: CURVE_INDEX_COUNT, .. }]
        ));
    }

    #[test]
    fn polygons_emit_nothing() {
        let mut m = CpuBufferManager::default();
        let step = TessellateCurvesStep::new(&mut m, FillType::Winding);
        let t = Transform::identity();
        let cmds = draws(&step, &mut m, &[params(&t, Path::from_rect(Rect::new(0.0, 0.0, 5.0, 5.0)))]);
        assert!(cmds.is_empty());
    }

    #[test]
    fn encode_copies_patch_points() {
        let patch = Patch {
            points: [Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), Vec2::new(5.0, 6.0), Vec2::new(5.0, 6.0)],
            curve_type: crate::tessellate::CurveType::Quadratic,
            resolve_level: 2,
        };
        let inst = encode(&patch, 0.25, 7);
        assert_eq!(inst.p01, [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(inst.p23, [5.0, 6.0, 5.0, 6.0]);
        assert_eq!(inst.curve_type, 1.0);
        assert_eq!(inst.ssbo_index, 7);
    }
}
