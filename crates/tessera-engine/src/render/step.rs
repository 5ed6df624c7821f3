use crate::draw::DrawParams;
use crate::draw_writer::DrawWriter;
use crate::geom::{Rect, Transform};
use crate::gpu::{
    attribute_stride, Attribute, DepthStencilSettings, DrawBufferManager, PipelineDataGatherer,
    PrimitiveType, RenderStateFlags, StepFlags, Uniform, Varying,
};

use super::analytic_rrect::AnalyticRRectStep;
use super::cover_bounds::CoverBoundsStep;
use super::coverage_mask::CoverageMaskStep;
use super::middle_out_fan::MiddleOutFanStep;
use super::per_edge_aa_quad::PerEdgeAAQuadStep;
use super::tessellate_curves::TessellateCurvesStep;
use super::tessellate_strokes::TessellateStrokesStep;
use super::tessellate_wedges::TessellateWedgesStep;
use super::text::{TextDirectStep, TextSdfStep};
use super::vertices::VerticesStep;

/// Pipeline-facing description of a render step.
#[derive(Debug, Clone)]
pub struct StepDesc {
    pub name: String,
    pub flags: StepFlags,
    pub uniforms: &'static [Uniform],
    pub primitive: PrimitiveType,
    pub depth_stencil: DepthStencilSettings,
    pub render_state: RenderStateFlags,
    pub vertex_attrs: &'static [Attribute],
    pub instance_attrs: &'static [Attribute],
    pub varyings: &'static [Varying],
}

/// The closed set of step implementations.
#[derive(Debug)]
pub enum StepKind {
    AnalyticRRect(AnalyticRRectStep),
    PerEdgeAAQuad(PerEdgeAAQuadStep),
    CoverBounds(CoverBoundsStep),
    MiddleOutFan(MiddleOutFanStep),
    TessellateCurves(TessellateCurvesStep),
    TessellateWedges(TessellateWedgesStep),
    TessellateStrokes(TessellateStrokesStep),
    TextDirect(TextDirectStep),
    TextSdf(TextSdfStep),
    Vertices(VerticesStep),
    CoverageMask(CoverageMaskStep),
}

/// One GPU pass of a draw: pipeline layout plus the routines that encode a
/// draw's geometry and uniforms for it.
///
/// Steps hold no per-draw state and are shared between renderers.
#[derive(Debug)]
pub struct RenderStep {
    desc: StepDesc,
    kind: StepKind,
}

impl RenderStep {
    pub fn new(desc: StepDesc, kind: StepKind) -> Self {
        debug_assert!(
            !desc.render_state.contains(RenderStateFlags::FIXED_BUFFERS) || !desc.vertex_attrs.is_empty(),
            "{}: fixed buffers without vertex attributes",
            desc.name
        );
        Self { desc, kind }
    }

    // ── metadata ──────────────────────────────────────────────────────────

    #[inline]
    pub fn name(&self) -> &str {
        &self.desc.name
    }

    #[inline]
    pub fn desc(&self) -> &StepDesc {
        &self.desc
    }

    #[inline]
    pub fn kind(&self) -> &StepKind {
        &self.kind
    }

    #[inline]
    pub fn flags(&self) -> StepFlags {
        self.desc.flags
    }

    #[inline]
    pub fn primitive(&self) -> PrimitiveType {
        self.desc.primitive
    }

    #[inline]
    pub fn depth_stencil(&self) -> DepthStencilSettings {
        self.desc.depth_stencil
    }

    #[inline]
    pub fn render_state(&self) -> RenderStateFlags {
        self.desc.render_state
    }

    #[inline]
    pub fn uniforms(&self) -> &'static [Uniform] {
        self.desc.uniforms
    }

    #[inline]
    pub fn vertex_attrs(&self) -> &'static [Attribute] {
        self.desc.vertex_attrs
    }

    #[inline]
    pub fn instance_attrs(&self) -> &'static [Attribute] {
        self.desc.instance_attrs
    }

    #[inline]
    pub fn varyings(&self) -> &'static [Varying] {
        self.desc.varyings
    }

    #[inline]
    pub fn vertex_stride(&self) -> u32 {
        attribute_stride(self.desc.vertex_attrs)
    }

    #[inline]
    pub fn instance_stride(&self) -> u32 {
        attribute_stride(self.desc.instance_attrs)
    }

    /// Stride of the static template buffer, 0 when there is none.
    pub fn static_stride(&self) -> u32 {
        if self.desc.render_state.contains(RenderStateFlags::FIXED_BUFFERS) {
            self.vertex_stride()
        } else {
            0
        }
    }

    /// Stride of the data appended per draw.
    pub fn append_stride(&self) -> u32 {
        if self.desc.render_state.contains(RenderStateFlags::APPEND_VERTICES) {
            self.vertex_stride()
        } else {
            self.instance_stride()
        }
    }

    #[inline]
    pub fn performs_shading(&self) -> bool {
        self.desc.flags.contains(StepFlags::PERFORMS_SHADING)
    }

    #[inline]
    pub fn emits_coverage(&self) -> bool {
        self.desc.flags.contains(StepFlags::EMITS_COVERAGE)
    }

    #[inline]
    pub fn requires_msaa(&self) -> bool {
        self.desc.flags.contains(StepFlags::REQUIRES_MSAA)
    }

    #[inline]
    pub fn has_textures(&self) -> bool {
        self.desc.flags.contains(StepFlags::HAS_TEXTURES)
    }

    /// False for steps whose encoding does not exist yet. Draws routed to a
    /// renderer containing one are skipped.
    pub fn is_supported(&self) -> bool {
        !matches!(
            self.kind,
            StepKind::TessellateStrokes(_) | StepKind::TextDirect(_) | StepKind::TextSdf(_)
        )
    }

    // ── dispatch ──────────────────────────────────────────────────────────

    /// WGSL for the vertex stage.
    pub fn vertex_shader(&self) -> &'static str {
        match &self.kind {
            StepKind::AnalyticRRect(_) => super::analytic_rrect::VERTEX_WGSL,
            StepKind::PerEdgeAAQuad(_) => super::per_edge_aa_quad::VERTEX_WGSL,
            StepKind::CoverBounds(_) => super::cover_bounds::VERTEX_WGSL,
            StepKind::MiddleOutFan(_) => super::middle_out_fan::VERTEX_WGSL,
            StepKind::TessellateCurves(_) => super::tessellate_curves::VERTEX_WGSL,
            StepKind::TessellateWedges(_) => super::tessellate_wedges::VERTEX_WGSL,
            StepKind::Vertices(s) => s.vertex_shader(),
            StepKind::CoverageMask(_) => super::coverage_mask::VERTEX_WGSL,
            StepKind::TessellateStrokes(_) | StepKind::TextDirect(_) | StepKind::TextSdf(_) => "",
        }
    }

    /// WGSL computing the step's coverage, empty when it emits none.
    pub fn fragment_shader(&self) -> &'static str {
        match &self.kind {
            StepKind::AnalyticRRect(_) => super::analytic_rrect::COVERAGE_WGSL,
            StepKind::PerEdgeAAQuad(_) => super::per_edge_aa_quad::COVERAGE_WGSL,
            StepKind::CoverageMask(_) => super::coverage_mask::COVERAGE_WGSL,
            _ => "",
        }
    }

    /// Appends the geometry of one draw. `ssbo_index` locates the draw's
    /// paint data.
    pub fn write_vertices<M: DrawBufferManager + ?Sized>(
        &self,
        writer: &mut DrawWriter<'_, M>,
        params: &DrawParams<'_>,
        ssbo_index: u32,
    ) {
        match &self.kind {
            StepKind::AnalyticRRect(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::PerEdgeAAQuad(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::CoverBounds(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::MiddleOutFan(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::TessellateCurves(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::TessellateWedges(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::Vertices(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::CoverageMask(s) => s.write_vertices(writer, params, ssbo_index),
            StepKind::TessellateStrokes(_) | StepKind::TextDirect(_) | StepKind::TextSdf(_) => {
                log::error!("{} cannot encode geometry yet", self.name());
            }
        }
    }

    /// Writes the uniforms and textures this step reads for one draw.
    pub fn write_uniforms_and_textures(&self, params: &DrawParams<'_>, gatherer: &mut PipelineDataGatherer) {
        match &self.kind {
            StepKind::MiddleOutFan(_)
            | StepKind::TessellateCurves(_)
            | StepKind::TessellateWedges(_)
            | StepKind::Vertices(_) => gatherer.write_matrix(params.transform()),
            StepKind::CoverageMask(s) => s.write_uniforms_and_textures(params, gatherer),
            StepKind::AnalyticRRect(_) | StepKind::PerEdgeAAQuad(_) | StepKind::CoverBounds(_) => {}
            StepKind::TessellateStrokes(_) | StepKind::TextDirect(_) | StepKind::TextSdf(_) => {
                log::error!("{} cannot write uniforms yet", self.name());
            }
        }
    }

    /// Local-space outset the step adds around `bounds`.
    pub fn bounds_outset(&self, transform: &Transform, bounds: Rect) -> f32 {
        match &self.kind {
            StepKind::AnalyticRRect(_) | StepKind::PerEdgeAAQuad(_) => super::aa::local_aa_radius(transform, bounds),
            _ => 0.0,
        }
    }
}
