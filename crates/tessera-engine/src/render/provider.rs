//! Owner of every render step and renderer.
//!
//! The provider is built once per backend context and then only read, so it
//! can be shared by every thread recording passes. Steps live in one arena
//! and renderers refer to them by [`StepId`]; steps used by several renderers
//! (the cover passes) are stored once.

use static_assertions::assert_impl_all;

use super::analytic_rrect::AnalyticRRectStep;
use super::cover_bounds::CoverBoundsStep;
use super::coverage_mask::CoverageMaskStep;
use super::middle_out_fan::MiddleOutFanStep;
use super::per_edge_aa_quad::PerEdgeAAQuadStep;
use super::renderer::{Renderer, RendererId, StepId};
use super::step::RenderStep;
use super::tessellate_curves::TessellateCurvesStep;
use super::tessellate_strokes::TessellateStrokesStep;
use super::tessellate_wedges::{TessellateWedgesStep, WedgeMode};
use super::text::{TextDirectStep, TextSdfStep};
use super::vertices::VerticesStep;
use crate::geom::FillType;
use crate::gpu::depth_stencil::{DIRECT_DEPTH_GREATER_PASS, INVERSE_COVER_PASS, REGULAR_COVER_PASS};
use crate::gpu::StaticBufferManager;

#[derive(Debug)]
pub struct RendererProvider {
    steps: Vec<RenderStep>,
    renderers: Vec<Renderer>,

    stencil_curves: [RendererId; 4],
    stencil_wedges: [RendererId; 4],
    convex_wedges: RendererId,
    strokes: RendererId,
    analytic_rrect: RendererId,
    per_edge_aa_quad: RendererId,
    coverage_mask: RendererId,
    /// Indexed by `colors as usize | (tex_coords as usize) << 1`.
    vertices: [RendererId; 4],
    /// Indexed by `lcd as usize`.
    bitmap_text: [RendererId; 2],
    sdf_text: [RendererId; 2],
    non_aa_bounds: RendererId,
}

assert_impl_all!(RendererProvider: Send, Sync);

/// Arena under construction.
#[derive(Default)]
struct Builder {
    steps: Vec<RenderStep>,
    renderers: Vec<Renderer>,
}

impl Builder {
    fn step(&mut self, step: RenderStep) -> StepId {
        let id = StepId(self.steps.len() as u16);
        self.steps.push(step);
        id
    }

    fn renderer(&mut self, name: impl Into<String>, steps: &[StepId]) -> RendererId {
        let id = RendererId(self.renderers.len() as u16);
        self.renderers.push(Renderer::new(name, steps));
        id
    }
}

impl RendererProvider {
    /// Builds every step and renderer, writing the static templates of the
    /// template-based steps through `static_buffers`.
    pub fn new<S: StaticBufferManager + ?Sized>(static_buffers: &mut S) -> Self {
        let mut b = Builder::default();

        let regular_cover = b.step(CoverBoundsStep::new("regular", REGULAR_COVER_PASS));
        let inverse_cover = b.step(CoverBoundsStep::new("inverse", INVERSE_COVER_PASS));
        let cover_for = |fill: FillType| if fill.is_inverse() { inverse_cover } else { regular_cover };

        let stencil_curves = FillType::ALL.map(|fill| {
            let fan = b.step(MiddleOutFanStep::new(fill));
            let curves = b.step(TessellateCurvesStep::new(static_buffers, fill));
            b.renderer(
                format!("StencilTessellatedCurvesAndTris[{}]", fill.name()),
                &[fan, curves, cover_for(fill)],
            )
        });
        let stencil_wedges = FillType::ALL.map(|fill| {
            let wedges = b.step(TessellateWedgesStep::new(static_buffers, WedgeMode::Stencil(fill)));
            b.renderer(format!("StencilTessellatedWedges[{}]", fill.name()), &[wedges, cover_for(fill)])
        });

        let convex = b.step(TessellateWedgesStep::new(static_buffers, WedgeMode::Convex));
        let convex_wedges = b.renderer("ConvexTessellatedWedges", &[convex]);

        let stroke = b.step(TessellateStrokesStep::new());
        let strokes = b.renderer("TessellatedStrokes", &[stroke]);

        let rrect = b.step(AnalyticRRectStep::new(static_buffers));
        let analytic_rrect = b.renderer("AnalyticRRect", &[rrect]);

        let quad = b.step(PerEdgeAAQuadStep::new(static_buffers));
        let per_edge_aa_quad = b.renderer("PerEdgeAAQuad", &[quad]);

        let mask = b.step(CoverageMaskStep::new());
        let coverage_mask = b.renderer("CoverageMask", &[mask]);

        let vertices = [(false, false), (true, false), (false, true), (true, true)].map(|(colors, tex)| {
            let step = b.step(VerticesStep::new(colors, tex));
            let name = format!("Vertices[{}]", vertices_variant(colors, tex));
            b.renderer(name, &[step])
        });

        let bitmap_text = [false, true].map(|lcd| {
            let step = b.step(TextDirectStep::new(lcd));
            b.renderer(format!("BitmapText[{}]", text_variant(lcd)), &[step])
        });
        let sdf_text = [false, true].map(|lcd| {
            let step = b.step(TextSdfStep::new(lcd));
            b.renderer(format!("SDFText[{}]", text_variant(lcd)), &[step])
        });

        let bounds = b.step(CoverBoundsStep::new("non-aa", DIRECT_DEPTH_GREATER_PASS));
        let non_aa_bounds = b.renderer("NonAABounds", &[bounds]);

        log::debug!("renderer provider built: {} steps, {} renderers", b.steps.len(), b.renderers.len());

        Self {
            steps: b.steps,
            renderers: b.renderers,
            stencil_curves,
            stencil_wedges,
            convex_wedges,
            strokes,
            analytic_rrect,
            per_edge_aa_quad,
            coverage_mask,
            vertices,
            bitmap_text,
            sdf_text,
            non_aa_bounds,
        }
    }

    // ── arena access ──────────────────────────────────────────────────────

    #[inline]
    pub fn step(&self, id: StepId) -> &RenderStep {
        &self.steps[id.index()]
    }

    #[inline]
    pub fn renderer(&self, id: RendererId) -> &Renderer {
        &self.renderers[id.index()]
    }

    /// Steps of `id` in execution order.
    pub fn steps_of(&self, id: RendererId) -> impl Iterator<Item = &RenderStep> + '_ {
        self.renderer(id).steps().iter().map(|&s| self.step(s))
    }

    /// All renderers with their ids.
    pub fn renderers(&self) -> impl Iterator<Item = (RendererId, &Renderer)> + '_ {
        self.renderers.iter().enumerate().map(|(i, r)| (RendererId(i as u16), r))
    }

    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn renderer_count(&self) -> usize {
        self.renderers.len()
    }

    /// True when every step of `id` can encode geometry.
    pub fn is_supported(&self, id: RendererId) -> bool {
        self.steps_of(id).all(RenderStep::is_supported)
    }

    /// True when any step of `id` needs a multisampled target.
    pub fn requires_msaa(&self, id: RendererId) -> bool {
        self.steps_of(id).any(RenderStep::requires_msaa)
    }

    /// True when any step of `id` produces fractional coverage, so its
    /// pixels blend with what was drawn before.
    pub fn emits_coverage(&self, id: RendererId) -> bool {
        self.steps_of(id).any(RenderStep::emits_coverage)
    }

    /// True when any step of `id` tests or writes the stencil buffer.
    pub fn uses_stencil(&self, id: RendererId) -> bool {
        self.steps_of(id).any(|s| s.depth_stencil().stencil_test)
    }

    // ── renderers ─────────────────────────────────────────────────────────

    /// Middle-out fan and curve stencil passes followed by a cover pass.
    #[inline]
    pub fn stencil_tessellated_curves_and_tris(&self, fill: FillType) -> RendererId {
        self.stencil_curves[fill.index()]
    }

    /// Wedge stencil pass followed by a cover pass.
    #[inline]
    pub fn stencil_tessellated_wedges(&self, fill: FillType) -> RendererId {
        self.stencil_wedges[fill.index()]
    }

    #[inline]
    pub fn convex_tessellated_wedges(&self) -> RendererId {
        self.convex_wedges
    }

    #[inline]
    pub fn tessellated_strokes(&self) -> RendererId {
        self.strokes
    }

    #[inline]
    pub fn analytic_rrect(&self) -> RendererId {
        self.analytic_rrect
    }

    #[inline]
    pub fn per_edge_aa_quad(&self) -> RendererId {
        self.per_edge_aa_quad
    }

    #[inline]
    pub fn coverage_mask(&self) -> RendererId {
        self.coverage_mask
    }

    #[inline]
    pub fn vertices(&self, colors: bool, tex_coords: bool) -> RendererId {
        self.vertices[colors as usize | (tex_coords as usize) << 1]
    }

    #[inline]
    pub fn bitmap_text(&self, lcd: bool) -> RendererId {
        self.bitmap_text[lcd as usize]
    }

    #[inline]
    pub fn sdf_text(&self, lcd: bool) -> RendererId {
        self.sdf_text[lcd as usize]
    }

    /// A single direct cover pass, for axis-aligned fills that need no AA.
    #[inline]
    pub fn non_aa_bounds(&self) -> RendererId {
        self.non_aa_bounds
    }
}

fn vertices_variant(colors: bool, tex_coords: bool) -> &'static str {
    match (colors, tex_coords) {
        (false, false) => "tri",
        (true, false) => "colors",
        (false, true) => "texcoords",
        (true, true) => "colors-texcoords",
    }
}

#[inline]
fn text_variant(lcd: bool) -> &'static str {
    if lcd { "lcd" } else { "a8" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::CpuBufferManager;

    fn provider() -> RendererProvider {
        RendererProvider::new(&mut CpuBufferManager::default())
    }

    fn names(p: &RendererProvider, id: RendererId) -> Vec<String> {
        p.steps_of(id).map(|s| s.name().to_owned()).collect()
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn stencil_renderers_end_with_matching_cover() {
        let p = provider();
        let id = p.stencil_tessellated_curves_and_tris(FillType::EvenOdd);
        assert_eq!(p.renderer(id).name(), "StencilTessellatedCurvesAndTris[evenodd]");
        assert_eq!(
            names(&p, id),
            [
                "MiddleOutFanRenderStep[evenodd]",
                "TessellateCurvesRenderStep[evenodd]",
                "CoverBoundsRenderStep[regular]",
            ]
        );

        let inverse = p.stencil_tessellated_wedges(FillType::InverseWinding);
        assert_eq!(
            names(&p, inverse),
            ["TessellateWedgesRenderStep[inverse-winding]", "CoverBoundsRenderStep[inverse]"]
        );
    }

    #[test]
    fn cover_steps_are_shared() {
        let p = provider();
        let last = |id: RendererId| *p.renderer(id).steps().last().unwrap();
        let a = last(p.stencil_tessellated_curves_and_tris(FillType::Winding));
        let b = last(p.stencil_tessellated_wedges(FillType::EvenOdd));
        let c = last(p.stencil_tessellated_wedges(FillType::InverseEvenOdd));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn every_renderer_is_named_once() {
        let p = provider();
        let mut seen: Vec<&str> = p.renderers().map(|(_, r)| r.name()).collect();
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert_eq!(p.renderer_count(), 22);
        assert_eq!(p.step_count(), 28);
        assert_eq!(p.renderer(p.vertices(true, false)).name(), "Vertices[colors]");
        assert_eq!(p.renderer(p.sdf_text(true)).name(), "SDFText[lcd]");
    }

    // ── support ───────────────────────────────────────────────────────────

    #[test]
    fn unsupported_renderers_are_reported() {
        let p = provider();
        assert!(!p.is_supported(p.tessellated_strokes()));
        assert!(!p.is_supported(p.bitmap_text(false)));
        assert!(p.is_supported(p.analytic_rrect()));
        assert!(p.is_supported(p.stencil_tessellated_wedges(FillType::Winding)));
        assert!(p.requires_msaa(p.convex_tessellated_wedges()));
        assert!(!p.requires_msaa(p.per_edge_aa_quad()));
        assert!(p.uses_stencil(p.stencil_tessellated_curves_and_tris(FillType::Winding)));
        assert!(!p.uses_stencil(p.convex_tessellated_wedges()));
        assert!(p.emits_coverage(p.analytic_rrect()));
        assert!(!p.emits_coverage(p.stencil_tessellated_wedges(FillType::Winding)));
    }
}
