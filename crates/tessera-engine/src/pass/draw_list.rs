use std::collections::HashMap;

use crate::draw::{
    Cap, Clip, CompressedPaintersOrder, DisjointStencilIndex, DrawOrder, DrawParams, Geometry, PaintersDepth,
    StrokeStyle,
};
use crate::geom::{Rect, Transform};
use crate::render::{choose_renderer, RendererConfig, RendererId, RendererProvider};

/// Shading inputs of a draw, as far as recording is concerned.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Paint {
    /// Slot of the draw's paint data in the caller's storage buffer.
    pub ssbo_index: u32,
    /// The paint blends with the destination, so the draw must come after
    /// every earlier draw it overlaps.
    pub reads_dst: bool,
}

impl Paint {
    #[inline]
    pub fn opaque(ssbo_index: u32) -> Self {
        Self { ssbo_index, reads_dst: false }
    }

    #[inline]
    pub fn blended(ssbo_index: u32) -> Self {
        Self { ssbo_index, reads_dst: true }
    }
}

/// A recorded draw: its parameters plus the renderer chosen for it.
#[derive(Debug, Clone)]
pub struct Draw<'a> {
    params: DrawParams<'a>,
    renderer: RendererId,
    ssbo_index: u32,
}

impl<'a> Draw<'a> {
    #[inline]
    pub fn params(&self) -> &DrawParams<'a> {
        &self.params
    }

    #[inline]
    pub fn renderer(&self) -> RendererId {
        self.renderer
    }

    #[inline]
    pub fn ssbo_index(&self) -> u32 {
        self.ssbo_index
    }

    #[inline]
    pub fn order(&self) -> DrawOrder {
        self.params.order()
    }
}

/// Why [`DrawList::record`] dropped a draw.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Rejected {
    /// The transform has non-finite values.
    InvalidTransform,
    /// Nothing of the draw lands inside the current scissor.
    ClippedOut,
    /// No renderer produces pixels for the geometry.
    NoRenderer,
    /// Every depth value of the list is taken.
    DepthExhausted,
}

/// Draws recorded for one pass, in submission order.
///
/// Each draw gets a depth greater than every earlier one. Its painter's order
/// only advances past earlier draws it overlaps when it blends with them, so
/// overlapping opaque draws keep sharing an order and rely on the depth test.
/// Draws whose renderer uses the stencil buffer also get the smallest stencil
/// index whose other draws at the same order are all disjoint from them.
///
/// # Clipping
///
/// [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) scope draws to
/// a device-space scissor, intersected with the enclosing one.
#[derive(Debug)]
pub struct DrawList<'a> {
    draws: Vec<Draw<'a>>,
    viewport: Rect,
    clip_stack: Vec<Rect>,

    next_depth: u16,
    /// Draw bounds and order of every recorded draw, newest last.
    recorded_bounds: Vec<(Rect, CompressedPaintersOrder)>,
    /// Per painter's order, one set of mutually disjoint bounds per stencil
    /// index, starting at index 1.
    stencil_sets: HashMap<CompressedPaintersOrder, Vec<Vec<Rect>>>,
}

impl<'a> DrawList<'a> {
    /// An empty list drawing into a target of `viewport` device bounds.
    pub fn new(viewport: Rect) -> Self {
        Self {
            draws: Vec::new(),
            viewport: viewport.round_out(),
            clip_stack: Vec::new(),
            next_depth: PaintersDepth::CLEAR.0,
            recorded_bounds: Vec::new(),
            stencil_sets: HashMap::new(),
        }
    }

    /// Clears recorded draws, ordering state and the clip stack. Keeps
    /// allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.draws.clear();
        self.clip_stack.clear();
        self.next_depth = PaintersDepth::CLEAR.0;
        self.recorded_bounds.clear();
        self.stencil_sets.clear();
    }

    #[inline]
    pub fn draws(&self) -> &[Draw<'a>] {
        &self.draws
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    #[inline]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Scissor the next draw is clipped to.
    #[inline]
    pub fn current_scissor(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or(self.viewport)
    }

    /// Begins a scissor region, intersected with the enclosing one.
    ///
    /// Calls must be balanced with [`pop_clip`](Self::pop_clip).
    pub fn push_clip(&mut self, rect: Rect) {
        // No overlap leaves a zero-area scissor; draws under it are rejected.
        let effective = self.current_scissor().intersect(rect.round_out()).unwrap_or(Rect::empty());
        self.clip_stack.push(effective);
    }

    /// Ends the most recent scissor region.
    ///
    /// # Panics
    /// Panics (debug only) if called without a matching `push_clip`.
    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }

    /// Chooses a renderer for the draw and assigns its order.
    ///
    /// Returns the order of the recorded draw. A rejected draw leaves the
    /// list unchanged.
    pub fn record(
        &mut self,
        provider: &RendererProvider,
        config: &RendererConfig,
        transform: &'a Transform,
        geometry: Geometry,
        stroke: Option<StrokeStyle>,
        paint: Paint,
    ) -> Result<DrawOrder, Rejected> {
        if !transform.is_invertible() {
            return Err(Rejected::InvalidTransform);
        }
        if self.next_depth == PaintersDepth::MAX.0 {
            log::warn!("draw list is out of depth values; dropping draw");
            return Err(Rejected::DepthExhausted);
        }

        // Renderer choice sees the bare shape bounds; the AA outset depends on
        // the renderer.
        let shape_clip = self.clip_for(transform, &geometry, stroke.as_ref(), 0.0);
        let depth = PaintersDepth(self.next_depth + 1);
        let unordered = DrawOrder::new(depth, CompressedPaintersOrder(0));
        let mut params = DrawParams::new(transform, geometry, shape_clip, unordered, stroke);
        let Some(selection) = choose_renderer(provider, &params, config) else {
            return Err(Rejected::NoRenderer);
        };
        if let Some(replacement) = selection.replacement {
            params = params.with_geometry(replacement, None);
        }
        let renderer = selection.renderer;

        let local = params.local_bounds();
        let aa_outset = provider
            .steps_of(renderer)
            .map(|step| step.bounds_outset(transform, local))
            .fold(0.0, f32::max);
        let clip = self.clip_for(transform, params.geometry(), params.stroke_style(), aa_outset);
        if clip.is_clipped_out() {
            return Err(Rejected::ClippedOut);
        }
        let params = params.with_clip(clip);

        let draw_bounds = params.clip().draw_bounds();
        let mut order = unordered;
        if paint.reads_dst || provider.emits_coverage(renderer) {
            order = DrawOrder::new(depth, self.most_recent_overlap(draw_bounds).next());
        }
        if provider.uses_stencil(renderer) {
            order = order.with_stencil_index(self.add_stencil_bounds(order.paint_order(), draw_bounds));
        }

        let params = params.with_order(order);

        self.next_depth = depth.0;
        self.recorded_bounds.push((draw_bounds, order.paint_order()));
        self.draws.push(Draw { params, renderer, ssbo_index: paint.ssbo_index });
        Ok(order)
    }

    /// Clip of `geometry` with its local bounds grown by the stroke and
    /// `aa_outset`. Masks are already in device space.
    fn clip_for(
        &self,
        transform: &Transform,
        geometry: &Geometry,
        stroke: Option<&StrokeStyle>,
        aa_outset: f32,
    ) -> Clip {
        let local = geometry.bounds().outset(stroke.map_or(0.0, stroke_outset) + aa_outset);
        let device = match geometry {
            Geometry::AtlasShape(_) | Geometry::CoverageMask(_) => local,
            _ => transform.map_rect(local),
        };
        Clip::new(device, self.current_scissor(), geometry.is_inverse_fill())
    }

    /// Painter's order of the newest recorded draw overlapping `bounds`.
    fn most_recent_overlap(&self, bounds: Rect) -> CompressedPaintersOrder {
        self.recorded_bounds
            .iter()
            .filter(|(b, _)| b.intersect(bounds).is_some())
            .map(|&(_, order)| order)
            .max()
            .unwrap_or_default()
    }

    fn add_stencil_bounds(&mut self, order: CompressedPaintersOrder, bounds: Rect) -> DisjointStencilIndex {
        let sets = self.stencil_sets.entry(order).or_default();
        let free = sets.iter().position(|set| set.iter().all(|b| b.intersect(bounds).is_none()));
        let slot = match free {
            Some(i) => i,
            None => {
                sets.push(Vec::new());
                sets.len() - 1
            }
        };
        sets[slot].push(bounds);
        DisjointStencilIndex(slot as u16 + 1)
    }
}

/// Local-space distance a stroke reaches past the geometry bounds.
fn stroke_outset(style: &StrokeStyle) -> f32 {
    let mut outset = style.half_width();
    if style.is_miter_join() {
        outset *= style.miter_limit().max(1.0);
    }
    if style.cap() == Cap::Square {
        outset = outset.max(style.half_width() * core::f32::consts::SQRT_2);
    }
    outset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Join;
    use crate::geom::{FillType, Path, Shape, Vec2};
    use crate::gpu::CpuBufferManager;

    fn r(l: f32, t: f32, rr: f32, b: f32) -> Rect {
        Rect::new(l, t, rr, b)
    }

    fn provider() -> RendererProvider {
        RendererProvider::new(&mut CpuBufferManager::default())
    }

    fn rect(l: f32, t: f32, rr: f32, b: f32) -> Geometry {
        Geometry::Shape(Shape::rect(r(l, t, rr, b)))
    }

    /// A concave path drawn with stencil-and-cover.
    fn notch(x: f32) -> Geometry {
        let mut path = Path::new();
        path.move_to(Vec2::new(x, 0.0))
            .line_to(Vec2::new(x + 10.0, 0.0))
            .line_to(Vec2::new(x + 5.0, 5.0))
            .line_to(Vec2::new(x + 10.0, 10.0))
            .line_to(Vec2::new(x, 10.0))
            .close();
        path.set_fill_type(FillType::Winding);
        Geometry::Shape(Shape::path(path))
    }

    // ── depth / paint order ───────────────────────────────────────────────

    #[test]
    fn depth_increases_per_draw() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        let a = list.record(&p, &RendererConfig::default(), &t, rect(0.0, 0.0, 10.0, 10.0), None, Paint::opaque(0)).unwrap();
        let b = list.record(&p, &RendererConfig::default(), &t, rect(50.0, 50.0, 60.0, 60.0), None, Paint::opaque(1)).unwrap();
        assert_eq!(a.depth(), PaintersDepth(1));
        assert_eq!(b.depth(), PaintersDepth(2));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn blending_draws_order_after_overlaps() {
        let p = provider();
        let t = Transform::identity();
        let cfg = RendererConfig::default();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        // Analytic rrects emit coverage, so they always blend.
        let a = list.record(&p, &cfg, &t, rect(0.0, 0.0, 10.0, 10.0), None, Paint::opaque(0)).unwrap();
        let b = list.record(&p, &cfg, &t, rect(5.0, 5.0, 15.0, 15.0), None, Paint::opaque(0)).unwrap();
        let c = list.record(&p, &cfg, &t, rect(50.0, 50.0, 60.0, 60.0), None, Paint::opaque(0)).unwrap();
        assert_eq!(a.paint_order(), CompressedPaintersOrder(1));
        assert_eq!(b.paint_order(), CompressedPaintersOrder(2));
        assert_eq!(c.paint_order(), CompressedPaintersOrder(1));
    }

    #[test]
    fn opaque_stencil_draws_share_order() {
        let p = provider();
        let t = Transform::identity();
        let cfg = RendererConfig::default();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        let a = list.record(&p, &cfg, &t, notch(0.0), None, Paint::opaque(0)).unwrap();
        let b = list.record(&p, &cfg, &t, notch(2.0), None, Paint::opaque(0)).unwrap();
        let c = list.record(&p, &cfg, &t, notch(40.0), None, Paint::opaque(0)).unwrap();
        // Stencil-and-cover fills emit no coverage.
        assert_eq!(a.paint_order(), CompressedPaintersOrder(0));
        assert_eq!(b.paint_order(), CompressedPaintersOrder(0));
        assert_eq!(a.stencil_index(), DisjointStencilIndex(1));
        assert_eq!(b.stencil_index(), DisjointStencilIndex(2));
        assert_eq!(c.stencil_index(), DisjointStencilIndex(1));
    }

    #[test]
    fn blended_stencil_draw_starts_new_set() {
        let p = provider();
        let t = Transform::identity();
        let cfg = RendererConfig::default();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        list.record(&p, &cfg, &t, notch(0.0), None, Paint::opaque(0)).unwrap();
        let b = list.record(&p, &cfg, &t, notch(2.0), None, Paint::blended(0)).unwrap();
        assert_eq!(b.paint_order(), CompressedPaintersOrder(1));
        assert_eq!(b.stencil_index(), DisjointStencilIndex(1));
    }

    // ── rejection ─────────────────────────────────────────────────────────

    #[test]
    fn rejected_draws_leave_list_untouched() {
        let p = provider();
        let cfg = RendererConfig::default();
        let t = Transform::identity();
        let bad = Transform::scale(f32::NAN, 1.0);
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));

        assert_eq!(
            list.record(&p, &cfg, &bad, rect(0.0, 0.0, 1.0, 1.0), None, Paint::opaque(0)),
            Err(Rejected::InvalidTransform)
        );
        assert_eq!(
            list.record(&p, &cfg, &t, rect(200.0, 200.0, 210.0, 210.0), None, Paint::opaque(0)),
            Err(Rejected::ClippedOut)
        );
        assert_eq!(
            list.record(&p, &cfg, &t, Geometry::Shape(Shape::empty()), None, Paint::opaque(0)),
            Err(Rejected::NoRenderer)
        );
        assert!(list.is_empty());

        let ok = list.record(&p, &cfg, &t, rect(0.0, 0.0, 1.0, 1.0), None, Paint::opaque(0)).unwrap();
        assert_eq!(ok.depth(), PaintersDepth(1));
    }

    #[test]
    fn singular_transform_is_rejected() {
        let p = provider();
        let flat = Transform::scale(0.0, 1.0);
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        assert_eq!(
            list.record(&p, &RendererConfig::default(), &flat, rect(0.0, 0.0, 10.0, 10.0), None, Paint::opaque(0)),
            Err(Rejected::InvalidTransform)
        );
        assert!(list.is_empty());
    }

    #[test]
    fn inverse_fill_is_never_clipped_out() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        let inverted = Geometry::Shape(Shape::rect(r(200.0, 200.0, 210.0, 210.0)).with_inverted(true));
        list.record(&p, &RendererConfig::default(), &t, inverted, None, Paint::opaque(0)).unwrap();
        assert_eq!(list.draws()[0].params().clip().draw_bounds(), r(0.0, 0.0, 100.0, 100.0));
    }

    // ── clipping ──────────────────────────────────────────────────────────

    #[test]
    fn nested_clips_intersect() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        list.push_clip(r(10.0, 10.0, 50.0, 50.0));
        list.push_clip(r(30.0, 0.0, 80.0, 40.0));
        assert_eq!(list.current_scissor(), r(30.0, 10.0, 50.0, 40.0));

        list.record(&p, &RendererConfig::default(), &t, rect(0.0, 0.0, 100.0, 100.0), None, Paint::opaque(0))
            .unwrap();
        assert_eq!(list.draws()[0].params().clip().draw_bounds(), r(30.0, 10.0, 50.0, 40.0));

        list.pop_clip();
        list.pop_clip();
        assert_eq!(list.current_scissor(), r(0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn disjoint_clip_rejects_draws() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        list.push_clip(r(0.0, 0.0, 10.0, 10.0));
        list.push_clip(r(20.0, 20.0, 30.0, 30.0));
        let res = list.record(&p, &RendererConfig::default(), &t, rect(0.0, 0.0, 50.0, 50.0), None, Paint::opaque(0));
        assert_eq!(res, Err(Rejected::ClippedOut));
    }

    #[test]
    fn stroke_widens_draw_bounds() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(-100.0, -100.0, 100.0, 100.0));
        let style = StrokeStyle::new(4.0, Join::Round, Cap::Butt);
        list.record(&p, &RendererConfig::default(), &t, rect(0.0, 0.0, 10.0, 10.0), Some(style), Paint::opaque(0))
            .unwrap();
        assert_eq!(list.draws()[0].params().clip().draw_bounds(), r(-3.0, -3.0, 13.0, 13.0));
    }

    #[test]
    fn aa_outset_is_applied_in_local_space() {
        let p = provider();
        let t = Transform::scale(4.0, 0.25);
        let cfg = RendererConfig::default();
        let mut list = DrawList::new(r(-100.0, -100.0, 200.0, 200.0));
        let local = r(0.0, 0.0, 10.0, 400.0);
        let a = list.record(&p, &cfg, &t, Geometry::Shape(Shape::rect(local)), None, Paint::opaque(0)).unwrap();

        // One device pixel along y is four local units, which is 16 pixels along x.
        let draw = &list.draws()[0];
        let step = p.steps_of(draw.renderer()).next().unwrap();
        assert_eq!(step.bounds_outset(&t, local), 4.0);
        assert_eq!(draw.params().clip().draw_bounds(), r(-16.0, -1.0, 56.0, 101.0));

        // The AA ring of the first rect reaches the second one.
        let b = list.record(&p, &cfg, &t, rect(12.0, 0.0, 20.0, 400.0), None, Paint::opaque(1)).unwrap();
        assert_eq!(a.paint_order(), CompressedPaintersOrder(1));
        assert_eq!(b.paint_order(), CompressedPaintersOrder(2));
    }

    #[test]
    fn stencil_fills_get_no_aa_outset() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(-100.0, -100.0, 100.0, 100.0));
        list.record(&p, &RendererConfig::default(), &t, notch(0.0), None, Paint::opaque(0)).unwrap();
        assert_eq!(list.draws()[0].params().clip().draw_bounds(), r(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn replacement_geometry_is_recorded() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(-100.0, -100.0, 100.0, 100.0));
        let line = Geometry::Shape(Shape::line(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0)));
        let style = StrokeStyle::new(2.0, Join::Bevel, Cap::Butt);
        list.record(&p, &RendererConfig::default(), &t, line, Some(style), Paint::opaque(0)).unwrap();

        let draw = &list.draws()[0];
        assert_eq!(draw.renderer(), p.per_edge_aa_quad());
        assert!(draw.params().geometry().is_edge_aa_quad());
        assert!(!draw.params().is_stroke());
        // Bounds of the stroked quad plus one pixel of AA.
        assert_eq!(draw.params().clip().draw_bounds(), r(-1.0, -2.0, 11.0, 2.0));
    }

    #[test]
    fn clear_resets_ordering() {
        let p = provider();
        let t = Transform::identity();
        let mut list = DrawList::new(r(0.0, 0.0, 100.0, 100.0));
        list.record(&p, &RendererConfig::default(), &t, rect(0.0, 0.0, 10.0, 10.0), None, Paint::opaque(0)).unwrap();
        list.clear();
        let order = list.record(&p, &RendererConfig::default(), &t, rect(0.0, 0.0, 10.0, 10.0), None, Paint::opaque(0)).unwrap();
        assert_eq!(order.depth(), PaintersDepth(1));
        assert_eq!(order.paint_order(), CompressedPaintersOrder(1));
    }
}
