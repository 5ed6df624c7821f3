//! Picks the renderer for a draw.
//!
//! The choice depends only on the draw's geometry, style and device size, so
//! it is made once when the draw is recorded and never revisited.

use super::provider::RendererProvider;
use super::renderer::RendererId;
use crate::draw::{Cap, DrawParams, Geometry, StrokeStyle};
use crate::geom::{AAFlags, EdgeAAQuad, Shape, ShapeKind, Vec2};

/// Thresholds steering path fills between wedges and curves plus fan.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Paths with fewer verbs than this use wedges.
    pub wedge_verb_threshold: usize,

    /// Paths covering at most this many device pixels use wedges.
    pub wedge_area_threshold: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            wedge_verb_threshold: 50,
            wedge_area_threshold: 256.0 * 256.0,
        }
    }
}

/// The renderer for a draw, and the geometry to draw with it when that
/// differs from the recorded one. Replacement geometry is always filled.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub renderer: RendererId,
    pub replacement: Option<Geometry>,
}

impl Selection {
    #[inline]
    fn new(renderer: RendererId) -> Self {
        Self { renderer, replacement: None }
    }
}

/// Chooses how `params` is drawn. `None` when the draw produces no pixels.
pub fn choose_renderer(
    provider: &RendererProvider,
    params: &DrawParams<'_>,
    config: &RendererConfig,
) -> Option<Selection> {
    match params.geometry() {
        Geometry::SubRun(run) => {
            let lcd = run.is_lcd();
            let id = if run.is_sdf() { provider.sdf_text(lcd) } else { provider.bitmap_text(lcd) };
            Some(Selection::new(id))
        }
        Geometry::Vertices(blob) => {
            Some(Selection::new(provider.vertices(blob.has_colors(), blob.has_tex_coords())))
        }
        Geometry::EdgeAAQuad(quad) if quad.is_rect() && quad.edge_flags().is_empty() => {
            Some(Selection::new(provider.non_aa_bounds()))
        }
        Geometry::EdgeAAQuad(_) => Some(Selection::new(provider.per_edge_aa_quad())),
        Geometry::CoverageMask(_) | Geometry::AtlasShape(_) => Some(Selection::new(provider.coverage_mask())),
        Geometry::Shape(shape) => choose_for_shape(provider, params, shape, config),
    }
}

fn choose_for_shape(
    provider: &RendererProvider,
    params: &DrawParams<'_>,
    shape: &Shape,
    config: &RendererConfig,
) -> Option<Selection> {
    if shape.is_empty() && !shape.inverted() {
        return None;
    }
    let stroke = params.stroke_style();

    let rrect = if shape.inverted() { None } else { shape.as_rrect() };
    if let Some(rrect) = rrect {
        let analytic = match stroke {
            None => true,
            Some(s) if s.is_hairline() => true,
            Some(_) => rrect.all_corners_circular(),
        };
        if analytic {
            return Some(Selection::new(provider.analytic_rrect()));
        }
    }

    if let (ShapeKind::Line(p0, p1), Some(style)) = (shape.kind(), stroke) {
        if !style.is_hairline() && style.cap() != Cap::Round {
            return Some(Selection {
                renderer: provider.per_edge_aa_quad(),
                replacement: Some(Geometry::EdgeAAQuad(line_to_quad(*p0, *p1, style))),
            });
        }
    }

    if stroke.is_some() {
        return Some(Selection::new(provider.tessellated_strokes()));
    }

    let fill = shape.fill_type();
    if !fill.is_inverse() && shape.is_convex() {
        return Some(Selection::new(provider.convex_tessellated_wedges()));
    }

    let area = params.clip().transformed_shape_bounds().area();
    let id = if shape.verb_count() < config.wedge_verb_threshold || area <= config.wedge_area_threshold {
        provider.stencil_tessellated_wedges(fill)
    } else {
        provider.stencil_tessellated_curves_and_tris(fill)
    };
    Some(Selection::new(id))
}

/// The quad covered by a butt or square capped stroke of `p0..p1`, with
/// every edge anti-aliased.
pub fn line_to_quad(p0: Vec2, p1: Vec2, style: &StrokeStyle) -> EdgeAAQuad {
    let hw = style.half_width();
    let dir = (p1 - p0).normalized();
    let (p0, p1) = match style.cap() {
        Cap::Square => (p0 - dir * hw, p1 + dir * hw),
        Cap::Butt | Cap::Round => (p0, p1),
    };
    let n = dir.perp() * hw;
    EdgeAAQuad::from_points([p0 + n, p1 + n, p1 - n, p0 - n], AAFlags::ALL)
}
