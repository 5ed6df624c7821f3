use crate::geom::{Rect, Transform};

use super::{Clip, DrawOrder, Geometry, StrokeStyle};

/// Everything a render step needs to encode one draw.
///
/// The transform is borrowed: it is shared by many draws and must outlive them.
#[derive(Debug, Clone)]
pub struct DrawParams<'a> {
    transform: &'a Transform,
    geometry: Geometry,
    clip: Clip,
    order: DrawOrder,
    stroke: Option<StrokeStyle>,
}

impl<'a> DrawParams<'a> {
    pub fn new(
        transform: &'a Transform,
        geometry: Geometry,
        clip: Clip,
        order: DrawOrder,
        stroke: Option<StrokeStyle>,
    ) -> Self {
        Self { transform, geometry, clip, order, stroke }
    }

    #[inline]
    pub fn transform(&self) -> &'a Transform {
        self.transform
    }

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn clip(&self) -> &Clip {
        &self.clip
    }

    #[inline]
    pub fn order(&self) -> DrawOrder {
        self.order
    }

    #[inline]
    pub fn stroke_style(&self) -> Option<&StrokeStyle> {
        self.stroke.as_ref()
    }

    #[inline]
    pub fn is_stroke(&self) -> bool {
        self.stroke.is_some()
    }

    /// Replaces the geometry, keeping transform, clip and order.
    pub fn with_geometry(mut self, geometry: Geometry, stroke: Option<StrokeStyle>) -> Self {
        self.geometry = geometry;
        self.stroke = stroke;
        self
    }

    /// Replaces the clip once the final draw bounds are known.
    #[inline]
    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clip = clip;
        self
    }

    /// Replaces the order assigned when the draw was recorded.
    #[inline]
    pub fn with_order(mut self, order: DrawOrder) -> Self {
        self.order = order;
        self
    }

    /// Local bounds of the geometry.
    #[inline]
    pub fn local_bounds(&self) -> Rect {
        self.geometry.bounds()
    }
}
