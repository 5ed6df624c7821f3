use core::cmp::Ordering;

use crate::draw::{CompressedPaintersOrder, DisjointStencilIndex};

/// Sort key of one (draw, render step) pair in a pass.
///
/// Ordering rules:
/// 1) `paint_order`: ascending, so draws that must blend over earlier ones
///    come after them
/// 2) `stencil_index`: ascending, grouping disjoint stencil draws
/// 3) `step`: the step's position in its renderer, so a renderer's steps run
///    in order while the same step of disjoint draws batches together
/// 4) `pipeline`, `uniforms`, `textures`: group identical state to avoid
///    rebinding
/// 5) `draw`: insertion order, which makes the sort stable
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SortKey {
    pub paint_order: CompressedPaintersOrder,
    pub stencil_index: DisjointStencilIndex,
    pub step: u8,
    pub pipeline: u32,
    pub uniforms: Option<u32>,
    pub textures: Option<u32>,
    pub draw: u32,
}

impl Ord for SortKey {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.paint_order
            .cmp(&other.paint_order)
            .then(self.stencil_index.cmp(&other.stencil_index))
            .then(self.step.cmp(&other.step))
            .then(self.pipeline.cmp(&other.pipeline))
            .then(self.uniforms.cmp(&other.uniforms))
            .then(self.textures.cmp(&other.textures))
            .then(self.draw.cmp(&other.draw))
    }
}

impl PartialOrd for SortKey {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
