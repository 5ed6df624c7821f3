use core::cmp::Ordering;

/// Painter's-order sequence number; lower values are drawn first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct CompressedPaintersOrder(pub u16);

/// Groups draws whose stencil usage cannot overlap, so they may share one
/// stencil pass.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct DisjointStencilIndex(pub u16);

/// Depth value written by a draw; later draws get greater depths.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct PaintersDepth(pub u16);

impl PaintersDepth {
    pub const CLEAR: PaintersDepth = PaintersDepth(0);
    pub const MAX: PaintersDepth = PaintersDepth(u16::MAX);

    /// Depth in [0, 1] for the depth attachment.
    #[inline]
    pub fn as_float(self) -> f32 {
        self.0 as f32 / u16::MAX as f32
    }
}

impl CompressedPaintersOrder {
    /// The order right after `self`.
    #[inline]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Ord for CompressedPaintersOrder {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for CompressedPaintersOrder {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DisjointStencilIndex {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for DisjointStencilIndex {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering data assigned to a draw when it is recorded. Immutable afterwards.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct DrawOrder {
    paint_order: CompressedPaintersOrder,
    stencil_index: DisjointStencilIndex,
    depth: PaintersDepth,
}

impl DrawOrder {
    #[inline]
    pub const fn new(depth: PaintersDepth, paint_order: CompressedPaintersOrder) -> Self {
        Self { paint_order, stencil_index: DisjointStencilIndex(0), depth }
    }

    #[inline]
    pub const fn with_stencil_index(mut self, index: DisjointStencilIndex) -> Self {
        self.stencil_index = index;
        self
    }

    #[inline]
    pub fn paint_order(&self) -> CompressedPaintersOrder {
        self.paint_order
    }

    #[inline]
    pub fn stencil_index(&self) -> DisjointStencilIndex {
        self.stencil_index
    }

    #[inline]
    pub fn depth(&self) -> PaintersDepth {
        self.depth
    }

    #[inline]
    pub fn depth_as_float(&self) -> f32 {
        self.depth.as_float()
    }
}
