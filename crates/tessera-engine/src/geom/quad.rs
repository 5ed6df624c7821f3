use core::ops::{BitAnd, BitOr};

use super::{Rect, Vec2};

/// Per-edge anti-aliasing selection for an [`EdgeAAQuad`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct AAFlags(u8);

impl AAFlags {
    pub const NONE: AAFlags = AAFlags(0);
    pub const LEFT: AAFlags = AAFlags(0b0001);
    pub const TOP: AAFlags = AAFlags(0b0010);
    pub const RIGHT: AAFlags = AAFlags(0b0100);
    pub const BOTTOM: AAFlags = AAFlags(0b1000);
    pub const ALL: AAFlags = AAFlags(0b1111);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: AAFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AAFlags {
    type Output = AAFlags;
    #[inline]
    fn bitor(self, rhs: AAFlags) -> AAFlags {
        AAFlags(self.0 | rhs.0)
    }
}

impl BitAnd for AAFlags {
    type Output = AAFlags;
    #[inline]
    fn bitand(self, rhs: AAFlags) -> AAFlags {
        AAFlags(self.0 & rhs.0)
    }
}

/// Quadrilateral with independently anti-aliased edges.
///
/// Corners are stored as separate x/y arrays in TL, TR, BR, BL order. Edges
/// are named after the rect case: the left edge runs from the last corner to
/// the first. Arbitrary quads must be convex but may wind either way.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeAAQuad {
    xs: [f32; 4],
    ys: [f32; 4],
    flags: AAFlags,
    is_rect: bool,
}

impl EdgeAAQuad {
    pub fn from_rect(rect: Rect, flags: AAFlags) -> Self {
        let r = rect.sorted();
        Self {
            xs: [r.left, r.right, r.right, r.left],
            ys: [r.top, r.top, r.bottom, r.bottom],
            flags,
            is_rect: true,
        }
    }

    pub fn from_points(points: [Vec2; 4], flags: AAFlags) -> Self {
        Self {
            xs: points.map(|p| p.x),
            ys: points.map(|p| p.y),
            flags,
            is_rect: false,
        }
    }

    #[inline]
    pub fn xs(&self) -> [f32; 4] {
        self.xs
    }

    #[inline]
    pub fn ys(&self) -> [f32; 4] {
        self.ys
    }

    #[inline]
    pub fn point(&self, i: usize) -> Vec2 {
        Vec2::new(self.xs[i], self.ys[i])
    }

    #[inline]
    pub fn edge_flags(&self) -> AAFlags {
        self.flags
    }

    #[inline]
    pub fn is_rect(&self) -> bool {
        self.is_rect
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(&[self.point(0), self.point(1), self.point(2), self.point(3)])
    }
}
