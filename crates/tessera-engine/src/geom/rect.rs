use super::Vec2;

/// Axis-aligned rectangle stored as left/top/right/bottom edges.
///
/// Edges are not required to be sorted; use [`Rect::sorted`] when the input
/// may be flipped. A rect with `right <= left` or `bottom <= top` is empty.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    #[inline]
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Smallest rect containing every point; empty for no points.
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some((&first, rest)) = points.split_first() else {
            return Self::empty();
        };
        let (lo, hi) = rest.iter().fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Self::new(lo.x, lo.y, hi.x, hi.y)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn size(self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    #[inline]
    pub fn top_left(self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(0.5 * (self.left + self.right), 0.5 * (self.top + self.bottom))
    }

    #[inline]
    pub fn area(self) -> f32 {
        self.width() * self.height()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        // Written so NaN edges also report empty.
        !(self.right > self.left && self.bottom > self.top)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite()
    }

    /// Edge coordinates in LTRB order.
    #[inline]
    pub fn ltrb(self) -> [f32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }

    /// Corners in clockwise order starting at the top-left.
    #[inline]
    pub fn corners(self) -> [Vec2; 4] {
        [
            Vec2::new(self.left, self.top),
            Vec2::new(self.right, self.top),
            Vec2::new(self.right, self.bottom),
            Vec2::new(self.left, self.bottom),
        ]
    }

    /// Swaps flipped edges so `left <= right` and `top <= bottom`.
    #[inline]
    pub fn sorted(self) -> Self {
        Self::new(
            self.left.min(self.right),
            self.top.min(self.bottom),
            self.left.max(self.right),
            self.top.max(self.bottom),
        )
    }

    #[inline]
    pub fn outset(self, amount: f32) -> Self {
        Self::new(self.left - amount, self.top - amount, self.right + amount, self.bottom + amount)
    }

    /// Expands to integer coordinates.
    #[inline]
    pub fn round_out(self) -> Self {
        Self::new(self.left.floor(), self.top.floor(), self.right.ceil(), self.bottom.ceil())
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.left && p.y >= self.top && p.x < self.right && p.y < self.bottom
    }

    #[inline]
    pub fn contains_rect(self, other: Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right <= self.right
            && other.bottom <= self.bottom
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let r = Rect::new(
            self.left.max(other.left),
            self.top.max(other.top),
            self.right.min(other.right),
            self.bottom.min(other.bottom),
        );
        if r.is_empty() { None } else { Some(r) }
    }

    /// Smallest rect containing both; an empty operand is ignored.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        Rect::new(
            self.left.min(other.left),
            self.top.min(other.top),
            self.right.max(other.right),
            self.bottom.max(other.bottom),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(l: f32, t: f32, r: f32, b: f32) -> Rect { Rect::new(l, t, r, b) }

    // ── sorted ────────────────────────────────────────────────────────────

    #[test]
    fn sorted_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.sorted(), rect);
    }

    #[test]
    fn sorted_flipped_edges() {
        assert_eq!(r(10.0, 8.0, 6.0, 2.0).sorted(), r(6.0, 2.0, 10.0, 8.0));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn contains_rect_nested() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains_rect(r(2.0, 2.0, 10.0, 4.0)));
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains_rect(r(2.0, 2.0, 11.0, 4.0)));
    }

    // ── intersect / union ─────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0.0, 0.0, 10.0, 10.0).intersect(r(5.0, 5.0, 15.0, 15.0)).unwrap();
        assert_eq!(i, r(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0.0, 0.0, 10.0, 10.0).intersect(r(10.0, 0.0, 20.0, 10.0)).is_none());
    }

    #[test]
    fn union_ignores_empty() {
        let a = r(1.0, 1.0, 2.0, 2.0);
        assert_eq!(a.union(Rect::empty()), a);
        assert_eq!(Rect::empty().union(a), a);
        assert_eq!(a.union(r(5.0, -1.0, 6.0, 0.0)), r(1.0, -1.0, 6.0, 2.0));
    }

    // ── is_empty ──────────────────────────────────────────────────────────

    #[test]
    fn is_empty_zero_and_nan() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, f32::NAN, 5.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn from_points_bounds() {
        let pts = [Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0), Vec2::new(0.0, 0.0)];
        assert_eq!(Rect::from_points(&pts), r(-2.0, -1.0, 3.0, 4.0));
        assert!(Rect::from_points(&[]).is_empty());
    }
}
