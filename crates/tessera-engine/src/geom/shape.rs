use std::borrow::Cow;

use super::{FillType, Path, RRect, Rect, Vec2};

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Empty,
    Line(Vec2, Vec2),
    Rect(Rect),
    RRect(RRect),
    Path(Path),
}

/// A drawable shape: one of a few simple forms, or a general path, plus an
/// inverse-fill bit.
///
/// Simple forms keep their identity so analytic renderers can handle them
/// without tessellation.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    inverted: bool,
}

impl Shape {
    #[inline]
    pub fn empty() -> Self {
        Self { kind: ShapeKind::Empty, inverted: false }
    }

    #[inline]
    pub fn line(p0: Vec2, p1: Vec2) -> Self {
        Self { kind: ShapeKind::Line(p0, p1), inverted: false }
    }

    #[inline]
    pub fn rect(rect: Rect) -> Self {
        Self { kind: ShapeKind::Rect(rect.sorted()), inverted: false }
    }

    #[inline]
    pub fn rrect(rrect: RRect) -> Self {
        Self { kind: ShapeKind::RRect(rrect), inverted: false }
    }

    /// A path shape; the inverse bit is taken from the path's fill type.
    pub fn path(path: Path) -> Self {
        let inverted = path.fill_type().is_inverse();
        Self { kind: ShapeKind::Path(path), inverted }
    }

    #[inline]
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    #[inline]
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    #[inline]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, ShapeKind::Empty)
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self.kind, ShapeKind::Line(..))
    }

    #[inline]
    pub fn is_rect(&self) -> bool {
        matches!(self.kind, ShapeKind::Rect(_))
    }

    #[inline]
    pub fn is_rrect(&self) -> bool {
        matches!(self.kind, ShapeKind::RRect(_))
    }

    #[inline]
    pub fn is_path(&self) -> bool {
        matches!(self.kind, ShapeKind::Path(_))
    }

    /// The rrect form of a rect or rrect shape.
    pub fn as_rrect(&self) -> Option<RRect> {
        match &self.kind {
            ShapeKind::Rect(r) => Some(RRect::from_rect(*r)),
            ShapeKind::RRect(rr) => Some(*rr),
            _ => None,
        }
    }

    /// Local bounds. Rects and rrects report their tight rect.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            ShapeKind::Empty => Rect::empty(),
            ShapeKind::Line(p0, p1) => Rect::from_points(&[*p0, *p1]),
            ShapeKind::Rect(r) => *r,
            ShapeKind::RRect(rr) => rr.rect(),
            ShapeKind::Path(p) => p.bounds(),
        }
    }

    /// Fill rule including the inverse bit. Simple shapes fill with winding.
    pub fn fill_type(&self) -> FillType {
        let base = match &self.kind {
            ShapeKind::Path(p) => p.fill_type(),
            _ => FillType::Winding,
        };
        match (base.is_even_odd(), self.inverted) {
            (false, false) => FillType::Winding,
            (true, false) => FillType::EvenOdd,
            (false, true) => FillType::InverseWinding,
            (true, true) => FillType::InverseEvenOdd,
        }
    }

    pub fn is_convex(&self) -> bool {
        match &self.kind {
            ShapeKind::Empty => false,
            ShapeKind::Line(..) | ShapeKind::Rect(_) | ShapeKind::RRect(_) => true,
            ShapeKind::Path(p) => p.is_convex(),
        }
    }

    /// Number of verbs the path form carries.
    pub fn verb_count(&self) -> usize {
        match &self.kind {
            ShapeKind::Path(p) => p.verb_count(),
            ShapeKind::Empty => 0,
            ShapeKind::Line(..) => 2,
            ShapeKind::Rect(_) => 5,
            ShapeKind::RRect(rr) if rr.is_rect() => 5,
            ShapeKind::RRect(_) => 10,
        }
    }

    /// Path form of the shape, borrowing when it already is a path.
    pub fn as_path(&self) -> Cow<'_, Path> {
        let mut path = match &self.kind {
            ShapeKind::Path(p) => return Cow::Borrowed(p),
            ShapeKind::Empty => Path::new(),
            ShapeKind::Line(p0, p1) => {
                let mut path = Path::new();
                path.move_to(*p0).line_to(*p1);
                path
            }
            ShapeKind::Rect(r) => Path::from_rect(*r),
            ShapeKind::RRect(rr) => Path::from_rrect(rr),
        };
        path.set_fill_type(self.fill_type());
        Cow::Owned(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_shape_inherits_inverse_bit() {
        let mut path = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        path.set_fill_type(FillType::InverseEvenOdd);
        let shape = Shape::path(path);
        assert!(shape.inverted());
        assert_eq!(shape.fill_type(), FillType::InverseEvenOdd);
        assert!(matches!(shape.as_path(), Cow::Borrowed(_)));
    }

    #[test]
    fn inverted_rect_path_carries_fill() {
        let shape = Shape::rect(Rect::new(0.0, 0.0, 2.0, 2.0)).with_inverted(true);
        assert_eq!(shape.as_path().fill_type(), FillType::InverseWinding);
        assert_eq!(shape.as_rrect().map(|rr| rr.is_rect()), Some(true));
    }

    #[test]
    fn verb_count_matches_path_form() {
        let rr = RRect::from_rect_xy(Rect::new(0.0, 0.0, 10.0, 10.0), 2.0, 2.0);
        let shape = Shape::rrect(rr);
        assert_eq!(shape.verb_count(), shape.as_path().verb_count());
        let rect = Shape::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(rect.verb_count(), rect.as_path().verb_count());
    }
}
