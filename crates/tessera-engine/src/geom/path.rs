use core::f32::consts::{FRAC_1_SQRT_2, PI};

use crate::error::GeometryError;

use super::{RRect, Rect, Vec2};

/// Rule deciding which regions of a path are inside.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum FillType {
    #[default]
    Winding,
    EvenOdd,
    InverseWinding,
    InverseEvenOdd,
}

impl FillType {
    pub const ALL: [FillType; 4] = [
        FillType::Winding,
        FillType::EvenOdd,
        FillType::InverseWinding,
        FillType::InverseEvenOdd,
    ];

    #[inline]
    pub fn is_inverse(self) -> bool {
        matches!(self, FillType::InverseWinding | FillType::InverseEvenOdd)
    }

    #[inline]
    pub fn is_even_odd(self) -> bool {
        matches!(self, FillType::EvenOdd | FillType::InverseEvenOdd)
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FillType::Winding => "winding",
            FillType::EvenOdd => "evenodd",
            FillType::InverseWinding => "inverse-winding",
            FillType::InverseEvenOdd => "inverse-evenodd",
        }
    }
}

impl TryFrom<u8> for FillType {
    type Error = GeometryError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        FillType::ALL
            .get(raw as usize)
            .copied()
            .ok_or(GeometryError::InvalidFillType(raw))
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Verb {
    Move,
    Line,
    Quad,
    Conic,
    Cubic,
    Close,
}

/// One drawable piece of a contour.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    Line([Vec2; 2]),
    Quad([Vec2; 3]),
    Conic([Vec2; 3], f32),
    Cubic([Vec2; 4]),
}

impl Segment {
    #[inline]
    pub fn start(&self) -> Vec2 {
        match self {
            Segment::Line(p) => p[0],
            Segment::Quad(p) | Segment::Conic(p, _) => p[0],
            Segment::Cubic(p) => p[0],
        }
    }

    #[inline]
    pub fn end(&self) -> Vec2 {
        match self {
            Segment::Line(p) => p[1],
            Segment::Quad(p) | Segment::Conic(p, _) => p[2],
            Segment::Cubic(p) => p[3],
        }
    }

    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, Segment::Line(_))
    }
}

/// A closed run of segments. Fills treat every contour as closed, so the
/// closing line is materialized when the last point differs from the start.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub segments: Vec<Segment>,
}

impl Contour {
    /// Segment end points, which form the contour's inner polygon.
    pub fn polygon(&self) -> Vec<Vec2> {
        self.segments.iter().map(Segment::end).collect()
    }

    /// Average of the segment end points.
    pub fn midpoint(&self) -> Vec2 {
        let n = self.segments.len().max(1) as f32;
        self.segments.iter().fold(Vec2::zero(), |acc, s| acc + s.end()) / n
    }
}

/// Verb/point path with a fill rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    verbs: Vec<Verb>,
    points: Vec<Vec2>,
    weights: Vec<f32>,
    fill_type: FillType,
}

impl Path {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rect(rect: Rect) -> Self {
        let [a, b, c, d] = rect.sorted().corners();
        let mut path = Path::new();
        path.move_to(a).line_to(b).line_to(c).line_to(d).close();
        path
    }

    /// Rounded rect outline using quarter-circle conics at each corner.
    pub fn from_rrect(rrect: &RRect) -> Self {
        if rrect.is_rect() {
            return Path::from_rect(rrect.rect());
        }
        let r = rrect.rect();
        let [tl, tr, br, bl] = rrect.all_radii();
        let w = FRAC_1_SQRT_2;

        let mut path = Path::new();
        path.move_to(Vec2::new(r.left + tl.x, r.top))
            .line_to(Vec2::new(r.right - tr.x, r.top))
            .conic_to(Vec2::new(r.right, r.top), Vec2::new(r.right, r.top + tr.y), w)
            .line_to(Vec2::new(r.right, r.bottom - br.y))
            .conic_to(Vec2::new(r.right, r.bottom), Vec2::new(r.right - br.x, r.bottom), w)
            .line_to(Vec2::new(r.left + bl.x, r.bottom))
            .conic_to(Vec2::new(r.left, r.bottom), Vec2::new(r.left, r.bottom - bl.y), w)
            .line_to(Vec2::new(r.left, r.top + tl.y))
            .conic_to(Vec2::new(r.left, r.top), Vec2::new(r.left + tl.x, r.top), w)
            .close();
        path
    }

    pub fn move_to(&mut self, p: Vec2) -> &mut Self {
        self.verbs.push(Verb::Move);
        self.points.push(p);
        self
    }

    pub fn line_to(&mut self, p: Vec2) -> &mut Self {
        self.inject_move();
        self.verbs.push(Verb::Line);
        self.points.push(p);
        self
    }

    pub fn quad_to(&mut self, p1: Vec2, p2: Vec2) -> &mut Self {
        self.inject_move();
        self.verbs.push(Verb::Quad);
        self.points.extend([p1, p2]);
        self
    }

    pub fn conic_to(&mut self, p1: Vec2, p2: Vec2, weight: f32) -> &mut Self {
        self.inject_move();
        self.verbs.push(Verb::Conic);
        self.points.extend([p1, p2]);
        self.weights.push(weight);
        self
    }

    pub fn cubic_to(&mut self, p1: Vec2, p2: Vec2, p3: Vec2) -> &mut Self {
        self.inject_move();
        self.verbs.push(Verb::Cubic);
        self.points.extend([p1, p2, p3]);
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if matches!(self.verbs.last(), Some(v) if *v != Verb::Close) {
            self.verbs.push(Verb::Close);
        }
        self
    }

    fn inject_move(&mut self) {
        if self.verbs.is_empty() {
            self.move_to(Vec2::zero());
        }
    }

    #[inline]
    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    #[inline]
    pub fn set_fill_type(&mut self, fill_type: FillType) {
        self.fill_type = fill_type;
    }

    #[inline]
    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn verb_count(&self) -> usize {
        self.verbs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Bounds of all control points.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.points)
    }

    /// Splits the path into closed contours. Contours with no drawable
    /// segments are dropped.
    pub fn contours(&self) -> Vec<Contour> {
        let mut contours = Vec::new();
        let mut current: Vec<Segment> = Vec::new();
        let mut start = Vec2::zero();
        let mut last = Vec2::zero();
        let mut pts = 0usize;
        let mut weights = 0usize;

        let mut finish = |segments: &mut Vec<Segment>, last: Vec2, start: Vec2| {
            if segments.is_empty() {
                return;
            }
            if last != start {
                segments.push(Segment::Line([last, start]));
            }
            contours.push(Contour { segments: core::mem::take(segments) });
        };

        for &verb in &self.verbs {
            match verb {
                Verb::Move => {
                    finish(&mut current, last, start);
                    start = self.points[pts];
                    last = start;
                    pts += 1;
                }
                Verb::Line => {
                    let p = self.points[pts];
                    current.push(Segment::Line([last, p]));
                    last = p;
                    pts += 1;
                }
                Verb::Quad => {
                    let (p1, p2) = (self.points[pts], self.points[pts + 1]);
                    current.push(Segment::Quad([last, p1, p2]));
                    last = p2;
                    pts += 2;
                }
                Verb::Conic => {
                    let (p1, p2) = (self.points[pts], self.points[pts + 1]);
                    current.push(Segment::Conic([last, p1, p2], self.weights[weights]));
                    last = p2;
                    pts += 2;
                    weights += 1;
                }
                Verb::Cubic => {
                    let (p1, p2, p3) = (self.points[pts], self.points[pts + 1], self.points[pts + 2]);
                    current.push(Segment::Cubic([last, p1, p2, p3]));
                    last = p3;
                    pts += 3;
                }
                Verb::Close => {
                    finish(&mut current, last, start);
                    last = start;
                }
            }
        }
        finish(&mut current, last, start);
        contours
    }

    /// Conservative convexity test over the control polygon: a single contour
    /// whose turns all share a sign and sum to one full revolution.
    pub fn is_convex(&self) -> bool {
        let contours = self.contours();
        let [contour] = contours.as_slice() else {
            return false;
        };

        let mut poly: Vec<Vec2> = Vec::new();
        for seg in &contour.segments {
            let pts: &[Vec2] = match seg {
                Segment::Line(p) => &p[1..],
                Segment::Quad(p) | Segment::Conic(p, _) => &p[1..],
                Segment::Cubic(p) => &p[1..],
            };
            for &p in pts {
                if poly.last() != Some(&p) {
                    poly.push(p);
                }
            }
        }
        if poly.len() > 1 && poly.first() == poly.last() {
            poly.pop();
        }
        if poly.len() < 3 {
            return false;
        }

        let n = poly.len();
        let mut sign = 0.0f32;
        let mut turning = 0.0f32;
        for i in 0..n {
            let a = poly[(i + 1) % n] - poly[i];
            let b = poly[(i + 2) % n] - poly[(i + 1) % n];
            let cross = a.cross(b);
            if cross != 0.0 {
                if sign != 0.0 && cross.signum() != sign {
                    return false;
                }
                sign = cross.signum();
            }
            turning += cross.atan2(a.dot(b));
        }
        (turning.abs() - 2.0 * PI).abs() < 1e-3
    }
}
