use super::{Rect, Vec2};

/// Tolerance used when comparing radii components.
const NEARLY_ZERO: f32 = 1.0 / 4096.0;

/// Corner index, clockwise from the top-left.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

/// Rounded rectangle with independent elliptical radii per corner.
///
/// Radii are stored clockwise from the top-left. Construction normalizes the
/// radii: negative or half-zero radii collapse to square corners, and radii
/// that would overlap along a side are scaled down uniformly.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct RRect {
    rect: Rect,
    radii: [Vec2; 4],
}

impl RRect {
    pub fn new(rect: Rect, radii: [Vec2; 4]) -> Self {
        let rect = rect.sorted();
        let mut radii = radii.map(|r| {
            if r.x > 0.0 && r.y > 0.0 && r.is_finite() { r } else { Vec2::zero() }
        });

        let w = rect.width();
        let h = rect.height();
        let mut scale = 1.0f32;
        let mut fit = |side: f32, a: f32, b: f32| {
            if a + b > side && a + b > 0.0 {
                scale = scale.min(side / (a + b));
            }
        };
        fit(w, radii[0].x, radii[1].x);
        fit(w, radii[3].x, radii[2].x);
        fit(h, radii[0].y, radii[3].y);
        fit(h, radii[1].y, radii[2].y);

        if scale < 1.0 {
            for r in &mut radii {
                *r = *r * scale;
            }
        }
        Self { rect, radii }
    }

    #[inline]
    pub fn from_rect(rect: Rect) -> Self {
        Self { rect: rect.sorted(), radii: [Vec2::zero(); 4] }
    }

    #[inline]
    pub fn from_rect_xy(rect: Rect, rx: f32, ry: f32) -> Self {
        Self::new(rect, [Vec2::new(rx, ry); 4])
    }

    #[inline]
    pub fn oval(rect: Rect) -> Self {
        let rect = rect.sorted();
        Self::from_rect_xy(rect, 0.5 * rect.width(), 0.5 * rect.height())
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.width()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.rect.height()
    }

    #[inline]
    pub fn radii(&self, corner: Corner) -> Vec2 {
        self.radii[corner as usize]
    }

    #[inline]
    pub fn all_radii(&self) -> [Vec2; 4] {
        self.radii
    }

    /// X radii clockwise from the top-left.
    #[inline]
    pub fn x_radii(&self) -> [f32; 4] {
        self.radii.map(|r| r.x)
    }

    /// Y radii clockwise from the top-left.
    #[inline]
    pub fn y_radii(&self) -> [f32; 4] {
        self.radii.map(|r| r.y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rect.is_empty()
    }

    /// True when every corner is square.
    #[inline]
    pub fn is_rect(&self) -> bool {
        self.radii.iter().all(|r| r.x == 0.0 && r.y == 0.0)
    }

    /// True when all four corners share the same radii.
    #[inline]
    pub fn is_simple(&self) -> bool {
        self.radii.iter().all(|r| *r == self.radii[0])
    }

    /// True when each corner is circular (possibly different per corner) or square.
    pub fn all_corners_circular(&self) -> bool {
        self.radii.iter().all(|r| (r.x - r.y).abs() <= NEARLY_ZERO)
    }
}
