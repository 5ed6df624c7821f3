/// Stroke join.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Join {
    Miter(f32),
    Round,
    Bevel,
}

/// Stroke cap.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Cap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke parameters.
///
/// The join is kept as a signed limit: positive is the miter limit, zero is
/// bevel and negative is round. A half width of zero is a hairline, one
/// device pixel wide regardless of the transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeStyle {
    half_width: f32,
    join_limit: f32,
    cap: Cap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(1.0, Join::Miter(4.0), Cap::Butt)
    }
}

impl StrokeStyle {
    pub fn new(width: f32, join: Join, cap: Cap) -> Self {
        let join_limit = match join {
            Join::Miter(limit) => limit.max(0.0),
            Join::Round => -1.0,
            Join::Bevel => 0.0,
        };
        Self { half_width: 0.5 * width.max(0.0), join_limit, cap }
    }

    #[inline]
    pub fn hairline() -> Self {
        Self::new(0.0, Join::Miter(4.0), Cap::Butt)
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.half_width
    }

    #[inline]
    pub fn width(&self) -> f32 {
        2.0 * self.half_width
    }

    #[inline]
    pub fn join_limit(&self) -> f32 {
        self.join_limit
    }

    #[inline]
    pub fn cap(&self) -> Cap {
        self.cap
    }

    #[inline]
    pub fn is_hairline(&self) -> bool {
        self.half_width == 0.0
    }

    #[inline]
    pub fn is_miter_join(&self) -> bool {
        self.join_limit > 0.0
    }

    #[inline]
    pub fn is_bevel_join(&self) -> bool {
        self.join_limit == 0.0
    }

    #[inline]
    pub fn is_round_join(&self) -> bool {
        self.join_limit < 0.0
    }

    #[inline]
    pub fn miter_limit(&self) -> f32 {
        self.join_limit.max(0.0)
    }
}
