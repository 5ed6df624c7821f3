use crate::geom::Rect;

/// Clip applied without MSAA, evaluated in the fragment stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NonMsaaClip {
    /// Analytic rect or rrect clip, evaluated in the shader.
    Analytic { bounds: Rect },
    /// Coverage mask rendered into an atlas.
    AtlasMask { bounds: Rect, texture: u32 },
}

/// Device-space clip state for one draw.
///
/// The draw bounds are always contained in the scissor. For inverse fills the
/// draw bounds equal the scissor, whatever the shape bounds are.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Clip {
    draw_bounds: Rect,
    transformed_shape_bounds: Rect,
    scissor: Rect,
    non_msaa_clip: Option<NonMsaaClip>,
    /// Index of a clip shader in the caller's shader table.
    clip_shader: Option<u32>,
}

impl Clip {
    /// Builds a clip from the device-space shape bounds and the scissor.
    pub fn new(transformed_shape_bounds: Rect, scissor: Rect, inverse_fill: bool) -> Self {
        let scissor = scissor.round_out();
        let draw_bounds = if inverse_fill {
            scissor
        } else {
            transformed_shape_bounds.intersect(scissor).unwrap_or(Rect::empty())
        };
        debug_assert!(draw_bounds.is_empty() || scissor.contains_rect(draw_bounds));
        Self {
            draw_bounds,
            transformed_shape_bounds,
            scissor,
            non_msaa_clip: None,
            clip_shader: None,
        }
    }

    #[inline]
    pub fn with_non_msaa_clip(mut self, clip: NonMsaaClip) -> Self {
        self.non_msaa_clip = Some(clip);
        self
    }

    #[inline]
    pub fn with_clip_shader(mut self, shader: u32) -> Self {
        self.clip_shader = Some(shader);
        self
    }

    #[inline]
    pub fn draw_bounds(&self) -> Rect {
        self.draw_bounds
    }

    #[inline]
    pub fn transformed_shape_bounds(&self) -> Rect {
        self.transformed_shape_bounds
    }

    #[inline]
    pub fn scissor(&self) -> Rect {
        self.scissor
    }

    #[inline]
    pub fn non_msaa_clip(&self) -> Option<&NonMsaaClip> {
        self.non_msaa_clip.as_ref()
    }

    #[inline]
    pub fn clip_shader(&self) -> Option<u32> {
        self.clip_shader
    }

    #[inline]
    pub fn is_clipped_out(&self) -> bool {
        self.draw_bounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_bounds_are_scissored() {
        let clip = Clip::new(Rect::new(-5.0, 2.0, 50.0, 8.0), Rect::new(0.0, 0.0, 20.0, 20.0), false);
        assert_eq!(clip.draw_bounds(), Rect::new(0.0, 2.0, 20.0, 8.0));
        assert!(clip.scissor().contains_rect(clip.draw_bounds()));
    }

    #[test]
    fn inverse_fill_covers_scissor() {
        let clip = Clip::new(Rect::new(2.0, 2.0, 3.0, 3.0), Rect::new(0.0, 0.0, 10.5, 10.0), true);
        assert_eq!(clip.draw_bounds(), Rect::new(0.0, 0.0, 11.0, 10.0));
    }

    #[test]
    fn disjoint_shape_is_clipped_out() {
        let clip = Clip::new(Rect::new(30.0, 30.0, 40.0, 40.0), Rect::new(0.0, 0.0, 10.0, 10.0), false);
        assert!(clip.is_clipped_out());
    }
}
