//! Glyph steps. Bitmap and distance-field text declare their pipeline
//! layout so the text renderers exist, but glyph encoding is not implemented
//! and text draws are skipped.

use super::step::{RenderStep, StepDesc, StepKind};
use crate::gpu::depth_stencil::DIRECT_DEPTH_GREATER_PASS;
use crate::gpu::{PrimitiveType, RenderStateFlags, SlType, StepFlags, Uniform};

const TEXT_UNIFORMS: [Uniform; 2] = [
    Uniform::new("subRunDeviceMatrix", SlType::Float4x4),
    Uniform::new("atlasSizeInv", SlType::Float2),
];

fn text_flags(lcd: bool) -> StepFlags {
    let flags = StepFlags::PERFORMS_SHADING | StepFlags::EMITS_COVERAGE | StepFlags::HAS_TEXTURES;
    if lcd { flags | StepFlags::LCD_COVERAGE } else { flags }
}

fn text_desc(name: String, lcd: bool) -> StepDesc {
    StepDesc {
        name,
        flags: text_flags(lcd),
        uniforms: &TEXT_UNIFORMS,
        primitive: PrimitiveType::TriangleStrip,
        depth_stencil: DIRECT_DEPTH_GREATER_PASS,
        render_state: RenderStateFlags::APPEND_INSTANCES,
        vertex_attrs: &[],
        instance_attrs: &[],
        varyings: &[],
    }
}

#[inline]
fn suffix(lcd: bool) -> &'static str {
    if lcd { "lcd" } else { "a8" }
}

/// Glyphs sampled from a coverage atlas.
#[derive(Debug)]
pub struct TextDirectStep {
    pub lcd: bool,
}

impl TextDirectStep {
    pub fn new(lcd: bool) -> RenderStep {
        let desc = text_desc(format!("TextDirectRenderStep[{}]", suffix(lcd)), lcd);
        RenderStep::new(desc, StepKind::TextDirect(Self { lcd }))
    }
}

/// Glyphs reconstructed from a signed distance field atlas.
#[derive(Debug)]
pub struct TextSdfStep {
    pub lcd: bool,
}

impl TextSdfStep {
    pub fn new(lcd: bool) -> RenderStep {
        let desc = text_desc(format!("TextSDFRenderStep[{}]", suffix(lcd)), lcd);
        RenderStep::new(desc, StepKind::TextSdf(Self { lcd }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lcd_variants_flag_lcd_coverage() {
        let a8 = TextDirectStep::new(false);
        let lcd = TextSdfStep::new(true);
        assert_eq!(a8.name(), "TextDirectRenderStep[a8]");
        assert_eq!(lcd.name(), "TextSDFRenderStep[lcd]");
        assert!(!a8.flags().contains(StepFlags::LCD_COVERAGE));
        assert!(lcd.flags().contains(StepFlags::LCD_COVERAGE));
        assert!(lcd.has_textures());
    }

    #[test]
    fn text_steps_are_not_supported() {
        assert!(!TextDirectStep::new(true).is_supported());
        assert!(!TextSdfStep::new(false).is_supported());
    }
}
