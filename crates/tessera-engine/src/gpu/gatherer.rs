use bytemuck::Pod;
use smallvec::SmallVec;

use crate::geom::{Transform, Vec2};

/// Sampler filtering for a bound texture.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

/// Texture reference plus how to sample it.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextureBinding {
    /// Index in the caller's texture table.
    pub texture: u32,
    pub filter: Filter,
}

/// Collects the uniform bytes and texture bindings a render step writes for
/// one draw.
///
/// Uniforms are laid out with std140-like alignment: scalars on 4 bytes,
/// two-component vectors on 8, wider vectors and matrices on 16.
#[derive(Debug, Default, Clone)]
pub struct PipelineDataGatherer {
    uniforms: Vec<u8>,
    textures: SmallVec<[TextureBinding; 2]>,
}

impl PipelineDataGatherer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops the data gathered for the previous draw.
    #[inline]
    pub fn reset(&mut self) {
        self.uniforms.clear();
        self.textures.clear();
    }

    fn write_aligned<T: Pod>(&mut self, value: T, alignment: usize) {
        let padded = self.uniforms.len().next_multiple_of(alignment);
        self.uniforms.resize(padded, 0);
        self.uniforms.extend_from_slice(bytemuck::bytes_of(&value));
    }

    #[inline]
    pub fn write_f32(&mut self, v: f32) {
        self.write_aligned(v, 4);
    }

    #[inline]
    pub fn write_vec2(&mut self, v: Vec2) {
        self.write_aligned(v.to_array(), 8);
    }

    #[inline]
    pub fn write_vec4(&mut self, v: [f32; 4]) {
        self.write_aligned(v, 16);
    }

    /// Writes the full 4x4 matrix, column-major.
    #[inline]
    pub fn write_matrix(&mut self, m: &Transform) {
        self.write_aligned(*m.cols(), 16);
    }

    #[inline]
    pub fn add_texture(&mut self, texture: u32, filter: Filter) {
        self.textures.push(TextureBinding { texture, filter });
    }

    #[inline]
    pub fn uniform_data(&self) -> &[u8] {
        &self.uniforms
    }

    #[inline]
    pub fn textures(&self) -> &[TextureBinding] {
        &self.textures
    }

    #[inline]
    pub fn has_uniforms(&self) -> bool {
        !self.uniforms.is_empty()
    }
}
