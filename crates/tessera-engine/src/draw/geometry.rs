use crate::geom::{EdgeAAQuad, Rect, Shape, Vec2};

/// Mask stored in an atlas texture and drawn over device-space bounds.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaskShape {
    /// Texture index in the caller's texture table.
    pub texture: u32,
    /// Top-left of the mask within the atlas, in texels.
    pub atlas_origin: Vec2,
    /// Full atlas dimensions, in texels.
    pub atlas_size: Vec2,
    /// Device-space rect the mask covers.
    pub device_bounds: Rect,
    pub inverted: bool,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum VertexMode {
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Caller-provided triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerticesBlob {
    pub mode: VertexMode,
    pub positions: Vec<Vec2>,
    /// Per-vertex premultiplied RGBA8 colors.
    pub colors: Option<Vec<[u8; 4]>>,
    pub tex_coords: Option<Vec<Vec2>>,
    pub indices: Option<Vec<u16>>,
}

impl VerticesBlob {
    pub fn triangles(positions: Vec<Vec2>) -> Self {
        Self { positions, ..Self::default() }
    }

    #[inline]
    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    #[inline]
    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.is_some()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.positions)
    }

    /// Vertex indices of the mesh expanded to a triangle list.
    ///
    /// Out-of-range indices and trailing partial triangles are dropped.
    pub fn triangle_list(&self) -> Vec<u32> {
        let n = self.positions.len();
        let order: Vec<u32> = match &self.indices {
            Some(indices) => indices.iter().map(|&i| i as u32).collect(),
            None => (0..n as u32).collect(),
        };

        let mut out = Vec::new();
        match self.mode {
            VertexMode::Triangles => {
                for tri in order.chunks_exact(3) {
                    out.extend_from_slice(tri);
                }
            }
            VertexMode::TriangleStrip => {
                for i in 2..order.len() {
                    // Every other strip triangle flips so winding stays consistent.
                    if i % 2 == 0 {
                        out.extend([order[i - 2], order[i - 1], order[i]]);
                    } else {
                        out.extend([order[i - 1], order[i - 2], order[i]]);
                    }
                }
            }
            VertexMode::TriangleFan => {
                for i in 2..order.len() {
                    out.extend([order[0], order[i - 1], order[i]]);
                }
            }
        }

        out.chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| (i as usize) < n))
            .flatten()
            .copied()
            .collect()
    }
}

/// How glyph masks in a sub-run are stored.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum GlyphFormat {
    A8,
    Lcd,
    Sdf,
    SdfLcd,
}

/// A run of glyphs sharing one atlas and format.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSubRun {
    pub format: GlyphFormat,
    pub glyph_origins: Vec<Vec2>,
    pub bounds: Rect,
}

impl TextSubRun {
    #[inline]
    pub fn is_lcd(&self) -> bool {
        matches!(self.format, GlyphFormat::Lcd | GlyphFormat::SdfLcd)
    }

    #[inline]
    pub fn is_sdf(&self) -> bool {
        matches!(self.format, GlyphFormat::Sdf | GlyphFormat::SdfLcd)
    }
}

/// Geometry of a single draw. Owned by the draw and read-only while its
/// render steps run.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Shape(Shape),
    EdgeAAQuad(EdgeAAQuad),
    AtlasShape(MaskShape),
    CoverageMask(MaskShape),
    Vertices(VerticesBlob),
    SubRun(TextSubRun),
}

impl Geometry {
    /// Bounds in the space the geometry is defined in. Masks are defined in
    /// device space.
    pub fn bounds(&self) -> Rect {
        match self {
            Geometry::Shape(shape) => shape.bounds(),
            Geometry::EdgeAAQuad(quad) => quad.bounds(),
            Geometry::AtlasShape(mask) | Geometry::CoverageMask(mask) => mask.device_bounds,
            Geometry::Vertices(blob) => blob.bounds(),
            Geometry::SubRun(run) => run.bounds,
        }
    }

    #[inline]
    pub fn is_shape(&self) -> bool {
        matches!(self, Geometry::Shape(_))
    }

    #[inline]
    pub fn is_edge_aa_quad(&self) -> bool {
        matches!(self, Geometry::EdgeAAQuad(_))
    }

    #[inline]
    pub fn shape(&self) -> Option<&Shape> {
        match self {
            Geometry::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    #[inline]
    pub fn edge_aa_quad(&self) -> Option<&EdgeAAQuad> {
        match self {
            Geometry::EdgeAAQuad(quad) => Some(quad),
            _ => None,
        }
    }

    /// True when the draw covers everything outside the geometry.
    pub fn is_inverse_fill(&self) -> bool {
        match self {
            Geometry::Shape(shape) => shape.inverted(),
            Geometry::AtlasShape(mask) | Geometry::CoverageMask(mask) => mask.inverted,
            _ => false,
        }
    }
}
