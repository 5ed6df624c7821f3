//! Backend-neutral description of pipeline state.

use core::ops::BitOr;

/// Primitive assembly mode.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum PrimitiveType {
    #[default]
    Triangles,
    TriangleStrip,
    Points,
}

/// Storage format of one vertex or instance attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum VertexAttribType {
    Float,
    Float2,
    Float3,
    Float4,
    Int,
    UInt,
    UShort2,
    UByte4Norm,
}

impl VertexAttribType {
    /// Size in bytes.
    pub const fn size(self) -> u32 {
        match self {
            VertexAttribType::Float | VertexAttribType::Int | VertexAttribType::UInt => 4,
            VertexAttribType::Float2 => 8,
            VertexAttribType::Float3 => 12,
            VertexAttribType::Float4 => 16,
            VertexAttribType::UShort2 | VertexAttribType::UByte4Norm => 4,
        }
    }
}

/// Shader-side value type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SlType {
    Float,
    Float2,
    Float3,
    Float4,
    Float4x4,
    Int,
    UInt,
    Half4,
}

/// Named vertex or instance attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Attribute {
    pub name: &'static str,
    pub ty: VertexAttribType,
}

impl Attribute {
    pub const fn new(name: &'static str, ty: VertexAttribType) -> Self {
        Self { name, ty }
    }
}

/// Sum of attribute sizes, i.e. the tightly packed stride.
pub const fn attribute_stride(attrs: &[Attribute]) -> u32 {
    let mut stride = 0;
    let mut i = 0;
    while i < attrs.len() {
        stride += attrs[i].ty.size();
        i += 1;
    }
    stride
}

/// Value passed from the vertex to the fragment stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Varying {
    pub name: &'static str,
    pub ty: SlType,
}

impl Varying {
    pub const fn new(name: &'static str, ty: SlType) -> Self {
        Self { name, ty }
    }
}

/// Named uniform declared by a render step.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Uniform {
    pub name: &'static str,
    pub ty: SlType,
}

impl Uniform {
    pub const fn new(name: &'static str, ty: SlType) -> Self {
        Self { name, ty }
    }
}

/// Barrier required between draws of a pipeline.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum BarrierType {
    #[default]
    None,
    /// Non-coherent advanced blending reads the destination.
    AdvancedNoncoherentBlend,
    /// The fragment stage reads the destination texture.
    ReadDstFromInput,
}

/// How a pipeline's geometry reaches the GPU.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct RenderStateFlags(u8);

impl RenderStateFlags {
    pub const NONE: RenderStateFlags = RenderStateFlags(0);
    /// Static template buffers are bound for every draw.
    pub const FIXED_BUFFERS: RenderStateFlags = RenderStateFlags(0b0001);
    pub const APPEND_VERTICES: RenderStateFlags = RenderStateFlags(0b0010);
    pub const APPEND_INSTANCES: RenderStateFlags = RenderStateFlags(0b0100);
    pub const APPEND_DYNAMIC_INSTANCES: RenderStateFlags = RenderStateFlags(0b1000);

    #[inline]
    pub const fn contains(self, other: RenderStateFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn intersects(self, other: RenderStateFlags) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for RenderStateFlags {
    type Output = RenderStateFlags;
    #[inline]
    fn bitor(self, rhs: RenderStateFlags) -> RenderStateFlags {
        RenderStateFlags(self.0 | rhs.0)
    }
}

/// Capabilities of a render step.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct StepFlags(u8);

impl StepFlags {
    pub const NONE: StepFlags = StepFlags(0);
    /// Runs the paint's shading in the fragment stage.
    pub const PERFORMS_SHADING: StepFlags = StepFlags(0b0000_0001);
    /// Produces analytic coverage.
    pub const EMITS_COVERAGE: StepFlags = StepFlags(0b0000_0010);
    pub const REQUIRES_MSAA: StepFlags = StepFlags(0b0000_0100);
    pub const HAS_TEXTURES: StepFlags = StepFlags(0b0000_1000);
    pub const LCD_COVERAGE: StepFlags = StepFlags(0b0001_0000);
    /// Uses a static vertex/index template.
    pub const STATIC_TEMPLATE: StepFlags = StepFlags(0b0010_0000);

    #[inline]
    pub const fn contains(self, other: StepFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StepFlags {
    type Output = StepFlags;
    #[inline]
    fn bitor(self, rhs: StepFlags) -> StepFlags {
        StepFlags(self.0 | rhs.0)
    }
}
