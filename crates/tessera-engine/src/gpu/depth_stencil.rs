//! Depth/stencil state and the presets shared by the render steps.
//!
//! Stencil-then-cover fills run a stencil step (winding counts or even-odd
//! parity) followed by a cover step that tests the stencil and resets it to
//! zero, so no separate clear is needed between paths.

use crate::geom::FillType;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum CompareOp {
    #[default]
    Always,
    Never,
    Less,
    LEqual,
    Equal,
    NotEqual,
    Greater,
    GEqual,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    Invert,
    IncWrap,
    DecWrap,
    IncClamp,
    DecClamp,
}

/// Stencil behavior for one face.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct StencilFace {
    pub stencil_fail: StencilOp,
    pub depth_fail: StencilOp,
    pub depth_stencil_pass: StencilOp,
    pub compare: CompareOp,
    pub read_mask: u32,
    pub write_mask: u32,
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct DepthStencilSettings {
    pub front: StencilFace,
    pub back: StencilFace,
    pub stencil_reference: u32,
    pub depth_compare: CompareOp,
    pub stencil_test: bool,
    pub depth_write: bool,
}

impl DepthStencilSettings {
    #[inline]
    pub fn depth_test(&self) -> bool {
        self.depth_compare != CompareOp::Always
    }
}

const INCREMENT_CW: StencilFace = StencilFace {
    stencil_fail: StencilOp::Keep,
    depth_fail: StencilOp::Keep,
    depth_stencil_pass: StencilOp::IncWrap,
    compare: CompareOp::Always,
    read_mask: 0xffff_ffff,
    write_mask: 0xffff_ffff,
};

const DECREMENT_CCW: StencilFace = StencilFace {
    stencil_fail: StencilOp::Keep,
    depth_fail: StencilOp::Keep,
    depth_stencil_pass: StencilOp::DecWrap,
    compare: CompareOp::Always,
    read_mask: 0xffff_ffff,
    write_mask: 0xffff_ffff,
};

/// Flips the low bit on every covering triangle.
const TOGGLE: StencilFace = StencilFace {
    stencil_fail: StencilOp::Keep,
    depth_fail: StencilOp::Keep,
    depth_stencil_pass: StencilOp::Invert,
    compare: CompareOp::Always,
    read_mask: 0xffff_ffff,
    write_mask: 0x0000_0001,
};

/// Passes where the stencil is non-zero and zeroes it.
const PASS_NON_ZERO: StencilFace = StencilFace {
    stencil_fail: StencilOp::Keep,
    depth_fail: StencilOp::Zero,
    depth_stencil_pass: StencilOp::Zero,
    compare: CompareOp::NotEqual,
    read_mask: 0xffff_ffff,
    write_mask: 0xffff_ffff,
};

/// Passes where the stencil is zero; zeroes the pixels that fail.
const PASS_ZERO: StencilFace = StencilFace {
    stencil_fail: StencilOp::Zero,
    depth_fail: StencilOp::Keep,
    depth_stencil_pass: StencilOp::Keep,
    compare: CompareOp::Equal,
    read_mask: 0xffff_ffff,
    write_mask: 0xffff_ffff,
};

const NO_STENCIL: StencilFace = StencilFace {
    stencil_fail: StencilOp::Keep,
    depth_fail: StencilOp::Keep,
    depth_stencil_pass: StencilOp::Keep,
    compare: CompareOp::Always,
    read_mask: 0,
    write_mask: 0,
};

/// Winding stencil: clockwise triangles increment, counter-clockwise decrement.
pub const WINDING_STENCIL_PASS: DepthStencilSettings = DepthStencilSettings {
    front: INCREMENT_CW,
    back: DECREMENT_CCW,
    stencil_reference: 0,
    depth_compare: CompareOp::Greater,
    stencil_test: true,
    depth_write: false,
};

pub const EVEN_ODD_STENCIL_PASS: DepthStencilSettings = DepthStencilSettings {
    front: TOGGLE,
    back: TOGGLE,
    stencil_reference: 0,
    depth_compare: CompareOp::Greater,
    stencil_test: true,
    depth_write: false,
};

pub const REGULAR_COVER_PASS: DepthStencilSettings = DepthStencilSettings {
    front: PASS_NON_ZERO,
    back: PASS_NON_ZERO,
    stencil_reference: 0,
    depth_compare: CompareOp::Greater,
    stencil_test: true,
    depth_write: true,
};

pub const INVERSE_COVER_PASS: DepthStencilSettings = DepthStencilSettings {
    front: PASS_ZERO,
    back: PASS_ZERO,
    stencil_reference: 0,
    depth_compare: CompareOp::Greater,
    stencil_test: true,
    depth_write: true,
};

/// Single-pass draws that never overlap themselves within a pixel.
pub const DIRECT_DEPTH_GREATER_PASS: DepthStencilSettings = DepthStencilSettings {
    front: NO_STENCIL,
    back: NO_STENCIL,
    stencil_reference: 0,
    depth_compare: CompareOp::Greater,
    stencil_test: false,
    depth_write: true,
};

/// Single-pass draws that may shade the same depth more than once.
pub const DIRECT_DEPTH_GEQUAL_PASS: DepthStencilSettings = DepthStencilSettings {
    front: NO_STENCIL,
    back: NO_STENCIL,
    stencil_reference: 0,
    depth_compare: CompareOp::GEqual,
    stencil_test: false,
    depth_write: true,
};

/// Stencil pass that accumulates coverage for `fill`.
pub fn stencil_pass(fill: FillType) -> DepthStencilSettings {
    if fill.is_even_odd() { EVEN_ODD_STENCIL_PASS } else { WINDING_STENCIL_PASS }
}

/// Cover pass that shades where the stencil marks `fill` as inside.
pub fn cover_pass(fill: FillType) -> DepthStencilSettings {
    if fill.is_inverse() { INVERSE_COVER_PASS } else { REGULAR_COVER_PASS }
}
