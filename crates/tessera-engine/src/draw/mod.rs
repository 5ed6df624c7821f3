//! Per-draw data: what is drawn, where, in which order and with which style.
//!
//! A [`DrawParams`] is built once per draw and read by every render step of
//! the renderer chosen for it.

mod clip;
mod geometry;
mod order;
mod params;
mod stroke;

pub use clip::{Clip, NonMsaaClip};
pub use geometry::{Geometry, GlyphFormat, MaskShape, TextSubRun, VertexMode, VerticesBlob};
pub use order::{CompressedPaintersOrder, DisjointStencilIndex, DrawOrder, PaintersDepth};
pub use params::DrawParams;
pub use stroke::{Cap, Join, StrokeStyle};
