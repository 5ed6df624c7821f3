//! Geometry primitives.
//!
//! Everything here is plain value data: local-space shapes, the local-to-device
//! [`Transform`], and the path representation consumed by the tessellating
//! render steps.

mod path;
mod quad;
mod rect;
mod rrect;
mod shape;
mod transform;
mod vec2;

pub use path::{Contour, FillType, Path, Segment, Verb};
pub use quad::{AAFlags, EdgeAAQuad};
pub use rect::Rect;
pub use rrect::{Corner, RRect};
pub use shape::{Shape, ShapeKind};
pub use transform::{Transform, TransformType};
pub use vec2::Vec2;
