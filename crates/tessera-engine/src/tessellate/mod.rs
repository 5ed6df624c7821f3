//! Fixed-count path tessellation support.
//!
//! The stencil-and-cover renderers never tessellate on the CPU. They write
//! one instance per curve ([`Patch`]) and let a shared static template
//! subdivide it in the vertex shader. This module provides the pieces those
//! steps need: segment estimates, the templates and their count proxies, and
//! the middle-out triangulation of each contour's inner polygon.

pub mod fixed_count;
pub mod middle_out;
mod patch;
pub mod wangs;

pub use fixed_count::{CurveCount, TemplateVertex, WedgeCount};
pub use patch::{curve_patches, wedge_patches, CurveType, Patch};
