//! Tessera engine crate.
//!
//! Draw submission core of a GPU 2D renderer: draws are matched to
//! renderers made of render steps, recorded into a sorted pass and encoded
//! by a [`DrawWriter`](draw_writer::DrawWriter) into batched vertex, instance
//! and index data plus a backend-neutral command stream.

pub mod logging;
pub mod error;

pub mod geom;
pub mod draw;
pub mod gpu;
pub mod draw_writer;
pub mod tessellate;
pub mod render;
pub mod pass;
pub mod device;

pub use error::{GeometryError, RecordError};
