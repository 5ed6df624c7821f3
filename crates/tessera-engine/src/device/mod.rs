//! wgpu backend.
//!
//! This module is responsible for:
//! - creating a headless wgpu Instance/Adapter/Device/Queue
//! - staging recorded buffers and uploading them as wgpu buffers
//! - translating pipeline descriptions into wgpu state
//! - replaying a recorded [`DrawPass`](crate::pass::DrawPass) into a render pass
//!
//! Shader modules and render pipelines are built by the caller from
//! [`RenderStep`](crate::render::RenderStep) metadata.

mod buffers;
pub mod convert;
mod gpu;
mod init;
mod replay;

pub use buffers::{WgpuBufferManager, PASS_HANDLE_BASE};
pub use convert::StepVertexLayout;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use replay::{replay, ReplayResources, TEXTURE_GROUP, UNIFORM_GROUP};
