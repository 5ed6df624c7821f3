//! Backend-neutral GPU vocabulary: buffers, buffer managers, pipeline state
//! and the recorded command stream.
//!
//! Nothing in this module talks to a device. [`crate::device`] turns these
//! descriptions into wgpu objects when a pass is replayed.

mod buffer;
mod commands;
pub mod depth_stencil;
mod gatherer;
mod manager;
mod pipeline;
pub mod size;
mod writer;

pub use buffer::{BindBufferInfo, BufferHandle, BufferSubAllocator};
pub use commands::{DrawBuffers, DrawCommand, DrawPassCommands, ScissorRect};
pub use depth_stencil::{CompareOp, DepthStencilSettings, StencilFace, StencilOp};
pub use gatherer::{Filter, PipelineDataGatherer, TextureBinding};
pub use manager::{
    BlockKind, BufferManagerConfig, CpuBufferManager, DrawBufferManager, MappedRegion,
    StaticBufferManager,
};
pub use pipeline::{
    attribute_stride, Attribute, BarrierType, PrimitiveType, RenderStateFlags, SlType, StepFlags,
    Uniform, Varying, VertexAttribType,
};
pub use writer::VertexWriter;

pub(crate) use manager::BlockPool;
