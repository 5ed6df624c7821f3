use anyhow::{Context, Result};

use super::buffers::WgpuBufferManager;
use super::convert::StepVertexLayout;
use crate::gpu::{BindBufferInfo, BufferHandle, DrawBuffers, DrawCommand};
use crate::pass::DrawPass;
use crate::render::RendererProvider;

/// Bind group slot of a step's uniform block.
pub const UNIFORM_GROUP: u32 = 1;
/// Bind group slot of a step's textures.
pub const TEXTURE_GROUP: u32 = 2;

/// GPU objects the commands of one [`DrawPass`] refer to.
///
/// Pipelines, uniform groups and texture groups are indexed like the pass's
/// pipeline, uniform block and texture set tables. Group 0 belongs to the
/// caller (paint data) and is not touched.
pub struct ReplayResources<'r> {
    pub pipelines: &'r [wgpu::RenderPipeline],
    pub uniform_groups: &'r [wgpu::BindGroup],
    pub texture_groups: &'r [wgpu::BindGroup],
    pub templates: &'r WgpuBufferManager,
    pub pass_buffers: &'r WgpuBufferManager,
}

impl ReplayResources<'_> {
    fn buffer(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        self.templates.buffer(handle).or_else(|| self.pass_buffers.buffer(handle))
    }

    fn slice(&self, binding: &BindBufferInfo) -> Result<Option<wgpu::BufferSlice<'_>>> {
        if binding.size == 0 {
            return Ok(None);
        }
        let handle = binding.buffer.context("draw buffer was recorded into scratch memory")?;
        let buffer = self.buffer(handle).with_context(|| format!("buffer {} was not uploaded", handle.0))?;
        let start = binding.offset as u64;
        Ok(Some(buffer.slice(start..start + binding.size as u64)))
    }
}

/// Replays the recorded commands of `pass` into `rpass`.
///
/// Buffers must have been uploaded and every table in `resources` must
/// cover the indices the pass uses.
pub fn replay(
    pass: &DrawPass,
    provider: &RendererProvider,
    resources: &ReplayResources<'_>,
    rpass: &mut wgpu::RenderPass<'_>,
) -> Result<()> {
    let mut instance_slot = 1;

    for command in pass.commands().iter() {
        match *command {
            DrawCommand::BindGraphicsPipeline { pipeline } => {
                let step_id = pass.pipelines()[pipeline as usize];
                let step = provider.step(step_id);
                let gpu_pipeline = resources
                    .pipelines
                    .get(pipeline as usize)
                    .with_context(|| format!("no pipeline for {}", step.name()))?;
                rpass.set_pipeline(gpu_pipeline);
                rpass.set_stencil_reference(step.depth_stencil().stencil_reference);
                instance_slot = StepVertexLayout::new(step).instance_slot();
            }
            DrawCommand::BindUniforms { index } => {
                let group = resources.uniform_groups.get(index as usize).context("missing uniform group")?;
                rpass.set_bind_group(UNIFORM_GROUP, group, &[]);
            }
            DrawCommand::BindTextures { index } => {
                let group = resources.texture_groups.get(index as usize).context("missing texture group")?;
                rpass.set_bind_group(TEXTURE_GROUP, group, &[]);
            }
            DrawCommand::BindDrawBuffers(DrawBuffers { vertices, instances, indices }) => {
                if let Some(slice) = resources.slice(&vertices)? {
                    rpass.set_vertex_buffer(0, slice);
                }
                if let Some(slice) = resources.slice(&instances)? {
                    rpass.set_vertex_buffer(instance_slot, slice);
                }
                if let Some(slice) = resources.slice(&indices)? {
                    rpass.set_index_buffer(slice, wgpu::IndexFormat::Uint16);
                }
            }
            DrawCommand::SetScissor(s) => rpass.set_scissor_rect(s.x, s.y, s.width, s.height),
            DrawCommand::AddBarrier(barrier) => {
                // Render passes order their own draws; barriers only matter
                // to backends with explicit dst reads.
                log::trace!("ignoring {barrier:?} barrier");
            }
            DrawCommand::Draw { base_vertex, vertex_count, .. } => {
                rpass.draw(base_vertex..base_vertex + vertex_count, 0..1);
            }
            DrawCommand::DrawIndexed { base_index, index_count, base_vertex, .. } => {
                rpass.draw_indexed(base_index..base_index + index_count, base_vertex as i32, 0..1);
            }
            DrawCommand::DrawInstanced { base_vertex, vertex_count, base_instance, instance_count, .. } => {
                rpass.draw(
                    base_vertex..base_vertex + vertex_count,
                    base_instance..base_instance + instance_count,
                );
            }
            DrawCommand::DrawIndexedInstanced {
                base_index,
                index_count,
                base_vertex,
                base_instance,
                instance_count,
                ..
            } => {
                rpass.draw_indexed(
                    base_index..base_index + index_count,
                    base_vertex as i32,
                    base_instance..base_instance + instance_count,
                );
            }
        }
    }
    Ok(())
}
