use wgpu::util::DeviceExt;

use crate::gpu::{
    BindBufferInfo, BlockKind, BlockPool, BufferHandle, BufferManagerConfig, BufferSubAllocator,
    DrawBufferManager, MappedRegion, StaticBufferManager, VertexWriter,
};

/// First handle of per-pass managers, keeping their handles apart from the
/// static template buffers bound in the same pass.
pub const PASS_HANDLE_BASE: u32 = 1 << 24;

/// Buffer manager staging into CPU blocks that are uploaded to wgpu buffers
/// once recording is done.
///
/// One manager holds the static templates for the life of a
/// [`RendererProvider`](crate::render::RendererProvider); another is reset and
/// refilled for every pass.
#[derive(Debug)]
pub struct WgpuBufferManager {
    config: BufferManagerConfig,
    pool: BlockPool,
    /// Uploaded buffers, in block order; blocks past the end are not
    /// uploaded yet.
    buffers: Vec<wgpu::Buffer>,
}

impl WgpuBufferManager {
    /// Manager for static template buffers.
    pub fn for_templates(device: &wgpu::Device) -> Self {
        Self::with_config(config_for(device), 0)
    }

    /// Manager for per-pass vertex, instance and index data.
    pub fn for_passes(device: &wgpu::Device) -> Self {
        Self::with_config(config_for(device), PASS_HANDLE_BASE)
    }

    /// Manager with explicit block sizing whose handles start at `handle_base`.
    pub fn with_config(config: BufferManagerConfig, handle_base: u32) -> Self {
        Self { config, pool: BlockPool::with_handle_base(handle_base), buffers: Vec::new() }
    }

    /// Creates wgpu buffers for every block written since the last upload.
    pub fn upload(&mut self, device: &wgpu::Device) {
        for slot in self.buffers.len()..self.pool.blocks.len() {
            let block = &self.pool.blocks[slot];
            let usage = match block.kind {
                BlockKind::Vertex | BlockKind::StaticVertex => wgpu::BufferUsages::VERTEX,
                BlockKind::Index | BlockKind::StaticIndex => wgpu::BufferUsages::INDEX,
            };
            let label = format!("tessera {:?} buffer {}", block.kind, self.pool.handle(slot).0);
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: &block.data,
                usage,
            });
            self.buffers.push(buffer);
        }
    }

    /// Uploaded buffer behind `handle`, if this manager handed it out.
    pub fn buffer(&self, handle: BufferHandle) -> Option<&wgpu::Buffer> {
        let slot = handle.0.checked_sub(self.pool.handle(0).0)?;
        self.buffers.get(slot as usize)
    }

    /// Releases every block and buffer, and clears the mapping failure.
    pub fn reset(&mut self) {
        self.pool.reset();
        self.buffers.clear();
    }

    pub fn block_count(&self) -> usize {
        self.pool.blocks.len()
    }
}

/// Block sizing bounded by what the device can allocate.
fn config_for(device: &wgpu::Device) -> BufferManagerConfig {
    let max = device.limits().max_buffer_size.min(u32::MAX as u64) as u32;
    BufferManagerConfig { max_block_size: max, ..BufferManagerConfig::default() }
}

impl DrawBufferManager for WgpuBufferManager {
    fn get_mapped_vertex_buffer(
        &mut self,
        count: u32,
        stride: u32,
        reserved_count: u32,
        alignment: u32,
    ) -> Option<MappedRegion> {
        self.pool.map(&self.config, BlockKind::Vertex, count, stride, reserved_count, alignment)
    }

    fn get_mapped_index_buffer(&mut self, count: u32) -> Option<MappedRegion> {
        self.pool.map(&self.config, BlockKind::Index, count, 2, 0, 4)
    }

    fn return_unused(&mut self, allocator: BufferSubAllocator) {
        self.pool.return_unused(allocator);
    }

    fn mapped_bytes(&mut self, binding: &BindBufferInfo) -> &mut [u8] {
        self.pool.mapped_bytes(binding)
    }

    fn mapping_failed(&self) -> bool {
        self.pool.failed()
    }
}

impl StaticBufferManager for WgpuBufferManager {
    fn get_vertex_writer(&mut self, byte_size: u32) -> (BindBufferInfo, VertexWriter<'_>) {
        self.pool.static_writer(BlockKind::StaticVertex, byte_size)
    }

    fn get_index_writer(&mut self, byte_size: u32) -> (BindBufferInfo, VertexWriter<'_>) {
        self.pool.static_writer(BlockKind::StaticIndex, byte_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager(base: u32) -> WgpuBufferManager {
        WgpuBufferManager::with_config(
            BufferManagerConfig { vertex_block_size: 256, index_block_size: 256, max_block_size: 1024 },
            base,
        )
    }

    #[test]
    fn pass_handles_do_not_collide_with_templates() {
        let mut templates = manager(0);
        let mut pass = manager(PASS_HANDLE_BASE);
        let (template, _) = templates.get_vertex_writer(64);
        let region = pass.get_mapped_vertex_buffer(1, 16, 0, 16).unwrap();
        assert_eq!(template.buffer, Some(BufferHandle(0)));
        assert_eq!(region.binding.buffer, Some(BufferHandle(PASS_HANDLE_BASE)));
    }

    #[test]
    fn oversized_request_fails() {
        let mut pass = manager(PASS_HANDLE_BASE);
        assert!(pass.get_mapped_vertex_buffer(100, 16, 0, 16).is_none());
        assert!(pass.mapping_failed());
        pass.reset();
        assert!(!pass.mapping_failed());
        assert_eq!(pass.block_count(), 0);
    }

    #[test]
    fn buffers_are_absent_before_upload() {
        let mut pass = manager(PASS_HANDLE_BASE);
        let region = pass.get_mapped_index_buffer(6).unwrap();
        assert!(pass.buffer(region.binding.buffer.unwrap()).is_none());
        assert!(pass.buffer(BufferHandle(0)).is_none());
    }
}
