use super::size::{align_up, checked_add, checked_byte_size};
use super::{BindBufferInfo, BufferHandle, BufferSubAllocator, VertexWriter};

/// A freshly mapped region: `binding` covers the `count` elements requested
/// up front and `allocator` covers the rest of the region.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MappedRegion {
    pub binding: BindBufferInfo,
    pub allocator: BufferSubAllocator,
}

/// Source of mapped, per-pass vertex/instance/index memory.
///
/// Mapping failure is returned as `None` *and* latched: once any mapping
/// fails, [`mapping_failed`](Self::mapping_failed) stays true and the pass
/// using this manager cannot be submitted.
pub trait DrawBufferManager {
    /// Maps room for `count + reserved_count` elements of `stride` bytes,
    /// starting on an `alignment` boundary.
    fn get_mapped_vertex_buffer(
        &mut self,
        count: u32,
        stride: u32,
        reserved_count: u32,
        alignment: u32,
    ) -> Option<MappedRegion>;

    /// Maps room for `count` 16-bit indices.
    fn get_mapped_index_buffer(&mut self, count: u32) -> Option<MappedRegion>;

    /// Gives back the unconsumed tail of a region.
    fn return_unused(&mut self, allocator: BufferSubAllocator);

    /// CPU view of a binding this manager handed out.
    fn mapped_bytes(&mut self, binding: &BindBufferInfo) -> &mut [u8];

    fn mapping_failed(&self) -> bool;
}

/// Source of immutable template buffers, written once at render step
/// construction.
pub trait StaticBufferManager {
    fn get_vertex_writer(&mut self, byte_size: u32) -> (BindBufferInfo, VertexWriter<'_>);
    fn get_index_writer(&mut self, byte_size: u32) -> (BindBufferInfo, VertexWriter<'_>);
}

/// Block sizing for buffer managers.
#[derive(Debug, Clone)]
pub struct BufferManagerConfig {
    /// Minimum size of a vertex/instance block in bytes.
    pub vertex_block_size: u32,

    /// Minimum size of an index block in bytes.
    pub index_block_size: u32,

    /// Largest block that can be mapped. Requests above it fail to map.
    pub max_block_size: u32,
}

impl Default for BufferManagerConfig {
    fn default() -> Self {
        Self {
            vertex_block_size: 1 << 16,
            index_block_size: 1 << 14,
            max_block_size: 1 << 28,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BlockKind {
    Vertex,
    Index,
    StaticVertex,
    StaticIndex,
}

#[derive(Debug)]
pub(crate) struct Block {
    pub(crate) kind: BlockKind,
    pub(crate) data: Vec<u8>,
    pub(crate) used: u32,
}

/// Shared block bookkeeping for the CPU and wgpu managers.
#[derive(Debug, Default)]
pub(crate) struct BlockPool {
    pub(crate) blocks: Vec<Block>,
    /// Handle of `blocks[0]`; pools whose buffers are bound together use
    /// disjoint handle ranges.
    base: u32,
    current_vertex: Option<BufferHandle>,
    current_index: Option<BufferHandle>,
    failed: bool,
}

impl BlockPool {
    pub(crate) fn with_handle_base(base: u32) -> Self {
        Self { base, ..Self::default() }
    }

    /// Drops every block and the failure latch.
    pub(crate) fn reset(&mut self) {
        self.blocks.clear();
        self.current_vertex = None;
        self.current_index = None;
        self.failed = false;
    }

    fn new_block(&mut self, kind: BlockKind, size: u32) -> BufferHandle {
        let handle = BufferHandle(checked_add(self.base, self.blocks.len() as u32));
        log::trace!("allocating {kind:?} block {} ({size} bytes)", handle.0);
        self.blocks.push(Block { kind, data: vec![0; size as usize], used: 0 });
        handle
    }

    #[inline]
    fn slot(&self, handle: BufferHandle) -> Option<usize> {
        handle.0.checked_sub(self.base).map(|i| i as usize).filter(|&i| i < self.blocks.len())
    }

    pub(crate) fn handle(&self, slot: usize) -> BufferHandle {
        BufferHandle(self.base + slot as u32)
    }

    fn block_mut(&mut self, handle: BufferHandle) -> &mut Block {
        let slot = handle.0.wrapping_sub(self.base) as usize;
        &mut self.blocks[slot]
    }

    pub(crate) fn block(&self, handle: BufferHandle) -> Option<&Block> {
        self.slot(handle).map(|i| &self.blocks[i])
    }

    pub(crate) fn bytes(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.block(handle).map(|b| b.data.as_slice())
    }

    pub(crate) fn map(
        &mut self,
        config: &BufferManagerConfig,
        kind: BlockKind,
        count: u32,
        stride: u32,
        reserved_count: u32,
        alignment: u32,
    ) -> Option<MappedRegion> {
        let needed = checked_byte_size(checked_add(count, reserved_count), stride);
        if needed > config.max_block_size {
            log::warn!("failed to map {needed} bytes (limit {})", config.max_block_size);
            self.failed = true;
            return None;
        }

        let current = match kind {
            BlockKind::Index => self.current_index,
            _ => self.current_vertex,
        };
        let reuse = current.filter(|&h| {
            self.block(h).is_some_and(|block| {
                align_up(block.used, alignment) as u64 + needed as u64 <= block.data.len() as u64
            })
        });

        let handle = match reuse {
            Some(h) => h,
            None => {
                let min = match kind {
                    BlockKind::Index => config.index_block_size,
                    _ => config.vertex_block_size,
                };
                let h = self.new_block(kind, needed.max(min).min(config.max_block_size));
                match kind {
                    BlockKind::Index => self.current_index = Some(h),
                    _ => self.current_vertex = Some(h),
                }
                h
            }
        };

        let block = self.block_mut(handle);
        let offset = align_up(block.used, alignment);
        let len = block.data.len() as u32;
        let bytes = checked_byte_size(count, stride);
        // The tail belongs to the returned allocator until handed back.
        block.used = len;
        Some(MappedRegion {
            binding: BindBufferInfo::new(handle, offset, bytes),
            allocator: BufferSubAllocator::new(Some(handle), offset + bytes, len - offset - bytes),
        })
    }

    pub(crate) fn return_unused(&mut self, allocator: BufferSubAllocator) {
        let Some(handle) = allocator.buffer() else { return; };
        let Some(slot) = self.slot(handle) else { return; };
        let block = &mut self.blocks[slot];
        if allocator.end() == block.used {
            block.used = allocator.offset();
        }
    }

    pub(crate) fn mapped_bytes(&mut self, binding: &BindBufferInfo) -> &mut [u8] {
        let Some(handle) = binding.buffer else { return &mut []; };
        let start = binding.offset as usize;
        let end = start + binding.size as usize;
        &mut self.block_mut(handle).data[start..end]
    }

    pub(crate) fn static_writer(&mut self, kind: BlockKind, byte_size: u32) -> (BindBufferInfo, VertexWriter<'_>) {
        let handle = self.new_block(kind, byte_size);
        let block = self.block_mut(handle);
        block.used = byte_size;
        (BindBufferInfo::new(handle, 0, byte_size), VertexWriter::new(&mut block.data))
    }

    pub(crate) fn failed(&self) -> bool {
        self.failed
    }
}

/// Buffer manager backed by plain CPU memory.
///
/// Used for headless recording and by tests; the recorded bytes can be
/// inspected with [`CpuBufferManager::buffer_data`].
#[derive(Debug, Default)]
pub struct CpuBufferManager {
    config: BufferManagerConfig,
    pool: BlockPool,
}

impl CpuBufferManager {
    pub fn new(config: BufferManagerConfig) -> Self {
        Self { config, pool: BlockPool::default() }
    }

    /// Full contents of a buffer.
    pub fn buffer_data(&self, handle: BufferHandle) -> Option<&[u8]> {
        self.pool.bytes(handle)
    }

    /// Bytes covered by `binding`.
    pub fn binding_data(&self, binding: &BindBufferInfo) -> Option<&[u8]> {
        let data = self.pool.bytes(binding.buffer?)?;
        data.get(binding.offset as usize..(binding.offset + binding.size) as usize)
    }

    pub fn buffer_count(&self) -> usize {
        self.pool.blocks.len()
    }

    pub fn buffer_kind(&self, handle: BufferHandle) -> Option<BlockKind> {
        self.pool.block(handle).map(|b| b.kind)
    }
}

impl DrawBufferManager for CpuBufferManager {
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

impl StaticBufferManager for CpuBufferManager {
    fn get_vertex_writer(&mut self, byte_size: u32) -> (BindBufferInfo, VertexWriter<'_>) {
        self.pool.static_writer(BlockKind::StaticVertex, byte_size)
    }

    fn get_index_writer(&mut self, byte_size: u32) -> (BindBufferInfo, VertexWriter<'_>) {
        self.pool.static_writer(BlockKind::StaticIndex, byte_size)
    }
}
