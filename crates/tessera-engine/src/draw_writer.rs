//! Batching of per-draw vertex and instance data into shared buffers.
//!
//! A [`DrawWriter`] sits between the render steps and the command stream. Steps
//! append geometry through one of three appenders:
//!
//! - [`Vertices`]: plain vertex-rate data, no instancing.
//! - [`Instances`]: instance-rate data drawn with a fixed static template.
//! - [`DynamicInstances`]: instance-rate data whose template size is only
//!   known once the batch is complete, tracked with an [`InstanceCountProxy`].
//!
//! Appended data stays pending until something forces a draw call: a pipeline
//! change, a dynamic state change, a template change, or the current buffer
//! running out of room. Consecutive appends that share all of those are
//! emitted as one draw call.
//!
//! Appenders borrow the writer mutably, so only one can be active at a time.

use crate::gpu::size::{align_up, checked_add, checked_byte_size, lcm};
use crate::gpu::{
    BarrierType, BindBufferInfo, BufferSubAllocator, DrawBufferManager, DrawBuffers, DrawCommand,
    DrawPassCommands, PrimitiveType, RenderStateFlags, VertexWriter,
};

/// Vertex-mode reservations are padded to this many elements.
///
/// Some GPUs fetch vertices speculatively past the last one drawn, so the
/// padding keeps those reads inside the mapped range.
const VERTEX_RESERVE_MULTIPLE: u32 = 4;

/// Per-instance template used by the pending batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Template {
    /// Vertex mode; appended data is the vertex stream.
    None,
    /// Every instance draws this many template vertices/indices.
    Fixed(u32),
    /// Running maximum of the counts required by pending instances.
    Dynamic(u32),
}

impl Template {
    #[inline]
    fn count(self) -> u32 {
        match self {
            Template::None => 0,
            Template::Fixed(n) | Template::Dynamic(n) => n,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum AppendMode {
    Vertices,
    Instances,
}

/// Streaming reducer that tracks the worst-case template size of a batch.
///
/// `identity` is the smallest supported count, `accumulate` folds one
/// observation in (keeping the maximum) and `count` converts the running
/// value into a vertex or index count.
pub trait InstanceCountProxy: Copy {
    type Observation;

    fn identity() -> Self;
    fn accumulate(&mut self, observation: Self::Observation);
    fn count(&self) -> u32;
}

/// Accumulates appended geometry and emits the minimal draw calls for it.
///
/// Created per draw pass; dropping it flushes whatever is still pending.
pub struct DrawWriter<'a, M: DrawBufferManager + ?Sized> {
    commands: &'a mut DrawPassCommands,
    manager: &'a mut M,

    primitive: PrimitiveType,
    static_stride: u32,
    append_stride: u32,
    render_state: RenderStateFlags,
    barrier: BarrierType,

    static_vertices: BindBufferInfo,
    static_indices: BindBufferInfo,
    template: Template,

    append: BufferSubAllocator,
    scratch: Vec<u8>,
    using_scratch: bool,

    pending_base: u32,
    pending_count: u32,

    bound: Option<DrawBuffers>,
}

impl<'a, M: DrawBufferManager + ?Sized> DrawWriter<'a, M> {
    pub fn new(commands: &'a mut DrawPassCommands, manager: &'a mut M) -> Self {
        Self {
            commands,
            manager,
            primitive: PrimitiveType::Triangles,
            static_stride: 0,
            append_stride: 0,
            render_state: RenderStateFlags::NONE,
            barrier: BarrierType::None,
            static_vertices: BindBufferInfo::default(),
            static_indices: BindBufferInfo::default(),
            template: Template::None,
            append: BufferSubAllocator::default(),
            scratch: Vec::new(),
            using_scratch: false,
            pending_base: 0,
            pending_count: 0,
            bound: None,
        }
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn pending_count(&self) -> u32 {
        self.pending_count
    }

    /// Template vertex/index count the pending batch would be drawn with.
    #[inline]
    pub fn template_count(&self) -> u32 {
        self.template.count()
    }

    #[inline]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    #[inline]
    pub fn append_stride(&self) -> u32 {
        self.append_stride
    }

    #[inline]
    pub fn static_stride(&self) -> u32 {
        self.static_stride
    }

    #[inline]
    pub fn render_state(&self) -> RenderStateFlags {
        self.render_state
    }

    /// True while appends land in CPU scratch memory after a mapping failure.
    #[inline]
    pub fn is_using_scratch(&self) -> bool {
        self.using_scratch
    }

    #[inline]
    fn alignment(&self) -> u32 {
        lcm(self.append_stride, 4)
    }

    // ── pipeline / dynamic state ──────────────────────────────────────────

    /// Switches to a new pipeline. Pending data of the previous pipeline is
    /// drawn first; the append cursor is realigned for the new stride.
    pub fn new_pipeline_state(
        &mut self,
        primitive: PrimitiveType,
        static_stride: u32,
        append_stride: u32,
        render_state: RenderStateFlags,
        barrier: BarrierType,
    ) {
        self.flush();

        self.primitive = primitive;
        self.static_stride = static_stride;
        self.append_stride = append_stride;
        self.render_state = render_state;
        self.barrier = barrier;

        self.static_vertices = BindBufferInfo::default();
        self.static_indices = BindBufferInfo::default();
        self.template = Template::None;

        if append_stride > 0 {
            self.acquire(0);
        }
    }

    /// Draws pending data before a uniform, texture or scissor change.
    #[inline]
    pub fn new_dynamic_state(&mut self) {
        self.flush();
    }

    /// Records a non-draw command after drawing whatever is pending, so the
    /// pending data keeps the state it was appended under.
    pub fn record_state(&mut self, command: DrawCommand) {
        debug_assert!(
            !command.is_draw() && !matches!(command, DrawCommand::BindDrawBuffers(_)),
            "draws and buffer bindings are issued by the writer itself"
        );
        self.flush();
        self.commands.push(command);
    }

    /// Emits one draw call covering all pending elements. No-op when nothing
    /// is pending.
    pub fn flush(&mut self) {
        if self.pending_count == 0 {
            return;
        }

        let append = BindBufferInfo {
            buffer: self.append.buffer(),
            offset: 0,
            size: self.append.end(),
        };
        let buffers = match self.template {
            Template::None => DrawBuffers {
                vertices: append,
                instances: BindBufferInfo::default(),
                indices: BindBufferInfo::default(),
            },
            Template::Fixed(_) | Template::Dynamic(_) => DrawBuffers {
                vertices: self.static_vertices,
                instances: append,
                indices: self.static_indices,
            },
        };
        self.bind(buffers);

        let primitive = self.primitive;
        let command = match self.template {
            Template::None => DrawCommand::Draw {
                primitive,
                base_vertex: self.pending_base,
                vertex_count: self.pending_count,
            },
            Template::Fixed(n) | Template::Dynamic(n) if self.static_indices.is_valid() => {
                DrawCommand::DrawIndexedInstanced {
                    primitive,
                    base_index: 0,
                    index_count: n,
                    base_vertex: 0,
                    base_instance: self.pending_base,
                    instance_count: self.pending_count,
                }
            }
            Template::Fixed(n) | Template::Dynamic(n) => DrawCommand::DrawInstanced {
                primitive,
                base_vertex: 0,
                vertex_count: n,
                base_instance: self.pending_base,
                instance_count: self.pending_count,
            },
        };
        self.emit(command);

        self.pending_base = checked_add(self.pending_base, self.pending_count);
        self.pending_count = 0;
        if let Template::Dynamic(_) = self.template {
            self.template = Template::Dynamic(0);
        }
    }

    fn bind(&mut self, buffers: DrawBuffers) {
        if self.bound != Some(buffers) {
            self.commands.bind_draw_buffers(buffers);
            self.bound = Some(buffers);
        }
    }

    fn emit(&mut self, command: DrawCommand) {
        if self.barrier != BarrierType::None {
            self.commands.add_barrier(self.barrier);
        }
        self.commands.push(command);
    }

    // ── direct draws ──────────────────────────────────────────────────────

    /// Draws fully precomputed vertices. Never merges with pending data.
    pub fn draw(&mut self, vertices: BindBufferInfo, base_vertex: u32, vertex_count: u32) {
        self.flush();
        self.bind(DrawBuffers { vertices, ..DrawBuffers::default() });
        let primitive = self.primitive;
        self.emit(DrawCommand::Draw { primitive, base_vertex, vertex_count });
    }

    pub fn draw_indexed(
        &mut self,
        vertices: BindBufferInfo,
        indices: BindBufferInfo,
        base_index: u32,
        index_count: u32,
        base_vertex: u32,
    ) {
        self.flush();
        self.bind(DrawBuffers { vertices, indices, ..DrawBuffers::default() });
        let primitive = self.primitive;
        self.emit(DrawCommand::DrawIndexed { primitive, base_index, index_count, base_vertex });
    }

    pub fn draw_instanced(
        &mut self,
        vertices: BindBufferInfo,
        instances: BindBufferInfo,
        base_vertex: u32,
        vertex_count: u32,
        base_instance: u32,
        instance_count: u32,
    ) {
        self.flush();
        self.bind(DrawBuffers { vertices, instances, ..DrawBuffers::default() });
        let primitive = self.primitive;
        self.emit(DrawCommand::DrawInstanced {
            primitive,
            base_vertex,
            vertex_count,
            base_instance,
            instance_count,
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_indexed_instanced(
        &mut self,
        vertices: BindBufferInfo,
        indices: BindBufferInfo,
        instances: BindBufferInfo,
        base_index: u32,
        index_count: u32,
        base_vertex: u32,
        base_instance: u32,
        instance_count: u32,
    ) {
        self.flush();
        self.bind(DrawBuffers { vertices, instances, indices });
        let primitive = self.primitive;
        self.emit(DrawCommand::DrawIndexedInstanced {
            primitive,
            base_index,
            index_count,
            base_vertex,
            base_instance,
            instance_count,
        });
    }

    // ── appending ─────────────────────────────────────────────────────────

    fn set_template(&mut self, vertices: BindBufferInfo, indices: BindBufferInfo, template: Template) {
        let same_kind = match (self.template, template) {
            (Template::None, Template::None) => true,
            (Template::Fixed(a), Template::Fixed(b)) => a == b,
            (Template::Dynamic(_), Template::Dynamic(_)) => true,
            _ => false,
        };
        if same_kind && vertices == self.static_vertices && indices == self.static_indices {
            return;
        }

        self.flush();
        self.static_vertices = vertices;
        self.static_indices = indices;
        self.template = template;
        debug_assert_eq!(self.pending_count, 0);
    }

    /// Elements to reserve for `count` new ones.
    fn reservation(&self, count: u32, mode: AppendMode) -> u32 {
        match mode {
            AppendMode::Vertices => {
                let total = checked_add(self.pending_count, count);
                align_up(total, VERTEX_RESERVE_MULTIPLE) - self.pending_count
            }
            AppendMode::Instances => count,
        }
    }

    fn fits(&self, count: u32, mode: AppendMode) -> bool {
        let needed = self.reservation(count, mode);
        // A new batch starts on an aligned boundary so it can be addressed by
        // base index; continuing batches must stay contiguous.
        let alignment = if self.pending_count == 0 { self.alignment() } else { 1 };
        self.append.available_with_alignment(self.append_stride, alignment) >= needed
    }

    fn reserve(&mut self, count: u32, mode: AppendMode) {
        if !self.fits(count, mode) {
            self.realloc(count, mode);
        }
    }

    /// Draws what is pending and moves to a new region with room for `count`.
    fn realloc(&mut self, count: u32, mode: AppendMode) {
        self.flush();
        let multiple = match mode {
            AppendMode::Vertices => VERTEX_RESERVE_MULTIPLE,
            AppendMode::Instances => 1,
        };
        let request = count.next_multiple_of(multiple);
        self.acquire(request);
    }

    fn acquire(&mut self, reserved_count: u32) {
        let previous = core::mem::take(&mut self.append);
        if !self.using_scratch {
            self.manager.return_unused(previous);
        }

        let stride = self.append_stride;
        let alignment = self.alignment();
        match self.manager.get_mapped_vertex_buffer(0, stride, reserved_count, alignment) {
            Some(region) => {
                self.append = region.allocator;
                self.using_scratch = false;
            }
            None => {
                // Recording continues into scratch memory; the manager has
                // latched the failure and the pass will not be submitted.
                let bytes = checked_byte_size(reserved_count, stride);
                log::warn!("buffer mapping failed; writing {bytes} bytes to scratch memory");
                self.scratch.clear();
                self.scratch.resize(bytes as usize, 0);
                self.append = BufferSubAllocator::new(None, 0, bytes);
                self.using_scratch = true;
            }
        }
    }

    fn append(&mut self, count: u32, mode: AppendMode) -> VertexWriter<'_> {
        debug_assert!(count > 0, "appending zero elements");
        debug_assert!(self.append_stride > 0, "append without an append stride");

        self.reserve(count, mode);
        let stride = self.append_stride;
        let bytes = checked_byte_size(count, stride);
        let binding = loop {
            let alignment = if self.pending_count == 0 { self.alignment() } else { 1 };
            if let Some(binding) = self.append.reserve(bytes, alignment) {
                break binding;
            }
            self.realloc(count, mode);
        };

        if self.pending_count == 0 {
            self.pending_base = binding.offset / stride;
        }
        self.pending_count = checked_add(self.pending_count, count);

        if self.using_scratch {
            let start = binding.offset as usize;
            VertexWriter::new(&mut self.scratch[start..start + bytes as usize])
        } else {
            VertexWriter::new(self.manager.mapped_bytes(&binding))
        }
    }
}

impl<M: DrawBufferManager + ?Sized> Drop for DrawWriter<'_, M> {
    fn drop(&mut self) {
        self.flush();
        if !self.using_scratch {
            self.manager.return_unused(core::mem::take(&mut self.append));
        }
    }
}

// ── appenders ─────────────────────────────────────────────────────────────

/// Appends plain vertices.
pub struct Vertices<'w, 'a, M: DrawBufferManager + ?Sized> {
    writer: &'w mut DrawWriter<'a, M>,
}

impl<'w, 'a, M: DrawBufferManager + ?Sized> Vertices<'w, 'a, M> {
    pub fn new(writer: &'w mut DrawWriter<'a, M>) -> Self {
        debug_assert!(writer.render_state.contains(RenderStateFlags::APPEND_VERTICES));
        writer.set_template(BindBufferInfo::default(), BindBufferInfo::default(), Template::None);
        Self { writer }
    }

    /// Ensures `count` more vertices fit contiguously, padded so the pending
    /// total stays a multiple of four.
    pub fn reserve(&mut self, count: u32) {
        self.writer.reserve(count, AppendMode::Vertices);
    }

    pub fn append(&mut self, count: u32) -> VertexWriter<'_> {
        self.writer.append(count, AppendMode::Vertices)
    }
}

/// Appends instances of a fixed static template.
pub struct Instances<'w, 'a, M: DrawBufferManager + ?Sized> {
    writer: &'w mut DrawWriter<'a, M>,
}

impl<'w, 'a, M: DrawBufferManager + ?Sized> Instances<'w, 'a, M> {
    /// `vertex_count` is the number of template vertices, or indices when an
    /// index buffer is given, drawn per instance.
    pub fn new(
        writer: &'w mut DrawWriter<'a, M>,
        vertices: BindBufferInfo,
        indices: BindBufferInfo,
        vertex_count: u32,
    ) -> Self {
        debug_assert!(writer.render_state.contains(RenderStateFlags::APPEND_INSTANCES));
        debug_assert!(vertex_count > 0);
        writer.set_template(vertices, indices, Template::Fixed(vertex_count));
        Self { writer }
    }

    pub fn reserve(&mut self, count: u32) {
        self.writer.reserve(count, AppendMode::Instances);
    }

    pub fn append(&mut self, count: u32) -> VertexWriter<'_> {
        self.writer.append(count, AppendMode::Instances)
    }
}

/// Appends instances whose template size depends on the instances themselves.
///
/// The batch is drawn with the largest count any of its instances needed.
/// Dropping the appender folds its running count into the writer.
pub struct DynamicInstances<'w, 'a, M: DrawBufferManager + ?Sized, P: InstanceCountProxy> {
    writer: &'w mut DrawWriter<'a, M>,
    proxy: P,
}

impl<'w, 'a, M: DrawBufferManager + ?Sized, P: InstanceCountProxy> DynamicInstances<'w, 'a, M, P> {
    pub fn new(writer: &'w mut DrawWriter<'a, M>, vertices: BindBufferInfo, indices: BindBufferInfo) -> Self {
        debug_assert!(writer.render_state.contains(RenderStateFlags::APPEND_DYNAMIC_INSTANCES));
        writer.set_template(vertices, indices, Template::Dynamic(0));
        Self { writer, proxy: P::identity() }
    }

    pub fn reserve(&mut self, count: u32) {
        if !self.writer.fits(count, AppendMode::Instances) {
            // The current batch ends here, so it gets only the counts seen so far.
            self.update_template_count();
            self.writer.realloc(count, AppendMode::Instances);
            self.proxy = P::identity();
        }
    }

    pub fn append(&mut self, observation: P::Observation, count: u32) -> VertexWriter<'_> {
        self.reserve(count);
        self.proxy.accumulate(observation);
        self.writer.append(count, AppendMode::Instances)
    }

    fn update_template_count(&mut self) {
        let count = self.proxy.count();
        if let Template::Dynamic(current) = self.writer.template {
            self.writer.template = Template::Dynamic(current.max(count));
        }
    }
}

impl<M: DrawBufferManager + ?Sized, P: InstanceCountProxy> Drop for DynamicInstances<'_, '_, M, P> {
    fn drop(&mut self) {
        self.update_template_count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{BufferHandle, BufferManagerConfig, CpuBufferManager};

    fn manager(block: u32) -> CpuBufferManager {
        CpuBufferManager::new(BufferManagerConfig {
            vertex_block_size: block,
            index_block_size: block,
            max_block_size: 1 << 20,
        })
    }

    fn draws(cmds: &DrawPassCommands) -> Vec<DrawCommand> {
        cmds.iter().copied().filter(DrawCommand::is_draw).collect()
    }

    fn vertex_count(cmd: &DrawCommand) -> u32 {
        match *cmd {
            DrawCommand::Draw { vertex_count, .. } => vertex_count,
            DrawCommand::DrawInstanced { instance_count, .. }
            | DrawCommand::DrawIndexedInstanced { instance_count, .. } => instance_count,
            DrawCommand::DrawIndexed { index_count, .. } => index_count,
            _ => 0,
        }
    }

    fn vertex_state(w: &mut DrawWriter<'_, CpuBufferManager>, stride: u32) {
        w.new_pipeline_state(PrimitiveType::Triangles, 0, stride, RenderStateFlags::APPEND_VERTICES, BarrierType::None);
    }

    fn template() -> (BindBufferInfo, BindBufferInfo) {
        (BindBufferInfo::new(BufferHandle(900), 0, 64), BindBufferInfo::new(BufferHandle(901), 0, 12))
    }

    #[derive(Copy, Clone)]
    struct MaxCount(u32);

    impl InstanceCountProxy for MaxCount {
        type Observation = u32;
        fn identity() -> Self { MaxCount(3) }
        fn accumulate(&mut self, observation: u32) { self.0 = self.0.max(observation); }
        fn count(&self) -> u32 { self.0 }
    }

    // ── flush ─────────────────────────────────────────────────────────────

    #[test]
    fn flush_resets_pending() {
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(1024);
        let mut w = DrawWriter::new(&mut cmds, &mut m);
        vertex_state(&mut w, 8);
        Vertices::new(&mut w).append(3).repeat(0u64, 3);
        assert_eq!(w.pending_count(), 3);
        w.flush();
        assert_eq!(w.pending_count(), 0);
        w.flush();
        assert_eq!(w.pending_count(), 0);
        drop(w);
        assert_eq!(cmds.draw_call_count(), 1);
    }

    #[test]
    fn appends_merge_into_one_draw() {
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            vertex_state(&mut w, 12);
            for n in [3u32, 6, 1, 9] {
                let mut v = Vertices::new(&mut w);
                v.append(n).repeat([0.0f32; 3], n as usize);
            }
        }
        let d = draws(&cmds);
        assert_eq!(d.len(), 1);
        assert_eq!(vertex_count(&d[0]), 19);
    }

    #[test]
    fn pipeline_change_splits_batches() {
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            vertex_state(&mut w, 8);
            Vertices::new(&mut w).append(2).repeat(0u64, 2);
            vertex_state(&mut w, 12);
            Vertices::new(&mut w).append(5).repeat([0u32; 3], 5);
        }
        let d = draws(&cmds);
        assert_eq!(d.len(), 2);
        // The second batch starts on a 12-byte aligned element boundary.
        let DrawCommand::Draw { base_vertex, vertex_count, .. } = d[1] else { panic!() };
        assert_eq!(vertex_count, 5);
        assert_eq!(base_vertex * 12 % 12, 0);
        assert!(base_vertex * 12 >= 16);
        // Same buffer: no second bind.
        let binds = cmds.iter().filter(|c| matches!(c, DrawCommand::BindDrawBuffers(_))).count();
        assert_eq!(binds, 1);
    }

    // ── vertex padding ────────────────────────────────────────────────────

    #[test]
    fn vertex_reservation_rounds_past_pending() {
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        let mut w = DrawWriter::new(&mut cmds, &mut m);
        vertex_state(&mut w, 4);
        for pending in 0..4u32 {
            for n in 1..9u32 {
                let r = {
                    w.pending_count = pending;
                    w.reservation(n, AppendMode::Vertices)
                };
                assert!(r >= n);
                assert_eq!((pending + r) % 4, 0);
                assert!(r < n + 4);
            }
        }
        w.pending_count = 0;
    }

    #[test]
    fn exhausted_buffer_splits_into_two_draws() {
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(160);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            vertex_state(&mut w, 16);
            let mut v = Vertices::new(&mut w);
            v.append(6).repeat([1.0f32; 4], 6);
            v.append(8).repeat([2.0f32; 4], 8);
        }
        let d = draws(&cmds);
        assert_eq!(d.len(), 2);
        assert_eq!(vertex_count(&d[0]), 6);
        assert_eq!(vertex_count(&d[1]), 8);
        assert_eq!(d.iter().map(vertex_count).sum::<u32>(), 14);
        assert!(!m.mapping_failed());
    }

    // ── instances ─────────────────────────────────────────────────────────

    #[test]
    fn instances_use_template() {
        let (vb, ib) = template();
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            w.new_pipeline_state(
                PrimitiveType::TriangleStrip,
                16,
                32,
                RenderStateFlags::FIXED_BUFFERS | RenderStateFlags::APPEND_INSTANCES,
                BarrierType::None,
            );
            for _ in 0..3 {
                Instances::new(&mut w, vb, ib, 6).append(1).repeat([0.0f32; 8], 1);
            }
        }
        let d = draws(&cmds);
        assert_eq!(d.len(), 1);
        let DrawCommand::DrawIndexedInstanced { index_count, instance_count, .. } = d[0] else { panic!() };
        assert_eq!(index_count, 6);
        assert_eq!(instance_count, 3);
    }

    #[test]
    fn template_change_flushes() {
        let (vb, ib) = template();
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            w.new_pipeline_state(PrimitiveType::Triangles, 0, 16, RenderStateFlags::APPEND_INSTANCES, BarrierType::None);
            Instances::new(&mut w, vb, ib, 6).append(2).repeat([0u32; 4], 2);
            let mut other = Instances::new(&mut w, vb, ib, 9);
            assert_eq!(other.writer.pending_count(), 0);
            other.append(1).repeat([0u32; 4], 1);
        }
        assert_eq!(cmds.draw_call_count(), 2);
    }

    // ── dynamic instances ─────────────────────────────────────────────────

    fn dynamic_state(w: &mut DrawWriter<'_, CpuBufferManager>) {
        w.new_pipeline_state(
            PrimitiveType::Triangles,
            8,
            16,
            RenderStateFlags::FIXED_BUFFERS | RenderStateFlags::APPEND_DYNAMIC_INSTANCES,
            BarrierType::None,
        );
    }

    #[test]
    fn dynamic_template_is_batch_maximum() {
        let (vb, ib) = template();
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            dynamic_state(&mut w);
            {
                let mut d = DynamicInstances::<_, MaxCount>::new(&mut w, vb, ib);
                d.append(12, 1).repeat([0u32; 4], 1);
                d.append(30, 1).repeat([0u32; 4], 1);
            }
            // A later appender in the same batch keeps the earlier maximum.
            let mut d = DynamicInstances::<_, MaxCount>::new(&mut w, vb, ib);
            d.append(6, 2).repeat([0u32; 4], 2);
        }
        let d = draws(&cmds);
        assert_eq!(d.len(), 1);
        let DrawCommand::DrawIndexedInstanced { index_count, instance_count, .. } = d[0] else { panic!() };
        assert_eq!(index_count, 30);
        assert_eq!(instance_count, 4);
    }

    #[test]
    fn dynamic_identity_applies_to_empty_observations() {
        let (vb, ib) = template();
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            dynamic_state(&mut w);
            let mut d = DynamicInstances::<_, MaxCount>::new(&mut w, vb, ib);
            d.append(0, 1).repeat([0u32; 4], 1);
        }
        let DrawCommand::DrawIndexedInstanced { index_count, .. } = draws(&cmds)[0] else { panic!() };
        assert_eq!(index_count, 3);
    }

    #[test]
    fn dynamic_split_uses_counts_before_split() {
        let (vb, ib) = template();
        let mut cmds = DrawPassCommands::new();
        // Room for exactly 4 instances of 16 bytes per block.
        let mut m = manager(64);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            dynamic_state(&mut w);
            let mut d = DynamicInstances::<_, MaxCount>::new(&mut w, vb, ib);
            for obs in [10u32, 20, 5, 7] {
                d.append(obs, 1).repeat([0u32; 4], 1);
            }
            for obs in [8u32, 4] {
                d.append(obs, 1).repeat([0u32; 4], 1);
            }
        }
        let d = draws(&cmds);
        assert_eq!(d.len(), 2);
        let counts: Vec<(u32, u32)> = d
            .iter()
            .map(|c| match *c {
                DrawCommand::DrawIndexedInstanced { index_count, instance_count, .. } => (index_count, instance_count),
                _ => panic!("unexpected draw {c:?}"),
            })
            .collect();
        assert_eq!(counts, vec![(20, 4), (8, 2)]);
    }

    // ── direct draws ──────────────────────────────────────────────────────

    #[test]
    fn direct_draw_flushes_pending_first() {
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            vertex_state(&mut w, 8);
            Vertices::new(&mut w).append(3).repeat(0u64, 3);
            w.draw(BindBufferInfo::new(BufferHandle(77), 0, 80), 2, 10);
            assert_eq!(w.pending_count(), 0);
        }
        let d = draws(&cmds);
        assert_eq!(d.len(), 2);
        assert_eq!(vertex_count(&d[0]), 3);
        assert_eq!(d[1], DrawCommand::Draw { primitive: PrimitiveType::Triangles, base_vertex: 2, vertex_count: 10 });
    }

    #[test]
    fn barrier_precedes_each_draw() {
        let mut cmds = DrawPassCommands::new();
        let mut m = manager(4096);
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            w.new_pipeline_state(
                PrimitiveType::Triangles,
                0,
                8,
                RenderStateFlags::APPEND_VERTICES,
                BarrierType::AdvancedNoncoherentBlend,
            );
            Vertices::new(&mut w).append(3).repeat(0u64, 3);
            w.new_dynamic_state();
            Vertices::new(&mut w).append(3).repeat(0u64, 3);
        }
        let barriers = cmds.iter().filter(|c| matches!(c, DrawCommand::AddBarrier(_))).count();
        assert_eq!(barriers, 2);
        assert_eq!(cmds.draw_call_count(), 2);
    }

    // ── mapping failure ───────────────────────────────────────────────────

    #[test]
    fn mapping_failure_falls_back_to_scratch() {
        let mut cmds = DrawPassCommands::new();
        let mut m = CpuBufferManager::new(BufferManagerConfig {
            vertex_block_size: 64,
            index_block_size: 64,
            max_block_size: 64,
        });
        {
            let mut w = DrawWriter::new(&mut cmds, &mut m);
            vertex_state(&mut w, 16);
            let mut v = Vertices::new(&mut w);
            // 8 vertices need 128 bytes, over the mapping limit.
            v.append(8).repeat([3.0f32; 4], 8);
            assert!(v.writer.is_using_scratch());
            assert_eq!(v.writer.scratch.len(), 128);
        }
        assert!(m.mapping_failed());
        assert_eq!(cmds.draw_call_count(), 1);
    }
}
