use std::collections::HashMap;
use std::hash::Hash;

use smallvec::SmallVec;

use super::draw_list::DrawList;
use super::key::SortKey;
use crate::draw_writer::DrawWriter;
use crate::error::RecordError;
use crate::geom::Rect;
use crate::gpu::{
    BarrierType, DrawBufferManager, DrawCommand, DrawPassCommands, PipelineDataGatherer, ScissorRect,
    TextureBinding,
};
use crate::render::{RendererProvider, StepId};

/// Textures bound together for one draw step.
pub type TextureSet = SmallVec<[TextureBinding; 2]>;

/// Counters of one recorded pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PassStats {
    /// Draws whose steps were all encoded.
    pub draws: usize,
    /// Draws dropped because their renderer cannot encode geometry yet.
    pub skipped_draws: usize,
    /// Draw calls in the command stream.
    pub draw_calls: usize,
    /// Distinct pipelines bound.
    pub pipelines: usize,
}

/// Deduplicated values addressed by index, in first-use order.
#[derive(Debug)]
struct Interner<T> {
    values: Vec<T>,
    index: HashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> Interner<T> {
    fn new() -> Self {
        Self { values: Vec::new(), index: HashMap::new() }
    }

    fn intern(&mut self, value: &T) -> u32 {
        if let Some(&i) = self.index.get(value) {
            return i;
        }
        let i = self.values.len() as u32;
        self.values.push(value.clone());
        self.index.insert(value.clone(), i);
        i
    }
}

/// The recorded command stream of a draw list, plus the tables its bind
/// commands index into.
///
/// `BindGraphicsPipeline { pipeline }` refers to [`pipelines`](Self::pipelines),
/// `BindUniforms { index }` to [`uniform_block`](Self::uniform_block) and
/// `BindTextures { index }` to [`texture_set`](Self::texture_set).
#[derive(Debug)]
pub struct DrawPass {
    commands: DrawPassCommands,
    pipelines: Vec<StepId>,
    uniforms: Vec<Vec<u8>>,
    textures: Vec<TextureSet>,
    bounds: Rect,
    requires_msaa: bool,
    stats: PassStats,
}

impl DrawPass {
    /// Encodes every supported draw of `list`, step by step in sort order.
    ///
    /// Draws are sorted by painter's order, then stencil index, then step
    /// position, so disjoint stencil draws run each step back to back and
    /// share batches. State binds are recorded only when they change.
    ///
    /// Fails when `manager` could not map memory at any point; the commands
    /// then reference scratch memory and must not be submitted.
    pub fn record<M: DrawBufferManager + ?Sized>(
        list: &DrawList<'_>,
        provider: &RendererProvider,
        manager: &mut M,
    ) -> Result<DrawPass, RecordError> {
        let mut pipelines = Interner::<StepId>::new();
        let mut uniforms = Interner::<Vec<u8>>::new();
        let mut textures = Interner::<TextureSet>::new();
        let mut gatherer = PipelineDataGatherer::new();

        let mut stats = PassStats::default();
        let mut bounds = Rect::empty();
        let mut requires_msaa = false;
        let mut keys = Vec::new();

        for (i, draw) in list.draws().iter().enumerate() {
            let renderer = draw.renderer();
            if !provider.is_supported(renderer) {
                log::warn!("skipping draw {i}: {} is not supported yet", provider.renderer(renderer).name());
                stats.skipped_draws += 1;
                continue;
            }
            stats.draws += 1;
            bounds = bounds.union(draw.params().clip().draw_bounds());
            requires_msaa |= provider.requires_msaa(renderer);

            let order = draw.order();
            for (step_index, &step_id) in provider.renderer(renderer).steps().iter().enumerate() {
                let step = provider.step(step_id);
                gatherer.reset();
                step.write_uniforms_and_textures(draw.params(), &mut gatherer);

                let uniform_index =
                    gatherer.has_uniforms().then(|| uniforms.intern(&gatherer.uniform_data().to_vec()));
                let texture_index = (!gatherer.textures().is_empty())
                    .then(|| textures.intern(&TextureSet::from_slice(gatherer.textures())));

                keys.push(SortKey {
                    paint_order: order.paint_order(),
                    stencil_index: order.stencil_index(),
                    step: step_index as u8,
                    pipeline: pipelines.intern(&step_id),
                    uniforms: uniform_index,
                    textures: texture_index,
                    draw: i as u32,
                });
            }
        }
        keys.sort_unstable();

        let mut commands = DrawPassCommands::new();
        {
            let mut writer = DrawWriter::new(&mut commands, manager);
            let mut bound_pipeline = None;
            let mut bound_uniforms = None;
            let mut bound_textures = None;
            let mut bound_scissor = None;

            for key in &keys {
                let draw = &list.draws()[key.draw as usize];
                let step = provider.step(pipelines.values[key.pipeline as usize]);

                if bound_pipeline != Some(key.pipeline) {
                    writer.new_pipeline_state(
                        step.primitive(),
                        step.static_stride(),
                        step.append_stride(),
                        step.render_state(),
                        BarrierType::None,
                    );
                    writer.record_state(DrawCommand::BindGraphicsPipeline { pipeline: key.pipeline });
                    bound_pipeline = Some(key.pipeline);
                    bound_uniforms = None;
                    bound_textures = None;
                }
                if let Some(index) = key.uniforms {
                    if bound_uniforms != Some(index) {
                        writer.record_state(DrawCommand::BindUniforms { index });
                        bound_uniforms = Some(index);
                    }
                }
                if let Some(index) = key.textures {
                    if bound_textures != Some(index) {
                        writer.record_state(DrawCommand::BindTextures { index });
                        bound_textures = Some(index);
                    }
                }
                let scissor = ScissorRect::from_rect(draw.params().clip().scissor());
                if bound_scissor != Some(scissor) {
                    writer.record_state(DrawCommand::SetScissor(scissor));
                    bound_scissor = Some(scissor);
                }

                step.write_vertices(&mut writer, draw.params(), draw.ssbo_index());
            }
        }

        if manager.mapping_failed() {
            log::warn!("draw pass of {} draws lost its buffers", stats.draws);
            return Err(RecordError::BufferMappingFailed);
        }

        stats.draw_calls = commands.draw_call_count();
        stats.pipelines = pipelines.values.len();
        log::debug!(
            "recorded draw pass: {} draws ({} skipped), {} draw calls, {} pipelines",
            stats.draws,
            stats.skipped_draws,
            stats.draw_calls,
            stats.pipelines
        );

        Ok(DrawPass {
            commands,
            pipelines: pipelines.values,
            uniforms: uniforms.values,
            textures: textures.values,
            bounds,
            requires_msaa,
            stats,
        })
    }

    #[inline]
    pub fn commands(&self) -> &DrawPassCommands {
        &self.commands
    }

    /// Step whose pipeline each pipeline index stands for.
    #[inline]
    pub fn pipelines(&self) -> &[StepId] {
        &self.pipelines
    }

    #[inline]
    pub fn uniform_block(&self, index: u32) -> &[u8] {
        &self.uniforms[index as usize]
    }

    #[inline]
    pub fn uniform_block_count(&self) -> usize {
        self.uniforms.len()
    }

    #[inline]
    pub fn texture_set(&self, index: u32) -> &[TextureBinding] {
        &self.textures[index as usize]
    }

    #[inline]
    pub fn texture_set_count(&self) -> usize {
        self.textures.len()
    }

    /// Union of the device bounds of every encoded draw.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// True when any encoded draw needs a multisampled target.
    #[inline]
    pub fn requires_msaa(&self) -> bool {
        self.requires_msaa
    }

    #[inline]
    pub fn stats(&self) -> PassStats {
        self.stats
    }
}
