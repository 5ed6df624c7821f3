use smallvec::SmallVec;

/// Index of a render step in a [`RendererProvider`](super::RendererProvider).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StepId(pub(crate) u16);

impl StepId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a renderer in a [`RendererProvider`](super::RendererProvider).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RendererId(pub(crate) u16);

impl RendererId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Most renderers have one to three steps.
pub const MAX_RENDER_STEPS: usize = 4;

/// An ordered list of render steps that together draw one draw.
///
/// Steps are referenced by id; the provider that handed the renderer out
/// owns them. Stencil steps always come before the cover step that consumes
/// their stencil values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    name: String,
    steps: SmallVec<[StepId; MAX_RENDER_STEPS]>,
}

impl Renderer {
    pub fn new(name: impl Into<String>, steps: &[StepId]) -> Self {
        debug_assert!(!steps.is_empty() && steps.len() <= MAX_RENDER_STEPS, "renderer step count {}", steps.len());
        Self { name: name.into(), steps: SmallVec::from_slice(steps) }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn num_render_steps(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn step(&self, i: usize) -> StepId {
        self.steps[i]
    }

    #[inline]
    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }
}
