//! Render steps and their composition into renderers.
//!
//! A [`RenderStep`] is one GPU pass of a draw: pipeline layout plus the code
//! that encodes a draw's geometry for it. A [`Renderer`] lists the steps that
//! together draw one kind of geometry, and the [`RendererProvider`] owns all
//! of them. [`choose_renderer`] maps a draw to its renderer.

pub mod aa;
pub mod analytic_rrect;
pub mod cover_bounds;
pub mod coverage_mask;
pub mod middle_out_fan;
pub mod per_edge_aa_quad;
mod provider;
mod renderer;
mod select;
mod step;
pub mod tessellate_curves;
pub mod tessellate_strokes;
pub mod tessellate_wedges;
pub mod text;
pub mod vertices;

pub use provider::RendererProvider;
pub use renderer::{Renderer, RendererId, StepId, MAX_RENDER_STEPS};
pub use select::{choose_renderer, line_to_quad, RendererConfig, Selection};
pub use step::{RenderStep, StepDesc, StepKind};
