//! Every step's WGSL parses and validates with naga, and its vertex
//! interface lines up with the attributes and varyings the step declares.

use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{Binding, Handle, Module, ShaderStage, Type, TypeInner};
use tessera_engine::gpu::CpuBufferManager;
use tessera_engine::render::{RenderStep, RendererProvider};

const COVERAGE_ENTRY: &str = "
@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    return vec4<f32>(coverage(in));
}
";

fn provider() -> RendererProvider {
    let mut manager = CpuBufferManager::default();
    RendererProvider::new(&mut manager)
}

/// Distinct steps with shaders, first occurrence by name.
fn shaded_steps(provider: &RendererProvider) -> Vec<&RenderStep> {
    let mut out: Vec<&RenderStep> = Vec::new();
    for (id, _) in provider.renderers() {
        for step in provider.steps_of(id) {
            if !step.vertex_shader().is_empty() && out.iter().all(|s| s.name() != step.name()) {
                out.push(step);
            }
        }
    }
    out
}

fn source(step: &RenderStep) -> String {
    let mut src = step.vertex_shader().to_owned();
    if !step.fragment_shader().is_empty() {
        src.push_str(step.fragment_shader());
        src.push_str(COVERAGE_ENTRY);
    }
    src
}

fn compile(name: &str, src: &str) -> Module {
    let module = naga::front::wgsl::parse_str(src)
        .unwrap_or_else(|e| panic!("{name} does not parse:\n{}", e.emit_to_string(src)));
    Validator::new(ValidationFlags::all() & !ValidationFlags::CONTROL_FLOW_UNIFORMITY, Capabilities::all())
        .validate(&module)
        .unwrap_or_else(|e| panic!("{name} does not validate:\n{}", e.emit_to_string(src)));
    module
}

fn location_count(module: &Module, ty: Handle<Type>, binding: &Option<Binding>) -> usize {
    match (binding, &module.types[ty].inner) {
        (Some(Binding::Location { .. }), _) => 1,
        (None, TypeInner::Struct { members, .. }) => members
            .iter()
            .filter(|m| matches!(m.binding, Some(Binding::Location { .. })))
            .count(),
        _ => 0,
    }
}

// ── validation ────────────────────────────────────────────────────────────

#[test]
fn every_step_shader_validates() {
    let provider = provider();
    let steps = shaded_steps(&provider);
    assert!(steps.len() >= 8, "only {} shaded steps", steps.len());
    for step in steps {
        let module = compile(step.name(), &source(step));
        let stages: Vec<ShaderStage> = module.entry_points.iter().map(|e| e.stage).collect();
        assert!(stages.contains(&ShaderStage::Vertex), "{} has no vertex entry", step.name());
        assert_eq!(
            stages.contains(&ShaderStage::Fragment),
            !step.fragment_shader().is_empty(),
            "{}",
            step.name()
        );
    }
}

#[test]
fn analytic_coverage_reads_corners_and_jacobian() {
    let provider = provider();
    let step = provider.steps_of(provider.analytic_rrect()).next().unwrap();
    let coverage = step.fragment_shader();
    assert!(coverage.contains("fn corner_distances"));
    assert!(coverage.contains("in.jacobian"));
    assert!(coverage.contains("in.per_pixel_control"));
}

// ── interface ─────────────────────────────────────────────────────────────

#[test]
fn vertex_interface_matches_declared_layout() {
    let provider = provider();
    for step in shaded_steps(&provider) {
        let module = compile(step.name(), &source(step));
        let entry = module
            .entry_points
            .iter()
            .find(|e| e.stage == ShaderStage::Vertex)
            .unwrap();

        let inputs: usize = entry
            .function
            .arguments
            .iter()
            .map(|a| location_count(&module, a.ty, &a.binding))
            .sum();
        assert_eq!(
            inputs,
            step.vertex_attrs().len() + step.instance_attrs().len(),
            "{} vertex inputs",
            step.name()
        );

        let result = entry.function.result.as_ref().unwrap();
        // Every step forwards its ssbo index alongside the declared varyings.
        assert_eq!(
            location_count(&module, result.ty, &result.binding),
            step.varyings().len() + 1,
            "{} varyings",
            step.name()
        );
    }
}
