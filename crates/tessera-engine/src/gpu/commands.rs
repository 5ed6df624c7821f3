use crate::geom::Rect;

use super::{BarrierType, BindBufferInfo, PrimitiveType};

/// Integer scissor rect in device pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    /// Rounds a device-space rect outward and clamps it to non-negative pixels.
    pub fn from_rect(rect: Rect) -> Self {
        let r = rect.round_out();
        let left = r.left.max(0.0);
        let top = r.top.max(0.0);
        Self {
            x: left as u32,
            y: top as u32,
            width: (r.right - left).max(0.0) as u32,
            height: (r.bottom - top).max(0.0) as u32,
        }
    }
}

/// Buffers bound for the draws that follow.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct DrawBuffers {
    pub vertices: BindBufferInfo,
    pub instances: BindBufferInfo,
    pub indices: BindBufferInfo,
}

/// One recorded GPU command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DrawCommand {
    BindGraphicsPipeline {
        pipeline: u32,
    },
    /// Binds uniform block `index` of the recorded pass.
    BindUniforms {
        index: u32,
    },
    /// Binds texture set `index` of the recorded pass.
    BindTextures {
        index: u32,
    },
    BindDrawBuffers(DrawBuffers),
    SetScissor(ScissorRect),
    AddBarrier(BarrierType),
    Draw {
        primitive: PrimitiveType,
        base_vertex: u32,
        vertex_count: u32,
    },
    DrawIndexed {
        primitive: PrimitiveType,
        base_index: u32,
        index_count: u32,
        base_vertex: u32,
    },
    DrawInstanced {
        primitive: PrimitiveType,
        base_vertex: u32,
        vertex_count: u32,
        base_instance: u32,
        instance_count: u32,
    },
    DrawIndexedInstanced {
        primitive: PrimitiveType,
        base_index: u32,
        index_count: u32,
        base_vertex: u32,
        base_instance: u32,
        instance_count: u32,
    },
}

impl DrawCommand {
    #[inline]
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            DrawCommand::Draw { .. }
                | DrawCommand::DrawIndexed { .. }
                | DrawCommand::DrawInstanced { .. }
                | DrawCommand::DrawIndexedInstanced { .. }
        )
    }
}

/// Command stream of one draw pass, in submission order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DrawPassCommands {
    commands: Vec<DrawCommand>,
}

impl DrawPassCommands {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    #[inline]
    pub fn bind_graphics_pipeline(&mut self, pipeline: u32) {
        self.push(DrawCommand::BindGraphicsPipeline { pipeline });
    }

    #[inline]
    pub fn bind_draw_buffers(&mut self, buffers: DrawBuffers) {
        self.push(DrawCommand::BindDrawBuffers(buffers));
    }

    #[inline]
    pub fn add_barrier(&mut self, barrier: BarrierType) {
        self.push(DrawCommand::AddBarrier(barrier));
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of draw calls recorded.
    pub fn draw_call_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scissor_rounds_out_and_clamps() {
        let s = ScissorRect::from_rect(Rect::new(-3.5, 1.2, 10.1, 4.0));
        assert_eq!(s, ScissorRect { x: 0, y: 1, width: 11, height: 3 });
    }

    #[test]
    fn counts_only_draws() {
        let mut cmds = DrawPassCommands::new();
        cmds.bind_graphics_pipeline(0);
        cmds.push(DrawCommand::Draw { primitive: PrimitiveType::Triangles, base_vertex: 0, vertex_count: 3 });
        cmds.add_barrier(BarrierType::AdvancedNoncoherentBlend);
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds.draw_call_count(), 1);
    }
}
