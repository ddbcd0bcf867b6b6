//! The drawing surface particles paint onto

use wisp_core::{Rgba, Vec2};

/// Minimal 2D canvas: device pixels, y-down, x-right
pub trait DrawSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Filled circle; `style` formats as `rgba(r, g, b, a)`
    fn fill_circle(&mut self, center: Vec2, radius: f32, style: Rgba);
}

/// One recorded surface call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        style: Rgba,
    },
}

/// Records draw calls instead of rasterizing them, for hosts that replay
/// commands elsewhere and for inspecting a frame
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Circles drawn since the most recent clear
    pub fn circles_in_frame(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear { .. }))
            .map_or(0, |i| i + 1);
        self.commands[start..].iter().filter_map(|c| match c {
            DrawCommand::Circle {
                center,
                radius,
                style,
            } => Some((*center, *radius, *style)),
            DrawCommand::Clear { .. } => None,
        })
    }
}

impl DrawSurface for RecordingSurface {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, style: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            style,
        });
    }
}
