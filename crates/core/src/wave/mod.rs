use std::sync::Arc;

use crate::{
    periodic::{SineTable, TABLE_SIZE},
    render::{Color, Surface},
    Result, Viewport, WaveConfig,
};

/// Vertical position and colour of one ribbon column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveColumn {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Scrolling, colour-cycling sine ribbon spanning the viewport.
///
/// Time terms use truncating integer division on the millisecond clock, so the
/// ribbon advances in whole-degree steps.
#[derive(Debug, Clone)]
pub struct WaveRenderer {
    table: Arc<SineTable>,
    viewport: Viewport,
    config: WaveConfig,
}

impl WaveRenderer {
    pub fn new(table: Arc<SineTable>, viewport: Viewport, config: WaveConfig) -> Self {
        Self {
            table,
            viewport,
            config,
        }
    }

    pub fn column(&self, x: i32, elapsed_ms: u64) -> WaveColumn {
        let time = elapsed_ms as i64;
        let x_wide = i64::from(x);

        let phase = x_wide * self.config.frequency + time / self.config.scroll_divisor.max(1);
        let offset = self.config.amplitude as f32 * self.table.sample(phase);
        let y = (self.viewport.half_height() as f32 + offset) as i32;

        let [r, g, b] = self.config.color_divisors.map(|divisor| {
            let angle = (x_wide + time / divisor.max(1)) % TABLE_SIZE as i64;
            ((self.table.sample(angle) + 1.0) * 127.0) as u8
        });

        WaveColumn {
            x,
            y,
            color: Color::rgb(r, g, b),
        }
    }

    /// Draws `thickness` points per column for every column of the viewport.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, elapsed_ms: u64) -> Result<()> {
        let half = self.config.thickness / 2;
        for x in 0..self.viewport.width as i32 {
            let column = self.column(x, elapsed_ms);
            for t in -half..=half {
                surface.draw_point(column.x, column.y + t, column.color)?;
            }
        }
        Ok(())
    }
}
