//! Output-surface abstraction shared by every renderer.
//!
//! Renderers only ever talk to [`Surface`]; windows, GPU contexts and display
//! scaling live on the other side of it. Two in-crate implementations exist:
//! [`Framebuffer`] rasterises into memory and [`CommandLog`] records the calls.

mod framebuffer;

use serde::{Deserialize, Serialize};

use crate::Result;

pub use framebuffer::Framebuffer;

/// RGBA colour, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centred on `(cx, cy)`, halving with integer
    /// division so odd sizes lean towards the top-left.
    pub const fn centered_square(cx: i32, cy: i32, size: i32) -> Self {
        Self::new(cx - size / 2, cy - size / 2, size, size)
    }
}

/// Drawing target accepting commands in logical pixel coordinates.
pub trait Surface {
    /// Inactive surfaces are skipped by the frame driver.
    fn is_active(&self) -> bool {
        true
    }

    fn clear(&mut self, color: Color) -> Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()>;

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> Result<()>;

    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> Result<()>;

    fn present(&mut self) -> Result<()>;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        (**self).clear(color)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        (**self).fill_rect(rect, color)
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> Result<()> {
        (**self).draw_line(x0, y0, x1, y1, color)
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        (**self).draw_point(x, y, color)
    }

    fn present(&mut self) -> Result<()> {
        (**self).present()
    }
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear { color: Color },
    FillRect { rect: Rect, color: Color },
    Line { x0: i32, y0: i32, x1: i32, y1: i32, color: Color },
    Point { x: i32, y: i32, color: Color },
    Present,
}

/// Surface that records every call instead of drawing it.
#[derive(Debug, Default, Clone)]
pub struct CommandLog {
    commands: Vec<DrawCommand>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_log(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn count_where(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|command| predicate(command)).count()
    }

    pub fn lines(&self) -> usize {
        self.count_where(|command| matches!(command, DrawCommand::Line { .. }))
    }

    pub fn points(&self) -> usize {
        self.count_where(|command| matches!(command, DrawCommand::Point { .. }))
    }

    pub fn rects(&self) -> usize {
        self.count_where(|command| matches!(command, DrawCommand::FillRect { .. }))
    }

    /// Serialises the log as a pretty-printed JSON array.
    pub fn write_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.commands)?;
        Ok(())
    }
}

impl Surface for CommandLog {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Clear { color });
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::FillRect { rect, color });
        Ok(())
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        });
        Ok(())
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Point { x, y, color });
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::Present);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_square_uses_integer_halving() {
        assert_eq!(Rect::centered_square(320, 240, 1), Rect::new(320, 240, 1, 1));
        assert_eq!(Rect::centered_square(320, 240, 2), Rect::new(319, 239, 2, 2));
        assert_eq!(Rect::centered_square(10, 10, 3), Rect::new(9, 9, 3, 3));
    }

    #[test]
    fn command_log_records_in_order() {
        let mut log = CommandLog::new();
        log.clear(Color::BLACK).unwrap();
        log.draw_point(1, 2, Color::WHITE).unwrap();
        log.draw_line(0, 0, 5, 5, Color::WHITE).unwrap();
        log.present().unwrap();

        assert_eq!(log.len(), 4);
        assert_eq!(log.points(), 1);
        assert_eq!(log.lines(), 1);
        assert_eq!(log.commands()[0], DrawCommand::Clear { color: Color::BLACK });
        assert_eq!(log.commands()[3], DrawCommand::Present);
    }

    #[test]
    fn command_log_serialises_with_op_tags() {
        let mut log = CommandLog::new();
        log.fill_rect(Rect::new(1, 2, 3, 3), Color::rgb(9, 8, 7)).unwrap();

        let mut out = Vec::new();
        log.write_json(&mut out).unwrap();
        let json = String::from_utf8(out).unwrap();

        assert!(json.contains("\"op\": \"fill_rect\""));
        assert!(json.contains("\"w\": 3"));
    }
}
