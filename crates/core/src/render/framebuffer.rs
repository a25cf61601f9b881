use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use super::{Color, Rect, Surface};
use crate::{Result, Viewport};

/// In-memory RGBA raster implementing [`Surface`].
///
/// Every primitive is clipped to the buffer. Opaque colours overwrite; anything
/// with `a < 255` is blended source-over onto the existing pixel.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    presented: u64,
}

impl Framebuffer {
    pub fn new(viewport: Viewport) -> Self {
        let len = viewport.width as usize * viewport.height as usize;
        Self {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![Color::BLACK; len],
            presented: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of completed frames.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Copies the buffer into an `image` RGBA buffer.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let pixel = self.pixels[y as usize * self.width as usize + x as usize];
            Rgba([pixel.r, pixel.g, pixel.b, pixel.a])
        })
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_image().save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    fn plot(&mut self, x: i32, y: i32, color: Color) {
        if let Some(index) = self.index(x, y) {
            let dst = &mut self.pixels[index];
            *dst = blend(*dst, color);
        }
    }
}

impl Surface for Framebuffer {
    fn clear(&mut self, color: Color) -> Result<()> {
        self.pixels.fill(color);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        if rect.w <= 0 || rect.h <= 0 {
            return Ok(());
        }
        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = rect.x.saturating_add(rect.w).min(self.width as i32);
        let y1 = rect.y.saturating_add(rect.h).min(self.height as i32);
        for y in y0..y1 {
            for x in x0..x1 {
                self.plot(x, y, color);
            }
        }
        Ok(())
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> Result<()> {
        let bounds = (i64::from(self.width) - 1, i64::from(self.height) - 1);
        let Some((x0, y0, x1, y1)) = clip_line(
            (i64::from(x0), i64::from(y0)),
            (i64::from(x1), i64::from(y1)),
            bounds,
        ) else {
            return Ok(());
        };

        // Bresenham, all octants, endpoints inclusive.
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);
        loop {
            self.plot(x as i32, y as i32, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        Ok(())
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        self.plot(x, y, color);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

fn outcode(x: i64, y: i64, (max_x, max_y): (i64, i64)) -> u8 {
    let mut code = INSIDE;
    if x < 0 {
        code |= LEFT;
    } else if x > max_x {
        code |= RIGHT;
    }
    if y < 0 {
        code |= TOP;
    } else if y > max_y {
        code |= BOTTOM;
    }
    code
}

/// Cohen-Sutherland clip of a segment against `[0, max_x] × [0, max_y]`.
/// Endpoints already inside are returned untouched.
fn clip_line(
    (mut x0, mut y0): (i64, i64),
    (mut x1, mut y1): (i64, i64),
    bounds: (i64, i64),
) -> Option<(i64, i64, i64, i64)> {
    let (max_x, max_y) = bounds;
    if max_x < 0 || max_y < 0 {
        return None;
    }
    let mut code0 = outcode(x0, y0, bounds);
    let mut code1 = outcode(x1, y1, bounds);
    // Each pass clears at least one outcode bit; four edges bound the work.
    for _ in 0..8 {
        if code0 | code1 == INSIDE {
            return Some((x0, y0, x1, y1));
        }
        if code0 & code1 != INSIDE {
            return None;
        }
        let code = if code0 != INSIDE { code0 } else { code1 };
        let (fx0, fy0, fx1, fy1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);
        let (x, y) = if code & TOP != 0 {
            (fx0 + (fx1 - fx0) * (0.0 - fy0) / (fy1 - fy0), 0.0)
        } else if code & BOTTOM != 0 {
            (fx0 + (fx1 - fx0) * (max_y as f64 - fy0) / (fy1 - fy0), max_y as f64)
        } else if code & RIGHT != 0 {
            (max_x as f64, fy0 + (fy1 - fy0) * (max_x as f64 - fx0) / (fx1 - fx0))
        } else {
            (0.0, fy0 + (fy1 - fy0) * (0.0 - fx0) / (fx1 - fx0))
        };
        let x = (x.round() as i64).clamp(-1, max_x + 1);
        let y = (y.round() as i64).clamp(-1, max_y + 1);
        if code == code0 {
            (x0, y0) = (x, y);
            code0 = outcode(x0, y0, bounds);
        } else {
            (x1, y1) = (x, y);
            code1 = outcode(x1, y1, bounds);
        }
    }
    None
}

fn blend(dst: Color, src: Color) -> Color {
    match src.a {
        255 => src,
        0 => dst,
        alpha => {
            let a = u16::from(alpha);
            let inv = 255 - a;
            let mix = |s: u8, d: u8| ((u16::from(s) * a + u16::from(d) * inv) / 255) as u8;
            Color::new(
                mix(src.r, dst.r),
                mix(src.g, dst.g),
                mix(src.b, dst.b),
                dst.a.max(src.a),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Framebuffer {
        Framebuffer::new(Viewport::new(8, 6))
    }

    #[test]
    fn fill_rect_is_clipped_to_bounds() {
        let mut fb = small();
        fb.fill_rect(Rect::new(-2, -2, 4, 4), Color::WHITE).unwrap();

        assert_eq!(fb.pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.pixel(1, 1), Some(Color::WHITE));
        assert_eq!(fb.pixel(2, 2), Some(Color::BLACK));
        assert_eq!(fb.pixel(-1, 0), None);
    }

    #[test]
    fn lines_include_both_endpoints() {
        let mut fb = small();
        let red = Color::rgb(255, 0, 0);
        fb.draw_line(7, 5, 0, 0, red).unwrap();

        assert_eq!(fb.pixel(0, 0), Some(red));
        assert_eq!(fb.pixel(7, 5), Some(red));
        let lit = fb.pixels().iter().filter(|pixel| **pixel == red).count();
        assert_eq!(lit, 8);
    }

    #[test]
    fn offscreen_points_are_ignored() {
        let mut fb = small();
        fb.draw_point(100, 100, Color::WHITE).unwrap();
        fb.draw_point(-1, 3, Color::WHITE).unwrap();

        assert!(fb.pixels().iter().all(|pixel| *pixel == Color::BLACK));
    }

    #[test]
    fn translucent_colours_blend_source_over() {
        let mut fb = small();
        fb.clear(Color::WHITE).unwrap();
        fb.draw_point(1, 1, Color::new(0, 0, 0, 51)).unwrap();

        assert_eq!(fb.pixel(1, 1), Some(Color::rgb(204, 204, 204)));
    }

    #[test]
    fn extreme_endpoints_are_clipped() {
        let mut fb = small();
        let green = Color::rgb(0, 255, 0);
        fb.draw_line(i32::MIN, 3, i32::MAX, 3, green).unwrap();
        fb.draw_line(i32::MIN, i32::MIN, i32::MIN, i32::MAX, green).unwrap();

        for x in 0..8 {
            assert_eq!(fb.pixel(x, 3), Some(green));
        }
        let lit = fb.pixels().iter().filter(|pixel| **pixel == green).count();
        assert_eq!(lit, 8);
    }

    #[test]
    fn diagonal_through_buffer_is_clipped_to_edges() {
        let mut fb = Framebuffer::new(Viewport::new(10, 10));
        let blue = Color::rgb(0, 0, 255);
        fb.draw_line(-100, -100, 100, 100, blue).unwrap();

        for i in 0..10 {
            assert_eq!(fb.pixel(i, i), Some(blue));
        }
        let lit = fb.pixels().iter().filter(|pixel| **pixel == blue).count();
        assert_eq!(lit, 10);
    }

    #[test]
    fn converts_to_rgba_image() {
        let mut fb = small();
        fb.clear(Color::rgb(1, 2, 3)).unwrap();
        fb.draw_point(7, 5, Color::WHITE).unwrap();

        let image = fb.to_image();

        assert_eq!(image.dimensions(), (8, 6));
        assert_eq!(image.get_pixel(0, 0), &Rgba([1, 2, 3, 255]));
        assert_eq!(image.get_pixel(7, 5), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn saves_png_that_decodes_back() {
        let mut fb = small();
        fb.clear(Color::rgb(40, 50, 60)).unwrap();
        fb.present().unwrap();
        let path = std::env::temp_dir().join(format!("retronova-fb-{}.png", std::process::id()));

        fb.save_png(&path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        let _ = std::fs::remove_file(&path);

        assert_eq!(decoded, fb.to_image());
        assert_eq!(fb.presented(), 1);
    }
}
