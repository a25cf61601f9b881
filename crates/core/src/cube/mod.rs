use crate::{
    render::{Color, Surface},
    CubeConfig, Result, Viewport,
};

pub const VERTEX_COUNT: usize = 8;
pub const EDGE_COUNT: usize = 12;

/// Unit cube corners; scaled by the configured half-extent.
const UNIT_VERTICES: [[f32; 3]; VERTEX_COUNT] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Back face, front face, then the four connecting edges.
pub const EDGES: [(usize, usize); EDGE_COUNT] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Wireframe cube spinning about the vertical axis.
#[derive(Debug, Clone)]
pub struct CubeRenderer {
    vertices: [[f32; 3]; VERTEX_COUNT],
    viewport: Viewport,
    config: CubeConfig,
}

impl CubeRenderer {
    pub fn new(viewport: Viewport, config: CubeConfig) -> Self {
        let extent = config.half_extent;
        let vertices = UNIT_VERTICES.map(|[x, y, z]| [x * extent, y * extent, z * extent]);
        Self {
            vertices,
            viewport,
            config,
        }
    }

    pub fn vertices(&self) -> &[[f32; 3]; VERTEX_COUNT] {
        &self.vertices
    }

    pub fn edges(&self) -> &'static [(usize, usize); EDGE_COUNT] {
        &EDGES
    }

    /// Screen positions of all eight vertices one radian per second into the
    /// rotation.
    pub fn project(&self, elapsed_ms: u64) -> [(i32, i32); VERTEX_COUNT] {
        let angle = elapsed_ms as f32 / 1000.0;
        let (sin_a, cos_a) = angle.sin_cos();
        let half_w = self.viewport.half_width() as f32;
        let half_h = self.viewport.half_height() as f32;

        self.vertices.map(|[x, y, z]| {
            let rx = x * cos_a - z * sin_a;
            let rz = x * sin_a + z * cos_a;
            let depth = rz + self.config.camera_offset;
            let sx = (rx / depth) * self.config.projection + half_w;
            let sy = (y / depth) * self.config.projection + half_h;
            (sx as i32, sy as i32)
        })
    }

    /// Draws all twelve edges in white. There is no hidden-line removal.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, elapsed_ms: u64) -> Result<()> {
        let projected = self.project(elapsed_ms);
        for &(a, b) in &EDGES {
            let (x0, y0) = projected[a];
            let (x1, y1) = projected[b];
            surface.draw_line(x0, y0, x1, y1, Color::WHITE)?;
        }
        Ok(())
    }
}
