use serde::{Deserialize, Serialize};

/// Compiled-in constants for the whole demo. Nothing here is read from disk;
/// the struct exists so the renderers share one source of truth and tests can
/// shrink the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub viewport: Viewport,
    pub stars: StarfieldConfig,
    pub cube: CubeConfig,
    pub wave: WaveConfig,
    pub timing: TimingConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            stars: StarfieldConfig::default(),
            cube: CubeConfig::default(),
            wave: WaveConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

/// Logical resolution every coordinate is computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn half_width(&self) -> i32 {
        self.width as i32 / 2
    }

    pub fn half_height(&self) -> i32 {
        self.height as i32 / 2
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarfieldConfig {
    pub count: usize,
    /// Depth units travelled per reference frame.
    pub speed: f32,
    /// Depth a respawned star starts at; also the deepest initial depth.
    pub far_plane: f32,
    pub projection: f32,
    pub max_size: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 200,
            speed: 2.0,
            far_plane: 200.0,
            projection: 100.0,
            max_size: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeConfig {
    pub half_extent: f32,
    pub camera_offset: f32,
    pub projection: f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            half_extent: 50.0,
            camera_offset: 200.0,
            projection: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub amplitude: i32,
    pub frequency: i64,
    pub thickness: i32,
    /// Milliseconds per degree of scroll.
    pub scroll_divisor: i64,
    /// Milliseconds per degree of phase for the red, green and blue channels.
    pub color_divisors: [i64; 3],
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude: 100,
            frequency: 6,
            thickness: 3,
            scroll_divisor: 5,
            color_divisors: [10, 15, 20],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Length of one reference frame; a delta of 1.0 corresponds to it.
    pub reference_frame_ms: f32,
    /// Elapsed time assumed for the very first iteration.
    pub first_frame_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            reference_frame_ms: 16.6667,
            first_frame_ms: 16,
        }
    }
}
