//! Core library for the Retronova demo.
//!
//! Everything that happens inside one frame lives here: the sine lookup table,
//! the starfield simulation, the wireframe cube, the scrolling ribbon and the
//! driver that sequences them against one or more output surfaces. Windowing
//! and input stay outside; the crate only sees the [`Surface`], [`Clock`] and
//! [`EventSource`] traits.

pub mod config;
pub mod cube;
pub mod driver;
pub mod error;
pub mod periodic;
pub mod record;
pub mod render;
pub mod scene;
pub mod starfield;
pub mod timeline;
pub mod wave;

pub use config::{CubeConfig, DemoConfig, StarfieldConfig, TimingConfig, Viewport, WaveConfig};
pub use cube::CubeRenderer;
pub use driver::{Control, EventHandler, EventSource, FrameDriver, FrameReport, RunState};
pub use error::{DemoError, Result};
pub use periodic::SineTable;
pub use record::{Recorder, RecordingSettings};
pub use render::{Color, CommandLog, DrawCommand, Framebuffer, Rect, Surface};
pub use scene::Scene;
pub use starfield::{Star, Starfield};
pub use timeline::{Clock, FrameClock, FrameTime, ManualClock, SystemClock};
pub use wave::WaveRenderer;
