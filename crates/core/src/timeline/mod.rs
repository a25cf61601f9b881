use std::time::Instant;

use crate::TimingConfig;

/// Monotonic millisecond tick source.
pub trait Clock {
    /// Milliseconds since an arbitrary epoch. Never decreases.
    fn ticks_ms(&mut self) -> u64;
}

/// Wall clock backed by [`Instant`], counting from construction.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::start()
    }
}

impl Clock for SystemClock {
    fn ticks_ms(&mut self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for deterministic runs and tests.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn advance(&mut self, delta_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
    }
}

impl Clock for ManualClock {
    fn ticks_ms(&mut self) -> u64 {
        self.now_ms
    }
}

/// Timing of one frame iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Absolute tick the frame was sampled at; drives the cube and the wave.
    pub now_ms: u64,
    pub elapsed_ms: u64,
    /// `elapsed_ms` in reference frames; 1.0 is one frame at 60 Hz.
    pub delta: f32,
}

/// Converts raw ticks into per-frame delta-time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_tick: Option<u64>,
    config: TimingConfig,
}

impl FrameClock {
    pub fn new(config: TimingConfig) -> Self {
        Self {
            last_tick: None,
            config,
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> FrameTime {
        let elapsed_ms = match self.last_tick {
            Some(last) => now_ms.saturating_sub(last),
            None => self.config.first_frame_ms,
        };
        self.last_tick = Some(now_ms);

        FrameTime {
            now_ms,
            elapsed_ms,
            delta: elapsed_ms as f32 / self.config.reference_frame_ms,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TimingConfig::default())
    }
}
