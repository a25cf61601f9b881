//! Frame loop state machine.
//!
//! [`FrameDriver::step`] runs exactly one iteration: drain events, sample the
//! clock, then clear/draw/present every active surface. An exit request takes
//! effect once the iteration it arrived in has finished.
//!
//! Surface failures are not fatal. The failing surface is skipped for the rest
//! of the iteration, the error is logged, and the loop carries on.

use rand::{rngs::StdRng, Rng};

use crate::{
    render::{Color, Surface},
    timeline::{Clock, FrameClock, FrameTime},
    Result, Scene,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// Producer of opaque input/window events.
pub trait EventSource {
    type Event;

    /// Next pending event, or `None` once the queue is drained.
    fn poll_event(&mut self) -> Option<Self::Event>;
}

/// Outcome of handling a single event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

pub trait EventHandler<E> {
    fn handle(&mut self, event: &E) -> Control;
}

impl<E, F> EventHandler<E> for F
where
    F: FnMut(&E) -> Control,
{
    fn handle(&mut self, event: &E) -> Control {
        self(event)
    }
}

/// Per-iteration bookkeeping returned by [`FrameDriver::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub time: FrameTime,
    pub events: usize,
    pub surfaces_drawn: usize,
    pub surfaces_failed: usize,
    pub state: RunState,
}

#[derive(Debug)]
pub struct FrameDriver<C: Clock, R: Rng = StdRng> {
    clock: C,
    frame_clock: FrameClock,
    scene: Scene<R>,
    state: RunState,
    frames: u64,
}

impl<C: Clock, R: Rng> FrameDriver<C, R> {
    pub fn new(scene: Scene<R>, clock: C) -> Self {
        let frame_clock = FrameClock::new(scene.config().timing.clone());
        Self {
            clock,
            frame_clock,
            scene,
            state: RunState::Running,
            frames: 0,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    /// Completed iterations so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn scene(&self) -> &Scene<R> {
        &self.scene
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Requests a stop without going through the event source.
    pub fn stop(&mut self) {
        if self.state == RunState::Running {
            tracing::info!(frames = self.frames, "frame driver stopped");
        }
        self.state = RunState::Stopped;
    }

    /// Runs one iteration. Returns `None` when the driver has already stopped.
    pub fn step<E, H, S>(
        &mut self,
        events: &mut E,
        handler: &mut H,
        surfaces: &mut [S],
    ) -> Option<FrameReport>
    where
        E: EventSource,
        H: EventHandler<E::Event>,
        S: Surface,
    {
        if self.state == RunState::Stopped {
            return None;
        }

        let mut exit_requested = false;
        let mut drained = 0;
        while let Some(event) = events.poll_event() {
            drained += 1;
            if handler.handle(&event) == Control::Exit {
                exit_requested = true;
            }
        }

        let time = self.frame_clock.tick(self.clock.ticks_ms());
        tracing::trace!(
            frame = self.frames,
            elapsed_ms = time.elapsed_ms,
            delta = time.delta,
            "frame start"
        );

        let mut drawn = 0;
        let mut failed = 0;
        for (index, surface) in surfaces.iter_mut().enumerate() {
            if !surface.is_active() {
                continue;
            }
            match self.draw_surface(surface, time) {
                Ok(()) => drawn += 1,
                Err(err) => {
                    failed += 1;
                    tracing::warn!(surface = index, error = %err, "skipping surface for this frame");
                }
            }
        }

        self.frames += 1;
        if exit_requested {
            self.stop();
        }

        Some(FrameReport {
            frame: self.frames,
            time,
            events: drained,
            surfaces_drawn: drawn,
            surfaces_failed: failed,
            state: self.state,
        })
    }

    /// Steps until an event handler asks to exit.
    pub fn run<E, H, S>(&mut self, events: &mut E, handler: &mut H, surfaces: &mut [S]) -> u64
    where
        E: EventSource,
        H: EventHandler<E::Event>,
        S: Surface,
    {
        tracing::info!(surfaces = surfaces.len(), "frame driver running");
        while self.step(events, handler, surfaces).is_some() {}
        self.frames
    }

    fn draw_surface<S: Surface>(&mut self, surface: &mut S, time: FrameTime) -> Result<()> {
        surface.clear(Color::BLACK)?;
        self.scene.draw(surface, time.delta, time.now_ms)?;
        surface.present()
    }
}
