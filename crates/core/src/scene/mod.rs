use std::sync::Arc;

use rand::{rngs::StdRng, Rng};

use crate::{
    cube::CubeRenderer,
    periodic::SineTable,
    render::Surface,
    starfield::Starfield,
    wave::WaveRenderer,
    DemoConfig, Result,
};

/// All mutable and immutable demo state: the star pool plus the renderers.
#[derive(Debug, Clone)]
pub struct Scene<R: Rng = StdRng> {
    config: DemoConfig,
    starfield: Starfield<R>,
    wave: WaveRenderer,
    cube: CubeRenderer,
}

impl Scene<StdRng> {
    /// Builds the scene with a wall-clock seeded starfield.
    pub fn new(config: DemoConfig) -> Self {
        let starfield = Starfield::from_time(config.viewport, config.stars.clone());
        Self::with_starfield(config, starfield)
    }

    pub fn with_seed(config: DemoConfig, seed: u64) -> Self {
        let starfield = Starfield::with_seed(config.viewport, config.stars.clone(), seed);
        Self::with_starfield(config, starfield)
    }
}

impl<R: Rng> Scene<R> {
    pub fn with_starfield(config: DemoConfig, starfield: Starfield<R>) -> Self {
        let table = Arc::new(SineTable::build());
        let wave = WaveRenderer::new(table, config.viewport, config.wave.clone());
        let cube = CubeRenderer::new(config.viewport, config.cube.clone());
        Self {
            config,
            starfield,
            wave,
            cube,
        }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn starfield(&self) -> &Starfield<R> {
        &self.starfield
    }

    pub fn starfield_mut(&mut self) -> &mut Starfield<R> {
        &mut self.starfield
    }

    pub fn wave(&self) -> &WaveRenderer {
        &self.wave
    }

    pub fn cube(&self) -> &CubeRenderer {
        &self.cube
    }

    /// Advances the stars by `delta` and draws stars, ribbon and cube, in that
    /// order. Clearing and presenting are left to the caller.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        delta: f32,
        elapsed_ms: u64,
    ) -> Result<()> {
        self.starfield.advance(delta);
        self.starfield.render(surface)?;
        self.wave.render(surface, elapsed_ms)?;
        self.cube.render(surface, elapsed_ms)
    }
}
