//! Fixed pool of stars drifting towards the camera.
//!
//! Stars live in camera space: `x`/`y` are centred on the viewport and `z` is
//! the distance from the viewer. Every frame each star moves closer; once it
//! passes the camera it is respawned at the far plane with a fresh position.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    render::{Color, Rect, Surface},
    Result, StarfieldConfig, Viewport,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub color: Color,
}

/// Screen-space footprint of a star for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarSprite {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

impl StarSprite {
    pub fn rect(&self) -> Rect {
        Rect::centered_square(self.x, self.y, self.size)
    }
}

impl Star {
    /// Perspective-divides the star into the viewport. `z` must be positive,
    /// which [`Starfield::advance`] guarantees.
    pub fn project(&self, viewport: Viewport, config: &StarfieldConfig) -> StarSprite {
        let x = (self.x / self.z) * config.projection + viewport.half_width() as f32;
        let y = (self.y / self.z) * config.projection + viewport.half_height() as f32;
        let size = ((1.0 - self.z / config.far_plane) * config.max_size) as i32;
        StarSprite {
            x: x as i32,
            y: y as i32,
            size: size.max(1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Starfield<R: Rng = StdRng> {
    stars: Vec<Star>,
    viewport: Viewport,
    config: StarfieldConfig,
    rng: R,
}

impl Starfield<StdRng> {
    /// Seeds the random source from the wall clock, once, at start-up.
    pub fn from_time(viewport: Viewport, config: StarfieldConfig) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or_default();
        tracing::debug!(seed, "seeding starfield");
        Self::with_seed(viewport, config, seed)
    }

    pub fn with_seed(viewport: Viewport, config: StarfieldConfig, seed: u64) -> Self {
        Self::new(viewport, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Starfield<R> {
    /// Populates `config.count` stars with random position, depth and colour.
    pub fn new(viewport: Viewport, config: StarfieldConfig, mut rng: R) -> Self {
        let max_depth = config.far_plane.max(1.0) as i32;
        let stars = (0..config.count)
            .map(|_| {
                let (x, y) = random_position(&mut rng, viewport);
                Star {
                    x,
                    y,
                    z: rng.gen_range(1..=max_depth) as f32,
                    color: Color::rgb(rng.gen(), rng.gen(), rng.gen()),
                }
            })
            .collect();

        Self {
            stars,
            viewport,
            config,
            rng,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn stars_mut(&mut self) -> &mut [Star] {
        &mut self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Moves every star `speed * delta_time` closer and recycles the ones that
    /// reached the camera. Colour survives a respawn.
    pub fn advance(&mut self, delta_time: f32) {
        let step = self.config.speed * delta_time;
        let mut respawned = 0usize;
        for star in &mut self.stars {
            star.z -= step;
            if star.z <= 0.0 {
                let (x, y) = random_position(&mut self.rng, self.viewport);
                star.x = x;
                star.y = y;
                star.z = self.config.far_plane;
                respawned += 1;
            }
        }
        if respawned > 0 {
            tracing::trace!(respawned, "recycled stars");
        }
    }

    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> Result<()> {
        for star in &self.stars {
            let sprite = star.project(self.viewport, &self.config);
            surface.fill_rect(sprite.rect(), star.color)?;
        }
        Ok(())
    }
}

/// Integer-valued position in `[-w/2, w/2) × [-h/2, h/2)`.
fn random_position<R: Rng>(rng: &mut R, viewport: Viewport) -> (f32, f32) {
    let half_w = viewport.half_width();
    let half_h = viewport.half_height();
    let x = rng.gen_range(0..viewport.width.max(1) as i32) - half_w;
    let y = rng.gen_range(0..viewport.height.max(1) as i32) - half_h;
    (x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{CommandLog, DrawCommand};

    fn field(seed: u64) -> Starfield {
        Starfield::with_seed(Viewport::default(), StarfieldConfig::default(), seed)
    }

    fn in_bounds(star: &Star, viewport: Viewport) -> bool {
        let half_w = viewport.half_width() as f32;
        let half_h = viewport.half_height() as f32;
        star.x >= -half_w && star.x < half_w && star.y >= -half_h && star.y < half_h
    }

    #[test]
    fn initial_stars_respect_bounds() {
        let stars = field(1);
        let viewport = Viewport::default();

        assert_eq!(stars.len(), 200);
        for star in stars.stars() {
            assert!(in_bounds(star, viewport));
            assert!(star.z >= 1.0 && star.z <= 200.0);
            assert_eq!(star.z.fract(), 0.0);
            assert_eq!(star.color.a, 255);
        }
    }

    #[test]
    fn depth_stays_positive_across_many_frames() {
        let mut stars = field(2);

        for frame in 0..2_000 {
            let delta = if frame % 7 == 0 { 3.5 } else { 0.96 };
            stars.advance(delta);
            for star in stars.stars() {
                assert!(star.z > 0.0 && star.z <= 200.0, "z = {}", star.z);
            }
        }
    }

    #[test]
    fn crossing_the_camera_respawns_at_far_plane() {
        let mut stars = field(3);
        let color = Color::rgb(10, 20, 30);
        stars.stars_mut()[0] = Star {
            x: 5.0,
            y: 5.0,
            z: 1.5,
            color,
        };

        stars.advance(1.0);

        let star = &stars.stars()[0];
        assert_eq!(star.z, 200.0);
        assert!(in_bounds(star, Viewport::default()));
        assert_eq!(star.color, color);
    }

    #[test]
    fn landing_exactly_on_zero_respawns() {
        let mut stars = field(4);
        stars.stars_mut()[0].z = 2.0;

        stars.advance(1.0);

        assert_eq!(stars.stars()[0].z, 200.0);
    }

    #[test]
    fn centred_star_projects_to_viewport_centre() {
        let star = Star {
            x: 0.0,
            y: 0.0,
            z: 100.0,
            color: Color::WHITE,
        };

        let sprite = star.project(Viewport::default(), &StarfieldConfig::default());

        assert_eq!(sprite, StarSprite { x: 320, y: 240, size: 1 });
        assert_eq!(sprite.rect(), Rect::new(320, 240, 1, 1));
    }

    #[test]
    fn near_stars_render_larger() {
        let config = StarfieldConfig::default();
        let near = Star {
            x: 10.0,
            y: -10.0,
            z: 10.0,
            color: Color::WHITE,
        };
        let far = Star { z: 199.0, ..near.clone() };

        assert_eq!(near.project(Viewport::default(), &config).size, 2);
        assert_eq!(far.project(Viewport::default(), &config).size, 1);
    }

    #[test]
    fn render_draws_one_square_per_star_in_star_colour() {
        let stars = field(5);
        let mut log = CommandLog::new();

        stars.render(&mut log).unwrap();

        assert_eq!(log.rects(), stars.len());
        for (command, star) in log.commands().iter().zip(stars.stars()) {
            match command {
                DrawCommand::FillRect { color, .. } => assert_eq!(*color, star.color),
                other => panic!("unexpected command {other:?}"),
            }
        }
    }

    #[test]
    fn same_seed_gives_same_field() {
        assert_eq!(field(9).stars(), field(9).stars());
    }
}
