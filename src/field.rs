use cgmath::{Vector2, vec2};
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{FieldConfig, ResizeMode};
use crate::particle::Particle;
use crate::scene::Scene;

/// The whole particle field for one surface: the collection, the cached
/// surface dimensions, the visibility flag and the RNG that feeds spawns.
pub struct ParticleField {
    config: FieldConfig,
    bounds: Vector2<f32>,
    particles: Vec<Particle>,
    rng: StdRng,
    visible: bool,
}

impl ParticleField {
    pub fn new(config: FieldConfig, width: f32, height: f32) -> Self {
        Self::with_rng(config, width, height, StdRng::from_entropy())
    }

    /// Deterministic construction for tests and reproducible runs.
    pub fn with_seed(config: FieldConfig, width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(config, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: FieldConfig, width: f32, height: f32, mut rng: StdRng) -> Self {
        let bounds = vec2(width.max(0.0), height.max(0.0));
        let count = config.particle_count(bounds.x, bounds.y);
        let particles = (0..count)
            .map(|_| Particle::spawn(&config, bounds, &mut rng))
            .collect();
        debug!(
            "field created: {count} particles over {:.0}x{:.0}",
            bounds.x, bounds.y
        );
        Self {
            config,
            bounds,
            particles,
            rng,
            visible: true,
        }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn bounds(&self) -> Vector2<f32> {
        self.bounds
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Suspends or resumes the simulation. While suspended, `advance` is a
    /// no-op, so the host can keep calling it without the field moving.
    pub fn set_visible(&mut self, visible: bool) {
        if visible != self.visible {
            debug!("field {}", if visible { "resumed" } else { "suspended" });
        }
        self.visible = visible;
    }

    /// Advances every particle by `dt` ticks (`1.0` = one 60 Hz frame).
    pub fn advance(&mut self, dt: f32) {
        if !self.visible {
            return;
        }
        let bounds = self.bounds;
        for i in 0..self.particles.len() {
            self.particles[i] =
                self.particles[i].advance(dt, bounds, &self.config, &mut self.rng);
        }
    }

    /// Applies new surface dimensions and restores the density invariant
    /// under the configured resize policy.
    pub fn resize(&mut self, width: f32, height: f32) {
        let bounds = vec2(width.max(0.0), height.max(0.0));
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        let target = self.config.particle_count(bounds.x, bounds.y);

        match self.config.resize {
            ResizeMode::Rebuild => {
                self.particles.clear();
                self.particles
                    .extend((0..target).map(|_| Particle::spawn(&self.config, bounds, &mut self.rng)));
            }
            ResizeMode::Retain => {
                if target <= self.particles.len() {
                    self.particles.truncate(target);
                } else {
                    let deficit = target - self.particles.len();
                    self.particles
                        .extend((0..deficit).map(|_| Particle::spawn(&self.config, bounds, &mut self.rng)));
                }
            }
        }
        debug!(
            "field resized to {:.0}x{:.0}, {} particles",
            bounds.x,
            bounds.y,
            self.particles.len()
        );
    }

    /// The draw list for the current tick.
    pub fn scene(&self) -> Scene {
        Scene::build(&self.config, &self.particles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EdgeMode, ResizeMode};

    #[test]
    fn initial_count_follows_the_density_invariant() {
        let field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 1);
        assert_eq!(field.len(), 16);
    }

    #[test]
    fn zero_area_yields_an_empty_field_and_scene() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 0.0, 0.0, 1);
        assert!(field.is_empty());
        field.advance(1.0);
        let scene = field.scene();
        assert!(scene.dots.is_empty());
        assert!(scene.links.is_empty());
    }

    #[test]
    fn suspended_field_does_not_move() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 2);
        let before = field.particles().to_vec();

        field.set_visible(false);
        for _ in 0..3 {
            field.advance(1.0);
        }
        assert_eq!(field.particles(), &before[..]);

        field.set_visible(true);
        field.advance(1.0);
        assert_ne!(field.particles(), &before[..]);
    }

    #[test]
    fn retain_resize_keeps_survivors_and_tops_up() {
        let mut config = FieldConfig::default();
        config.resize = ResizeMode::Retain;
        let mut field = ParticleField::with_seed(config, 800.0, 600.0, 3);
        let before = field.particles().to_vec();
        assert_eq!(before.len(), 16);

        field.resize(1600.0, 1200.0);
        assert_eq!(field.len(), 50);
        assert_eq!(&field.particles()[..16], &before[..]);

        field.resize(800.0, 600.0);
        assert_eq!(field.len(), 16);
    }

    #[test]
    fn rebuild_resize_respawns_the_whole_collection() {
        let mut config = FieldConfig::default();
        config.resize = ResizeMode::Rebuild;
        let mut field = ParticleField::with_seed(config, 800.0, 600.0, 4);
        let before = field.particles().to_vec();

        field.resize(900.0, 600.0);
        assert_eq!(field.len(), 18);
        assert_ne!(&field.particles()[..16], &before[..]);
    }

    #[test]
    fn resize_to_zero_area_empties_the_field() {
        let mut field = ParticleField::with_seed(FieldConfig::default(), 800.0, 600.0, 5);
        field.resize(0.0, 600.0);
        assert!(field.is_empty());
        assert!(field.scene().dots.is_empty());
    }

    #[test]
    fn wrapped_particles_stay_inside_the_surface() {
        let mut config = FieldConfig::default();
        config.edge = EdgeMode::Wrap;
        let mut field = ParticleField::with_seed(config, 400.0, 300.0, 6);
        for _ in 0..5_000 {
            field.advance(1.0);
        }
        for p in field.particles() {
            assert!(p.position.x >= 0.0 && p.position.x < 400.0);
            assert!(p.position.y >= 0.0 && p.position.y < 300.0);
        }
    }
}
