use std::ops::Range;

use cgmath::{Vector2, vec2};
use rand::Rng;

use crate::config::{EdgeMode, FieldConfig};

/// Vertical offset below the bottom edge where respawned particles are
/// parked. The exit test leaves this apron in bounds so a freshly parked
/// particle is not immediately out again.
pub const RESPAWN_OFFSET: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vector2<f32>,
    pub velocity: Vector2<f32>,
    pub radius: f32,
    pub opacity: f32,
    pub fade_rate: f32,
    /// `+1.0` while brightening, `-1.0` while dimming.
    pub fade_dir: f32,
}

impl Particle {
    /// Randomizes a particle somewhere on the surface. Requires positive
    /// bounds; the field never spawns onto a zero-area surface.
    pub fn spawn(config: &FieldConfig, bounds: Vector2<f32>, rng: &mut impl Rng) -> Self {
        Self {
            position: vec2(rng.gen_range(0.0..bounds.x), rng.gen_range(0.0..bounds.y)),
            velocity: vec2(
                rng.gen_range(config.speed.clone()),
                rng.gen_range(config.speed.clone()) - config.upward_drift,
            ),
            radius: rng.gen_range(config.radius.clone()),
            opacity: rng.gen_range(config.opacity.clone()),
            fade_rate: rng.gen_range(config.fade_rate.clone()),
            fade_dir: if rng.gen_bool(0.5) { 1.0 } else { -1.0 },
        }
    }

    /// One tick of drift and twinkle, then the configured edge policy.
    /// `dt` is measured in 60 Hz frames, so `1.0` is one tick.
    pub fn advance(
        self,
        dt: f32,
        bounds: Vector2<f32>,
        config: &FieldConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let mut next = self;
        next.position += next.velocity * dt;
        (next.opacity, next.fade_dir) = fade_step(
            next.opacity,
            next.fade_rate * dt,
            next.fade_dir,
            &config.opacity,
        );

        match config.edge {
            EdgeMode::Wrap => {
                next.position.x = wrap(next.position.x, bounds.x);
                next.position.y = wrap(next.position.y, bounds.y);
                next
            }
            EdgeMode::Respawn if exits(next.position, bounds) => {
                let mut fresh = Self::spawn(config, bounds, rng);
                fresh.position.y = bounds.y + RESPAWN_OFFSET;
                fresh
            }
            EdgeMode::Respawn => next,
        }
    }
}

/// Moves the opacity toward the current bound, clamping there and flipping
/// the direction on the tick the bound is reached.
fn fade_step(opacity: f32, step: f32, dir: f32, bounds: &Range<f32>) -> (f32, f32) {
    let next = opacity + step * dir;
    if next >= bounds.end {
        (bounds.end, -1.0)
    } else if next <= bounds.start {
        (bounds.start, 1.0)
    } else {
        (next, dir)
    }
}

fn wrap(coord: f32, extent: f32) -> f32 {
    if coord < 0.0 {
        coord + extent
    } else if coord >= extent {
        coord - extent
    } else {
        coord
    }
}

fn exits(position: Vector2<f32>, bounds: Vector2<f32>) -> bool {
    position.x < 0.0
        || position.x >= bounds.x
        || position.y < 0.0
        || position.y > bounds.y + RESPAWN_OFFSET
}
