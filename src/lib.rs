//! Ambient 2D particle field: slow-drifting, twinkling dots with optional
//! connective lines between nearby pairs. The simulation is pure data and
//! carries no rendering dependency; a host drives [`ParticleField::advance`]
//! once per frame and maps the resulting [`Scene`] onto its painting API.

mod config;
mod field;
mod particle;
mod scene;

pub use config::{EdgeMode, FieldConfig, GOLD, LinkConfig, ResizeMode};
pub use field::ParticleField;
pub use particle::{Particle, RESPAWN_OFFSET};
pub use scene::{Dot, Link, Scene};
