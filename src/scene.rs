use cgmath::{InnerSpace, Vector2};

use crate::config::FieldConfig;
use crate::particle::Particle;

/// One filled circle in the accent color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: Vector2<f32>,
    pub radius: f32,
    pub opacity: f32,
    pub color: [u8; 3],
}

/// A connective line between two nearby particles, faded with distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vector2<f32>,
    pub to: Vector2<f32>,
    pub opacity: f32,
    pub width: f32,
    pub color: [u8; 3],
}

/// The draw list for one tick. Hosts map dots first, then links, onto
/// whatever painting API they own.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub dots: Vec<Dot>,
    pub links: Vec<Link>,
}

impl Scene {
    pub(crate) fn build(config: &FieldConfig, particles: &[Particle]) -> Self {
        let dots = particles
            .iter()
            .map(|p| Dot {
                center: p.position,
                radius: p.radius,
                opacity: p.opacity,
                color: config.color,
            })
            .collect();

        let links = match &config.links {
            Some(link) => {
                // O(n^2) over unordered pairs; the particle cap keeps n small.
                let max_sq = link.max_distance * link.max_distance;
                let mut links = Vec::new();
                for (i, a) in particles.iter().enumerate() {
                    for b in &particles[i + 1..] {
                        let dist_sq = (a.position - b.position).magnitude2();
                        if dist_sq < max_sq {
                            let distance = dist_sq.sqrt();
                            links.push(Link {
                                from: a.position,
                                to: b.position,
                                opacity: link.base_opacity
                                    * (1.0 - distance / link.max_distance),
                                width: link.width,
                                color: link.color,
                            });
                        }
                    }
                }
                links
            }
            None => Vec::new(),
        };

        Self { dots, links }
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty() && self.links.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cgmath::vec2;

    use super::*;
    use crate::config::FieldConfig;

    fn particle_at(x: f32, y: f32) -> Particle {
        Particle {
            position: vec2(x, y),
            velocity: vec2(0.0, 0.0),
            radius: 1.5,
            opacity: 0.4,
            fade_rate: 0.003,
            fade_dir: 1.0,
        }
    }

    #[test]
    fn dots_carry_particle_state_and_accent_color() {
        let config = FieldConfig::default();
        let scene = Scene::build(&config, &[particle_at(10.0, 20.0)]);
        assert_eq!(scene.dots.len(), 1);
        assert_eq!(scene.dots[0].center, vec2(10.0, 20.0));
        assert_relative_eq!(scene.dots[0].radius, 1.5);
        assert_relative_eq!(scene.dots[0].opacity, 0.4);
        assert_eq!(scene.dots[0].color, config.color);
    }

    #[test]
    fn link_opacity_fades_with_distance() {
        let config = FieldConfig::default();
        let particles = [particle_at(100.0, 100.0), particle_at(175.0, 100.0)];
        let scene = Scene::build(&config, &particles);
        assert_eq!(scene.links.len(), 1);
        assert_relative_eq!(scene.links[0].opacity, 0.025, epsilon = 1e-6);
    }

    #[test]
    fn distant_pairs_are_not_linked() {
        let config = FieldConfig::default();
        let particles = [particle_at(0.0, 0.0), particle_at(200.0, 0.0)];
        let scene = Scene::build(&config, &particles);
        assert!(scene.links.is_empty());
    }

    #[test]
    fn every_close_pair_is_linked_once() {
        let config = FieldConfig::default();
        let particles = [
            particle_at(0.0, 0.0),
            particle_at(50.0, 0.0),
            particle_at(100.0, 0.0),
        ];
        let scene = Scene::build(&config, &particles);
        assert_eq!(scene.links.len(), 3);
    }

    #[test]
    fn links_are_skipped_when_disabled() {
        let mut config = FieldConfig::default();
        config.links = None;
        let particles = [particle_at(0.0, 0.0), particle_at(10.0, 0.0)];
        let scene = Scene::build(&config, &particles);
        assert!(scene.links.is_empty());
        assert_eq!(scene.dots.len(), 2);
    }
}
