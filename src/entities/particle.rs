use std::f64::consts::TAU;

use rand::Rng;
use ratatui::style::Color;

use crate::constants::PARTICLE_FADE;
use crate::geometry::Vec2;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Color,
    pub velocity: Vec2,
    /// Opacity, 1.0 when spawned
    pub alpha: f64,
}

impl Particle {
    pub fn new(x: f64, y: f64, size: f64, color: Color, velocity: Vec2) -> Self {
        Self {
            x,
            y,
            size,
            color,
            velocity,
            alpha: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.x += self.velocity.x;
        self.y += self.velocity.y;
        self.alpha -= PARTICLE_FADE;
    }

    pub fn is_faded(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Burst of `count` particles flying out from (x, y) in random directions
pub fn create_explosion(
    x: f64,
    y: f64,
    color: Color,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..TAU);
            let speed = rng.random_range(1.0..6.0);
            let size = rng.random_range(1.0..4.0);
            Particle::new(x, y, size, color, Vec2::from_angle(angle, speed))
        })
        .collect()
}
