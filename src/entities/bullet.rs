use ratatui::style::Color;

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::geometry::Vec2;

/// A round projectile; `size` is its radius.
#[derive(Debug, Clone)]
pub struct Bullet {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Color,
    pub velocity: Vec2,
}

impl Bullet {
    pub fn new(x: f64, y: f64, size: f64, color: Color, velocity: Vec2) -> Self {
        Self {
            x,
            y,
            size,
            color,
            velocity,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn update(&mut self) {
        self.x += self.velocity.x;
        self.y += self.velocity.y;
    }

    /// True once the whole bullet has left the canvas on any side
    pub fn is_off_screen(&self) -> bool {
        self.x + self.size < 0.0
            || self.x - self.size > CANVAS_WIDTH
            || self.y + self.size < 0.0
            || self.y - self.size > CANVAS_HEIGHT
    }
}
