//! Plane geometry shared by every entity. Coordinates are canvas units with
//! the origin at the top-left corner and y growing downwards.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit-length vector pointing along `angle` (radians), scaled by `speed`.
    pub fn from_angle(angle: f64, speed: f64) -> Self {
        Self {
            x: angle.cos() * speed,
            y: angle.sin() * speed,
        }
    }

    /// Angle of the ray from `self` towards `target`.
    pub fn angle_to(self, target: Vec2) -> f64 {
        (target.y - self.y).atan2(target.x - self.x)
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Two round bodies touch when the gap between their edges is under one unit.
pub fn touches(a: Vec2, radius_a: f64, b: Vec2, radius_b: f64) -> bool {
    distance(a, b) - radius_a - radius_b < 1.0
}
