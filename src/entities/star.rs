use rand::Rng;

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Background star; falls forever and wraps back to the top
#[derive(Debug, Clone)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
}

impl Star {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            x: rng.random_range(0.0..CANVAS_WIDTH),
            y: rng.random_range(0.0..CANVAS_HEIGHT),
            size: rng.random_range(0.0..2.0),
            speed: rng.random_range(0.2..0.7),
        }
    }

    pub fn update(&mut self, rng: &mut impl Rng) {
        self.y += self.speed;
        if self.y > CANVAS_HEIGHT {
            self.y = 0.0;
            self.x = rng.random_range(0.0..CANVAS_WIDTH);
        }
    }

    /// Brightness in 0..1, bigger stars shine brighter
    pub fn brightness(&self) -> f64 {
        self.size / 2.0
    }
}

pub fn create_starfield(count: usize, rng: &mut impl Rng) -> Vec<Star> {
    (0..count).map(|_| Star::new(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_starfield_within_canvas() {
        let mut rng = StdRng::seed_from_u64(11);
        let stars = create_starfield(100, &mut rng);
        assert_eq!(stars.len(), 100);
        for star in &stars {
            assert!(star.x >= 0.0 && star.x < CANVAS_WIDTH);
            assert!(star.y >= 0.0 && star.y < CANVAS_HEIGHT);
            assert!(star.speed >= 0.2 && star.speed < 0.7);
        }
    }

    #[test]
    fn test_star_wraps_to_top() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut star = Star {
            x: 10.0,
            y: 799.9,
            size: 1.0,
            speed: 0.5,
        };
        star.update(&mut rng);
        assert_eq!(star.y, 0.0);
        assert!(star.x >= 0.0 && star.x < CANVAS_WIDTH);
    }
}
