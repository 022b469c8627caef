use std::f64::consts::{FRAC_PI_4, PI};

use rand::Rng;
use ratatui::style::Color;

use super::bullet::Bullet;
use crate::constants::{CANVAS_HEIGHT, ENEMY_MAX_INITIAL_COOLDOWN, ENEMY_MIN_INITIAL_COOLDOWN};
use crate::geometry::Vec2;

const SPREADER_SHOTS: usize = 5;
const SPINNER_SHOTS: usize = 2;
const SPINNER_STEP: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    Spreader,
    Spinner,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Basic, EnemyKind::Spreader, EnemyKind::Spinner];

    pub fn hit_points(&self) -> u32 {
        match self {
            EnemyKind::Basic => 2,
            EnemyKind::Spreader => 4,
            EnemyKind::Spinner => 3,
        }
    }

    /// Fall speed in units per tick
    pub fn speed(&self) -> f64 {
        match self {
            EnemyKind::Basic => 1.2,
            EnemyKind::Spreader => 1.0,
            EnemyKind::Spinner => 1.5,
        }
    }

    /// Hull colour; bullets share it
    pub fn color(&self) -> Color {
        match self {
            EnemyKind::Basic => Color::Rgb(0xFF, 0x41, 0x36),
            EnemyKind::Spreader => Color::Rgb(0xFF, 0xFF, 0x00),
            EnemyKind::Spinner => Color::Rgb(0xFF, 0x00, 0xFF),
        }
    }

    /// Ticks to wait after a volley
    pub fn fire_cooldown(&self) -> u32 {
        match self {
            EnemyKind::Basic => 60,
            EnemyKind::Spreader => 80,
            EnemyKind::Spinner => 20,
        }
    }

    pub fn bullet_speed(&self) -> f64 {
        match self {
            EnemyKind::Basic => 4.0,
            EnemyKind::Spreader => 3.5,
            EnemyKind::Spinner => 3.0,
        }
    }

    pub fn bullet_size(&self) -> f64 {
        match self {
            EnemyKind::Spinner => 4.0,
            EnemyKind::Basic | EnemyKind::Spreader => 5.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Spreader => "spreader",
            EnemyKind::Spinner => "spinner",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Color,
    pub speed: f64,
    pub kind: EnemyKind,
    pub hit_points: u32,
    pub shoot_cooldown: u32,
    /// Rotating aim used by spinners; never reset between volleys
    pub angle: f64,
}

impl Enemy {
    /// New enemy with a randomized first-shot delay so a wave doesn't fire in unison
    pub fn new(x: f64, y: f64, size: f64, kind: EnemyKind, rng: &mut impl Rng) -> Self {
        let shoot_cooldown =
            rng.random_range(ENEMY_MIN_INITIAL_COOLDOWN..ENEMY_MAX_INITIAL_COOLDOWN);
        Self::with_cooldown(x, y, size, kind, shoot_cooldown)
    }

    pub fn with_cooldown(x: f64, y: f64, size: f64, kind: EnemyKind, shoot_cooldown: u32) -> Self {
        Self {
            x,
            y,
            size,
            color: kind.color(),
            speed: kind.speed(),
            kind,
            hit_points: kind.hit_points(),
            shoot_cooldown,
            angle: 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Falls one step, then either fires a volley at `target` or counts the
    /// cooldown down. Returns the bullets fired this tick.
    pub fn update(&mut self, target: Vec2) -> Vec<Bullet> {
        self.y += self.speed;

        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
            return Vec::new();
        }

        let volley = match self.kind {
            EnemyKind::Basic => self.shoot_basic(target),
            EnemyKind::Spreader => self.shoot_spreader(target),
            EnemyKind::Spinner => self.shoot_spinner(),
        };
        self.shoot_cooldown = self.kind.fire_cooldown();
        volley
    }

    fn bullet_at_angle(&self, angle: f64) -> Bullet {
        Bullet::new(
            self.x,
            self.y,
            self.kind.bullet_size(),
            self.color,
            Vec2::from_angle(angle, self.kind.bullet_speed()),
        )
    }

    fn shoot_basic(&self, target: Vec2) -> Vec<Bullet> {
        vec![self.bullet_at_angle(self.position().angle_to(target))]
    }

    /// Fan of five shots spanning a quarter turn, centred on the target
    fn shoot_spreader(&self, target: Vec2) -> Vec<Bullet> {
        let aim = self.position().angle_to(target);
        let step = FRAC_PI_4 / (SPREADER_SHOTS - 1) as f64;
        (0..SPREADER_SHOTS)
            .map(|i| self.bullet_at_angle(aim - FRAC_PI_4 / 2.0 + i as f64 * step))
            .collect()
    }

    /// Two opposed shots; the pair rotates a little after every volley
    fn shoot_spinner(&mut self) -> Vec<Bullet> {
        let volley = (0..SPINNER_SHOTS)
            .map(|i| self.bullet_at_angle(self.angle + i as f64 * PI))
            .collect();
        self.angle += SPINNER_STEP;
        volley
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hit_points = self.hit_points.saturating_sub(amount);
    }

    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// True once the enemy has fallen a full body-length past the bottom edge
    pub fn is_off_screen(&self) -> bool {
        self.y > CANVAS_HEIGHT + self.size
    }
}
