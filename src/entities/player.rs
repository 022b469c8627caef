use ratatui::style::Color;

use super::bullet::Bullet;
use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, PLAYER_BULLET_COLOR, PLAYER_BULLET_SIZE, PLAYER_BULLET_SPEED,
    PLAYER_COLOR, PLAYER_FIRE_COOLDOWN, PLAYER_INVINCIBLE_TICKS, PLAYER_SIZE, PLAYER_SPEED,
};
use crate::geometry::Vec2;

/// Keys currently held down, as seen by the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Color,
    pub speed: f64,
    pub shoot_cooldown: u32,
    pub invincible: bool,
    pub invincible_timer: u32,
}

impl Player {
    /// A fresh ship starts inside its invincibility window
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            size: PLAYER_SIZE,
            color: PLAYER_COLOR,
            speed: PLAYER_SPEED,
            shoot_cooldown: 0,
            invincible: true,
            invincible_timer: PLAYER_INVINCIBLE_TICKS,
        }
    }

    /// Ship placed at the bottom-centre of the canvas
    pub fn spawn() -> Self {
        Self::new(
            CANVAS_WIDTH / 2.0,
            CANVAS_HEIGHT - crate::constants::PLAYER_START_OFFSET_Y,
        )
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn radius(&self) -> f64 {
        self.size / 2.0
    }

    /// Advances one tick: move, clamp to the canvas, fire if allowed and
    /// count down the timers. Returns the bullet fired this tick, if any.
    pub fn update(&mut self, keys: &KeyState) -> Option<Bullet> {
        if keys.up {
            self.y -= self.speed;
        }
        if keys.down {
            self.y += self.speed;
        }
        if keys.left {
            self.x -= self.speed;
        }
        if keys.right {
            self.x += self.speed;
        }
        self.clamp_to_canvas();

        let mut fired = None;
        if keys.fire && self.shoot_cooldown == 0 {
            fired = Some(self.shoot());
            self.shoot_cooldown = PLAYER_FIRE_COOLDOWN;
        }
        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }

        if self.invincible_timer > 0 {
            self.invincible_timer -= 1;
        } else {
            self.invincible = false;
        }

        fired
    }

    fn clamp_to_canvas(&mut self) {
        let r = self.radius();
        self.x = self.x.clamp(r, CANVAS_WIDTH - r);
        self.y = self.y.clamp(r, CANVAS_HEIGHT - r);
    }

    /// Bullet leaving the ship's nose, straight up
    fn shoot(&self) -> Bullet {
        Bullet::new(
            self.x,
            self.y - self.size / 2.0,
            PLAYER_BULLET_SIZE,
            PLAYER_BULLET_COLOR,
            Vec2::new(0.0, -PLAYER_BULLET_SPEED),
        )
    }

    pub fn grant_invincibility(&mut self) {
        self.invincible = true;
        self.invincible_timer = PLAYER_INVINCIBLE_TICKS;
    }

    /// The ship blinks while invincible, hidden on alternating 10-tick spans
    pub fn is_visible(&self) -> bool {
        !(self.invincible && (self.invincible_timer / 10) % 2 == 0)
    }
}
