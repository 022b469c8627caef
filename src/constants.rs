//! Tuning values for the simulation. Speeds are in canvas units per tick.

use std::time::Duration;

use ratatui::style::Color;

// Canvas
pub const CANVAS_WIDTH: f64 = 600.0;
pub const CANVAS_HEIGHT: f64 = 800.0;

/// One simulation tick at 60Hz.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / 60);

// Player
pub const PLAYER_SIZE: f64 = 20.0;
pub const PLAYER_SPEED: f64 = 5.0;
pub const PLAYER_COLOR: Color = Color::Rgb(0x00, 0xFF, 0xFF);
pub const PLAYER_START_OFFSET_Y: f64 = 50.0;
pub const PLAYER_FIRE_COOLDOWN: u32 = 10;
pub const PLAYER_INVINCIBLE_TICKS: u32 = 180;
pub const PLAYER_BULLET_SIZE: f64 = 5.0;
pub const PLAYER_BULLET_SPEED: f64 = 8.0;
pub const PLAYER_BULLET_COLOR: Color = Color::Rgb(0x00, 0xFF, 0xFF);

// Enemies
pub const ENEMY_MIN_SIZE: f64 = 25.0;
pub const ENEMY_MAX_SIZE: f64 = 35.0;
pub const ENEMY_MIN_INITIAL_COOLDOWN: u32 = 50;
pub const ENEMY_MAX_INITIAL_COOLDOWN: u32 = 100;
pub const ENEMY_DESTROY_SCORE: u32 = 100;

// Effects
pub const PARTICLE_COUNT: usize = 30;
pub const IMPACT_PARTICLE_COUNT: usize = 5;
pub const PARTICLE_FADE: f64 = 0.02;
pub const STAR_COUNT: usize = 100;

// Stage flow
pub const INTRO_DELAY: Duration = Duration::from_millis(2500);
pub const STAGE_CLEAR_DELAY: Duration = Duration::from_millis(3000);
pub const STAGE_CLEAR_TEXT: &str = "STAGE CLEAR";

// Persistence
pub const HIGH_SCORE_KEY: &str = "geometricBarrageHighScores";
