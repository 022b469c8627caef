mod bullet;
mod enemy;
mod particle;
mod player;
mod star;

// Re-export all public types
pub use bullet::Bullet;
pub use enemy::{Enemy, EnemyKind};
pub use particle::{Particle, create_explosion};
pub use player::{KeyState, Player};
pub use star::{Star, create_starfield};
