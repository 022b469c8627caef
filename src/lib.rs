// Library exports for testing
pub use entities::{Bullet, Enemy, EnemyKind, KeyState, Particle, Player, Star};
pub use high_scores::{FileStore, HighScores, KeyValueStore, MemoryStore, StoreError};
pub use session::{Session, SessionEvent, SoundCue};
pub use stage::{Banner, Phase, STAGE_COUNT, STAGES, StageConfig};

pub mod app;
pub mod audio;
pub mod collision;
pub mod config;
pub mod constants;
pub mod entities;
pub mod geometry;
pub mod high_scores;
pub mod input;
pub mod logging;
pub mod renderer;
pub mod session;
pub mod spawn;
pub mod stage;
pub mod timers;
pub mod world;
