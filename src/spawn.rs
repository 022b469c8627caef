//! Timer-driven enemy creation.

use rand::Rng;
use tracing::trace;

use crate::constants::{CANVAS_WIDTH, ENEMY_MAX_SIZE, ENEMY_MIN_SIZE};
use crate::entities::Enemy;
use crate::session::SessionEvent;
use crate::stage::StageConfig;
use crate::timers::{Scheduler, TimerId};

/// Owns the single outstanding spawn timer
#[derive(Debug, Default)]
pub struct SpawnManager {
    timer: Option<TimerId>,
}

impl SpawnManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules the next spawn one stage interval from now, replacing any
    /// timer still pending.
    pub fn arm(&mut self, scheduler: &mut Scheduler<SessionEvent>, stage: &StageConfig) {
        self.cancel(scheduler);
        self.timer = Some(scheduler.schedule(stage.spawn_interval, SessionEvent::Spawn));
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler<SessionEvent>) {
        if let Some(id) = self.timer.take() {
            scheduler.cancel(id);
        }
    }

    /// Called when the spawn timer has fired and was not re-armed
    pub fn disarm(&mut self) {
        self.timer = None;
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }
}

/// A random enemy from the stage roster, just above the top edge
pub fn spawn_enemy(stage: &StageConfig, rng: &mut impl Rng) -> Enemy {
    let kind = stage.enemy_kinds[rng.random_range(0..stage.enemy_kinds.len())];
    let size = rng.random_range(ENEMY_MIN_SIZE..ENEMY_MAX_SIZE);
    let x = rng.random_range(0.0..CANVAS_WIDTH - size) + size / 2.0;
    trace!(kind = kind.name(), x, size, "Spawning enemy");
    Enemy::new(x, -size, size, kind, rng)
}
