//! One play session: the frame driver and the stage state machine.
//!
//! A [`Session`] owns every piece of mutable game state. The terminal shell
//! feeds it the held keys and calls [`Session::tick`] once per fixed
//! timestep; rendering only reads from it.

use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::collision::check_collisions;
use crate::constants::{INTRO_DELAY, STAGE_CLEAR_DELAY, TICK_DURATION};
use crate::entities::KeyState;
use crate::high_scores::{HighScores, KeyValueStore};
use crate::spawn::{SpawnManager, spawn_enemy};
use crate::stage::{Banner, Phase, STAGE_COUNT, STAGES, StageConfig};
use crate::timers::Scheduler;
use crate::world::{Removals, World};

/// Deferred events delivered by the session's scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Spawn,
    IntroFinished { stage: usize },
    AdvanceStage { next: usize },
}

/// Things worth a sound effect, drained by the shell after each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    PlayerShot,
    EnemyHit,
    EnemyDestroyed,
    PlayerDestroyed,
    StageClear,
}

/// One game from stage select to the end screen, advanced a tick at a time
pub struct Session {
    phase: Phase,
    world: World,
    /// Total score; +1 per playing tick plus kill bonuses
    score: u32,
    frame: u64,
    stage_frame: u64,
    stage_index: usize,
    score_at_stage_start: u32,
    high_scores: HighScores,
    scheduler: Scheduler<SessionEvent>,
    spawner: SpawnManager,
    keys: KeyState,
    rng: StdRng,
    cues: Vec<SoundCue>,
}

impl Session {
    /// A session parked on the stage select. High scores are read from
    /// `store` once, here.
    pub fn new(store: Box<dyn KeyValueStore>, mut rng: StdRng) -> Self {
        Self {
            phase: Phase::StageSelect,
            world: World::new(&mut rng),
            score: 0,
            frame: 0,
            stage_frame: 0,
            stage_index: 0,
            score_at_stage_start: 0,
            high_scores: HighScores::load(store, STAGE_COUNT),
            scheduler: Scheduler::new(),
            spawner: SpawnManager::new(),
            keys: KeyState::default(),
            rng,
            cues: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Points earned since the current stage began
    pub fn stage_score(&self) -> u32 {
        self.score.saturating_sub(self.score_at_stage_start)
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn stage_frame(&self) -> u64 {
        self.stage_frame
    }

    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    /// 1-based, for display
    pub fn stage_number(&self) -> usize {
        self.stage_index + 1
    }

    pub fn stage(&self) -> &'static StageConfig {
        &STAGES[self.stage_index]
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn banner_text(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Transition(banner) => Some(banner.text()),
            _ => None,
        }
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    pub fn set_keys(&mut self, keys: KeyState) {
        self.keys = keys;
    }

    pub fn drain_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    /// Fresh run starting at `stage_index`. Anything left over from a
    /// previous run, timers included, is discarded first.
    pub fn start_game(&mut self, stage_index: usize) {
        if stage_index >= STAGE_COUNT {
            warn!(stage_index, "Ignoring start request for unknown stage");
            return;
        }

        self.scheduler.cancel_all();
        self.spawner.disarm();
        self.score = 0;
        self.frame = 0;
        self.world = World::new(&mut self.rng);
        self.cues.clear();

        info!(stage = stage_index + 1, "Starting game");
        self.start_stage(stage_index);
    }

    pub fn return_to_stage_select(&mut self) {
        self.scheduler.cancel_all();
        self.spawner.disarm();
        self.phase = Phase::StageSelect;
    }

    fn start_stage(&mut self, stage_index: usize) {
        self.stage_index = stage_index;
        self.stage_frame = 0;
        self.score_at_stage_start = self.score;
        self.world.player.grant_invincibility();
        self.phase = Phase::Transition(Banner::Intro(stage_index));

        self.scheduler.schedule(
            INTRO_DELAY,
            SessionEvent::IntroFinished { stage: stage_index },
        );
        info!(stage = stage_index + 1, name = self.stage().name, "Stage intro");
    }

    /// Stage timer ran out. Only acts while playing, so a second call during
    /// the stage-clear banner is a no-op.
    fn end_stage(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }

        self.spawner.cancel(&mut self.scheduler);
        self.commit_stage_score();

        let next = self.stage_index + 1;
        if next >= STAGE_COUNT {
            self.win();
            return;
        }

        info!(stage = self.stage_number(), score = self.score, "Stage clear");
        self.phase = Phase::Transition(Banner::StageClear);
        self.cues.push(SoundCue::StageClear);
        self.scheduler
            .schedule(STAGE_CLEAR_DELAY, SessionEvent::AdvanceStage { next });
    }

    fn win(&mut self) {
        self.scheduler.cancel_all();
        self.spawner.disarm();
        self.phase = Phase::Won;
        self.cues.push(SoundCue::StageClear);
        info!(score = self.score, "All stages cleared");
    }

    fn game_over(&mut self) {
        self.scheduler.cancel_all();
        self.spawner.disarm();
        self.commit_stage_score();
        self.phase = Phase::GameOver;
        self.cues.push(SoundCue::PlayerDestroyed);
        info!(
            stage = self.stage_number(),
            score = self.score,
            frame = self.frame,
            "Game over"
        );
    }

    fn commit_stage_score(&mut self) {
        let stage_score = self.stage_score();
        self.high_scores.record(self.stage_index, stage_score);
    }

    fn handle_event(&mut self, event: SessionEvent) {
        debug!(?event, phase = ?self.phase, "Timer fired");
        match event {
            SessionEvent::Spawn => {
                self.spawner.disarm();
                // Suspended outside of play: the timer is simply not re-armed
                if self.phase != Phase::Playing {
                    return;
                }
                let stage = self.stage();
                let enemy = spawn_enemy(stage, &mut self.rng);
                self.world.enemies.push(enemy);
                self.spawner.arm(&mut self.scheduler, stage);
            }
            SessionEvent::IntroFinished { stage } => {
                if self.phase == Phase::Transition(Banner::Intro(stage)) {
                    self.phase = Phase::Playing;
                    let stage = self.stage();
                    self.spawner.arm(&mut self.scheduler, stage);
                }
            }
            SessionEvent::AdvanceStage { next } => {
                if self.phase == Phase::Transition(Banner::StageClear) {
                    self.start_stage(next);
                }
            }
        }
    }

    /// One fixed timestep. Timers due this tick fire first, then the
    /// starfield moves. Only while playing do counters advance, entities
    /// update (player, particles, enemies, enemy bullets, player bullets)
    /// and collisions run. Queued removals are applied last.
    pub fn tick(&mut self) {
        for event in self.scheduler.advance(TICK_DURATION) {
            self.handle_event(event);
        }

        self.world.update_stars(&mut self.rng);

        if self.phase != Phase::Playing {
            return;
        }

        self.frame += 1;
        self.score += 1;
        self.stage_frame += 1;

        let mut removals = Removals::default();
        if self.world.update_player(&self.keys) {
            self.cues.push(SoundCue::PlayerShot);
        }
        self.world.update_particles(&mut removals);
        self.world.update_enemies(&mut removals);
        self.world.update_enemy_bullets(&mut removals);
        self.world.update_player_bullets(&mut removals);

        let stage = self.stage();
        let report = check_collisions(&mut self.world, stage, &mut removals, &mut self.rng);
        self.score += report.points;
        for _ in 0..report.enemies_damaged {
            self.cues.push(SoundCue::EnemyHit);
        }
        for _ in &report.kills {
            self.cues.push(SoundCue::EnemyDestroyed);
        }

        if report.player_hit {
            self.game_over();
        } else if self.stage_frame >= stage.duration {
            self.end_stage();
        }

        self.world.apply_removals(removals);
    }
}
