//! The fixed stage table and the phases a session moves through.

use std::time::Duration;

use crate::constants::STAGE_CLEAR_TEXT;
use crate::entities::EnemyKind;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageConfig {
    /// Length of the stage in playing ticks
    pub duration: u64,
    pub enemy_kinds: &'static [EnemyKind],
    pub spawn_interval: Duration,
    pub name: &'static str,
}

impl StageConfig {
    /// Kill bonus for `kind`: 100 per rank in this stage's roster (first = 100).
    /// Kinds missing from the roster are worth nothing.
    pub fn kill_score(&self, kind: EnemyKind) -> u32 {
        self.enemy_kinds
            .iter()
            .position(|k| *k == kind)
            .map_or(0, |rank| {
                crate::constants::ENEMY_DESTROY_SCORE * (rank as u32 + 1)
            })
    }
}

pub const STAGES: [StageConfig; 3] = [
    StageConfig {
        duration: 1200,
        enemy_kinds: &[EnemyKind::Basic],
        spawn_interval: Duration::from_millis(1300),
        name: "Stage 1: First Contact",
    },
    StageConfig {
        duration: 1800,
        enemy_kinds: &[EnemyKind::Basic, EnemyKind::Spreader],
        spawn_interval: Duration::from_millis(1000),
        name: "Stage 2: Spreading Swarm",
    },
    StageConfig {
        duration: 2400,
        enemy_kinds: &[EnemyKind::Basic, EnemyKind::Spreader, EnemyKind::Spinner],
        spawn_interval: Duration::from_millis(700),
        name: "Stage 3: Chaos Vortex",
    },
];

pub const STAGE_COUNT: usize = STAGES.len();

/// Text shown while the game is between stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    /// Stage name shown before play resumes
    Intro(usize),
    StageClear,
}

impl Banner {
    pub fn text(&self) -> &'static str {
        match self {
            Banner::Intro(stage) => STAGES[*stage].name,
            Banner::StageClear => STAGE_CLEAR_TEXT,
        }
    }
}

/// Exactly one phase governs what a tick does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    StageSelect,
    /// Entities are drawn but frozen
    Transition(Banner),
    Playing,
    GameOver,
    Won,
}

impl Phase {
    /// Session finished, waiting to go back to the stage select
    pub fn is_finished(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_table() {
        assert_eq!(STAGE_COUNT, 3);
        assert_eq!(STAGES[0].duration, 1200);
        assert_eq!(STAGES[1].duration, 1800);
        assert_eq!(STAGES[2].duration, 2400);
        assert_eq!(STAGES[2].spawn_interval, Duration::from_millis(700));
    }

    #[test]
    fn test_kill_score_by_rank() {
        let stage_two = &STAGES[1];
        assert_eq!(stage_two.kill_score(EnemyKind::Basic), 100);
        assert_eq!(stage_two.kill_score(EnemyKind::Spreader), 200);
        assert_eq!(stage_two.kill_score(EnemyKind::Spinner), 0);

        assert_eq!(STAGES[2].kill_score(EnemyKind::Spinner), 300);
    }

    #[test]
    fn test_banner_text() {
        assert_eq!(Banner::Intro(0).text(), "Stage 1: First Contact");
        assert_eq!(Banner::StageClear.text(), "STAGE CLEAR");
    }

    #[test]
    fn test_phase_predicates() {
        assert!(!Phase::Transition(Banner::StageClear).is_finished());
        assert!(!Phase::Playing.is_finished());
        assert!(Phase::GameOver.is_finished());
        assert!(Phase::Won.is_finished());
        assert!(!Phase::StageSelect.is_finished());
    }
}
