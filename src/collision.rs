//! Pairwise hit tests between the player, enemies and both bullet lists.

use rand::Rng;

use crate::constants::{IMPACT_PARTICLE_COUNT, PARTICLE_COUNT};
use crate::entities::{EnemyKind, create_explosion};
use crate::geometry::touches;
use crate::stage::StageConfig;
use crate::world::{Removals, World};

/// What one collision pass changed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollisionReport {
    pub player_hit: bool,
    /// Bullet impacts that did not kill
    pub enemies_damaged: usize,
    pub kills: Vec<EnemyKind>,
    pub points: u32,
}

/// Runs both checks for one tick. Does nothing while the player is
/// invincible. Hit bullets and killed enemies are queued in `removals`; the
/// lists themselves are left untouched so indices stay valid for the pass.
pub fn check_collisions(
    world: &mut World,
    stage: &StageConfig,
    removals: &mut Removals,
    rng: &mut impl Rng,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    if world.player.invincible {
        return report;
    }

    report.player_hit = check_player_hit(world, rng);
    check_bullets_hit_enemies(world, stage, removals, rng, &mut report);
    report
}

/// Player against every enemy bullet and every enemy. Every touching pair
/// adds an explosion; all pairs are checked even after the first hit.
fn check_player_hit(world: &mut World, rng: &mut impl Rng) -> bool {
    let World {
        player,
        enemies,
        enemy_bullets,
        particles,
        ..
    } = world;

    let center = player.position();
    let radius = player.radius();
    let hazards = enemy_bullets
        .iter()
        .map(|b| (b.position(), b.size / 2.0))
        .chain(enemies.iter().map(|e| (e.position(), e.radius())));

    let mut hit = false;
    for (position, hazard_radius) in hazards {
        if touches(center, radius, position, hazard_radius) {
            hit = true;
            particles.extend(create_explosion(
                player.x,
                player.y,
                player.color,
                PARTICLE_COUNT,
                rng,
            ));
        }
    }
    hit
}

/// Each player bullet damages at most the first live enemy it touches
fn check_bullets_hit_enemies(
    world: &mut World,
    stage: &StageConfig,
    removals: &mut Removals,
    rng: &mut impl Rng,
    report: &mut CollisionReport,
) {
    let World {
        enemies,
        player_bullets,
        particles,
        ..
    } = world;

    for (b_idx, bullet) in player_bullets.iter().enumerate() {
        for (e_idx, enemy) in enemies.iter_mut().enumerate() {
            if !enemy.is_alive() {
                continue;
            }
            if !touches(bullet.position(), bullet.size, enemy.position(), enemy.radius()) {
                continue;
            }

            particles.extend(create_explosion(
                bullet.x,
                bullet.y,
                bullet.color,
                IMPACT_PARTICLE_COUNT,
                rng,
            ));
            removals.player_bullets.push(b_idx);
            enemy.take_damage(1);

            if enemy.is_alive() {
                report.enemies_damaged += 1;
            } else {
                report.points += stage.kill_score(enemy.kind);
                report.kills.push(enemy.kind);
                particles.extend(create_explosion(
                    enemy.x,
                    enemy.y,
                    enemy.color,
                    PARTICLE_COUNT,
                    rng,
                ));
                removals.enemies.push(e_idx);
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Bullet, Enemy};
    use crate::geometry::Vec2;
    use crate::stage::STAGES;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use ratatui::style::Color;

    fn setup() -> (World, StdRng) {
        let mut rng = StdRng::seed_from_u64(5);
        let mut world = World::new(&mut rng);
        world.player.invincible = false;
        world.player.x = 300.0;
        world.player.y = 700.0;
        (world, rng)
    }

    fn player_bullet(x: f64, y: f64) -> Bullet {
        Bullet::new(x, y, 5.0, Color::Cyan, Vec2::new(0.0, -8.0))
    }

    fn enemy(x: f64, y: f64, kind: EnemyKind) -> Enemy {
        Enemy::with_cooldown(x, y, 30.0, kind, 100)
    }

    #[test]
    fn test_enemy_bullet_hits_player_at_threshold() {
        let (mut world, mut rng) = setup();
        // player radius 10 + bullet half-size 2.5 -> hit below 13.5
        world
            .enemy_bullets
            .push(Bullet::new(313.4, 700.0, 5.0, Color::Red, Vec2::default()));
        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[0], &mut removals, &mut rng);
        assert!(report.player_hit);
        assert_eq!(world.particles.len(), 30);
    }

    #[test]
    fn test_enemy_bullet_misses_just_outside() {
        let (mut world, mut rng) = setup();
        world
            .enemy_bullets
            .push(Bullet::new(313.5, 700.0, 5.0, Color::Red, Vec2::default()));
        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[0], &mut removals, &mut rng);
        assert!(!report.player_hit);
        assert!(world.particles.is_empty());
    }

    #[test]
    fn test_enemy_body_hits_player() {
        let (mut world, mut rng) = setup();
        world.enemies.push(enemy(300.0, 680.0, EnemyKind::Basic));
        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[0], &mut removals, &mut rng);
        assert!(report.player_hit);
    }

    #[test]
    fn test_invincible_player_skips_all_checks() {
        let (mut world, mut rng) = setup();
        world.player.invincible = true;
        world.enemies.push(enemy(300.0, 700.0, EnemyKind::Basic));
        world.player_bullets.push(player_bullet(300.0, 700.0));

        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[0], &mut removals, &mut rng);
        assert_eq!(report, CollisionReport::default());
        assert!(removals.is_empty());
        assert_eq!(world.enemies[0].hit_points, 2);
    }

    #[test]
    fn test_bullet_damages_then_kills() {
        let (mut world, mut rng) = setup();
        world.enemies.push(enemy(100.0, 100.0, EnemyKind::Basic));
        world.player_bullets.push(player_bullet(100.0, 120.0));

        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[0], &mut removals, &mut rng);
        assert_eq!(report.enemies_damaged, 1);
        assert!(report.kills.is_empty());
        assert_eq!(removals.player_bullets, vec![0]);
        assert!(removals.enemies.is_empty());
        assert_eq!(world.particles.len(), 5);
        world.apply_removals(removals);

        world.player_bullets.push(player_bullet(100.0, 120.0));
        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[0], &mut removals, &mut rng);
        assert_eq!(report.kills, vec![EnemyKind::Basic]);
        assert_eq!(report.points, 100);
        assert_eq!(removals.enemies, vec![0]);
        assert_eq!(world.particles.len(), 5 + 5 + 30);
    }

    #[test]
    fn test_kill_award_uses_stage_rank() {
        let (mut world, mut rng) = setup();
        world.enemies.push(enemy(100.0, 100.0, EnemyKind::Spreader));
        world.enemies[0].hit_points = 1;
        world.enemies.push(enemy(400.0, 100.0, EnemyKind::Basic));
        world.enemies[1].hit_points = 1;
        world.player_bullets.push(player_bullet(100.0, 100.0));
        world.player_bullets.push(player_bullet(400.0, 100.0));

        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[1], &mut removals, &mut rng);
        assert_eq!(report.points, 200 + 100);
        assert_eq!(report.kills.len(), 2);
    }

    #[test]
    fn test_bullet_only_hits_first_overlapping_enemy() {
        let (mut world, mut rng) = setup();
        world.enemies.push(enemy(100.0, 100.0, EnemyKind::Spreader));
        world.enemies.push(enemy(105.0, 100.0, EnemyKind::Spreader));
        world.player_bullets.push(player_bullet(102.0, 100.0));

        let mut removals = Removals::default();
        check_collisions(&mut world, &STAGES[1], &mut removals, &mut rng);
        assert_eq!(world.enemies[0].hit_points, 3);
        assert_eq!(world.enemies[1].hit_points, 4);
    }

    #[test]
    fn test_enemy_killed_earlier_in_pass_is_not_hit_again() {
        let (mut world, mut rng) = setup();
        world.enemies.push(enemy(100.0, 100.0, EnemyKind::Basic));
        world.enemies[0].hit_points = 1;
        world.player_bullets.push(player_bullet(100.0, 100.0));
        world.player_bullets.push(player_bullet(101.0, 100.0));

        let mut removals = Removals::default();
        let report = check_collisions(&mut world, &STAGES[0], &mut removals, &mut rng);
        assert_eq!(report.points, 100);
        // second bullet flies on
        assert_eq!(removals.player_bullets, vec![0]);
        assert_eq!(removals.enemies, vec![0]);
    }
}
