//! Entity collections and their per-tick update passes.
//!
//! Nothing is removed while a list is being walked. Passes queue indices in
//! [`Removals`] and [`World::apply_removals`] compacts the lists once the
//! tick is over.

use rand::Rng;

use crate::constants::STAR_COUNT;
use crate::entities::{Bullet, Enemy, KeyState, Particle, Player, Star, create_starfield};

/// Indices queued for removal at the end of the current tick
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Removals {
    pub enemies: Vec<usize>,
    pub player_bullets: Vec<usize>,
    pub enemy_bullets: Vec<usize>,
    pub particles: Vec<usize>,
}

impl Removals {
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
            && self.player_bullets.is_empty()
            && self.enemy_bullets.is_empty()
            && self.particles.is_empty()
    }
}

/// Every live entity on the playfield
#[derive(Debug, Clone)]
pub struct World {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    pub stars: Vec<Star>,
}

impl World {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            player: Player::spawn(),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            particles: Vec::new(),
            stars: create_starfield(STAR_COUNT, rng),
        }
    }

    pub fn update_stars(&mut self, rng: &mut impl Rng) {
        for star in &mut self.stars {
            star.update(rng);
        }
    }

    pub fn update_player(&mut self, keys: &KeyState) -> bool {
        let fired = self.player.update(keys);
        let did_fire = fired.is_some();
        self.player_bullets.extend(fired);
        did_fire
    }

    pub fn update_particles(&mut self, removals: &mut Removals) {
        for (idx, particle) in self.particles.iter_mut().enumerate() {
            particle.update();
            if particle.is_faded() {
                removals.particles.push(idx);
            }
        }
    }

    /// Moves every enemy and collects the volleys they fire at the player
    pub fn update_enemies(&mut self, removals: &mut Removals) {
        let target = self.player.position();
        for (idx, enemy) in self.enemies.iter_mut().enumerate() {
            self.enemy_bullets.extend(enemy.update(target));
            if enemy.is_off_screen() {
                removals.enemies.push(idx);
            }
        }
    }

    pub fn update_enemy_bullets(&mut self, removals: &mut Removals) {
        update_bullets(&mut self.enemy_bullets, &mut removals.enemy_bullets);
    }

    pub fn update_player_bullets(&mut self, removals: &mut Removals) {
        update_bullets(&mut self.player_bullets, &mut removals.player_bullets);
    }

    /// Drops every queued index. Indices refer to positions at the start of
    /// the tick, so each list is compacted back to front.
    pub fn apply_removals(&mut self, removals: Removals) {
        remove_indices(&mut self.enemies, removals.enemies);
        remove_indices(&mut self.player_bullets, removals.player_bullets);
        remove_indices(&mut self.enemy_bullets, removals.enemy_bullets);
        remove_indices(&mut self.particles, removals.particles);
    }
}

fn update_bullets(bullets: &mut [Bullet], removed: &mut Vec<usize>) {
    for (idx, bullet) in bullets.iter_mut().enumerate() {
        bullet.update();
        if bullet.is_off_screen() {
            removed.push(idx);
        }
    }
}

fn remove_indices<T>(items: &mut Vec<T>, mut indices: Vec<usize>) {
    // Remove in reverse order to avoid index issues
    indices.sort_unstable();
    indices.reverse();
    indices.dedup();
    for idx in indices {
        if idx < items.len() {
            items.remove(idx);
        }
    }
}
