//! Combat resolution
//!
//! Every attack, whatever shape it has, ends up here: damage is subtracted,
//! status effects land, and a lethal hit runs the single kill path (orbs,
//! kill count, poison spread).

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::attack::AttackEntity;
use super::collision;
use super::state::{ExperienceOrb, GameEvent, GameState};
use crate::angle_to_dir;
use crate::consts::*;

/// How many orbs a kill drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbDrop {
    /// `enemy.orb_drop_count`
    #[default]
    Standard,
    /// `orb_drop_count` plus 0..=2 extra
    Bonus,
}

/// A single damage application and its riders
#[derive(Debug, Clone, Default)]
pub struct Hit {
    pub damage: f32,
    /// Attacker survives the hit
    pub penetrating: bool,
    pub drop: OrbDrop,
    /// Apply one poison stack using the player's poison stats
    pub poison: bool,
    /// (duration ms, damage per tick)
    pub burn: Option<(f32, f32)>,
    /// (amount, duration ms)
    pub slow: Option<(f32, f32)>,
    /// Freeze duration ms
    pub freeze: Option<f32>,
}

impl Hit {
    pub fn new(damage: f32) -> Self {
        Self {
            damage,
            ..Default::default()
        }
    }

    pub fn penetrating(mut self, penetrating: bool) -> Self {
        self.penetrating = penetrating;
        self
    }

    pub fn with_drop(mut self, drop: OrbDrop) -> Self {
        self.drop = drop;
        self
    }

    pub fn with_poison(mut self, poison: bool) -> Self {
        self.poison = poison;
        self
    }

    pub fn with_burn(mut self, duration_ms: f32, damage: f32) -> Self {
        self.burn = Some((duration_ms, damage));
        self
    }

    pub fn with_slow(mut self, amount: f32, duration_ms: f32) -> Self {
        self.slow = Some((amount, duration_ms));
        self
    }

    pub fn with_freeze(mut self, duration_ms: f32) -> Self {
        self.freeze = Some(duration_ms);
        self
    }
}

/// Result of [`resolve_hit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HitOutcome {
    pub enemy_died: bool,
    /// The attacking entity should be removed
    pub consume_attacker: bool,
}

/// Apply `hit` to the enemy at `index`.
///
/// Riders are applied before the death check so a lethal poisoned hit still
/// spreads. A dead enemy is removed from `state.enemies`; callers iterating
/// by index must walk in reverse.
pub fn resolve_hit(state: &mut GameState, index: usize, hit: &Hit) -> HitOutcome {
    let outcome = HitOutcome {
        enemy_died: false,
        consume_attacker: !hit.penetrating,
    };
    let poison = state.player.stats.poison.clone();

    let Some(enemy) = state.enemies.get_mut(index) else {
        return outcome;
    };

    enemy.health -= hit.damage;

    if hit.poison && poison.active {
        enemy
            .status
            .apply_poison(1, poison.max_stacks, poison.duration, poison.damage);
    }
    if let Some((duration, damage)) = hit.burn {
        enemy.status.apply_burn(duration, damage);
    }
    if let Some((amount, duration)) = hit.slow {
        enemy.status.apply_slow(amount, duration);
    }
    if let Some(duration) = hit.freeze {
        enemy.status.apply_freeze(duration);
    }

    if enemy.is_dead() {
        kill_enemy(state, index, hit.drop);
        return HitOutcome {
            enemy_died: true,
            ..outcome
        };
    }
    outcome
}

/// Look up `enemy_id` and resolve `hit` against it. `None` if it no longer exists.
pub fn resolve_hit_by_id(state: &mut GameState, enemy_id: u32, hit: &Hit) -> Option<HitOutcome> {
    let index = state.enemy_index(enemy_id)?;
    Some(resolve_hit(state, index, hit))
}

/// Remove a dead enemy and run the on-kill effects
pub fn kill_enemy(state: &mut GameState, index: usize, drop: OrbDrop) {
    if index >= state.enemies.len() {
        return;
    }
    let enemy = state.enemies.remove(index);
    state.kills += 1;

    if state.player.stats.poison.spread && enemy.status.has_poison() {
        spread_poison(state, enemy.pos);
    }

    let count = match drop {
        OrbDrop::Standard => enemy.orb_drop_count,
        OrbDrop::Bonus => enemy.orb_drop_count + state.rng.random_range(0..=2),
    };
    spawn_orbs(state, enemy.pos, count, enemy.exp_value);

    state.events.push(GameEvent::EnemyKilled {
        id: enemy.id,
        pos: enemy.pos,
    });
}

/// Drop `count` orbs of `value` on a jittered ring around `pos`
pub fn spawn_orbs(state: &mut GameState, pos: Vec2, count: u32, value: u32) {
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        let jitter = state.rng.random_range(0.5..1.0) * ORB_SPREAD_RADIUS;
        state
            .orbs
            .push(ExperienceOrb::new(pos + angle_to_dir(angle) * jitter, value));
    }
}

/// Splash one poison stack (half damage, full duration) on everything near `center`
pub fn spread_poison(state: &mut GameState, center: Vec2) {
    let poison = &state.player.stats.poison;
    let damage = poison.damage * POISON_SPREAD_DAMAGE_FACTOR;
    let (max_stacks, duration) = (poison.max_stacks, poison.duration);

    let targets = collision::enemies_centered_within(&state.enemies, center, POISON_SPREAD_RADIUS);
    for &id in &targets {
        if let Some(index) = state.enemy_index(id) {
            state.enemies[index]
                .status
                .apply_poison(1, max_stacks, duration, damage);
        }
    }
    if !targets.is_empty() {
        log::debug!("Poison spread to {} enemies", targets.len());
    }
}

/// Resolve `hit` on every enemy overlapping the circle. Returns the number hit.
pub fn damage_in_radius(state: &mut GameState, center: Vec2, radius: f32, hit: &Hit) -> u32 {
    let targets = collision::enemies_overlapping(&state.enemies, center, radius);
    let mut hits = 0;
    for id in targets {
        if resolve_hit_by_id(state, id, hit).is_some() {
            hits += 1;
        }
    }
    hits
}

/// Basic projectile damage for the player's current stats. Returns (damage, crit).
pub fn roll_projectile_damage(state: &mut GameState) -> (f32, bool) {
    let stats = &state.player.stats;
    let base = PROJECTILE_DAMAGE * stats.attack_damage;
    let crit_chance = stats.crit_chance.clamp(0.0, 1.0) as f64;
    let crit_damage = stats.crit_damage;
    let crit = crit_chance > 0.0 && state.rng.random_bool(crit_chance);
    if crit {
        (base * crit_damage, true)
    } else {
        (base, false)
    }
}

/// Projectile-vs-enemy pass. Consumed projectiles are removed.
pub fn projectile_collisions(state: &mut GameState) {
    let poison = state.player.stats.poison.active;

    for pi in (0..state.projectiles.len()).rev() {
        let mut consumed = false;

        for ei in (0..state.enemies.len()).rev() {
            let (enemy_id, enemy_pos, enemy_radius) = {
                let e = &state.enemies[ei];
                (e.id, e.pos, e.radius)
            };
            let projectile = &mut state.projectiles[pi];
            if projectile.has_hit(enemy_id) || !projectile.collides(enemy_pos, enemy_radius) {
                continue;
            }

            let used_up = projectile.register_hit(enemy_id);
            let hit = Hit::new(projectile.damage)
                .penetrating(!used_up)
                .with_poison(poison);
            resolve_hit(state, ei, &hit);

            if used_up {
                consumed = true;
                break;
            }
        }

        if consumed {
            state.projectiles.remove(pi);
        }
    }
}
