//! Periodic area strike at a random spot near the player
//!
//! Instant: there is no entity to advance, only a cooldown. Augments add a
//! slow, a chained follow-up hit and extra orb drops.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::angle_to_dir;
use crate::sim::collision;
use crate::sim::combat::{self, Hit, OrbDrop};
use crate::sim::state::{GameEvent, GameState};

pub const STRIKE_MAX_OFFSET: f32 = 250.0;
pub const STRIKE_SLOW_AMOUNT: f32 = 0.3;
pub const STRIKE_SLOW_DURATION_MS: f32 = 1500.0;
pub const CHAIN_CHANCE: f64 = 0.3;
pub const CHAIN_DAMAGE_FACTOR: f32 = 0.5;
pub const CHAIN_RANGE: f32 = 150.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeStats {
    pub active: bool,
    pub interval: f32,
    pub radius: f32,
    pub damage: f32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub slow: bool,
    pub chain: bool,
    pub bonus_orbs: bool,
}

impl Default for StrikeStats {
    fn default() -> Self {
        Self {
            active: false,
            interval: 1500.0,
            radius: 45.0,
            damage: 20.0,
            crit_chance: 0.1,
            crit_multiplier: 2.0,
            slow: false,
            chain: false,
            bonus_orbs: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StrikeSystem {
    timer: f32,
}

impl StrikeSystem {
    pub fn update(&mut self, state: &mut GameState, dt: f32) {
        let stats = state.player.stats.strike.clone();
        if !stats.active {
            self.timer = 0.0;
            return;
        }

        self.timer += dt;
        if self.timer < stats.interval {
            return;
        }
        self.timer = 0.0;

        let angle = state.rng.random_range(0.0..TAU);
        let distance = state.rng.random_range(0.0..=STRIKE_MAX_OFFSET);
        let center = (state.player.pos + angle_to_dir(angle) * distance)
            .clamp(Vec2::ZERO, state.world_size());
        strike_at(state, &stats, center);
    }
}

/// Resolve one strike centred on `center`
pub fn strike_at(state: &mut GameState, stats: &StrikeStats, center: Vec2) {
    let crit = state.rng.random_bool(stats.crit_chance.clamp(0.0, 1.0) as f64);
    let damage = if crit {
        stats.damage * stats.crit_multiplier
    } else {
        stats.damage
    };

    let drop = if stats.bonus_orbs {
        OrbDrop::Bonus
    } else {
        OrbDrop::Standard
    };
    let mut hit = Hit::new(damage).penetrating(true).with_drop(drop);
    if stats.slow {
        hit = hit.with_slow(STRIKE_SLOW_AMOUNT, STRIKE_SLOW_DURATION_MS);
    }

    let struck = collision::enemies_overlapping(&state.enemies, center, stats.radius);
    for &id in &struck {
        combat::resolve_hit_by_id(state, id, &hit);
    }
    state.events.push(GameEvent::StrikeLanded {
        pos: center,
        radius: stats.radius,
        crit,
    });

    if stats.chain && !struck.is_empty() && state.rng.random_bool(CHAIN_CHANCE) {
        if let Some(index) =
            collision::nearest_enemy_within(&state.enemies, center, CHAIN_RANGE, &struck)
        {
            let to = state.enemies[index].pos;
            let chained = Hit {
                damage: damage * CHAIN_DAMAGE_FACTOR,
                ..hit
            };
            combat::resolve_hit(state, index, &chained);
            state.events.push(GameEvent::ChainStrike { from: center, to });
        }
    }
}
