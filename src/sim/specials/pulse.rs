//! Defensive pulse: periodic knockback and slow, no damage

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::direction_or_zero;
use crate::sim::collision;
use crate::sim::state::{GameEvent, GameState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulseStats {
    pub active: bool,
    pub interval: f32,
    pub radius: f32,
    pub knockback: f32,
    pub slow_amount: f32,
    pub slow_duration: f32,
}

impl Default for PulseStats {
    fn default() -> Self {
        Self {
            active: false,
            interval: 8000.0,
            radius: 150.0,
            knockback: 80.0,
            slow_amount: 0.5,
            slow_duration: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PulseSystem {
    timer: f32,
}

impl PulseSystem {
    pub fn update(&mut self, state: &mut GameState, dt: f32) {
        let stats = state.player.stats.pulse.clone();
        if !stats.active {
            self.timer = 0.0;
            return;
        }

        self.timer += dt;
        if self.timer < stats.interval {
            return;
        }
        self.timer = 0.0;
        emit(state, &stats);
    }
}

/// Push every enemy within range straight away from the player and slow it
pub fn emit(state: &mut GameState, stats: &PulseStats) {
    let center = state.player.pos;
    let fallback = state.player.facing;
    let world = state.world_size();

    let targets = collision::enemies_centered_within(&state.enemies, center, stats.radius);
    for &id in &targets {
        let Some(index) = state.enemy_index(id) else {
            continue;
        };
        let enemy = &mut state.enemies[index];
        let mut away = direction_or_zero(center, enemy.pos);
        if away == Vec2::ZERO {
            away = fallback;
        }
        enemy.pos = (enemy.pos + away * stats.knockback).clamp(Vec2::ZERO, world);
        enemy.status.apply_slow(stats.slow_amount, stats.slow_duration);
    }

    state.events.push(GameEvent::GuardianPulse {
        pos: center,
        radius: stats.radius,
    });
    log::debug!("Guardian pulse pushed back {} enemies", targets.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::EnemyKind;

    #[test]
    fn test_knockback_and_slow_without_damage() {
        let mut state = GameState::new(&Settings::with_seed(8));
        state.start();
        state.player.stats.pulse.active = true;
        let p = state.player.pos;
        state.spawn_enemy(EnemyKind::Normal, p + Vec2::new(100.0, 0.0), 10.0);
        state.spawn_enemy(EnemyKind::Normal, p + Vec2::new(0.0, 200.0), 10.0);

        let mut system = PulseSystem::default();
        system.update(&mut state, 7999.0);
        assert_eq!(state.enemies[0].pos, p + Vec2::new(100.0, 0.0));
        system.update(&mut state, 1.0);

        assert!((state.enemies[0].pos.x - (p.x + 180.0)).abs() < 1e-3);
        assert_eq!(state.enemies[0].health, state.enemies[0].max_health);
        assert!((state.enemies[0].status.speed_multiplier() - 0.5).abs() < 1e-6);
        assert_eq!(state.enemies[1].pos, p + Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_knockback_clamped_to_world() {
        let mut state = GameState::new(&Settings::with_seed(8));
        state.start();
        state.player.pos = Vec2::new(50.0, 500.0);
        state.spawn_enemy(EnemyKind::Normal, Vec2::new(10.0, 500.0), 10.0);
        emit(&mut state, &PulseStats::default());
        assert_eq!(state.enemies[0].pos.x, 0.0);
    }
}
