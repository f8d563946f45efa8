//! Damage aura around the player, with optional burn and periodic pulse

use serde::{Deserialize, Serialize};

use crate::sim::combat::{self, Hit};
use crate::sim::state::{GameEvent, GameState};

/// Burn applied by the aura augment
pub const AURA_BURN_DURATION_MS: f32 = 3000.0;
/// Burn damage per second as a fraction of aura damage
pub const AURA_BURN_FACTOR: f32 = 0.4;
pub const AURA_PULSE_RADIUS_FACTOR: f32 = 1.5;
pub const AURA_PULSE_DAMAGE_FACTOR: f32 = 3.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraStats {
    pub active: bool,
    pub damage: f32,
    pub radius: f32,
    pub radius_multiplier: f32,
    /// Time between damage ticks (ms)
    pub tick_interval: f32,
    /// Hits apply burn
    pub burn: bool,
    /// Periodic large explosion
    pub pulse: bool,
    pub pulse_interval: f32,
}

impl Default for AuraStats {
    fn default() -> Self {
        Self {
            active: false,
            damage: 3.0,
            radius: 50.0,
            radius_multiplier: 1.0,
            tick_interval: 500.0,
            burn: false,
            pulse: false,
            pulse_interval: 5000.0,
        }
    }
}

impl AuraStats {
    pub fn effective_radius(&self) -> f32 {
        self.radius * self.radius_multiplier
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuraSystem {
    tick_timer: f32,
    pulse_timer: f32,
}

impl AuraSystem {
    pub fn update(&mut self, state: &mut GameState, dt: f32) {
        let stats = state.player.stats.aura.clone();
        if !stats.active {
            self.tick_timer = 0.0;
            self.pulse_timer = 0.0;
            return;
        }

        let center = state.player.pos;
        let radius = stats.effective_radius();

        if stats.pulse {
            self.pulse_timer += dt;
            if self.pulse_timer >= stats.pulse_interval {
                self.pulse_timer = 0.0;
                let pulse_radius = radius * AURA_PULSE_RADIUS_FACTOR;
                let hit = Hit::new(stats.damage * AURA_PULSE_DAMAGE_FACTOR).penetrating(true);
                let hits = combat::damage_in_radius(state, center, pulse_radius, &hit);
                state.events.push(GameEvent::AuraPulse {
                    pos: center,
                    radius: pulse_radius,
                });
                log::debug!("Aura pulse hit {} enemies", hits);
            }
        }

        self.tick_timer += dt;
        if self.tick_timer >= stats.tick_interval {
            self.tick_timer = 0.0;
            let mut hit = Hit::new(stats.damage).penetrating(true);
            if stats.burn {
                hit = hit.with_burn(AURA_BURN_DURATION_MS, stats.damage * AURA_BURN_FACTOR);
            }
            combat::damage_in_radius(state, center, radius, &hit);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::EnemyKind;
    use glam::Vec2;

    fn state_with_aura() -> GameState {
        let mut state = GameState::new(&Settings::with_seed(11));
        state.start();
        state.player.stats.aura.active = true;
        state
    }

    #[test]
    fn test_inactive_aura_does_nothing() {
        let mut state = GameState::new(&Settings::with_seed(11));
        state.start();
        let pos = state.player.pos + Vec2::new(20.0, 0.0);
        state.spawn_enemy(EnemyKind::Strong, pos, 10.0);
        let mut aura = AuraSystem::default();
        aura.update(&mut state, 1000.0);
        assert_eq!(state.enemies[0].health, state.enemies[0].max_health);
    }

    #[test]
    fn test_aura_ticks_on_interval() {
        let mut state = state_with_aura();
        let near = state.player.pos + Vec2::new(55.0, 0.0);
        let far = state.player.pos + Vec2::new(70.0, 0.0);
        state.spawn_enemy(EnemyKind::Strong, near, 10.0);
        state.spawn_enemy(EnemyKind::Strong, far, 10.0);

        let mut aura = AuraSystem::default();
        aura.update(&mut state, 400.0);
        assert_eq!(state.enemies[0].health, 40.0);
        aura.update(&mut state, 100.0);
        // 55 < 50 + 14.4
        assert_eq!(state.enemies[0].health, 37.0);
        // 70 > 50 + 14.4
        assert_eq!(state.enemies[1].health, 40.0);
    }

    #[test]
    fn test_burn_augment() {
        let mut state = state_with_aura();
        state.player.stats.aura.burn = true;
        let pos = state.player.pos + Vec2::new(10.0, 0.0);
        state.spawn_enemy(EnemyKind::Strong, pos, 10.0);

        let mut aura = AuraSystem::default();
        aura.update(&mut state, 500.0);
        let burn = &state.enemies[0].status.burn;
        assert!(burn.burned);
        assert!((burn.damage - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_pulse_hits_wider_and_harder() {
        let mut state = state_with_aura();
        state.player.stats.aura.pulse = true;
        // Outside the tick radius but inside the 75 pulse radius
        let pos = state.player.pos + Vec2::new(80.0, 0.0);
        state.spawn_enemy(EnemyKind::Strong, pos, 10.0);

        let mut aura = AuraSystem::default();
        aura.update(&mut state, 5000.0);
        assert_eq!(state.enemies[0].health, 31.0);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::AuraPulse { .. })));
    }
}
