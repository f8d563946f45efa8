//! Directional wave fired along the player's facing
//!
//! A travelling rectangular slab rather than a circle. It penetrates
//! everything in its path, hitting each enemy once.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::frame_scale;
use crate::sim::attack::AttackEntity;
use crate::sim::collision::RectProfile;
use crate::sim::combat::{self, Hit};
use crate::sim::state::GameState;

/// Hits in one activation needed for the speed boost
pub const WAVE_BOOST_HITS: usize = 3;
pub const WAVE_BOOST_MULTIPLIER: f32 = 1.3;
pub const WAVE_BOOST_DURATION_MS: f32 = 3000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveStats {
    pub active: bool,
    pub interval: f32,
    pub speed: f32,
    pub range: f32,
    pub half_width: f32,
    pub depth: f32,
    pub damage: f32,
    pub slow_amount: f32,
    pub slow_duration: f32,
    /// Hits may freeze
    pub freeze: bool,
    pub freeze_chance: f32,
    pub freeze_duration: f32,
}

impl Default for WaveStats {
    fn default() -> Self {
        Self {
            active: false,
            interval: 3000.0,
            speed: 10.0,
            range: 400.0,
            half_width: 30.0,
            depth: 20.0,
            damage: 10.0,
            slow_amount: 0.4,
            slow_duration: 2000.0,
            freeze: false,
            freeze_chance: 0.15,
            freeze_duration: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectionalWave {
    pub id: u32,
    pub origin: Vec2,
    pub dir: Vec2,
    /// Distance of the leading edge from `origin`
    pub front: f32,
    pub speed: f32,
    pub range: f32,
    pub half_width: f32,
    pub depth: f32,
    pub damage: f32,
    pub hit: Vec<u32>,
    /// Speed boost already granted for this activation
    pub boosted: bool,
}

impl DirectionalWave {
    pub fn new(id: u32, origin: Vec2, dir: Vec2, stats: &WaveStats) -> Self {
        Self {
            id,
            origin,
            dir: dir.normalize_or_zero(),
            front: 0.0,
            speed: stats.speed,
            range: stats.range,
            half_width: stats.half_width,
            depth: stats.depth,
            damage: stats.damage,
            hit: Vec::new(),
            boosted: false,
        }
    }

    pub fn profile(&self) -> RectProfile {
        RectProfile {
            origin: self.origin,
            dir: self.dir,
            front: self.front,
            depth: self.depth,
            half_width: self.half_width,
        }
    }
}

impl AttackEntity for DirectionalWave {
    fn advance(&mut self, dt: f32, _anchor: Vec2) {
        self.front += self.speed * frame_scale(dt);
    }

    fn collides(&self, point: Vec2, radius: f32) -> bool {
        self.dir != Vec2::ZERO && self.profile().hits_circle(point, radius)
    }

    fn is_exhausted(&self) -> bool {
        self.front >= self.range
    }

    fn position(&self) -> Vec2 {
        self.origin + self.dir * self.front
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaveSystem {
    timer: f32,
    pub waves: Vec<DirectionalWave>,
}

impl WaveSystem {
    pub fn update(&mut self, state: &mut GameState, dt: f32) {
        let stats = state.player.stats.wave.clone();
        if !stats.active {
            self.waves.clear();
            self.timer = 0.0;
            return;
        }

        let anchor = state.player.pos;
        for i in (0..self.waves.len()).rev() {
            let wave = &mut self.waves[i];
            wave.advance(dt, anchor);

            let targets: Vec<u32> = state
                .enemies
                .iter()
                .filter(|e| !wave.hit.contains(&e.id) && wave.collides(e.pos, e.radius))
                .map(|e| e.id)
                .collect();

            for id in targets {
                let mut hit = Hit::new(wave.damage)
                    .penetrating(true)
                    .with_slow(stats.slow_amount, stats.slow_duration);
                if stats.freeze && state.rng.random_bool(stats.freeze_chance.clamp(0.0, 1.0) as f64) {
                    hit = hit.with_freeze(stats.freeze_duration);
                }
                combat::resolve_hit_by_id(state, id, &hit);
                wave.hit.push(id);
            }

            if !wave.boosted && wave.hit.len() >= WAVE_BOOST_HITS {
                wave.boosted = true;
                state
                    .player
                    .apply_speed_boost(WAVE_BOOST_MULTIPLIER, WAVE_BOOST_DURATION_MS);
                log::debug!("Wave hit {} enemies, speed boost granted", wave.hit.len());
            }

            if wave.is_exhausted() {
                self.waves.remove(i);
            }
        }

        // Launched after the pass so a new wave starts at the player next frame
        self.timer += dt;
        if self.timer >= stats.interval {
            self.timer = 0.0;
            let id = state.next_entity_id();
            self.waves.push(DirectionalWave::new(
                id,
                state.player.pos,
                state.player.facing,
                &stats,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_FRAME_MS;
    use crate::settings::Settings;
    use crate::sim::state::EnemyKind;

    fn state_with_wave() -> GameState {
        let mut state = GameState::new(&Settings::with_seed(13));
        state.start();
        state.player.stats.wave.active = true;
        state.player.facing = Vec2::X;
        state
    }

    fn run(system: &mut WaveSystem, state: &mut GameState, frames: usize) {
        for _ in 0..frames {
            system.update(state, REFERENCE_FRAME_MS);
        }
    }

    #[test]
    fn test_wave_hits_each_enemy_once_and_slows() {
        let mut state = state_with_wave();
        let p = state.player.pos;
        state.spawn_enemy(EnemyKind::Strong, p + Vec2::new(100.0, 0.0), 10.0);
        state.spawn_enemy(EnemyKind::Strong, p + Vec2::new(100.0, 80.0), 10.0);

        let mut system = WaveSystem::default();
        system.update(&mut state, 3000.0);
        run(&mut system, &mut state, 60);

        assert_eq!(state.enemies[0].health, 30.0);
        assert!(state.enemies[0].status.speed_multiplier() < 1.0);
        // Off to the side of the 30 half-width
        assert_eq!(state.enemies[1].health, 40.0);
    }

    #[test]
    fn test_freeze_augment_freezes_on_hit() {
        let mut state = state_with_wave();
        state.player.stats.wave.freeze = true;
        state.player.stats.wave.freeze_chance = 1.0;
        let p = state.player.pos;
        state.spawn_enemy(EnemyKind::Strong, p + Vec2::new(100.0, 0.0), 10.0);

        let mut system = WaveSystem::default();
        system.update(&mut state, 3000.0);
        run(&mut system, &mut state, 20);

        assert_eq!(state.enemies[0].health, 30.0);
        assert_eq!(state.enemies[0].status.speed_multiplier(), 0.0);
    }

    #[test]
    fn test_no_freeze_without_augment() {
        let mut state = state_with_wave();
        state.player.stats.wave.freeze_chance = 1.0;
        let p = state.player.pos;
        state.spawn_enemy(EnemyKind::Strong, p + Vec2::new(100.0, 0.0), 10.0);

        let mut system = WaveSystem::default();
        system.update(&mut state, 3000.0);
        run(&mut system, &mut state, 20);

        assert_eq!(state.enemies[0].health, 30.0);
        assert!(state.enemies[0].status.speed_multiplier() > 0.0);
    }

    #[test]
    fn test_wave_expires_at_range() {
        let mut state = state_with_wave();
        let mut system = WaveSystem::default();
        system.update(&mut state, 3000.0);
        run(&mut system, &mut state, 41);
        assert!(system.waves.is_empty());
    }

    #[test]
    fn test_three_hits_grant_speed_boost() {
        let mut state = state_with_wave();
        let p = state.player.pos;
        for offset in [60.0, 90.0, 120.0] {
            state.spawn_enemy(EnemyKind::Strong, p + Vec2::new(offset, 0.0), 10.0);
        }
        let mut system = WaveSystem::default();
        system.update(&mut state, 3000.0);
        run(&mut system, &mut state, 20);
        assert!(state.player.speed_boost_ms > 0.0);
        assert!((state.player.speed_boost_multiplier - WAVE_BOOST_MULTIPLIER).abs() < 1e-6);
    }
}
