//! Enemy spawning and difficulty scheduling
//!
//! Spawn rate and spawn health are pure functions of elapsed game time,
//! applied edge-triggered as each threshold is crossed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{EnemyKind, GameState};
use crate::consts::*;
use crate::settings::DifficultyPreset;

/// Difficulty scheduler plus the spawn timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Current interval between spawns (ms)
    pub spawn_interval: f32,
    /// Health given to newly spawned (normal) enemies
    pub enemy_health: f32,
    /// Time accumulated toward the next spawn (ms)
    pub spawn_timer: f32,
    /// Interval steps already applied
    pub interval_steps: u32,
    /// Health steps already applied
    pub health_steps: u32,
    base_interval: f32,
    spawn_count: u32,
    max_enemies: usize,
}

impl Spawner {
    pub fn new(preset: DifficultyPreset) -> Self {
        Self {
            spawn_interval: preset.base_spawn_interval(),
            enemy_health: ENEMY_BASE_HEALTH,
            spawn_timer: 0.0,
            interval_steps: 0,
            health_steps: 0,
            base_interval: preset.base_spawn_interval(),
            spawn_count: preset.spawn_count(),
            max_enemies: preset.max_enemies(),
        }
    }

    pub fn max_enemies(&self) -> usize {
        self.max_enemies
    }

    /// Apply any difficulty steps crossed by `game_time_ms`.
    ///
    /// Each threshold fires exactly once no matter how the time was sliced into frames.
    pub fn update_difficulty(&mut self, game_time_ms: f32) {
        let secs = (game_time_ms.max(0.0) / 1000.0) as u32;

        let interval_steps = secs / SPAWN_INTERVAL_STEP_SECS;
        if interval_steps > self.interval_steps {
            self.spawn_interval = (self.base_interval
                - interval_steps as f32 * SPAWN_INTERVAL_DECREASE_MS)
                .max(SPAWN_INTERVAL_MIN_MS.min(self.base_interval));
            self.interval_steps = interval_steps;
            log::info!(
                "Difficulty: spawn interval now {:.0} ms",
                self.spawn_interval
            );
        }

        let health_steps = secs / HEALTH_STEP_SECS;
        if health_steps > self.health_steps {
            self.enemy_health = ENEMY_BASE_HEALTH + health_steps as f32 * HEALTH_INCREASE;
            self.health_steps = health_steps;
            log::info!("Difficulty: enemy health now {}", self.enemy_health);
        }
    }

    /// Advance the spawn timer. Returns how many enemies to spawn now.
    pub fn poll(&mut self, dt: f32, alive: usize) -> u32 {
        self.spawn_timer += dt.max(0.0);
        if self.spawn_timer < self.spawn_interval || alive >= self.max_enemies {
            return 0;
        }
        self.spawn_timer = 0.0;
        let room = (self.max_enemies - alive) as u32;
        self.spawn_count.min(room)
    }
}

/// Categorical enemy roll: 10% strong, 20% fast, 70% normal
pub fn roll_enemy_kind<R: Rng>(rng: &mut R) -> EnemyKind {
    let roll: f32 = rng.random();
    if roll < 0.1 {
        EnemyKind::Strong
    } else if roll < 0.3 {
        EnemyKind::Fast
    } else {
        EnemyKind::Normal
    }
}

/// Random point on one of the four viewport edges, `SPAWN_EDGE_OFFSET` outside,
/// clamped into the world
pub fn perimeter_point<R: Rng>(rng: &mut R, camera_pos: Vec2, viewport: Vec2, world: Vec2) -> Vec2 {
    let side = rng.random_range(0..4);
    let t: f32 = rng.random();
    let point = match side {
        0 => Vec2::new(camera_pos.x + t * viewport.x, camera_pos.y - SPAWN_EDGE_OFFSET),
        1 => Vec2::new(
            camera_pos.x + viewport.x + SPAWN_EDGE_OFFSET,
            camera_pos.y + t * viewport.y,
        ),
        2 => Vec2::new(
            camera_pos.x + t * viewport.x,
            camera_pos.y + viewport.y + SPAWN_EDGE_OFFSET,
        ),
        _ => Vec2::new(camera_pos.x - SPAWN_EDGE_OFFSET, camera_pos.y + t * viewport.y),
    };
    point.clamp(Vec2::ZERO, world)
}

/// Difficulty edge-check and spawn (frame steps 3 and 4)
pub fn update(state: &mut GameState, dt: f32) {
    state.spawner.update_difficulty(state.game_time_ms);

    let count = state.spawner.poll(dt, state.enemies.len());
    if count == 0 {
        return;
    }

    let world = state.world_size();
    let health = state.spawner.enemy_health;
    for _ in 0..count {
        let pos = perimeter_point(&mut state.rng, state.camera.pos, state.camera.viewport, world);
        let kind = roll_enemy_kind(&mut state.rng);
        state.spawn_enemy(kind, pos, health);
    }
}
