//! Guards orbiting the player

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::attack::AttackEntity;
use crate::sim::combat::{self, Hit};
use crate::sim::state::GameState;
use crate::{angle_to_dir, circles_overlap, frame_scale};

pub const GUARD_ORBIT_RADIUS: f32 = 60.0;
/// Radians per reference frame at speed multiplier 1
pub const GUARD_ROTATION_SPEED: f32 = 0.05;
pub const GUARD_DAMAGE: f32 = 5.0;
pub const GUARD_SIZE: f32 = 15.0;
pub const GUARD_HIT_COOLDOWN_MS: f32 = 200.0;
/// Damage factor while penetrating
pub const GUARD_PENETRATION_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardStats {
    pub active: bool,
    pub count: u32,
    pub speed_multiplier: f32,
    pub penetration: bool,
}

impl Default for GuardStats {
    fn default() -> Self {
        Self {
            active: false,
            count: 1,
            speed_multiplier: 1.0,
            penetration: false,
        }
    }
}

/// One orbiting guard. Slot `index` of `total` sits at an even offset from the shared phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrbitingGuard {
    pub index: u32,
    pub total: u32,
    pub phase: f32,
    pub pos: Vec2,
    pub size: f32,
    pub damage: f32,
    /// Remaining hit cooldown (ms)
    pub cooldown_ms: f32,
}

impl OrbitingGuard {
    pub fn new(index: u32, total: u32) -> Self {
        Self {
            index,
            total: total.max(1),
            phase: 0.0,
            pos: Vec2::ZERO,
            size: GUARD_SIZE,
            damage: GUARD_DAMAGE,
            cooldown_ms: 0.0,
        }
    }

    pub fn angle(&self) -> f32 {
        self.phase + TAU / self.total as f32 * self.index as f32
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_ms <= 0.0
    }
}

impl AttackEntity for OrbitingGuard {
    fn advance(&mut self, dt: f32, anchor: Vec2) {
        self.pos = anchor + angle_to_dir(self.angle()) * GUARD_ORBIT_RADIUS;
        self.cooldown_ms = (self.cooldown_ms - dt).max(0.0);
    }

    fn collides(&self, point: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.size, point, radius)
    }

    fn is_exhausted(&self) -> bool {
        false
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

#[derive(Debug, Clone, Default)]
pub struct GuardSystem {
    /// Shared rotation phase (radians)
    phase: f32,
    pub guards: Vec<OrbitingGuard>,
}

impl GuardSystem {
    pub fn update(&mut self, state: &mut GameState, dt: f32) {
        let stats = state.player.stats.guards.clone();
        if !stats.active {
            self.guards.clear();
            self.phase = 0.0;
            return;
        }

        if self.guards.len() != stats.count as usize {
            self.guards = (0..stats.count)
                .map(|i| OrbitingGuard::new(i, stats.count))
                .collect();
        }

        self.phase = (self.phase
            + GUARD_ROTATION_SPEED * stats.speed_multiplier * frame_scale(dt))
            % TAU;

        let anchor = state.player.pos;
        for guard in self.guards.iter_mut() {
            guard.phase = self.phase;
            guard.advance(dt, anchor);
        }

        for guard in self.guards.iter_mut() {
            if !guard.is_ready() {
                continue;
            }

            let targets: Vec<u32> = if stats.penetration {
                state
                    .enemies
                    .iter()
                    .filter(|e| guard.collides(e.pos, e.radius))
                    .map(|e| e.id)
                    .collect()
            } else {
                state
                    .enemies
                    .iter()
                    .rev()
                    .find(|e| guard.collides(e.pos, e.radius))
                    .map(|e| vec![e.id])
                    .unwrap_or_default()
            };
            if targets.is_empty() {
                continue;
            }

            let damage = if stats.penetration {
                guard.damage * GUARD_PENETRATION_FACTOR
            } else {
                guard.damage
            };
            let hit = Hit::new(damage).penetrating(true);
            for id in targets {
                combat::resolve_hit_by_id(state, id, &hit);
            }
            guard.cooldown_ms = GUARD_HIT_COOLDOWN_MS;
        }
    }
}
