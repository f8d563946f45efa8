//! Thrown charges that detonate on contact or at max distance

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::attack::AttackEntity;
use crate::sim::collision;
use crate::sim::combat::{self, Hit};
use crate::sim::state::{GameEvent, GameState};
use crate::{circles_overlap, direction_or_zero, frame_scale};

/// Aim point ahead of the player when there is nothing to throw at
pub const CHARGE_FALLBACK_OFFSET: f32 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeStats {
    pub active: bool,
    pub interval: f32,
    pub speed: f32,
    pub radius: f32,
    pub max_distance: f32,
    pub blast_radius: f32,
    pub damage: f32,
    /// Also throw one straight backwards
    pub mirror: bool,
}

impl Default for ChargeStats {
    fn default() -> Self {
        Self {
            active: false,
            interval: 2500.0,
            speed: 6.0,
            radius: 8.0,
            max_distance: 300.0,
            blast_radius: 70.0,
            damage: 25.0,
            mirror: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrownCharge {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub traveled: f32,
    pub max_distance: f32,
    pub blast_radius: f32,
    pub damage: f32,
}

impl ThrownCharge {
    pub fn new(id: u32, pos: Vec2, dir: Vec2, stats: &ChargeStats) -> Self {
        Self {
            id,
            pos,
            vel: dir.normalize_or_zero() * stats.speed,
            radius: stats.radius,
            traveled: 0.0,
            max_distance: stats.max_distance,
            blast_radius: stats.blast_radius,
            damage: stats.damage,
        }
    }
}

impl AttackEntity for ThrownCharge {
    fn advance(&mut self, dt: f32, _anchor: Vec2) {
        let step = self.vel * frame_scale(dt);
        self.pos += step;
        self.traveled += step.length();
    }

    fn collides(&self, point: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.radius, point, radius)
    }

    fn is_exhausted(&self) -> bool {
        self.traveled >= self.max_distance
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChargeSystem {
    timer: f32,
    pub charges: Vec<ThrownCharge>,
}

impl ChargeSystem {
    pub fn update(&mut self, state: &mut GameState, dt: f32) {
        let stats = state.player.stats.charge.clone();
        if !stats.active {
            self.charges.clear();
            self.timer = 0.0;
            return;
        }

        let anchor = state.player.pos;
        for i in (0..self.charges.len()).rev() {
            let charge = &mut self.charges[i];
            charge.advance(dt, anchor);

            let contact = state.enemies.iter().any(|e| charge.collides(e.pos, e.radius));
            if contact || charge.is_exhausted() {
                let charge = self.charges.remove(i);
                let pos = charge.position();
                let hit = Hit::new(charge.damage).penetrating(true);
                combat::damage_in_radius(state, pos, charge.blast_radius, &hit);
                state.events.push(GameEvent::ChargeDetonated {
                    pos,
                    radius: charge.blast_radius,
                });
            }
        }

        self.timer += dt;
        if self.timer >= stats.interval {
            self.timer = 0.0;
            self.throw(state, &stats);
        }
    }

    fn throw(&mut self, state: &mut GameState, stats: &ChargeStats) {
        let origin = state.player.pos;
        let aim = match collision::nearest_enemy(&state.enemies, origin, &[]) {
            Some(index) => state.enemies[index].pos,
            None => origin + state.player.facing * CHARGE_FALLBACK_OFFSET,
        };
        let dir = direction_or_zero(origin, aim);

        let id = state.next_entity_id();
        self.charges.push(ThrownCharge::new(id, origin, dir, stats));
        if stats.mirror {
            let id = state.next_entity_id();
            self.charges.push(ThrownCharge::new(id, origin, -dir, stats));
        }
    }
}
