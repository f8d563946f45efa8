//! Attack entities
//!
//! Everything that moves and hits enemies shares one capability set: advance,
//! test a circular target, report exhaustion. Each variant carries its own
//! movement rule and penetration policy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{circles_overlap, frame_scale};

/// Shared capability of projectiles, guards, drones, waves and charges
pub trait AttackEntity {
    /// Move by one frame of `dt` ms. `anchor` is the player position.
    fn advance(&mut self, dt: f32, anchor: Vec2);

    /// Does this entity overlap a circle at `point` with `radius`?
    fn collides(&self, point: Vec2, radius: f32) -> bool;

    /// Out of range or out of lifetime
    fn is_exhausted(&self) -> bool;

    fn position(&self) -> Vec2;
}

/// Basic auto-attack projectile (straight line, limited range)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Units per reference frame
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub crit: bool,
    /// Enemies this projectile may still pass through
    pub penetration_left: u32,
    /// Enemy IDs already hit (penetrating projectiles never re-hit)
    pub hit: Vec<u32>,
    pub traveled: f32,
    pub max_distance: f32,
}

impl Projectile {
    /// Create a projectile heading along `direction`. A zero direction yields
    /// a stationary projectile rather than NaN velocity.
    pub fn new(id: u32, pos: Vec2, direction: Vec2, damage: f32, crit: bool, penetration: u32) -> Self {
        Self {
            id,
            pos,
            vel: direction.normalize_or_zero() * PROJECTILE_SPEED,
            radius: PROJECTILE_RADIUS,
            damage,
            crit,
            penetration_left: penetration,
            hit: Vec::new(),
            traveled: 0.0,
            max_distance: PROJECTILE_RANGE,
        }
    }

    pub fn has_hit(&self, enemy_id: u32) -> bool {
        self.hit.contains(&enemy_id)
    }

    /// Record a hit. Returns true when the projectile is used up.
    pub fn register_hit(&mut self, enemy_id: u32) -> bool {
        if self.penetration_left > 0 {
            self.penetration_left -= 1;
            self.hit.push(enemy_id);
            false
        } else {
            true
        }
    }
}

impl AttackEntity for Projectile {
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

/// Evenly spaced fan of directions inside a cone centred on `aim_angle`.
///
/// A single shot goes straight down the aim line.
pub fn fan_directions(aim_angle: f32, count: u32, spread: f32) -> Vec<Vec2> {
    if count <= 1 {
        return vec![crate::angle_to_dir(aim_angle)];
    }
    let step = spread / (count - 1) as f32;
    let start = aim_angle - spread / 2.0;
    (0..count)
        .map(|i| crate::angle_to_dir(start + step * i as f32))
        .collect()
}
