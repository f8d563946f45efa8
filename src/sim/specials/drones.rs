//! Homing drones that seek the nearest enemy and detonate on contact

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::attack::AttackEntity;
use crate::sim::collision;
use crate::sim::combat::{self, Hit};
use crate::sim::state::{GameEvent, GameState};
use crate::{circles_overlap, frame_scale};

pub const DRONE_SPEED: f32 = 5.0;
pub const DRONE_RADIUS: f32 = 6.0;
pub const DRONE_DAMAGE: f32 = 15.0;
pub const DRONE_LIFETIME_MS: f32 = 8000.0;
/// Idle drones stop drifting once this close to the player
pub const DRONE_IDLE_DISTANCE: f32 = 30.0;
pub const VORTEX_RADIUS: f32 = 100.0;
pub const VORTEX_PULL: f32 = 30.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DroneStats {
    pub active: bool,
    pub max_drones: u32,
    /// Launch cooldown (ms)
    pub launch_interval: f32,
    /// Detonations pull nearby enemies in
    pub vortex: bool,
}

impl Default for DroneStats {
    fn default() -> Self {
        Self {
            active: false,
            max_drones: 2,
            launch_interval: 2000.0,
            vortex: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomingDrone {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub damage: f32,
    pub age_ms: f32,
    pub lifetime_ms: f32,
    /// Position being chased this frame (none: return to the player)
    pub seek: Option<Vec2>,
}

impl HomingDrone {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: DRONE_RADIUS,
            speed: DRONE_SPEED,
            damage: DRONE_DAMAGE,
            age_ms: 0.0,
            lifetime_ms: DRONE_LIFETIME_MS,
            seek: None,
        }
    }
}

impl AttackEntity for HomingDrone {
    fn advance(&mut self, dt: f32, anchor: Vec2) {
        self.age_ms += dt.max(0.0);
        let scale = frame_scale(dt);
        match self.seek {
            Some(target) => {
                let to_target = target - self.pos;
                let step = (self.speed * scale).min(to_target.length());
                self.pos += to_target.normalize_or_zero() * step;
            }
            None => {
                let to_player = anchor - self.pos;
                let distance = to_player.length();
                if distance > DRONE_IDLE_DISTANCE {
                    let step = (self.speed * 0.5 * scale).min(distance - DRONE_IDLE_DISTANCE);
                    self.pos += to_player / distance * step;
                }
            }
        }
    }

    fn collides(&self, point: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.radius, point, radius)
    }

    fn is_exhausted(&self) -> bool {
        self.age_ms >= self.lifetime_ms
    }

    fn position(&self) -> Vec2 {
        self.pos
    }
}

#[derive(Debug, Clone, Default)]
pub struct DroneSystem {
    launch_timer: f32,
    pub drones: Vec<HomingDrone>,
}

impl DroneSystem {
    pub fn update(&mut self, state: &mut GameState, dt: f32) {
        let stats = state.player.stats.drones.clone();
        if !stats.active {
            self.drones.clear();
            self.launch_timer = 0.0;
            return;
        }

        self.launch_timer += dt;
        if self.launch_timer >= stats.launch_interval && self.drones.len() < stats.max_drones as usize {
            let id = state.next_entity_id();
            self.drones.push(HomingDrone::new(id, state.player.pos));
            self.launch_timer = 0.0;
        }

        let anchor = state.player.pos;
        for i in (0..self.drones.len()).rev() {
            let drone = &mut self.drones[i];
            drone.seek = collision::nearest_enemy(&state.enemies, drone.pos, &[])
                .map(|index| state.enemies[index].pos);
            drone.advance(dt, anchor);

            let contact = state
                .enemies
                .iter()
                .position(|e| drone.collides(e.pos, e.radius));
            if let Some(index) = contact {
                let impact = drone.position();
                let damage = drone.damage;
                self.drones.remove(i);
                detonate(state, index, impact, damage, stats.vortex);
            } else if drone.is_exhausted() {
                self.drones.remove(i);
            }
        }
    }
}

fn detonate(state: &mut GameState, index: usize, impact: Vec2, damage: f32, vortex: bool) {
    combat::resolve_hit(state, index, &Hit::new(damage));
    if vortex {
        for enemy in state.enemies.iter_mut() {
            let offset = impact - enemy.pos;
            let distance = offset.length();
            if distance <= VORTEX_RADIUS && distance > 0.0 {
                enemy.pos += offset / distance * VORTEX_PULL.min(distance);
            }
        }
    }
    state.events.push(GameEvent::DroneDetonated { pos: impact });
    log::debug!("Drone detonated at ({:.0}, {:.0})", impact.x, impact.y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_FRAME_MS;
    use crate::settings::Settings;
    use crate::sim::state::EnemyKind;

    fn state_with_drones() -> GameState {
        let mut state = GameState::new(&Settings::with_seed(9));
        state.start();
        state.player.stats.drones.active = true;
        state
    }

    #[test]
    fn test_launch_cadence_and_cap() {
        let mut state = state_with_drones();
        let mut system = DroneSystem::default();
        system.update(&mut state, 1999.0);
        assert!(system.drones.is_empty());
        system.update(&mut state, 1.0);
        assert_eq!(system.drones.len(), 1);
        system.update(&mut state, 2000.0);
        system.update(&mut state, 2000.0);
        assert_eq!(system.drones.len(), 2);
    }

    #[test]
    fn test_drone_seeks_and_detonates() {
        let mut state = state_with_drones();
        let target = state.player.pos + Vec2::new(40.0, 0.0);
        state.spawn_enemy(EnemyKind::Strong, target, 10.0);

        let mut system = DroneSystem::default();
        system.update(&mut state, 2000.0);
        for _ in 0..30 {
            if system.drones.is_empty() {
                break;
            }
            system.update(&mut state, REFERENCE_FRAME_MS);
        }
        assert!(system.drones.is_empty());
        assert_eq!(state.enemies[0].health, 25.0);
    }

    #[test]
    fn test_vortex_pulls_neighbours() {
        let mut state = state_with_drones();
        state.player.stats.drones.vortex = true;
        let impact = Vec2::new(1000.0, 1000.0);
        state.spawn_enemy(EnemyKind::Strong, impact, 10.0);
        state.spawn_enemy(EnemyKind::Strong, impact + Vec2::new(90.0, 0.0), 10.0);
        state.spawn_enemy(EnemyKind::Strong, impact + Vec2::new(150.0, 0.0), 10.0);

        detonate(&mut state, 0, impact, DRONE_DAMAGE, true);
        assert!((state.enemies[1].pos.x - (impact.x + 60.0)).abs() < 1e-3);
        assert_eq!(state.enemies[2].pos.x, impact.x + 150.0);
    }

    #[test]
    fn test_idle_drone_returns_to_player() {
        let mut drone = HomingDrone::new(1, Vec2::new(100.0, 0.0));
        drone.advance(REFERENCE_FRAME_MS, Vec2::ZERO);
        assert!((drone.pos.x - 97.5).abs() < 1e-3);

        let mut parked = HomingDrone::new(2, Vec2::new(20.0, 0.0));
        parked.advance(REFERENCE_FRAME_MS, Vec2::ZERO);
        assert_eq!(parked.pos, Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_drone_expires() {
        let mut drone = HomingDrone::new(1, Vec2::ZERO);
        drone.advance(DRONE_LIFETIME_MS, Vec2::ZERO);
        assert!(drone.is_exhausted());
    }
}
