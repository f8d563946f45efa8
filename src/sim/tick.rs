//! Frame-driven simulation tick
//!
//! Advances the game by one variable-length frame in a fixed order. The order
//! is part of the contract: orbs are collected before projectiles resolve so a
//! fresh drop is never processed twice, and a level-up during collection
//! freezes the rest of the frame.

use glam::Vec2;

use super::attack::{AttackEntity, Projectile, fan_directions};
use super::collision;
use super::combat::{self, OrbDrop};
use super::progression;
use super::spawner;
use super::specials;
use super::state::{GameEvent, GamePhase, GameState, KeyState};
use crate::consts::*;

/// Commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keyboard snapshot
    pub keys: KeyState,
    /// Start trigger (Start -> Playing)
    pub start: bool,
    /// Restart trigger, from any phase
    pub restart: bool,
    /// Level-up menu choice
    pub select_powerup: Option<usize>,
    /// Autopilot - the built-in AI drives the player
    pub autopilot: bool,
}

/// Advance the game by `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    let mut input = input.clone();
    if input.autopilot {
        match state.phase {
            GamePhase::Start => input.start = true,
            GamePhase::LevelUp => {
                if input.select_powerup.is_none() {
                    input.select_powerup = Some(0);
                }
            }
            GamePhase::Playing => input.keys = autopilot_keys(state),
            GamePhase::GameOver => {}
        }
    }

    if input.restart {
        state.restart();
    } else if input.start && state.phase == GamePhase::Start {
        state.start();
    }

    if let Some(index) = input.select_powerup {
        if state.phase == GamePhase::LevelUp {
            state.select_powerup(index);
        }
    }

    // Everything below is a no-op unless playing
    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.game_time_ms += dt;
    let world = state.world_size();

    // 1. Player movement
    state.player.advance(&input.keys, dt, world);

    // 2. Invincibility and boost timers
    state.player.tick_timers(dt);

    // 3-4. Difficulty steps and spawning
    spawner::update(state, dt);

    // 5. Auto-attack
    auto_attack(state, dt);

    // 6. Special powers
    specials::update_specials(state, dt);

    // 7. Projectiles
    advance_projectiles(state, dt);

    // 8. Orbs (a level-up here suspends the rest of the frame)
    if collect_orbs(state, dt) {
        state.camera.recenter(state.player.pos, world);
        return;
    }

    // 9. Projectile hits
    combat::projectile_collisions(state);

    // 10. Enemies
    update_enemies(state, dt);

    // 11. Camera
    state.camera.recenter(state.player.pos, world);
}

/// Fire a volley at the nearest enemy when the cooldown is up
fn auto_attack(state: &mut GameState, dt: f32) {
    let interval = PROJECTILE_INTERVAL_MS / state.player.stats.attack_speed.max(0.01);
    state.attack_timer += dt;
    if state.attack_timer < interval {
        return;
    }
    state.attack_timer = 0.0;

    let origin = state.player.pos;
    let Some(target) = collision::nearest_enemy(&state.enemies, origin, &[]) else {
        return;
    };
    let to_target = state.enemies[target].pos - origin;
    let aim = to_target.y.atan2(to_target.x);

    let count = state.player.stats.projectile_count.max(1);
    let penetration = state.player.stats.penetration;
    for dir in fan_directions(aim, count, PROJECTILE_SPREAD) {
        let (damage, crit) = combat::roll_projectile_damage(state);
        let id = state.next_entity_id();
        state
            .projectiles
            .push(Projectile::new(id, origin, dir, damage, crit, penetration));
    }
}

/// Move projectiles and drop the spent or off-screen ones
fn advance_projectiles(state: &mut GameState, dt: f32) {
    let anchor = state.player.pos;
    let camera = state.camera;
    state.projectiles.retain_mut(|projectile| {
        projectile.advance(dt, anchor);
        !projectile.is_exhausted()
            && !camera.is_offscreen(projectile.position(), PROJECTILE_CULL_MARGIN)
    });
}

/// Attract and collect orbs. Returns true if a level-up opened the menu.
fn collect_orbs(state: &mut GameState, dt: f32) -> bool {
    let range = ORB_COLLECT_RANGE * state.player.stats.orb_collection_range;

    for i in (0..state.orbs.len()).rev() {
        if state.phase != GamePhase::Playing {
            return true;
        }
        let player_pos = state.player.pos;
        let player_radius = state.player.radius;

        let orb = &mut state.orbs[i];
        orb.advance(player_pos, range, dt);
        if !orb.touches(player_pos, player_radius) {
            continue;
        }

        let orb = state.orbs.remove(i);
        progression::gain_exp(&mut state.player, orb.value);
        if progression::check_level_up(state) {
            return true;
        }
    }
    false
}

/// Status ticks, pursuit, contact damage and culling
fn update_enemies(state: &mut GameState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;

    for i in (0..state.enemies.len()).rev() {
        let enemy = &mut state.enemies[i];

        let dot = enemy.status.tick(dt);
        if dot > 0.0 {
            enemy.health -= dot;
            if enemy.is_dead() {
                combat::kill_enemy(state, i, OrbDrop::Standard);
                continue;
            }
        }

        enemy.advance(player_pos, dt);

        if !state.player.is_invincible() && enemy.collides(player_pos, player_radius) {
            let damage = state.player.take_contact_damage(CONTACT_DAMAGE);
            state.events.push(GameEvent::PlayerHit { damage });

            if state.player.health <= 0.0 {
                game_over(state);
                return;
            }
        }

        if state.camera.is_offscreen(state.enemies[i].pos, ENEMY_CULL_MARGIN) {
            state.enemies.remove(i);
        }
    }
}

fn game_over(state: &mut GameState) {
    state.player.health = 0.0;
    if state.transition(GamePhase::GameOver) {
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over at level {} after {:.1}s with {} kills",
            state.player.level,
            state.game_time_ms / 1000.0,
            state.kills
        );
    }
}

/// Simple survival AI: back away from nearby enemies, otherwise chase orbs
pub fn autopilot_keys(state: &GameState) -> KeyState {
    const DANGER_RADIUS: f32 = 150.0;

    let pos = state.player.pos;
    let threat = state
        .enemies
        .iter()
        .filter_map(|e| {
            let offset = pos - e.pos;
            let distance = offset.length();
            (distance < DANGER_RADIUS && distance > 0.0)
                .then(|| offset / distance * (DANGER_RADIUS - distance))
        })
        .fold(Vec2::ZERO, |acc, push| acc + push);

    let mut dir = if threat != Vec2::ZERO {
        threat.normalize_or_zero()
    } else {
        state
            .orbs
            .iter()
            .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
            .map(|orb| (orb.pos - pos).normalize_or_zero())
            .unwrap_or(Vec2::ZERO)
    };

    // Drift back toward the middle when pinned against a wall
    let world = state.world_size();
    let margin = DANGER_RADIUS;
    if pos.x < margin || pos.y < margin || pos.x > world.x - margin || pos.y > world.y - margin {
        dir = (dir + (world / 2.0 - pos).normalize_or_zero()).normalize_or_zero();
    }

    const THRESHOLD: f32 = 0.3;
    KeyState {
        up: dir.y < -THRESHOLD,
        down: dir.y > THRESHOLD,
        left: dir.x < -THRESHOLD,
        right: dir.x > THRESHOLD,
    }
}
