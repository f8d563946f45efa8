//! Swarm Survivor - a survival-arena simulation engine
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (entities, status effects, combat, powerups)
//! - `settings`: Run configuration loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{DifficultyPreset, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame length (60 Hz). Per-frame speeds are scaled against this.
    pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;

    /// World and viewport dimensions
    pub const WORLD_WIDTH: f32 = 5000.0;
    pub const WORLD_HEIGHT: f32 = 5000.0;
    pub const VIEWPORT_WIDTH: f32 = 1200.0;
    pub const VIEWPORT_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_INVINCIBLE_MS: f32 = 1000.0;
    /// Damage an enemy deals on contact, before damage reduction
    pub const CONTACT_DAMAGE: f32 = 10.0;

    /// Enemy spawn settings
    pub const ENEMY_SPAWN_INTERVAL_MS: f32 = 1000.0;
    pub const ENEMY_SPAWN_COUNT: u32 = 2;
    pub const ENEMY_BASE_SPEED: f32 = 2.0;
    pub const ENEMY_BASE_HEALTH: f32 = 10.0;
    pub const ENEMY_BASE_RADIUS: f32 = 12.0;
    pub const MAX_ENEMIES: usize = 200;
    /// How far outside the viewport edge enemies appear
    pub const SPAWN_EDGE_OFFSET: f32 = 50.0;

    /// Difficulty curve
    pub const SPAWN_INTERVAL_STEP_SECS: u32 = 30;
    pub const SPAWN_INTERVAL_DECREASE_MS: f32 = 50.0;
    pub const SPAWN_INTERVAL_MIN_MS: f32 = 300.0;
    pub const HEALTH_STEP_SECS: u32 = 60;
    pub const HEALTH_INCREASE: f32 = 2.0;

    /// Basic auto-attack
    pub const PROJECTILE_SPEED: f32 = 8.0;
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PROJECTILE_DAMAGE: f32 = 5.0;
    pub const PROJECTILE_INTERVAL_MS: f32 = 1000.0;
    pub const PROJECTILE_RANGE: f32 = 2000.0;
    /// Fan-out cone for multi-shot (30 degrees)
    pub const PROJECTILE_SPREAD: f32 = std::f32::consts::PI / 6.0;

    /// Off-screen culling margins
    pub const PROJECTILE_CULL_MARGIN: f32 = 100.0;
    pub const ENEMY_CULL_MARGIN: f32 = 200.0;

    /// Experience orbs
    pub const ORB_RADIUS: f32 = 8.0;
    pub const ORB_SPEED: f32 = 4.0;
    pub const ORB_COLLECT_RANGE: f32 = 30.0;
    pub const ORB_SPREAD_RADIUS: f32 = 15.0;
    pub const EXP_BASE_VALUE: u32 = 5;

    /// Level curve
    pub const EXP_BASE_THRESHOLD: f32 = 10.0;
    pub const EXP_GROWTH: f32 = 1.15;

    /// Status effect cadence
    pub const DOT_INTERVAL_MS: f32 = 1000.0;

    /// Poison spread on death
    pub const POISON_SPREAD_RADIUS: f32 = 80.0;
    pub const POISON_SPREAD_DAMAGE_FACTOR: f32 = 0.5;
}

/// Frame-rate scale factor for a delta in milliseconds.
///
/// Speeds in [`consts`] are units per reference frame; multiply by this to get
/// the distance covered in `dt_ms`.
#[inline]
pub fn frame_scale(dt_ms: f32) -> f32 {
    if dt_ms <= 0.0 {
        0.0
    } else {
        dt_ms / consts::REFERENCE_FRAME_MS
    }
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_or_zero(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Circle overlap test. Touching circles (distance == r1 + r2) do not collide.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Unit vector for an angle in radians
#[inline]
pub fn angle_to_dir(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
