//! Simulation module
//!
//! All gameplay logic lives here. This module stays free of rendering and
//! platform dependencies:
//! - Variable frame deltas, scaled against a 60 Hz reference frame
//! - Seeded RNG only
//! - Reverse-index iteration wherever entities are removed mid-pass

pub mod attack;
pub mod clock;
pub mod collision;
pub mod combat;
pub mod powerups;
pub mod progression;
pub mod selector;
pub mod spawner;
pub mod specials;
pub mod state;
pub mod status;
pub mod tick;

pub use attack::{AttackEntity, Projectile};
pub use clock::Clock;
pub use combat::{Hit, HitOutcome, OrbDrop};
pub use powerups::{Category, PowerupId, SpecialPower};
pub use progression::LevelUpSession;
pub use spawner::Spawner;
pub use state::{
    Camera, Enemy, EnemyKind, ExperienceOrb, GameEvent, GamePhase, GameState, KeyState, Player,
    PlayerStats, RunSummary,
};
pub use status::StatusEffects;
pub use tick::{TickInput, autopilot_keys, tick};
