//! Special powers
//!
//! Each power owns its cooldowns and entity pool and is updated every frame.
//! A power whose `active` flag is off clears its pool and does nothing.
//! Poison has no entities; it rides on basic projectile hits (see `combat`).

pub mod aura;
pub mod charge;
pub mod drones;
pub mod guards;
pub mod pulse;
pub mod strike;
pub mod wave;

use serde::{Deserialize, Serialize};

pub use aura::{AuraStats, AuraSystem};
pub use charge::{ChargeStats, ChargeSystem, ThrownCharge};
pub use drones::{DroneStats, DroneSystem, HomingDrone};
pub use guards::{GuardStats, GuardSystem, OrbitingGuard};
pub use pulse::{PulseStats, PulseSystem};
pub use strike::{StrikeStats, StrikeSystem};
pub use wave::{DirectionalWave, WaveStats, WaveSystem};

use super::state::GameState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoisonStats {
    pub active: bool,
    pub max_stacks: u32,
    /// Damage per stack per second
    pub damage: f32,
    /// Damage before enhancements (enhance increments scale off this)
    pub base_damage: f32,
    /// Stack lifetime (ms)
    pub duration: f32,
    /// Kills splash poison onto neighbours
    pub spread: bool,
}

impl Default for PoisonStats {
    fn default() -> Self {
        Self {
            active: false,
            max_stacks: 1,
            damage: 2.0,
            base_damage: 2.0,
            duration: 3000.0,
            spread: false,
        }
    }
}

/// Runtime state of every special power
#[derive(Debug, Clone, Default)]
pub struct Specials {
    pub aura: AuraSystem,
    pub guards: GuardSystem,
    pub drones: DroneSystem,
    pub strike: StrikeSystem,
    pub wave: WaveSystem,
    pub charge: ChargeSystem,
    pub pulse: PulseSystem,
}

/// Update every special power (frame step 6).
///
/// Each system is taken out of the state while it runs so it can mutate
/// enemies and the player through `state`.
pub fn update_specials(state: &mut GameState, dt: f32) {
    let mut aura = std::mem::take(&mut state.specials.aura);
    aura.update(state, dt);
    state.specials.aura = aura;

    let mut guards = std::mem::take(&mut state.specials.guards);
    guards.update(state, dt);
    state.specials.guards = guards;

    let mut drones = std::mem::take(&mut state.specials.drones);
    drones.update(state, dt);
    state.specials.drones = drones;

    let mut strike = std::mem::take(&mut state.specials.strike);
    strike.update(state, dt);
    state.specials.strike = strike;

    let mut wave = std::mem::take(&mut state.specials.wave);
    wave.update(state, dt);
    state.specials.wave = wave;

    let mut charge = std::mem::take(&mut state.specials.charge);
    charge.update(state, dt);
    state.specials.charge = charge;

    let mut pulse = std::mem::take(&mut state.specials.pulse);
    pulse.update(state, dt);
    state.specials.pulse = pulse;
}

impl GameState {
    pub fn guards(&self) -> &[OrbitingGuard] {
        &self.specials.guards.guards
    }

    pub fn drones(&self) -> &[HomingDrone] {
        &self.specials.drones.drones
    }

    pub fn waves(&self) -> &[DirectionalWave] {
        &self.specials.wave.waves
    }

    pub fn charges(&self) -> &[ThrownCharge] {
        &self.specials.charge.charges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::REFERENCE_FRAME_MS;
    use crate::settings::Settings;

    #[test]
    fn test_inactive_specials_are_inert() {
        let mut state = GameState::new(&Settings::with_seed(2));
        state.start();
        for _ in 0..600 {
            update_specials(&mut state, REFERENCE_FRAME_MS);
        }
        assert!(state.guards().is_empty());
        assert!(state.drones().is_empty());
        assert!(state.waves().is_empty());
        assert!(state.charges().is_empty());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_pools_survive_the_take() {
        let mut state = GameState::new(&Settings::with_seed(2));
        state.start();
        state.player.stats.guards.active = true;
        state.player.stats.guards.count = 2;
        update_specials(&mut state, REFERENCE_FRAME_MS);
        update_specials(&mut state, REFERENCE_FRAME_MS);
        assert_eq!(state.guards().len(), 2);
    }
}
