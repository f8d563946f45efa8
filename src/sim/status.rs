//! Per-enemy timed status effects
//!
//! Burn, poison, slow and freeze. Pure state plus tick logic: `tick` returns
//! the damage that came due this frame and the caller subtracts it.

use serde::{Deserialize, Serialize};

use crate::consts::DOT_INTERVAL_MS;

/// Movement penalty while burning
pub const BURN_SPEED_DEBUFF: f32 = 0.1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BurnState {
    pub burned: bool,
    pub timer: f32,
    /// Damage per tick
    pub damage: f32,
    accumulator: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoisonState {
    pub poisoned: bool,
    pub stacks: u32,
    pub timer: f32,
    /// Damage per stack per tick
    pub damage: f32,
    accumulator: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlowState {
    pub timer: f32,
    /// Fraction of speed removed (0.0 - 1.0)
    pub amount: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreezeState {
    pub frozen: bool,
    pub timer: f32,
}

/// All timed conditions on one enemy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffects {
    pub burn: BurnState,
    pub poison: PoisonState,
    pub slow: SlowState,
    pub freeze: FreezeState,
}

impl StatusEffects {
    /// Set (or refresh) burn. The damage cadence restarts.
    pub fn apply_burn(&mut self, duration_ms: f32, damage: f32) {
        self.burn.burned = true;
        self.burn.timer = duration_ms.max(0.0);
        self.burn.damage = damage;
        self.burn.accumulator = 0.0;
    }

    /// Add `stacks` poison stacks (capped at `max_stacks`) and refresh the timer
    pub fn apply_poison(&mut self, stacks: u32, max_stacks: u32, duration_ms: f32, damage: f32) {
        self.poison.stacks = (self.poison.stacks + stacks).min(max_stacks.max(1));
        self.poison.poisoned = true;
        self.poison.timer = duration_ms.max(0.0);
        self.poison.damage = damage;
        self.poison.accumulator = 0.0;
    }

    /// Set (or refresh) slow. A stronger slow replaces a weaker one.
    pub fn apply_slow(&mut self, amount: f32, duration_ms: f32) {
        let amount = amount.clamp(0.0, 1.0);
        if self.slow.timer <= 0.0 || amount >= self.slow.amount {
            self.slow.amount = amount;
        }
        self.slow.timer = self.slow.timer.max(duration_ms);
    }

    pub fn apply_freeze(&mut self, duration_ms: f32) {
        self.freeze.frozen = true;
        self.freeze.timer = self.freeze.timer.max(duration_ms);
    }

    pub fn has_poison(&self) -> bool {
        self.poison.poisoned && self.poison.stacks > 0
    }

    /// Advance all timers by `dt` ms, returning damage that ticked this frame
    pub fn tick(&mut self, dt: f32) -> f32 {
        let dt = dt.max(0.0);
        let mut damage = 0.0;

        if self.burn.burned {
            self.burn.timer -= dt;
            self.burn.accumulator += dt;
            if self.burn.accumulator >= DOT_INTERVAL_MS {
                damage += self.burn.damage;
                self.burn.accumulator = 0.0;
            }
            if self.burn.timer <= 0.0 {
                self.burn = BurnState::default();
            }
        }

        if self.has_poison() {
            self.poison.timer -= dt;
            self.poison.accumulator += dt;
            if self.poison.accumulator >= DOT_INTERVAL_MS {
                damage += self.poison.damage * self.poison.stacks as f32;
                self.poison.accumulator = 0.0;
            }
            if self.poison.timer <= 0.0 {
                self.poison = PoisonState::default();
            }
        }

        if self.slow.timer > 0.0 {
            self.slow.timer -= dt;
            if self.slow.timer <= 0.0 {
                self.slow = SlowState::default();
            }
        }

        if self.freeze.frozen {
            self.freeze.timer -= dt;
            if self.freeze.timer <= 0.0 {
                self.freeze = FreezeState::default();
            }
        }

        damage
    }

    /// Movement multiplier: burn and slow compose multiplicatively, freeze forces 0
    pub fn speed_multiplier(&self) -> f32 {
        if self.freeze.frozen {
            return 0.0;
        }
        let mut multiplier = 1.0;
        if self.burn.burned {
            multiplier *= 1.0 - BURN_SPEED_DEBUFF;
        }
        if self.slow.timer > 0.0 && self.slow.amount > 0.0 {
            multiplier *= 1.0 - self.slow.amount;
        }
        multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_burn_ticks_every_second_then_clears() {
        let mut status = StatusEffects::default();
        status.apply_burn(3000.0, 1.2);

        assert_eq!(status.tick(999.0), 0.0);
        assert!((status.tick(1.0) - 1.2).abs() < 1e-6);
        assert!((status.tick(1000.0) - 1.2).abs() < 1e-6);
        // Final tick lands on expiry and still deals damage
        assert!((status.tick(1000.0) - 1.2).abs() < 1e-6);
        assert!(!status.burn.burned);
        assert_eq!(status.tick(1000.0), 0.0);
    }

    #[test]
    fn test_poison_damage_scales_with_stacks() {
        let mut status = StatusEffects::default();
        status.apply_poison(1, 3, 3000.0, 2.0);
        status.apply_poison(1, 3, 3000.0, 2.0);
        assert_eq!(status.poison.stacks, 2);
        assert!((status.tick(1000.0) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_poison_stacks_capped() {
        let mut status = StatusEffects::default();
        for _ in 0..5 {
            status.apply_poison(1, 2, 3000.0, 2.0);
        }
        assert_eq!(status.poison.stacks, 2);
    }

    #[test]
    fn test_poison_expiry_clears_stacks() {
        let mut status = StatusEffects::default();
        status.apply_poison(1, 3, 500.0, 2.0);
        status.tick(600.0);
        assert_eq!(status.poison.stacks, 0);
        assert!(!status.has_poison());
    }

    #[test]
    fn test_freeze_overrides_slow() {
        let mut status = StatusEffects::default();
        status.apply_slow(0.5, 2000.0);
        status.apply_freeze(1000.0);
        assert_eq!(status.speed_multiplier(), 0.0);

        status.tick(1000.0);
        assert!((status.speed_multiplier() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_burn_and_slow_compose_multiplicatively() {
        let mut status = StatusEffects::default();
        status.apply_burn(3000.0, 1.0);
        status.apply_slow(0.5, 3000.0);
        assert!((status.speed_multiplier() - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_slow_expires() {
        let mut status = StatusEffects::default();
        status.apply_slow(0.3, 500.0);
        status.tick(250.0);
        assert!(status.speed_multiplier() < 1.0);
        status.tick(250.0);
        assert_eq!(status.speed_multiplier(), 1.0);
        assert_eq!(status.slow.amount, 0.0);
    }

    #[test]
    fn test_zero_and_negative_delta_are_inert() {
        let mut status = StatusEffects::default();
        status.apply_poison(1, 1, 3000.0, 2.0);
        assert_eq!(status.tick(0.0), 0.0);
        assert_eq!(status.tick(-50.0), 0.0);
        assert_eq!(status.poison.timer, 3000.0);
    }

    proptest! {
        /// Splitting one long frame into short ones never changes total poison damage
        #[test]
        fn prop_poison_cadence_is_frame_independent(
            frames in proptest::collection::vec(1.0f32..999.0, 1..6),
        ) {
            let total: f32 = frames.iter().sum();
            prop_assume!(total >= 1000.0 && total < 2000.0);

            let mut split = StatusEffects::default();
            split.apply_poison(2, 3, 5000.0, 2.0);
            let split_damage: f32 = frames.iter().map(|&dt| split.tick(dt)).sum();

            let mut single = StatusEffects::default();
            single.apply_poison(2, 3, 5000.0, 2.0);
            let single_damage = single.tick(total);

            prop_assert!((split_damage - single_damage).abs() < 1e-4);
            prop_assert!((single_damage - 4.0).abs() < 1e-4);
        }

        #[test]
        fn prop_timers_never_leave_negative_state(dts in proptest::collection::vec(0.0f32..700.0, 1..20)) {
            let mut status = StatusEffects::default();
            status.apply_burn(2000.0, 1.0);
            status.apply_slow(0.4, 1500.0);
            status.apply_freeze(800.0);
            for dt in dts {
                status.tick(dt);
                prop_assert!(status.burn.timer >= 0.0 || !status.burn.burned);
                prop_assert!(status.slow.timer >= 0.0);
                prop_assert!(status.freeze.timer >= 0.0);
                let m = status.speed_multiplier();
                prop_assert!((0.0..=1.0).contains(&m));
            }
        }
    }
}
