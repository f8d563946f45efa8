//! Weighted powerup offer construction
//!
//! Each of the three slots is rolled independently: special, augment, heal,
//! then the normal stat pool. An empty pool falls back in a fixed order and a
//! fully exhausted catalog just yields a shorter offer.

use rand::Rng;

use super::powerups::{self, PowerupId};
use super::state::Player;

pub const OFFER_SIZE: usize = 3;
/// Player level at which specials start appearing
pub const SPECIAL_UNLOCK_LEVEL: u32 = 10;
pub const SPECIAL_CHANCE: f64 = 0.25;
pub const AUGMENT_CHANCE: f64 = 0.25;
pub const HEAL_FULL_CHANCE: f64 = 0.05;
pub const HEAL_HALF_CHANCE: f64 = 0.10;

/// Candidate pools for one slot, already excluding capped ids and ids in the offer
struct Pools {
    special: Vec<PowerupId>,
    augment: Vec<PowerupId>,
    normal: Vec<PowerupId>,
    heal: Vec<PowerupId>,
}

impl Pools {
    fn build(player: &Player, offer: &[PowerupId]) -> Self {
        let open = |ids: Vec<PowerupId>| -> Vec<PowerupId> {
            ids.into_iter().filter(|id| !offer.contains(id)).collect()
        };
        let special = if player.level >= SPECIAL_UNLOCK_LEVEL {
            open(powerups::special_pool(player))
        } else {
            Vec::new()
        };
        Self {
            special,
            augment: open(powerups::augment_pool(player)),
            normal: open(powerups::normal_pool(player)),
            heal: open(powerups::heal_pool()),
        }
    }

    /// First non-empty pool in fallback order
    fn fallback(&self) -> Option<&[PowerupId]> {
        [&self.special, &self.augment, &self.normal, &self.heal]
            .into_iter()
            .find(|pool| !pool.is_empty())
            .map(|pool| pool.as_slice())
    }
}

fn draw<R: Rng>(pool: &[PowerupId], rng: &mut R) -> Option<PowerupId> {
    if pool.is_empty() {
        None
    } else {
        Some(pool[rng.random_range(0..pool.len())])
    }
}

/// Roll a single slot
fn roll_slot<R: Rng>(player: &Player, offer: &[PowerupId], rng: &mut R) -> Option<PowerupId> {
    let pools = Pools::build(player, offer);

    let special_unlocked =
        player.level >= SPECIAL_UNLOCK_LEVEL && !powerups::special_pool(player).is_empty();
    let augments_available = !powerups::augment_pool(player).is_empty();

    let heal_only = |wanted: PowerupId| -> Vec<PowerupId> {
        pools.heal.iter().copied().filter(|&id| id == wanted).collect()
    };
    let preferred: Vec<PowerupId> = if special_unlocked && rng.random_bool(SPECIAL_CHANCE) {
        pools.special.clone()
    } else if augments_available && rng.random_bool(AUGMENT_CHANCE) {
        pools.augment.clone()
    } else if rng.random_bool(HEAL_FULL_CHANCE) {
        heal_only(PowerupId::HealFull)
    } else if rng.random_bool(HEAL_HALF_CHANCE) {
        heal_only(PowerupId::HealHalf)
    } else {
        pools.normal.clone()
    };

    match draw(&preferred, rng) {
        Some(id) => Some(id),
        None => pools.fallback().and_then(|pool| draw(pool, rng)),
    }
}

/// Build a level-up offer of up to [`OFFER_SIZE`] unique powerups
pub fn build_offer<R: Rng>(player: &Player, rng: &mut R) -> Vec<PowerupId> {
    let mut offer = Vec::with_capacity(OFFER_SIZE);
    for _ in 0..OFFER_SIZE {
        match roll_slot(player, &offer, rng) {
            Some(id) => offer.push(id),
            None => break,
        }
    }
    if offer.len() < OFFER_SIZE {
        log::debug!("Powerup pools exhausted, offering {} options", offer.len());
    }
    offer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::powerups::{Category, grant};
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player_at_level(level: u32) -> Player {
        let mut p = Player::new(Vec2::ZERO);
        p.level = level;
        p
    }

    #[test]
    fn test_offer_has_three_unique() {
        let player = player_at_level(1);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let offer = build_offer(&player, &mut rng);
            assert_eq!(offer.len(), OFFER_SIZE);
            let mut sorted = offer.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), OFFER_SIZE);
        }
    }

    #[test]
    fn test_no_specials_before_unlock_level() {
        let player = player_at_level(9);
        let mut rng = Pcg32::seed_from_u64(2);
        for _ in 0..300 {
            for id in build_offer(&player, &mut rng) {
                assert!(!matches!(id.category(), Category::Special(_)));
            }
        }
    }

    #[test]
    fn test_specials_appear_after_unlock() {
        let player = player_at_level(10);
        let mut rng = Pcg32::seed_from_u64(3);
        let seen = (0..300)
            .flat_map(|_| build_offer(&player, &mut rng))
            .any(|id| matches!(id.category(), Category::Special(_)));
        assert!(seen);
    }

    #[test]
    fn test_heal_rolls_while_normal_pool_open() {
        let player = player_at_level(1);
        assert!(!powerups::normal_pool(&player).is_empty());

        let mut rng = Pcg32::seed_from_u64(5);
        let offers = 2000;
        let (mut full, mut half) = (0usize, 0usize);
        for _ in 0..offers {
            for id in build_offer(&player, &mut rng) {
                match id {
                    PowerupId::HealFull => full += 1,
                    PowerupId::HealHalf => half += 1,
                    _ => {}
                }
            }
        }

        // Per slot: 5% full, then 10% of the remainder half
        let slots = (offers * OFFER_SIZE) as f64;
        let full_rate = full as f64 / slots;
        let half_rate = half as f64 / slots;
        assert!(full_rate > 0.03 && full_rate < 0.07, "full heal rate {full_rate}");
        assert!(half_rate > 0.07 && half_rate < 0.12, "half heal rate {half_rate}");
        assert!(half > full);
    }

    #[test]
    fn test_exhausted_catalog_offers_fewer() {
        let mut player = player_at_level(1);
        for id in powerups::normal_pool(&player) {
            for _ in 0..id.max_level().unwrap_or(1) {
                grant(&mut player, id);
            }
        }
        assert!(powerups::normal_pool(&player).is_empty());

        let mut rng = Pcg32::seed_from_u64(4);
        let offer = build_offer(&player, &mut rng);
        // Only the two heals remain
        assert_eq!(offer.len(), 2);
        assert!(offer.contains(&PowerupId::HealFull));
        assert!(offer.contains(&PowerupId::HealHalf));
    }

    proptest! {
        #[test]
        fn prop_offers_unique_and_eligible(
            seed in any::<u64>(),
            level in 1u32..30,
            granted in proptest::collection::vec(0usize..PowerupId::ALL.len(), 0..40),
        ) {
            let mut player = player_at_level(level);
            for index in granted {
                let id = PowerupId::ALL[index];
                if !powerups::is_at_cap(&player, id) {
                    grant(&mut player, id);
                }
            }

            let mut rng = Pcg32::seed_from_u64(seed);
            let offer = build_offer(&player, &mut rng);
            prop_assert!(offer.len() <= OFFER_SIZE);

            let mut sorted = offer.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), offer.len());

            for id in offer {
                prop_assert!(!powerups::is_at_cap(&player, id));
                match id.category() {
                    Category::Special(power) => {
                        prop_assert!(level >= SPECIAL_UNLOCK_LEVEL);
                        prop_assert!(!power.is_active(&player.stats));
                    }
                    Category::Augment(parent) => prop_assert!(parent.is_active(&player.stats)),
                    _ => {}
                }
            }
        }
    }
}
