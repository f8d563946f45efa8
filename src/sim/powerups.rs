//! Powerup catalog
//!
//! Stateless: every definition is a constant keyed by [`PowerupId`], and the
//! only selection history is `Player::powerup_levels`. Stat powerups add a
//! flat increment and clamp to a ceiling, so applying one past its cap is a
//! no-op.

use serde::{Deserialize, Serialize};

use super::state::{Player, PlayerStats};
use crate::consts::PLAYER_MAX_HEALTH;

/// The special powers a powerup can unlock or augment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialPower {
    Aura,
    Guards,
    Poison,
    Drones,
    Strike,
    Wave,
    Charge,
    Pulse,
}

impl SpecialPower {
    pub const ALL: [SpecialPower; 8] = [
        SpecialPower::Aura,
        SpecialPower::Guards,
        SpecialPower::Poison,
        SpecialPower::Drones,
        SpecialPower::Strike,
        SpecialPower::Wave,
        SpecialPower::Charge,
        SpecialPower::Pulse,
    ];

    pub fn is_active(&self, stats: &PlayerStats) -> bool {
        match self {
            SpecialPower::Aura => stats.aura.active,
            SpecialPower::Guards => stats.guards.active,
            SpecialPower::Poison => stats.poison.active,
            SpecialPower::Drones => stats.drones.active,
            SpecialPower::Strike => stats.strike.active,
            SpecialPower::Wave => stats.wave.active,
            SpecialPower::Charge => stats.charge.active,
            SpecialPower::Pulse => stats.pulse.active,
        }
    }
}

/// Which pool a powerup is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Attack,
    Growth,
    Defense,
    Heal,
    /// Unlocks a special power
    Special(SpecialPower),
    /// Modifies an active special power
    Augment(SpecialPower),
}

/// Stable powerup keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerupId {
    // === Stat powerups ===
    AttackDamage,
    AttackSpeed,
    Penetration,
    ProjectileCount,
    CritChance,
    CritDamage,
    MoveSpeed,
    ExpGain,
    OrbCollectionRange,
    MaxHealth,
    DamageReduction,
    // === Consumables ===
    HealHalf,
    HealFull,
    // === Specials ===
    FireAura,
    ShurikenGuard,
    Poison,
    HomingDrones,
    LightningStrike,
    SonicWave,
    Bomb,
    GuardianPulse,
    // === Augments ===
    FireAuraRadius,
    FireAuraDot,
    FireAuraPulse,
    ShurikenCount,
    ShurikenSpeed,
    ShurikenPenetration,
    PoisonStacks,
    PoisonSpread,
    PoisonEnhance,
    DroneCount,
    DroneVortex,
    StrikeSlow,
    StrikeChain,
    StrikeBonusOrbs,
    WaveFreeze,
    WaveWidth,
    BombMirror,
    BombBlast,
    PulseCooldown,
    PulseRadius,
}

/// Display metadata plus selection rules for one powerup
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerupDefinition {
    pub id: PowerupId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    /// Times it can be taken (`None` for consumables)
    pub max_level: Option<u32>,
}

impl PowerupId {
    pub const ALL: [PowerupId; 41] = [
        PowerupId::AttackDamage,
        PowerupId::AttackSpeed,
        PowerupId::Penetration,
        PowerupId::ProjectileCount,
        PowerupId::CritChance,
        PowerupId::CritDamage,
        PowerupId::MoveSpeed,
        PowerupId::ExpGain,
        PowerupId::OrbCollectionRange,
        PowerupId::MaxHealth,
        PowerupId::DamageReduction,
        PowerupId::HealHalf,
        PowerupId::HealFull,
        PowerupId::FireAura,
        PowerupId::ShurikenGuard,
        PowerupId::Poison,
        PowerupId::HomingDrones,
        PowerupId::LightningStrike,
        PowerupId::SonicWave,
        PowerupId::Bomb,
        PowerupId::GuardianPulse,
        PowerupId::FireAuraRadius,
        PowerupId::FireAuraDot,
        PowerupId::FireAuraPulse,
        PowerupId::ShurikenCount,
        PowerupId::ShurikenSpeed,
        PowerupId::ShurikenPenetration,
        PowerupId::PoisonStacks,
        PowerupId::PoisonSpread,
        PowerupId::PoisonEnhance,
        PowerupId::DroneCount,
        PowerupId::DroneVortex,
        PowerupId::StrikeSlow,
        PowerupId::StrikeChain,
        PowerupId::StrikeBonusOrbs,
        PowerupId::WaveFreeze,
        PowerupId::WaveWidth,
        PowerupId::BombMirror,
        PowerupId::BombBlast,
        PowerupId::PulseCooldown,
        PowerupId::PulseRadius,
    ];

    /// Stable snake_case key
    pub fn key(&self) -> &'static str {
        match self {
            PowerupId::AttackDamage => "attack_damage",
            PowerupId::AttackSpeed => "attack_speed",
            PowerupId::Penetration => "penetration",
            PowerupId::ProjectileCount => "projectile_count",
            PowerupId::CritChance => "crit_chance",
            PowerupId::CritDamage => "crit_damage",
            PowerupId::MoveSpeed => "move_speed",
            PowerupId::ExpGain => "exp_gain",
            PowerupId::OrbCollectionRange => "orb_collection_range",
            PowerupId::MaxHealth => "max_health",
            PowerupId::DamageReduction => "damage_reduction",
            PowerupId::HealHalf => "heal_half",
            PowerupId::HealFull => "heal_full",
            PowerupId::FireAura => "fire_aura",
            PowerupId::ShurikenGuard => "shuriken_guard",
            PowerupId::Poison => "poison",
            PowerupId::HomingDrones => "homing_drones",
            PowerupId::LightningStrike => "lightning_strike",
            PowerupId::SonicWave => "sonic_wave",
            PowerupId::Bomb => "bomb",
            PowerupId::GuardianPulse => "guardian_pulse",
            PowerupId::FireAuraRadius => "fire_aura_radius",
            PowerupId::FireAuraDot => "fire_aura_dot",
            PowerupId::FireAuraPulse => "fire_aura_pulse",
            PowerupId::ShurikenCount => "shuriken_count",
            PowerupId::ShurikenSpeed => "shuriken_speed",
            PowerupId::ShurikenPenetration => "shuriken_penetration",
            PowerupId::PoisonStacks => "poison_stacks",
            PowerupId::PoisonSpread => "poison_spread",
            PowerupId::PoisonEnhance => "poison_enhance",
            PowerupId::DroneCount => "drone_count",
            PowerupId::DroneVortex => "drone_vortex",
            PowerupId::StrikeSlow => "strike_slow",
            PowerupId::StrikeChain => "strike_chain",
            PowerupId::StrikeBonusOrbs => "strike_bonus_orbs",
            PowerupId::WaveFreeze => "wave_freeze",
            PowerupId::WaveWidth => "wave_width",
            PowerupId::BombMirror => "bomb_mirror",
            PowerupId::BombBlast => "bomb_blast",
            PowerupId::PulseCooldown => "pulse_cooldown",
            PowerupId::PulseRadius => "pulse_radius",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.key() == key)
    }

    pub fn category(&self) -> Category {
        use SpecialPower as S;
        match self {
            PowerupId::AttackDamage
            | PowerupId::AttackSpeed
            | PowerupId::Penetration
            | PowerupId::ProjectileCount
            | PowerupId::CritChance
            | PowerupId::CritDamage => Category::Attack,
            PowerupId::MoveSpeed | PowerupId::ExpGain | PowerupId::OrbCollectionRange => {
                Category::Growth
            }
            PowerupId::MaxHealth | PowerupId::DamageReduction => Category::Defense,
            PowerupId::HealHalf | PowerupId::HealFull => Category::Heal,

            PowerupId::FireAura => Category::Special(S::Aura),
            PowerupId::ShurikenGuard => Category::Special(S::Guards),
            PowerupId::Poison => Category::Special(S::Poison),
            PowerupId::HomingDrones => Category::Special(S::Drones),
            PowerupId::LightningStrike => Category::Special(S::Strike),
            PowerupId::SonicWave => Category::Special(S::Wave),
            PowerupId::Bomb => Category::Special(S::Charge),
            PowerupId::GuardianPulse => Category::Special(S::Pulse),

            PowerupId::FireAuraRadius | PowerupId::FireAuraDot | PowerupId::FireAuraPulse => {
                Category::Augment(S::Aura)
            }
            PowerupId::ShurikenCount
            | PowerupId::ShurikenSpeed
            | PowerupId::ShurikenPenetration => Category::Augment(S::Guards),
            PowerupId::PoisonStacks | PowerupId::PoisonSpread | PowerupId::PoisonEnhance => {
                Category::Augment(S::Poison)
            }
            PowerupId::DroneCount | PowerupId::DroneVortex => Category::Augment(S::Drones),
            PowerupId::StrikeSlow | PowerupId::StrikeChain | PowerupId::StrikeBonusOrbs => {
                Category::Augment(S::Strike)
            }
            PowerupId::WaveFreeze | PowerupId::WaveWidth => Category::Augment(S::Wave),
            PowerupId::BombMirror | PowerupId::BombBlast => Category::Augment(S::Charge),
            PowerupId::PulseCooldown | PowerupId::PulseRadius => Category::Augment(S::Pulse),
        }
    }

    /// Level cap (`None` for consumables)
    pub fn max_level(&self) -> Option<u32> {
        let cap = match self {
            PowerupId::HealHalf | PowerupId::HealFull => return None,
            PowerupId::AttackDamage => 5,
            PowerupId::AttackSpeed => 10,
            PowerupId::Penetration => 5,
            PowerupId::ProjectileCount => 5,
            PowerupId::CritChance => 20,
            PowerupId::CritDamage => 10,
            PowerupId::MoveSpeed => 10,
            PowerupId::ExpGain => 8,
            PowerupId::OrbCollectionRange => 10,
            PowerupId::MaxHealth => 10,
            PowerupId::DamageReduction => 10,
            PowerupId::FireAuraRadius
            | PowerupId::ShurikenCount
            | PowerupId::ShurikenSpeed
            | PowerupId::PoisonEnhance
            | PowerupId::WaveWidth
            | PowerupId::BombBlast => 5,
            PowerupId::DroneCount | PowerupId::PulseCooldown | PowerupId::PulseRadius => 4,
            PowerupId::PoisonStacks => 2,
            _ => 1,
        };
        Some(cap)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PowerupId::AttackDamage => "Sharpened Shots",
            PowerupId::AttackSpeed => "Rapid Fire",
            PowerupId::Penetration => "Piercing Rounds",
            PowerupId::ProjectileCount => "Multishot",
            PowerupId::CritChance => "Keen Eye",
            PowerupId::CritDamage => "Deadly Precision",
            PowerupId::MoveSpeed => "Swift Feet",
            PowerupId::ExpGain => "Quick Learner",
            PowerupId::OrbCollectionRange => "Magnetism",
            PowerupId::MaxHealth => "Vitality",
            PowerupId::DamageReduction => "Thick Skin",
            PowerupId::HealHalf => "Bandage",
            PowerupId::HealFull => "Full Recovery",
            PowerupId::FireAura => "Fire Aura",
            PowerupId::ShurikenGuard => "Shuriken Guard",
            PowerupId::Poison => "Poison",
            PowerupId::HomingDrones => "Homing Drones",
            PowerupId::LightningStrike => "Lightning Strike",
            PowerupId::SonicWave => "Sonic Wave",
            PowerupId::Bomb => "Bomb",
            PowerupId::GuardianPulse => "Guardian Pulse",
            PowerupId::FireAuraRadius => "Spreading Flames",
            PowerupId::FireAuraDot => "Searing Heat",
            PowerupId::FireAuraPulse => "Hellfire Pulse",
            PowerupId::ShurikenCount => "Extra Shuriken",
            PowerupId::ShurikenSpeed => "Whirlwind",
            PowerupId::ShurikenPenetration => "Tempered Shuriken",
            PowerupId::PoisonStacks => "Compounding Venom",
            PowerupId::PoisonSpread => "Contagion",
            PowerupId::PoisonEnhance => "Potent Toxin",
            PowerupId::DroneCount => "Drone Bay",
            PowerupId::DroneVortex => "Vortex Core",
            PowerupId::StrikeSlow => "Static Shock",
            PowerupId::StrikeChain => "Chain Lightning",
            PowerupId::StrikeBonusOrbs => "Charged Ground",
            PowerupId::WaveFreeze => "Cryo Wave",
            PowerupId::WaveWidth => "Broad Wave",
            PowerupId::BombMirror => "Mirror Throw",
            PowerupId::BombBlast => "Bigger Boom",
            PowerupId::PulseCooldown => "Steady Heart",
            PowerupId::PulseRadius => "Wide Ward",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PowerupId::AttackDamage => "Projectile damage +20% (max 200%)",
            PowerupId::AttackSpeed => "Attack speed +15% (max 250%)",
            PowerupId::Penetration => "Projectiles pierce one more enemy",
            PowerupId::ProjectileCount => "Fire one more projectile per volley",
            PowerupId::CritChance => "Critical chance +5%",
            PowerupId::CritDamage => "Critical damage +25%",
            PowerupId::MoveSpeed => "Move speed +10%",
            PowerupId::ExpGain => "Experience gain +25%",
            PowerupId::OrbCollectionRange => "Orb pickup range +30%",
            PowerupId::MaxHealth => "Max health +20%, keeping the current health ratio",
            PowerupId::DamageReduction => "Contact damage -5% (max 50%)",
            PowerupId::HealHalf => "Restore 50% of max health",
            PowerupId::HealFull => "Restore all health",
            PowerupId::FireAura => "Burn everything close to you",
            PowerupId::ShurikenGuard => "A shuriken orbits you, cutting what it touches",
            PowerupId::Poison => "Projectiles poison enemies",
            PowerupId::HomingDrones => "Drones hunt down enemies and explode",
            PowerupId::LightningStrike => "Lightning strikes near you at random",
            PowerupId::SonicWave => "A wave rolls out the way you face, slowing all it hits",
            PowerupId::Bomb => "Throw a bomb at the nearest enemy",
            PowerupId::GuardianPulse => "Periodically push back and slow nearby enemies",
            PowerupId::FireAuraRadius => "Aura radius +20%",
            PowerupId::FireAuraDot => "Aura hits burn for 3s (40% aura damage, -10% speed)",
            PowerupId::FireAuraPulse => "Every 5s the aura erupts for 300% damage",
            PowerupId::ShurikenCount => "One more shuriken",
            PowerupId::ShurikenSpeed => "Shuriken orbit +30% faster",
            PowerupId::ShurikenPenetration => "Shuriken pierce enemies at 50% damage",
            PowerupId::PoisonStacks => "Poison stacks one more time",
            PowerupId::PoisonSpread => "Poisoned enemies infect neighbours on death",
            PowerupId::PoisonEnhance => "Poison damage +40% and lasts 1s longer",
            PowerupId::DroneCount => "One more drone in the air",
            PowerupId::DroneVortex => "Drone blasts pull nearby enemies in",
            PowerupId::StrikeSlow => "Lightning slows by 30%",
            PowerupId::StrikeChain => "Lightning may jump to a nearby enemy",
            PowerupId::StrikeBonusOrbs => "Lightning kills drop extra orbs",
            PowerupId::WaveFreeze => "Wave hits may freeze",
            PowerupId::WaveWidth => "Wave half-width +10",
            PowerupId::BombMirror => "Throw a second bomb behind you",
            PowerupId::BombBlast => "Blast radius +15",
            PowerupId::PulseCooldown => "Pulse cooldown -1s",
            PowerupId::PulseRadius => "Pulse radius +30",
        }
    }

    pub fn definition(&self) -> PowerupDefinition {
        PowerupDefinition {
            id: *self,
            name: self.name(),
            description: self.description(),
            category: self.category(),
            max_level: self.max_level(),
        }
    }

    /// Apply the stat change to `player`. Does not touch `powerup_levels`.
    pub fn apply(&self, player: &mut Player) {
        let stats = &mut player.stats;
        match self {
            PowerupId::AttackDamage => stats.attack_damage = add_capped(stats.attack_damage, 0.2, 2.0),
            PowerupId::AttackSpeed => stats.attack_speed = add_capped(stats.attack_speed, 0.15, 2.5),
            PowerupId::Penetration => stats.penetration = (stats.penetration + 1).min(5),
            PowerupId::ProjectileCount => stats.projectile_count = (stats.projectile_count + 1).min(6),
            PowerupId::CritChance => stats.crit_chance = add_capped(stats.crit_chance, 0.05, 1.0),
            PowerupId::CritDamage => stats.crit_damage = add_capped(stats.crit_damage, 0.25, 4.0),
            PowerupId::MoveSpeed => stats.move_speed = add_capped(stats.move_speed, 0.1, 2.0),
            PowerupId::ExpGain => stats.exp_gain = add_capped(stats.exp_gain, 0.25, 3.0),
            PowerupId::OrbCollectionRange => {
                stats.orb_collection_range = add_capped(stats.orb_collection_range, 0.3, 4.0)
            }
            PowerupId::MaxHealth => {
                let multiplier = add_capped(stats.max_health, 0.2, 3.0);
                if multiplier == stats.max_health {
                    return;
                }
                stats.max_health = multiplier;
                let old_max = player.max_health;
                let new_max = (PLAYER_MAX_HEALTH * multiplier).floor();
                player.health = if old_max > 0.0 {
                    (player.health * new_max / old_max).round()
                } else {
                    new_max
                }
                .clamp(0.0, new_max);
                player.max_health = new_max;
            }
            PowerupId::DamageReduction => {
                stats.damage_reduction = add_capped(stats.damage_reduction, 0.05, 0.5)
            }
            PowerupId::HealHalf => player.heal((player.max_health * 0.5).floor()),
            PowerupId::HealFull => player.health = player.max_health,

            PowerupId::FireAura => stats.aura.active = true,
            PowerupId::ShurikenGuard => stats.guards.active = true,
            PowerupId::Poison => stats.poison.active = true,
            PowerupId::HomingDrones => stats.drones.active = true,
            PowerupId::LightningStrike => stats.strike.active = true,
            PowerupId::SonicWave => stats.wave.active = true,
            PowerupId::Bomb => stats.charge.active = true,
            PowerupId::GuardianPulse => stats.pulse.active = true,

            PowerupId::FireAuraRadius => {
                stats.aura.radius_multiplier = add_capped(stats.aura.radius_multiplier, 0.2, 2.0)
            }
            PowerupId::FireAuraDot => stats.aura.burn = true,
            PowerupId::FireAuraPulse => stats.aura.pulse = true,
            PowerupId::ShurikenCount => stats.guards.count = (stats.guards.count + 1).min(6),
            PowerupId::ShurikenSpeed => {
                stats.guards.speed_multiplier = add_capped(stats.guards.speed_multiplier, 0.3, 3.0)
            }
            PowerupId::ShurikenPenetration => stats.guards.penetration = true,
            PowerupId::PoisonStacks => stats.poison.max_stacks = (stats.poison.max_stacks + 1).min(3),
            PowerupId::PoisonSpread => stats.poison.spread = true,
            PowerupId::PoisonEnhance => {
                let base = stats.poison.base_damage;
                stats.poison.damage = add_capped(stats.poison.damage, base * 0.4, base * 3.0);
                stats.poison.duration = add_capped(stats.poison.duration, 1000.0, 8000.0);
            }
            PowerupId::DroneCount => stats.drones.max_drones = (stats.drones.max_drones + 1).min(6),
            PowerupId::DroneVortex => stats.drones.vortex = true,
            PowerupId::StrikeSlow => stats.strike.slow = true,
            PowerupId::StrikeChain => stats.strike.chain = true,
            PowerupId::StrikeBonusOrbs => stats.strike.bonus_orbs = true,
            PowerupId::WaveFreeze => stats.wave.freeze = true,
            PowerupId::WaveWidth => stats.wave.half_width = add_capped(stats.wave.half_width, 10.0, 80.0),
            PowerupId::BombMirror => stats.charge.mirror = true,
            PowerupId::BombBlast => {
                stats.charge.blast_radius = add_capped(stats.charge.blast_radius, 15.0, 145.0)
            }
            PowerupId::PulseCooldown => {
                stats.pulse.interval = (stats.pulse.interval - 1000.0).max(4000.0)
            }
            PowerupId::PulseRadius => stats.pulse.radius = add_capped(stats.pulse.radius, 30.0, 270.0),
        }
    }
}

fn add_capped(value: f32, increment: f32, ceiling: f32) -> f32 {
    (value + increment).min(ceiling)
}

/// Has `player` taken `id` as many times as it allows?
pub fn is_at_cap(player: &Player, id: PowerupId) -> bool {
    match id.max_level() {
        Some(cap) => player.powerup_level(id) >= cap,
        None => false,
    }
}

/// Apply `id` and record it in `powerup_levels`
pub fn grant(player: &mut Player, id: PowerupId) {
    id.apply(player);
    *player.powerup_levels.entry(id).or_insert(0) += 1;
    if let Category::Special(power) = id.category() {
        log::info!("Special power unlocked: {:?}", power);
    }
}

/// Stat powerups (attack, growth, defense) not yet at their cap
pub fn normal_pool(player: &Player) -> Vec<PowerupId> {
    PowerupId::ALL
        .iter()
        .copied()
        .filter(|id| {
            matches!(
                id.category(),
                Category::Attack | Category::Growth | Category::Defense
            )
        })
        .filter(|&id| !is_at_cap(player, id))
        .collect()
}

/// Consumables (never capped)
pub fn heal_pool() -> Vec<PowerupId> {
    vec![PowerupId::HealFull, PowerupId::HealHalf]
}

/// Specials not yet unlocked
pub fn special_pool(player: &Player) -> Vec<PowerupId> {
    PowerupId::ALL
        .iter()
        .copied()
        .filter(|&id| match id.category() {
            Category::Special(power) => !power.is_active(&player.stats) && !is_at_cap(player, id),
            _ => false,
        })
        .collect()
}

/// Augments for every currently active special, excluding capped ones
pub fn augment_pool(player: &Player) -> Vec<PowerupId> {
    PowerupId::ALL
        .iter()
        .copied()
        .filter(|&id| match id.category() {
            Category::Augment(parent) => parent.is_active(&player.stats) && !is_at_cap(player, id),
            _ => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 100.0))
    }

    #[test]
    fn test_keys_round_trip_and_unique() {
        let mut keys: Vec<&str> = PowerupId::ALL.iter().map(|id| id.key()).collect();
        for id in PowerupId::ALL {
            assert_eq!(PowerupId::from_key(id.key()), Some(id));
        }
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), PowerupId::ALL.len());
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&PowerupId::OrbCollectionRange).unwrap();
        assert_eq!(json, "\"orb_collection_range\"");
    }

    #[test]
    fn test_attack_damage_caps_at_two() {
        let mut p = player();
        for _ in 0..20 {
            PowerupId::AttackDamage.apply(&mut p);
        }
        assert!((p.stats.attack_damage - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_health_keeps_ratio() {
        let mut p = player();
        p.health = 50.0;
        PowerupId::MaxHealth.apply(&mut p);
        assert_eq!(p.max_health, 120.0);
        assert_eq!(p.health, 60.0);
    }

    #[test]
    fn test_max_health_at_cap_leaves_health_alone() {
        let mut p = player();
        for _ in 0..10 {
            PowerupId::MaxHealth.apply(&mut p);
        }
        assert_eq!(p.max_health, 300.0);

        for hp in 1..=300 {
            p.health = hp as f32;
            PowerupId::MaxHealth.apply(&mut p);
            assert_eq!(p.health, hp as f32);
            assert_eq!(p.max_health, 300.0);
        }
    }

    #[test]
    fn test_heals() {
        let mut p = player();
        p.health = 10.0;
        PowerupId::HealHalf.apply(&mut p);
        assert_eq!(p.health, 60.0);
        PowerupId::HealHalf.apply(&mut p);
        assert_eq!(p.health, 100.0);
        p.health = 1.0;
        PowerupId::HealFull.apply(&mut p);
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn test_grant_tracks_levels() {
        let mut p = player();
        grant(&mut p, PowerupId::Penetration);
        grant(&mut p, PowerupId::Penetration);
        assert_eq!(p.powerup_level(PowerupId::Penetration), 2);
        assert_eq!(p.stats.penetration, 2);
        assert!(!is_at_cap(&p, PowerupId::Penetration));
    }

    #[test]
    fn test_special_leaves_pool_and_unlocks_augments() {
        let mut p = player();
        assert!(augment_pool(&p).is_empty());
        assert!(special_pool(&p).contains(&PowerupId::Poison));

        grant(&mut p, PowerupId::Poison);
        assert!(!special_pool(&p).contains(&PowerupId::Poison));
        let augments = augment_pool(&p);
        assert_eq!(augments.len(), 3);
        assert!(augments.iter().all(|id| id.category() == Category::Augment(SpecialPower::Poison)));
    }

    #[test]
    fn test_capped_powerup_leaves_normal_pool() {
        let mut p = player();
        for _ in 0..5 {
            grant(&mut p, PowerupId::AttackDamage);
        }
        assert!(!normal_pool(&p).contains(&PowerupId::AttackDamage));
        assert!(normal_pool(&p).contains(&PowerupId::AttackSpeed));
    }

    #[test]
    fn test_poison_enhance_ceiling() {
        let mut p = player();
        for _ in 0..10 {
            PowerupId::PoisonEnhance.apply(&mut p);
        }
        assert!((p.stats.poison.damage - 6.0).abs() < 1e-5);
        assert_eq!(p.stats.poison.duration, 8000.0);
    }

    #[test]
    fn test_pulse_cooldown_floor() {
        let mut p = player();
        for _ in 0..10 {
            PowerupId::PulseCooldown.apply(&mut p);
        }
        assert_eq!(p.stats.pulse.interval, 4000.0);
    }

    proptest! {
        #[test]
        fn prop_stat_ceilings_hold(index in 0usize..PowerupId::ALL.len(), times in 1usize..40) {
            let id = PowerupId::ALL[index];
            let mut p = player();
            for _ in 0..times {
                id.apply(&mut p);
            }
            let s = &p.stats;
            prop_assert!(s.attack_damage <= 2.0 + 1e-6);
            prop_assert!(s.attack_speed <= 2.5 + 1e-6);
            prop_assert!(s.penetration <= 5);
            prop_assert!(s.projectile_count <= 6);
            prop_assert!(s.crit_chance <= 1.0 + 1e-6);
            prop_assert!(s.crit_damage <= 4.0 + 1e-6);
            prop_assert!(s.move_speed <= 2.0 + 1e-6);
            prop_assert!(s.exp_gain <= 3.0 + 1e-6);
            prop_assert!(s.orb_collection_range <= 4.0 + 1e-6);
            prop_assert!(s.max_health <= 3.0 + 1e-6);
            prop_assert!(s.damage_reduction <= 0.5 + 1e-6);
            prop_assert!(s.aura.radius_multiplier <= 2.0 + 1e-6);
            prop_assert!(s.guards.count <= 6);
            prop_assert!(s.poison.max_stacks <= 3);
            prop_assert!(s.drones.max_drones <= 6);
            prop_assert!(s.wave.half_width <= 80.0);
            prop_assert!(s.charge.blast_radius <= 145.0);
            prop_assert!(s.pulse.interval >= 4000.0);
            prop_assert!(s.pulse.radius <= 270.0);
            prop_assert!(p.health >= 0.0 && p.health <= p.max_health);
        }

        #[test]
        fn prop_over_cap_application_is_idempotent(
            index in 0usize..PowerupId::ALL.len(),
            health_fraction in 0.0f32..=1.0,
        ) {
            let id = PowerupId::ALL[index];
            let mut p = player();
            for _ in 0..60 {
                id.apply(&mut p);
            }
            p.health = (p.max_health * health_fraction).floor();
            let before = serde_json::to_string(&p.stats).unwrap();
            let (health, max_health) = (p.health, p.max_health);
            id.apply(&mut p);
            let after = serde_json::to_string(&p.stats).unwrap();
            prop_assert_eq!(before, after);
            prop_assert_eq!(p.max_health, max_health);
            // Heals are consumables with no cap; everything else leaves health alone
            if id.max_level().is_some() {
                prop_assert_eq!(p.health, health);
            }
        }
    }
}
