//! Game state and core simulation types
//!
//! Everything the frame loop mutates lives here. The simulation is the only
//! writer; renderers and HUDs read through the accessors.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::attack::Projectile;
use super::powerups::PowerupId;
use super::progression::{self, LevelUpSession};
use super::spawner::Spawner;
use super::specials::{
    AuraStats, ChargeStats, DroneStats, GuardStats, PoisonStats, PulseStats, Specials,
    StrikeStats, WaveStats,
};
use super::status::StatusEffects;
use crate::consts::*;
use crate::settings::Settings;
use crate::{circles_overlap, frame_scale};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start trigger
    Start,
    /// Active gameplay
    Playing,
    /// Hard pause while a powerup offer is open
    LevelUp,
    /// Run ended
    GameOver,
}

impl GamePhase {
    /// Legal transitions. Restart (any phase -> Playing) goes through `GameState::restart`.
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        matches!(
            (self, next),
            (GamePhase::Start, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::LevelUp)
                | (GamePhase::LevelUp, GamePhase::Playing)
                | (GamePhase::Playing, GamePhase::GameOver)
                | (GamePhase::GameOver, GamePhase::Playing)
        )
    }
}

/// Keyboard snapshot written by the input collaborator before each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Movement direction (diagonals normalized, opposing keys cancel)
    pub fn direction(&self) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        dir.normalize_or_zero()
    }
}

/// Player stat modifiers. Each special power has its own sub-record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    // === Attack ===
    /// Projectile damage multiplier
    pub attack_damage: f32,
    /// Attack rate multiplier (interval = base / attack_speed)
    pub attack_speed: f32,
    /// Extra enemies a projectile passes through
    pub penetration: u32,
    pub projectile_count: u32,
    pub crit_chance: f32,
    pub crit_damage: f32,

    // === Movement ===
    pub move_speed: f32,

    // === Growth ===
    pub exp_gain: f32,
    pub orb_collection_range: f32,

    // === Defense ===
    /// Max health multiplier over the base 100
    pub max_health: f32,
    /// Fraction of contact damage ignored (0.0 - 0.5)
    pub damage_reduction: f32,

    // === Special powers ===
    pub aura: AuraStats,
    pub guards: GuardStats,
    pub poison: PoisonStats,
    pub drones: DroneStats,
    pub strike: StrikeStats,
    pub wave: WaveStats,
    pub charge: ChargeStats,
    pub pulse: PulseStats,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            attack_damage: 1.0,
            attack_speed: 1.0,
            penetration: 0,
            projectile_count: 1,
            crit_chance: 0.0,
            crit_damage: 1.5,

            move_speed: 1.0,

            exp_gain: 1.0,
            orb_collection_range: 1.0,

            max_health: 1.0,
            damage_reduction: 0.0,

            aura: AuraStats::default(),
            guards: GuardStats::default(),
            poison: PoisonStats::default(),
            drones: DroneStats::default(),
            strike: StrikeStats::default(),
            wave: WaveStats::default(),
            charge: ChargeStats::default(),
            pulse: PulseStats::default(),
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub base_speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    pub stats: PlayerStats,
    /// Times each powerup has been taken
    pub powerup_levels: BTreeMap<PowerupId, u32>,
    /// Last non-zero movement direction
    pub facing: Vec2,
    /// Remaining contact-damage immunity (ms)
    pub invincible_ms: f32,
    /// Temporary movement boost (ms remaining, multiplier)
    pub speed_boost_ms: f32,
    pub speed_boost_multiplier: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            base_speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            level: 1,
            exp: 0,
            exp_to_next: progression::exp_threshold(1),
            stats: PlayerStats::default(),
            powerup_levels: BTreeMap::new(),
            facing: Vec2::X,
            invincible_ms: 0.0,
            speed_boost_ms: 0.0,
            speed_boost_multiplier: 1.0,
        }
    }

    pub fn powerup_level(&self, id: PowerupId) -> u32 {
        self.powerup_levels.get(&id).copied().unwrap_or(0)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ms > 0.0
    }

    /// Effective movement speed per reference frame
    pub fn current_speed(&self) -> f32 {
        let boost = if self.speed_boost_ms > 0.0 {
            self.speed_boost_multiplier
        } else {
            1.0
        };
        self.base_speed * self.stats.move_speed * boost
    }

    /// Move according to the key snapshot, clamped to the world
    pub fn advance(&mut self, keys: &KeyState, dt: f32, world: Vec2) {
        let dir = keys.direction();
        if dir != Vec2::ZERO {
            self.facing = dir;
        }
        self.pos += dir * self.current_speed() * frame_scale(dt);
        self.pos = self
            .pos
            .clamp(Vec2::splat(self.radius), world - Vec2::splat(self.radius));
    }

    /// Count down invincibility and speed boost
    pub fn tick_timers(&mut self, dt: f32) {
        if self.invincible_ms > 0.0 {
            self.invincible_ms = (self.invincible_ms - dt).max(0.0);
        }
        if self.speed_boost_ms > 0.0 {
            self.speed_boost_ms = (self.speed_boost_ms - dt).max(0.0);
            if self.speed_boost_ms == 0.0 {
                self.speed_boost_multiplier = 1.0;
            }
        }
    }

    /// Grant (or refresh) a temporary speed boost
    pub fn apply_speed_boost(&mut self, multiplier: f32, duration_ms: f32) {
        self.speed_boost_multiplier = self.speed_boost_multiplier.max(multiplier);
        self.speed_boost_ms = self.speed_boost_ms.max(duration_ms);
    }

    /// Apply contact damage after reduction. Returns damage dealt.
    pub fn take_contact_damage(&mut self, base: f32) -> f32 {
        let damage = (base * (1.0 - self.stats.damage_reduction)).floor().max(0.0);
        self.health = (self.health - damage).clamp(0.0, self.max_health);
        self.invincible_ms = PLAYER_INVINCIBLE_MS;
        damage
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    Strong,
}

impl EnemyKind {
    pub fn radius(&self) -> f32 {
        match self {
            EnemyKind::Normal => ENEMY_BASE_RADIUS,
            EnemyKind::Fast => ENEMY_BASE_RADIUS * 0.8,
            EnemyKind::Strong => ENEMY_BASE_RADIUS * 1.2,
        }
    }

    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Normal => ENEMY_BASE_SPEED,
            EnemyKind::Fast => ENEMY_BASE_SPEED * 1.5,
            EnemyKind::Strong => ENEMY_BASE_SPEED * 0.7,
        }
    }

    /// Health for this kind given the scheduler's current enemy health
    pub fn health(&self, base_health: f32) -> f32 {
        match self {
            EnemyKind::Normal => base_health,
            EnemyKind::Fast => (base_health * 0.5).floor().max(1.0),
            EnemyKind::Strong => base_health * 4.0,
        }
    }

    pub fn orb_drop_count(&self) -> u32 {
        match self {
            EnemyKind::Normal => 1,
            EnemyKind::Fast => 3,
            EnemyKind::Strong => 10,
        }
    }
}

/// A pursuing enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub exp_value: u32,
    pub orb_drop_count: u32,
    pub status: StatusEffects,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, base_health: f32) -> Self {
        let health = kind.health(base_health);
        Self {
            id,
            kind,
            pos,
            radius: kind.radius(),
            speed: kind.speed(),
            health,
            max_health: health,
            exp_value: EXP_BASE_VALUE,
            orb_drop_count: kind.orb_drop_count(),
            status: StatusEffects::default(),
        }
    }

    /// Step toward `target`, honouring status-effect speed multipliers
    pub fn advance(&mut self, target: Vec2, dt: f32) {
        let dir = (target - self.pos).normalize_or_zero();
        self.pos += dir * self.speed * self.status.speed_multiplier() * frame_scale(dt);
    }

    pub fn collides(&self, point: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.radius, point, radius)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Experience pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceOrb {
    pub pos: Vec2,
    pub value: u32,
    pub radius: f32,
    /// Magnetized toward the player
    pub attracted: bool,
}

impl ExperienceOrb {
    pub fn new(pos: Vec2, value: u32) -> Self {
        Self {
            pos,
            value,
            radius: ORB_RADIUS,
            attracted: false,
        }
    }

    /// Start attraction once inside `collect_range`, then accelerate toward the player
    pub fn advance(&mut self, player_pos: Vec2, collect_range: f32, dt: f32) {
        let to_player = player_pos - self.pos;
        let distance = to_player.length();

        if distance < collect_range {
            self.attracted = true;
        }

        if self.attracted && distance > 0.0 {
            let closeness = if collect_range > 0.0 {
                ((collect_range - distance) / collect_range).max(0.0)
            } else {
                0.0
            };
            let step = (ORB_SPEED * (1.0 + closeness) * frame_scale(dt)).min(distance);
            self.pos += to_player / distance * step;
        }
    }

    pub fn touches(&self, point: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.radius, point, radius)
    }
}

/// Viewport camera (top-left corner in world space)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            pos: Vec2::ZERO,
            viewport,
        }
    }

    /// Center on `target`, clamped so the viewport stays inside the world
    pub fn recenter(&mut self, target: Vec2, world: Vec2) {
        let max = (world - self.viewport).max(Vec2::ZERO);
        self.pos = (target - self.viewport / 2.0).clamp(Vec2::ZERO, max);
    }

    /// Outside the viewport by more than `margin`
    pub fn is_offscreen(&self, point: Vec2, margin: f32) -> bool {
        let screen = point - self.pos;
        screen.x < -margin
            || screen.x > self.viewport.x + margin
            || screen.y < -margin
            || screen.y > self.viewport.y + margin
    }
}

/// Things that happened this frame, for renderers/HUD/audio to consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled { id: u32, pos: Vec2 },
    PlayerHit { damage: f32 },
    LevelUp { level: u32 },
    PowerupApplied { id: PowerupId },
    AuraPulse { pos: Vec2, radius: f32 },
    StrikeLanded { pos: Vec2, radius: f32, crit: bool },
    ChainStrike { from: Vec2, to: Vec2 },
    DroneDetonated { pos: Vec2 },
    ChargeDetonated { pos: Vec2, radius: f32 },
    GuardianPulse { pos: Vec2, radius: f32 },
    GameOver,
}

/// Final numbers of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub phase: GamePhase,
    pub elapsed_ms: f32,
    pub level: u32,
    pub kills: u32,
    pub health: f32,
    pub max_health: f32,
    pub enemies_alive: usize,
    pub powerup_levels: BTreeMap<PowerupId, u32>,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Authoritative simulation time (ms), advanced only while playing
    pub game_time_ms: f32,
    pub player: Player,
    pub camera: Camera,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub orbs: Vec<ExperienceOrb>,
    pub specials: Specials,
    pub spawner: Spawner,
    /// Time since the last auto-attack (ms)
    pub attack_timer: f32,
    pub kills: u32,
    /// Open powerup offer while in LevelUp
    pub levelup: Option<LevelUpSession>,
    /// Events emitted during the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game in the Start phase
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
        let world = Vec2::new(settings.world_width, settings.world_height);
        let viewport = Vec2::new(settings.viewport_width, settings.viewport_height);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings: settings.clone(),
            phase: GamePhase::Start,
            game_time_ms: 0.0,
            player: Player::new(world / 2.0),
            camera: Camera::new(viewport),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            orbs: Vec::new(),
            specials: Specials::default(),
            spawner: Spawner::new(settings.preset),
            attack_timer: 0.0,
            kills: 0,
            levelup: None,
            events: Vec::new(),
            next_id: 1,
        };
        state.camera.recenter(state.player.pos, world);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.settings.world_width, self.settings.world_height)
    }

    /// Reset player, pools and timers (RNG keeps running) and enter the given phase
    fn reset_run(&mut self) {
        let world = self.world_size();
        self.player = Player::new(world / 2.0);
        self.camera.recenter(self.player.pos, world);
        self.enemies.clear();
        self.projectiles.clear();
        self.orbs.clear();
        self.specials = Specials::default();
        self.spawner = Spawner::new(self.settings.preset);
        self.attack_timer = 0.0;
        self.kills = 0;
        self.game_time_ms = 0.0;
        self.levelup = None;
        self.events.clear();
    }

    /// Start trigger: Start -> Playing
    pub fn start(&mut self) {
        if self.phase != GamePhase::Start {
            log::warn!("start() ignored in phase {:?}; use restart()", self.phase);
            return;
        }
        self.reset_run();
        self.phase = GamePhase::Playing;
        log::info!("Run started (seed {})", self.seed);
    }

    /// Restart trigger: reinitialize all pools from any phase
    pub fn restart(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        log::info!("Run restarted (seed {})", self.seed);
    }

    /// Move to `next` if the transition table allows it
    pub fn transition(&mut self, next: GamePhase) -> bool {
        if self.phase.can_transition_to(next) {
            self.phase = next;
            true
        } else {
            log::warn!("Illegal phase transition {:?} -> {:?}", self.phase, next);
            false
        }
    }

    /// Apply the offer at `index` and resume play. False when no offer is open
    /// or the index is out of range.
    pub fn select_powerup(&mut self, index: usize) -> bool {
        progression::select_powerup(self, index).is_some()
    }

    // === Read-only accessors ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn orbs(&self) -> &[ExperienceOrb] {
        &self.orbs
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.game_time_ms
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn levelup_offer(&self) -> Option<&[PowerupId]> {
        self.levelup.as_ref().map(|session| session.options.as_slice())
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            phase: self.phase,
            elapsed_ms: self.game_time_ms,
            level: self.player.level,
            kills: self.kills,
            health: self.player.health,
            max_health: self.player.max_health,
            enemies_alive: self.enemies.len(),
            powerup_levels: self.player.powerup_levels.clone(),
        }
    }

    /// Insert an enemy (used by the spawner and tests)
    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2, base_health: f32) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, kind, pos, base_health));
        id
    }

    pub fn enemy_index(&self, id: u32) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }
}
