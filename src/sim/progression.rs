//! Experience, levels and the level-up pause

use serde::{Deserialize, Serialize};

use super::powerups::{self, PowerupId};
use super::selector;
use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::consts::{EXP_BASE_THRESHOLD, EXP_GROWTH};

/// Offer shown while the game is paused in `GamePhase::LevelUp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpSession {
    pub options: Vec<PowerupId>,
}

/// Experience needed to leave `level`: `floor(10 * 1.15^(level - 1))`, at least 1
pub fn exp_threshold(level: u32) -> u32 {
    let exponent = level.saturating_sub(1) as i32;
    let threshold = (EXP_BASE_THRESHOLD * EXP_GROWTH.powi(exponent)).floor();
    if threshold.is_finite() && threshold >= 1.0 {
        threshold as u32
    } else {
        1
    }
}

/// Add an orb's value scaled by `exp_gain` (floored)
pub fn gain_exp(player: &mut Player, value: u32) -> u32 {
    let gained = (value as f32 * player.stats.exp_gain).floor().max(0.0) as u32;
    player.exp = player.exp.saturating_add(gained);
    gained
}

/// Level up once if the threshold is reached, opening an offer.
///
/// Returns true when the game entered `LevelUp`. An empty offer still grants
/// the level but leaves the game playing.
pub fn check_level_up(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    let player = &mut state.player;
    if player.exp < player.exp_to_next {
        return false;
    }

    player.exp -= player.exp_to_next;
    player.level += 1;
    player.exp_to_next = exp_threshold(player.level);
    let level = player.level;
    log::info!("Level up! Now level {} (next at {} exp)", level, player.exp_to_next);
    state.events.push(GameEvent::LevelUp { level });

    let options = selector::build_offer(&state.player, &mut state.rng);
    if options.is_empty() {
        log::warn!("No powerups left to offer at level {}", level);
        return false;
    }

    state.levelup = Some(LevelUpSession { options });
    state.transition(GamePhase::LevelUp)
}

/// Apply offer slot `index`, resume play, and re-check for a pending level-up
pub fn select_powerup(state: &mut GameState, index: usize) -> Option<PowerupId> {
    if state.phase != GamePhase::LevelUp {
        log::warn!("Powerup selection ignored in phase {:?}", state.phase);
        return None;
    }
    let Some(id) = state
        .levelup
        .as_ref()
        .and_then(|session| session.options.get(index).copied())
    else {
        log::warn!("Powerup index {} out of range", index);
        return None;
    };

    powerups::grant(&mut state.player, id);
    log::info!("Powerup selected: {} ({})", id.name(), id.key());
    state.events.push(GameEvent::PowerupApplied { id });
    state.levelup = None;
    state.transition(GamePhase::Playing);

    check_level_up(state);
    Some(id)
}
