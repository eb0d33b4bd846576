//! Collision detection and response
//!
//! The player occupies a fixed column; an entity collides when it shares the
//! player's lane and its x falls inside the player's hitbox window. Cars are
//! longer than everything else, so their window is wider.

use super::state::{Entity, EntityKind, EventLog, GameEvent, GameState};
use crate::tuning::Tuning;

/// What a single contact does to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Hazard hit while grounded and vulnerable
    Fatal,
    /// Hazard hit while airborne or invincible; the entity stays
    Evaded,
    /// Item picked up; the entity is consumed
    Collected,
}

/// Check whether an entity overlaps the player's hitbox
pub fn overlaps_player(entity: &Entity, lane: usize, tuning: &Tuning) -> bool {
    if entity.lane != lane || entity.kind == EntityKind::Tree {
        return false;
    }
    let width = tuning.hitbox_for(entity.kind);
    entity.x >= tuning.player_x - 1.0 && entity.x <= tuning.player_x + width
}

/// Apply the effect of touching `kind` and report what happened
pub fn apply_contact(state: &mut GameState, tuning: &Tuning, kind: EntityKind) -> Contact {
    if kind.is_hazard() {
        if state.player.is_jumping() || state.effects.is_invincible() {
            return Contact::Evaded;
        }
        return Contact::Fatal;
    }

    match kind {
        EntityKind::Gun => {
            state.player.has_gun = true;
            state.player.ammo += tuning.gun_ammo;
        }
        EntityKind::Ammo => state.player.ammo += tuning.ammo_pickup,
        EntityKind::PowerUp => {
            state.effects.invincible_ticks = tuning.power_up_ticks;
            state.effects.double_score_ticks = tuning.power_up_ticks;
        }
        EntityKind::PowerDown => {
            state.score = state.score.saturating_sub(tuning.power_down_penalty);
        }
        EntityKind::DisableJump => state.player.jump_disabled = true,
        EntityKind::EnableJump => state.player.jump_disabled = false,
        _ => {}
    }
    Contact::Collected
}

/// Resolve every contact in the player's lane for this frame
///
/// Consumed indices are gathered during the scan and removed afterwards, so
/// no entity is skipped or visited twice. Returns true if the run ended.
pub fn resolve_collisions(state: &mut GameState, tuning: &Tuning, events: &mut EventLog) -> bool {
    let lane = state.player.lane;
    let touching: Vec<(usize, EntityKind)> = state
        .objects
        .iter()
        .enumerate()
        .filter(|(_, obj)| overlaps_player(obj, lane, tuning))
        .map(|(i, obj)| (i, obj.kind))
        .collect();

    let mut consumed: Vec<usize> = Vec::new();
    let mut fatal = false;

    for (index, kind) in touching {
        match apply_contact(state, tuning, kind) {
            Contact::Fatal => {
                if !fatal {
                    events.push(GameEvent::Crashed { kind });
                }
                fatal = true;
            }
            Contact::Evaded => {}
            Contact::Collected => {
                log::debug!("Collected {:?} (ammo {})", kind, state.player.ammo);
                events.push(GameEvent::Collected { kind });
                consumed.push(index);
            }
        }
    }

    if !consumed.is_empty() {
        let mut index = 0;
        state.objects.retain(|_| {
            let keep = !consumed.contains(&index);
            index += 1;
            keep
        });
    }

    fatal
}
