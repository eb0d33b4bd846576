//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, no internal timing
//! - Seeded RNG only
//! - No rendering or terminal dependencies

pub mod collision;
pub mod engine;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Contact, overlaps_player, resolve_collisions};
pub use engine::{Command, Engine};
pub use state::{
    ActiveEffects, Entity, EntityKind, EventLog, GameEvent, GamePhase, GameState, MAX_PENDING_EVENTS,
    Player,
};
pub use tick::tick;
