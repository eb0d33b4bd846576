//! Wilson's Revenge - a three-lane terminal endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, collisions, timers)
//! - `tuning`: Data-driven game balance
//! - `ui`: Terminal frame composition (read-only view of the simulation)

pub mod sim;
pub mod tuning;
pub mod ui;

pub use sim::{Command, Engine, EntityKind, GameEvent, GamePhase, GameState};
pub use tuning::{Tuning, TuningError};

/// Front-end constants that are not part of game balance
pub mod consts {
    /// Wall-clock period between simulation frames (25 Hz)
    pub const FRAME_MILLIS: u64 = 40;

    /// Rows of sky above the background strip
    pub const SKY_HEIGHT: usize = 6;
    /// Rows of the parallax background strip
    pub const BACKGROUND_HEIGHT: usize = 5;
    /// Rows per lane (three sprite rows plus the ground line)
    pub const LANE_HEIGHT: usize = 4;

    /// Environment variable naming an optional tuning override file
    pub const TUNING_ENV: &str = "WILSON_TUNING";
    /// Environment variable fixing the run seed
    pub const SEED_ENV: &str = "WILSON_SEED";
}
