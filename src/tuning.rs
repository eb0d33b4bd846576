//! Game balance configuration
//!
//! Every tunable constant of the simulation lives in [`Tuning`]. An engine
//! takes its own copy at construction and never mutates it, so several
//! engines with different balance can coexist in one process.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::EntityKind;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance parameters for the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    /// Number of lanes the player can occupy
    pub lanes: usize,
    /// Spawn edge; new entities appear at this x
    pub game_width: f32,
    /// Fixed horizontal position of the player
    pub player_x: f32,
    /// Entities at or left of this x are pruned
    pub trailing_bound: f32,
    /// Background scroll as a fraction of the global speed
    pub parallax: f32,

    // === Speed ===
    pub initial_speed: f32,
    pub max_speed: f32,
    /// Speed added on each ramp step
    pub speed_step: f32,
    /// Frames between ramp steps
    pub speed_up_interval: u64,

    // === Scoring ===
    /// Awarded when a hazard scrolls off the trailing edge
    pub pass_bonus: u64,
    /// Awarded when a shot removes a hazard
    pub shot_bonus: u64,
    /// Subtracted (saturating) when a power-down is collected
    pub power_down_penalty: u64,

    // === Items and timers ===
    pub gun_ammo: u32,
    pub ammo_pickup: u32,
    /// Invincibility and double-score duration after a power-up
    pub power_up_ticks: u32,
    pub jump_ticks: u32,
    pub shoot_ticks: u32,

    // === Hitboxes ===
    pub hitbox: f32,
    pub car_hitbox: f32,

    // === Spawning ===
    pub spawn_interval_base: f32,
    pub spawn_interval_per_speed: f32,
    pub spawn_interval_floor: u64,
    pub lane_buffer_base: f32,
    pub lane_buffer_per_speed: f32,
    pub lane_buffer_floor: f32,
    /// Speed at which a second lane may spawn on the same tick
    pub double_spawn_speed: f32,
    /// Chance of a second lane once max speed is reached
    pub double_spawn_max_chance: f64,
    /// Speed modifier carried by every car
    pub car_speed: f32,
    /// Upper bound of the enemy speed modifier at initial speed
    pub enemy_speed_spread: f32,
    pub tree_interval: u64,
    pub tree_chance: f64,
    /// Outcome probabilities for a lane spawn
    pub odds: SpawnOdds,
}

/// Width of each outcome band for a spawn roll
///
/// Hazard widths move by their `*_shift` as the speed ramp progresses from
/// initial to max speed. Bands are laid out in declaration order; a roll past
/// the last band spawns nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnOdds {
    pub obstacle: f64,
    pub obstacle_shift: f64,
    pub car: f64,
    pub car_shift: f64,
    pub enemy: f64,
    pub enemy_shift: f64,
    pub gun: f64,
    pub ammo: f64,
    pub power_up: f64,
    pub power_down: f64,
    pub disable_jump: f64,
    pub enable_jump: f64,
}

impl Default for SpawnOdds {
    fn default() -> Self {
        Self {
            obstacle: 0.40,
            obstacle_shift: -0.10,
            car: 0.20,
            car_shift: 0.05,
            enemy: 0.15,
            enemy_shift: 0.05,
            gun: 0.05,
            ammo: 0.07,
            power_up: 0.03,
            power_down: 0.03,
            disable_jump: 0.02,
            enable_jump: 0.02,
        }
    }
}

impl SpawnOdds {
    /// Band widths at the given ramp progress, in roll order
    pub fn bands(&self, progress: f64) -> [(EntityKind, f64); 9] {
        let t = progress.clamp(0.0, 1.0);
        [
            (EntityKind::Obstacle, self.obstacle + self.obstacle_shift * t),
            (EntityKind::Car, self.car + self.car_shift * t),
            (EntityKind::Enemy, self.enemy + self.enemy_shift * t),
            (EntityKind::Gun, self.gun),
            (EntityKind::Ammo, self.ammo),
            (EntityKind::PowerUp, self.power_up),
            (EntityKind::PowerDown, self.power_down),
            (EntityKind::DisableJump, self.disable_jump),
            (EntityKind::EnableJump, self.enable_jump),
        ]
    }

    fn validate(&self) -> Result<(), TuningError> {
        for t in [0.0, 1.0] {
            let bands = self.bands(t);
            if bands.iter().any(|(_, w)| *w < 0.0) {
                return Err(TuningError::Invalid {
                    field: "odds",
                    reason: "band widths must not be negative",
                });
            }
            let total: f64 = bands.iter().map(|(_, w)| w).sum();
            if total > 1.0 + 1e-9 {
                return Err(TuningError::Invalid {
                    field: "odds",
                    reason: "band widths must not sum past 1",
                });
            }
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lanes: 3,
            game_width: 80.0,
            player_x: 8.0,
            trailing_bound: -15.0,
            parallax: 0.3,

            initial_speed: 0.6,
            max_speed: 3.5,
            speed_step: 0.025,
            speed_up_interval: 40,

            pass_bonus: 10,
            shot_bonus: 25,
            power_down_penalty: 100,

            gun_ammo: 5,
            ammo_pickup: 3,
            power_up_ticks: 125, // 5 seconds at 40 ms per frame
            jump_ticks: 15,
            shoot_ticks: 5,

            hitbox: 3.0,
            car_hitbox: 6.0,

            spawn_interval_base: 18.0,
            spawn_interval_per_speed: 3.0,
            spawn_interval_floor: 6,
            lane_buffer_base: 40.0,
            lane_buffer_per_speed: 5.0,
            lane_buffer_floor: 20.0,
            double_spawn_speed: 1.5,
            double_spawn_max_chance: 0.5,
            car_speed: 0.5,
            enemy_speed_spread: 0.3,
            tree_interval: 40,
            tree_chance: 0.3,
            odds: SpawnOdds::default(),
        }
    }
}

impl Tuning {
    /// Parse a JSON tuning document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.lanes == 0 {
            return invalid("lanes", "must be at least 1");
        }
        if self.game_width <= self.player_x {
            return invalid("game_width", "must lie ahead of player_x");
        }
        if self.trailing_bound >= 0.0 {
            return invalid("trailing_bound", "must be negative");
        }
        if self.initial_speed <= 0.0 {
            return invalid("initial_speed", "must be positive");
        }
        if self.max_speed < self.initial_speed {
            return invalid("max_speed", "must not be below initial_speed");
        }
        if self.speed_step < 0.0 {
            return invalid("speed_step", "must not be negative");
        }
        if self.speed_up_interval == 0 || self.tree_interval == 0 {
            return invalid("interval", "frame intervals must be at least 1");
        }
        if self.spawn_interval_floor == 0
            || self.spawn_interval_floor as f32 > self.spawn_interval_base
        {
            return invalid("spawn_interval_floor", "must lie in [1, spawn_interval_base]");
        }
        if self.lane_buffer_floor < 0.0 || self.lane_buffer_floor > self.lane_buffer_base {
            return invalid("lane_buffer_floor", "must lie in [0, lane_buffer_base]");
        }
        if self.hitbox <= 0.0 || self.car_hitbox <= 0.0 {
            return invalid("hitbox", "widths must be positive");
        }
        if !(0.0..=1.0).contains(&self.tree_chance)
            || !(0.0..=1.0).contains(&self.double_spawn_max_chance)
        {
            return invalid("chance", "probabilities must lie in [0, 1]");
        }
        if self.car_speed < 0.0 || self.enemy_speed_spread < 0.0 {
            return invalid("speed modifier", "must not be negative");
        }
        self.odds.validate()
    }

    /// Progress of the difficulty ramp in [0, 1]
    pub fn speed_progress(&self, speed: f32) -> f32 {
        let span = self.max_speed - self.initial_speed;
        if span <= 0.0 {
            return 1.0;
        }
        ((speed - self.initial_speed) / span).clamp(0.0, 1.0)
    }

    /// Hitbox width for an entity kind
    pub fn hitbox_for(&self, kind: EntityKind) -> f32 {
        if kind == EntityKind::Car {
            self.car_hitbox
        } else {
            self.hitbox
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "lanes": 4, "max_speed": 2.0 }"#).unwrap();
        assert_eq!(tuning.lanes, 4);
        assert_eq!(tuning.max_speed, 2.0);
        assert_eq!(tuning.gun_ammo, Tuning::default().gun_ammo);
    }

    #[test]
    fn test_rejects_zero_lanes() {
        let err = Tuning::from_json(r#"{ "lanes": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "lanes", .. }));
    }

    #[test]
    fn test_rejects_cap_below_initial_speed() {
        let err = Tuning::from_json(r#"{ "max_speed": 0.1 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "max_speed", .. }));
    }

    #[test]
    fn test_rejects_overfull_odds() {
        let err = Tuning::from_json(r#"{ "odds": { "obstacle": 0.9 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { field: "odds", .. }));
    }

    #[test]
    fn test_hazard_band_is_constant_across_ramp() {
        let odds = SpawnOdds::default();
        let hazard = |t| -> f64 { odds.bands(t)[..3].iter().map(|(_, w)| w).sum() };
        assert!((hazard(0.0) - 0.75).abs() < 1e-9);
        assert!((hazard(1.0) - 0.75).abs() < 1e-9);
        // Cars and enemies become relatively more likely
        assert!(odds.bands(1.0)[1].1 > odds.bands(0.0)[1].1);
        assert!(odds.bands(1.0)[0].1 < odds.bands(0.0)[0].1);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ lanes: 3"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/nonexistent/wilson/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_speed_progress_clamped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.speed_progress(tuning.initial_speed), 0.0);
        assert_eq!(tuning.speed_progress(tuning.max_speed), 1.0);
        assert_eq!(tuning.speed_progress(100.0), 1.0);
    }
}
