//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives in [`GameState`].

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the start command
    #[default]
    Title,
    /// Active gameplay
    Running,
    /// Frozen until pause is toggled again
    Paused,
    /// Run ended; only restart does anything
    GameOver,
}

/// Entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Gun,
    Ammo,
    /// Background decoration, never collides
    Tree,
    Car,
    Enemy,
    /// Invincibility plus double score
    PowerUp,
    /// Score penalty
    PowerDown,
    DisableJump,
    EnableJump,
}

impl EntityKind {
    /// Hazards end the run on contact and pay out when passed or shot
    pub fn is_hazard(self) -> bool {
        matches!(self, EntityKind::Obstacle | EntityKind::Car | EntityKind::Enemy)
    }

    /// Items are consumed on contact
    pub fn is_item(self) -> bool {
        !self.is_hazard() && self != EntityKind::Tree
    }
}

/// A scrolling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Lane index (meaningless for trees)
    pub lane: usize,
    /// Horizontal offset, decreasing every frame
    pub x: f32,
    /// Added to the global speed to get this entity's displacement
    pub speed: f32,
}

impl Entity {
    pub fn new(kind: EntityKind, lane: usize, x: f32) -> Self {
        Self {
            kind,
            lane,
            x,
            speed: 0.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub lane: usize,
    /// Frames of airtime left (0 = on the ground)
    pub jump_ticks: u32,
    pub jump_disabled: bool,
    pub has_gun: bool,
    pub ammo: u32,
    /// Frames left in the muzzle-flash window (0 = ready)
    pub shoot_ticks: u32,
}

impl Player {
    fn new(lanes: usize) -> Self {
        Self {
            lane: lanes / 2,
            jump_ticks: 0,
            jump_disabled: false,
            has_gun: false,
            ammo: 0,
            shoot_ticks: 0,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.jump_ticks > 0
    }

    pub fn is_shooting(&self) -> bool {
        self.shoot_ticks > 0
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub invincible_ticks: u32,
    pub double_score_ticks: u32,
}

impl ActiveEffects {
    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn is_double_score(&self) -> bool {
        self.double_score_ticks > 0
    }

    /// Apply the score multiplier to a base award
    pub fn award(&self, base: u64) -> u64 {
        if self.is_double_score() { base * 2 } else { base }
    }
}

/// Something worth telling the front end about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Restarted,
    Paused,
    Resumed,
    HazardPassed { kind: EntityKind, points: u64 },
    Crashed { kind: EntityKind },
    Collected { kind: EntityKind },
    ShotFired { hit: Option<EntityKind>, points: u64 },
    SpeedUp { speed: f32 },
}

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Bounded queue of events waiting for the front end
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    pending: VecDeque<GameEvent>,
}

impl EventLog {
    pub fn push(&mut self, event: GameEvent) {
        if self.pending.len() >= MAX_PENDING_EVENTS {
            self.pending.pop_front();
        }
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn contains(&self, event: &GameEvent) -> bool {
        self.pending.contains(event)
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.pending.iter()
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.pending.drain(..).collect()
    }
}

/// Complete game state (deterministic given the seed and command sequence)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub effects: ActiveEffects,
    pub score: u64,
    /// Global scroll speed (columns per frame)
    pub speed: f32,
    /// Simulation frame counter
    pub frame: u64,
    /// Lane-bound, collidable entities
    pub objects: Vec<Entity>,
    /// Decorative parallax entities
    pub background: Vec<Entity>,
}

impl GameState {
    /// Create a fresh state on the title screen
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            phase: GamePhase::Title,
            player: Player::new(tuning.lanes),
            effects: ActiveEffects::default(),
            score: 0,
            speed: tuning.initial_speed,
            frame: 0,
            objects: Vec::new(),
            background: Vec::new(),
        }
    }

    pub fn is_started(&self) -> bool {
        self.phase != GamePhase::Title
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Started, not paused, not over
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Add points, honouring the double-score effect; returns the award
    pub(crate) fn award(&mut self, base: u64) -> u64 {
        let points = self.effects.award(base);
        self.score += points;
        points
    }
}
