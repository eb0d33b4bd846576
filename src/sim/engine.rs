//! Simulation engine
//!
//! Owns the authoritative [`GameState`], its [`Tuning`] and the seeded RNG.
//! Consumers drive it through [`Engine::advance_frame`] and [`Command`]s and
//! read it through [`Engine::state`]; nothing else can mutate the state.
//!
//! Every command is a silent no-op when its preconditions do not hold.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{EventLog, GameEvent, GamePhase, GameState};
use super::tick::tick;
use crate::tuning::Tuning;

/// Discrete player/front-end commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveUp,
    MoveDown,
    Jump,
    Shoot,
    TogglePause,
    Start,
    Restart,
}

/// The single writer of the game state
#[derive(Debug, Clone)]
pub struct Engine {
    tuning: Tuning,
    state: GameState,
    rng: Pcg32,
    events: EventLog,
}

/// Balance the simulation can run with; rejected values fall back to defaults
fn checked(tuning: Tuning) -> Tuning {
    match tuning.validate() {
        Ok(()) => tuning,
        Err(e) => {
            log::warn!("Rejected tuning ({}), using defaults", e);
            Tuning::default()
        }
    }
}

impl Engine {
    /// Create an engine on the title screen
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = checked(tuning);
        let state = GameState::new(seed, &tuning);
        Self::resume(tuning, state)
    }

    /// Continue from a snapshot; the RNG stream is derived from seed and frame
    ///
    /// A lane the tuning does not have is pulled back to the last lane.
    pub fn resume(tuning: Tuning, mut state: GameState) -> Self {
        let tuning = checked(tuning);
        state.player.lane = state.player.lane.min(tuning.lanes - 1);
        let rng = Pcg32::seed_from_u64(state.seed.wrapping_add(state.frame));
        Self {
            tuning,
            state,
            rng,
            events: EventLog::default(),
        }
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Events raised since the last drain, capped at [`MAX_PENDING_EVENTS`](super::state::MAX_PENDING_EVENTS)
    pub fn pending_events(&self) -> &EventLog {
        &self.events
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Advance one frame; the caller owns the cadence
    pub fn advance_frame(&mut self) {
        tick(&mut self.state, &self.tuning, &mut self.rng, &mut self.events);
    }

    /// Dispatch a command
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveUp => self.move_up(),
            Command::MoveDown => self.move_down(),
            Command::Jump => self.jump(),
            Command::Shoot => self.shoot(),
            Command::TogglePause => self.toggle_pause(),
            Command::Start => self.start(),
            Command::Restart => self.restart(),
        }
    }

    pub fn move_up(&mut self) {
        if self.state.is_running() && self.state.player.lane > 0 {
            self.state.player.lane -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.state.is_running() && self.state.player.lane + 1 < self.tuning.lanes {
            self.state.player.lane += 1;
        }
    }

    /// Start a jump unless already airborne or jumping is disabled
    pub fn jump(&mut self) {
        let player = &mut self.state.player;
        if self.state.phase == GamePhase::Running && !player.is_jumping() && !player.jump_disabled
        {
            player.jump_ticks = self.tuning.jump_ticks;
        }
    }

    /// Fire at the nearest hazard ahead in the current lane
    ///
    /// Ammo is spent and the muzzle window starts even when nothing is hit.
    pub fn shoot(&mut self) {
        let state = &mut self.state;
        let player = &state.player;
        if !state.is_running() || !player.has_gun || player.ammo == 0 || player.is_shooting() {
            return;
        }

        state.player.ammo -= 1;
        state.player.shoot_ticks = self.tuning.shoot_ticks;

        let lane = state.player.lane;
        let (near, far) = (self.tuning.player_x, self.tuning.game_width);
        let target = state
            .objects
            .iter()
            .enumerate()
            .filter(|(_, obj)| obj.kind.is_hazard() && obj.lane == lane)
            .filter(|(_, obj)| obj.x > near && obj.x < far)
            .min_by(|(_, a), (_, b)| a.x.total_cmp(&b.x))
            .map(|(i, _)| i);

        let (hit, points) = match target {
            Some(index) => {
                let removed = state.objects.remove(index);
                let points = state.award(self.tuning.shot_bonus);
                (Some(removed.kind), points)
            }
            None => (None, 0),
        };
        log::debug!(
            "Shot {:?} for {} points, {} ammo left",
            hit,
            points,
            state.player.ammo
        );
        self.events.push(GameEvent::ShotFired { hit, points });
    }

    /// Flip between running and paused; ignored before start and after game over
    pub fn toggle_pause(&mut self) {
        let event = match self.state.phase {
            GamePhase::Running => {
                self.state.phase = GamePhase::Paused;
                GameEvent::Paused
            }
            GamePhase::Paused => {
                self.state.phase = GamePhase::Running;
                GameEvent::Resumed
            }
            GamePhase::Title | GamePhase::GameOver => return,
        };
        log::debug!("{:?} at frame {}", event, self.state.frame);
        self.events.push(event);
    }

    /// Leave the title screen
    pub fn start(&mut self) {
        if self.state.phase == GamePhase::Title {
            self.state.phase = GamePhase::Running;
            log::info!("Run started (seed {})", self.state.seed);
            self.events.push(GameEvent::Started);
        }
    }

    /// Replace a finished run with a fresh, running one
    pub fn restart(&mut self) {
        if !self.state.is_game_over() {
            return;
        }
        let mut state = GameState::new(self.state.seed, &self.tuning);
        state.phase = GamePhase::Running;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted after scoring {}", self.state.score);
        self.state = state;
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}
