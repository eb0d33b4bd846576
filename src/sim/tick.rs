//! Fixed-cadence simulation tick
//!
//! Advances the run by one frame: motion, pruning, spawning, collisions,
//! timer decay, then the difficulty ramp.

use rand::Rng;

use super::collision::resolve_collisions;
use super::spawn::{spawn_objects, spawn_trees};
use super::state::{EventLog, GameEvent, GamePhase, GameState};
use crate::tuning::Tuning;

/// Advance the game state by one frame
///
/// Does nothing unless the run is started, unpaused and not over.
pub fn tick(state: &mut GameState, tuning: &Tuning, rng: &mut impl Rng, events: &mut EventLog) {
    if state.phase != GamePhase::Running {
        return;
    }

    state.frame += 1;

    scroll(state, tuning);
    prune(state, tuning, events);

    spawn_objects(state, tuning, rng);
    spawn_trees(state, tuning, rng);

    if resolve_collisions(state, tuning, events) {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at frame {} with score {} (speed {:.2})",
            state.frame,
            state.score,
            state.speed
        );
    }

    decay_timers(state);
    ramp_speed(state, tuning, events);
}

/// Move foreground by global + own speed, background by the parallax share
fn scroll(state: &mut GameState, tuning: &Tuning) {
    let speed = state.speed;
    for obj in &mut state.objects {
        obj.x -= speed + obj.speed;
    }
    let drift = speed * tuning.parallax;
    for bg in &mut state.background {
        bg.x -= drift;
    }
}

/// Drop everything past the trailing bound; passed hazards pay out
fn prune(state: &mut GameState, tuning: &Tuning, events: &mut EventLog) {
    let bound = tuning.trailing_bound;

    let mut passed = Vec::new();
    state.objects.retain(|obj| {
        if obj.x > bound {
            return true;
        }
        if obj.kind.is_hazard() {
            passed.push(obj.kind);
        }
        false
    });

    for kind in passed {
        let points = state.award(tuning.pass_bonus);
        events.push(GameEvent::HazardPassed { kind, points });
    }

    state.background.retain(|bg| bg.x > bound);
}

/// Count down every active timer; flags derive from the counters
fn decay_timers(state: &mut GameState) {
    let player = &mut state.player;
    player.shoot_ticks = player.shoot_ticks.saturating_sub(1);
    player.jump_ticks = player.jump_ticks.saturating_sub(1);

    let effects = &mut state.effects;
    effects.invincible_ticks = effects.invincible_ticks.saturating_sub(1);
    effects.double_score_ticks = effects.double_score_ticks.saturating_sub(1);
}

/// Step the scroll speed on its cadence without ever passing the cap
fn ramp_speed(state: &mut GameState, tuning: &Tuning, events: &mut EventLog) {
    if state.frame % tuning.speed_up_interval != 0 {
        return;
    }
    let next = state.speed + tuning.speed_step;
    if next <= tuning.max_speed && next > state.speed {
        state.speed = next;
        log::debug!("Speed up to {:.3} at frame {}", next, state.frame);
        events.push(GameEvent::SpeedUp { speed: next });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Entity, EntityKind};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running(tuning: &Tuning) -> GameState {
        let mut state = GameState::new(12345, tuning);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_tick_idle_outside_running() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for phase in [GamePhase::Title, GamePhase::Paused, GamePhase::GameOver] {
            let mut state = running(&tuning);
            state.phase = phase;
            state.objects.push(Entity::new(EntityKind::Obstacle, 0, 50.0));
            state.player.jump_ticks = 4;
            let before = state.clone();
            tick(&mut state, &tuning, &mut rng, &mut EventLog::default());
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_scroll_uses_own_speed_and_parallax() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        state.objects.push(Entity::new(EntityKind::Car, 0, 50.0).with_speed(0.5));
        state.background.push(Entity::new(EntityKind::Tree, 0, 50.0));

        scroll(&mut state, &tuning);
        assert!((state.objects[0].x - (50.0 - 0.6 - 0.5)).abs() < 1e-5);
        assert!((state.background[0].x - (50.0 - 0.6 * 0.3)).abs() < 1e-5);
    }

    #[test]
    fn test_prune_awards_hazards_only() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        state.objects = vec![
            Entity::new(EntityKind::Obstacle, 0, -15.0),
            Entity::new(EntityKind::Ammo, 1, -20.0),
            Entity::new(EntityKind::Enemy, 2, -14.0),
        ];
        state.background.push(Entity::new(EntityKind::Tree, 0, -16.0));

        prune(&mut state, &tuning, &mut EventLog::default());
        assert_eq!(state.score, tuning.pass_bonus);
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.objects[0].kind, EntityKind::Enemy);
        assert!(state.background.is_empty());
    }

    #[test]
    fn test_timers_clear_at_zero() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        state.player.jump_ticks = 1;
        state.player.shoot_ticks = 2;
        state.effects.invincible_ticks = 1;

        decay_timers(&mut state);
        assert!(!state.player.is_jumping());
        assert!(state.player.is_shooting());
        assert!(!state.effects.is_invincible());

        decay_timers(&mut state);
        assert!(!state.player.is_shooting());
        assert_eq!(state.player.shoot_ticks, 0);
    }

    #[test]
    fn test_speed_ramp_cadence() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        state.frame = tuning.speed_up_interval - 1;
        ramp_speed(&mut state, &tuning, &mut EventLog::default());
        assert_eq!(state.speed, tuning.initial_speed);

        state.frame = tuning.speed_up_interval;
        ramp_speed(&mut state, &tuning, &mut EventLog::default());
        assert!((state.speed - (tuning.initial_speed + tuning.speed_step)).abs() < 1e-6);
    }

    #[test]
    fn test_speed_never_passes_cap() {
        let tuning = Tuning::default();
        let mut state = running(&tuning);
        state.speed = tuning.max_speed - tuning.speed_step / 2.0;
        state.frame = tuning.speed_up_interval;
        ramp_speed(&mut state, &tuning, &mut EventLog::default());
        assert!(state.speed < tuning.max_speed);
    }

    #[test]
    fn test_crash_ends_run() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut state = running(&tuning);
        let lane = state.player.lane;
        state
            .objects
            .push(Entity::new(EntityKind::Obstacle, lane, tuning.player_x + 1.0));

        let mut events = EventLog::default();
        tick(&mut state, &tuning, &mut rng, &mut events);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(events.contains(&GameEvent::Crashed { kind: EntityKind::Obstacle }));
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut state1 = running(&tuning);
        let mut state2 = running(&tuning);
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut events = EventLog::default();
        // Keep the runner airborne so the run lasts
        for _ in 0..500 {
            state1.player.jump_ticks = 2;
            state2.player.jump_ticks = 2;
            tick(&mut state1, &tuning, &mut rng1, &mut events);
            tick(&mut state2, &tuning, &mut rng2, &mut events);
        }
        assert_eq!(state1, state2);
        assert_eq!(state1.frame, 500);
    }
}
