use proptest::prelude::*;

use wilson_revenge::sim::{Entity, EntityKind, GamePhase, GameState};
use wilson_revenge::{Command, Engine, Tuning};

fn command() -> impl Strategy<Value = Command> {
    prop::sample::select(vec![
        Command::MoveUp,
        Command::MoveDown,
        Command::Jump,
        Command::Shoot,
        Command::TogglePause,
        Command::Start,
        Command::Restart,
    ])
}

/// One optional command per frame
fn script(max_frames: usize) -> impl Strategy<Value = Vec<Option<Command>>> {
    prop::collection::vec(prop::option::of(command()), 0..max_frames)
}

fn running_engine(tuning: Tuning, seed: u64, setup: impl FnOnce(&mut GameState)) -> Engine {
    let mut state = GameState::new(seed, &tuning);
    state.phase = GamePhase::Running;
    setup(&mut state);
    Engine::resume(tuning, state)
}

fn play(engine: &mut Engine, steps: &[Option<Command>]) {
    for step in steps {
        if let Some(command) = step {
            engine.apply(*command);
        }
        engine.advance_frame();
    }
}

proptest! {
    #[test]
    fn lane_stays_in_bounds(lanes in 1usize..7, seed: u64, steps in script(300)) {
        let tuning = Tuning { lanes, ..Tuning::default() };
        let mut engine = Engine::new(tuning, seed);
        engine.start();
        for step in &steps {
            if let Some(command) = step {
                engine.apply(*command);
            }
            engine.advance_frame();
            prop_assert!(engine.state().player.lane < lanes);
        }
    }

    #[test]
    fn same_seed_same_run(seed: u64, steps in script(400)) {
        let mut first = Engine::new(Tuning::default(), seed);
        let mut second = Engine::new(Tuning::default(), seed);
        first.start();
        second.start();
        play(&mut first, &steps);
        play(&mut second, &steps);
        prop_assert_eq!(first.state(), second.state());
    }

    #[test]
    fn speed_rises_monotonically_to_cap(seed: u64, frames in 1usize..600) {
        let tuning = Tuning { speed_up_interval: 1, ..Tuning::default() };
        let cap = tuning.max_speed;
        let mut engine = running_engine(tuning, seed, |s| s.effects.invincible_ticks = u32::MAX);

        let mut last = engine.state().speed;
        for _ in 0..frames {
            engine.advance_frame();
            let speed = engine.state().speed;
            prop_assert!(speed >= last);
            prop_assert!(speed <= cap);
            last = speed;
        }
    }

    #[test]
    fn nothing_survives_past_trailing_bound(seed: u64, steps in script(500)) {
        let tuning = Tuning::default();
        let bound = tuning.trailing_bound;
        let mut engine = running_engine(tuning, seed, |_| {});
        for step in &steps {
            if let Some(command) = step {
                engine.apply(*command);
            }
            engine.advance_frame();
            let state = engine.state();
            prop_assert!(state.objects.iter().all(|o| o.x > bound));
            prop_assert!(state.background.iter().all(|o| o.x > bound));
        }
    }

    #[test]
    fn shooting_spends_at_most_one_round(
        ammo in 0u32..4,
        has_gun: bool,
        seed: u64,
        steps in script(200),
    ) {
        let mut engine = running_engine(Tuning::default(), seed, |s| {
            s.player.has_gun = has_gun;
            s.player.ammo = ammo;
        });
        for step in &steps {
            let before = engine.state().player.ammo;
            if let Some(command) = step {
                engine.apply(*command);
            }
            let after = engine.state().player.ammo;
            if *step == Some(Command::Shoot) {
                prop_assert!(after == before || after + 1 == before);
                if before == 0 {
                    prop_assert_eq!(after, 0);
                }
            } else if *step != Some(Command::Restart) {
                prop_assert_eq!(after, before);
            }
            engine.advance_frame();
        }
    }

    #[test]
    fn jump_obeys_airtime_and_disable_flag(disabled: bool, airborne in 0u32..20, seed: u64) {
        let tuning = Tuning::default();
        let full = tuning.jump_ticks;
        let mut engine = running_engine(tuning, seed, |s| {
            s.player.jump_disabled = disabled;
            s.player.jump_ticks = airborne;
        });
        let before = engine.state().clone();
        engine.jump();
        if disabled || airborne > 0 {
            prop_assert_eq!(engine.state(), &before);
        } else {
            prop_assert_eq!(engine.state().player.jump_ticks, full);
        }
    }

    #[test]
    fn paused_run_is_frozen(seed: u64, warmup in 0usize..100, frames in 1usize..200) {
        let mut engine = running_engine(Tuning::default(), seed, |s| {
            s.effects.invincible_ticks = 1000;
        });
        for _ in 0..warmup {
            engine.advance_frame();
        }
        prop_assume!(engine.state().is_running());

        engine.toggle_pause();
        let frozen = engine.state().clone();
        for _ in 0..frames {
            engine.advance_frame();
            engine.move_up();
            engine.jump();
            engine.shoot();
        }
        prop_assert_eq!(engine.state(), &frozen);
    }

    #[test]
    fn power_down_never_drives_score_negative(score in 0u64..1000) {
        let tuning = Tuning::default();
        let penalty = tuning.power_down_penalty;
        let x = tuning.player_x + 1.0;
        let mut engine = running_engine(tuning, 3, |s| {
            s.score = score;
            let lane = s.player.lane;
            s.objects.push(Entity::new(EntityKind::PowerDown, lane, x));
        });
        engine.advance_frame();
        prop_assert_eq!(engine.state().score, score.saturating_sub(penalty));
    }

    #[test]
    fn grounded_contact_anywhere_in_hitbox_is_fatal(offset in 0.05f32..3.95) {
        let tuning = Tuning::default();
        // Position after this frame's scroll, inside [player_x - 1, player_x + hitbox]
        let x = tuning.player_x - 1.0 + offset + tuning.initial_speed;
        let mut engine = running_engine(tuning, 8, |s| {
            let lane = s.player.lane;
            s.objects.push(Entity::new(EntityKind::Obstacle, lane, x));
        });
        engine.advance_frame();
        prop_assert!(engine.state().is_game_over());
    }
}
