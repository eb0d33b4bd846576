//! Spawn planning
//!
//! Decides when, where and what enters the playfield. Cadence and lane
//! spacing tighten as the scroll speed rises; the outcome of each lane spawn
//! comes from a single uniform roll against [`SpawnOdds`](crate::tuning::SpawnOdds).

use rand::Rng;

use super::state::{Entity, EntityKind, GameState};
use crate::tuning::Tuning;

/// Frames between foreground spawn attempts at the given speed
pub fn spawn_interval(tuning: &Tuning, speed: f32) -> u64 {
    let raw = tuning.spawn_interval_base - tuning.spawn_interval_per_speed * speed;
    // Negative raw values saturate to 0 in the cast, then hit the floor
    (raw.floor() as u64).max(tuning.spawn_interval_floor)
}

/// Minimum distance from the spawn edge to the nearest entity in a lane
pub fn lane_buffer(tuning: &Tuning, speed: f32) -> f32 {
    (tuning.lane_buffer_base - tuning.lane_buffer_per_speed * speed).max(tuning.lane_buffer_floor)
}

/// A lane accepts a spawn only if nothing in it is still near the spawn edge
pub fn lane_is_clear(objects: &[Entity], lane: usize, threshold: f32) -> bool {
    !objects.iter().any(|obj| obj.lane == lane && obj.x > threshold)
}

/// Chance of spawning into a second lane on the same tick
pub fn double_spawn_chance(tuning: &Tuning, speed: f32) -> f64 {
    let span = tuning.max_speed - tuning.double_spawn_speed;
    if span <= 0.0 || speed < tuning.double_spawn_speed {
        return 0.0;
    }
    let ramp = ((speed - tuning.double_spawn_speed) / span).clamp(0.0, 1.0) as f64;
    ramp * tuning.double_spawn_max_chance
}

/// Pick one lane, or two distinct lanes at higher speeds
pub fn pick_lanes(rng: &mut impl Rng, tuning: &Tuning, speed: f32) -> Vec<usize> {
    let first = rng.random_range(0..tuning.lanes);
    let mut lanes = vec![first];
    if tuning.lanes > 1 && rng.random_bool(double_spawn_chance(tuning, speed)) {
        let offset = rng.random_range(1..tuning.lanes);
        lanes.push((first + offset) % tuning.lanes);
    }
    lanes
}

/// Map a roll in [0, 1) to an outcome; `None` means nothing spawns
///
/// Gun rolls are void while the player already holds a gun.
pub fn classify(tuning: &Tuning, roll: f64, progress: f64, has_gun: bool) -> Option<EntityKind> {
    let mut edge = 0.0;
    for (kind, width) in tuning.odds.bands(progress) {
        edge += width;
        if roll < edge {
            if kind == EntityKind::Gun && has_gun {
                return None;
            }
            return Some(kind);
        }
    }
    None
}

/// Build the entity for an outcome at the spawn edge
fn make_entity(
    rng: &mut impl Rng,
    tuning: &Tuning,
    kind: EntityKind,
    lane: usize,
    progress: f32,
) -> Entity {
    let entity = Entity::new(kind, lane, tuning.game_width);
    match kind {
        EntityKind::Car => entity.with_speed(tuning.car_speed),
        EntityKind::Enemy => {
            let spread = tuning.enemy_speed_spread * (1.0 + progress);
            entity.with_speed(rng.random::<f32>() * spread)
        }
        _ => entity,
    }
}

/// Foreground spawn step; runs on frames that hit the dynamic interval
pub fn spawn_objects(state: &mut GameState, tuning: &Tuning, rng: &mut impl Rng) {
    if state.frame % spawn_interval(tuning, state.speed) != 0 {
        return;
    }

    let threshold = tuning.game_width - lane_buffer(tuning, state.speed);
    let progress = tuning.speed_progress(state.speed);

    for lane in pick_lanes(rng, tuning, state.speed) {
        if !lane_is_clear(&state.objects, lane, threshold) {
            continue;
        }
        let roll = rng.random::<f64>();
        if let Some(kind) = classify(tuning, roll, progress as f64, state.player.has_gun) {
            let entity = make_entity(rng, tuning, kind, lane, progress);
            log::trace!("frame {}: spawn {:?} in lane {}", state.frame, kind, lane);
            state.objects.push(entity);
        }
    }
}

/// Background decoration; independent of lane occupancy
pub fn spawn_trees(state: &mut GameState, tuning: &Tuning, rng: &mut impl Rng) {
    if state.frame % tuning.tree_interval == 0 && rng.random_bool(tuning.tree_chance) {
        state
            .background
            .push(Entity::new(EntityKind::Tree, 0, tuning.game_width));
    }
}
