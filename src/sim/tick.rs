//! Per-frame simulation tick
//!
//! Core game loop: clamp the frame time, move the player, fly the bullets,
//! then run whichever boss stage is live and resolve its collisions.

use glam::Vec2;

use super::collision::{
    hostile_hits_player, intercept_marked, resolve_decoy_hits, resolve_zone_hits,
};
use super::state::{GamePhase, GameState};
use crate::frames;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement direction, each axis in -1..=1 (WASD)
    pub move_dir: Vec2,
    /// Point the ship faces (pointer position)
    pub aim: Option<Vec2>,
    /// Fire button held
    pub fire: bool,
    /// Start over after a win or loss
    pub restart: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game by `elapsed_ms`, clamped to the frame budget
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f64) {
    if state.phase.is_over() {
        if input.restart {
            state.restart();
        }
        return;
    }

    let elapsed = elapsed_ms.clamp(0.0, state.tuning.max_frame_ms);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.clock_ms += elapsed;
    state.ticks += 1;
    let now = state.clock_ms;
    let frames = frames(elapsed);

    state.player.steer(input.move_dir, input.aim, frames, state.bounds);

    if input.fire {
        let player = &state.player;
        let fired = state.shots.fire(
            player.pos,
            player.angle,
            now,
            player.last_fire_ms,
            state.tuning.player.fire_cooldown_ms,
        );
        if fired {
            state.player.last_fire_ms = now;
        }
    }
    state.shots.integrate(state.bounds, frames);

    match state.phase {
        GamePhase::FirstStage => first_stage(state, elapsed),
        GamePhase::Transitioning => {
            if state.phase_time() >= state.tuning.objective.transition_ms {
                state.objective = None;
                state.set_phase(GamePhase::SecondStage);
            }
        }
        GamePhase::SecondStage => second_stage(state, elapsed),
        GamePhase::Won | GamePhase::Lost => {}
    }
}

fn first_stage(state: &mut GameState, elapsed: f64) {
    let now = state.clock_ms;
    let Some(objective) = state.objective.as_mut() else {
        return;
    };
    objective.update(now, elapsed, state.bounds);

    let intercepted = intercept_marked(&mut state.shots, &mut objective.bullets);
    for _ in 0..intercepted {
        objective.register_intercept(now);
    }
    resolve_zone_hits(&mut state.shots, objective, now);

    let struck = hostile_hits_player(&state.player, objective.bullets.active_mut());
    let handover = objective.finished(now).then_some((objective.angle, objective.rotation_speed));

    if struck {
        state.lose();
        return;
    }
    if let Some((angle, spin)) = handover {
        state.start_encounter(angle, spin);
        state.set_phase(GamePhase::Transitioning);
    }
}

fn second_stage(state: &mut GameState, elapsed: f64) {
    let Some(manager) = state.encounter.as_mut() else {
        return;
    };
    if manager.update(&state.player, elapsed, &mut state.rng) {
        state.set_phase(GamePhase::Won);
        return;
    }

    resolve_decoy_hits(&mut state.shots, manager);

    // A corpse in its death sequence can no longer hurt the player
    if manager.is_dying() {
        return;
    }
    let struck = hostile_hits_player(&state.player, manager.hostile_bullets_mut())
        || manager.check_player_collision(&state.player);
    if struck {
        state.lose();
    }
}

/// Distance at which the autopilot backs away from a threat
const AUTOPILOT_SAFE_DISTANCE: f32 = 120.0;

/// Demo player: aim at whatever matters most right now, keep firing, back off from threats
fn autopilot(state: &GameState, input: &mut TickInput) {
    let me = state.player.pos;
    let mut threat: Option<Vec2> = None;

    match state.phase {
        GamePhase::FirstStage => {
            if let Some(objective) = &state.objective {
                let zones = objective.hit_zones();
                let open_zone = (0..3)
                    .filter(|&i| objective.zones_visible && !objective.destroyed[i])
                    .map(|i| zones[i])
                    .next();
                let nearest_marked = objective
                    .bullets
                    .active()
                    .filter(|b| b.marked)
                    .min_by(|a, b| {
                        a.pos
                            .distance_squared(me)
                            .total_cmp(&b.pos.distance_squared(me))
                    })
                    .map(|b| b.pos);
                input.aim = open_zone.or(nearest_marked).or(Some(objective.pos));
                threat = objective
                    .bullets
                    .active()
                    .map(|b| b.pos)
                    .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));
            }
        }
        GamePhase::SecondStage => {
            if let Some(manager) = &state.encounter {
                let nearest = manager
                    .decoys()
                    .iter()
                    .filter(|d| d.active)
                    .map(|d| d.pos)
                    .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));
                input.aim = manager.true_decoy().map(|d| d.pos).or(nearest);
                threat = nearest;
            }
        }
        _ => {}
    }

    input.fire = input.aim.is_some();
    input.move_dir = match threat {
        Some(t) if t.distance(me) < AUTOPILOT_SAFE_DISTANCE => {
            let away = (me - t).normalize_or_zero();
            Vec2::new(away.x.signum(), away.y.signum())
        }
        _ => Vec2::ZERO,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;
    use crate::consts::TARGET_FRAME_MS;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(12345, Tuning::default(), Bounds::default())
    }

    #[test]
    fn test_elapsed_is_clamped() {
        let mut state = state();
        tick(&mut state, &TickInput::default(), 5000.0);
        assert!((state.clock_ms - TARGET_FRAME_MS).abs() < 1e-9);
        tick(&mut state, &TickInput::default(), -3.0);
        assert!((state.clock_ms - TARGET_FRAME_MS).abs() < 1e-9);
        assert_eq!(state.ticks, 2);
    }

    #[test]
    fn test_fire_is_rate_limited() {
        let mut state = state();
        let input = TickInput {
            fire: true,
            aim: Some(Vec2::new(1000.0, 180.0)),
            ..Default::default()
        };
        tick(&mut state, &input, 10.0);
        assert_eq!(state.shots.active_count(), 1);
        for _ in 0..50 {
            tick(&mut state, &input, 10.0);
        }
        assert_eq!(state.shots.active_count(), 1);
        assert_eq!(state.player.last_fire_ms, 10.0);
    }

    #[test]
    fn test_hostile_bullet_ends_run() {
        let mut state = state();
        let player_pos = state.player.pos;
        let objective = state.objective.as_mut().unwrap();
        objective.bullets.fire(player_pos, player_pos + Vec2::X, false);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Lost);
        assert!(!state.player.alive);
    }

    #[test]
    fn test_game_over_only_restarts() {
        let mut state = state();
        state.lose();
        let clock = state.clock_ms;
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.clock_ms, clock);
        tick(
            &mut state,
            &TickInput {
                restart: true,
                ..Default::default()
            },
            10.0,
        );
        assert_eq!(state.phase, GamePhase::FirstStage);
        assert_eq!(state.seed, 12346);
    }

    #[test]
    fn test_broken_objective_hands_over() {
        let mut state = state();
        {
            let objective = state.objective.as_mut().unwrap();
            for i in 0..3 {
                objective.zones_visible = true;
                let zone = objective.hit_zones()[i];
                let bullet = crate::sim::Bullet {
                    pos: zone,
                    vel: Vec2::ZERO,
                    radius: 5.0,
                    active: true,
                    bounce_count: 0,
                    max_bounces: 0,
                    marked: false,
                };
                assert_eq!(objective.check_zone_hit(&bullet, 0.0), Some(i));
            }
        }
        // Keep the player out of harm's way while the wind-down runs
        state.objective.as_mut().unwrap().bullets.clear();
        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 10.0);
        }
        assert_eq!(state.phase, GamePhase::Transitioning);
        let spin = state.encounter.as_ref().unwrap().decoys()[0].spin;
        assert!(spin > 0.0);

        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), 10.0);
        }
        assert_eq!(state.phase, GamePhase::SecondStage);
        assert!(state.objective.is_none());
    }

    #[test]
    fn test_fast_spin_keeps_angle_wrapped() {
        // Unvalidated sheet: the tick itself must still terminate
        let mut tuning = Tuning::default();
        tuning.objective.rotation_speed = 1e9;
        let mut state = GameState::new(1, tuning, Bounds::default());
        for _ in 0..3 {
            tick(&mut state, &TickInput::default(), TARGET_FRAME_MS);
        }
        let angle = state.objective.as_ref().unwrap().angle;
        assert!((-std::f32::consts::PI..=std::f32::consts::PI).contains(&angle));
        assert_eq!(state.ticks, 3);
    }

    #[test]
    fn test_dying_decoy_cannot_hurt_player() {
        let mut tuning = Tuning::default();
        tuning.encounter.targeting_ms = 1e9;
        let mut state = GameState::at_second_stage(4, tuning, Bounds::default());
        for _ in 0..1200 {
            tick(&mut state, &TickInput::default(), 10.0);
        }
        let manager = state.encounter.as_mut().unwrap();
        let index = manager.true_index().unwrap();
        for (i, decoy) in manager.decoys_mut().iter_mut().enumerate() {
            if i == index {
                decoy.is_vulnerable = true;
                decoy.hit_count = 1;
            } else {
                decoy.pos = Vec2::new(1250.0, 690.0);
            }
        }
        let pos = manager.decoys()[index].pos;
        let shot = crate::sim::Bullet {
            pos,
            vel: Vec2::ZERO,
            radius: 5.0,
            active: true,
            bounce_count: 0,
            max_bounces: 0,
            marked: false,
        };
        assert_eq!(manager.check_collisions(&shot), crate::sim::DecoyHit::Destroyed);

        state.player.pos = pos;
        tick(&mut state, &TickInput::default(), 10.0);
        assert_eq!(state.phase, GamePhase::SecondStage);
        assert!(state.player.alive);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999, Tuning::default(), Bounds::default());
        let mut b = GameState::new(99999, Tuning::default(), Bounds::default());
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut a, &input, TARGET_FRAME_MS);
            tick(&mut b, &input, TARGET_FRAME_MS);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.shots.active_count(), b.shots.active_count());
    }
}
