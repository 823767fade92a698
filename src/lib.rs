//! Tri-Hunt - a two-stage boss encounter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bullet pools, boss forms, collisions, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame time (60 FPS). Per-frame speeds are expressed against it.
    pub const TARGET_FRAME_MS: f64 = 16.67;
    /// Upper bound on a single tick's elapsed time
    pub const MAX_FRAME_MS: f64 = TARGET_FRAME_MS;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 10.0;
    pub const PLAYER_SPEED: f32 = 2.0;
    /// Divider for the spawn point (width/4, height/4)
    pub const PLAYER_SPAWN_OFFSET: f32 = 4.0;

    /// Player bullets
    pub const PLAYER_POOL_SIZE: usize = 100;
    pub const PLAYER_BULLET_SPEED: f32 = 20.0;
    pub const PLAYER_BULLET_RADIUS: f32 = 5.0;
    pub const PLAYER_FIRE_COOLDOWN_MS: f64 = 1000.0;

    /// Hostile bullets
    pub const HOSTILE_POOL_SIZE: usize = 100;
    pub const HOSTILE_BULLET_SPEED: f32 = 5.0;
    pub const HOSTILE_BULLET_RADIUS: f32 = 3.0;
    pub const HOSTILE_MAX_BOUNCES: u32 = 4;
    /// Velocity multiplier applied to the reflected axis on each bounce
    pub const HOSTILE_BOUNCE_DAMPING: f32 = 0.75;
    /// Distance ahead of a zone used to aim outward volleys
    pub const HOSTILE_AIM_DISTANCE: f32 = 100.0;

    /// First-stage objective
    pub const OBJECTIVE_SIZE: f32 = 30.0;
    /// Radians per reference frame
    pub const OBJECTIVE_ROTATION_SPEED: f32 = 0.02;
    pub const HIT_ZONE_RADIUS: f32 = 5.0;
    pub const HIT_ZONE_VISIBLE_MS: f64 = 10_000.0;
    pub const MARKED_HITS_TO_REVEAL: u32 = 3;
    pub const VOLLEY_INTERVAL_MS: f64 = 1000.0;
    /// Every Nth volley carries a marked bullet
    pub const MARKED_VOLLEY_EVERY: u32 = 3;
    /// Delay between the last corner breaking and the stage transition
    pub const STOPPING_MS: f64 = 1000.0;
    pub const STAGE_TRANSITION_MS: f64 = 1000.0;

    /// Second stage (decoys)
    pub const DECOY_SIZE_RATIO: f32 = 0.7;
    pub const MAX_DECOYS: usize = 5;
    pub const SPAWN_INTERVAL_MS: f64 = 3000.0;
    pub const SPAWN_ANIMATION_START_MS: f64 = 2000.0;
    pub const SPAWN_ANIMATION_MS: f64 = 1000.0;
    pub const FLICKER_MS: f64 = 1000.0;
    /// Flicker half-period (lit for this long, then dark for this long)
    pub const FLICKER_PHASE_MS: f64 = 100.0;
    pub const DEATH_DELAY_MS: f64 = 1000.0;
    pub const HITS_TO_KILL: u32 = 2;
    pub const TARGETING_MS: f64 = 1000.0;
    pub const RESTING_MS: f64 = 1000.0;
    /// Pixels per second
    pub const DASH_SPEED: f32 = 600.0;
    /// Dash ends within this distance of the target
    pub const DASH_ARRIVE_EPSILON: f32 = 5.0;
    /// Fraction of the bearing error closed per reference frame while targeting
    pub const TURN_EASE: f32 = 0.1;
    /// Spin decay per reference frame during the stage handover
    pub const SPIN_DECAY: f32 = 0.95;
    /// Spin below which the handover ends
    pub const SPIN_SETTLED: f32 = 0.001;
}

/// Play area, `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Normalized angle to [-π, π]; any finite input wraps in constant time
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Unit vector pointing along `angle`
#[inline]
pub fn unit_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Bearing from `from` to `to`
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Number of reference frames covered by `elapsed_ms`
#[inline]
pub fn frames(elapsed_ms: f64) -> f32 {
    (elapsed_ms / consts::TARGET_FRAME_MS) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_huge_input_terminates() {
        for angle in [1e9_f32, -1e9, 3.4e38] {
            let wrapped = normalize_angle(angle);
            assert!((-PI..=PI).contains(&wrapped), "{angle} -> {wrapped}");
        }
    }

    #[test]
    fn test_bearing_and_unit_vector_agree() {
        let from = Vec2::new(10.0, 10.0);
        let to = Vec2::new(10.0, 50.0);
        let dir = unit_vector(bearing(from, to));
        assert!((dir - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_frames_at_reference_rate() {
        assert!((frames(consts::TARGET_FRAME_MS) - 1.0).abs() < 1e-6);
        assert_eq!(frames(0.0), 0.0);
    }
}
