//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-balanced from a JSON
//! file without rebuilding. Missing fields fall back to [`crate::consts`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player avatar and its munitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: f32,
    /// Pixels per reference frame
    pub speed: f32,
    pub pool_size: usize,
    /// Pixels per reference frame
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub fire_cooldown_ms: f64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            pool_size: PLAYER_POOL_SIZE,
            bullet_speed: PLAYER_BULLET_SPEED,
            bullet_radius: PLAYER_BULLET_RADIUS,
            fire_cooldown_ms: PLAYER_FIRE_COOLDOWN_MS,
        }
    }
}

/// Bouncing boss bullets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileTuning {
    pub pool_size: usize,
    pub speed: f32,
    pub radius: f32,
    pub max_bounces: u32,
    pub bounce_damping: f32,
}

impl Default for HostileTuning {
    fn default() -> Self {
        Self {
            pool_size: HOSTILE_POOL_SIZE,
            speed: HOSTILE_BULLET_SPEED,
            radius: HOSTILE_BULLET_RADIUS,
            max_bounces: HOSTILE_MAX_BOUNCES,
            bounce_damping: HOSTILE_BOUNCE_DAMPING,
        }
    }
}

/// First-stage rotating triangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveTuning {
    pub size: f32,
    pub rotation_speed: f32,
    pub hit_zone_radius: f32,
    pub hit_zone_visible_ms: f64,
    pub marked_hits_to_reveal: u32,
    pub volley_interval_ms: f64,
    pub marked_volley_every: u32,
    pub aim_distance: f32,
    pub stopping_ms: f64,
    pub transition_ms: f64,
}

impl Default for ObjectiveTuning {
    fn default() -> Self {
        Self {
            size: OBJECTIVE_SIZE,
            rotation_speed: OBJECTIVE_ROTATION_SPEED,
            hit_zone_radius: HIT_ZONE_RADIUS,
            hit_zone_visible_ms: HIT_ZONE_VISIBLE_MS,
            marked_hits_to_reveal: MARKED_HITS_TO_REVEAL,
            volley_interval_ms: VOLLEY_INTERVAL_MS,
            marked_volley_every: MARKED_VOLLEY_EVERY,
            aim_distance: HOSTILE_AIM_DISTANCE,
            stopping_ms: STOPPING_MS,
            transition_ms: STAGE_TRANSITION_MS,
        }
    }
}

/// Second stage: decoys and the hidden true target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTuning {
    pub decoy_size: f32,
    pub capacity: usize,
    pub spawn_interval_ms: f64,
    pub spawn_animation_start_ms: f64,
    pub spawn_animation_ms: f64,
    pub flicker_ms: f64,
    pub death_delay_ms: f64,
    pub hits_to_kill: u32,
    pub targeting_ms: f64,
    pub resting_ms: f64,
    pub dash_speed: f32,
    pub turn_ease: f32,
    /// Decoys fire one bullet at the dash target when a dash begins
    pub volley_on_dash: bool,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            decoy_size: OBJECTIVE_SIZE * DECOY_SIZE_RATIO,
            capacity: MAX_DECOYS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_animation_start_ms: SPAWN_ANIMATION_START_MS,
            spawn_animation_ms: SPAWN_ANIMATION_MS,
            flicker_ms: FLICKER_MS,
            death_delay_ms: DEATH_DELAY_MS,
            hits_to_kill: HITS_TO_KILL,
            targeting_ms: TARGETING_MS,
            resting_ms: RESTING_MS,
            dash_speed: DASH_SPEED,
            turn_ease: TURN_EASE,
            volley_on_dash: true,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub hostile: HostileTuning,
    pub objective: ObjectiveTuning,
    pub encounter: EncounterTuning,
    /// Largest elapsed time a single tick may advance
    pub max_frame_ms: f64,
}

/// Why a tuning sheet was refused
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "malformed tuning JSON: {e}"),
            TuningError::Invalid { field, reason } => write!(f, "tuning field `{field}` {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Longest single tick a sheet may allow, in ms
const MAX_FRAME_MS_LIMIT: f64 = 1000.0;

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON sheet
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Reject sheets that would stall or break the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.max_frame_ms > 0.0 && self.max_frame_ms <= MAX_FRAME_MS_LIMIT) {
            return Err(invalid("max_frame_ms", "must be in (0, 1000]"));
        }
        if self.player.pool_size == 0 {
            return Err(invalid("player.pool_size", "must be at least 1"));
        }
        if self.player.size <= 0.0 {
            return Err(invalid("player.size", "must be positive"));
        }
        if self.hostile.pool_size == 0 {
            return Err(invalid("hostile.pool_size", "must be at least 1"));
        }
        if !(self.hostile.bounce_damping > 0.0 && self.hostile.bounce_damping < 1.0) {
            return Err(invalid("hostile.bounce_damping", "must be in (0, 1)"));
        }
        if !(self.objective.rotation_speed.is_finite()
            && self.objective.rotation_speed.abs() < std::f32::consts::TAU)
        {
            return Err(invalid(
                "objective.rotation_speed",
                "must be finite and below one turn per frame",
            ));
        }
        if self.objective.marked_volley_every == 0 {
            return Err(invalid("objective.marked_volley_every", "must be at least 1"));
        }
        if self.encounter.capacity < 2 {
            return Err(invalid("encounter.capacity", "must be at least 2"));
        }
        if self.encounter.hits_to_kill == 0 {
            return Err(invalid("encounter.hits_to_kill", "must be at least 1"));
        }
        if self.encounter.spawn_animation_ms <= 0.0 {
            return Err(invalid("encounter.spawn_animation_ms", "must be positive"));
        }
        if self.encounter.spawn_animation_start_ms > self.encounter.spawn_interval_ms {
            return Err(invalid(
                "encounter.spawn_animation_start_ms",
                "must not exceed spawn_interval_ms",
            ));
        }
        if !(self.encounter.dash_speed.is_finite() && self.encounter.dash_speed > 0.0) {
            return Err(invalid("encounter.dash_speed", "must be finite and positive"));
        }
        if !(self.encounter.decoy_size.is_finite() && self.encounter.decoy_size > 0.0) {
            return Err(invalid("encounter.decoy_size", "must be finite and positive"));
        }
        if !(self.encounter.turn_ease > 0.0 && self.encounter.turn_ease <= 1.0) {
            return Err(invalid("encounter.turn_ease", "must be in (0, 1]"));
        }
        Ok(())
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player: PlayerTuning::default(),
            hostile: HostileTuning::default(),
            objective: ObjectiveTuning::default(),
            encounter: EncounterTuning::default(),
            max_frame_ms: MAX_FRAME_MS,
        }
    }
}
