//! Second-stage boss form
//!
//! Every decoy runs the same loop: turn toward the player, dash at where the
//! player was, rest, repeat. One of them may secretly be the true target.
//! Phase changes compare the clock against `state_entered_ms`; nothing counts
//! frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullets::HostileBulletPool;
use super::collision::circles_overlap;
use super::player::Player;
use crate::consts::{DASH_ARRIVE_EPSILON, SPIN_DECAY, SPIN_SETTLED};
use crate::tuning::EncounterTuning;
use crate::{Bounds, bearing, frames, normalize_angle};

/// Decoy behaviour phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoyState {
    /// Spinning down after the first stage hands over
    Transition,
    /// Turning to face the player
    Targeting,
    /// Charging at the captured target point
    Dashing,
    /// Idle between dashes
    Resting,
    /// Frozen by the death sequence; still drawn
    Static,
}

/// One triangle in the decoy roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoy {
    pub pos: Vec2,
    pub angle: f32,
    pub size: f32,
    /// Residual rotation per reference frame (Transition only)
    pub spin: f32,
    pub state: DecoyState,
    pub state_entered_ms: f64,
    pub dash_target: Vec2,
    /// A wall blocked the last dash step
    pub hit_boundary: bool,
    pub hit_count: u32,
    pub is_true: bool,
    pub is_vulnerable: bool,
    pub active: bool,
    pub bullets: HostileBulletPool,
}

impl Decoy {
    /// A decoy with `spin` left over starts in `Transition`, otherwise `Targeting`
    pub fn new(
        pos: Vec2,
        angle: f32,
        spin: f32,
        size: f32,
        bullets: HostileBulletPool,
        now_ms: f64,
    ) -> Self {
        let state = if spin.abs() >= SPIN_SETTLED {
            DecoyState::Transition
        } else {
            DecoyState::Targeting
        };
        Self {
            pos,
            angle,
            size,
            spin,
            state,
            state_entered_ms: now_ms,
            dash_target: pos,
            hit_boundary: false,
            hit_count: 0,
            is_true: false,
            is_vulnerable: false,
            active: true,
            bullets,
        }
    }

    fn set_state(&mut self, state: DecoyState, now_ms: f64) {
        self.state = state;
        self.state_entered_ms = now_ms;
    }

    /// Time spent in the current state
    #[inline]
    pub fn state_time(&self, now_ms: f64) -> f64 {
        now_ms - self.state_entered_ms
    }

    /// Lock the dash target. The only way into `Dashing`.
    pub fn prepare_dash(&mut self, target: Vec2, now_ms: f64) {
        self.dash_target = target;
        self.hit_boundary = false;
        self.set_state(DecoyState::Dashing, now_ms);
    }

    /// Stop acting for good (death sequence)
    pub fn freeze(&mut self, now_ms: f64) {
        self.spin = 0.0;
        self.set_state(DecoyState::Static, now_ms);
    }

    /// Circle test against something of radius `radius` at `point`
    #[inline]
    pub fn overlaps(&self, point: Vec2, radius: f32) -> bool {
        circles_overlap(self.pos, self.size, point, radius)
    }

    /// Advance the state machine and the owned bullets
    pub fn update(
        &mut self,
        player: &Player,
        now_ms: f64,
        elapsed_ms: f64,
        bounds: Bounds,
        tuning: &EncounterTuning,
    ) {
        if !self.active {
            return;
        }
        let frames = frames(elapsed_ms);
        let state_time = self.state_time(now_ms);

        match self.state {
            DecoyState::Transition => {
                self.angle = normalize_angle(self.angle + self.spin * frames);
                self.spin *= SPIN_DECAY.powf(frames);
                if self.spin.abs() < SPIN_SETTLED {
                    self.spin = 0.0;
                    self.set_state(DecoyState::Targeting, now_ms);
                }
            }
            DecoyState::Targeting => {
                if state_time > tuning.targeting_ms {
                    self.prepare_dash(player.pos, now_ms);
                    if tuning.volley_on_dash {
                        self.bullets.fire(self.pos, self.dash_target, false);
                    }
                } else {
                    // Close a fixed share of the error per reference frame
                    let error = normalize_angle(bearing(self.pos, player.pos) - self.angle);
                    let ease = 1.0 - (1.0 - tuning.turn_ease).powf(frames);
                    self.angle = normalize_angle(self.angle + error * ease);
                }
            }
            DecoyState::Dashing => self.dash(now_ms, elapsed_ms, bounds, tuning.dash_speed),
            DecoyState::Resting => {
                if state_time > tuning.resting_ms {
                    self.set_state(DecoyState::Targeting, now_ms);
                }
            }
            DecoyState::Static => {}
        }

        self.bullets.integrate(bounds, frames);
    }

    fn dash(&mut self, now_ms: f64, elapsed_ms: f64, bounds: Bounds, speed: f32) {
        let to_target = self.dash_target - self.pos;
        let distance = to_target.length();

        if self.hit_boundary || distance < DASH_ARRIVE_EPSILON {
            self.hit_boundary = false;
            self.set_state(DecoyState::Resting, now_ms);
            return;
        }

        let dir = to_target / distance;
        let step = ((speed as f64 * elapsed_ms / 1000.0) as f32).min(distance);
        let next = self.pos + dir * step;

        // Each axis moves only if the whole triangle stays on screen
        let pad = self.size;
        if next.x >= pad && next.x <= bounds.width - pad {
            self.pos.x = next.x;
        } else {
            self.hit_boundary = true;
        }
        if next.y >= pad && next.y <= bounds.height - pad {
            self.pos.y = next.y;
        } else {
            self.hit_boundary = true;
        }
    }
}
