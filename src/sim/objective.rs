//! First-stage boss form
//!
//! A spinning triangle that fires a bullet from each intact corner zone on a
//! fixed cadence. Every few volleys one of those bullets is marked; shooting
//! down enough marked bullets exposes the corner zones for a while, and a
//! player bullet in an exposed zone breaks that corner. With every corner
//! broken the triangle stops firing and, after a short wind-down, hands its
//! heading and spin over to the decoy stage.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullets::{Bullet, HostileBulletPool};
use crate::tuning::{HostileTuning, ObjectiveTuning};
use crate::{Bounds, bearing, frames, unit_vector};

/// Angular offset between corners
const CORNER_STEP: f32 = std::f32::consts::TAU / 3.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub pos: Vec2,
    pub size: f32,
    pub angle: f32,
    /// Radians per reference frame
    pub rotation_speed: f32,
    pub bullets: HostileBulletPool,
    pub destroyed: [bool; 3],
    pub zones_visible: bool,
    zones_visible_since_ms: f64,
    last_volley_ms: f64,
    volley_count: u32,
    marked_intercepts: u32,
    stopping_since_ms: Option<f64>,
    tuning: ObjectiveTuning,
}

impl Objective {
    pub fn new(pos: Vec2, angle: f32, tuning: ObjectiveTuning, hostile: &HostileTuning) -> Self {
        Self {
            pos,
            size: tuning.size,
            angle,
            rotation_speed: tuning.rotation_speed,
            bullets: HostileBulletPool::from_tuning(hostile),
            destroyed: [false; 3],
            zones_visible: false,
            zones_visible_since_ms: 0.0,
            last_volley_ms: 0.0,
            volley_count: 0,
            marked_intercepts: 0,
            stopping_since_ms: None,
            tuning,
        }
    }

    /// Centre of the arena, random heading
    pub fn spawn<R: Rng>(
        bounds: Bounds,
        tuning: ObjectiveTuning,
        hostile: &HostileTuning,
        rng: &mut R,
    ) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Self::new(bounds.center(), angle, tuning, hostile)
    }

    /// Midpoints between the centre and each corner
    pub fn hit_zones(&self) -> [Vec2; 3] {
        let reach = self.size / 2.0;
        std::array::from_fn(|i| self.pos + unit_vector(self.angle + CORNER_STEP * i as f32) * reach)
    }

    pub fn hit_zone_radius(&self) -> f32 {
        self.tuning.hit_zone_radius
    }

    pub fn is_broken(&self) -> bool {
        self.destroyed.iter().all(|d| *d)
    }

    pub fn is_stopping(&self) -> bool {
        self.stopping_since_ms.is_some()
    }

    /// The wind-down after the last corner broke has run its course
    pub fn finished(&self, now_ms: f64) -> bool {
        self.stopping_since_ms
            .is_some_and(|since| now_ms - since >= self.tuning.stopping_ms)
    }

    pub fn volley_count(&self) -> u32 {
        self.volley_count
    }

    pub fn marked_intercepts(&self) -> u32 {
        self.marked_intercepts
    }

    pub fn update(&mut self, now_ms: f64, elapsed_ms: f64, bounds: Bounds) {
        let frames = frames(elapsed_ms);

        let exposed_for = now_ms - self.zones_visible_since_ms;
        if self.zones_visible && exposed_for > self.tuning.hit_zone_visible_ms {
            self.zones_visible = false;
        }

        self.angle = crate::normalize_angle(self.angle + self.rotation_speed * frames);

        if !self.is_stopping() && now_ms - self.last_volley_ms > self.tuning.volley_interval_ms {
            if !self.is_broken() {
                self.fire_volley();
            }
            self.last_volley_ms = now_ms;
        }

        self.bullets.integrate(bounds, frames);
    }

    fn fire_volley(&mut self) {
        self.volley_count += 1;
        let zones = self.hit_zones();

        // On marked volleys the first intact corner fires the marked bullet instead
        let marked_zone = if self.volley_count % self.tuning.marked_volley_every == 0 {
            self.destroyed.iter().position(|d| !d)
        } else {
            None
        };

        for (i, zone) in zones.iter().enumerate() {
            if self.destroyed[i] {
                continue;
            }
            let heading = self.angle + bearing(self.pos, *zone);
            let target = *zone + unit_vector(heading) * self.tuning.aim_distance;
            self.bullets.fire(*zone, target, marked_zone == Some(i));
        }
    }

    /// Count a marked bullet the player shot down. Returns `true` if that exposed the zones.
    pub fn register_intercept(&mut self, now_ms: f64) -> bool {
        self.marked_intercepts += 1;
        if self.marked_intercepts < self.tuning.marked_hits_to_reveal {
            return false;
        }
        self.marked_intercepts = 0;
        self.zones_visible = true;
        self.zones_visible_since_ms = now_ms;
        log::info!("Objective hit zones exposed");
        true
    }

    /// Break the first exposed, intact corner zone the bullet sits in
    pub fn check_zone_hit(&mut self, bullet: &Bullet, now_ms: f64) -> Option<usize> {
        if !bullet.active || !self.zones_visible {
            return None;
        }
        let r = self.tuning.hit_zone_radius;
        let zones = self.hit_zones();
        let index = (0..3)
            .find(|&i| !self.destroyed[i] && bullet.pos.distance_squared(zones[i]) <= r * r)?;

        self.destroyed[index] = true;
        self.zones_visible = false;
        log::info!("Objective corner {} broken", index);

        if self.is_broken() && self.stopping_since_ms.is_none() {
            self.stopping_since_ms = Some(now_ms);
            log::info!("Objective broken, winding down");
        }
        Some(index)
    }
}
