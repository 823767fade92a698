//! Fixed-capacity bullet pools
//!
//! Both pools are arenas allocated once at construction. Firing flips the
//! first inactive slot to active; leaving play flips it back. Slots are never
//! reallocated, and an inactive slot's position/velocity are stale.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::tuning::{HostileTuning, PlayerTuning};
use crate::unit_vector;

/// One pooled bullet (player or hostile)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    pub radius: f32,
    pub active: bool,
    pub bounce_count: u32,
    pub max_bounces: u32,
    /// Interceptable bonus bullet (hostile only)
    pub marked: bool,
}

impl Bullet {
    fn idle(radius: f32, max_bounces: u32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
            active: false,
            bounce_count: 0,
            max_bounces,
            marked: false,
        }
    }
}

fn first_free(slots: &mut [Bullet]) -> Option<&mut Bullet> {
    slots.iter_mut().find(|b| !b.active)
}

/// The player's munitions: straight flight, gone on the first wall touch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletPool {
    bullets: Vec<Bullet>,
    speed: f32,
    spawn_distance: f32,
}

impl BulletPool {
    pub fn new(capacity: usize, speed: f32, radius: f32, spawn_distance: f32) -> Self {
        Self {
            bullets: vec![Bullet::idle(radius, 0); capacity],
            speed,
            spawn_distance,
        }
    }

    pub fn from_tuning(t: &PlayerTuning) -> Self {
        Self::new(t.pool_size, t.bullet_speed, t.bullet_radius, t.size / 2.0)
    }

    /// Fire along `angle` from just outside `origin`.
    ///
    /// Returns `false` when the cooldown has not elapsed or every slot is in
    /// flight; the shot is dropped in both cases.
    pub fn fire(
        &mut self,
        origin: Vec2,
        angle: f32,
        now_ms: f64,
        last_fire_ms: f64,
        cooldown_ms: f64,
    ) -> bool {
        if now_ms - last_fire_ms < cooldown_ms {
            return false;
        }
        let dir = unit_vector(angle);
        let pos = origin + dir * self.spawn_distance;
        let vel = dir * self.speed;
        let Some(bullet) = first_free(&mut self.bullets) else {
            return false;
        };
        bullet.active = true;
        bullet.pos = pos;
        bullet.vel = vel;
        bullet.bounce_count = 0;
        true
    }

    /// Advance every active bullet by `frames` reference frames
    pub fn integrate(&mut self, bounds: Bounds, frames: f32) {
        for bullet in self.bullets.iter_mut().filter(|b| b.active) {
            bullet.pos += bullet.vel * frames;

            // max_bounces is 0: any wall contact ends the bullet
            let out_x = bullet.pos.x < 0.0 || bullet.pos.x > bounds.width;
            let out_y = bullet.pos.y < 0.0 || bullet.pos.y > bounds.height;
            if out_x || out_y {
                bullet.active = false;
            }
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(|b| b.active)
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        self.bullets.iter_mut().filter(|b| b.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn capacity(&self) -> usize {
        self.bullets.len()
    }

    /// Every slot, active or not
    pub fn slots(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn clear(&mut self) {
        for bullet in &mut self.bullets {
            bullet.active = false;
        }
    }
}

/// Boss munitions: reflect off walls with damping until out of bounces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostileBulletPool {
    bullets: Vec<Bullet>,
    speed: f32,
    damping: f32,
}

impl HostileBulletPool {
    pub fn new(capacity: usize, speed: f32, radius: f32, max_bounces: u32, damping: f32) -> Self {
        debug_assert!(damping > 0.0 && damping < 1.0);
        Self {
            bullets: vec![Bullet::idle(radius, max_bounces); capacity],
            speed,
            damping,
        }
    }

    pub fn from_tuning(t: &HostileTuning) -> Self {
        Self::new(t.pool_size, t.speed, t.radius, t.max_bounces, t.bounce_damping)
    }

    /// Fire from `origin` toward `target`. Dropped (returns `false`) if the pool is full.
    pub fn fire(&mut self, origin: Vec2, target: Vec2, marked: bool) -> bool {
        let vel = unit_vector(crate::bearing(origin, target)) * self.speed;
        let Some(bullet) = first_free(&mut self.bullets) else {
            return false;
        };
        bullet.active = true;
        bullet.pos = origin;
        bullet.vel = vel;
        bullet.bounce_count = 0;
        bullet.marked = marked;
        true
    }

    /// Advance every active bullet by `frames` reference frames, bouncing off walls
    pub fn integrate(&mut self, bounds: Bounds, frames: f32) {
        for bullet in self.bullets.iter_mut().filter(|b| b.active) {
            bullet.pos += bullet.vel * frames;
            let r = bullet.radius;

            if bullet.pos.x - r < 0.0 || bullet.pos.x + r > bounds.width {
                if bullet.bounce_count >= bullet.max_bounces {
                    bullet.active = false;
                    continue;
                }
                bullet.vel.x = -bullet.vel.x * self.damping;
                bullet.bounce_count += 1;
                // Snap back inside so the next step cannot re-trigger the wall
                bullet.pos.x = if bullet.pos.x - r < 0.0 {
                    r
                } else {
                    bounds.width - r
                };
            }

            if bullet.pos.y - r < 0.0 || bullet.pos.y + r > bounds.height {
                if bullet.bounce_count >= bullet.max_bounces {
                    bullet.active = false;
                    continue;
                }
                bullet.vel.y = -bullet.vel.y * self.damping;
                bullet.bounce_count += 1;
                bullet.pos.y = if bullet.pos.y - r < 0.0 {
                    r
                } else {
                    bounds.height - r
                };
            }
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter().filter(|b| b.active)
    }

    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        self.bullets.iter_mut().filter(|b| b.active)
    }

    pub fn active_count(&self) -> usize {
        self.active().count()
    }

    pub fn capacity(&self) -> usize {
        self.bullets.len()
    }

    pub fn slots(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn clear(&mut self) {
        for bullet in &mut self.bullets {
            bullet.active = false;
        }
    }
}
