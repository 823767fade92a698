//! The player's avatar

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullets::Bullet;
use crate::consts::PLAYER_SPAWN_OFFSET;
use crate::tuning::PlayerTuning;
use crate::{Bounds, bearing};

/// A square ship steered by keys and aimed by the pointer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per reference frame
    pub speed: f32,
    pub angle: f32,
    /// Clock time of the last accepted shot
    pub last_fire_ms: f64,
    pub alive: bool,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &PlayerTuning) -> Self {
        Self {
            pos,
            size: tuning.size,
            speed: tuning.speed,
            angle: 0.0,
            last_fire_ms: f64::NEG_INFINITY,
            alive: true,
        }
    }

    /// Spawn in the upper-left quarter of the arena
    pub fn spawn(bounds: Bounds, tuning: &PlayerTuning) -> Self {
        let pos = Vec2::new(
            bounds.width / PLAYER_SPAWN_OFFSET,
            bounds.height / PLAYER_SPAWN_OFFSET,
        );
        Self::new(pos, tuning)
    }

    /// Move along `move_dir` (each component in -1..=1) and face `aim`.
    ///
    /// An axis only moves while the ship's half-size is still inside the
    /// arena on that side.
    pub fn steer(&mut self, move_dir: Vec2, aim: Option<Vec2>, frames: f32, bounds: Bounds) {
        let step = self.speed * frames;
        let half = self.size / 2.0;

        if move_dir.y < 0.0 && self.pos.y - half > 0.0 {
            self.pos.y -= step;
        }
        if move_dir.y > 0.0 && self.pos.y + half < bounds.height {
            self.pos.y += step;
        }
        if move_dir.x < 0.0 && self.pos.x - half > 0.0 {
            self.pos.x -= step;
        }
        if move_dir.x > 0.0 && self.pos.x + half < bounds.width {
            self.pos.x += step;
        }

        if let Some(aim) = aim {
            self.angle = bearing(self.pos, aim);
        }
    }

    /// True if an active bullet's centre is inside the ship's radius
    pub fn hit_by(&self, bullet: &Bullet) -> bool {
        self.alive && bullet.active && bullet.pos.distance(self.pos) <= self.size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(100.0, 100.0), &PlayerTuning::default())
    }

    #[test]
    fn test_steer_moves_and_aims() {
        let mut p = player();
        p.steer(Vec2::new(1.0, -1.0), Some(Vec2::new(100.0, 200.0)), 1.0, Bounds::default());
        assert_eq!(p.pos, Vec2::new(102.0, 98.0));
        // Aim point is straight down and slightly left of the new position
        assert!(p.angle > std::f32::consts::FRAC_PI_2 && p.angle < 1.7);
    }

    #[test]
    fn test_steer_stops_at_wall() {
        let mut p = player();
        p.pos = Vec2::new(4.0, 100.0);
        p.steer(Vec2::new(-1.0, 0.0), None, 1.0, Bounds::default());
        assert_eq!(p.pos.x, 4.0);
    }

    #[test]
    fn test_hit_by_uses_half_size() {
        let p = player();
        let mut bullet = Bullet {
            pos: Vec2::new(104.0, 100.0),
            vel: Vec2::ZERO,
            radius: 3.0,
            active: true,
            bounce_count: 0,
            max_bounces: 4,
            marked: false,
        };
        assert!(p.hit_by(&bullet));
        bullet.pos.x = 106.0;
        assert!(!p.hit_by(&bullet));
        bullet.pos.x = 100.0;
        bullet.active = false;
        assert!(!p.hit_by(&bullet));
    }
}
