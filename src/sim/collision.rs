//! Collision resolution between bullets, the player and the boss forms
//!
//! Everything is a circle. The queries here take the pools and entities they
//! need, apply the consequences (deactivate bullets, count hits) and report
//! what happened so the caller can move the game along.

use glam::Vec2;

use super::bullets::{Bullet, BulletPool, HostileBulletPool};
use super::encounter::{DecoyHit, EncounterManager};
use super::objective::Objective;
use super::player::Player;

/// Strict overlap: centres closer than the sum of the radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}

/// Inclusive contact: touching counts
#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) <= (ra + rb) * (ra + rb)
}

/// Shoot down marked hostile bullets. Both bullets are spent; returns how many were intercepted.
pub fn intercept_marked(shots: &mut BulletPool, hostile: &mut HostileBulletPool) -> u32 {
    let mut intercepted = 0;
    for shot in shots.active_mut() {
        let hit = hostile
            .active_mut()
            .filter(|b| b.marked)
            .find(|b| circles_touch(shot.pos, shot.radius, b.pos, b.radius));
        if let Some(marked) = hit {
            marked.active = false;
            shot.active = false;
            intercepted += 1;
        }
    }
    intercepted
}

/// First hostile bullet inside the player's body is spent and reported
pub fn hostile_hits_player<'a, I>(player: &Player, hostile: I) -> bool
where
    I: IntoIterator<Item = &'a mut Bullet>,
{
    for bullet in hostile {
        if player.hit_by(bullet) {
            bullet.active = false;
            return true;
        }
    }
    false
}

/// Tally of one frame's player bullets against the decoy roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecoyVolley {
    /// Bullets stopped by any decoy
    pub stopped: u32,
    pub revealed: bool,
    pub wounded: u32,
    pub destroyed: bool,
}

/// Run every active player bullet through `check_collisions`, spending the ones that hit
pub fn resolve_decoy_hits(shots: &mut BulletPool, manager: &mut EncounterManager) -> DecoyVolley {
    let mut volley = DecoyVolley::default();
    for shot in shots.active_mut() {
        let hit = manager.check_collisions(shot);
        if !hit.is_hit() {
            continue;
        }
        shot.active = false;
        volley.stopped += 1;
        match hit {
            DecoyHit::RevealStarted => volley.revealed = true,
            DecoyHit::Wounded => volley.wounded += 1,
            DecoyHit::Destroyed => volley.destroyed = true,
            DecoyHit::Absorbed | DecoyHit::Missed => {}
        }
    }
    volley
}

/// Player bullets against the objective's exposed zones. Returns the number of corners broken.
pub fn resolve_zone_hits(shots: &mut BulletPool, objective: &mut Objective, now_ms: f64) -> u32 {
    let mut broken = 0;
    for shot in shots.active_mut() {
        if objective.check_zone_hit(shot, now_ms).is_some() {
            shot.active = false;
            broken += 1;
        }
    }
    broken
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bounds;
    use crate::tuning::{HostileTuning, ObjectiveTuning, PlayerTuning};

    fn shots_at(points: &[Vec2]) -> BulletPool {
        let mut pool = BulletPool::new(8, 20.0, 5.0, 0.0);
        for p in points {
            // angle 0, no cooldown: spawns exactly at p
            pool.fire(*p, 0.0, 0.0, -1.0, 0.0);
        }
        pool
    }

    #[test]
    fn test_overlap_vs_touch() {
        let a = Vec2::ZERO;
        let b = Vec2::new(8.0, 0.0);
        assert!(!circles_overlap(a, 5.0, b, 3.0));
        assert!(circles_touch(a, 5.0, b, 3.0));
        assert!(circles_overlap(a, 5.0, b, 3.1));
    }

    #[test]
    fn test_intercept_only_marked() {
        let mut hostile = HostileBulletPool::from_tuning(&HostileTuning::default());
        hostile.fire(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0), false);
        hostile.fire(Vec2::new(300.0, 100.0), Vec2::new(400.0, 100.0), true);
        let mut shots = shots_at(&[Vec2::new(100.0, 100.0), Vec2::new(304.0, 100.0)]);

        assert_eq!(intercept_marked(&mut shots, &mut hostile), 1);
        assert_eq!(shots.active_count(), 1);
        assert_eq!(hostile.active_count(), 1);
        assert!(hostile.active().all(|b| !b.marked));
    }

    #[test]
    fn test_hostile_hits_player_spends_bullet() {
        let player = Player::new(Vec2::new(100.0, 100.0), &PlayerTuning::default());
        let mut hostile = HostileBulletPool::from_tuning(&HostileTuning::default());
        hostile.fire(Vec2::new(500.0, 500.0), Vec2::ZERO, false);
        assert!(!hostile_hits_player(&player, hostile.active_mut()));

        hostile.fire(Vec2::new(103.0, 100.0), Vec2::ZERO, false);
        assert!(hostile_hits_player(&player, hostile.active_mut()));
        assert_eq!(hostile.active_count(), 1);
    }

    #[test]
    fn test_decoy_volley_spends_hits_only() {
        let mut manager = EncounterManager::new(
            Default::default(),
            HostileTuning::default(),
            Bounds::default(),
            0.0,
            0.0,
        );
        let centre = Bounds::default().center();
        let mut shots = shots_at(&[centre, Vec2::new(10.0, 10.0)]);
        let volley = resolve_decoy_hits(&mut shots, &mut manager);
        assert_eq!(volley.stopped, 1);
        assert!(!volley.revealed && !volley.destroyed);
        assert_eq!(shots.active_count(), 1);
    }

    #[test]
    fn test_zone_hits_need_exposure() {
        let mut objective = Objective::new(
            Bounds::default().center(),
            0.0,
            ObjectiveTuning::default(),
            &HostileTuning::default(),
        );
        let zone = objective.hit_zones()[0];
        let mut shots = shots_at(&[zone]);
        assert_eq!(resolve_zone_hits(&mut shots, &mut objective, 0.0), 0);
        assert_eq!(shots.active_count(), 1);

        objective.zones_visible = true;
        assert_eq!(resolve_zone_hits(&mut shots, &mut objective, 0.0), 1);
        assert_eq!(shots.active_count(), 0);
        assert!(objective.destroyed[0]);
    }
}
