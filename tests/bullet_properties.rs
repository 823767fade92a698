//! Property tests for the bullet pools.

use glam::Vec2;
use proptest::prelude::*;

use tri_hunt::Bounds;
use tri_hunt::sim::{BulletPool, HostileBulletPool};

const DAMPING: f32 = 0.75;
const RADIUS: f32 = 3.0;

fn arena() -> Bounds {
    Bounds::default()
}

fn inside() -> impl Strategy<Value = Vec2> {
    (RADIUS..1280.0 - RADIUS, RADIUS..720.0 - RADIUS).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn hostile_bullets_stay_in_the_arena(
        origin in inside(),
        heading in 0.0f32..std::f32::consts::TAU,
        speed in 1.0f32..40.0,
        max_bounces in 0u32..8,
        frames in 0.1f32..2.0,
    ) {
        let bounds = arena();
        let mut pool = HostileBulletPool::new(1, speed, RADIUS, max_bounces, DAMPING);
        let target = origin + Vec2::new(heading.cos(), heading.sin());
        prop_assert!(pool.fire(origin, target, false));

        for _ in 0..2000 {
            pool.integrate(bounds, frames);
            for b in pool.active() {
                prop_assert!(b.pos.x - b.radius >= -1e-3);
                prop_assert!(b.pos.x + b.radius <= bounds.width + 1e-3);
                prop_assert!(b.pos.y - b.radius >= -1e-3);
                prop_assert!(b.pos.y + b.radius <= bounds.height + 1e-3);
                prop_assert!(b.bounce_count <= b.max_bounces);
            }
        }
    }

    #[test]
    fn hostile_bounces_damp_the_reflected_axis(
        origin in inside(),
        heading in 0.0f32..std::f32::consts::TAU,
        speed in 1.0f32..40.0,
    ) {
        let bounds = arena();
        let mut pool = HostileBulletPool::new(1, speed, RADIUS, 4, DAMPING);
        let target = origin + Vec2::new(heading.cos(), heading.sin());
        pool.fire(origin, target, false);

        let mut prev = pool.slots()[0];
        for _ in 0..2000 {
            pool.integrate(bounds, 1.0);
            let now = pool.slots()[0];
            if !now.active {
                prop_assert_eq!(now.bounce_count, 4);
                break;
            }
            let bounces = now.bounce_count - prev.bounce_count;
            prop_assert!(bounces <= 2);
            if bounces == 0 {
                prop_assert_eq!(now.vel, prev.vel);
            }
            for (before, after) in [(prev.vel.x, now.vel.x), (prev.vel.y, now.vel.y)] {
                if before != after {
                    prop_assert!((after + before * DAMPING).abs() < 1e-4);
                }
            }
            prop_assert!(now.vel.length() <= prev.vel.length() + 1e-4);
            prev = now;
        }
    }

    #[test]
    fn player_bullets_fly_straight_until_they_leave(
        origin in inside(),
        angle in 0.0f32..std::f32::consts::TAU,
        frames in 0.1f32..2.0,
    ) {
        let bounds = arena();
        let mut pool = BulletPool::new(1, 20.0, 5.0, 0.0);
        prop_assert!(pool.fire(origin, angle, 0.0, f64::NEG_INFINITY, 1000.0));
        let vel = pool.slots()[0].vel;

        for _ in 0..1000 {
            pool.integrate(bounds, frames);
            let b = pool.slots()[0];
            if !b.active {
                let out = b.pos.x < 0.0
                    || b.pos.x > bounds.width
                    || b.pos.y < 0.0
                    || b.pos.y > bounds.height;
                prop_assert!(out);
                prop_assert_eq!(b.bounce_count, 0);
                return Ok(());
            }
            prop_assert_eq!(b.vel, vel);
        }
        prop_assert!(false, "bullet never left the arena");
    }
}
