//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through the elapsed value handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (pool slots, roster in spawn order)
//! - No rendering or platform dependencies

pub mod bullets;
pub mod collision;
pub mod decoy;
pub mod encounter;
pub mod objective;
pub mod player;
pub mod state;
pub mod tick;
pub mod view;

pub use bullets::{Bullet, BulletPool, HostileBulletPool};
pub use collision::{
    DecoyVolley, circles_overlap, circles_touch, hostile_hits_player, intercept_marked,
    resolve_decoy_hits, resolve_zone_hits,
};
pub use decoy::{Decoy, DecoyState};
pub use encounter::{DecoyHit, EncounterManager, SpawnGhost};
pub use objective::Objective;
pub use player::Player;
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use view::{BulletView, DecoyView, FrameView, VisualState, decoy_views};
