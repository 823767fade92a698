//! Render snapshot
//!
//! A flat, read-only picture of one frame for whatever draws it. Built from
//! [`GameState`] after `tick`; nothing in here feeds back into the simulation.

use glam::Vec2;
use serde::Serialize;

use super::bullets::Bullet;
use super::encounter::EncounterManager;
use super::state::{GamePhase, GameState};
use crate::consts::FLICKER_PHASE_MS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BulletView {
    pub pos: Vec2,
    pub radius: f32,
    pub marked: bool,
}

impl From<&Bullet> for BulletView {
    fn from(b: &Bullet) -> Self {
        Self {
            pos: b.pos,
            radius: b.radius,
            marked: b.marked,
        }
    }
}

/// How a decoy should look this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum VisualState {
    Normal,
    /// Reveal flicker; `lit` alternates every flicker phase
    Revealing { lit: bool },
    /// Death fade, 0 (just killed) to 1 (gone)
    Dying { fade: f32 },
    /// The copy forming at the centre, 0..=1
    SpawningGhost { progress: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DecoyView {
    pub pos: Vec2,
    pub angle: f32,
    pub size: f32,
    pub visual: VisualState,
    pub is_true: bool,
    /// Draw the hit ring
    pub is_vulnerable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveView {
    pub pos: Vec2,
    pub angle: f32,
    pub size: f32,
    pub destroyed: [bool; 3],
    /// Intact zones, only while exposed
    pub zones: Vec<Vec2>,
    pub zone_radius: f32,
    /// 1 normally, fading out during the stage transition
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub angle: f32,
    pub size: f32,
    pub alive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub player: PlayerView,
    pub shots: Vec<BulletView>,
    pub hostile: Vec<BulletView>,
    pub objective: Option<ObjectiveView>,
    pub decoys: Vec<DecoyView>,
    /// Stage cross-fade progress 0..=1 while transitioning
    pub transition: Option<f32>,
    pub won: bool,
    pub lost: bool,
}

impl FrameView {
    pub fn capture(state: &GameState) -> Self {
        let transition = (state.phase == GamePhase::Transitioning).then(|| {
            (state.phase_time() / state.tuning.objective.transition_ms).clamp(0.0, 1.0) as f32
        });

        let mut hostile: Vec<BulletView> = Vec::new();
        let objective = state.objective.as_ref().map(|o| {
            hostile.extend(o.bullets.active().map(BulletView::from));
            let zones = o.hit_zones();
            ObjectiveView {
                pos: o.pos,
                angle: o.angle,
                size: o.size,
                destroyed: o.destroyed,
                zones: (0..3)
                    .filter(|&i| o.zones_visible && !o.destroyed[i])
                    .map(|i| zones[i])
                    .collect(),
                zone_radius: o.hit_zone_radius(),
                alpha: 1.0 - transition.unwrap_or(0.0),
            }
        });

        let mut decoys = Vec::new();
        if let Some(manager) = &state.encounter {
            hostile.extend(manager.hostile_bullets().map(BulletView::from));
            decoys = decoy_views(manager);
        }

        Self {
            phase: state.phase,
            player: PlayerView {
                pos: state.player.pos,
                angle: state.player.angle,
                size: state.player.size,
                alive: state.player.alive,
            },
            shots: state.shots.active().map(BulletView::from).collect(),
            hostile,
            objective,
            decoys,
            transition,
            won: state.phase == GamePhase::Won,
            lost: state.phase == GamePhase::Lost,
        }
    }
}

/// Active decoys in roster order, then the spawn ghost if one is forming
pub fn decoy_views(manager: &EncounterManager) -> Vec<DecoyView> {
    let reveal_lit = manager
        .reveal_elapsed()
        .map(|t| (t / FLICKER_PHASE_MS) as u64 % 2 == 0);
    let fade = manager.death_progress();

    let mut views: Vec<DecoyView> = manager
        .decoys()
        .iter()
        .filter(|d| d.active)
        .map(|d| {
            let visual = match (fade, reveal_lit) {
                (Some(fade), _) => VisualState::Dying { fade },
                (None, Some(lit)) if d.is_true => VisualState::Revealing { lit },
                _ => VisualState::Normal,
            };
            DecoyView {
                pos: d.pos,
                angle: d.angle,
                size: d.size,
                visual,
                is_true: d.is_true,
                is_vulnerable: d.is_vulnerable,
            }
        })
        .collect();

    if let Some(ghost) = manager.ghost() {
        views.push(DecoyView {
            pos: ghost.pos,
            angle: ghost.angle,
            size: ghost.size,
            visual: VisualState::SpawningGhost {
                progress: ghost.progress,
            },
            is_true: false,
            is_vulnerable: false,
        });
    }
    views
}
