//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; `tick` is the only thing
//! that advances it.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullets::BulletPool;
use super::encounter::EncounterManager;
use super::objective::Objective;
use super::player::Player;
use crate::Bounds;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Spinning triangle with hit zones
    FirstStage,
    /// Cross-fade from the broken triangle to the decoy stage
    Transitioning,
    /// Find and kill the true decoy
    SecondStage,
    /// True decoy's death sequence completed
    Won,
    /// Player was hit
    Lost,
}

impl GamePhase {
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub bounds: Bounds,
    pub phase: GamePhase,
    /// Game clock (ms), accumulated from clamped elapsed time
    pub clock_ms: f64,
    /// Clock time the current phase began
    pub phase_started_ms: f64,
    /// Simulation tick counter
    pub ticks: u64,
    pub player: Player,
    /// Player munitions
    pub shots: BulletPool,
    /// First-stage boss; dropped once the decoy stage takes over
    pub objective: Option<Objective>,
    /// Second-stage boss; created when the objective breaks
    pub encounter: Option<EncounterManager>,
    pub rng: Pcg32,
}

impl GameState {
    /// Create a new run at the first stage
    pub fn new(seed: u64, tuning: Tuning, bounds: Bounds) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let objective =
            Objective::spawn(bounds, tuning.objective.clone(), &tuning.hostile, &mut rng);
        log::info!("New run with seed {}", seed);
        Self {
            seed,
            player: Player::spawn(bounds, &tuning.player),
            shots: BulletPool::from_tuning(&tuning.player),
            objective: Some(objective),
            encounter: None,
            tuning,
            bounds,
            phase: GamePhase::FirstStage,
            clock_ms: 0.0,
            phase_started_ms: 0.0,
            ticks: 0,
            rng,
        }
    }

    /// Create a run that skips straight to the decoy stage
    pub fn at_second_stage(seed: u64, tuning: Tuning, bounds: Bounds) -> Self {
        let mut state = Self::new(seed, tuning, bounds);
        let angle = state.objective.take().map_or(0.0, |o| o.angle);
        state.start_encounter(angle, 0.0);
        state.set_phase(GamePhase::SecondStage);
        state
    }

    /// Hand over from the objective to a fresh decoy roster
    pub fn start_encounter(&mut self, angle: f32, spin: f32) {
        self.encounter = Some(EncounterManager::new(
            self.tuning.encounter.clone(),
            self.tuning.hostile.clone(),
            self.bounds,
            angle,
            spin,
        ));
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?} at {:.0} ms", self.phase, phase, self.clock_ms);
        }
        self.phase = phase;
        self.phase_started_ms = self.clock_ms;
    }

    /// Time spent in the current phase
    pub fn phase_time(&self) -> f64 {
        self.clock_ms - self.phase_started_ms
    }

    /// Player was struck
    pub fn lose(&mut self) {
        self.player.alive = false;
        self.set_phase(GamePhase::Lost);
    }

    /// Replace the whole run with a fresh one on the next seed
    pub fn restart(&mut self) {
        let seed = self.seed.wrapping_add(1);
        *self = Self::new(seed, self.tuning.clone(), self.bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_first_stage() {
        let state = GameState::new(7, Tuning::default(), Bounds::default());
        assert_eq!(state.phase, GamePhase::FirstStage);
        assert!(state.objective.is_some());
        assert!(state.encounter.is_none());
        assert!(state.player.alive);
        assert_eq!(state.shots.capacity(), 100);
    }

    #[test]
    fn test_same_seed_same_objective() {
        let a = GameState::new(42, Tuning::default(), Bounds::default());
        let b = GameState::new(42, Tuning::default(), Bounds::default());
        assert_eq!(a.objective.unwrap().angle, b.objective.unwrap().angle);
    }

    #[test]
    fn test_at_second_stage() {
        let state = GameState::at_second_stage(7, Tuning::default(), Bounds::default());
        assert_eq!(state.phase, GamePhase::SecondStage);
        assert!(state.objective.is_none());
        assert_eq!(state.encounter.as_ref().unwrap().decoys().len(), 1);
    }

    #[test]
    fn test_restart_advances_seed() {
        let mut state = GameState::new(7, Tuning::default(), Bounds::default());
        state.lose();
        assert!(state.phase.is_over());
        state.restart();
        assert_eq!(state.seed, 8);
        assert_eq!(state.phase, GamePhase::FirstStage);
        assert!(state.player.alive);
    }
}
