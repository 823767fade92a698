//! Second-stage orchestration
//!
//! The manager owns the decoy roster. It spawns copies on a timer until the
//! roster is full, then secretly picks which one is real. Striking the real
//! one starts a short reveal, after which it can be killed. The kill starts
//! a death countdown that ends in the win signal.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullets::{Bullet, HostileBulletPool};
use super::decoy::{Decoy, DecoyState};
use super::player::Player;
use crate::Bounds;
use crate::tuning::{EncounterTuning, HostileTuning};

/// What a player bullet did to the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoyHit {
    /// Nothing in range
    Missed,
    /// Struck a decoy (or the true one while it cannot be hurt)
    Absorbed,
    /// First strike on the hidden true decoy; the reveal has begun
    RevealStarted,
    /// Damage on the revealed true decoy, below the kill threshold
    Wounded,
    /// Kill threshold reached; the death sequence has begun
    Destroyed,
}

impl DecoyHit {
    /// The bullet was stopped and should be deactivated
    pub fn is_hit(&self) -> bool {
        !matches!(self, DecoyHit::Missed)
    }
}

/// Preview of the next copy forming at the centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnGhost {
    pub pos: Vec2,
    pub angle: f32,
    pub size: f32,
    /// 0..=1
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterManager {
    decoys: Vec<Decoy>,
    true_index: Option<usize>,
    tuning: EncounterTuning,
    hostile: HostileTuning,
    bounds: Bounds,
    /// Encounter clock, accumulated from elapsed time
    now_ms: f64,
    spawn_timer_ms: f64,
    spawning: bool,
    spawn_progress: f32,
    revealing: bool,
    reveal_started_ms: f64,
    dying: bool,
    death_started_ms: f64,
    won: bool,
}

impl EncounterManager {
    /// One decoy at the centre, facing `angle`, still carrying `spin` from the first stage
    pub fn new(
        tuning: EncounterTuning,
        hostile: HostileTuning,
        bounds: Bounds,
        angle: f32,
        spin: f32,
    ) -> Self {
        let first = Decoy::new(
            bounds.center(),
            angle,
            spin,
            tuning.decoy_size,
            HostileBulletPool::from_tuning(&hostile),
            0.0,
        );
        Self {
            decoys: vec![first],
            true_index: None,
            tuning,
            hostile,
            bounds,
            now_ms: 0.0,
            spawn_timer_ms: 0.0,
            spawning: false,
            spawn_progress: 0.0,
            revealing: false,
            reveal_started_ms: 0.0,
            dying: false,
            death_started_ms: 0.0,
            won: false,
        }
    }

    /// Advance one tick. Returns `true` on the tick the encounter is won, and only then.
    pub fn update<R: Rng>(&mut self, player: &Player, elapsed_ms: f64, rng: &mut R) -> bool {
        self.now_ms += elapsed_ms;
        let now = self.now_ms;

        if self.dying && now - self.death_started_ms >= self.tuning.death_delay_ms {
            if self.won {
                return false;
            }
            self.won = true;
            for decoy in &mut self.decoys {
                decoy.active = false;
            }
            log::info!("True decoy destroyed, encounter won");
            return true;
        }

        for decoy in self.decoys.iter_mut().filter(|d| d.active) {
            decoy.update(player, now, elapsed_ms, self.bounds, &self.tuning);
        }

        if self.revealing && now - self.reveal_started_ms >= self.tuning.flicker_ms {
            self.revealing = false;
            if let Some(decoy) = self.true_decoy_mut() {
                decoy.is_vulnerable = true;
                log::info!("True decoy is now vulnerable");
            }
        }

        if !self.dying && self.decoys.len() < self.tuning.capacity {
            self.advance_spawn(elapsed_ms, rng);
        }

        self.check_invariants();
        false
    }

    fn advance_spawn<R: Rng>(&mut self, elapsed_ms: f64, rng: &mut R) {
        self.spawn_timer_ms += elapsed_ms;

        if self.spawn_timer_ms > self.tuning.spawn_animation_start_ms {
            self.spawning = true;
            let t = (self.spawn_timer_ms - self.tuning.spawn_animation_start_ms)
                / self.tuning.spawn_animation_ms;
            self.spawn_progress = t.clamp(0.0, 1.0) as f32;
        }

        if self.spawn_timer_ms < self.tuning.spawn_interval_ms {
            return;
        }

        let copy = Decoy::new(
            self.bounds.center(),
            self.decoys[0].angle,
            0.0,
            self.tuning.decoy_size,
            HostileBulletPool::from_tuning(&self.hostile),
            self.now_ms,
        );
        self.decoys.push(copy);
        self.spawn_timer_ms = 0.0;
        self.spawning = false;
        self.spawn_progress = 0.0;
        log::debug!("Decoy {} of {} spawned", self.decoys.len(), self.tuning.capacity);

        if self.decoys.len() == self.tuning.capacity {
            debug_assert!(self.true_index.is_none());
            let index = rng.random_range(0..self.decoys.len());
            self.decoys[index].is_true = true;
            self.true_index = Some(index);
            log::info!("Roster full; true decoy hidden among {}", self.decoys.len());
        }
    }

    /// Test a player bullet against the roster in spawn order; the first decoy in range decides.
    pub fn check_collisions(&mut self, bullet: &Bullet) -> DecoyHit {
        if !bullet.active {
            return DecoyHit::Missed;
        }
        let Some(index) = self
            .decoys
            .iter()
            .position(|d| d.active && d.overlaps(bullet.pos, bullet.radius))
        else {
            return DecoyHit::Missed;
        };

        let now = self.now_ms;
        let hits_to_kill = self.tuning.hits_to_kill;
        let decoy = &mut self.decoys[index];

        if !decoy.is_true {
            return DecoyHit::Absorbed;
        }
        if !self.revealing && !decoy.is_vulnerable {
            self.revealing = true;
            self.reveal_started_ms = now;
            log::info!("True decoy struck, reveal started");
            return DecoyHit::RevealStarted;
        }
        if !decoy.is_vulnerable || decoy.state == DecoyState::Static {
            return DecoyHit::Absorbed;
        }

        decoy.hit_count += 1;
        if decoy.hit_count < hits_to_kill {
            return DecoyHit::Wounded;
        }
        self.start_death(index);
        DecoyHit::Destroyed
    }

    /// Collapse the roster to the true decoy, freeze it and start the countdown
    fn start_death(&mut self, index: usize) {
        let now = self.now_ms;
        let mut survivor = self.decoys.swap_remove(index);
        survivor.freeze(now);
        self.decoys.clear();
        self.decoys.push(survivor);
        self.true_index = Some(0);
        self.dying = true;
        self.death_started_ms = now;
        self.spawning = false;
        log::info!("True decoy down, death sequence started");
    }

    /// True if the player's body overlaps any active decoy
    pub fn check_player_collision(&self, player: &Player) -> bool {
        self.decoys
            .iter()
            .filter(|d| d.active)
            .any(|d| d.overlaps(player.pos, player.size / 2.0))
    }

    fn true_decoy_mut(&mut self) -> Option<&mut Decoy> {
        self.true_index.and_then(|i| self.decoys.get_mut(i))
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.true_index.is_some() || self.decoys.len() < self.tuning.capacity,
            "roster full without a true decoy"
        );
        debug_assert!(
            self.decoys.iter().filter(|d| d.is_true).count()
                == usize::from(self.true_index.is_some()),
            "true flag out of sync with true_index"
        );
    }

    pub fn decoys(&self) -> &[Decoy] {
        &self.decoys
    }

    pub fn decoys_mut(&mut self) -> &mut [Decoy] {
        &mut self.decoys
    }

    pub fn true_index(&self) -> Option<usize> {
        self.true_index
    }

    pub fn true_decoy(&self) -> Option<&Decoy> {
        self.true_index.and_then(|i| self.decoys.get(i))
    }

    pub fn is_revealing(&self) -> bool {
        self.revealing
    }

    /// Time since the reveal began, while it lasts
    pub fn reveal_elapsed(&self) -> Option<f64> {
        self.revealing.then(|| self.now_ms - self.reveal_started_ms)
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    /// Death countdown progress in 0..=1, while dying
    pub fn death_progress(&self) -> Option<f32> {
        self.dying.then(|| {
            let t = (self.now_ms - self.death_started_ms) / self.tuning.death_delay_ms;
            t.clamp(0.0, 1.0) as f32
        })
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn spawn_progress(&self) -> f32 {
        self.spawn_progress
    }

    pub fn is_spawning(&self) -> bool {
        self.spawning
    }

    /// The copy currently forming, if the spawn animation is running
    pub fn ghost(&self) -> Option<SpawnGhost> {
        if !self.spawning {
            return None;
        }
        Some(SpawnGhost {
            pos: self.bounds.center(),
            angle: self.decoys[0].angle,
            size: self.tuning.decoy_size,
            progress: self.spawn_progress,
        })
    }

    /// Every active hostile bullet across the roster
    pub fn hostile_bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.decoys.iter().flat_map(|d| d.bullets.active())
    }

    pub fn hostile_bullets_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        self.decoys.iter_mut().flat_map(|d| d.bullets.active_mut())
    }
}
