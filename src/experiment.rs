//! Batch mode: many AI-vs-AI games in parallel with aggregated statistics
//!
//! Every run gets its own tabletop and strategies, seeded from the batch seed
//! and the run id, so a batch gives the same report whatever the thread
//! scheduling.

use crate::config::SimulationConfig;
use crate::core::Seat;
use crate::game::{GameEndReason, GameLogger, GameSimulator, VerbosityLevel};
use crate::loader::{DefinedPlayer, GameInitializer};
use crate::Result;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Seed of one run, independent of every other run
pub fn run_seed(batch_seed: u64, run_id: u64) -> u64 {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(batch_seed ^ run_id.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    rng.next_u64()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: u64,
    pub seed: u64,
    /// Seat index (0 or 1) of the winner
    pub winner_seat: Option<usize>,
    pub reason: GameEndReason,
    pub turns_played: u32,
    pub failures: usize,
}

pub struct Experiment {
    players: [DefinedPlayer; 2],
    seats: [Seat; 2],
    config: SimulationConfig,
    runs: u64,
}

impl Experiment {
    /// `seats` carry the already-resolved decks of `players`
    pub fn new(players: [DefinedPlayer; 2], seats: [Seat; 2], config: SimulationConfig, runs: u64) -> Self {
        Experiment {
            players,
            seats,
            config,
            runs,
        }
    }

    pub fn run(&self) -> Result<ExperimentReport> {
        let start = Instant::now();
        let runs = (0..self.runs)
            .into_par_iter()
            .map(|run_id| self.run_one(run_id))
            .collect::<Result<Vec<_>>>()?;
        Ok(ExperimentReport {
            runs,
            elapsed: start.elapsed(),
        })
    }

    pub fn run_one(&self, run_id: u64) -> Result<RunSummary> {
        let seed = run_seed(self.config.seed, run_id);
        let config = self.config.clone().with_seed(seed);

        let mut tabletop = GameInitializer::init_game(self.seats.clone(), &config);
        let seat_ids = [tabletop.players()[0].id, tabletop.players()[1].id];
        let mut judge = GameInitializer::judge_for(&mut tabletop, &self.players, &config)
            .with_logger(GameLogger::with_verbosity(VerbosityLevel::Silent));

        let result = GameSimulator::new(config).run(tabletop, &mut judge)?;
        Ok(RunSummary {
            run_id,
            seed,
            winner_seat: result.winner.and_then(|w| seat_ids.iter().position(|id| *id == w)),
            reason: result.end_reason,
            turns_played: result.turns_played,
            failures: result.messages.len(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub runs: Vec<RunSummary>,
    pub elapsed: Duration,
}

impl ExperimentReport {
    pub fn games(&self) -> usize {
        self.runs.len()
    }

    pub fn wins(&self, seat: usize) -> usize {
        self.runs.iter().filter(|r| r.winner_seat == Some(seat)).count()
    }

    /// Games where both players lost at once
    pub fn draws(&self) -> usize {
        self.runs.iter().filter(|r| r.reason == GameEndReason::Draw).count()
    }

    /// Games stopped without a result (turn cap or illegal action)
    pub fn undecided(&self) -> usize {
        self.runs
            .iter()
            .filter(|r| r.winner_seat.is_none() && r.reason != GameEndReason::Draw)
            .count()
    }

    pub fn reasons(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for run in &self.runs {
            *counts.entry(format!("{:?}", run.reason)).or_insert(0) += 1;
        }
        counts
    }

    pub fn average_turns(&self) -> f64 {
        if self.runs.is_empty() {
            return 0.0;
        }
        self.runs.iter().map(|r| r.turns_played as f64).sum::<f64>() / self.runs.len() as f64
    }

    pub fn total_failures(&self) -> usize {
        self.runs.iter().map(|r| r.failures).sum()
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.games();
        writeln!(f, "=== Batch Complete ===")?;
        writeln!(f, "Games played: {total}")?;
        writeln!(f, "Elapsed time: {:.2}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "Average turns: {:.1}", self.average_turns())?;
        writeln!(f, "P1 wins: {} ({:.1}%)", self.wins(0), percent(self.wins(0), total))?;
        writeln!(f, "P2 wins: {} ({:.1}%)", self.wins(1), percent(self.wins(1), total))?;
        writeln!(f, "Draws: {} ({:.1}%)", self.draws(), percent(self.draws(), total))?;
        writeln!(f, "No winner: {} ({:.1}%)", self.undecided(), percent(self.undecided(), total))?;
        writeln!(f, "End reasons:")?;
        for (reason, count) in self.reasons() {
            writeln!(f, "  {reason}: {count}")?;
        }
        write!(f, "Validation failures: {}", self.total_failures())
    }
}
