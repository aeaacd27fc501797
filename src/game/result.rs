//! Results returned by the judge and the simulator

use crate::core::PlayerId;
use crate::error::ValidationFailure;
use crate::game::{Phase, Step, Tabletop};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEndReason {
    /// A player's life reached zero
    PlayerDeath,
    /// A player had to draw from an empty library
    Decking,
    /// Both players lost at the same moment
    Draw,
    /// The driver's turn cap was reached
    TurnLimit,
    /// An illegal action ended the run (when configured to)
    IllegalAction,
}

/// How and where a game ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Option<PlayerId>,
    pub reason: GameEndReason,
    pub turn_id: i32,
    pub phase: Phase,
    pub step: Step,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Failed(ValidationFailure),
    Terminal(GameOutcome),
}

/// Result of executing a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub turn_id: i32,
    pub phase: Phase,
    pub step: Step,
    pub outcome: StepOutcome,
}

impl StepResult {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, StepOutcome::Completed)
    }

    pub fn failure(&self) -> Option<&ValidationFailure> {
        match &self.outcome {
            StepOutcome::Failed(f) => Some(f),
            _ => None,
        }
    }

    pub fn terminal(&self) -> Option<&GameOutcome> {
        match &self.outcome {
            StepOutcome::Terminal(o) => Some(o),
            _ => None,
        }
    }
}

/// Result of a phase or turn: every step executed, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub steps: Vec<StepResult>,
}

impl ExecutionResult {
    /// No step failed
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|s| s.failure().is_none())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.steps.iter().filter_map(StepResult::failure)
    }

    /// Human-readable validation messages
    pub fn messages(&self) -> Vec<String> {
        self.failures().map(|f| f.to_string()).collect()
    }

    pub fn terminal(&self) -> Option<&GameOutcome> {
        self.steps.iter().find_map(StepResult::terminal)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.terminal().and_then(|o| o.winner)
    }

    /// Whether the run reached the end of a turn
    pub fn completed_turn(&self) -> bool {
        self.steps
            .last()
            .is_some_and(|s| s.step == Step::Cleanup && s.terminal().is_none())
    }

    pub fn last_step(&self) -> Option<Step> {
        self.steps.last().map(|s| s.step)
    }
}

/// Final result of a simulated game
#[derive(Debug, Clone)]
pub struct GameResult {
    pub tabletop: Tabletop,
    pub winner: Option<PlayerId>,
    pub end_reason: GameEndReason,
    pub outcome: GameOutcome,
    pub turns_played: u32,
    pub messages: Vec<String>,
}
