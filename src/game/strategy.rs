//! Decision boundary between the judge and the players
//!
//! The judge calls a strategy synchronously whenever its seat has to decide
//! something. A strategy only sees a [`TabletopView`] and answers with plain
//! data; the judge validates everything it returns.

use crate::core::{Action, AttackDeclaration, BlockDeclaration, PlayerId, Requirement};
use crate::game::{GameOutcome, RandomStrategy, TabletopView, ZeroStrategy};
use std::fmt;
use std::str::FromStr;

pub trait Strategy {
    fn name(&self) -> &str;

    /// Attackers for the active player's combat
    fn declare_attackers(&mut self, view: &TabletopView) -> AttackDeclaration;

    /// Blocks against the current attackers
    fn declare_blockers(&mut self, view: &TabletopView) -> BlockDeclaration;

    /// Next action while holding priority in a main step; Pass ends the step
    fn perform_prioritized_action(&mut self, view: &TabletopView) -> Action;

    /// Response of the nonactive player after the active player acted
    fn perform_non_prioritized_action(&mut self, view: &TabletopView) -> Action;

    /// Action forced by a rule, such as discarding to hand size
    fn perform_required_action(&mut self, view: &TabletopView, requirement: Requirement) -> Action;

    fn on_game_end(&mut self, _view: &TabletopView, _outcome: &GameOutcome) {}
}

/// Built-in strategies selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Zero,
    Random,
}

impl StrategyKind {
    pub fn create(self, player: PlayerId, seed: u64) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Zero => Box::new(ZeroStrategy::new(player)),
            StrategyKind::Random => Box::new(RandomStrategy::with_seed(player, seed)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Zero => write!(f, "zero"),
            StrategyKind::Random => write!(f, "random"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zero" => Ok(StrategyKind::Zero),
            "random" => Ok(StrategyKind::Random),
            _ => Err(format!("unknown strategy: {s} (expected zero or random)")),
        }
    }
}
