//! Tabletop state, turn structure and the judge that drives it

pub mod combat;
pub mod judge;
pub mod logger;
pub mod phase;
pub mod random_strategy;
pub mod resolution;
pub mod result;
pub mod scripted_strategy;
pub mod simulator;
pub mod strategy;
pub mod tabletop;
pub mod validation;
pub mod view;
pub mod zero_strategy;

pub use combat::CombatState;
pub use judge::{Judge, DEFAULT_MAX_ACTIONS_PER_WINDOW};
pub use logger::{GameLogger, LogEntry, OutputMode, VerbosityLevel};
pub use phase::{Phase, Step};
pub use random_strategy::RandomStrategy;
pub use resolution::ActionReport;
pub use result::{ExecutionResult, GameEndReason, GameOutcome, GameResult, StepOutcome, StepResult};
pub use scripted_strategy::ScriptedStrategy;
pub use simulator::GameSimulator;
pub use strategy::{Strategy, StrategyKind};
pub use tabletop::{TableRules, Tabletop};
pub use view::TabletopView;
pub use zero_strategy::ZeroStrategy;
