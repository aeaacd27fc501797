//! Game driver
//!
//! Calls the judge a turn at a time until the game ends, the turn cap is hit
//! or (when configured) a validation failure occurs. The driver only stops
//! between judge calls; it never interrupts a step.

use crate::config::SimulationConfig;
use crate::game::{
    ExecutionResult, GameEndReason, GameResult, Judge, Step, Tabletop,
};
use crate::Result;

pub struct GameSimulator {
    config: SimulationConfig,
}

impl GameSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        GameSimulator { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Turns begun so far (the Switch step has run)
    fn turns_started(tabletop: &Tabletop) -> u32 {
        (tabletop.turn_id + 1).max(0) as u32
    }

    /// Run until a terminal outcome
    ///
    /// The turn cap is checked before each new turn starts, so a capped game
    /// has played exactly `max_turn_count` full turns.
    pub fn run(&self, mut tabletop: Tabletop, judge: &mut Judge) -> Result<GameResult> {
        let mut messages = Vec::new();

        loop {
            if tabletop.outcome.is_some() {
                break;
            }
            if tabletop.step == Step::Switch && Self::turns_started(&tabletop) >= self.config.max_turn_count {
                let outcome = tabletop.outcome_here(None, GameEndReason::TurnLimit);
                judge.declare_outcome(&mut tabletop, outcome);
                break;
            }

            let result = judge.execute_next_turn(&mut tabletop)?;
            messages.extend(result.messages());
            self.stop_on_failure(&mut tabletop, judge, &result);
        }

        Self::finish(tabletop, messages)
    }

    /// Run at most `turns` more turns, ending early if the game does
    pub fn run_turns(&self, tabletop: &mut Tabletop, judge: &mut Judge, turns: u32) -> Result<ExecutionResult> {
        let mut all = ExecutionResult::default();
        let mut finished = 0;
        while finished < turns && tabletop.outcome.is_none() {
            let result = judge.execute_next_turn(tabletop)?;
            if result.completed_turn() {
                finished += 1;
            }
            self.stop_on_failure(tabletop, judge, &result);
            all.steps.extend(result.steps);
        }
        Ok(all)
    }

    fn stop_on_failure(&self, tabletop: &mut Tabletop, judge: &mut Judge, result: &ExecutionResult) {
        if !self.config.should_terminate_on_illegal_action || tabletop.outcome.is_some() {
            return;
        }
        if let Some(failed) = result.steps.iter().find(|s| s.failure().is_some()) {
            let mut outcome = tabletop.outcome_here(None, GameEndReason::IllegalAction);
            outcome.turn_id = failed.turn_id;
            outcome.phase = failed.phase;
            outcome.step = failed.step;
            judge.declare_outcome(tabletop, outcome);
        }
    }

    fn finish(tabletop: Tabletop, messages: Vec<String>) -> Result<GameResult> {
        let outcome = tabletop
            .outcome
            .clone()
            .ok_or_else(|| crate::SimError::ContractViolation("game finished without an outcome".into()))?;
        Ok(GameResult {
            winner: outcome.winner,
            end_reason: outcome.reason,
            turns_played: Self::turns_started(&tabletop),
            outcome,
            tabletop,
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, Card, Color};
    use crate::game::{GameLogger, ScriptedStrategy, ZeroStrategy};
    use std::sync::Arc;

    fn stocked_table() -> Tabletop {
        let mut table = Tabletop::new_two_player("Alice", "Bob", 20);
        let ids = [table.players()[0].id, table.players()[1].id];
        for id in ids {
            for _ in 0..40 {
                table
                    .put_into_library(id, Arc::new(Card::basic_land("Forest", Color::Green)))
                    .unwrap();
            }
        }
        table
    }

    #[test]
    fn test_turn_cap() {
        let mut table = stocked_table();
        let alice = table.players()[0].id;
        let bob = table.players()[1].id;
        let mut judge = Judge::new(
            &mut table,
            Box::new(ZeroStrategy::new(alice)),
            Box::new(ZeroStrategy::new(bob)),
        )
        .with_logger(GameLogger::silent());

        let sim = GameSimulator::new(SimulationConfig::default().with_max_turns(4));
        let result = sim.run(table, &mut judge).unwrap();
        assert_eq!(result.end_reason, GameEndReason::TurnLimit);
        assert_eq!(result.turns_played, 4);
        assert_eq!(result.winner, None);
        assert_eq!(result.tabletop.turn_id, 3);
    }

    #[test]
    fn test_illegal_action_terminates_when_configured() {
        let mut table = stocked_table();
        let alice = table.players()[0].id;
        let bob = table.players()[1].id;
        // A land id that is not in Alice's hand
        let bogus = Action::play_land(alice, crate::core::CardId::new(9_999));
        let mut judge = Judge::new(
            &mut table,
            Box::new(ScriptedStrategy::new(alice).with_actions([bogus])),
            Box::new(ZeroStrategy::new(bob)),
        )
        .with_logger(GameLogger::silent());

        let sim = GameSimulator::new(SimulationConfig::default().with_terminate_on_illegal_action(true));
        let result = sim.run(table, &mut judge).unwrap();
        assert_eq!(result.end_reason, GameEndReason::IllegalAction);
        assert_eq!(result.outcome.step, Step::Main1);
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn test_run_turns_counts_full_turns() {
        let mut table = stocked_table();
        let alice = table.players()[0].id;
        let bob = table.players()[1].id;
        let mut judge = Judge::new(
            &mut table,
            Box::new(ZeroStrategy::new(alice)),
            Box::new(ZeroStrategy::new(bob)),
        )
        .with_logger(GameLogger::silent());

        let sim = GameSimulator::new(SimulationConfig::default());
        let result = sim.run_turns(&mut table, &mut judge, 2).unwrap();
        assert!(result.is_success());
        assert_eq!(table.turn_id, 1);
        assert_eq!(table.step, Step::Switch);
    }
}
