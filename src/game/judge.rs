//! The judge: turn state machine driving one step at a time
//!
//! Each call executes steps against a tabletop until it reaches the end of
//! the requested unit (step, phase or turn), the first validation failure, or
//! a terminal outcome. Validation failures abort the current step and are
//! reported in the result; everything committed before the failing action
//! stays committed. Broken contracts (a strategy answering the wrong kind of
//! decision, a missing player) come back as `Err`.

use crate::core::{Action, ActionKind, CardId, DecisionWindow, PlayerId, Requirement};
use crate::game::{
    ExecutionResult, GameEndReason, GameLogger, GameOutcome, Step, StepOutcome, StepResult,
    Strategy, Tabletop, TabletopView, VerbosityLevel,
};
use crate::{Result, SimError};
use smallvec::SmallVec;

/// Guard against strategies that never pass priority
pub const DEFAULT_MAX_ACTIONS_PER_WINDOW: usize = 1000;

pub struct Judge {
    seats: Vec<(PlayerId, Box<dyn Strategy>)>,
    max_actions_per_window: usize,
    logger: GameLogger,
}

impl Judge {
    /// Seat `first` and `second` at the tabletop's two players, in order
    pub fn new(tabletop: &mut Tabletop, first: Box<dyn Strategy>, second: Box<dyn Strategy>) -> Self {
        let ids = [tabletop.players()[0].id, tabletop.players()[1].id];
        let mut seats = Vec::with_capacity(2);
        for (id, strategy) in ids.into_iter().zip([first, second]) {
            if let Ok(player) = tabletop.player_mut(id) {
                player.strategy_name = strategy.name().to_string();
            }
            seats.push((id, strategy));
        }
        Judge {
            seats,
            max_actions_per_window: DEFAULT_MAX_ACTIONS_PER_WINDOW,
            logger: GameLogger::new(),
        }
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_max_actions_per_window(mut self, max: usize) -> Self {
        self.max_actions_per_window = max;
        self
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut GameLogger {
        &mut self.logger
    }

    fn strategy_mut(&mut self, player: PlayerId) -> Result<&mut Box<dyn Strategy>> {
        self.seats
            .iter_mut()
            .find(|(id, _)| *id == player)
            .map(|(_, s)| s)
            .ok_or_else(|| SimError::ContractViolation(format!("no strategy seated for player {player}")))
    }

    /// Execute exactly one step
    pub fn execute_next_step(&mut self, tabletop: &mut Tabletop) -> Result<StepResult> {
        let step = tabletop.step;
        if let Some(outcome) = &tabletop.outcome {
            return Ok(StepResult {
                turn_id: tabletop.turn_id,
                phase: step.phase(),
                step,
                outcome: StepOutcome::Terminal(outcome.clone()),
            });
        }

        tabletop.phase = step.phase();
        let outcome = match self.run_step(tabletop, step) {
            Ok(outcome) => outcome,
            Err(e) if e.is_validation() => {
                let failure = e.to_failure();
                self.logger
                    .event(VerbosityLevel::Normal, "failure", &format!("{step:?} aborted: {failure}"));
                StepOutcome::Failed(failure)
            }
            Err(e) => return Err(e),
        };
        let result = StepResult {
            turn_id: tabletop.turn_id,
            phase: step.phase(),
            step,
            outcome,
        };

        match &result.outcome {
            StepOutcome::Terminal(outcome) => self.declare_outcome(tabletop, outcome.clone()),
            _ => self.advance(tabletop, step),
        }
        Ok(result)
    }

    /// Execute steps until the current phase is over
    pub fn execute_next_phase(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::default();
        loop {
            let step = self.execute_next_step(tabletop)?;
            let stop = !step.is_completed() || step.step.ends_phase();
            result.steps.push(step);
            if stop {
                return Ok(result);
            }
        }
    }

    /// Execute steps through the end of the current turn (Setup included, if pending)
    pub fn execute_next_turn(&mut self, tabletop: &mut Tabletop) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::default();
        loop {
            let step = self.execute_next_step(tabletop)?;
            let stop = !step.is_completed() || step.step == Step::Cleanup;
            result.steps.push(step);
            if stop {
                return Ok(result);
            }
        }
    }

    fn advance(&mut self, tabletop: &mut Tabletop, step: Step) {
        if step.ends_phase() {
            tabletop.empty_mana_pools();
        }
        let next = step.next();
        tabletop.step = next;
        tabletop.phase = next.phase();
        tabletop.set_prioritized(None);
        self.logger.reset_step_header();
    }

    /// Record a terminal outcome and notify both strategies
    pub fn declare_outcome(&mut self, tabletop: &mut Tabletop, outcome: GameOutcome) {
        tabletop.set_prioritized(None);
        tabletop.outcome = Some(outcome.clone());

        let verdict = match outcome.winner.and_then(|w| tabletop.player(w).ok()) {
            Some(winner) => format!("{} wins ({:?})", winner.name, outcome.reason),
            None => format!("Game drawn ({:?})", outcome.reason),
        };
        self.logger.event(
            VerbosityLevel::Minimal,
            "outcome",
            &format!("{verdict} on turn {} during {:?}", outcome.turn_id, outcome.step),
        );

        for (id, strategy) in self.seats.iter_mut() {
            strategy.on_game_end(&TabletopView::new(tabletop, *id), &outcome);
        }
    }

    fn run_step(&mut self, tabletop: &mut Tabletop, step: Step) -> Result<StepOutcome> {
        match step {
            Step::Setup => self.setup(tabletop),
            Step::Switch => self.switch(tabletop),
            Step::Untap => self.untap(tabletop),
            Step::Upkeep | Step::End => Ok(StepOutcome::Completed),
            Step::Draw => self.draw(tabletop),
            Step::Main1 | Step::Main2 => self.priority_loop(tabletop),
            Step::DeclareAttackers => self.declare_attackers(tabletop),
            Step::DeclareBlockers => self.declare_blockers(tabletop),
            Step::CombatDamage => self.combat_damage(tabletop),
            Step::Cleanup => self.cleanup(tabletop),
        }
    }

    /// Header for the current step, printed before its first event
    fn step_header(&mut self, tabletop: &Tabletop) {
        let (turn_id, step) = (tabletop.turn_id, tabletop.step);
        self.logger.step_header(|| format!("Turn {turn_id}, {step:?}:"));
    }

    fn player_name(tabletop: &Tabletop, player: PlayerId) -> String {
        tabletop
            .player(player)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|_| format!("player {player}"))
    }

    /// Shuffle libraries and draw opening hands
    fn setup(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        let hand_size = tabletop.rules.opening_hand_size;
        let ids = [tabletop.players()[0].id, tabletop.players()[1].id];
        for id in ids {
            tabletop.shuffle_library(id)?;
            let available = tabletop.player(id)?.library.quantity();
            tabletop.draw_cards(id, hand_size.min(available))?;
        }
        if self.logger.wants(VerbosityLevel::Normal) {
            let [first, second] = tabletop.players();
            self.logger.normal(&format!(
                "Setup: {} ({}) vs {} ({}); {} goes first",
                first.name,
                first.deck.name,
                second.name,
                second.deck.name,
                tabletop.active_player().name
            ));
        }
        Ok(StepOutcome::Completed)
    }

    fn switch(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        tabletop.start_turn();
        if self.logger.wants(VerbosityLevel::Normal) {
            self.logger.event(
                VerbosityLevel::Normal,
                "turn",
                &format!("Turn {} ({})", tabletop.turn_id, tabletop.active_player().name),
            );
        }
        Ok(StepOutcome::Completed)
    }

    /// Untap the active player's permanents; their creatures lose summoning sickness
    fn untap(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        let active = tabletop.active_id();
        let ids: SmallVec<[CardId; 16]> = tabletop.permanents_controlled_by(active).map(|p| p.id).collect();
        for id in ids {
            let permanent = tabletop.permanent_mut(id)?;
            permanent.untap()?;
            if let Ok(creature) = permanent.creature_mut() {
                creature.summoning_sick = false;
            }
        }
        Ok(StepOutcome::Completed)
    }

    fn draw(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        if tabletop.is_first_turn() {
            self.logger.verbose("(first turn, no draw)");
            return Ok(StepOutcome::Completed);
        }
        let active = tabletop.active_id();
        match tabletop.draw_cards(active, 1) {
            Ok(drawn) => {
                if self.logger.wants(VerbosityLevel::Verbose) {
                    let hand = &tabletop.player(active)?.hand;
                    let labels: Vec<String> = drawn
                        .iter()
                        .filter_map(|id| hand.get(*id).ok())
                        .map(|c| c.label())
                        .collect();
                    self.logger.verbose(&format!(
                        "{} draws {}",
                        Self::player_name(tabletop, active),
                        labels.join(", ")
                    ));
                }
                Ok(StepOutcome::Completed)
            }
            Err(SimError::ZoneUnderflow { .. }) => {
                let winner = tabletop.nonactive_id();
                Ok(StepOutcome::Terminal(
                    tabletop.outcome_here(Some(winner), GameEndReason::Decking),
                ))
            }
            Err(e) => Err(e),
        }
    }

    fn expect_decider(action: &Action, player: PlayerId) -> Result<()> {
        if action.player != player {
            return Err(SimError::ContractViolation(format!(
                "strategy for player {player} returned an action for player {}",
                action.player
            )));
        }
        Ok(())
    }

    /// Validate, apply and log one action
    fn apply(&mut self, tabletop: &mut Tabletop, action: &Action, window: DecisionWindow) -> Result<()> {
        match tabletop.perform_action(action, window) {
            Ok(report) => {
                if self.logger.wants(VerbosityLevel::Normal) {
                    self.step_header(tabletop);
                    let name = Self::player_name(tabletop, action.player);
                    self.logger
                        .event(VerbosityLevel::Normal, "action", &format!("{name} {}", report.description));
                    for id in report.destroyed {
                        self.logger
                            .event(VerbosityLevel::Normal, "action", &format!("creature {id} dies"));
                    }
                }
                Ok(())
            }
            Err(e) => {
                if self.logger.wants(VerbosityLevel::Verbose) {
                    self.logger.verbose(&format!("rejected {action}: {e}"));
                }
                Err(e)
            }
        }
    }

    /// Active player acts until passing; the opponent may answer each action
    fn priority_loop(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        let active = tabletop.active_id();
        let nonactive = tabletop.nonactive_id();

        for _ in 0..self.max_actions_per_window {
            tabletop.set_prioritized(Some(active));
            let action = {
                let view = TabletopView::new(tabletop, active);
                self.strategy_mut(active)?.perform_prioritized_action(&view)
            };
            Self::expect_decider(&action, active)?;
            if action.kind == ActionKind::Pass {
                tabletop.set_prioritized(None);
                return Ok(StepOutcome::Completed);
            }
            self.apply(tabletop, &action, DecisionWindow::Prioritized)?;
            if let Some(outcome) = tabletop.check_life_totals() {
                return Ok(StepOutcome::Terminal(outcome));
            }

            tabletop.set_prioritized(Some(nonactive));
            let response = {
                let view = TabletopView::new(tabletop, nonactive);
                self.strategy_mut(nonactive)?.perform_non_prioritized_action(&view)
            };
            Self::expect_decider(&response, nonactive)?;
            if response.kind != ActionKind::Pass {
                self.apply(tabletop, &response, DecisionWindow::NonPrioritized)?;
                if let Some(outcome) = tabletop.check_life_totals() {
                    return Ok(StepOutcome::Terminal(outcome));
                }
            }
        }
        Err(SimError::ContractViolation(format!(
            "player {active} took more than {} actions without passing",
            self.max_actions_per_window
        )))
    }

    /// Tap and register attackers one at a time; an invalid attacker aborts the step
    fn declare_attackers(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        let active = tabletop.active_id();
        let defender = tabletop.nonactive_id();
        let declaration = {
            let view = TabletopView::new(tabletop, active);
            self.strategy_mut(active)?.declare_attackers(&view)
        };

        let mut accepted: SmallVec<[CardId; 8]> = SmallVec::new();
        for attacker in declaration.attackers {
            tabletop.validate_attacker(attacker, &accepted)?;
            let permanent = tabletop.permanent_mut(attacker)?;
            if permanent.taps_to_attack() {
                permanent.tap()?;
            }
            let label = permanent.label();
            tabletop.combat.declare_attacker(attacker, defender);
            accepted.push(attacker);
            if self.logger.wants(VerbosityLevel::Normal) {
                self.step_header(tabletop);
                self.logger.event(
                    VerbosityLevel::Normal,
                    "combat",
                    &format!("{} attacks with {label}", Self::player_name(tabletop, active)),
                );
            }
        }
        Ok(StepOutcome::Completed)
    }

    /// Register blocks; blockers do not tap
    fn declare_blockers(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        if !tabletop.combat.has_attackers() {
            return Ok(StepOutcome::Completed);
        }
        let defender = tabletop.nonactive_id();
        let declaration = {
            let view = TabletopView::new(tabletop, defender);
            self.strategy_mut(defender)?.declare_blockers(&view)
        };

        let mut accepted = Vec::with_capacity(declaration.blocks.len());
        for block in declaration.blocks {
            tabletop.validate_block(&block, &accepted)?;
            tabletop.combat.declare_block(block);
            accepted.push(block);
            if self.logger.wants(VerbosityLevel::Normal) {
                self.step_header(tabletop);
                let blocker = tabletop.permanent(block.blocker)?.label();
                let attacker = tabletop.permanent(block.attacker)?.label();
                self.logger.event(
                    VerbosityLevel::Normal,
                    "combat",
                    &format!("{blocker} blocks {attacker}"),
                );
            }
        }
        Ok(StepOutcome::Completed)
    }

    /// Compute all combat damage first, then apply it at once
    fn combat_damage(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        let mut to_players: SmallVec<[(PlayerId, i32); 8]> = SmallVec::new();
        let mut to_creatures: SmallVec<[(CardId, i32); 8]> = SmallVec::new();

        let attackers: SmallVec<[CardId; 8]> = tabletop.combat.attackers().collect();
        for attacker_id in attackers {
            let Ok(attacker) = tabletop.permanent(attacker_id) else {
                continue;
            };
            let power = attacker.creature()?.power;
            let blockers = tabletop.combat.blockers_of(attacker_id);

            if blockers.is_empty() {
                if let Some(defender) = tabletop.combat.defending_player(attacker_id) {
                    to_players.push((defender, power));
                }
                continue;
            }

            // Lethal damage to each blocker in order; the last takes the rest
            let mut remaining = power;
            for (i, blocker_id) in blockers.iter().enumerate() {
                let blocker = tabletop.permanent(*blocker_id)?.creature()?;
                let assigned = if i + 1 == blockers.len() {
                    remaining
                } else {
                    blocker.remaining_toughness().min(remaining)
                };
                remaining -= assigned;
                to_creatures.push((*blocker_id, assigned));
                to_creatures.push((attacker_id, blocker.power));
            }
        }

        for (player, amount) in to_players.iter().filter(|(_, a)| *a > 0) {
            tabletop.player_mut(*player)?.lose_life(*amount);
            if self.logger.wants(VerbosityLevel::Normal) {
                self.step_header(tabletop);
                self.logger.event(
                    VerbosityLevel::Normal,
                    "combat",
                    &format!("{} takes {amount} combat damage", Self::player_name(tabletop, *player)),
                );
            }
        }
        for (creature, amount) in to_creatures.iter().filter(|(_, a)| *a > 0) {
            tabletop.permanent_mut(*creature)?.creature_mut()?.damage += *amount;
            if self.logger.wants(VerbosityLevel::Verbose) {
                self.logger.verbose(&format!("creature {creature} takes {amount} damage"));
            }
        }

        for id in tabletop.destroy_lethally_damaged()? {
            self.logger
                .event(VerbosityLevel::Normal, "combat", &format!("creature {id} dies"));
        }

        match tabletop.check_life_totals() {
            Some(outcome) => Ok(StepOutcome::Terminal(outcome)),
            None => Ok(StepOutcome::Completed),
        }
    }

    /// Discard to hand size, remove damage, end combat
    fn cleanup(&mut self, tabletop: &mut Tabletop) -> Result<StepOutcome> {
        let active = tabletop.active_id();
        let hand_size = tabletop.player(active)?.hand.quantity();
        let excess = hand_size.saturating_sub(tabletop.rules.max_hand_size);

        for remaining in (1..=excess).rev() {
            let requirement = Requirement::Discard { count: remaining };
            let action = {
                let view = TabletopView::new(tabletop, active);
                self.strategy_mut(active)?
                    .perform_required_action(&view, requirement)
            };
            Self::expect_decider(&action, active)?;
            self.apply(tabletop, &action, DecisionWindow::Required(requirement))?;
        }

        for permanent in tabletop.battlefield.iter_mut() {
            if let Ok(creature) = permanent.creature_mut() {
                creature.damage = 0;
            }
        }
        tabletop.combat.clear();
        Ok(StepOutcome::Completed)
    }
}
