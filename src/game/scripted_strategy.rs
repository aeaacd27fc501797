//! Strategy that replays a fixed script, for deterministic tests
//!
//! Each decision kind has its own queue. An exhausted queue answers with a
//! pass (or an empty declaration). Scripted actions are not checked here;
//! the judge validates them like any other.

use crate::core::{
    Action, AttackDeclaration, BlockDeclaration, DecisionWindow, PlayerId, Requirement,
};
use crate::game::{Strategy, TabletopView};
use std::collections::VecDeque;

pub struct ScriptedStrategy {
    player: PlayerId,
    actions: VecDeque<Action>,
    responses: VecDeque<Action>,
    attacks: VecDeque<AttackDeclaration>,
    blocks: VecDeque<BlockDeclaration>,
}

impl ScriptedStrategy {
    pub fn new(player: PlayerId) -> Self {
        ScriptedStrategy {
            player,
            actions: VecDeque::new(),
            responses: VecDeque::new(),
            attacks: VecDeque::new(),
            blocks: VecDeque::new(),
        }
    }

    /// Actions taken while holding priority, in order
    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Reactive actions taken in the nonactive window, in order
    pub fn with_responses(mut self, responses: impl IntoIterator<Item = Action>) -> Self {
        self.responses.extend(responses);
        self
    }

    /// One declaration per combat this seat attacks in
    pub fn with_attacks(mut self, attacks: impl IntoIterator<Item = AttackDeclaration>) -> Self {
        self.attacks.extend(attacks);
        self
    }

    pub fn with_blocks(mut self, blocks: impl IntoIterator<Item = BlockDeclaration>) -> Self {
        self.blocks.extend(blocks);
        self
    }

    pub fn remaining_actions(&self) -> usize {
        self.actions.len()
    }
}

impl Strategy for ScriptedStrategy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn declare_attackers(&mut self, _view: &TabletopView) -> AttackDeclaration {
        self.attacks.pop_front().unwrap_or_default()
    }

    fn declare_blockers(&mut self, _view: &TabletopView) -> BlockDeclaration {
        self.blocks.pop_front().unwrap_or_default()
    }

    fn perform_prioritized_action(&mut self, _view: &TabletopView) -> Action {
        self.actions
            .pop_front()
            .unwrap_or_else(|| Action::pass(self.player))
    }

    fn perform_non_prioritized_action(&mut self, _view: &TabletopView) -> Action {
        self.responses
            .pop_front()
            .unwrap_or_else(|| Action::pass(self.player))
    }

    fn perform_required_action(&mut self, view: &TabletopView, requirement: Requirement) -> Action {
        view.candidate_actions(DecisionWindow::Required(requirement))
            .into_iter()
            .next()
            .unwrap_or_else(|| Action::pass(self.player))
    }
}
