//! Random strategy for baseline play
//!
//! Picks uniformly among the legal candidates the view offers. Seeded, so a
//! game between two random strategies is reproducible.

use crate::core::{
    Action, AttackDeclaration, BlockDeclaration, CardId, DecisionWindow, PlayerId, Requirement,
};
use crate::game::{Strategy, TabletopView};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub struct RandomStrategy {
    player: PlayerId,
    rng: StdRng,
}

impl RandomStrategy {
    pub fn with_seed(player: PlayerId, seed: u64) -> Self {
        RandomStrategy {
            player,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, view: &TabletopView, window: DecisionWindow) -> Action {
        view.candidate_actions(window)
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(|| Action::pass(self.player))
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &str {
        "random"
    }

    fn declare_attackers(&mut self, view: &TabletopView) -> AttackDeclaration {
        let attackers: Vec<CardId> = view
            .eligible_attackers()
            .into_iter()
            .filter(|_| self.rng.gen_bool(0.5))
            .collect();
        AttackDeclaration::with(attackers)
    }

    fn declare_blockers(&mut self, view: &TabletopView) -> BlockDeclaration {
        let mut used: Vec<CardId> = Vec::new();
        let mut declaration = BlockDeclaration::none();
        for block in view.eligible_blocks() {
            if used.contains(&block.blocker) || !self.rng.gen_bool(0.5) {
                continue;
            }
            used.push(block.blocker);
            declaration.blocks.push(block);
        }
        declaration
    }

    fn perform_prioritized_action(&mut self, view: &TabletopView) -> Action {
        self.pick(view, DecisionWindow::Prioritized)
    }

    fn perform_non_prioritized_action(&mut self, view: &TabletopView) -> Action {
        self.pick(view, DecisionWindow::NonPrioritized)
    }

    fn perform_required_action(&mut self, view: &TabletopView, requirement: Requirement) -> Action {
        self.pick(view, DecisionWindow::Required(requirement))
    }
}
