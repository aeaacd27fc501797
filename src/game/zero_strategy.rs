//! Deterministic strategy that always takes the first meaningful option
//!
//! Plays the first land, then the first castable spell, taps lands only when
//! that would make a spell in hand affordable, attacks with everything that
//! can and never blocks. Useful for tests and benchmarks.

use crate::core::{
    Action, ActionKind, AttackDeclaration, BlockDeclaration, DecisionWindow, ParameterKey, PlayerId,
    Requirement,
};
use crate::game::{Strategy, TabletopView};

pub struct ZeroStrategy {
    player: PlayerId,
}

impl ZeroStrategy {
    pub fn new(player: PlayerId) -> Self {
        ZeroStrategy { player }
    }

    fn choose(&self, view: &TabletopView, window: DecisionWindow) -> Action {
        let candidates = view.candidate_actions(window);

        let meaningful = candidates
            .iter()
            .find(|a| matches!(a.kind, ActionKind::PlayLand | ActionKind::PlayNonLand));
        if let Some(action) = meaningful {
            return action.clone();
        }

        if self.mana_would_help(view) {
            if let Some(tap) = candidates
                .iter()
                .find(|a| a.kind == ActionKind::ActivateManaAbility)
            {
                return tap.clone();
            }
        }
        Action::pass(self.player)
    }

    /// Whether some spell in hand costs no more than the mana we could make
    fn mana_would_help(&self, view: &TabletopView) -> bool {
        let Ok(pool) = view.mana_pool() else {
            return false;
        };
        let untapped_sources = view
            .permanents_of(self.player)
            .filter(|p| !p.is_tapped().unwrap_or(true) && !p.card.mana_ability_indices().is_empty())
            .count();
        let potential = pool.total() as usize + untapped_sources;
        view.hand()
            .iter()
            .filter(|c| !c.card.is_land())
            .any(|c| c.card.cost.cmc() as usize > pool.total() as usize && c.card.cost.cmc() as usize <= potential)
    }
}

impl Strategy for ZeroStrategy {
    fn name(&self) -> &str {
        "zero"
    }

    fn declare_attackers(&mut self, view: &TabletopView) -> AttackDeclaration {
        AttackDeclaration::with(view.eligible_attackers())
    }

    fn declare_blockers(&mut self, _view: &TabletopView) -> BlockDeclaration {
        BlockDeclaration::none()
    }

    fn perform_prioritized_action(&mut self, view: &TabletopView) -> Action {
        self.choose(view, DecisionWindow::Prioritized)
    }

    fn perform_non_prioritized_action(&mut self, _view: &TabletopView) -> Action {
        Action::pass(self.player)
    }

    fn perform_required_action(&mut self, view: &TabletopView, requirement: Requirement) -> Action {
        // First discard candidate, which is the bottom card of the hand
        let window = DecisionWindow::Required(requirement);
        view.candidate_actions(window)
            .into_iter()
            .find(|a| a.card_parameter(ParameterKey::Card).is_ok())
            .unwrap_or_else(|| Action::pass(self.player))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, Color, ManaCost};
    use crate::game::{Step, Tabletop};
    use std::sync::Arc;

    fn main_step_table() -> (Tabletop, PlayerId) {
        let mut table = Tabletop::new_two_player("Alice", "Bob", 20);
        table.start_turn();
        table.step = Step::Main1;
        let alice = table.active_id();
        (table, alice)
    }

    #[test]
    fn test_plays_land_first() {
        let (mut table, alice) = main_step_table();
        let land = table
            .put_into_hand(alice, Arc::new(Card::basic_land("Forest", Color::Green)))
            .unwrap();
        let mut zero = ZeroStrategy::new(alice);
        let action = zero.perform_prioritized_action(&TabletopView::new(&table, alice));
        assert_eq!(action.kind, ActionKind::PlayLand);
        assert_eq!(action.card_parameter(ParameterKey::Card).unwrap(), land);
    }

    #[test]
    fn test_taps_only_for_affordable_spells() {
        let (mut table, alice) = main_step_table();
        let forest = Arc::new(Card::basic_land("Forest", Color::Green));
        table.put_onto_battlefield(alice, forest).unwrap();
        table.played_land_count = 1;
        let mut zero = ZeroStrategy::new(alice);

        // Nothing to cast: pass instead of floating mana
        let action = zero.perform_prioritized_action(&TabletopView::new(&table, alice));
        assert_eq!(action.kind, ActionKind::Pass);

        let elf = Arc::new(Card::creature("Llanowar Elves", ManaCost::of(Color::Green, 1), 1, 1));
        table.put_into_hand(alice, elf).unwrap();
        let action = zero.perform_prioritized_action(&TabletopView::new(&table, alice));
        assert_eq!(action.kind, ActionKind::ActivateManaAbility);
    }

    #[test]
    fn test_never_responds() {
        let (table, alice) = main_step_table();
        let bob = table.nonactive_id();
        let mut zero = ZeroStrategy::new(bob);
        let action = zero.perform_non_prioritized_action(&TabletopView::new(&table, bob));
        assert_eq!(action.kind, ActionKind::Pass);
        assert_ne!(alice, bob);
    }

    #[test]
    fn test_discards_when_required() {
        let (mut table, alice) = main_step_table();
        table
            .put_into_hand(alice, Arc::new(Card::basic_land("Forest", Color::Green)))
            .unwrap();
        let mut zero = ZeroStrategy::new(alice);
        let action = zero.perform_required_action(
            &TabletopView::new(&table, alice),
            Requirement::Discard { count: 1 },
        );
        assert_eq!(action.kind, ActionKind::Discard);
    }
}
