//! Applying validated actions to the tabletop

use crate::core::{
    Ability, Action, ActionKind, CardId, CostContext, DecisionWindow, EffectContext, ParameterKey,
    Target,
};
use crate::game::Tabletop;
use crate::{Result, SimError};

/// What an applied action changed, for logging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub kind: ActionKind,
    pub description: String,
    /// Creatures destroyed as a consequence
    pub destroyed: Vec<CardId>,
}

impl Tabletop {
    /// Validate, then pay costs, move cards and apply effects
    pub fn perform_action(&mut self, action: &Action, window: DecisionWindow) -> Result<ActionReport> {
        self.validate_action(action, window)?;

        let description = match action.kind {
            ActionKind::Pass => "passes".to_string(),
            ActionKind::PlayLand => {
                let card = action.card_parameter(ParameterKey::Card)?;
                let label = self.player(action.player)?.hand.get(card)?.label();
                self.play_from_hand(action.player, card)?;
                self.played_land_count += 1;
                format!("plays {label}")
            }
            ActionKind::PlayNonLand => self.cast_spell(action)?,
            ActionKind::ActivateManaAbility => self.activate_mana_ability(action)?,
            ActionKind::Discard => {
                let card = action.card_parameter(ParameterKey::Card)?;
                let label = self.player(action.player)?.hand.get(card)?.label();
                self.discard(action.player, card)?;
                format!("discards {label}")
            }
        };

        let destroyed = self.destroy_lethally_damaged()?;
        Ok(ActionReport {
            kind: action.kind,
            description,
            destroyed,
        })
    }

    fn cast_spell(&mut self, action: &Action) -> Result<String> {
        let card = action.card_parameter(ParameterKey::Card)?;
        let instance = self.player(action.player)?.hand.get(card)?.clone();

        let cost_ctx = CostContext {
            kind: action.kind,
            player: action.player,
            source: None,
        };
        action.cost.commit(self, &cost_ctx)?;
        self.hand_to_stack(action.player, card)?;

        if !instance.card.is_permanent_card() {
            if let Some(effect) = instance.card.spell_effect() {
                let effect_ctx = EffectContext {
                    kind: action.kind,
                    controller: action.player,
                    source: card,
                };
                effect.apply(self, &effect_ctx, &action.target)?;
            }
        }
        self.resolve_from_stack(card, action.player)?;

        Ok(match describe_target(&action.target) {
            Some(target) => format!("casts {} targeting {target}", instance.label()),
            None => format!("casts {}", instance.label()),
        })
    }

    fn activate_mana_ability(&mut self, action: &Action) -> Result<String> {
        let source = action.card_parameter(ParameterKey::Permanent)?;
        let index = action.index_parameter(ParameterKey::AbilityIndex)?;
        let permanent = self.permanent(source)?;
        let label = permanent.label();
        let effect = match permanent.card.abilities.get(index) {
            Some(Ability::Mana { effect, .. }) => *effect,
            _ => {
                return Err(SimError::ContractViolation(format!(
                    "{label} lost its mana ability {index} after validation"
                )))
            }
        };

        let cost_ctx = CostContext {
            kind: action.kind,
            player: action.player,
            source: Some(source),
        };
        action.cost.commit(self, &cost_ctx)?;
        let effect_ctx = EffectContext {
            kind: action.kind,
            controller: action.player,
            source,
        };
        effect.apply(self, &effect_ctx, &Target::default())?;
        Ok(format!("activates {label}: {effect}"))
    }
}

fn describe_target(target: &Target) -> Option<String> {
    if let Some(player) = target.player {
        return Some(format!("player {player}"));
    }
    target.permanents.first().map(|p| format!("permanent {p}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardKind, Color, Effect, ManaCost, PlayerId};
    use crate::game::Step;
    use std::sync::Arc;

    fn main_step_table() -> (Tabletop, PlayerId, PlayerId) {
        let mut table = Tabletop::new_two_player("Alice", "Bob", 20);
        table.start_turn();
        table.step = Step::Main1;
        let alice = table.active_id();
        let bob = table.nonactive_id();
        (table, alice, bob)
    }

    #[test]
    fn test_mana_then_creature() {
        let (mut table, alice, _) = main_step_table();
        let forest = Arc::new(Card::basic_land("Forest", Color::Green));
        let f1 = table.put_onto_battlefield(alice, forest.clone()).unwrap();
        let f2 = table.put_onto_battlefield(alice, forest).unwrap();
        let bear_card = Arc::new(Card::creature("Grizzly Bears", ManaCost::parse("1G").unwrap(), 2, 2));
        let bear = table.put_into_hand(alice, bear_card).unwrap();

        for land in [f1, f2] {
            let source = table.permanent(land).unwrap().clone();
            let action = Action::activate_mana_ability(alice, &source, 0);
            table.perform_action(&action, DecisionWindow::Prioritized).unwrap();
        }
        assert_eq!(table.player(alice).unwrap().mana_pool.amount(Color::Green), 2);

        let instance = table.player(alice).unwrap().hand.get(bear).unwrap().clone();
        let report = table
            .perform_action(&Action::play_non_land(alice, &instance, Target::default()), DecisionWindow::Prioritized)
            .unwrap();
        assert!(report.description.contains("Grizzly Bears"));

        let permanent = table.permanent(bear).unwrap();
        assert!(permanent.is_summoning_sick());
        assert_eq!(table.player(alice).unwrap().mana_pool.total(), 0);
        assert!(table.stack.is_empty());
    }

    #[test]
    fn test_bolt_kills_creature_and_goes_to_graveyard() {
        let (mut table, alice, bob) = main_step_table();
        let bolt = Arc::new(
            Card::new("Lightning Bolt")
                .with_kind(CardKind::Instant)
                .with_cost(ManaCost::of(Color::Red, 1))
                .with_ability(Ability::Spell {
                    effect: Effect::DealDamage { amount: 3 },
                }),
        );
        let bear = table
            .put_onto_battlefield(bob, Arc::new(Card::creature("Grizzly Bears", ManaCost::parse("1G").unwrap(), 2, 2)))
            .unwrap();
        let bolt = table.put_into_hand(alice, bolt).unwrap();
        table.player_mut(alice).unwrap().mana_pool.add(Color::Red, 1);

        let instance = table.player(alice).unwrap().hand.get(bolt).unwrap().clone();
        let report = table
            .perform_action(&Action::play_non_land(alice, &instance, Target::permanent(bear)), DecisionWindow::Prioritized)
            .unwrap();

        assert_eq!(report.destroyed, vec![bear]);
        assert!(table.player(bob).unwrap().graveyard.contains(bear));
        assert!(table.player(alice).unwrap().graveyard.contains(bolt));
    }

    #[test]
    fn test_rejected_action_changes_nothing() {
        let (mut table, alice, _) = main_step_table();
        let forest = Arc::new(Card::basic_land("Forest", Color::Green));
        let first = table.put_into_hand(alice, forest.clone()).unwrap();
        let second = table.put_into_hand(alice, forest).unwrap();

        table
            .perform_action(&Action::play_land(alice, first), DecisionWindow::Prioritized)
            .unwrap();
        let before = serde_json::to_string(&table).unwrap();
        let err = table
            .perform_action(&Action::play_land(alice, second), DecisionWindow::Prioritized)
            .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(serde_json::to_string(&table).unwrap(), before);
        assert_eq!(table.played_land_count, 1);
    }
}
