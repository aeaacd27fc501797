//! Legality checks for actions and combat declarations
//!
//! Nothing in this module mutates the tabletop. A rejected action or
//! declaration therefore leaves the table exactly as it was.

use crate::core::{
    Ability, Action, ActionKind, Block, CardId, CardInstance, CostContext, DecisionWindow,
    EffectContext, Keyword, ParameterKey, Permanent, PlayerId, Target,
};
use crate::error::ErrorContext;
use crate::game::Tabletop;
use crate::{Result, SimError};

fn declaration(message: impl Into<String>, context: ErrorContext) -> SimError {
    SimError::IllegalDeclaration {
        message: message.into(),
        context,
    }
}

impl Tabletop {
    /// Card in `player`'s hand referenced by the action
    fn card_in_hand(&self, action: &Action) -> Result<&CardInstance> {
        let card = action.card_parameter(ParameterKey::Card)?;
        self.player(action.player)?.hand.get(card).map_err(|_| {
            SimError::illegal(
                action.kind,
                "card is not in the acting player's hand",
                vec![("card", card.to_string())],
            )
        })
    }

    /// Permanent and ability index referenced by an activation
    fn ability_source(&self, action: &Action) -> Result<(&Permanent, usize)> {
        let id = action.card_parameter(ParameterKey::Permanent)?;
        let index = action.index_parameter(ParameterKey::AbilityIndex)?;
        let permanent = self.permanent(id).map_err(|_| {
            SimError::illegal(
                action.kind,
                "source is not on the battlefield",
                vec![("permanent", id.to_string())],
            )
        })?;
        Ok((permanent, index))
    }

    /// Check an action against the rules; never mutates
    pub fn validate_action(&self, action: &Action, window: DecisionWindow) -> Result<()> {
        if !window.allows(action.kind) {
            return Err(SimError::ContractViolation(format!(
                "{:?} is not a valid response to a {:?} decision",
                action.kind, window
            )));
        }

        match action.kind {
            ActionKind::Pass => Ok(()),
            ActionKind::PlayLand => self.validate_play_land(action),
            ActionKind::PlayNonLand => self.validate_play_non_land(action, window),
            ActionKind::ActivateManaAbility => self.validate_mana_ability(action),
            ActionKind::Discard => self.card_in_hand(action).map(|_| ()),
        }
    }

    fn validate_play_land(&self, action: &Action) -> Result<()> {
        let card = self.card_in_hand(action)?;
        let context = || vec![("card", card.label())];

        if !card.card.is_land() {
            return Err(SimError::illegal(action.kind, "card is not a land", context()));
        }
        if action.player != self.active_id() || !self.step.is_main() {
            return Err(SimError::illegal(
                action.kind,
                "lands are played only by the active player in a main step",
                context(),
            ));
        }
        if self.played_land_count >= self.rules.lands_per_turn {
            let mut context = context();
            context.push(("played_land_count", self.played_land_count.to_string()));
            return Err(SimError::illegal(
                action.kind,
                format!("only {} land(s) may be played per turn", self.rules.lands_per_turn),
                context,
            ));
        }
        if !action.cost.is_free() {
            return Err(SimError::illegal(action.kind, "playing a land costs nothing", context()));
        }
        Ok(())
    }

    fn validate_play_non_land(&self, action: &Action, window: DecisionWindow) -> Result<()> {
        let card = self.card_in_hand(action)?;
        let context = || vec![("card", card.label())];

        if card.card.is_land() {
            return Err(SimError::illegal(action.kind, "lands are played with PlayLand", context()));
        }
        let sorcery_speed = window == DecisionWindow::Prioritized
            && action.player == self.active_id()
            && self.step.is_main();
        if !card.card.is_instant() && !sorcery_speed {
            return Err(SimError::illegal(
                action.kind,
                "only instants may be played outside the active player's main step",
                context(),
            ));
        }
        if action.cost != Action::expected_spell_cost(card) {
            return Err(SimError::illegal(
                action.kind,
                format!("cost {} does not match the card's cost {}", action.cost, card.card.cost),
                context(),
            ));
        }

        let cost_ctx = CostContext {
            kind: action.kind,
            player: action.player,
            source: None,
        };
        action.cost.validate(self, &cost_ctx)?;

        match card.card.spell_effect() {
            Some(effect) if !card.card.is_permanent_card() => {
                let effect_ctx = EffectContext {
                    kind: action.kind,
                    controller: action.player,
                    source: card.id,
                };
                effect.validate(self, &effect_ctx, &action.target)
            }
            _ if !action.target.is_empty() => Err(SimError::InvalidTarget(format!(
                "{} does not take a target",
                card.label()
            ))),
            _ => Ok(()),
        }
    }

    fn validate_mana_ability(&self, action: &Action) -> Result<()> {
        let (permanent, index) = self.ability_source(action)?;
        let context = || vec![("permanent", permanent.label()), ("ability", index.to_string())];

        if permanent.controller != action.player {
            return Err(SimError::illegal(
                action.kind,
                "cannot activate a permanent you do not control",
                context(),
            ));
        }
        let effect = match permanent.card.abilities.get(index) {
            Some(Ability::Mana { cost, effect }) => {
                if *cost != action.cost {
                    return Err(SimError::illegal(
                        action.kind,
                        format!("cost {} does not match the ability's cost {}", action.cost, cost),
                        context(),
                    ));
                }
                effect
            }
            _ => return Err(SimError::illegal(action.kind, "no mana ability at that index", context())),
        };

        let cost_ctx = CostContext {
            kind: action.kind,
            player: action.player,
            source: Some(permanent.id),
        };
        action.cost.validate(self, &cost_ctx)?;
        let effect_ctx = EffectContext {
            kind: action.kind,
            controller: action.player,
            source: permanent.id,
        };
        effect.validate(self, &effect_ctx, &Target::default())
    }

    /// Check one declared attacker; `already` lists attackers accepted before it
    pub fn validate_attacker(&self, attacker: CardId, already: &[CardId]) -> Result<()> {
        let permanent = self
            .permanent(attacker)
            .map_err(|_| declaration("attacker is not on the battlefield", vec![("attacker", attacker.to_string())]))?;
        let context = || vec![("attacker", permanent.label())];

        if permanent.controller != self.active_id() {
            return Err(declaration("attacker is not controlled by the active player", context()));
        }
        if !permanent.is_creature() {
            return Err(declaration("only creatures can attack", context()));
        }
        if already.contains(&attacker) {
            return Err(declaration("creature is already attacking", context()));
        }
        if permanent.is_tapped()? {
            return Err(declaration("tapped creatures cannot attack", context()));
        }
        if permanent.is_summoning_sick() {
            return Err(declaration("creature has summoning sickness", context()));
        }
        if permanent.has_keyword(Keyword::Defender) {
            return Err(declaration("creatures with defender cannot attack", context()));
        }
        Ok(())
    }

    /// Check one block against the current combat
    pub fn validate_block(&self, block: &Block, already: &[Block]) -> Result<()> {
        let blocker = self
            .permanent(block.blocker)
            .map_err(|_| declaration("blocker is not on the battlefield", vec![("blocker", block.blocker.to_string())]))?;
        let context = || {
            vec![
                ("blocker", blocker.label()),
                ("attacker", block.attacker.to_string()),
            ]
        };

        if blocker.controller != self.nonactive_id() {
            return Err(declaration("blocker is not controlled by the defending player", context()));
        }
        if !blocker.is_creature() {
            return Err(declaration("only creatures can block", context()));
        }
        if blocker.is_tapped()? {
            return Err(declaration("tapped creatures cannot block", context()));
        }
        if already.iter().any(|b| b.blocker == block.blocker) {
            return Err(declaration("creature is already blocking", context()));
        }
        if !self.combat.is_attacking(block.attacker) {
            return Err(declaration("blocked creature is not attacking", context()));
        }
        let attacker = self.permanent(block.attacker)?;
        if attacker.has_keyword(Keyword::Flying)
            && !blocker.has_keyword(Keyword::Flying)
            && !blocker.has_keyword(Keyword::Reach)
        {
            return Err(declaration(
                "flying attackers can only be blocked by flying or reach creatures",
                context(),
            ));
        }
        Ok(())
    }

    /// Creatures `player` could legally attack with right now
    pub fn eligible_attackers(&self, player: PlayerId) -> Vec<CardId> {
        if player != self.active_id() {
            return Vec::new();
        }
        self.permanents_controlled_by(player)
            .map(|p| p.id)
            .filter(|id| self.validate_attacker(*id, &[]).is_ok())
            .collect()
    }

    /// Every legal (blocker, attacker) pairing for `player`
    pub fn eligible_blocks(&self, player: PlayerId) -> Vec<Block> {
        if player != self.nonactive_id() {
            return Vec::new();
        }
        let attackers: Vec<CardId> = self.combat.attackers().collect();
        self.permanents_controlled_by(player)
            .flat_map(|p| attackers.iter().map(move |a| Block { blocker: p.id, attacker: *a }))
            .filter(|b| self.validate_block(b, &[]).is_ok())
            .collect()
    }

    /// Every action `player` could legally take in `window`, Pass first
    pub fn candidate_actions(&self, player: PlayerId, window: DecisionWindow) -> Vec<Action> {
        let Ok(me) = self.player(player) else {
            return Vec::new();
        };
        let mut candidates = Vec::new();
        if window.allows(ActionKind::Pass) {
            candidates.push(Action::pass(player));
        }

        for card in me.hand.iter() {
            if card.card.is_land() {
                candidates.push(Action::play_land(player, card.id));
            } else {
                match card.card.spell_effect() {
                    Some(effect) if effect.needs_target() && !card.card.is_permanent_card() => {
                        candidates.extend(self.damage_targets(player).into_iter().map(|t| {
                            Action::play_non_land(player, card, t)
                        }));
                    }
                    _ => candidates.push(Action::play_non_land(player, card, Target::default())),
                }
            }
            candidates.push(Action::discard(player, card.id));
        }

        for permanent in self.permanents_controlled_by(player) {
            for index in permanent.card.mana_ability_indices() {
                candidates.push(Action::activate_mana_ability(player, permanent, index));
            }
        }

        candidates.retain(|a| window.allows(a.kind) && self.validate_action(a, window).is_ok());
        candidates
    }

    /// Opponent first, then opposing creatures, then own creatures
    fn damage_targets(&self, player: PlayerId) -> Vec<Target> {
        let mut targets = Vec::new();
        if let Ok(opponent) = self.opponent(player) {
            targets.push(Target::player(opponent.id));
            targets.extend(
                self.permanents_controlled_by(opponent.id)
                    .filter(|p| p.is_creature())
                    .map(|p| Target::permanent(p.id)),
            );
        }
        targets.extend(
            self.permanents_controlled_by(player)
                .filter(|p| p.is_creature())
                .map(|p| Target::permanent(p.id)),
        );
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, CardKind, Color, Cost, Effect, ManaCost};
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

    fn forest() -> Arc<Card> {
        Arc::new(Card::basic_land("Forest", Color::Green))
    }

    fn bears() -> Arc<Card> {
        Arc::new(Card::creature("Grizzly Bears", ManaCost::parse("1G").unwrap(), 2, 2))
    }

    fn bolt() -> Arc<Card> {
        Arc::new(
            Card::new("Lightning Bolt")
                .with_kind(CardKind::Instant)
                .with_cost(ManaCost::of(Color::Red, 1))
                .with_ability(Ability::Spell {
                    effect: Effect::DealDamage { amount: 3 },
                }),
        )
    }

    #[test]
    fn test_land_limit() {
        let (mut table, alice, _) = main_step_table();
        let card = table.put_into_hand(alice, forest()).unwrap();
        let action = Action::play_land(alice, card);
        assert!(table.validate_action(&action, DecisionWindow::Prioritized).is_ok());

        table.played_land_count = 1;
        let err = table
            .validate_action(&action, DecisionWindow::Prioritized)
            .unwrap_err();
        let failure = err.to_failure();
        assert_eq!(failure.action_kind, Some(ActionKind::PlayLand));
        assert_eq!(failure.context_value("card"), Some(format!("Forest#{card}").as_str()));
    }

    #[test]
    fn test_land_outside_main_step() {
        let (mut table, alice, _) = main_step_table();
        table.step = Step::Upkeep;
        let card = table.put_into_hand(alice, forest()).unwrap();
        assert!(table
            .validate_action(&Action::play_land(alice, card), DecisionWindow::Prioritized)
            .is_err());
    }

    #[test]
    fn test_wrong_window_is_contract_violation() {
        let (mut table, alice, _) = main_step_table();
        let card = table.put_into_hand(alice, forest()).unwrap();
        let err = table
            .validate_action(&Action::discard(alice, card), DecisionWindow::Prioritized)
            .unwrap_err();
        assert!(matches!(err, SimError::ContractViolation(_)));
    }

    #[test]
    fn test_spell_needs_mana_and_matching_cost() {
        let (mut table, alice, _) = main_step_table();
        let card = table.put_into_hand(alice, bears()).unwrap();
        let instance = table.player(alice).unwrap().hand.get(card).unwrap().clone();

        let action = Action::play_non_land(alice, &instance, Target::default());
        let err = table
            .validate_action(&action, DecisionWindow::Prioritized)
            .unwrap_err();
        assert!(matches!(err, SimError::InsufficientMana { .. }));

        table.player_mut(alice).unwrap().mana_pool.add(Color::Green, 2);
        assert!(table.validate_action(&action, DecisionWindow::Prioritized).is_ok());

        let mut cheap = action.clone();
        cheap.cost = Cost::PayMana(ManaCost::of(Color::Green, 1));
        assert!(table.validate_action(&cheap, DecisionWindow::Prioritized).is_err());
    }

    #[test]
    fn test_instant_in_reactive_window() {
        let (mut table, _, bob) = main_step_table();
        let bears = table.put_into_hand(bob, bears()).unwrap();
        let bolt = table.put_into_hand(bob, bolt()).unwrap();
        table.player_mut(bob).unwrap().mana_pool.add(Color::Red, 1);
        table.player_mut(bob).unwrap().mana_pool.add(Color::Green, 2);
        let alice = table.active_id();

        let hand = &table.player(bob).unwrap().hand;
        let bolt_action = Action::play_non_land(bob, hand.get(bolt).unwrap(), Target::player(alice));
        let bears_action = Action::play_non_land(bob, hand.get(bears).unwrap(), Target::default());

        assert!(table
            .validate_action(&bolt_action, DecisionWindow::NonPrioritized)
            .is_ok());
        assert!(table
            .validate_action(&bears_action, DecisionWindow::NonPrioritized)
            .is_err());
    }

    #[test]
    fn test_mana_ability_validation() {
        let (mut table, alice, bob) = main_step_table();
        let forest = table.put_onto_battlefield(alice, forest()).unwrap();
        let permanent = table.permanent(forest).unwrap().clone();

        let action = Action::activate_mana_ability(alice, &permanent, 0);
        assert!(table.validate_action(&action, DecisionWindow::Prioritized).is_ok());

        let theirs = Action::activate_mana_ability(bob, &permanent, 0);
        assert!(table.validate_action(&theirs, DecisionWindow::NonPrioritized).is_err());

        table.permanent_mut(forest).unwrap().tap().unwrap();
        assert!(table.validate_action(&action, DecisionWindow::Prioritized).is_err());
    }

    #[test]
    fn test_attacker_rules() {
        let (mut table, alice, bob) = main_step_table();
        let sick = table.put_onto_battlefield(alice, bears()).unwrap();
        let ready = table.put_onto_battlefield(alice, bears()).unwrap();
        table.permanent_mut(ready).unwrap().creature_mut().unwrap().summoning_sick = false;
        let wall = table
            .put_onto_battlefield(
                alice,
                Arc::new(
                    Card::creature("Wall of Stone", ManaCost::parse("1RR").unwrap(), 0, 8)
                        .with_keyword(Keyword::Defender),
                ),
            )
            .unwrap();
        table.permanent_mut(wall).unwrap().creature_mut().unwrap().summoning_sick = false;
        let theirs = table.put_onto_battlefield(bob, bears()).unwrap();

        assert!(table.validate_attacker(sick, &[]).is_err());
        assert!(table.validate_attacker(ready, &[]).is_ok());
        assert!(table.validate_attacker(ready, &[ready]).is_err());
        assert!(table.validate_attacker(wall, &[]).is_err());
        assert!(table.validate_attacker(theirs, &[]).is_err());
        assert_eq!(table.eligible_attackers(alice), vec![ready]);
    }

    #[test]
    fn test_flying_blocks() {
        let (mut table, alice, bob) = main_step_table();
        let angel = table
            .put_onto_battlefield(
                alice,
                Arc::new(
                    Card::creature("Serra Angel", ManaCost::parse("3WW").unwrap(), 4, 4)
                        .with_keyword(Keyword::Flying),
                ),
            )
            .unwrap();
        let bear = table.put_onto_battlefield(bob, bears()).unwrap();
        let spider = table
            .put_onto_battlefield(
                bob,
                Arc::new(
                    Card::creature("Giant Spider", ManaCost::parse("3G").unwrap(), 2, 4)
                        .with_keyword(Keyword::Reach),
                ),
            )
            .unwrap();
        table.combat.declare_attacker(angel, bob);

        let by_bear = Block { blocker: bear, attacker: angel };
        let by_spider = Block { blocker: spider, attacker: angel };
        assert!(table.validate_block(&by_bear, &[]).is_err());
        assert!(table.validate_block(&by_spider, &[]).is_ok());
        assert!(table.validate_block(&by_spider, &[by_spider]).is_err());
        assert_eq!(table.eligible_blocks(bob), vec![by_spider]);
    }

    #[test]
    fn test_candidates_are_all_legal() {
        let (mut table, alice, bob) = main_step_table();
        table.put_into_hand(alice, forest()).unwrap();
        table.put_into_hand(alice, bolt()).unwrap();
        table.put_onto_battlefield(alice, forest()).unwrap();
        table.player_mut(alice).unwrap().mana_pool.add(Color::Red, 1);

        let candidates = table.candidate_actions(alice, DecisionWindow::Prioritized);
        assert_eq!(candidates[0].kind, ActionKind::Pass);
        let kinds: Vec<ActionKind> = candidates.iter().map(|a| a.kind).collect();
        assert!(kinds.contains(&ActionKind::PlayLand));
        assert!(kinds.contains(&ActionKind::ActivateManaAbility));
        // Bolt can target Bob (no creatures on either side)
        let bolts: Vec<&Action> = candidates
            .iter()
            .filter(|a| a.kind == ActionKind::PlayNonLand)
            .collect();
        assert_eq!(bolts.len(), 1);
        assert_eq!(bolts[0].target.player, Some(bob));
        assert!(!kinds.contains(&ActionKind::Discard));

        for action in &candidates {
            assert!(table.validate_action(action, DecisionWindow::Prioritized).is_ok());
        }
    }
}
