//! Actions players submit, and the declarations made during combat and cleanup

use crate::core::{Ability, CardId, CardInstance, Cost, Permanent, PlayerId};
use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionKind {
    PlayLand,
    PlayNonLand,
    ActivateManaAbility,
    Discard,
    Pass,
}

/// Named slots an action carries its references in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParameterKey {
    /// Card in hand being played or discarded
    Card,
    /// Permanent whose ability is activated
    Permanent,
    /// Which ability of that permanent
    AbilityIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterValue {
    Card(CardId),
    Index(usize),
}

/// What an action points at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub player: Option<PlayerId>,
    pub cards: SmallVec<[CardId; 2]>,
    pub permanents: SmallVec<[CardId; 2]>,
}

impl Target {
    pub fn player(player: PlayerId) -> Self {
        Target {
            player: Some(player),
            ..Target::default()
        }
    }

    pub fn permanent(permanent: CardId) -> Self {
        let mut target = Target::default();
        target.permanents.push(permanent);
        target
    }

    pub fn is_empty(&self) -> bool {
        self.player.is_none() && self.cards.is_empty() && self.permanents.is_empty()
    }
}

/// A player's request to change the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub kind: ActionKind,
    pub player: PlayerId,
    pub cost: Cost,
    pub target: Target,
    pub parameters: BTreeMap<ParameterKey, ParameterValue>,
}

impl Action {
    fn new(kind: ActionKind, player: PlayerId) -> Self {
        Action {
            kind,
            player,
            cost: Cost::None,
            target: Target::default(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn pass(player: PlayerId) -> Self {
        Action::new(ActionKind::Pass, player)
    }

    pub fn play_land(player: PlayerId, card: CardId) -> Self {
        Action::new(ActionKind::PlayLand, player).with_card(card)
    }

    /// Cast a spell from hand, paying its printed cost from the pool
    pub fn play_non_land(player: PlayerId, card: &CardInstance, target: Target) -> Self {
        let mut action = Action::new(ActionKind::PlayNonLand, player).with_card(card.id);
        action.cost = Action::expected_spell_cost(card);
        action.target = target;
        action
    }

    pub fn activate_mana_ability(player: PlayerId, permanent: &Permanent, ability_index: usize) -> Self {
        let mut action = Action::new(ActionKind::ActivateManaAbility, player);
        action.cost = Action::expected_ability_cost(permanent, ability_index).unwrap_or_default();
        action
            .parameters
            .insert(ParameterKey::Permanent, ParameterValue::Card(permanent.id));
        action
            .parameters
            .insert(ParameterKey::AbilityIndex, ParameterValue::Index(ability_index));
        action
    }

    pub fn discard(player: PlayerId, card: CardId) -> Self {
        Action::new(ActionKind::Discard, player).with_card(card)
    }

    fn with_card(mut self, card: CardId) -> Self {
        self.parameters.insert(ParameterKey::Card, ParameterValue::Card(card));
        self
    }

    pub fn expected_spell_cost(card: &CardInstance) -> Cost {
        if card.card.cost.is_zero() {
            Cost::None
        } else {
            Cost::PayMana(card.card.cost)
        }
    }

    pub fn expected_ability_cost(permanent: &Permanent, ability_index: usize) -> Option<Cost> {
        match permanent.card.abilities.get(ability_index)? {
            Ability::Mana { cost, .. } => Some(cost.clone()),
            _ => None,
        }
    }

    /// Card reference stored under `key`; missing means the action was built wrong
    pub fn card_parameter(&self, key: ParameterKey) -> Result<CardId> {
        match self.parameters.get(&key) {
            Some(ParameterValue::Card(id)) => Ok(*id),
            _ => Err(SimError::MissingParameter { kind: self.kind, key }),
        }
    }

    pub fn index_parameter(&self, key: ParameterKey) -> Result<usize> {
        match self.parameters.get(&key) {
            Some(ParameterValue::Index(i)) => Ok(*i),
            _ => Err(SimError::MissingParameter { kind: self.kind, key }),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} by player {}", self.kind, self.player)?;
        for (key, value) in &self.parameters {
            match value {
                ParameterValue::Card(id) => write!(f, " {key:?}={id}")?,
                ParameterValue::Index(i) => write!(f, " {key:?}={i}")?,
            }
        }
        if !matches!(self.cost, Cost::None) {
            write!(f, " paying {}", self.cost)?;
        }
        Ok(())
    }
}

/// Which decision a strategy is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionWindow {
    /// The active player holds priority in a main step
    Prioritized,
    /// The nonactive player may respond to the last action
    NonPrioritized,
    /// A rule forces the player to act
    Required(Requirement),
}

impl DecisionWindow {
    pub fn allows(&self, kind: ActionKind) -> bool {
        match self {
            DecisionWindow::Prioritized => kind != ActionKind::Discard,
            DecisionWindow::NonPrioritized => matches!(
                kind,
                ActionKind::Pass | ActionKind::ActivateManaAbility | ActionKind::PlayNonLand
            ),
            DecisionWindow::Required(Requirement::Discard { .. }) => kind == ActionKind::Discard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    /// Discard down to the maximum hand size
    Discard { count: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDeclaration {
    pub attackers: SmallVec<[CardId; 8]>,
}

impl AttackDeclaration {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(attackers: impl IntoIterator<Item = CardId>) -> Self {
        AttackDeclaration {
            attackers: attackers.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub blocker: CardId,
    pub attacker: CardId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDeclaration {
    pub blocks: SmallVec<[Block; 8]>,
}

impl BlockDeclaration {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with(blocks: impl IntoIterator<Item = (CardId, CardId)>) -> Self {
        BlockDeclaration {
            blocks: blocks
                .into_iter()
                .map(|(blocker, attacker)| Block { blocker, attacker })
                .collect(),
        }
    }
}
