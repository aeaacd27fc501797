//! Card definitions and card instances
//!
//! A `Card` is the immutable printed definition, shared between every copy in
//! every deck through an `Arc`. A `CardInstance` is one physical copy with its
//! own ID and owner, living in a library, hand, graveyard, stack or exile.

use crate::core::{CardName, Color, Cost, Effect, EntityId, GameEntity, ManaCost, PlayerId, Subtype};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// ID of a physical card; a permanent keeps the ID of the card it came from
pub type CardId = EntityId<Card>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Creature,
    Land,
    Instant,
    Sorcery,
    Artifact,
    Enchantment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SuperKind {
    #[default]
    None,
    Basic,
    Legendary,
    Snow,
}

/// Static keyword abilities understood by the combat rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Flying,
    Reach,
    Vigilance,
    Haste,
    Defender,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    /// Activated mana ability, e.g. "T: Add G"
    Mana { cost: Cost, effect: Effect },
    /// What an instant or sorcery does when it resolves
    Spell { effect: Effect },
    Keyword(Keyword),
}

/// Immutable card definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub name: CardName,
    pub kinds: SmallVec<[CardKind; 2]>,
    #[serde(default)]
    pub super_kind: SuperKind,
    #[serde(default)]
    pub sub_kinds: SmallVec<[Subtype; 2]>,
    #[serde(default)]
    pub cost: ManaCost,
    #[serde(default)]
    pub power: Option<i32>,
    #[serde(default)]
    pub toughness: Option<i32>,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl Card {
    pub fn new(name: impl Into<CardName>) -> Self {
        Card {
            name: name.into(),
            kinds: SmallVec::new(),
            super_kind: SuperKind::None,
            sub_kinds: SmallVec::new(),
            cost: ManaCost::new(),
            power: None,
            toughness: None,
            abilities: Vec::new(),
        }
    }

    /// A basic land tapping for one mana of `color`
    pub fn basic_land(name: impl Into<CardName>, color: Color) -> Self {
        Card::new(name)
            .with_kind(CardKind::Land)
            .with_super_kind(SuperKind::Basic)
            .with_ability(Ability::Mana {
                cost: Cost::TapSource,
                effect: Effect::AddMana { color, amount: 1 },
            })
    }

    pub fn creature(name: impl Into<CardName>, cost: ManaCost, power: i32, toughness: i32) -> Self {
        let mut card = Card::new(name).with_kind(CardKind::Creature).with_cost(cost);
        card.power = Some(power);
        card.toughness = Some(toughness);
        card
    }

    pub fn with_kind(mut self, kind: CardKind) -> Self {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
        self
    }

    pub fn with_super_kind(mut self, super_kind: SuperKind) -> Self {
        self.super_kind = super_kind;
        self
    }

    pub fn with_sub_kind(mut self, sub_kind: impl Into<Subtype>) -> Self {
        self.sub_kinds.push(sub_kind.into());
        self
    }

    pub fn with_cost(mut self, cost: ManaCost) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_keyword(self, keyword: Keyword) -> Self {
        self.with_ability(Ability::Keyword(keyword))
    }

    pub fn is_kind(&self, kind: CardKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_land(&self) -> bool {
        self.is_kind(CardKind::Land)
    }

    pub fn is_creature(&self) -> bool {
        self.is_kind(CardKind::Creature)
    }

    pub fn is_instant(&self) -> bool {
        self.is_kind(CardKind::Instant)
    }

    /// Cards that stay on the battlefield after resolving
    pub fn is_permanent_card(&self) -> bool {
        !self.kinds.is_empty() && !self.is_kind(CardKind::Instant) && !self.is_kind(CardKind::Sorcery)
    }

    pub fn keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.abilities.iter().filter_map(|a| match a {
            Ability::Keyword(k) => Some(*k),
            _ => None,
        })
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords().any(|k| k == keyword)
    }

    /// Indices into `abilities` of every mana ability
    pub fn mana_ability_indices(&self) -> SmallVec<[usize; 2]> {
        self.abilities
            .iter()
            .enumerate()
            .filter(|(_, a)| matches!(a, Ability::Mana { .. }))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn spell_effect(&self) -> Option<&Effect> {
        self.abilities.iter().find_map(|a| match a {
            Ability::Spell { effect } => Some(effect),
            _ => None,
        })
    }

    /// Stable 64-bit hash of the definition, used to spot identical cards
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// One physical copy of a card outside the battlefield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: CardId,
    pub card: Arc<Card>,
    pub owner: PlayerId,
}

impl CardInstance {
    pub fn new(id: CardId, card: Arc<Card>, owner: PlayerId) -> Self {
        CardInstance { id, card, owner }
    }

    /// "Name#id", used in logs and error context
    pub fn label(&self) -> String {
        format!("{}#{}", self.card.name, self.id)
    }
}

impl GameEntity<Card> for CardInstance {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.card.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_land() {
        let forest = Card::basic_land("Forest", Color::Green);
        assert!(forest.is_land());
        assert!(forest.is_permanent_card());
        assert_eq!(forest.super_kind, SuperKind::Basic);
        assert_eq!(forest.mana_ability_indices().as_slice(), &[0]);
    }

    #[test]
    fn test_creature_keywords() {
        let angel = Card::creature("Serra Angel", ManaCost::parse("3WW").unwrap(), 4, 4)
            .with_sub_kind("Angel")
            .with_keyword(Keyword::Flying)
            .with_keyword(Keyword::Vigilance);
        assert!(angel.is_creature());
        assert!(angel.has_keyword(Keyword::Flying));
        assert!(!angel.has_keyword(Keyword::Reach));
        assert_eq!(angel.cost.cmc(), 5);
    }

    #[test]
    fn test_instant_is_not_permanent() {
        let bolt = Card::new("Lightning Bolt")
            .with_kind(CardKind::Instant)
            .with_cost(ManaCost::of(Color::Red, 1))
            .with_ability(Ability::Spell {
                effect: Effect::DealDamage { amount: 3 },
            });
        assert!(!bolt.is_permanent_card());
        assert_eq!(bolt.spell_effect(), Some(&Effect::DealDamage { amount: 3 }));
    }

    #[test]
    fn test_fingerprint_distinguishes_definitions() {
        let a = Card::basic_land("Forest", Color::Green);
        let b = Card::basic_land("Forest", Color::Green);
        let c = Card::basic_land("Mountain", Color::Red);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_instance_label() {
        let card = Arc::new(Card::basic_land("Forest", Color::Green));
        let instance = CardInstance::new(CardId::new(4), card, PlayerId::new(0));
        assert_eq!(instance.label(), "Forest#4");
        assert_eq!(instance.name(), "Forest");
    }
}
