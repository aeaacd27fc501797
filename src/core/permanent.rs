//! Permanents: cards on the battlefield, modeled as a set of typed parts
//!
//! Every permanent has a `PermanentPart` (tap state). Creatures add a
//! `CreaturePart` and cards with keyword abilities add a `KeywordPart`.
//! A permanent holds at most one part of each kind.

use crate::core::{Card, CardId, CardInstance, GameEntity, Keyword, PlayerId};
use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    Permanent,
    Creature,
    Keywords,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermanentPart {
    pub tapped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreaturePart {
    pub power: i32,
    pub toughness: i32,
    pub damage: i32,
    pub summoning_sick: bool,
}

impl CreaturePart {
    pub fn has_lethal_damage(&self) -> bool {
        self.damage >= self.toughness
    }

    /// Damage still needed to destroy this creature
    pub fn remaining_toughness(&self) -> i32 {
        (self.toughness - self.damage).max(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeywordPart {
    pub keywords: SmallVec<[Keyword; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Part {
    Permanent(PermanentPart),
    Creature(CreaturePart),
    Keywords(KeywordPart),
}

impl Part {
    pub fn kind(&self) -> PartKind {
        match self {
            Part::Permanent(_) => PartKind::Permanent,
            Part::Creature(_) => PartKind::Creature,
            Part::Keywords(_) => PartKind::Keywords,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permanent {
    pub id: CardId,
    pub card: Arc<Card>,
    pub owner: PlayerId,
    pub controller: PlayerId,
    parts: SmallVec<[Part; 3]>,
}

impl Permanent {
    /// A permanent with only its base part
    pub fn new(id: CardId, card: Arc<Card>, owner: PlayerId, controller: PlayerId) -> Self {
        let mut parts = SmallVec::new();
        parts.push(Part::Permanent(PermanentPart::default()));
        Permanent {
            id,
            card,
            owner,
            controller,
            parts,
        }
    }

    /// Build the permanent a card becomes when it enters the battlefield
    pub fn enter(instance: &CardInstance, controller: PlayerId) -> Result<Self> {
        let card = &instance.card;
        if !card.is_permanent_card() {
            return Err(SimError::ContractViolation(format!(
                "{} cannot enter the battlefield",
                instance.label()
            )));
        }
        let mut permanent = Permanent::new(instance.id, Arc::clone(card), instance.owner, controller);

        if card.is_creature() {
            permanent.add_part(Part::Creature(CreaturePart {
                power: card.power.unwrap_or(0),
                toughness: card.toughness.unwrap_or(0),
                damage: 0,
                summoning_sick: true,
            }))?;
        }
        let keywords: SmallVec<[Keyword; 2]> = card.keywords().collect();
        if !keywords.is_empty() {
            permanent.add_part(Part::Keywords(KeywordPart { keywords }))?;
        }
        Ok(permanent)
    }

    /// The card that goes back to its owner's zones when this leaves play
    pub fn leave(&self) -> CardInstance {
        CardInstance::new(self.id, Arc::clone(&self.card), self.owner)
    }

    pub fn label(&self) -> String {
        format!("{}#{}", self.card.name, self.id)
    }

    pub fn add_part(&mut self, part: Part) -> Result<()> {
        if self.has_part(part.kind()) {
            return Err(SimError::DuplicatePart {
                permanent: self.label(),
                kind: part.kind(),
            });
        }
        self.parts.push(part);
        Ok(())
    }

    pub fn has_part(&self, kind: PartKind) -> bool {
        self.parts.iter().any(|p| p.kind() == kind)
    }

    pub fn part(&self, kind: PartKind) -> Result<&Part> {
        self.parts
            .iter()
            .find(|p| p.kind() == kind)
            .ok_or_else(|| self.missing(kind))
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    fn missing(&self, kind: PartKind) -> SimError {
        SimError::MissingPart {
            permanent: self.label(),
            kind,
        }
    }

    fn base_part_mut(&mut self) -> Result<&mut PermanentPart> {
        let missing = self.missing(PartKind::Permanent);
        self.parts
            .iter_mut()
            .find_map(|p| match p {
                Part::Permanent(base) => Some(base),
                _ => None,
            })
            .ok_or(missing)
    }

    pub fn creature(&self) -> Result<&CreaturePart> {
        match self.part(PartKind::Creature)? {
            Part::Creature(c) => Ok(c),
            _ => Err(self.missing(PartKind::Creature)),
        }
    }

    pub fn creature_mut(&mut self) -> Result<&mut CreaturePart> {
        let missing = self.missing(PartKind::Creature);
        self.parts
            .iter_mut()
            .find_map(|p| match p {
                Part::Creature(c) => Some(c),
                _ => None,
            })
            .ok_or(missing)
    }

    pub fn is_creature(&self) -> bool {
        self.has_part(PartKind::Creature)
    }

    pub fn is_tapped(&self) -> Result<bool> {
        match self.part(PartKind::Permanent)? {
            Part::Permanent(base) => Ok(base.tapped),
            _ => Err(self.missing(PartKind::Permanent)),
        }
    }

    pub fn tap(&mut self) -> Result<()> {
        self.base_part_mut()?.tapped = true;
        Ok(())
    }

    pub fn untap(&mut self) -> Result<()> {
        self.base_part_mut()?.tapped = false;
        Ok(())
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.parts.iter().any(|p| match p {
            Part::Keywords(k) => k.keywords.contains(&keyword),
            _ => false,
        })
    }

    /// A creature that came under its controller's control this turn and lacks haste
    pub fn is_summoning_sick(&self) -> bool {
        self.creature().map(|c| c.summoning_sick).unwrap_or(false) && !self.has_keyword(Keyword::Haste)
    }

    /// Attacking taps the creature unless it has vigilance
    pub fn taps_to_attack(&self) -> bool {
        !self.has_keyword(Keyword::Vigilance)
    }
}

impl GameEntity<Card> for Permanent {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.card.name.as_str()
    }
}
