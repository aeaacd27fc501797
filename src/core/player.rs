//! Player representation

use crate::core::{Card, CardInstance, EntityId, GameEntity, ManaPool, PlayerName};
use crate::zones::{Zone, ZoneKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type PlayerId = EntityId<Player>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerKind {
    #[default]
    Ai,
    Human,
    None,
}

/// A named list of card definitions, one entry per copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Arc<Card>>,
}

impl Deck {
    pub fn new(name: impl Into<String>, cards: Vec<Arc<Card>>) -> Self {
        Deck {
            name: name.into(),
            cards,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// A resolved seat at the table: who sits there and what they play
#[derive(Debug, Clone)]
pub struct Seat {
    pub name: PlayerName,
    pub kind: PlayerKind,
    pub deck: Deck,
}

impl Seat {
    pub fn new(name: impl Into<PlayerName>, kind: PlayerKind, deck: Deck) -> Self {
        Seat {
            name: name.into(),
            kind,
            deck,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub kind: PlayerKind,
    pub name: PlayerName,
    pub deck: Deck,
    /// Name of the strategy deciding for this seat
    pub strategy_name: String,
    pub library: Zone<CardInstance>,
    pub hand: Zone<CardInstance>,
    pub graveyard: Zone<CardInstance>,
    pub mana_pool: ManaPool,
    pub life: i32,
}

impl Player {
    pub fn new(id: PlayerId, seat: Seat, starting_life: i32) -> Self {
        Player {
            id,
            kind: seat.kind,
            name: seat.name,
            deck: seat.deck,
            strategy_name: String::new(),
            library: Zone::hidden(ZoneKind::Library, id),
            hand: Zone::hidden(ZoneKind::Hand, id),
            graveyard: Zone::public(ZoneKind::Graveyard, Some(id)),
            mana_pool: ManaPool::new(),
            life: starting_life,
        }
    }

    pub fn gain_life(&mut self, amount: i32) {
        self.life += amount;
    }

    pub fn lose_life(&mut self, amount: i32) {
        self.life -= amount;
    }

    pub fn is_defeated(&self) -> bool {
        self.life <= 0
    }

    pub fn zone(&self, kind: ZoneKind) -> Option<&Zone<CardInstance>> {
        match kind {
            ZoneKind::Library => Some(&self.library),
            ZoneKind::Hand => Some(&self.hand),
            ZoneKind::Graveyard => Some(&self.graveyard),
            _ => None,
        }
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
