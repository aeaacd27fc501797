//! Combat bookkeeping for the current turn
//!
//! Attackers and blocks are kept in declaration order, which also decides the
//! order damage is assigned among several blockers.

use crate::core::{Block, CardId, PlayerId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    /// (attacker, defending player), in declaration order
    attackers: Vec<(CardId, PlayerId)>,
    blocks: Vec<Block>,
}

impl CombatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_attacker(&mut self, attacker: CardId, defending_player: PlayerId) {
        if !self.is_attacking(attacker) {
            self.attackers.push((attacker, defending_player));
        }
    }

    pub fn declare_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn is_attacking(&self, card: CardId) -> bool {
        self.attackers.iter().any(|(a, _)| *a == card)
    }

    pub fn is_blocking(&self, card: CardId) -> bool {
        self.blocks.iter().any(|b| b.blocker == card)
    }

    pub fn is_blocked(&self, attacker: CardId) -> bool {
        self.blocks.iter().any(|b| b.attacker == attacker)
    }

    /// Blockers of `attacker`, in the order they were declared
    pub fn blockers_of(&self, attacker: CardId) -> SmallVec<[CardId; 4]> {
        self.blocks
            .iter()
            .filter(|b| b.attacker == attacker)
            .map(|b| b.blocker)
            .collect()
    }

    /// The attacker a blocker is blocking
    pub fn blocked_by(&self, blocker: CardId) -> Option<CardId> {
        self.blocks.iter().find(|b| b.blocker == blocker).map(|b| b.attacker)
    }

    pub fn defending_player(&self, attacker: CardId) -> Option<PlayerId> {
        self.attackers
            .iter()
            .find(|(a, _)| *a == attacker)
            .map(|(_, p)| *p)
    }

    pub fn attackers(&self) -> impl Iterator<Item = CardId> + '_ {
        self.attackers.iter().map(|(a, _)| *a)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn has_attackers(&self) -> bool {
        !self.attackers.is_empty()
    }

    /// Forget a creature that left the battlefield
    pub fn remove(&mut self, card: CardId) {
        self.attackers.retain(|(a, _)| *a != card);
        self.blocks.retain(|b| b.blocker != card && b.attacker != card);
    }

    pub fn clear(&mut self) {
        self.attackers.clear();
        self.blocks.clear();
    }
}
