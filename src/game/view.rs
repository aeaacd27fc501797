//! Read-only view of the tabletop handed to strategies
//!
//! The view answers questions from one player's perspective: their own hand
//! and library are visible, the opponent's hidden zones expose only their size.

use crate::core::{Action, Block, CardId, CardInstance, DecisionWindow, ManaPool, Permanent, PlayerId};
use crate::game::{CombatState, Step, Tabletop};
use crate::zones::{Zone, ZoneKind};
use crate::{Result, SimError};

pub struct TabletopView<'a> {
    tabletop: &'a Tabletop,
    viewer: PlayerId,
}

impl<'a> TabletopView<'a> {
    pub fn new(tabletop: &'a Tabletop, viewer: PlayerId) -> Self {
        TabletopView { tabletop, viewer }
    }

    pub fn viewer(&self) -> PlayerId {
        self.viewer
    }

    pub fn opponent(&self) -> Result<PlayerId> {
        Ok(self.tabletop.opponent(self.viewer)?.id)
    }

    pub fn turn_id(&self) -> i32 {
        self.tabletop.turn_id
    }

    pub fn step(&self) -> Step {
        self.tabletop.step
    }

    pub fn is_active(&self) -> bool {
        self.tabletop.active_id() == self.viewer
    }

    pub fn life(&self, player: PlayerId) -> Result<i32> {
        Ok(self.tabletop.player(player)?.life)
    }

    pub fn mana_pool(&self) -> Result<ManaPool> {
        Ok(self.tabletop.player(self.viewer)?.mana_pool)
    }

    pub fn played_land_count(&self) -> u32 {
        self.tabletop.played_land_count
    }

    fn player_zone(&self, owner: PlayerId, kind: ZoneKind) -> Result<&'a Zone<CardInstance>> {
        let tabletop = self.tabletop;
        match kind {
            ZoneKind::Stack => Ok(&tabletop.stack),
            ZoneKind::Exile => Ok(&tabletop.exile),
            _ => tabletop.player(owner)?.zone(kind).ok_or_else(|| {
                SimError::ContractViolation(format!("{kind:?} is not a card zone of a player"))
            }),
        }
    }

    /// Contents of a zone, top first; hidden zones of other players are refused
    pub fn zone(&self, owner: PlayerId, kind: ZoneKind) -> Result<Vec<&'a CardInstance>> {
        let zone = self.player_zone(owner, kind)?;
        if !zone.is_visible_to(self.viewer) {
            return Err(SimError::HiddenZone {
                zone: kind,
                owner: owner.as_u32(),
            });
        }
        Ok(zone.iter().rev().collect())
    }

    /// Size of any zone, hidden or not
    pub fn zone_quantity(&self, owner: PlayerId, kind: ZoneKind) -> Result<usize> {
        match kind {
            ZoneKind::Battlefield => Ok(self.tabletop.permanents_controlled_by(owner).count()),
            _ => Ok(self.player_zone(owner, kind)?.quantity()),
        }
    }

    pub fn hand(&self) -> Vec<&'a CardInstance> {
        self.zone(self.viewer, ZoneKind::Hand).unwrap_or_default()
    }

    pub fn battlefield(&self) -> impl Iterator<Item = &'a Permanent> {
        self.tabletop.battlefield.iter()
    }

    pub fn permanents_of(&self, player: PlayerId) -> impl Iterator<Item = &'a Permanent> {
        self.tabletop.permanents_controlled_by(player)
    }

    pub fn permanent(&self, id: CardId) -> Result<&'a Permanent> {
        self.tabletop.permanent(id)
    }

    pub fn combat(&self) -> &'a CombatState {
        &self.tabletop.combat
    }

    /// Legal actions for the viewer; Pass comes first when allowed
    pub fn candidate_actions(&self, window: DecisionWindow) -> Vec<Action> {
        self.tabletop.candidate_actions(self.viewer, window)
    }

    pub fn eligible_attackers(&self) -> Vec<CardId> {
        self.tabletop.eligible_attackers(self.viewer)
    }

    pub fn eligible_blocks(&self) -> Vec<Block> {
        self.tabletop.eligible_blocks(self.viewer)
    }
}
