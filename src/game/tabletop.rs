//! The tabletop: complete state of one game
//!
//! Owns both players, the shared zones, the turn position and the random
//! source. Every zone transfer the rules need goes through a method here so
//! card identity is preserved as cards move between player-owned and shared
//! zones.

use crate::core::{
    Card, CardId, CardInstance, Deck, IdAllocator, Permanent, Player, PlayerId, PlayerKind, Seat,
};
use crate::game::{CombatState, GameEndReason, GameOutcome, Phase, Step};
use crate::zones::{Zone, ZoneKind};
use crate::{Result, SimError};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Numeric rules the table is played under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRules {
    pub starting_life: i32,
    pub opening_hand_size: usize,
    pub max_hand_size: usize,
    pub lands_per_turn: u32,
}

impl Default for TableRules {
    fn default() -> Self {
        TableRules {
            starting_life: 20,
            opening_hand_size: 7,
            max_hand_size: 7,
            lands_per_turn: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tabletop {
    players: [Player; 2],
    pub battlefield: Zone<Permanent>,
    pub stack: Zone<CardInstance>,
    pub exile: Zone<CardInstance>,
    pub command: Option<Zone<CardInstance>>,
    pub ante: Option<Zone<CardInstance>>,

    /// -1 until the first turn starts
    pub turn_id: i32,
    pub phase: Phase,
    /// Step to execute next (or being executed)
    pub step: Step,
    active: usize,
    prioritized: Option<PlayerId>,
    pub played_land_count: u32,
    pub combat: CombatState,
    pub rules: TableRules,
    pub outcome: Option<GameOutcome>,

    rng: ChaCha12Rng,
    ids: IdAllocator,
}

impl Tabletop {
    /// Seat two players; each library is filled from the deck, first card at the bottom
    pub fn new(seats: [Seat; 2], rules: TableRules, seed: u64) -> Self {
        let mut ids = IdAllocator::new();
        let [first, second] = seats;
        let first = Player::new(ids.next_id(), first, rules.starting_life);
        let second = Player::new(ids.next_id(), second, rules.starting_life);

        let mut tabletop = Tabletop {
            players: [first, second],
            battlefield: Zone::public(ZoneKind::Battlefield, None),
            stack: Zone::public(ZoneKind::Stack, None),
            exile: Zone::public(ZoneKind::Exile, None),
            command: None,
            ante: None,
            turn_id: -1,
            phase: Phase::Setup,
            step: Step::Setup,
            active: 0,
            prioritized: None,
            played_land_count: 0,
            combat: CombatState::new(),
            rules,
            outcome: None,
            rng: ChaCha12Rng::seed_from_u64(seed),
            ids,
        };

        for seat in 0..2 {
            let owner = tabletop.players[seat].id;
            let cards = tabletop.players[seat].deck.cards.clone();
            for card in cards {
                let instance = tabletop.new_card(owner, card);
                // Fresh IDs cannot collide
                let _ = tabletop.players[seat].library.add_to_top(instance);
            }
        }
        tabletop
    }

    /// Two players with empty decks, mostly for tests
    pub fn new_two_player(first: &str, second: &str, starting_life: i32) -> Self {
        let rules = TableRules {
            starting_life,
            ..TableRules::default()
        };
        Tabletop::new(
            [
                Seat::new(first, PlayerKind::Ai, Deck::default()),
                Seat::new(second, PlayerKind::Ai, Deck::default()),
            ],
            rules,
            0,
        )
    }

    /// Add the Command and Ante zones used by extended formats
    pub fn with_extended_zones(mut self) -> Self {
        self.command = Some(Zone::public(ZoneKind::Command, None));
        self.ante = Some(Zone::public(ZoneKind::Ante, None));
        self
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    fn seat(&self, id: PlayerId) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(SimError::EntityNotFound(id.as_u32()))
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        Ok(&self.players[self.seat(id)?])
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        let seat = self.seat(id)?;
        Ok(&mut self.players[seat])
    }

    pub fn active_player(&self) -> &Player {
        &self.players[self.active]
    }

    pub fn nonactive_player(&self) -> &Player {
        &self.players[1 - self.active]
    }

    pub fn active_id(&self) -> PlayerId {
        self.active_player().id
    }

    pub fn nonactive_id(&self) -> PlayerId {
        self.nonactive_player().id
    }

    /// The player currently holding priority, if any
    pub fn prioritized_player(&self) -> Result<&Player> {
        let id = self.prioritized.ok_or(SimError::NoPlayer("prioritized"))?;
        self.player(id)
    }

    pub fn set_prioritized(&mut self, player: Option<PlayerId>) {
        self.prioritized = player;
    }

    pub fn opponent(&self, player: PlayerId) -> Result<&Player> {
        Ok(&self.players[1 - self.seat(player)?])
    }

    pub fn is_first_turn(&self) -> bool {
        self.turn_id <= 0
    }

    /// Advance the turn counter and hand the turn to the next player
    pub fn start_turn(&mut self) {
        self.turn_id += 1;
        if self.turn_id > 0 {
            self.active = 1 - self.active;
        }
        self.played_land_count = 0;
        self.prioritized = None;
        self.combat.clear();
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha12Rng {
        &mut self.rng
    }

    pub fn shuffle_library(&mut self, player: PlayerId) -> Result<()> {
        let seat = self.seat(player)?;
        let Tabletop { players, rng, .. } = self;
        players[seat].library.shuffle(rng);
        Ok(())
    }

    /// Create a new physical card owned by `owner`, not yet in any zone
    pub fn new_card(&mut self, owner: PlayerId, card: Arc<Card>) -> CardInstance {
        CardInstance::new(self.ids.next_id(), card, owner)
    }

    pub fn put_into_library(&mut self, owner: PlayerId, card: Arc<Card>) -> Result<CardId> {
        let instance = self.new_card(owner, card);
        let id = instance.id;
        self.player_mut(owner)?.library.add_to_top(instance)?;
        Ok(id)
    }

    pub fn put_into_hand(&mut self, owner: PlayerId, card: Arc<Card>) -> Result<CardId> {
        let instance = self.new_card(owner, card);
        let id = instance.id;
        self.player_mut(owner)?.hand.add_to_top(instance)?;
        Ok(id)
    }

    /// Put a new permanent straight onto the battlefield under its owner's control
    pub fn put_onto_battlefield(&mut self, owner: PlayerId, card: Arc<Card>) -> Result<CardId> {
        self.player(owner)?;
        let instance = self.new_card(owner, card);
        let permanent = Permanent::enter(&instance, owner)?;
        self.battlefield.add_to_top(permanent)?;
        Ok(instance.id)
    }

    pub fn permanent(&self, id: CardId) -> Result<&Permanent> {
        self.battlefield.get(id)
    }

    pub fn permanent_mut(&mut self, id: CardId) -> Result<&mut Permanent> {
        self.battlefield.get_mut(id)
    }

    pub fn permanents_controlled_by(&self, player: PlayerId) -> impl Iterator<Item = &Permanent> {
        self.battlefield.iter().filter(move |p| p.controller == player)
    }

    /// Draw `count` cards; nothing moves if the library is too small
    pub fn draw_cards(&mut self, player: PlayerId, count: usize) -> Result<Vec<CardId>> {
        let seat = self.seat(player)?;
        let Player { library, hand, .. } = &mut self.players[seat];
        let drawn: Vec<CardId> = library
            .find_many_from_top(count)?
            .into_iter()
            .map(|c| c.id)
            .collect();
        for id in &drawn {
            library.move_to_zone(*id, hand, |c| Ok(c.clone()))?;
        }
        Ok(drawn)
    }

    /// Hand to battlefield, for lands
    pub fn play_from_hand(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        let seat = self.seat(player)?;
        let Tabletop {
            players,
            battlefield,
            ..
        } = self;
        players[seat]
            .hand
            .move_to_zone(card, battlefield, |c| Permanent::enter(c, player))
    }

    pub fn hand_to_stack(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        let seat = self.seat(player)?;
        let Tabletop { players, stack, .. } = self;
        players[seat].hand.move_to_zone(card, stack, |c| Ok(c.clone()))
    }

    /// Move a resolved spell off the stack: permanents onto the battlefield
    /// under `controller`, everything else into its owner's graveyard
    pub fn resolve_from_stack(&mut self, card: CardId, controller: PlayerId) -> Result<()> {
        let (owner, permanent) = {
            let instance = self.stack.get(card)?;
            (instance.owner, instance.card.is_permanent_card())
        };
        if permanent {
            let Tabletop {
                stack, battlefield, ..
            } = self;
            stack.move_to_zone(card, battlefield, |c| Permanent::enter(c, controller))
        } else {
            let seat = self.seat(owner)?;
            let Tabletop { stack, players, .. } = self;
            stack.move_to_zone(card, &mut players[seat].graveyard, |c| Ok(c.clone()))
        }
    }

    pub fn discard(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        let seat = self.seat(player)?;
        let Player {
            hand, graveyard, ..
        } = &mut self.players[seat];
        hand.move_to_zone(card, graveyard, |c| Ok(c.clone()))
    }

    /// Battlefield to its owner's graveyard
    pub fn destroy(&mut self, permanent: CardId) -> Result<()> {
        let owner = self.permanent(permanent)?.owner;
        let seat = self.seat(owner)?;
        let Tabletop {
            battlefield,
            players,
            ..
        } = self;
        battlefield.move_to_zone(permanent, &mut players[seat].graveyard, |p| Ok(p.leave()))?;
        self.combat.remove(permanent);
        Ok(())
    }

    /// Move every creature with lethal damage to the graveyard
    pub fn destroy_lethally_damaged(&mut self) -> Result<Vec<CardId>> {
        let doomed: Vec<CardId> = self
            .battlefield
            .iter()
            .filter(|p| p.creature().map(|c| c.has_lethal_damage()).unwrap_or(false))
            .map(|p| p.id)
            .collect();
        for id in &doomed {
            self.destroy(*id)?;
        }
        Ok(doomed)
    }

    pub fn empty_mana_pools(&mut self) {
        for player in self.players.iter_mut() {
            player.mana_pool.clear();
        }
    }

    /// Winner, or draw, if a life total has reached zero
    pub fn check_life_totals(&self) -> Option<GameOutcome> {
        let [first, second] = &self.players;
        let winner = match (first.is_defeated(), second.is_defeated()) {
            (false, false) => return None,
            (true, true) => None,
            (true, false) => Some(second.id),
            (false, true) => Some(first.id),
        };
        let reason = if winner.is_some() {
            GameEndReason::PlayerDeath
        } else {
            GameEndReason::Draw
        };
        Some(self.outcome_here(winner, reason))
    }

    /// An outcome stamped with the current turn position
    pub fn outcome_here(&self, winner: Option<PlayerId>, reason: GameEndReason) -> GameOutcome {
        GameOutcome {
            winner,
            reason,
            turn_id: self.turn_id,
            phase: self.step.phase(),
            step: self.step,
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Cards across every zone on the table
    pub fn card_count(&self) -> usize {
        let personal: usize = self
            .players
            .iter()
            .map(|p| p.library.quantity() + p.hand.quantity() + p.graveyard.quantity())
            .sum();
        let extended = self.command.as_ref().map_or(0, |z| z.quantity())
            + self.ante.as_ref().map_or(0, |z| z.quantity());
        personal + self.battlefield.quantity() + self.stack.quantity() + self.exile.quantity() + extended
    }
}
