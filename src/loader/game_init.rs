//! Game initialization from player definitions
//!
//! A [`DefinedPlayer`] names a seat, where its deck comes from and which
//! strategy plays it. The initializer resolves decks against a catalog, then
//! builds a seeded tabletop and a judge with one strategy per seat.

use crate::config::SimulationConfig;
use crate::core::{Deck, PlayerKind, Seat};
use crate::game::{GameLogger, Judge, StrategyKind, Tabletop};
use crate::loader::catalog::CardCatalog;
use crate::loader::deck_async::load_deck_file;
use crate::Result;
use std::convert::Infallible;
use std::path::PathBuf;
use std::str::FromStr;

/// Where a deck comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckSource {
    /// A deck code in the catalog, e.g. "mono-red"
    Named(String),
    /// A .dck file
    File(PathBuf),
}

impl FromStr for DeckSource {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.ends_with(".dck") || s.contains(std::path::MAIN_SEPARATOR) {
            Ok(DeckSource::File(PathBuf::from(s)))
        } else {
            Ok(DeckSource::Named(s.to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct DefinedPlayer {
    pub name: String,
    pub kind: PlayerKind,
    pub deck: DeckSource,
    pub strategy: StrategyKind,
}

impl DefinedPlayer {
    pub fn new(name: impl Into<String>, deck: DeckSource, strategy: StrategyKind) -> Self {
        DefinedPlayer {
            name: name.into(),
            kind: PlayerKind::Ai,
            deck,
            strategy,
        }
    }
}

/// Game builder for initializing games from decks
pub struct GameInitializer<'a> {
    catalog: &'a CardCatalog,
}

impl<'a> GameInitializer<'a> {
    pub fn new(catalog: &'a CardCatalog) -> Self {
        GameInitializer { catalog }
    }

    pub async fn resolve_deck(&self, source: &DeckSource) -> Result<Deck> {
        match source {
            DeckSource::Named(code) => self.catalog.deck(code),
            DeckSource::File(path) => {
                let list = load_deck_file(path).await?;
                self.catalog.build_deck(&list)
            }
        }
    }

    /// Resolve both players' decks concurrently
    pub async fn seats(&self, players: &[DefinedPlayer; 2]) -> Result<[Seat; 2]> {
        let (first, second) = tokio::try_join!(
            self.resolve_deck(&players[0].deck),
            self.resolve_deck(&players[1].deck)
        )?;
        Ok([
            Seat::new(players[0].name.as_str(), players[0].kind, first),
            Seat::new(players[1].name.as_str(), players[1].kind, second),
        ])
    }

    /// A fresh tabletop for already-resolved seats; the first seat starts
    pub fn init_game(seats: [Seat; 2], config: &SimulationConfig) -> Tabletop {
        Tabletop::new(seats, config.table_rules(), config.seed)
    }

    /// Judge with each player's strategy seated; strategy seeds derive from the game seed
    pub fn judge_for(tabletop: &mut Tabletop, players: &[DefinedPlayer; 2], config: &SimulationConfig) -> Judge {
        let ids = [tabletop.players()[0].id, tabletop.players()[1].id];
        let first = players[0].strategy.create(ids[0], config.seed.wrapping_add(1));
        let second = players[1].strategy.create(ids[1], config.seed.wrapping_add(2));
        Judge::new(tabletop, first, second)
            .with_logger(GameLogger::with_verbosity(config.verbosity))
            .with_max_actions_per_window(config.max_actions_per_window)
    }
}
