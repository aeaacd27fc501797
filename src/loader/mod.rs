//! Card catalogs, deck files and game initialization

pub mod catalog;
pub mod deck;
pub mod deck_async;
pub mod game_init;

pub use catalog::{normalize_name, CardCatalog, CatalogFile};
pub use deck::{DeckEntry, DeckList, DeckLoader};
pub use deck_async::{extend_catalog_from_file, load_deck_file};
pub use game_init::{DeckSource, DefinedPlayer, GameInitializer};
