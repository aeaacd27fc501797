//! Async file loading
//!
//! Deck and catalog files are read with `tokio::fs` so the CLI can load both
//! players' decks concurrently before a game starts.

use crate::loader::catalog::CardCatalog;
use crate::loader::deck::{DeckList, DeckLoader};
use crate::Result;
use std::path::Path;

/// Read and parse a .dck file
pub async fn load_deck_file(path: &Path) -> Result<DeckList> {
    let content = tokio::fs::read_to_string(path).await?;
    let mut deck = DeckLoader::parse(&content)?;
    if deck.name.is_none() {
        deck.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
    }
    Ok(deck)
}

/// Add a JSON catalog file to `catalog`
pub async fn extend_catalog_from_file(catalog: &mut CardCatalog, path: &Path) -> Result<()> {
    let json = tokio::fs::read_to_string(path).await?;
    catalog.extend_from_json_str(&json)
}
