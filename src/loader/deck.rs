//! Deck file loader (.dck format)

use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Deck loader for .dck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck from a .dck file
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = fs::read_to_string(path)?;
        let mut deck = Self::parse(&content)?;
        if deck.name.is_none() {
            deck.name = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        }
        Ok(deck)
    }

    /// Parse a deck from its text content
    ///
    /// Sections are `[metadata]` (only `Name=` is read), `[Main]` and
    /// `[Sideboard]`. Card lines are `COUNT NAME` with an optional `|SET`
    /// suffix. Lines starting with `#` are comments.
    pub fn parse(content: &str) -> Result<DeckList> {
        let mut name = None;
        let mut main_deck = Vec::new();
        let mut sideboard = Vec::new();
        let mut section = Section::Main;

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                section = match line.to_lowercase().as_str() {
                    "[metadata]" => Section::Metadata,
                    "[sideboard]" => Section::Sideboard,
                    _ => Section::Main,
                };
                continue;
            }
            if section == Section::Metadata {
                if let Some(value) = line.strip_prefix("Name=") {
                    name = Some(value.trim().to_string());
                }
                continue;
            }

            let entry = Self::parse_entry(line).ok_or_else(|| {
                SimError::InvalidDeckFormat(format!("line {}: expected \"COUNT NAME\", got \"{line}\"", line_no + 1))
            })?;
            match section {
                Section::Sideboard => sideboard.push(entry),
                _ => main_deck.push(entry),
            }
        }

        if main_deck.is_empty() {
            return Err(SimError::InvalidDeckFormat("Empty deck".to_string()));
        }

        Ok(DeckList {
            name,
            main_deck,
            sideboard,
        })
    }

    // Format: "1 Card Name" or "1 Card Name|SET"
    fn parse_entry(line: &str) -> Option<DeckEntry> {
        let (count_str, rest) = line.split_once(' ')?;
        let count = count_str.parse::<u8>().ok().filter(|c| *c > 0)?;
        let card_name = match rest.split_once('|') {
            Some((name, _set)) => name.trim(),
            None => rest.trim(),
        };
        if card_name.is_empty() {
            return None;
        }
        Some(DeckEntry {
            card_name: card_name.to_string(),
            count,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Metadata,
    Main,
    Sideboard,
}

/// Represents a deck entry (card name and count)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card_name: String,
    pub count: u8,
}

impl DeckEntry {
    pub fn new(card_name: impl Into<String>, count: u8) -> Self {
        DeckEntry {
            card_name: card_name.into(),
            count,
        }
    }
}

/// Represents a complete deck list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    #[serde(default)]
    pub name: Option<String>,
    pub main_deck: Vec<DeckEntry>,
    #[serde(default)]
    pub sideboard: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in main deck
    pub fn total_cards(&self) -> usize {
        self.main_deck.iter().map(|e| e.count as usize).sum()
    }

    pub fn sideboard_size(&self) -> usize {
        self.sideboard.iter().map(|e| e.count as usize).sum()
    }
}
