//! Card catalog: card definitions and named decks
//!
//! Lookups are by normalized name (ASCII-folded, lowercase, single spaces), so
//! "Lim-Dûl's Vault", "lim-dul's vault" and "LIM-DUL'S  VAULT" are the same
//! card. A catalog starts from the built-in card set or from JSON.

use crate::core::{Ability, Card, CardKind, Color, Deck, Effect, Keyword, ManaCost};
use crate::loader::deck::{DeckEntry, DeckList};
use crate::{Result, SimError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Normalize a card name for lookup
pub fn normalize_name(name: &str) -> String {
    deunicode::deunicode(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// On-disk catalog format
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub cards: Vec<Card>,
    /// Deck code -> deck list
    #[serde(default)]
    pub decks: BTreeMap<String, DeckList>,
}

#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: FxHashMap<String, Arc<Card>>,
    decks: BTreeMap<String, DeckList>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cards and decks every build ships with
    pub fn builtin() -> Self {
        let mut catalog = CardCatalog::new();
        for card in builtin_cards() {
            catalog.insert(card);
        }
        for (code, name, entries) in BUILTIN_DECKS {
            let list = DeckList {
                name: Some(name.to_string()),
                main_deck: entries.iter().map(|(count, card)| DeckEntry::new(*card, *count)).collect(),
                sideboard: Vec::new(),
            };
            catalog.insert_deck(code, list);
        }
        catalog
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut catalog = CardCatalog::new();
        catalog.extend_from_json_str(json)?;
        Ok(catalog)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Add the cards and decks of a JSON catalog; later definitions win
    pub fn extend_from_json_str(&mut self, json: &str) -> Result<()> {
        let file: CatalogFile = serde_json::from_str(json)?;
        self.extend(file);
        Ok(())
    }

    pub fn extend(&mut self, file: CatalogFile) {
        for card in file.cards {
            self.insert(card);
        }
        for (code, list) in file.decks {
            self.insert_deck(&code, list);
        }
    }

    pub fn insert(&mut self, card: Card) {
        self.cards.insert(normalize_name(card.name.as_str()), Arc::new(card));
    }

    pub fn insert_deck(&mut self, code: &str, list: DeckList) {
        self.decks.insert(code.to_lowercase(), list);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(&normalize_name(name))
    }

    pub fn get_card(&self, name: &str) -> Result<Arc<Card>> {
        self.cards
            .get(&normalize_name(name))
            .cloned()
            .ok_or_else(|| SimError::UnknownCard(name.to_string()))
    }

    /// Card names, sorted
    pub fn card_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cards.values().map(|c| c.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn deck_codes(&self) -> impl Iterator<Item = &str> {
        self.decks.keys().map(String::as_str)
    }

    pub fn deck_list(&self, code: &str) -> Result<&DeckList> {
        self.decks
            .get(&code.to_lowercase())
            .ok_or_else(|| SimError::UnknownDeck(code.to_string()))
    }

    /// Build the named deck
    pub fn deck(&self, code: &str) -> Result<Deck> {
        let list = self.deck_list(code)?;
        let mut deck = self.build_deck(list)?;
        if list.name.is_none() {
            deck.name = code.to_string();
        }
        Ok(deck)
    }

    /// Resolve every main-deck entry against the catalog
    pub fn build_deck(&self, list: &DeckList) -> Result<Deck> {
        let mut cards = Vec::with_capacity(list.total_cards());
        for entry in &list.main_deck {
            let card = self.get_card(&entry.card_name)?;
            cards.extend(std::iter::repeat(card).take(entry.count as usize));
        }
        let name = list.name.clone().unwrap_or_else(|| "custom".to_string());
        Ok(Deck::new(name, cards))
    }
}

/// `generic` plus `pips` symbols of one color
fn cost(generic: u8, color: Color, pips: u8) -> ManaCost {
    ManaCost::generic(generic) + ManaCost::of(color, pips)
}

fn builtin_cards() -> Vec<Card> {
    let lands = [
        ("Plains", Color::White),
        ("Island", Color::Blue),
        ("Swamp", Color::Black),
        ("Mountain", Color::Red),
        ("Forest", Color::Green),
    ];
    let mut cards: Vec<Card> = lands
        .into_iter()
        .map(|(name, color)| Card::basic_land(name, color).with_sub_kind(name))
        .collect();

    cards.extend([
        Card::creature("Grizzly Bears", cost(1, Color::Green, 1), 2, 2).with_sub_kind("Bear"),
        Card::creature("Llanowar Elves", cost(0, Color::Green, 1), 1, 1)
            .with_sub_kind("Elf")
            .with_ability(Ability::Mana {
                cost: crate::core::Cost::TapSource,
                effect: Effect::AddMana {
                    color: Color::Green,
                    amount: 1,
                },
            }),
        Card::creature("Giant Spider", cost(3, Color::Green, 1), 2, 4)
            .with_sub_kind("Spider")
            .with_keyword(Keyword::Reach),
        Card::creature("Raging Goblin", cost(0, Color::Red, 1), 1, 1)
            .with_sub_kind("Goblin")
            .with_keyword(Keyword::Haste),
        Card::creature("Hill Giant", cost(3, Color::Red, 1), 3, 3).with_sub_kind("Giant"),
        Card::creature("Wall of Stone", cost(1, Color::Red, 2), 0, 8)
            .with_sub_kind("Wall")
            .with_keyword(Keyword::Defender),
        Card::creature("Savannah Lions", cost(0, Color::White, 1), 2, 1).with_sub_kind("Cat"),
        Card::creature("Serra Angel", cost(3, Color::White, 2), 4, 4)
            .with_sub_kind("Angel")
            .with_keyword(Keyword::Flying)
            .with_keyword(Keyword::Vigilance),
        Card::creature("Coral Merfolk", cost(1, Color::Blue, 1), 2, 1).with_sub_kind("Merfolk"),
        Card::creature("Air Elemental", cost(3, Color::Blue, 2), 4, 4)
            .with_sub_kind("Elemental")
            .with_keyword(Keyword::Flying),
        spell("Lightning Bolt", cost(0, Color::Red, 1), CardKind::Instant, Effect::DealDamage { amount: 3 }),
        spell("Shock", cost(0, Color::Red, 1), CardKind::Instant, Effect::DealDamage { amount: 2 }),
        spell("Lava Axe", cost(4, Color::Red, 1), CardKind::Sorcery, Effect::DealDamage { amount: 5 }),
        spell("Healing Salve", cost(0, Color::White, 1), CardKind::Instant, Effect::GainLife { amount: 3 }),
        spell("Divination", cost(2, Color::Blue, 1), CardKind::Sorcery, Effect::DrawCards { count: 2 }),
        spell("Dark Ritual", cost(0, Color::Black, 1), CardKind::Instant, Effect::AddMana {
            color: Color::Black,
            amount: 3,
        }),
    ]);
    cards
}

fn spell(name: &str, mana: ManaCost, kind: CardKind, effect: Effect) -> Card {
    Card::new(name)
        .with_kind(kind)
        .with_cost(mana)
        .with_ability(Ability::Spell { effect })
}

type BuiltinDeck = (&'static str, &'static str, &'static [(u8, &'static str)]);

const BUILTIN_DECKS: &[BuiltinDeck] = &[
    (
        "mono-green",
        "Mono Green Stompy",
        &[(24, "Forest"), (4, "Llanowar Elves"), (20, "Grizzly Bears"), (12, "Giant Spider")],
    ),
    (
        "mono-red",
        "Mono Red Burn",
        &[
            (22, "Mountain"),
            (12, "Raging Goblin"),
            (8, "Hill Giant"),
            (8, "Lightning Bolt"),
            (6, "Shock"),
            (4, "Lava Axe"),
        ],
    ),
    (
        "mono-white",
        "Mono White Skies",
        &[(24, "Plains"), (16, "Savannah Lions"), (12, "Serra Angel"), (8, "Healing Salve")],
    ),
    (
        "mono-blue",
        "Mono Blue Fliers",
        &[(24, "Island"), (16, "Coral Merfolk"), (12, "Air Elemental"), (8, "Divination")],
    ),
    (
        "red-walls",
        "Red Walls",
        &[(24, "Mountain"), (20, "Wall of Stone"), (16, "Shock")],
    ),
    ("forests", "Forests", &[(40, "Forest")]),
];
