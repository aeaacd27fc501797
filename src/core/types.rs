//! Strongly-typed wrappers for names and card subtypes
//!
//! Bare strings for card names, player names and subtypes are easy to mix up,
//! so each gets its own newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                $name(s.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_newtype!(
    /// Printed name of a card, e.g. "Grizzly Bears"
    CardName
);

string_newtype!(
    /// Display name of a seated player
    PlayerName
);

string_newtype!(
    /// Card subtype such as "Bear", "Goblin" or "Forest"
    Subtype
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newtypes_are_distinct_and_transparent() {
        let card = CardName::new("Forest");
        let player = PlayerName::from("Alice");
        assert_eq!(card.as_str(), "Forest");
        assert_eq!(player.to_string(), "Alice");
        assert_eq!(serde_json::to_string(&card).unwrap(), "\"Forest\"");
    }
}
