//! Mana costs and mana pools

use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Mana colors, in the order generic costs are paid from a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Colorless => 'C',
        }
    }

    pub fn from_symbol(c: char) -> Option<Color> {
        Color::ALL.into_iter().find(|color| color.symbol() == c)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A mana cost such as "2RR" (2 generic + 2 red)
///
/// Serialized in its printed form, so catalogs can write `"cost": "1G"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManaCost {
    pub generic: u8,
    colored: [u8; 6],
}

impl ManaCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a cost string like "2RR" or "1UB"
    pub fn parse(s: &str) -> Result<Self> {
        let mut cost = ManaCost::new();
        let mut digits = String::new();
        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else if let Some(color) = Color::from_symbol(c) {
                let slot = &mut cost.colored[color.index()];
                *slot = slot
                    .checked_add(1)
                    .ok_or_else(|| SimError::InvalidDeckFormat(format!("too many {color} symbols in \"{s}\"")))?;
            } else if !matches!(c, '{' | '}' | ' ') {
                return Err(SimError::InvalidDeckFormat(format!("bad mana symbol '{c}' in \"{s}\"")));
            }
        }
        if !digits.is_empty() {
            cost.generic = digits
                .parse()
                .map_err(|_| SimError::InvalidDeckFormat(format!("bad generic amount in \"{s}\"")))?;
        }
        Ok(cost)
    }

    pub fn of(color: Color, amount: u8) -> Self {
        let mut cost = ManaCost::new();
        cost.colored[color.index()] = amount;
        cost
    }

    pub fn generic(amount: u8) -> Self {
        ManaCost {
            generic: amount,
            ..ManaCost::default()
        }
    }

    pub fn colored(&self, color: Color) -> u8 {
        self.colored[color.index()]
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u32 {
        u32::from(self.generic) + self.colored.iter().map(|&n| u32::from(n)).sum::<u32>()
    }

    pub fn is_zero(&self) -> bool {
        self.cmc() == 0
    }
}

impl Add for ManaCost {
    type Output = ManaCost;

    fn add(mut self, rhs: ManaCost) -> ManaCost {
        self.generic = self.generic.saturating_add(rhs.generic);
        for (mine, theirs) in self.colored.iter_mut().zip(rhs.colored) {
            *mine = mine.saturating_add(theirs);
        }
        self
    }
}

impl TryFrom<String> for ManaCost {
    type Error = crate::SimError;

    fn try_from(s: String) -> Result<Self> {
        ManaCost::parse(&s)
    }
}

impl From<ManaCost> for String {
    fn from(cost: ManaCost) -> String {
        cost.to_string()
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 || self.is_zero() {
            write!(f, "{}", self.generic)?;
        }
        for color in Color::ALL {
            for _ in 0..self.colored(color) {
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

/// Floating mana owned by a player; emptied at the end of every phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaPool {
    amounts: [u8; 6],
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Color, amount: u8) {
        let slot = &mut self.amounts[color.index()];
        *slot = slot.saturating_add(amount);
    }

    pub fn amount(&self, color: Color) -> u8 {
        self.amounts[color.index()]
    }

    pub fn total(&self) -> u32 {
        self.amounts.iter().map(|&n| u32::from(n)).sum()
    }

    pub fn clear(&mut self) {
        self.amounts = [0; 6];
    }

    /// Check whether the pool covers a cost
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        Color::ALL
            .into_iter()
            .all(|c| self.amount(c) >= cost.colored(c))
            && self.total() >= cost.cmc()
    }

    /// Deduct a cost: colored requirements first, then generic in WUBRG order.
    /// The pool is untouched when payment fails.
    pub fn pay_cost(&mut self, cost: &ManaCost) -> Result<()> {
        if !self.can_pay(cost) {
            return Err(SimError::InsufficientMana {
                cost: cost.to_string(),
                pool: self.to_string(),
            });
        }
        for color in Color::ALL {
            self.amounts[color.index()] -= cost.colored(color);
        }
        let mut generic = cost.generic;
        for slot in self.amounts.iter_mut() {
            let used = generic.min(*slot);
            *slot -= used;
            generic -= used;
        }
        debug_assert_eq!(generic, 0);
        Ok(())
    }
}

impl fmt::Display for ManaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total() == 0 {
            return write!(f, "empty");
        }
        let parts: Vec<String> = Color::ALL
            .into_iter()
            .filter(|c| self.amount(*c) > 0)
            .map(|c| format!("{}{}", self.amount(c), c))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_cost_parsing() {
        let cost = ManaCost::parse("2RR").unwrap();
        assert_eq!(cost.generic, 2);
        assert_eq!(cost.colored(Color::Red), 2);
        assert_eq!(cost.cmc(), 4);
        assert_eq!(cost.to_string(), "2RR");

        assert_eq!(ManaCost::parse("{1}{G}").unwrap().cmc(), 2);
        assert!(ManaCost::parse("2X").is_err());
    }

    #[test]
    fn test_cost_addition() {
        let total = ManaCost::parse("1G").unwrap() + ManaCost::of(Color::Green, 1);
        assert_eq!(total.generic, 1);
        assert_eq!(total.colored(Color::Green), 2);
    }

    #[test]
    fn test_can_pay() {
        let mut pool = ManaPool::new();
        pool.add(Color::Red, 2);
        pool.add(Color::Blue, 1);

        assert!(pool.can_pay(&ManaCost::parse("1R").unwrap()));
        assert!(pool.can_pay(&ManaCost::parse("2R").unwrap()));
        assert!(!pool.can_pay(&ManaCost::parse("3R").unwrap()));
        assert!(!pool.can_pay(&ManaCost::parse("RRR").unwrap()));
    }

    #[test]
    fn test_pay_generic_in_wubrg_order() {
        let mut pool = ManaPool::new();
        pool.add(Color::Red, 3);
        pool.add(Color::Blue, 1);

        pool.pay_cost(&ManaCost::parse("2R").unwrap()).unwrap();
        assert_eq!(pool.amount(Color::Blue), 0);
        assert_eq!(pool.amount(Color::Red), 1);
        assert_eq!(pool.total(), 1);
    }

    #[test]
    fn test_failed_payment_leaves_pool_untouched() {
        let mut pool = ManaPool::new();
        pool.add(Color::Blue, 2);

        let err = pool.pay_cost(&ManaCost::parse("RR").unwrap()).unwrap_err();
        assert!(matches!(err, SimError::InsufficientMana { .. }));
        assert_eq!(pool.amount(Color::Blue), 2);
        assert_eq!(pool.to_string(), "2U");
    }

    #[test]
    fn test_large_costs_do_not_overflow() {
        let cost = ManaCost::parse("255G").unwrap();
        assert_eq!(cost.cmc(), 256);
        assert!(!cost.is_zero());
        assert_eq!(cost.to_string(), "255G");

        let mut pool = ManaPool::new();
        pool.add(Color::Green, 255);
        pool.add(Color::Red, 1);
        assert_eq!(pool.total(), 256);
        assert!(pool.can_pay(&ManaCost::generic(1)));
        assert!(!pool.can_pay(&cost));
        assert_eq!(pool.to_string(), "1R 255G");
    }

    #[test]
    fn test_parse_rejects_colored_overflow() {
        let too_many = "G".repeat(256);
        assert!(matches!(ManaCost::parse(&too_many), Err(SimError::InvalidDeckFormat(_))));
        assert_eq!(ManaCost::parse(&"G".repeat(255)).unwrap().colored(Color::Green), 255);
    }
}
