//! Costs paid to cast spells and activate abilities
//!
//! Every cost is checked in two phases. `validate` inspects the table and
//! never mutates it; `commit` re-validates and then pays. A cost that fails
//! validation therefore leaves no trace.

use crate::core::{ActionKind, CardId, ManaCost, PlayerId};
use crate::game::Tabletop;
use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cost {
    #[default]
    None,
    /// Pay mana from the acting player's pool
    PayMana(ManaCost),
    /// Tap the permanent the ability belongs to
    TapSource,
    /// All of the parts, paid together
    Composite(Vec<Cost>),
}

/// Who is paying, for which action, and from which source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostContext {
    pub kind: ActionKind,
    pub player: PlayerId,
    pub source: Option<CardId>,
}

impl Cost {
    /// Total mana required across all parts
    pub fn mana(&self) -> ManaCost {
        match self {
            Cost::PayMana(m) => *m,
            Cost::Composite(parts) => parts.iter().fold(ManaCost::new(), |acc, p| acc + p.mana()),
            Cost::None | Cost::TapSource => ManaCost::new(),
        }
    }

    fn tap_count(&self) -> usize {
        match self {
            Cost::TapSource => 1,
            Cost::Composite(parts) => parts.iter().map(Cost::tap_count).sum(),
            Cost::None | Cost::PayMana(_) => 0,
        }
    }

    pub fn taps_source(&self) -> bool {
        self.tap_count() > 0
    }

    pub fn is_free(&self) -> bool {
        self.mana().is_zero() && !self.taps_source()
    }

    /// Check that the cost can be paid right now
    pub fn validate(&self, tabletop: &Tabletop, ctx: &CostContext) -> Result<()> {
        let mana = self.mana();
        if !mana.is_zero() {
            let pool = &tabletop.player(ctx.player)?.mana_pool;
            if !pool.can_pay(&mana) {
                return Err(SimError::InsufficientMana {
                    cost: mana.to_string(),
                    pool: pool.to_string(),
                });
            }
        }

        match self.tap_count() {
            0 => Ok(()),
            1 => {
                let source = ctx.source.ok_or_else(|| {
                    SimError::ContractViolation(format!("{:?} tap cost has no source", ctx.kind))
                })?;
                let permanent = tabletop.permanent(source)?;
                let context = vec![("permanent", permanent.label())];
                if permanent.controller != ctx.player {
                    return Err(SimError::illegal(ctx.kind, "cannot tap a permanent you do not control", context));
                }
                if permanent.is_tapped()? {
                    return Err(SimError::illegal(ctx.kind, "source is already tapped", context));
                }
                if permanent.is_summoning_sick() {
                    return Err(SimError::illegal(ctx.kind, "creature has summoning sickness", context));
                }
                Ok(())
            }
            n => Err(SimError::illegal(
                ctx.kind,
                format!("cost taps its source {n} times"),
                vec![],
            )),
        }
    }

    /// Validate, then pay
    pub fn commit(&self, tabletop: &mut Tabletop, ctx: &CostContext) -> Result<()> {
        self.validate(tabletop, ctx)?;

        let mana = self.mana();
        if !mana.is_zero() {
            tabletop.player_mut(ctx.player)?.mana_pool.pay_cost(&mana)?;
        }
        if let (true, Some(source)) = (self.taps_source(), ctx.source) {
            tabletop.permanent_mut(source)?.tap()?;
        }
        Ok(())
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::None => write!(f, "free"),
            Cost::PayMana(m) => write!(f, "{m}"),
            Cost::TapSource => write!(f, "T"),
            Cost::Composite(parts) => {
                let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", parts.join(" "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, Color, PlayerId};
    use crate::game::Tabletop;
    use std::sync::Arc;

    fn table_with_forest() -> (Tabletop, PlayerId, CardId) {
        let mut table = Tabletop::new_two_player("Alice", "Bob", 20);
        let alice = table.players()[0].id;
        let forest = table
            .put_onto_battlefield(alice, Arc::new(Card::basic_land("Forest", Color::Green)))
            .unwrap();
        (table, alice, forest)
    }

    #[test]
    fn test_composite_aggregates_mana() {
        let cost = Cost::Composite(vec![
            Cost::PayMana(ManaCost::parse("1G").unwrap()),
            Cost::TapSource,
            Cost::PayMana(ManaCost::of(Color::Green, 1)),
        ]);
        assert_eq!(cost.mana().cmc(), 3);
        assert!(cost.taps_source());
        assert_eq!(cost.to_string(), "1G T G");
        assert!(Cost::None.is_free());
    }

    #[test]
    fn test_tap_source_commit() {
        let (mut table, alice, forest) = table_with_forest();
        let ctx = CostContext {
            kind: ActionKind::ActivateManaAbility,
            player: alice,
            source: Some(forest),
        };

        Cost::TapSource.commit(&mut table, &ctx).unwrap();
        assert!(table.permanent(forest).unwrap().is_tapped().unwrap());

        // Second tap is rejected without side effects
        let err = Cost::TapSource.validate(&table, &ctx).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_double_tap_in_one_cost_is_rejected() {
        let (table, alice, forest) = table_with_forest();
        let ctx = CostContext {
            kind: ActionKind::ActivateManaAbility,
            player: alice,
            source: Some(forest),
        };
        let cost = Cost::Composite(vec![Cost::TapSource, Cost::TapSource]);
        assert!(cost.validate(&table, &ctx).is_err());
        assert!(!table.permanent(forest).unwrap().is_tapped().unwrap());
    }

    #[test]
    fn test_failed_mana_payment_does_not_tap() {
        let (mut table, alice, forest) = table_with_forest();
        let ctx = CostContext {
            kind: ActionKind::ActivateManaAbility,
            player: alice,
            source: Some(forest),
        };
        let cost = Cost::Composite(vec![Cost::TapSource, Cost::PayMana(ManaCost::generic(1))]);

        let err = cost.commit(&mut table, &ctx).unwrap_err();
        assert!(matches!(err, SimError::InsufficientMana { .. }));
        assert!(!table.permanent(forest).unwrap().is_tapped().unwrap());
    }
}
