//! Effects produced by resolving spells and mana abilities

use crate::core::{ActionKind, CardId, Color, PlayerId, Target};
use crate::game::Tabletop;
use crate::{Result, SimError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Effect {
    #[default]
    None,
    /// Add mana to the controller's pool
    AddMana { color: Color, amount: u8 },
    /// Damage to exactly one target player or creature
    DealDamage { amount: i32 },
    /// The controller draws cards
    DrawCards { count: u8 },
    /// The controller gains life
    GainLife { amount: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectContext {
    pub kind: ActionKind,
    pub controller: PlayerId,
    pub source: CardId,
}

/// The single thing a targeted effect points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolved {
    Player(PlayerId),
    Permanent(CardId),
}

impl Effect {
    pub fn needs_target(&self) -> bool {
        matches!(self, Effect::DealDamage { .. })
    }

    fn resolve_target(&self, tabletop: &Tabletop, ctx: &EffectContext, target: &Target) -> Result<Resolved> {
        let chosen = match (target.player, target.permanents.as_slice()) {
            (Some(player), []) => {
                tabletop.player(player)?;
                Resolved::Player(player)
            }
            (None, [permanent]) => {
                let p = tabletop.permanent(*permanent)?;
                if !p.is_creature() {
                    return Err(SimError::InvalidTarget(format!("{} is not a creature", p.label())));
                }
                Resolved::Permanent(*permanent)
            }
            _ => {
                return Err(SimError::illegal(
                    ctx.kind,
                    "damage needs exactly one target player or creature",
                    vec![("source", ctx.source.to_string())],
                ))
            }
        };
        Ok(chosen)
    }

    /// Check the effect could be applied, without touching the table
    pub fn validate(&self, tabletop: &Tabletop, ctx: &EffectContext, target: &Target) -> Result<()> {
        match self {
            Effect::DealDamage { .. } => self.resolve_target(tabletop, ctx, target).map(|_| ()),
            Effect::DrawCards { count } => {
                let available = tabletop.player(ctx.controller)?.library.quantity();
                if available < *count as usize {
                    return Err(SimError::illegal(
                        ctx.kind,
                        format!("cannot draw {count} from a library of {available}"),
                        vec![("source", ctx.source.to_string())],
                    ));
                }
                Ok(())
            }
            Effect::None | Effect::AddMana { .. } | Effect::GainLife { .. } => {
                tabletop.player(ctx.controller).map(|_| ())
            }
        }
    }

    pub fn apply(&self, tabletop: &mut Tabletop, ctx: &EffectContext, target: &Target) -> Result<()> {
        self.validate(tabletop, ctx, target)?;
        match *self {
            Effect::None => {}
            Effect::AddMana { color, amount } => {
                tabletop.player_mut(ctx.controller)?.mana_pool.add(color, amount);
            }
            Effect::DealDamage { amount } => match self.resolve_target(tabletop, ctx, target)? {
                Resolved::Player(player) => tabletop.player_mut(player)?.lose_life(amount),
                Resolved::Permanent(permanent) => {
                    tabletop.permanent_mut(permanent)?.creature_mut()?.damage += amount;
                }
            },
            Effect::DrawCards { count } => {
                tabletop.draw_cards(ctx.controller, count as usize)?;
            }
            Effect::GainLife { amount } => tabletop.player_mut(ctx.controller)?.gain_life(amount),
        }
        Ok(())
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => write!(f, "nothing"),
            Effect::AddMana { color, amount } => write!(f, "add {amount}{color}"),
            Effect::DealDamage { amount } => write!(f, "deal {amount} damage"),
            Effect::DrawCards { count } => write!(f, "draw {count}"),
            Effect::GainLife { amount } => write!(f, "gain {amount} life"),
        }
    }
}
