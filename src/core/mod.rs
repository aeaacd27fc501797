//! Core game types and entities

pub mod action;
pub mod card;
pub mod costs;
pub mod effects;
pub mod entity;
pub mod mana;
pub mod permanent;
pub mod player;
pub mod types;

pub use action::{
    Action, ActionKind, AttackDeclaration, Block, BlockDeclaration, DecisionWindow, ParameterKey,
    ParameterValue, Requirement, Target,
};
pub use card::{Ability, Card, CardId, CardInstance, CardKind, Keyword, SuperKind};
pub use costs::{Cost, CostContext};
pub use effects::{Effect, EffectContext};
pub use entity::{EntityId, GameEntity, IdAllocator};
pub use mana::{Color, ManaCost, ManaPool};
pub use permanent::{CreaturePart, KeywordPart, Part, PartKind, Permanent, PermanentPart};
pub use player::{Deck, Player, PlayerId, PlayerKind, Seat};
pub use types::{CardName, PlayerName, Subtype};
