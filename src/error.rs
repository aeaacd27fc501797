//! Error types for the tabletop simulator
//!
//! Errors fall into two classes. Validation failures (illegal actions, zone
//! underflow, duplicate membership, missing parts) are expected and are
//! reported back to the caller as part of a step result. Everything else is a
//! broken contract between the engine and its collaborators and ends the
//! current simulation run.

use crate::core::{ActionKind, ParameterKey, PartKind};
use crate::zones::ZoneKind;
use std::fmt;
use thiserror::Error;

/// Key/value pairs describing where a validation failure happened
pub type ErrorContext = Vec<(&'static str, String)>;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Illegal {kind:?} action: {message}")]
    IllegalAction {
        kind: ActionKind,
        message: String,
        context: ErrorContext,
    },

    #[error("Cannot take {requested} from {zone:?} holding {available}")]
    ZoneUnderflow {
        zone: ZoneKind,
        requested: usize,
        available: usize,
    },

    #[error("{entity} is already in {zone:?}")]
    DuplicateEntity { zone: ZoneKind, entity: String },

    #[error("{entity} is not in {zone:?}")]
    NotInZone { zone: ZoneKind, entity: String },

    #[error("{permanent} already has a {kind:?} part")]
    DuplicatePart { permanent: String, kind: PartKind },

    #[error("{permanent} has no {kind:?} part")]
    MissingPart { permanent: String, kind: PartKind },

    #[error("Insufficient mana to pay {cost} (pool: {pool})")]
    InsufficientMana { cost: String, pool: String },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Illegal combat declaration: {message}")]
    IllegalDeclaration {
        message: String,
        context: ErrorContext,
    },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u32),

    #[error("No {0} player")]
    NoPlayer(&'static str),

    #[error("{kind:?} action is missing parameter {key:?}")]
    MissingParameter { kind: ActionKind, key: ParameterKey },

    #[error("{zone:?} of player {owner} is hidden")]
    HiddenZone { zone: ZoneKind, owner: u32 },

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Unknown deck code: {0}")]
    UnknownDeck(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Build an illegal-action error with context
    pub fn illegal(kind: ActionKind, message: impl Into<String>, context: ErrorContext) -> Self {
        SimError::IllegalAction {
            kind,
            message: message.into(),
            context,
        }
    }

    /// True for expected, caller-recoverable rule failures
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SimError::IllegalAction { .. }
                | SimError::ZoneUnderflow { .. }
                | SimError::DuplicateEntity { .. }
                | SimError::NotInZone { .. }
                | SimError::DuplicatePart { .. }
                | SimError::MissingPart { .. }
                | SimError::InsufficientMana { .. }
                | SimError::InvalidTarget(_)
                | SimError::IllegalDeclaration { .. }
        )
    }

    /// Action kind the error is about, when known
    pub fn action_kind(&self) -> Option<ActionKind> {
        match self {
            SimError::IllegalAction { kind, .. } | SimError::MissingParameter { kind, .. } => {
                Some(*kind)
            }
            _ => None,
        }
    }

    /// Contextual key/value pairs for reporting
    pub fn context(&self) -> Vec<(String, String)> {
        let pairs: ErrorContext = match self {
            SimError::IllegalAction { context, .. } | SimError::IllegalDeclaration { context, .. } => {
                context.clone()
            }
            SimError::ZoneUnderflow {
                zone,
                requested,
                available,
            } => vec![
                ("zone", format!("{zone:?}")),
                ("requested", requested.to_string()),
                ("available", available.to_string()),
            ],
            SimError::DuplicateEntity { zone, entity } | SimError::NotInZone { zone, entity } => {
                vec![("zone", format!("{zone:?}")), ("entity", entity.clone())]
            }
            SimError::DuplicatePart { permanent, kind } | SimError::MissingPart { permanent, kind } => {
                vec![("permanent", permanent.clone()), ("part", format!("{kind:?}"))]
            }
            SimError::InsufficientMana { cost, pool } => {
                vec![("cost", cost.clone()), ("pool", pool.clone())]
            }
            _ => Vec::new(),
        };
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    /// Convert into the structured failure carried by step results
    pub fn to_failure(&self) -> ValidationFailure {
        ValidationFailure {
            message: self.to_string(),
            action_kind: self.action_kind(),
            context: self.context(),
        }
    }
}

/// A rejected action or rule check, as reported to the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub message: String,
    pub action_kind: Option<ActionKind>,
    pub context: Vec<(String, String)>,
}

impl ValidationFailure {
    /// Look up a context value by key
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self.context.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, " [{}]", pairs.join(", "))?;
        }
        Ok(())
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let illegal = SimError::illegal(ActionKind::PlayLand, "no", vec![]);
        assert!(illegal.is_validation());
        assert!(!SimError::ContractViolation("bad".into()).is_validation());
        assert!(!SimError::NoPlayer("prioritized").is_validation());
    }

    #[test]
    fn test_failure_carries_context() {
        let err = SimError::illegal(
            ActionKind::PlayLand,
            "only 1 land may be played per turn",
            vec![("card", "Forest#4".to_string())],
        );
        let failure = err.to_failure();
        assert_eq!(failure.action_kind, Some(ActionKind::PlayLand));
        assert_eq!(failure.context_value("card"), Some("Forest#4"));
        assert!(failure.to_string().contains("PlayLand"));
        assert!(failure.to_string().contains("card=Forest#4"));
    }

    #[test]
    fn test_underflow_context() {
        let err = SimError::ZoneUnderflow {
            zone: ZoneKind::Library,
            requested: 1,
            available: 0,
        };
        let failure = err.to_failure();
        assert_eq!(failure.context_value("zone"), Some("Library"));
        assert_eq!(failure.context_value("available"), Some("0"));
    }
}
