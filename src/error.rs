//! Error types for catalog assembly and configuration loading.
//!
//! Everything inside a running session is infallible by construction: the
//! catalog is validated once up front and resource caps degrade silently.
//! These types cover the two places data enters from outside.

use std::fmt;

/// Catalog referential or numeric validation failure
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    UnknownCharacter(String),
    UnknownWeapon {
        /// Where the id was referenced from
        context: String,
        id: String,
    },
    UnknownEnemy {
        context: String,
        id: String,
    },
    UnknownBoss {
        character: String,
        id: String,
    },
    /// A character has no bosses to fight
    EmptyRoster(String),
    /// Roster does not end in exactly one final boss
    InvalidRoster {
        character: String,
        reason: &'static str,
    },
    InvalidStat {
        id: String,
        field: &'static str,
        value: f32,
    },
    DuplicateId(String),
    Parse(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownCharacter(id) => write!(f, "unknown character '{}'", id),
            CatalogError::UnknownWeapon { context, id } => {
                write!(f, "unknown weapon '{}' referenced by {}", id, context)
            }
            CatalogError::UnknownEnemy { context, id } => {
                write!(f, "unknown enemy '{}' referenced by {}", id, context)
            }
            CatalogError::UnknownBoss { character, id } => {
                write!(f, "boss '{}' in roster of '{}' does not exist", id, character)
            }
            CatalogError::EmptyRoster(character) => {
                write!(f, "character '{}' has an empty boss roster", character)
            }
            CatalogError::InvalidRoster { character, reason } => {
                write!(f, "boss roster of '{}' is invalid: {}", character, reason)
            }
            CatalogError::InvalidStat { id, field, value } => {
                write!(f, "'{}' has invalid {} = {}", id, field, value)
            }
            CatalogError::DuplicateId(id) => write!(f, "duplicate catalog id '{}'", id),
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Tuning file failure
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "tuning parse error: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "tuning field '{}' is invalid: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Convenience alias for catalog-backed constructors.
pub type GameResult<T> = Result<T, CatalogError>;
