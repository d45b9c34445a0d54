//! Shared failure types for resource accounts.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Spendable resources held by a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Coins,
    Energy,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coins => f.write_str("coins"),
            Self::Energy => f.write_str("energy"),
        }
    }
}

/// A spend was refused because the balance is too small. State is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough {resource}: need {required}, have {available}")]
pub struct InsufficientResource {
    pub resource: ResourceKind,
    pub required: i32,
    pub available: i32,
}

impl InsufficientResource {
    #[must_use]
    pub const fn coins(required: i32, available: i32) -> Self {
        Self {
            resource: ResourceKind::Coins,
            required,
            available,
        }
    }

    #[must_use]
    pub const fn energy(required: i32, available: i32) -> Self {
        Self {
            resource: ResourceKind::Energy,
            required,
            available,
        }
    }
}
