//! Externally sourced resource changes and their outcomes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactKind {
    CoinsGranted,
    CoinsStolen,
    EnergyGranted,
    EnergyRemoved,
    #[serde(other)]
    Unsupported,
}

/// A uniquely identified event mutating a player's resources, e.g. a raid
/// by another player. Delivered at least once; applied at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerImpact {
    #[serde(default)]
    pub impact_id: String,
    #[serde(default)]
    pub source_player_id: String,
    pub impact_type: ImpactKind,
    #[serde(default)]
    pub amount: i32,
    #[serde(default)]
    pub created_at_ticks: i64,
}

impl PlayerImpact {
    #[must_use]
    pub fn new(impact_id: impl Into<String>, impact_type: ImpactKind, amount: i32) -> Self {
        Self {
            impact_id: impact_id.into(),
            source_player_id: String::new(),
            impact_type,
            amount,
            created_at_ticks: 0,
        }
    }

    #[must_use]
    pub fn by_player(mut self, source_player_id: impl Into<String>) -> Self {
        self.source_player_id = source_player_id.into();
        self
    }

    #[must_use]
    pub const fn at_ticks(mut self, created_at_ticks: i64) -> Self {
        self.created_at_ticks = created_at_ticks;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactStatus {
    Applied,
    /// Removal capped by what the player held.
    AppliedPartially,
    DuplicateIgnored,
    Invalid,
}

pub const REASON_MISSING_ID: &str = "impact id is required";
pub const REASON_DUPLICATE: &str = "impact already processed";
pub const REASON_NON_POSITIVE: &str = "impact amount must be greater than zero";
pub const REASON_UNSUPPORTED: &str = "unsupported impact type";

/// Result of applying one impact. Deltas are signed from the player's view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactOutcome {
    pub status: ImpactStatus,
    pub impact_id: String,
    pub impact_type: ImpactKind,
    pub requested_amount: i32,
    pub applied_amount: i32,
    pub coins_delta: i32,
    pub energy_delta: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ImpactOutcome {
    pub(crate) fn applied(
        impact_id: String,
        impact_type: ImpactKind,
        requested_amount: i32,
        applied_amount: i32,
        coins_delta: i32,
        energy_delta: i32,
    ) -> Self {
        let status = if applied_amount < requested_amount {
            ImpactStatus::AppliedPartially
        } else {
            ImpactStatus::Applied
        };
        Self {
            status,
            impact_id,
            impact_type,
            requested_amount,
            applied_amount,
            coins_delta,
            energy_delta,
            reason: None,
        }
    }

    pub(crate) fn duplicate(impact_id: String, impact_type: ImpactKind) -> Self {
        Self {
            status: ImpactStatus::DuplicateIgnored,
            impact_id,
            impact_type,
            requested_amount: 0,
            applied_amount: 0,
            coins_delta: 0,
            energy_delta: 0,
            reason: Some(REASON_DUPLICATE.to_string()),
        }
    }

    pub(crate) fn invalid(
        impact_id: String,
        impact_type: ImpactKind,
        requested_amount: i32,
        reason: &str,
    ) -> Self {
        Self {
            status: ImpactStatus::Invalid,
            impact_id,
            impact_type,
            requested_amount,
            applied_amount: 0,
            coins_delta: 0,
            energy_delta: 0,
            reason: Some(reason.to_string()),
        }
    }

    #[must_use]
    pub const fn was_applied(&self) -> bool {
        matches!(
            self.status,
            ImpactStatus::Applied | ImpactStatus::AppliedPartially
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_impact_types_deserialize_as_unsupported() {
        let impact: PlayerImpact =
            serde_json::from_str(r#"{ "impact_id": "x", "impact_type": "village_burned", "amount": 3 }"#)
                .unwrap();
        assert_eq!(impact.impact_type, ImpactKind::Unsupported);
        assert!(impact.source_player_id.is_empty());
    }

    #[test]
    fn partial_status_follows_amounts() {
        let outcome = ImpactOutcome::applied("a".into(), ImpactKind::CoinsStolen, 10, 4, -4, 0);
        assert_eq!(outcome.status, ImpactStatus::AppliedPartially);
        assert!(outcome.was_applied());
        let outcome = ImpactOutcome::duplicate("a".into(), ImpactKind::CoinsStolen);
        assert!(!outcome.was_applied());
    }
}
