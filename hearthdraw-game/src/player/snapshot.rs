//! Persisted profile state and its JSON form.

use serde::{Deserialize, Serialize};

/// Flat persisted form of a player profile. Missing fields take the
/// defaults below so older saves still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfileSnapshot {
    pub player_id: String,
    pub revision: u64,
    pub coins: i32,
    pub current_energy: i32,
    #[serde(alias = "max_energy")]
    pub regen_max_energy: i32,
    pub storage_max_energy: i32,
    pub regen_interval_seconds: i32,
    pub last_regen_ticks: i64,
    pub village_levels: Vec<u32>,
    /// Sorted, without duplicates.
    pub processed_impact_ids: Vec<String>,
}

impl Default for PlayerProfileSnapshot {
    fn default() -> Self {
        Self {
            player_id: String::new(),
            revision: 0,
            coins: 0,
            current_energy: 0,
            regen_max_energy: 10,
            storage_max_energy: 10,
            regen_interval_seconds: 300,
            last_regen_ticks: 0,
            village_levels: Vec::new(),
            processed_impact_ids: Vec::new(),
        }
    }
}

impl PlayerProfileSnapshot {
    /// # Errors
    ///
    /// Returns an error if the JSON is not a snapshot.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
