//! Starting values for new players and the bundled configuration set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ConfigLoader;
use crate::cards::DeckConfig;
use crate::player::DEFAULT_PLAYER_ID;
use crate::village::VillageConfig;

const DEFAULT_PLAYER_DATA: &str = include_str!("../data/player.json");
const DEFAULT_DECK_DATA: &str = include_str!("../data/deck.json");
const DEFAULT_VILLAGE_DATA: &str = include_str!("../data/village.json");

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        min: i32,
        value: i32,
    },
    #[error("storage_max_energy ({storage}) is below regen_max_energy ({regen})")]
    StorageBelowRegenCap { storage: i32, regen: i32 },
    #[error("starting_energy ({energy}) exceeds storage_max_energy ({storage})")]
    StartingEnergyAboveStorage { energy: i32, storage: i32 },
}

/// Initial state for a newly created profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStartConfig {
    #[serde(default = "PlayerStartConfig::default_player_id")]
    pub player_id: String,
    #[serde(default)]
    pub starting_coins: i32,
    #[serde(default = "PlayerStartConfig::default_starting_energy")]
    pub starting_energy: i32,
    #[serde(default = "PlayerStartConfig::default_regen_max_energy")]
    pub regen_max_energy: i32,
    #[serde(default = "PlayerStartConfig::default_storage_max_energy")]
    pub storage_max_energy: i32,
    #[serde(default = "PlayerStartConfig::default_regen_interval_seconds")]
    pub regen_interval_seconds: i32,
    #[serde(default = "PlayerStartConfig::default_draw_cost")]
    pub draw_cost: i32,
    #[serde(default = "PlayerStartConfig::default_village_building_count")]
    pub village_building_count: usize,
}

impl PlayerStartConfig {
    fn default_player_id() -> String {
        DEFAULT_PLAYER_ID.to_string()
    }

    const fn default_starting_energy() -> i32 {
        5
    }

    const fn default_regen_max_energy() -> i32 {
        10
    }

    const fn default_storage_max_energy() -> i32 {
        20
    }

    const fn default_regen_interval_seconds() -> i32 {
        300
    }

    const fn default_draw_cost() -> i32 {
        1
    }

    const fn default_village_building_count() -> usize {
        1
    }

    /// # Errors
    ///
    /// Returns an error if the JSON is not a player config.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Bundled starting values.
    #[must_use]
    pub fn default_config() -> Self {
        Self::from_json(DEFAULT_PLAYER_DATA).unwrap_or_default()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for values the energy model would have to
    /// coerce.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_min("starting_coins", 0, self.starting_coins)?;
        check_min("starting_energy", 0, self.starting_energy)?;
        check_min("regen_max_energy", 1, self.regen_max_energy)?;
        check_min("regen_interval_seconds", 1, self.regen_interval_seconds)?;
        check_min("draw_cost", 0, self.draw_cost)?;
        if self.storage_max_energy < self.regen_max_energy {
            return Err(ConfigError::StorageBelowRegenCap {
                storage: self.storage_max_energy,
                regen: self.regen_max_energy,
            });
        }
        if self.starting_energy > self.storage_max_energy {
            return Err(ConfigError::StartingEnergyAboveStorage {
                energy: self.starting_energy,
                storage: self.storage_max_energy,
            });
        }
        Ok(())
    }
}

impl Default for PlayerStartConfig {
    fn default() -> Self {
        Self {
            player_id: Self::default_player_id(),
            starting_coins: 0,
            starting_energy: Self::default_starting_energy(),
            regen_max_energy: Self::default_regen_max_energy(),
            storage_max_energy: Self::default_storage_max_energy(),
            regen_interval_seconds: Self::default_regen_interval_seconds(),
            draw_cost: Self::default_draw_cost(),
            village_building_count: Self::default_village_building_count(),
        }
    }
}

fn check_min(field: &'static str, min: i32, value: i32) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::BelowMinimum { field, min, value });
    }
    Ok(())
}

/// Loader serving the configuration compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticConfigLoader;

impl ConfigLoader for StaticConfigLoader {
    type Error = serde_json::Error;

    fn load_player_config(&self) -> Result<PlayerStartConfig, Self::Error> {
        PlayerStartConfig::from_json(DEFAULT_PLAYER_DATA)
    }

    fn load_deck_config(&self) -> Result<DeckConfig, Self::Error> {
        DeckConfig::from_json(DEFAULT_DECK_DATA)
    }

    fn load_village_config(&self) -> Result<VillageConfig, Self::Error> {
        VillageConfig::from_json(DEFAULT_VILLAGE_DATA)
    }
}
