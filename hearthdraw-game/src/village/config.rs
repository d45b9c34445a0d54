//! Village building definitions as authored in data files.

use serde::{Deserialize, Serialize};

use super::{CatalogError, VillageCatalog};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(default)]
    pub upgrade_cost: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingConfig {
    pub building_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub levels: Vec<LevelConfig>,
}

impl BuildingConfig {
    /// Name shown to players, falling back to the id.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.building_id
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VillageConfig {
    #[serde(default)]
    pub buildings: Vec<BuildingConfig>,
}

impl VillageConfig {
    /// Parse building definitions from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a village.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns [`CatalogError`] when a building definition is invalid.
    pub fn build_catalog(&self) -> Result<VillageCatalog, CatalogError> {
        VillageCatalog::new(self.buildings.iter().map(|building| {
            let costs = building.levels.iter().map(|level| level.upgrade_cost).collect();
            (building.building_id.trim(), costs)
        }))
    }
}
