//! Static per-building upgrade costs.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("building id is missing at index {index}")]
    MissingBuildingId { index: usize },
    #[error("duplicate building id '{id}'")]
    DuplicateBuildingId { id: String },
    #[error("negative upgrade cost {cost} for building '{id}' at level index {level}")]
    NegativeCost { id: String, level: usize, cost: i32 },
}

/// Ordered buildings, each with one cost per level. The number of costs is
/// the building's max level; `costs[n]` upgrades from level `n` to `n + 1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VillageCatalog {
    building_ids: Vec<String>,
    costs: Vec<Vec<i32>>,
    index_by_id: HashMap<String, usize>,
}

impl VillageCatalog {
    /// Validate and build a catalog from `(building_id, costs)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for blank or duplicate ids and negative costs.
    pub fn new<I, S>(buildings: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (S, Vec<i32>)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for (index, (id, costs)) in buildings.into_iter().enumerate() {
            let id: String = id.into();
            if id.trim().is_empty() {
                return Err(CatalogError::MissingBuildingId { index });
            }
            if catalog.index_by_id.contains_key(&id) {
                return Err(CatalogError::DuplicateBuildingId { id });
            }
            if let Some((level, &cost)) = costs.iter().enumerate().find(|(_, cost)| **cost < 0) {
                return Err(CatalogError::NegativeCost { id, level, cost });
            }
            catalog.index_by_id.insert(id.clone(), index);
            catalog.building_ids.push(id);
            catalog.costs.push(costs);
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn building_count(&self) -> usize {
        self.building_ids.len()
    }

    #[must_use]
    pub fn building_index(&self, building_id: &str) -> Option<usize> {
        self.index_by_id.get(building_id).copied()
    }

    #[must_use]
    pub fn building_id(&self, index: usize) -> Option<&str> {
        self.building_ids.get(index).map(String::as_str)
    }

    /// Max level of a building; 0 for unknown indices.
    #[must_use]
    pub fn max_level(&self, index: usize) -> u32 {
        self.costs
            .get(index)
            .map_or(0, |costs| u32::try_from(costs.len()).unwrap_or(u32::MAX))
    }

    /// Cost of upgrading from `current_level` to the next level.
    #[must_use]
    pub fn upgrade_cost(&self, index: usize, current_level: u32) -> Option<i32> {
        let level = usize::try_from(current_level).ok()?;
        self.costs.get(index)?.get(level).copied()
    }
}
