//! Spend coins to raise a building by one level.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{LevelStore, LevelWriteError, VillageCatalog};
use crate::currency::Wallet;
use crate::error::InsufficientResource;

/// Catalog and progress state disagree; upgrades stay disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VillageConfigError {
    #[error("catalog defines {catalog} buildings but progress tracks {progress}")]
    BuildingCountMismatch { catalog: usize, progress: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("village upgrades are disabled: {0}")]
    Misconfigured(VillageConfigError),
    #[error("unknown building '{0}'")]
    UnknownBuilding(String),
    #[error("building index {0} is out of range")]
    BuildingOutOfRange(usize),
    #[error("building {index} is already at max level {level}")]
    MaxLevel { index: usize, level: u32 },
    #[error("building {index} is at level {level}, above its max level {max_level}")]
    LevelOutOfRange {
        index: usize,
        level: u32,
        max_level: u32,
    },
    #[error("cannot upgrade building {index} from level {level}: {shortfall}")]
    NotEnoughCurrency {
        index: usize,
        level: u32,
        shortfall: InsufficientResource,
    },
    #[error("level write for building {index} failed after spending {refunded} coins (refunded): {source}")]
    LevelRejected {
        index: usize,
        refunded: i32,
        source: LevelWriteError,
    },
}

impl UpgradeError {
    /// Failures caused by setup rather than player state.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Misconfigured(_)
                | Self::BuildingOutOfRange(_)
                | Self::LevelOutOfRange { .. }
                | Self::LevelRejected { .. }
        )
    }
}

/// A committed upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeReceipt {
    pub building_index: usize,
    pub previous_level: u32,
    pub new_level: u32,
    pub cost: i32,
}

/// Upgrades buildings from `catalog`, storing levels in `levels` and paying
/// from `wallet`. A size mismatch found at construction disables every
/// operation for the lifetime of the service.
pub struct VillageUpgradeService<'a> {
    catalog: &'a VillageCatalog,
    levels: &'a mut dyn LevelStore,
    wallet: &'a mut dyn Wallet,
    validation: Result<(), VillageConfigError>,
}

impl<'a> VillageUpgradeService<'a> {
    pub fn new(
        catalog: &'a VillageCatalog,
        levels: &'a mut dyn LevelStore,
        wallet: &'a mut dyn Wallet,
    ) -> Self {
        let validation = if catalog.building_count() == levels.building_count() {
            Ok(())
        } else {
            let err = VillageConfigError::BuildingCountMismatch {
                catalog: catalog.building_count(),
                progress: levels.building_count(),
            };
            warn!("{err}");
            Err(err)
        };
        Self {
            catalog,
            levels,
            wallet,
            validation,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }

    #[must_use]
    pub fn current_level(&self, index: usize) -> Option<u32> {
        self.validation.ok()?;
        self.levels.level(index)
    }

    #[must_use]
    pub fn current_level_of(&self, building_id: &str) -> Option<u32> {
        self.current_level(self.catalog.building_index(building_id)?)
    }

    /// Price of the next level, `None` at max level or for unknown buildings.
    #[must_use]
    pub fn next_cost(&self, index: usize) -> Option<i32> {
        let level = self.current_level(index)?;
        self.catalog.upgrade_cost(index, level)
    }

    #[must_use]
    pub fn next_cost_of(&self, building_id: &str) -> Option<i32> {
        self.next_cost(self.catalog.building_index(building_id)?)
    }

    #[must_use]
    pub fn max_level(&self, index: usize) -> u32 {
        self.catalog.max_level(index)
    }

    #[must_use]
    pub fn max_level_of(&self, building_id: &str) -> u32 {
        self.catalog
            .building_index(building_id)
            .map_or(0, |index| self.catalog.max_level(index))
    }

    /// Upgrade a building by id.
    ///
    /// # Errors
    ///
    /// See [`Self::try_upgrade_index`]; also [`UpgradeError::UnknownBuilding`].
    pub fn try_upgrade(&mut self, building_id: &str) -> Result<UpgradeReceipt, UpgradeError> {
        self.validation.map_err(UpgradeError::Misconfigured)?;
        let index = self
            .catalog
            .building_index(building_id)
            .ok_or_else(|| UpgradeError::UnknownBuilding(building_id.to_string()))?;
        self.try_upgrade_index(index)
    }

    /// Upgrade a building by index.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError`] without touching the wallet unless the level
    /// write itself fails, in which case the cost is refunded first.
    pub fn try_upgrade_index(&mut self, index: usize) -> Result<UpgradeReceipt, UpgradeError> {
        self.validation.map_err(UpgradeError::Misconfigured)?;
        let level = self
            .levels
            .level(index)
            .ok_or(UpgradeError::BuildingOutOfRange(index))?;
        let max_level = self.catalog.max_level(index);
        if level > max_level {
            return Err(UpgradeError::LevelOutOfRange {
                index,
                level,
                max_level,
            });
        }
        if level == max_level {
            return Err(UpgradeError::MaxLevel { index, level });
        }
        let cost = self
            .catalog
            .upgrade_cost(index, level)
            .ok_or(UpgradeError::BuildingOutOfRange(index))?;

        self.wallet
            .try_spend(cost)
            .map_err(|shortfall| UpgradeError::NotEnoughCurrency {
                index,
                level,
                shortfall,
            })?;

        let new_level = level.saturating_add(1);
        if let Err(source) = self.levels.try_set_level(index, new_level) {
            self.wallet.add(cost);
            debug!("refunded {cost} coins after failed level write for building {index}: {source}");
            return Err(UpgradeError::LevelRejected {
                index,
                refunded: cost,
                source,
            });
        }

        debug!("building {index} upgraded {level} -> {new_level} for {cost} coins");
        Ok(UpgradeReceipt {
            building_index: index,
            previous_level: level,
            new_level,
            cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyAccount;
    use crate::village::VillageProgressState;

    fn catalog() -> VillageCatalog {
        VillageCatalog::new([("hall", vec![10, 30]), ("well", vec![5])]).unwrap()
    }

    /// Reports a building but refuses every write.
    struct RejectingStore;

    impl LevelStore for RejectingStore {
        fn building_count(&self) -> usize {
            2
        }

        fn level(&self, _index: usize) -> Option<u32> {
            Some(0)
        }

        fn try_set_level(&mut self, index: usize, _level: u32) -> Result<(), LevelWriteError> {
            Err(LevelWriteError::OutOfRange { index, count: 0 })
        }
    }

    #[test]
    fn upgrades_until_max_level() {
        let catalog = catalog();
        let mut progress = VillageProgressState::new(2);
        let mut wallet = CurrencyAccount::with_balance(100);
        let mut service = VillageUpgradeService::new(&catalog, &mut progress, &mut wallet);

        assert_eq!(service.next_cost_of("hall"), Some(10));
        let receipt = service.try_upgrade("hall").unwrap();
        assert_eq!(
            receipt,
            UpgradeReceipt {
                building_index: 0,
                previous_level: 0,
                new_level: 1,
                cost: 10
            }
        );
        service.try_upgrade("hall").unwrap();
        assert_eq!(service.next_cost(0), None);
        assert_eq!(
            service.try_upgrade("hall").unwrap_err(),
            UpgradeError::MaxLevel { index: 0, level: 2 }
        );
        assert_eq!(wallet.coins(), 60);
        assert_eq!(progress.levels(), [2, 0]);
    }

    #[test]
    fn unaffordable_upgrade_changes_nothing() {
        let catalog = catalog();
        let mut progress = VillageProgressState::new(2);
        let mut wallet = CurrencyAccount::with_balance(4);
        let mut service = VillageUpgradeService::new(&catalog, &mut progress, &mut wallet);

        let err = service.try_upgrade_index(1).unwrap_err();
        assert!(matches!(err, UpgradeError::NotEnoughCurrency { index: 1, level: 0, .. }));
        assert!(!err.is_configuration());
        assert_eq!(wallet.coins(), 4);
        assert_eq!(progress.levels(), [0, 0]);
    }

    #[test]
    fn rejected_level_write_refunds_wallet() {
        let catalog = catalog();
        let mut store = RejectingStore;
        let mut wallet = CurrencyAccount::with_balance(25);
        let mut service = VillageUpgradeService::new(&catalog, &mut store, &mut wallet);

        let err = service.try_upgrade("hall").unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, UpgradeError::LevelRejected { refunded: 10, .. }));
        assert_eq!(wallet.coins(), 25);
    }

    #[test]
    fn count_mismatch_disables_service() {
        let catalog = catalog();
        let mut progress = VillageProgressState::new(1);
        let mut wallet = CurrencyAccount::with_balance(100);
        let mut service = VillageUpgradeService::new(&catalog, &mut progress, &mut wallet);

        assert!(!service.is_valid());
        assert_eq!(service.current_level(0), None);
        let err = service.try_upgrade("hall").unwrap_err();
        assert_eq!(
            err,
            UpgradeError::Misconfigured(VillageConfigError::BuildingCountMismatch {
                catalog: 2,
                progress: 1
            })
        );
        assert!(err.is_configuration());
        assert_eq!(wallet.coins(), 100);
    }

    #[test]
    fn stored_level_above_catalog_max_is_a_configuration_error() {
        let catalog = VillageCatalog::new([("hall", vec![10]), ("well", vec![5])]).unwrap();
        let mut progress = VillageProgressState::from_levels(vec![9, 0]);
        let mut wallet = CurrencyAccount::with_balance(50);
        let mut service = VillageUpgradeService::new(&catalog, &mut progress, &mut wallet);

        let err = service.try_upgrade("hall").unwrap_err();
        assert_eq!(
            err,
            UpgradeError::LevelOutOfRange {
                index: 0,
                level: 9,
                max_level: 1
            }
        );
        assert!(err.is_configuration());
        assert!(service.try_upgrade("well").is_ok());
        assert_eq!(wallet.coins(), 45);
        assert_eq!(progress.levels(), [9, 1]);
    }

    #[test]
    fn unknown_building_is_reported() {
        let catalog = catalog();
        let mut progress = VillageProgressState::new(2);
        let mut wallet = CurrencyAccount::new();
        let mut service = VillageUpgradeService::new(&catalog, &mut progress, &mut wallet);

        assert_eq!(
            service.try_upgrade("tower").unwrap_err(),
            UpgradeError::UnknownBuilding("tower".into())
        );
        assert_eq!(service.max_level_of("tower"), 0);
        assert_eq!(service.max_level_of("hall"), 2);
    }
}
