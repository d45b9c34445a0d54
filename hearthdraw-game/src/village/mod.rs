//! Village buildings: cost catalog, per-player levels and upgrades.

pub mod catalog;
pub mod config;
pub mod progress;
pub mod upgrade;

pub use catalog::{CatalogError, VillageCatalog};
pub use config::{BuildingConfig, LevelConfig, VillageConfig};
pub use progress::{LevelStore, LevelWriteError, VillageProgressState};
pub use upgrade::{UpgradeError, UpgradeReceipt, VillageConfigError, VillageUpgradeService};
