//! Hearthdraw Economy Engine
//!
//! Platform-agnostic player progression core: regenerating energy, coins,
//! a weighted reward deck with draw multipliers, village upgrades and an
//! idempotent ledger of externally sourced impacts. No UI, networking or
//! file I/O lives here; time, persistence and minigames are injected.

pub mod cards;
pub mod clock;
pub mod config;
pub mod currency;
pub mod energy;
pub mod error;
pub mod events;
pub mod minigames;
pub mod numbers;
pub mod player;
pub mod regen;
pub mod rng;
pub mod store;
pub mod village;

use std::rc::Rc;

use log::warn;

// Re-export commonly used types
pub use cards::{
    Card, CardDrawUseCase, DeckConfig, DeckError, DrawError, DrawModifiers, DrawOutcome,
    DrawTally, RewardContext, RewardEffect, WeightedDeck,
};
pub use clock::{Clock, ManualClock, SystemClock, TICKS_PER_SECOND};
pub use config::{ConfigError, PlayerStartConfig, StaticConfigLoader};
pub use currency::{CurrencyAccount, Wallet};
pub use energy::EnergyAccount;
pub use error::{InsufficientResource, ResourceKind};
pub use events::{CoinsChanged, EnergyChanged, ListenerId};
pub use minigames::{MinigameLauncher, NullMinigameLauncher, RecordingMinigameLauncher};
pub use player::{
    ImpactKind, ImpactOutcome, ImpactStatus, PlayerImpact, PlayerProfile, PlayerProfileSnapshot,
};
pub use store::MemoryProfileStore;
pub use village::{
    CatalogError, UpgradeError, UpgradeReceipt, VillageCatalog, VillageConfig, VillageConfigError,
    VillageProgressState, VillageUpgradeService,
};

/// Source of player, deck and village configuration.
/// Platform-specific implementations should provide this
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Returns an error if the player config cannot be loaded or parsed.
    fn load_player_config(&self) -> Result<PlayerStartConfig, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the deck config cannot be loaded or parsed.
    fn load_deck_config(&self) -> Result<DeckConfig, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the village config cannot be loaded or parsed.
    fn load_village_config(&self) -> Result<VillageConfig, Self::Error>;
}

/// Persistence for profile snapshots, keyed by player id.
pub trait ProfileStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    fn save_profile(&self, snapshot: &PlayerProfileSnapshot) -> Result<(), Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be read.
    fn load_profile(&self, player_id: &str) -> Result<Option<PlayerProfileSnapshot>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be deleted.
    fn delete_profile(&self, player_id: &str) -> Result<(), Self::Error>;
}

/// Builds profiles, decks and catalogs from configuration and moves
/// profiles in and out of storage.
pub struct EconomyEngine<L, S>
where
    L: ConfigLoader,
    S: ProfileStore,
{
    config_loader: L,
    store: S,
    clock: Rc<dyn Clock>,
}

impl<L, S> EconomyEngine<L, S>
where
    L: ConfigLoader,
    S: ProfileStore,
{
    pub fn new(config_loader: L, store: S, clock: Rc<dyn Clock>) -> Self {
        Self {
            config_loader,
            store,
            clock,
        }
    }

    #[must_use]
    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.clock)
    }

    /// Load and validate starting values.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or is invalid.
    pub fn player_config(&self) -> anyhow::Result<PlayerStartConfig> {
        let config = self.config_loader.load_player_config()?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the village config cannot be loaded or is invalid.
    pub fn load_catalog(&self) -> anyhow::Result<VillageCatalog> {
        Ok(self.config_loader.load_village_config()?.build_catalog()?)
    }

    /// Deck and draw price for a session whose rolls derive from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the deck or player config cannot be loaded.
    pub fn create_draw_use_case(&self, seed: u64) -> anyhow::Result<CardDrawUseCase> {
        let config = self.player_config()?;
        let deck = self.config_loader.load_deck_config()?.build_deck();
        Ok(CardDrawUseCase::new(deck, config.draw_cost, seed))
    }

    /// Fresh profile from the starting config. A blank `player_id` takes the
    /// configured id.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn create_profile(&self, player_id: &str) -> anyhow::Result<PlayerProfile> {
        let config = self.player_config()?;
        let catalog = self.load_catalog()?;
        if config.village_building_count > catalog.building_count() {
            warn!(
                "player config starts with {} buildings but the catalog defines {}",
                config.village_building_count,
                catalog.building_count()
            );
        }

        let energy = EnergyAccount::new(
            self.clock(),
            config.starting_energy,
            config.regen_max_energy,
            config.storage_max_energy,
            config.regen_interval_seconds,
            self.clock.now_ticks(),
        );
        let mut village = VillageProgressState::new(config.village_building_count);
        village.ensure_capacity(catalog.building_count());

        let player_id = if player_id.trim().is_empty() {
            config.player_id.as_str()
        } else {
            player_id
        };
        Ok(PlayerProfile::new(
            player_id,
            CurrencyAccount::with_balance(config.starting_coins),
            energy,
            village,
        ))
    }

    /// Snapshot a profile and hand it to storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be saved.
    pub fn save_profile(&self, profile: &mut PlayerProfile) -> Result<PlayerProfileSnapshot, S::Error> {
        let snapshot = profile.create_snapshot();
        self.store.save_profile(&snapshot)?;
        Ok(snapshot)
    }

    /// Rehydrate a stored profile against the live clock, growing its
    /// village to the current catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot or the catalog cannot be loaded.
    pub fn load_profile(&self, player_id: &str) -> anyhow::Result<Option<PlayerProfile>> {
        let Some(snapshot) = self.store.load_profile(player_id)? else {
            return Ok(None);
        };
        let catalog = self.load_catalog()?;
        let mut profile = PlayerProfile::from_snapshot(&snapshot, self.clock());
        profile.ensure_village_capacity(catalog.building_count());
        Ok(Some(profile))
    }

    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be deleted.
    pub fn delete_profile(&self, player_id: &str) -> Result<(), S::Error> {
        self.store.delete_profile(player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl ConfigLoader for FixtureLoader {
        type Error = Infallible;

        fn load_player_config(&self) -> Result<PlayerStartConfig, Self::Error> {
            Ok(PlayerStartConfig {
                starting_coins: 300,
                ..PlayerStartConfig::default()
            })
        }

        fn load_deck_config(&self) -> Result<DeckConfig, Self::Error> {
            Ok(DeckConfig::default())
        }

        fn load_village_config(&self) -> Result<VillageConfig, Self::Error> {
            Ok(VillageConfig {
                buildings: vec![
                    village::BuildingConfig {
                        building_id: "hall".into(),
                        display_name: "Hall".into(),
                        levels: vec![village::LevelConfig { upgrade_cost: 100 }],
                    },
                    village::BuildingConfig {
                        building_id: "farm".into(),
                        display_name: String::new(),
                        levels: Vec::new(),
                    },
                ],
            })
        }
    }

    fn engine(clock: &ManualClock) -> EconomyEngine<FixtureLoader, MemoryProfileStore> {
        EconomyEngine::new(
            FixtureLoader,
            MemoryProfileStore::default(),
            Rc::new(clock.clone()),
        )
    }

    #[test]
    fn engine_creates_and_roundtrips_profiles() {
        let clock = ManualClock::at_seconds(1_000);
        let engine = engine(&clock);
        let mut profile = engine.create_profile("hero").unwrap();
        assert_eq!(profile.currency().coins(), 300);
        assert_eq!(profile.energy().current(), 5);
        assert_eq!(profile.village().levels(), [0, 0]);

        let catalog = engine.load_catalog().unwrap();
        profile.upgrade_building(&catalog, "hall").unwrap();
        engine.save_profile(&mut profile).unwrap();

        clock.advance_seconds(600);
        let mut loaded = engine.load_profile("hero").unwrap().expect("save exists");
        assert_eq!(loaded.currency().coins(), 200);
        assert_eq!(loaded.village().levels(), [1, 0]);
        loaded.apply_regen();
        assert_eq!(loaded.energy().current(), 7);
        assert!(engine.load_profile("missing").unwrap().is_none());

        engine.delete_profile("hero").unwrap();
        assert!(engine.load_profile("hero").unwrap().is_none());
    }

    #[test]
    fn blank_player_id_uses_configured_id() {
        let clock = ManualClock::at_seconds(1);
        let profile = engine(&clock).create_profile(" ").unwrap();
        assert_eq!(profile.player_id(), player::DEFAULT_PLAYER_ID);
    }

    #[test]
    fn empty_deck_config_draws_fallback_card() {
        let clock = ManualClock::at_seconds(1);
        let engine = engine(&clock);
        let mut profile = engine.create_profile("hero").unwrap();
        let mut use_case = engine.create_draw_use_case(11).unwrap();
        let outcome = profile
            .draw_card(&mut use_case, &mut NullMinigameLauncher)
            .unwrap();
        assert_eq!(outcome.card.id, cards::config::FALLBACK_CARD_ID);
        assert_eq!(profile.currency().coins(), 400);
    }
}
