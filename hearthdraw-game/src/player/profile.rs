use std::collections::BTreeSet;
use std::rc::Rc;

use log::debug;

use super::impact::{
    ImpactKind, ImpactOutcome, PlayerImpact, REASON_MISSING_ID, REASON_NON_POSITIVE,
    REASON_UNSUPPORTED,
};
use super::snapshot::PlayerProfileSnapshot;
use crate::cards::{CardDrawUseCase, DrawError, DrawModifiers, DrawOutcome, RewardContext};
use crate::clock::Clock;
use crate::currency::{CurrencyAccount, Wallet};
use crate::energy::EnergyAccount;
use crate::error::InsufficientResource;
use crate::events::{CoinsChanged, EnergyChanged, ListenerId};
use crate::minigames::MinigameLauncher;
use crate::village::{
    UpgradeError, UpgradeReceipt, VillageCatalog, VillageProgressState, VillageUpgradeService,
};

pub const DEFAULT_PLAYER_ID: &str = "local_player";

/// Everything one player owns. Draw multipliers are session state and are
/// not part of the snapshot.
#[derive(Debug)]
pub struct PlayerProfile {
    player_id: String,
    currency: CurrencyAccount,
    energy: EnergyAccount,
    village: VillageProgressState,
    modifiers: DrawModifiers,
    revision: u64,
    processed_impact_ids: BTreeSet<String>,
}

impl PlayerProfile {
    /// Fresh profile. Blank ids become [`DEFAULT_PLAYER_ID`].
    #[must_use]
    pub fn new(
        player_id: &str,
        currency: CurrencyAccount,
        energy: EnergyAccount,
        village: VillageProgressState,
    ) -> Self {
        Self {
            player_id: normalize_player_id(player_id),
            currency,
            energy,
            village,
            modifiers: DrawModifiers::new(),
            revision: 0,
            processed_impact_ids: BTreeSet::new(),
        }
    }

    /// Rebuild a profile from persisted state, driving regen from `clock`.
    #[must_use]
    pub fn from_snapshot(snapshot: &PlayerProfileSnapshot, clock: Rc<dyn Clock>) -> Self {
        let energy = EnergyAccount::new(
            clock,
            snapshot.current_energy,
            snapshot.regen_max_energy,
            snapshot.storage_max_energy,
            snapshot.regen_interval_seconds,
            snapshot.last_regen_ticks,
        );
        let mut profile = Self::new(
            &snapshot.player_id,
            CurrencyAccount::with_balance(snapshot.coins),
            energy,
            VillageProgressState::from_levels(snapshot.village_levels.clone()),
        );
        profile.revision = snapshot.revision;
        profile.processed_impact_ids = snapshot
            .processed_impact_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();
        profile
    }

    /// Capture the current state after crediting pending regen.
    pub fn create_snapshot(&mut self) -> PlayerProfileSnapshot {
        self.energy.apply_regen();
        PlayerProfileSnapshot {
            player_id: self.player_id.clone(),
            revision: self.revision,
            coins: self.currency.coins(),
            current_energy: self.energy.current(),
            regen_max_energy: self.energy.max(),
            storage_max_energy: self.energy.storage_max(),
            regen_interval_seconds: self.energy.regen_interval_seconds(),
            last_regen_ticks: self.energy.last_regen_ticks(),
            village_levels: self.village.levels().to_vec(),
            processed_impact_ids: self.processed_impact_ids.iter().cloned().collect(),
        }
    }

    #[must_use]
    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn currency(&self) -> &CurrencyAccount {
        &self.currency
    }

    #[must_use]
    pub const fn energy(&self) -> &EnergyAccount {
        &self.energy
    }

    #[must_use]
    pub const fn village(&self) -> &VillageProgressState {
        &self.village
    }

    #[must_use]
    pub const fn modifiers(&self) -> &DrawModifiers {
        &self.modifiers
    }

    pub fn subscribe_coins(&mut self, callback: impl FnMut(&CoinsChanged) + 'static) -> ListenerId {
        self.currency.subscribe(callback)
    }

    pub fn subscribe_energy(
        &mut self,
        callback: impl FnMut(&EnergyChanged) + 'static,
    ) -> ListenerId {
        self.energy.subscribe(callback)
    }

    /// Swap the time source, e.g. after loading a snapshot in a new session.
    pub fn attach_clock(&mut self, clock: Rc<dyn Clock>) {
        self.energy.attach_clock(clock);
    }

    pub fn apply_regen(&mut self) {
        self.energy.apply_regen();
    }

    pub fn add_coins(&mut self, amount: i32) {
        self.currency.add(amount);
    }

    /// # Errors
    ///
    /// Returns [`InsufficientResource`] when the balance is too small.
    pub fn try_spend_coins(&mut self, amount: i32) -> Result<(), InsufficientResource> {
        self.currency.try_spend(amount)
    }

    pub fn add_energy(&mut self, amount: i32) {
        self.energy.add(amount);
    }

    /// # Errors
    ///
    /// Returns [`InsufficientResource`] when the pool is too small.
    pub fn try_spend_energy(&mut self, amount: i32) -> Result<(), InsufficientResource> {
        self.energy.try_spend(amount)
    }

    /// Grow the village to at least `building_count` buildings.
    pub fn ensure_village_capacity(&mut self, building_count: usize) {
        self.village.ensure_capacity(building_count);
    }

    #[must_use]
    pub fn has_processed_impact(&self, impact_id: &str) -> bool {
        let impact_id = impact_id.trim();
        !impact_id.is_empty() && self.processed_impact_ids.contains(impact_id)
    }

    /// Sorted ids of every impact applied so far.
    pub fn processed_impact_ids(&self) -> impl Iterator<Item = &str> {
        self.processed_impact_ids.iter().map(String::as_str)
    }

    /// Apply an external impact at most once per id.
    ///
    /// Checks run in order: missing id, already processed, non-positive
    /// amount, unsupported type. Only an applied impact records its id and
    /// bumps the revision.
    pub fn apply_external_impact(&mut self, impact: &PlayerImpact) -> ImpactOutcome {
        let kind = impact.impact_type;
        let requested = impact.amount;
        let impact_id = impact.impact_id.trim();
        if impact_id.is_empty() {
            return ImpactOutcome::invalid(String::new(), kind, requested, REASON_MISSING_ID);
        }
        if self.processed_impact_ids.contains(impact_id) {
            debug!("ignoring replayed impact '{impact_id}'");
            return ImpactOutcome::duplicate(impact_id.to_string(), kind);
        }
        if requested <= 0 {
            return ImpactOutcome::invalid(impact_id.to_string(), kind, requested, REASON_NON_POSITIVE);
        }

        let (applied, coins_delta, energy_delta) = match kind {
            ImpactKind::CoinsGranted => {
                let before = self.currency.coins();
                self.currency.add(requested);
                let delta = self.currency.coins() - before;
                (delta, delta, 0)
            }
            ImpactKind::CoinsStolen => {
                let spent = self.spend_coins_up_to(requested);
                (spent, -spent, 0)
            }
            ImpactKind::EnergyGranted => {
                self.energy.apply_regen();
                let before = self.energy.current();
                self.energy.add(requested);
                let delta = self.energy.current() - before;
                (delta, 0, delta)
            }
            ImpactKind::EnergyRemoved => {
                let spent = self.spend_energy_up_to(requested);
                (spent, 0, -spent)
            }
            ImpactKind::Unsupported => {
                return ImpactOutcome::invalid(
                    impact_id.to_string(),
                    kind,
                    requested,
                    REASON_UNSUPPORTED,
                );
            }
        };

        self.processed_impact_ids.insert(impact_id.to_string());
        self.revision = self.revision.saturating_add(1);
        debug!(
            "applied impact '{impact_id}' from '{}': {applied}/{requested}",
            impact.source_player_id
        );
        ImpactOutcome::applied(
            impact_id.to_string(),
            kind,
            requested,
            applied,
            coins_delta,
            energy_delta,
        )
    }

    /// Apply impacts in order, one outcome each.
    pub fn apply_external_impacts<'i>(
        &mut self,
        impacts: impl IntoIterator<Item = &'i PlayerImpact>,
    ) -> Vec<ImpactOutcome> {
        impacts
            .into_iter()
            .map(|impact| self.apply_external_impact(impact))
            .collect()
    }

    /// Run one card draw against this profile's accounts.
    ///
    /// # Errors
    ///
    /// See [`CardDrawUseCase::try_draw`].
    pub fn draw_card(
        &mut self,
        use_case: &mut CardDrawUseCase,
        minigames: &mut dyn MinigameLauncher,
    ) -> Result<DrawOutcome, DrawError> {
        let mut context = RewardContext::new(
            &mut self.energy,
            &mut self.currency,
            &mut self.modifiers,
            minigames,
        );
        use_case.try_draw(&mut context)
    }

    /// Upgrade service bound to this profile's village and coins.
    pub fn village_upgrades<'a>(&'a mut self, catalog: &'a VillageCatalog) -> VillageUpgradeService<'a> {
        VillageUpgradeService::new(catalog, &mut self.village, &mut self.currency)
    }

    /// # Errors
    ///
    /// See [`VillageUpgradeService::try_upgrade`].
    pub fn upgrade_building(
        &mut self,
        catalog: &VillageCatalog,
        building_id: &str,
    ) -> Result<UpgradeReceipt, UpgradeError> {
        self.village_upgrades(catalog).try_upgrade(building_id)
    }

    fn spend_coins_up_to(&mut self, requested: i32) -> i32 {
        let amount = requested.min(self.currency.coins());
        if amount <= 0 {
            return 0;
        }
        self.currency.try_spend(amount).map_or(0, |()| amount)
    }

    fn spend_energy_up_to(&mut self, requested: i32) -> i32 {
        self.energy.apply_regen();
        let amount = requested.min(self.energy.current());
        if amount <= 0 {
            return 0;
        }
        self.energy.try_spend(amount).map_or(0, |()| amount)
    }
}

fn normalize_player_id(player_id: &str) -> String {
    let trimmed = player_id.trim();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_ID.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, RewardEffect, WeightedDeck};
    use crate::clock::{ManualClock, TICKS_PER_SECOND};
    use crate::minigames::RecordingMinigameLauncher;
    use crate::player::ImpactStatus;

    fn profile(clock: &ManualClock, coins: i32, energy: i32) -> PlayerProfile {
        let energy = EnergyAccount::new(Rc::new(clock.clone()), energy, 10, 20, 60, 0);
        PlayerProfile::new(
            " p1 ",
            CurrencyAccount::with_balance(coins),
            energy,
            VillageProgressState::new(2),
        )
    }

    #[test]
    fn blank_id_falls_back_to_local_player() {
        let clock = ManualClock::at_seconds(1);
        let energy = EnergyAccount::new(Rc::new(clock), 0, 10, 10, 60, 0);
        let profile = PlayerProfile::new(
            "  ",
            CurrencyAccount::new(),
            energy,
            VillageProgressState::default(),
        );
        assert_eq!(profile.player_id(), DEFAULT_PLAYER_ID);
    }

    #[test]
    fn replayed_impact_is_ignored() {
        let clock = ManualClock::at_seconds(1);
        let mut profile = profile(&clock, 0, 5);
        let impact = PlayerImpact::new("gift-1", ImpactKind::CoinsGranted, 30).by_player("p2");

        let first = profile.apply_external_impact(&impact);
        assert_eq!(first.status, ImpactStatus::Applied);
        assert_eq!(first.coins_delta, 30);
        let second = profile.apply_external_impact(&impact);
        assert_eq!(second.status, ImpactStatus::DuplicateIgnored);
        assert_eq!(profile.currency().coins(), 30);
        assert_eq!(profile.revision(), 1);
        assert!(profile.has_processed_impact(" gift-1 "));
    }

    #[test]
    fn theft_is_capped_by_balance() {
        let clock = ManualClock::at_seconds(1);
        let mut profile = profile(&clock, 12, 5);
        let outcome =
            profile.apply_external_impact(&PlayerImpact::new("raid", ImpactKind::CoinsStolen, 50));
        assert_eq!(outcome.status, ImpactStatus::AppliedPartially);
        assert_eq!(outcome.applied_amount, 12);
        assert_eq!(outcome.coins_delta, -12);
        assert_eq!(profile.currency().coins(), 0);

        let outcome =
            profile.apply_external_impact(&PlayerImpact::new("drain", ImpactKind::EnergyRemoved, 2));
        assert_eq!(outcome.status, ImpactStatus::Applied);
        assert_eq!(outcome.energy_delta, -2);
        assert_eq!(profile.energy().current(), 3);
        assert_eq!(profile.revision(), 2);
    }

    #[test]
    fn invalid_impacts_change_nothing() {
        let clock = ManualClock::at_seconds(1);
        let mut profile = profile(&clock, 10, 5);
        let outcomes = profile.apply_external_impacts(&[
            PlayerImpact::new(" ", ImpactKind::CoinsGranted, 5),
            PlayerImpact::new("zero", ImpactKind::CoinsGranted, 0),
            PlayerImpact::new("odd", ImpactKind::Unsupported, 5),
        ]);
        assert!(outcomes.iter().all(|o| o.status == ImpactStatus::Invalid));
        assert_eq!(outcomes[0].reason.as_deref(), Some(REASON_MISSING_ID));
        assert_eq!(outcomes[1].reason.as_deref(), Some(REASON_NON_POSITIVE));
        assert_eq!(outcomes[2].reason.as_deref(), Some(REASON_UNSUPPORTED));
        assert_eq!(profile.revision(), 0);
        assert_eq!(profile.processed_impact_ids().count(), 0);
        assert_eq!(profile.currency().coins(), 10);
    }

    #[test]
    fn duplicate_check_precedes_amount_check() {
        let clock = ManualClock::at_seconds(1);
        let mut profile = profile(&clock, 0, 5);
        profile.apply_external_impact(&PlayerImpact::new("a", ImpactKind::CoinsGranted, 1));
        let outcome = profile.apply_external_impact(&PlayerImpact::new("a", ImpactKind::CoinsGranted, -4));
        assert_eq!(outcome.status, ImpactStatus::DuplicateIgnored);
    }

    #[test]
    fn snapshot_round_trip_restores_state() {
        let clock = ManualClock::at_seconds(100);
        let mut profile = profile(&clock, 40, 3);
        profile.apply_external_impact(&PlayerImpact::new("b", ImpactKind::CoinsGranted, 5));
        profile.apply_external_impact(&PlayerImpact::new("a", ImpactKind::EnergyGranted, 1));
        profile.ensure_village_capacity(3);
        clock.advance_seconds(90);

        let snapshot = profile.create_snapshot();
        assert_eq!(snapshot.current_energy, 5);
        assert_eq!(snapshot.processed_impact_ids, vec!["a", "b"]);
        assert_eq!(
            snapshot.last_regen_ticks,
            160 * TICKS_PER_SECOND,
            "anchor keeps the unused 30 seconds"
        );

        let mut restored = PlayerProfile::from_snapshot(&snapshot, Rc::new(clock.clone()));
        assert_eq!(restored.player_id(), "p1");
        assert_eq!(restored.revision(), 2);
        assert_eq!(restored.currency().coins(), 45);
        assert_eq!(restored.village().levels(), [0, 0, 0]);
        assert_eq!(restored.create_snapshot(), snapshot);
    }

    #[test]
    fn draws_and_upgrades_use_profile_accounts() {
        let clock = ManualClock::at_seconds(1);
        let mut profile = profile(&clock, 0, 2);
        let deck = WeightedDeck::new([Card::new(
            "purse",
            1,
            [
                RewardEffect::GrantCurrency { amount: 20 },
                RewardEffect::LaunchMinigame {
                    minigame_id: "dice".into(),
                },
            ],
        )]);
        let mut use_case = CardDrawUseCase::new(deck, 1, 5);
        let mut launcher = RecordingMinigameLauncher::default();

        let outcome = profile.draw_card(&mut use_case, &mut launcher).unwrap();
        assert_eq!(outcome.rewards.coins_granted, 20);
        assert_eq!(launcher.launched(), ["dice"]);
        assert_eq!(profile.energy().current(), 1);

        let catalog = VillageCatalog::new([("hall", vec![15]), ("well", vec![])]).unwrap();
        let receipt = profile.upgrade_building(&catalog, "hall").unwrap();
        assert_eq!(receipt.new_level, 1);
        assert_eq!(profile.currency().coins(), 5);
        assert_eq!(profile.revision(), 0);
    }
}
