use anyhow::{Context, Result, bail};
use log::debug;
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use hearthdraw_game::{
    CardDrawUseCase, Clock, DrawError, EconomyEngine, ImpactStatus, ManualClock, MemoryProfileStore,
    PlayerProfile, PlayerProfileSnapshot, RecordingMinigameLauncher, StaticConfigLoader,
    VillageCatalog,
};

use super::policy::{Action, ActionMix, SessionPolicy};

/// Wall-clock start of every simulated session, in seconds.
pub const SESSION_EPOCH_SECONDS: i64 = 1_700_000_000;
pub const SESSION_PLAYER_ID: &str = "sim_player";

#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub steps: u32,
    pub seconds_per_step: i64,
    /// Time spent away between creating the profile and the first step.
    pub offline_seconds: i64,
    pub mix: ActionMix,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(steps: u32, mix: ActionMix) -> Self {
        Self {
            steps,
            seconds_per_step: 30,
            offline_seconds: 0,
            mix,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_seconds_per_step(mut self, seconds: i64) -> Self {
        self.seconds_per_step = seconds;
        self
    }

    #[must_use]
    pub const fn with_offline_seconds(mut self, seconds: i64) -> Self {
        self.offline_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// # Errors
    ///
    /// Returns the expectation's own failure.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Everything observed during one simulated session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub steps: u32,
    pub draws: u32,
    pub refused_draws: u32,
    pub card_counts: BTreeMap<String, u32>,
    pub coins_from_draws: i64,
    pub energy_from_draws: i64,
    pub max_multiplier: i32,
    pub multiplied_draws: u32,
    /// Draws whose applied multiplier differed from the pending one.
    pub multiplier_chain_breaks: u32,
    pub minigames_launched: u32,
    pub upgrades: u32,
    pub upgrade_refusals: u32,
    pub impacts_applied: u32,
    pub impacts_partial: u32,
    pub impacts_duplicate: u32,
    pub impacts_invalid: u32,
    pub reloads: u32,
    pub snapshot_mismatches: u32,
    pub offline_energy_gained: i32,
    pub coin_events: u32,
    pub invariant_violations: Vec<String>,
    pub final_snapshot: PlayerProfileSnapshot,
}

impl SimulationSummary {
    #[must_use]
    pub fn impacts_seen(&self) -> u32 {
        self.impacts_applied + self.impacts_partial + self.impacts_duplicate + self.impacts_invalid
    }
}

struct Session {
    clock: ManualClock,
    engine: EconomyEngine<StaticConfigLoader, MemoryProfileStore>,
    catalog: VillageCatalog,
    profile: PlayerProfile,
    launcher: RecordingMinigameLauncher,
    coin_events: Rc<Cell<u32>>,
}

impl Session {
    fn start() -> Result<Self> {
        let clock = ManualClock::at_seconds(SESSION_EPOCH_SECONDS);
        let engine = EconomyEngine::new(
            StaticConfigLoader,
            MemoryProfileStore::default(),
            Rc::new(clock.clone()),
        );
        let catalog = engine.load_catalog()?;
        let profile = engine.create_profile(SESSION_PLAYER_ID)?;
        let mut session = Self {
            clock,
            engine,
            catalog,
            profile,
            launcher: RecordingMinigameLauncher::default(),
            coin_events: Rc::new(Cell::new(0)),
        };
        session.count_coin_events();
        Ok(session)
    }

    fn count_coin_events(&mut self) {
        let counter = Rc::clone(&self.coin_events);
        self.profile
            .subscribe_coins(move |_| counter.set(counter.get() + 1));
    }

    /// Save, drop the live profile and load it back.
    fn reload(&mut self) -> Result<PlayerProfileSnapshot> {
        let saved = self.engine.save_profile(&mut self.profile)?;
        self.profile = self
            .engine
            .load_profile(&saved.player_id)?
            .with_context(|| format!("saved profile '{}' not found", saved.player_id))?;
        self.count_coin_events();
        Ok(saved)
    }
}

/// Play `plan` against a fresh profile built from the bundled config.
///
/// # Errors
///
/// Returns an error when the engine cannot be set up or reports a
/// configuration fault mid-session. Gameplay refusals are counted, not
/// returned.
pub fn run_plan(plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
    let mut session = Session::start()?;
    let mut use_case = session.engine.create_draw_use_case(seed)?;
    let mut policy = SessionPolicy::new(seed, plan.mix);
    let mut summary = SimulationSummary {
        seed,
        steps: plan.steps,
        ..SimulationSummary::default()
    };

    if plan.offline_seconds > 0 {
        let saved = session.reload()?;
        session.clock.advance_seconds(plan.offline_seconds);
        session.profile.apply_regen();
        summary.offline_energy_gained = session.profile.energy().current() - saved.current_energy;
        debug!(
            "offline for {}s regained {} energy",
            plan.offline_seconds, summary.offline_energy_gained
        );
    }

    for step in 0..plan.steps {
        session.clock.advance_seconds(plan.seconds_per_step);
        match policy.next_action() {
            Action::Idle => {}
            Action::Draw => play_draw(&mut session, &mut use_case, &mut summary)?,
            Action::Upgrade => play_upgrade(&mut session, &mut policy, &mut summary)?,
            Action::Impact => {
                let impact = policy.next_impact(seed, session.clock.now_ticks());
                let outcome = session.profile.apply_external_impact(&impact);
                match outcome.status {
                    ImpactStatus::Applied => summary.impacts_applied += 1,
                    ImpactStatus::AppliedPartially => summary.impacts_partial += 1,
                    ImpactStatus::DuplicateIgnored => summary.impacts_duplicate += 1,
                    ImpactStatus::Invalid => summary.impacts_invalid += 1,
                }
            }
            Action::SaveReload => {
                let saved = session.reload()?;
                summary.reloads += 1;
                if session.profile.create_snapshot() != saved {
                    summary.snapshot_mismatches += 1;
                }
            }
        }
        check_invariants(&session, step, &mut summary);
    }

    summary.minigames_launched =
        u32::try_from(session.launcher.launched().len()).unwrap_or(u32::MAX);
    summary.coin_events = session.coin_events.get();
    summary.final_snapshot = session.profile.create_snapshot();
    Ok(summary)
}

fn play_draw(
    session: &mut Session,
    use_case: &mut CardDrawUseCase,
    summary: &mut SimulationSummary,
) -> Result<()> {
    let pending = session.profile.modifiers().pending_multiplier();
    let coins_before = session.profile.currency().coins();

    let outcome = match session.profile.draw_card(use_case, &mut session.launcher) {
        Ok(outcome) => outcome,
        Err(DrawError::InsufficientEnergy(_)) => {
            summary.refused_draws += 1;
            return Ok(());
        }
        Err(err) => bail!("draw failed: {err}"),
    };

    let rewards = &outcome.rewards;
    summary.draws += 1;
    *summary.card_counts.entry(outcome.card.id.clone()).or_default() += 1;
    summary.coins_from_draws += i64::from(rewards.coins_granted);
    summary.energy_from_draws += i64::from(rewards.energy_granted);
    summary.max_multiplier = summary.max_multiplier.max(rewards.multiplier);
    if rewards.multiplier > 1 {
        summary.multiplied_draws += 1;
    }
    if rewards.multiplier != pending.max(1) {
        summary.multiplier_chain_breaks += 1;
    }

    let coins_delta = session.profile.currency().coins() - coins_before;
    if coins_delta != rewards.coins_granted {
        summary.invariant_violations.push(format!(
            "draw '{}' moved {coins_delta} coins but reported {}",
            outcome.card.id, rewards.coins_granted
        ));
    }
    Ok(())
}

fn play_upgrade(
    session: &mut Session,
    policy: &mut SessionPolicy,
    summary: &mut SimulationSummary,
) -> Result<()> {
    let Some(index) = policy.pick_building(session.catalog.building_count()) else {
        return Ok(());
    };
    match session
        .profile
        .village_upgrades(&session.catalog)
        .try_upgrade_index(index)
    {
        Ok(receipt) => {
            summary.upgrades += 1;
            debug!(
                "upgraded building {} to level {} for {}",
                receipt.building_index, receipt.new_level, receipt.cost
            );
        }
        Err(err) if err.is_configuration() => bail!("village misconfigured: {err}"),
        Err(_) => summary.upgrade_refusals += 1,
    }
    Ok(())
}

fn check_invariants(session: &Session, step: u32, summary: &mut SimulationSummary) {
    let profile = &session.profile;
    let coins = profile.currency().coins();
    if coins < 0 {
        summary
            .invariant_violations
            .push(format!("step {step}: negative coins {coins}"));
    }

    let energy = profile.energy();
    if energy.current() < 0 || energy.current() > energy.storage_max() {
        summary.invariant_violations.push(format!(
            "step {step}: energy {} outside 0..={}",
            energy.current(),
            energy.storage_max()
        ));
    }

    for (index, &level) in profile.village().levels().iter().enumerate() {
        let max_level = session.catalog.max_level(index);
        if level > max_level {
            summary.invariant_violations.push(format!(
                "step {step}: building {index} at level {level} above max {max_level}"
            ));
        }
    }
}
