use anyhow::{Result, ensure};

use hearthdraw_game::{ConfigLoader, StaticConfigLoader};

use crate::logic::simulation::SESSION_PLAYER_ID;
use crate::logic::{ActionMix, SimulationPlan, SimulationSummary, TestScenario};

pub fn catalog() -> Vec<TestScenario> {
    vec![
        TestScenario {
            key: "smoke",
            name: "Smoke",
            description: "Short mixed session, no invariant may break",
            plan: SimulationPlan::new(60, mixed_mix())
                .with_expectation(no_invariant_violations)
                .with_expectation(snapshots_survive_reload)
                .with_expectation(smoke_expectation),
        },
        TestScenario {
            key: "offline-regen",
            name: "Offline Regeneration",
            description: "An hour away refills energy up to the regen cap",
            plan: SimulationPlan::new(0, ActionMix::default())
                .with_offline_seconds(3_600)
                .with_expectation(offline_regen_expectation),
        },
        TestScenario {
            key: "draw-session",
            name: "Draw Session",
            description: "Draw every step; rewards must match balance changes",
            plan: SimulationPlan::new(400, ActionMix::draws_only())
                .with_expectation(no_invariant_violations)
                .with_expectation(draw_session_expectation),
        },
        TestScenario {
            key: "multiplier-carry",
            name: "Multiplier Carry",
            description: "Pending multipliers are applied to the very next draw",
            plan: SimulationPlan::new(300, ActionMix::draws_only())
                .with_seconds_per_step(120)
                .with_expectation(multiplier_expectation),
        },
        TestScenario {
            key: "village-rush",
            name: "Village Rush",
            description: "Upgrade-heavy session funded by draws and gifts",
            plan: SimulationPlan::new(
                250,
                ActionMix {
                    draw: 3,
                    upgrade: 3,
                    impact: 2,
                    save_reload: 0,
                },
            )
            .with_expectation(no_invariant_violations)
            .with_expectation(village_expectation),
        },
        TestScenario {
            key: "impact-replay",
            name: "Impact Replay",
            description: "Redelivered impacts are applied at most once",
            plan: SimulationPlan::new(
                120,
                ActionMix {
                    impact: 1,
                    ..ActionMix::default()
                },
            )
            .with_expectation(no_invariant_violations)
            .with_expectation(impact_replay_expectation),
        },
        TestScenario {
            key: "snapshot-roundtrip",
            name: "Snapshot Roundtrip",
            description: "Frequent save and reload keeps the profile intact",
            plan: SimulationPlan::new(
                150,
                ActionMix {
                    draw: 2,
                    upgrade: 1,
                    impact: 1,
                    save_reload: 2,
                },
            )
            .with_expectation(snapshots_survive_reload)
            .with_expectation(no_invariant_violations),
        },
    ]
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    catalog().into_iter().find(|scenario| scenario.key == key)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog()
        .into_iter()
        .map(|scenario| (scenario.key, scenario.description))
        .collect()
}

pub fn scenario_keys() -> Vec<String> {
    catalog()
        .into_iter()
        .map(|scenario| scenario.key.to_string())
        .collect()
}

const fn mixed_mix() -> ActionMix {
    ActionMix {
        draw: 4,
        upgrade: 1,
        impact: 1,
        save_reload: 1,
    }
}

fn no_invariant_violations(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.invariant_violations.is_empty(),
        "invariants broken: {}",
        summary.invariant_violations.join("; ")
    );
    Ok(())
}

fn snapshots_survive_reload(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.snapshot_mismatches == 0,
        "{} of {} reloads changed the profile",
        summary.snapshot_mismatches,
        summary.reloads
    );
    Ok(())
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let snapshot = &summary.final_snapshot;
    ensure!(
        snapshot.player_id == SESSION_PLAYER_ID,
        "profile id drifted to '{}'",
        snapshot.player_id
    );
    ensure!(
        summary.draws + summary.refused_draws > 0,
        "no draw was attempted"
    );
    ensure!(
        summary.multiplier_chain_breaks == 0,
        "{} draws ignored the pending multiplier",
        summary.multiplier_chain_breaks
    );
    Ok(())
}

fn offline_regen_expectation(summary: &SimulationSummary) -> Result<()> {
    let snapshot = &summary.final_snapshot;
    ensure!(
        snapshot.current_energy == snapshot.regen_max_energy,
        "energy {} after an hour offline, expected the regen cap {}",
        snapshot.current_energy,
        snapshot.regen_max_energy
    );
    ensure!(
        summary.offline_energy_gained > 0,
        "offline time granted no energy"
    );
    Ok(())
}

fn draw_session_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.draws + summary.refused_draws == summary.steps,
        "{} draws and {} refusals over {} steps",
        summary.draws,
        summary.refused_draws,
        summary.steps
    );
    let counted: u32 = summary.card_counts.values().sum();
    ensure!(
        counted == summary.draws,
        "card counts add up to {counted}, not {}",
        summary.draws
    );

    let deck = StaticConfigLoader.load_deck_config()?.build_deck();
    if let Some(unknown) = summary
        .card_counts
        .keys()
        .find(|id| deck.find(id).is_none())
    {
        anyhow::bail!("drew '{unknown}' which is not in the bundled deck");
    }

    ensure!(
        i64::from(summary.final_snapshot.coins) == summary.coins_from_draws,
        "balance {} differs from {} coins granted by draws",
        summary.final_snapshot.coins,
        summary.coins_from_draws
    );
    let raids = summary.card_counts.get("raid").copied().unwrap_or(0);
    ensure!(
        summary.minigames_launched == raids,
        "{} minigames launched for {raids} raid cards",
        summary.minigames_launched
    );
    Ok(())
}

fn multiplier_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.multiplier_chain_breaks == 0,
        "{} draws ignored the pending multiplier",
        summary.multiplier_chain_breaks
    );
    ensure!(
        summary.multiplied_draws <= summary.draws,
        "more multiplied draws than draws"
    );
    if summary.multiplied_draws > 0 {
        ensure!(
            summary.max_multiplier >= 2,
            "multiplied draws recorded with max multiplier {}",
            summary.max_multiplier
        );
    }
    Ok(())
}

fn village_expectation(summary: &SimulationSummary) -> Result<()> {
    let levels = &summary.final_snapshot.village_levels;
    let catalog = StaticConfigLoader.load_village_config()?.build_catalog()?;
    ensure!(
        levels.len() == catalog.building_count(),
        "village has {} buildings, catalog has {}",
        levels.len(),
        catalog.building_count()
    );
    let total: u32 = levels.iter().sum();
    ensure!(
        total == summary.upgrades,
        "levels sum to {total} after {} upgrades",
        summary.upgrades
    );
    ensure!(
        summary.final_snapshot.coins >= 0,
        "negative balance after upgrades"
    );
    Ok(())
}

fn impact_replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let applied = summary.impacts_applied + summary.impacts_partial;
    let snapshot = &summary.final_snapshot;
    ensure!(
        summary.impacts_seen() == summary.steps,
        "{} outcomes for {} deliveries",
        summary.impacts_seen(),
        summary.steps
    );
    ensure!(
        summary.impacts_duplicate > 0,
        "no redelivered impact was observed"
    );
    ensure!(
        snapshot.processed_impact_ids.len() == usize::try_from(applied)?,
        "{} processed ids for {applied} applied impacts",
        snapshot.processed_impact_ids.len()
    );
    ensure!(
        snapshot.revision == u64::from(applied),
        "revision {} after {applied} applied impacts",
        snapshot.revision
    );
    Ok(())
}
