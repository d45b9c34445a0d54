use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use super::simulation::{SimulationPlan, SimulationSummary, run_plan};

/// Named plan the CLI can run.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub plan: SimulationPlan,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "millis")]
    pub average_duration: Duration,
    #[serde(with = "millis::list")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing scenario: {} (steps: {} seed: {})",
                    scenario.name.bright_white(),
                    scenario.plan.steps,
                    seed
                );
            }

            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let verdict = run_plan(&scenario.plan, iteration_seed).map_err(|err| format!("{err:#}"));
            let verdict = verdict.and_then(|summary| {
                match evaluate_expectations(&scenario.plan, &summary) {
                    Some(err) => Err(format!("{err} | {}", describe(&summary))),
                    None => Ok(summary),
                }
            });

            match verdict {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) {}",
                            i + 1,
                            iterations,
                            describe(&summary)
                        );
                    }
                }
                Err(err) => {
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.clone().red()
                        );
                    }
                    failures.push(format!("Iteration {} (seed {iteration_seed}): {err}", i + 1));
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| err.to_string())
}

fn describe(summary: &SimulationSummary) -> String {
    let snapshot = &summary.final_snapshot;
    format!(
        "draws {} refused {} upgrades {} impacts {} reloads {} | coins {} energy {} levels {:?}",
        summary.draws,
        summary.refused_draws,
        summary.upgrades,
        summary.impacts_seen(),
        summary.reloads,
        snapshot.coins,
        snapshot.current_energy,
        snapshot.village_levels
    )
}

/// Durations travel as whole milliseconds.
mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    fn to_millis(duration: Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(to_millis(*duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub mod list {
        use serde::{Deserialize, Deserializer, Serializer};
        use std::time::Duration;

        pub fn serialize<S: Serializer>(
            durations: &[Duration],
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(durations.iter().map(|d| super::to_millis(*d)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Vec<Duration>, D::Error> {
            let millis = Vec::<u64>::deserialize(deserializer)?;
            Ok(millis.into_iter().map(Duration::from_millis).collect())
        }
    }
}
