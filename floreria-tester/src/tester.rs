use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::scenarios::Scenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct ScenarioRunner {
    verbose: bool,
}

impl ScenarioRunner {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// One result per seed; each iteration derives its own seed from it.
    pub fn run(&self, scenario: &Scenario, seeds: &[u64], iterations: usize) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (seed: {seed})",
                        scenario.name.bright_white()
                    );
                }
                self.run_seed(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_seed(&self, scenario: &Scenario, seed: u64, iterations: usize) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::with_capacity(iterations);

        for i in 0..iterations {
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let start = Instant::now();
            match (scenario.run)(iteration_seed) {
                Ok(()) => {
                    successes += 1;
                    let duration = start.elapsed();
                    durations.push(duration);
                    if self.verbose {
                        println!("  ✅ Iteration {}/{iterations} passed ({duration:?})", i + 1);
                    }
                }
                Err(err) => {
                    log::debug!("{} seed {iteration_seed} failed: {err:#}", scenario.name);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{iterations} failed: {}",
                            i + 1,
                            format!("{err:#}").red()
                        );
                    }
                    failures.push(format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1));
                }
            }
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
        }
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX)))
    }
}
