//! Monte Carlo batches over randomized scenarios.
//!
//! Each task is one (combination, run) pair with its own seed. A task
//! perturbs the whole scenario, keeps the three joint sets of its
//! combination, and runs primary generation plus secondary
//! fragmentation. Tasks share nothing; results are reduced per
//! combination label into cumulative-mass envelopes and average-volume
//! summaries, in task order regardless of which worker finished first.

use cavefrag_core::{ConfigError, JointSet, SETS_PER_BLOCK};
use cavefrag_stats::{
    cumulative_mass_envelope, distributions_from_blocks, AverageVolumeSummary, BlockStats,
    Envelope,
};
use indexmap::{IndexMap, IndexSet};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::{CombinationMode, MonteCarloConfig, Scenario};
use crate::error::{MonteCarloError, TaskError};
use crate::pool;
use crate::primary::generate_primary_blocks;
use crate::randomize::{randomize_scenario, MAX_RUN_SEED};
use crate::secondary::{average_scatter_deg, run_secondary};

/// A joint-set triple, as indexes into [`Scenario::joint_sets`].
pub type Combination = [usize; SETS_PER_BLOCK];

/// Every 3-subset of `0..defined`, in lexicographic order.
pub fn all_combinations(defined: usize) -> Vec<Combination> {
    let mut out = Vec::new();
    for i in 0..defined {
        for j in i + 1..defined {
            for k in j + 1..defined {
                out.push([i, j, k]);
            }
        }
    }
    out
}

/// Expand `mode` into the combinations to run.
///
/// Out-of-range or repeated-index triples are dropped with a warning and
/// duplicates are removed, keeping first occurrence. Fails if fewer than
/// three sets are defined or nothing valid remains.
pub fn resolve_combinations(
    mode: &CombinationMode,
    defined: usize,
) -> Result<Vec<Combination>, ConfigError> {
    if defined < SETS_PER_BLOCK {
        return Err(ConfigError::InsufficientJointSets {
            available: defined,
            required: SETS_PER_BLOCK,
        });
    }
    let requested = match mode {
        CombinationMode::Selected(c) => vec![*c],
        CombinationMode::Explicit(list) => list.clone(),
        CombinationMode::All => all_combinations(defined),
    };

    let mut kept = IndexSet::new();
    for combo in requested {
        let distinct = combo[0] != combo[1] && combo[1] != combo[2] && combo[0] != combo[2];
        if distinct && combo.iter().all(|&i| i < defined) {
            kept.insert(combo);
        } else {
            let err = ConfigError::InvalidCombination {
                indexes: combo,
                defined,
            };
            tracing::warn!(%err, "dropping joint-set combination");
        }
    }
    if kept.is_empty() {
        return Err(ConfigError::NoCombinations);
    }
    Ok(kept.into_iter().collect())
}

/// `"name_i + name_j + name_k"`; unnamed sets render as `Set{index+1}`.
pub fn combination_label(joints: &[JointSet], combo: &Combination) -> String {
    combo
        .iter()
        .map(|&i| match joints.get(i) {
            Some(js) if !js.name.is_empty() => js.name.clone(),
            _ => format!("Set{}", i + 1),
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Binned distributions of one completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunStats {
    /// Primary block distribution.
    pub primary: BlockStats,
    /// Secondary block distribution.
    pub secondary: BlockStats,
}

/// Run one randomized task.
///
/// The scenario is perturbed from a `ChaCha8Rng` seeded with `seed`; the
/// perturbed defaults carry the seed used by generation and draw.
pub fn run_single(
    base: &Scenario,
    combo: &Combination,
    seed: u64,
    blocks: usize,
    variation_pct: f64,
) -> Result<RunStats, ConfigError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let scenario = randomize_scenario(&mut rng, base, variation_pct);
    let joints: Vec<JointSet> = combo
        .iter()
        .filter_map(|&i| scenario.joint_sets.get(i).cloned())
        .collect();
    if joints.len() < SETS_PER_BLOCK {
        return Err(ConfigError::InsufficientJointSets {
            available: joints.len(),
            required: SETS_PER_BLOCK,
        });
    }

    let primary = generate_primary_blocks(
        blocks,
        &scenario.rock,
        &joints,
        &scenario.cave,
        scenario.defaults.resolved_seed(),
    )?;
    let outcome = run_secondary(
        &primary,
        &scenario.rock,
        &scenario.secondary,
        &scenario.defaults,
        average_scatter_deg(&joints),
        scenario.cave.primary_fines_ratio(),
    );
    Ok(RunStats {
        primary: distributions_from_blocks(&primary),
        secondary: distributions_from_blocks(&outcome.blocks),
    })
}

/// Reduced results for one combination label.
#[derive(Clone, Debug, PartialEq)]
pub struct CombinationSummary {
    /// The joint-set triple.
    pub indexes: Combination,
    /// Runs that completed.
    pub runs_completed: usize,
    /// Primary cumulative-mass envelope; `None` if no run completed.
    pub primary: Option<Envelope>,
    /// Secondary cumulative-mass envelope; `None` if no run completed.
    pub secondary: Option<Envelope>,
    /// Spread of per-run primary average volume.
    pub primary_avg_volume: AverageVolumeSummary,
    /// Spread of per-run secondary average volume.
    pub secondary_avg_volume: AverageVolumeSummary,
}

/// A task that produced no result.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskFailure {
    /// Combination label of the task.
    pub label: String,
    /// Run number within the combination.
    pub run: usize,
    /// Task seed, enough to reproduce the failure with [`run_single`].
    pub seed: u64,
    /// What went wrong.
    pub error: TaskError,
}

/// Outcome of [`run_monte_carlo`].
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloReport {
    /// Per-label summaries, in combination order.
    pub combinations: IndexMap<String, CombinationSummary>,
    /// Per-run primary average volume across every label.
    pub primary_avg_volume: AverageVolumeSummary,
    /// Per-run secondary average volume across every label.
    pub secondary_avg_volume: AverageVolumeSummary,
    /// Tasks dispatched.
    pub total_runs: usize,
    /// Failed tasks, in task order.
    pub failures: Vec<TaskFailure>,
}

#[derive(Clone, Copy, Debug)]
struct McTask {
    combo: usize,
    run: usize,
    seed: u64,
}

#[derive(Default)]
struct Accumulator {
    primary: Vec<BlockStats>,
    secondary: Vec<BlockStats>,
}

/// Run a Monte Carlo batch.
///
/// Configuration problems are reported before any task is dispatched.
/// Individual task failures are collected in
/// [`MonteCarloReport::failures`] and never affect other tasks.
pub fn run_monte_carlo(
    base: &Scenario,
    config: &MonteCarloConfig,
) -> Result<MonteCarloReport, MonteCarloError> {
    config.validate()?;
    base.validate()?;
    let combos = resolve_combinations(&config.combinations, base.joint_sets.len())?;
    let labels: Vec<String> = combos
        .iter()
        .map(|c| combination_label(&base.joint_sets, c))
        .collect();

    let mut master = ChaCha8Rng::seed_from_u64(config.master_seed);
    let mut tasks = Vec::with_capacity(combos.len() * config.runs);
    for combo in 0..combos.len() {
        for run in 0..config.runs {
            tasks.push(McTask {
                combo,
                run,
                seed: master.random_range(0..=MAX_RUN_SEED),
            });
        }
    }

    let workers = config.resolved_worker_count(tasks.len());
    let _span = tracing::info_span!(
        "monte_carlo",
        combinations = combos.len(),
        tasks = tasks.len(),
        workers
    )
    .entered();
    tracing::info!("dispatching Monte Carlo tasks");

    let outcomes = pool::execute(tasks.clone(), workers, |task: McTask| {
        run_single(
            base,
            &combos[task.combo],
            task.seed,
            config.blocks_per_run,
            config.variation_pct,
        )
        .map_err(TaskError::from)
    });

    let mut per_combo: Vec<Accumulator> = (0..combos.len())
        .map(|_| Accumulator::default())
        .collect();
    let mut failures = Vec::new();
    for (task, outcome) in tasks.iter().zip(outcomes) {
        match outcome {
            Ok(stats) => {
                per_combo[task.combo].primary.push(stats.primary);
                per_combo[task.combo].secondary.push(stats.secondary);
            }
            Err(error) => {
                tracing::warn!(
                    label = %labels[task.combo],
                    run = task.run,
                    seed = task.seed,
                    %error,
                    "Monte Carlo task failed"
                );
                failures.push(TaskFailure {
                    label: labels[task.combo].clone(),
                    run: task.run,
                    seed: task.seed,
                    error,
                });
            }
        }
    }

    let report = reduce(&combos, labels, per_combo, tasks.len(), failures);
    tracing::info!(
        failures = report.failures.len(),
        "Monte Carlo reduction finished"
    );
    Ok(report)
}

fn reduce(
    combos: &[Combination],
    labels: Vec<String>,
    per_combo: Vec<Accumulator>,
    total_runs: usize,
    failures: Vec<TaskFailure>,
) -> MonteCarloReport {
    let mut all_primary = Vec::new();
    let mut all_secondary = Vec::new();
    let mut by_label: IndexMap<String, (Combination, Accumulator)> = IndexMap::new();
    for ((label, combo), acc) in labels.into_iter().zip(combos).zip(per_combo) {
        let entry = by_label
            .entry(label)
            .or_insert_with(|| (*combo, Accumulator::default()));
        entry.1.primary.extend(acc.primary);
        entry.1.secondary.extend(acc.secondary);
    }

    let mut combinations = IndexMap::with_capacity(by_label.len());
    for (label, (indexes, acc)) in by_label {
        let primary_avgs: Vec<f64> = acc.primary.iter().map(|s| s.avg_volume).collect();
        let secondary_avgs: Vec<f64> = acc.secondary.iter().map(|s| s.avg_volume).collect();
        all_primary.extend_from_slice(&primary_avgs);
        all_secondary.extend_from_slice(&secondary_avgs);
        combinations.insert(
            label,
            CombinationSummary {
                indexes,
                runs_completed: acc.primary.len(),
                primary: cumulative_mass_envelope(&acc.primary),
                secondary: cumulative_mass_envelope(&acc.secondary),
                primary_avg_volume: AverageVolumeSummary::from_values(&primary_avgs),
                secondary_avg_volume: AverageVolumeSummary::from_values(&secondary_avgs),
            },
        );
    }

    MonteCarloReport {
        combinations,
        primary_avg_volume: AverageVolumeSummary::from_values(&all_primary),
        secondary_avg_volume: AverageVolumeSummary::from_values(&all_secondary),
        total_runs,
        failures,
    }
}
