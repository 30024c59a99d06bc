//! Scenario and Monte Carlo configuration.
//!
//! [`Scenario`] bundles the five configuration records a run needs.
//! [`MonteCarloConfig`] controls batch size, parameter variation, joint-set
//! combination selection and the worker pool.

use cavefrag_core::run::DEFAULT_SEED;
use cavefrag_core::{CaveFace, ConfigError, Defaults, JointSet, RockMass, SecondaryRun};

use crate::error::MonteCarloError;

// ── Scenario ───────────────────────────────────────────────────────

/// Complete input for one pipeline run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scenario {
    /// Rock mass.
    pub rock: RockMass,
    /// Every defined joint set, in definition order.
    pub joint_sets: Vec<JointSet>,
    /// Cave face.
    pub cave: CaveFace,
    /// Engine defaults (seed, arching).
    pub defaults: Defaults,
    /// Draw parameters.
    pub secondary: SecondaryRun,
}

impl Scenario {
    /// Validate every record. Joint-set count is checked by the caller,
    /// since the stress-fracture set may complete it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rock.validate()?;
        for js in &self.joint_sets {
            js.validate()?;
        }
        self.cave.validate()?;
        self.defaults.validate()?;
        self.secondary.validate()?;
        Ok(())
    }
}

// ── CombinationMode ────────────────────────────────────────────────

/// Which joint-set triples a Monte Carlo batch runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CombinationMode {
    /// A single triple.
    Selected([usize; 3]),
    /// An explicit list of triples, run in list order.
    Explicit(Vec<[usize; 3]>),
    /// Every 3-subset of the defined sets, in lexicographic order.
    All,
}

impl Default for CombinationMode {
    fn default() -> Self {
        Self::Selected([0, 1, 2])
    }
}

// ── MonteCarloConfig ───────────────────────────────────────────────

/// Configuration for [`run_monte_carlo`](crate::montecarlo::run_monte_carlo).
#[derive(Clone, Debug, PartialEq)]
pub struct MonteCarloConfig {
    /// Runs per combination. Default: 10.
    pub runs: usize,
    /// Primary blocks generated per run. Default: 5000.
    pub blocks_per_run: usize,
    /// Symmetric relative perturbation applied to every randomized
    /// parameter, in percent. Default: 15.
    pub variation_pct: f64,
    /// Joint-set combinations to run.
    pub combinations: CombinationMode,
    /// Seed of the generator that draws per-task seeds. Default: 1234.
    pub master_seed: u64,
    /// Number of worker threads. `None` = `available_parallelism`.
    pub worker_count: Option<usize>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            runs: 10,
            blocks_per_run: 5000,
            variation_pct: 15.0,
            combinations: CombinationMode::default(),
            master_seed: DEFAULT_SEED,
            worker_count: None,
        }
    }
}

impl MonteCarloConfig {
    /// Check batch size and variation.
    pub fn validate(&self) -> Result<(), MonteCarloError> {
        if self.runs == 0 || self.blocks_per_run == 0 {
            return Err(MonteCarloError::EmptyBatch {
                runs: self.runs,
                blocks_per_run: self.blocks_per_run,
            });
        }
        if !self.variation_pct.is_finite() || self.variation_pct < 0.0 {
            return Err(MonteCarloError::InvalidVariation {
                value: self.variation_pct,
            });
        }
        Ok(())
    }

    /// Resolve the worker count for `task_count` tasks.
    ///
    /// Explicit values are clamped to `[1, 64]`; auto-detection falls
    /// back to 4 when parallelism is unknown. Never more workers than
    /// tasks, never fewer than one.
    pub fn resolved_worker_count(&self, task_count: usize) -> usize {
        let workers = match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        };
        workers.min(task_count).max(1)
    }
}
