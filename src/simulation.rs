use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::debug;
use crate::error::MetricResult;
use crate::member::Member;
use crate::metrics::score_group;
use crate::stats::Summary;

pub const DEFAULT_TRIALS:     usize = 1024;
pub const DEFAULT_GROUP_SIZE: usize = 4;

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub trials: usize,
    pub group_size: usize,
    pub seed: u64,
    /// Run trials on the rayon pool. Results are identical to a sequential run.
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials:     DEFAULT_TRIALS,
            group_size: DEFAULT_GROUP_SIZE,
            seed:       entropy_seed(),
            parallel:   false,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.trials == 0 {
            return Err("number of simulations must be positive".to_string());
        }
        if self.group_size == 0 {
            return Err("students per group must be positive".to_string());
        }
        Ok(())
    }
}

/// Draws a fresh seed from the thread-local OS-seeded generator.
pub fn entropy_seed() -> u64 {
    rand::rng().random()
}

/// Generates one group's shares by rejection sampling.
///
/// Each of the first `group_size - 1` shares is drawn from `U[0, 1)` and
/// redrawn until it fits under the remaining budget; the last share takes the
/// remainder, so the shares sum to 1. This is not uniform over the simplex:
/// early members tend to draw larger shares, and acceptance gets rarer as the
/// group grows.
pub fn generate_shares<R: Rng + ?Sized>(rng: &mut R, group_size: usize) -> Vec<f64> {
    let mut shares = Vec::with_capacity(group_size.max(1));
    let mut sum = 0.0;

    for _ in 0..group_size.saturating_sub(1) {
        let next = loop {
            let v: f64 = rng.random();
            if v + sum < 1.0 { break v; }
        };
        sum += next;
        shares.push(next);
    }

    shares.push(1.0 - sum);
    shares
}

/// Runs one trial and returns `|blame|` for every member of the generated group.
pub fn run_trial<R: Rng + ?Sized>(rng: &mut R, group_size: usize) -> MetricResult<Vec<f64>> {
    let group = generate_shares(rng, group_size)
        .into_iter()
        .map(|share| Member::default().with_share(share))
        .collect::<MetricResult<Vec<Member>>>()?;

    Ok(score_group(&group).into_iter().map(|s| s.blame.abs()).collect())
}

/// Independent, reproducible generator for one trial: the run's seed, on a
/// stream numbered by the trial.
fn trial_rng(seed: u64, trial: usize) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial as u64);
    rng
}

/// Runs every trial and reduces the per-trial summaries into one.
///
/// Each trial folds its magnitudes into its own [`Summary`]; those are merged
/// in trial order (after an order-preserving collect when running in
/// parallel), so the statistics do not depend on scheduling. `on_trial` is
/// called once per finished trial.
pub fn run_simulation(
    config:   &SimulationConfig,
    on_trial: &(dyn Fn() + Sync),
) -> Result<Summary, String> {
    config.validate()?;
    debug!(
        trials = config.trials,
        group_size = config.group_size,
        seed = config.seed,
        parallel = config.parallel,
        "starting simulation"
    );

    let run = |trial: usize| -> MetricResult<Summary> {
        let mut rng = trial_rng(config.seed, trial);
        let summary = run_trial(&mut rng, config.group_size)?.into_iter().collect();
        on_trial();
        Ok(summary)
    };

    let total = if config.parallel {
        let per_trial: MetricResult<Vec<Summary>> = (0..config.trials).into_par_iter().map(run).collect();
        per_trial.map(|summaries| summaries.into_iter().fold(Summary::default(), Summary::merge))
    } else {
        (0..config.trials).map(run).try_fold(Summary::default(), |acc, s| s.map(|s| acc.merge(s)))
    };

    total.map_err(|e| format!("Simulation failed: {e}"))
}
