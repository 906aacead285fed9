//! Suzuki-Trotter quantum annealing for Ising and QUBO problems.
//!
//! [`QuantumAnnealer`] ties a coupling model, a run configuration and one
//! [`Realization`] together and drives the checkerboard sweep loop of
//! [`anneal_sim`] with a terminal progress bar.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

pub use anneal_sim::{
    anneal, run_batch, AnnealConfig, AnnealError, AnnealOutcome, AnnealResult, BatchSummary,
    BoardLayout, CoolingLaw, CouplingModel, EnergyRecord, Qubo, Realization, Schedule, Solution,
    SpinLattice, UpdateRule,
};

use anneal_sim::simulation::run_sweep_loop;
use anneal_sim::spins::{energy, extract, render};

/// One annealing problem with its board, ready to be solved and inspected.
///
/// Owns the coupling model, the validated configuration and a single
/// [`Realization`]. Successive `solve_for` calls continue from the current
/// board; [`reset`](Self::reset) starts over.
pub struct QuantumAnnealer {
    model: CouplingModel,
    config: AnnealConfig,
    realization: Realization,
    progress: bool,
    /// Energy records of the most recent solve.
    energy_log: Vec<EnergyRecord>,
}

impl QuantumAnnealer {
    /// Annealer for `model` with a random board seeded from `config.seed`.
    pub fn new(model: CouplingModel, config: AnnealConfig) -> AnnealResult<Self> {
        config.check()?;
        let realization = Realization::new(&model, config.n_replicas, config.seed);
        Ok(Self {
            model,
            config,
            realization,
            progress: true,
            energy_log: Vec::new(),
        })
    }

    /// Annealer for the Ising form of `qubo`.
    pub fn from_qubo(qubo: &Qubo, config: AnnealConfig) -> AnnealResult<Self> {
        Self::new(CouplingModel::from_qubo(qubo), config)
    }

    /// Show or hide the progress bar (shown by default).
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn model(&self) -> &CouplingModel {
        &self.model
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    pub fn realization(&self) -> &Realization {
        &self.realization
    }

    /// Run the configured `n_iterations` sweeps.
    pub fn solve(&mut self) -> AnnealResult<AnnealOutcome> {
        self.solve_for(self.config.n_iterations)
    }

    /// Run `n_sweeps` sweeps from the current board.
    ///
    /// Sweep numbering continues from earlier calls; once past `n_iterations`
    /// the schedule holds its end values. The energy log of the call replaces
    /// the cached one.
    pub fn solve_for(&mut self, n_sweeps: usize) -> AnnealResult<AnnealOutcome> {
        let pb = if self.progress {
            ProgressBar::new(n_sweeps as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        ) {
            pb.set_style(style.progress_chars("=> "));
        }
        pb.set_message("sweeps");

        let outcome = run_sweep_loop(
            &self.model,
            &mut self.realization,
            &self.config,
            n_sweeps,
            &|_| pb.inc(1),
        );
        pb.finish();

        let outcome = outcome?;
        self.energy_log = outcome.energy_log.clone();
        Ok(outcome)
    }

    /// Text dump of the current board.
    pub fn board(&self, layout: BoardLayout) -> String {
        render(self.realization.spins(), layout)
    }

    /// Majority-vote decision of the current board.
    pub fn solution(&self) -> Solution {
        extract(self.realization.spins())
    }

    /// Current decision in the 0/1 encoding (+1 → 1, -1 → 0).
    pub fn binary_solution(&self) -> Vec<u8> {
        self.solution().to_binary()
    }

    /// Total board energy at the Trotter coupling of the last completed sweep.
    pub fn energy(&self) -> f64 {
        let jt = self
            .config
            .schedule
            .at(self.realization.sweeps_done(), self.config.n_iterations)
            .jt;
        energy(self.realization.spins(), &self.model, jt)
    }

    /// Energy records of the most recent `solve`/`solve_for` call.
    pub fn energy_log(&self) -> &[EnergyRecord] {
        &self.energy_log
    }

    /// Re-seed and refill the board; `None` keeps the configured seed.
    pub fn reset(&mut self, seed: Option<u64>) {
        let seed = seed.or(self.config.seed);
        info!(?seed, "reset");
        self.realization.reset(seed);
        self.energy_log.clear();
    }
}
