use crate::coupling::CouplingModel;
use crate::random::RandomStream;
use crate::spins::SpinLattice;

/// Mutable state of one annealing run.
///
/// Owns the spin board, the random stream and the per-sweep random buffer.
/// The coupling model and configuration stay outside and are only borrowed.
/// The board is filled from the same stream that later feeds the sweeps, so a
/// fixed seed fixes the whole trajectory.
///
/// Only the sweep loop writes the board and the draw buffer; callers get
/// read-only views.
///
/// ```compile_fail
/// use anneal_sim::{CouplingModel, Realization};
///
/// let model = CouplingModel::ring(8, 1.0).unwrap();
/// let mut real = Realization::new(&model, 4, Some(1));
/// real.draws.truncate(3);
/// ```
///
/// ```compile_fail
/// use anneal_sim::{CouplingModel, Realization, SpinLattice};
///
/// let model = CouplingModel::ring(8, 1.0).unwrap();
/// let mut real = Realization::new(&model, 4, Some(1));
/// real.spins = SpinLattice::from_spins(2, 1, vec![1, -1]).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Realization {
    /// `n_sites × n_replicas` spins.
    spins: SpinLattice,
    /// One uniform draw per cell, regenerated before every sweep.
    draws: Vec<f64>,
    /// Sweeps completed since construction or the last reset.
    sweeps_done: usize,
    stream: RandomStream,
    seed: Option<u64>,
    scratch: Vec<i8>,
}

impl Realization {
    /// Random ±1 board for `model` with `n_replicas` replicas.
    pub fn new(model: &CouplingModel, n_replicas: usize, seed: Option<u64>) -> Self {
        let n_sites = model.n_sites();
        let mut stream = RandomStream::new(seed);
        let spins = SpinLattice::random(n_sites, n_replicas, &mut stream);
        Self {
            spins,
            draws: vec![0.0; n_sites * n_replicas],
            sweeps_done: 0,
            stream,
            seed,
            scratch: Vec::with_capacity(n_sites * n_replicas),
        }
    }

    /// Re-seed the stream, refill the board and rewind the sweep counter.
    pub fn reset(&mut self, seed: Option<u64>) {
        self.seed = seed;
        self.stream.reset(seed);
        self.spins.randomize(&mut self.stream);
        self.sweeps_done = 0;
    }

    pub fn spins(&self) -> &SpinLattice {
        &self.spins
    }

    pub fn draws(&self) -> &[f64] {
        &self.draws
    }

    pub fn sweeps_done(&self) -> usize {
        self.sweeps_done
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn refill_draws(&mut self) {
        self.stream.refill(&mut self.draws);
    }

    pub(crate) fn finish_sweep(&mut self, sweep: usize) {
        self.sweeps_done = sweep;
    }

    /// Split borrow for the kernel: board, draws and scratch buffer.
    pub(crate) fn kernel_buffers(&mut self) -> (&mut SpinLattice, &[f64], &mut Vec<i8>) {
        (&mut self.spins, &self.draws, &mut self.scratch)
    }
}
