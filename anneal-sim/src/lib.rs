pub mod config;
pub mod coupling;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod parallel;
pub mod random;
pub mod schedule;
pub mod simulation;
pub mod spins;
pub mod statistics;

pub use config::{AnnealConfig, CoolingLaw, UpdateRule};
pub use coupling::{CouplingModel, Qubo};
pub use error::{AnnealError, AnnealResult};
pub use geometry::Lattice;
pub use schedule::{Schedule, SweepParams};
pub use simulation::{anneal, run_batch, run_sweep_loop, Realization};
pub use spins::{BoardLayout, Solution, SpinLattice};
pub use statistics::{AnnealOutcome, BatchSummary, EnergyRecord};
