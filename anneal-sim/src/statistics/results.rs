use super::stats::Statistics;
use crate::spins::Solution;

/// One entry of the energy log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyRecord {
    /// Sweeps completed when the energy was taken (0 = initial board).
    pub sweep: usize,
    /// Total Suzuki–Trotter energy at that sweep's Trotter coupling.
    pub energy: f64,
}

/// Result of one annealing run.
#[derive(Debug, Clone)]
pub struct AnnealOutcome {
    /// Majority-vote decision per site.
    pub solution: Solution,
    /// Classical energy of `solution` alone.
    pub solution_energy: f64,
    /// Total board energy after the last sweep.
    pub final_energy: f64,
    /// Monitored energies in sweep order.
    pub energy_log: Vec<EnergyRecord>,
    /// Total sweeps completed by the realization.
    pub sweeps: usize,
}

/// Aggregate over independently seeded runs of the same problem.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub n_runs: usize,
    /// Index of the run with the lowest `solution_energy` (first on ties).
    pub best_index: usize,
    pub best_energy: f64,
    /// ⟨E⟩ of `solution_energy` over runs.
    pub mean_energy: f64,
    /// √(⟨E²⟩ − ⟨E⟩²).
    pub std_energy: f64,
    /// Runs whose solution energy equals the best (within 1e-9).
    pub n_best: usize,
}

impl BatchSummary {
    /// `None` for an empty batch.
    pub fn aggregate(outcomes: &[AnnealOutcome]) -> Option<Self> {
        let first = outcomes.first()?;
        let mut e_stat = Statistics::new(1);
        let mut e2_stat = Statistics::new(2);
        let mut best_index = 0;
        let mut best_energy = first.solution_energy;

        for (idx, o) in outcomes.iter().enumerate() {
            e_stat.update(o.solution_energy);
            e2_stat.update(o.solution_energy);
            if o.solution_energy < best_energy {
                best_energy = o.solution_energy;
                best_index = idx;
            }
        }

        let mean = e_stat.average();
        let n_best = outcomes
            .iter()
            .filter(|o| (o.solution_energy - best_energy).abs() < 1e-9)
            .count();

        Some(Self {
            n_runs: outcomes.len(),
            best_index,
            best_energy,
            mean_energy: mean,
            std_energy: (e2_stat.average() - mean * mean).max(0.0).sqrt(),
            n_best,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spins::{extract, SpinLattice};

    fn outcome(solution_energy: f64) -> AnnealOutcome {
        let lat = SpinLattice::from_spins(1, 1, vec![1]).unwrap();
        AnnealOutcome {
            solution: extract(&lat),
            solution_energy,
            final_energy: solution_energy,
            energy_log: vec![],
            sweeps: 1,
        }
    }

    #[test]
    fn test_aggregate() {
        let runs = [outcome(-1.0), outcome(-3.0), outcome(-2.0), outcome(-3.0)];
        let s = BatchSummary::aggregate(&runs).unwrap();
        assert_eq!(s.n_runs, 4);
        assert_eq!(s.best_index, 1);
        assert_eq!(s.best_energy, -3.0);
        assert_eq!(s.n_best, 2);
        assert!((s.mean_energy + 2.25).abs() < 1e-12);
        // ⟨E²⟩ = (1 + 9 + 4 + 9) / 4 = 5.75
        assert!((s.std_energy - (5.75f64 - 2.25 * 2.25).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(BatchSummary::aggregate(&[]).is_none());
    }
}
