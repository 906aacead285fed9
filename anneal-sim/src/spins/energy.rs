use crate::coupling::CouplingModel;
use crate::spins::SpinLattice;

/// Total Suzuki–Trotter energy of the board.
///
/// Sum over replicas of the classical energy of each replica slice, plus the
/// inter-replica term `-jt Σ_t Σ_i s[i][t] s[i][t+1 mod M]`. Accumulated in
/// `f64`. Read-only.
pub fn energy(lattice: &SpinLattice, model: &CouplingModel, jt: f64) -> f64 {
    classical_energies(lattice, model).iter().sum::<f64>() - jt * trotter_overlap(lattice) as f64
}

/// Classical energy of each replica slice, length `n_replicas`.
pub fn classical_energies(lattice: &SpinLattice, model: &CouplingModel) -> Vec<f64> {
    debug_assert_eq!(lattice.n_sites(), model.n_sites());
    (0..lattice.n_replicas())
        .map(|t| model.slice_energy(|i| lattice.get(i, t)))
        .collect()
}

/// `Σ_t Σ_i s[i][t] s[i][t+1 mod M]`: agreement between adjacent replicas.
///
/// With a single replica each spin pairs with itself.
pub fn trotter_overlap(lattice: &SpinLattice) -> i64 {
    let m = lattice.n_replicas();
    let mut total = 0i64;
    for i in 0..lattice.n_sites() {
        let column = lattice.site(i);
        for t in 0..m {
            total += column[t] as i64 * column[(t + 1) % m] as i64;
        }
    }
    total
}
