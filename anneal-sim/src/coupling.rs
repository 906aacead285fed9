//! Coupling models and the QUBO → Ising transform.
//!
//! Energies follow the ferromagnetic sign convention
//! `E(s) = -Σ_i h_i s_i - Σ_{i<j} J_ij s_i s_j`, so a positive coupling
//! favours aligned spins and a positive bias favours `+1`.

use crate::error::{AnnealError, AnnealResult};
use crate::geometry::Lattice;

const SYMMETRY_TOL: f64 = 1e-9;

/// Pairwise interaction structure over `n_sites` sites.
#[derive(Debug, Clone, PartialEq)]
pub enum CouplingModel {
    /// Uniform periodic chain.
    Ring1D { lattice: Lattice, j_spin: f64 },
    /// Uniform periodic `nx × ny` torus.
    Grid2D { lattice: Lattice, j_spin: f64 },
    /// Symmetric `n × n` matrix (row-major, zero diagonal) plus per-site bias.
    Dense {
        n: usize,
        j: Vec<f64>,
        h: Vec<f64>,
    },
}

impl CouplingModel {
    pub fn ring(n_sites: usize, j_spin: f64) -> AnnealResult<Self> {
        if n_sites == 0 {
            return Err(AnnealError::NoSites);
        }
        if !j_spin.is_finite() {
            return Err(AnnealError::NonFinite(0));
        }
        Ok(Self::Ring1D {
            lattice: Lattice::ring(n_sites),
            j_spin,
        })
    }

    pub fn grid(nx: usize, ny: usize, j_spin: f64) -> AnnealResult<Self> {
        if nx == 0 || ny == 0 {
            return Err(AnnealError::GridShape { nx, ny });
        }
        if !j_spin.is_finite() {
            return Err(AnnealError::NonFinite(0));
        }
        Ok(Self::Grid2D {
            lattice: Lattice::torus(nx, ny),
            j_spin,
        })
    }

    /// Grid over a known site count; fails unless `nx * ny == n_sites`.
    pub fn grid_with_sites(n_sites: usize, nx: usize, ny: usize, j_spin: f64) -> AnnealResult<Self> {
        if nx * ny != n_sites {
            return Err(AnnealError::GridShape { nx, ny });
        }
        Self::grid(nx, ny, j_spin)
    }

    /// Dense model from a row-major `n × n` matrix and an optional bias vector.
    ///
    /// The matrix must be symmetric with a zero diagonal.
    pub fn dense(n: usize, j: Vec<f64>, bias: Option<Vec<f64>>) -> AnnealResult<Self> {
        if n == 0 {
            return Err(AnnealError::NoSites);
        }
        if j.len() != n * n {
            return Err(AnnealError::MatrixShape { len: j.len(), n });
        }
        let h = bias.unwrap_or_else(|| vec![0.0; n]);
        if h.len() != n {
            return Err(AnnealError::BiasLength { len: h.len(), n });
        }
        check_finite(&j)?;
        check_finite(&h)?;
        for i in 0..n {
            let d = j[i * n + i];
            if d != 0.0 {
                return Err(AnnealError::NonZeroDiagonal { site: i, value: d });
            }
        }
        check_symmetric(&j, n)?;
        Ok(Self::Dense { n, j, h })
    }

    /// Dense Ising model equivalent to `qubo` up to a constant offset.
    pub fn from_qubo(qubo: &Qubo) -> Self {
        let (j, h) = qubo.to_ising();
        Self::Dense { n: qubo.n, j, h }
    }

    pub fn n_sites(&self) -> usize {
        match self {
            Self::Ring1D { lattice, .. } | Self::Grid2D { lattice, .. } => lattice.n_sites,
            Self::Dense { n, .. } => *n,
        }
    }

    /// Short topology label for logs.
    pub fn topology(&self) -> &'static str {
        match self {
            Self::Ring1D { .. } => "ring",
            Self::Grid2D { .. } => "grid",
            Self::Dense { .. } => "dense",
        }
    }

    /// Per-site bias; zero for the uniform topologies.
    #[inline]
    pub fn bias(&self, i: usize) -> f64 {
        match self {
            Self::Dense { h, .. } => h[i],
            _ => 0.0,
        }
    }

    /// Row `i` of the dense matrix.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        match self {
            Self::Dense { n, j, .. } => Some(&j[i * n..(i + 1) * n]),
            _ => None,
        }
    }

    /// Non-zero interactions of site `i` as `(site, weight)` pairs.
    ///
    /// For ring/grid this is the fixed neighbor set (forward then backward per
    /// direction); for dense it is the non-zero entries of row `i`.
    pub fn interactions(&self, i: usize) -> Vec<(usize, f64)> {
        match self {
            Self::Ring1D { lattice, j_spin } | Self::Grid2D { lattice, j_spin } => (0..lattice
                .n_neighbors)
                .flat_map(|d| {
                    [
                        (lattice.neighbor(i, d, true), *j_spin),
                        (lattice.neighbor(i, d, false), *j_spin),
                    ]
                })
                .filter(|&(k, _)| k != i)
                .collect(),
            Self::Dense { n, j, .. } => j[i * n..(i + 1) * n]
                .iter()
                .enumerate()
                .filter(|&(_, &w)| w != 0.0)
                .map(|(k, &w)| (k, w))
                .collect(),
        }
    }

    /// `Σ_j J_ij s_j` for site `i` within one replica slice, read through `spin`.
    #[inline]
    pub fn spatial_field(&self, i: usize, spin: impl Fn(usize) -> i8) -> f64 {
        match self {
            Self::Ring1D { lattice, j_spin } | Self::Grid2D { lattice, j_spin } => {
                j_spin * lattice.neighbor_sum(i, spin) as f64
            }
            Self::Dense { n, j, .. } => {
                let row = &j[i * n..(i + 1) * n];
                let mut h = 0.0f64;
                for (k, &w) in row.iter().enumerate() {
                    h += w * spin(k) as f64;
                }
                h
            }
        }
    }

    /// Classical energy of a single configuration read through `spin`.
    ///
    /// Ring/grid count each forward bond once and skip self-links along
    /// extent-1 dimensions; dense counts each `i < j` pair once.
    pub fn slice_energy(&self, spin: impl Fn(usize) -> i8) -> f64 {
        match self {
            Self::Ring1D { lattice, j_spin } | Self::Grid2D { lattice, j_spin } => {
                let mut bonds = 0i64;
                for i in 0..lattice.n_sites {
                    let si = spin(i) as i64;
                    for d in 0..lattice.n_neighbors {
                        let j = lattice.neighbor(i, d, true);
                        if j != i {
                            bonds += si * spin(j) as i64;
                        }
                    }
                }
                -j_spin * bonds as f64
            }
            Self::Dense { n, j, h } => {
                let mut e = 0.0f64;
                for i in 0..*n {
                    let si = spin(i) as f64;
                    e -= h[i] * si;
                    for k in (i + 1)..*n {
                        e -= j[i * n + k] * si * spin(k) as f64;
                    }
                }
                e
            }
        }
    }

    /// Classical energy of a decision vector (one value per site).
    ///
    /// # Panics
    ///
    /// If `spins.len()` differs from the number of sites.
    pub fn classical_energy(&self, spins: &[i8]) -> f64 {
        assert_eq!(
            spins.len(),
            self.n_sites(),
            "decision vector length does not match the site count"
        );
        self.slice_energy(|i| spins[i])
    }
}

/// Quadratic unconstrained binary problem: minimize
/// `Σ_i a_i x_i + Σ_{i<j} b_ij x_i x_j` over `x ∈ {0,1}^n`.
///
/// `b` is symmetric and row-major. Diagonal entries are ignored: fold
/// `b_ii` into `a_i` before construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Qubo {
    n: usize,
    linear: Vec<f64>,
    quadratic: Vec<f64>,
}

impl Qubo {
    pub fn new(linear: Vec<f64>, quadratic: Vec<f64>) -> AnnealResult<Self> {
        let n = linear.len();
        if n == 0 {
            return Err(AnnealError::NoSites);
        }
        if quadratic.len() != n * n {
            return Err(AnnealError::MatrixShape {
                len: quadratic.len(),
                n,
            });
        }
        check_finite(&linear)?;
        check_finite(&quadratic)?;
        check_symmetric(&quadratic, n)?;
        Ok(Self {
            n,
            linear,
            quadratic,
        })
    }

    /// Build from an edge list: `b_ij = b_ji = w` for every `(i, j, w)`.
    /// Repeated edges accumulate; self-loops are dropped.
    pub fn from_edges(linear: Vec<f64>, edges: &[(usize, usize, f64)]) -> AnnealResult<Self> {
        let n = linear.len();
        let mut quadratic = vec![0.0; n * n];
        for &(i, j, w) in edges {
            if i >= n || j >= n {
                return Err(AnnealError::SiteOutOfRange {
                    site: i.max(j),
                    n,
                });
            }
            if i == j {
                continue;
            }
            quadratic[i * n + j] += w;
            quadratic[j * n + i] += w;
        }
        Self::new(linear, quadratic)
    }

    pub fn n_vars(&self) -> usize {
        self.n
    }

    pub fn linear(&self) -> &[f64] {
        &self.linear
    }

    pub fn quadratic(&self) -> &[f64] {
        &self.quadratic
    }

    /// Substitute `x_i = (1 + s_i) / 2`.
    ///
    /// Returns `(J, h)` with `J_ij = -b_ij / 4` off the diagonal and
    /// `h_i = -a_i / 2 - Σ_{j≠i} b_ij / 4`.
    pub fn to_ising(&self) -> (Vec<f64>, Vec<f64>) {
        let n = self.n;
        let mut j = vec![0.0; n * n];
        let mut h = vec![0.0; n];
        for i in 0..n {
            let mut row_sum = 0.0;
            for k in 0..n {
                if k == i {
                    continue;
                }
                let b = self.quadratic[i * n + k];
                j[i * n + k] = -0.25 * b;
                row_sum += b;
            }
            h[i] = -0.5 * self.linear[i] - 0.25 * row_sum;
        }
        (j, h)
    }

    /// Objective value of a 0/1 assignment.
    ///
    /// # Panics
    ///
    /// If `x.len()` differs from the number of variables.
    pub fn objective(&self, x: &[u8]) -> f64 {
        assert_eq!(x.len(), self.n, "assignment length does not match the variable count");
        let n = self.n;
        let mut f = 0.0;
        for i in 0..n {
            if x[i] == 0 {
                continue;
            }
            f += self.linear[i];
            for k in (i + 1)..n {
                if x[k] != 0 {
                    f += self.quadratic[i * n + k];
                }
            }
        }
        f
    }
}

fn check_finite(values: &[f64]) -> AnnealResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(AnnealError::NonFinite(idx)),
        None => Ok(()),
    }
}

fn check_symmetric(m: &[f64], n: usize) -> AnnealResult<()> {
    for i in 0..n {
        for k in (i + 1)..n {
            let a = m[i * n + k];
            let b = m[k * n + i];
            if (a - b).abs() > SYMMETRY_TOL * (1.0 + a.abs().max(b.abs())) {
                return Err(AnnealError::Asymmetric { i, j: k });
            }
        }
    }
    Ok(())
}
