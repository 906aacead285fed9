use crate::error::{AnnealError, AnnealResult};
use crate::random::RandomStream;

/// Checkerboard class of cell `(site, replica)`: `(site + replica) mod 2`.
#[inline]
pub fn parity(site: usize, replica: usize) -> usize {
    (site + replica) & 1
}

/// `n_sites × n_replicas` board of ±1 spins.
///
/// Stored flat with replicas contiguous per site: cell `(i, t)` lives at
/// `i * n_replicas + t`. Dimensions are fixed at construction. Only the
/// update kernel writes to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinLattice {
    n_sites: usize,
    n_replicas: usize,
    spins: Vec<i8>,
}

impl SpinLattice {
    /// Uniform random ±1 fill drawn from `stream`.
    pub fn random(n_sites: usize, n_replicas: usize, stream: &mut RandomStream) -> Self {
        let mut lattice = Self {
            n_sites,
            n_replicas,
            spins: vec![1; n_sites * n_replicas],
        };
        lattice.randomize(stream);
        lattice
    }

    /// Board from explicit values, laid out as `spins[i * n_replicas + t]`.
    pub fn from_spins(n_sites: usize, n_replicas: usize, spins: Vec<i8>) -> AnnealResult<Self> {
        if spins.len() != n_sites * n_replicas {
            return Err(AnnealError::InvalidConfig(format!(
                "spin board has {} cells, expected {n_sites}x{n_replicas}",
                spins.len()
            )));
        }
        if let Some(idx) = spins.iter().position(|&s| s != 1 && s != -1) {
            return Err(AnnealError::InvalidConfig(format!(
                "spin at cell {idx} is {}, expected +1 or -1",
                spins[idx]
            )));
        }
        Ok(Self {
            n_sites,
            n_replicas,
            spins,
        })
    }

    pub(crate) fn randomize(&mut self, stream: &mut RandomStream) {
        for s in self.spins.iter_mut() {
            *s = stream.spin();
        }
    }

    #[inline]
    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    #[inline]
    pub fn n_replicas(&self) -> usize {
        self.n_replicas
    }

    #[inline]
    pub fn n_cells(&self) -> usize {
        self.spins.len()
    }

    #[inline]
    pub fn index(&self, site: usize, replica: usize) -> usize {
        site * self.n_replicas + replica
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx / self.n_replicas, idx % self.n_replicas)
    }

    #[inline]
    pub fn get(&self, site: usize, replica: usize) -> i8 {
        self.spins[site * self.n_replicas + replica]
    }

    /// All replica values of one site.
    #[inline]
    pub fn site(&self, site: usize) -> &[i8] {
        &self.spins[site * self.n_replicas..(site + 1) * self.n_replicas]
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.spins
    }

    /// Owned copy of the board, for logging or comparison outside the run.
    pub fn snapshot(&self) -> Vec<i8> {
        self.spins.clone()
    }

    /// Exchange the board with a same-sized buffer (phase commit).
    pub(crate) fn swap_cells(&mut self, other: &mut Vec<i8>) {
        debug_assert_eq!(other.len(), self.spins.len());
        std::mem::swap(&mut self.spins, other);
    }
}
