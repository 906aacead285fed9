use crate::spins::SpinLattice;

/// Collapse replicas by signed majority; a zero sum resolves to `+1`.
#[inline]
pub fn majority(values: &[i8]) -> i8 {
    let sum: i32 = values.iter().map(|&v| v as i32).sum();
    if sum >= 0 {
        1
    } else {
        -1
    }
}

/// Canonical per-site decision, one `±1` value per site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution(Vec<i8>);

impl Solution {
    pub fn as_slice(&self) -> &[i8] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<i8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 0/1 encoding (`+1 → 1`, `-1 → 0`), e.g. for scoring against a QUBO.
    pub fn to_binary(&self) -> Vec<u8> {
        self.0.iter().map(|&s| u8::from(s > 0)).collect()
    }
}

/// Majority vote over the replicas of every site.
pub fn extract(lattice: &SpinLattice) -> Solution {
    Solution(
        (0..lattice.n_sites())
            .map(|i| majority(lattice.site(i)))
            .collect(),
    )
}
