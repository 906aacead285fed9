/// Periodic site topology with a precomputed neighbor table.
///
/// Sites are indexed in row-major (C) order. Every site has `n_neighbors`
/// forward directions and the matching backward directions, so the
/// coordination number is `2 * n_neighbors` (2 for a ring, 4 for a torus).
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    /// Extent along each dimension (e.g. `[8, 8]`).
    pub shape: Vec<usize>,
    /// Row-major strides: `strides[d] = product of shape[d+1..]`.
    pub strides: Vec<usize>,
    /// Total number of sites (`shape.iter().product()`).
    pub n_sites: usize,
    /// Number of forward neighbor directions per site.
    pub n_neighbors: usize,
    /// Layout: `neighbors[(i * n_neighbors + d) * 2 + dir]` where `dir = 0`
    /// is forward and `dir = 1` is backward.
    neighbors: Vec<u32>,
}

impl Lattice {
    /// Periodic 1D chain of `n` sites.
    pub fn ring(n: usize) -> Self {
        Self::periodic(vec![n])
    }

    /// Periodic `nx × ny` torus. Site `(x, y)` has flat index `x * ny + y`.
    pub fn torus(nx: usize, ny: usize) -> Self {
        Self::periodic(vec![nx, ny])
    }

    /// Hypercubic lattice: one unit step per dimension, wrapped periodically.
    fn periodic(shape: Vec<usize>) -> Self {
        let n_neighbors = shape.len();
        let n_sites: usize = shape.iter().product();

        let mut strides = vec![1usize; n_neighbors];
        for d in (1..n_neighbors).rev() {
            strides[d - 1] = strides[d] * shape[d];
        }

        let mut neighbors = Vec::with_capacity(n_sites * n_neighbors * 2);
        for i in 0..n_sites {
            for (d, (&extent, &stride)) in shape.iter().zip(&strides).enumerate() {
                let c = (i / stride) % extent;
                let base = i - c * stride;
                let up = (c + 1) % extent;
                let down = (c + extent - 1) % extent;
                debug_assert_eq!(neighbors.len(), (i * n_neighbors + d) * 2);
                neighbors.push((base + up * stride) as u32);
                neighbors.push((base + down * stride) as u32);
            }
        }

        Self {
            shape,
            strides,
            n_sites,
            n_neighbors,
            neighbors,
        }
    }

    /// Neighbor of site `flat_idx` one step along `dim`, forward or backward.
    #[inline]
    pub fn neighbor(&self, flat_idx: usize, dim: usize, forward: bool) -> usize {
        self.neighbors[(flat_idx * self.n_neighbors + dim) * 2 + (!forward as usize)] as usize
    }

    /// Sum of the neighbor values of site `i`, read through `spin`.
    ///
    /// Along a dimension of extent 1 a site wraps onto itself; those
    /// self-links are skipped.
    #[inline]
    pub fn neighbor_sum(&self, i: usize, spin: impl Fn(usize) -> i8) -> i32 {
        let mut sum = 0i32;
        for d in 0..self.n_neighbors {
            for forward in [true, false] {
                let j = self.neighbor(i, d, forward);
                if j != i {
                    sum += spin(j) as i32;
                }
            }
        }
        sum
    }
}
