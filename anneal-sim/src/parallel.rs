use rayon::prelude::*;

/// Data-parallel fan-out over the cells of a flat buffer.
///
/// `for_each` calls `body(index, cell)` exactly once per cell and returns only
/// after every call has finished, so the return is the phase barrier. Each
/// call gets exclusive access to its own cell; anything else `body` reads must
/// be borrowed immutably.
pub trait ParallelExecutor: Send + Sync {
    fn for_each(&self, cells: &mut [i8], body: &(dyn Fn(usize, &mut i8) + Sync));
}

/// Work-stealing pool backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayonExecutor {
    /// Smallest chunk handed to one task.
    pub min_len: usize,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self { min_len: 256 }
    }
}

impl ParallelExecutor for RayonExecutor {
    fn for_each(&self, cells: &mut [i8], body: &(dyn Fn(usize, &mut i8) + Sync)) {
        cells
            .par_iter_mut()
            .enumerate()
            .with_min_len(self.min_len.max(1))
            .for_each(|(idx, cell)| body(idx, cell));
    }
}

/// Current-thread backend (no rayon overhead, best when outer-level
/// parallelism over independent runs already saturates all cores).
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialExecutor;

impl ParallelExecutor for SequentialExecutor {
    fn for_each(&self, cells: &mut [i8], body: &(dyn Fn(usize, &mut i8) + Sync)) {
        cells
            .iter_mut()
            .enumerate()
            .for_each(|(idx, cell)| body(idx, cell));
    }
}

/// Backend selected by the `sequential` flag.
pub fn executor(sequential: bool) -> Box<dyn ParallelExecutor> {
    if sequential {
        Box::new(SequentialExecutor)
    } else {
        Box::new(RayonExecutor::new())
    }
}
