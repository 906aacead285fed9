//! Annealing schedule: Trotter coupling, temperature and global bias as a
//! function of sweep index.

use crate::config::CoolingLaw;

/// Temperatures are never allowed below this floor.
pub const MIN_TEMPERATURE: f64 = 1e-12;

/// Endpoint values of one annealing run.
///
/// `jt` ramps linearly from `jt_start` to `jt_end`, the global bias decays
/// linearly from `global_bias_start` to zero, and the temperature follows
/// `law` from `t_start` to `t_end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    pub jt_start: f64,
    pub jt_end: f64,
    pub t_start: f64,
    pub t_end: f64,
    pub global_bias_start: f64,
    pub law: CoolingLaw,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            jt_start: 0.01,
            jt_end: 0.2,
            t_start: 1.0,
            t_end: 1e-4,
            global_bias_start: 0.0,
            law: CoolingLaw::Linear,
        }
    }
}

impl Schedule {
    pub fn with_trotter_coupling(mut self, start: f64, end: f64) -> Self {
        self.jt_start = start;
        self.jt_end = end;
        self
    }

    pub fn with_temperature(mut self, start: f64, end: f64) -> Self {
        self.t_start = start;
        self.t_end = end;
        self
    }

    pub fn with_global_bias(mut self, start: f64) -> Self {
        self.global_bias_start = start;
        self
    }

    pub fn with_law(mut self, law: CoolingLaw) -> Self {
        self.law = law;
        self
    }

    /// Parameters for `sweep` out of `iterations`.
    pub fn at(&self, sweep: usize, iterations: usize) -> SweepParams {
        schedule(sweep, iterations, self)
    }
}

/// Per-sweep parameters, passed by value into every update task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    /// Inter-replica (Trotter) coupling.
    pub jt: f64,
    /// Temperature, floored at [`MIN_TEMPERATURE`].
    pub temperature: f64,
    /// Uniform field added to every site.
    pub global_bias: f64,
}

/// Normalized progress `sweep / iterations`, clamped to `[0, 1]`.
#[inline]
pub fn progress(sweep: usize, iterations: usize) -> f64 {
    if iterations == 0 {
        return 1.0;
    }
    (sweep as f64 / iterations as f64).clamp(0.0, 1.0)
}

#[inline]
fn lerp(start: f64, end: f64, lambda: f64) -> f64 {
    start + lambda * (end - start)
}

/// Evaluate the schedule at `sweep`.
pub fn schedule(sweep: usize, iterations: usize, cfg: &Schedule) -> SweepParams {
    let lambda = progress(sweep, iterations);

    let temperature = match cfg.law {
        CoolingLaw::Linear => lerp(cfg.t_start, cfg.t_end, lambda),
        CoolingLaw::Exponential => {
            if cfg.t_start > 0.0 && cfg.t_end > 0.0 {
                cfg.t_start * (lambda * (cfg.t_end / cfg.t_start).ln()).exp()
            } else {
                lerp(cfg.t_start, cfg.t_end, lambda)
            }
        }
    };

    SweepParams {
        jt: lerp(cfg.jt_start, cfg.jt_end, lambda),
        temperature: floor_temperature(temperature),
        global_bias: lerp(cfg.global_bias_start, 0.0, lambda),
    }
}

/// Clamp to the positive floor; NaN also maps to the floor.
#[inline]
pub fn floor_temperature(t: f64) -> f64 {
    if t > MIN_TEMPERATURE {
        t
    } else {
        MIN_TEMPERATURE
    }
}
