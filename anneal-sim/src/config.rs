use validator::{Validate, ValidationError};

use crate::error::{AnnealError, AnnealResult};
use crate::schedule::Schedule;

/// Acceptance policy applied to each active cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    /// Resample from `p(+1) = 1 / (1 + exp(-2 h / T))`, ignoring the current value.
    HeatBath,
    /// Flip when `ΔE < 0` or `exp(-ΔE / T)` exceeds the draw.
    #[default]
    Metropolis,
}

impl TryFrom<&str> for UpdateRule {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "heat-bath" | "heatbath" | "glauber" | "gibbs" => Ok(Self::HeatBath),
            "metropolis" => Ok(Self::Metropolis),
            _ => Err(format!(
                "unknown update_rule '{s}', expected 'heat-bath' or 'metropolis'"
            )),
        }
    }
}

/// Temperature interpolation law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoolingLaw {
    /// `T(λ) = T_start + λ (T_end - T_start)`.
    #[default]
    Linear,
    /// `T(λ) = T_start (T_end / T_start)^λ`.
    Exponential,
}

impl TryFrom<&str> for CoolingLaw {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "linear" => Ok(Self::Linear),
            "exponential" | "exp" | "geometric" => Ok(Self::Exponential),
            _ => Err(format!(
                "unknown cooling law '{s}', expected 'linear' or 'exponential'"
            )),
        }
    }
}

fn validate_anneal_config(cfg: &AnnealConfig) -> Result<(), ValidationError> {
    if cfg.n_replicas < 1 {
        return Err(ValidationError::new("n_replicas must be >= 1"));
    }
    if cfg.n_iterations < 1 {
        return Err(ValidationError::new("n_iterations must be >= 1"));
    }
    if cfg.monitor_interval == Some(0) {
        return Err(ValidationError::new("monitor_interval must be >= 1"));
    }
    let s = &cfg.schedule;
    if ![s.jt_start, s.jt_end, s.t_start, s.t_end, s.global_bias_start]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(ValidationError::new("schedule values must be finite"));
    }
    if s.t_start <= 0.0 {
        return Err(ValidationError::new("t_start must be > 0"));
    }
    if s.t_end <= 0.0 {
        return Err(ValidationError::new("t_end must be > 0"));
    }
    Ok(())
}

/// Run configuration. The site count comes from the coupling model.
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_anneal_config"))]
pub struct AnnealConfig {
    /// Number of Trotter replicas `M`.
    pub n_replicas: usize,
    /// Sweep count over which the schedule runs from start to end.
    pub n_iterations: usize,
    pub schedule: Schedule,
    pub update_rule: UpdateRule,
    /// Evaluate energy every `k` sweeps; `None` logs only the first and last.
    pub monitor_interval: Option<usize>,
    /// Fixed seed for reproducible runs; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Run the kernel on the current thread instead of the rayon pool.
    pub sequential: bool,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            n_replicas: 8,
            n_iterations: 100,
            schedule: Schedule::default(),
            update_rule: UpdateRule::default(),
            monitor_interval: Some(1),
            seed: None,
            sequential: false,
        }
    }
}

impl AnnealConfig {
    pub fn with_replicas(mut self, n: usize) -> Self {
        self.n_replicas = n;
        self
    }

    pub fn with_iterations(mut self, n: usize) -> Self {
        self.n_iterations = n;
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_update_rule(mut self, rule: UpdateRule) -> Self {
        self.update_rule = rule;
        self
    }

    pub fn with_monitor_interval(mut self, interval: Option<usize>) -> Self {
        self.monitor_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    /// Validate, mapping failures into [`AnnealError::InvalidConfig`].
    pub fn check(&self) -> AnnealResult<()> {
        self.validate()
            .map_err(|e| AnnealError::InvalidConfig(format!("{e}")))
    }

    /// Whether energy is evaluated after `sweep` of a `total`-sweep run.
    pub fn monitors(&self, sweep: usize, total: usize) -> bool {
        sweep == 0 || sweep == total || self.monitor_interval.is_some_and(|k| sweep % k == 0)
    }
}
