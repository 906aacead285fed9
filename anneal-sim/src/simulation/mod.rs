pub mod realization;

pub use realization::Realization;

use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::config::AnnealConfig;
use crate::coupling::CouplingModel;
use crate::error::{AnnealError, AnnealResult};
use crate::mcmc::checkerboard_sweep;
use crate::parallel::executor;
use crate::spins::{energy, extract};
use crate::statistics::{AnnealOutcome, BatchSummary, EnergyRecord};

/// Run `n_sweeps` further sweeps of `real`.
///
/// Sweeps are numbered from `real.sweeps_done() + 1`; sweep `k` runs at
/// `config.schedule.at(k, config.n_iterations)`, so sweeps past
/// `n_iterations` hold the end values. Each sweep:
/// 1. evaluates the schedule,
/// 2. refills the random buffer,
/// 3. runs both checkerboard phases,
/// 4. records the energy when `config.monitors` selects the sweep.
///
/// The energy of the starting board is always recorded first.
/// `on_sweep(k)` is called after sweep `k` (useful for progress bars).
pub fn run_sweep_loop(
    model: &CouplingModel,
    real: &mut Realization,
    config: &AnnealConfig,
    n_sweeps: usize,
    on_sweep: &(dyn Fn(usize) + Sync),
) -> AnnealResult<AnnealOutcome> {
    config.check()?;
    let board = real.spins();
    if board.n_sites() != model.n_sites() || board.n_replicas() != config.n_replicas {
        return Err(AnnealError::InvalidConfig(format!(
            "realization is {}x{}, model and config expect {}x{}",
            board.n_sites(),
            board.n_replicas(),
            model.n_sites(),
            config.n_replicas
        )));
    }

    let exec = executor(config.sequential);
    let schedule = &config.schedule;
    let iterations = config.n_iterations;
    let first = real.sweeps_done();
    let last = first + n_sweeps;

    info!(
        topology = model.topology(),
        n_sites = model.n_sites(),
        n_replicas = config.n_replicas,
        n_sweeps,
        rule = ?config.update_rule,
        law = ?schedule.law,
        seed = ?real.seed(),
        "starting anneal"
    );

    let mut energy_log = Vec::new();
    let mut jt = schedule.at(first, iterations).jt;
    let e0 = energy(real.spins(), model, jt);
    debug!(sweep = first, energy = e0, "energy");
    energy_log.push(EnergyRecord {
        sweep: first,
        energy: e0,
    });

    for sweep in (first + 1)..=last {
        let params = schedule.at(sweep, iterations);
        jt = params.jt;
        trace!(
            sweep,
            jt = params.jt,
            temperature = params.temperature,
            global_bias = params.global_bias,
            "sweep parameters"
        );

        real.refill_draws();
        let (spins, draws, scratch) = real.kernel_buffers();
        checkerboard_sweep(
            exec.as_ref(),
            model,
            config.update_rule,
            params,
            spins,
            draws,
            scratch,
        );
        real.finish_sweep(sweep);
        on_sweep(sweep);

        if config.monitors(sweep, last) {
            let e = energy(real.spins(), model, params.jt);
            debug!(sweep, energy = e, temperature = params.temperature, "energy");
            energy_log.push(EnergyRecord { sweep, energy: e });
        }
    }

    let final_energy = match energy_log.last() {
        Some(rec) if rec.sweep == last => rec.energy,
        _ => energy(real.spins(), model, jt),
    };
    let solution = extract(real.spins());
    let solution_energy = model.classical_energy(solution.as_slice());

    info!(final_energy, solution_energy, sweeps = last, "anneal finished");

    Ok(AnnealOutcome {
        solution,
        solution_energy,
        final_energy,
        energy_log,
        sweeps: last,
    })
}

/// Build a fresh realization from `config.seed` and run `config.n_iterations` sweeps.
pub fn anneal(model: &CouplingModel, config: &AnnealConfig) -> AnnealResult<AnnealOutcome> {
    config.check()?;
    let mut real = Realization::new(model, config.n_replicas, config.seed);
    run_sweep_loop(model, &mut real, config, config.n_iterations, &|_| {})
}

/// Anneal one independent realization per seed, in parallel.
///
/// Each run uses the sequential kernel since the outer loop already occupies
/// the pool. `config.seed` is ignored.
pub fn run_batch(
    model: &CouplingModel,
    config: &AnnealConfig,
    seeds: &[u64],
) -> AnnealResult<(Vec<AnnealOutcome>, BatchSummary)> {
    config.check()?;
    if seeds.is_empty() {
        return Err(AnnealError::InvalidConfig("run_batch needs at least one seed".into()));
    }
    let inner = config.clone().with_sequential(true);

    let mut realizations: Vec<Realization> = seeds
        .iter()
        .map(|&s| Realization::new(model, inner.n_replicas, Some(s)))
        .collect();

    let outcomes: Vec<AnnealOutcome> = realizations
        .par_iter_mut()
        .map(|real| run_sweep_loop(model, real, &inner, inner.n_iterations, &|_| {}))
        .collect::<AnnealResult<Vec<_>>>()?;

    let summary = BatchSummary::aggregate(&outcomes)
        .ok_or_else(|| AnnealError::InvalidConfig("empty batch".into()))?;
    info!(
        n_runs = summary.n_runs,
        best_energy = summary.best_energy,
        n_best = summary.n_best,
        "batch finished"
    );
    Ok((outcomes, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UpdateRule;
    use crate::coupling::Qubo;
    use crate::schedule::Schedule;

    const EDGES: [(usize, usize); 6] = [(0, 1), (1, 2), (2, 3), (3, 0), (1, 4), (2, 4)];

    fn maxcut_model() -> CouplingModel {
        let mut degree = [0.0f64; 5];
        for &(i, j) in &EDGES {
            degree[i] += 1.0;
            degree[j] += 1.0;
        }
        let weighted: Vec<_> = EDGES.iter().map(|&(i, j)| (i, j, 2.0)).collect();
        let qubo = Qubo::from_edges(degree.iter().map(|d| -d).collect(), &weighted).unwrap();
        CouplingModel::from_qubo(&qubo)
    }

    fn cut_value(solution: &[i8]) -> usize {
        EDGES
            .iter()
            .filter(|&&(i, j)| solution[i] != solution[j])
            .count()
    }

    fn maxcut_config(rule: UpdateRule) -> AnnealConfig {
        AnnealConfig::default()
            .with_replicas(8)
            .with_iterations(100)
            .with_schedule(
                Schedule::default()
                    .with_trotter_coupling(0.01, 0.2)
                    .with_temperature(1.0, 1e-4),
            )
            .with_update_rule(rule)
    }

    #[test]
    fn test_maxcut_reaches_optimum_in_most_runs() {
        let model = maxcut_model();
        for rule in [UpdateRule::Metropolis, UpdateRule::HeatBath] {
            let config = maxcut_config(rule);
            let seeds: Vec<u64> = (0..20).collect();
            let (outcomes, summary) = run_batch(&model, &config, &seeds).unwrap();
            let optimal = outcomes
                .iter()
                .filter(|o| cut_value(o.solution.as_slice()) == 5)
                .count();
            assert!(optimal > 12, "{rule:?}: only {optimal}/20 runs found cut 5");
            assert_eq!(cut_value(outcomes[summary.best_index].solution.as_slice()), 5);
        }
    }

    #[test]
    fn test_fixed_seed_is_bit_identical() {
        let model = maxcut_model();
        let config = maxcut_config(UpdateRule::HeatBath).with_seed(2024);
        let a = anneal(&model, &config).unwrap();
        let b = anneal(&model, &config.clone().with_sequential(true)).unwrap();

        assert_eq!(a.solution, b.solution);
        assert_eq!(a.energy_log.len(), b.energy_log.len());
        for (x, y) in a.energy_log.iter().zip(&b.energy_log) {
            assert_eq!(x.sweep, y.sweep);
            assert_eq!(x.energy.to_bits(), y.energy.to_bits());
        }
    }

    #[test]
    fn test_trajectory_reproducible_sweep_by_sweep() {
        let model = CouplingModel::grid(6, 4, 1.0).unwrap();
        let config = AnnealConfig::default()
            .with_replicas(4)
            .with_iterations(30)
            .with_seed(9);
        let mut r1 = Realization::new(&model, 4, Some(9));
        let mut r2 = Realization::new(&model, 4, Some(9));
        for _ in 0..30 {
            run_sweep_loop(&model, &mut r1, &config, 1, &|_| {}).unwrap();
            run_sweep_loop(&model, &mut r2, &config, 1, &|_| {}).unwrap();
            assert_eq!(r1.spins(), r2.spins());
            assert!(r1.spins().as_slice().iter().all(|&s| s == 1 || s == -1));
        }
        assert_eq!(r1.sweeps_done(), 30);
    }

    #[test]
    fn test_energy_log_follows_monitor_interval() {
        let model = CouplingModel::ring(16, 0.3).unwrap();
        let config = AnnealConfig::default()
            .with_replicas(4)
            .with_iterations(25)
            .with_monitor_interval(Some(10))
            .with_seed(1);
        let out = anneal(&model, &config).unwrap();
        let sweeps: Vec<usize> = out.energy_log.iter().map(|r| r.sweep).collect();
        assert_eq!(sweeps, vec![0, 10, 20, 25]);
        assert_eq!(out.sweeps, 25);
        assert_eq!(out.final_energy, out.energy_log[3].energy);
        assert_eq!(out.solution.len(), 16);
    }

    #[test]
    fn test_ferromagnetic_ring_orders() {
        let model = CouplingModel::ring(32, 1.0).unwrap();
        let config = AnnealConfig::default()
            .with_replicas(4)
            .with_iterations(200)
            .with_update_rule(UpdateRule::HeatBath)
            .with_schedule(Schedule::default().with_global_bias(0.05))
            .with_monitor_interval(None)
            .with_seed(3);
        let out = anneal(&model, &config).unwrap();
        let first = out.energy_log.first().unwrap().energy;
        let last = out.energy_log.last().unwrap().energy;
        assert!(last < first);
        // -32 in the ground state, +2 per domain wall
        assert!(out.solution_energy <= -8.0);
    }

    #[test]
    fn test_single_site_ring_flips_freely() {
        // No neighbors, no bias and Jt = 0: every Metropolis proposal has dE = 0.
        let model = CouplingModel::ring(1, 1.0).unwrap();
        let config = AnnealConfig::default()
            .with_replicas(4)
            .with_iterations(6)
            .with_update_rule(UpdateRule::Metropolis)
            .with_schedule(
                Schedule::default()
                    .with_trotter_coupling(0.0, 0.0)
                    .with_temperature(1.0, 1.0),
            );
        let mut real = Realization::new(&model, 4, Some(8));
        let mut expected = real.spins().snapshot();
        for _ in 0..6 {
            run_sweep_loop(&model, &mut real, &config, 1, &|_| {}).unwrap();
            expected.iter_mut().for_each(|s| *s = -*s);
            assert_eq!(real.spins().as_slice(), expected.as_slice());
        }
    }

    #[test]
    fn test_buffers_keep_their_shape() {
        let model = CouplingModel::ring(8, 1.0).unwrap();
        let config = AnnealConfig::default().with_replicas(4).with_iterations(5);
        let mut real = Realization::new(&model, 4, Some(1));
        run_sweep_loop(&model, &mut real, &config, 5, &|_| {}).unwrap();
        assert_eq!(real.spins().n_sites(), 8);
        assert_eq!(real.spins().n_replicas(), 4);
        assert_eq!(real.draws().len(), 32);
        assert!(real.draws().iter().all(|&u| (0.0..1.0).contains(&u)));
        assert_eq!(real.sweeps_done(), 5);
    }

    #[test]
    fn test_rejects_mismatched_realization() {
        let model = CouplingModel::ring(8, 1.0).unwrap();
        let config = AnnealConfig::default().with_replicas(4);
        let mut real = Realization::new(&model, 3, Some(0));
        let err = run_sweep_loop(&model, &mut real, &config, 1, &|_| {}).unwrap_err();
        assert!(matches!(err, AnnealError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_invalid_config_before_running() {
        let model = CouplingModel::ring(8, 1.0).unwrap();
        let config = AnnealConfig::default().with_iterations(0);
        assert!(anneal(&model, &config).is_err());
        assert!(run_batch(&model, &AnnealConfig::default(), &[]).is_err());
    }
}
