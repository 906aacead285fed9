use anneal_sim::spins::render;
use anneal_sim::{
    run_batch, run_sweep_loop, AnnealConfig, BoardLayout, CouplingModel, Qubo, Realization,
    UpdateRule,
};
use tracing_subscriber::EnvFilter;

/// 5-node graph with optimal cut 5.
const EDGES: [(usize, usize); 6] = [(0, 1), (1, 2), (2, 3), (3, 0), (1, 4), (2, 4)];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // maximise Σ_(i,j) (x_i + x_j - 2 x_i x_j)  ==  minimise Σ -deg_i x_i + Σ 2 x_i x_j
    let mut linear = vec![0.0; 5];
    for &(i, j) in &EDGES {
        linear[i] -= 1.0;
        linear[j] -= 1.0;
    }
    let edges: Vec<_> = EDGES.iter().map(|&(i, j)| (i, j, 2.0)).collect();
    let qubo = Qubo::from_edges(linear, &edges).expect("valid qubo");
    let model = CouplingModel::from_qubo(&qubo);

    let config = AnnealConfig::default()
        .with_replicas(8)
        .with_iterations(100)
        .with_update_rule(UpdateRule::Metropolis)
        .with_monitor_interval(Some(25));

    let seeds: Vec<u64> = (0..20).collect();
    let (outcomes, summary) = run_batch(&model, &config, &seeds).expect("batch");

    let best = &outcomes[summary.best_index];
    let x = best.solution.to_binary();
    let cut = EDGES.iter().filter(|&&(i, j)| x[i] != x[j]).count();
    println!("best partition: {:?}  cut = {}  objective = {}", x, cut, qubo.objective(&x));
    println!(
        "{}/{} runs reached the best energy {:.3}",
        summary.n_best, summary.n_runs, summary.best_energy
    );

    // replay the best seed to show its final board
    let mut real = Realization::new(&model, config.n_replicas, Some(seeds[summary.best_index]));
    run_sweep_loop(&model, &mut real, &config, config.n_iterations, &|_| {}).expect("replay");
    print!("{}", render(real.spins(), BoardLayout::ByReplica));
}
