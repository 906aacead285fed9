use std::time::Instant;

use anneal_sim::{anneal, run_batch, AnnealConfig, CouplingModel, UpdateRule};

const N_SITES: usize = 4096;
const N_REPLICAS: usize = 32;
const N_SWEEPS: usize = 200;
const N_SEEDS: u64 = 16;

fn main() {
    let model = CouplingModel::ring(N_SITES, 1.0).expect("valid ring");

    let config = AnnealConfig::default()
        .with_replicas(N_REPLICAS)
        .with_iterations(N_SWEEPS)
        .with_update_rule(UpdateRule::HeatBath)
        .with_monitor_interval(None)
        .with_seed(42);

    println!(
        "Ring: {}  |  Replicas: {}  |  Sweeps: {}  |  Seeds: {}",
        N_SITES, N_REPLICAS, N_SWEEPS, N_SEEDS
    );
    println!("{}", "-".repeat(70));

    for (label, sequential) in [("rayon", false), ("sequential", true)] {
        let config = config.clone().with_sequential(sequential);
        let t0 = Instant::now();
        let out = anneal(&model, &config).expect("anneal");
        let elapsed = t0.elapsed().as_secs_f64();
        println!(
            "{:<10}  {:.3} s  |  {:.3} ms/sweep  |  E = {:.1}",
            label,
            elapsed,
            elapsed / N_SWEEPS as f64 * 1000.0,
            out.final_energy
        );
    }

    let seeds: Vec<u64> = (0..N_SEEDS).collect();
    let t0 = Instant::now();
    let (_, summary) = run_batch(&model, &config, &seeds).expect("batch");
    let elapsed = t0.elapsed().as_secs_f64();
    println!(
        "batch       {:.3} s  |  best E = {:.1}  |  mean E = {:.1}",
        elapsed, summary.best_energy, summary.mean_energy
    );
}
