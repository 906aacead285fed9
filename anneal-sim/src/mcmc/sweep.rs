use crate::config::UpdateRule;
use crate::coupling::CouplingModel;
use crate::parallel::ParallelExecutor;
use crate::schedule::SweepParams;
use crate::spins::{parity, SpinLattice};

/// Exponent arguments are clamped to `±MAX_EXPONENT` before `exp`.
pub const MAX_EXPONENT: f64 = 500.0;

#[inline]
fn bounded_exp(x: f64) -> f64 {
    x.clamp(-MAX_EXPONENT, MAX_EXPONENT).exp()
}

/// Local field on cell `(i, t)` read from the flat board `spins`.
///
/// `h = Jt (s[i][t+1] + s[i][t-1]) + Σ_j J_ij s[j][t] + bias_i + h_global`,
/// periodic in the replica index. With a single replica the Trotter term is
/// dropped (it only couples a spin to itself).
#[inline]
pub fn local_field(
    model: &CouplingModel,
    spins: &[i8],
    n_replicas: usize,
    i: usize,
    t: usize,
    params: SweepParams,
) -> f64 {
    let m = n_replicas;
    let trotter = if m > 1 {
        let column = &spins[i * m..(i + 1) * m];
        let t_next = (t + 1) % m;
        let t_prev = (t + m - 1) % m;
        params.jt * (column[t_next] as f64 + column[t_prev] as f64)
    } else {
        0.0
    };
    trotter + model.spatial_field(i, |j| spins[j * m + t]) + model.bias(i) + params.global_bias
}

/// Heat-bath resample: `+1` with probability `1 / (1 + exp(-2h/T))`.
#[inline]
pub fn heat_bath(field: f64, temperature: f64, draw: f64) -> i8 {
    let p = 1.0 / (1.0 + bounded_exp(-2.0 * field / temperature));
    if draw < p {
        1
    } else {
        -1
    }
}

/// Metropolis flip test with `ΔE = 2 s h`.
#[inline]
pub fn metropolis(current: i8, field: f64, temperature: f64, draw: f64) -> i8 {
    let eng_change = 2.0 * current as f64 * field;
    if eng_change < 0.0 || bounded_exp(-eng_change / temperature) > draw {
        -current
    } else {
        current
    }
}

#[inline]
fn apply_rule(rule: UpdateRule, current: i8, field: f64, temperature: f64, draw: f64) -> i8 {
    match rule {
        UpdateRule::HeatBath => heat_bath(field, temperature, draw),
        UpdateRule::Metropolis => metropolis(current, field, temperature, draw),
    }
}

/// Update every cell with `parity == phase`.
///
/// Active cells read `src` (the board as it stood when the phase began) and
/// write into `dst`; inactive cells are copied through unchanged. Every cell of
/// `dst` is written exactly once, so the phase has no read/write overlap even
/// when same-parity cells interact (dense couplings, odd extents).
#[allow(clippy::too_many_arguments)]
pub fn update_phase(
    exec: &dyn ParallelExecutor,
    model: &CouplingModel,
    rule: UpdateRule,
    params: SweepParams,
    phase: usize,
    src: &[i8],
    n_replicas: usize,
    draws: &[f64],
    dst: &mut [i8],
) {
    debug_assert_eq!(src.len(), dst.len());
    debug_assert_eq!(src.len(), draws.len());
    let m = n_replicas;
    exec.for_each(dst, &|idx, cell| {
        let (i, t) = (idx / m, idx % m);
        let s = src[idx];
        *cell = if parity(i, t) == phase {
            let h = local_field(model, src, m, i, t, params);
            apply_rule(rule, s, h, params.temperature, draws[idx])
        } else {
            s
        };
    });
}

/// One Monte Carlo sweep: phase 0 then phase 1, each ending at the executor's
/// barrier. `draws` must have been refilled for this sweep; each cell consumes
/// its own draw exactly once. `scratch` is resized as needed.
#[cfg_attr(feature = "profile", inline(never))]
pub fn checkerboard_sweep(
    exec: &dyn ParallelExecutor,
    model: &CouplingModel,
    rule: UpdateRule,
    params: SweepParams,
    lattice: &mut SpinLattice,
    draws: &[f64],
    scratch: &mut Vec<i8>,
) {
    let n_replicas = lattice.n_replicas();
    scratch.resize(lattice.n_cells(), 0);
    for phase in 0..2 {
        update_phase(
            exec,
            model,
            rule,
            params,
            phase,
            lattice.as_slice(),
            n_replicas,
            draws,
            scratch,
        );
        lattice.swap_cells(scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parallel::{RayonExecutor, SequentialExecutor};
    use crate::random::RandomStream;
    use proptest::prelude::*;

    fn params(jt: f64, temperature: f64) -> SweepParams {
        SweepParams {
            jt,
            temperature,
            global_bias: 0.0,
        }
    }

    #[test]
    fn test_acceptance_rules() {
        // Strong positive field at low T pins heat-bath to +1.
        assert_eq!(heat_bath(5.0, 1e-12, 0.999), 1);
        assert_eq!(heat_bath(-5.0, 1e-12, 0.001), -1);
        // Zero field: p = 1/2.
        assert_eq!(heat_bath(0.0, 1.0, 0.49), 1);
        assert_eq!(heat_bath(0.0, 1.0, 0.51), -1);

        // Energy-lowering flips always accepted.
        assert_eq!(metropolis(-1, 1.0, 1e-12, 0.999), 1);
        // Energy-raising flips rejected at low T.
        assert_eq!(metropolis(1, 1.0, 1e-12, 0.001), 1);
        // ΔE = 2, T = 1: accept iff exp(-2) > draw.
        assert_eq!(metropolis(1, 1.0, 1.0, 0.1), -1);
        assert_eq!(metropolis(1, 1.0, 1.0, 0.2), 1);
    }

    #[test]
    fn test_no_overflow_near_zero_temperature() {
        for &h in &[-1e6, -1.0, 0.0, 1.0, 1e6] {
            let p = heat_bath(h, 1e-300, 0.5);
            assert!(p == 1 || p == -1);
            let s = metropolis(1, h, 1e-300, 0.5);
            assert!(s == 1 || s == -1);
        }
    }

    #[test]
    fn test_local_field_terms() {
        // 3 sites, 4 replicas.
        let model = CouplingModel::ring(3, 0.5).unwrap();
        let lat = SpinLattice::from_spins(3, 4, vec![1, 1, -1, 1, -1, -1, 1, 1, 1, 1, 1, -1])
            .unwrap();
        let p = SweepParams {
            jt: 0.2,
            temperature: 1.0,
            global_bias: 0.05,
        };
        // cell (0, 0): replicas 1 and 3 of site 0 are +1, +1; sites 1 and 2 at t=0 are -1, +1
        let h = local_field(&model, lat.as_slice(), 4, 0, 0, p);
        assert!((h - (0.2 * 2.0 + 0.5 * 0.0 + 0.05)).abs() < 1e-12);
    }

    /// Zero field with Metropolis flips every active cell, so one sweep
    /// negates the board iff every cell is updated exactly once.
    #[test]
    fn test_each_cell_updated_once_per_sweep() {
        let model = CouplingModel::ring(7, 0.0).unwrap();
        let mut stream = RandomStream::new(Some(1));
        let mut lat = SpinLattice::random(7, 5, &mut stream);
        let initial = lat.snapshot();
        let mut draws = vec![0.0; lat.n_cells()];
        stream.refill(&mut draws);
        let mut scratch = Vec::new();

        let exec = RayonExecutor::new();
        let mut after_phase0 = vec![0i8; lat.n_cells()];
        update_phase(
            &exec,
            &model,
            UpdateRule::Metropolis,
            params(0.0, 1.0),
            0,
            lat.as_slice(),
            5,
            &draws,
            &mut after_phase0,
        );
        for (idx, (&a, &b)) in initial.iter().zip(&after_phase0).enumerate() {
            let (i, t) = lat.coords(idx);
            if parity(i, t) == 0 {
                assert_eq!(b, -a);
            } else {
                assert_eq!(b, a);
            }
        }

        checkerboard_sweep(
            &exec,
            &model,
            UpdateRule::Metropolis,
            params(0.0, 1.0),
            &mut lat,
            &draws,
            &mut scratch,
        );
        let negated: Vec<i8> = initial.iter().map(|&s| -s).collect();
        assert_eq!(lat.as_slice(), negated.as_slice());
    }

    /// On an even ring with an even replica count no cell interacts with its
    /// own parity class, so snapshot phases equal in-place updates.
    #[test]
    fn test_matches_in_place_checkerboard_on_bipartite_lattice() {
        let (n, m) = (8, 4);
        let model = CouplingModel::ring(n, 0.7).unwrap();
        let p = params(0.3, 0.8);
        let mut stream = RandomStream::new(Some(99));
        let mut lat = SpinLattice::random(n, m, &mut stream);
        let mut reference = lat.snapshot();
        let mut draws = vec![0.0; n * m];
        let mut scratch = Vec::new();

        for _ in 0..10 {
            stream.refill(&mut draws);
            for phase in 0..2 {
                for idx in 0..n * m {
                    let (i, t) = (idx / m, idx % m);
                    if parity(i, t) != phase {
                        continue;
                    }
                    let h = local_field(&model, &reference, m, i, t, p);
                    reference[idx] = metropolis(reference[idx], h, p.temperature, draws[idx]);
                }
            }
            checkerboard_sweep(
                &SequentialExecutor,
                &model,
                UpdateRule::Metropolis,
                p,
                &mut lat,
                &draws,
                &mut scratch,
            );
            assert_eq!(lat.as_slice(), reference.as_slice());
        }
    }

    #[test]
    fn test_backends_agree() {
        let model = CouplingModel::dense(
            3,
            vec![0.0, 1.0, -1.0, 1.0, 0.0, 0.5, -1.0, 0.5, 0.0],
            Some(vec![0.1, -0.2, 0.3]),
        )
        .unwrap();
        let mut stream = RandomStream::new(Some(5));
        let mut a = SpinLattice::random(3, 6, &mut stream);
        let mut b = a.clone();
        let mut draws = vec![0.0; a.n_cells()];
        let mut scratch = Vec::new();
        for sweep in 0..20 {
            stream.refill(&mut draws);
            let p = params(0.01 * sweep as f64, 1.0 / (1.0 + sweep as f64));
            let pool = RayonExecutor { min_len: 1 };
            checkerboard_sweep(&pool, &model, UpdateRule::HeatBath, p, &mut a, &draws, &mut scratch);
            checkerboard_sweep(
                &SequentialExecutor,
                &model,
                UpdateRule::HeatBath,
                p,
                &mut b,
                &draws,
                &mut scratch,
            );
            assert_eq!(a, b);
        }
    }

    proptest! {
        #[test]
        fn spins_stay_signed(
            seed in any::<u64>(),
            n in 1usize..12,
            m in 1usize..6,
            jt in -1.0f64..1.0,
            j_spin in -2.0f64..2.0,
            temperature in 1e-12f64..5.0,
            use_heat_bath in any::<bool>(),
        ) {
            let rule = if use_heat_bath { UpdateRule::HeatBath } else { UpdateRule::Metropolis };
            let model = CouplingModel::ring(n, j_spin).unwrap();
            let mut stream = RandomStream::new(Some(seed));
            let mut lat = SpinLattice::random(n, m, &mut stream);
            let mut draws = vec![0.0; n * m];
            let mut scratch = Vec::new();
            for _ in 0..3 {
                stream.refill(&mut draws);
                checkerboard_sweep(
                    &SequentialExecutor,
                    &model,
                    rule,
                    params(jt, temperature),
                    &mut lat,
                    &draws,
                    &mut scratch,
                );
                prop_assert!(lat.as_slice().iter().all(|&s| s == 1 || s == -1));
            }
        }
    }
}
