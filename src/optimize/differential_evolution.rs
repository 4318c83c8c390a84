//! Differential evolution over a bounded box.
//!
//! Stochastic population-based global minimization using the classic
//! rand/1/bin scheme: for each member, a mutant is formed from three other
//! members (`x_r0 + F (x_r1 − x_r2)`), crossed over coordinate-wise with
//! the member, clamped to the bounds, and kept if it scores no worse.
//!
//! The run is fully deterministic for a given seed: all randomness comes
//! from a single `Xoshiro256PlusPlus` stream.
//!
//! Convergence uses the population-energy criterion
//!
//! ```text
//! std(energies) ≤ atol + tol · |mean(energies)|
//! ```

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::HhfError;

use super::MinimizeResult;

/// Smallest population regardless of dimensionality.
const MIN_POPULATION: usize = 25;
/// Population members per dimension.
const POPULATION_PER_DIM: usize = 15;

/// Options for [`differential_evolution`].
#[derive(Debug, Clone)]
pub struct DifferentialEvolutionOptions {
    /// Maximum generations before giving up.
    pub max_generations: usize,
    /// Differential weight F applied to the donor difference vector.
    pub mutation: f64,
    /// Crossover probability CR.
    pub crossover: f64,
    /// Relative convergence tolerance on the population energies.
    pub tol: f64,
    /// Absolute convergence tolerance on the population energies.
    pub atol: f64,
    /// RNG seed; identical seeds reproduce the run bit-for-bit.
    pub seed: u64,
}

impl Default for DifferentialEvolutionOptions {
    fn default() -> Self {
        Self {
            max_generations: 1000,
            mutation: 0.8,
            crossover: 0.9,
            tol: 0.01,
            atol: 0.0,
            seed: 0,
        }
    }
}

/// Minimizes `f` over the box given by `bounds` (inclusive lower/upper
/// pairs, one per dimension).
///
/// The objective may return `f64::INFINITY` to reject a candidate. The best
/// member found is returned; [`MinimizeResult::converged`] reports whether
/// the population-energy criterion was met within the generation budget.
///
/// # Errors
/// Returns [`HhfError::InvalidParameter`] if `bounds` is empty or any pair
/// is not finite with lower < upper.
pub fn differential_evolution<F>(
    mut f: F,
    bounds: &[(f64, f64)],
    options: &DifferentialEvolutionOptions,
) -> Result<MinimizeResult, HhfError>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = bounds.len();
    if n == 0 {
        return Err(HhfError::InvalidParameter(
            "bounds must not be empty".to_string(),
        ));
    }
    for &(lo, hi) in bounds {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(HhfError::InvalidParameter(format!(
                "bounds must satisfy lower < upper and be finite, got ({lo}, {hi})"
            )));
        }
    }

    let pop_size = (POPULATION_PER_DIM * n).max(MIN_POPULATION);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);

    // Uniform random initial population inside the box.
    let mut population: Vec<Vec<f64>> = (0..pop_size)
        .map(|_| {
            bounds
                .iter()
                .map(|&(lo, hi)| lo + rng.gen::<f64>() * (hi - lo))
                .collect()
        })
        .collect();

    let mut energies: Vec<f64> = population.iter().map(|m| f(m)).collect();
    let mut nfev = pop_size;

    let mut best_idx = argmin(&energies);
    let mut generations = 0;

    for generation in 0..options.max_generations {
        generations = generation + 1;

        for i in 0..pop_size {
            let (r0, r1, r2) = pick_distinct(&mut rng, pop_size, i);

            // Mutant: x_r0 + F (x_r1 - x_r2), clamped to the box.
            // Binomial crossover with a forced coordinate at j_rand.
            let j_rand = rng.gen_range(0..n);
            let mut trial = population[i].clone();
            for j in 0..n {
                if j == j_rand || rng.gen::<f64>() < options.crossover {
                    let mutant = population[r0][j]
                        + options.mutation * (population[r1][j] - population[r2][j]);
                    trial[j] = mutant.clamp(bounds[j].0, bounds[j].1);
                }
            }

            let trial_energy = f(&trial);
            nfev += 1;

            if trial_energy <= energies[i] {
                population[i] = trial;
                energies[i] = trial_energy;
                if trial_energy < energies[best_idx] {
                    best_idx = i;
                }
            }
        }

        if energy_spread_converged(&energies, options) {
            return Ok(MinimizeResult {
                x: population[best_idx].clone(),
                fun: energies[best_idx],
                iterations: generations,
                nfev,
                converged: true,
            });
        }
    }

    Ok(MinimizeResult {
        x: population[best_idx].clone(),
        fun: energies[best_idx],
        iterations: generations,
        nfev,
        converged: false,
    })
}

/// Three distinct member indices, all different from `exclude`.
fn pick_distinct(
    rng: &mut Xoshiro256PlusPlus,
    pop_size: usize,
    exclude: usize,
) -> (usize, usize, usize) {
    let mut picked = [usize::MAX; 3];
    let mut count = 0;
    while count < 3 {
        let candidate = rng.gen_range(0..pop_size);
        if candidate != exclude && !picked[..count].contains(&candidate) {
            picked[count] = candidate;
            count += 1;
        }
    }
    (picked[0], picked[1], picked[2])
}

fn argmin(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v < values[best] {
            best = i;
        }
    }
    best
}

fn energy_spread_converged(energies: &[f64], options: &DifferentialEvolutionOptions) -> bool {
    // Infinite energies mean part of the population is still in a rejected
    // region; keep searching.
    if energies.iter().any(|e| !e.is_finite()) {
        return false;
    }
    let n = energies.len() as f64;
    let mean = energies.iter().sum::<f64>() / n;
    let var = energies.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / n;
    var.sqrt() <= options.atol + options.tol * mean.abs()
}
