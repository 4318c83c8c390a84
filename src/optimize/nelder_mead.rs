//! Nelder–Mead simplex minimization.
//!
//! Downhill simplex search over an unbounded parameter space. The standard
//! coefficients are used:
//!
//! ```text
//! reflection α = 1, expansion γ = 2, contraction ρ = 0.5, shrink σ = 0.5
//! ```
//!
//! The initial simplex places one vertex at the starting point and perturbs
//! each coordinate in turn by 5% of its value (or by 0.00025 when the
//! coordinate is near zero).

use crate::error::HhfError;

use super::MinimizeResult;

/// Reflection coefficient.
const ALPHA: f64 = 1.0;
/// Expansion coefficient.
const GAMMA: f64 = 2.0;
/// Contraction coefficient.
const RHO: f64 = 0.5;
/// Shrink coefficient.
const SIGMA: f64 = 0.5;

/// Coordinates closer to zero than this get the absolute perturbation.
const ZERO_GUESS_THRESHOLD: f64 = 1e-12;
/// Relative perturbation for the initial simplex.
const RELATIVE_STEP: f64 = 0.05;
/// Absolute perturbation for near-zero coordinates.
const ABSOLUTE_STEP: f64 = 0.00025;

/// Options for [`nelder_mead`].
#[derive(Debug, Clone)]
pub struct NelderMeadOptions {
    /// Maximum iterations before giving up.
    pub max_iter: usize,
    /// Convergence tolerance on the objective spread across the simplex.
    pub f_tol: f64,
    /// Convergence tolerance on the coordinate spread across the simplex.
    pub x_tol: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iter: 500,
            f_tol: 1e-10,
            x_tol: 1e-10,
        }
    }
}

/// Minimizes `f` starting from `x0` using the Nelder–Mead simplex method.
///
/// The objective may return `f64::INFINITY` to reject a proposal (e.g. a
/// region where it is undefined); the simplex then moves away from it.
/// Convergence requires both the objective spread and the coordinate spread
/// of the simplex to fall below their tolerances; otherwise the best point
/// found is returned with [`MinimizeResult::converged`] set to `false`.
///
/// # Errors
/// Returns [`HhfError::InvalidParameter`] if `x0` is empty or contains a
/// non-finite value.
pub fn nelder_mead<F>(
    mut f: F,
    x0: &[f64],
    options: &NelderMeadOptions,
) -> Result<MinimizeResult, HhfError>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = x0.len();
    if n == 0 {
        return Err(HhfError::InvalidParameter(
            "initial guess must not be empty".to_string(),
        ));
    }
    if !x0.iter().all(|v| v.is_finite()) {
        return Err(HhfError::InvalidParameter(
            "initial guess must be finite".to_string(),
        ));
    }

    // Initial simplex: x0 plus one perturbed vertex per coordinate.
    let mut vertices: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    vertices.push(x0.to_vec());
    for j in 0..n {
        let mut vertex = x0.to_vec();
        if vertex[j].abs() > ZERO_GUESS_THRESHOLD {
            vertex[j] += RELATIVE_STEP * vertex[j];
        } else {
            vertex[j] += ABSOLUTE_STEP;
        }
        vertices.push(vertex);
    }

    let mut f_values: Vec<f64> = vertices.iter().map(|v| f(v)).collect();
    let mut nfev = n + 1;
    let mut iterations = 0;

    for iter in 0..options.max_iter {
        iterations = iter + 1;

        // Order vertices best to worst.
        let mut order: Vec<usize> = (0..=n).collect();
        order.sort_by(|&a, &b| compare_objective(f_values[a], f_values[b]));
        let best = order[0];
        let worst = order[n];
        let second_worst = order[n - 1];

        if converged(&vertices, &f_values, best, worst, options) {
            return Ok(MinimizeResult {
                x: vertices[best].clone(),
                fun: f_values[best],
                iterations,
                nfev,
                converged: true,
            });
        }

        // Centroid of all vertices except the worst.
        let mut centroid = vec![0.0; n];
        for &idx in &order[..n] {
            for (c, v) in centroid.iter_mut().zip(&vertices[idx]) {
                *c += v;
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        // Reflection.
        let reflected = affine(&centroid, &vertices[worst], ALPHA);
        let f_reflected = f(&reflected);
        nfev += 1;

        if f_reflected < f_values[second_worst] && f_reflected >= f_values[best] {
            vertices[worst] = reflected;
            f_values[worst] = f_reflected;
            continue;
        }

        // Expansion.
        if f_reflected < f_values[best] {
            let expanded = affine(&centroid, &reflected, -GAMMA);
            let f_expanded = f(&expanded);
            nfev += 1;
            if f_expanded < f_reflected {
                vertices[worst] = expanded;
                f_values[worst] = f_expanded;
            } else {
                vertices[worst] = reflected;
                f_values[worst] = f_reflected;
            }
            continue;
        }

        // Contraction, outside or inside depending on the reflected value.
        let (contracted, f_contracted) = if f_reflected < f_values[worst] {
            let point = affine(&centroid, &reflected, -RHO);
            let value = f(&point);
            (point, value)
        } else {
            let point = affine(&centroid, &vertices[worst], -RHO);
            let value = f(&point);
            (point, value)
        };
        nfev += 1;

        if f_contracted < f_values[worst].min(f_reflected) {
            vertices[worst] = contracted;
            f_values[worst] = f_contracted;
            continue;
        }

        // Shrink every vertex except the best towards the best.
        let anchor = vertices[best].clone();
        for &idx in &order[1..] {
            for (v, a) in vertices[idx].iter_mut().zip(&anchor) {
                *v = a + SIGMA * (*v - a);
            }
            f_values[idx] = f(&vertices[idx]);
            nfev += 1;
        }
    }

    let best = (0..=n)
        .min_by(|&a, &b| compare_objective(f_values[a], f_values[b]))
        .expect("simplex is non-empty");

    Ok(MinimizeResult {
        x: vertices[best].clone(),
        fun: f_values[best],
        iterations,
        nfev,
        converged: false,
    })
}

/// NaN-safe ordering that pushes NaN objective values to the worst end.
fn compare_objective(a: f64, b: f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(&b).expect("both values are non-NaN"),
    }
}

fn converged(
    vertices: &[Vec<f64>],
    f_values: &[f64],
    best: usize,
    worst: usize,
    options: &NelderMeadOptions,
) -> bool {
    let f_spread = (f_values[worst] - f_values[best]).abs();
    if f_spread.is_nan() || f_spread > options.f_tol {
        return false;
    }
    // Max coordinate distance between the best vertex and any other.
    let mut x_spread: f64 = 0.0;
    for vertex in vertices {
        for (v, b) in vertex.iter().zip(&vertices[best]) {
            x_spread = x_spread.max((v - b).abs());
        }
    }
    x_spread <= options.x_tol
}

/// `base + coeff * (base - point)`: reflection for positive `coeff`,
/// expansion/contraction for negative `coeff`.
fn affine(base: &[f64], point: &[f64], coeff: f64) -> Vec<f64> {
    base.iter()
        .zip(point)
        .map(|(b, p)| b + coeff * (b - p))
        .collect()
}
