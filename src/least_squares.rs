//! A bounded nonlinear least-squares solver for the one Jacobian shape Viridian produces: a
//! two-band matrix in which residual `k` depends on at most the unknowns `k - 1` and `k`. That
//! structure makes the normal equations tridiagonal, so each iteration costs O(n) time and memory
//! instead of the O(n³) a dense solve would need, and a colormap with thousands of samples
//! optimizes in milliseconds.
//!
//! The algorithm is a classic Levenberg–Marquardt loop: solve (JᵀJ + λI)·s = −Jᵀr for a trial
//! step, project the trial point onto the box constraints, and accept it only if the cost
//! decreased, shrinking λ on success and inflating it on failure. Only accepting descent steps
//! means the final cost can never exceed the cost at the starting point, which is the guarantee
//! the helix generator leans on. The solver never fails: whether or not a convergence test fired
//! before the iteration cap, the best iterate found is returned.

/// The occupancy pattern of a two-band Jacobian: a matrix with one more row than it has columns,
/// where row `k` may be nonzero only at columns `k - 1` and `k`. Passing the pattern separately
/// from the numbers keeps the structure testable on its own and lets the solver check that an
/// objective's Jacobian actually has the shape the tridiagonal algebra assumes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BandSparsity {
    residual_count: usize,
    unknown_count: usize,
}

impl BandSparsity {
    /// Describes the pattern for a problem with `unknown_count` unknowns and one more residual
    /// than unknowns.
    ///
    /// # Panics
    /// Panics if `residual_count != unknown_count + 1`: any other shape has no two-band storage
    /// and indicates a bug in the caller, not bad data.
    pub fn two_band(residual_count: usize, unknown_count: usize) -> BandSparsity {
        if residual_count != unknown_count + 1 {
            panic!("two-band sparsity requires exactly one more residual than unknowns");
        }
        BandSparsity {
            residual_count,
            unknown_count,
        }
    }

    /// The number of residuals (rows).
    pub fn residual_count(&self) -> usize {
        self.residual_count
    }

    /// The number of unknowns (columns).
    pub fn unknown_count(&self) -> usize {
        self.unknown_count
    }

    /// The columns that may be nonzero in the given row, as `(left, right)`: the subdiagonal
    /// entry at `row - 1` (absent in the first row) and the diagonal entry at `row` (absent in
    /// the last row).
    pub fn columns(&self, row: usize) -> (Option<usize>, Option<usize>) {
        let left = if row > 0 { Some(row - 1) } else { None };
        let right = if row < self.unknown_count {
            Some(row)
        } else {
            None
        };
        (left, right)
    }

    /// Checks that a Jacobian's storage has the dimensions this pattern describes.
    pub fn matches(&self, jacobian: &TwoBandJacobian) -> bool {
        jacobian.diag.len() == self.unknown_count && jacobian.sub.len() == self.unknown_count
    }
}

/// A two-band Jacobian in compact storage. For unknown `j`, `diag[j]` holds ∂r(j)/∂u(j) (the
/// entry on the main diagonal) and `sub[j]` holds ∂r(j+1)/∂u(j) (the entry one row below it);
/// every other entry is structurally zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoBandJacobian {
    /// Main-diagonal entries, one per unknown.
    pub diag: Vec<f64>,
    /// Subdiagonal entries, one per unknown.
    pub sub: Vec<f64>,
}

/// Tolerances and limits for [`solve_bounded`]. The defaults mirror the usual least-squares
/// conventions: stop when the gradient is flat, the step is tiny relative to the iterate, or the
/// relative cost decrease is negligible.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolverOptions {
    /// Hard cap on outer Levenberg–Marquardt iterations.
    pub max_iterations: usize,
    /// Relative cost-decrease tolerance: an accepted step that improves the cost by less than
    /// `ftol * cost` counts as converged.
    pub ftol: f64,
    /// Step tolerance: an accepted step smaller than `xtol * (1 + |x|)` in every coordinate
    /// counts as converged.
    pub xtol: f64,
    /// Gradient tolerance: an infinity-norm of Jᵀr at or below this counts as converged.
    pub gtol: f64,
}

impl Default for SolverOptions {
    fn default() -> SolverOptions {
        SolverOptions {
            max_iterations: 100,
            ftol: 1e-8,
            xtol: 1e-8,
            gtol: 1e-8,
        }
    }
}

/// The outcome of a solve: the best iterate found, its cost (sum of squared residuals), whether a
/// convergence test fired before the iteration cap, and how many outer iterations ran. A
/// non-converged solution is still the best point visited and is perfectly usable.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The best iterate found.
    pub x: Vec<f64>,
    /// Sum of squared residuals at `x`.
    pub cost: f64,
    /// Whether a convergence criterion was met.
    pub converged: bool,
    /// Number of outer iterations performed.
    pub iterations: usize,
}

// λ schedule: shrink on accepted steps, inflate on rejected ones, give up once it's clear no
// descent direction remains at any damping.
const LAMBDA_INIT: f64 = 1e-3;
const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e10;
const LAMBDA_SHRINK: f64 = 0.25;
const LAMBDA_GROW: f64 = 4.0;

/// Minimizes the sum of squared residuals over a box, starting from `x0`, for an objective whose
/// Jacobian is two-band. `residuals` maps an iterate to the residual vector; `jacobian` maps an
/// iterate to its [`TwoBandJacobian`], which must match `sparsity`. `lower` and `upper` give
/// per-variable bounds; `x0` is projected onto them before the first evaluation, and every trial
/// step is projected too, so no residual is ever evaluated outside the box.
///
/// # Panics
/// Panics if `x0`, `lower`, and `upper` don't all have `sparsity.unknown_count()` entries, or if
/// some `lower[j] > upper[j]`.
pub fn solve_bounded<R, J>(
    x0: &[f64],
    lower: &[f64],
    upper: &[f64],
    sparsity: &BandSparsity,
    residuals: R,
    jacobian: J,
    options: &SolverOptions,
) -> Solution
where
    R: Fn(&[f64]) -> Vec<f64>,
    J: Fn(&[f64]) -> TwoBandJacobian,
{
    let n = sparsity.unknown_count();
    if x0.len() != n || lower.len() != n || upper.len() != n {
        panic!("unknown vector and bounds must match the sparsity pattern");
    }
    if lower.iter().zip(upper.iter()).any(|(lo, hi)| lo > hi) {
        panic!("lower bound exceeds upper bound");
    }

    let mut x: Vec<f64> = x0
        .iter()
        .zip(lower.iter().zip(upper.iter()))
        .map(|(&v, (&lo, &hi))| v.max(lo).min(hi))
        .collect();
    let mut r = residuals(&x);
    debug_assert_eq!(r.len(), sparsity.residual_count());
    let mut cost = dot(&r, &r);

    if n == 0 {
        // nothing to optimize; the fixed endpoints already determine the answer
        return Solution {
            x,
            cost,
            converged: true,
            iterations: 0,
        };
    }

    let mut lambda = LAMBDA_INIT;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < options.max_iterations {
        iterations += 1;
        let jac = jacobian(&x);
        debug_assert!(sparsity.matches(&jac));

        // gradient g = Jᵀr and the tridiagonal JᵀJ, both directly from the two bands
        let mut gradient = vec![0.0; n];
        let mut normal_diag = vec![0.0; n];
        let mut normal_off = vec![0.0; n.saturating_sub(1)];
        for j in 0..n {
            gradient[j] = jac.diag[j] * r[j] + jac.sub[j] * r[j + 1];
            normal_diag[j] = jac.diag[j] * jac.diag[j] + jac.sub[j] * jac.sub[j];
            if j + 1 < n {
                normal_off[j] = jac.sub[j] * jac.diag[j + 1];
            }
        }
        if gradient.iter().all(|g| g.abs() <= options.gtol) {
            converged = true;
            break;
        }

        // inner damping loop: retry the step with more damping until the cost decreases
        let mut accepted = false;
        while lambda <= LAMBDA_MAX {
            let step = solve_damped_tridiagonal(&normal_diag, &normal_off, &gradient, lambda);
            let trial: Vec<f64> = x
                .iter()
                .zip(step.iter())
                .zip(lower.iter().zip(upper.iter()))
                .map(|((&v, &s), (&lo, &hi))| (v + s).max(lo).min(hi))
                .collect();
            let r_trial = residuals(&trial);
            let cost_trial = dot(&r_trial, &r_trial);
            if cost_trial < cost {
                let step_small = trial
                    .iter()
                    .zip(x.iter())
                    .all(|(t, v)| (t - v).abs() <= options.xtol * (1.0 + v.abs()));
                let decrease_small = cost - cost_trial <= options.ftol * cost;
                x = trial;
                r = r_trial;
                cost = cost_trial;
                lambda = (lambda * LAMBDA_SHRINK).max(LAMBDA_MIN);
                converged = step_small || decrease_small;
                accepted = true;
                break;
            }
            lambda *= LAMBDA_GROW;
        }
        if converged || !accepted {
            break;
        }
    }

    Solution {
        x,
        cost,
        converged,
        iterations,
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Solves (T + λI)·s = −g by the Thomas algorithm, where T is the symmetric tridiagonal matrix
/// with main diagonal `diag` and off-diagonal `off`. T is positive semidefinite (it is a JᵀJ)
/// and λ > 0, so the sweep needs no pivoting.
fn solve_damped_tridiagonal(diag: &[f64], off: &[f64], g: &[f64], lambda: f64) -> Vec<f64> {
    let n = diag.len();
    let mut upper = vec![0.0; n];
    let mut solution = vec![0.0; n];
    let mut pivot = diag[0] + lambda;
    if n > 1 {
        upper[0] = off[0] / pivot;
    }
    solution[0] = -g[0] / pivot;
    for i in 1..n {
        pivot = diag[i] + lambda - off[i - 1] * upper[i - 1];
        if i + 1 < n {
            upper[i] = off[i] / pivot;
        }
        solution[i] = (-g[i] - off[i - 1] * solution[i - 1]) / pivot;
    }
    for i in (0..n.saturating_sub(1)).rev() {
        solution[i] = solution[i] - upper[i] * solution[i + 1];
    }
    solution
}
