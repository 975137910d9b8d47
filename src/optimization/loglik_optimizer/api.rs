//! High-level entry point for maximizing a [`LogLikelihood`].
//!
//! Selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the objective in an `ArgMinAdapter` (which *minimizes*
//! `-ℓ(θ)`), and delegates the run to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome},
        types::Theta,
    },
};

/// Maximize `ℓ(θ)` from `theta0` using L-BFGS with the configured line search.
///
/// # Errors
/// - Propagates any error from `f.check(&theta0)`.
/// - Propagates builder errors (rejected tolerances).
/// - Propagates runtime errors from `run_lbfgs`.
///
/// # Example
/// ```
/// use mln_learn::optimization::errors::OptResult;
/// use mln_learn::optimization::loglik_optimizer::{maximize, LogLikelihood, MLEOptions, Theta};
/// use ndarray::array;
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     fn value(&self, theta: &Theta) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn grad(&self, theta: &Theta) -> OptResult<Theta> {
///         Ok(theta.mapv(|t| -2.0 * t))
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.5, -0.25], &MLEOptions::default())?;
/// assert!(out.converged);
/// assert!(out.theta_hat.iter().all(|t| t.abs() < 1e-4));
/// # Ok::<(), mln_learn::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood + ?Sized>(
    f: &F, theta0: Theta, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0)?;
    let problem = ArgMinAdapter::new(f);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
