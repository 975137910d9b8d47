//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        adapter::ArgMinAdapter,
        traits::{LogLikelihood, MLEOptions, OptimOutcome, WarnFlag},
        types::{Grad, Theta, DEFAULT_ITERS_PER_PARAM},
    },
};
use argmin::core::{
    CostFunction, Executor, Gradient, State, TerminationReason, TerminationStatus,
};

/// Run an `argmin` solver for a log-likelihood problem.
///
/// Wires the adapted problem, the solver, the starting point `theta0` and
/// the iteration cap, executes, and converts the final state into an
/// [`OptimOutcome`]. When `opts.tols.max_iter` is `None` the cap is
/// `DEFAULT_ITERS_PER_PARAM × theta0.len()`.
///
/// Stopping at the cap or for any other non-convergent reason is *not* an
/// error: the outcome carries the best parameters found and a non-zero
/// [`WarnFlag`]. A failure of the objective itself is, even when argmin
/// only reported it as a line-search exit.
///
/// # Feature flags
/// With `obs_slog` and `opts.verbose == true`, a terminal slog observer is
/// attached with `ObserverMode::Always`.
///
/// # Errors
/// - The first error the objective returned during the run.
/// - Any other `argmin` runtime error, converted through
///   `From<argmin::core::Error>`.
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood + ?Sized,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    if log::log_enabled!(log::Level::Debug) {
        log_initial_state(&theta0, &problem)?;
    }
    let max_iter = opts.tols.max_iter.unwrap_or(DEFAULT_ITERS_PER_PARAM * theta0.len().max(1));

    let watcher = problem.clone();
    let optimizer = Executor::new(problem, solver)
        .configure(|state| state.param(theta0).max_iters(max_iter as u64));
    #[cfg(feature = "obs_slog")]
    let optimizer = if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always)
    } else {
        optimizer
    };

    let mut result = optimizer.run()?.state().clone();
    if let Some(err) = watcher.take_failure() {
        log::debug!("objective failed during the run: {err}");
        return Err(err);
    }
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient().map(|g| -g);
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        warn_flag_for(&termination),
        format!("{termination:?}"),
        iterations,
        function_counts,
        grad,
    )
}

/// Map a backend termination status onto the crate's convergence code.
pub fn warn_flag_for(status: &TerminationStatus) -> WarnFlag {
    match status {
        TerminationStatus::Terminated(
            TerminationReason::SolverConverged | TerminationReason::TargetCostReached,
        ) => WarnFlag::Converged,
        TerminationStatus::Terminated(TerminationReason::MaxItersReached) => {
            WarnFlag::MaxIterations
        }
        _ => WarnFlag::EarlyExit,
    }
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood + ?Sized,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.dot(&g).sqrt());
    log::debug!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::{errors::OptError, loglik_optimizer::api::maximize};
    use ndarray::array;

    /// ℓ(θ) = -(θ - 3)², unavailable for |θ| > 0.5.
    struct ShortReach;

    impl LogLikelihood for ShortReach {
        fn value(&self, theta: &Theta) -> OptResult<f64> {
            if theta[0].abs() > 0.5 {
                return Err(OptError::ObjectiveFailed { text: "evidence store unreachable".into() });
            }
            Ok(-(theta[0] - 3.0).powi(2))
        }

        fn grad(&self, theta: &Theta) -> OptResult<Grad> {
            Ok(array![-2.0 * (theta[0] - 3.0)])
        }
    }

    #[test]
    // Purpose
    // -------
    // An objective failure hit inside the line search is returned as an
    // error instead of an early-exit outcome.
    //
    // Given
    // -----
    // - The maximum at θ = 3 lies outside the region where ℓ is available;
    //   the first L-BFGS step leaves it.
    //
    // Expect
    // ------
    // - `Err(ObjectiveFailed)` carrying the objective's message.
    fn objective_failure_in_line_search_is_an_error() {
        // Act
        let result = maximize(&ShortReach, array![0.0], &MLEOptions::default());

        // Assert
        assert_eq!(
            result,
            Err(OptError::ObjectiveFailed { text: "evidence store unreachable".into() })
        );
    }

    #[test]
    // Purpose
    // -------
    // Termination reasons map onto the documented warning codes.
    fn warn_flag_codes_follow_termination_reason() {
        assert_eq!(
            warn_flag_for(&TerminationStatus::Terminated(TerminationReason::SolverConverged)),
            WarnFlag::Converged
        );
        assert_eq!(
            warn_flag_for(&TerminationStatus::Terminated(TerminationReason::MaxItersReached))
                .code(),
            1
        );
        assert_eq!(warn_flag_for(&TerminationStatus::NotTerminated), WarnFlag::EarlyExit);
    }
}
