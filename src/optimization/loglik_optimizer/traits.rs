//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait implemented by anything the optimizer maximizes.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`LineSearcher`]: choice of line search used by L-BFGS.
//! - [`WarnFlag`]: numeric convergence code attached to every outcome.
//! - [`OptimOutcome`]: normalized result returned by `maximize`.
//!
//! Convention: we *maximize* `ℓ(θ)` by minimizing the cost `c(θ) = -ℓ(θ)`.
//! Analytic gradients are gradients of `ℓ`; the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_TOL_GRAD},
        validation::{
            validate_theta0, validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad,
        },
    },
};
use std::{fmt, str::FromStr};

/// Log-likelihood interface seen by the optimizer.
///
/// Required:
/// - `value(&Theta) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
///
/// Optional:
/// - `check(&Theta)`: reject an invalid starting point before the solver
///   runs. The default rejects non-finite entries.
/// - `grad(&Theta)`: analytic gradient `∇ℓ(θ)`. When absent the adapter
///   falls back to finite differences.
pub trait LogLikelihood {
    fn value(&self, theta: &Theta) -> OptResult<Cost>;

    fn check(&self, theta: &Theta) -> OptResult<()> {
        validate_theta0(theta)
    }

    fn grad(&self, _theta: &Theta) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
///
/// Parsing is case-insensitive (`"MoreThuente"`, `"hagerzhang"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Default:
/// - `tols`: `tol_grad = 1e-5`, `tol_cost = None`, `max_iter = None`
///   (the runner then allows a budget proportional to the parameter count)
/// - `line_searcher`: `MoreThuente`
/// - `verbose`: `false`
/// - `lbfgs_mem`: `None` (uses [`DEFAULT_LBFGS_MEM`](super::types::DEFAULT_LBFGS_MEM))
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Create a new set of optimizer options.
    ///
    /// # Errors
    /// [`OptError::InvalidLBFGSMem`] when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(0) = lbfgs_mem {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances { tol_grad: Some(DEFAULT_TOL_GRAD), tol_cost: None, max_iter: None },
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: terminate when the gradient norm falls below this threshold.
/// - `tol_cost`: terminate when the change in cost falls below this threshold.
/// - `max_iter`: hard cap on the number of iterations.
///
/// At least one of the three must be provided (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(0) = max_iter {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

/// Convergence code reported alongside every optimizer outcome.
///
/// `0` means the solver met its own tolerance. Any other value means the
/// returned parameters are the best estimate found, not a converged one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarnFlag {
    Converged,
    /// The iteration cap was hit first.
    MaxIterations,
    /// The solver stopped for another reason (solver exit, interrupt, timeout).
    EarlyExit,
}

impl WarnFlag {
    pub fn code(self) -> u8 {
        match self {
            WarnFlag::Converged => 0,
            WarnFlag::MaxIterations => 1,
            WarnFlag::EarlyExit => 2,
        }
    }

    pub fn is_converged(self) -> bool {
        self == WarnFlag::Converged
    }
}

impl fmt::Display for WarnFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarnFlag::Converged => write!(f, "converged"),
            WarnFlag::MaxIterations => write!(f, "maximum number of iterations reached"),
            WarnFlag::EarlyExit => write!(f, "solver stopped before convergence"),
        }
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `warn_flag`: convergence code; `converged` mirrors `warn_flag == Converged`.
/// - `status`: termination status as reported by the backend.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by the backend.
/// - `grad`: last available gradient of `ℓ` and its norm.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub warn_flag: WarnFlag,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad: Option<Grad>,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver results.
    ///
    /// `grad` is the gradient of the log-likelihood (already sign-flipped
    /// from the cost gradient by the caller).
    ///
    /// # Errors
    /// Propagates validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, warn_flag: WarnFlag, status: String,
        iterations: u64, fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let grad_norm = grad.as_ref().map(|g| g.dot(g).sqrt());
        Ok(Self {
            theta_hat,
            value,
            converged: warn_flag.is_converged(),
            warn_flag,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad,
            grad_norm,
        })
    }

    /// Number of cost evaluations, `0` when the backend did not report it.
    pub fn cost_count(&self) -> u64 {
        self.fn_evals.get("cost_count").copied().unwrap_or(0)
    }

    /// Number of gradient evaluations, `0` when the backend did not report it.
    pub fn gradient_count(&self) -> u64 {
        self.fn_evals.get("gradient_count").copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // `Tolerances::new` enforces "at least one stopping rule" and a positive
    // iteration cap.
    fn tolerances_require_a_stopping_rule_and_positive_cap() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(1e-5), None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0, .. })
        ));
        assert!(Tolerances::new(None, None, Some(1)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Line searchers parse case-insensitively and reject unknown names.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("moreThuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Default options use the learning gradient tolerance and leave the
    // iteration cap to the runner.
    fn default_options_use_learning_tolerance() {
        let opts = MLEOptions::default();
        assert_eq!(opts.tols.tol_grad, Some(DEFAULT_TOL_GRAD));
        assert_eq!(opts.tols.max_iter, None);
        assert!(MLEOptions::new(opts.tols, LineSearcher::HagerZhang, false, Some(0)).is_err());
    }

    #[test]
    // Purpose
    // -------
    // The outcome derives `converged`, the gradient norm, and counter
    // lookups from its inputs.
    //
    // Given
    // -----
    // - A capped run (`WarnFlag::MaxIterations`) with gradient (3, 4).
    //
    // Expect
    // ------
    // - `converged == false`, code 1, `grad_norm == 5`, missing counters
    //   read as 0.
    fn outcome_reports_flag_norm_and_counts() {
        // Arrange
        let mut counts = FnEvalMap::new();
        counts.insert("cost_count".to_string(), 4);

        // Act
        let out = OptimOutcome::new(
            Some(array![1.0, 2.0]),
            -0.5,
            WarnFlag::MaxIterations,
            "Terminated(MaxItersReached)".to_string(),
            1,
            counts,
            Some(array![3.0, 4.0]),
        )
        .expect("outcome should validate");

        // Assert
        assert!(!out.converged);
        assert_eq!(out.warn_flag.code(), 1);
        assert_eq!(out.grad_norm, Some(5.0));
        assert_eq!(out.cost_count(), 4);
        assert_eq!(out.gradient_count(), 0);
    }
}
