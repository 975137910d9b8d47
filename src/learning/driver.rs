//! The weight-learning driver.
//!
//! Purpose
//! -------
//! Fit formula weights by maximum likelihood. [`WeightLearner::run`]:
//!
//! 1. refuses to start when the optimization backend is not available,
//! 2. builds the initial full weight vector (zeros, or the model's weights),
//! 3. computes the fixed weights and the fixed/free partition,
//! 4. projects the start to the reduced space (phase `Initialized`),
//! 5. runs L-BFGS on `-ℓ` through the [`ObjectiveAdapter`] (`Optimizing`),
//! 6. expands the solution back to a full vector (`Converged`).
//!
//! Any failure after step 1 leaves the driver in `Failed`.
//!
//! Invariants
//! ----------
//! - The optimizer only sees free weights; fixed weights appear in the
//!   result exactly as computed.
//! - The model is only read. Writing the learned weights back is the
//!   caller's decision.
//! - A run that stops without converging still succeeds; the non-zero
//!   [`WarnFlag`] in [`Diagnostics`] says so and is also logged at `warn`.
use crate::{
    learning::{
        errors::{LearnError, LearnResult},
        fixed_weights::compute_fixed_weights,
        model::MarkovLogicNetwork,
        objective::{LearningObjective, ObjectiveAdapter},
        options::LearnOptions,
        projection::WeightProjector,
        types::Weights,
    },
    optimization::loglik_optimizer::traits::{MLEOptions, WarnFlag},
};

/// Whether the quasi-Newton backend was compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Available,
    Unavailable,
}

impl BackendStatus {
    pub const fn detect() -> Self {
        if cfg!(feature = "lbfgs") {
            BackendStatus::Available
        } else {
            BackendStatus::Unavailable
        }
    }

    /// # Errors
    /// [`LearnError::BackendUnavailable`] when the backend is missing.
    pub fn require(self) -> LearnResult<()> {
        match self {
            BackendStatus::Available => Ok(()),
            BackendStatus::Unavailable => Err(backend_unavailable()),
        }
    }
}

fn backend_unavailable() -> LearnError {
    LearnError::BackendUnavailable {
        backend: "lbfgs",
        hint: "rebuild with the `lbfgs` cargo feature to enable weight learning",
    }
}

/// Lifecycle of a [`WeightLearner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnerPhase {
    Uninitialized,
    Initialized,
    Optimizing,
    /// The run finished and returned weights. This includes stops at the
    /// iteration cap or early solver exits; check
    /// [`Diagnostics::converged`] for whether the tolerance was met.
    Converged,
    Failed,
}

/// Mutable state of one learning run.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerState {
    /// Current reduced weight vector.
    pub wt: Weights,
    pub projector: WeightProjector,
    pub options: LearnOptions,
}

/// What the optimizer reported about the final point.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    /// `ℓ` at the returned weights.
    pub log_likelihood: f64,
    /// Last reduced-space gradient of `ℓ`, when the backend kept one.
    pub gradient: Option<Weights>,
    pub grad_norm: Option<f64>,
    pub iterations: usize,
    pub cost_calls: u64,
    pub gradient_calls: u64,
    pub warn_flag: WarnFlag,
    pub status: String,
}

impl Diagnostics {
    pub fn converged(&self) -> bool {
        self.warn_flag.is_converged()
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnOutcome {
    /// One weight per formula, in formula-index order.
    pub weights: Weights,
    pub diagnostics: Diagnostics,
}

/// Maximum-likelihood weight learner over a borrowed model.
///
/// One learner per model/database; `run` takes `&mut self`.
#[derive(Debug)]
pub struct WeightLearner<'m, M: ?Sized, O> {
    model: &'m M,
    objective: O,
    backend: BackendStatus,
    phase: LearnerPhase,
    state: Option<LearnerState>,
    weights: Option<Weights>,
}

impl<'m, M, O> WeightLearner<'m, M, O>
where
    M: MarkovLogicNetwork + ?Sized,
    O: LearningObjective,
{
    pub fn new(model: &'m M, objective: O) -> Self {
        Self::with_backend(model, objective, BackendStatus::detect())
    }

    /// Construct with an explicit backend status instead of detecting it.
    pub fn with_backend(model: &'m M, objective: O, backend: BackendStatus) -> Self {
        Self {
            model,
            objective,
            backend,
            phase: LearnerPhase::Uninitialized,
            state: None,
            weights: None,
        }
    }

    pub fn phase(&self) -> LearnerPhase {
        self.phase
    }

    pub fn state(&self) -> Option<&LearnerState> {
        self.state.as_ref()
    }

    /// Full weight vector of the last successful run.
    pub fn weights(&self) -> Option<&Weights> {
        self.weights.as_ref()
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    /// Learn the formula weights.
    ///
    /// # Errors
    /// - [`LearnError::BackendUnavailable`] before any work is done.
    /// - Fixed-weight, model, shape and optimizer errors; the learner is
    ///   then in [`LearnerPhase::Failed`].
    pub fn run(&mut self, options: &LearnOptions) -> LearnResult<LearnOutcome> {
        self.backend.require()?;
        match self.try_run(options) {
            Ok(outcome) => {
                self.phase = LearnerPhase::Converged;
                self.weights = Some(outcome.weights.clone());
                Ok(outcome)
            }
            Err(err) => {
                self.phase = LearnerPhase::Failed;
                Err(err)
            }
        }
    }

    fn try_run(&mut self, options: &LearnOptions) -> LearnResult<LearnOutcome> {
        let n_formulas = self.model.formula_count();
        let initial = if options.use_initial_weights {
            self.model.current_weights()?
        } else {
            Weights::zeros(n_formulas)
        };

        let fixed = compute_fixed_weights(self.model, self.objective.evidence_mode())?;
        let projector = WeightProjector::new(n_formulas, fixed)?;
        let wt = projector.project(&initial)?.into_owned();
        let state = self.state.insert(LearnerState { wt, projector, options: options.clone() });
        self.phase = LearnerPhase::Initialized;

        log::info!(
            "starting optimization: {} formulas, {} fixed, {} free",
            n_formulas,
            state.projector.fixed().len(),
            state.projector.n_free()
        );
        self.phase = LearnerPhase::Optimizing;

        let adapter = ObjectiveAdapter::new(&self.objective, &state.projector);
        let (reduced, diagnostics) = if state.projector.n_free() == 0 {
            nothing_to_optimize(&adapter, &state.wt)?
        } else {
            minimize(&adapter, state.wt.clone(), &options.mle)?
        };
        let weights = state.projector.expand(&reduced)?.into_owned();
        state.wt = reduced;

        report(&diagnostics);
        Ok(LearnOutcome { weights, diagnostics })
    }
}

/// Every formula is fixed: evaluate once, no solver involved.
fn nothing_to_optimize<O: LearningObjective + ?Sized>(
    adapter: &ObjectiveAdapter<'_, O>, wt: &Weights,
) -> LearnResult<(Weights, Diagnostics)> {
    let diagnostics = Diagnostics {
        log_likelihood: adapter.evaluate(wt)?,
        gradient: None,
        grad_norm: None,
        iterations: 0,
        cost_calls: 1,
        gradient_calls: 0,
        warn_flag: WarnFlag::Converged,
        status: "no free weights".to_string(),
    };
    Ok((wt.clone(), diagnostics))
}

#[cfg(feature = "lbfgs")]
fn minimize<O: LearningObjective + ?Sized>(
    adapter: &ObjectiveAdapter<'_, O>, wt: Weights, mle: &MLEOptions,
) -> LearnResult<(Weights, Diagnostics)> {
    let out = crate::optimization::loglik_optimizer::maximize(adapter, wt, mle)?;
    let diagnostics = Diagnostics {
        log_likelihood: out.value,
        gradient_calls: out.gradient_count(),
        cost_calls: out.cost_count(),
        gradient: out.grad,
        grad_norm: out.grad_norm,
        iterations: out.iterations,
        warn_flag: out.warn_flag,
        status: out.status,
    };
    Ok((out.theta_hat, diagnostics))
}

#[cfg(not(feature = "lbfgs"))]
fn minimize<O: LearningObjective + ?Sized>(
    _adapter: &ObjectiveAdapter<'_, O>, _wt: Weights, _mle: &MLEOptions,
) -> LearnResult<(Weights, Diagnostics)> {
    Err(backend_unavailable())
}

fn report(diagnostics: &Diagnostics) {
    log::info!(
        "log-likelihood: {:.16}, gradient norm: {}, iterations: {}, function evaluations: {}, \
         warning flag: {}",
        diagnostics.log_likelihood,
        diagnostics.grad_norm.map_or_else(|| "n/a".to_string(), |n| format!("{n:.3e}")),
        diagnostics.iterations,
        diagnostics.cost_calls,
        diagnostics.warn_flag.code()
    );
    if !diagnostics.converged() {
        log::warn!(
            "weight learning did not converge ({}): {}",
            diagnostics.warn_flag,
            diagnostics.status
        );
    }
}
