//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Callers implement [`LogLikelihood`] and invoke [`maximize`] to run L-BFGS
//! with a configurable line search, tolerances, and a finite-difference
//! fallback for objectives without an analytic gradient.
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the cost `c(θ) = -ℓ(θ)`.
//! - [`maximize`] validates the starting point, builds the solver
//!   ([`builders`]) and runs it ([`run::run_lbfgs`]).
//! - [`OptimOutcome`] reports the best parameters, `ℓ(θ̂)`, counters, the
//!   last gradient, and a [`WarnFlag`] that is non-zero whenever the solver
//!   stopped without meeting its tolerance.
//!
//! Feature gating
//! --------------
//! `adapter`, `api`, `builders` and `run` require the `lbfgs` feature.
//! `traits`, `types` and `validation` are always compiled.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions and the FD fallback ([`adapter`]),
//!   solver construction ([`builders`]), termination mapping ([`run`]),
//!   configuration and outcome invariants ([`traits`], [`validation`]).
//! - End-to-end behavior is exercised through weight learning in the
//!   `learning` module and the integration tests.

#[cfg(feature = "lbfgs")]
pub mod adapter;
#[cfg(feature = "lbfgs")]
pub mod api;
#[cfg(feature = "lbfgs")]
pub mod builders;
#[cfg(feature = "lbfgs")]
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

#[cfg(feature = "lbfgs")]
pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances, WarnFlag};
pub use self::types::{Cost, FnEvalMap, Grad, Theta, DEFAULT_LBFGS_MEM, DEFAULT_TOL_GRAD};

pub mod prelude {
    #[cfg(feature = "lbfgs")]
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances, WarnFlag};
    pub use super::types::{Cost, Grad, Theta};
}
