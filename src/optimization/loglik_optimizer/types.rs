//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the numeric types used by the log-likelihood optimizer so the
//! learner and the solver layer agree on vector shapes without spelling out
//! `ndarray` or Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors whose length is the number of
//!   parameters the solver moves (for weight learning: the free formulas).
//! - `Cost` is the scalar the solver minimizes, `c(θ) = -ℓ(θ)`.
//! - Solver aliases exist only when the `lbfgs` backend is compiled in.
#[cfg(feature = "lbfgs")]
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Parameter vector `θ` for log-likelihood optimization.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, shaped like `Theta`.
pub type Grad = Array1<f64>;

/// Scalar objective value used by the optimizer.
///
/// This is the cost `c(θ) = -ℓ(θ)` derived from a log-likelihood `ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`, `"gradient_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default gradient-norm tolerance for convergence.
pub const DEFAULT_TOL_GRAD: f64 = 1e-5;

/// Iteration budget per free parameter when no explicit cap is configured.
pub const DEFAULT_ITERS_PER_PARAM: usize = 200;

/// Hager–Zhang line search specialized to this crate’s numeric types.
#[cfg(feature = "lbfgs")]
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
#[cfg(feature = "lbfgs")]
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
#[cfg(feature = "lbfgs")]
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
#[cfg(feature = "lbfgs")]
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
