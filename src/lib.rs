//! mln_learn — maximum-likelihood weight learning for Markov logic networks.
//!
//! Purpose
//! -------
//! Learn formula weights of a Markov logic network by maximizing the
//! log-likelihood of a training database with L-BFGS, while formulas marked
//! as fixed-weight receive a closed-form weight and stay out of the search.
//!
//! Key behaviors
//! -------------
//! - [`learning`] holds the model/objective traits, fixed-weight statistics,
//!   the full/reduced weight projection and the [`learning::WeightLearner`]
//!   driver.
//! - [`optimization`] holds the Argmin-backed maximizer the driver delegates
//!   to, behind the default `lbfgs` feature.
//!
//! Conventions
//! -----------
//! - Progress and diagnostics go through the `log` facade; install any
//!   logger to see them. With the `obs_slog` feature and `verbose` set, the
//!   solver additionally reports every iteration through slog.
//! - Without the `lbfgs` feature the crate still builds: options can be
//!   parsed and validated, and running a learner fails immediately with a
//!   configuration error.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module.
//! - `tests/integration_weight_learning.rs` runs the learner end to end on a
//!   small in-memory network with an exact likelihood.

pub mod learning;
pub mod optimization;
