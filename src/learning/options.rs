//! Run parameters for weight learning.
//!
//! [`LearnOptions`] carries the learner's own switch (start from the model's
//! weights or from zero) and the optimizer configuration, which is passed to
//! the backend unmodified. String parameters can be applied one at a time
//! with [`LearnOptions::with_param`]:
//!
//! | key               | meaning                                   |
//! |-------------------|-------------------------------------------|
//! | `initial_weights` | start from the model's weights (`bool`)   |
//! | `gtol`            | gradient-norm tolerance (default `1e-5`)  |
//! | `ftol`            | cost-change tolerance                     |
//! | `maxiter`         | iteration cap                             |
//! | `line_search`     | `MoreThuente` or `HagerZhang`             |
//! | `lbfgs_mem`       | L-BFGS history size                       |
//! | `verbose`         | attach the progress observer (`bool`)     |
use std::str::FromStr;

use crate::{
    learning::errors::{LearnError, LearnResult},
    optimization::loglik_optimizer::traits::{LineSearcher, MLEOptions, Tolerances},
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LearnOptions {
    /// Start from the model's current weights instead of the zero vector.
    pub use_initial_weights: bool,
    pub mle: MLEOptions,
}

impl LearnOptions {
    pub fn new(use_initial_weights: bool, mle: MLEOptions) -> Self {
        Self { use_initial_weights, mle }
    }

    pub fn with_initial_weights(mut self, use_initial_weights: bool) -> Self {
        self.use_initial_weights = use_initial_weights;
        self
    }

    /// Apply one string parameter.
    ///
    /// # Errors
    /// - [`LearnError::InvalidOption`] for unknown keys or unparsable values.
    /// - [`LearnError::Optimization`] when the parsed value fails optimizer
    ///   validation (e.g. a non-positive tolerance).
    pub fn with_param(mut self, key: &str, value: &str) -> LearnResult<Self> {
        let tols = self.mle.tols;
        match key {
            "initial_weights" => self.use_initial_weights = parse(key, value)?,
            "gtol" => {
                self.mle.tols =
                    Tolerances::new(Some(parse(key, value)?), tols.tol_cost, tols.max_iter)?
            }
            "ftol" => {
                self.mle.tols =
                    Tolerances::new(tols.tol_grad, Some(parse(key, value)?), tols.max_iter)?
            }
            "maxiter" => {
                self.mle.tols =
                    Tolerances::new(tols.tol_grad, tols.tol_cost, Some(parse(key, value)?))?
            }
            "line_search" => self.mle.line_searcher = LineSearcher::from_str(value)?,
            "lbfgs_mem" => {
                let mem = parse(key, value)?;
                self.mle = MLEOptions::new(tols, self.mle.line_searcher, self.mle.verbose, Some(mem))?;
            }
            "verbose" => self.mle.verbose = parse(key, value)?,
            _ => {
                return Err(LearnError::InvalidOption {
                    key: key.to_string(),
                    value: value.to_string(),
                    reason: "unknown option",
                })
            }
        }
        Ok(self)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> LearnResult<T> {
    value.trim().parse().map_err(|_| LearnError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
        reason: "value could not be parsed",
    })
}
