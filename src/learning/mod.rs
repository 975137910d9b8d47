//! learning — maximum-likelihood weight learning for Markov logic networks.
//!
//! Purpose
//! -------
//! Fit one real weight per formula of a [`MarkovLogicNetwork`] so that the
//! training data are as likely as possible under a pluggable
//! [`LearningObjective`]. Formulas the model marks as fixed-weight are not
//! optimized: their weight is `ln(c / Z)`, computed once from the training
//! database, and held constant while the optimizer searches over the rest.
//!
//! Key behaviors
//! -------------
//! - [`fixed_weights`] computes the analytic weights and rejects formulas
//!   whose statistics leave the logarithm undefined.
//! - [`projection`] maps between the full weight vector and the reduced
//!   (free-only) vector the optimizer sees.
//! - [`objective`] wraps a learning objective so that it is evaluated in
//!   full space while the optimizer works in reduced space.
//! - [`driver`] sequences a run and reports the optimizer's diagnostics.
//! - [`semantics`] ships an exact closed-world likelihood over enumerated
//!   worlds and a soft-evidence wrapper.
//!
//! Conventions
//! -----------
//! - Weight vectors are `ndarray` vectors indexed by formula index.
//! - The model is only read; learned weights are returned, not written back.
//! - Errors are [`LearnError`]; model failures arrive wrapped unchanged.

pub mod driver;
pub mod errors;
pub mod fixed_weights;
pub mod model;
pub mod objective;
pub mod options;
pub mod projection;
pub mod semantics;
pub mod types;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::driver::{
    BackendStatus, Diagnostics, LearnOutcome, LearnerPhase, LearnerState, WeightLearner,
};
pub use self::errors::{LearnError, LearnResult, ModelError, ModelResult, WeightSpace};
pub use self::fixed_weights::{compute_fixed_weights, satisfaction_stats, SatisfactionStats};
pub use self::model::{EvidenceMode, Grounding, Groundings, MarkovLogicNetwork};
pub use self::objective::{LearningObjective, ObjectiveAdapter};
pub use self::options::LearnOptions;
pub use self::projection::{FixedWeights, WeightProjector};
pub use self::semantics::{ExhaustiveLikelihood, SoftEvidence};
pub use self::types::Weights;

pub mod prelude {
    pub use super::driver::{BackendStatus, LearnOutcome, LearnerPhase, WeightLearner};
    pub use super::errors::{LearnError, LearnResult, ModelError, ModelResult};
    pub use super::model::{EvidenceMode, Grounding, Groundings, MarkovLogicNetwork};
    pub use super::objective::LearningObjective;
    pub use super::options::LearnOptions;
    pub use super::types::Weights;
}
