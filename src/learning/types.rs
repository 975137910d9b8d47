//! Numeric aliases for weight learning.
//!
//! Weight vectors share the optimizer's `Theta` representation so reduced
//! vectors can be handed to the solver without conversion.
use crate::optimization::loglik_optimizer::types::Theta;

/// A weight vector, either full (one entry per formula) or reduced (one
/// entry per free formula).
pub type Weights = Theta;
