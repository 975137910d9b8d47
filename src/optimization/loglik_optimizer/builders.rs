//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! The builders pick a line search, apply the history size and the optional
//! gradient/cost tolerances from [`MLEOptions`], and nothing else. The
//! starting point and iteration cap are runtime concerns applied by the
//! runner (`run_lbfgs`).
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
            DEFAULT_LBFGS_MEM,
        },
    },
};

/// L-BFGS with Hager–Zhang line search.
///
/// # Errors
/// Argmin rejecting a tolerance surfaces as an `OptError`.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// L-BFGS with More–Thuente line search.
///
/// # Errors
/// Argmin rejecting a tolerance surfaces as an `OptError`.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Apply the optional gradient-norm and cost-change tolerances.
///
/// A `None` tolerance leaves Argmin's default in place.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::traits::{LineSearcher, Tolerances};

    #[test]
    // Purpose
    // -------
    // Both line-search builders accept default and explicit history sizes.
    //
    // Given
    // -----
    // - Valid tolerances with `lbfgs_mem` of `None` and `Some(11)`.
    //
    // Expect
    // ------
    // - Every builder call returns `Ok(_)`.
    fn builders_accept_default_and_explicit_memory() {
        // Arrange
        let tols = Tolerances::new(Some(1e-5), Some(1e-9), Some(50))
            .expect("Tolerances should be valid");
        let default_mem = MLEOptions::new(tols, LineSearcher::HagerZhang, false, None)
            .expect("MLEOptions should be valid");
        let explicit_mem = MLEOptions::new(tols, LineSearcher::MoreThuente, false, Some(11))
            .expect("MLEOptions should be valid");

        // Act & Assert
        assert!(build_optimizer_hager_zhang(&default_mem).is_ok());
        assert!(build_optimizer_hager_zhang(&explicit_mem).is_ok());
        assert!(build_optimizer_more_thuente(&default_mem).is_ok());
        assert!(build_optimizer_more_thuente(&explicit_mem).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `configure_lbfgs` is a no-op when only an iteration cap is configured.
    fn configure_lbfgs_respects_absent_tolerances() {
        // Arrange
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(5)).expect("Tolerances should be valid");
        let opts = MLEOptions::new(tols, LineSearcher::MoreThuente, false, None)
            .expect("MLEOptions should be valid");

        // Act
        let configured = configure_lbfgs(raw, &opts);

        // Assert
        assert!(configured.is_ok());
    }
}
