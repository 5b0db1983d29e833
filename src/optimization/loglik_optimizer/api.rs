//! High-level entry point for maximizing a `LogLikelihood`.
//!
//! Picks the L-BFGS flavour from the options, wraps the model in an
//! `ArgMinAdapter` (which minimizes `-ℓ(θ)`) and delegates to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Parameters
/// - `f`: model implementing [`LogLikelihood`].
/// - `theta0`: initial unconstrained parameter vector (consumed).
/// - `data`: model data passed through to `value`/`grad`.
/// - `opts`: tolerances, line search and memory.
///
/// # Errors
/// - Anything returned by `f.check(theta0, data)`.
/// - Builder errors for rejected tolerances.
/// - Runtime errors from the solve (line-search failures, model errors).
///
/// # Returns
/// An [`OptimOutcome`] with `theta_hat`, `ℓ(θ̂)`, termination status and
/// evaluation counters.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
