//! The contracts of the SAT and SMT oracles and their implementations.
//!
//! An oracle is a black box which decides a problem produced by one of the
//! [`encoders`](crate::encoders). Every call is blocking and takes an optional timeout; an oracle
//! which runs out of time reports [`SatisfactionOutcome::Unknown`] rather than an error.
//!
//! Two kinds of oracles are provided:
//! - built-in reference oracles ([`DpllOracle`], [`BacktrackingSmtOracle`]), suitable for small
//!   instances and tests;
//! - external-process oracles ([`ExternalSatOracle`], [`ExternalSmtOracle`]) which run a solver
//!   binary on an exchange file.
mod backtracking;
mod dpll;
mod external;
mod outcome;
pub mod termination;

use std::num::NonZeroI32;
use std::time::Duration;

pub use backtracking::BacktrackingSmtOracle;
use dimacs_format::Cnf;
use dimacs_format::SolverOutputError;
pub use dpll::DpllOracle;
pub use external::ExternalSatOracle;
pub use external::ExternalSmtOracle;
pub use outcome::*;
use thiserror::Error;

use crate::smt::SmtModel;
use crate::smt::SmtProblem;
use crate::smt::SmtVariable;

/// Decides the satisfiability of a CNF formula.
pub trait SatOracle {
    /// Solve `formula`, giving up after `timeout` if one is given.
    ///
    /// A satisfiable outcome carries the literals which are true in the model.
    fn solve(
        &mut self,
        formula: &Cnf,
        timeout: Option<Duration>,
    ) -> Result<SatisfactionOutcome<Vec<NonZeroI32>>, OracleError>;
}

/// Decides systems of integer constraints.
pub trait SmtOracle {
    /// Find any model of `problem`.
    fn check(
        &mut self,
        problem: &SmtProblem,
        timeout: Option<Duration>,
    ) -> Result<SatisfactionOutcome<SmtModel>, OracleError>;

    /// Find a model of `problem` with the smallest value for `objective`.
    fn minimise(
        &mut self,
        problem: &SmtProblem,
        objective: SmtVariable,
        timeout: Option<Duration>,
    ) -> Result<OptimisationOutcome, OracleError>;
}

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("failed to run the solver")]
    Io(#[from] std::io::Error),

    #[error("the solver output could not be understood: {0}")]
    MalformedOutput(String),

    #[error("invalid SAT solver output")]
    SolverOutput(#[from] SolverOutputError),

    #[error("the oracle does not support {0}")]
    Unsupported(String),
}
