//! Oracles which run a solver binary on an exchange file.
//!
//! The instance is written to a fresh file in the temporary directory and passed as the last
//! argument. The standard output of the solver is captured to a log file which is parsed once
//! the solver exits. A solver which is still running when the timeout expires is killed and the
//! outcome is unknown.
mod process;
mod sat;
mod smt;
mod smt_output;

pub use sat::ExternalSatOracle;
pub use smt::ExternalSmtOracle;
