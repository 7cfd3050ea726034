//! This crate contains the clause-exchange format used to hand propositional formulas to SAT
//! solvers and to read their answers back.
//!
//! - [`Cnf`] is an in-memory formula over variables `1..=num_variables`.
//! - [`write_cnf`] serialises a formula in the DIMACS CNF format: a `p cnf <vars> <clauses>`
//!   header followed by one `0`-terminated clause per line.
//! - [`parse_cnf`] reads a DIMACS CNF source into any [`DimacsSink`], of which [`Cnf`] is one.
//! - [`SolverOutput`] parses the output of a solver which follows the SAT competition
//!   conventions (`s SATISFIABLE`, `v 1 -2 3 0`, ...).

mod cnf;
mod parser;
mod solver_output;
mod writer;

pub use cnf::*;
pub use parser::*;
pub use solver_output::*;
pub use writer::*;
