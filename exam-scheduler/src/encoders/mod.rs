//! Translations of a [`ConflictGraph`](crate::graph::ConflictGraph) into problems for an oracle.
//!
//! - [`encode_coloring`] turns slot assignment into graph k-coloring expressed as a CNF formula.
//! - [`encode_joint`] and [`encode_joint_minimising_conflicts`] turn joint slot and room
//!   assignment into integer arithmetic constraints.
//!
//! Encoders are pure functions: they keep no state between calls, and the same inputs always
//! produce the same numbering.
mod coloring;
mod joint;

pub use coloring::*;
pub use joint::*;
