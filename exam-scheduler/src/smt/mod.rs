//! A small typed language of integer constraints, the form in which joint slot and room
//! assignment is handed to an SMT oracle.
mod constraint;
mod model;
mod smtlib;
mod variables;

pub use constraint::*;
pub use model::*;
pub use smtlib::*;
pub use variables::*;
