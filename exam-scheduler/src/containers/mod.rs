//! Containers indexed by the typed ids of courses and rooms.
mod keyed_vec;

pub use keyed_vec::*;
