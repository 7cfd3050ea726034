//! Construction of the conflict graph from enrollment records.
//!
//! Courses are the nodes of the graph; every student who takes two courses adds an edge between
//! them. The graph is a multigraph, but the encoders only look at the set of distinct conflicting
//! course pairs.
mod builder;
mod conflict_graph;

pub use builder::*;
pub use conflict_graph::*;
