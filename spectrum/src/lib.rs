//! # `spectrum` - heuristics for spectrum graph coloring
//!
//! Colors the vertices of a graph with colors from a spectrum, where every
//! pair of colors interferes by a weight `W[a][b]` and a vertex suffers the
//! summed interference of its neighbors' colors against its own.
//!
//! * Threshold spectrum coloring (TSC): given a palette of the first `k`
//!   colors, keep the worst vertex interference (the threshold) low.
//! * Chromatic spectrum coloring (CSC): given a threshold `t`, find a small
//!   palette whose TSC threshold stays within `t`.
//!
//! All heuristics share one greedy construction loop and one incremental
//! [`InterferenceTracker`]; they differ in the [`SelectionPolicy`] that
//! picks the next vertex, see [`Heuristic`].

pub mod coloring;
pub mod construct;
pub mod csc;
pub mod error;
pub mod graph;
pub mod improve;
pub mod interference;
mod order;
pub mod params;
pub mod policy;
pub mod problem;
pub mod report;
pub mod solver;
pub mod swo;
pub mod tracker;

pub use coloring::{Coloring, NO_COLOR};
pub use error::{Result, SpectrumError};
pub use graph::{Graph, GraphBuilder, Vertex};
pub use interference::{
    empiric_dist, inv_pow2, Color, InterferenceMatrix, Spectrum, WeightModel,
};
pub use params::{CscSearch, Params, Refinement};
pub use policy::SelectionPolicy;
pub use problem::Problem;
pub use report::InterferenceSummary;
pub use solver::{CscSolution, Heuristic, Sequential, ThresholdSolver, TscSolution};
pub use tracker::{InterferenceTracker, NeighborUpdate};
