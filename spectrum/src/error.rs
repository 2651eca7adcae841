use thiserror::Error;

// Argument errors surfaced by the coloring engine. Broken internal
// invariants are assertions instead.

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("graph has no vertices")]
    EmptyGraph,
    #[error("spectrum has no colors")]
    EmptySpectrum,
    #[error("palette size {k} outside 1..={available}")]
    PaletteSize { k: usize, available: usize },
    #[error("threshold {0} is negative or not a number")]
    NegativeThreshold(f64),
    #[error("interference W[{row}][{col}] = {value} is negative or not finite")]
    NegativeWeight { row: usize, col: usize, value: f64 },
    #[error("interference matrix is not symmetric at ({row}, {col})")]
    AsymmetricWeight { row: usize, col: usize },
    #[error("interference matrix is {rows}x{cols}, spectrum has {ncolors} colors")]
    MatrixShape {
        rows: usize,
        cols: usize,
        ncolors: usize,
    },
    #[error("self loop on vertex {0}")]
    SelfLoop(String),
    #[error("unknown vertex {0}")]
    UnknownVertex(String),
    #[error("unknown color {0}")]
    UnknownColor(String),
    #[error("unknown heuristic {0}")]
    UnknownHeuristic(String),
    #[error("unknown refinement {0}")]
    UnknownRefinement(String),
    #[error("unknown CSC search {0}")]
    UnknownCscSearch(String),
    #[error("unknown interference model {0}")]
    UnknownWeightModel(String),
    #[error("coloring covers {len} vertices, graph has {nvertices}")]
    ColoringShape { len: usize, nvertices: usize },
    #[error("vertex {vertex} has color index {color}, palette has {k} colors")]
    ColorOutOfRange { vertex: String, color: u32, k: usize },
}

pub type Result<T> = std::result::Result<T, SpectrumError>;
