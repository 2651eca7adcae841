//! Tunable controls shared by the heuristics, the local improvement passes
//! and the CSC search.

use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::error::{Result, SpectrumError};
use crate::tracker::NeighborUpdate;

/// Post-construction refinement of a complete coloring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Refinement {
    None,
    /// Random-subset resampling, see [`crate::improve::resample`].
    Resample,
    /// Cooldown-guarded recoloring sweeps, see [`crate::improve::tabu_walk`].
    Tabu,
    /// Recolorings that chase interference away from the worst vertices,
    /// see [`crate::improve::cascade`].
    Cascade,
}

impl FromStr for Refinement {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Refinement::None),
            "resample" => Ok(Refinement::Resample),
            "tabu" => Ok(Refinement::Tabu),
            "cascade" => Ok(Refinement::Cascade),
            _ => Err(SpectrumError::UnknownRefinement(s.to_string())),
        }
    }
}

/// How CSC looks for the smallest feasible palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CscSearch {
    /// Binary search over `k`; assumes feasibility is monotone in `k`.
    Binary,
    /// Tries `k = 1, 2, ...` in turn and stops at the first feasible one.
    Linear,
    /// One saturation-ordered pass over the whole spectrum that never lets
    /// a vertex exceed its share of the target, see
    /// [`crate::csc::incremental`]. Ignores the solver's heuristic.
    Incremental,
}

impl FromStr for CscSearch {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "binary" => Ok(CscSearch::Binary),
            "linear" => Ok(CscSearch::Linear),
            "incremental" => Ok(CscSearch::Incremental),
            _ => Err(SpectrumError::UnknownCscSearch(s.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Params {
    /// Seed of the solver's random stream (tie-breaks, SWO, sampling).
    pub seed: u64,

    /// Neighbor update rule during greedy construction.
    pub update: NeighborUpdate,

    pub refinement: Refinement,

    /// Maximum number of SWO greedy passes.
    pub swo_passes: usize,

    /// A vertex is blamed after a pass when its interference is at least
    /// this fraction of the pass threshold.
    pub swo_blame_fraction: f64,

    /// Priority added to blamed vertices; `None` means a fifth of |V|.
    pub swo_blame: Option<f64>,

    /// Fraction of the evaluation range admitted into the GRASP restricted
    /// candidate list, measured down from the worst vertex.
    pub grasp_alpha: f64,

    pub resample_iters: usize,

    /// Fraction of the vertices sampled per resampling round.
    pub resample_fraction: f64,

    pub tabu_iters: usize,

    /// Sweeps a recolored `(vertex, color)` pair stays forbidden.
    pub tabu_tenure: usize,

    /// Levels a cascade follows from the worst vertices outwards.
    pub cascade_depth: usize,

    pub csc_search: CscSearch,

    /// Wall-clock cap on SWO passes and refinement rounds, on top of the
    /// iteration caps.
    pub time_budget: Option<Duration>,

    /// Print one JSON record per construction, refinement and CSC attempt.
    pub verbose: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            seed: 0,
            update: NeighborUpdate::All,
            refinement: Refinement::None,
            swo_passes: 20,
            swo_blame_fraction: 0.8,
            swo_blame: None,
            grasp_alpha: 0.9,
            resample_iters: 20,
            resample_fraction: 1.0 / 3.0,
            tabu_iters: 30,
            tabu_tenure: 7,
            cascade_depth: 10,
            csc_search: CscSearch::Binary,
            time_budget: None,
            verbose: false,
        }
    }
}

/// Deadline derived from [`Params::time_budget`] at the start of a run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Budget {
    deadline: Option<Instant>,
}

impl Budget {
    pub(crate) fn start(params: &Params) -> Self {
        Self {
            deadline: params.time_budget.map(|d| Instant::now() + d),
        }
    }

    pub(crate) fn exhausted(&self) -> bool {
        self.deadline.map_or(false, |d| Instant::now() >= d)
    }
}
