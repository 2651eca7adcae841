//! TSC and CSC entry points.
//!
//! Every heuristic is a [`ThresholdSolver`]: it owns its tracker, its
//! parameters and a seeded random stream, and answers TSC queries for a
//! palette size. CSC is derived from TSC by searching over the palette size,
//! see [`crate::csc`].

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rand_pcg::Lcg64Xsh32;
use serde_json::json;

use crate::coloring::Coloring;
use crate::construct::construct;
use crate::csc;
use crate::error::{Result, SpectrumError};
use crate::improve;
use crate::params::{CscSearch, Params};
use crate::policy::{Bfs, DegreeBfs, Grasp, Saturation, SelectionPolicy, VertexMerge};
use crate::problem::Problem;
use crate::report;
use crate::swo::Swo;
use crate::tracker::InterferenceTracker;

pub(crate) fn seeded_rng(seed: u64) -> Lcg64Xsh32 {
    Lcg64Xsh32::new(0xcafef00dd15ea5e5, seed)
}

/// A complete coloring with palette limited to the first `k` colors and its
/// threshold (largest per-vertex interference).
#[derive(Clone, Debug)]
pub struct TscSolution {
    pub threshold: f64,
    pub coloring: Coloring,
}

/// Smallest palette found whose TSC threshold stays within the target.
#[derive(Clone, Debug)]
pub struct CscSolution {
    pub k: usize,
    pub coloring: Coloring,
}

impl CscSolution {
    /// No tried palette met the threshold: `k` is `|V|` and nothing is
    /// colored.
    pub(crate) fn infeasible(nvertices: usize) -> Self {
        Self {
            k: nvertices,
            coloring: Coloring::unassigned(nvertices),
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.coloring.is_complete()
    }
}

pub trait ThresholdSolver {
    fn name(&self) -> &'static str;

    fn problem(&self) -> Problem<'_>;

    fn params(&self) -> &Params;

    /// Tracker state left by the last run; describes the returned coloring
    /// whenever construction ran with [`crate::NeighborUpdate::All`] or a
    /// refinement ran afterwards.
    fn tracker(&self) -> &InterferenceTracker;

    /// Colors every vertex with one of the first `k` colors of the spectrum,
    /// trying to keep the threshold low.
    fn threshold_spectrum_coloring(&mut self, k: usize) -> Result<TscSolution>;

    /// Searches a small palette whose coloring stays within `t`, the way
    /// [`Params::csc_search`] asks for.
    fn chromatic_spectrum_coloring(&mut self, t: f64) -> Result<CscSolution> {
        match self.params().csc_search {
            CscSearch::Binary => csc::binary_search(self, t),
            CscSearch::Linear => csc::linear_scan(self, t),
            CscSearch::Incremental => csc::incremental(self.problem(), t, self.params()),
        }
    }
}

/// One greedy construction driven by a selection policy, followed by the
/// refinement chosen in [`Params::refinement`].
pub struct Sequential<'a, P> {
    problem: Problem<'a>,
    policy: P,
    tracker: InterferenceTracker,
    params: Params,
    rng: Lcg64Xsh32,
}

impl<'a, P: SelectionPolicy> Sequential<'a, P> {
    pub fn new(problem: Problem<'a>, policy: P, params: Params) -> Self {
        Self {
            problem,
            policy,
            tracker: InterferenceTracker::default(),
            rng: seeded_rng(params.seed),
            params,
        }
    }
}

impl<'a, P: SelectionPolicy> ThresholdSolver for Sequential<'a, P> {
    fn name(&self) -> &'static str {
        self.policy.name()
    }

    fn problem(&self) -> Problem<'_> {
        self.problem
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn tracker(&self) -> &InterferenceTracker {
        &self.tracker
    }

    fn threshold_spectrum_coloring(&mut self, k: usize) -> Result<TscSolution> {
        self.problem.check_palette(k)?;
        let start = Instant::now();
        let mut coloring = construct(
            self.problem,
            &mut self.tracker,
            &mut self.policy,
            k,
            self.params.update,
            &mut self.rng,
        );
        let construct_time = Instant::now().duration_since(start);
        report::emit(
            self.params.verbose,
            json!({
                "heuristic": self.policy.name(),
                "k": k,
                "threshold": self.problem.threshold(&coloring),
                "construct_time": report::duration(construct_time),
            }),
        );
        let threshold = improve::refine(
            self.problem,
            &mut self.tracker,
            &mut coloring,
            k,
            &self.params,
            &mut self.rng,
        )?;
        Ok(TscSolution {
            threshold,
            coloring,
        })
    }
}

/// The construction heuristics, selectable by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heuristic {
    Saturation,
    Bfs,
    DegreeBfs,
    VertexMerge,
    Swo,
    Grasp,
}

impl Heuristic {
    pub const ALL: [Heuristic; 6] = [
        Heuristic::Saturation,
        Heuristic::Bfs,
        Heuristic::DegreeBfs,
        Heuristic::VertexMerge,
        Heuristic::Swo,
        Heuristic::Grasp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Saturation => "saturation",
            Heuristic::Bfs => "bfs",
            Heuristic::DegreeBfs => "degree-bfs",
            Heuristic::VertexMerge => "vertex-merge",
            Heuristic::Swo => "swo",
            Heuristic::Grasp => "grasp",
        }
    }

    pub fn solver<'a>(self, problem: Problem<'a>, params: Params) -> Box<dyn ThresholdSolver + 'a> {
        match self {
            Heuristic::Saturation => Box::new(Sequential::new(problem, Saturation, params)),
            Heuristic::Bfs => Box::new(Sequential::new(problem, Bfs::default(), params)),
            Heuristic::DegreeBfs => {
                Box::new(Sequential::new(problem, DegreeBfs::default(), params))
            }
            Heuristic::VertexMerge => {
                Box::new(Sequential::new(problem, VertexMerge::default(), params))
            }
            Heuristic::Swo => Box::new(Swo::new(problem, params)),
            Heuristic::Grasp => {
                let policy = Grasp::new(params.grasp_alpha);
                Box::new(Sequential::new(problem, policy, params))
            }
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = SpectrumError;

    fn from_str(s: &str) -> Result<Self> {
        Heuristic::ALL
            .iter()
            .copied()
            .find(|h| h.name() == s)
            .ok_or_else(|| SpectrumError::UnknownHeuristic(s.to_string()))
    }
}
