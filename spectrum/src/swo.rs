//! Squeaky-wheel optimization: repeated greedy passes over a priority
//! order, where the vertices that ended up worst off move forward for the
//! next pass.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand_pcg::Lcg64Xsh32;
use serde_json::json;

use crate::construct::construct;
use crate::error::Result;
use crate::graph::Vertex;
use crate::improve;
use crate::order::by_descending_priority;
use crate::params::{Budget, Params};
use crate::policy::FixedOrder;
use crate::problem::Problem;
use crate::report;
use crate::solver::{seeded_rng, ThresholdSolver, TscSolution};
use crate::tracker::{InterferenceTracker, NeighborUpdate};

pub struct Swo<'a> {
    problem: Problem<'a>,
    tracker: InterferenceTracker,
    params: Params,
    rng: Lcg64Xsh32,
}

impl<'a> Swo<'a> {
    pub fn new(problem: Problem<'a>, params: Params) -> Self {
        Self {
            problem,
            tracker: InterferenceTracker::default(),
            rng: seeded_rng(params.seed),
            params,
        }
    }

    /// Colors greedily in `order`, then rewrites `order` for the next pass:
    /// every vertex gets `n - position`, plus `blame` if its interference is
    /// at least `swo_blame_fraction` of the pass threshold.
    fn pass(
        &mut self,
        order: &mut [(Vertex, f64)],
        k: usize,
        blame: f64,
        index: usize,
    ) -> TscSolution {
        let start = Instant::now();
        let mut policy = FixedOrder::new(order.iter().map(|&(v, _)| v).collect());
        let coloring = construct(
            self.problem,
            &mut self.tracker,
            &mut policy,
            k,
            NeighborUpdate::All,
            &mut self.rng,
        );
        let threshold = self.problem.threshold(&coloring);

        let n = order.len();
        let cutoff = self.params.swo_blame_fraction * threshold;
        for (i, entry) in order.iter_mut().enumerate() {
            let v = entry.0;
            let interference = coloring
                .get(v)
                .map_or(0.0, |c| self.tracker.interference(v, c));
            entry.1 = (n - i) as f64;
            if interference >= cutoff {
                entry.1 += blame;
            }
        }
        by_descending_priority(order);

        report::emit(
            self.params.verbose,
            json!({
                "heuristic": "swo",
                "pass": index,
                "k": k,
                "threshold": threshold,
                "pass_time": report::duration(Instant::now().duration_since(start)),
            }),
        );
        TscSolution {
            threshold,
            coloring,
        }
    }
}

impl<'a> ThresholdSolver for Swo<'a> {
    fn name(&self) -> &'static str {
        "swo"
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
        let n = self.problem.nvertices();
        let blame = self.params.swo_blame.unwrap_or(n as f64 / 5.0);

        let mut vertices: Vec<Vertex> = self.problem.graph().vertices().collect();
        vertices.shuffle(&mut self.rng);
        let mut order: Vec<(Vertex, f64)> = vertices
            .into_iter()
            .enumerate()
            .map(|(i, v)| (v, (n - i) as f64))
            .collect();

        let budget = Budget::start(&self.params);
        let mut best = self.pass(&mut order, k, blame, 0);
        for index in 1..self.params.swo_passes {
            if best.threshold == 0.0 || budget.exhausted() {
                break;
            }
            let candidate = self.pass(&mut order, k, blame, index);
            if candidate.threshold < best.threshold {
                best = candidate;
            }
        }

        let mut coloring = best.coloring;
        let problem = self.problem;
        self.tracker
            .rebuild(problem.graph(), problem.spectrum(), problem.weights(), &coloring);
        let threshold = improve::refine(
            problem,
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
