//! The greedy sequential construction loop every heuristic runs.

use rand::Rng;

use crate::coloring::Coloring;
use crate::graph::Vertex;
use crate::policy::SelectionPolicy;
use crate::problem::Problem;
use crate::tracker::{InterferenceTracker, NeighborUpdate};

/// Read-only view of a construction in progress, handed to selection
/// policies.
pub struct Construction<'c> {
    pub problem: Problem<'c>,
    pub coloring: &'c Coloring,
    pub tracker: &'c InterferenceTracker,
    /// Palette size; candidate colors are `0..k`.
    pub k: usize,
}

impl<'c> Construction<'c> {
    pub fn uncolored(&self) -> impl Iterator<Item = Vertex> + 'c {
        let coloring = self.coloring;
        self.problem
            .graph()
            .vertices()
            .filter(move |&v| !coloring.is_colored(v))
    }

    pub fn degree(&self, v: Vertex) -> usize {
        self.problem.graph().degree(v)
    }
}

/// Colors every vertex in the order `policy` picks them, each with its
/// least-interfering color among the first `k`.
///
/// The tracker is reset first and, on return, describes the returned
/// coloring.
pub fn construct<P, R>(
    problem: Problem<'_>,
    tracker: &mut InterferenceTracker,
    policy: &mut P,
    k: usize,
    update: NeighborUpdate,
    rng: &mut R,
) -> Coloring
where
    P: SelectionPolicy + ?Sized,
    R: Rng + ?Sized,
{
    let graph = problem.graph();
    let weights = problem.weights();
    let mut coloring = tracker.reset(graph, problem.spectrum());
    policy.reset(&problem);

    loop {
        let next = policy.select_next(
            &Construction {
                problem,
                coloring: &coloring,
                tracker: &*tracker,
                k,
            },
            rng,
        );
        let vertex = match next {
            Some(v) => v,
            None => break,
        };
        assert!(
            !coloring.is_colored(vertex),
            "{} selected vertex {} twice",
            policy.name(),
            graph.label(vertex)
        );
        let color = tracker.best_candidate(vertex, k);
        tracker.assign(graph, weights, vertex, color, &mut coloring, update);
        policy.on_assign(
            vertex,
            &Construction {
                problem,
                coloring: &coloring,
                tracker: &*tracker,
                k,
            },
        );
    }

    assert!(
        coloring.is_complete(),
        "{} stopped with {} of {} vertices colored",
        policy.name(),
        coloring.ncolored(),
        coloring.len()
    );
    debug_assert!(
        update == NeighborUpdate::Uncolored || tracker.is_consistent(graph, weights, &coloring)
    );
    coloring
}
