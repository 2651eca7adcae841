//! Vertex selection policies for greedy sequential construction.
//!
//! A policy only decides *which* uncolored vertex goes next; the color is
//! always the tracker's least-interfering candidate. Policies see the
//! construction through a read-only [`Construction`] and may keep private
//! traversal state between picks.

use itertools::Itertools;
use ordered_float::NotNan;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::construct::Construction;
use crate::graph::Vertex;
use crate::order::{all_max_by_key, first_max_by_key};
use crate::problem::Problem;

pub trait SelectionPolicy {
    fn name(&self) -> &'static str;

    /// Clears per-run state; called once before every construction.
    fn reset(&mut self, _problem: &Problem<'_>) {}

    /// The next vertex to color, or `None` once every vertex is colored.
    fn select_next<R: Rng + ?Sized>(
        &mut self,
        state: &Construction<'_>,
        rng: &mut R,
    ) -> Option<Vertex>;

    /// Called right after `vertex` got its color.
    fn on_assign(&mut self, _vertex: Vertex, _state: &Construction<'_>) {}
}

fn choose_tie<R: Rng + ?Sized>(ties: &[usize], rng: &mut R) -> Option<usize> {
    ties.choose(rng).copied()
}

/// DSATUR-style: the uncolored vertex with the most colored neighbors,
/// then the highest degree, then uniformly at random.
#[derive(Clone, Debug, Default)]
pub struct Saturation;

impl SelectionPolicy for Saturation {
    fn name(&self) -> &'static str {
        "saturation"
    }

    fn select_next<R: Rng + ?Sized>(
        &mut self,
        state: &Construction<'_>,
        rng: &mut R,
    ) -> Option<Vertex> {
        let uncolored: Vec<Vertex> = state.uncolored().collect();
        let ties = all_max_by_key(&uncolored, |&v| (state.tracker.saturation(v), state.degree(v)));
        choose_tie(&ties, rng).map(|i| uncolored[i])
    }
}

/// Component-at-a-time traversal state shared by [`Bfs`] and [`DegreeBfs`].
#[derive(Clone, Debug, Default)]
struct Traversal {
    visited: Vec<bool>,
    frontier: Vec<Vertex>,
}

impl Traversal {
    fn reset(&mut self, nvertices: usize) {
        self.visited.clear();
        self.visited.resize(nvertices, false);
        self.frontier.clear();
    }

    /// Seeds the frontier with a max-degree unvisited vertex, random among
    /// ties. False once every vertex was visited.
    fn seed<R: Rng + ?Sized>(&mut self, state: &Construction<'_>, rng: &mut R) -> bool {
        let visited = &self.visited;
        let unvisited: Vec<Vertex> = state
            .problem
            .graph()
            .vertices()
            .filter(|&v| !visited[v as usize])
            .collect();
        let ties = all_max_by_key(&unvisited, |&v| state.degree(v));
        match choose_tie(&ties, rng) {
            Some(i) => {
                let seed = unvisited[i];
                self.visited[seed as usize] = true;
                self.frontier.push(seed);
                true
            }
            None => false,
        }
    }

    fn discover(&mut self, vertex: Vertex, state: &Construction<'_>) {
        for &w in state.problem.graph().neighbors(vertex) {
            if !self.visited[w as usize] {
                self.visited[w as usize] = true;
                self.frontier.push(w);
            }
        }
    }
}

/// Traverses one connected component at a time from its max-degree seed,
/// coloring vertices as they are popped off the discovery stack.
#[derive(Clone, Debug, Default)]
pub struct Bfs {
    traversal: Traversal,
}

impl SelectionPolicy for Bfs {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn reset(&mut self, problem: &Problem<'_>) {
        self.traversal.reset(problem.nvertices());
    }

    fn select_next<R: Rng + ?Sized>(
        &mut self,
        state: &Construction<'_>,
        rng: &mut R,
    ) -> Option<Vertex> {
        if self.traversal.frontier.is_empty() && !self.traversal.seed(state, rng) {
            return None;
        }
        self.traversal.frontier.pop()
    }

    fn on_assign(&mut self, vertex: Vertex, state: &Construction<'_>) {
        self.traversal.discover(vertex, state);
    }
}

/// Same component-at-a-time traversal as [`Bfs`], but always extracts the
/// highest-degree pending vertex from the frontier.
#[derive(Clone, Debug, Default)]
pub struct DegreeBfs {
    traversal: Traversal,
}

impl SelectionPolicy for DegreeBfs {
    fn name(&self) -> &'static str {
        "degree-bfs"
    }

    fn reset(&mut self, problem: &Problem<'_>) {
        self.traversal.reset(problem.nvertices());
    }

    fn select_next<R: Rng + ?Sized>(
        &mut self,
        state: &Construction<'_>,
        rng: &mut R,
    ) -> Option<Vertex> {
        if self.traversal.frontier.is_empty() && !self.traversal.seed(state, rng) {
            return None;
        }
        let frontier = &self.traversal.frontier;
        let ties = all_max_by_key(frontier, |&v| state.degree(v));
        let i = choose_tie(&ties, rng)?;
        Some(self.traversal.frontier.remove(i))
    }

    fn on_assign(&mut self, vertex: Vertex, state: &Construction<'_>) {
        self.traversal.discover(vertex, state);
    }
}

/// Colors vertices in pairs: the max-degree uncolored vertex, then at once
/// the max-degree uncolored vertex not adjacent to it. Deterministic; ties
/// go to the vertex seen first.
#[derive(Clone, Debug, Default)]
pub struct VertexMerge {
    partner: Option<Vertex>,
    pairing: bool,
}

impl SelectionPolicy for VertexMerge {
    fn name(&self) -> &'static str {
        "vertex-merge"
    }

    fn reset(&mut self, _problem: &Problem<'_>) {
        self.partner = None;
        self.pairing = false;
    }

    fn select_next<R: Rng + ?Sized>(
        &mut self,
        state: &Construction<'_>,
        _rng: &mut R,
    ) -> Option<Vertex> {
        if let Some(partner) = self.partner.take() {
            return Some(partner);
        }
        let uncolored: Vec<Vertex> = state.uncolored().collect();
        let i = first_max_by_key(&uncolored, |&v| state.degree(v))?;
        self.pairing = true;
        Some(uncolored[i])
    }

    fn on_assign(&mut self, vertex: Vertex, state: &Construction<'_>) {
        if !self.pairing {
            return;
        }
        self.pairing = false;
        let graph = state.problem.graph();
        let candidates: Vec<Vertex> = state
            .uncolored()
            .filter(|&w| !graph.adjacent(vertex, w))
            .collect();
        self.partner = first_max_by_key(&candidates, |&w| state.degree(w)).map(|i| candidates[i]);
    }
}

/// GRASP-style randomized construction: the first vertex is uniform; later
/// picks are uniform over the restricted candidate list of uncolored
/// vertices whose best achievable interference lies in the top
/// `1 - alpha` share of the current range.
#[derive(Clone, Debug)]
pub struct Grasp {
    alpha: f64,
}

impl Grasp {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.max(0.0).min(1.0),
        }
    }
}

impl Default for Grasp {
    fn default() -> Self {
        Self::new(0.9)
    }
}

impl SelectionPolicy for Grasp {
    fn name(&self) -> &'static str {
        "grasp"
    }

    fn select_next<R: Rng + ?Sized>(
        &mut self,
        state: &Construction<'_>,
        rng: &mut R,
    ) -> Option<Vertex> {
        let uncolored: Vec<Vertex> = state.uncolored().collect();
        if state.coloring.ncolored() == 0 {
            return uncolored.choose(rng).copied();
        }
        let evals: Vec<f64> = uncolored
            .iter()
            .map(|&v| {
                let c = state.tracker.best_candidate(v, state.k);
                state.tracker.interference(v, c)
            })
            .collect();
        let (lo, hi) = evals
            .iter()
            .filter_map(|&e| NotNan::new(e).ok())
            .minmax()
            .into_option()?;
        let cutoff = lo.into_inner() + self.alpha * (hi.into_inner() - lo.into_inner());
        let rcl: Vec<Vertex> = uncolored
            .iter()
            .zip(&evals)
            .filter(|&(_, &e)| e >= cutoff)
            .map(|(&v, _)| v)
            .collect();
        // float rounding can push the cutoff past the maximum
        rcl.choose(rng).copied().or_else(|| {
            first_max_by_key(&evals, |&e| NotNan::new(e).ok()).map(|i| uncolored[i])
        })
    }
}

/// Colors vertices in a fixed order; the building block of SWO passes.
#[derive(Clone, Debug, Default)]
pub struct FixedOrder {
    order: Vec<Vertex>,
    cursor: usize,
}

impl FixedOrder {
    pub fn new(order: Vec<Vertex>) -> Self {
        Self { order, cursor: 0 }
    }
}

impl SelectionPolicy for FixedOrder {
    fn name(&self) -> &'static str {
        "fixed-order"
    }

    fn reset(&mut self, problem: &Problem<'_>) {
        assert_eq!(self.order.len(), problem.nvertices());
        self.cursor = 0;
    }

    fn select_next<R: Rng + ?Sized>(
        &mut self,
        state: &Construction<'_>,
        _rng: &mut R,
    ) -> Option<Vertex> {
        while let Some(&v) = self.order.get(self.cursor) {
            self.cursor += 1;
            if !state.coloring.is_colored(v) {
                return Some(v);
            }
        }
        None
    }
}
